//! Configuration Tests.
//!
//! Verifies JSON loading, defaults and validation of the build-time configuration.

use std::io::Write;

use k10_core::common::error::ConfigError;
use k10_core::config::Config;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::NamedTempFile;

#[test]
fn default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.core.boot_addr, 0x8000_0000);
    assert_eq!(config.core.pmp_regions, 16);
    assert_eq!(config.memory.ibus_latency, 1);
    assert_eq!(config.memory.dbus_latency, 1);
    assert_eq!(config.general.max_cycles, 1_000_000);
}

#[test]
fn empty_document_yields_defaults() {
    let config = Config::from_json("{}").expect("empty object is valid");
    assert_eq!(config, Config::default());
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let config = Config::from_json(r#"{ "core": { "hart_id": 3 }, "memory": { "error_ranges": [[16, 32]] } }"#)
        .expect("valid config");
    assert_eq!(config.core.hart_id, 3);
    assert_eq!(config.core.boot_addr, Config::default().core.boot_addr);
    assert_eq!(config.memory.error_ranges, vec![[16, 32]]);
}

#[test]
fn loads_from_file() {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{ "general": {{ "max_cycles": 500 }}, "core": {{ "boot_addr": 4096 }}, "memory": {{ "base": 0, "size": 8192 }} }}"#
    )
    .expect("write config");

    let config = Config::from_file(file.path()).expect("file config is valid");
    assert_eq!(config.general.max_cycles, 500);
    assert_eq!(config.core.boot_addr, 0x1000);
    assert_eq!(config.memory.base, 0);
    assert_eq!(config.memory.size, 8192);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = Config::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn malformed_json_is_parse_error() {
    let err = Config::from_json("{ core: ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[rstest]
#[case::too_many_pmp_regions(r#"{ "core": { "pmp_regions": 17 } }"#, "core.pmp_regions")]
#[case::odd_boot_addr(r#"{ "core": { "boot_addr": 4097 } }"#, "core.boot_addr")]
#[case::odd_debug_addr(r#"{ "core": { "debug_halt_addr": 3 } }"#, "core.debug_halt_addr")]
#[case::zero_memory(r#"{ "memory": { "size": 0 } }"#, "memory.size")]
#[case::unaligned_memory(r#"{ "memory": { "size": 6 } }"#, "memory.size")]
#[case::empty_error_range(r#"{ "memory": { "error_ranges": [[8, 8]] } }"#, "memory.error_ranges")]
fn rejects_invalid_values(#[case] json: &str, #[case] expected_field: &str) {
    match Config::from_json(json) {
        Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("expected invalid `{expected_field}`, got {other:?}"),
    }
}
