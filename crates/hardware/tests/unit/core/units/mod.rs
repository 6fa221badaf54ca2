


/// Physical memory protection.
pub mod pmp;
