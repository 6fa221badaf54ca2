//! RISC-V Base Integer (I) Function Codes (funct3).

/// Load Byte.
pub const LB: u32 = 0b000;
/// Load Half.
pub const LH: u32 = 0b001;
/// Load Word.
pub const LW: u32 = 0b010;
/// Load Byte Unsigned.
pub const LBU: u32 = 0b100;
/// Load Half Unsigned.
pub const LHU: u32 = 0b101;

/// Store Byte.
pub const SB: u32 = 0b000;
/// Store Half.
pub const SH: u32 = 0b001;
/// Store Word.
pub const SW: u32 = 0b010;

/// Branch if Equal.
pub const BEQ: u32 = 0b000;
/// Branch if Not Equal.
pub const BNE: u32 = 0b001;
/// Branch if Less Than.
pub const BLT: u32 = 0b100;
/// Branch if Greater or Equal.
pub const BGE: u32 = 0b101;
/// Branch if Less Than (Unsigned).
pub const BLTU: u32 = 0b110;
/// Branch if Greater or Equal (Unsigned).
pub const BGEU: u32 = 0b111;

/// Add/Subtract.
pub const ADD_SUB: u32 = 0b000;
/// Shift Left Logical.
pub const SLL: u32 = 0b001;
/// Set Less Than.
pub const SLT: u32 = 0b010;
/// Set Less Than (Unsigned).
pub const SLTU: u32 = 0b011;
/// Exclusive OR.
pub const XOR: u32 = 0b100;
/// Shift Right Logical/Arithmetic.
pub const SRL_SRA: u32 = 0b101;
/// OR.
pub const OR: u32 = 0b110;
/// AND.
pub const AND: u32 = 0b111;

/// Fence.
pub const FENCE: u32 = 0b000;
/// Instruction Fence.
pub const FENCE_I: u32 = 0b001;

/// JALR requires funct3 zero.
pub const JALR: u32 = 0b000;
