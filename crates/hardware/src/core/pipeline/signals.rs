//! Pipeline control signals and operation types.
//!
//! This module defines the decoded control word that steers an instruction through
//! the pipeline. It performs:
//! 1. **Operation Classification:** Categorizes ALU, multiply/divide, atomic, and CSR operations.
//! 2. **Operand Selection:** Defines sources for ALU inputs (registers, PC, or immediates).
//! 3. **Memory Control:** Specifies access widths and sign-extension requirements.
//! 4. **System Control:** Flags for privileged and ordering instructions.
//!
//! The control word is a flat record: every field is always present and irrelevant
//! fields keep their default. `ControlSignals::default()` is the canonical no-op that
//! flushes and stall bubbles inject.

/// ALU operation types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// Integer addition (also the no-op default).
    #[default]
    Add,

    /// Integer subtraction.
    Sub,

    /// Shift left logical.
    Sll,

    /// Set less than (signed).
    Slt,

    /// Set less than unsigned.
    Sltu,

    /// Bitwise XOR.
    Xor,

    /// Shift right logical.
    Srl,

    /// Shift right arithmetic.
    Sra,

    /// Bitwise OR.
    Or,

    /// Bitwise AND.
    And,

    /// Pass operand A through (CSR register source).
    PassA,

    /// Pass operand B through (LUI, CSR immediate source).
    PassB,
}

/// Multiply/divide operation, encoded as the instruction's `funct3`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MdOp {
    /// Multiply, low 32 bits.
    #[default]
    Mul = 0,
    /// Multiply high, signed × signed.
    Mulh = 1,
    /// Multiply high, signed × unsigned.
    Mulhsu = 2,
    /// Multiply high, unsigned × unsigned.
    Mulhu = 3,
    /// Divide, signed.
    Div = 4,
    /// Divide, unsigned.
    Divu = 5,
    /// Remainder, signed.
    Rem = 6,
    /// Remainder, unsigned.
    Remu = 7,
}

impl MdOp {
    /// Decodes the operation from `funct3`.
    pub const fn from_funct3(funct3: u32) -> Self {
        match funct3 & 0b111 {
            0 => Self::Mul,
            1 => Self::Mulh,
            2 => Self::Mulhsu,
            3 => Self::Mulhu,
            4 => Self::Div,
            5 => Self::Divu,
            6 => Self::Rem,
            _ => Self::Remu,
        }
    }
}

/// Branch comparison, encoded as the instruction's `funct3`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BranchCond {
    /// Equal.
    #[default]
    Eq,
    /// Not equal.
    Ne,
    /// Signed less than.
    Lt,
    /// Signed greater or equal.
    Ge,
    /// Unsigned less than.
    Ltu,
    /// Unsigned greater or equal.
    Geu,
}

/// Kind of control transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JumpKind {
    /// Not a control transfer.
    #[default]
    None,
    /// Conditional branch, taken when `branch_cond` holds.
    Branch,
    /// Direct jump (`jal`), always taken.
    Jal,
    /// Register-indirect jump (`jalr`), always taken.
    Jalr,
}

/// Atomic memory operation types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AtomicOp {
    /// Not an atomic instruction.
    #[default]
    None,

    /// Load-reserved.
    Lr,

    /// Store-conditional.
    Sc,

    /// Atomic swap.
    Swap,

    /// Atomic add.
    Add,

    /// Atomic XOR.
    Xor,

    /// Atomic AND.
    And,

    /// Atomic OR.
    Or,

    /// Atomic minimum (signed).
    Min,

    /// Atomic maximum (signed).
    Max,

    /// Atomic minimum (unsigned).
    Minu,

    /// Atomic maximum (unsigned).
    Maxu,
}

impl AtomicOp {
    /// Returns `true` for read-modify-write operations (everything except LR/SC).
    pub const fn is_amo(self) -> bool {
        !matches!(self, Self::None | Self::Lr | Self::Sc)
    }
}

/// Memory access width for load and store operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemWidth {
    /// 8-bit byte access.
    Byte,

    /// 16-bit half-word access.
    Half,

    /// 32-bit word access.
    #[default]
    Word,
}

impl MemWidth {
    /// Access size in bytes.
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
        }
    }
}

/// Source for ALU operand A.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpASrc {
    /// Use the forwarded `rs1` value.
    #[default]
    Reg1,

    /// Use the program counter.
    Pc,

    /// Use zero.
    Zero,
}

/// Source for ALU operand B.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpBSrc {
    /// Use the decoded immediate.
    #[default]
    Imm,

    /// Use the forwarded `rs2` value.
    Reg2,
}

/// Value committed to the register file by Writeback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WbSrc {
    /// ALU or multiply/divide result.
    #[default]
    Alu,

    /// Load data (including LR/SC/AMO results).
    Mem,

    /// Program counter plus instruction size (link address).
    PcPlus,

    /// CSR read value.
    Csr,
}

/// CSR (Control and Status Register) operation type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsrOp {
    /// No CSR operation.
    #[default]
    None,

    /// Read/write (CSRRW, CSRRWI).
    Rw,

    /// Read and set bits (CSRRS, CSRRSI).
    Rs,

    /// Read and clear bits (CSRRC, CSRRCI).
    Rc,
}

/// Decoded control word.
///
/// Produced once in Decode and carried unchanged through later latches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlSignals {
    /// ALU operation.
    pub alu: AluOp,
    /// ALU operand A source.
    pub a_src: OpASrc,
    /// ALU operand B source.
    pub b_src: OpBSrc,

    /// Instruction uses the multiply/divide unit.
    pub md_en: bool,
    /// Multiply/divide operation.
    pub md_op: MdOp,

    /// Control-transfer kind.
    pub jump: JumpKind,
    /// Condition for `JumpKind::Branch`.
    pub branch_cond: BranchCond,

    /// Instruction reads memory (loads, LR, SC and AMOs).
    pub mem_read: bool,
    /// Instruction writes memory (stores, SC and AMOs).
    pub mem_write: bool,
    /// Memory access width.
    pub width: MemWidth,
    /// Sign-extend the load result.
    pub signed_load: bool,

    /// Instruction writes `rd`.
    pub reg_write: bool,
    /// Writeback source.
    pub wb_sel: WbSrc,

    /// CSR operation.
    pub csr_op: CsrOp,
    /// CSR source is the 5-bit immediate rather than `rs1`.
    pub csr_imm: bool,
    /// The CSR is written (false for CSRRS/CSRRC with a zero source field).
    pub csr_write: bool,

    /// `ecall`.
    pub is_ecall: bool,
    /// `ebreak` (including `c.ebreak`).
    pub is_ebreak: bool,
    /// `mret`.
    pub is_mret: bool,
    /// `dret`.
    pub is_dret: bool,
    /// `wfi`.
    pub is_wfi: bool,
    /// `fence`.
    pub is_fence: bool,
    /// `fence.i`.
    pub is_fence_i: bool,

    /// Atomic operation.
    pub atomic_op: AtomicOp,

    /// Instruction was fetched as a 16-bit compact encoding.
    pub compressed: bool,
    /// Encoding is illegal or unsupported.
    pub illegal: bool,

    /// Instruction reads `rs1`.
    pub uses_rs1: bool,
    /// Instruction reads `rs2`.
    pub uses_rs2: bool,
}

impl ControlSignals {
    /// Returns `true` if the instruction is any kind of memory access.
    pub const fn is_mem(&self) -> bool {
        self.mem_read || self.mem_write
    }

    /// Returns `true` for LR/SC/AMO.
    pub const fn is_atomic(&self) -> bool {
        !matches!(self.atomic_op, AtomicOp::None)
    }

    /// Returns `true` if `rd` is produced by the memory stage (no forwarding from Memory).
    pub const fn result_from_memory(&self) -> bool {
        self.reg_write && matches!(self.wb_sel, WbSrc::Mem)
    }

    /// Returns `true` for CSR instructions.
    pub const fn is_csr(&self) -> bool {
        !matches!(self.csr_op, CsrOp::None)
    }

    /// Instruction size in bytes.
    pub const fn size(&self) -> u32 {
        if self.compressed { 2 } else { 4 }
    }
}
