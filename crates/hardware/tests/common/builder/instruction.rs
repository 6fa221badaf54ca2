use k10_core::isa::privileged::opcodes as sys_ops;
use k10_core::isa::rv32a::funct5;
use k10_core::isa::rv32i::funct3;
use k10_core::isa::rv32i::opcodes::*;
use k10_core::isa::rv32m::FUNCT7_MULDIV;

/// `jal x0, 0`: the tests' halt marker.
pub const HALT: u32 = 0x0000_006F;
/// `addi x0, x0, 0`.
pub const NOP: u32 = 0x0000_0013;
pub const ECALL: u32 = sys_ops::ECALL;
pub const EBREAK: u32 = sys_ops::EBREAK;
pub const MRET: u32 = sys_ops::MRET;
pub const DRET: u32 = sys_ops::DRET;
pub const WFI: u32 = sys_ops::WFI;
/// `fence.i`.
pub const FENCE_I: u32 = 0x0000_100F;

pub struct InstructionBuilder {
    opcode: u32,
    rd: u32,
    funct3: u32,
    rs1: u32,
    rs2: u32,
    funct7: u32,
    imm: i32,
}

impl Default for InstructionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionBuilder {
    pub fn new() -> Self {
        Self {
            opcode: 0,
            rd: 0,
            funct3: 0,
            rs1: 0,
            rs2: 0,
            funct7: 0,
            imm: 0,
        }
    }

    pub fn opcode(mut self, op: u32) -> Self {
        self.opcode = op;
        self
    }

    pub fn rd(mut self, rd: u32) -> Self {
        self.rd = rd;
        self
    }

    pub fn rs1(mut self, rs1: u32) -> Self {
        self.rs1 = rs1;
        self
    }

    pub fn rs2(mut self, rs2: u32) -> Self {
        self.rs2 = rs2;
        self
    }

    pub fn funct3(mut self, funct3: u32) -> Self {
        self.funct3 = funct3;
        self
    }

    pub fn funct7(mut self, funct7: u32) -> Self {
        self.funct7 = funct7;
        self
    }

    pub fn imm(mut self, imm: i32) -> Self {
        self.imm = imm;
        self
    }

    fn reg(mut self, f7: u32, f3: u32, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.opcode = OP_REG;
        self.funct7 = f7;
        self.funct3 = f3;
        self.rd = rd;
        self.rs1 = rs1;
        self.rs2 = rs2;
        self
    }

    fn with_imm(mut self, opcode: u32, f3: u32, rd: u32, rs1: u32, imm: i32) -> Self {
        self.opcode = opcode;
        self.funct3 = f3;
        self.rd = rd;
        self.rs1 = rs1;
        self.imm = imm;
        self
    }

    fn store(mut self, f3: u32, rs2: u32, rs1: u32, imm: i32) -> Self {
        self.opcode = OP_STORE;
        self.funct3 = f3;
        self.rs1 = rs1;
        self.rs2 = rs2;
        self.imm = imm;
        self
    }

    fn branch(mut self, f3: u32, rs1: u32, rs2: u32, offset: i32) -> Self {
        self.opcode = OP_BRANCH;
        self.funct3 = f3;
        self.rs1 = rs1;
        self.rs2 = rs2;
        self.imm = offset;
        self
    }

    fn amo(mut self, f5: u32, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.opcode = OP_AMO;
        self.funct3 = 0b010;
        self.funct7 = f5 << 2;
        self.rd = rd;
        self.rs1 = rs1;
        self.rs2 = rs2;
        self
    }

    // --- Helpers for Common Instructions ---

    pub fn add(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(0, funct3::ADD_SUB, rd, rs1, rs2)
    }

    pub fn sub(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(0b0100000, funct3::ADD_SUB, rd, rs1, rs2)
    }

    pub fn and(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(0, funct3::AND, rd, rs1, rs2)
    }

    pub fn or(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(0, funct3::OR, rd, rs1, rs2)
    }

    pub fn xor(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(0, funct3::XOR, rd, rs1, rs2)
    }

    pub fn slt(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(0, funct3::SLT, rd, rs1, rs2)
    }

    pub fn sltu(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(0, funct3::SLTU, rd, rs1, rs2)
    }

    pub fn sll(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(0, funct3::SLL, rd, rs1, rs2)
    }

    pub fn sra(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(0b0100000, funct3::SRL_SRA, rd, rs1, rs2)
    }

    pub fn addi(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.with_imm(OP_IMM, funct3::ADD_SUB, rd, rs1, imm)
    }

    pub fn andi(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.with_imm(OP_IMM, funct3::AND, rd, rs1, imm)
    }

    pub fn ori(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.with_imm(OP_IMM, funct3::OR, rd, rs1, imm)
    }

    pub fn slli(self, rd: u32, rs1: u32, shamt: u32) -> Self {
        self.with_imm(OP_IMM, funct3::SLL, rd, rs1, shamt as i32)
    }

    pub fn srli(self, rd: u32, rs1: u32, shamt: u32) -> Self {
        self.with_imm(OP_IMM, funct3::SRL_SRA, rd, rs1, shamt as i32)
    }

    pub fn srai(self, rd: u32, rs1: u32, shamt: u32) -> Self {
        self.with_imm(OP_IMM, funct3::SRL_SRA, rd, rs1, (0x400 | shamt) as i32)
    }

    /// `lui rd, imm20` (`imm20` is the upper 20 bits).
    pub fn lui(mut self, rd: u32, imm20: u32) -> Self {
        self.opcode = OP_LUI;
        self.rd = rd;
        self.imm = imm20 as i32;
        self
    }

    /// `auipc rd, imm20` (`imm20` is the upper 20 bits).
    pub fn auipc(mut self, rd: u32, imm20: u32) -> Self {
        self.opcode = OP_AUIPC;
        self.rd = rd;
        self.imm = imm20 as i32;
        self
    }

    pub fn lw(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.with_imm(OP_LOAD, funct3::LW, rd, rs1, imm)
    }

    pub fn lh(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.with_imm(OP_LOAD, funct3::LH, rd, rs1, imm)
    }

    pub fn lhu(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.with_imm(OP_LOAD, funct3::LHU, rd, rs1, imm)
    }

    pub fn lb(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.with_imm(OP_LOAD, funct3::LB, rd, rs1, imm)
    }

    pub fn lbu(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.with_imm(OP_LOAD, funct3::LBU, rd, rs1, imm)
    }

    pub fn sw(self, rs2: u32, rs1: u32, imm: i32) -> Self {
        self.store(funct3::SW, rs2, rs1, imm)
    }

    pub fn sh(self, rs2: u32, rs1: u32, imm: i32) -> Self {
        self.store(funct3::SH, rs2, rs1, imm)
    }

    pub fn sb(self, rs2: u32, rs1: u32, imm: i32) -> Self {
        self.store(funct3::SB, rs2, rs1, imm)
    }

    pub fn beq(self, rs1: u32, rs2: u32, offset: i32) -> Self {
        self.branch(funct3::BEQ, rs1, rs2, offset)
    }

    pub fn bne(self, rs1: u32, rs2: u32, offset: i32) -> Self {
        self.branch(funct3::BNE, rs1, rs2, offset)
    }

    pub fn blt(self, rs1: u32, rs2: u32, offset: i32) -> Self {
        self.branch(funct3::BLT, rs1, rs2, offset)
    }

    pub fn bge(self, rs1: u32, rs2: u32, offset: i32) -> Self {
        self.branch(funct3::BGE, rs1, rs2, offset)
    }

    pub fn bltu(self, rs1: u32, rs2: u32, offset: i32) -> Self {
        self.branch(funct3::BLTU, rs1, rs2, offset)
    }

    pub fn bgeu(self, rs1: u32, rs2: u32, offset: i32) -> Self {
        self.branch(funct3::BGEU, rs1, rs2, offset)
    }

    pub fn jal(mut self, rd: u32, offset: i32) -> Self {
        self.opcode = OP_JAL;
        self.rd = rd;
        self.imm = offset;
        self
    }

    pub fn jalr(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.with_imm(OP_JALR, funct3::JALR, rd, rs1, imm)
    }

    pub fn mul(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(FUNCT7_MULDIV, 0b000, rd, rs1, rs2)
    }

    pub fn mulh(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(FUNCT7_MULDIV, 0b001, rd, rs1, rs2)
    }

    pub fn mulhu(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(FUNCT7_MULDIV, 0b011, rd, rs1, rs2)
    }

    pub fn div(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(FUNCT7_MULDIV, 0b100, rd, rs1, rs2)
    }

    pub fn divu(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(FUNCT7_MULDIV, 0b101, rd, rs1, rs2)
    }

    pub fn rem(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(FUNCT7_MULDIV, 0b110, rd, rs1, rs2)
    }

    pub fn remu(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.reg(FUNCT7_MULDIV, 0b111, rd, rs1, rs2)
    }

    pub fn lr_w(self, rd: u32, rs1: u32) -> Self {
        self.amo(funct5::LR, rd, rs1, 0)
    }

    pub fn sc_w(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.amo(funct5::SC, rd, rs1, rs2)
    }

    pub fn amoswap_w(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.amo(funct5::AMOSWAP, rd, rs1, rs2)
    }

    pub fn amoadd_w(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.amo(funct5::AMOADD, rd, rs1, rs2)
    }

    pub fn amomax_w(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.amo(funct5::AMOMAX, rd, rs1, rs2)
    }

    pub fn amominu_w(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.amo(funct5::AMOMINU, rd, rs1, rs2)
    }

    fn csr(self, f3: u32, rd: u32, csr: u32, src: u32) -> Self {
        self.with_imm(OP_SYSTEM, f3, rd, src, csr as i32)
    }

    pub fn csrrw(self, rd: u32, csr: u32, rs1: u32) -> Self {
        self.csr(sys_ops::CSRRW, rd, csr, rs1)
    }

    pub fn csrrs(self, rd: u32, csr: u32, rs1: u32) -> Self {
        self.csr(sys_ops::CSRRS, rd, csr, rs1)
    }

    pub fn csrrc(self, rd: u32, csr: u32, rs1: u32) -> Self {
        self.csr(sys_ops::CSRRC, rd, csr, rs1)
    }

    pub fn csrrwi(self, rd: u32, csr: u32, zimm: u32) -> Self {
        self.csr(sys_ops::CSRRWI, rd, csr, zimm)
    }

    pub fn csrrsi(self, rd: u32, csr: u32, zimm: u32) -> Self {
        self.csr(sys_ops::CSRRSI, rd, csr, zimm)
    }

    /// `csrr rd, csr`.
    pub fn csrr(self, rd: u32, csr: u32) -> Self {
        self.csrrs(rd, csr, 0)
    }

    pub fn build(self) -> u32 {
        let imm = self.imm as u32;
        let base = (self.rd << 7) | self.opcode;
        match self.opcode {
            OP_REG | OP_AMO => {
                (self.funct7 << 25)
                    | (self.rs2 << 20)
                    | (self.rs1 << 15)
                    | (self.funct3 << 12)
                    | base
            }
            OP_STORE => {
                ((imm >> 5 & 0x7F) << 25)
                    | (self.rs2 << 20)
                    | (self.rs1 << 15)
                    | (self.funct3 << 12)
                    | ((imm & 0x1F) << 7)
                    | self.opcode
            }
            OP_BRANCH => {
                ((imm >> 12 & 1) << 31)
                    | ((imm >> 5 & 0x3F) << 25)
                    | (self.rs2 << 20)
                    | (self.rs1 << 15)
                    | (self.funct3 << 12)
                    | ((imm >> 1 & 0xF) << 8)
                    | ((imm >> 11 & 1) << 7)
                    | self.opcode
            }
            OP_LUI | OP_AUIPC => ((imm & 0xF_FFFF) << 12) | base,
            OP_JAL => {
                ((imm >> 20 & 1) << 31)
                    | ((imm >> 1 & 0x3FF) << 21)
                    | ((imm >> 11 & 1) << 20)
                    | ((imm >> 12 & 0xFF) << 12)
                    | base
            }
            _ => ((imm & 0xFFF) << 20) | (self.rs1 << 15) | (self.funct3 << 12) | base,
        }
    }
}

/// Shorthand for `InstructionBuilder::new()`.
pub fn asm() -> InstructionBuilder {
    InstructionBuilder::new()
}

/// Loads a 32-bit constant into `rd` with `lui` + `addi`.
pub fn li(rd: u32, value: u32) -> [u32; 2] {
    let lo = ((value & 0xFFF) as i32) << 20 >> 20;
    let hi = value.wrapping_sub(lo as u32) >> 12;
    [asm().lui(rd, hi).build(), asm().addi(rd, rd, lo).build()]
}
