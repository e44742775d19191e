//! Decoding of MIPS R3000 opcodes for display.
//!
//! All opcodes are encoded in 32 bits, using one of three layouts:
//! - Immediate: 6-bit op, 5-bit source, 5-bit target, 16-bit immediate.
//! - Jump: 6-bit op, 26-bit target.
//! - Register: 6-bit op, 5-bit source, 5-bit target, 5-bit destination, 5-bit shift, 6-bit
//!   function.

use super::REGISTER_NAMES;
use pxs_util::Bit;

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Opcode(pub u32);

/// Register index which displays as its ABI name.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Reg(pub u32);

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "${}", REGISTER_NAMES[self.0 as usize & 31])
    }
}

impl Opcode {
    pub fn new(opcode: u32) -> Self {
        Opcode(opcode)
    }

    pub fn op(self) -> u32 {
        self.0.bit_range(26, 31)
    }

    /// Sub operation / function.
    pub fn special(self) -> u32 {
        self.0.bit_range(0, 5)
    }

    pub fn imm(self) -> u32 {
        self.0.bit_range(0, 15)
    }

    pub fn signed_imm(self) -> i16 {
        self.0.bit_range(0, 15) as i16
    }

    /// Target of jump instructions.
    pub fn target(self) -> u32 {
        self.0.bit_range(0, 25)
    }

    pub fn shift(self) -> u32 {
        self.0.bit_range(6, 10)
    }

    pub fn rd(self) -> Reg {
        Reg(self.0.bit_range(11, 15))
    }

    pub fn rt(self) -> Reg {
        Reg(self.0.bit_range(16, 20))
    }

    pub fn rs(self) -> Reg {
        Reg(self.0.bit_range(21, 25))
    }

    /// Absolute target of a jump placed at 'addr'.
    pub fn jump_addr(self, addr: u32) -> u32 {
        (addr.wrapping_add(4) & 0xf000_0000) | (self.target() << 2)
    }

    /// Absolute target of a branch placed at 'addr'.
    pub fn branch_addr(self, addr: u32) -> u32 {
        let offset = (self.signed_imm() as i32) << 2;
        addr.wrapping_add(4).wrapping_add(offset as u32)
    }

    /// Disassemble as if the instruction is placed at 'addr', which resolves branch and jump
    /// targets to absolute addresses.
    pub fn at(self, addr: u32) -> Disassembly {
        Disassembly { op: self, addr }
    }
}

pub struct Disassembly {
    op: Opcode,
    addr: u32,
}

impl fmt::Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let op = self.op;
        match op.op() {
            0x1 => {
                let name = match (op.0.bit_range(17, 20) == 0x8, op.0.bit(16)) {
                    (true, true) => "bgezal",
                    (true, false) => "bltzal",
                    (false, true) => "bgez",
                    (false, false) => "bltz",
                };
                write!(f, "{name} {}, {:08x}", op.rs(), op.branch_addr(self.addr))
            }
            0x2 => write!(f, "j {:08x}", op.jump_addr(self.addr)),
            0x3 => write!(f, "jal {:08x}", op.jump_addr(self.addr)),
            0x4 => write!(f, "beq {}, {}, {:08x}", op.rs(), op.rt(), op.branch_addr(self.addr)),
            0x5 => write!(f, "bne {}, {}, {:08x}", op.rs(), op.rt(), op.branch_addr(self.addr)),
            0x6 => write!(f, "blez {}, {:08x}", op.rs(), op.branch_addr(self.addr)),
            0x7 => write!(f, "bgtz {}, {:08x}", op.rs(), op.branch_addr(self.addr)),
            _ => write!(f, "{op}"),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "nop");
        }
        match self.op() {
            0x0 => match self.special() {
                0x0 => write!(f, "sll {}, {}, {}", self.rd(), self.rt(), self.shift()),
                0x2 => write!(f, "srl {}, {}, {}", self.rd(), self.rt(), self.shift()),
                0x3 => write!(f, "sra {}, {}, {}", self.rd(), self.rt(), self.shift()),
                0x4 => write!(f, "sllv {}, {}, {}", self.rd(), self.rt(), self.rs()),
                0x6 => write!(f, "srlv {}, {}, {}", self.rd(), self.rt(), self.rs()),
                0x7 => write!(f, "srav {}, {}, {}", self.rd(), self.rt(), self.rs()),
                0x8 => write!(f, "jr {}", self.rs()),
                0x9 => write!(f, "jalr {}, {}", self.rd(), self.rs()),
                0xc => write!(f, "syscall"),
                0xd => write!(f, "break"),
                0x10 => write!(f, "mfhi {}", self.rd()),
                0x11 => write!(f, "mthi {}", self.rs()),
                0x12 => write!(f, "mflo {}", self.rd()),
                0x13 => write!(f, "mtlo {}", self.rs()),
                0x18 => write!(f, "mult {}, {}", self.rs(), self.rt()),
                0x19 => write!(f, "multu {}, {}", self.rs(), self.rt()),
                0x1a => write!(f, "div {}, {}", self.rs(), self.rt()),
                0x1b => write!(f, "divu {}, {}", self.rs(), self.rt()),
                0x20 => write!(f, "add {}, {}, {}", self.rd(), self.rs(), self.rt()),
                0x21 => write!(f, "addu {}, {}, {}", self.rd(), self.rs(), self.rt()),
                0x22 => write!(f, "sub {}, {}, {}", self.rd(), self.rs(), self.rt()),
                0x23 => write!(f, "subu {}, {}, {}", self.rd(), self.rs(), self.rt()),
                0x24 => write!(f, "and {}, {}, {}", self.rd(), self.rs(), self.rt()),
                0x25 => write!(f, "or {}, {}, {}", self.rd(), self.rs(), self.rt()),
                0x26 => write!(f, "xor {}, {}, {}", self.rd(), self.rs(), self.rt()),
                0x27 => write!(f, "nor {}, {}, {}", self.rd(), self.rs(), self.rt()),
                0x2a => write!(f, "slt {}, {}, {}", self.rd(), self.rs(), self.rt()),
                0x2b => write!(f, "sltu {}, {}, {}", self.rd(), self.rs(), self.rt()),
                _ => write!(f, "illegal"),
            },
            // Branch targets are relative, so without an address the offset is shown.
            0x1 | 0x4..=0x7 => {
                let name = match self.op() {
                    0x1 => "bcondz",
                    0x4 => "beq",
                    0x5 => "bne",
                    0x6 => "blez",
                    _ => "bgtz",
                };
                write!(f, "{name} {}, {}, {}", self.rs(), self.rt(), self.signed_imm())
            }
            0x2 => write!(f, "j {:07x}", self.target() << 2),
            0x3 => write!(f, "jal {:07x}", self.target() << 2),
            0x8 => write!(f, "addi {}, {}, {}", self.rt(), self.rs(), self.signed_imm()),
            0x9 => write!(f, "addiu {}, {}, {}", self.rt(), self.rs(), self.signed_imm()),
            0xa => write!(f, "slti {}, {}, {}", self.rt(), self.rs(), self.signed_imm()),
            0xb => write!(f, "sltiu {}, {}, {}", self.rt(), self.rs(), self.signed_imm()),
            0xc => write!(f, "andi {}, {}, {:#x}", self.rt(), self.rs(), self.imm()),
            0xd => write!(f, "ori {}, {}, {:#x}", self.rt(), self.rs(), self.imm()),
            0xe => write!(f, "xori {}, {}, {:#x}", self.rt(), self.rs(), self.imm()),
            0xf => write!(f, "lui {}, {:#x}", self.rt(), self.imm()),
            0x10 => match self.0.bit_range(21, 25) {
                0x0 => write!(f, "mfc0 {}, $cop0r{}", self.rt(), self.rd().0),
                0x4 => write!(f, "mtc0 {}, $cop0r{}", self.rt(), self.rd().0),
                0x10 if self.special() == 0x10 => write!(f, "rfe"),
                _ => write!(f, "cop0 {:07x}", self.target()),
            },
            0x11 => write!(f, "cop1"),
            0x12 => write!(f, "cop2 {:07x}", self.target()),
            0x13 => write!(f, "cop3"),
            0x20 => write!(f, "lb {}, {}({})", self.rt(), self.signed_imm(), self.rs()),
            0x21 => write!(f, "lh {}, {}({})", self.rt(), self.signed_imm(), self.rs()),
            0x22 => write!(f, "lwl {}, {}({})", self.rt(), self.signed_imm(), self.rs()),
            0x23 => write!(f, "lw {}, {}({})", self.rt(), self.signed_imm(), self.rs()),
            0x24 => write!(f, "lbu {}, {}({})", self.rt(), self.signed_imm(), self.rs()),
            0x25 => write!(f, "lhu {}, {}({})", self.rt(), self.signed_imm(), self.rs()),
            0x26 => write!(f, "lwr {}, {}({})", self.rt(), self.signed_imm(), self.rs()),
            0x28 => write!(f, "sb {}, {}({})", self.rt(), self.signed_imm(), self.rs()),
            0x29 => write!(f, "sh {}, {}({})", self.rt(), self.signed_imm(), self.rs()),
            0x2a => write!(f, "swl {}, {}({})", self.rt(), self.signed_imm(), self.rs()),
            0x2b => write!(f, "sw {}, {}({})", self.rt(), self.signed_imm(), self.rs()),
            0x2e => write!(f, "swr {}, {}({})", self.rt(), self.signed_imm(), self.rs()),
            0x30..=0x33 => write!(f, "lwc{} {}, {}({})", self.op() - 0x30, self.rt(), self.signed_imm(), self.rs()),
            0x38..=0x3b => write!(f, "swc{} {}, {}({})", self.op() - 0x38, self.rt(), self.signed_imm(), self.rs()),
            _ => write!(f, "illegal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_forms() {
        // addu $v0, $a0, $a1
        assert_eq!(Opcode::new(0x0085_1021).to_string(), "addu $v0, $a0, $a1");
        // jr $ra
        assert_eq!(Opcode::new(0x03e0_0008).to_string(), "jr $ra");
        assert_eq!(Opcode::new(0).to_string(), "nop");
    }

    #[test]
    fn immediate_forms() {
        // lui $t0, 0x1f80
        assert_eq!(Opcode::new(0x3c08_1f80).to_string(), "lui $t0, 0x1f80");
        // addiu $sp, $sp, -24
        assert_eq!(Opcode::new(0x27bd_ffe8).to_string(), "addiu $sp, $sp, -24");
        // sw $ra, 20($sp)
        assert_eq!(Opcode::new(0xafbf_0014).to_string(), "sw $ra, 20($sp)");
    }

    #[test]
    fn cop0_forms() {
        // mtc0 $t0, $12
        assert_eq!(Opcode::new(0x4088_6000).to_string(), "mtc0 $t0, $cop0r12");
        assert_eq!(Opcode::new(0x4200_0010).to_string(), "rfe");
    }

    #[test]
    fn resolved_targets() {
        // beq $zero, $zero, +4 instructions.
        let op = Opcode::new(0x1000_0004);
        assert_eq!(op.branch_addr(0xbfc0_0000), 0xbfc0_0014);
        assert_eq!(op.at(0xbfc0_0000).to_string(), "beq $zero, $zero, bfc00014");

        // jal 0x0bf00054 from KSEG1.
        let op = Opcode::new(0x0ff0_0015);
        assert_eq!(op.at(0xbfc0_0000).to_string(), "jal bfc00054");

        // Backwards branch.
        let op = Opcode::new(0x1420_fffe);
        assert_eq!(op.branch_addr(0x8000_0010), 0x8000_000c);
    }
}
