//! Register file of the MIPS R3000.

pub mod opcode;

pub use opcode::Opcode;

/// Where the CPU starts executing after reset. This is the start of the BIOS in KSEG1.
pub const RESET_VECTOR: u32 = 0xbfc0_0000;

pub const REGISTER_NAMES: [&str; 32] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", "t0", "t1", "t2", "t3", "t4", "t5", "t6",
    "t7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "t8", "t9", "k0", "k1", "gp", "sp", "fp",
    "ra",
];

/// Index of the global pointer register.
pub const GP: usize = 28;
/// Index of the stack pointer register.
pub const SP: usize = 29;
/// Index of the frame pointer register.
pub const FP: usize = 30;

/// The subset of COP0 the debugger shows.
#[derive(Clone, Copy, Default, Debug)]
pub struct Cop0 {
    pub status: u32,
    pub cause: u32,
    pub epc: u32,
    pub badvaddr: u32,
}

pub struct Cpu {
    pub registers: [u32; 32],
    pub pc: u32,
    /// Results of multiply and divide instructions.
    pub hi: u32,
    pub lo: u32,
    pub cop0: Cop0,
}

impl Default for Cpu {
    fn default() -> Self {
        Self {
            registers: [0x0; 32],
            pc: RESET_VECTOR,
            hi: 0,
            lo: 0,
            cop0: Cop0::default(),
        }
    }
}

impl Cpu {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Write to a general purpose register. Writes to 'zero' are dropped.
    pub fn set_reg(&mut self, idx: usize, val: u32) {
        if idx != 0 {
            self.registers[idx] = val;
        }
    }
}

#[test]
fn reset_puts_pc_at_bios() {
    let mut cpu = Cpu::default();
    cpu.pc = 0x8001_0000;
    cpu.set_reg(SP, 0x801f_fff0);
    cpu.set_reg(0, 10);
    assert_eq!(cpu.registers[0], 0);
    assert_eq!(cpu.registers[SP], 0x801f_fff0);

    cpu.reset();
    assert_eq!(cpu.pc, RESET_VECTOR);
    assert!(cpu.registers.iter().all(|r| *r == 0));
}
