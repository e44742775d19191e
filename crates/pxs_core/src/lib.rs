//! The state of the emulated Playstation, as seen by the front end.
//!
//! The core running the actual emulation writes into this, while the front end reads it for
//! debug views and writes user requests such as settings, mutes and resets.

#[macro_use]
extern crate log;

pub mod bios;
pub mod cdrom;
pub mod cpu;
pub mod exe;
pub mod gpu;
pub mod mem;
pub mod settings;
pub mod spu;

pub use bios::{Bios, BiosError};
pub use cdrom::{Cdrom, IsoError};
pub use cpu::Cpu;
pub use exe::{Exe, ExeError};
pub use gpu::{DisplayArea, Gpu, Vram};
pub use mem::{Memory, Region};
pub use settings::Settings;
pub use spu::Spu;

use std::path::Path;

#[derive(Default)]
pub struct System {
    pub cpu: Cpu,
    pub mem: Memory,
    pub spu: Spu,
    pub gpu: Gpu,
    pub cdrom: Cdrom,
    pub settings: Settings,
    bios: Option<Bios>,
    running: bool,
    quit: bool,
}

impl System {
    pub fn running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            info!("emulation started");
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            info!("emulation paused");
            self.running = false;
        }
    }

    /// Ask the front end to shut down.
    pub fn quit(&mut self) {
        self.running = false;
        self.quit = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn bios(&self) -> Option<&Bios> {
        self.bios.as_ref()
    }

    /// Reset only the CPU, which makes it start over from the BIOS.
    pub fn soft_reset(&mut self) {
        info!("soft reset");
        self.cpu.reset();
    }

    /// Reset everything to the power-on state. The BIOS and disc stays.
    pub fn hard_reset(&mut self) {
        info!("hard reset");
        self.cpu.reset();
        self.mem.reset();
        self.spu.reset();
        self.gpu.reset();
    }

    /// Load a BIOS image and map it.
    pub fn load_bios(&mut self, path: &Path) -> Result<(), BiosError> {
        let bios = Bios::from_file(path)?;
        self.mem.region_mut(Region::Bios).copy_from_slice(bios.data());
        info!("loaded BIOS '{}'", bios.name());
        self.bios = Some(bios);
        Ok(())
    }

    /// Load a PS-X EXE into main RAM and point the CPU at its entry.
    pub fn load_exe(&mut self, path: &Path) -> Result<(), ExeError> {
        let exe = Exe::load(path)?;
        self.install_exe(&exe);
        info!("loaded exe '{}' with entry {:08x}", path.display(), exe.pc);
        Ok(())
    }

    fn install_exe(&mut self, exe: &Exe) {
        let ram = self.mem.region_mut(Region::Main);

        let text = exe.text_offset();
        ram[text..text + exe.text.len()].copy_from_slice(&exe.text);

        let bss = exe.bss_offset();
        ram[bss..bss + exe.bss_size as usize].fill(0x0);

        self.cpu.pc = exe.pc;
        self.cpu.set_reg(cpu::GP, exe.gp);
        if let Some(sp) = exe.sp {
            self.cpu.set_reg(cpu::SP, sp);
            self.cpu.set_reg(cpu::FP, sp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn run_state() {
        let mut system = System::default();
        assert!(!system.running());
        system.start();
        assert!(system.running());
        system.stop();
        assert!(!system.running());
        system.start();
        system.quit();
        assert!(!system.running());
        assert!(system.quit_requested());
    }

    #[test]
    fn hard_reset_keeps_bios() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bios.bin");
        fs::write(&path, vec![0x42; Bios::SIZE]).unwrap();

        let mut system = System::default();
        system.load_bios(&path).unwrap();
        system.mem.region_mut(Region::Main)[8] = 1;
        system.gpu.vram.store_16(0, 0, 0x7fff);
        system.cpu.pc = 0x8000_0000;

        system.hard_reset();
        assert_eq!(system.mem.region(Region::Main)[8], 0);
        assert_eq!(system.mem.region(Region::Bios)[0], 0x42);
        assert_eq!(system.gpu.vram.load_16(0, 0), 0);
        assert_eq!(system.cpu.pc, cpu::RESET_VECTOR);
        assert!(system.bios().is_some());
    }

    #[test]
    fn soft_reset_keeps_memory() {
        let mut system = System::default();
        system.mem.region_mut(Region::Main)[8] = 1;
        system.cpu.pc = 0x8000_0000;
        system.soft_reset();
        assert_eq!(system.mem.region(Region::Main)[8], 1);
        assert_eq!(system.cpu.pc, cpu::RESET_VECTOR);
    }

    #[test]
    fn load_exe_sets_registers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.exe");
        fs::write(&path, exe::tests::build(0x8001_0000, 0x8001_0000, &[9, 8, 7, 6], 0x801f_ff00))
            .unwrap();

        let mut system = System::default();
        system.load_exe(&path).unwrap();
        assert_eq!(system.cpu.pc, 0x8001_0000);
        assert_eq!(system.cpu.registers[cpu::SP], 0x801f_ff10);
        assert_eq!(system.cpu.registers[cpu::GP], 0x8001_8000);
        assert_eq!(&system.mem.region(Region::Main)[0x1_0000..0x1_0004], &[9, 8, 7, 6]);
        assert_eq!(system.mem.read_u32(0x8001_0000), Some(0x0607_0809));
    }
}
