//! Memory pages visible to the debugger.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Region {
    /// Main RAM.
    Main,
    /// Expansion region 1, where the parallel port lives.
    ParallelPort,
    ScratchPad,
    /// Memory mapped hardware registers.
    HwRegs,
    Bios,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Main,
        Region::ParallelPort,
        Region::ScratchPad,
        Region::HwRegs,
        Region::Bios,
    ];

    pub fn size(self) -> usize {
        match self {
            Region::Main => 2 * 1024 * 1024,
            Region::ParallelPort => 64 * 1024,
            Region::ScratchPad => 1024,
            Region::HwRegs => 8 * 1024,
            Region::Bios => 512 * 1024,
        }
    }

    /// Physical base address.
    pub fn base(self) -> u32 {
        match self {
            Region::Main => 0x0000_0000,
            Region::ParallelPort => 0x1f00_0000,
            Region::ScratchPad => 0x1f80_0000,
            Region::HwRegs => 0x1f80_1000,
            Region::Bios => 0x1fc0_0000,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Region::Main => "Main Memory",
            Region::ParallelPort => "Parallel Port",
            Region::ScratchPad => "Scratch Pad",
            Region::HwRegs => "Hardware Registers",
            Region::Bios => "BIOS",
        };
        f.write_str(name)
    }
}

pub struct Memory {
    main: Box<[u8]>,
    parallel_port: Box<[u8]>,
    scratch_pad: Box<[u8]>,
    hw_regs: Box<[u8]>,
    bios: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        let alloc = |region: Region| vec![0x0; region.size()].into_boxed_slice();
        Self {
            main: alloc(Region::Main),
            // Nothing is connected to the parallel port, which reads as all ones.
            parallel_port: vec![0xff; Region::ParallelPort.size()].into_boxed_slice(),
            scratch_pad: alloc(Region::ScratchPad),
            hw_regs: alloc(Region::HwRegs),
            bios: alloc(Region::Bios),
        }
    }
}

impl Memory {
    pub fn region(&self, region: Region) -> &[u8] {
        match region {
            Region::Main => &self.main,
            Region::ParallelPort => &self.parallel_port,
            Region::ScratchPad => &self.scratch_pad,
            Region::HwRegs => &self.hw_regs,
            Region::Bios => &self.bios,
        }
    }

    pub fn region_mut(&mut self, region: Region) -> &mut [u8] {
        match region {
            Region::Main => &mut self.main,
            Region::ParallelPort => &mut self.parallel_port,
            Region::ScratchPad => &mut self.scratch_pad,
            Region::HwRegs => &mut self.hw_regs,
            Region::Bios => &mut self.bios,
        }
    }

    /// Find the region and offset of a virtual address. The cache control register region
    /// (KSEG2) and unmapped addresses return `None`.
    pub fn resolve(addr: u32) -> Option<(Region, usize)> {
        let phys = match addr >> 29 {
            // KUSEG.
            0..=3 => addr,
            // KSEG0.
            4 => addr & 0x7fff_ffff,
            // KSEG1.
            5 => addr & 0x1fff_ffff,
            _ => return None,
        };
        Region::ALL.iter().find_map(|region| {
            // Main RAM is mirrored four times in the first 8 megabytes.
            let span = match region {
                Region::Main => region.size() as u32 * 4,
                _ => region.size() as u32,
            };
            let offset = phys.checked_sub(region.base())?;
            (offset < span).then(|| (*region, offset as usize % region.size()))
        })
    }

    /// Load a little endian word. Returns `None` for unmapped or unaligned addresses.
    pub fn read_u32(&self, addr: u32) -> Option<u32> {
        if addr & 3 != 0 {
            return None;
        }
        let (region, offset) = Self::resolve(addr)?;
        let bytes = self.region(region).get(offset..offset + 4)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Clear everything but the BIOS.
    pub fn reset(&mut self) {
        self.main.fill(0x0);
        self.scratch_pad.fill(0x0);
        self.hw_regs.fill(0x0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_segments() {
        assert_eq!(Memory::resolve(0x8001_0000), Some((Region::Main, 0x1_0000)));
        assert_eq!(Memory::resolve(0xa001_0000), Some((Region::Main, 0x1_0000)));
        assert_eq!(Memory::resolve(0x0060_0004), Some((Region::Main, 0x4)));
        assert_eq!(Memory::resolve(0xbfc0_0100), Some((Region::Bios, 0x100)));
        assert_eq!(Memory::resolve(0x1f80_0010), Some((Region::ScratchPad, 0x10)));
        assert_eq!(Memory::resolve(0x1f80_1810), Some((Region::HwRegs, 0x810)));
        assert_eq!(Memory::resolve(0xfffe_0130), None);
        assert_eq!(Memory::resolve(0x1000_0000), None);
    }

    #[test]
    fn read_words() {
        let mut mem = Memory::default();
        mem.region_mut(Region::Bios)[..4].copy_from_slice(&[0x78, 0x56, 0x34, 0x12]);
        assert_eq!(mem.read_u32(0xbfc0_0000), Some(0x1234_5678));
        assert_eq!(mem.read_u32(0xbfc0_0002), None);
        assert_eq!(mem.read_u32(0x1f00_0000), Some(0xffff_ffff));
    }

    #[test]
    fn reset_keeps_bios() {
        let mut mem = Memory::default();
        mem.region_mut(Region::Main)[0] = 1;
        mem.region_mut(Region::Bios)[0] = 2;
        mem.reset();
        assert_eq!(mem.region(Region::Main)[0], 0);
        assert_eq!(mem.region(Region::Bios)[0], 2);
    }
}
