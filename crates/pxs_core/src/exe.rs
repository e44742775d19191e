//! Loading of PS-X EXE files.

use thiserror::Error;

use std::fs;
use std::io;
use std::path::Path;

#[derive(Error, Debug)]
pub enum ExeError {
    #[error("failed to load exe: {0}")]
    IoError(#[from] io::Error),

    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

/// Size of the header, the text segment starts right after it.
const HEADER_SIZE: usize = 0x800;

/// Size of main RAM, which both segments must fit in.
const RAM_SIZE: u32 = 2 * 1024 * 1024;

/// The part of the 2 kilobyte header which is used.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
struct Header {
    /// Must be "PS-X EXE".
    magic: [u8; 8],
    _pad0: [u8; 8],
    pc: u32,
    gp: u32,
    text_base: u32,
    text_size: u32,
    _pad1: [u8; 8],
    bss_base: u32,
    bss_size: u32,
    sp_base: u32,
    sp_offset: u32,
}

pub struct Exe {
    pub text: Box<[u8]>,
    pub pc: u32,
    pub gp: u32,
    /// Virtual base address of the text segment.
    pub text_base: u32,
    pub bss_base: u32,
    pub bss_size: u32,
    /// `None` if the stack pointer shouldn't change.
    pub sp: Option<u32>,
}

impl Exe {
    pub fn load(path: &Path) -> Result<Self, ExeError> {
        Self::parse(&fs::read(path)?)
    }

    pub fn parse(data: &[u8]) -> Result<Self, ExeError> {
        if data.len() < HEADER_SIZE {
            return Err(ExeError::InvalidHeader(format!(
                "must be at least 2 kilobytes, is {} bytes",
                data.len()
            )));
        }

        let header: Header = bytemuck::pod_read_unaligned(&data[..std::mem::size_of::<Header>()]);

        if &header.magic != b"PS-X EXE" {
            return Err(ExeError::InvalidHeader(String::from(
                "invalid magic value, must be 'PS-X EXE'",
            )));
        }

        let text_size = header.text_size.min((data.len() - HEADER_SIZE) as u32);

        if ram_offset(header.text_base).saturating_add(text_size) > RAM_SIZE {
            return Err(ExeError::InvalidHeader(String::from(
                "text segment not contained in RAM",
            )));
        }

        if ram_offset(header.bss_base).saturating_add(header.bss_size) > RAM_SIZE {
            return Err(ExeError::InvalidHeader(String::from(
                "bss segment not contained in RAM",
            )));
        }

        let sp = (header.sp_base != 0).then(|| header.sp_base.wrapping_add(header.sp_offset));

        Ok(Self {
            sp,
            pc: header.pc,
            gp: header.gp,
            text_base: header.text_base,
            bss_base: header.bss_base,
            bss_size: header.bss_size,
            text: Box::from(&data[HEADER_SIZE..HEADER_SIZE + text_size as usize]),
        })
    }

    /// Offset of the text segment into main RAM.
    pub fn text_offset(&self) -> usize {
        ram_offset(self.text_base) as usize
    }

    pub fn bss_offset(&self) -> usize {
        ram_offset(self.bss_base) as usize
    }
}

/// Strip the segment bits of a virtual address, leaving the physical address.
fn ram_offset(addr: u32) -> u32 {
    addr & 0x1fff_ffff
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn build(pc: u32, text_base: u32, text: &[u8], sp: u32) -> Vec<u8> {
        let mut data = vec![0x0; HEADER_SIZE];
        data[..8].copy_from_slice(b"PS-X EXE");
        data[0x10..0x14].copy_from_slice(&pc.to_le_bytes());
        data[0x14..0x18].copy_from_slice(&0x8001_8000_u32.to_le_bytes());
        data[0x18..0x1c].copy_from_slice(&text_base.to_le_bytes());
        data[0x1c..0x20].copy_from_slice(&(text.len() as u32).to_le_bytes());
        data[0x30..0x34].copy_from_slice(&sp.to_le_bytes());
        data[0x34..0x38].copy_from_slice(&0x10_u32.to_le_bytes());
        data.extend_from_slice(text);
        data
    }

    #[test]
    fn parse_header() {
        let data = build(0x8001_0000, 0x8001_0000, &[1, 2, 3, 4], 0x801f_ff00);
        let exe = Exe::parse(&data).unwrap();
        assert_eq!(exe.pc, 0x8001_0000);
        assert_eq!(exe.gp, 0x8001_8000);
        assert_eq!(exe.text_offset(), 0x1_0000);
        assert_eq!(&*exe.text, &[1, 2, 3, 4]);
        assert_eq!(exe.sp, Some(0x801f_ff10));
    }

    #[test]
    fn no_stack_pointer() {
        let exe = Exe::parse(&build(0x8001_0000, 0x8001_0000, &[], 0)).unwrap();
        assert_eq!(exe.sp, None);
    }

    #[test]
    fn invalid_headers() {
        assert!(matches!(Exe::parse(&[0x0; 16]), Err(ExeError::InvalidHeader(_))));

        let mut data = build(0x8001_0000, 0x8001_0000, &[0x0; 4], 0);
        data[0] = b'X';
        assert!(matches!(Exe::parse(&data), Err(ExeError::InvalidHeader(_))));

        let data = build(0x8001_0000, 0x801f_fffe, &[0x0; 4], 0);
        assert!(matches!(Exe::parse(&data), Err(ExeError::InvalidHeader(_))));
    }
}
