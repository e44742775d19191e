//! Loading of BIOS images.

use thiserror::Error;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Error, Debug)]
pub enum BiosError {
    #[error("failed to load BIOS: {0}")]
    IoError(#[from] io::Error),

    #[error("invalid BIOS file: must be 512 kb, is {0} bytes")]
    InvalidSize(usize),
}

/// A BIOS image read from disc.
pub struct Bios {
    data: Box<[u8]>,
    path: PathBuf,
}

impl Bios {
    pub const SIZE: usize = 1024 * 512;

    pub fn from_file(path: &Path) -> Result<Self, BiosError> {
        let data = fs::read(path)?;
        if data.len() != Self::SIZE {
            return Err(BiosError::InvalidSize(data.len()));
        }
        Ok(Self {
            data: data.into_boxed_slice(),
            path: path.to_path_buf(),
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
            .to_string()
    }
}
