//! The disc tray. Only what the front end controls is kept here, reading sectors is the job of
//! the core.

use thiserror::Error;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Error, Debug)]
pub enum IsoError {
    #[error("failed to open disc image: {0}")]
    IoError(#[from] io::Error),

    #[error("invalid disc image: {0} bytes is not a whole number of sectors")]
    InvalidSize(u64),
}

/// Size of a raw sector including headers and error correction.
pub const RAW_SECTOR_SIZE: u64 = 2352;

/// Size of the user data in a mode 1 sector.
pub const DATA_SECTOR_SIZE: u64 = 2048;

pub struct IsoImage {
    path: PathBuf,
    size: u64,
    sector_size: u64,
}

impl IsoImage {
    pub fn open(path: &Path) -> Result<Self, IsoError> {
        let size = fs::metadata(path)?.len();
        let sector_size = if size != 0 && size % RAW_SECTOR_SIZE == 0 {
            RAW_SECTOR_SIZE
        } else if size != 0 && size % DATA_SECTOR_SIZE == 0 {
            DATA_SECTOR_SIZE
        } else {
            return Err(IsoError::InvalidSize(size));
        };
        Ok(Self {
            path: path.to_path_buf(),
            size,
            sector_size,
        })
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
            .to_string()
    }

    pub fn sector_size(&self) -> u64 {
        self.sector_size
    }

    pub fn sector_count(&self) -> u64 {
        self.size / self.sector_size
    }
}

/// Lid position encoded the same way as the "open case time" of the drive: a negative time
/// keeps it open, zero keeps it closed and a positive value is the UNIX time at which it closes
/// again.
#[derive(Default)]
pub struct Cdrom {
    iso: Option<IsoImage>,
    open_case_time: i64,
    lid_interrupts: u64,
}

impl Cdrom {
    pub fn iso(&self) -> Option<&IsoImage> {
        self.iso.as_ref()
    }

    /// Replace the current disc image.
    pub fn open(&mut self, path: &Path) -> Result<(), IsoError> {
        self.close();
        let iso = IsoImage::open(path)?;
        info!(
            "opened disc image '{}' with {} sectors of {} bytes",
            iso.name(),
            iso.sector_count(),
            iso.sector_size(),
        );
        self.iso = Some(iso);
        Ok(())
    }

    pub fn close(&mut self) {
        if let Some(iso) = self.iso.take() {
            info!("closed disc image '{}'", iso.name());
        }
    }

    pub fn open_case_time(&self) -> i64 {
        self.open_case_time
    }

    pub fn set_open_case_time(&mut self, time: i64) {
        self.open_case_time = time;
    }

    /// Signal that the lid has changed position.
    pub fn lid_interrupt(&mut self) {
        self.lid_interrupts += 1;
    }

    /// Number of lid interrupts since startup.
    pub fn lid_interrupts(&self) -> u64 {
        self.lid_interrupts
    }

    /// If the lid is open at UNIX time 'now'.
    pub fn lid_open(&self, now: i64) -> bool {
        match self.open_case_time {
            t if t < 0 => true,
            0 => false,
            t => now < t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn image_file(size: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&vec![0x0; size]).unwrap();
        file
    }

    #[test]
    fn detects_sector_size() {
        let raw = image_file(2352 * 3);
        let iso = IsoImage::open(raw.path()).unwrap();
        assert_eq!(iso.sector_size(), RAW_SECTOR_SIZE);
        assert_eq!(iso.sector_count(), 3);

        let data = image_file(2048 * 5);
        let iso = IsoImage::open(data.path()).unwrap();
        assert_eq!(iso.sector_size(), DATA_SECTOR_SIZE);
        assert_eq!(iso.sector_count(), 5);
    }

    #[test]
    fn rejects_bad_images() {
        assert!(matches!(
            IsoImage::open(image_file(1000).path()),
            Err(IsoError::InvalidSize(1000))
        ));
        assert!(matches!(
            IsoImage::open(image_file(0).path()),
            Err(IsoError::InvalidSize(0))
        ));
        assert!(matches!(
            IsoImage::open(Path::new("/nonexistent/disc.bin")),
            Err(IsoError::IoError(_))
        ));
    }

    #[test]
    fn failed_open_closes_previous() {
        let mut cdrom = Cdrom::default();
        let good = image_file(2048);
        cdrom.open(good.path()).unwrap();
        assert!(cdrom.iso().is_some());
        assert!(cdrom.open(Path::new("/nonexistent/disc.bin")).is_err());
        assert!(cdrom.iso().is_none());
    }

    #[test]
    fn lid_timing() {
        let mut cdrom = Cdrom::default();
        assert!(!cdrom.lid_open(100));

        cdrom.set_open_case_time(-1);
        assert!(cdrom.lid_open(i64::MAX));

        cdrom.set_open_case_time(102);
        assert!(cdrom.lid_open(100));
        assert!(!cdrom.lid_open(102));

        cdrom.lid_interrupt();
        cdrom.lid_interrupt();
        assert_eq!(cdrom.lid_interrupts(), 2);
    }
}
