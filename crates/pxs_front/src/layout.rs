//! Which windows are open and how the GUI looks. Stored as a string inside the config file.

use pxs_core::Region;

use serde::{Deserialize, Serialize};

/// Main RAM editors.
pub const MAIN_MEM_EDITORS: usize = 8;

/// All editors, the main RAM ones followed by one for each of the other regions.
pub const MEM_EDITORS: usize = MAIN_MEM_EDITORS + 4;

/// Region shown by memory editor 'idx'.
pub fn mem_editor_region(idx: usize) -> Region {
    match idx {
        0..=7 => Region::Main,
        8 => Region::ParallelPort,
        9 => Region::ScratchPad,
        10 => Region::HwRegs,
        _ => Region::Bios,
    }
}

#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Windows {
    pub logs: bool,
    pub vram: bool,
    pub registers: bool,
    pub assembly: bool,
    pub spu_debug: bool,
    pub emulation_config: bool,
    pub gpu_config: bool,
    pub spu_config: bool,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub show_menu: bool,
    /// Draw the output over the whole window instead of in a window.
    pub fullscreen_render: bool,
    /// RGB clear color behind the windows.
    pub background: [u8; 3],
    pub windows: Windows,
    pub mem_editors: [bool; MEM_EDITORS],
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            show_menu: false,
            fullscreen_render: true,
            background: [0x47, 0x4e, 0x5c],
            windows: Windows::default(),
            mem_editors: [false; MEM_EDITORS],
        }
    }
}

impl Layout {
    pub fn parse(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b] = self.background.map(|c| c as f64 / 255.0);
        wgpu::Color { r, g, b, a: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let mut layout = Layout::default();
        layout.windows.spu_debug = true;
        layout.mem_editors[9] = true;
        layout.background = [1, 2, 3];
        assert_eq!(Layout::parse(&layout.to_json()).unwrap(), layout);
    }

    #[test]
    fn partial_layout_keeps_defaults() {
        let layout = Layout::parse(r#"{ "show_menu": true }"#).unwrap();
        assert!(layout.show_menu);
        assert!(layout.fullscreen_render);
        assert_eq!(layout.windows, Windows::default());
    }

    #[test]
    fn editor_regions() {
        assert_eq!(mem_editor_region(0), Region::Main);
        assert_eq!(mem_editor_region(7), Region::Main);
        assert_eq!(mem_editor_region(8), Region::ParallelPort);
        assert_eq!(mem_editor_region(MEM_EDITORS - 1), Region::Bios);
    }
}
