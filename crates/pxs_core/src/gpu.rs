//! VRAM and display state of the GPU, plus the software renderer settings.

use pxs_util::Bit;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// VRAM consists of 512 lines of 1024 16-bit pixels, which equals 1 megabyte.
pub struct Vram {
    data: Box<[u16]>,
    /// Bumped on every store, so consumers know when to copy it again.
    generation: u64,
}

impl Default for Vram {
    fn default() -> Self {
        Self {
            data: vec![0x0; Vram::SIZE].into_boxed_slice(),
            generation: 0,
        }
    }
}

impl Vram {
    pub const WIDTH: u32 = 1024;
    pub const HEIGHT: u32 = 512;
    pub const SIZE: usize = (Self::WIDTH * Self::HEIGHT) as usize;

    pub fn load_16(&self, x: i32, y: i32) -> u16 {
        self.data[offset_16(x, y)]
    }

    pub fn store_16(&mut self, x: i32, y: i32, val: u16) {
        self.data[offset_16(x, y)] = val;
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clear(&mut self) {
        self.data.fill(0x0);
        self.generation += 1;
    }

    /// Convert the whole VRAM to 8-bit RGBA, line by line.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut img = Vec::with_capacity(Self::SIZE * 4);
        for val in self.data.iter() {
            img.extend_from_slice(&rgb555_to_rgba(*val));
        }
        img
    }
}

/// 15-bit color with red in the low bits. The top bit is the mask bit and isn't shown.
pub fn rgb555_to_rgba(val: u16) -> [u8; 4] {
    let expand = |c: u16| ((c << 3) | (c >> 2)) as u8;
    [
        expand(val.bit_range(0, 4)),
        expand(val.bit_range(5, 9)),
        expand(val.bit_range(10, 14)),
        255,
    ]
}

/// Both coordinates wrap around the edges of VRAM.
fn offset_16(x: i32, y: i32) -> usize {
    let x = x as u32 & (Vram::WIDTH - 1);
    let y = y as u32 & (Vram::HEIGHT - 1);
    (x + y * Vram::WIDTH) as usize
}

/// The part of VRAM that is sent to the TV.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for DisplayArea {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 320,
            height: 240,
        }
    }
}

impl DisplayArea {
    /// Make sure the area is inside VRAM and is at least a single pixel.
    pub fn clamped(self) -> Self {
        let x = self.x.min(Vram::WIDTH - 1);
        let y = self.y.min(Vram::HEIGHT - 1);
        Self {
            x,
            y,
            width: self.width.clamp(1, Vram::WIDTH - x),
            height: self.height.clamp(1, Vram::HEIGHT - y),
        }
    }
}

/// Settings of the software renderer, stored under the "GPU" key of the config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuConfig {
    pub dithering: bool,
    pub frame_limit: bool,
    /// Used when 'frame_limit' is set.
    pub fps_limit: f32,
    pub show_fps: bool,
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            dithering: true,
            frame_limit: true,
            fps_limit: 60.0,
            show_fps: false,
        }
    }
}

#[derive(Default)]
pub struct Gpu {
    pub vram: Vram,
    pub display: DisplayArea,
    pub config: GpuConfig,
}

impl Gpu {
    pub fn reset(&mut self) {
        self.vram.clear();
        self.display = DisplayArea::default();
    }

    pub fn config(&self) -> Value {
        serde_json::to_value(&self.config).unwrap_or(Value::Null)
    }

    /// Load the configuration from the "GPU" entry of a config document.
    pub fn set_config(&mut self, doc: &Value) {
        let Some(cfg) = doc.get("GPU").filter(|cfg| cfg.is_object()) else {
            return;
        };
        match GpuConfig::deserialize(cfg) {
            Ok(mut config) => {
                config.fps_limit = config.fps_limit.clamp(1.0, 240.0);
                self.config = config;
            }
            Err(err) => warn!("ignoring GPU config: {err}"),
        }
    }
}
