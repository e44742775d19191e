//! Emulator settings registry.
//!
//! Every setting has a fixed JSON key. Deserialization is done one key at a time, so a missing
//! or broken key only resets that single setting to whatever it was before.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use std::path::PathBuf;

/// Video standard of the emulated console.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VideoType {
    Ntsc,
    Pal,
}

impl From<VideoType> for u8 {
    fn from(ty: VideoType) -> u8 {
        match ty {
            VideoType::Ntsc => 0,
            VideoType::Pal => 1,
        }
    }
}

impl TryFrom<u8> for VideoType {
    type Error = String;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        match val {
            0 => Ok(VideoType::Ntsc),
            1 => Ok(VideoType::Pal),
            _ => Err(format!("invalid video type {val}")),
        }
    }
}

/// How CD audio is played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CddaType {
    Disabled,
    LittleEndian,
    BigEndian,
}

impl CddaType {
    pub const ALL: [CddaType; 3] = [
        CddaType::Disabled,
        CddaType::LittleEndian,
        CddaType::BigEndian,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CddaType::Disabled => "Disabled",
            CddaType::LittleEndian => "Little Endian",
            CddaType::BigEndian => "Big Endian",
        }
    }
}

impl From<CddaType> for u8 {
    fn from(ty: CddaType) -> u8 {
        match ty {
            CddaType::Disabled => 0,
            CddaType::LittleEndian => 1,
            CddaType::BigEndian => 2,
        }
    }
}

impl TryFrom<u8> for CddaType {
    type Error = String;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        match val {
            0 => Ok(CddaType::Disabled),
            1 => Ok(CddaType::LittleEndian),
            2 => Ok(CddaType::BigEndian),
            _ => Err(format!("invalid CDDA type {val}")),
        }
    }
}

macro_rules! settings {
    ($($(#[$doc:meta])* $field:ident: $ty:ty = $key:literal => $default:expr,)*) => {
        #[derive(Clone, Debug, PartialEq)]
        pub struct Settings {
            $($(#[$doc])* pub $field: $ty,)*
        }

        impl Default for Settings {
            fn default() -> Self {
                Self {
                    $($field: $default,)*
                }
            }
        }

        impl Settings {
            /// All the JSON keys, in declaration order.
            pub const KEYS: &'static [&'static str] = &[$($key,)*];

            /// Serialize into a JSON object with one entry per setting.
            pub fn serialize(&self) -> Value {
                let mut map = Map::new();
                $(
                    match serde_json::to_value(&self.$field) {
                        Ok(val) => {
                            map.insert($key.to_string(), val);
                        }
                        Err(err) => warn!("failed to serialize setting '{}': {err}", $key),
                    }
                )*
                Value::Object(map)
            }

            /// Load settings from a JSON object. Keys which are missing or have the wrong type
            /// are left untouched.
            pub fn deserialize(&mut self, json: &Value) {
                $(
                    if let Some(val) = json.get($key) {
                        match <$ty>::deserialize(val) {
                            Ok(val) => self.$field = val,
                            Err(err) => warn!("ignoring setting '{}': {err}", $key),
                        }
                    }
                )*
                if let Some(obj) = json.as_object() {
                    for key in obj.keys().filter(|key| !Self::KEYS.contains(&key.as_str())) {
                        debug!("unknown setting '{key}'");
                    }
                }
            }
        }
    }
}

settings! {
    /// Memory card in slot 1.
    mcd1: PathBuf = "Mcd1" => PathBuf::new(),
    /// Memory card in slot 2.
    mcd2: PathBuf = "Mcd2" => PathBuf::new(),
    /// BIOS image.
    bios: PathBuf = "Bios" => PathBuf::new(),
    /// Directory of PPF patches.
    ppf_dir: PathBuf = "PpfDir" => PathBuf::new(),
    /// PS-X EXE loaded after boot.
    psx_exe: PathBuf = "PsxExe" => PathBuf::new(),
    /// Enable the XA decoder.
    xa: bool = "Xa" => true,
    sio_irq: bool = "SioIrq" => false,
    spu_irq: bool = "SpuIrq" => false,
    /// Decode MDEC videos in black and white.
    bnw_mdec: bool = "BnWMdec" => false,
    /// Detect the video standard from the disc.
    auto_video: bool = "AutoVideo" => true,
    video: VideoType = "Video" => VideoType::Ntsc,
    cdda: CddaType = "CDDA" => CddaType::LittleEndian,
    /// High level emulation of the BIOS.
    hle: bool = "HLE" => true,
    slow_boot: bool = "SlowBoot" => false,
    debug: bool = "Debug" => false,
    verbose: bool = "Verbose" => false,
    rcnt_fix: bool = "RCntFix" => false,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_has_every_key() {
        let json = Settings::default().serialize();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), Settings::KEYS.len());
        for key in Settings::KEYS {
            assert!(obj.contains_key(*key), "missing {key}");
        }
        assert_eq!(json["Video"], json!(0));
        assert_eq!(json["CDDA"], json!(1));
        assert_eq!(json["Xa"], json!(true));
    }

    #[test]
    fn round_trip() {
        let mut settings = Settings::default();
        settings.xa = false;
        settings.video = VideoType::Pal;
        settings.auto_video = false;
        settings.cdda = CddaType::BigEndian;
        settings.bios = PathBuf::from("bios/scph1001.bin");

        let mut loaded = Settings::default();
        loaded.deserialize(&settings.serialize());
        assert_eq!(loaded, settings);
    }

    #[test]
    fn broken_keys_are_ignored() {
        let mut settings = Settings::default();
        settings.deserialize(&json!({
            "Xa": "yes",
            "Video": 7,
            "SlowBoot": true,
            "Unknown": 1,
        }));
        assert!(settings.xa);
        assert_eq!(settings.video, VideoType::Ntsc);
        assert!(settings.slow_boot);
    }

    #[test]
    fn non_object_is_ignored() {
        let mut settings = Settings::default();
        settings.deserialize(&json!([1, 2, 3]));
        assert_eq!(settings, Settings::default());
    }
}
