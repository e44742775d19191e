//! State of the sound processing unit as seen from the outside.
//!
//! The synthesis itself happens in the core. This holds the per-voice state it leaves behind,
//! which the front end shows and in the case of 'mute' also writes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of voices.
pub const CHANNEL_COUNT: usize = 24;

/// Size of SPU RAM in bytes.
pub const RAM_SIZE: usize = 512 * 1024;

/// Frequency modulation role of a voice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FMod {
    #[default]
    Off,
    /// The voice modulates the next voice.
    Modulator,
    /// The voice is modulated by the previous voice.
    Modulated,
}

impl FMod {
    pub fn raw(self) -> u8 {
        match self {
            FMod::Off => 0,
            FMod::Modulator => 1,
            FMod::Modulated => 2,
        }
    }
}

/// ADSR envelope state of a voice.
#[derive(Clone, Copy, Debug, Default)]
pub struct Adsr {
    pub attack_rate: i32,
    pub decay_rate: i32,
    pub sustain_rate: i32,
    pub release_rate: i32,
    pub sustain_level: i32,
    pub sustain_increase: i32,
    /// Current envelope volume.
    pub volume: i32,
    /// Raw envelope value.
    pub envelope_vol: u32,
}

impl Adsr {
    /// Attack rate as shown to the user.
    pub fn display_attack(&self) -> i32 {
        self.attack_rate ^ 0x7f
    }

    pub fn display_decay(&self) -> i32 {
        (self.decay_rate ^ 0x1f) / 4
    }

    pub fn display_sustain(&self) -> i32 {
        self.sustain_rate ^ 0x7f
    }

    pub fn display_release(&self) -> i32 {
        (self.release_rate ^ 0x1f) / 4
    }

    pub fn display_sustain_level(&self) -> i32 {
        self.sustain_level >> 27
    }
}

#[derive(Clone, Debug, Default)]
pub struct Channel {
    pub on: bool,
    pub stop: bool,
    pub noise: bool,
    pub fmod: FMod,
    pub reverb: bool,
    pub rvb_active: bool,
    pub rvb_num: i32,
    pub rvb_offset: i32,
    pub rvb_repeat: i32,
    /// Set by the user to silence the voice.
    pub mute: bool,
    /// Set when the voice has triggered an interrupt. Cleared by whoever observes it.
    pub irq_done: bool,
    /// Last raw sample.
    pub sval: i32,
    pub adsr: Adsr,
    /// Start position as an offset into SPU RAM.
    pub start: u32,
    /// Current position as an offset into SPU RAM.
    pub curr: u32,
    /// Loop position as an offset into SPU RAM.
    pub repeat: u32,
    pub left_vol: i32,
    pub left_vol_raw: u16,
    pub right_vol: i32,
    pub right_vol_raw: u16,
    pub act_freq: i32,
    pub used_freq: i32,
}

/// CD-XA stream feeding the SPU. The samples live in a ring buffer, 'play' is where the mixer
/// reads and 'feed' is where the CD-ROM writes.
#[derive(Clone, Debug, Default)]
pub struct XaState {
    /// `None` if no stream is playing.
    pub freq: Option<u32>,
    pub stereo: bool,
    pub nsamples: u32,
    pub start: usize,
    pub end: usize,
    pub play: usize,
    pub feed: usize,
    pub left_vol: i32,
    pub right_vol: i32,
}

impl XaState {
    /// Number of samples waiting to be played. Positions outside 'start..end' count as zero
    /// samples on their side of the ring.
    pub fn buffered(&self) -> usize {
        if self.feed >= self.play {
            self.feed - self.play
        } else {
            self.end.saturating_sub(self.play) + self.feed.saturating_sub(self.start)
        }
    }
}

/// User configuration of the SPU, stored under the "SPU" key of the config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpuConfig {
    pub streaming: bool,
    /// Master volume from 0 (off) to 4.
    pub volume: u8,
    /// 0 is off, 1 simple and 2 accurate.
    pub reverb: u8,
    /// 0 is none, 1 simple, 2 gaussian and 3 cubic.
    pub interpolation: u8,
    pub mono: bool,
    /// Wait for the CPU to acknowledge IRQs.
    pub irq_wait: bool,
}

impl Default for SpuConfig {
    fn default() -> Self {
        Self {
            streaming: true,
            volume: 3,
            reverb: 2,
            interpolation: 2,
            mono: false,
            irq_wait: true,
        }
    }
}

impl SpuConfig {
    pub const MAX_VOLUME: u8 = 4;
    pub const REVERB_LABELS: [&'static str; 3] = ["Off", "Simple", "Accurate"];
    pub const INTERPOLATION_LABELS: [&'static str; 4] = ["None", "Simple", "Gaussian", "Cubic"];

    /// Keep all the enumerations inside their range.
    fn sanitize(&mut self) {
        self.volume = self.volume.min(Self::MAX_VOLUME);
        self.reverb = self.reverb.min(Self::REVERB_LABELS.len() as u8 - 1);
        self.interpolation = self
            .interpolation
            .min(Self::INTERPOLATION_LABELS.len() as u8 - 1);
    }
}

pub struct Spu {
    pub channels: [Channel; CHANNEL_COUNT],
    pub ram: Box<[u8]>,
    /// Address in SPU RAM which triggers an interrupt when accessed.
    pub irq_addr: Option<u32>,
    pub ctrl: u16,
    pub stat: u16,
    /// Data transfer address.
    pub addr: u32,
    pub xa: XaState,
    pub config: SpuConfig,
}

impl Default for Spu {
    fn default() -> Self {
        Self {
            channels: Default::default(),
            ram: vec![0x0; RAM_SIZE].into_boxed_slice(),
            irq_addr: None,
            ctrl: 0,
            stat: 0,
            addr: 0,
            xa: XaState::default(),
            config: SpuConfig::default(),
        }
    }
}

impl Spu {
    pub fn mute_all(&mut self, mute: bool) {
        for channel in &mut self.channels {
            channel.mute = mute;
        }
    }

    /// Reset to power-on state. The user configuration and mute flags are kept.
    pub fn reset(&mut self) {
        let config = self.config.clone();
        let mutes: Vec<bool> = self.channels.iter().map(|ch| ch.mute).collect();
        *self = Self::default();
        self.config = config;
        for (channel, mute) in self.channels.iter_mut().zip(mutes) {
            channel.mute = mute;
        }
    }

    /// The configuration as JSON.
    pub fn config(&self) -> Value {
        serde_json::to_value(&self.config).unwrap_or(Value::Null)
    }

    /// Load the configuration from the "SPU" entry of a config document. Anything unusable is
    /// ignored.
    pub fn set_config(&mut self, doc: &Value) {
        let Some(cfg) = doc.get("SPU").filter(|cfg| cfg.is_object()) else {
            return;
        };
        match SpuConfig::deserialize(cfg) {
            Ok(mut config) => {
                config.sanitize();
                self.config = config;
            }
            Err(err) => warn!("ignoring SPU config: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn xa_buffered_without_wrap() {
        let xa = XaState {
            start: 0,
            end: 100,
            play: 10,
            feed: 40,
            ..Default::default()
        };
        assert_eq!(xa.buffered(), 30);
    }

    #[test]
    fn xa_buffered_with_wrap() {
        let xa = XaState {
            start: 0,
            end: 100,
            play: 90,
            feed: 15,
            ..Default::default()
        };
        assert_eq!(xa.buffered(), 25);
    }

    #[test]
    fn xa_buffered_out_of_ring() {
        let xa = XaState {
            start: 20,
            end: 100,
            play: 120,
            feed: 10,
            ..Default::default()
        };
        assert_eq!(xa.buffered(), 0);
    }

    #[test]
    fn adsr_display_values() {
        let adsr = Adsr {
            attack_rate: 0x7f,
            decay_rate: 0x1f,
            sustain_rate: 0x00,
            release_rate: 0x0f,
            sustain_level: 0x7800_0000,
            ..Default::default()
        };
        assert_eq!(adsr.display_attack(), 0);
        assert_eq!(adsr.display_decay(), 0);
        assert_eq!(adsr.display_sustain(), 0x7f);
        assert_eq!(adsr.display_release(), 4);
        assert_eq!(adsr.display_sustain_level(), 0xf);
    }

    #[test]
    fn mute_all_and_reset() {
        let mut spu = Spu::default();
        spu.channels[3].on = true;
        spu.mute_all(true);
        assert!(spu.channels.iter().all(|ch| ch.mute));
        spu.reset();
        assert!(!spu.channels[3].on);
        assert!(spu.channels.iter().all(|ch| ch.mute));
    }

    #[test]
    fn config_round_trip() {
        let mut spu = Spu::default();
        spu.config.mono = true;
        spu.config.volume = 1;
        let doc = json!({ "SPU": spu.config() });

        let mut other = Spu::default();
        other.set_config(&doc);
        assert_eq!(other.config, spu.config);
    }

    #[test]
    fn config_is_tolerant() {
        let mut spu = Spu::default();
        spu.set_config(&json!({ "SPU": "nope" }));
        assert_eq!(spu.config, SpuConfig::default());

        spu.set_config(&json!({ "SPU": { "volume": 200, "reverb": 9 } }));
        assert_eq!(spu.config.volume, SpuConfig::MAX_VOLUME);
        assert_eq!(spu.config.reverb, 2);
        assert!(spu.config.streaming);

        spu.set_config(&json!({ "SPU": { "mono": "yes" } }));
        assert_eq!(spu.config.volume, SpuConfig::MAX_VOLUME);
    }
}
