//! SPU voice activity over time, and the state of a single voice.
//!
//! The sampler records what each voice was doing every 50 ms into a ring buffer. It runs every
//! frame, whether or not the window is open, so the history is there once it's opened.

use super::DebugApp;

use pxs_core::spu::{Channel, FMod, Spu, CHANNEL_COUNT};
use pxs_core::System;

use std::time::{Duration, Instant};

/// Samples kept per voice.
pub const DEBUG_SAMPLES: usize = 1024;

/// Time between samples.
pub const SAMPLE_PERIOD: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SampleKind {
    /// The voice is off.
    #[default]
    Empty,
    Data,
    Noise,
    /// The voice modulates the next.
    FMod1,
    /// The voice is modulated by the previous.
    FMod2,
    Muted,
    /// The voice triggered an interrupt.
    Irq,
}

impl SampleKind {
    fn color(self) -> egui::Color32 {
        match self {
            SampleKind::Empty => egui::Color32::from_gray(60),
            SampleKind::Data => egui::Color32::from_rgb(1, 172, 159),
            SampleKind::Noise => egui::Color32::from_rgb(200, 200, 200),
            SampleKind::FMod1 => egui::Color32::from_rgb(160, 90, 220),
            SampleKind::FMod2 => egui::Color32::from_rgb(46, 109, 180),
            SampleKind::Muted => egui::Color32::from_rgb(243, 195, 0),
            SampleKind::Irq => egui::Color32::from_rgb(223, 0, 36),
        }
    }
}

/// Kind and amplitude of a single voice right now. Consumes the interrupt flag.
fn classify(channel: &mut Channel) -> (SampleKind, f32) {
    if channel.irq_done {
        channel.irq_done = false;
        return (SampleKind::Irq, 0.0);
    }
    if !channel.on {
        return (SampleKind::Empty, 0.0);
    }
    let kind = if channel.mute {
        SampleKind::Muted
    } else if channel.noise {
        SampleKind::Noise
    } else {
        match channel.fmod {
            FMod::Modulator => SampleKind::FMod1,
            FMod::Modulated => SampleKind::FMod2,
            FMod::Off => SampleKind::Data,
        }
    };
    (kind, channel.sval.unsigned_abs() as f32 / 32768.0)
}

pub struct SpuSampler {
    kinds: Vec<[SampleKind; DEBUG_SAMPLES]>,
    amplitudes: Vec<[f32; DEBUG_SAMPLES]>,
    /// Where the next sample goes, shared by all voices.
    cursor: usize,
    last_updated: Instant,
}

impl SpuSampler {
    pub fn new(now: Instant) -> Self {
        Self {
            kinds: vec![[SampleKind::Empty; DEBUG_SAMPLES]; CHANNEL_COUNT],
            amplitudes: vec![[0.0; DEBUG_SAMPLES]; CHANNEL_COUNT],
            cursor: 0,
            last_updated: now,
        }
    }

    /// Take a sample for every whole period since the last one. After a long pause only the
    /// last 'DEBUG_SAMPLES' periods are written, since the rest would be overwritten anyway.
    pub fn sample(&mut self, spu: &mut Spu, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_updated);
        let periods = elapsed.as_nanos() / SAMPLE_PERIOD.as_nanos();
        if periods == 0 {
            return;
        }

        self.last_updated += Duration::from_nanos((periods * SAMPLE_PERIOD.as_nanos()) as u64);

        for _ in 0..periods.min(DEBUG_SAMPLES as u128) {
            for (idx, channel) in spu.channels.iter_mut().enumerate() {
                let (kind, amplitude) = classify(channel);
                self.kinds[idx][self.cursor] = kind;
                self.amplitudes[idx][self.cursor] = amplitude;
            }
            self.cursor = (self.cursor + 1) % DEBUG_SAMPLES;
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The 'age'th newest sample of voice 'channel', where 0 is the newest.
    pub fn get(&self, channel: usize, age: usize) -> (SampleKind, f32) {
        let idx = (self.cursor + DEBUG_SAMPLES - 1 - age % DEBUG_SAMPLES) % DEBUG_SAMPLES;
        (self.kinds[channel][idx], self.amplitudes[channel][idx])
    }
}

/// Draw the history of a voice, the oldest sample to the left.
fn histogram(ui: &mut egui::Ui, sampler: &SpuSampler, channel: usize, size: egui::Vec2) {
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter_at(rect);

    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(20));

    let columns = rect.width().max(1.0) as usize;
    for col in 0..columns {
        let age = (columns - 1 - col) * DEBUG_SAMPLES / columns;
        let (kind, amplitude) = sampler.get(channel, age);
        if kind == SampleKind::Empty {
            continue;
        }
        let height = match kind {
            SampleKind::Irq => rect.height(),
            _ => (amplitude.clamp(0.0, 1.0) * rect.height()).max(1.0),
        };
        let x = rect.left() + col as f32;
        let bar = egui::Rect::from_min_max(
            egui::pos2(x, rect.bottom() - height),
            egui::pos2(x + 1.0, rect.bottom()),
        );
        painter.rect_filled(bar, 0.0, kind.color());
    }
}

pub struct SpuDebug {
    sampler: SpuSampler,
    selected: usize,
}

impl Default for SpuDebug {
    fn default() -> Self {
        Self {
            sampler: SpuSampler::new(Instant::now()),
            selected: 0,
        }
    }
}

impl SpuDebug {
    fn show_channels(&mut self, spu: &mut Spu, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Mute all").clicked() {
                spu.mute_all(true);
            }
            if ui.button("Unmute all").clicked() {
                spu.mute_all(false);
            }
        });

        ui.separator();

        let half = CHANNEL_COUNT / 2;
        ui.columns(2, |columns| {
            for (col, ui) in columns.iter_mut().enumerate() {
                for idx in col * half..(col + 1) * half {
                    ui.horizontal(|ui| {
                        let width = (ui.available_width() - 90.0).max(32.0);
                        histogram(ui, &self.sampler, idx, egui::vec2(width, 22.0));
                        ui.checkbox(&mut spu.channels[idx].mute, "");
                        ui.radio_value(&mut self.selected, idx, format!("{idx:02}"));
                    });
                }
            }
        });
    }

    fn show_info(&self, spu: &Spu, ui: &mut egui::Ui) {
        let channel = &spu.channels[self.selected];
        let adsr = &channel.adsr;

        let grid = |ui: &mut egui::Ui, id: &str, rows: &[(&str, String)]| {
            egui::Grid::new(id).striped(true).show(ui, |ui| {
                for (name, val) in rows {
                    ui.label(*name);
                    ui.monospace(val);
                    ui.end_row();
                }
            });
        };

        ui.columns(2, |columns| {
            columns[0].heading("ADSR");
            grid(&mut columns[0], "spu_adsr", &[
                ("Attack", adsr.display_attack().to_string()),
                ("Decay", adsr.display_decay().to_string()),
                ("Sustain", adsr.display_sustain().to_string()),
                ("Release", adsr.display_release().to_string()),
                ("Sustain level", adsr.display_sustain_level().to_string()),
                ("Sustain increase", adsr.sustain_increase.to_string()),
                ("Volume", adsr.volume.to_string()),
                ("Envelope", format!("{:08x}", adsr.envelope_vol)),
            ]);

            columns[0].heading("Channel");
            grid(&mut columns[0], "spu_channel", &[
                ("On", channel.on.to_string()),
                ("Stop", channel.stop.to_string()),
                ("Noise", channel.noise.to_string()),
                ("FMod", channel.fmod.raw().to_string()),
                ("Reverb", channel.reverb.to_string()),
                ("Reverb active", channel.rvb_active.to_string()),
                ("Reverb number", channel.rvb_num.to_string()),
                ("Reverb offset", channel.rvb_offset.to_string()),
                ("Reverb repeat", channel.rvb_repeat.to_string()),
            ]);

            columns[1].heading("Position");
            grid(&mut columns[1], "spu_position", &[
                ("Start", format!("{:06x}", channel.start)),
                ("Current", format!("{:06x}", channel.curr)),
                ("Loop", format!("{:06x}", channel.repeat)),
            ]);

            columns[1].heading("Volume");
            grid(&mut columns[1], "spu_volume", &[
                ("Left", format!("{} ({:04x})", channel.left_vol, channel.left_vol_raw)),
                ("Right", format!("{} ({:04x})", channel.right_vol, channel.right_vol_raw)),
                ("Actual frequency", channel.act_freq.to_string()),
                ("Used frequency", channel.used_freq.to_string()),
            ]);

            columns[1].heading("XA");
            let xa = &spu.xa;
            grid(&mut columns[1], "spu_xa", &[
                ("Frequency", xa.freq.map_or("-".to_string(), |freq| freq.to_string())),
                ("Stereo", xa.stereo.to_string()),
                ("Samples", xa.nsamples.to_string()),
                ("Buffered", xa.buffered().to_string()),
                ("Volume", format!("{} / {}", xa.left_vol, xa.right_vol)),
            ]);

            columns[1].heading("SPU");
            grid(&mut columns[1], "spu_state", &[
                ("IRQ address", spu.irq_addr.map_or("-1".to_string(), |addr| format!("{addr:06x}"))),
                ("Control", format!("{:04x}", spu.ctrl)),
                ("Status", format!("{:04x}", spu.stat)),
                ("Address", format!("{:06x}", spu.addr)),
            ]);
        });
    }
}

impl DebugApp for SpuDebug {
    fn name(&self) -> &str {
        "SPU Debug"
    }

    fn frame_tick(&mut self, _: Duration, system: &mut System) {
        self.sampler.sample(&mut system.spu, Instant::now());
    }

    fn show(&mut self, system: &mut System, ui: &mut egui::Ui) {
        ui.columns(2, |columns| {
            self.show_channels(&mut system.spu, &mut columns[0]);
            egui::ScrollArea::vertical()
                .id_source("spu_info")
                .show(&mut columns[1], |ui| self.show_info(&system.spu, ui));
        });
    }

    fn show_window(&mut self, system: &mut System, ctx: &egui::Context, open: &mut bool) {
        egui::Window::new(self.name())
            .open(open)
            .default_pos([20.0, 40.0])
            .default_size([1200.0, 430.0])
            .show(ctx, |ui| self.show(system, ui));
    }
}
