//! Window for the general emulation settings.

use pxs_core::settings::{CddaType, Settings, VideoType};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SystemType {
    /// Pick the video standard from the disc.
    Auto,
    Ntsc,
    Pal,
}

impl SystemType {
    const ALL: [SystemType; 3] = [SystemType::Auto, SystemType::Ntsc, SystemType::Pal];

    fn label(self) -> &'static str {
        match self {
            SystemType::Auto => "Auto",
            SystemType::Ntsc => "NTSC",
            SystemType::Pal => "PAL",
        }
    }

    pub fn of(settings: &Settings) -> Self {
        match (settings.auto_video, settings.video) {
            (true, _) => SystemType::Auto,
            (false, VideoType::Ntsc) => SystemType::Ntsc,
            (false, VideoType::Pal) => SystemType::Pal,
        }
    }

    /// Write to 'settings'. 'Auto' leaves the last video standard alone.
    pub fn apply(self, settings: &mut Settings) {
        match self {
            SystemType::Auto => settings.auto_video = true,
            SystemType::Ntsc => {
                settings.auto_video = false;
                settings.video = VideoType::Ntsc;
            }
            SystemType::Pal => {
                settings.auto_video = false;
                settings.video = VideoType::Pal;
            }
        }
    }
}

/// Show the window. Returns true if any setting was changed.
pub fn show(settings: &mut Settings, ctx: &egui::Context, open: &mut bool) -> bool {
    let mut changed = false;
    egui::Window::new("Emulation Configuration")
        .open(open)
        .resizable(false)
        .show(ctx, |ui| {
            changed |= ui.checkbox(&mut settings.xa, "Enable XA decoder").changed();
            changed |= ui.checkbox(&mut settings.sio_irq, "Always enable SIO IRQ").changed();
            changed |= ui.checkbox(&mut settings.spu_irq, "Always enable SPU IRQ").changed();
            changed |= ui.checkbox(&mut settings.bnw_mdec, "Decode MDEC videos in B&W").changed();

            ui.separator();

            let mut system_type = SystemType::of(settings);
            egui::ComboBox::from_label("System Type")
                .selected_text(system_type.label())
                .show_ui(ui, |ui| {
                    for ty in SystemType::ALL {
                        if ui.selectable_value(&mut system_type, ty, ty.label()).changed() {
                            system_type.apply(settings);
                            changed = true;
                        }
                    }
                });

            egui::ComboBox::from_label("CDDA")
                .selected_text(settings.cdda.label())
                .show_ui(ui, |ui| {
                    for ty in CddaType::ALL {
                        changed |= ui.selectable_value(&mut settings.cdda, ty, ty.label()).changed();
                    }
                });

            ui.separator();

            changed |= ui.checkbox(&mut settings.hle, "BIOS HLE").changed();
            changed |= ui.checkbox(&mut settings.slow_boot, "Slow boot").changed();
        });
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_type_from_settings() {
        let mut settings = Settings::default();
        assert_eq!(SystemType::of(&settings), SystemType::Auto);

        settings.auto_video = false;
        settings.video = VideoType::Pal;
        assert_eq!(SystemType::of(&settings), SystemType::Pal);
    }

    #[test]
    fn system_type_to_settings() {
        let mut settings = Settings::default();

        SystemType::Pal.apply(&mut settings);
        assert!(!settings.auto_video);
        assert_eq!(settings.video, VideoType::Pal);

        SystemType::Auto.apply(&mut settings);
        assert!(settings.auto_video);
        assert_eq!(settings.video, VideoType::Pal);

        SystemType::Ntsc.apply(&mut settings);
        assert!(!settings.auto_video);
        assert_eq!(settings.video, VideoType::Ntsc);
    }
}
