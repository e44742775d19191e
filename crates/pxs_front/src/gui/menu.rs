//! The main menu bar.

use crate::debug::mem::MemEditor;
use crate::debug::DebugApp;
use crate::layout::Layout;

use pxs_core::System;

use native_dialog::FileDialog;

use std::path::PathBuf;

/// Seconds the lid stays open with "Open and close LID".
const LID_OPEN_SECS: i64 = 2;

/// Something picked in the menu, which changes the system.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MenuAction {
    OpenIso(PathBuf),
    CloseIso,
    OpenLid,
    CloseLid,
    OpenCloseLid,
    Quit,
    Start,
    Pause,
    SoftReset,
    HardReset,
}

impl MenuAction {
    /// Perform the action. Resets are only scheduled, 'now' is the current UNIX time.
    pub fn apply(self, system: &mut System, resets: &mut PendingResets, now: i64) {
        match self {
            MenuAction::OpenIso(path) => {
                if let Err(err) = system.cdrom.open(&path) {
                    error!("{err}");
                }
            }
            MenuAction::CloseIso => system.cdrom.close(),
            MenuAction::OpenLid => {
                system.cdrom.set_open_case_time(-1);
                system.cdrom.lid_interrupt();
            }
            MenuAction::CloseLid => {
                system.cdrom.set_open_case_time(0);
                system.cdrom.lid_interrupt();
            }
            MenuAction::OpenCloseLid => {
                system.cdrom.set_open_case_time(now + LID_OPEN_SECS);
                system.cdrom.lid_interrupt();
            }
            MenuAction::Quit => system.quit(),
            MenuAction::Start => system.start(),
            MenuAction::Pause => system.stop(),
            MenuAction::SoftReset => resets.soft = true,
            MenuAction::HardReset => resets.hard = true,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Reset {
    Soft,
    Hard,
}

/// Resets wait until the frame is done, since the GUI may be looking at the system.
#[derive(Default)]
pub struct PendingResets {
    soft: bool,
    hard: bool,
}

impl PendingResets {
    /// Apply at most one pending reset. A soft reset goes before a hard one, which then has to
    /// wait for the next frame.
    pub fn apply(&mut self, system: &mut System) -> Option<Reset> {
        if self.soft {
            self.soft = false;
            system.soft_reset();
            Some(Reset::Soft)
        } else if self.hard {
            self.hard = false;
            system.hard_reset();
            Some(Reset::Hard)
        } else {
            None
        }
    }
}

fn pick_iso() -> Option<PathBuf> {
    FileDialog::new()
        .set_location(".")
        .add_filter("Disc image", &["bin", "iso", "img", "cue"])
        .show_open_single_file()
        .unwrap_or_else(|err| {
            error!("failed to open file dialog: {err}");
            None
        })
}

/// Show the menu bar. Window toggles are written straight to 'layout', everything else is
/// returned.
pub fn show(
    ctx: &egui::Context,
    layout: &mut Layout,
    system: &System,
    editors: &[MemEditor],
    fps: &str,
) -> Vec<MenuAction> {
    let mut actions = Vec::new();

    egui::TopBottomPanel::top("main_menu").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open ISO").clicked() {
                    ui.close_menu();
                    if let Some(path) = pick_iso() {
                        actions.push(MenuAction::OpenIso(path));
                    }
                }
                if ui.add_enabled(system.cdrom.iso().is_some(), egui::Button::new("Close ISO")).clicked() {
                    ui.close_menu();
                    actions.push(MenuAction::CloseIso);
                }
                ui.separator();
                if ui.button("Open LID").clicked() {
                    ui.close_menu();
                    actions.push(MenuAction::OpenLid);
                }
                if ui.button("Close LID").clicked() {
                    ui.close_menu();
                    actions.push(MenuAction::CloseLid);
                }
                if ui.button("Open and close LID").clicked() {
                    ui.close_menu();
                    actions.push(MenuAction::OpenCloseLid);
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ui.close_menu();
                    actions.push(MenuAction::Quit);
                }
            });

            ui.menu_button("Emulation", |ui| {
                if ui.add_enabled(!system.running(), egui::Button::new("Start")).clicked() {
                    ui.close_menu();
                    actions.push(MenuAction::Start);
                }
                if ui.add_enabled(system.running(), egui::Button::new("Pause")).clicked() {
                    ui.close_menu();
                    actions.push(MenuAction::Pause);
                }
                ui.separator();
                if ui.button("Soft Reset").clicked() {
                    ui.close_menu();
                    actions.push(MenuAction::SoftReset);
                }
                if ui.button("Hard Reset").clicked() {
                    ui.close_menu();
                    actions.push(MenuAction::HardReset);
                }
            });

            ui.menu_button("Configuration", |ui| {
                ui.checkbox(&mut layout.windows.emulation_config, "Emulation");
                ui.checkbox(&mut layout.windows.gpu_config, "Soft GPU");
                ui.checkbox(&mut layout.windows.spu_config, "SPU");
                ui.separator();
                ui.horizontal(|ui| {
                    ui.color_edit_button_srgb(&mut layout.background);
                    ui.label("Background color");
                });
            });

            ui.menu_button("Debug", |ui| {
                ui.checkbox(&mut layout.windows.logs, "Show Logs");
                ui.checkbox(&mut layout.windows.vram, "Show VRAM");
                ui.checkbox(&mut layout.windows.registers, "Show Registers");
                ui.checkbox(&mut layout.windows.assembly, "Show Assembly");
                ui.menu_button("Memory Editors", |ui| {
                    for (open, editor) in layout.mem_editors.iter_mut().zip(editors) {
                        ui.checkbox(open, editor.name());
                    }
                });
                ui.checkbox(&mut layout.windows.spu_debug, "Show SPU debug");
                ui.separator();
                ui.checkbox(&mut layout.fullscreen_render, "Fullscreen render");
            });

            ui.separator();
            ui.label(fps);
        });
    });

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pxs_core::{cpu, Region};

    #[test]
    fn lid_actions() {
        let mut system = System::default();
        let mut resets = PendingResets::default();

        MenuAction::OpenLid.apply(&mut system, &mut resets, 100);
        assert!(system.cdrom.lid_open(i64::MAX));

        MenuAction::CloseLid.apply(&mut system, &mut resets, 100);
        assert!(!system.cdrom.lid_open(100));

        MenuAction::OpenCloseLid.apply(&mut system, &mut resets, 100);
        assert_eq!(system.cdrom.open_case_time(), 102);
        assert!(system.cdrom.lid_open(101));
        assert!(!system.cdrom.lid_open(102));

        assert_eq!(system.cdrom.lid_interrupts(), 3);
    }

    #[test]
    fn run_state_actions() {
        let mut system = System::default();
        let mut resets = PendingResets::default();

        MenuAction::Start.apply(&mut system, &mut resets, 0);
        assert!(system.running());
        MenuAction::Pause.apply(&mut system, &mut resets, 0);
        assert!(!system.running());
        MenuAction::Quit.apply(&mut system, &mut resets, 0);
        assert!(system.quit_requested());
    }

    #[test]
    fn bad_iso_leaves_tray_empty() {
        let mut system = System::default();
        let mut resets = PendingResets::default();
        MenuAction::OpenIso(PathBuf::from("/nonexistent/game.bin")).apply(
            &mut system,
            &mut resets,
            0,
        );
        assert!(system.cdrom.iso().is_none());
    }

    #[test]
    fn resets_are_deferred() {
        let mut system = System::default();
        let mut resets = PendingResets::default();

        system.cpu.pc = 0x8001_0000;
        MenuAction::SoftReset.apply(&mut system, &mut resets, 0);
        assert_eq!(system.cpu.pc, 0x8001_0000);

        assert_eq!(resets.apply(&mut system), Some(Reset::Soft));
        assert_eq!(system.cpu.pc, cpu::RESET_VECTOR);
        assert_eq!(resets.apply(&mut system), None);
    }

    #[test]
    fn one_reset_per_frame() {
        let mut system = System::default();
        let mut resets = PendingResets::default();

        system.mem.region_mut(Region::Main)[0] = 1;
        MenuAction::HardReset.apply(&mut system, &mut resets, 0);
        MenuAction::SoftReset.apply(&mut system, &mut resets, 0);

        assert_eq!(resets.apply(&mut system), Some(Reset::Soft));
        assert_eq!(system.mem.region(Region::Main)[0], 1);

        assert_eq!(resets.apply(&mut system), Some(Reset::Hard));
        assert_eq!(system.mem.region(Region::Main)[0], 0);

        assert_eq!(resets.apply(&mut system), None);
    }
}
