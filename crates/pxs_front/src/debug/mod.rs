pub mod assembly;
pub mod cpu;
pub mod fps;
pub mod logs;
pub mod mem;
pub mod spu;

use pxs_core::System;

use std::time::Duration;

/// Egui debug window.
pub trait DebugApp {
    /// Show the app as a window.
    fn show_window(&mut self, system: &mut System, ctx: &egui::Context, open: &mut bool);

    /// Show the app inside a UI.
    fn show(&mut self, system: &mut System, ui: &mut egui::Ui);

    /// Called every frame, whether or not the window is open.
    fn frame_tick(&mut self, _dt: Duration, _system: &mut System) {}

    /// Title of the window.
    fn name(&self) -> &str;
}
