use pxs_core::gpu::GpuConfig;

/// Show the software GPU configuration window. Returns true if anything changed.
pub fn show(config: &mut GpuConfig, ctx: &egui::Context, open: &mut bool) -> bool {
    let mut changed = false;
    egui::Window::new("Soft GPU Configuration")
        .open(open)
        .resizable(false)
        .show(ctx, |ui| {
            changed |= ui.checkbox(&mut config.dithering, "Dithering").changed();
            changed |= ui.checkbox(&mut config.frame_limit, "Limit frame rate").changed();
            ui.add_enabled_ui(config.frame_limit, |ui| {
                changed |= ui
                    .add(egui::Slider::new(&mut config.fps_limit, 1.0..=240.0).text("FPS limit"))
                    .changed();
            });
            changed |= ui.checkbox(&mut config.show_fps, "Show FPS").changed();
        });
    changed
}
