use pxs_core::spu::SpuConfig;

/// Combo box over 'labels' where the selection is an index.
fn combo(ui: &mut egui::Ui, label: &str, val: &mut u8, labels: &[&str]) -> bool {
    let mut changed = false;
    let selected = labels.get(*val as usize).copied().unwrap_or("?");
    egui::ComboBox::from_label(label)
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for (idx, name) in labels.iter().enumerate() {
                changed |= ui.selectable_value(val, idx as u8, *name).changed();
            }
        });
    changed
}

/// Show the SPU configuration window. Returns true if anything changed.
pub fn show(config: &mut SpuConfig, ctx: &egui::Context, open: &mut bool) -> bool {
    let mut changed = false;
    egui::Window::new("SPU Configuration")
        .open(open)
        .resizable(false)
        .show(ctx, |ui| {
            changed |= ui.checkbox(&mut config.streaming, "Enable streaming").changed();
            changed |= ui
                .add(egui::Slider::new(&mut config.volume, 0..=SpuConfig::MAX_VOLUME).text("Volume"))
                .changed();
            changed |= combo(ui, "Reverb", &mut config.reverb, &SpuConfig::REVERB_LABELS);
            changed |= combo(
                ui,
                "Interpolation",
                &mut config.interpolation,
                &SpuConfig::INTERPOLATION_LABELS,
            );
            changed |= ui.checkbox(&mut config.mono, "Mono").changed();
            changed |= ui.checkbox(&mut config.irq_wait, "Wait for IRQ acknowledge").changed();
        });
    changed
}
