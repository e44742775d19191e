//! The emulated screen and the VRAM viewer.

use super::GuiRenderer;

use pxs_render::{normalize_dimensions, Renderer};

use ultraviolet::Vec2;

/// Height divided by width of a TV.
const OUTPUT_RATIO: f32 = 3.0 / 4.0;

/// Height divided by width of VRAM.
const VRAM_RATIO: f32 = 1.0 / 2.0;

fn fit(size: egui::Vec2, ratio: f32) -> egui::Vec2 {
    let size = normalize_dimensions(Vec2::new(size.x, size.y), ratio);
    egui::vec2(size.x, size.y)
}

/// Egui handles of the textures owned by the renderer.
#[derive(Default)]
pub struct OutputTextures {
    /// The output texture and the renderer generation it was registered at.
    output: Option<(egui::TextureId, u64)>,
    vram: Option<egui::TextureId>,
}

impl OutputTextures {
    /// Make sure the handles refer to the current textures. Called after every flip.
    pub fn sync(&mut self, gui: &mut GuiRenderer, renderer: &Renderer) {
        if self.vram.is_none() {
            self.vram = Some(gui.register_texture(renderer, renderer.vram_view()));
        }

        let generation = renderer.output_generation();
        match self.output {
            Some((_, seen)) if seen == generation => (),
            Some((id, _)) => {
                if let Err(err) = gui.update_texture(renderer, renderer.output_view(), id) {
                    error!("failed to update output texture: {err}");
                }
                self.output = Some((id, generation));
            }
            None => {
                let id = gui.register_texture(renderer, renderer.output_view());
                self.output = Some((id, generation));
            }
        }
    }

    /// Draw the output over the whole screen area left by the panels, centered.
    pub fn show_fullscreen(&self, ctx: &egui::Context) {
        let Some((id, _)) = self.output else {
            return;
        };
        let area = ctx.available_rect();
        let size = fit(area.size(), OUTPUT_RATIO);
        egui::Area::new("fullscreen_output")
            .order(egui::Order::Background)
            .interactable(false)
            .fixed_pos(area.center() - size / 2.0)
            .show(ctx, |ui| {
                ui.image(id, size);
            });
    }

    pub fn show_window(&self, ctx: &egui::Context) {
        let Some((id, _)) = self.output else {
            return;
        };
        egui::Window::new("Output")
            .default_pos([50.0, 50.0])
            .default_size([640.0, 480.0])
            .resizable(true)
            .show(ctx, |ui| {
                let size = fit(ui.available_size(), OUTPUT_RATIO);
                ui.image(id, size);
            });
    }

    pub fn show_vram(&self, ctx: &egui::Context, open: &mut bool) {
        let Some(id) = self.vram else {
            return;
        };
        egui::Window::new("VRAM")
            .open(open)
            .default_pos([10.0, 20.0])
            .default_size([1024.0, 512.0])
            .resizable(true)
            .show(ctx, |ui| {
                let size = fit(ui.available_size(), VRAM_RATIO);
                ui.image(id, size);
            });
    }
}

#[test]
fn fit_keeps_ratio() {
    assert_eq!(fit(egui::vec2(1280.0, 720.0), OUTPUT_RATIO), egui::vec2(960.0, 720.0));
    assert_eq!(fit(egui::vec2(1024.0, 768.0), VRAM_RATIO), egui::vec2(1024.0, 512.0));
}
