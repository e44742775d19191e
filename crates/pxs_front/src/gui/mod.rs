//! Drawing of the egui GUI on top of the window surface.

pub mod menu;
pub mod output;

use pxs_render::{Renderer, SurfaceSize};

use egui_wgpu_backend::{BackendError, RenderPass, ScreenDescriptor};
use egui_winit::State as WinState;
use winit::window::Window;

/// All the egui stuff required to draw the GUI to the screen.
pub struct GuiRenderer {
    egui_ctx: egui::Context,
    win_state: WinState,
    screen_descriptor: ScreenDescriptor,
    render_pass: RenderPass,
    jobs: Vec<egui::ClippedMesh>,
    textures: egui::TexturesDelta,
}

impl GuiRenderer {
    pub fn new(scale_factor: f32, renderer: &Renderer) -> Self {
        let egui_ctx = egui::Context::default();
        egui_ctx.set_visuals(visuals());

        let max_texture_dim = renderer.device.limits().max_texture_dimension_2d as usize;
        let win_state = WinState::from_pixels_per_point(max_texture_dim, scale_factor);

        let SurfaceSize {
            width: physical_width,
            height: physical_height,
        } = renderer.surface_size;

        let screen_descriptor = ScreenDescriptor {
            physical_width,
            physical_height,
            scale_factor,
        };

        let render_pass = RenderPass::new(&renderer.device, renderer.surface_format, 1);

        Self {
            egui_ctx,
            win_state,
            screen_descriptor,
            render_pass,
            jobs: Vec::new(),
            textures: egui::TexturesDelta::default(),
        }
    }

    /// Forward a window event to egui. Whether egui wants the keyboard is checked once per
    /// frame through the context instead.
    pub fn handle_window_event(&mut self, event: &winit::event::WindowEvent) {
        self.win_state.on_event(&self.egui_ctx, event);
    }

    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.screen_descriptor.scale_factor = scale_factor;
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        if size.width != 0 && size.height != 0 {
            self.screen_descriptor.physical_width = size.width;
            self.screen_descriptor.physical_height = size.height;
        }
    }

    /// Make a texture drawn by the renderer usable by egui.
    pub fn register_texture(
        &mut self,
        renderer: &Renderer,
        view: &wgpu::TextureView,
    ) -> egui::TextureId {
        self.render_pass
            .egui_texture_from_wgpu_texture(&renderer.device, view, wgpu::FilterMode::Nearest)
    }

    /// Point an already registered texture at a new view.
    pub fn update_texture(
        &mut self,
        renderer: &Renderer,
        view: &wgpu::TextureView,
        id: egui::TextureId,
    ) -> Result<(), BackendError> {
        self.render_pass.update_egui_texture_from_wgpu_texture(
            &renderer.device,
            view,
            wgpu::FilterMode::Nearest,
            id,
        )
    }

    /// Render the current frame to the screen. 'func' builds the GUI and returns the color to
    /// clear the surface with.
    pub fn render<F>(
        &mut self,
        renderer: &Renderer,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        window: &Window,
        func: F,
    ) -> Result<(), BackendError>
    where
        F: FnOnce(&egui::Context) -> wgpu::Color,
    {
        let input = self.win_state.take_egui_input(window);

        let mut clear = wgpu::Color::BLACK;
        let output = self.egui_ctx.run(input, |ctx| {
            clear = func(ctx);
        });

        self.textures.append(output.textures_delta);
        self.win_state
            .handle_platform_output(window, &self.egui_ctx, output.platform_output);

        self.jobs = self.egui_ctx.tessellate(output.shapes);

        self.render_pass
            .add_textures(&renderer.device, &renderer.queue, &self.textures)?;

        self.render_pass.update_buffers(
            &renderer.device,
            &renderer.queue,
            &self.jobs,
            &self.screen_descriptor,
        );

        self.render_pass.execute(
            encoder,
            target,
            &self.jobs,
            &self.screen_descriptor,
            Some(clear),
        )?;

        let textures = std::mem::take(&mut self.textures);
        self.render_pass.remove_textures(textures)
    }
}

/// Highlight color used for selections and the current instruction.
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(1, 172, 159);

/// Dark theme with the accent color and slightly rounded corners.
fn visuals() -> egui::Visuals {
    let rounding = egui::Rounding::same(3.0);
    let mut visuals = egui::Visuals::dark();

    visuals.selection.bg_fill = ACCENT;
    visuals.selection.stroke = egui::Stroke::new(1.0, egui::Color32::WHITE);
    visuals.window_rounding = rounding;

    let widgets = &mut visuals.widgets;
    for style in [
        &mut widgets.noninteractive,
        &mut widgets.inactive,
        &mut widgets.hovered,
        &mut widgets.active,
        &mut widgets.open,
    ] {
        style.rounding = rounding;
    }
    widgets.hovered.bg_stroke = egui::Stroke::new(1.0, ACCENT);
    widgets.active.bg_stroke = egui::Stroke::new(2.0, ACCENT);

    visuals
}
