//! The frontend of the emulator. Handles the window, rendering, the GUI and the config file, and
//! controls the emulated system through menus and debug windows.

#[macro_use]
extern crate log;

mod config;
mod debug;
mod events;
mod gui;
mod layout;

pub use debug::logs::{init_logger, LogBuffer};

use config::ConfigFile;
use debug::assembly::AssemblyView;
use debug::cpu::CpuStatus;
use debug::fps::FrameCounter;
use debug::logs::LogView;
use debug::mem::MemEditor;
use debug::spu::SpuDebug;
use debug::DebugApp;
use events::{EventPump, PumpAction};
use gui::menu::{MenuAction, PendingResets};
use gui::output::OutputTextures;
use gui::GuiRenderer;
use layout::{mem_editor_region, Layout, MEM_EDITORS};

use pxs_core::System;
use pxs_render::{RenderError, Renderer, SurfaceSize};

use thiserror::Error;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::{Fullscreen, Window, WindowBuilder};

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

#[derive(Error, Debug)]
pub enum FrontError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create renderer: {0}")]
    Render(#[from] RenderError),
}

/// Startup options, usually from the command line.
pub struct Options {
    pub fullscreen: bool,
    /// Config file to use instead of the default.
    pub config: Option<PathBuf>,
    pub bios: Option<PathBuf>,
    pub iso: Option<PathBuf>,
    pub exe: Option<PathBuf>,
    /// Start running right away.
    pub run: bool,
    pub logs: LogBuffer,
}

/// Current UNIX time in seconds.
fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|time| time.as_secs() as i64)
        .unwrap_or(0)
}

fn toggle_fullscreen(window: &Window) {
    if window.fullscreen().is_some() {
        window.set_fullscreen(None);
    } else {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    }
}

/// Everything the GUI shows and edits.
struct Frontend {
    system: System,
    layout: Layout,
    config: ConfigFile,
    logs: LogView,
    registers: CpuStatus,
    assembly: AssemblyView,
    spu_debug: SpuDebug,
    mem_editors: Vec<MemEditor>,
    fps: FrameCounter,
    textures: OutputTextures,
    resets: PendingResets,
    /// Picked in the menu this frame.
    actions: Vec<MenuAction>,
    /// If a config window changed something this frame.
    config_changed: bool,
}

impl Frontend {
    fn new(options: &Options) -> Self {
        let mut system = System::default();
        let mut layout = Layout::default();

        let mut config = match &options.config {
            Some(path) => ConfigFile::new(path),
            None => ConfigFile::default_location(),
        };

        if let Err(err) = config.load(&mut system, &mut layout) {
            warn!("{err}, using default config");
        }

        let bios = options
            .bios
            .clone()
            .or_else(|| Some(system.settings.bios.clone()).filter(|p| !p.as_os_str().is_empty()));
        match bios {
            Some(path) => {
                if let Err(err) = system.load_bios(&path) {
                    error!("{err}");
                }
            }
            None => warn!("no BIOS given"),
        }

        if let Some(path) = &options.iso {
            if let Err(err) = system.cdrom.open(path) {
                error!("{err}");
            }
        }

        let exe = options.exe.clone().or_else(|| {
            Some(system.settings.psx_exe.clone()).filter(|p| !p.as_os_str().is_empty())
        });
        if let Some(path) = exe {
            if let Err(err) = system.load_exe(&path) {
                error!("{err}");
            }
        }

        if options.run {
            system.start();
        }

        let mem_editors = (0..MEM_EDITORS)
            .map(|idx| MemEditor::new(mem_editor_region(idx), idx))
            .collect();

        Self {
            system,
            layout,
            config,
            logs: LogView::new(options.logs.clone()),
            registers: CpuStatus::default(),
            assembly: AssemblyView::default(),
            spu_debug: SpuDebug::default(),
            mem_editors,
            fps: FrameCounter::default(),
            textures: OutputTextures::default(),
            resets: PendingResets::default(),
            actions: Vec::new(),
            config_changed: false,
        }
    }

    /// Called every frame before the GUI.
    fn frame_tick(&mut self, dt: Duration) {
        self.fps.tick(dt);
        self.spu_debug.frame_tick(dt, &mut self.system);
    }

    /// Build the GUI. Returns the color to clear the surface with.
    fn show(&mut self, ctx: &egui::Context, events: &mut EventPump) -> wgpu::Color {
        for _ in 0..events.menu_toggles(ctx.wants_keyboard_input()) {
            self.layout.show_menu = !self.layout.show_menu;
        }

        let layout = &mut self.layout;
        let system = &mut self.system;

        if layout.show_menu || !layout.fullscreen_render || !system.running() {
            let fps = self.fps.text();
            self.actions = gui::menu::show(ctx, layout, system, &self.mem_editors, &fps);
        }

        if layout.fullscreen_render {
            self.textures.show_fullscreen(ctx);
        } else {
            self.textures.show_window(ctx);
        }

        let windows = &mut layout.windows;

        if windows.vram {
            self.textures.show_vram(ctx, &mut windows.vram);
        }
        if windows.logs {
            self.logs.show_window(system, ctx, &mut windows.logs);
        }
        if windows.registers {
            self.registers.show_window(system, ctx, &mut windows.registers);
        }
        if windows.assembly {
            self.assembly.show_window(system, ctx, &mut windows.assembly);
        }
        if windows.spu_debug {
            self.spu_debug.show_window(system, ctx, &mut windows.spu_debug);
        }

        for (editor, open) in self.mem_editors.iter_mut().zip(layout.mem_editors.iter_mut()) {
            if *open {
                editor.show_window(system, ctx, open);
            }
        }

        if windows.emulation_config {
            self.config_changed |=
                config::emulation::show(&mut system.settings, ctx, &mut windows.emulation_config);
        }
        if windows.gpu_config {
            self.config_changed |=
                config::gpu::show(&mut system.gpu.config, ctx, &mut windows.gpu_config);
        }
        if windows.spu_config {
            self.config_changed |=
                config::spu::show(&mut system.spu.config, ctx, &mut windows.spu_config);
        }

        if layout.fullscreen_render {
            wgpu::Color::BLACK
        } else {
            layout.clear_color()
        }
    }

    /// Apply what was picked during the frame and save the config if needed.
    fn end_frame(&mut self) {
        let now = unix_now();
        for action in self.actions.drain(..) {
            action.apply(&mut self.system, &mut self.resets, now);
        }

        if let Some(reset) = self.resets.apply(&mut self.system) {
            debug!("applied {reset:?} reset");
        }

        if self.config.needs_save(self.config_changed, &self.layout) {
            if let Err(err) = self.config.save(&self.system, &self.layout) {
                error!("failed to save config to '{}': {err}", self.config.path().display());
            }
        }
        self.config_changed = false;
    }
}

pub fn run(options: Options) -> Result<(), FrontError> {
    let mut event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("psxscope")
        .with_inner_size(LogicalSize::new(1280.0, 800.0))
        .build(&event_loop)?;

    if options.fullscreen {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    }

    let mut renderer = Renderer::new(&window)?;
    let mut gui = GuiRenderer::new(window.scale_factor() as f32, &renderer);
    let mut events = EventPump::default();
    let mut front = Frontend::new(&options);

    // The instant the last frame was drawn.
    let mut last_draw = Instant::now();

    event_loop.run_return(|event, _, ctrl_flow| {
        *ctrl_flow = ControlFlow::Poll;
        match event {
            Event::MainEventsCleared => window.request_redraw(),
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => match events.handle_window_event(event) {
                PumpAction::Quit => *ctrl_flow = ControlFlow::Exit,
                PumpAction::ToggleFullscreen => toggle_fullscreen(&window),
                PumpAction::Forward => {
                    match event {
                        WindowEvent::Resized(size) => {
                            renderer.resize(SurfaceSize::from(*size));
                            gui.resize(SurfaceSize::from(*size));
                        }
                        WindowEvent::ScaleFactorChanged {
                            scale_factor,
                            new_inner_size,
                        } => {
                            renderer.resize(SurfaceSize::from(**new_inner_size));
                            gui.resize(SurfaceSize::from(**new_inner_size));
                            gui.set_scale_factor(*scale_factor as f32);
                        }
                        _ => (),
                    }
                    gui.handle_window_event(event);
                }
            },
            Event::RedrawRequested(_) => {
                let dt = last_draw.elapsed();
                last_draw = Instant::now();

                front.frame_tick(dt);

                renderer.upload_vram(&front.system.gpu.vram);
                renderer.flip(front.system.gpu.display);
                front.textures.sync(&mut gui, &renderer);

                let res = renderer.render(|encoder, view, renderer| {
                    let res = gui.render(renderer, encoder, view, &window, |ctx| {
                        front.show(ctx, &mut events)
                    });
                    if let Err(err) = res {
                        error!("failed to render gui: {err}");
                    }
                });
                if let Err(err) = res {
                    error!("failed to render frame: {err}");
                }

                front.end_frame();

                if front.system.quit_requested() {
                    *ctrl_flow = ControlFlow::Exit;
                }
            }
            _ => (),
        }
    });

    if front.config.needs_save(false, &front.layout) {
        if let Err(err) = front.config.save(&front.system, &front.layout) {
            error!("failed to save config to '{}': {err}", front.config.path().display());
        }
    }

    info!("shutting down");

    Ok(())
}
