//! Owns the graphics device and the window surface. The emulated VRAM lives in a texture which is
//! re-uploaded whenever it changes, and the visible part of it is copied into one of two
//! offscreen textures on every flip, which the GUI then shows.

#[macro_use]
extern crate log;

mod texture;

pub use texture::normalize_dimensions;

use pxs_core::{DisplayArea, Vram};
use texture::{Offscreen, VramTexture};

use thiserror::Error;
use winit::window::Window;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no suitable graphics adapter found")]
    NoAdapter,

    #[error("failed to request graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface is incompatible with the adapter")]
    IncompatibleSurface,

    #[error("failed to get next frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl From<winit::dpi::PhysicalSize<u32>> for SurfaceSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

pub struct Renderer {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub surface_size: SurfaceSize,
    surface: wgpu::Surface,
    vram: VramTexture,
    /// The front is the one shown, the back is written on the next flip.
    front: Offscreen,
    back: Offscreen,
    /// Bumped every time the front texture changes.
    generation: u64,
}

impl Renderer {
    pub fn new(window: &Window) -> Result<Self, RenderError> {
        let surface_size = SurfaceSize::from(window.inner_size());

        let instance = wgpu::Instance::new(wgpu::Backends::PRIMARY);
        let surface = unsafe { instance.create_surface(window) };

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::NoAdapter)?;

        info!("using graphics adapter '{}'", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Device"),
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::default(),
            },
            None,
        ))?;

        // There is no way to recover from a graphics error in the middle of a frame.
        device.on_uncaptured_error(|err| {
            error!("graphics error: {err}");
            std::process::abort();
        });

        let surface_format = surface
            .get_preferred_format(&adapter)
            .ok_or(RenderError::IncompatibleSurface)?;

        let vram = VramTexture::new(&device);

        let area = DisplayArea::default();
        let front = Offscreen::new(&device, area.width, area.height);
        let back = Offscreen::new(&device, area.width, area.height);

        let renderer = Self {
            device,
            queue,
            surface_format,
            surface_size,
            surface,
            vram,
            front,
            back,
            generation: 0,
        };

        renderer.configure_surface();

        Ok(renderer)
    }

    fn configure_surface(&self) {
        self.surface.configure(
            &self.device,
            &wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format: self.surface_format,
                width: self.surface_size.width,
                height: self.surface_size.height,
                present_mode: wgpu::PresentMode::Fifo,
            },
        );
    }

    /// Resize the surface. Zero sized surfaces, which happens when the window gets minimized,
    /// are ignored.
    pub fn resize(&mut self, size: SurfaceSize) {
        if size.width != 0 && size.height != 0 {
            self.surface_size = size;
            self.configure_surface();
        }
    }

    /// Upload VRAM to the GPU if it has changed since the last upload.
    pub fn upload_vram(&mut self, vram: &Vram) {
        self.vram.upload(&self.queue, vram);
    }

    /// Copy the display area of VRAM into the back texture and make it the front.
    pub fn flip(&mut self, area: DisplayArea) {
        let area = area.clamped();

        if self.back.width != area.width || self.back.height != area.height {
            trace!("offscreen texture resized to {}x{}", area.width, area.height);
            self.back = Offscreen::new(&self.device, area.width, area.height);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Flip Encoder"),
            });

        encoder.copy_texture_to_texture(
            wgpu::ImageCopyTexture {
                texture: &self.vram.texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: area.x,
                    y: area.y,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyTexture {
                texture: &self.back.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::Extent3d {
                width: area.width,
                height: area.height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(Some(encoder.finish()));

        std::mem::swap(&mut self.front, &mut self.back);
        self.generation += 1;
    }

    pub fn vram_view(&self) -> &wgpu::TextureView {
        &self.vram.view
    }

    /// The offscreen texture holding the last frame.
    pub fn output_view(&self) -> &wgpu::TextureView {
        &self.front.view
    }

    /// Changes whenever 'output_view' refers to a different texture, meaning any handle to it
    /// must be refreshed.
    pub fn output_generation(&self) -> u64 {
        self.generation
    }

    /// Draw a single frame to the surface. 'func' records the commands for the frame.
    pub fn render<F>(&mut self, func: F) -> Result<(), RenderError>
    where
        F: FnOnce(&mut wgpu::CommandEncoder, &wgpu::TextureView, &Renderer),
    {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                debug!("surface outdated, reconfiguring");
                self.configure_surface();
                self.surface.get_current_texture()?
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("timed out waiting for frame");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        func(&mut encoder, &view, self);

        self.queue.submit(Some(encoder.finish()));
        frame.present();

        Ok(())
    }
}
