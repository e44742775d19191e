use pxs_core::Vram;

use ultraviolet::Vec2;

use std::num::NonZeroU32;

const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// VRAM converted to RGBA.
pub(crate) struct VramTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    /// VRAM generation of the last upload.
    uploaded: Option<u64>,
}

impl VramTexture {
    pub fn new(device: &wgpu::Device) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("VRAM Texture"),
            size: wgpu::Extent3d {
                width: Vram::WIDTH,
                height: Vram::HEIGHT,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            uploaded: None,
        }
    }

    pub fn upload(&mut self, queue: &wgpu::Queue, vram: &Vram) {
        if self.uploaded == Some(vram.generation()) {
            return;
        }
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &vram.to_rgba(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: NonZeroU32::new(Vram::WIDTH * 4),
                rows_per_image: NonZeroU32::new(Vram::HEIGHT),
            },
            wgpu::Extent3d {
                width: Vram::WIDTH,
                height: Vram::HEIGHT,
                depth_or_array_layers: 1,
            },
        );
        self.uploaded = Some(vram.generation());
    }
}

/// Target of a single emulated frame.
pub(crate) struct Offscreen {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl Offscreen {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
        }
    }
}

/// The largest size that fits inside 'size' where height divided by width is 'ratio'.
pub fn normalize_dimensions(size: Vec2, ratio: f32) -> Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec2::zero();
    }
    if size.y / size.x > ratio {
        Vec2::new(size.x, size.x * ratio)
    } else {
        Vec2::new(size.y / ratio, size.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_fit() {
        assert_eq!(normalize_dimensions(Vec2::new(800.0, 600.0), 0.75), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn wide_surface() {
        assert_eq!(normalize_dimensions(Vec2::new(1000.0, 600.0), 0.75), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn tall_surface() {
        assert_eq!(normalize_dimensions(Vec2::new(800.0, 800.0), 0.75), Vec2::new(800.0, 600.0));
        assert_eq!(normalize_dimensions(Vec2::new(1024.0, 1024.0), 0.5), Vec2::new(1024.0, 512.0));
    }

    #[test]
    fn empty_surface() {
        assert_eq!(normalize_dimensions(Vec2::new(0.0, 600.0), 0.75), Vec2::zero());
    }
}
