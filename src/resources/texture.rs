//! Texture images, from disk to the GPU.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::GenericImageView;

/// Decodes an image file into RGBA8.
pub fn load_texture(path: &Path) -> anyhow::Result<image::RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("Could not load texture {}", path.display()))?;
    Ok(img.to_rgba8())
}

/// Decoded textures keyed by the name materials refer to them with.
#[derive(Default)]
pub struct TextureCache {
    root: PathBuf,
    images: HashMap<String, image::RgbaImage>,
}

impl TextureCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: HashMap::new(),
        }
    }

    /// Loads `name` relative to the root once. Later calls are no-ops.
    pub fn load(&mut self, name: &str) -> anyhow::Result<&image::RgbaImage> {
        if !self.images.contains_key(name) {
            let img = load_texture(&self.root.join(name))?;
            log::debug!("Loaded texture {} ({}x{})", name, img.width(), img.height());
            self.images.insert(name.to_string(), img);
        }
        self.images
            .get(name)
            .with_context(|| format!("Texture {} vanished from the cache", name))
    }

    pub fn get(&self, name: &str) -> Option<&image::RgbaImage> {
        self.images.get(name)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

pub struct GpuTexture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl GpuTexture {
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
    ) -> Self {
        let dimensions = img.dimensions();
        let rgba = img.to_rgba8();

        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * dimensions.0),
                rows_per_image: Some(dimensions.1),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Terrain and sky UVs run past 1 and rely on wrapping.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str) {
        let img = image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn png_decodes_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "grass.png");
        let img = load_texture(&dir.path().join("grass.png")).unwrap();
        assert_eq!(img.dimensions(), (2, 3));
        assert_eq!(img.get_pixel(1, 2).0, [10, 20, 30, 255]);
    }

    #[test]
    fn cache_loads_each_texture_once() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "sky.png");
        let mut cache = TextureCache::new(dir.path());
        cache.load("sky.png").unwrap();
        cache.load("sky.png").unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.get("sky.png").is_some());
        assert!(cache.load("missing.png").is_err());
        assert_eq!(cache.len(), 1);
    }
}
