//! 2D texture loading from image files
//!
//! A [`Texture2D`] remembers its file path and sampling parameters; `load`
//! decodes the file and uploads it. A missing or unreadable file is a
//! degraded, non-fatal case: the texture falls back to a 1x1 blank
//! placeholder so dependent bind groups stay valid.

use std::path::{Path, PathBuf};

use super::texture_resource::TextureResource;

pub struct Texture2D {
    path: PathBuf,
    wrap_s: wgpu::AddressMode,
    wrap_t: wgpu::AddressMode,
    min_filter: wgpu::FilterMode,
    mag_filter: wgpu::FilterMode,
    resource: Option<TextureResource>,
    loaded_from_file: bool,
}

impl Texture2D {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            wrap_s: wgpu::AddressMode::Repeat,
            wrap_t: wgpu::AddressMode::Repeat,
            min_filter: wgpu::FilterMode::Linear,
            mag_filter: wgpu::FilterMode::Linear,
            resource: None,
            loaded_from_file: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_wrap(&mut self, wrap_s: wgpu::AddressMode, wrap_t: wgpu::AddressMode) {
        self.wrap_s = wrap_s;
        self.wrap_t = wrap_t;
    }

    pub fn set_filter(&mut self, min_filter: wgpu::FilterMode, mag_filter: wgpu::FilterMode) {
        self.min_filter = min_filter;
        self.mag_filter = mag_filter;
    }

    /// True once `load` found and decoded the backing file
    pub fn loaded_from_file(&self) -> bool {
        self.loaded_from_file
    }

    /// True once a GPU texture exists, placeholder or not
    pub fn is_ready(&self) -> bool {
        self.resource.is_some()
    }

    /// Decodes the image file and uploads it
    ///
    /// Returns true when the file was decoded; false when the placeholder
    /// was substituted.
    pub fn load(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> bool {
        log::info!("loading texture from {}", self.path.display());

        let (pixels, width, height) = match image::open(&self.path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (width, height) = rgba.dimensions();
                self.loaded_from_file = true;
                (rgba.into_raw(), width, height)
            }
            Err(err) => {
                log::warn!(
                    "failed to load texture '{}': {} - using blank placeholder",
                    self.path.display(),
                    err
                );
                self.loaded_from_file = false;
                (vec![255u8; 4], 1, 1)
            }
        };

        self.resource = Some(self.upload(device, queue, &pixels, width, height));
        self.loaded_from_file
    }

    fn upload(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> TextureResource {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Texture2D"),
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
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Texture2D Sampler"),
            address_mode_u: self.wrap_s,
            address_mode_v: self.wrap_t,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: self.mag_filter,
            min_filter: self.min_filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        TextureResource {
            texture,
            view,
            sampler,
        }
    }

    /// Shader view; only valid after `load`
    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.resource.as_ref().map(|r| &r.view)
    }

    pub fn sampler(&self) -> Option<&wgpu::Sampler> {
        self.resource.as_ref().map(|r| &r.sampler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_starts_unloaded() {
        let tex = Texture2D::new("assets/textures/uv_grid.png");
        assert!(!tex.is_ready());
        assert!(!tex.loaded_from_file());
        assert_eq!(tex.path(), Path::new("assets/textures/uv_grid.png"));
    }
}
