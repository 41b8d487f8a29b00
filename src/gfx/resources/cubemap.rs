//! Environment cube-map loading
//!
//! Six image files named by the fixed convention `posx`, `negx`, `posy`,
//! `negy`, `posz`, `negz` (with a configurable extension) inside one
//! directory. Faces are uploaded in that order, matching the GPU cube face
//! layout +X, -X, +Y, -Y, +Z, -Z. A missing face is logged and replaced by
//! a blank face of the same resolution.

use std::path::{Path, PathBuf};

use super::texture_resource::TextureResource;

/// Face basenames in GPU layer order
pub const FACE_NAMES: [&str; 6] = ["posx", "negx", "posy", "negy", "posz", "negz"];

pub struct CubeMapTexture {
    directory: PathBuf,
    extension: String,
    resource: Option<TextureResource>,
}

impl CubeMapTexture {
    /// Creates a cube-map over `directory` with the default `jpg` extension
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self::with_extension(directory, "jpg")
    }

    pub fn with_extension(directory: impl AsRef<Path>, extension: &str) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            extension: extension.to_string(),
            resource: None,
        }
    }

    /// The six face paths in upload order
    pub fn face_paths(&self) -> [PathBuf; 6] {
        std::array::from_fn(|i| {
            self.directory
                .join(format!("{}.{}", FACE_NAMES[i], self.extension))
        })
    }

    pub fn is_ready(&self) -> bool {
        self.resource.is_some()
    }

    /// Decodes and uploads all six faces
    ///
    /// The first decodable face fixes the resolution; undecodable faces
    /// become black. Returns the number of faces loaded from disk.
    pub fn load(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> usize {
        let mut faces: [Option<image::RgbaImage>; 6] = Default::default();
        let mut loaded = 0;

        for (slot, path) in faces.iter_mut().zip(self.face_paths()) {
            match image::open(&path) {
                Ok(img) => {
                    *slot = Some(img.to_rgba8());
                    loaded += 1;
                }
                Err(err) => {
                    log::warn!("failed to load cube face '{}': {}", path.display(), err);
                }
            }
        }

        let (width, height) = faces
            .iter()
            .flatten()
            .next()
            .map(|img| img.dimensions())
            .unwrap_or((1, 1));

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 6,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Environment Cube Map"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let blank = vec![0u8; (width * height * 4) as usize];
        for (face, slot) in faces.iter().enumerate() {
            let pixels = match slot {
                // Faces with the wrong resolution would corrupt the upload
                // stride; treat them like missing faces.
                Some(img) if img.dimensions() == (width, height) => img.as_raw(),
                Some(img) => {
                    log::warn!(
                        "cube face '{}' has mismatched resolution {:?}, expected {:?}",
                        FACE_NAMES[face],
                        img.dimensions(),
                        (width, height)
                    );
                    &blank
                }
                None => &blank,
            };

            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: face as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Environment Cube View"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Environment Cube Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        self.resource = Some(TextureResource {
            texture,
            view,
            sampler,
        });

        loaded
    }

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
    fn face_paths_follow_the_naming_convention() {
        let cube = CubeMapTexture::new("assets/textures/cube/maskonaive");
        let paths = cube.face_paths();
        assert_eq!(
            paths[0],
            Path::new("assets/textures/cube/maskonaive/posx.jpg")
        );
        assert_eq!(
            paths[5],
            Path::new("assets/textures/cube/maskonaive/negz.jpg")
        );
    }

    #[test]
    fn extension_is_configurable() {
        let cube = CubeMapTexture::with_extension("env", "png");
        assert!(cube
            .face_paths()
            .iter()
            .all(|p| p.extension().unwrap() == "png"));
    }

    #[test]
    fn cube_map_starts_unloaded() {
        let cube = CubeMapTexture::new("env");
        assert!(!cube.is_ready());
    }
}
