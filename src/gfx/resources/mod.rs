pub mod cubemap;
pub mod texture2d;
pub mod texture_resource;

// Re-export main types
pub use cubemap::CubeMapTexture;
pub use texture2d::Texture2D;
pub use texture_resource::{ShadowCubeMap, TextureResource};
