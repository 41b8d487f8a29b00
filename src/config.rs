//! Fixed demo configuration
//!
//! Window, projection, shadow and shading constants plus asset locations.
//! Runtime-tunable values live in
//! [`SceneSettings`](crate::gfx::rendering::frame_state::SceneSettings); the
//! values here are deliberately compile-time.

pub const WINDOW_WIDTH: u32 = 1200;
pub const WINDOW_HEIGHT: u32 = 900;
pub const WINDOW_TITLE: &str = "brume";

/// Square resolution of each shadow cube face
pub const SHADOW_MAP_SIZE: u32 = 2048;

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;
pub const FOV_Y_DEGREES: f32 = 45.0;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.26,
    g: 0.46,
    b: 0.98,
    a: 1.0,
};

// Surface shading constants for the illumination pass
pub const DIFFUSE_WEIGHT: f32 = 3.0;
pub const GGX_ROUGHNESS: f32 = 0.4;
pub const FRESNEL_F0: f32 = 0.9;
pub const UV_REPEAT: f32 = 1.0;

// Asset locations, relative to the working directory
pub const MODELS_DIR: &str = "assets/models";
pub const TEXTURES_DIR: &str = "assets/textures";
pub const SKYBOX_DIR: &str = "assets/textures/cube/maskonaive";
pub const DIFFUSE_TEXTURE: &str = "assets/textures/uv_grid.png";
