// src/lib.rs
//! Brume
//!
//! A real-time volumetric participating-media rendering demo built on wgpu
//! and winit: omnidirectional cube-map shadows, runtime-selectable phase
//! functions, and two skybox techniques kept numerically consistent with
//! the scene illumination.

pub mod app;
pub mod config;
pub mod gfx;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::BrumeApp;
