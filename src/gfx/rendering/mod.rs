//! Multi-pass rendering: pipeline management, phase-function dispatch,
//! shadow matrices, per-frame state and the pass orchestrator.

pub mod frame_state;
pub mod phase;
pub mod pipeline_manager;
pub mod render_engine;
pub mod shadow;

// Re-export main types
pub use frame_state::{SceneSettings, SkyboxTechnique};
pub use phase::{PhaseFunction, PhaseRegistry};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
