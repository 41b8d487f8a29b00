pub mod camera_controller;
pub mod fps_camera;

// Re-export main types
pub use camera_controller::CameraController;
pub use fps_camera::{CameraMovement, FpsCamera};
