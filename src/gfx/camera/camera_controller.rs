//! Winit input plumbing for the FPS camera
//!
//! Tracks pressed WASD keys so several keys held at once all contribute to
//! movement, and forwards raw mouse deltas to the camera while the cursor is
//! captured.

use winit::{
    event::{DeviceEvent, ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::fps_camera::{CameraMovement, FpsCamera};

#[derive(Default)]
pub struct CameraController {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    /// While true the cursor is released for UI interaction and mouse motion
    /// no longer drives the camera.
    mouse_detached: bool,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records WASD press/release state
    ///
    /// Returns true when the event was a movement key.
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) -> bool {
        let pressed = event.state == ElementState::Pressed;
        match event.physical_key {
            PhysicalKey::Code(KeyCode::KeyW) => {
                self.forward = pressed;
                true
            }
            PhysicalKey::Code(KeyCode::KeyS) => {
                self.backward = pressed;
                true
            }
            PhysicalKey::Code(KeyCode::KeyA) => {
                self.left = pressed;
                true
            }
            PhysicalKey::Code(KeyCode::KeyD) => {
                self.right = pressed;
                true
            }
            _ => false,
        }
    }

    /// Forwards raw mouse deltas to the camera look
    pub fn process_device_event(&self, event: &DeviceEvent, camera: &mut FpsCamera) {
        if self.mouse_detached {
            return;
        }
        if let DeviceEvent::MouseMotion { delta } = event {
            // Screen Y grows downward; invert so dragging up pitches up.
            camera.process_mouse_movement(delta.0 as f32, -delta.1 as f32, true);
        }
    }

    /// Integrates held movement keys into the camera position
    pub fn apply_movement(&self, camera: &mut FpsCamera, dt: f32) {
        if self.forward {
            camera.process_keyboard(CameraMovement::Forward, dt);
        }
        if self.backward {
            camera.process_keyboard(CameraMovement::Backward, dt);
        }
        if self.left {
            camera.process_keyboard(CameraMovement::Left, dt);
        }
        if self.right {
            camera.process_keyboard(CameraMovement::Right, dt);
        }
    }

    pub fn set_mouse_detached(&mut self, detached: bool) {
        self.mouse_detached = detached;
    }

    pub fn mouse_detached(&self) -> bool {
        self.mouse_detached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    #[test]
    fn held_keys_integrate_each_frame() {
        let mut controller = CameraController::new();
        controller.forward = true;
        controller.right = true;

        let mut camera = FpsCamera::new(Point3::new(0.0, 0.0, 0.0), false);
        controller.apply_movement(&mut camera, 0.5);

        assert!(camera.position.z < 0.0);
        assert!(camera.position.x > 0.0);
    }

    #[test]
    fn detached_mouse_leaves_camera_alone() {
        let mut controller: CameraController = CameraController::new();
        controller.set_mouse_detached(true);
        let mut camera = FpsCamera::new(Point3::new(0.0, 0.0, 0.0), false);
        let before = camera.yaw_degrees();
        controller.process_device_event(
            &DeviceEvent::MouseMotion { delta: (100.0, 0.0) },
            &mut camera,
        );
        assert_eq!(before, camera.yaw_degrees());
    }
}
