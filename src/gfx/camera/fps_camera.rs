//! First-person camera with yaw/pitch mouse look and WASD movement
//!
//! The camera keeps an orthonormal basis (front/right/up) derived from yaw
//! and pitch, plus a "world front" with the vertical component removed for
//! ground-anchored movement.

use cgmath::{InnerSpace, Matrix4, Point3, Vector3};

const DEFAULT_YAW: f32 = -90.0;
const DEFAULT_PITCH: f32 = 0.0;
const DEFAULT_SPEED: f32 = 6.0;
const DEFAULT_SENSITIVITY: f32 = 0.05;

/// Pitch is clamped strictly inside this bound to keep the basis well defined
/// at the poles.
const PITCH_LIMIT: f32 = 89.0;

/// Camera translation directions, mapped from WASD by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

pub struct FpsCamera {
    pub position: Point3<f32>,
    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
    /// Front vector with the vertical component zeroed, used when the camera
    /// is anchored to the ground.
    world_front: Vector3<f32>,
    world_up: Vector3<f32>,
    yaw: f32,
    pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    on_ground: bool,
}

impl FpsCamera {
    /// Creates a camera at `position` looking down negative Z
    ///
    /// `on_ground` anchors forward/backward movement to the horizontal plane.
    pub fn new(position: Point3<f32>, on_ground: bool) -> Self {
        let mut camera = Self {
            position,
            front: -Vector3::unit_z(),
            right: Vector3::unit_x(),
            up: Vector3::unit_y(),
            world_front: -Vector3::unit_z(),
            world_up: Vector3::unit_y(),
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            on_ground,
        };
        camera.update_vectors();
        camera
    }

    /// Look-at view matrix, rebuilt from the current basis on every call
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn pitch_degrees(&self) -> f32 {
        self.pitch
    }

    pub fn yaw_degrees(&self) -> f32 {
        self.yaw
    }

    /// Integrates position along the camera basis
    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.movement_speed * dt;
        let forward = if self.on_ground {
            self.world_front
        } else {
            self.front
        };
        match direction {
            CameraMovement::Forward => self.position += forward * velocity,
            CameraMovement::Backward => self.position -= forward * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Applies a mouse offset to yaw/pitch
    ///
    /// With `constrain_pitch` the pitch never leaves (-89, 89) degrees.
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch += dy * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    fn update_vectors(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();

        let front = Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();

        self.front = front;
        self.world_front = Vector3::new(front.x, 0.0, front.z);
        self.right = front.cross(self.world_up).normalize();
        self.up = self.right.cross(front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::EuclideanSpace;

    const EPS: f32 = 1e-5;

    #[test]
    fn default_orientation_looks_down_negative_z() {
        let camera = FpsCamera::new(Point3::new(0.0, 0.0, 7.0), false);
        assert!((camera.front() - -Vector3::unit_z()).magnitude() < EPS);
        assert!((camera.up() - Vector3::unit_y()).magnitude() < EPS);
    }

    #[test]
    fn basis_stays_orthonormal_after_look() {
        let mut camera = FpsCamera::new(Point3::origin(), false);
        camera.process_mouse_movement(250.0, -120.0, true);
        assert!(camera.front().dot(camera.up).abs() < EPS);
        assert!((camera.front().magnitude() - 1.0).abs() < EPS);
        assert!((camera.up().magnitude() - 1.0).abs() < EPS);
    }

    #[test]
    fn pitch_never_leaves_the_clamp_range() {
        let mut camera = FpsCamera::new(Point3::origin(), false);
        for _ in 0..100 {
            camera.process_mouse_movement(0.0, 10_000.0, true);
            assert!(camera.pitch_degrees() <= 89.0);
        }
        for _ in 0..100 {
            camera.process_mouse_movement(0.0, -10_000.0, true);
            assert!(camera.pitch_degrees() >= -89.0);
        }
    }

    #[test]
    fn ground_anchored_movement_keeps_height() {
        let mut camera = FpsCamera::new(Point3::new(0.0, 1.5, 0.0), true);
        // Pitch the view up steeply; a grounded camera must still move
        // horizontally.
        camera.process_mouse_movement(0.0, 1500.0, true);
        camera.process_keyboard(CameraMovement::Forward, 1.0);
        assert!((camera.position.y - 1.5).abs() < EPS);
    }

    #[test]
    fn free_camera_gains_height_when_pitched() {
        let mut camera = FpsCamera::new(Point3::new(0.0, 0.0, 0.0), false);
        camera.process_mouse_movement(0.0, 1500.0, true);
        camera.process_keyboard(CameraMovement::Forward, 1.0);
        assert!(camera.position.y > 1.0);
    }
}
