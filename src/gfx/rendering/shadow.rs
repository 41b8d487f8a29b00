//! Omnidirectional shadow-pass matrices
//!
//! The point light renders the scene into a depth cube-map, one 90-degree
//! perspective frustum per face. Face order matches the GPU cube layout
//! (+X, -X, +Y, -Y, +Z, -Z); the up-vectors follow the cube-map convention
//! and are chosen so no look-at cross product degenerates at the vertical
//! faces.

use cgmath::{Deg, Matrix4, Point3, Vector3};

use crate::config;

use super::frame_state::OPENGL_TO_WGPU_MATRIX;

/// Look direction and up vector per cube face, in GPU layer order
pub const FACE_ORIENTATIONS: [([f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),  // +X
    ([-1.0, 0.0, 0.0], [0.0, -1.0, 0.0]), // -X
    ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),   // +Y
    ([0.0, -1.0, 0.0], [0.0, 0.0, -1.0]), // -Y
    ([0.0, 0.0, 1.0], [0.0, -1.0, 0.0]),  // +Z
    ([0.0, 0.0, -1.0], [0.0, -1.0, 0.0]), // -Z
];

/// The shared 90-degree square projection used by every face
pub fn shadow_projection() -> Matrix4<f32> {
    OPENGL_TO_WGPU_MATRIX
        * cgmath::perspective(Deg(90.0), 1.0, config::NEAR_PLANE, config::FAR_PLANE)
}

/// View-projection matrix for each cube face around the light position
pub fn cube_face_matrices(light_position: Point3<f32>) -> [Matrix4<f32>; 6] {
    let projection = shadow_projection();
    FACE_ORIENTATIONS.map(|(dir, up)| {
        let dir = Vector3::from(dir);
        let up = Vector3::from(up);
        projection * Matrix4::look_at_rh(light_position, light_position + dir, up)
    })
}

/// Per-face uniform block of the shadow pipeline
///
/// MUST match the `ShadowFace` struct in shadow.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowFaceUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// xyz: light position, w: far plane for linear depth normalization.
    pub light_pos_far: [f32; 4],
}

impl ShadowFaceUniforms {
    pub fn new(view_proj: Matrix4<f32>, light_position: Point3<f32>) -> Self {
        Self {
            view_proj: view_proj.into(),
            light_pos_far: [
                light_position.x,
                light_position.y,
                light_position.z,
                config::FAR_PLANE,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4};

    #[test]
    fn face_forward_vectors_are_orthogonal_to_their_ups() {
        for (dir, up) in FACE_ORIENTATIONS {
            let dir = Vector3::from(dir);
            let up = Vector3::from(up);
            assert!(dir.dot(up).abs() < 1e-6, "face {dir:?} not orthogonal");
            // The look-at basis stays well defined.
            assert!(dir.cross(up).magnitude() > 0.5);
        }
    }

    #[test]
    fn faces_cover_all_six_directions() {
        let mut sum = Vector3::new(0.0f32, 0.0, 0.0);
        for (dir, _) in FACE_ORIENTATIONS {
            sum += Vector3::from(dir);
        }
        assert!(sum.magnitude() < 1e-6);
    }

    #[test]
    fn light_position_projects_to_the_screen_center() {
        let light = Point3::new(0.0, 30.0, 15.0);
        for m in cube_face_matrices(light) {
            // The light sits at the eye of every face frustum. Its clip
            // position is degenerate (w -> 0) but must stay centered.
            let clip = m * Vector4::new(light.x, light.y, light.z, 1.0);
            assert!(clip.x.abs() < 1e-3, "clip.x = {}", clip.x);
            assert!(clip.y.abs() < 1e-3, "clip.y = {}", clip.y);
            assert!(clip.w.abs() < 1e-3, "clip.w = {}", clip.w);
        }
    }

    #[test]
    fn points_along_a_face_axis_land_inside_that_frustum() {
        let light = Point3::new(0.0, 0.0, 0.0);
        let matrices = cube_face_matrices(light);

        // A point down +X should be visible on face 0 at its center.
        let clip = matrices[0] * Vector4::new(10.0, 0.0, 0.0, 1.0);
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let ndc_z = clip.z / clip.w;
        assert!(ndc_x.abs() < 1e-4);
        assert!(ndc_y.abs() < 1e-4);
        assert!(ndc_z > 0.0 && ndc_z < 1.0, "depth {ndc_z} outside wgpu range");
    }
}
