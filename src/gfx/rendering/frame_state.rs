//! Per-frame shared state and the global uniform block
//!
//! [`SceneSettings`] is the live-mutable block edited by the UI and the
//! number keys. The render engine copies it once at the top of each frame,
//! so every pass in that frame observes the same values, and converts it
//! into the [`GlobalUniforms`] GPU layout shared by all pipelines.

use cgmath::{Deg, EuclideanSpace, Matrix3, Matrix4, Point3, SquareMatrix};

use crate::config;

use super::phase::PhaseFunction;

/// cgmath produces OpenGL clip space (z in [-1, 1]); wgpu expects z in
/// [0, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Camera perspective projection for the given aspect ratio
pub fn perspective_projection(aspect: f32) -> Matrix4<f32> {
    OPENGL_TO_WGPU_MATRIX
        * cgmath::perspective(
            Deg(config::FOV_Y_DEGREES),
            aspect,
            config::NEAR_PLANE,
            config::FAR_PLANE,
        )
}

/// How the skybox pass shades the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyboxTechnique {
    /// Exponential-fog-tinted cubemap sample.
    Fog,
    /// Full participating-media integral along the per-pixel view ray,
    /// consistent with the illumination pass.
    ParticipatingMedia,
}

/// Runtime-tunable state shared between the UI and the render passes
///
/// Mutated only on the single render/UI thread; the render engine snapshots
/// it once per frame.
#[derive(Debug, Clone, Copy)]
pub struct SceneSettings {
    pub light_position: [f32; 3],
    /// Per-channel absorption coefficient, each in [0, 1].
    pub absorption: [f32; 3],
    /// Per-channel scattering coefficient, each in [0, 1].
    pub scattering: [f32; 3],
    /// Phase-function asymmetry, in [-1, 1].
    pub asymmetry: f32,
    pub phase_function: PhaseFunction,
    pub skybox_technique: SkyboxTechnique,
    pub fog_density: f32,
    pub fog_color: [f32; 3],
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            light_position: [0.0, 30.0, 15.0],
            absorption: [0.05, 0.05, 0.05],
            scattering: [0.15, 0.15, 0.15],
            asymmetry: 0.0,
            phase_function: PhaseFunction::Mie,
            skybox_technique: SkyboxTechnique::Fog,
            fog_density: 2.0,
            fog_color: [0.5, 0.5, 0.5],
        }
    }
}

/// Global uniform block bound at group 0 of every pipeline
///
/// MUST match the `Globals` struct in the WGSL shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    /// View with the translation stripped, used by the skybox passes so the
    /// environment appears infinitely distant.
    pub rot_view: [[f32; 4]; 4],
    /// Inverse of (proj * rot_view), for per-pixel view-ray reconstruction.
    pub inv_view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub light_pos: [f32; 4],
    pub absorption: [f32; 4],
    pub scattering: [f32; 4],
    /// xyz: fog color, w: fog density.
    pub fog: [f32; 4],
    /// x: asymmetry g, y: far plane, z: viewport width, w: viewport height.
    pub media: [f32; 4],
    /// x: phase dispatch index.
    pub phase: [u32; 4],
    /// x: diffuse weight, y: GGX roughness, z: Fresnel F0, w: UV repeat.
    pub shading: [f32; 4],
}

impl GlobalUniforms {
    /// Assembles the block from this frame's camera and settings snapshot
    pub fn build(
        view: Matrix4<f32>,
        proj: Matrix4<f32>,
        camera_pos: Point3<f32>,
        settings: &SceneSettings,
        phase_index: u32,
        width: u32,
        height: u32,
    ) -> Self {
        let rot_view = rotation_only(view);
        let inv_view_proj = (proj * rot_view)
            .invert()
            .unwrap_or_else(Matrix4::identity);

        let [lx, ly, lz] = settings.light_position;
        let [ar, ag, ab] = settings.absorption;
        let [sr, sg, sb] = settings.scattering;
        let [fr, fg, fb] = settings.fog_color;
        let camera = camera_pos.to_vec();

        Self {
            view: view.into(),
            proj: proj.into(),
            rot_view: rot_view.into(),
            inv_view_proj: inv_view_proj.into(),
            camera_pos: [camera.x, camera.y, camera.z, 1.0],
            light_pos: [lx, ly, lz, 1.0],
            absorption: [ar, ag, ab, 0.0],
            scattering: [sr, sg, sb, 0.0],
            fog: [fr, fg, fb, settings.fog_density],
            media: [
                settings.asymmetry,
                config::FAR_PLANE,
                width as f32,
                height as f32,
            ],
            phase: [phase_index, 0, 0, 0],
            shading: [
                config::DIFFUSE_WEIGHT,
                config::GGX_ROUGHNESS,
                config::FRESNEL_F0,
                config::UV_REPEAT,
            ],
        }
    }
}

/// Strips the translation from a view matrix, keeping only rotation
pub fn rotation_only(view: Matrix4<f32>) -> Matrix4<f32> {
    let rot = Matrix3::from_cols(
        view.x.truncate(),
        view.y.truncate(),
        view.z.truncate(),
    );
    Matrix4::from(rot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3, Vector4};

    #[test]
    fn rotation_only_view_has_no_translation() {
        let view = Matrix4::look_at_rh(
            Point3::new(3.0, 4.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        let rot = rotation_only(view);
        assert_eq!(rot.w, Vector4::new(0.0, 0.0, 0.0, 1.0));
        // Rotation columns keep unit length.
        assert!((rot.x.truncate().magnitude() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn settings_round_trip_into_the_uniform_layout() {
        let mut settings = SceneSettings::default();
        settings.absorption = [0.1, 0.2, 0.3];
        settings.scattering = [0.4, 0.5, 0.6];
        settings.asymmetry = -0.25;
        settings.light_position = [0.0, 30.0, 15.0];

        let uniforms = GlobalUniforms::build(
            Matrix4::identity(),
            perspective_projection(4.0 / 3.0),
            Point3::new(0.0, 0.0, 7.0),
            &settings,
            2,
            1200,
            900,
        );

        assert_eq!(uniforms.absorption, [0.1, 0.2, 0.3, 0.0]);
        assert_eq!(uniforms.scattering, [0.4, 0.5, 0.6, 0.0]);
        assert_eq!(uniforms.light_pos, [0.0, 30.0, 15.0, 1.0]);
        assert_eq!(uniforms.media[0], -0.25);
        assert_eq!(uniforms.media[2], 1200.0);
        assert_eq!(uniforms.media[3], 900.0);
        assert_eq!(uniforms.phase[0], 2);
    }

    #[test]
    fn default_settings_match_the_demo_scenario() {
        let settings = SceneSettings::default();
        assert_eq!(settings.light_position, [0.0, 30.0, 15.0]);
        assert_eq!(settings.absorption, [0.05, 0.05, 0.05]);
        assert_eq!(settings.scattering, [0.15, 0.15, 0.15]);
        assert_eq!(settings.asymmetry, 0.0);
        assert_eq!(settings.phase_function, PhaseFunction::Mie);
        assert_eq!(settings.skybox_technique, SkyboxTechnique::Fog);
    }

    #[test]
    fn uniform_block_size_is_stable() {
        // 4 matrices + 8 vec4s; a layout drift here would desynchronize the
        // WGSL side silently.
        assert_eq!(std::mem::size_of::<GlobalUniforms>(), 4 * 64 + 8 * 16);
    }

    #[test]
    fn inverse_view_proj_round_trips_clip_to_world() {
        let view = Matrix4::look_at_rh(
            Point3::new(0.0, 0.0, 7.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        let settings = SceneSettings::default();
        let proj = perspective_projection(1.0);
        let uniforms =
            GlobalUniforms::build(view, proj, Point3::new(0.0, 0.0, 7.0), &settings, 0, 800, 800);

        let inv: Matrix4<f32> = uniforms.inv_view_proj.into();
        let forward: Matrix4<f32> = Matrix4::from(uniforms.proj) * rotation_only(view);
        let round_trip = forward * inv;
        // Should be identity within floating tolerance.
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((round_trip[i][j] - expected).abs() < 1e-4);
            }
        }
    }
}
