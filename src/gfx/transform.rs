//! Position/orientation/scale transform with lazy matrix composition
//!
//! Each scene object owns one [`Transform`]. The world matrix is composed as
//! translate * rotate * scale and recomputed only when a component changed
//! since the last query.

use cgmath::{InnerSpace, Matrix4, Quaternion, Rad, Rotation3, Vector3};

/// Rigid transform plus non-uniform scale
///
/// Orientation is kept as a unit quaternion; rotations compose on the right,
/// so successive `rotate` calls apply in local space.
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vector3<f32>,
    orientation: Quaternion<f32>,
    scale: Vector3<f32>,
    cached: Option<Matrix4<f32>>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    /// Creates an identity transform
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            orientation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            cached: None,
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn orientation(&self) -> Quaternion<f32> {
        self.orientation
    }

    pub fn scale_factors(&self) -> Vector3<f32> {
        self.scale
    }

    /// Sets the world-space position
    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.cached = None;
    }

    /// Moves the transform by an offset
    pub fn translate(&mut self, translation: Vector3<f32>) {
        self.position += translation;
        self.cached = None;
    }

    /// Rotates around an axis by an angle, composed after the current
    /// orientation
    ///
    /// The axis does not need to be normalized.
    pub fn rotate(&mut self, axis: Vector3<f32>, angle: Rad<f32>) {
        let q = Quaternion::from_axis_angle(axis.normalize(), angle);
        self.orientation = (self.orientation * q).normalize();
        self.cached = None;
    }

    /// Scales each axis by a factor
    ///
    /// Accumulation is multiplicative: `scale(2.0)` twice quadruples the
    /// size. Use [`set_scale`](Self::set_scale) for absolute assignment.
    pub fn scale(&mut self, factor: Vector3<f32>) {
        self.scale.x *= factor.x;
        self.scale.y *= factor.y;
        self.scale.z *= factor.z;
        self.cached = None;
    }

    /// Convenience uniform variant of [`scale`](Self::scale)
    pub fn scale_uniform(&mut self, factor: f32) {
        self.scale(Vector3::new(factor, factor, factor));
    }

    /// Sets the absolute per-axis scale
    pub fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
        self.cached = None;
    }

    /// Restores the identity transform
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns the composed world matrix, rebuilding it if stale
    pub fn matrix(&mut self) -> Matrix4<f32> {
        if let Some(m) = self.cached {
            return m;
        }
        let m = Matrix4::from_translation(self.position)
            * Matrix4::from(self.orientation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        self.cached = Some(m);
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Rotation, Vector4};

    const EPS: f32 = 1e-5;

    fn assert_vec3_eq(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < EPS, "{:?} != {:?}", a, b);
    }

    #[test]
    fn identity_matrix_by_default() {
        let mut t = Transform::new();
        let m = t.matrix();
        assert_eq!(m, Matrix4::from_scale(1.0));
    }

    #[test]
    fn matrix_decomposes_back_to_inputs() {
        let mut t = Transform::new();
        t.set_position(Vector3::new(1.0, -2.0, 3.0));
        t.rotate(Vector3::unit_y(), Rad::from(Deg(37.0)));
        t.set_scale(Vector3::new(2.0, 2.0, 2.0));

        let m = t.matrix();

        // Translation sits in the fourth column.
        let translation = m.w.truncate();
        assert_vec3_eq(translation, Vector3::new(1.0, -2.0, 3.0));

        // With uniform scale, the basis column lengths are the scale and the
        // normalized columns are the rotated axes.
        let sx = m.x.truncate().magnitude();
        let sy = m.y.truncate().magnitude();
        let sz = m.z.truncate().magnitude();
        assert!((sx - 2.0).abs() < EPS);
        assert!((sy - 2.0).abs() < EPS);
        assert!((sz - 2.0).abs() < EPS);

        let rotated_x = t.orientation().rotate_vector(Vector3::unit_x());
        assert_vec3_eq(m.x.truncate() / sx, rotated_x);
    }

    #[test]
    fn rotations_compose_on_the_right() {
        let mut t = Transform::new();
        t.rotate(Vector3::unit_z(), Rad::from(Deg(90.0)));
        t.rotate(Vector3::unit_z(), Rad::from(Deg(90.0)));
        // Two quarter turns land unit X on -X.
        let v = t.matrix() * Vector4::new(1.0, 0.0, 0.0, 0.0);
        assert_vec3_eq(v.truncate(), Vector3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn scaling_accumulates_multiplicatively() {
        let mut t = Transform::new();
        t.scale_uniform(2.0);
        t.scale_uniform(3.0);
        assert_vec3_eq(t.scale_factors(), Vector3::new(6.0, 6.0, 6.0));
    }

    #[test]
    fn reset_restores_identity() {
        let mut t = Transform::new();
        t.translate(Vector3::new(5.0, 0.0, 0.0));
        t.scale_uniform(4.0);
        t.reset();
        assert_eq!(t.matrix(), Matrix4::from_scale(1.0));
    }

    #[test]
    fn mutation_invalidates_cached_matrix() {
        let mut t = Transform::new();
        let _ = t.matrix();
        t.translate(Vector3::new(1.0, 0.0, 0.0));
        let m = t.matrix();
        assert_vec3_eq(m.w.truncate(), Vector3::new(1.0, 0.0, 0.0));
    }
}
