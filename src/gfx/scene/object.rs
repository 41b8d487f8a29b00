//! Scene objects binding a drawable model to a transform
//!
//! Objects share models through `Arc`, so many objects can reference one
//! uploaded mesh. Each object owns a small uniform buffer holding its model
//! matrix and the view-dependent normal matrix, rewritten every frame right
//! before the object's draw call is encoded.

use std::sync::Arc;

use cgmath::{Matrix, Matrix3, Matrix4, SquareMatrix};
use wgpu::Device;

use crate::gfx::transform::Transform;

use super::model::Model;

/// Per-object uniform block: model matrix plus the inverse-transpose of the
/// upper 3x3 of (view * model), padded to a mat4 for WGSL alignment.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

pub struct ObjectGpuResources {
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

pub struct SceneObject {
    pub name: String,
    transform: Transform,
    model: Arc<Model>,
    gpu_resources: Option<ObjectGpuResources>,
}

impl SceneObject {
    /// Creates an object over a shared model
    ///
    /// The model reference is required up front, so an object can never be
    /// rendered without one.
    pub fn new(name: impl Into<String>, model: Arc<Model>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::new(),
            model,
            gpu_resources: None,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources.as_ref().map(|res| &res.bind_group)
    }

    /// Creates the uniform buffer and bind group for this object
    pub fn init_gpu_resources(&mut self, device: &Device, layout: &wgpu::BindGroupLayout) {
        let uniforms = self.compute_uniforms(Matrix4::identity());

        let uniform_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Object Uniforms: {}", self.name)),
                contents: bytemuck::bytes_of(&uniforms),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Object Bind Group: {}", self.name)),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        self.gpu_resources = Some(ObjectGpuResources {
            uniform_buffer,
            bind_group,
        });
    }

    /// Writes this frame's model and normal matrices to the GPU
    ///
    /// Must be called before the object's draw is encoded so the shadow and
    /// illumination passes observe the same matrices.
    pub fn update_frame_uniforms(&mut self, queue: &wgpu::Queue, view: Matrix4<f32>) {
        let uniforms = self.compute_uniforms(view);
        if let Some(gpu_resources) = &self.gpu_resources {
            queue.write_buffer(
                &gpu_resources.uniform_buffer,
                0,
                bytemuck::bytes_of(&uniforms),
            );
        }
    }

    fn compute_uniforms(&mut self, view: Matrix4<f32>) -> ObjectUniforms {
        let model = self.transform.matrix();
        let normal = normal_matrix(view, model);
        ObjectUniforms {
            model: model.into(),
            normal: normal.into(),
        }
    }
}

/// Inverse-transpose of the upper 3x3 of (view * model), padded to a mat4
///
/// The inverse-transpose keeps normals perpendicular to surfaces under
/// non-uniform scale. A singular matrix (zero scale) falls back to identity.
pub fn normal_matrix(view: Matrix4<f32>, model: Matrix4<f32>) -> Matrix4<f32> {
    let mv = view * model;
    let upper = Matrix3::from_cols(mv.x.truncate(), mv.y.truncate(), mv.z.truncate());
    let normal3 = upper
        .invert()
        .map(|inv| inv.transpose())
        .unwrap_or_else(Matrix3::identity);
    Matrix4::from(normal3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;
    use cgmath::{InnerSpace, Vector3, Vector4};

    fn cube_model() -> Arc<Model> {
        Arc::new(Model::from_geometry("cube", &generate_cube()))
    }

    #[test]
    fn object_always_has_a_model() {
        let object = SceneObject::new("Cube 1", cube_model());
        assert!(!object.model().is_empty());
        assert!(object.bind_group().is_none());
    }

    #[test]
    fn models_are_shared_not_copied() {
        let model = cube_model();
        let a = SceneObject::new("a", model.clone());
        let b = SceneObject::new("b", model.clone());
        assert!(Arc::ptr_eq(a.model(), b.model()));
    }

    #[test]
    fn normal_matrix_corrects_non_uniform_scale() {
        let model = Matrix4::from_nonuniform_scale(2.0, 1.0, 1.0);
        let n = normal_matrix(Matrix4::identity(), model);

        // A normal on a 45-degree face of the scaled cube: transform by the
        // normal matrix and check it stays perpendicular to the transformed
        // tangent.
        let surface_normal = Vector3::new(1.0, 1.0, 0.0).normalize();
        let tangent = Vector3::new(-1.0, 1.0, 0.0).normalize();

        let transformed_normal = (n * Vector4::new(surface_normal.x, surface_normal.y, surface_normal.z, 0.0)).truncate();
        let transformed_tangent = (model * Vector4::new(tangent.x, tangent.y, tangent.z, 0.0)).truncate();

        assert!(transformed_normal.dot(transformed_tangent).abs() < 1e-5);
    }

    #[test]
    fn singular_model_matrix_falls_back_to_identity() {
        let model = Matrix4::from_scale(0.0);
        let n = normal_matrix(Matrix4::identity(), model);
        assert_eq!(n, Matrix4::identity());
    }
}
