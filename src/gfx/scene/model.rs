//! GPU-buffer-backed mesh resources
//!
//! A [`Model`] is a list of meshes loaded from an OBJ file or generated
//! procedurally. Vertex and index data are uploaded once; meshes whose
//! buffers have not been created yet are silently skipped when drawn.

use std::ops::Range;
use std::path::Path;

use wgpu::Device;

use crate::gfx::geometry::GeometryData;

use super::vertex::Vertex3D;

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        let index_count = indices.len() as u32;
        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        }
    }

    /// Builds a mesh from raw OBJ attribute streams
    ///
    /// Missing or mismatched normals are recomputed from the triangle faces;
    /// missing texture coordinates default to zero.
    pub fn from_attributes(
        positions: &[f32],
        normals: &[f32],
        tex_coords: &[f32],
        indices: Vec<u32>,
    ) -> Self {
        let vertex_count = positions.len() / 3;

        let normals = if !normals.is_empty() && normals.len() == positions.len() {
            normals.to_vec()
        } else {
            Self::calculate_face_normals(positions, &indices)
        };

        let mut vertices = Vec::with_capacity(vertex_count);
        for i in 0..vertex_count {
            let uv = if tex_coords.len() >= (i + 1) * 2 {
                [tex_coords[i * 2], tex_coords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };
            vertices.push(Vertex3D {
                position: [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]],
                normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
                uv,
            });
        }

        Self::new(vertices, indices)
    }

    /// Area-weighted vertex normals for OBJ files that ship without them
    pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
        let vertex_count = positions.len() / 3;
        let mut normals = vec![0.0; positions.len()];
        let mut counts = vec![0u32; vertex_count];

        for triangle in indices.chunks(3) {
            let i0 = triangle[0] as usize;
            let i1 = triangle[1] as usize;
            let i2 = triangle[2] as usize;

            let v0 = [positions[i0 * 3], positions[i0 * 3 + 1], positions[i0 * 3 + 2]];
            let v1 = [positions[i1 * 3], positions[i1 * 3 + 1], positions[i1 * 3 + 2]];
            let v2 = [positions[i2 * 3], positions[i2 * 3 + 1], positions[i2 * 3 + 2]];

            let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

            let face_normal = [
                edge1[1] * edge2[2] - edge1[2] * edge2[1],
                edge1[2] * edge2[0] - edge1[0] * edge2[2],
                edge1[0] * edge2[1] - edge1[1] * edge2[0],
            ];

            for &vertex_idx in &[i0, i1, i2] {
                normals[vertex_idx * 3] += face_normal[0];
                normals[vertex_idx * 3 + 1] += face_normal[1];
                normals[vertex_idx * 3 + 2] += face_normal[2];
                counts[vertex_idx] += 1;
            }
        }

        for i in 0..vertex_count {
            if counts[i] > 0 {
                let length = (normals[i * 3].powi(2)
                    + normals[i * 3 + 1].powi(2)
                    + normals[i * 3 + 2].powi(2))
                .sqrt();
                if length > 0.0 {
                    normals[i * 3] /= length;
                    normals[i * 3 + 1] /= length;
                    normals[i * 3 + 2] /= length;
                }
            }
        }

        normals
    }

    /// Uploads vertex and index data to the GPU
    pub fn init_gpu_resources(&mut self, device: &Device) {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        self.vertex_buffer = Some(vertex_buffer);
        self.index_buffer = Some(index_buffer);
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some()
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

/// A drawable consisting of one or more meshes, shared between scene objects
pub struct Model {
    pub name: String,
    pub meshes: Vec<Mesh>,
}

impl Model {
    /// Loads a model from an OBJ file
    ///
    /// A missing or unparsable file is a degraded, non-fatal case: the error
    /// is logged and an empty model is returned, which draws nothing.
    pub fn from_obj(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());

        let load = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        );

        let models = match load {
            Ok((models, _materials)) => models,
            Err(err) => {
                log::warn!("failed to load model '{}': {}", path.display(), err);
                return Self {
                    name,
                    meshes: Vec::new(),
                };
            }
        };

        let meshes = models
            .iter()
            .map(|m| {
                Mesh::from_attributes(
                    &m.mesh.positions,
                    &m.mesh.normals,
                    &m.mesh.texcoords,
                    m.mesh.indices.clone(),
                )
            })
            .collect();

        Self { name, meshes }
    }

    /// Builds a model from procedurally generated geometry
    pub fn from_geometry(name: &str, geometry: &GeometryData) -> Self {
        let (vertices, indices) = geometry.to_scene_format();
        Self {
            name: name.to_string(),
            meshes: vec![Mesh::new(vertices, indices)],
        }
    }

    /// Uploads every mesh to the GPU
    pub fn init_gpu_resources(&mut self, device: &Device) {
        for mesh in &mut self.meshes {
            mesh.init_gpu_resources(device);
        }
    }

    /// True when the model holds no geometry (e.g. the source file was
    /// missing)
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

pub trait DrawModel<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
    fn draw_model(&mut self, model: &'a Model);
}

impl<'a, 'b> DrawModel<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let vertex_buffer = match &mesh.vertex_buffer {
            Some(buffer) => buffer,
            None => return, // Skip drawing if not uploaded
        };
        let index_buffer = match &mesh.index_buffer {
            Some(buffer) => buffer,
            None => return,
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }

    fn draw_model(&mut self, model: &'b Model) {
        for mesh in &model.meshes {
            self.draw_mesh_instanced(mesh, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;

    #[test]
    fn procedural_model_has_geometry_before_upload() {
        let model = Model::from_geometry("cube", &generate_cube());
        assert!(!model.is_empty());
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.meshes[0].vertex_count(), 24);
        assert!(!model.meshes[0].is_uploaded());
    }

    #[test]
    fn missing_obj_degrades_to_empty_model() {
        let model = Model::from_obj("does/not/exist.obj");
        assert!(model.is_empty());
        assert_eq!(model.name, "exist");
    }

    #[test]
    fn moved_mesh_keeps_its_data() {
        let mesh = Mesh::new(
            vec![Vertex3D {
                position: [0.0, 0.0, 0.0],
                normal: [0.0, 1.0, 0.0],
                uv: [0.0, 0.0],
            }],
            vec![0],
        );
        // A plain Rust move transfers buffer ownership; the source no longer
        // exists, so no second release is possible.
        let moved = mesh;
        assert_eq!(moved.vertex_count(), 1);
        assert!(!moved.is_uploaded());
    }

    #[test]
    fn face_normals_point_up_for_flat_triangle() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, -1.0];
        let indices = [0u32, 1, 2];
        let normals = Mesh::calculate_face_normals(&positions, &indices);
        assert!((normals[1] - 1.0).abs() < 1e-5);
        assert!(normals[0].abs() < 1e-5);
        assert!(normals[2].abs() < 1e-5);
    }
}
