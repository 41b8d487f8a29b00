//! Debug line and arrow batches
//!
//! An [`ArrowBatch`] stores a shaft (line-list vertices) followed by an
//! arrow-head (triangle-list vertices) in a single vertex buffer. wgpu fixes
//! the primitive topology per pipeline, so the two ranges are drawn by two
//! flat-shaded pipelines sharing the same shader.

use cgmath::Vector3;
use wgpu::Device;

use super::vertex::LineVertex;

pub struct ArrowBatch {
    vertices: Vec<LineVertex>,
    vertex_buffer: Option<wgpu::Buffer>,
    /// Number of leading vertices drawn as a line list; the rest form the
    /// arrow-head triangles.
    line_vertex_count: u32,
}

impl ArrowBatch {
    pub fn new(vertices: Vec<LineVertex>, line_vertex_count: u32) -> Self {
        Self {
            vertices,
            vertex_buffer: None,
            line_vertex_count,
        }
    }

    /// Builds an arrow along `axis`: a shaft through the origin plus a
    /// triangular head at the positive end
    ///
    /// `side` is any direction perpendicular to the axis, used to spread the
    /// head base.
    pub fn along_axis(
        axis: Vector3<f32>,
        side: Vector3<f32>,
        half_length: f32,
        head_size: f32,
        color: [f32; 4],
    ) -> Self {
        let point = |v: Vector3<f32>| LineVertex {
            position: [v.x, v.y, v.z],
            color,
        };

        let tip_base = axis * half_length;
        let vertices = vec![
            // Shaft
            point(axis * -half_length),
            point(tip_base),
            // Head
            point(tip_base + side * head_size),
            point(tip_base - side * head_size),
            point(axis * (half_length + head_size)),
        ];

        Self::new(vertices, 2)
    }

    pub fn init_gpu_resources(&mut self, device: &Device) {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Arrow Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        self.vertex_buffer = Some(vertex_buffer);
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some()
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.line_vertex_count
    }

    /// Draws the shaft; the bound pipeline must use line-list topology
    pub fn draw_shaft<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        let Some(buffer) = &self.vertex_buffer else {
            return;
        };
        render_pass.set_vertex_buffer(0, buffer.slice(..));
        render_pass.draw(0..self.line_vertex_count, 0..1);
    }

    /// Draws the arrow-head; the bound pipeline must use triangle-list
    /// topology
    pub fn draw_head<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        let Some(buffer) = &self.vertex_buffer else {
            return;
        };
        render_pass.set_vertex_buffer(0, buffer.slice(..));
        render_pass.draw(self.line_vertex_count..self.vertex_count(), 0..1);
    }
}

/// The three world-axis arrows: X red, Y green, Z blue
pub fn create_axis_arrows() -> [ArrowBatch; 3] {
    const HALF_LENGTH: f32 = 1000.0;
    const HEAD_SIZE: f32 = 50.0;
    const ALPHA: f32 = 0.7;

    [
        ArrowBatch::along_axis(
            Vector3::unit_x(),
            Vector3::unit_y(),
            HALF_LENGTH,
            HEAD_SIZE,
            [1.0, 0.0, 0.0, ALPHA],
        ),
        ArrowBatch::along_axis(
            Vector3::unit_y(),
            Vector3::unit_x(),
            HALF_LENGTH,
            HEAD_SIZE,
            [0.0, 1.0, 0.0, ALPHA],
        ),
        ArrowBatch::along_axis(
            Vector3::unit_z(),
            Vector3::unit_y(),
            HALF_LENGTH,
            HEAD_SIZE,
            [0.0, 0.0, 1.0, ALPHA],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_splits_into_shaft_and_head() {
        let arrow = ArrowBatch::along_axis(
            Vector3::unit_x(),
            Vector3::unit_y(),
            10.0,
            1.0,
            [1.0, 0.0, 0.0, 0.7],
        );
        assert_eq!(arrow.vertex_count(), 5);
        assert_eq!(arrow.line_vertex_count(), 2);
        assert!(!arrow.is_uploaded());
    }

    #[test]
    fn axis_arrows_cover_all_three_axes() {
        let [x, y, z] = create_axis_arrows();
        assert_eq!(x.vertices[0].color[0], 1.0);
        assert_eq!(y.vertices[0].color[1], 1.0);
        assert_eq!(z.vertices[0].color[2], 1.0);
        // Shaft tip of the X arrow sits on the positive X axis.
        assert_eq!(x.vertices[1].position, [1000.0, 0.0, 0.0]);
    }
}
