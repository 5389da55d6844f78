use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// One quad vertex: position in NDC plus a normalized texture coordinate.
///
/// Stride is 5 floats, position at offset 0, texcoord at offset 3. The
/// shader program's vertex stage consumes exactly this layout.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2  // tex coord
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Two triangles forming a quad, winding 0-1-2-2-3-0.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

/// Builds the four quad vertices for one sprite.
///
/// `u_start`/`u_end` are the sprite's normalized horizontal bounds in the
/// atlas; vertical bounds are fixed [0, 1] (single-row atlas). `scale_x`/
/// `scale_y` are half-extents in NDC (sprite size over viewport size), so
/// the sprite renders at native pixel size. Order: bottom-left,
/// bottom-right, top-right, top-left.
pub fn sprite_quad(u_start: f32, u_end: f32, scale_x: f32, scale_y: f32) -> [SpriteVertex; 4] {
    [
        SpriteVertex {
            position: [-scale_x, -scale_y, 0.0],
            tex_coord: [u_start, 0.0],
        },
        SpriteVertex {
            position: [scale_x, -scale_y, 0.0],
            tex_coord: [u_end, 0.0],
        },
        SpriteVertex {
            position: [scale_x, scale_y, 0.0],
            tex_coord: [u_end, 1.0],
        },
        SpriteVertex {
            position: [-scale_x, scale_y, 0.0],
            tex_coord: [u_start, 1.0],
        },
    ]
}

/// Caller-owned quad geometry: one rewritable vertex buffer holding four
/// `SpriteVertex` values and one immutable index buffer.
///
/// The vertex buffer is rewritten through the queue, and staged writes land
/// once per submit, so one sprite rewrite per frame per `QuadGeometry`.
pub struct QuadGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

impl QuadGeometry {
    pub fn new(device: &wgpu::Device) -> Self {
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprat quad vbo"),
            size: (4 * std::mem::size_of::<SpriteVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sprat quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
        }
    }

    /// Binds vertex slot 0 and the index buffer to the pass.
    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
    }

    pub(crate) fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── vertex layout ─────────────────────────────────────────────────────

    #[test]
    fn vertex_stride_is_five_floats() {
        assert_eq!(std::mem::size_of::<SpriteVertex>(), 20);
        assert_eq!(SpriteVertex::layout().array_stride, 20);
    }

    #[test]
    fn texcoord_offset_is_three_floats() {
        assert_eq!(SpriteVertex::ATTRS[0].offset, 0);
        assert_eq!(SpriteVertex::ATTRS[1].offset, 12);
    }

    // ── indices ───────────────────────────────────────────────────────────

    #[test]
    fn quad_indices_form_two_triangles_sharing_the_diagonal() {
        assert_eq!(QUAD_INDICES, [0, 1, 2, 2, 3, 0]);
        // Both triangles reference vertices 0 and 2 (the shared diagonal).
        let (t0, t1) = (&QUAD_INDICES[..3], &QUAD_INDICES[3..]);
        assert!(t0.contains(&0) && t0.contains(&2));
        assert!(t1.contains(&0) && t1.contains(&2));
    }

    // ── sprite_quad ───────────────────────────────────────────────────────

    #[test]
    fn sprite_quad_positions_span_the_scaled_extents() {
        let q = sprite_quad(0.25, 0.5, 0.08, 0.1);

        assert_eq!(q[0].position, [-0.08, -0.1, 0.0]); // bottom left
        assert_eq!(q[1].position, [0.08, -0.1, 0.0]); // bottom right
        assert_eq!(q[2].position, [0.08, 0.1, 0.0]); // top right
        assert_eq!(q[3].position, [-0.08, 0.1, 0.0]); // top left
    }

    #[test]
    fn sprite_quad_texcoords_map_the_horizontal_bounds() {
        let q = sprite_quad(0.25, 0.5, 1.0, 1.0);

        assert_eq!(q[0].tex_coord, [0.25, 0.0]);
        assert_eq!(q[1].tex_coord, [0.5, 0.0]);
        assert_eq!(q[2].tex_coord, [0.5, 1.0]);
        assert_eq!(q[3].tex_coord, [0.25, 1.0]);
    }
}
