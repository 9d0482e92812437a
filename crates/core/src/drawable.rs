//! Draw call descriptions.

use std::mem;

use crate::attribute::{AttributeBinding, Vertex};
use crate::buffer::{IndexBuffer, Primitive, VertexBuffer};
use crate::color_mode::ColorMode;
use crate::depth_mode::DepthMode;
use crate::driver::PrimitiveType;
use crate::object::{BufferId, ProgramId, UniqueProgram};
use crate::stencil_mode::StencilMode;

/// Primitive topology plus the rasterization size it needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawMode {
    Points { point_size: f32 },
    Lines { line_width: f32 },
    LineStrip { line_width: f32 },
    Triangles,
    TriangleStrip,
}

impl DrawMode {
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            DrawMode::Points { .. } => PrimitiveType::Points,
            DrawMode::Lines { .. } => PrimitiveType::Lines,
            DrawMode::LineStrip { .. } => PrimitiveType::LineStrip,
            DrawMode::Triangles => PrimitiveType::Triangles,
            DrawMode::TriangleStrip => PrimitiveType::TriangleStrip,
        }
    }
}

/// A contiguous slice of a drawable issued as one draw call.
///
/// Offsets and lengths count vertices and `u16` indices, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Segment {
    pub vertex_offset: usize,
    pub vertex_length: usize,
    pub index_offset: usize,
    pub index_length: usize,
}

impl Segment {
    pub fn new(
        vertex_offset: usize,
        vertex_length: usize,
        index_offset: usize,
        index_length: usize,
    ) -> Self {
        Self {
            vertex_offset,
            vertex_length,
            index_offset,
            index_length,
        }
    }

    /// A segment for non-indexed drawing.
    pub fn vertices(vertex_offset: usize, vertex_length: usize) -> Self {
        Self::new(vertex_offset, vertex_length, 0, 0)
    }

    /// Byte offset of the first index in the element buffer.
    pub fn index_byte_offset(&self) -> usize {
        self.index_offset * mem::size_of::<u16>()
    }
}

/// Everything [`Context::draw`](crate::Context::draw) needs for one batch.
///
/// Holds raw names, so the referenced program and buffers must outlive
/// the draw call.
#[derive(Debug, Clone)]
pub struct Drawable<'a> {
    pub mode: DrawMode,
    pub depth_mode: DepthMode,
    pub stencil_mode: StencilMode,
    pub color_mode: ColorMode,
    pub program: ProgramId,
    pub vertex_buffer: BufferId,
    /// Size of one vertex record in bytes.
    pub vertex_stride: usize,
    pub attributes: &'static [AttributeBinding],
    /// `0` for non-indexed drawing.
    pub index_buffer: BufferId,
    pub segments: &'a [Segment],
}

impl<'a> Drawable<'a> {
    /// A non-indexed drawable with depth, stencil and blending disabled.
    pub fn new<V: Vertex>(
        mode: DrawMode,
        program: &UniqueProgram,
        vertex_buffer: &VertexBuffer<V>,
        segments: &'a [Segment],
    ) -> Self {
        Self {
            mode,
            depth_mode: DepthMode::disabled(),
            stencil_mode: StencilMode::disabled(),
            color_mode: ColorMode::unblended(),
            program: program.id(),
            vertex_buffer: vertex_buffer.id(),
            vertex_stride: vertex_buffer.stride(),
            attributes: V::ATTRIBUTES,
            index_buffer: 0,
            segments,
        }
    }

    /// An indexed drawable with depth, stencil and blending disabled.
    pub fn indexed<V: Vertex, P: Primitive>(
        mode: DrawMode,
        program: &UniqueProgram,
        vertex_buffer: &VertexBuffer<V>,
        index_buffer: &IndexBuffer<P>,
        segments: &'a [Segment],
    ) -> Self {
        Self {
            index_buffer: index_buffer.id(),
            ..Self::new(mode, program, vertex_buffer, segments)
        }
    }

    pub fn with_depth(mut self, depth_mode: DepthMode) -> Self {
        self.depth_mode = depth_mode;
        self
    }

    pub fn with_stencil(mut self, stencil_mode: StencilMode) -> Self {
        self.stencil_mode = stencil_mode;
        self
    }

    pub fn with_color(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = color_mode;
        self
    }

    pub fn is_indexed(&self) -> bool {
        self.index_buffer != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_mode_maps_to_primitive_type() {
        assert_eq!(
            DrawMode::Points { point_size: 4.0 }.primitive_type(),
            PrimitiveType::Points
        );
        assert_eq!(
            DrawMode::LineStrip { line_width: 1.0 }.primitive_type(),
            PrimitiveType::LineStrip
        );
        assert_eq!(DrawMode::TriangleStrip.primitive_type(), PrimitiveType::TriangleStrip);
    }

    #[test]
    fn index_byte_offset_counts_u16s() {
        let segment = Segment::new(0, 4, 6, 6);
        assert_eq!(segment.index_byte_offset(), 12);
    }

    #[test]
    fn vertex_segment_has_no_indices() {
        let segment = Segment::vertices(10, 3);
        assert_eq!(segment.index_length, 0);
        assert_eq!(segment.index_byte_offset(), 0);
    }
}
