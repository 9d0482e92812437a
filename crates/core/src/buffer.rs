//! Typed vertex and index buffers.
//!
//! The element type only fixes byte sizes and layout; the driver buffer
//! itself stores bytes.

use std::marker::PhantomData;
use std::mem;

use bytemuck::{Pod, Zeroable};

use crate::attribute::Vertex;
use crate::object::{BufferId, UniqueBuffer};

/// A group of `u16` indices forming one primitive.
pub trait Primitive: Pod {
    /// Indices per primitive.
    const INDEX_COUNT: usize;
}

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Point(pub [u16; 1]);

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Line(pub [u16; 2]);

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Triangle(pub [u16; 3]);

impl Primitive for Point {
    const INDEX_COUNT: usize = 1;
}

impl Primitive for Line {
    const INDEX_COUNT: usize = 2;
}

impl Primitive for Triangle {
    const INDEX_COUNT: usize = 3;
}

/// Vertices of type `V` uploaded to a driver buffer.
#[derive(Debug)]
pub struct VertexBuffer<V: Vertex> {
    element_count: usize,
    buffer: UniqueBuffer,
    _vertex: PhantomData<fn() -> V>,
}

impl<V: Vertex> VertexBuffer<V> {
    pub(crate) fn new(element_count: usize, buffer: UniqueBuffer) -> Self {
        Self {
            element_count,
            buffer,
            _vertex: PhantomData,
        }
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Size of one vertex record in bytes.
    pub fn stride(&self) -> usize {
        mem::size_of::<V>()
    }

    pub fn byte_len(&self) -> usize {
        self.element_count * self.stride()
    }

    pub fn id(&self) -> BufferId {
        self.buffer.id()
    }

    pub fn buffer(&self) -> &UniqueBuffer {
        &self.buffer
    }
}

/// Primitives of type `P` uploaded to a driver element buffer.
#[derive(Debug)]
pub struct IndexBuffer<P: Primitive> {
    primitive_count: usize,
    buffer: UniqueBuffer,
    _primitive: PhantomData<fn() -> P>,
}

impl<P: Primitive> IndexBuffer<P> {
    pub(crate) fn new(primitive_count: usize, buffer: UniqueBuffer) -> Self {
        Self {
            primitive_count,
            buffer,
            _primitive: PhantomData,
        }
    }

    pub fn primitive_count(&self) -> usize {
        self.primitive_count
    }

    pub fn index_count(&self) -> usize {
        self.primitive_count * P::INDEX_COUNT
    }

    /// Size of one primitive in bytes.
    pub fn primitive_size(&self) -> usize {
        mem::size_of::<P>()
    }

    pub fn id(&self) -> BufferId {
        self.buffer.id()
    }

    pub fn buffer(&self) -> &UniqueBuffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_sizes_match_index_counts() {
        assert_eq!(mem::size_of::<Point>(), 2 * Point::INDEX_COUNT);
        assert_eq!(mem::size_of::<Line>(), 2 * Line::INDEX_COUNT);
        assert_eq!(mem::size_of::<Triangle>(), 2 * Triangle::INDEX_COUNT);
    }

    #[test]
    fn triangles_cast_to_contiguous_indices() {
        let tris = [Triangle([0, 1, 2]), Triangle([2, 1, 3])];
        let indices: &[u16] = bytemuck::cast_slice(&tris);
        assert_eq!(indices, &[0, 1, 2, 2, 1, 3]);
    }
}
