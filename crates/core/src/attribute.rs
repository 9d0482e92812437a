//! Vertex attribute layout.
//!
//! A [`Vertex`] type lists the attributes packed into one vertex record. The
//! context turns each entry into one attribute-pointer call when it has to
//! (re)configure a vertex array.

/// Scalar type of one attribute component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    I8,
    U8,
    I16,
    U16,
    F32,
}

impl AttributeType {
    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            AttributeType::I8 | AttributeType::U8 => 1,
            AttributeType::I16 | AttributeType::U16 => 2,
            AttributeType::F32 => 4,
        }
    }
}

/// Where one attribute lives inside a vertex record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeBinding {
    /// Shader input location.
    pub location: u32,
    /// Number of components (1 to 4).
    pub components: u8,
    pub ty: AttributeType,
    /// Map integer components onto `[0, 1]` / `[-1, 1]`.
    pub normalized: bool,
    /// Byte offset of the attribute inside the vertex record.
    pub offset: usize,
}

impl AttributeBinding {
    pub const fn new(location: u32, components: u8, ty: AttributeType, offset: usize) -> Self {
        Self {
            location,
            components,
            ty,
            normalized: false,
            offset,
        }
    }

    pub const fn normalized(mut self) -> Self {
        self.normalized = true;
        self
    }

    /// Byte offset of this attribute for the vertex at `vertex_offset` in a
    /// buffer of `stride`-byte records.
    pub fn byte_offset(&self, stride: usize, vertex_offset: usize) -> usize {
        self.offset + stride * vertex_offset
    }
}

/// A plain-old-data vertex record with a fixed attribute layout.
pub trait Vertex: bytemuck::Pod {
    const ATTRIBUTES: &'static [AttributeBinding];
}
