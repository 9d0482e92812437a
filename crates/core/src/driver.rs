//! The graphics driver seam.
//!
//! [`Driver`] is the thin call surface the context sits on: object
//! creation/deletion, uploads, draws and one setter per render-state
//! dimension. The context never talks to the GPU any other way, so a
//! recording driver ([`HeadlessDriver`](crate::headless::HeadlessDriver))
//! can stand in for a real one in tests.

use bitflags::bitflags;
use glam::Vec4;

use crate::attribute::AttributeBinding;
use crate::color_mode::{BlendEquation, BlendFunc, ColorMask};
use crate::depth_mode::{DepthFunction, DepthRange};
use crate::object::{
    BufferId, FramebufferId, ObjectId, ProgramId, ShaderId, TextureId, VertexArrayId,
};
use crate::stencil_mode::{StencilFunc, StencilOps};
use crate::texture::{TextureFilter, TextureMipMap, TextureWrap};

/// Viewport rectangle in framebuffer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Result of a driver allocation. The error string is the driver's own
/// description of the failure.
pub type Allocation<T = ObjectId> = std::result::Result<T, String>;

bitflags! {
    /// Buffers affected by a clear.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearMask: u8 {
        const COLOR = 1;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Buffer binding point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

/// Fixed-function switches toggled through `enable`/`disable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    DepthTest,
    StencilTest,
    Blend,
}

/// Primitive topology of a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
}

/// Low-level driver calls used by [`Context`](crate::Context).
///
/// Texture calls (`tex_image_2d`, `texture_filter`, `texture_wrap`) act on
/// the texture bound to the active unit. `vertex_attrib_pointer` reads the
/// currently bound array buffer and writes into the bound vertex array.
pub trait Driver {
    fn create_program(&mut self) -> Allocation<ProgramId>;
    fn create_shader(&mut self, stage: ShaderStage) -> Allocation<ShaderId>;
    fn create_buffer(&mut self) -> Allocation<BufferId>;
    fn create_texture(&mut self) -> Allocation<TextureId>;
    fn create_vertex_array(&mut self) -> Allocation<VertexArrayId>;
    fn create_framebuffer(&mut self) -> Allocation<FramebufferId>;

    fn delete_programs(&mut self, ids: &[ProgramId]);
    fn delete_shaders(&mut self, ids: &[ShaderId]);
    fn delete_buffers(&mut self, ids: &[BufferId]);
    fn delete_textures(&mut self, ids: &[TextureId]);
    fn delete_vertex_arrays(&mut self, ids: &[VertexArrayId]);
    fn delete_framebuffers(&mut self, ids: &[FramebufferId]);

    /// Whether vertex array objects are available.
    fn supports_vertex_arrays(&self) -> bool {
        true
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]);
    /// Allocates RGBA8 storage for the bound texture, optionally filled
    /// from `pixels`.
    fn tex_image_2d(&mut self, size: [u16; 2], pixels: Option<&[u8]>);
    fn texture_filter(&mut self, filter: TextureFilter, mipmap: TextureMipMap);
    fn texture_wrap(&mut self, wrap: TextureWrap);

    /// Enables and points one attribute at the vertex `vertex_offset`
    /// records into the bound array buffer.
    fn vertex_attrib_pointer(
        &mut self,
        attribute: &AttributeBinding,
        stride: usize,
        vertex_offset: usize,
    );
    fn draw_arrays(&mut self, primitive: PrimitiveType, first: usize, count: usize);
    /// Draws `count` `u16` indices starting `byte_offset` bytes into the
    /// bound element buffer.
    fn draw_elements(&mut self, primitive: PrimitiveType, count: usize, byte_offset: usize);
    fn clear(&mut self, mask: ClearMask);

    fn bind_framebuffer(&mut self, id: FramebufferId);
    fn viewport(&mut self, viewport: Viewport);
    fn active_texture(&mut self, unit: u8);
    fn bind_texture(&mut self, id: TextureId);
    fn bind_vertex_array(&mut self, id: VertexArrayId);
    fn use_program(&mut self, id: ProgramId);
    fn bind_buffer(&mut self, target: BufferTarget, id: BufferId);
    fn set_capability(&mut self, capability: Capability, enabled: bool);

    fn stencil_func(&mut self, func: StencilFunc);
    fn stencil_mask(&mut self, mask: u32);
    fn stencil_op(&mut self, ops: StencilOps);
    fn depth_range(&mut self, range: DepthRange);
    fn depth_mask(&mut self, writable: bool);
    fn depth_func(&mut self, func: DepthFunction);
    fn blend_equation(&mut self, equation: BlendEquation);
    fn blend_func(&mut self, func: BlendFunc);
    fn blend_color(&mut self, color: Vec4);
    fn color_mask(&mut self, mask: ColorMask);
    fn clear_depth(&mut self, depth: f32);
    fn clear_color(&mut self, color: Vec4);
    fn clear_stencil(&mut self, stencil: i32);
    fn line_width(&mut self, width: f32);
    fn point_size(&mut self, size: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_mask_combines_bits() {
        let mask = ClearMask::COLOR | ClearMask::STENCIL;
        assert!(mask.contains(ClearMask::COLOR));
        assert!(!mask.contains(ClearMask::DEPTH));
        assert_eq!(ClearMask::all().bits(), 0b111);
    }

    #[test]
    fn driver_is_object_safe() {
        fn assert_object_safe(_: Option<&dyn Driver>) {}
        assert_object_safe(None);
    }
}
