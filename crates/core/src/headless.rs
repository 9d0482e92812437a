//! A driver that records calls instead of rendering.
//!
//! Used by the test suite and by the `strata simulate` command. Names are
//! handed out per kind starting at 1; deleted names become available again,
//! lowest first, the way GL implementations commonly reuse them.

use std::collections::BTreeSet;

use glam::Vec4;

use crate::attribute::AttributeBinding;
use crate::color_mode::{BlendEquation, BlendFunc, ColorMask};
use crate::depth_mode::{DepthFunction, DepthRange};
use crate::driver::{
    Allocation, BufferTarget, Capability, ClearMask, Driver, PrimitiveType, ShaderStage, Viewport,
};
use crate::object::{
    BufferId, FramebufferId, ObjectId, ObjectKind, ProgramId, ShaderId, TextureId, VertexArrayId,
};
use crate::stencil_mode::{StencilFunc, StencilOps};
use crate::texture::{TextureFilter, TextureMipMap, TextureWrap};

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create { kind: ObjectKind, id: ObjectId },
    Delete { kind: ObjectKind, ids: Vec<ObjectId> },
    BufferData { target: BufferTarget, len: usize },
    TexImage2D { size: [u16; 2], has_pixels: bool },
    TextureFilter { filter: TextureFilter, mipmap: TextureMipMap },
    TextureWrap(TextureWrap),
    VertexAttribPointer { location: u32, stride: usize, byte_offset: usize },
    DrawArrays { primitive: PrimitiveType, first: usize, count: usize },
    DrawElements { primitive: PrimitiveType, count: usize, byte_offset: usize },
    Clear(ClearMask),
    BindFramebuffer(FramebufferId),
    Viewport(Viewport),
    ActiveTexture(u8),
    BindTexture(TextureId),
    BindVertexArray(VertexArrayId),
    UseProgram(ProgramId),
    BindBuffer { target: BufferTarget, id: BufferId },
    SetCapability { capability: Capability, enabled: bool },
    StencilFunc(StencilFunc),
    StencilMask(u32),
    StencilOp(StencilOps),
    DepthRange(DepthRange),
    DepthMask(bool),
    DepthFunc(DepthFunction),
    BlendEquation(BlendEquation),
    BlendFunc(BlendFunc),
    BlendColor(Vec4),
    ColorMask(ColorMask),
    ClearDepth(f32),
    ClearColor(Vec4),
    ClearStencil(i32),
    LineWidth(f32),
    PointSize(f32),
}

impl Call {
    /// Short stable name, used for call histograms.
    pub fn name(&self) -> &'static str {
        match self {
            Call::Create { .. } => "create",
            Call::Delete { .. } => "delete",
            Call::BufferData { .. } => "buffer_data",
            Call::TexImage2D { .. } => "tex_image_2d",
            Call::TextureFilter { .. } => "texture_filter",
            Call::TextureWrap(_) => "texture_wrap",
            Call::VertexAttribPointer { .. } => "vertex_attrib_pointer",
            Call::DrawArrays { .. } => "draw_arrays",
            Call::DrawElements { .. } => "draw_elements",
            Call::Clear(_) => "clear",
            Call::BindFramebuffer(_) => "bind_framebuffer",
            Call::Viewport(_) => "viewport",
            Call::ActiveTexture(_) => "active_texture",
            Call::BindTexture(_) => "bind_texture",
            Call::BindVertexArray(_) => "bind_vertex_array",
            Call::UseProgram(_) => "use_program",
            Call::BindBuffer { .. } => "bind_buffer",
            Call::SetCapability { .. } => "set_capability",
            Call::StencilFunc(_) => "stencil_func",
            Call::StencilMask(_) => "stencil_mask",
            Call::StencilOp(_) => "stencil_op",
            Call::DepthRange(_) => "depth_range",
            Call::DepthMask(_) => "depth_mask",
            Call::DepthFunc(_) => "depth_func",
            Call::BlendEquation(_) => "blend_equation",
            Call::BlendFunc(_) => "blend_func",
            Call::BlendColor(_) => "blend_color",
            Call::ColorMask(_) => "color_mask",
            Call::ClearDepth(_) => "clear_depth",
            Call::ClearColor(_) => "clear_color",
            Call::ClearStencil(_) => "clear_stencil",
            Call::LineWidth(_) => "line_width",
            Call::PointSize(_) => "point_size",
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, Call::DrawArrays { .. } | Call::DrawElements { .. })
    }
}

#[derive(Debug, Default)]
struct NameAllocator {
    next: ObjectId,
    free: BTreeSet<ObjectId>,
    live: BTreeSet<ObjectId>,
}

impl NameAllocator {
    fn allocate(&mut self) -> ObjectId {
        let id = match self.free.pop_first() {
            Some(id) => id,
            None => {
                self.next += 1;
                self.next
            }
        };
        self.live.insert(id);
        id
    }

    /// Returns `false` if `id` was not live.
    fn release(&mut self, id: ObjectId) -> bool {
        if self.live.remove(&id) {
            self.free.insert(id);
            true
        } else {
            false
        }
    }
}

/// Recording [`Driver`] with no GPU behind it.
#[derive(Debug)]
pub struct HeadlessDriver {
    calls: Vec<Call>,
    names: [NameAllocator; 6],
    failing: [bool; 6],
    vertex_arrays: bool,
    invalid_deletes: usize,
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDriver {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            names: Default::default(),
            failing: [false; 6],
            vertex_arrays: true,
            invalid_deletes: 0,
        }
    }

    /// A driver that reports no vertex array support.
    pub fn without_vertex_arrays() -> Self {
        Self {
            vertex_arrays: false,
            ..Self::new()
        }
    }

    /// Makes every subsequent allocation of `kind` fail (or succeed again).
    pub fn fail_allocations(&mut self, kind: ObjectKind, fail: bool) {
        self.failing[kind.index()] = fail;
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn count_calls(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn is_live(&self, kind: ObjectKind, id: ObjectId) -> bool {
        self.names[kind.index()].live.contains(&id)
    }

    pub fn live_count(&self, kind: ObjectKind) -> usize {
        self.names[kind.index()].live.len()
    }

    /// Number of deletes that named an object which was not live.
    pub fn invalid_deletes(&self) -> usize {
        self.invalid_deletes
    }

    fn allocate(&mut self, kind: ObjectKind) -> Allocation {
        if self.failing[kind.index()] {
            return Err(format!("{kind} allocation disabled"));
        }
        let id = self.names[kind.index()].allocate();
        self.calls.push(Call::Create { kind, id });
        Ok(id)
    }

    fn delete(&mut self, kind: ObjectKind, ids: &[ObjectId]) {
        for &id in ids {
            if !self.names[kind.index()].release(id) {
                self.invalid_deletes += 1;
            }
        }
        self.calls.push(Call::Delete {
            kind,
            ids: ids.to_vec(),
        });
    }
}

impl Driver for HeadlessDriver {
    fn create_program(&mut self) -> Allocation<ProgramId> {
        self.allocate(ObjectKind::Program)
    }

    fn create_shader(&mut self, _stage: ShaderStage) -> Allocation<ShaderId> {
        self.allocate(ObjectKind::Shader)
    }

    fn create_buffer(&mut self) -> Allocation<BufferId> {
        self.allocate(ObjectKind::Buffer)
    }

    fn create_texture(&mut self) -> Allocation<TextureId> {
        self.allocate(ObjectKind::Texture)
    }

    fn create_vertex_array(&mut self) -> Allocation<VertexArrayId> {
        if !self.vertex_arrays {
            return Err("vertex arrays unsupported".into());
        }
        self.allocate(ObjectKind::VertexArray)
    }

    fn create_framebuffer(&mut self) -> Allocation<FramebufferId> {
        self.allocate(ObjectKind::Framebuffer)
    }

    fn delete_programs(&mut self, ids: &[ProgramId]) {
        self.delete(ObjectKind::Program, ids);
    }

    fn delete_shaders(&mut self, ids: &[ShaderId]) {
        self.delete(ObjectKind::Shader, ids);
    }

    fn delete_buffers(&mut self, ids: &[BufferId]) {
        self.delete(ObjectKind::Buffer, ids);
    }

    fn delete_textures(&mut self, ids: &[TextureId]) {
        self.delete(ObjectKind::Texture, ids);
    }

    fn delete_vertex_arrays(&mut self, ids: &[VertexArrayId]) {
        self.delete(ObjectKind::VertexArray, ids);
    }

    fn delete_framebuffers(&mut self, ids: &[FramebufferId]) {
        self.delete(ObjectKind::Framebuffer, ids);
    }

    fn supports_vertex_arrays(&self) -> bool {
        self.vertex_arrays
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]) {
        self.calls.push(Call::BufferData {
            target,
            len: data.len(),
        });
    }

    fn tex_image_2d(&mut self, size: [u16; 2], pixels: Option<&[u8]>) {
        self.calls.push(Call::TexImage2D {
            size,
            has_pixels: pixels.is_some(),
        });
    }

    fn texture_filter(&mut self, filter: TextureFilter, mipmap: TextureMipMap) {
        self.calls.push(Call::TextureFilter { filter, mipmap });
    }

    fn texture_wrap(&mut self, wrap: TextureWrap) {
        self.calls.push(Call::TextureWrap(wrap));
    }

    fn vertex_attrib_pointer(
        &mut self,
        attribute: &AttributeBinding,
        stride: usize,
        vertex_offset: usize,
    ) {
        self.calls.push(Call::VertexAttribPointer {
            location: attribute.location,
            stride,
            byte_offset: attribute.byte_offset(stride, vertex_offset),
        });
    }

    fn draw_arrays(&mut self, primitive: PrimitiveType, first: usize, count: usize) {
        self.calls.push(Call::DrawArrays {
            primitive,
            first,
            count,
        });
    }

    fn draw_elements(&mut self, primitive: PrimitiveType, count: usize, byte_offset: usize) {
        self.calls.push(Call::DrawElements {
            primitive,
            count,
            byte_offset,
        });
    }

    fn clear(&mut self, mask: ClearMask) {
        self.calls.push(Call::Clear(mask));
    }

    fn bind_framebuffer(&mut self, id: FramebufferId) {
        self.calls.push(Call::BindFramebuffer(id));
    }

    fn viewport(&mut self, viewport: Viewport) {
        self.calls.push(Call::Viewport(viewport));
    }

    fn active_texture(&mut self, unit: u8) {
        self.calls.push(Call::ActiveTexture(unit));
    }

    fn bind_texture(&mut self, id: TextureId) {
        self.calls.push(Call::BindTexture(id));
    }

    fn bind_vertex_array(&mut self, id: VertexArrayId) {
        self.calls.push(Call::BindVertexArray(id));
    }

    fn use_program(&mut self, id: ProgramId) {
        self.calls.push(Call::UseProgram(id));
    }

    fn bind_buffer(&mut self, target: BufferTarget, id: BufferId) {
        self.calls.push(Call::BindBuffer { target, id });
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        self.calls.push(Call::SetCapability {
            capability,
            enabled,
        });
    }

    fn stencil_func(&mut self, func: StencilFunc) {
        self.calls.push(Call::StencilFunc(func));
    }

    fn stencil_mask(&mut self, mask: u32) {
        self.calls.push(Call::StencilMask(mask));
    }

    fn stencil_op(&mut self, ops: StencilOps) {
        self.calls.push(Call::StencilOp(ops));
    }

    fn depth_range(&mut self, range: DepthRange) {
        self.calls.push(Call::DepthRange(range));
    }

    fn depth_mask(&mut self, writable: bool) {
        self.calls.push(Call::DepthMask(writable));
    }

    fn depth_func(&mut self, func: DepthFunction) {
        self.calls.push(Call::DepthFunc(func));
    }

    fn blend_equation(&mut self, equation: BlendEquation) {
        self.calls.push(Call::BlendEquation(equation));
    }

    fn blend_func(&mut self, func: BlendFunc) {
        self.calls.push(Call::BlendFunc(func));
    }

    fn blend_color(&mut self, color: Vec4) {
        self.calls.push(Call::BlendColor(color));
    }

    fn color_mask(&mut self, mask: ColorMask) {
        self.calls.push(Call::ColorMask(mask));
    }

    fn clear_depth(&mut self, depth: f32) {
        self.calls.push(Call::ClearDepth(depth));
    }

    fn clear_color(&mut self, color: Vec4) {
        self.calls.push(Call::ClearColor(color));
    }

    fn clear_stencil(&mut self, stencil: i32) {
        self.calls.push(Call::ClearStencil(stencil));
    }

    fn line_width(&mut self, width: f32) {
        self.calls.push(Call::LineWidth(width));
    }

    fn point_size(&mut self, size: f32) {
        self.calls.push(Call::PointSize(size));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_start_at_one_per_kind() {
        let mut d = HeadlessDriver::new();
        assert_eq!(d.create_program(), Ok(1));
        assert_eq!(d.create_program(), Ok(2));
        assert_eq!(d.create_buffer(), Ok(1));
    }

    #[test]
    fn deleted_names_are_reused_lowest_first() {
        let mut d = HeadlessDriver::new();
        let ids: Vec<_> = (0..4).map(|_| d.create_texture().unwrap()).collect();
        d.delete_textures(&[ids[2], ids[0]]);

        assert_eq!(d.create_texture(), Ok(ids[0]));
        assert_eq!(d.create_texture(), Ok(ids[2]));
        assert_eq!(d.create_texture(), Ok(5));
        assert_eq!(d.invalid_deletes(), 0);
    }

    #[test]
    fn deleting_dead_name_is_counted() {
        let mut d = HeadlessDriver::new();
        let id = d.create_buffer().unwrap();
        d.delete_buffers(&[id]);
        d.delete_buffers(&[id]);
        assert_eq!(d.invalid_deletes(), 1);
        assert!(!d.is_live(ObjectKind::Buffer, id));
    }

    #[test]
    fn failure_injection_is_per_kind() {
        let mut d = HeadlessDriver::new();
        d.fail_allocations(ObjectKind::Texture, true);
        assert!(d.create_texture().is_err());
        assert!(d.create_program().is_ok());

        d.fail_allocations(ObjectKind::Texture, false);
        assert!(d.create_texture().is_ok());
    }

    #[test]
    fn driver_without_vertex_arrays_refuses_them() {
        let mut d = HeadlessDriver::without_vertex_arrays();
        assert!(!d.supports_vertex_arrays());
        assert!(d.create_vertex_array().is_err());
    }

    #[test]
    fn calls_are_recorded_in_order() {
        let mut d = HeadlessDriver::new();
        d.use_program(3);
        d.clear(ClearMask::COLOR);
        d.draw_arrays(PrimitiveType::Triangles, 0, 3);

        assert_eq!(
            d.calls(),
            &[
                Call::UseProgram(3),
                Call::Clear(ClearMask::COLOR),
                Call::DrawArrays {
                    primitive: PrimitiveType::Triangles,
                    first: 0,
                    count: 3,
                },
            ]
        );
        assert_eq!(d.count_calls(Call::is_draw), 1);
        assert_eq!(d.take_calls().len(), 3);
        assert!(d.calls().is_empty());
    }
}
