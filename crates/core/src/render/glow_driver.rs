//! [`Driver`] implementation over a native `glow::Context`.

use std::num::NonZeroU32;

use glam::Vec4;
use glow::HasContext;
use log::info;

use super::convert;
use crate::attribute::AttributeBinding;
use crate::color_mode::{BlendEquation, BlendFunc, ColorMask};
use crate::depth_mode::{DepthFunction, DepthRange};
use crate::driver::{
    Allocation, BufferTarget, Capability, ClearMask, Driver, PrimitiveType, ShaderStage, Viewport,
};
use crate::object::{
    BufferId, FramebufferId, ObjectId, ProgramId, ShaderId, TextureId, VertexArrayId,
};
use crate::stencil_mode::{StencilFunc, StencilOps};
use crate::texture::{TextureFilter, TextureMipMap, TextureWrap};

fn native<T>(id: ObjectId, wrap: fn(NonZeroU32) -> T) -> Option<T> {
    NonZeroU32::new(id).map(wrap)
}

/// Issues every call on the wrapped GL context.
///
/// The context must be current on the calling thread for the lifetime of
/// this driver.
pub struct GlowDriver {
    gl: glow::Context,
    vertex_arrays: bool,
}

impl GlowDriver {
    /// Wraps `gl`, probing vertex array support from the context version
    /// and extensions.
    pub fn new(gl: glow::Context) -> Self {
        let version = gl.version();
        let extensions = gl.supported_extensions();
        let vertex_arrays = version.major >= 3
            || extensions.contains("GL_ARB_vertex_array_object")
            || extensions.contains("GL_OES_vertex_array_object");
        info!(
            "GL {}.{}{}, vertex arrays {}",
            version.major,
            version.minor,
            if version.is_embedded { " ES" } else { "" },
            if vertex_arrays { "available" } else { "unavailable" },
        );
        Self { gl, vertex_arrays }
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn into_gl(self) -> glow::Context {
        self.gl
    }
}

// SAFETY (whole impl): glow exposes raw GL entry points as unsafe. Every
// call here passes enum values from `convert` and names that were issued by
// this same context, and the context is current per the type's contract.
#[allow(unsafe_code)]
impl Driver for GlowDriver {
    fn create_program(&mut self) -> Allocation<ProgramId> {
        let created = unsafe { self.gl.create_program() };
        created.map(|p| p.0.get())
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Allocation<ShaderId> {
        let created = unsafe { self.gl.create_shader(convert::shader_stage(stage)) };
        created.map(|s| s.0.get())
    }

    fn create_buffer(&mut self) -> Allocation<BufferId> {
        let created = unsafe { self.gl.create_buffer() };
        created.map(|b| b.0.get())
    }

    fn create_texture(&mut self) -> Allocation<TextureId> {
        let created = unsafe { self.gl.create_texture() };
        created.map(|t| t.0.get())
    }

    fn create_vertex_array(&mut self) -> Allocation<VertexArrayId> {
        let created = unsafe { self.gl.create_vertex_array() };
        created.map(|v| v.0.get())
    }

    fn create_framebuffer(&mut self) -> Allocation<FramebufferId> {
        let created = unsafe { self.gl.create_framebuffer() };
        created.map(|f| f.0.get())
    }

    fn delete_programs(&mut self, ids: &[ProgramId]) {
        for program in ids.iter().filter_map(|&id| native(id, glow::NativeProgram)) {
            unsafe { self.gl.delete_program(program) };
        }
    }

    fn delete_shaders(&mut self, ids: &[ShaderId]) {
        for shader in ids.iter().filter_map(|&id| native(id, glow::NativeShader)) {
            unsafe { self.gl.delete_shader(shader) };
        }
    }

    fn delete_buffers(&mut self, ids: &[BufferId]) {
        for buffer in ids.iter().filter_map(|&id| native(id, glow::NativeBuffer)) {
            unsafe { self.gl.delete_buffer(buffer) };
        }
    }

    fn delete_textures(&mut self, ids: &[TextureId]) {
        for texture in ids.iter().filter_map(|&id| native(id, glow::NativeTexture)) {
            unsafe { self.gl.delete_texture(texture) };
        }
    }

    fn delete_vertex_arrays(&mut self, ids: &[VertexArrayId]) {
        for vao in ids.iter().filter_map(|&id| native(id, glow::NativeVertexArray)) {
            unsafe { self.gl.delete_vertex_array(vao) };
        }
    }

    fn delete_framebuffers(&mut self, ids: &[FramebufferId]) {
        for fbo in ids.iter().filter_map(|&id| native(id, glow::NativeFramebuffer)) {
            unsafe { self.gl.delete_framebuffer(fbo) };
        }
    }

    fn supports_vertex_arrays(&self) -> bool {
        self.vertex_arrays
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(convert::buffer_target(target), data, glow::STATIC_DRAW);
        }
    }

    fn tex_image_2d(&mut self, size: [u16; 2], pixels: Option<&[u8]>) {
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                i32::from(size[0]),
                i32::from(size[1]),
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(pixels),
            );
        }
    }

    fn texture_filter(&mut self, filter: TextureFilter, mipmap: TextureMipMap) {
        unsafe {
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                convert::min_filter(filter, mipmap) as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                convert::mag_filter(filter) as i32,
            );
        }
    }

    fn texture_wrap(&mut self, wrap: TextureWrap) {
        let mode = convert::wrap_mode(wrap) as i32;
        unsafe {
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, mode);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, mode);
        }
    }

    fn vertex_attrib_pointer(
        &mut self,
        attribute: &AttributeBinding,
        stride: usize,
        vertex_offset: usize,
    ) {
        unsafe {
            self.gl.enable_vertex_attrib_array(attribute.location);
            self.gl.vertex_attrib_pointer_f32(
                attribute.location,
                i32::from(attribute.components),
                convert::attribute_type(attribute.ty),
                attribute.normalized,
                stride as i32,
                attribute.byte_offset(stride, vertex_offset) as i32,
            );
        }
    }

    fn draw_arrays(&mut self, primitive: PrimitiveType, first: usize, count: usize) {
        unsafe {
            self.gl
                .draw_arrays(convert::primitive_mode(primitive), first as i32, count as i32);
        }
    }

    fn draw_elements(&mut self, primitive: PrimitiveType, count: usize, byte_offset: usize) {
        unsafe {
            self.gl.draw_elements(
                convert::primitive_mode(primitive),
                count as i32,
                glow::UNSIGNED_SHORT,
                byte_offset as i32,
            );
        }
    }

    fn clear(&mut self, mask: ClearMask) {
        unsafe { self.gl.clear(convert::clear_bits(mask)) };
    }

    fn bind_framebuffer(&mut self, id: FramebufferId) {
        let fbo = native(id, glow::NativeFramebuffer);
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, fbo) };
    }

    fn viewport(&mut self, viewport: Viewport) {
        unsafe {
            self.gl.viewport(
                viewport.x,
                viewport.y,
                viewport.width as i32,
                viewport.height as i32,
            );
        }
    }

    fn active_texture(&mut self, unit: u8) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + u32::from(unit)) };
    }

    fn bind_texture(&mut self, id: TextureId) {
        let texture = native(id, glow::NativeTexture);
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture) };
    }

    fn bind_vertex_array(&mut self, id: VertexArrayId) {
        let vao = native(id, glow::NativeVertexArray);
        unsafe { self.gl.bind_vertex_array(vao) };
    }

    fn use_program(&mut self, id: ProgramId) {
        let program = native(id, glow::NativeProgram);
        unsafe { self.gl.use_program(program) };
    }

    fn bind_buffer(&mut self, target: BufferTarget, id: BufferId) {
        let buffer = native(id, glow::NativeBuffer);
        unsafe { self.gl.bind_buffer(convert::buffer_target(target), buffer) };
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        let cap = convert::capability(capability);
        unsafe {
            if enabled {
                self.gl.enable(cap);
            } else {
                self.gl.disable(cap);
            }
        }
    }

    fn stencil_func(&mut self, func: StencilFunc) {
        unsafe {
            self.gl.stencil_func(
                convert::stencil_function(func.func),
                func.reference,
                func.mask,
            );
        }
    }

    fn stencil_mask(&mut self, mask: u32) {
        unsafe { self.gl.stencil_mask(mask) };
    }

    fn stencil_op(&mut self, ops: StencilOps) {
        unsafe {
            self.gl.stencil_op(
                convert::stencil_op(ops.fail),
                convert::stencil_op(ops.depth_fail),
                convert::stencil_op(ops.pass),
            );
        }
    }

    fn depth_range(&mut self, range: DepthRange) {
        unsafe { self.gl.depth_range_f32(range.near, range.far) };
    }

    fn depth_mask(&mut self, writable: bool) {
        unsafe { self.gl.depth_mask(writable) };
    }

    fn depth_func(&mut self, func: DepthFunction) {
        unsafe { self.gl.depth_func(convert::depth_function(func)) };
    }

    fn blend_equation(&mut self, equation: BlendEquation) {
        unsafe { self.gl.blend_equation(convert::blend_equation(equation)) };
    }

    fn blend_func(&mut self, func: BlendFunc) {
        unsafe {
            self.gl
                .blend_func(convert::blend_factor(func.src), convert::blend_factor(func.dst));
        }
    }

    fn blend_color(&mut self, color: Vec4) {
        unsafe { self.gl.blend_color(color.x, color.y, color.z, color.w) };
    }

    fn color_mask(&mut self, mask: ColorMask) {
        unsafe { self.gl.color_mask(mask.r, mask.g, mask.b, mask.a) };
    }

    fn clear_depth(&mut self, depth: f32) {
        unsafe { self.gl.clear_depth_f32(depth) };
    }

    fn clear_color(&mut self, color: Vec4) {
        unsafe { self.gl.clear_color(color.x, color.y, color.z, color.w) };
    }

    fn clear_stencil(&mut self, stencil: i32) {
        unsafe { self.gl.clear_stencil(stencil) };
    }

    fn line_width(&mut self, width: f32) {
        unsafe { self.gl.line_width(width) };
    }

    // Point size comes from `gl_PointSize` in the vertex shader.
    fn point_size(&mut self, _size: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_maps_zero_to_none() {
        assert!(native(0, glow::NativeBuffer).is_none());
        assert_eq!(
            native(7, glow::NativeBuffer).map(|b| b.0.get()),
            Some(7)
        );
    }

    #[test]
    fn glow_driver_compiles_with_expected_api() {
        fn _assert_api(driver: &GlowDriver) {
            let _gl: &glow::Context = driver.gl();
            let _vaos: bool = driver.supports_vertex_arrays();
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn context_over_glow_creates_and_deletes_objects() {
        // Would test: Context::new(GlowDriver::new(gl)) round-trips a
        // texture through create, drop and perform_cleanup.
    }
}
