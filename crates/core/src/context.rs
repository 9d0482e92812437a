//! The per-thread GPU session.
//!
//! [`Context`] creates every driver object, shadows driver state in
//! [`State`](crate::state::State) cells, caches vertex arrays and reclaims
//! dropped objects in batches.

use std::sync::Arc;

use glam::Vec4;
use log::{debug, trace, warn};
use serde::Serialize;

use crate::attribute::Vertex;
use crate::buffer::{IndexBuffer, Primitive, VertexBuffer};
use crate::color_mode::{BlendFunc, BlendFunction, ColorMask, ColorMode};
use crate::config::ContextConfig;
use crate::depth_mode::DepthMode;
use crate::drawable::{DrawMode, Drawable, Segment};
use crate::driver::{BufferTarget, ClearMask, Driver, PrimitiveType, ShaderStage, Viewport};
use crate::error::{GlError, Result};
use crate::object::{
    FramebufferId, Object, ObjectId, ObjectKind, ProgramId, Unique, UniqueBuffer,
    UniqueFramebuffer, UniqueProgram, UniqueShader, UniqueTexture, UniqueVertexArray,
};
use crate::recycler::{Recycler, SharedRecycler};
use crate::state::RenderState;
use crate::stencil_mode::StencilMode;
use crate::texture::{Image, Texture, TextureFilter, TextureMipMap, TextureWrap};
use crate::vertex_array::{VertexArrayCache, VertexArrayKey};

/// Per-kind counts of names awaiting deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AbandonedCounts {
    pub programs: usize,
    pub shaders: usize,
    pub buffers: usize,
    pub textures: usize,
    pub vertex_arrays: usize,
    pub framebuffers: usize,
}

/// Snapshot of the context's reclamation bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextStats {
    pub pooled_textures: usize,
    pub abandoned: AbandonedCounts,
    pub cached_vertex_arrays: usize,
}

/// GPU resource factory and render-state shadow for one driver context.
///
/// Not thread-safe; objects it creates may still be dropped elsewhere.
pub struct Context<D: Driver> {
    driver: D,
    config: ContextConfig,
    recycler: SharedRecycler,
    vertex_arrays: VertexArrayCache,
    state: RenderState,
}

impl<D: Driver> Context<D> {
    pub fn new(driver: D) -> Self {
        let config = ContextConfig::default();
        Self {
            recycler: Recycler::shared(config.texture_pool_capacity),
            vertex_arrays: VertexArrayCache::default(),
            state: RenderState::new(config.texture_units),
            driver,
            config,
        }
    }

    /// # Errors
    ///
    /// Returns `GlError::InvalidConfig` if `config` fails validation.
    pub fn with_config(driver: D, config: ContextConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            recycler: Recycler::shared(config.texture_pool_capacity),
            vertex_arrays: VertexArrayCache::default(),
            state: RenderState::new(config.texture_units),
            driver,
            config,
        })
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Direct driver access. State changed this way is invisible to the
    /// context; call [`set_dirty_state`](Self::set_dirty_state) afterwards.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    fn wrap<K: Object>(
        &self,
        created: std::result::Result<ObjectId, String>,
    ) -> Result<Unique<K>> {
        let reason = match created {
            Ok(0) => "driver returned the reserved name 0".to_owned(),
            Ok(id) => return Ok(Unique::new(id, Arc::clone(&self.recycler))),
            Err(reason) => reason,
        };
        warn!("failed to allocate {}: {reason}", K::KIND);
        Err(GlError::Allocation {
            kind: K::KIND,
            reason,
        })
    }

    pub fn create_program(&mut self) -> Result<UniqueProgram> {
        let created = self.driver.create_program();
        self.wrap(created)
    }

    pub fn create_vertex_shader(&mut self) -> Result<UniqueShader> {
        let created = self.driver.create_shader(ShaderStage::Vertex);
        self.wrap(created)
    }

    pub fn create_fragment_shader(&mut self) -> Result<UniqueShader> {
        let created = self.driver.create_shader(ShaderStage::Fragment);
        self.wrap(created)
    }

    pub fn create_framebuffer(&mut self) -> Result<UniqueFramebuffer> {
        let created = self.driver.create_framebuffer();
        self.wrap(created)
    }

    /// Uploads `vertices` into a new buffer bound through the array-buffer
    /// cell.
    pub fn create_vertex_buffer<V: Vertex>(&mut self, vertices: Vec<V>) -> Result<VertexBuffer<V>> {
        let created = self.driver.create_buffer();
        let buffer: UniqueBuffer = self.wrap(created)?;
        self.state.vertex_buffer.set(&mut self.driver, buffer.id());
        self.driver
            .buffer_data(BufferTarget::Array, bytemuck::cast_slice(vertices.as_slice()));
        Ok(VertexBuffer::new(vertices.len(), buffer))
    }

    /// Uploads `primitives` into a new element buffer.
    ///
    /// Vertex array 0 is bound first so the element binding does not end up
    /// inside a cached vertex array.
    pub fn create_index_buffer<P: Primitive>(
        &mut self,
        primitives: Vec<P>,
    ) -> Result<IndexBuffer<P>> {
        let created = self.driver.create_buffer();
        let buffer: UniqueBuffer = self.wrap(created)?;
        if self.driver.supports_vertex_arrays() {
            self.state.vertex_array.set(&mut self.driver, 0);
            // The cell tracked the previous vertex array's element binding.
            self.state.element_buffer.set_dirty();
        }
        self.state.element_buffer.set(&mut self.driver, buffer.id());
        self.driver
            .buffer_data(BufferTarget::ElementArray, bytemuck::cast_slice(primitives.as_slice()));
        Ok(IndexBuffer::new(primitives.len(), buffer))
    }

    fn texture_slot(&self, unit: u8) -> Result<usize> {
        if unit >= self.config.texture_units {
            return Err(GlError::InvalidTextureUnit {
                unit,
                available: self.config.texture_units,
            });
        }
        Ok(usize::from(unit))
    }

    /// Makes `unit` active and binds `id` on it through the cells.
    fn bind_on_unit(&mut self, slot: usize, unit: u8, id: ObjectId) {
        self.state.active_texture.set(&mut self.driver, unit);
        self.state.texture[slot].set(&mut self.driver, id);
    }

    fn create_texture_object(
        &mut self,
        size: [u16; 2],
        pixels: Option<&[u8]>,
        unit: u8,
    ) -> Result<UniqueTexture> {
        let slot = self.texture_slot(unit)?;
        let pooled = self.recycler.lock().take_pooled_texture();
        let texture = match pooled {
            Some(id) => {
                trace!("reusing pooled texture {id}");
                Unique::new(id, Arc::clone(&self.recycler))
            }
            None => {
                let created = self.driver.create_texture();
                self.wrap(created)?
            }
        };
        self.bind_on_unit(slot, unit, texture.id());
        self.driver
            .texture_filter(TextureFilter::Nearest, TextureMipMap::No);
        self.driver.texture_wrap(TextureWrap::Clamp);
        self.driver.tex_image_2d(size, pixels);
        Ok(texture)
    }

    /// Creates a texture holding `image`, left bound on `unit`.
    pub fn create_texture(&mut self, image: &Image, unit: u8) -> Result<Texture> {
        let size = image.size();
        let texture = self.create_texture_object(size, Some(image.data()), unit)?;
        Ok(Texture::new(size, texture))
    }

    /// Creates a texture with uninitialized storage, for rendering into.
    pub fn create_empty_texture(&mut self, size: [u16; 2], unit: u8) -> Result<Texture> {
        let texture = self.create_texture_object(size, None, unit)?;
        Ok(Texture::new(size, texture))
    }

    /// Replaces the contents of `texture` with `image`.
    pub fn update_texture(&mut self, texture: &mut Texture, image: &Image, unit: u8) -> Result<()> {
        let slot = self.texture_slot(unit)?;
        self.bind_on_unit(slot, unit, texture.id());
        self.driver.tex_image_2d(image.size(), Some(image.data()));
        texture.size = image.size();
        Ok(())
    }

    /// Binds `texture` on `unit` with the requested sampling.
    ///
    /// Sampling parameters are only issued when they differ from those last
    /// applied to this texture.
    pub fn bind_texture(
        &mut self,
        texture: &mut Texture,
        unit: u8,
        filter: TextureFilter,
        mipmap: TextureMipMap,
    ) -> Result<()> {
        let slot = self.texture_slot(unit)?;
        if filter != texture.filter || mipmap != texture.mipmap {
            self.bind_on_unit(slot, unit, texture.id());
            self.driver.texture_filter(filter, mipmap);
            texture.filter = filter;
            texture.mipmap = mipmap;
        } else if !self.state.texture[slot].holds(texture.id()) {
            self.bind_on_unit(slot, unit, texture.id());
        }
        Ok(())
    }

    pub fn bind_framebuffer(&mut self, id: FramebufferId) {
        self.state.bind_framebuffer.set(&mut self.driver, id);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.state.viewport.set(&mut self.driver, viewport);
    }

    pub fn set_program(&mut self, id: ProgramId) {
        self.state.program.set(&mut self.driver, id);
    }

    pub fn set_active_texture(&mut self, unit: u8) -> Result<()> {
        self.texture_slot(unit)?;
        self.state.active_texture.set(&mut self.driver, unit);
        Ok(())
    }

    /// Clears the buffers whose value is given. With none given, nothing is
    /// issued.
    pub fn clear(&mut self, color: Option<Vec4>, depth: Option<f32>, stencil: Option<i32>) {
        let mut mask = ClearMask::empty();
        if let Some(color) = color {
            mask |= ClearMask::COLOR;
            self.state.clear_color.set(&mut self.driver, color);
            self.state.color_mask.set(&mut self.driver, ColorMask::ALL);
        }
        if let Some(depth) = depth {
            mask |= ClearMask::DEPTH;
            self.state.clear_depth.set(&mut self.driver, depth);
            self.state.depth_mask.set(&mut self.driver, true);
        }
        if let Some(stencil) = stencil {
            mask |= ClearMask::STENCIL;
            self.state.clear_stencil.set(&mut self.driver, stencil);
            self.state.stencil_mask.set(&mut self.driver, 0xFF);
        }
        if !mask.is_empty() {
            self.driver.clear(mask);
        }
    }

    pub fn set_depth(&mut self, depth: &DepthMode) {
        if depth.is_disabled() {
            self.state.depth_test.set(&mut self.driver, false);
        } else {
            self.state.depth_test.set(&mut self.driver, true);
            self.state.depth_func.set(&mut self.driver, depth.func);
            self.state
                .depth_mask
                .set(&mut self.driver, depth.mask.is_writable());
            self.state.depth_range.set(&mut self.driver, depth.range);
        }
    }

    pub fn set_stencil(&mut self, stencil: &StencilMode) {
        if stencil.is_disabled() {
            self.state.stencil_test.set(&mut self.driver, false);
        } else {
            self.state.stencil_test.set(&mut self.driver, true);
            self.state.stencil_mask.set(&mut self.driver, stencil.mask);
            self.state.stencil_op.set(&mut self.driver, stencil.ops());
            self.state.stencil_func.set(&mut self.driver, stencil.func());
        }
    }

    pub fn set_color(&mut self, color: &ColorMode) {
        match color.blend_function {
            BlendFunction::Replace => {
                self.state.blend.set(&mut self.driver, false);
            }
            BlendFunction::Blend { equation, src, dst } => {
                self.state.blend.set(&mut self.driver, true);
                self.state.blend_color.set(&mut self.driver, color.blend_color);
                self.state.blend_equation.set(&mut self.driver, equation);
                self.state
                    .blend_func
                    .set(&mut self.driver, BlendFunc { src, dst });
            }
        }
        self.state.color_mask.set(&mut self.driver, color.mask);
    }

    fn apply_draw_mode(&mut self, mode: DrawMode) -> PrimitiveType {
        match mode {
            DrawMode::Points { point_size } => {
                self.state.point_size.set(&mut self.driver, point_size);
            }
            DrawMode::Lines { line_width } | DrawMode::LineStrip { line_width } => {
                self.state.line_width.set(&mut self.driver, line_width);
            }
            DrawMode::Triangles | DrawMode::TriangleStrip => {}
        }
        mode.primitive_type()
    }

    /// Binds the vertex array for `segment`, creating it on a miss. Returns
    /// whether buffers and attribute pointers must be configured.
    fn bind_vertex_array(&mut self, drawable: &Drawable<'_>, segment: &Segment) -> Result<bool> {
        if !self.driver.supports_vertex_arrays() {
            return Ok(true);
        }
        if !self.config.vertex_array_cache {
            self.state.vertex_array.set(&mut self.driver, 0);
            return Ok(true);
        }

        let key = VertexArrayKey {
            program: drawable.program,
            vertex_buffer: drawable.vertex_buffer,
            index_buffer: drawable.index_buffer,
            vertex_offset: segment.vertex_offset,
        };
        if let Some(id) = self.vertex_arrays.get(&key) {
            self.state.vertex_array.set(&mut self.driver, id);
            // Binding the array also restores its element buffer.
            self.state.element_buffer.assume(key.index_buffer);
            return Ok(false);
        }

        let created = self.driver.create_vertex_array();
        let vertex_array: UniqueVertexArray = self.wrap(created)?;
        self.state.vertex_array.set(&mut self.driver, vertex_array.id());
        let id = self.vertex_arrays.insert(key, vertex_array);
        trace!("cached vertex array {id} for {key:?}");
        // A fresh vertex array starts with no bindings.
        self.state.vertex_buffer.set_dirty();
        self.state.element_buffer.assume(0);
        Ok(true)
    }

    /// Issues one draw call per segment of `drawable`.
    ///
    /// # Errors
    ///
    /// Returns `GlError::Allocation` if a vertex array cannot be created.
    /// Segments before the failing one have already been drawn.
    pub fn draw(&mut self, drawable: &Drawable<'_>) -> Result<()> {
        if drawable.segments.is_empty() {
            return Ok(());
        }

        let primitive = self.apply_draw_mode(drawable.mode);
        self.set_depth(&drawable.depth_mode);
        self.set_stencil(&drawable.stencil_mode);
        self.set_color(&drawable.color_mode);
        self.state.program.set(&mut self.driver, drawable.program);

        for segment in drawable.segments {
            if self.bind_vertex_array(drawable, segment)? {
                self.state
                    .vertex_buffer
                    .set(&mut self.driver, drawable.vertex_buffer);
                if drawable.is_indexed() {
                    self.state
                        .element_buffer
                        .set(&mut self.driver, drawable.index_buffer);
                }
                for attribute in drawable.attributes {
                    self.driver.vertex_attrib_pointer(
                        attribute,
                        drawable.vertex_stride,
                        segment.vertex_offset,
                    );
                }
            }

            if drawable.is_indexed() {
                self.driver.draw_elements(
                    primitive,
                    segment.index_length,
                    segment.index_byte_offset(),
                );
            } else {
                // The attribute pointers already start at the segment's
                // first vertex.
                self.driver.draw_arrays(primitive, 0, segment.vertex_length);
            }
        }
        Ok(())
    }

    /// Deletes every abandoned object in one batch per kind.
    ///
    /// Only call while this thread has exclusive use of the driver context.
    pub fn perform_cleanup(&mut self) {
        let mut abandoned = self.recycler.lock().take_abandoned();
        // Each take may also pick up programs and buffers dropped on other
        // threads, so purge until nothing new is released.
        while self.vertex_arrays.purge(&abandoned) > 0 {
            abandoned.merge(self.recycler.lock().take_abandoned());
        }
        if abandoned.is_empty() {
            return;
        }

        for (kind, ids) in abandoned.iter() {
            match kind {
                ObjectKind::Program => {
                    self.driver.delete_programs(ids);
                    self.state.forget_programs(ids);
                }
                ObjectKind::Shader => self.driver.delete_shaders(ids),
                ObjectKind::Buffer => {
                    self.driver.delete_buffers(ids);
                    self.state.forget_buffers(ids);
                }
                ObjectKind::Texture => {
                    self.driver.delete_textures(ids);
                    self.state.forget_textures(ids);
                }
                ObjectKind::VertexArray => {
                    self.driver.delete_vertex_arrays(ids);
                    self.state.forget_vertex_arrays(ids);
                }
                ObjectKind::Framebuffer => {
                    self.driver.delete_framebuffers(ids);
                    self.state.forget_framebuffers(ids);
                }
            }
            debug!("deleted {} {kind} object(s)", ids.len());
        }
    }

    /// Releases every pooled texture and cached vertex array, then cleans
    /// up. Must be the last call before the driver context is destroyed.
    pub fn reset(&mut self) {
        self.recycler.lock().drain_pool();
        let cleared = self.vertex_arrays.clear();
        if cleared > 0 {
            debug!("released {cleared} cached vertex array(s)");
        }
        self.perform_cleanup();
    }

    /// `true` when nothing is pooled or awaiting deletion.
    pub fn empty(&self) -> bool {
        self.recycler.lock().is_empty()
    }

    /// Forgets every remembered state value.
    pub fn set_dirty_state(&mut self) {
        self.state.set_dirty();
    }

    /// Re-issues every remembered state value.
    pub fn reset_state(&mut self) {
        self.state.reapply(&mut self.driver);
    }

    pub fn stats(&self) -> ContextStats {
        let recycler = self.recycler.lock();
        ContextStats {
            pooled_textures: recycler.pooled_textures().len(),
            abandoned: AbandonedCounts {
                programs: recycler.abandoned(ObjectKind::Program).len(),
                shaders: recycler.abandoned(ObjectKind::Shader).len(),
                buffers: recycler.abandoned(ObjectKind::Buffer).len(),
                textures: recycler.abandoned(ObjectKind::Texture).len(),
                vertex_arrays: recycler.abandoned(ObjectKind::VertexArray).len(),
                framebuffers: recycler.abandoned(ObjectKind::Framebuffer).len(),
            },
            cached_vertex_arrays: self.vertex_arrays.len(),
        }
    }
}

impl<D: Driver> Drop for Context<D> {
    fn drop(&mut self) {
        self.reset();
    }
}
