//! Remembered driver state.
//!
//! A [`State`] cell shadows one driver value so repeated sets of the same
//! value cost nothing. [`RenderState`] is the full set of cells a context
//! owns.

use std::fmt;

use crate::driver::Driver;
use crate::object::ObjectId;
use crate::value::{self, StateValue};

/// Last value applied for one state dimension.
pub struct State<V: StateValue> {
    current: V::Type,
    dirty: bool,
}

impl<V: StateValue> State<V> {
    /// A cell that does not yet know the driver value.
    pub fn new() -> Self {
        Self {
            current: V::DEFAULT,
            dirty: true,
        }
    }

    pub fn get(&self) -> V::Type {
        self.current
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// `true` if the driver is known to hold `value`.
    pub fn holds(&self, value: V::Type) -> bool {
        !self.dirty && self.current == value
    }

    /// Applies `value` unless the driver is known to hold it already.
    /// Returns whether a driver call was issued.
    pub fn set<D: Driver + ?Sized>(&mut self, driver: &mut D, value: V::Type) -> bool {
        if self.holds(value) {
            return false;
        }
        V::apply(driver, value);
        self.current = value;
        self.dirty = false;
        true
    }

    /// Forces the next `set` to reach the driver.
    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    /// Re-issues the remembered value.
    pub fn reapply<D: Driver + ?Sized>(&mut self, driver: &mut D) {
        V::apply(driver, self.current);
        self.dirty = false;
    }

    /// Records `value` as the driver's without issuing a call, for values
    /// the driver changed as a side effect of another call.
    pub(crate) fn assume(&mut self, value: V::Type) {
        self.current = value;
        self.dirty = false;
    }

    /// Drops the remembered value entirely, as after the object it named
    /// was deleted.
    pub(crate) fn forget(&mut self) {
        self.current = V::DEFAULT;
        self.dirty = true;
    }
}

impl<V: StateValue> Default for State<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: StateValue> fmt::Debug for State<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("current", &self.current)
            .field("dirty", &self.dirty)
            .finish()
    }
}

/// Every state cell owned by a context.
#[derive(Debug)]
pub(crate) struct RenderState {
    pub bind_framebuffer: State<value::BindFramebuffer>,
    pub viewport: State<value::Viewport>,
    pub active_texture: State<value::ActiveTexture>,
    pub texture: Vec<State<value::BindTexture>>,
    pub vertex_array: State<value::BindVertexArray>,

    pub stencil_func: State<value::StencilFunc>,
    pub stencil_mask: State<value::StencilMask>,
    pub stencil_test: State<value::StencilTest>,
    pub stencil_op: State<value::StencilOp>,
    pub depth_range: State<value::DepthRange>,
    pub depth_mask: State<value::DepthMask>,
    pub depth_test: State<value::DepthTest>,
    pub depth_func: State<value::DepthFunc>,
    pub blend: State<value::Blend>,
    pub blend_equation: State<value::BlendEquation>,
    pub blend_func: State<value::BlendFunc>,
    pub blend_color: State<value::BlendColor>,
    pub color_mask: State<value::ColorMask>,
    pub clear_depth: State<value::ClearDepth>,
    pub clear_color: State<value::ClearColor>,
    pub clear_stencil: State<value::ClearStencil>,
    pub program: State<value::Program>,
    pub line_width: State<value::LineWidth>,
    pub point_size: State<value::PointSize>,

    pub vertex_buffer: State<value::BindVertexBuffer>,
    pub element_buffer: State<value::BindElementBuffer>,
}

impl RenderState {
    pub fn new(texture_units: u8) -> Self {
        Self {
            bind_framebuffer: State::new(),
            viewport: State::new(),
            active_texture: State::new(),
            texture: (0..texture_units).map(|_| State::new()).collect(),
            vertex_array: State::new(),
            stencil_func: State::new(),
            stencil_mask: State::new(),
            stencil_test: State::new(),
            stencil_op: State::new(),
            depth_range: State::new(),
            depth_mask: State::new(),
            depth_test: State::new(),
            depth_func: State::new(),
            blend: State::new(),
            blend_equation: State::new(),
            blend_func: State::new(),
            blend_color: State::new(),
            color_mask: State::new(),
            clear_depth: State::new(),
            clear_color: State::new(),
            clear_stencil: State::new(),
            program: State::new(),
            line_width: State::new(),
            point_size: State::new(),
            vertex_buffer: State::new(),
            element_buffer: State::new(),
        }
    }

    pub fn set_dirty(&mut self) {
        self.bind_framebuffer.set_dirty();
        self.viewport.set_dirty();
        self.active_texture.set_dirty();
        self.texture.iter_mut().for_each(State::set_dirty);
        self.vertex_array.set_dirty();
        self.stencil_func.set_dirty();
        self.stencil_mask.set_dirty();
        self.stencil_test.set_dirty();
        self.stencil_op.set_dirty();
        self.depth_range.set_dirty();
        self.depth_mask.set_dirty();
        self.depth_test.set_dirty();
        self.depth_func.set_dirty();
        self.blend.set_dirty();
        self.blend_equation.set_dirty();
        self.blend_func.set_dirty();
        self.blend_color.set_dirty();
        self.color_mask.set_dirty();
        self.clear_depth.set_dirty();
        self.clear_color.set_dirty();
        self.clear_stencil.set_dirty();
        self.program.set_dirty();
        self.line_width.set_dirty();
        self.point_size.set_dirty();
        self.vertex_buffer.set_dirty();
        self.element_buffer.set_dirty();
    }

    /// Re-issues every cell. Texture bindings are replayed unit by unit and
    /// the active unit is restored last.
    pub fn reapply<D: Driver + ?Sized>(&mut self, driver: &mut D) {
        self.bind_framebuffer.reapply(driver);
        self.viewport.reapply(driver);
        for (unit, cell) in (0u8..).zip(self.texture.iter_mut()) {
            driver.active_texture(unit);
            cell.reapply(driver);
        }
        self.active_texture.reapply(driver);
        self.stencil_func.reapply(driver);
        self.stencil_mask.reapply(driver);
        self.stencil_test.reapply(driver);
        self.stencil_op.reapply(driver);
        self.depth_range.reapply(driver);
        self.depth_mask.reapply(driver);
        self.depth_test.reapply(driver);
        self.depth_func.reapply(driver);
        self.blend.reapply(driver);
        self.blend_equation.reapply(driver);
        self.blend_func.reapply(driver);
        self.blend_color.reapply(driver);
        self.color_mask.reapply(driver);
        self.clear_depth.reapply(driver);
        self.clear_color.reapply(driver);
        self.clear_stencil.reapply(driver);
        self.program.reapply(driver);
        self.line_width.reapply(driver);
        self.point_size.reapply(driver);
        // The element buffer binding lives in the vertex array, so the
        // array goes first.
        self.vertex_array.reapply(driver);
        self.vertex_buffer.reapply(driver);
        self.element_buffer.reapply(driver);
    }

    pub fn forget_programs(&mut self, ids: &[ObjectId]) {
        forget_if_deleted(&mut self.program, ids);
    }

    pub fn forget_buffers(&mut self, ids: &[ObjectId]) {
        forget_if_deleted(&mut self.vertex_buffer, ids);
        forget_if_deleted(&mut self.element_buffer, ids);
    }

    pub fn forget_textures(&mut self, ids: &[ObjectId]) {
        for cell in &mut self.texture {
            forget_if_deleted(cell, ids);
        }
    }

    pub fn forget_vertex_arrays(&mut self, ids: &[ObjectId]) {
        if forget_if_deleted(&mut self.vertex_array, ids) {
            // The default vertex array has its own element binding.
            self.element_buffer.set_dirty();
        }
    }

    pub fn forget_framebuffers(&mut self, ids: &[ObjectId]) {
        forget_if_deleted(&mut self.bind_framebuffer, ids);
    }
}

/// Returns whether the cell named one of `ids`.
fn forget_if_deleted<V>(cell: &mut State<V>, ids: &[ObjectId]) -> bool
where
    V: StateValue<Type = ObjectId>,
{
    let current = cell.get();
    let deleted = current != 0 && ids.contains(&current);
    if deleted {
        cell.forget();
    }
    deleted
}
