//! Render-state dimensions.
//!
//! Each marker type here names one piece of driver state: the Rust type of
//! its value, the driver's initial value, and the call that applies it.
//! [`State`](crate::state::State) pairs a marker with a remembered value.

use std::fmt::Debug;

use glam::Vec4;

use crate::color_mode::{self, BlendEquation as Equation};
use crate::depth_mode::{self, DepthFunction};
use crate::driver::{self, BufferTarget, Capability, Driver};
use crate::object::{BufferId, FramebufferId, ProgramId, TextureId, VertexArrayId};
use crate::stencil_mode::{self, StencilFunction, StencilOp as Op};

/// One driver state dimension.
pub trait StateValue {
    type Type: Copy + PartialEq + Debug;

    /// The value a freshly created driver context starts with.
    const DEFAULT: Self::Type;

    fn apply<D: Driver + ?Sized>(driver: &mut D, value: Self::Type);
}

macro_rules! state_value {
    ($(#[$meta:meta])* $name:ident: $ty:ty = $default:expr, |$driver:ident, $value:ident| $apply:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub enum $name {}

        impl StateValue for $name {
            type Type = $ty;
            const DEFAULT: $ty = $default;

            fn apply<D: Driver + ?Sized>($driver: &mut D, $value: $ty) {
                $apply
            }
        }
    };
}

state_value!(BindFramebuffer: FramebufferId = 0, |d, v| d.bind_framebuffer(v));
state_value!(Viewport: driver::Viewport = driver::Viewport::new(0, 0, 0, 0), |d, v| d.viewport(v));
state_value!(
    /// Index of the active texture unit.
    ActiveTexture: u8 = 0,
    |d, v| d.active_texture(v)
);
state_value!(
    /// Texture bound on the active unit. One cell exists per unit.
    BindTexture: TextureId = 0,
    |d, v| d.bind_texture(v)
);
state_value!(BindVertexArray: VertexArrayId = 0, |d, v| d.bind_vertex_array(v));
state_value!(Program: ProgramId = 0, |d, v| d.use_program(v));
state_value!(BindVertexBuffer: BufferId = 0, |d, v| d.bind_buffer(BufferTarget::Array, v));
state_value!(BindElementBuffer: BufferId = 0, |d, v| d
    .bind_buffer(BufferTarget::ElementArray, v));

state_value!(
    StencilFunc: stencil_mode::StencilFunc = stencil_mode::StencilFunc {
        func: StencilFunction::Always,
        reference: 0,
        mask: !0,
    },
    |d, v| d.stencil_func(v)
);
state_value!(StencilMask: u32 = !0, |d, v| d.stencil_mask(v));
state_value!(StencilTest: bool = false, |d, v| d
    .set_capability(Capability::StencilTest, v));
state_value!(
    StencilOp: stencil_mode::StencilOps = stencil_mode::StencilOps {
        fail: Op::Keep,
        depth_fail: Op::Keep,
        pass: Op::Keep,
    },
    |d, v| d.stencil_op(v)
);

state_value!(DepthRange: depth_mode::DepthRange = depth_mode::DepthRange::FULL, |d, v| d
    .depth_range(v));
state_value!(DepthMask: bool = true, |d, v| d.depth_mask(v));
state_value!(DepthTest: bool = false, |d, v| d.set_capability(Capability::DepthTest, v));
state_value!(DepthFunc: DepthFunction = DepthFunction::Less, |d, v| d.depth_func(v));

state_value!(Blend: bool = false, |d, v| d.set_capability(Capability::Blend, v));
state_value!(BlendEquation: Equation = Equation::Add, |d, v| d.blend_equation(v));
state_value!(
    BlendFunc: color_mode::BlendFunc = color_mode::BlendFunc {
        src: color_mode::BlendFactor::One,
        dst: color_mode::BlendFactor::Zero,
    },
    |d, v| d.blend_func(v)
);
state_value!(BlendColor: Vec4 = Vec4::ZERO, |d, v| d.blend_color(v));
state_value!(ColorMask: color_mode::ColorMask = color_mode::ColorMask::ALL, |d, v| d
    .color_mask(v));

state_value!(ClearDepth: f32 = 1.0, |d, v| d.clear_depth(v));
state_value!(ClearColor: Vec4 = Vec4::ZERO, |d, v| d.clear_color(v));
state_value!(ClearStencil: i32 = 0, |d, v| d.clear_stencil(v));

state_value!(LineWidth: f32 = 1.0, |d, v| d.line_width(v));
state_value!(PointSize: f32 = 1.0, |d, v| d.point_size(v));
