#![deny(unsafe_code)]
//! GPU object lifetime and render-state caching for GL-style drivers.
//!
//! A [`Context`] wraps a [`Driver`] and hands out uniquely owned object
//! names ([`Unique`]), textures and typed buffers. Dropped objects are
//! queued and deleted in batches by [`Context::perform_cleanup`]. Every
//! piece of fixed-function state goes through a [`State`] cell so redundant
//! driver calls are skipped.
//!
//! [`HeadlessDriver`] records calls without a GPU. With the `render`
//! feature, [`render::GlowDriver`] drives a real GL context through `glow`.

pub mod attribute;
pub mod buffer;
pub mod color_mode;
pub mod config;
pub mod context;
pub mod depth_mode;
pub mod drawable;
pub mod driver;
pub mod error;
pub mod headless;
pub mod object;
pub mod recycler;
pub mod state;
pub mod stencil_mode;
pub mod texture;
pub mod value;
pub mod vertex_array;

#[cfg(all(feature = "render", not(target_arch = "wasm32")))]
pub mod render;

pub use attribute::{AttributeBinding, AttributeType, Vertex};
pub use buffer::{IndexBuffer, Line, Point, Primitive, Triangle, VertexBuffer};
pub use color_mode::{BlendEquation, BlendFactor, BlendFunction, ColorMask, ColorMode};
pub use config::{ContextConfig, MAX_TEXTURE_UNITS};
pub use context::{AbandonedCounts, Context, ContextStats};
pub use depth_mode::{DepthFunction, DepthMask, DepthMode, DepthRange};
pub use drawable::{DrawMode, Drawable, Segment};
pub use driver::{
    BufferTarget, Capability, ClearMask, Driver, PrimitiveType, ShaderStage, Viewport,
};
pub use error::{GlError, Result};
pub use headless::{Call, HeadlessDriver};
pub use object::{
    ObjectId, ObjectKind, Unique, UniqueBuffer, UniqueFramebuffer, UniqueProgram, UniqueShader,
    UniqueTexture, UniqueVertexArray,
};
pub use state::State;
pub use stencil_mode::{StencilFunction, StencilMode, StencilOp, StencilTest};
pub use texture::{Image, Texture, TextureFilter, TextureMipMap, TextureWrap};
pub use value::StateValue;
