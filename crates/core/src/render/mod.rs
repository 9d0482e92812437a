//! OpenGL driver backed by `glow`.
//!
//! Only available with the `render` feature on native targets.
//!
//! - [`convert`] -- driver enums to GL constants.
//! - [`glow_driver`] -- the [`Driver`](crate::Driver) implementation.

pub mod convert;
pub mod glow_driver;

pub use glow_driver::GlowDriver;
