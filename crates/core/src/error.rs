//! Error types for the strata core.

use thiserror::Error;

use crate::object::ObjectKind;

/// Errors produced by context operations.
#[derive(Debug, Error)]
pub enum GlError {
    /// The driver could not allocate a new object name.
    ///
    /// Not retried. The caller is expected to drop the current frame.
    #[error("failed to allocate {kind} object: {reason}")]
    Allocation {
        /// The kind of object that was being created.
        kind: ObjectKind,
        /// The driver's description of the failure.
        reason: String,
    },

    /// A texture unit outside the configured range was requested.
    #[error("texture unit {unit} out of range (context has {available} units)")]
    InvalidTextureUnit { unit: u8, available: u8 },

    /// Pixel data did not match the declared image dimensions.
    #[error("image data is {len} bytes, expected {expected} for {width}x{height} RGBA")]
    InvalidImage {
        width: u16,
        height: u16,
        len: usize,
        expected: usize,
    },

    /// A configuration value was outside its allowed range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration JSON could not be decoded.
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Alias for `Result<T, GlError>`.
pub type Result<T> = std::result::Result<T, GlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_error_names_kind_and_reason() {
        let err = GlError::Allocation {
            kind: ObjectKind::Texture,
            reason: "out of memory".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("texture"), "missing kind in: {msg}");
        assert!(msg.contains("out of memory"), "missing reason in: {msg}");
    }

    #[test]
    fn invalid_texture_unit_includes_unit_and_available() {
        let err = GlError::InvalidTextureUnit {
            unit: 7,
            available: 2,
        };
        let msg = format!("{err}");
        assert!(msg.contains('7'), "missing unit in: {msg}");
        assert!(msg.contains('2'), "missing unit count in: {msg}");
    }

    #[test]
    fn invalid_image_includes_dimensions_and_lengths() {
        let err = GlError::InvalidImage {
            width: 4,
            height: 3,
            len: 10,
            expected: 48,
        };
        let msg = format!("{err}");
        assert!(msg.contains("4x3"), "missing dimensions in: {msg}");
        assert!(msg.contains("10"), "missing actual length in: {msg}");
        assert!(msg.contains("48"), "missing expected length in: {msg}");
    }

    #[test]
    fn config_error_wraps_serde_json() {
        let bad = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = GlError::from(bad);
        assert!(format!("{err}").starts_with("config parse error"));
    }

    #[test]
    fn gl_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GlError>();
    }

    #[test]
    fn gl_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<GlError>();
    }
}
