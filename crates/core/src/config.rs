//! Context configuration.
//!
//! Parsed leniently from a JSON object: a missing key, or a value of the
//! wrong JSON type, falls back to the default. Values of the right type are
//! then range-checked.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GlError, Result};

/// Upper bound on configurable texture units.
pub const MAX_TEXTURE_UNITS: u8 = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Number of texture units with their own binding cell.
    pub texture_units: u8,
    /// Dropped textures kept for reuse before further ones are deleted.
    pub texture_pool_capacity: usize,
    /// Cache one vertex array per (program, buffers, offset) combination.
    pub vertex_array_cache: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            texture_units: 2,
            texture_pool_capacity: 64,
            vertex_array_cache: true,
        }
    }
}

fn param_u64(params: &Value, name: &str, default: u64) -> u64 {
    params.get(name).and_then(Value::as_u64).unwrap_or(default)
}

fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

impl ContextConfig {
    /// Reads a config from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `GlError::InvalidConfig` if a value is out of range.
    pub fn from_json(params: &Value) -> Result<Self> {
        let defaults = Self::default();
        let units = param_u64(params, "texture_units", defaults.texture_units.into());
        let texture_units = u8::try_from(units)
            .map_err(|_| GlError::InvalidConfig(format!("texture_units {units} too large")))?;
        let config = Self {
            texture_units,
            texture_pool_capacity: param_u64(
                params,
                "texture_pool_capacity",
                defaults.texture_pool_capacity as u64,
            ) as usize,
            vertex_array_cache: param_bool(
                params,
                "vertex_array_cache",
                defaults.vertex_array_cache,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses JSON text, then behaves like [`from_json`](Self::from_json).
    ///
    /// # Errors
    ///
    /// Returns `GlError::Config` for malformed JSON.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let params: Value = serde_json::from_str(text)?;
        Self::from_json(&params)
    }

    /// # Errors
    ///
    /// Returns `GlError::InvalidConfig` if `texture_units` is outside
    /// `1..=MAX_TEXTURE_UNITS`.
    pub fn validate(&self) -> Result<()> {
        if self.texture_units == 0 || self.texture_units > MAX_TEXTURE_UNITS {
            return Err(GlError::InvalidConfig(format!(
                "texture_units must be in 1..={MAX_TEXTURE_UNITS}, got {}",
                self.texture_units
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let config = ContextConfig::default();
        assert_eq!(config.texture_units, 2);
        assert_eq!(config.texture_pool_capacity, 64);
        assert!(config.vertex_array_cache);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_object_yields_defaults() {
        let config = ContextConfig::from_json(&json!({})).unwrap();
        assert_eq!(config, ContextConfig::default());
    }

    #[test]
    fn non_object_yields_defaults() {
        let config = ContextConfig::from_json(&json!(42)).unwrap();
        assert_eq!(config, ContextConfig::default());
    }

    #[test]
    fn explicit_values_are_read() {
        let config = ContextConfig::from_json(&json!({
            "texture_units": 8,
            "texture_pool_capacity": 0,
            "vertex_array_cache": false,
        }))
        .unwrap();
        assert_eq!(config.texture_units, 8);
        assert_eq!(config.texture_pool_capacity, 0);
        assert!(!config.vertex_array_cache);
    }

    #[test]
    fn wrong_type_falls_back_to_default() {
        let config = ContextConfig::from_json(&json!({"texture_units": "four"})).unwrap();
        assert_eq!(config.texture_units, 2);
    }

    #[test]
    fn zero_texture_units_rejected() {
        let err = ContextConfig::from_json(&json!({"texture_units": 0})).unwrap_err();
        assert!(matches!(err, GlError::InvalidConfig(_)));
    }

    #[test]
    fn too_many_texture_units_rejected() {
        assert!(ContextConfig::from_json(&json!({"texture_units": 33})).is_err());
        assert!(ContextConfig::from_json(&json!({"texture_units": 1000})).is_err());
        assert!(ContextConfig::from_json(&json!({"texture_units": 32})).is_ok());
    }

    #[test]
    fn malformed_text_is_a_config_error() {
        let err = ContextConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, GlError::Config(_)));
    }

    #[test]
    fn serializes_field_names() {
        let value = serde_json::to_value(ContextConfig::default()).unwrap();
        assert_eq!(value["texture_units"], 2);
        assert_eq!(value["texture_pool_capacity"], 64);
        assert_eq!(value["vertex_array_cache"], true);
    }

    #[test]
    fn serialized_config_reads_back() {
        let original = ContextConfig {
            texture_units: 4,
            texture_pool_capacity: 16,
            vertex_array_cache: false,
        };
        let text = serde_json::to_string(&original).unwrap();
        assert_eq!(ContextConfig::from_json_str(&text).unwrap(), original);
    }
}
