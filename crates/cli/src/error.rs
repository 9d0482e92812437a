//! Errors surfaced by the `strata` binary.
//!
//! Exit codes:
//! - 0:  the simulation or config dump succeeded
//! - 2:  clap rejected the arguments
//! - 10: the context failed (a driver refused a name, a texture unit was
//!   out of range)
//! - 12: the `--config` JSON was malformed or failed validation
//! - 13: a report could not be written as JSON

use std::fmt;

use strata_core::GlError;

/// Failure of a `strata` subcommand.
pub enum CliError {
    /// Context or driver failure during the frame loop.
    Core(GlError),
    /// Rejected `--config` input.
    Input(String),
    /// Report encoding failure.
    Serialization(String),
}

impl CliError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(_) => 10,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Core(e) => write!(f, "context: {e}"),
            CliError::Input(msg) => write!(f, "config: {msg}"),
            CliError::Serialization(msg) => write!(f, "report: {msg}"),
        }
    }
}

/// Config errors raised by `ContextConfig` count as bad input.
impl From<GlError> for CliError {
    fn from(e: GlError) -> Self {
        match e {
            GlError::InvalidConfig(_) | GlError::Config(_) => CliError::Input(e.to_string()),
            other => CliError::Core(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::ObjectKind;

    #[test]
    fn core_error_exit_code_is_10() {
        let err = CliError::Core(GlError::InvalidTextureUnit {
            unit: 4,
            available: 2,
        });
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn input_error_exit_code_is_12() {
        let err = CliError::Input("bad config".into());
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn serialization_error_exit_code_is_13() {
        let err = CliError::Serialization("json fail".into());
        assert_eq!(err.exit_code(), 13);
    }

    #[test]
    fn from_invalid_config_routes_to_input() {
        let cli_err = CliError::from(GlError::InvalidConfig("texture_units".into()));
        assert_eq!(cli_err.exit_code(), 12);
        assert!(cli_err.to_string().contains("texture_units"));
    }

    #[test]
    fn from_allocation_error_routes_to_core() {
        let cli_err = CliError::from(GlError::Allocation {
            kind: ObjectKind::Buffer,
            reason: "out of names".into(),
        });
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("out of names"));
    }

    #[test]
    fn display_names_the_failing_stage() {
        let err = CliError::from(GlError::InvalidConfig("texture_units".into()));
        assert!(err.to_string().starts_with("config: "));
        let err = CliError::Serialization("json fail".into());
        assert_eq!(err.to_string(), "report: json fail");
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
