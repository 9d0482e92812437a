//! Depth test configuration for a draw call.

/// Comparison used by the depth test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// Whether passing fragments write their depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthMask {
    ReadOnly,
    ReadWrite,
}

impl DepthMask {
    pub fn is_writable(self) -> bool {
        matches!(self, DepthMask::ReadWrite)
    }
}

/// Mapping of normalized device depth onto the depth buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
    pub near: f32,
    pub far: f32,
}

impl DepthRange {
    pub const FULL: DepthRange = DepthRange { near: 0.0, far: 1.0 };
}

impl Default for DepthRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Depth state requested by a drawable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthMode {
    pub func: DepthFunction,
    pub mask: DepthMask,
    pub range: DepthRange,
}

impl DepthMode {
    /// A mode that turns the depth test off.
    pub fn disabled() -> Self {
        Self {
            func: DepthFunction::Always,
            mask: DepthMask::ReadOnly,
            range: DepthRange::FULL,
        }
    }

    /// `true` when this mode can be expressed by disabling the depth test.
    pub fn is_disabled(&self) -> bool {
        self.func == DepthFunction::Always && self.mask == DepthMask::ReadOnly
    }
}

impl Default for DepthMode {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_mode_reports_disabled() {
        assert!(DepthMode::disabled().is_disabled());
    }

    #[test]
    fn writable_always_mode_is_not_disabled() {
        let mode = DepthMode {
            func: DepthFunction::Always,
            mask: DepthMask::ReadWrite,
            range: DepthRange::FULL,
        };
        assert!(!mode.is_disabled(), "depth writes need the test enabled");
    }

    #[test]
    fn read_only_less_mode_is_not_disabled() {
        let mode = DepthMode {
            func: DepthFunction::Less,
            mask: DepthMask::ReadOnly,
            range: DepthRange { near: 0.0, far: 0.5 },
        };
        assert!(!mode.is_disabled());
    }

    #[test]
    fn default_range_is_full() {
        assert_eq!(DepthRange::default(), DepthRange { near: 0.0, far: 1.0 });
    }
}
