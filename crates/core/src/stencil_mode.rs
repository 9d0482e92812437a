//! Stencil test configuration for a draw call.

/// Comparison used by the stencil test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// Action taken on the stencil buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilOp {
    Zero,
    Keep,
    Replace,
    Increment,
    Decrement,
    Invert,
    IncrementWrap,
    DecrementWrap,
}

/// Comparison plus the mask applied to both sides of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilTest {
    pub func: StencilFunction,
    pub mask: u32,
}

impl StencilTest {
    pub const ALWAYS: StencilTest = StencilTest {
        func: StencilFunction::Always,
        mask: 0,
    };
}

/// The `(func, ref, mask)` triple applied in one driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilFunc {
    pub func: StencilFunction,
    pub reference: i32,
    pub mask: u32,
}

/// The `(fail, depth_fail, pass)` triple applied in one driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilOps {
    pub fail: StencilOp,
    pub depth_fail: StencilOp,
    pub pass: StencilOp,
}

/// Stencil state requested by a drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilMode {
    pub test: StencilTest,
    pub reference: i32,
    /// Write mask.
    pub mask: u32,
    pub fail: StencilOp,
    pub depth_fail: StencilOp,
    pub pass: StencilOp,
}

impl StencilMode {
    /// A mode that turns the stencil test off.
    pub fn disabled() -> Self {
        Self {
            test: StencilTest::ALWAYS,
            reference: 0,
            mask: 0,
            fail: StencilOp::Keep,
            depth_fail: StencilOp::Keep,
            pass: StencilOp::Keep,
        }
    }

    /// `true` when the test always passes and nothing is written.
    pub fn is_disabled(&self) -> bool {
        self.test.func == StencilFunction::Always && self.mask == 0
    }

    pub fn func(&self) -> StencilFunc {
        StencilFunc {
            func: self.test.func,
            reference: self.reference,
            mask: self.test.mask,
        }
    }

    pub fn ops(&self) -> StencilOps {
        StencilOps {
            fail: self.fail,
            depth_fail: self.depth_fail,
            pass: self.pass,
        }
    }
}

impl Default for StencilMode {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_mode_reports_disabled() {
        assert!(StencilMode::disabled().is_disabled());
    }

    #[test]
    fn always_test_with_write_mask_is_enabled() {
        let mode = StencilMode {
            mask: 0xFF,
            pass: StencilOp::Replace,
            reference: 1,
            ..StencilMode::disabled()
        };
        assert!(!mode.is_disabled(), "writing stencil needs the test on");
    }

    #[test]
    fn func_and_ops_split_the_mode() {
        let mode = StencilMode {
            test: StencilTest {
                func: StencilFunction::Equal,
                mask: 0x0F,
            },
            reference: 3,
            mask: 0,
            fail: StencilOp::Zero,
            depth_fail: StencilOp::Invert,
            pass: StencilOp::Replace,
        };

        assert_eq!(
            mode.func(),
            StencilFunc {
                func: StencilFunction::Equal,
                reference: 3,
                mask: 0x0F,
            }
        );
        assert_eq!(
            mode.ops(),
            StencilOps {
                fail: StencilOp::Zero,
                depth_fail: StencilOp::Invert,
                pass: StencilOp::Replace,
            }
        );
    }
}
