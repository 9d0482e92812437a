//! Blending and color write configuration for a draw call.

use glam::Vec4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendEquation {
    Add,
    Subtract,
    ReverseSubtract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    DstColor,
    OneMinusDstColor,
    SrcAlphaSaturate,
    ConstantColor,
    OneMinusConstantColor,
    ConstantAlpha,
    OneMinusConstantAlpha,
}

/// Source and destination factors applied in one driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendFunc {
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

/// How fragment colors combine with the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFunction {
    /// No blending; fragments overwrite.
    Replace,
    Blend {
        equation: BlendEquation,
        src: BlendFactor,
        dst: BlendFactor,
    },
}

/// Per-channel color write enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorMask {
    pub r: bool,
    pub g: bool,
    pub b: bool,
    pub a: bool,
}

impl ColorMask {
    pub const ALL: ColorMask = ColorMask {
        r: true,
        g: true,
        b: true,
        a: true,
    };
    pub const NONE: ColorMask = ColorMask {
        r: false,
        g: false,
        b: false,
        a: false,
    };
}

/// Color state requested by a drawable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMode {
    pub blend_function: BlendFunction,
    pub blend_color: Vec4,
    pub mask: ColorMask,
}

impl ColorMode {
    pub fn unblended() -> Self {
        Self {
            blend_function: BlendFunction::Replace,
            blend_color: Vec4::ZERO,
            mask: ColorMask::ALL,
        }
    }

    /// Premultiplied-alpha "over" compositing.
    pub fn alpha_blended() -> Self {
        Self {
            blend_function: BlendFunction::Blend {
                equation: BlendEquation::Add,
                src: BlendFactor::One,
                dst: BlendFactor::OneMinusSrcAlpha,
            },
            blend_color: Vec4::ZERO,
            mask: ColorMask::ALL,
        }
    }

    /// Writes nothing to the color buffer; useful for stencil-only passes.
    pub fn disabled() -> Self {
        Self {
            mask: ColorMask::NONE,
            ..Self::unblended()
        }
    }
}

impl Default for ColorMode {
    fn default() -> Self {
        Self::unblended()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unblended_replaces_and_writes_all_channels() {
        let mode = ColorMode::unblended();
        assert_eq!(mode.blend_function, BlendFunction::Replace);
        assert_eq!(mode.mask, ColorMask::ALL);
    }

    #[test]
    fn alpha_blended_uses_premultiplied_over() {
        match ColorMode::alpha_blended().blend_function {
            BlendFunction::Blend { equation, src, dst } => {
                assert_eq!(equation, BlendEquation::Add);
                assert_eq!(src, BlendFactor::One);
                assert_eq!(dst, BlendFactor::OneMinusSrcAlpha);
            }
            BlendFunction::Replace => panic!("expected a blending function"),
        }
    }

    #[test]
    fn disabled_masks_every_channel() {
        assert_eq!(ColorMode::disabled().mask, ColorMask::NONE);
    }
}
