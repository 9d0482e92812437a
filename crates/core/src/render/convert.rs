//! Mapping of driver-level enums onto GL constants.

use crate::attribute::AttributeType;
use crate::color_mode::{BlendEquation, BlendFactor};
use crate::depth_mode::DepthFunction;
use crate::driver::{BufferTarget, Capability, ClearMask, PrimitiveType, ShaderStage};
use crate::stencil_mode::{StencilFunction, StencilOp};
use crate::texture::{TextureFilter, TextureMipMap, TextureWrap};

pub fn primitive_mode(primitive: PrimitiveType) -> u32 {
    match primitive {
        PrimitiveType::Points => glow::POINTS,
        PrimitiveType::Lines => glow::LINES,
        PrimitiveType::LineStrip => glow::LINE_STRIP,
        PrimitiveType::Triangles => glow::TRIANGLES,
        PrimitiveType::TriangleStrip => glow::TRIANGLE_STRIP,
    }
}

pub fn shader_stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

pub fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

pub fn capability(capability: Capability) -> u32 {
    match capability {
        Capability::DepthTest => glow::DEPTH_TEST,
        Capability::StencilTest => glow::STENCIL_TEST,
        Capability::Blend => glow::BLEND,
    }
}

pub fn clear_bits(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.contains(ClearMask::COLOR) {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.contains(ClearMask::DEPTH) {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    if mask.contains(ClearMask::STENCIL) {
        bits |= glow::STENCIL_BUFFER_BIT;
    }
    bits
}

pub fn attribute_type(ty: AttributeType) -> u32 {
    match ty {
        AttributeType::I8 => glow::BYTE,
        AttributeType::U8 => glow::UNSIGNED_BYTE,
        AttributeType::I16 => glow::SHORT,
        AttributeType::U16 => glow::UNSIGNED_SHORT,
        AttributeType::F32 => glow::FLOAT,
    }
}

pub fn depth_function(func: DepthFunction) -> u32 {
    match func {
        DepthFunction::Never => glow::NEVER,
        DepthFunction::Less => glow::LESS,
        DepthFunction::Equal => glow::EQUAL,
        DepthFunction::LessEqual => glow::LEQUAL,
        DepthFunction::Greater => glow::GREATER,
        DepthFunction::NotEqual => glow::NOTEQUAL,
        DepthFunction::GreaterEqual => glow::GEQUAL,
        DepthFunction::Always => glow::ALWAYS,
    }
}

pub fn stencil_function(func: StencilFunction) -> u32 {
    match func {
        StencilFunction::Never => glow::NEVER,
        StencilFunction::Less => glow::LESS,
        StencilFunction::Equal => glow::EQUAL,
        StencilFunction::LessEqual => glow::LEQUAL,
        StencilFunction::Greater => glow::GREATER,
        StencilFunction::NotEqual => glow::NOTEQUAL,
        StencilFunction::GreaterEqual => glow::GEQUAL,
        StencilFunction::Always => glow::ALWAYS,
    }
}

pub fn stencil_op(op: StencilOp) -> u32 {
    match op {
        StencilOp::Zero => glow::ZERO,
        StencilOp::Keep => glow::KEEP,
        StencilOp::Replace => glow::REPLACE,
        StencilOp::Increment => glow::INCR,
        StencilOp::Decrement => glow::DECR,
        StencilOp::Invert => glow::INVERT,
        StencilOp::IncrementWrap => glow::INCR_WRAP,
        StencilOp::DecrementWrap => glow::DECR_WRAP,
    }
}

pub fn blend_equation(equation: BlendEquation) -> u32 {
    match equation {
        BlendEquation::Add => glow::FUNC_ADD,
        BlendEquation::Subtract => glow::FUNC_SUBTRACT,
        BlendEquation::ReverseSubtract => glow::FUNC_REVERSE_SUBTRACT,
    }
}

pub fn blend_factor(factor: BlendFactor) -> u32 {
    match factor {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcColor => glow::SRC_COLOR,
        BlendFactor::OneMinusSrcColor => glow::ONE_MINUS_SRC_COLOR,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstAlpha => glow::DST_ALPHA,
        BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
        BlendFactor::DstColor => glow::DST_COLOR,
        BlendFactor::OneMinusDstColor => glow::ONE_MINUS_DST_COLOR,
        BlendFactor::SrcAlphaSaturate => glow::SRC_ALPHA_SATURATE,
        BlendFactor::ConstantColor => glow::CONSTANT_COLOR,
        BlendFactor::OneMinusConstantColor => glow::ONE_MINUS_CONSTANT_COLOR,
        BlendFactor::ConstantAlpha => glow::CONSTANT_ALPHA,
        BlendFactor::OneMinusConstantAlpha => glow::ONE_MINUS_CONSTANT_ALPHA,
    }
}

pub fn min_filter(filter: TextureFilter, mipmap: TextureMipMap) -> u32 {
    match (filter, mipmap) {
        (TextureFilter::Nearest, TextureMipMap::No) => glow::NEAREST,
        (TextureFilter::Linear, TextureMipMap::No) => glow::LINEAR,
        (TextureFilter::Nearest, TextureMipMap::Yes) => glow::NEAREST_MIPMAP_NEAREST,
        (TextureFilter::Linear, TextureMipMap::Yes) => glow::LINEAR_MIPMAP_NEAREST,
    }
}

pub fn mag_filter(filter: TextureFilter) -> u32 {
    match filter {
        TextureFilter::Nearest => glow::NEAREST,
        TextureFilter::Linear => glow::LINEAR,
    }
}

pub fn wrap_mode(wrap: TextureWrap) -> u32 {
    match wrap {
        TextureWrap::Clamp => glow::CLAMP_TO_EDGE,
        TextureWrap::Repeat => glow::REPEAT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_bits_combine() {
        assert_eq!(clear_bits(ClearMask::empty()), 0);
        assert_eq!(
            clear_bits(ClearMask::COLOR | ClearMask::DEPTH),
            glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT
        );
        assert_eq!(clear_bits(ClearMask::STENCIL), glow::STENCIL_BUFFER_BIT);
    }

    #[test]
    fn mipmapped_min_filter_samples_nearest_level() {
        assert_eq!(
            min_filter(TextureFilter::Linear, TextureMipMap::Yes),
            glow::LINEAR_MIPMAP_NEAREST
        );
        assert_eq!(min_filter(TextureFilter::Nearest, TextureMipMap::No), glow::NEAREST);
    }

    #[test]
    fn mag_filter_ignores_mipmaps() {
        assert_eq!(mag_filter(TextureFilter::Linear), glow::LINEAR);
    }

    #[test]
    fn comparison_functions_share_constants() {
        assert_eq!(
            depth_function(DepthFunction::LessEqual),
            stencil_function(StencilFunction::LessEqual)
        );
        assert_eq!(depth_function(DepthFunction::Always), glow::ALWAYS);
    }

    #[test]
    fn wrapping_stencil_ops() {
        assert_eq!(stencil_op(StencilOp::IncrementWrap), glow::INCR_WRAP);
        assert_eq!(stencil_op(StencilOp::Keep), glow::KEEP);
    }

    #[test]
    fn attribute_types() {
        assert_eq!(attribute_type(AttributeType::F32), glow::FLOAT);
        assert_eq!(attribute_type(AttributeType::U16), glow::UNSIGNED_SHORT);
    }

    #[test]
    fn premultiplied_blend_factors() {
        assert_eq!(blend_factor(BlendFactor::One), glow::ONE);
        assert_eq!(
            blend_factor(BlendFactor::OneMinusSrcAlpha),
            glow::ONE_MINUS_SRC_ALPHA
        );
        assert_eq!(blend_equation(BlendEquation::Add), glow::FUNC_ADD);
    }
}
