//! Textures and the pixel data they are created from.

use crate::error::{GlError, Result};
use crate::object::{TextureId, UniqueTexture};

/// Minification/magnification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

/// Whether sampling uses the mipmap chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureMipMap {
    No,
    Yes,
}

/// Coordinate addressing outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureWrap {
    Clamp,
    Repeat,
}

/// Tightly packed RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u16,
    height: u16,
    data: Vec<u8>,
}

impl Image {
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Wraps `data` as a `width` x `height` image.
    ///
    /// # Errors
    ///
    /// Returns `GlError::InvalidImage` if `data` is not exactly
    /// `width * height * 4` bytes.
    pub fn new(width: u16, height: u16, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(GlError::InvalidImage {
                width,
                height,
                len: data.len(),
                expected,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A transparent black image.
    pub fn blank(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * Self::BYTES_PER_PIXEL],
        }
    }

    pub fn size(&self) -> [u16; 2] {
        [self.width, self.height]
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// A 2D RGBA texture owned by the caller.
///
/// Remembers the sampling parameters last applied so that
/// [`Context::bind_texture`](crate::Context::bind_texture) can skip them.
#[derive(Debug)]
pub struct Texture {
    pub(crate) size: [u16; 2],
    pub(crate) texture: UniqueTexture,
    pub(crate) filter: TextureFilter,
    pub(crate) mipmap: TextureMipMap,
}

impl Texture {
    pub(crate) fn new(size: [u16; 2], texture: UniqueTexture) -> Self {
        Self {
            size,
            texture,
            filter: TextureFilter::Nearest,
            mipmap: TextureMipMap::No,
        }
    }

    pub fn size(&self) -> [u16; 2] {
        self.size
    }

    pub fn id(&self) -> TextureId {
        self.texture.id()
    }

    pub fn filter(&self) -> TextureFilter {
        self.filter
    }

    pub fn mipmap(&self) -> TextureMipMap {
        self.mipmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_accepts_exact_length() {
        let image = Image::new(2, 3, vec![0; 24]).unwrap();
        assert_eq!(image.size(), [2, 3]);
        assert_eq!(image.data().len(), 24);
    }

    #[test]
    fn image_rejects_short_data() {
        let err = Image::new(2, 2, vec![0; 15]).unwrap_err();
        match err {
            GlError::InvalidImage { len, expected, .. } => {
                assert_eq!(len, 15);
                assert_eq!(expected, 16);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_sized_image_is_empty() {
        let image = Image::new(0, 10, Vec::new()).unwrap();
        assert!(image.data().is_empty());
    }

    #[test]
    fn blank_image_is_zeroed() {
        let image = Image::blank(3, 1);
        assert_eq!(image.data(), &[0; 12]);
    }
}
