//! Texture creation flags.

use crate::types::{
    BufferType, HardwareFormat, MipMapFilter, PixelFormat, TextureFilterMode, TextureType,
    WrapMode,
};

/// Sampling state of a texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureFilter {
    pub mip_maps: bool,
    pub anisotropy: u32,
    /// Wrap modes along x, y and z.
    pub wrap: [WrapMode; 3],
    pub min: TextureFilterMode,
    pub mag: TextureFilterMode,
    pub mip: MipMapFilter,
}

impl Default for TextureFilter {
    fn default() -> Self {
        Self {
            mip_maps: true,
            anisotropy: 0,
            wrap: [WrapMode::Repeat; 3],
            min: TextureFilterMode::Smooth,
            mag: TextureFilterMode::Smooth,
            mip: MipMapFilter::Trilinear,
        }
    }
}

/// Everything needed to create or configure one texture.
///
/// A texture block accumulates these flags; an empty `filename` means the
/// texture is created from the flags instead of loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureFlags {
    pub filename: String,
    pub ty: TextureType,
    pub buffer_type: BufferType,
    pub format: PixelFormat,
    pub hardware_format: HardwareFormat,
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    pub filter: TextureFilter,
}

impl Default for TextureFlags {
    fn default() -> Self {
        Self {
            filename: String::new(),
            ty: TextureType::Tex2D,
            buffer_type: BufferType::Ubyte,
            format: PixelFormat::Rgba,
            hardware_format: HardwareFormat::Ubyte8,
            width: 0,
            height: 0,
            depth: 1,
            filter: TextureFilter::default(),
        }
    }
}

impl TextureFlags {
    /// True when both width and height were given.
    pub fn has_size(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}
