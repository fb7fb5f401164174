//! Texture layers bind a texture into a material's pipeline slot.

use crate::types::{MappingGeneration, TextureEnvironment};

/// Kind-specific part of a texture layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    /// Plain layer with only the common settings
    Base,
    /// Fixed-function layer
    Standard {
        environment: TextureEnvironment,
        mapping: MappingGeneration,
    },
    /// Relief (parallax occlusion) mapping layer
    Relief {
        relief_enabled: bool,
        height_map_scale: f32,
        view_range: f32,
        min_samples: i32,
        max_samples: i32,
    },
}

impl LayerKind {
    /// Resolves a layer type name (`base`, `standard`, `relief`) to its default settings.
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "base" => Some(LayerKind::Base),
            "standard" => Some(LayerKind::Standard {
                environment: TextureEnvironment::Modulate,
                mapping: MappingGeneration::Disable,
            }),
            "relief" => Some(LayerKind::Relief {
                relief_enabled: true,
                height_map_scale: 0.015,
                view_range: 2.0,
                min_samples: 0,
                max_samples: 50,
            }),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Base => "base",
            LayerKind::Standard { .. } => "standard",
            LayerKind::Relief { .. } => "relief",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextureLayer {
    /// Name of the bound texture, if any
    pub texture: Option<String>,
    pub enabled: bool,
    pub visible_mask: u32,
    pub index: u8,
    pub kind: LayerKind,
}

impl TextureLayer {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            texture: None,
            enabled: true,
            visible_mask: u32::MAX,
            index: 0,
            kind,
        }
    }
}
