//! Custom vertex formats.

use crate::types::{BuiltinVertexFormat, DataType, VertexFlag};

/// Role of one attribute in a vertex format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeKind {
    Coord,
    Color,
    Normal,
    Binormal,
    Tangent,
    TexCoord,
    FogCoord,
    Universal,
}

impl VertexAttributeKind {
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "coord" => Some(VertexAttributeKind::Coord),
            "color" => Some(VertexAttributeKind::Color),
            "normal" => Some(VertexAttributeKind::Normal),
            "binormal" => Some(VertexAttributeKind::Binormal),
            "tangent" => Some(VertexAttributeKind::Tangent),
            "texCoord" => Some(VertexAttributeKind::TexCoord),
            "fogCoord" => Some(VertexAttributeKind::FogCoord),
            "universal" => Some(VertexAttributeKind::Universal),
            _ => None,
        }
    }

    /// Component type and count an attribute of this kind starts with.
    pub fn default_layout(self) -> (DataType, u32) {
        match self {
            VertexAttributeKind::Color => (DataType::UnsignedByte, 4),
            VertexAttributeKind::TexCoord => (DataType::Float, 2),
            _ => (DataType::Float, 3),
        }
    }
}

/// One attribute of a vertex format.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexAttribute {
    pub kind: VertexAttributeKind,
    /// Shader attribute name; only universal attributes carry one.
    pub name: String,
    pub data_type: DataType,
    pub size: u32,
    pub normalize: bool,
    pub flag: VertexFlag,
}

impl VertexAttribute {
    /// An attribute with the default layout of `kind`.
    pub fn new(kind: VertexAttributeKind) -> Self {
        let (data_type, size) = kind.default_layout();
        Self {
            kind,
            name: String::new(),
            data_type,
            size,
            normalize: false,
            flag: VertexFlag::Universal,
        }
    }
}

/// Ordered attribute list declared by a `vertexFormat` block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexFormat {
    pub attributes: Vec<VertexAttribute>,
}

impl VertexFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute layout of a builtin format, each attribute with its default layout.
    pub fn builtin(format: BuiltinVertexFormat) -> Self {
        use VertexAttributeKind::*;
        let kinds: &[VertexAttributeKind] = match format {
            BuiltinVertexFormat::Default => &[Coord, Color, Normal, TexCoord],
            BuiltinVertexFormat::Reduced => &[Coord, Normal, TexCoord],
            BuiltinVertexFormat::Extended => &[Coord, Color, Normal, TexCoord, TexCoord, FogCoord],
            BuiltinVertexFormat::Full => &[
                Coord, Color, Normal, Binormal, Tangent, TexCoord, TexCoord, TexCoord, TexCoord,
                FogCoord,
            ],
        };
        Self {
            attributes: kinds.iter().map(|&kind| VertexAttribute::new(kind)).collect(),
        }
    }

    pub fn push(&mut self, attribute: VertexAttribute) {
        self.attributes.push(attribute);
    }

    /// First attribute of the given kind.
    pub fn find(&self, kind: VertexAttributeKind) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
