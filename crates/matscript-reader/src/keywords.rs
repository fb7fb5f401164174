//! Keyword tables mapping script identifiers to render enumerations.

use std::collections::HashMap;
use std::sync::OnceLock;

use matscript_video::types::*;

use crate::diagnostics::Diagnostics;

/// String to enumeration lookup for one domain.
///
/// Misses never fail: [`resolve`](Self::resolve) warns and falls back to the
/// table's default.
#[derive(Debug, Clone)]
pub struct KeywordTable<T: Copy + 'static> {
    domain: &'static str,
    default: T,
    entries: HashMap<&'static str, T>,
}

impl<T: Copy + 'static> KeywordTable<T> {
    pub fn new(domain: &'static str, default: T, entries: &[(&'static str, T)]) -> Self {
        Self {
            domain,
            default,
            entries: entries.iter().copied().collect(),
        }
    }

    pub fn get(&self, keyword: &str) -> Option<T> {
        self.entries.get(keyword).copied()
    }

    pub fn resolve(&self, keyword: &str, diag: &mut Diagnostics) -> T {
        self.resolve_or(keyword, self.default, diag)
    }

    pub fn resolve_or(&self, keyword: &str, fallback: T, diag: &mut Diagnostics) -> T {
        match self.get(keyword) {
            Some(value) => value,
            None => {
                diag.warning(format!("Unknown {} \"{}\"", self.domain, keyword));
                fallback
            }
        }
    }

    pub fn default_value(&self) -> T {
        self.default
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All keyword tables of the material script language.
#[derive(Debug)]
pub struct Keywords {
    pub shading: KeywordTable<Shading>,
    pub compare: KeywordTable<CompareMode>,
    pub blend: KeywordTable<BlendFactor>,
    pub wireframe: KeywordTable<Wireframe>,
    pub face: KeywordTable<Face>,
    pub shader_type: KeywordTable<ShaderType>,
    pub shader_version: KeywordTable<ShaderVersion>,
    pub data_type: KeywordTable<DataType>,
    pub vertex_flag: KeywordTable<VertexFlag>,
    pub texture_type: KeywordTable<TextureType>,
    pub buffer_type: KeywordTable<BufferType>,
    pub pixel_format: KeywordTable<PixelFormat>,
    pub hardware_format: KeywordTable<HardwareFormat>,
    pub wrap: KeywordTable<WrapMode>,
    pub filter: KeywordTable<TextureFilterMode>,
    pub mip_filter: KeywordTable<MipMapFilter>,
    pub environment: KeywordTable<TextureEnvironment>,
    pub mapping: KeywordTable<MappingGeneration>,
    pub playback: KeywordTable<PlaybackMode>,
}

/// The shared tables, built on first use.
pub fn keywords() -> &'static Keywords {
    static KEYWORDS: OnceLock<Keywords> = OnceLock::new();
    KEYWORDS.get_or_init(Keywords::build)
}

impl Keywords {
    fn build() -> Self {
        use ShaderVersion as V;
        Self {
            shading: KeywordTable::new(
                "shading type",
                Shading::Flat,
                &[
                    ("flat", Shading::Flat),
                    ("gouraud", Shading::Gouraud),
                    ("phong", Shading::Phong),
                    ("perPixel", Shading::PerPixel),
                ],
            ),
            compare: KeywordTable::new(
                "size compare type",
                CompareMode::Never,
                &[
                    ("never", CompareMode::Never),
                    ("equal", CompareMode::Equal),
                    ("notEqual", CompareMode::NotEqual),
                    ("less", CompareMode::Less),
                    ("lessEqual", CompareMode::LessEqual),
                    ("greater", CompareMode::Greater),
                    ("greaterEqual", CompareMode::GreaterEqual),
                    ("always", CompareMode::Always),
                ],
            ),
            blend: KeywordTable::new(
                "blend type",
                BlendFactor::Zero,
                &[
                    ("zero", BlendFactor::Zero),
                    ("one", BlendFactor::One),
                    ("srcColor", BlendFactor::SrcColor),
                    ("invSrcColor", BlendFactor::InvSrcColor),
                    ("srcAlpha", BlendFactor::SrcAlpha),
                    ("invSrcAlpha", BlendFactor::InvSrcAlpha),
                    ("destColor", BlendFactor::DestColor),
                    ("invDestColor", BlendFactor::InvDestColor),
                    ("destAlpha", BlendFactor::DestAlpha),
                    ("invDestAlpha", BlendFactor::InvDestAlpha),
                ],
            ),
            wireframe: KeywordTable::new(
                "wireframe type",
                Wireframe::Points,
                &[
                    ("points", Wireframe::Points),
                    ("lines", Wireframe::Lines),
                    ("solid", Wireframe::Solid),
                ],
            ),
            face: KeywordTable::new(
                "face type",
                Face::Front,
                &[("front", Face::Front), ("back", Face::Back), ("both", Face::Both)],
            ),
            shader_type: KeywordTable::new(
                "shader type",
                ShaderType::Dummy,
                &[
                    ("vertexAsm", ShaderType::VertexProgram),
                    ("pixelAsm", ShaderType::PixelProgram),
                    ("vertex", ShaderType::Vertex),
                    ("pixel", ShaderType::Pixel),
                    ("geometry", ShaderType::Geometry),
                    ("hull", ShaderType::Hull),
                    ("domain", ShaderType::Domain),
                    ("compute", ShaderType::Compute),
                ],
            ),
            shader_version: KeywordTable::new(
                "shader version",
                V::Dummy,
                &[
                    ("std120", V::Glsl120),
                    ("std130", V::Glsl130),
                    ("std140", V::Glsl140),
                    ("std150", V::Glsl150),
                    ("std330", V::Glsl330),
                    ("std400", V::Glsl400),
                    ("std410", V::Glsl410),
                    ("std420", V::Glsl420),
                    ("std430", V::Glsl430),
                    ("vs_1_0", V::Vs1_0),
                    ("vs_2_0", V::Vs2_0),
                    ("vs_2_a", V::Vs2a),
                    ("vs_3_0", V::Vs3_0),
                    ("vs_4_0", V::Vs4_0),
                    ("vs_4_1", V::Vs4_1),
                    ("vs_5_0", V::Vs5_0),
                    ("ps_1_0", V::Ps1_0),
                    ("ps_1_1", V::Ps1_1),
                    ("ps_1_2", V::Ps1_2),
                    ("ps_1_3", V::Ps1_3),
                    ("ps_1_4", V::Ps1_4),
                    ("ps_2_0", V::Ps2_0),
                    ("ps_2_a", V::Ps2a),
                    ("ps_2_b", V::Ps2b),
                    ("ps_3_0", V::Ps3_0),
                    ("ps_4_0", V::Ps4_0),
                    ("ps_4_1", V::Ps4_1),
                    ("ps_5_0", V::Ps5_0),
                    ("gs_4_0", V::Gs4_0),
                    ("gs_4_1", V::Gs4_1),
                    ("gs_5_0", V::Gs5_0),
                    ("cs_4_0", V::Cs4_0),
                    ("cs_4_1", V::Cs4_1),
                    ("cs_5_0", V::Cs5_0),
                    ("hs_5_0", V::Hs5_0),
                    ("ds_5_0", V::Ds5_0),
                    ("cg_2_0", V::Cg2_0),
                ],
            ),
            data_type: KeywordTable::new(
                "data type",
                DataType::Float,
                &[
                    ("float", DataType::Float),
                    ("double", DataType::Double),
                    ("byte", DataType::Byte),
                    ("short", DataType::Short),
                    ("int", DataType::Int),
                    ("ubyte", DataType::UnsignedByte),
                    ("ushort", DataType::UnsignedShort),
                    ("uint", DataType::UnsignedInt),
                ],
            ),
            vertex_flag: KeywordTable::new(
                "vertex flag",
                VertexFlag::Universal,
                &[
                    ("coord", VertexFlag::Coord),
                    ("color", VertexFlag::Color),
                    ("normal", VertexFlag::Normal),
                    ("binormal", VertexFlag::Binormal),
                    ("tangent", VertexFlag::Tangent),
                    ("fogCoord", VertexFlag::FogCoord),
                    ("texCoord", VertexFlag::TexCoords),
                    ("universal", VertexFlag::Universal),
                ],
            ),
            texture_type: KeywordTable::new(
                "texture type",
                TextureType::Tex2D,
                &[
                    ("tex1D", TextureType::Tex1D),
                    ("tex2D", TextureType::Tex2D),
                    ("tex3D", TextureType::Tex3D),
                    ("texCube", TextureType::Cubemap),
                    ("tex1DArray", TextureType::Tex1DArray),
                    ("tex2DArray", TextureType::Tex2DArray),
                    ("texCubeArray", TextureType::CubemapArray),
                    ("texRect", TextureType::Rectangle),
                    ("texBuffer", TextureType::Buffer),
                    ("tex1DRW", TextureType::Tex1DRw),
                    ("tex2DRW", TextureType::Tex2DRw),
                    ("tex3DRW", TextureType::Tex3DRw),
                    ("tex1DArrayRW", TextureType::Tex1DArrayRw),
                    ("tex2DArrayRW", TextureType::Tex2DArrayRw),
                ],
            ),
            buffer_type: KeywordTable::new(
                "image buffer type",
                BufferType::Ubyte,
                &[("ubyte", BufferType::Ubyte), ("float", BufferType::Float)],
            ),
            pixel_format: KeywordTable::new(
                "pixel format",
                PixelFormat::Rgba,
                &[
                    ("alpha", PixelFormat::Alpha),
                    ("gray", PixelFormat::Gray),
                    ("grayAlpha", PixelFormat::GrayAlpha),
                    ("rgb", PixelFormat::Rgb),
                    ("bgr", PixelFormat::Bgr),
                    ("rgba", PixelFormat::Rgba),
                    ("bgra", PixelFormat::Bgra),
                    ("depthComponent", PixelFormat::Depth),
                ],
            ),
            hardware_format: KeywordTable::new(
                "hardware texture format",
                HardwareFormat::Ubyte8,
                &[
                    ("ubyte8", HardwareFormat::Ubyte8),
                    ("float16", HardwareFormat::Float16),
                    ("float32", HardwareFormat::Float32),
                    ("int32", HardwareFormat::Int32),
                    ("uint32", HardwareFormat::Uint32),
                ],
            ),
            wrap: KeywordTable::new(
                "texture wrap mode",
                WrapMode::Repeat,
                &[
                    ("repeat", WrapMode::Repeat),
                    ("mirror", WrapMode::Mirror),
                    ("clamp", WrapMode::Clamp),
                ],
            ),
            filter: KeywordTable::new(
                "texture filter",
                TextureFilterMode::Smooth,
                &[("linear", TextureFilterMode::Linear), ("smooth", TextureFilterMode::Smooth)],
            ),
            mip_filter: KeywordTable::new(
                "MIP-map filter",
                MipMapFilter::Trilinear,
                &[
                    ("bilinear", MipMapFilter::Bilinear),
                    ("trilinear", MipMapFilter::Trilinear),
                    ("anisotropic", MipMapFilter::Anisotropic),
                ],
            ),
            environment: KeywordTable::new(
                "texture environment type",
                TextureEnvironment::Modulate,
                &[
                    ("modulate", TextureEnvironment::Modulate),
                    ("replace", TextureEnvironment::Replace),
                    ("add", TextureEnvironment::Add),
                    ("addSigned", TextureEnvironment::AddSigned),
                    ("subtract", TextureEnvironment::Subtract),
                    ("interpolate", TextureEnvironment::Interpolate),
                    ("dot3", TextureEnvironment::Dot3),
                ],
            ),
            mapping: KeywordTable::new(
                "texture coordinates mapping generation",
                MappingGeneration::Disable,
                &[
                    ("disable", MappingGeneration::Disable),
                    ("objectLinear", MappingGeneration::ObjectLinear),
                    ("eyeLinear", MappingGeneration::EyeLinear),
                    ("sphereMap", MappingGeneration::SphereMap),
                    ("normalMap", MappingGeneration::NormalMap),
                    ("reflectionMap", MappingGeneration::ReflectionMap),
                ],
            ),
            playback: KeywordTable::new(
                "animation playback mode",
                PlaybackMode::Loop,
                &[
                    ("oneShot", PlaybackMode::OneShot),
                    ("oneLoop", PlaybackMode::OneLoop),
                    ("loop", PlaybackMode::Loop),
                    ("pingPong", PlaybackMode::PingPong),
                    ("pingPongLoop", PlaybackMode::PingPongLoop),
                ],
            ),
        }
    }
}
