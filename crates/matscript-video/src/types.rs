//! Render state enumerations referenced by material scripts.

/// Lighting interpolation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shading {
    Flat,
    Gouraud,
    Phong,
    PerPixel,
}

/// Depth and alpha test functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareMode {
    Never,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    InvSrcColor,
    SrcAlpha,
    InvSrcAlpha,
    DestColor,
    InvDestColor,
    DestAlpha,
    InvDestAlpha,
}

/// Polygon fill mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wireframe {
    Points,
    Lines,
    Solid,
}

/// Which faces get rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Back,
    Both,
}

/// Shader pipeline stage. `Dummy` marks an unresolved stage keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderType {
    VertexProgram,
    PixelProgram,
    Vertex,
    Pixel,
    Geometry,
    Hull,
    Domain,
    Compute,
    Dummy,
}

impl ShaderType {
    /// Entry point used when a stage block names none.
    ///
    /// Assembly programs have no entry point.
    pub fn default_entry_point(self) -> &'static str {
        match self {
            ShaderType::Vertex => "VertexMain",
            ShaderType::Pixel => "PixelMain",
            ShaderType::Geometry => "GeometryMain",
            ShaderType::Hull => "HullMain",
            ShaderType::Domain => "DomainMain",
            ShaderType::Compute => "ComputeMain",
            ShaderType::VertexProgram | ShaderType::PixelProgram | ShaderType::Dummy => "",
        }
    }
}

/// Shader model / language version a stage is compiled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderVersion {
    Dummy,
    Glsl120,
    Glsl130,
    Glsl140,
    Glsl150,
    Glsl330,
    Glsl400,
    Glsl410,
    Glsl420,
    Glsl430,
    Vs1_0,
    Vs2_0,
    Vs2a,
    Vs3_0,
    Vs4_0,
    Vs4_1,
    Vs5_0,
    Ps1_0,
    Ps1_1,
    Ps1_2,
    Ps1_3,
    Ps1_4,
    Ps2_0,
    Ps2a,
    Ps2b,
    Ps3_0,
    Ps4_0,
    Ps4_1,
    Ps5_0,
    Gs4_0,
    Gs4_1,
    Gs5_0,
    Cs4_0,
    Cs4_1,
    Cs5_0,
    Hs5_0,
    Ds5_0,
    Cg2_0,
}

/// Component type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Float,
    Double,
    Byte,
    Short,
    Int,
    UnsignedByte,
    UnsignedShort,
    UnsignedInt,
}

/// Semantic flag attached to a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFlag {
    Coord,
    Color,
    Normal,
    Binormal,
    Tangent,
    FogCoord,
    TexCoords,
    Universal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    Tex1D,
    Tex2D,
    Tex3D,
    Cubemap,
    Tex1DArray,
    Tex2DArray,
    CubemapArray,
    Rectangle,
    Buffer,
    Tex1DRw,
    Tex2DRw,
    Tex3DRw,
    Tex1DArrayRw,
    Tex2DArrayRw,
}

/// Element type of a texture's image buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferType {
    Ubyte,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Alpha,
    Gray,
    GrayAlpha,
    Rgb,
    Bgr,
    Rgba,
    Bgra,
    Depth,
}

/// Storage format on the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareFormat {
    Ubyte8,
    Float16,
    Float32,
    Int32,
    Uint32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    Repeat,
    Mirror,
    Clamp,
}

/// Magnification / minification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFilterMode {
    Linear,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MipMapFilter {
    Bilinear,
    Trilinear,
    Anisotropic,
}

/// How a texture layer combines with the layers below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureEnvironment {
    Modulate,
    Replace,
    Add,
    AddSigned,
    Subtract,
    Interpolate,
    Dot3,
}

/// Texture coordinate generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingGeneration {
    Disable,
    ObjectLinear,
    EyeLinear,
    SphereMap,
    NormalMap,
    ReflectionMap,
}

/// Animation playback mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackMode {
    OneShot,
    OneLoop,
    Loop,
    PingPong,
    PingPongLoop,
}

/// Vertex formats every render system provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinVertexFormat {
    Default,
    Reduced,
    Extended,
    Full,
}

impl BuiltinVertexFormat {
    /// Looks up a builtin format by its script name (`vertexFormatDefault`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "vertexFormatDefault" => Some(BuiltinVertexFormat::Default),
            "vertexFormatReduced" => Some(BuiltinVertexFormat::Reduced),
            "vertexFormatExtended" => Some(BuiltinVertexFormat::Extended),
            "vertexFormatFull" => Some(BuiltinVertexFormat::Full),
            _ => None,
        }
    }
}

/// Shading language dialect blocks inside a `shader` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderDialect {
    Glsl,
    GlslEs,
    Hlsl3,
    Hlsl5,
}

impl ShaderDialect {
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "glsl" => Some(ShaderDialect::Glsl),
            "glslEs" => Some(ShaderDialect::GlslEs),
            "hlsl3" => Some(ShaderDialect::Hlsl3),
            "hlsl5" => Some(ShaderDialect::Hlsl5),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ShaderDialect::Glsl => "glsl",
            ShaderDialect::GlslEs => "glslEs",
            ShaderDialect::Hlsl3 => "hlsl3",
            ShaderDialect::Hlsl5 => "hlsl5",
        }
    }
}

/// The renderer a render system drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    OpenGl,
    OpenGlEs2,
    Direct3D9,
    Direct3D11,
    /// No renderer; every dialect block is skipped.
    None,
}

impl Backend {
    /// The one shader dialect this backend consumes.
    pub fn dialect(self) -> Option<ShaderDialect> {
        match self {
            Backend::OpenGl => Some(ShaderDialect::Glsl),
            Backend::OpenGlEs2 => Some(ShaderDialect::GlslEs),
            Backend::Direct3D9 => Some(ShaderDialect::Hlsl3),
            Backend::Direct3D11 => Some(ShaderDialect::Hlsl5),
            Backend::None => None,
        }
    }
}
