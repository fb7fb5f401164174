//! A render system without a device.
//!
//! Everything it is asked to create is recorded in plain structs, which
//! makes it the render system of the command line tools and of tests.

use std::collections::HashSet;

use crate::color::Color;
use crate::layer::{LayerKind, TextureLayer};
use crate::material::MaterialStates;
use crate::render::{InputLayout, RenderSystem, TextureHandle};
use crate::texture::{TextureFilter, TextureFlags};
use crate::types::{
    Backend, BufferType, BuiltinVertexFormat, HardwareFormat, PixelFormat, ShaderType,
    ShaderVersion, TextureType,
};
use crate::vertex::VertexFormat;

/// One compiled stage of a [`HeadlessShaderClass`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessShaderStage {
    pub stage: ShaderType,
    pub version: ShaderVersion,
    pub source: Vec<String>,
    pub entry_point: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessShaderClass {
    /// Copy of the vertex format the class was created with
    pub input_layout: Option<VertexFormat>,
    pub stages: Vec<HeadlessShaderStage>,
    pub compiled: bool,
}

/// Contents written by a fill call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextureFill {
    Ubyte(Color),
    Float([f32; 4]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessTexture {
    /// File the texture was loaded from, `None` for created textures
    pub source: Option<String>,
    pub flags: TextureFlags,
    pub fill: Option<TextureFill>,
    pub render_target: bool,
    pub color_key: Option<Color>,
}

impl HeadlessTexture {
    fn new(source: Option<String>, flags: TextureFlags) -> Self {
        Self {
            source,
            flags,
            fill: None,
            render_target: false,
            color_key: None,
        }
    }
}

impl TextureHandle for HeadlessTexture {
    fn set_filter(&mut self, filter: &TextureFilter) {
        self.flags.filter = filter.clone();
    }
    fn set_format(&mut self, format: PixelFormat) {
        self.flags.format = format;
    }
    fn set_hardware_format(&mut self, format: HardwareFormat) {
        self.flags.hardware_format = format;
    }
    fn set_size(&mut self, width: i32, height: i32) {
        self.flags.width = width;
        self.flags.height = height;
    }
    fn set_type(&mut self, ty: TextureType, depth: i32) {
        self.flags.ty = ty;
        self.flags.depth = depth;
    }
    fn set_render_target(&mut self, enable: bool) {
        self.render_target = enable;
    }
    fn set_color_key(&mut self, key: Color) {
        self.color_key = Some(key);
    }
    fn buffer_type(&self) -> BufferType {
        self.flags.buffer_type
    }
    fn fill_ubyte(&mut self, color: Color) {
        self.fill = Some(TextureFill::Ubyte(color));
    }
    fn fill_float(&mut self, color: [f32; 4]) {
        self.fill = Some(TextureFill::Float(color));
    }
}

/// Render system that records instead of rendering.
///
/// `load_texture` succeeds for every path except those registered with
/// [`with_missing_texture`](Self::with_missing_texture); no image is decoded.
#[derive(Debug, Clone)]
pub struct HeadlessRenderSystem {
    backend: Backend,
    shaders_supported: bool,
    missing_textures: HashSet<String>,
    builtin_formats: [VertexFormat; 4],
    pub materials_created: usize,
    pub vertex_formats_created: usize,
    pub texture_layers_created: usize,
    /// Number of shader classes created so far
    pub shader_classes_created: usize,
    /// Number of successful `compile_shader_class` calls
    pub shader_classes_compiled: usize,
    /// Paths passed to `load_texture`, in call order
    pub texture_requests: Vec<String>,
}

impl HeadlessRenderSystem {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            shaders_supported: true,
            missing_textures: HashSet::new(),
            builtin_formats: [
                VertexFormat::builtin(BuiltinVertexFormat::Default),
                VertexFormat::builtin(BuiltinVertexFormat::Reduced),
                VertexFormat::builtin(BuiltinVertexFormat::Extended),
                VertexFormat::builtin(BuiltinVertexFormat::Full),
            ],
            materials_created: 0,
            vertex_formats_created: 0,
            texture_layers_created: 0,
            shader_classes_created: 0,
            shader_classes_compiled: 0,
            texture_requests: Vec::new(),
        }
    }

    /// Reports shaders as unsupported.
    pub fn without_shader_support(mut self) -> Self {
        self.shaders_supported = false;
        self
    }

    /// Makes `load_texture` fail for `path`.
    pub fn with_missing_texture(mut self, path: impl Into<String>) -> Self {
        self.missing_textures.insert(path.into());
        self
    }
}

impl Default for HeadlessRenderSystem {
    fn default() -> Self {
        Self::new(Backend::OpenGl)
    }
}

impl RenderSystem for HeadlessRenderSystem {
    type Material = MaterialStates;
    type Format = VertexFormat;
    type Layer = TextureLayer;
    type ShaderClass = HeadlessShaderClass;
    type Texture = HeadlessTexture;

    fn backend(&self) -> Backend {
        self.backend
    }

    fn supports_shaders(&self) -> bool {
        self.shaders_supported
    }

    fn create_material(&mut self) -> MaterialStates {
        self.materials_created += 1;
        MaterialStates::default()
    }

    fn create_vertex_format(&mut self) -> VertexFormat {
        self.vertex_formats_created += 1;
        VertexFormat::new()
    }

    fn builtin_vertex_format(&self, format: BuiltinVertexFormat) -> &VertexFormat {
        match format {
            BuiltinVertexFormat::Default => &self.builtin_formats[0],
            BuiltinVertexFormat::Reduced => &self.builtin_formats[1],
            BuiltinVertexFormat::Extended => &self.builtin_formats[2],
            BuiltinVertexFormat::Full => &self.builtin_formats[3],
        }
    }

    fn create_texture_layer(&mut self, kind: LayerKind) -> TextureLayer {
        self.texture_layers_created += 1;
        TextureLayer::new(kind)
    }

    fn create_shader_class(
        &mut self,
        input_layout: Option<InputLayout<'_, VertexFormat>>,
    ) -> HeadlessShaderClass {
        self.shader_classes_created += 1;
        let input_layout = input_layout.map(|layout| match layout {
            InputLayout::Builtin(format) => self.builtin_vertex_format(format).clone(),
            InputLayout::Declared(format) => format.clone(),
        });
        HeadlessShaderClass {
            input_layout,
            stages: Vec::new(),
            compiled: false,
        }
    }

    fn compile_shader_stage(
        &mut self,
        class: &mut HeadlessShaderClass,
        stage: ShaderType,
        version: ShaderVersion,
        source: &[String],
        entry_point: &str,
    ) -> bool {
        if source.is_empty() {
            return false;
        }
        class.stages.push(HeadlessShaderStage {
            stage,
            version,
            source: source.to_vec(),
            entry_point: entry_point.to_string(),
        });
        true
    }

    fn compile_shader_class(&mut self, class: &mut HeadlessShaderClass) -> bool {
        class.compiled = !class.stages.is_empty();
        if class.compiled {
            self.shader_classes_compiled += 1;
        }
        class.compiled
    }

    fn load_texture(&mut self, path: &str) -> Option<HeadlessTexture> {
        self.texture_requests.push(path.to_string());
        if self.missing_textures.contains(path) {
            return None;
        }
        let flags = TextureFlags {
            filename: path.to_string(),
            ..TextureFlags::default()
        };
        Some(HeadlessTexture::new(Some(path.to_string()), flags))
    }

    fn create_texture(&mut self, flags: &TextureFlags) -> HeadlessTexture {
        HeadlessTexture::new(None, flags.clone())
    }
}
