//! The resource factory seam between the script reader and a renderer.

use std::borrow::BorrowMut;

use crate::color::Color;
use crate::layer::{LayerKind, TextureLayer};
use crate::material::MaterialStates;
use crate::texture::{TextureFilter, TextureFlags};
use crate::types::{
    Backend, BufferType, BuiltinVertexFormat, HardwareFormat, PixelFormat, ShaderType,
    ShaderVersion, TextureType,
};
use crate::vertex::VertexFormat;

/// Vertex input layout a shader class is created with.
///
/// `F` is the vertex format handle of the render system. Builtin formats are
/// owned by the render system and named by kind only.
#[derive(Debug)]
pub enum InputLayout<'a, F> {
    Builtin(BuiltinVertexFormat),
    Declared(&'a F),
}

/// Creates the GPU-side resources a material script declares.
///
/// Implementations own whatever device state they need. The reader calls
/// them inline while parsing and stores the returned handles in its
/// registries. Materials, vertex formats and texture layers are configured
/// through the plain state each handle exposes with [`BorrowMut`].
pub trait RenderSystem {
    type Material: BorrowMut<MaterialStates>;
    type Format: BorrowMut<VertexFormat>;
    type Layer: BorrowMut<TextureLayer>;
    type ShaderClass;
    type Texture: TextureHandle;

    fn backend(&self) -> Backend;

    fn supports_shaders(&self) -> bool {
        true
    }

    fn create_material(&mut self) -> Self::Material;

    /// An empty vertex format for a `vertexFormat` declaration.
    fn create_vertex_format(&mut self) -> Self::Format;

    fn builtin_vertex_format(&self, format: BuiltinVertexFormat) -> &Self::Format;

    fn create_texture_layer(&mut self, kind: LayerKind) -> Self::Layer;

    fn create_shader_class(
        &mut self,
        input_layout: Option<InputLayout<'_, Self::Format>>,
    ) -> Self::ShaderClass;

    /// Compiles one stage into `class`. Returns false if compilation failed.
    fn compile_shader_stage(
        &mut self,
        class: &mut Self::ShaderClass,
        stage: ShaderType,
        version: ShaderVersion,
        source: &[String],
        entry_point: &str,
    ) -> bool;

    /// Links every stage of `class`. Returns false if linking failed.
    fn compile_shader_class(&mut self, class: &mut Self::ShaderClass) -> bool;

    /// Loads a texture from an image file, `None` if it could not be read.
    fn load_texture(&mut self, path: &str) -> Option<Self::Texture>;

    fn create_texture(&mut self, flags: &TextureFlags) -> Self::Texture;
}

/// Post-creation configuration of a texture.
pub trait TextureHandle {
    fn set_filter(&mut self, filter: &TextureFilter);
    fn set_format(&mut self, format: PixelFormat);
    fn set_hardware_format(&mut self, format: HardwareFormat);
    fn set_size(&mut self, width: i32, height: i32);
    fn set_type(&mut self, ty: TextureType, depth: i32);
    fn set_render_target(&mut self, enable: bool);
    fn set_color_key(&mut self, key: Color);
    fn buffer_type(&self) -> BufferType;
    /// Fills every pixel of a byte image buffer.
    fn fill_ubyte(&mut self, color: Color);
    /// Fills every pixel of a float image buffer.
    fn fill_float(&mut self, color: [f32; 4]);
}
