//! The material script reader.
//!
//! A recursive-descent reader over the token cursor. Every top-level
//! declaration (`material`, `shader`, `vertexFormat`, `texture`,
//! `textureLayer`) has its own block grammar; attribute values are read by
//! a small set of value readers shared by all grammars. Malformed input
//! aborts the load with an [`Error`]; unknown keywords and variables only
//! produce diagnostics.

use std::borrow::BorrowMut;
use std::fs;
use std::path::Path;

use matscript_lexer::{validate_brackets, Scanner};
use matscript_syntax::error::{error, error_at, Error, ErrorKind, Result};
use matscript_syntax::token::{Token, TokenKind};
use matscript_video::{
    BufferType, BuiltinVertexFormat, Color, InputLayout, LayerKind, MaterialStates, RenderSystem,
    ShaderDialect, ShaderVersion, TextureFlags, TextureHandle, TextureLayer, TextureType,
    VertexAttribute, VertexAttributeKind,
};

use crate::cursor::TokenCursor;
use crate::diagnostics::Diagnostics;
use crate::env::{parse_number, Env, Value};
use crate::keywords::{keywords, KeywordTable, Keywords};
use crate::registry::{count_label, Registry};

/// Name of the variable every load predefines with the working directory.
pub const WORKING_DIR_VAR: &str = "workingDir";

/// Host configuration of a [`ScriptReader`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderOptions {
    /// Value of `@workingDir`, always ending in `/`
    pub working_dir: String,
}

impl ReaderOptions {
    pub fn new(working_dir: impl Into<String>) -> Self {
        let mut working_dir = working_dir.into();
        if !working_dir.ends_with('/') {
            working_dir.push('/');
        }
        Self { working_dir }
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        let dir = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        Self::new(dir)
    }
}

/// Texture settings collected while a texture block is open.
#[derive(Debug, Clone)]
struct TextureScratch {
    flags: TextureFlags,
    fill_color: Color,
    color_key: Color,
    render_target: bool,
}

impl Default for TextureScratch {
    fn default() -> Self {
        Self {
            flags: TextureFlags::default(),
            fill_color: Color::WHITE,
            color_key: Color::WHITE,
            render_target: false,
        }
    }
}

/// Reads material scripts and creates their resources through a [`RenderSystem`].
///
/// Resources are kept in per-kind registries until the next load. A failed
/// load keeps whatever was registered before the failure.
pub struct ScriptReader<R: RenderSystem> {
    render_system: R,
    keywords: &'static Keywords,
    options: ReaderOptions,
    env: Env,
    host_vars: Vec<(String, Value)>,
    diagnostics: Diagnostics,

    materials: Registry<R::Material>,
    shaders: Registry<R::ShaderClass>,
    vertex_formats: Registry<R::Format>,
    textures: Registry<R::Texture>,
    texture_layers: Registry<R::Layer>,

    texture_scratch: TextureScratch,
    shader_version: ShaderVersion,
    shader_source: Vec<String>,

    cursor: TokenCursor,
    last_error: Option<Error>,
}

impl<R: RenderSystem> ScriptReader<R> {
    pub fn new(render_system: R) -> Self {
        Self::with_options(render_system, ReaderOptions::default())
    }

    pub fn with_options(render_system: R, options: ReaderOptions) -> Self {
        Self {
            render_system,
            keywords: keywords(),
            options,
            env: Env::new(),
            host_vars: Vec::new(),
            diagnostics: Diagnostics::new(),
            materials: Registry::new(),
            shaders: Registry::new(),
            vertex_formats: Registry::new(),
            textures: Registry::new(),
            texture_layers: Registry::new(),
            texture_scratch: TextureScratch::default(),
            shader_version: ShaderVersion::Dummy,
            shader_source: Vec::new(),
            cursor: TokenCursor::default(),
            last_error: None,
        }
    }

    // ---- Entry points ----

    /// Loads a script file. On failure the error is logged, kept in
    /// [`last_error`](Self::last_error) and `false` returned.
    pub fn load_script(&mut self, path: impl AsRef<Path>) -> bool {
        let result = self.read_script(path);
        self.finish(result)
    }

    /// Loads a script from memory; see [`load_script`](Self::load_script).
    pub fn load_source(&mut self, source: &str) -> bool {
        let result = self.read_source(source);
        self.finish(result)
    }

    pub fn read_script(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.begin_load();
        self.diagnostics
            .info(format!("Load material script: \"{}\"", path.display()));
        let source = fs::read_to_string(path).map_err(|e| {
            Error::new(ErrorKind::FileRead {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;
        self.parse(&source)
    }

    pub fn read_source(&mut self, source: &str) -> Result<()> {
        self.begin_load();
        self.parse(source)
    }

    /// Loads an already scanned token sequence.
    pub fn read_tokens(&mut self, tokens: Vec<Token>) -> Result<()> {
        self.begin_load();
        self.parse_tokens(tokens)
    }

    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn render_system(&self) -> &R {
        &self.render_system
    }

    pub fn render_system_mut(&mut self) -> &mut R {
        &mut self.render_system
    }

    pub fn into_render_system(self) -> R {
        self.render_system
    }

    // ---- Lookup ----

    pub fn find_material(&self, name: &str) -> Option<&R::Material> {
        self.materials.get(name)
    }

    pub fn find_shader(&self, name: &str) -> Option<&R::ShaderClass> {
        self.shaders.get(name)
    }

    /// Declared vertex formats, or the render system's builtin format for
    /// the reserved `vertexFormat*` names.
    pub fn find_vertex_format(&self, name: &str) -> Option<&R::Format> {
        match BuiltinVertexFormat::from_name(name) {
            Some(builtin) => Some(self.render_system.builtin_vertex_format(builtin)),
            None => self.vertex_formats.get(name),
        }
    }

    pub fn find_texture(&self, name: &str) -> Option<&R::Texture> {
        self.textures.get(name)
    }

    pub fn find_texture_layer(&self, name: &str) -> Option<&R::Layer> {
        self.texture_layers.get(name)
    }

    pub fn materials(&self) -> &Registry<R::Material> {
        &self.materials
    }

    pub fn shaders(&self) -> &Registry<R::ShaderClass> {
        &self.shaders
    }

    pub fn vertex_formats(&self) -> &Registry<R::Format> {
        &self.vertex_formats
    }

    pub fn textures(&self) -> &Registry<R::Texture> {
        &self.textures
    }

    pub fn texture_layers(&self) -> &Registry<R::Layer> {
        &self.texture_layers
    }

    /// Predefines a string variable for this and every later load.
    ///
    /// Returns false if the name is already bound.
    pub fn define_string(&mut self, name: &str, value: &str) -> bool {
        self.define_host(name, Value::Str(value.to_string()))
    }

    /// Predefines a number variable for this and every later load.
    pub fn define_number(&mut self, name: &str, value: f64) -> bool {
        self.define_host(name, Value::Number(value))
    }

    fn define_host(&mut self, name: &str, value: Value) -> bool {
        if self.host_vars.iter().any(|(n, _)| n == name) {
            self.diagnostics
                .error(format!("Variable \"{}\" already used in material script", name));
            return false;
        }
        if !self.env.define(name, value.clone(), &mut self.diagnostics) {
            return false;
        }
        self.host_vars.push((name.to_string(), value));
        true
    }

    // ---- Load lifecycle ----

    fn begin_load(&mut self) {
        self.diagnostics.clear();
        self.last_error = None;

        self.materials.clear();
        self.shaders.clear();
        self.vertex_formats.clear();
        self.textures.clear();
        self.texture_layers.clear();

        self.texture_scratch = TextureScratch::default();
        self.shader_version = ShaderVersion::Dummy;
        self.shader_source.clear();

        self.env.clear();
        self.env
            .set(WORKING_DIR_VAR, Value::Str(self.options.working_dir.clone()));
        for (name, value) in &self.host_vars {
            self.env.set(name, value.clone());
        }
    }

    fn parse(&mut self, source: &str) -> Result<()> {
        let tokens = Scanner::new(source).tokenize()?;
        self.parse_tokens(tokens)
    }

    fn parse_tokens(&mut self, tokens: Vec<Token>) -> Result<()> {
        if tokens.iter().all(|tk| tk.is_whitespace() || tk.is_eof()) {
            return error(ErrorKind::InvalidTokenStream);
        }
        validate_brackets(&tokens)?;

        self.cursor = TokenCursor::new(tokens);
        let result = self.read_declarations();
        self.cursor = TokenCursor::default();
        result?;

        self.print_info();
        Ok(())
    }

    fn finish(&mut self, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                self.diagnostics.error(err.to_string());
                self.last_error = Some(err);
                false
            }
        }
    }

    fn print_info(&mut self) {
        let parts: Vec<String> = [
            count_label(self.materials.len(), "material"),
            count_label(self.shaders.len(), "shader"),
            count_label(self.vertex_formats.len(), "vertex format"),
            count_label(self.textures.len(), "texture"),
            count_label(self.texture_layers.len(), "texture layer"),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !parts.is_empty() {
            self.diagnostics.info(format!("Created {}", parts.join(", ")));
        }
    }

    // ---- Block structure ----

    fn read_declarations(&mut self) -> Result<()> {
        loop {
            let tk = self.cursor.advance(true).clone();
            match tk.kind {
                TokenKind::Eof => return Ok(()),
                TokenKind::At => self.read_var_definition()?,
                TokenKind::Name => match tk.text.as_str() {
                    "discard" => self.discard_block()?,
                    "material" => self.read_material()?,
                    "shader" => self.read_shader_class()?,
                    "vertexFormat" => self.read_vertex_format()?,
                    "texture" => self.read_texture()?,
                    "textureLayer" => self.read_texture_layer()?,
                    _ => return unexpected_identifier(&tk),
                },
                _ => return unexpected_token(&tk),
            }
        }
    }

    /// Reads attribute lines up to the `}` closing the current block.
    fn read_block<F>(&mut self, mut attribute: F) -> Result<()>
    where
        F: FnMut(&mut Self, &Token) -> Result<()>,
    {
        loop {
            let tk = self.cursor.advance_no_eof(true)?.clone();
            match tk.kind {
                TokenKind::RBrace => return Ok(()),
                TokenKind::Name if tk.text == "discard" => self.discard_block()?,
                TokenKind::Name => attribute(self, &tk)?,
                TokenKind::At => self.read_var_definition()?,
                _ => return unexpected_token(&tk),
            }
        }
    }

    /// `{` followed by a block of attribute lines.
    fn read_attributes<F>(&mut self, attribute: F) -> Result<()>
    where
        F: FnMut(&mut Self, &Token) -> Result<()>,
    {
        self.expect_block_begin()?;
        self.read_block(attribute)
    }

    /// `discard { ... }`; the block must follow directly.
    fn discard_block(&mut self) -> Result<()> {
        let next = self.cursor.peek(true).clone();
        match next.kind {
            TokenKind::LBrace => self.cursor.ignore_block(),
            _ => unexpected_token(&next),
        }
    }

    fn expect_block_begin(&mut self) -> Result<()> {
        let tk = self.cursor.advance_no_eof(true)?;
        if tk.kind != TokenKind::LBrace {
            return unexpected_token(tk);
        }
        Ok(())
    }

    /// The quoted name of a declaration.
    fn read_declaration_name(&mut self) -> Result<Token> {
        let tk = self.cursor.advance_no_eof(true)?.clone();
        if tk.kind != TokenKind::String || tk.text.is_empty() {
            return error_at(tk.row, tk.column, ErrorKind::ExpectedIdentifier);
        }
        Ok(tk)
    }

    fn with_newlines<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let previous = self.cursor.set_newline_significant(true);
        let result = f(self);
        self.cursor.set_newline_significant(previous);
        result
    }

    // ---- Variables ----

    /// `@name = initializer`, with the cursor on the `@`.
    fn read_var_definition(&mut self) -> Result<()> {
        self.with_newlines(|r| {
            let name = r.cursor.read_var_name()?;
            if r.env.contains(&name) {
                r.diagnostics
                    .warning(format!("Multiple definition of variable named \"{}\"", name));
            }
            let tk = r.cursor.advance_no_eof(true)?;
            if tk.kind != TokenKind::Equal {
                return error_at(tk.row, tk.column, ErrorKind::ExpectedAssignment);
            }
            let value = r.env.evaluate_assignment(&mut r.cursor, &mut r.diagnostics)?;
            r.env.set(&name, value);
            Ok(())
        })
    }

    // ---- Attribute values ----

    /// Consumes an optional `=` before a value.
    fn skip_assignment(&mut self) {
        if self.cursor.peek(true).kind == TokenKind::Equal {
            self.cursor.advance(true);
        }
    }

    /// `[-] (integer | float | @numberVariable)`
    fn read_number_term(&mut self) -> Result<f64> {
        let mut tk = self.cursor.advance_no_eof(true)?.clone();
        let factor = if tk.kind == TokenKind::Minus {
            tk = self.cursor.advance_no_eof(true)?.clone();
            -1.0
        } else {
            1.0
        };
        let value = match tk.kind {
            TokenKind::Int | TokenKind::Float => parse_number(&tk)?,
            TokenKind::At => {
                let name = self.cursor.read_var_name()?;
                self.env.lookup_number(&name, &mut self.diagnostics)
            }
            TokenKind::Name => return unexpected_identifier(&tk),
            _ => return unexpected_token(&tk),
        };
        Ok(factor * value)
    }

    fn read_number(&mut self) -> Result<f64> {
        self.skip_assignment();
        self.read_number_term()
    }

    fn read_identifier(&mut self) -> Result<String> {
        self.skip_assignment();
        let tk = self.cursor.advance_no_eof(true)?;
        if tk.kind != TokenKind::Name {
            return unexpected_token(tk);
        }
        Ok(tk.text.clone())
    }

    fn read_bool(&mut self) -> Result<bool> {
        self.skip_assignment();
        let tk = self.cursor.advance_no_eof(true)?.clone();
        match tk.kind {
            TokenKind::Name if tk.text == "true" => Ok(true),
            TokenKind::Name if tk.text == "false" => Ok(false),
            TokenKind::Name => unexpected_identifier(&tk),
            _ => unexpected_token(&tk),
        }
    }

    fn read_keyword<T: Copy>(&mut self, table: &KeywordTable<T>) -> Result<T> {
        let keyword = self.read_identifier()?;
        Ok(table.resolve(&keyword, &mut self.diagnostics))
    }

    /// `term (+ term)*` on one line; a term is a string literal or `@stringVariable`.
    fn read_string(&mut self) -> Result<String> {
        self.with_newlines(|r| {
            r.skip_assignment();
            let mut result = String::new();
            loop {
                let tk = r.cursor.advance_no_eof(true)?.clone();
                match tk.kind {
                    TokenKind::String => result.push_str(&tk.text),
                    TokenKind::At => {
                        let name = r.cursor.read_var_name()?;
                        let s = r.env.lookup_string(&name, &mut r.diagnostics);
                        result.push_str(&s);
                    }
                    _ => return error_at(tk.row, tk.column, ErrorKind::ExpectedString),
                }
                if r.cursor.peek(true).kind != TokenKind::Plus {
                    return Ok(result);
                }
                r.cursor.advance(true);
            }
        })
    }

    /// A texture name, either bare or quoted.
    fn read_name_or_string(&mut self) -> Result<String> {
        self.skip_assignment();
        match self.cursor.peek(true).kind {
            TokenKind::String | TokenKind::At => self.read_string(),
            _ => self.read_identifier(),
        }
    }

    /// Up to four comma separated components on one line.
    fn read_color(&mut self) -> Result<Color> {
        self.with_newlines(|r| {
            r.skip_assignment();
            let mut color = Color::WHITE;
            let mut count = 0;
            loop {
                let component = r.read_number_term()?;
                color.set_component(count, component.clamp(0.0, 255.0) as u8);
                count += 1;
                if r.cursor.peek(true).kind != TokenKind::Comma {
                    break;
                }
                r.cursor.advance(true);
            }
            if count == 1 {
                color = Color::gray(color.red);
            }
            Ok(color)
        })
    }

    // ---- material ----

    fn read_material(&mut self) -> Result<()> {
        let name = self.read_declaration_name()?;
        if self.materials.contains(&name.text) {
            return duplicate("material", &name);
        }
        self.expect_block_begin()?;
        let material = self.render_system.create_material();
        self.materials.insert(&name.text, material);
        self.read_block(Self::read_material_attribute)
    }

    fn set_material(&mut self, apply: impl FnOnce(&mut MaterialStates)) {
        if let Some(material) = self.materials.current_mut() {
            apply(material.borrow_mut());
        }
    }

    fn read_material_attribute(&mut self, tk: &Token) -> Result<()> {
        let kw = self.keywords;
        match tk.text.as_str() {
            "ambient" => {
                let c = self.read_color()?;
                self.set_material(|m| m.ambient = c);
            }
            "diffuse" => {
                let c = self.read_color()?;
                self.set_material(|m| m.diffuse = c);
            }
            "specular" => {
                let c = self.read_color()?;
                self.set_material(|m| m.specular = c);
            }
            "emission" => {
                let c = self.read_color()?;
                self.set_material(|m| m.emission = c);
            }
            "shininess" => {
                let v = self.read_number()? as f32;
                self.set_material(|m| m.shininess = v);
            }
            "offsetFactor" => {
                let v = self.read_number()? as f32;
                self.set_material(|m| m.offset_factor = v);
            }
            "offsetUnits" => {
                let v = self.read_number()? as f32;
                self.set_material(|m| m.offset_units = v);
            }
            "alphaReference" => {
                let v = self.read_number()? as f32;
                self.set_material(|m| m.alpha_reference = v);
            }
            "colorMaterial" => {
                let v = self.read_bool()?;
                self.set_material(|m| m.color_material = v);
            }
            "lighting" => {
                let v = self.read_bool()?;
                self.set_material(|m| m.lighting = v);
            }
            "blending" => {
                let v = self.read_bool()?;
                self.set_material(|m| m.blending = v);
            }
            "depthTest" => {
                let v = self.read_bool()?;
                self.set_material(|m| m.depth_test = v);
            }
            "fog" => {
                let v = self.read_bool()?;
                self.set_material(|m| m.fog = v);
            }
            "polygonOffset" => {
                let v = self.read_bool()?;
                self.set_material(|m| m.polygon_offset = v);
            }
            "shading" => {
                let v = self.read_keyword(&kw.shading)?;
                self.set_material(|m| m.shading = v);
            }
            "wireframe" => {
                let v = self.read_keyword(&kw.wireframe)?;
                self.set_material(|m| m.set_wireframe(v));
            }
            "wireframeFront" => {
                let v = self.read_keyword(&kw.wireframe)?;
                self.set_material(|m| m.wireframe_front = v);
            }
            "wireframeBack" => {
                let v = self.read_keyword(&kw.wireframe)?;
                self.set_material(|m| m.wireframe_back = v);
            }
            "depthMethod" => {
                let v = self.read_keyword(&kw.compare)?;
                self.set_material(|m| m.depth_method = v);
            }
            "alphaMethod" => {
                let v = self.read_keyword(&kw.compare)?;
                self.set_material(|m| m.alpha_method = v);
            }
            "blendSource" => {
                let v = self.read_keyword(&kw.blend)?;
                self.set_material(|m| m.blend_source = v);
            }
            "blendTarget" => {
                let v = self.read_keyword(&kw.blend)?;
                self.set_material(|m| m.blend_target = v);
            }
            "renderFace" => {
                let v = self.read_keyword(&kw.face)?;
                self.set_material(|m| m.render_face = v);
            }
            _ => return unexpected_identifier(tk),
        }
        Ok(())
    }

    // ---- shader ----

    fn read_shader_class(&mut self) -> Result<()> {
        let name = self.read_declaration_name()?;

        if !self.render_system.supports_shaders() {
            self.diagnostics.error(format!(
                "Can not create shader class \"{}\" because shaders are not supported by this render system",
                name.text
            ));
            return self.cursor.ignore_block();
        }
        if self.shaders.contains(&name.text) {
            return duplicate("shader", &name);
        }

        let tk = self.cursor.advance_no_eof(true)?.clone();
        let format_name = match tk.kind {
            TokenKind::LBrace => None,
            TokenKind::Name => {
                if BuiltinVertexFormat::from_name(&tk.text).is_none()
                    && !self.vertex_formats.contains(&tk.text)
                {
                    self.diagnostics
                        .warning(format!("Unknown vertex format named \"{}\"", tk.text));
                }
                self.expect_block_begin()?;
                Some(tk.text)
            }
            _ => return unexpected_token(&tk),
        };

        let layout = format_name
            .as_deref()
            .and_then(|name| input_layout(&self.vertex_formats, name));
        let class = self.render_system.create_shader_class(layout);
        self.shaders.insert(&name.text, class);
        self.read_block(Self::read_shader_dialect)
    }

    fn read_shader_dialect(&mut self, tk: &Token) -> Result<()> {
        let dialect = match ShaderDialect::from_keyword(&tk.text) {
            Some(d) => d,
            None => return unexpected_identifier(tk),
        };
        if self.render_system.backend().dialect() != Some(dialect) {
            self.diagnostics
                .info(format!("Skip {} shader code for this render system", dialect.keyword()));
            return self.cursor.ignore_block();
        }

        self.read_attributes(Self::read_shader_stage)?;

        let compiled = match self.shaders.current_mut() {
            Some(class) => self.render_system.compile_shader_class(class),
            None => false,
        };
        if !compiled {
            let name = self.shaders.names().last().unwrap_or_default().to_string();
            self.diagnostics
                .warning(format!("Compiling shader class \"{}\" failed", name));
        }
        Ok(())
    }

    fn read_shader_stage(&mut self, tk: &Token) -> Result<()> {
        let stage = match self.keywords.shader_type.get(&tk.text) {
            Some(stage) => stage,
            None => return unexpected_identifier(tk),
        };

        let next = self.cursor.advance_no_eof(true)?.clone();
        let entry_point = match next.kind {
            TokenKind::LBrace => stage.default_entry_point().to_string(),
            TokenKind::String if !next.text.is_empty() => {
                self.expect_block_begin()?;
                next.text
            }
            _ => return error_at(next.row, next.column, ErrorKind::InvalidEntryPoint),
        };

        self.read_block(Self::read_shader_code)?;
        let close = self.cursor.current().clone();

        let version = std::mem::replace(&mut self.shader_version, ShaderVersion::Dummy);
        let source = std::mem::take(&mut self.shader_source);
        if version == ShaderVersion::Dummy {
            return error_at(close.row, close.column, ErrorKind::MissingShaderVersion);
        }
        if source.is_empty() {
            self.diagnostics.warning("Empty shader code");
            return Ok(());
        }

        let compiled = match self.shaders.current_mut() {
            Some(class) => {
                self.render_system
                    .compile_shader_stage(class, stage, version, &source, &entry_point)
            }
            None => false,
        };
        if !compiled {
            self.diagnostics
                .warning(format!("Compiling {:?} shader stage failed", stage));
        }
        Ok(())
    }

    fn require_shader_version(&self, tk: &Token) -> Result<()> {
        if self.shader_version == ShaderVersion::Dummy {
            return error_at(tk.row, tk.column, ErrorKind::MissingShaderVersion);
        }
        Ok(())
    }

    fn read_shader_code(&mut self, tk: &Token) -> Result<()> {
        match tk.text.as_str() {
            "version" => {
                let kw = self.keywords;
                self.shader_version = self.read_keyword(&kw.shader_version)?;
            }
            "source" => {
                self.require_shader_version(tk)?;
                let code = self.read_string()?;
                self.shader_source.push(code);
            }
            "sourceFile" => {
                self.require_shader_version(tk)?;
                let path = self.read_string()?;
                match fs::read_to_string(&path) {
                    Ok(text) => {
                        self.shader_source
                            .extend(text.lines().map(|line| format!("{}\n", line)));
                    }
                    Err(e) => self
                        .diagnostics
                        .error(format!("Could not read shader file \"{}\": {}", path, e)),
                }
            }
            _ => return unexpected_identifier(tk),
        }
        Ok(())
    }

    // ---- vertexFormat ----

    fn read_vertex_format(&mut self) -> Result<()> {
        let name = self.read_declaration_name()?;
        if name.text.starts_with("vertexFormat") {
            return error_at(name.row, name.column, ErrorKind::ReservedName(name.text));
        }
        if self.vertex_formats.contains(&name.text) {
            return duplicate("vertex format", &name);
        }
        self.expect_block_begin()?;
        let format = self.render_system.create_vertex_format();
        self.vertex_formats.insert(&name.text, format);
        self.read_block(Self::read_vertex_attribute)
    }

    fn read_vertex_attribute(&mut self, tk: &Token) -> Result<()> {
        let kind = match VertexAttributeKind::from_keyword(&tk.text) {
            Some(kind) => kind,
            None => return unexpected_identifier(tk),
        };
        let mut attribute = VertexAttribute::new(kind);

        if kind == VertexAttributeKind::Universal {
            let name = self.cursor.advance_no_eof(true)?;
            if name.kind != TokenKind::String || name.text.is_empty() {
                return error_at(name.row, name.column, ErrorKind::ExpectedString);
            }
            attribute.name = name.text.clone();
        }

        self.read_attributes(|r, tk| r.read_vertex_component(tk, &mut attribute))?;

        if let Some(format) = self.vertex_formats.current_mut() {
            format.borrow_mut().push(attribute);
        }
        Ok(())
    }

    fn read_vertex_component(&mut self, tk: &Token, attribute: &mut VertexAttribute) -> Result<()> {
        let kw = self.keywords;
        match tk.text.as_str() {
            "size" => attribute.size = self.read_number()?.max(0.0) as u32,
            "type" => attribute.data_type = self.read_keyword(&kw.data_type)?,
            "normalize" => attribute.normalize = self.read_bool()?,
            "attribute" => attribute.flag = self.read_keyword(&kw.vertex_flag)?,
            _ => return unexpected_identifier(tk),
        }
        Ok(())
    }

    // ---- texture ----

    fn read_texture(&mut self) -> Result<()> {
        let name = self.read_declaration_name()?;
        if self.textures.contains(&name.text) {
            return duplicate("texture", &name);
        }
        self.expect_block_begin()?;
        self.texture_scratch = TextureScratch::default();
        self.read_block(Self::read_texture_attribute)?;

        let close = self.cursor.current().clone();
        let scratch = std::mem::take(&mut self.texture_scratch);
        let texture = self.build_texture(scratch, &close)?;
        self.textures.insert(&name.text, texture);
        Ok(())
    }

    fn build_texture(&mut self, scratch: TextureScratch, at: &Token) -> Result<R::Texture> {
        let flags = &scratch.flags;
        let mut texture = if !flags.filename.is_empty() {
            let mut texture = match self.render_system.load_texture(&flags.filename) {
                Some(texture) => texture,
                None => {
                    return error_at(at.row, at.column, ErrorKind::TextureLoad(flags.filename.clone()));
                }
            };
            texture.set_filter(&flags.filter);
            texture.set_format(flags.format);
            texture.set_hardware_format(flags.hardware_format);
            if flags.has_size() {
                texture.set_size(flags.width, flags.height);
            }
            if flags.ty != TextureType::Tex2D {
                texture.set_type(flags.ty, flags.depth);
            }
            texture
        } else {
            let mut texture = self.render_system.create_texture(flags);
            if !scratch.render_target {
                match texture.buffer_type() {
                    BufferType::Ubyte => texture.fill_ubyte(scratch.fill_color),
                    BufferType::Float => texture.fill_float(scratch.fill_color.to_f32_array()),
                }
            }
            texture
        };

        if scratch.render_target {
            texture.set_render_target(true);
        }
        if scratch.color_key.alpha < 255 {
            texture.set_color_key(scratch.color_key);
        }
        Ok(texture)
    }

    fn read_texture_attribute(&mut self, tk: &Token) -> Result<()> {
        let kw = self.keywords;
        match tk.text.as_str() {
            "imageFile" => self.texture_scratch.flags.filename = self.read_string()?,
            "fillColor" => self.texture_scratch.fill_color = self.read_color()?,
            "type" => self.texture_scratch.flags.ty = self.read_keyword(&kw.texture_type)?,
            "bufferType" => self.texture_scratch.flags.buffer_type = self.read_keyword(&kw.buffer_type)?,
            "format" => self.texture_scratch.flags.format = self.read_keyword(&kw.pixel_format)?,
            "formatHW" => {
                self.texture_scratch.flags.hardware_format = self.read_keyword(&kw.hardware_format)?
            }
            "width" => self.texture_scratch.flags.width = self.read_number()? as i32,
            "height" => self.texture_scratch.flags.height = self.read_number()? as i32,
            "depth" => self.texture_scratch.flags.depth = self.read_number()? as i32,
            "colorKey" => self.texture_scratch.color_key = self.read_color()?,
            "renderTarget" => self.texture_scratch.render_target = self.read_bool()?,
            "filter" => self.read_attributes(Self::read_texture_filter)?,
            _ => return unexpected_identifier(tk),
        }
        Ok(())
    }

    fn read_texture_filter(&mut self, tk: &Token) -> Result<()> {
        let kw = self.keywords;
        match tk.text.as_str() {
            "mipMaps" => self.texture_scratch.flags.filter.mip_maps = self.read_bool()?,
            "anisotropy" => {
                self.texture_scratch.flags.filter.anisotropy = self.read_number()?.max(0.0) as u32
            }
            "wrap" => self.texture_scratch.flags.filter.wrap = [self.read_keyword(&kw.wrap)?; 3],
            "wrapX" => self.texture_scratch.flags.filter.wrap[0] = self.read_keyword(&kw.wrap)?,
            "wrapY" => self.texture_scratch.flags.filter.wrap[1] = self.read_keyword(&kw.wrap)?,
            "wrapZ" => self.texture_scratch.flags.filter.wrap[2] = self.read_keyword(&kw.wrap)?,
            "min" => self.texture_scratch.flags.filter.min = self.read_keyword(&kw.filter)?,
            "mag" => self.texture_scratch.flags.filter.mag = self.read_keyword(&kw.filter)?,
            "mip" => self.texture_scratch.flags.filter.mip = self.read_keyword(&kw.mip_filter)?,
            _ => return unexpected_identifier(tk),
        }
        Ok(())
    }

    // ---- textureLayer ----

    fn read_texture_layer(&mut self) -> Result<()> {
        let name = self.read_declaration_name()?;
        if self.texture_layers.contains(&name.text) {
            return duplicate("texture layer", &name);
        }

        let ty = self.cursor.advance_no_eof(true)?.clone();
        if ty.kind != TokenKind::Name {
            return unexpected_token(&ty);
        }
        let kind = match LayerKind::from_keyword(&ty.text) {
            Some(kind) => kind,
            None => return error_at(ty.row, ty.column, ErrorKind::UnknownLayerType(ty.text)),
        };

        self.expect_block_begin()?;
        let layer = self.render_system.create_texture_layer(kind);
        self.texture_layers.insert(&name.text, layer);
        self.read_block(Self::read_texture_layer_attribute)
    }

    fn set_layer(&mut self, apply: impl FnOnce(&mut TextureLayer)) {
        if let Some(layer) = self.texture_layers.current_mut() {
            apply(layer.borrow_mut());
        }
    }

    fn read_texture_layer_attribute(&mut self, tk: &Token) -> Result<()> {
        let kw = self.keywords;
        match tk.text.as_str() {
            "tex" => {
                let texture = self.read_name_or_string()?;
                let bound = if self.textures.contains(&texture) {
                    Some(texture)
                } else {
                    self.diagnostics
                        .warning(format!("Unknown texture named \"{}\"", texture));
                    None
                };
                self.set_layer(|l| l.texture = bound);
            }
            "enable" => {
                let v = self.read_bool()?;
                self.set_layer(|l| l.enabled = v);
            }
            "visibleMask" => {
                let v = self.read_number()? as i64 as u32;
                self.set_layer(|l| l.visible_mask = v);
            }
            "index" => {
                let v = self.read_number()?.clamp(0.0, 255.0) as u8;
                self.set_layer(|l| l.index = v);
            }
            "environment" => {
                let v = self.read_keyword(&kw.environment)?;
                self.set_layer(|l| {
                    if let LayerKind::Standard { environment, .. } = &mut l.kind {
                        *environment = v;
                    }
                });
            }
            "mapping" => {
                let v = self.read_keyword(&kw.mapping)?;
                self.set_layer(|l| {
                    if let LayerKind::Standard { mapping, .. } = &mut l.kind {
                        *mapping = v;
                    }
                });
            }
            "reliefEnable" => {
                let v = self.read_bool()?;
                self.set_layer(|l| {
                    if let LayerKind::Relief { relief_enabled, .. } = &mut l.kind {
                        *relief_enabled = v;
                    }
                });
            }
            "heightMapScale" => {
                let v = self.read_number()? as f32;
                self.set_layer(|l| {
                    if let LayerKind::Relief { height_map_scale, .. } = &mut l.kind {
                        *height_map_scale = v;
                    }
                });
            }
            "viewRange" => {
                let v = self.read_number()? as f32;
                self.set_layer(|l| {
                    if let LayerKind::Relief { view_range, .. } = &mut l.kind {
                        *view_range = v;
                    }
                });
            }
            "minSamples" => {
                let v = self.read_number()? as i32;
                self.set_layer(|l| {
                    if let LayerKind::Relief { min_samples, .. } = &mut l.kind {
                        *min_samples = v;
                    }
                });
            }
            "maxSamples" => {
                let v = self.read_number()? as i32;
                self.set_layer(|l| {
                    if let LayerKind::Relief { max_samples, .. } = &mut l.kind {
                        *max_samples = v;
                    }
                });
            }
            _ => return unexpected_identifier(tk),
        }
        Ok(())
    }
}

/// Input layout for a shader whose header names `name`; `None` for unknown formats.
fn input_layout<'a, F>(formats: &'a Registry<F>, name: &str) -> Option<InputLayout<'a, F>> {
    match BuiltinVertexFormat::from_name(name) {
        Some(builtin) => Some(InputLayout::Builtin(builtin)),
        None => formats.get(name).map(InputLayout::Declared),
    }
}

fn unexpected_token<T>(tk: &Token) -> Result<T> {
    if tk.is_eof() {
        return error_at(tk.row, tk.column, ErrorKind::UnexpectedEndOfInput);
    }
    error_at(tk.row, tk.column, ErrorKind::UnexpectedToken(tk.to_string()))
}

fn unexpected_identifier<T>(tk: &Token) -> Result<T> {
    error_at(tk.row, tk.column, ErrorKind::UnexpectedIdentifier(tk.text.clone()))
}

fn duplicate<T>(kind: &'static str, name: &Token) -> Result<T> {
    error_at(
        name.row,
        name.column,
        ErrorKind::DuplicateDeclaration {
            kind,
            name: name.text.clone(),
        },
    )
}
