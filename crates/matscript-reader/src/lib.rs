//! Material script reader: turns material scripts into render resources.
//!
//! The [`ScriptReader`] scans a script, walks the tokens with a
//! [`TokenCursor`], evaluates `@variable` definitions in an [`Env`] and calls a
//! [`RenderSystem`](matscript_video::RenderSystem) for every declared
//! resource. The handles it returns are kept in the reader's registries.

pub mod cursor;
pub mod diagnostics;
pub mod env;
pub mod keywords;
pub mod reader;
pub mod registry;

pub use cursor::TokenCursor;
pub use diagnostics::{Diagnostic, Diagnostics, Level};
pub use env::{Env, Value};
pub use keywords::{keywords, KeywordTable, Keywords};
pub use reader::{ReaderOptions, ScriptReader, WORKING_DIR_VAR};
pub use registry::Registry;

#[cfg(test)]
mod tests {
    use super::*;
    use matscript_lexer::Scanner;
    use matscript_syntax::{ErrorKind, TokenKind};
    use matscript_video::*;

    fn reader() -> ScriptReader<HeadlessRenderSystem> {
        ScriptReader::with_options(HeadlessRenderSystem::new(Backend::OpenGl), ReaderOptions::new("/data"))
    }

    fn load(src: &str) -> ScriptReader<HeadlessRenderSystem> {
        let mut r = reader();
        if let Err(e) = r.read_source(src) {
            panic!("Script failed: {}\nInput: {}", e, src);
        }
        r
    }

    fn load_err(src: &str) -> (ScriptReader<HeadlessRenderSystem>, ErrorKind) {
        let mut r = reader();
        match r.read_source(src) {
            Ok(()) => panic!("Expected error but script loaded: {}", src),
            Err(e) => (r, e.kind),
        }
    }

    fn cursor(src: &str) -> TokenCursor {
        TokenCursor::new(Scanner::new(src).tokenize().expect("Scanning should succeed"))
    }

    fn eval(env: &Env, src: &str) -> (matscript_syntax::Result<Value>, Diagnostics) {
        let mut c = cursor(src);
        c.set_newline_significant(true);
        assert_eq!(c.advance(true).kind, TokenKind::Equal);
        let mut diag = Diagnostics::new();
        let result = env.evaluate_assignment(&mut c, &mut diag);
        (result, diag)
    }

    // ---- cursor ----

    #[test]
    fn test_cursor_sentinels() {
        let mut c = cursor("a b");
        assert_eq!(c.current().kind, TokenKind::Unknown);
        assert_eq!(c.retreat(true).kind, TokenKind::Unknown);
        assert!(c.advance(true).is_name("a"));
        assert!(c.advance(true).is_name("b"));
        assert!(c.advance(true).is_eof());
        assert!(c.advance(true).is_eof());
        assert!(c.retreat(true).is_name("b"));
        assert!(c.retreat(false).kind == TokenKind::Blank);
        assert!(c.retreat(true).is_name("a"));
        assert_eq!(c.retreat(true).kind, TokenKind::Unknown);
    }

    #[test]
    fn test_cursor_newline_significance() {
        let mut c = cursor("a\n  b");
        c.advance(true);
        assert!(c.peek(true).is_name("b"));
        assert!(!c.set_newline_significant(true));
        assert_eq!(c.peek(true).kind, TokenKind::Newline);
        assert_eq!(c.advance(false).kind, TokenKind::Newline);
        assert!(c.set_newline_significant(false));
        assert!(c.advance(true).is_name("b"));
    }

    #[test]
    fn test_cursor_advance_no_eof() {
        let mut c = cursor("x");
        assert!(c.advance_no_eof(true).is_ok());
        let err = c.advance_no_eof(true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn test_cursor_advance_until_kind() {
        let mut c = cursor("a b { c }");
        let (tk, skipped) = c.advance_until_kind(TokenKind::LBrace, true);
        assert_eq!(tk.kind, TokenKind::LBrace);
        assert_eq!(skipped, 2);
        let (tk, _) = c.advance_until_kind(TokenKind::Semicolon, true);
        assert!(tk.is_eof());
    }

    #[test]
    fn test_cursor_ignore_block() {
        let mut c = cursor("skip { a { b } c } next");
        c.advance(true);
        c.ignore_block().expect("block should be skipped");
        assert_eq!(c.current().kind, TokenKind::RBrace);
        assert!(c.advance(true).is_name("next"));

        let mut open = TokenCursor::new(Scanner::new("x { y").tokenize().expect("scan"));
        assert_eq!(open.ignore_block().unwrap_err().kind, ErrorKind::UnexpectedEndOfInput);
    }

    // ---- keywords ----

    #[test]
    fn test_keyword_lookup_and_defaults() {
        let kw = keywords();
        let mut diag = Diagnostics::new();
        assert_eq!(kw.shading.resolve("phong", &mut diag), Shading::Phong);
        assert!(diag.is_empty());

        assert_eq!(kw.shading.resolve("unknownMode", &mut diag), Shading::Flat);
        assert!(diag.contains(Level::Warning, "Unknown shading type \"unknownMode\""));

        assert_eq!(kw.compare.resolve("bogus", &mut diag), CompareMode::Never);
        assert_eq!(kw.wrap.resolve_or("bogus", WrapMode::Clamp, &mut diag), WrapMode::Clamp);
        assert_eq!(kw.shader_type.get("compute"), Some(ShaderType::Compute));
        assert_eq!(kw.shader_type.get("tessellation"), None);
        assert_eq!(kw.playback.default_value(), PlaybackMode::Loop);
        assert_eq!(kw.pixel_format.get("depthComponent"), Some(PixelFormat::Depth));
        assert_eq!(kw.texture_type.get("texCubeArray"), Some(TextureType::CubemapArray));
    }

    #[test]
    fn test_shader_version_keywords() {
        let kw = keywords();
        assert_eq!(kw.shader_version.get("std430"), Some(ShaderVersion::Glsl430));
        assert_eq!(kw.shader_version.get("vs_2_a"), Some(ShaderVersion::Vs2a));
        assert_eq!(kw.shader_version.get("ps_2_b"), Some(ShaderVersion::Ps2b));
        assert_eq!(kw.shader_version.get("cg_2_0"), Some(ShaderVersion::Cg2_0));
        assert_eq!(kw.shader_version.len(), 37);
        let mut diag = Diagnostics::new();
        assert_eq!(kw.shader_version.resolve("std999", &mut diag), ShaderVersion::Dummy);
        assert!(diag.contains(Level::Warning, "Unknown shader version"));
    }

    #[test]
    fn test_keyword_tables_are_shared() {
        assert!(std::ptr::eq(keywords(), keywords()));
    }

    // ---- variables ----

    #[test]
    fn test_env_define_and_lookup() {
        let mut env = Env::new();
        let mut diag = Diagnostics::new();
        assert!(env.define("a", Value::Str("x".into()), &mut diag));
        assert!(!env.define("a", Value::Number(1.0), &mut diag));
        assert!(diag.contains(Level::Error, "already used"));

        assert_eq!(env.lookup_string("a", &mut diag), "x");
        assert_eq!(env.lookup_number("missing", &mut diag), 0.0);
        assert!(diag.contains(Level::Warning, "Unknown variable named \"missing\""));
        // a string is no number
        assert_eq!(env.lookup_number("a", &mut diag), 0.0);
        assert!(diag.contains(Level::Warning, "Variable \"a\" is a string, expected a number"));
        assert!(!diag.contains(Level::Warning, "Unknown variable named \"a\""));

        env.set("n", Value::Number(3.0));
        assert_eq!(env.lookup_string("n", &mut diag), "");
        assert!(diag.contains(Level::Warning, "Variable \"n\" is a number, expected a string"));
    }

    #[test]
    fn test_variable_of_wrong_type_in_attribute() {
        let r = load("@name = \"x\"\nmaterial \"M\" { shininess @name }");
        assert_eq!(r.find_material("M").map(|m| m.shininess), Some(0.0));
        assert!(r.diagnostics().contains(Level::Warning, "is a string, expected a number"));
    }

    #[test]
    fn test_evaluate_concatenation() {
        let mut env = Env::new();
        env.set("a", Value::Str("foo".into()));
        let (v, _) = eval(&env, "= @a + \"bar\"\n");
        assert_eq!(v.expect("should evaluate"), Value::Str("foobar".into()));
    }

    #[test]
    fn test_evaluate_negation() {
        let mut env = Env::new();
        env.set("n", Value::Number(5.0));
        let (v, _) = eval(&env, "= -@n");
        assert_eq!(v.expect("should evaluate"), Value::Number(-5.0));
        let (v, _) = eval(&env, "= -2.5\n");
        assert_eq!(v.expect("should evaluate"), Value::Number(-2.5));
    }

    #[test]
    fn test_evaluate_type_errors() {
        let mut env = Env::new();
        env.set("s", Value::Str("x".into()));
        env.set("n", Value::Number(1.0));

        for src in ["= \"foo\" + 1", "= 5 + 3", "= -\"foo\"", "= -@s", "= \"a\" + @n", "= \"a\" + -1"] {
            let (v, _) = eval(&env, src);
            match v {
                Err(e) => assert!(matches!(e.kind, ErrorKind::TypeMismatch(_)), "{}: {:?}", src, e.kind),
                Ok(v) => panic!("expected type mismatch for {}, got {:?}", src, v),
            }
        }
    }

    #[test]
    fn test_evaluate_structure_errors() {
        let env = Env::new();
        let (v, _) = eval(&env, "=\n");
        assert_eq!(v.unwrap_err().kind, ErrorKind::EmptyInitializer);
        let (v, _) = eval(&env, "= \"a\" \"b\"");
        assert!(matches!(v.unwrap_err().kind, ErrorKind::UnexpectedToken(_)));
        let (v, _) = eval(&env, "= \"a\" +\n");
        assert!(matches!(v.unwrap_err().kind, ErrorKind::UnexpectedToken(_)));
        let (v, _) = eval(&env, "= {");
        assert!(matches!(v.unwrap_err().kind, ErrorKind::UnexpectedToken(_)));
    }

    #[test]
    fn test_evaluate_unknown_variables() {
        let env = Env::new();
        let (v, diag) = eval(&env, "= \"a\" + @nope + \"b\"");
        assert_eq!(v.expect("should evaluate"), Value::Str("ab".into()));
        assert!(diag.contains(Level::Warning, "Unknown variable named \"nope\""));
        let (v, _) = eval(&env, "= @nope");
        assert_eq!(v.expect("should evaluate"), Value::Number(0.0));
    }

    #[test]
    fn test_variable_definitions_in_script() {
        let r = load("@a = \"foo\"\n@b = @a + \"bar\"\n@n = 5\n@m = -@n\n");
        assert_eq!(r.env().get("b"), Some(&Value::Str("foobar".into())));
        assert_eq!(r.env().get("m"), Some(&Value::Number(-5.0)));
    }

    #[test]
    fn test_failed_definition_leaves_variable_unbound() {
        let (r, kind) = load_err("@x = \"foo\" + 1\n");
        assert!(matches!(kind, ErrorKind::TypeMismatch(_)));
        assert!(r.env().get("x").is_none());
    }

    #[test]
    fn test_numeric_values_are_never_summed() {
        let (_, kind) = load_err("@n = 5 + 3\n");
        assert!(matches!(kind, ErrorKind::TypeMismatch(_)));
    }

    #[test]
    fn test_variable_redefinition_warns_and_replaces() {
        let r = load("@a = 1\n@a = \"two\"\n");
        assert_eq!(r.env().get("a"), Some(&Value::Str("two".into())));
        assert!(r.diagnostics().contains(Level::Warning, "Multiple definition of variable named \"a\""));
    }

    #[test]
    fn test_variable_requires_assignment() {
        let (_, kind) = load_err("@a 5\n");
        assert_eq!(kind, ErrorKind::ExpectedAssignment);
        let (_, kind) = load_err("@ a = 5\n");
        assert_eq!(kind, ErrorKind::ExpectedIdentifier);
    }

    // ---- materials ----

    #[test]
    fn test_material_attributes() {
        let r = load(
            r#"
material "Rock" {
    ambient 10, 20, 30
    diffuse = 128
    specular 1, 2, 3, 4, 5
    shininess 4
    offsetUnits -2
    lighting false
    polygonOffset = true
    shading phong
    wireframe lines
    wireframeFront points
    depthMethod greaterEqual
    blendSource one
    renderFace both
}
"#,
        );
        let m = r.find_material("Rock").expect("material should exist");
        assert_eq!(m.ambient, Color::rgba(10, 20, 30, 255));
        assert_eq!(m.diffuse, Color::gray(128));
        assert_eq!(m.specular, Color::rgba(1, 2, 3, 4));
        assert_eq!(m.shininess, 4.0);
        assert_eq!(m.offset_units, -2.0);
        assert!(!m.lighting);
        assert!(m.polygon_offset);
        assert_eq!(m.shading, Shading::Phong);
        assert_eq!(m.wireframe_front, Wireframe::Points);
        assert_eq!(m.wireframe_back, Wireframe::Lines);
        assert_eq!(m.depth_method, CompareMode::GreaterEqual);
        assert_eq!(m.blend_source, BlendFactor::One);
        assert_eq!(m.render_face, Face::Both);
    }

    #[test]
    fn test_material_on_one_line() {
        let r = load("material \"M\" { ambient 10,20,30 shininess 4 }");
        let m = r.find_material("M").expect("material should exist");
        assert_eq!(m.ambient.red, 10);
        assert_eq!(m.shininess, 4.0);
    }

    #[test]
    fn test_unknown_keyword_falls_back() {
        let r = load("material \"M\" {\n    shading unknownMode\n}\n");
        assert_eq!(r.find_material("M").map(|m| m.shading), Some(Shading::Flat));
        assert!(r.diagnostics().contains(Level::Warning, "unknownMode"));
    }

    #[test]
    fn test_material_attributes_use_variables() {
        let r = load("@red = 200\n@shine = 8\nmaterial \"M\" {\n diffuse @red, 0, 0\n shininess = -@shine\n}\n");
        let m = r.find_material("M").expect("material should exist");
        assert_eq!(m.diffuse, Color::rgba(200, 0, 0, 255));
        assert_eq!(m.shininess, -8.0);
    }

    #[test]
    fn test_unknown_number_variable_reads_zero() {
        let r = load("material \"M\" { shininess @nothing }");
        assert_eq!(r.find_material("M").map(|m| m.shininess), Some(0.0));
        assert!(r.diagnostics().contains(Level::Warning, "Unknown variable named \"nothing\""));
    }

    #[test]
    fn test_bad_attribute_values() {
        let (r, kind) = load_err("material \"M\" {\n  shininess true\n}");
        assert_eq!(kind, ErrorKind::UnexpectedIdentifier("true".into()));
        assert_eq!(
            r.find_material("M").map(|m| m.shininess),
            Some(0.0),
            "the material is registered once its block opened"
        );

        let (_, kind) = load_err("material \"M\" { lighting maybe }");
        assert_eq!(kind, ErrorKind::UnexpectedIdentifier("maybe".into()));

        let (_, kind) = load_err("material \"M\" { glow 1 }");
        assert_eq!(kind, ErrorKind::UnexpectedIdentifier("glow".into()));
    }

    #[test]
    fn test_error_position() {
        let mut r = reader();
        assert!(!r.load_source("material \"M\" {\n  shininess true\n}"));
        let err = r.last_error().expect("error should be kept");
        assert_eq!((err.line, err.col), (Some(2), Some(13)));
        assert_eq!(err.to_string(), "unexpected identifier named \"true\" at 2:13");
        assert!(r.diagnostics().contains(Level::Error, "at 2:13"));
    }

    // ---- declarations ----

    #[test]
    fn test_well_formed_script_registers_everything() {
        let r = load(
            r#"
vertexFormat "VF" { coord { } }
texture "T" { }
textureLayer "L" base { tex T }
material "M" { }
shader "S" VF { }
"#,
        );
        assert!(r.find_vertex_format("VF").is_some());
        assert!(r.find_texture("T").is_some());
        assert!(r.find_texture_layer("L").is_some());
        assert!(r.find_material("M").is_some());
        assert!(r.find_shader("S").is_some());
        assert!(r.diagnostics().contains(
            Level::Info,
            "Created 1 material, 1 shader, 1 vertex format, 1 texture, 1 texture layer"
        ));
    }

    #[test]
    fn test_redeclaration_keeps_first() {
        let (r, kind) = load_err("material \"M\" { shininess 1 }\nmaterial \"M\" { shininess 2 }");
        assert_eq!(
            kind,
            ErrorKind::DuplicateDeclaration {
                kind: "material",
                name: "M".into()
            }
        );
        assert_eq!(r.find_material("M").map(|m| m.shininess), Some(1.0));
        assert_eq!(r.materials().len(), 1);
    }

    #[test]
    fn test_declaration_without_block_registers_nothing() {
        let (r, kind) = load_err("material \"M\" shininess 4");
        assert!(matches!(kind, ErrorKind::UnexpectedToken(_)));
        assert!(r.find_material("M").is_none());
    }

    #[test]
    fn test_declaration_name_must_be_quoted() {
        let (_, kind) = load_err("material M { }");
        assert_eq!(kind, ErrorKind::ExpectedIdentifier);
        let (_, kind) = load_err("texture \"\" { }");
        assert_eq!(kind, ErrorKind::ExpectedIdentifier);
    }

    #[test]
    fn test_top_level_errors() {
        let (_, kind) = load_err("materials \"M\" { }");
        assert_eq!(kind, ErrorKind::UnexpectedIdentifier("materials".into()));
        let (_, kind) = load_err("42");
        assert!(matches!(kind, ErrorKind::UnexpectedToken(_)));
        let (_, kind) = load_err("material \"M\" { shininess");
        assert_eq!(kind, ErrorKind::UnbalancedBracket('{'));
    }

    #[test]
    fn test_read_prescanned_tokens() {
        let src = "material \"A\" { shininess 4 }";
        let tokens = Scanner::new(src).tokenize().expect("Scanning should succeed");
        let mut r = reader();
        r.read_tokens(tokens).expect("tokens should load");
        assert_eq!(r.find_material("A").map(|m| m.shininess), Some(4.0));

        let unbalanced = Scanner::new("material \"A\" { (").tokenize().expect("Scanning should succeed");
        let err = r.read_tokens(unbalanced).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnbalancedBracket(_)));
        assert!(r.materials().is_empty());
    }

    #[test]
    fn test_empty_script_is_invalid() {
        for src in ["", "  \n\t\n", "// nothing here\n/* or here */"] {
            let (_, kind) = load_err(src);
            assert_eq!(kind, ErrorKind::InvalidTokenStream);
        }
        let mut r = reader();
        assert!(!r.load_source("\n"));
        assert_eq!(r.last_error().map(|e| e.kind.clone()), Some(ErrorKind::InvalidTokenStream));
    }

    #[test]
    fn test_unbalanced_script_creates_nothing() {
        let (r, kind) = load_err("material \"A\" { }\nmaterial \"B\" { ( }");
        assert_eq!(kind, ErrorKind::UnbalancedBracket('}'));
        assert!(r.materials().is_empty());
    }

    #[test]
    fn test_failed_load_keeps_earlier_resources() {
        let (r, _) = load_err("material \"A\" { }\nmaterial \"B\" { fog sometimes }");
        assert!(r.find_material("A").is_some());
        assert!(r.find_material("B").is_some());
    }

    #[test]
    fn test_discard_blocks() {
        let r = load("discard { material \"X\" { } }\nmaterial \"Y\" {\n discard { glow 5 { } }\n shininess 2\n}");
        assert!(r.find_material("X").is_none());
        assert_eq!(r.find_material("Y").map(|m| m.shininess), Some(2.0));

        let (_, kind) = load_err("discard material \"X\" { }");
        assert!(matches!(kind, ErrorKind::UnexpectedToken(_)));
    }

    fn entries<T: Clone>(registry: &Registry<T>) -> Vec<(String, T)> {
        registry.iter().map(|(n, v)| (n.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_repeated_loads_are_identical() {
        let src = r#"
@c = 7
material "A" { ambient @c }
material "B" { shading phong }
vertexFormat "VF" { coord { } texCoord { size 3 } }
shader "S" VF { glsl { vertex { version std330 source "void main() {}" } } }
texture "T" { width 2 height 2 fillColor 255, 0, 0 }
texture "File" { imageFile "rock.png" }
textureLayer "L" standard { tex "T" environment add }
"#;
        let mut r = reader();
        assert!(r.load_source(src));
        let materials = entries(r.materials());
        let shaders = entries(r.shaders());
        let formats = entries(r.vertex_formats());
        let textures = entries(r.textures());
        let layers = entries(r.texture_layers());
        let first_diag = r.diagnostics().len();

        assert!(r.load_source(src));
        assert_eq!(entries(r.materials()), materials);
        assert_eq!(entries(r.shaders()), shaders);
        assert_eq!(entries(r.vertex_formats()), formats);
        assert_eq!(entries(r.textures()), textures);
        assert_eq!(entries(r.texture_layers()), layers);
        assert_eq!(r.diagnostics().len(), first_diag);
        assert_eq!((materials.len(), shaders.len(), formats.len()), (2, 1, 1));
        assert_eq!((textures.len(), layers.len()), (2, 1));
    }

    // ---- vertex formats ----

    #[test]
    fn test_vertex_format_defaults_and_sizes() {
        let r = load("vertexFormat \"VF\" { coord { } color { size 4 } texCoord { } normal { type double } }");
        let vf = r.find_vertex_format("VF").expect("format should exist");
        assert_eq!(vf.len(), 4);
        let coord = &vf.attributes[0];
        assert_eq!((coord.kind, coord.data_type, coord.size), (VertexAttributeKind::Coord, DataType::Float, 3));
        let color = &vf.attributes[1];
        assert_eq!((color.data_type, color.size), (DataType::UnsignedByte, 4));
        assert_eq!(vf.attributes[2].size, 2);
        assert_eq!(vf.attributes[3].data_type, DataType::Double);
    }

    #[test]
    fn test_universal_vertex_attribute() {
        let r = load(
            "vertexFormat \"Skin\" {\n universal \"weights\" {\n  size 4\n  type ubyte\n  normalize true\n  attribute texCoord\n }\n}",
        );
        let attr = &r.find_vertex_format("Skin").expect("format should exist").attributes[0];
        assert_eq!(attr.name, "weights");
        assert_eq!(attr.size, 4);
        assert_eq!(attr.data_type, DataType::UnsignedByte);
        assert!(attr.normalize);
        assert_eq!(attr.flag, VertexFlag::TexCoords);

        let (_, kind) = load_err("vertexFormat \"Skin\" { universal { } }");
        assert_eq!(kind, ErrorKind::ExpectedString);
    }

    #[test]
    fn test_vertex_format_errors() {
        let (_, kind) = load_err("vertexFormat \"vertexFormatMine\" { }");
        assert_eq!(kind, ErrorKind::ReservedName("vertexFormatMine".into()));
        let (_, kind) = load_err("vertexFormat \"VF\" { position { } }");
        assert_eq!(kind, ErrorKind::UnexpectedIdentifier("position".into()));
        let (_, kind) = load_err("vertexFormat \"VF\" { coord { stride 4 } }");
        assert_eq!(kind, ErrorKind::UnexpectedIdentifier("stride".into()));
    }

    // ---- shaders ----

    const SHADER: &str = r#"
vertexFormat "VF" { coord { } }
shader "Terrain" VF {
    glsl {
        vertex {
            version std330
            source "void main() {}"
        }
        pixel "main" {
            version std330
            source "void " + "main() {}"
            source "// second line"
        }
    }
    hlsl5 {
        vertex { version vs_5_0 source "float4 main() { return 0; }" }
    }
}
"#;

    #[test]
    fn test_shader_stages_for_active_backend() {
        let r = load(SHADER);
        let class = r.find_shader("Terrain").expect("shader should exist");
        assert!(class.compiled);
        assert_eq!(class.input_layout.as_ref(), r.find_vertex_format("VF"));
        assert_eq!(class.stages.len(), 2);
        assert_eq!(class.stages[0].stage, ShaderType::Vertex);
        assert_eq!(class.stages[0].entry_point, "VertexMain");
        assert_eq!(class.stages[1].entry_point, "main");
        assert_eq!(class.stages[1].version, ShaderVersion::Glsl330);
        assert_eq!(class.stages[1].source, vec!["void main() {}".to_string(), "// second line".to_string()]);
        assert!(r.diagnostics().contains(Level::Info, "hlsl5"));
    }

    #[test]
    fn test_shader_dialect_follows_backend() {
        let mut r = ScriptReader::new(HeadlessRenderSystem::new(Backend::Direct3D11));
        assert!(r.load_source(SHADER));
        let class = r.find_shader("Terrain").expect("shader should exist");
        assert_eq!(class.stages.len(), 1);
        assert_eq!(class.stages[0].version, ShaderVersion::Vs5_0);
    }

    #[test]
    fn test_shader_input_layouts() {
        let r = load("shader \"A\" vertexFormatFull { }\nshader \"B\" { }\nshader \"C\" Nowhere { }");
        assert_eq!(
            r.find_shader("A").and_then(|s| s.input_layout.clone()),
            Some(VertexFormat::builtin(BuiltinVertexFormat::Full))
        );
        assert_eq!(
            r.find_vertex_format("vertexFormatFull"),
            Some(r.render_system().builtin_vertex_format(BuiltinVertexFormat::Full))
        );
        assert!(r.find_shader("B").map_or(false, |s| s.input_layout.is_none()));
        assert!(r.find_shader("C").map_or(false, |s| s.input_layout.is_none()));
        assert!(r.diagnostics().contains(Level::Warning, "Unknown vertex format named \"Nowhere\""));
    }

    #[test]
    fn test_render_system_creates_every_resource() {
        let r = load(
            "material \"M\" { }\nvertexFormat \"VF\" { coord { } }\ntextureLayer \"L\" base { }\nshader \"S\" VF { }",
        );
        let rs = r.render_system();
        assert_eq!(rs.materials_created, 1);
        assert_eq!(rs.vertex_formats_created, 1);
        assert_eq!(rs.texture_layers_created, 1);
        assert_eq!(rs.shader_classes_created, 1);
        assert_eq!(r.find_vertex_format("VF").map(|f| f.len()), Some(1));
    }

    #[test]
    fn test_shader_version_required() {
        let (_, kind) = load_err("shader \"S\" { glsl { vertex { } } }");
        assert_eq!(kind, ErrorKind::MissingShaderVersion);
        let (_, kind) = load_err("shader \"S\" { glsl { vertex { source \"x\" version std120 } } }");
        assert_eq!(kind, ErrorKind::MissingShaderVersion);
    }

    #[test]
    fn test_empty_shader_stage_warns() {
        let r = load("shader \"S\" { glsl { vertex { version std120 } } }");
        let class = r.find_shader("S").expect("shader should exist");
        assert!(class.stages.is_empty());
        assert!(!class.compiled);
        assert!(r.diagnostics().contains(Level::Warning, "Empty shader code"));
        assert!(r.diagnostics().contains(Level::Warning, "Compiling shader class \"S\" failed"));
    }

    #[test]
    fn test_shader_block_errors() {
        let (_, kind) = load_err("shader \"S\" { cuda { } }");
        assert_eq!(kind, ErrorKind::UnexpectedIdentifier("cuda".into()));
        let (_, kind) = load_err("shader \"S\" { glsl { tessellation { } } }");
        assert_eq!(kind, ErrorKind::UnexpectedIdentifier("tessellation".into()));
        let (_, kind) = load_err("shader \"S\" { glsl { vertex \"\" { } } }");
        assert_eq!(kind, ErrorKind::InvalidEntryPoint);
        let (_, kind) = load_err("shader \"S\" { glsl { vertex { version std120 include \"x\" } } }");
        assert_eq!(kind, ErrorKind::UnexpectedIdentifier("include".into()));
    }

    #[test]
    fn test_shaders_unsupported() {
        let mut r = ScriptReader::new(HeadlessRenderSystem::new(Backend::OpenGl).without_shader_support());
        assert!(r.load_source("shader \"S\" vertexFormatFull { glsl { vertex { } } }\nmaterial \"M\" { }"));
        assert!(r.find_shader("S").is_none());
        assert!(r.find_material("M").is_some());
        assert!(r.diagnostics().contains(Level::Error, "shaders are not supported"));
        assert_eq!(r.render_system().shader_classes_created, 0);
    }

    #[test]
    fn test_shader_source_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("terrain.vert");
        std::fs::write(&path, "line one\nline two\n").expect("write shader");

        let mut r = reader();
        assert!(r.define_string("shaderDir", &format!("{}/", dir.path().display())));
        assert!(r.load_source(
            "shader \"S\" { glsl { vertex { version std120 sourceFile @shaderDir + \"terrain.vert\" } } }"
        ));
        let class = r.find_shader("S").expect("shader should exist");
        assert_eq!(class.stages[0].source, vec!["line one\n".to_string(), "line two\n".to_string()]);

        assert!(r.load_source(
            "shader \"S\" { glsl { vertex { version std120 sourceFile \"/no/such/file.vert\" } } }"
        ));
        assert!(r.diagnostics().contains(Level::Error, "/no/such/file.vert"));
    }

    // ---- textures ----

    #[test]
    fn test_texture_created_from_flags() {
        let r = load(
            "texture \"Fill\" {\n width 4\n height 8\n bufferType float\n format rgb\n fillColor 255, 0, 0\n}\ntexture \"Plain\" { }",
        );
        let fill = r.find_texture("Fill").expect("texture should exist");
        assert!(fill.source.is_none());
        assert_eq!((fill.flags.width, fill.flags.height), (4, 8));
        assert_eq!(fill.flags.format, PixelFormat::Rgb);
        assert_eq!(fill.fill, Some(TextureFill::Float([1.0, 0.0, 0.0, 1.0])));

        let plain = r.find_texture("Plain").expect("texture should exist");
        assert_eq!(plain.flags, TextureFlags::default());
        assert_eq!(plain.fill, Some(TextureFill::Ubyte(Color::WHITE)));
        assert!(plain.color_key.is_none());
    }

    #[test]
    fn test_texture_loaded_from_file() {
        let r = load(
            r#"
@dir = "textures/"
texture "Img" {
    imageFile @dir + "rock.png"
    type tex3D
    depth 4
    colorKey 255, 0, 255, 0
    filter {
        wrap clamp
        wrapY mirror
        mip anisotropic
        anisotropy 8
        mipMaps false
    }
}
texture "Next" { imageFile = "grass.png" }
"#,
        );
        let img = r.find_texture("Img").expect("texture should exist");
        assert_eq!(img.source.as_deref(), Some("textures/rock.png"));
        assert_eq!((img.flags.ty, img.flags.depth), (TextureType::Tex3D, 4));
        assert_eq!(img.color_key, Some(Color::rgba(255, 0, 255, 0)));
        assert_eq!(img.flags.filter.wrap, [WrapMode::Clamp, WrapMode::Mirror, WrapMode::Clamp]);
        assert_eq!(img.flags.filter.mip, MipMapFilter::Anisotropic);
        assert_eq!(img.flags.filter.anisotropy, 8);
        assert!(!img.flags.filter.mip_maps);
        assert!(img.fill.is_none());

        // scratch state does not leak into the next texture
        let next = r.find_texture("Next").expect("texture should exist");
        assert_eq!(next.flags.filter, TextureFilter::default());
        assert!(next.color_key.is_none());
        assert_eq!(next.flags.ty, TextureType::Tex2D);
    }

    #[test]
    fn test_render_target_texture() {
        let r = load("texture \"RT\" { width 16 height 16 renderTarget true fillColor 0 }");
        let rt = r.find_texture("RT").expect("texture should exist");
        assert!(rt.render_target);
        assert!(rt.fill.is_none());
    }

    #[test]
    fn test_working_dir_variable() {
        let r = load("texture \"T\" { imageFile @workingDir + \"a.png\" }");
        let t = r.find_texture("T").expect("texture should exist");
        assert_eq!(t.source.as_deref(), Some("/data/a.png"));
    }

    #[test]
    fn test_texture_load_failure() {
        let rs = HeadlessRenderSystem::new(Backend::OpenGl).with_missing_texture("gone.png");
        let mut r = ScriptReader::new(rs);
        assert!(!r.load_source("texture \"T\" { imageFile \"gone.png\" }"));
        assert_eq!(
            r.last_error().map(|e| e.kind.clone()),
            Some(ErrorKind::TextureLoad("gone.png".into()))
        );
        assert!(r.find_texture("T").is_none());
    }

    #[test]
    fn test_texture_string_errors() {
        let (_, kind) = load_err("texture \"T\" { imageFile 5 }");
        assert_eq!(kind, ErrorKind::ExpectedString);
        let (_, kind) = load_err("texture \"T\" {\n imageFile\n}");
        assert_eq!(kind, ErrorKind::ExpectedString);
    }

    // ---- texture layers ----

    #[test]
    fn test_texture_layers() {
        let r = load(
            r#"
texture "T" { }
textureLayer "L" standard {
    tex T
    environment add
    mapping sphereMap
    reliefEnable false
    index 2
    visibleMask 3
}
textureLayer "R" relief {
    tex "missing"
    maxSamples 64
    heightMapScale 0.5
    environment replace
}
"#,
        );
        let l = r.find_texture_layer("L").expect("layer should exist");
        assert_eq!(l.texture.as_deref(), Some("T"));
        assert_eq!(l.index, 2);
        assert_eq!(l.visible_mask, 3);
        assert_eq!(
            l.kind,
            LayerKind::Standard {
                environment: TextureEnvironment::Add,
                mapping: MappingGeneration::SphereMap,
            }
        );

        let relief = r.find_texture_layer("R").expect("layer should exist");
        assert!(relief.texture.is_none());
        match relief.kind {
            LayerKind::Relief { max_samples, height_map_scale, relief_enabled, .. } => {
                assert_eq!(max_samples, 64);
                assert_eq!(height_map_scale, 0.5);
                assert!(relief_enabled);
            }
            ref other => panic!("expected relief layer, got {:?}", other),
        }
        assert!(r.diagnostics().contains(Level::Warning, "Unknown texture named \"missing\""));
    }

    #[test]
    fn test_texture_layer_type_errors() {
        let (r, kind) = load_err("textureLayer \"L\" bogus { }");
        assert_eq!(kind, ErrorKind::UnknownLayerType("bogus".into()));
        assert!(r.find_texture_layer("L").is_none());
        let (_, kind) = load_err("textureLayer \"L\" \"base\" { }");
        assert!(matches!(kind, ErrorKind::UnexpectedToken(_)));
    }

    // ---- host interface ----

    #[test]
    fn test_host_definitions_persist() {
        let mut r = reader();
        assert!(r.define_number("scale", 2.0));
        assert!(!r.define_number("scale", 3.0));
        assert!(r.load_source("material \"M\" { shininess @scale }"));
        assert_eq!(r.find_material("M").map(|m| m.shininess), Some(2.0));
        assert!(r.load_source("material \"N\" { shininess @scale }"));
        assert_eq!(r.find_material("N").map(|m| m.shininess), Some(2.0));
        assert!(r.find_material("M").is_none());
    }

    #[test]
    fn test_read_script_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("scene.material");
        std::fs::write(&path, "material \"FromFile\" { fog false }\n").expect("write script");

        let mut r = reader();
        assert!(r.load_script(&path));
        assert_eq!(r.find_material("FromFile").map(|m| m.fog), Some(false));

        let err = r.read_script(dir.path().join("missing.material")).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::FileRead { .. }));
        assert!(r.materials().is_empty());
    }

    #[test]
    fn test_diagnostics_cleared_per_load() {
        let mut r = reader();
        assert!(r.load_source("material \"M\" { shading nope }"));
        assert!(r.diagnostics().contains(Level::Warning, "nope"));
        assert!(r.load_source("material \"M\" { }"));
        assert!(!r.diagnostics().contains(Level::Warning, "nope"));
    }
}
