mod common;

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

use matscript_reader::{ReaderOptions, ScriptReader};
use matscript_video::{Backend, HeadlessRenderSystem};

use common::{plural, render_error};

/// Environment variable consulted when `--backend` is not given.
const BACKEND_VAR: &str = "MATSCRIPT_BACKEND";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    Glsl,
    GlslEs,
    Hlsl3,
    Hlsl5,
    None,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Glsl => Backend::OpenGl,
            BackendArg::GlslEs => Backend::OpenGlEs2,
            BackendArg::Hlsl3 => Backend::Direct3D9,
            BackendArg::Hlsl5 => Backend::Direct3D11,
            BackendArg::None => Backend::None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "matscript", version, about = "Load a material script and list what it declares")]
struct Cli {
    /// Material script to load
    script: PathBuf,

    /// Shader dialect of the render system. Falls back to $MATSCRIPT_BACKEND, then glsl.
    #[arg(short = 'b', long = "backend", value_enum)]
    backend: Option<BackendArg>,

    /// Pretend the render system has no shader support
    #[arg(long = "no-shaders", default_value_t = false)]
    no_shaders: bool,

    /// Predefine a variable. Values that parse as numbers become number variables.
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", value_parser = parse_define)]
    defines: Vec<(String, String)>,

    /// Value of @workingDir (default: current directory)
    #[arg(long = "working-dir")]
    working_dir: Option<String>,

    /// Show info diagnostics too
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Show errors only
    #[arg(short, long)]
    quiet: bool,
}

fn parse_define(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

fn resolve_backend(arg: Option<BackendArg>) -> Result<Backend, String> {
    if let Some(b) = arg {
        return Ok(b.into());
    }
    match std::env::var(BACKEND_VAR) {
        Ok(value) => <BackendArg as ValueEnum>::from_str(&value, true)
            .map(Backend::from)
            .map_err(|_| format!("Unknown backend '{}' in {}", value, BACKEND_VAR)),
        Err(_) => Ok(Backend::OpenGl),
    }
}

fn setup_log_verbosity(cli: &Cli) {
    let level_filter = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    let logger_conf = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build();
    // only fails if a logger is already installed
    let _ = TermLogger::init(level_filter, logger_conf, TerminalMode::Stderr, ColorChoice::Auto);
}

fn fail(msg: String) -> ! {
    eprintln!("{}: {}", "error".red().bold(), msg.red());
    process::exit(1);
}

fn print_resources(reader: &ScriptReader<HeadlessRenderSystem>) {
    for (name, _) in reader.materials().iter() {
        println!("{} \"{}\"", "material".green(), name);
    }
    for (name, class) in reader.shaders().iter() {
        let state = if class.compiled { "compiled" } else { "not compiled" };
        println!(
            "{} \"{}\": {}, {}",
            "shader".green(),
            name,
            plural(class.stages.len(), "stage"),
            state
        );
    }
    for (name, format) in reader.vertex_formats().iter() {
        println!(
            "{} \"{}\": {}",
            "vertex format".green(),
            name,
            plural(format.len(), "attribute")
        );
    }
    for (name, texture) in reader.textures().iter() {
        let origin = match &texture.source {
            Some(path) => format!("loaded from \"{}\"", path),
            None => format!("created {}x{}", texture.flags.width, texture.flags.height),
        };
        let target = if texture.render_target { ", render target" } else { "" };
        println!("{} \"{}\": {}{}", "texture".green(), name, origin, target);
    }
    for (name, layer) in reader.texture_layers().iter() {
        let bound = match &layer.texture {
            Some(texture) => format!("texture \"{}\"", texture),
            None => "no texture".to_string(),
        };
        println!(
            "{} \"{}\": {}, {}",
            "texture layer".green(),
            name,
            layer.kind.name(),
            bound
        );
    }
}

fn main() {
    let cli = Cli::parse();
    setup_log_verbosity(&cli);

    let backend = resolve_backend(cli.backend).unwrap_or_else(|msg| fail(msg));
    log::info!("Render system backend: {:?}", backend);

    if !cli.script.exists() {
        fail(format!("File not found: {}", cli.script.display()));
    }
    let src = match fs::read_to_string(&cli.script) {
        Ok(s) => s,
        Err(e) => fail(format!("Failed to read {}: {}", cli.script.display(), e)),
    };

    let mut render_system = HeadlessRenderSystem::new(backend);
    if cli.no_shaders {
        render_system = render_system.without_shader_support();
    }
    let options = cli
        .working_dir
        .clone()
        .map(ReaderOptions::new)
        .unwrap_or_default();
    let mut reader = ScriptReader::with_options(render_system, options);

    for (name, value) in &cli.defines {
        let defined = match value.parse::<f64>() {
            Ok(number) => reader.define_number(name, number),
            Err(_) => reader.define_string(name, value),
        };
        if !defined {
            fail(format!("Variable \"{}\" is defined more than once", name));
        }
    }

    log::info!("Load material script: \"{}\"", cli.script.display());
    if let Err(e) = reader.read_source(&src) {
        render_error("Script error", &src, &e);
        process::exit(1);
    }

    print_resources(&reader);
}
