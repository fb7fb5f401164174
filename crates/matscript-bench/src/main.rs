use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser};
use owo_colors::OwoColorize;
use serde::Serialize;

use matscript_lexer::{validate_brackets, Scanner};
use matscript_reader::{Level, ReaderOptions, ScriptReader};
use matscript_video::{Backend, HeadlessRenderSystem};

#[derive(Parser, Debug)]
#[command(name = "matscript-bench", about = "Time material script loading")]
struct Cli {
    /// Specific script(s) to run (by file stem, e.g. scene). If omitted, runs all discovered scripts.
    #[arg(short = 't', long = "test", action = ArgAction::Append)]
    tests: Vec<String>,

    /// Iterations per script (measured)
    #[arg(short = 'n', long = "iterations", default_value_t = 50)]
    iterations: u32,

    /// Warmup iterations (not measured)
    #[arg(short = 'w', long = "warmup", default_value_t = 5)]
    warmup: u32,

    /// Output JSON file path; default: benchmark/results/<timestamp>.json
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Include the scripts/ directory in discovery
    #[arg(long = "include-scripts", default_value_t = false)]
    include_scripts: bool,

    /// List discovered scripts and exit
    #[arg(long = "list", default_value_t = false)]
    list: bool,
}

#[derive(Debug, Serialize)]
struct BenchResult {
    name: String,
    iterations: u32,
    tokens: usize,
    resources: usize,
    warnings: usize,
    avg_total_ms: f64,
    min_total_ms: f64,
    max_total_ms: f64,
    avg_scan_ms: f64,
    /// Bracket validation alone; the load phase validates again
    avg_validate_ms: f64,
    /// Reading the scanned tokens, validation included
    avg_load_ms: f64,
}

#[derive(Debug, Serialize)]
struct OutputDoc {
    timestamp: String,
    matscript_version: String,
    benchmarks: Vec<BenchResult>,
}

#[derive(Debug, Clone)]
struct ScriptCase {
    name: String,
    path: PathBuf,
}

/// Per-iteration timings in milliseconds. A total is scan plus load.
#[derive(Debug, Default)]
struct Samples {
    totals: Vec<f64>,
    scans: Vec<f64>,
    validations: Vec<f64>,
    loads: Vec<f64>,
}

/// What one load of a script produced.
#[derive(Debug)]
struct LoadStats {
    tokens: usize,
    resources: usize,
    warnings: usize,
}

fn workspace_root() -> PathBuf {
    // crates/matscript-bench -> crates -> root
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or(manifest_dir)
}

fn discover_scripts(include_scripts: bool) -> Vec<ScriptCase> {
    let root = workspace_root();
    let mut out = Vec::new();

    let mut candidates = vec![root.join("benchmark/scripts")];
    if include_scripts {
        candidates.push(root.join("scripts"));
    }

    for dir in candidates {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for e in entries.flatten() {
            let p = e.path();
            if p.extension().and_then(|s| s.to_str()) == Some("material") {
                let name = p.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string();
                out.push(ScriptCase { name, path: p });
            }
        }
    }

    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

type BenchReader = ScriptReader<HeadlessRenderSystem>;

fn new_reader() -> BenchReader {
    ScriptReader::with_options(HeadlessRenderSystem::new(Backend::OpenGl), ReaderOptions::new("/"))
}

fn load_stats(reader: &BenchReader, tokens: usize) -> LoadStats {
    LoadStats {
        tokens,
        resources: reader.materials().len()
            + reader.shaders().len()
            + reader.vertex_formats().len()
            + reader.textures().len()
            + reader.texture_layers().len(),
        warnings: reader.diagnostics().iter_level(Level::Warning).count(),
    }
}

fn measure_script(src: &str, iterations: u32, warmup: u32) -> Result<(Samples, LoadStats), String> {
    let mut reader = new_reader();
    for _ in 0..warmup {
        reader.read_source(src).map_err(|e| e.to_string())?;
    }

    let mut samples = Samples::default();
    let mut token_count = 0;
    for _ in 0..iterations {
        let mut t = Instant::now();
        let tokens = Scanner::new(src).tokenize().map_err(|e| e.to_string())?;
        let t_scan = t.elapsed();
        token_count = tokens.len();

        t = Instant::now();
        validate_brackets(&tokens).map_err(|e| e.to_string())?;
        let t_validate = t.elapsed();

        t = Instant::now();
        reader.read_tokens(tokens).map_err(|e| e.to_string())?;
        let t_load = t.elapsed();

        samples.totals.push(dur_ms(t_scan + t_load));
        samples.scans.push(dur_ms(t_scan));
        samples.validations.push(dur_ms(t_validate));
        samples.loads.push(dur_ms(t_load));
    }

    if iterations == 0 {
        let tokens = Scanner::new(src).tokenize().map_err(|e| e.to_string())?;
        token_count = tokens.len();
        reader.read_tokens(tokens).map_err(|e| e.to_string())?;
    }
    Ok((samples, load_stats(&reader, token_count)))
}

fn dur_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn stats(vals: &[f64]) -> (f64, f64, f64) {
    if vals.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let min = vals.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = vals.iter().sum::<f64>() / (vals.len() as f64);
    (avg, min, max)
}

fn fail(code: i32, msg: String) -> ! {
    eprintln!("{}: {}", "error".red().bold(), msg.red());
    process::exit(code);
}

fn write_report(path: &Path, doc: &OutputDoc) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    let json = serde_json::to_string_pretty(doc).map_err(|e| format!("Failed to serialize results: {}", e))?;
    fs::write(path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

fn main() {
    let cli = Cli::parse();

    let mut scripts = discover_scripts(cli.include_scripts);

    if cli.list {
        println!("Discovered scripts:");
        for s in &scripts {
            println!("- {} ({})", s.name, s.path.display());
        }
        return;
    }

    if !cli.tests.is_empty() {
        let wanted: HashSet<_> = cli.tests.iter().map(|s| s.to_lowercase()).collect();
        scripts.retain(|s| wanted.contains(&s.name.to_lowercase()));
        if scripts.is_empty() {
            fail(2, "No matching scripts. Use --list to see available.".to_string());
        }
    }

    if scripts.is_empty() {
        fail(2, "No .material scripts found in benchmark/scripts or scripts.".to_string());
    }

    let mut results = Vec::new();

    for case in &scripts {
        let src = fs::read_to_string(&case.path)
            .unwrap_or_else(|e| fail(1, format!("Failed to read {}: {}", case.path.display(), e)));
        let (samples, load) = measure_script(&src, cli.iterations, cli.warmup)
            .unwrap_or_else(|e| fail(1, format!("{}: {}", case.name, e)));

        let (avg_t, min_t, max_t) = stats(&samples.totals);
        let (avg_s, _, _) = stats(&samples.scans);
        let (avg_v, _, _) = stats(&samples.validations);
        let (avg_l, _, _) = stats(&samples.loads);

        println!(
            "{:>12}: total avg={:.3}ms min={:.3}ms max={:.3}ms | scan={:.3}ms validate={:.3}ms load={:.3}ms | {} tokens, {} resources",
            case.name, avg_t, min_t, max_t, avg_s, avg_v, avg_l, load.tokens, load.resources
        );

        results.push(BenchResult {
            name: case.name.clone(),
            iterations: cli.iterations,
            tokens: load.tokens,
            resources: load.resources,
            warnings: load.warnings,
            avg_total_ms: avg_t,
            min_total_ms: min_t,
            max_total_ms: max_t,
            avg_scan_ms: avg_s,
            avg_validate_ms: avg_v,
            avg_load_ms: avg_l,
        });
    }

    let out_path = match cli.output.clone() {
        Some(p) => p,
        None => {
            // Windows-safe filename timestamp
            let ts_file = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%SZ").to_string();
            workspace_root()
                .join("benchmark/results")
                .join(format!("{}.json", ts_file))
        }
    };

    let doc = OutputDoc {
        timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        matscript_version: env!("CARGO_PKG_VERSION").to_string(),
        benchmarks: results,
    };

    if let Err(e) = write_report(&out_path, &doc) {
        fail(1, e);
    }
    println!("\nSaved results to {}", out_path.display());
}
