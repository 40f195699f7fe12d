//! Drives the template engines through the benchmark harness.
//!
//! The core contracts live in `ember::bench`; this binary is the thin layer
//! of argument parsing, file reading, and report printing around them. The
//! report goes to stderr so that rendered output directed at stdout with
//! `-o -` never corrupts it.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use tracing::{debug, info};

use benches::subjects::ThirdParty;
use benches::{Handlebars, Minijinja, Tera, TinyTemplate};
use ember::bench::{self, Harness, Mode, Subject};
use ember::{Cache, Suite, Value};

#[derive(Debug, Parser)]
#[command(
    name = "ember-bench",
    about = "Benchmark template engines across execution strategies"
)]
struct Args {
    /// Number of timed invocations per engine and mode
    #[arg(short = 'n', long, default_value_t = 1000)]
    iterations: usize,

    /// Template file in ember syntax; sibling `.hbs`, `.j2`, `.tera`, and
    /// `.tt` variants are picked up for the other engines when present
    #[arg(short = 't', long, default_value = "benches/benchdata/bench.erb")]
    template: PathBuf,

    /// Context data file (YAML)
    #[arg(short = 'f', long, default_value = "benches/benchdata/bench.yaml")]
    data: PathBuf,

    /// Write rendered output to this file, `-` for stdout; discarded if
    /// omitted
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Directory for cached compiled units
    #[arg(long, default_value = "cache")]
    cache_dir: PathBuf,

    /// Exclude engines by name
    #[arg(short = 'x', long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Run a single mode instead of all three
    #[arg(short = 'm', long)]
    mode: Option<Mode>,

    /// Print each engine's rendered output once instead of benchmarking
    #[arg(short = 'p', long)]
    print: bool,

    /// Benchmark only the named engines
    engines: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.iterations == 0 {
        bail!("iterations must be positive");
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let source = read_trimmed(&args.template)
        .with_context(|| format!("failed to read template `{}`", args.template.display()))?;
    let template_id = args
        .template
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("template"));

    let data = fs::read_to_string(&args.data)
        .with_context(|| format!("failed to read data file `{}`", args.data.display()))?;
    let ctx: Value = serde_yaml::from_str(&data)
        .with_context(|| format!("failed to parse context data `{}`", args.data.display()))?;

    let engine = ember::Engine::new();
    let cache = Cache::new(&args.cache_dir)?;

    // Engine-specific template variants live next to the ember template.
    // An engine without a variant simply does not take part in the run.
    let variant = |ext: &str| -> Option<String> {
        let path = args.template.with_extension(ext);
        let source = read_trimmed(&path).ok()?;
        debug!(path = %path.display(), "found template variant");
        Some(source)
    };
    let hbs = variant("hbs");
    let j2 = variant("j2");
    let tera = variant("tera");
    let tt = variant("tt");

    let mut subjects: Vec<Box<dyn Subject + '_>> = Vec::new();
    subjects.push(Box::new(Suite::new(
        "ember",
        template_id,
        &engine,
        &cache,
        &source,
    )?));
    if let Some(source) = &hbs {
        subjects.push(Box::new(ThirdParty::<Handlebars>::new(source)));
    }
    if let Some(source) = &j2 {
        subjects.push(Box::new(ThirdParty::<Minijinja>::new(source)));
    }
    if let Some(source) = &tera {
        subjects.push(Box::new(ThirdParty::<Tera>::new(source)));
    }
    if let Some(source) = &tt {
        subjects.push(Box::new(ThirdParty::<TinyTemplate>::new(source)));
    }

    // Selection: explicit list wins, then the exclude list is applied.
    let keep = |name: &str| {
        let selected = args.engines.is_empty() || args.engines.iter().any(|e| e == name);
        selected && !args.exclude.iter().any(|e| e == name)
    };
    subjects.retain(|s| keep(&s.descriptor().name));
    if subjects.is_empty() {
        bail!("no engines selected");
    }

    if args.print {
        for subject in subjects.iter_mut() {
            let name = subject.descriptor().name;
            println!("## {name}");
            bench::render_once(subject.as_mut(), &ctx, io::stdout().lock())?;
            println!();
        }
        return Ok(());
    }

    let sink: Box<dyn Write> = match &args.output {
        None => Box::new(io::sink()),
        Some(path) if path.as_os_str() == "-" => Box::new(io::stdout()),
        Some(path) => Box::new(
            fs::File::create(path)
                .with_context(|| format!("failed to create output file `{}`", path.display()))?,
        ),
    };

    let modes = match args.mode {
        Some(mode) => vec![mode],
        None => Mode::ALL.to_vec(),
    };

    info!(
        iterations = args.iterations,
        engines = subjects.len(),
        "running benchmark"
    );
    let mut refs: Vec<&mut dyn Subject> = subjects.iter_mut().map(|s| s.as_mut()).collect();
    let mut harness = Harness::new(args.iterations, sink);
    let report = harness.run(&mut refs, &ctx, &modes)?;

    eprint!("{report}");
    Ok(())
}

fn read_trimmed(path: &std::path::Path) -> io::Result<String> {
    fs::read_to_string(path).map(|s| s.trim_end().to_owned())
}
