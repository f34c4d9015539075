//! Generate the browser control panel and native parameter header from a
//! parameter description.
//!
//! Usage: `paramgen [parameters.json] [--js-out FILE] [--header-out FILE]`

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

use paramgen::config::GeneratorConfig;
use paramgen::emit::HeaderFlavor;
use paramgen::param::ParamSet;

#[derive(Parser, Debug)]
#[command(name = "paramgen")]
#[command(about = "Generate a slider panel and a native parameter struct from a parameter description")]
struct Args {
    /// Parameter description (JSON object keyed by identifier)
    #[arg(default_value = "parameters.json")]
    input: PathBuf,

    /// JSON generator config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path for the control panel script
    #[arg(long = "js-out")]
    js_out: Option<PathBuf>,

    /// Output path for the native header
    #[arg(long = "header-out")]
    header_out: Option<PathBuf>,

    /// Namespace wrapping the generated struct
    #[arg(long)]
    namespace: Option<String>,

    /// Name of the generated struct
    #[arg(long = "struct-name")]
    struct_name: Option<String>,

    /// Header included at the top (must define Uniform and the vector types)
    #[arg(long)]
    include: Option<String>,

    /// Include guard macro
    #[arg(long)]
    guard: Option<String>,

    /// Header layout
    #[arg(long, value_enum)]
    flavor: Option<HeaderFlavor>,

    /// Render and report, but write nothing
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn into_config(self) -> Result<(PathBuf, bool, GeneratorConfig)> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };
        if let Some(js_out) = self.js_out {
            config.js_out = js_out;
        }
        if let Some(header_out) = self.header_out {
            config.header_out = header_out;
        }
        if let Some(namespace) = self.namespace {
            config.header.namespace = namespace;
        }
        if self.struct_name.is_some() {
            config.header.struct_name = self.struct_name;
        }
        if let Some(include) = self.include {
            config.header.include = include;
        }
        if let Some(guard) = self.guard {
            config.header.guard = guard;
        }
        if let Some(flavor) = self.flavor {
            config.header.flavor = flavor;
        }
        Ok((self.input, self.dry_run, config))
    }
}

fn run(args: Args) -> Result<()> {
    let (input, dry_run, config) = args.into_config()?;

    let t = Instant::now();
    let params = ParamSet::load(&input)
        .with_context(|| format!("reading parameters from {}", input.display()))?;
    info!(
        "Loaded {} parameters from {} ({:.1} ms)",
        params.len(),
        input.display(),
        t.elapsed().as_secs_f64() * 1000.0
    );

    let (artifacts, timings) = paramgen::generate(&params, &config)?;
    for t in &timings {
        debug!("  {:10} {:8.3} ms", t.name, t.ms);
    }

    if dry_run {
        info!(
            "Dry run: {} bytes of panel script, {} bytes of header",
            artifacts.panel.len(),
            artifacts.header.len()
        );
        return Ok(());
    }

    paramgen::write_artifacts(&artifacts, &config)?;
    Ok(())
}

fn main() {
    paramgen::init_logging();

    if let Err(e) = run(Args::parse()) {
        error!("{e:#}");
        process::exit(1);
    }
}
