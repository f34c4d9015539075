pub mod config;
pub mod controls;
pub mod emit;
pub mod error;
pub mod naming;
pub mod param;
pub mod store;

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::GeneratorConfig;
use controls::ControlPlan;
use error::{ParamError, Result};
use param::ParamSet;

/// Both rendered outputs, plus the control plan they were rendered from.
pub struct Artifacts {
    pub plans: Vec<ControlPlan>,
    pub panel: String,
    pub header: String,
}

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,paramgen=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Render the panel script and the native header. Nothing is written here, so
/// a failure in either output leaves the filesystem untouched.
pub fn generate(params: &ParamSet, config: &GeneratorConfig) -> Result<(Artifacts, Vec<Timing>)> {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    // 1. Decide controls (codes are declaration indices)
    let t = Instant::now();
    let plans = controls::plan(params);
    timings.push(Timing {
        name: "plan",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 2. Browser panel
    let t = Instant::now();
    let panel = emit::render_panel(params, &plans);
    timings.push(Timing {
        name: "panel",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 3. Native header
    let t = Instant::now();
    let header = emit::render_header(params, &config.header)?;
    timings.push(Timing {
        name: "header",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    timings.push(Timing {
        name: "TOTAL",
        ms: total_start.elapsed().as_secs_f64() * 1000.0,
    });

    let visible = plans.iter().filter(|p| p.is_visible()).count();
    debug!(
        params = params.len(),
        controls = visible,
        hidden = plans.len() - visible,
        "rendered artifacts"
    );

    Ok((
        Artifacts {
            plans,
            panel,
            header,
        },
        timings,
    ))
}

pub fn write_artifacts(artifacts: &Artifacts, config: &GeneratorConfig) -> Result<()> {
    write_file(&config.js_out, &artifacts.panel)?;
    write_file(&config.header_out, &artifacts.header)?;
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    let err = |source| ParamError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(err)?;
    }
    std::fs::write(path, contents).map_err(err)?;
    info!("Wrote {}", path.display());
    Ok(())
}
