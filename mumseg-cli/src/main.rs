//! CLI for Mumford–Shah level-set segmentation.
//!
//! Provides:
//! - Single segmentation runs over `.json` / `.json.gz` grids, with optional SVG output
//! - Seeded synthetic test images
//! - Parallel sweeps over the smoothness weight λ

mod io;
mod render;
mod sweep;
mod synth;

use std::fs;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;

use mumseg_core::{
    DerivativeScaling, DivergenceGuard, Energy, Mode, Params, Progress, SegmentationOutput,
    Segmenter,
};

use render::RenderConfig;
use synth::DiskConfig;

const BUILD_SHA: &str = env!("MUMSEG_BUILD_SHA");

#[derive(Parser)]
#[command(name = "mumseg")]
#[command(about = "Mumford-Shah level-set image segmentation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Overrides applied on top of defaults (or a `--params` file).
#[derive(Args, Debug)]
struct ParamArgs {
    /// Full parameter set (JSON); individual flags override its fields
    #[arg(long)]
    params: Option<String>,

    /// Step size for the reconstruction field
    #[arg(long)]
    step_w: Option<f64>,

    /// Step size for the level-set field
    #[arg(long)]
    step_phi: Option<f64>,

    /// Heaviside band half-width
    #[arg(short, long)]
    eps: Option<f64>,

    /// Smoothness weight
    #[arg(short, long)]
    lambda: Option<f64>,

    /// Data-fidelity weight
    #[arg(short, long)]
    mu: Option<f64>,

    /// Number of iterations
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Log per-iteration norms and energy
    #[arg(short, long)]
    verbose: bool,

    /// Descent mode
    #[arg(long)]
    mode: Option<Mode>,

    /// Heaviside derivative scaling ("normalized" or "literal")
    #[arg(long)]
    scaling: Option<DerivativeScaling>,
}

impl ParamArgs {
    fn resolve(&self) -> Result<Params> {
        let mut params: Params = match &self.params {
            Some(path) => io::read_json(path)?,
            None => Params::default(),
        };
        if let Some(v) = self.step_w {
            params.step_w = v;
        }
        if let Some(v) = self.step_phi {
            params.step_phi = v;
        }
        if let Some(v) = self.eps {
            params.eps = v;
        }
        if let Some(v) = self.lambda {
            params.lambda = v;
        }
        if let Some(v) = self.mu {
            params.mu = v;
        }
        if let Some(v) = self.iterations {
            params.iterations = v;
        }
        if let Some(v) = self.mode {
            params.mode = v;
        }
        if let Some(v) = self.scaling {
            params.scaling = v;
        }
        params.verbose |= self.verbose;
        Ok(params)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Segment one image
    Run {
        /// Input grid (JSON rows, optionally gzipped)
        #[arg(short, long)]
        input: String,

        /// Output file for results (JSON, optionally gzipped)
        #[arg(short, long)]
        output: Option<String>,

        /// Render the binarized level set, frontier, and traces to SVG
        #[arg(long)]
        svg: Option<String>,

        /// Abort on the first non-finite norm or energy
        #[arg(long)]
        abort_on_divergence: bool,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Generate a noisy-disk test image
    Synth {
        #[arg(long, default_value = "32")]
        rows: usize,

        #[arg(long, default_value = "32")]
        cols: usize,

        /// Disk radius as a fraction of the shorter side
        #[arg(short, long, default_value = "0.3")]
        radius: f64,

        /// Half-width of the uniform noise
        #[arg(long, default_value = "0.2")]
        noise: f64,

        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Output grid (JSON, optionally gzipped)
        #[arg(short, long)]
        output: String,
    },

    /// Segment one image for each of several λ values, in parallel
    Sweep {
        #[arg(short, long)]
        input: String,

        /// Comma-separated smoothness weights
        #[arg(long, value_delimiter = ',', required = true)]
        lambdas: Vec<f64>,

        /// Output file for per-λ summaries (JSON, optionally gzipped)
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        params: ParamArgs,
    },
}

/// Output of `mumseg run`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunOutput {
    build_sha: &'static str,
    params: Params,
    energy: Energy,
    time_ms: u64,
    segmentation: SegmentationOutput,
}

fn run_cmd(
    input: &str,
    output: Option<&str>,
    svg: Option<&str>,
    abort_on_divergence: bool,
    params: &ParamArgs,
) -> Result<()> {
    let u = io::load_grid(input)?;
    let params = params.resolve()?;
    info!("segmenting {} ({}x{}) with {:?}", input, u.nrows(), u.ncols(), params);

    let segmenter = Segmenter::new(params)?;
    let start = Instant::now();
    let mut progress = Progress { verbose: segmenter.params().verbose };
    let seg = if abort_on_divergence {
        segmenter.segment_observed(&u, &mut (progress, DivergenceGuard))?
    } else {
        segmenter.segment_observed(&u, &mut progress)?
    };
    let time_ms = start.elapsed().as_millis() as u64;

    if let Some(iteration) = seg.traces.first_non_finite() {
        warn!("traces became non-finite at iteration {}", iteration);
    }
    let energy = seg.energy(&u)?;
    println!(
        "{} iterations in {}ms: foreground {} cells, frontier {} cells, functional {:.6}",
        seg.traces.len(),
        time_ms,
        seg.omega.len(),
        seg.frontier.len(),
        energy.total(),
    );

    if let Some(path) = svg {
        fs::write(path, render::render_svg(&seg, &RenderConfig::default()))
            .with_context(|| format!("writing {}", path))?;
        info!("wrote {}", path);
    }
    if let Some(path) = output {
        let out = RunOutput {
            build_sha: BUILD_SHA,
            params: segmenter.params().clone(),
            energy,
            time_ms,
            segmentation: SegmentationOutput::from(&seg),
        };
        io::write_json(path, &out)?;
        info!("wrote {}", path);
    }
    Ok(())
}

fn synth_cmd(config: &DiskConfig, output: &str) -> Result<()> {
    if config.rows == 0 || config.cols == 0 {
        bail!(
            "image must have at least one row and one column, got {}x{}",
            config.rows,
            config.cols
        );
    }
    let u = synth::noisy_disk(config);
    io::save_grid(output, &u)?;
    println!(
        "wrote {}x{} noisy disk (seed {}) to {}",
        config.rows, config.cols, config.seed, output
    );
    Ok(())
}

fn sweep_cmd(input: &str, lambdas: &[f64], output: Option<&str>, params: &ParamArgs) -> Result<()> {
    let u = io::load_grid(input)?;
    let base = params.resolve()?;
    let start = Instant::now();
    let results = sweep::sweep(&u, &base, lambdas);
    info!("sweep finished in {}ms", start.elapsed().as_millis());

    let mut summaries = Vec::with_capacity(results.len());
    for (lambda, result) in lambdas.iter().zip(results) {
        let summary = result.with_context(|| format!("lambda = {}", lambda))?;
        println!(
            "lambda {:>8}: functional {:?} (min {:?} at {:?}), frontier {}, diverged at {:?}",
            summary.lambda,
            summary.final_functional,
            summary.min_functional,
            summary.min_iteration,
            summary.frontier_len,
            summary.diverged_at,
        );
        summaries.push(summary);
    }
    if let Some(path) = output {
        io::write_json(path, &summaries)?;
        info!("wrote {}", path);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { input, output, svg, abort_on_divergence, params } => {
            run_cmd(&input, output.as_deref(), svg.as_deref(), abort_on_divergence, &params)
        }
        Commands::Synth { rows, cols, radius, noise, seed, output } => {
            let config = DiskConfig { rows, cols, radius, noise, seed, ..DiskConfig::default() };
            synth_cmd(&config, &output)
        }
        Commands::Sweep { input, lambdas, output, params } => {
            sweep_cmd(&input, &lambdas, output.as_deref(), &params)
        }
    }
}
