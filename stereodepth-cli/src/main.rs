use clap::Parser;
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use stereodepth::grid::io;
use stereodepth::{post, search, PipelineConfig, Progress};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "ZNCC stereo depth map calculator")]
struct Cli {
    /// Left image of the rectified stereo pair.
    left: PathBuf,
    /// Right image of the rectified stereo pair.
    right: PathBuf,
    /// Output depth map path.
    #[arg(short, long, default_value = "depthmap.png")]
    output: PathBuf,
    /// Number of worker threads for the disparity search.
    #[arg(short, long, default_value_t = 4)]
    threads: usize,
    /// Correlation window size; must be odd.
    #[arg(short, long, default_value_t = 9)]
    window: usize,
    /// Number of disparity candidates to scan.
    #[arg(long, default_value_t = 65)]
    max_disparity: usize,
    /// Cross-check tolerance on raw disparity values.
    #[arg(long, default_value_t = 8)]
    cross_threshold: i32,
    /// Maximum occlusion fill search radius.
    #[arg(long, default_value_t = 50)]
    fill_radius: usize,
    /// Also save the cross-checked map before occlusion fill.
    #[arg(long, value_name = "FILE")]
    save_cross: Option<PathBuf>,
    /// Write per-phase timings to a JSON file.
    #[arg(long, value_name = "FILE")]
    timings: Option<PathBuf>,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

const BARS: usize = 40;

#[derive(Serialize)]
struct PhaseTiming {
    phase: String,
    seconds: f64,
}

/// Console reporter: redraws a 40-column bar in place and records per-phase
/// elapsed time.
#[derive(Default)]
struct ConsoleProgress {
    label: String,
    started: Option<Instant>,
    last_bars: usize,
    timings: Vec<PhaseTiming>,
}

impl ConsoleProgress {
    fn draw(&self, filled: usize) {
        print!(
            "{}\t[{}{}]\r",
            self.label,
            "=".repeat(filled),
            " ".repeat(BARS - filled)
        );
        let _ = std::io::stdout().flush();
    }
}

impl Progress for ConsoleProgress {
    fn start(&mut self, label: &str) {
        self.label = label.to_string();
        self.started = Some(Instant::now());
        self.last_bars = 0;
        self.draw(0);
    }

    fn update(&mut self, fraction: f32) {
        let current = (fraction.clamp(0.0, 1.0) * BARS as f32) as usize;
        if current == self.last_bars {
            return;
        }
        self.last_bars = current;
        self.draw(current);
    }

    fn end(&mut self) {
        let seconds = self
            .started
            .take()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        println!("{}\t[{}] {seconds:.2} s", self.label, "=".repeat(BARS));
        self.timings.push(PhaseTiming {
            phase: std::mem::take(&mut self.label),
            seconds,
        });
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("stereodepth=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    let config = PipelineConfig {
        threads: cli.threads,
        window: cli.window,
        max_disparity: cli.max_disparity,
        cross_threshold: cli.cross_threshold,
        fill_radius: cli.fill_radius,
    };
    config.validate()?;

    let left = io::load_grey(&cli.left)?;
    let right = io::load_grey(&cli.right)?;
    println!(
        "loaded '{}' and '{}', working resolution {}x{}",
        cli.left.display(),
        cli.right.display(),
        left.width(),
        left.height()
    );

    let mut progress = ConsoleProgress::default();
    let (left_map, right_map) = search::compute_depth_maps(&left, &right, &config, &mut progress)?;
    let checked = post::cross_check(&left_map, &right_map, config.cross_threshold)?;
    let normalized = post::normalize(&checked, config.max_disparity);
    if let Some(path) = &cli.save_cross {
        io::save(&normalized, path)?;
        println!("saved cross-checked map: {}", path.display());
    }
    let filled = post::occlusion_fill(&normalized, config.fill_radius, &mut progress);
    io::save(&filled, &cli.output)?;
    println!("saved depth map: {}", cli.output.display());

    if let Some(path) = &cli.timings {
        fs::write(path, serde_json::to_string_pretty(&progress.timings)?)?;
    }

    Ok(())
}
