use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::Parser;
use plotters::prelude::*;
use tracing::info;

use orrery::gui::system_extent;
use orrery::model::{Orrery, SystemConfig};

/// Traces every body over a span of time and plots the traces from above.
#[derive(Debug, Parser)]
struct Args {
    /// Body graph to load
    #[arg(long, default_value = "solar-system.toml")]
    system: PathBuf,

    /// Where to write the PNG
    #[arg(long, default_value = "plots/orbits.png")]
    output: PathBuf,

    /// Simulated time to trace over
    #[arg(long, default_value_t = 150.0)]
    span: f64,

    /// Samples along the span
    #[arg(long, default_value_t = 2000)]
    samples: usize,
}

fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("orrery=info,plot_orbits=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let config = SystemConfig::from_file(&args.system)
        .with_context(|| format!("loading {}", args.system.display()))?;
    let mut orrery = Orrery::new(&config).context("building orrery")?;

    // traces[i] follows body i, in declared order
    let system = orrery.shared_system();
    let mut traces: Vec<Vec<(f32, f32)>> = vec![Vec::with_capacity(args.samples + 1); system.len()];
    let dt = args.span / args.samples.max(1) as f64;
    for i in 0..=args.samples {
        if i > 0 {
            orrery.update(dt);
        }
        for (trace, (_, p)) in traces.iter_mut().zip(orrery.state().positions.iter()) {
            trace.push((p.x as f32, p.z as f32));
        }
    }

    if let Some(dir) = args.output.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    let extent = (system_extent(&system).max(1.0) * 1.1) as f32;
    draw_plot(&args.output, &system, &traces, extent)
        .map_err(|e| anyhow!("drawing plot: {}", e))?;

    info!(output = %args.output.display(), "wrote plot");
    Ok(())
}

fn draw_plot(
    path: &Path,
    system: &orrery::model::System,
    traces: &[Vec<(f32, f32)>],
    extent: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;

    chart.configure_mesh().draw()?;

    for (body, trace) in system.bodies().iter().zip(traces) {
        if body.is_virtual() {
            continue;
        }
        let c = body.info.color;
        let color = RGBColor(
            (c.x * 255.0) as u8,
            (c.y * 255.0) as u8,
            (c.z * 255.0) as u8,
        );
        chart.draw_series(LineSeries::new(trace.iter().copied(), &color))?;
    }

    Ok(())
}
