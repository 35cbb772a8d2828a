use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;

use orrery::gui::{sun_overrides, Simulation};
use orrery::model::{Orrery, SystemConfig};

#[derive(Debug, Parser)]
struct Args {
    /// Body graph to load
    #[arg(default_value = "solar-system.toml")]
    system: PathBuf,

    /// Overrides the time scale from the file
    #[arg(long)]
    time_scale: Option<f64>,

    /// Don't draw orbit rings
    #[arg(long)]
    no_rings: bool,
}

fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("orrery=info,rust_orrery=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let mut config = SystemConfig::from_file(&args.system)
        .with_context(|| format!("loading {}", args.system.display()))?;
    if let Some(time_scale) = args.time_scale {
        config.time_scale = time_scale;
    }
    if args.no_rings {
        config.view.rings = false;
    }
    let orrery = Orrery::new(&config).context("building orrery")?;

    let mut window = Window::new("Orrery");
    window.set_light(Light::StickToCamera);
    window.set_framerate_limit(Some(60));
    window.set_background_color(0.02, 0.02, 0.05);

    let overrides = sun_overrides(&mut window, orrery.system());
    let simulation = Simulation::new(orrery, &mut window, overrides);
    window.render_loop(simulation);

    Ok(())
}
