use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use orrery::gui::node::recording::RecordingNode;
use orrery::gui::SystemView;
use orrery::model::{Orrery, SystemConfig};

/// Steps an orrery without a window and prints where everything is.
#[derive(Debug, Parser)]
struct Args {
    /// Body graph to load
    #[arg(long, default_value = "solar-system.toml")]
    system: PathBuf,

    /// Only print this body
    #[arg(long)]
    body: Option<String>,

    /// Number of updates to run
    #[arg(long, default_value_t = 10)]
    steps: usize,

    /// Frame time passed to each update
    #[arg(long, default_value_t = 1.0)]
    dt: f64,
}

fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("orrery=info,orrery_cli=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let config = SystemConfig::from_file(&args.system)
        .with_context(|| format!("loading {}", args.system.display()))?;
    let mut orrery = Orrery::new(&config).context("building orrery")?;

    if let Some(name) = &args.body {
        if orrery.system().lookup(name).is_none() {
            bail!("no body named {:?} in {}", name, args.system.display());
        }
    }

    // Run the view against a recording scene, so the connector gets checked too.
    let mut scene = RecordingNode::root();
    let mut view = SystemView::attach(&mut scene, orrery.system(), HashMap::new());

    for _ in 0..args.steps {
        orrery.update(args.dt);
        let state = orrery.state();
        view.apply_positions(state.positions);

        println!("t = {:.3}", state.time);
        for (name, p) in state.positions.iter() {
            if args.body.as_deref().map_or(true, |b| b == name) {
                println!("  {:<12} {:>10.4} {:>10.4} {:>10.4}", name, p.x, p.y, p.z);
            }
        }
        if let Some(connector) = view.connector() {
            let (a, b) = connector.between();
            match connector.pose() {
                Some(pose) => println!(
                    "  connector {}-{}: length {:.4}, radius {:.4}",
                    a, b, pose.length, pose.radius
                ),
                None => println!("  connector {}-{}: hidden", a, b),
            }
        }
    }

    Ok(())
}
