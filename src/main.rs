use nbkernel::{bench_sizes, run_scenario, Scenario, VariantConfig};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "All-pairs gravitational N-body benchmark")]
struct Args {
    /// Scenario file under `scenarios/`; the fixed constants are used when absent
    #[arg(short, long)]
    file_name: Option<String>,

    /// Kernel formulation, overrides the scenario
    #[arg(short, long, value_enum)]
    variant: Option<VariantConfig>,

    /// Worker threads for the parallel kernels (default: one per core)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Sweep the body count instead of a single run
    #[arg(long, default_value_t = false)]
    sweep: bool,
}

// load here to keep main clean
fn load_scenario(args: &Args) -> Result<Scenario> {
    let mut scenario = match &args.file_name {
        Some(file_name) => {
            let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("scenarios")
                .join(file_name);
            Scenario::load(&config_path)?
        }
        None => Scenario::default(),
    };

    if let Some(variant) = args.variant {
        scenario.engine.variant = variant;
    }
    Ok(scenario)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to build the worker pool")?;
    }

    let scenario = load_scenario(&args)?;

    if args.sweep {
        return bench_sizes(&scenario.parameters, scenario.engine.parallel);
    }

    let metrics = run_scenario(&scenario)?;

    let g = metrics.normalized_centroid();
    println!("{} msec, {:.6} GFlops", metrics.elapsed_millis(), metrics.gflops);
    println!("{:.6}, {:.6}, {:.6}", g.x, g.y, g.z);

    Ok(())
}
