use anyhow::Result;
use std::time::Instant;
use tracing::{info, info_span};

use crate::benchmark::metrics::{centroid, Metrics};
use crate::configuration::config::VariantConfig;
use crate::simulation::engine::{Engine, StepDriver};
use crate::simulation::functional::FunctionalKernel;
use crate::simulation::params::Parameters;
use crate::simulation::scenario::Scenario;

/// Run one timed benchmark for `scenario`.
///
/// All buffers are allocated and seeded before the clock starts. Warm-up
/// rounds, if any, run on a separate store so the measured run still starts
/// from the seed.
pub fn run_scenario(scenario: &Scenario) -> Result<Metrics> {
    let Scenario { engine, parameters } = scenario;
    let _span = info_span!(
        "benchmark",
        variant = ?engine.variant,
        bodies = parameters.bodies,
        repeat = parameters.repeat
    )
    .entered();

    if engine.warmup_rounds > 0 {
        info!(rounds = engine.warmup_rounds, "warming up");
        warm_up(engine, parameters)?;
    }

    let metrics = match engine.variant {
        VariantConfig::Direct => run_direct(parameters, engine.parallel)?,
        VariantConfig::Functional => run_functional(parameters, engine.parallel)?,
    };

    info!(
        msec = metrics.elapsed_millis(),
        gflops = metrics.gflops,
        "benchmark finished"
    );
    Ok(metrics)
}

fn warm_up(engine: &Engine, params: &Parameters) -> Result<()> {
    match engine.variant {
        VariantConfig::Direct => {
            StepDriver::new(params, engine.parallel)?.run_rounds(engine.warmup_rounds)
        }
        VariantConfig::Functional => {
            FunctionalKernel::new(params, engine.parallel)?.run_rounds(engine.warmup_rounds)
        }
    }
    Ok(())
}

/// Direct nested-loop formulation
pub fn run_direct(params: &Parameters, parallel: bool) -> Result<Metrics> {
    let mut driver = StepDriver::new(params, parallel)?;

    let t0 = Instant::now();
    driver.run_rounds(params.repeat);
    let elapsed = t0.elapsed().as_micros() as u64;

    let sys = &driver.system;
    let g = centroid(sys.current_positions(), sys.masses());
    Ok(Metrics::new(elapsed, params.bodies, params.repeat, g))
}

/// Combinator formulation
pub fn run_functional(params: &Parameters, parallel: bool) -> Result<Metrics> {
    let mut kernel = FunctionalKernel::new(params, parallel)?;

    let t0 = Instant::now();
    kernel.run_rounds(params.repeat);
    let elapsed = t0.elapsed().as_micros() as u64;

    Ok(Metrics::new(elapsed, params.bodies, params.repeat, kernel.centroid()))
}

/// Sweep both kernels over a range of body counts, one round each, keeping
/// the numerical constants of `base`.
/// Prints CSV so the curve can be pasted straight into a spreadsheet.
pub fn bench_sizes(base: &Parameters, parallel: bool) -> Result<()> {
    println!("N,direct_ms,direct_gflops,functional_ms,functional_gflops");

    for n in SWEEP_SIZES.step_by(1024) {
        let params = sweep_params(base, n);

        let direct = run_direct(&params, parallel)?;
        let functional = run_functional(&params, parallel)?;

        println!(
            "{},{},{:.6},{},{:.6}",
            n,
            direct.elapsed_millis(),
            direct.gflops,
            functional.elapsed_millis(),
            functional.gflops
        );
    }
    Ok(())
}

const SWEEP_SIZES: std::ops::RangeInclusive<usize> = 1024..=16384;

/// `base` with only the body count and repeat count replaced
fn sweep_params(base: &Parameters, bodies: usize) -> Parameters {
    Parameters {
        bodies,
        repeat: 1,
        ..*base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_keeps_scenario_constants() {
        let base = Parameters {
            bodies: 10,
            repeat: 7,
            dt: 0.5,
            softening: 0.25,
            damping: 0.9,
        };
        let p = sweep_params(&base, 2048);
        assert_eq!(p.bodies, 2048);
        assert_eq!(p.repeat, 1);
        assert_eq!(p.dt, 0.5);
        assert_eq!(p.softening, 0.25);
        assert_eq!(p.damping, 0.9);
    }

    #[test]
    fn warmup_does_not_change_result() {
        let mut scenario = Scenario::default();
        scenario.parameters.bodies = 32;
        scenario.parameters.repeat = 1;
        let cold = run_scenario(&scenario).unwrap();
        scenario.engine.warmup_rounds = 2;
        let warm = run_scenario(&scenario).unwrap();
        assert_eq!(cold.centroid, warm.centroid);
    }
}
