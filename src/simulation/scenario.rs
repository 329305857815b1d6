//! Build a validated runtime scenario from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime
//! `Engine` options plus `Parameters`, rejecting values the kernel cannot
//! run with.

use anyhow::{ensure, Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;

#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        let p_cfg = cfg.parameters;
        ensure!(p_cfg.bodies > 0, "scenario needs at least one body");
        ensure!(
            p_cfg.softening > 0.0 && p_cfg.softening.is_finite(),
            "softening must be a positive finite number, got {}",
            p_cfg.softening
        );
        ensure!(p_cfg.dt.is_finite(), "dt must be finite, got {}", p_cfg.dt);
        ensure!(
            p_cfg.damping.is_finite(),
            "damping must be finite, got {}",
            p_cfg.damping
        );

        let parameters = Parameters {
            bodies: p_cfg.bodies,
            repeat: p_cfg.repeat,
            dt: p_cfg.dt,
            softening: p_cfg.softening,
            damping: p_cfg.damping,
        };

        let e_cfg = cfg.engine;
        let engine = Engine {
            variant: e_cfg.variant,
            parallel: e_cfg.parallel,
            warmup_rounds: e_cfg.warmup_rounds,
        };

        Ok(Self { engine, parameters })
    }

    /// Read and validate a YAML scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open scenario {}", path.display()))?;
        let reader = BufReader::new(file);
        let cfg: ScenarioConfig = serde_yaml::from_reader(reader)
            .with_context(|| format!("failed to parse scenario {}", path.display()))?;
        info!(path = %path.display(), "loaded scenario");
        Self::build_scenario(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::config::VariantConfig;

    #[test]
    fn default_scenario_is_fixed_constants() {
        let s = Scenario::build_scenario(ScenarioConfig::default()).unwrap();
        assert_eq!(s.parameters, Parameters::default());
        assert_eq!(s.engine.variant, VariantConfig::Direct);
    }

    #[test]
    fn rejects_unrunnable_parameters() {
        let mut cfg = ScenarioConfig::default();
        cfg.parameters.bodies = 0;
        assert!(Scenario::build_scenario(cfg).is_err());

        let mut cfg = ScenarioConfig::default();
        cfg.parameters.softening = 0.0;
        assert!(Scenario::build_scenario(cfg).is_err());

        let mut cfg = ScenarioConfig::default();
        cfg.parameters.dt = f32::NAN;
        assert!(Scenario::build_scenario(cfg).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Scenario::load(Path::new("does/not/exist.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.yaml"));
    }
}
