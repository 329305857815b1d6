//! Configuration types for loading benchmark scenarios from YAML.
//!
//! A scenario has two sections, both optional:
//!
//! - [`EngineConfig`]     – which kernel formulation runs and how
//! - [`ParametersConfig`] – body count, repeat count and numerical constants
//!
//! Every missing field falls back to the fixed constants in
//! [`crate::simulation::params`], so an empty file is the standard run.
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   variant: functional   # or "direct"
//!   parallel: true        # fork-join over target bodies
//!   warmup_rounds: 2      # untimed rounds before measuring
//!
//! parameters:
//!   bodies: 30208         # N
//!   repeat: 5             # R, rounds of two steps
//!   dt: 0.016             # time step
//!   softening: 0.01       # added to |r|^2
//!   damping: 1.0          # velocity factor after each kick
//! ```

use serde::Deserialize;

use crate::simulation::params::{BODIES, DAMPING, DT, REPEAT, SOFTENING};

/// Which kernel formulation the benchmark runs
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum VariantConfig {
    #[default]
    #[serde(rename = "direct")] // nested loops over a structure-of-arrays store
    Direct,

    #[serde(rename = "functional")] // tabulate / map / sum over 4-vector arrays
    Functional,
}

/// Engine options
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub variant: VariantConfig, // kernel formulation
    pub parallel: bool,         // `true` - rayon over target bodies, `false` - one thread
    pub warmup_rounds: usize,   // rounds run and discarded before timing
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            variant: VariantConfig::Direct,
            parallel: true,
            warmup_rounds: 0,
        }
    }
}

/// Numerical parameters, each overriding one fixed constant
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub bodies: usize,  // body count
    pub repeat: usize,  // rounds of two steps
    pub dt: f32,        // time step
    pub softening: f32, // must be > 0 so the self term stays finite
    pub damping: f32,   // 1.0 for none
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            bodies: BODIES,
            repeat: REPEAT,
            dt: DT,
            softening: SOFTENING,
            damping: DAMPING,
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,         // formulation and threading
    pub parameters: ParametersConfig, // constants for this run
}
