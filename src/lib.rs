pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{Buffer, System, NVec3, NVec4};
pub use simulation::params::Parameters;
pub use simulation::forces::NewtonianGravity;
pub use simulation::integrator::SemiImplicitEuler;
pub use simulation::engine::{Engine, StepDriver};
pub use simulation::combinator::{Func, Generate, SlotFunc, Vec4Array, VecDsl};
pub use simulation::functional::{Centroid, FunctionalKernel, GravityStep, PairForce, Seed};
pub use simulation::scenario::Scenario;

pub use configuration::config::{EngineConfig, ParametersConfig, ScenarioConfig, VariantConfig};

pub use benchmark::metrics::{centroid, gflops, Metrics};
pub use benchmark::benchmark::{bench_sizes, run_direct, run_functional, run_scenario};
