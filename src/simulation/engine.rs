//! Runtime engine settings and the direct-loop step driver
//!
//! `Engine` selects which kernel formulation runs and whether the outer
//! loop over target bodies is split across rayon workers. `StepDriver` owns
//! the body store and advances it one ping-pong step at a time.

use anyhow::Result;
use rayon::prelude::*;
use tracing::debug;

use crate::configuration::config::VariantConfig;
use crate::simulation::forces::NewtonianGravity;
use crate::simulation::integrator::SemiImplicitEuler;
use crate::simulation::params::Parameters;
use crate::simulation::states::{NVec3, System};

#[derive(Debug, Clone)]
pub struct Engine {
    pub variant: VariantConfig, // direct loop or combinator formulation
    pub parallel: bool,         // fork-join over target bodies
    pub warmup_rounds: usize,   // untimed rounds before the measured run
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            variant: VariantConfig::Direct,
            parallel: true,
            warmup_rounds: 0,
        }
    }
}

/// Direct nested-loop formulation: one force sum per target body, then a
/// semi-implicit Euler update
pub struct StepDriver {
    pub system: System,
    pub gravity: NewtonianGravity,
    pub integrator: SemiImplicitEuler,
    pub parallel: bool,
    steps_taken: usize,
}

impl StepDriver {
    /// Seed `params.bodies` bodies and build the kernels from `params`
    pub fn new(params: &Parameters, parallel: bool) -> Result<Self> {
        let system = System::initialize(params.bodies)?;
        Ok(Self::with_system(system, params, parallel))
    }

    pub fn with_system(system: System, params: &Parameters, parallel: bool) -> Self {
        Self {
            system,
            gravity: NewtonianGravity::new(params.softening),
            integrator: SemiImplicitEuler::from_params(params),
            parallel,
            steps_taken: 0,
        }
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// One full step: read the current buffer, write the other one, then swap.
    ///
    /// Iteration i reads the whole source buffer and writes only `dst[i]` and
    /// `vel[i]`, so targets can be processed in any order or in parallel.
    pub fn step(&mut self) {
        let gravity = self.gravity;
        let euler = self.integrator;
        let (src, dst, vel, masses) = self.system.split_step();

        let update = |(i, (x_new, v)): (usize, (&mut NVec3, &mut NVec3))| {
            let a = gravity.accel_on(i, src, masses);
            *x_new = euler.advance(&src[i], v, &a);
        };

        if self.parallel {
            dst.par_iter_mut()
                .zip(vel.par_iter_mut())
                .enumerate()
                .for_each(update);
        } else {
            dst.iter_mut().zip(vel.iter_mut()).enumerate().for_each(update);
        }

        self.system.swap();
        self.steps_taken += 1;
    }

    /// Run exactly `steps` single steps, alternating buffers strictly
    pub fn run(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Run `rounds` rounds of two steps (A -> B, B -> A)
    pub fn run_rounds(&mut self, rounds: usize) {
        for round in 0..rounds {
            debug!(round, "direct round");
            self.step();
            self.step();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::Buffer;

    fn params(n: usize) -> Parameters {
        Parameters {
            bodies: n,
            ..Parameters::default()
        }
    }

    #[test]
    fn zero_steps_leave_seed_untouched() {
        let mut d = StepDriver::new(&params(8), true).unwrap();
        d.run(0);
        assert_eq!(d.steps_taken(), 0);
        assert_eq!(d.system.current(), Buffer::A);
        for i in 0..8 {
            assert_eq!(d.system.position(i), NVec3::repeat(i as f32));
            assert_eq!(d.system.velocity(i), NVec3::repeat(i as f32));
        }
    }

    #[test]
    fn buffers_alternate() {
        let mut d = StepDriver::new(&params(4), false).unwrap();
        d.step();
        assert_eq!(d.system.current(), Buffer::B);
        d.step();
        assert_eq!(d.system.current(), Buffer::A);
        d.run_rounds(3);
        assert_eq!(d.system.current(), Buffer::A);
        assert_eq!(d.steps_taken(), 8);
    }

    #[test]
    fn parallel_matches_sequential_exactly() {
        let mut seq = StepDriver::new(&params(97), false).unwrap();
        let mut par = StepDriver::new(&params(97), true).unwrap();
        seq.run(3);
        par.run(3);
        assert_eq!(seq.system.current_positions(), par.system.current_positions());
        assert_eq!(seq.system.velocities(), par.system.velocities());
    }

    #[test]
    fn source_buffer_is_not_written() {
        let mut d = StepDriver::new(&params(6), true).unwrap();
        let before = d.system.buffer(Buffer::A).to_vec();
        d.step();
        assert_eq!(d.system.buffer(Buffer::A), before.as_slice());
        assert_ne!(d.system.buffer(Buffer::B), before.as_slice());
    }
}
