//! The same kernel written against the array combinators
//!
//! Four rules drive it: [`Seed`] fills the arrays, [`GravityStep`] fuses the
//! force sum ([`PairForce`]) with the Euler update, and [`Centroid`] folds the
//! final positions into the checksum.

use anyhow::Result;
use tracing::debug;

use crate::simulation::combinator::{set_xyz, Func, Generate, SlotFunc, Vec4Array, VecDsl};
use crate::simulation::forces::NewtonianGravity;
use crate::simulation::integrator::SemiImplicitEuler;
use crate::simulation::params::Parameters;
use crate::simulation::states::{NVec3, NVec4, SEED_MASS};

/// i -> (i, i, i, 2)
#[derive(Debug, Clone, Copy)]
pub struct Seed;

impl Generate for Seed {
    fn apply(&self, i: usize) -> NVec4 {
        let s = i as f32;
        NVec4::new(s, s, s, SEED_MASS)
    }
}

/// Acceleration contributed to a body at `pi` by element j
#[derive(Debug, Clone, Copy)]
pub struct PairForce {
    pub pi: NVec3,
    pub gravity: NewtonianGravity,
}

impl Func for PairForce {
    #[inline(always)]
    fn apply(&self, _pos: &Vec4Array, _j: usize, pj: NVec3, wj: f32) -> NVec3 {
        self.gravity.pair(&self.pi, &pj, wj)
    }
}

/// Force sum plus semi-implicit Euler for one body. The velocity lives in
/// the companion slot; the new position is returned.
#[derive(Debug, Clone, Copy)]
pub struct GravityStep {
    pub gravity: NewtonianGravity,
    pub integrator: SemiImplicitEuler,
}

impl SlotFunc for GravityStep {
    fn apply(&self, pos: &Vec4Array, _i: usize, pi: NVec3, _wi: f32, vel: &mut NVec4) -> NVec3 {
        let a = pos.sum(&PairForce {
            pi,
            gravity: self.gravity,
        });
        let mut v = vel.xyz();
        let x_new = self.integrator.advance(&pi, &mut v, &a);
        set_xyz(vel, &v);
        x_new
    }
}

/// position / weight, summed over the array by [`Vec4Array::sum`]
#[derive(Debug, Clone, Copy)]
pub struct Centroid;

impl Func for Centroid {
    fn apply(&self, _pos: &Vec4Array, _i: usize, v: NVec3, w: f32) -> NVec3 {
        NVec3::new(v.x / w, v.y / w, v.z / w)
    }
}

/// Ping-pong state for the combinator formulation
pub struct FunctionalKernel {
    pub dsl: VecDsl,
    pub pos1: Vec4Array,
    pub pos2: Vec4Array,
    pub vel: Vec4Array,
    pub step: GravityStep,
}

impl FunctionalKernel {
    /// Allocate all three arrays, then seed them.
    ///
    /// Both position arrays are seeded so the weight lane carries the mass
    /// whichever array is the source.
    pub fn new(params: &Parameters, parallel: bool) -> Result<Self> {
        let dsl = VecDsl::new(params.bodies).with_parallel(parallel);
        let mut pos1 = dsl.array()?;
        let mut pos2 = dsl.array()?;
        let mut vel = dsl.array()?;

        pos1.tabulate(&Seed);
        pos2.tabulate(&Seed);
        vel.tabulate(&Seed);

        Ok(Self {
            dsl,
            pos1,
            pos2,
            vel,
            step: GravityStep {
                gravity: NewtonianGravity::new(params.softening),
                integrator: SemiImplicitEuler::from_params(params),
            },
        })
    }

    /// `rounds` x (pos2 <- f(pos1), pos1 <- f(pos2)); positions end in `pos1`
    pub fn run_rounds(&mut self, rounds: usize) {
        let step = self.step;
        let (pos1, pos2, vel) = (&mut self.pos1, &mut self.pos2, &mut self.vel);
        let mut round = 0usize;
        self.dsl.repeat(rounds, || {
            debug!(round, "functional round");
            pos2.map_with(&step, pos1, vel);
            pos1.map_with(&step, pos2, vel);
            round += 1;
        });
    }

    /// Checksum over the authoritative positions, not divided by N
    pub fn centroid(&self) -> NVec3 {
        self.pos1.sum(&Centroid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(n: usize) -> Parameters {
        Parameters {
            bodies: n,
            ..Parameters::default()
        }
    }

    #[test]
    fn seed_rule() {
        assert_eq!(Seed.apply(3), NVec4::new(3.0, 3.0, 3.0, 2.0));
    }

    #[test]
    fn centroid_divides_by_own_weight() {
        let k = FunctionalKernel::new(&small(4), false).unwrap();
        // (0 + 1 + 2 + 3) / 2 per component
        assert_eq!(k.centroid(), NVec3::repeat(3.0));
    }

    #[test]
    fn zero_rounds_keep_seed() {
        let mut k = FunctionalKernel::new(&small(5), true).unwrap();
        k.run_rounds(0);
        for i in 0..5 {
            assert_eq!(k.pos1.get(i), NVec3::repeat(i as f32));
            assert_eq!(k.vel.get(i), NVec3::repeat(i as f32));
            assert_eq!(k.pos1.w(i), 2.0);
        }
    }

    #[test]
    fn step_keeps_weights() {
        let mut k = FunctionalKernel::new(&small(6), true).unwrap();
        k.run_rounds(2);
        for i in 0..6 {
            assert_eq!(k.pos1.w(i), 2.0);
            assert_eq!(k.pos2.w(i), 2.0);
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut seq = FunctionalKernel::new(&small(33), false).unwrap();
        let mut par = FunctionalKernel::new(&small(33), true).unwrap();
        seq.run_rounds(2);
        par.run_rounds(2);
        assert_eq!(seq.pos1.as_slice(), par.pos1.as_slice());
        assert_eq!(seq.vel.as_slice(), par.vel.as_slice());
    }
}
