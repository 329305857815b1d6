//! Core state types for the N-body kernel.
//!
//! Bodies are stored structure-of-arrays style:
//! - two position buffers (ping-pong) plus a flag naming the current one
//! - one velocity array, mutated in place every step
//! - one mass array, fixed after seeding
//!
//! All arithmetic is single precision to match the reference kernel.

use anyhow::{Context, Result};
use nalgebra::{Vector3, Vector4};

pub type NVec3 = Vector3<f32>;
pub type NVec4 = Vector4<f32>;

/// Seed mass given to every body
pub const SEED_MASS: f32 = 2.0;

/// Which of the two position buffers an operation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffer {
    A,
    B,
}

impl Buffer {
    pub fn other(self) -> Self {
        match self {
            Buffer::A => Buffer::B,
            Buffer::B => Buffer::A,
        }
    }

    fn index(self) -> usize {
        match self {
            Buffer::A => 0,
            Buffer::B => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct System {
    positions: [Vec<NVec3>; 2], // ping-pong position buffers
    velocities: Vec<NVec3>,     // shared by both buffers
    masses: Vec<f32>,           // invariant after seeding
    current: Buffer,            // buffer holding the authoritative positions
}

/// Allocate a vector of `n` copies of `value`, reporting allocation failure
/// instead of aborting
pub(crate) fn try_filled<T: Clone>(n: usize, value: T, what: &str) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(n)
        .with_context(|| format!("failed to allocate {what} for {n} bodies"))?;
    v.resize(n, value);
    Ok(v)
}

impl System {
    /// Create `n` bodies with position = velocity = (i, i, i) and mass 2.0.
    ///
    /// Both position buffers get the same seed, and every buffer is allocated
    /// before any value is written.
    pub fn initialize(n: usize) -> Result<Self> {
        let mut a = try_filled(n, NVec3::zeros(), "position buffer A")?;
        let mut b = try_filled(n, NVec3::zeros(), "position buffer B")?;
        let mut velocities = try_filled(n, NVec3::zeros(), "velocities")?;
        let masses = try_filled(n, SEED_MASS, "masses")?;

        for i in 0..n {
            let s = NVec3::repeat(i as f32);
            a[i] = s;
            b[i] = s;
            velocities[i] = s;
        }

        Ok(Self {
            positions: [a, b],
            velocities,
            masses,
            current: Buffer::A,
        })
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// Buffer holding the authoritative positions
    pub fn current(&self) -> Buffer {
        self.current
    }

    /// Position of body `i` in the current buffer
    pub fn position(&self, i: usize) -> NVec3 {
        self.positions[self.current.index()][i]
    }

    pub fn velocity(&self, i: usize) -> NVec3 {
        self.velocities[i]
    }

    pub fn mass(&self, i: usize) -> f32 {
        self.masses[i]
    }

    pub fn set_velocity(&mut self, i: usize, v: NVec3) {
        self.velocities[i] = v;
    }

    pub fn set_position(&mut self, buffer: Buffer, i: usize, p: NVec3) {
        self.positions[buffer.index()][i] = p;
    }

    /// All positions of one buffer
    pub fn buffer(&self, buffer: Buffer) -> &[NVec3] {
        &self.positions[buffer.index()]
    }

    pub fn current_positions(&self) -> &[NVec3] {
        self.buffer(self.current)
    }

    pub fn velocities(&self) -> &[NVec3] {
        &self.velocities
    }

    pub fn masses(&self) -> &[f32] {
        &self.masses
    }

    /// Split the store for one step: (source positions, destination positions,
    /// velocities, masses). Source is the current buffer.
    pub(crate) fn split_step(&mut self) -> (&[NVec3], &mut [NVec3], &mut [NVec3], &[f32]) {
        let [a, b] = &mut self.positions;
        let (src, dst) = match self.current {
            Buffer::A => (&*a, b),
            Buffer::B => (&*b, a),
        };
        (
            src.as_slice(),
            dst.as_mut_slice(),
            self.velocities.as_mut_slice(),
            self.masses.as_slice(),
        )
    }

    /// Make the other buffer current
    pub(crate) fn swap(&mut self) {
        self.current = self.current.other();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_is_index_based() {
        let sys = System::initialize(16).unwrap();
        assert_eq!(sys.len(), 16);
        assert_eq!(sys.current(), Buffer::A);
        for i in 0..16 {
            let s = NVec3::repeat(i as f32);
            assert_eq!(sys.position(i), s);
            assert_eq!(sys.buffer(Buffer::B)[i], s);
            assert_eq!(sys.velocity(i), s);
            assert_eq!(sys.mass(i), 2.0);
        }
    }

    #[test]
    fn split_step_reads_current_and_writes_other() {
        let mut sys = System::initialize(3).unwrap();
        sys.set_position(Buffer::B, 1, NVec3::new(7.0, 8.0, 9.0));
        {
            let (src, dst, _, _) = sys.split_step();
            assert_eq!(src[1], NVec3::repeat(1.0));
            assert_eq!(dst[1], NVec3::new(7.0, 8.0, 9.0));
        }
        sys.swap();
        assert_eq!(sys.current(), Buffer::B);
        assert_eq!(sys.position(1), NVec3::new(7.0, 8.0, 9.0));
    }

    #[test]
    fn set_velocity_is_shared_by_both_buffers() {
        let mut sys = System::initialize(4).unwrap();
        sys.set_velocity(2, NVec3::new(-1.0, 0.5, 3.0));
        assert_eq!(sys.velocity(2), NVec3::new(-1.0, 0.5, 3.0));
        assert_eq!(sys.velocities()[1], NVec3::repeat(1.0));
        sys.swap();
        assert_eq!(sys.velocity(2), NVec3::new(-1.0, 0.5, 3.0));
        let (_, _, vel, _) = sys.split_step();
        assert_eq!(vel[2], NVec3::new(-1.0, 0.5, 3.0));
    }

    #[test]
    fn empty_system() {
        let sys = System::initialize(0).unwrap();
        assert!(sys.is_empty());
    }
}
