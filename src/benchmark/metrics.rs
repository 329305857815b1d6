//! Checksum and throughput figures reported after a run

use crate::simulation::states::NVec3;

/// Instructions charged per body pair when estimating throughput
pub const FLOPS_PER_INTERACTION: u32 = 20;

/// `sum_i position(i) / mass(i)`.
///
/// This is a reproducibility checksum, not a centre of mass: each position
/// is divided by its own mass and the result is not divided by N.
pub fn centroid(positions: &[NVec3], masses: &[f32]) -> NVec3 {
    let mut av = NVec3::zeros();
    for (p, &w) in positions.iter().zip(masses) {
        av.x += p.x / w;
        av.y += p.y / w;
        av.z += p.z / w;
    }
    av
}

/// Estimated GFLOP/s for `repeat` rounds (two steps each) over `n` bodies:
///
/// ```text
/// n^2 * 1e-9 * repeat * 2 * 1000 / msec * 20
/// ```
///
/// `msec == 0` yields `+inf` when `n` and `repeat` are non-zero; if either is
/// zero as well the product is `0 * inf`, i.e. NaN.
pub fn gflops(msec: u64, n: usize, repeat: usize) -> f32 {
    let mut inst = n as f32 * n as f32;
    inst = (inst as f64 * (1e-9 * repeat as f64 * 2.0 * 1000.0 / msec as f64)) as f32;
    inst * FLOPS_PER_INTERACTION as f32
}

/// Figures from one timed run
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub elapsed_micros: u64,
    pub gflops: f32,
    pub centroid: NVec3, // undivided checksum
    pub bodies: usize,
}

impl Metrics {
    pub fn new(elapsed_micros: u64, bodies: usize, repeat: usize, centroid: NVec3) -> Self {
        Self {
            elapsed_micros,
            gflops: gflops(elapsed_micros / 1000, bodies, repeat),
            centroid,
            bodies,
        }
    }

    /// Whole milliseconds, truncated
    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed_micros / 1000
    }

    /// Checksum divided by N, as printed
    pub fn normalized_centroid(&self) -> NVec3 {
        self.centroid / self.bodies as f32
    }
}
