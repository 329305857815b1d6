//! Softened all-pairs gravity
//!
//! The acceleration on body i is
//!
//! ```text
//! a_i = sum_j (p_i - p_j) * m_j * (|p_i - p_j|^2 + eps)^(-3/2)
//! ```
//!
//! taken over every j including i itself. The direction is "self minus
//! other", and the self term is finite because of `eps`.

use crate::simulation::states::NVec3;

/// Direct O(N) sum for one target, O(N^2) for a full sweep
#[derive(Debug, Clone, Copy)]
pub struct NewtonianGravity {
    pub softening: f32, // added to |r|^2, must be > 0
}

impl NewtonianGravity {
    pub fn new(softening: f32) -> Self {
        Self { softening }
    }

    /// `m_j * (|r|^2 + eps)^(-3/2)` for a displacement `r`.
    ///
    /// Computed as `1 / sqrt(x)` cubed by multiplication, never `powf`.
    #[inline(always)]
    pub fn scale(&self, r: &NVec3, mj: f32) -> f32 {
        let ra = 1.0 / (r.x * r.x + r.y * r.y + r.z * r.z + self.softening).sqrt();
        mj * (ra * ra * ra)
    }

    /// Contribution of body j (at `pj`, mass `mj`) to the acceleration of a
    /// body at `pi`
    #[inline(always)]
    pub fn pair(&self, pi: &NVec3, pj: &NVec3, mj: f32) -> NVec3 {
        let r = pi - pj;
        r * self.scale(&r, mj)
    }

    /// Net acceleration on the body at `pi` from every body in `positions`
    pub fn accel_at(&self, pi: &NVec3, positions: &[NVec3], masses: &[f32]) -> NVec3 {
        // component-wise accumulators keep the loop easy to vectorize
        let (mut ax, mut ay, mut az) = (0.0f32, 0.0f32, 0.0f32);
        for (pj, &mj) in positions.iter().zip(masses) {
            let rx = pi.x - pj.x;
            let ry = pi.y - pj.y;
            let rz = pi.z - pj.z;
            let ra = 1.0 / (rx * rx + ry * ry + rz * rz + self.softening).sqrt();
            let s = mj * (ra * ra * ra);
            ax += rx * s;
            ay += ry * s;
            az += rz * s;
        }
        NVec3::new(ax, ay, az)
    }

    /// Net acceleration on body `i`
    pub fn accel_on(&self, i: usize, positions: &[NVec3], masses: &[f32]) -> NVec3 {
        self.accel_at(&positions[i], positions, masses)
    }

    /// Fill `out[i]` with the acceleration of every body
    pub fn accumulate_accels(&self, positions: &[NVec3], masses: &[f32], out: &mut [NVec3]) {
        for (i, a) in out.iter_mut().enumerate() {
            *a = self.accel_on(i, positions, masses);
        }
    }
}
