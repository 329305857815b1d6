//! Fixed-step semi-implicit Euler
//!
//! The kick uses the acceleration from the old positions, and the drift
//! uses the kicked velocity:
//!
//! ```text
//! v' = (v + a * dt) * damping
//! x' = x + v' * dt
//! ```

use crate::simulation::params::Parameters;
use crate::simulation::states::NVec3;

#[derive(Debug, Clone, Copy)]
pub struct SemiImplicitEuler {
    pub dt: f32,      // time step
    pub damping: f32, // 1.0 keeps energy, < 1.0 bleeds velocity
}

impl SemiImplicitEuler {
    pub fn new(dt: f32, damping: f32) -> Self {
        Self { dt, damping }
    }

    pub fn from_params(params: &Parameters) -> Self {
        Self::new(params.dt, params.damping)
    }

    /// Kick: new velocity from the old one and the acceleration
    #[inline(always)]
    pub fn kick(&self, v: &NVec3, a: &NVec3) -> NVec3 {
        (v + a * self.dt) * self.damping
    }

    /// Drift: new position from the already kicked velocity
    #[inline(always)]
    pub fn drift(&self, x: &NVec3, v_new: &NVec3) -> NVec3 {
        x + v_new * self.dt
    }

    /// Advance one body. Writes the new velocity into `v` and returns the new
    /// position.
    #[inline(always)]
    pub fn advance(&self, x: &NVec3, v: &mut NVec3, a: &NVec3) -> NVec3 {
        *v = self.kick(v, a);
        self.drift(x, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drift_uses_kicked_velocity() {
        let euler = SemiImplicitEuler::new(0.5, 1.0);
        let x = NVec3::zeros();
        let mut v = NVec3::new(1.0, 0.0, 0.0);
        let a = NVec3::new(2.0, 0.0, 0.0);

        let x_new = euler.advance(&x, &mut v, &a);
        // v' = 1 + 2 * 0.5 = 2, x' = 0 + 2 * 0.5 = 1 (explicit Euler would give 0.5)
        assert_eq!(v, NVec3::new(2.0, 0.0, 0.0));
        assert_eq!(x_new, NVec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn damping_scales_after_kick() {
        let euler = SemiImplicitEuler::new(1.0, 0.5);
        let mut v = NVec3::new(2.0, 4.0, 6.0);
        let x_new = euler.advance(&NVec3::zeros(), &mut v, &NVec3::repeat(2.0));
        assert_eq!(v, NVec3::new(2.0, 3.0, 4.0));
        assert_eq!(x_new, v);
    }

    #[test]
    fn zero_acceleration_is_free_flight() {
        let euler = SemiImplicitEuler::from_params(&Parameters::default());
        let mut v = NVec3::new(1.0, 2.0, 3.0);
        let x_new = euler.advance(&NVec3::repeat(1.0), &mut v, &NVec3::zeros());
        assert_eq!(v, NVec3::new(1.0, 2.0, 3.0));
        assert_eq!(x_new, NVec3::repeat(1.0) + v * 0.016);
    }
}
