//! Numerical parameters for the benchmark
//!
//! The fixed constants of a standard run live here as `pub const`s;
//! `Parameters::default()` is exactly those constants. Scenario files may
//! override them.

/// Body count
pub const BODIES: usize = 30208;
/// Rounds per benchmark run; each round is two steps (A -> B, B -> A)
pub const REPEAT: usize = 5;
/// Fixed time step
pub const DT: f32 = 0.016;
/// Softening added to the squared distance
pub const SOFTENING: f32 = 0.01;
/// Velocity damping factor, 1.0 means no damping
pub const DAMPING: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub bodies: usize,  // N
    pub repeat: usize,  // R, rounds of two steps
    pub dt: f32,        // step size
    pub softening: f32, // epsilon, added to |r|^2
    pub damping: f32,   // velocity scale after each kick
}

impl Default for Parameters {
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

impl Parameters {
    /// Total single steps in a run of `repeat` rounds
    pub fn steps(&self) -> usize {
        2 * self.repeat
    }
}
