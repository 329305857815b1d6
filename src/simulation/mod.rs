pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod combinator;
pub mod functional;
pub mod scenario;
