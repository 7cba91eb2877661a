//! # Particle Simulation Engine
//!
//! Event-display simulation of a collider run: beam particles, staged decay
//! products with delayed activation, fading trails, detector-layer crossings.

pub mod detector;
pub mod events;
pub mod experiment;
pub mod fade;
pub mod frame;
pub mod params;
pub mod particle;
pub mod resources;
pub mod simulation;
pub mod trail;

pub use detector::*;
pub use events::*;
pub use experiment::*;
pub use fade::*;
pub use frame::*;
pub use params::*;
pub use particle::*;
pub use resources::*;
pub use simulation::*;
pub use trail::*;
