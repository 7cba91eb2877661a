//! # Particle Physics Model
//!
//! Static data and pure math behind the collider event display: the particle
//! zoo, experiment presets with their decay chains, and the simplified
//! kinematics (speed, magnetic curvature, calorimeter absorption, lifetimes).

pub mod constants;
pub mod error;
pub mod kinematics;
pub mod particle;
pub mod presets;
pub mod sampling;

pub use constants::*;
pub use error::CatalogError;
pub use kinematics::*;
pub use particle::*;
pub use presets::*;
pub use sampling::*;
