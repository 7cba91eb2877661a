//! Simulation parameters for runtime tuning

use crate::detector::DetectorLayer;
use particle_physics::KinematicsParams;

#[derive(Clone, Debug, PartialEq)]
pub struct SimParams {
    pub kinematics: KinematicsParams,

    // Entity limits
    /// Trail ring buffer capacity (points)
    pub trail_capacity: usize,
    /// Visual fade window after an entity dies (wall milliseconds)
    pub fade_ms: f32,
    /// Entities farther than this from the beam axis are destroyed
    pub radial_limit: f32,
    /// Entities with |z| beyond this are destroyed
    pub longitudinal_limit: f32,

    // Clock
    /// Largest wall-clock step a single tick will integrate (seconds)
    pub max_tick_seconds: f32,

    // Experiment sequencing
    /// Nominal collision instant after `run` (simulation milliseconds)
    pub collision_ms: f32,
    pub beam_type: String,
    /// Beams start at z = ±beam_offset
    pub beam_offset: f32,
    /// GeV per beam
    pub beam_energy: f32,
    /// Decay products draw energy from `[min, max)` GeV
    pub product_energy: (f32, f32),
    /// Secondaries draw energy from `[min, max)` GeV
    pub secondary_energy: (f32, f32),
    /// Secondaries activate at collision + base + [0, jitter) ms
    pub secondary_base_delay_ms: f32,
    pub secondary_jitter_ms: f32,
    /// Polar spread of secondaries relative to products (1.0 = full sphere)
    pub secondary_polar_spread: f32,

    // Detector
    /// Half-width of the band around a layer radius that counts as a hit
    pub crossing_tolerance: f32,
    pub layers: Vec<DetectorLayer>,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            kinematics: KinematicsParams::default(),

            trail_capacity: 150,
            fade_ms: 2000.0,
            radial_limit: 16.0,
            longitudinal_limit: 14.0,

            max_tick_seconds: 0.05,

            collision_ms: 1300.0,
            beam_type: "proton".to_owned(),
            beam_offset: 25.0,
            beam_energy: 6800.0,
            product_energy: (20.0, 100.0),
            secondary_energy: (5.0, 35.0),
            secondary_base_delay_ms: 100.0,
            secondary_jitter_ms: 400.0,
            secondary_polar_spread: 0.8,

            crossing_tolerance: 0.3,
            layers: DetectorLayer::standard(),
        }
    }
}
