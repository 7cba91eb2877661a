//! Experiment sequencing
//!
//! A run clears the session, fires two beams at each other and pre-spawns every
//! decay product and background particle as a dormant entity whose delay
//! encodes when it appears. Nothing is scheduled outside the store.

use crate::simulation::ParticleSimulation;
use glam::Vec3;
use particle_physics::{ExperimentPreset, Sampler};
use std::f32::consts::{PI, TAU};

/// Random direction around the vertex.
///
/// Azimuth is uniform over a full turn; the polar angle is uniform over
/// `polar_spread * π` centered on the transverse plane.
pub fn sample_direction(sampler: &mut dyn Sampler, polar_spread: f32) -> Vec3 {
    let azimuth = sampler.unit() * TAU;
    let polar = (sampler.unit() - 0.5) * PI * polar_spread;
    Vec3::new(
        azimuth.cos() * polar.cos(),
        polar.sin(),
        azimuth.sin() * polar.cos(),
    )
}

impl ParticleSimulation {
    /// Start `preset` from a clean session.
    ///
    /// Returns the nominal collision instant in simulation milliseconds; use
    /// [`ParticleSimulation::wall_ms`] to schedule effects in wall time.
    pub fn run(&mut self, preset: &ExperimentPreset) -> f32 {
        self.clear();
        log::info!(
            "Running experiment '{}' ({} products, {} secondaries)",
            preset.name,
            preset.product_count(),
            preset.secondary_particles.len()
        );

        let collision_ms = self.params.collision_ms;
        let beam_type = self.params.beam_type.clone();
        let offset = self.params.beam_offset;
        let beam_energy = self.params.beam_energy;

        self.spawn(&beam_type, Vec3::new(0.0, 0.0, -offset), Vec3::Z, beam_energy, 0.0);
        self.spawn(&beam_type, Vec3::new(0.0, 0.0, offset), Vec3::NEG_Z, beam_energy, 0.0);

        let (lo, hi) = self.params.product_energy;
        for step in &preset.decay_chain {
            for key in &step.products {
                let direction = sample_direction(&mut *self.sampler, 1.0);
                let energy = self.sampler.range(lo, hi);
                self.spawn(key, Vec3::ZERO, direction, energy, collision_ms + step.delay_ms);
            }
        }

        let (lo, hi) = self.params.secondary_energy;
        let spread = self.params.secondary_polar_spread;
        let base_delay = collision_ms + self.params.secondary_base_delay_ms;
        let jitter = self.params.secondary_jitter_ms;
        for key in &preset.secondary_particles {
            let direction = sample_direction(&mut *self.sampler, spread);
            let energy = self.sampler.range(lo, hi);
            let delay_ms = base_delay + self.sampler.unit() * jitter;
            self.spawn(key, Vec3::ZERO, direction, energy, delay_ms);
        }

        collision_ms
    }
}
