//! Kinematics model for the event display
//!
//! NOTE: This is a visual model. Speeds, curvature and absorption are tuned to
//! make heavy particles look slow and light charged tracks curl; none of it
//! integrates the Lorentz force.

use crate::constants::*;
use crate::particle::{ParticleTypeDef, TrailStyle};
use crate::sampling::Sampler;
use glam::Vec3;

/// Tunables of the kinematics model
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicsParams {
    pub magnetic_field: f32,
    /// Base speed is drawn from `[base_speed_min, base_speed_max)`
    pub base_speed_min: f32,
    pub base_speed_max: f32,
    pub massless_boost: f32,
    pub momentum_mass_offset: f32,
    pub helix_tight_factor: f32,
    pub helix_wide_factor: f32,
    pub jet_absorption_radius: f32,
    pub jet_retention: f32,
}

impl Default for KinematicsParams {
    fn default() -> Self {
        Self {
            magnetic_field: MAGNETIC_FIELD,
            base_speed_min: BASE_SPEED_MIN,
            base_speed_max: BASE_SPEED_MAX,
            massless_boost: MASSLESS_SPEED_BOOST,
            momentum_mass_offset: MOMENTUM_MASS_OFFSET,
            helix_tight_factor: HELIX_TIGHT_FACTOR,
            helix_wide_factor: HELIX_WIDE_FACTOR,
            jet_absorption_radius: JET_ABSORPTION_RADIUS,
            jet_retention: JET_RETENTION,
        }
    }
}

impl KinematicsParams {
    /// Initial scalar speed for a particle of `mass` produced with `energy`.
    ///
    /// Massless particles get a flat boost; massive ones are slowed by
    /// `1 - mass / (energy + mass + 1)`, so heavier means slower at equal energy.
    pub fn initial_speed(&self, energy: f32, mass: f32, sampler: &mut dyn Sampler) -> f32 {
        let base = sampler.range(self.base_speed_min, self.base_speed_max);
        if mass == 0.0 {
            base * self.massless_boost
        } else {
            base * (1.0 - mass / (energy + mass + 1.0))
        }
    }

    /// Signed transverse curvature for a particle moving at `speed`.
    ///
    /// Zero for neutral particles and for beams.
    pub fn curvature(&self, def: &ParticleTypeDef, speed: f32) -> f32 {
        if !def.is_charged() || def.trail.is_beam() {
            return 0.0;
        }

        let sign = if def.charge > 0.0 { 1.0 } else { -1.0 };
        let momentum = speed * (def.mass + self.momentum_mass_offset);
        let base = sign * self.magnetic_field * def.charge.abs() / (momentum + 1.0);

        match def.trail {
            TrailStyle::HelixTight => base * self.helix_tight_factor,
            TrailStyle::HelixWide => base * self.helix_wide_factor,
            _ => base,
        }
    }

    /// Velocity change for one step of transverse deflection.
    ///
    /// The kick is perpendicular to both the velocity and the beam axis; a
    /// velocity parallel to the beam axis is not deflected.
    pub fn deflection(&self, def: &ParticleTypeDef, velocity: Vec3, dt: f32) -> Vec3 {
        let curvature = self.curvature(def, velocity.length());
        if curvature == 0.0 {
            return Vec3::ZERO;
        }
        velocity.cross(Vec3::Z).normalize_or_zero() * (curvature * dt)
    }

    /// Per-step retention factor for speed and energy at transverse radius `r`.
    ///
    /// Only jets are absorbed, and only outside the absorption radius.
    pub fn retention(&self, def: &ParticleTypeDef, r: f32) -> Option<f32> {
        (def.trail == TrailStyle::Jet && r > self.jet_absorption_radius)
            .then_some(self.jet_retention)
    }
}

/// Lifetime budget in seconds of simulation time, picked by track style
pub fn max_age(def: &ParticleTypeDef, sampler: &mut dyn Sampler) -> f32 {
    if def.trail.is_beam() {
        BEAM_MAX_AGE
    } else if def.lifetime.is_stable() {
        STABLE_MAX_AGE
    } else if def.trail.is_short_lived() {
        SHORT_MAX_AGE_MIN + sampler.unit() * SHORT_MAX_AGE_SPAN
    } else if def.trail == TrailStyle::Jet {
        JET_MAX_AGE_MIN + sampler.unit() * JET_MAX_AGE_SPAN
    } else {
        DEFAULT_MAX_AGE_MIN + sampler.unit() * DEFAULT_MAX_AGE_SPAN
    }
}

/// Distance from the beam axis
#[inline]
pub fn transverse_radius(position: Vec3) -> f32 {
    (position.x * position.x + position.y * position.y).sqrt()
}
