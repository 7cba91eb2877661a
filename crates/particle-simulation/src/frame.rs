//! Per-frame render snapshot

use crate::particle::{Particle, ParticleId, Phase};
use crate::trail::TrailVertex;
use glam::Vec3;
use particle_physics::TrailStyle;

/// Everything a renderer needs to draw one entity this frame
#[derive(Debug, Clone)]
pub struct FrameParticle {
    pub id: ParticleId,
    pub type_key: String,
    pub symbol: String,
    pub phase: Phase,
    pub position: Vec3,
    /// Head sphere and label
    pub visible: bool,
    pub head_opacity: f32,
    /// Multiplies the per-vertex gradient alpha
    pub trail_opacity: f32,
    pub dashed: bool,
    /// Beams get the big head sphere
    pub beam: bool,
    /// Oldest to newest; empty when fewer than two points are buffered
    pub trail: Vec<TrailVertex>,
}

impl FrameParticle {
    pub fn from_particle(particle: &Particle) -> Self {
        let def = particle.def();
        let visible = particle.is_visible();
        Self {
            id: particle.id(),
            type_key: particle.type_key().to_owned(),
            symbol: def.symbol.clone(),
            phase: particle.phase(),
            position: particle.position(),
            visible,
            head_opacity: if visible { particle.head_opacity() } else { 0.0 },
            trail_opacity: particle.fade_opacity(),
            dashed: def.trail == TrailStyle::Dashed,
            beam: particle.is_beam(),
            trail: if visible {
                particle.trail_vertices()
            } else {
                Vec::new()
            },
        }
    }

    pub fn has_trail(&self) -> bool {
        !self.trail.is_empty()
    }
}
