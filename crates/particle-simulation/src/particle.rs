//! Simulation entity: one particle with its trail and render resources

use crate::fade::FadeTask;
use crate::params::SimParams;
use crate::resources::RenderHandle;
use crate::trail::{TrailBuffer, TrailVertex};
use glam::Vec3;
use particle_physics::{transverse_radius, ParticleTypeDef};
use std::fmt;
use std::sync::Arc;

/// Head opacity of decay products; beams are drawn fully opaque
const PRODUCT_HEAD_OPACITY: f32 = 0.95;

/// Session-unique particle identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u64);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why an entity stopped being alive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryReason {
    /// Exceeded its lifetime budget
    Age,
    /// Left the detector radially
    Radial,
    /// Left the detector along the beam axis
    Longitudinal,
    /// Position or velocity stopped being finite
    Malformed,
}

impl fmt::Display for ExpiryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExpiryReason::Age => "lifetime exceeded",
            ExpiryReason::Radial => "left detector radially",
            ExpiryReason::Longitudinal => "left detector longitudinally",
            ExpiryReason::Malformed => "malformed state",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for its activation delay; invisible and frozen
    Dormant,
    Active,
    /// Dead, visual remnants ramping out
    Fading,
}

/// Result of advancing one entity by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing observable happened (dead, or still counting down)
    Idle,
    /// Delay ran out this step
    Activated,
    Moved,
    Expired(ExpiryReason),
}

#[derive(Debug)]
pub struct Particle {
    id: ParticleId,
    type_key: String,
    def: Arc<ParticleTypeDef>,

    position: Vec3,
    velocity: Vec3,
    /// GeV; decreases under calorimeter absorption
    energy: f32,
    /// Seconds since activation
    age: f32,
    /// Milliseconds left before activation
    delay_ms: f32,
    max_age: f32,
    alive: bool,
    visible: bool,

    trail: TrailBuffer,
    fade: Option<FadeTask>,
    _handle: RenderHandle,
}

impl Particle {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: ParticleId,
        type_key: &str,
        def: Arc<ParticleTypeDef>,
        position: Vec3,
        velocity: Vec3,
        energy: f32,
        delay_ms: f32,
        max_age: f32,
        trail_capacity: usize,
        handle: RenderHandle,
    ) -> Self {
        let delay_ms = delay_ms.max(0.0);
        Self {
            id,
            type_key: type_key.to_owned(),
            def,
            position,
            velocity,
            energy,
            age: 0.0,
            delay_ms,
            max_age,
            alive: true,
            visible: delay_ms == 0.0,
            trail: TrailBuffer::new(trail_capacity),
            fade: None,
            _handle: handle,
        }
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    pub fn def(&self) -> &Arc<ParticleTypeDef> {
        &self.def
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn delay_ms(&self) -> f32 {
        self.delay_ms
    }

    pub fn max_age(&self) -> f32 {
        self.max_age
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_beam(&self) -> bool {
        self.def.trail.is_beam()
    }

    pub fn is_dormant(&self) -> bool {
        self.alive && self.delay_ms > 0.0
    }

    pub fn is_active(&self) -> bool {
        self.alive && self.delay_ms <= 0.0
    }

    pub fn phase(&self) -> Phase {
        if !self.alive {
            Phase::Fading
        } else if self.delay_ms > 0.0 {
            Phase::Dormant
        } else {
            Phase::Active
        }
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn transverse_radius(&self) -> f32 {
        transverse_radius(self.position)
    }

    /// Fade multiplier: 1 while alive, ramping to 0 after death
    pub fn fade_opacity(&self) -> f32 {
        self.fade.map_or(1.0, |fade| fade.opacity())
    }

    pub fn head_opacity(&self) -> f32 {
        let base = if self.is_beam() {
            1.0
        } else {
            PRODUCT_HEAD_OPACITY
        };
        base * self.fade_opacity()
    }

    pub fn trail_vertices(&self) -> Vec<TrailVertex> {
        self.trail.vertices(self.def.rgb())
    }

    /// Dead and either fully faded or dropped without a fade; its resources
    /// can be released.
    pub fn is_spent(&self) -> bool {
        !self.alive && self.fade.map_or(true, |fade| fade.is_finished())
    }

    /// Advance by `dt` seconds of simulation time.
    pub fn advance(&mut self, dt: f32, params: &SimParams) -> Step {
        if !self.alive {
            return Step::Idle;
        }

        if self.delay_ms > 0.0 {
            self.delay_ms -= dt * 1000.0;
            if self.delay_ms <= 0.0 {
                self.delay_ms = 0.0;
                self.visible = true;
                return Step::Activated;
            }
            return Step::Idle;
        }

        self.age += dt;
        self.visible = true;

        let kinematics = &params.kinematics;
        self.velocity += kinematics.deflection(&self.def, self.velocity, dt);
        self.position += self.velocity * dt;

        let r = transverse_radius(self.position);
        if let Some(retention) = kinematics.retention(&self.def, r) {
            self.velocity *= retention;
            self.energy *= retention;
        }

        if !self.position.is_finite() || !self.velocity.is_finite() {
            self.alive = false;
            return Step::Expired(ExpiryReason::Malformed);
        }

        self.trail.push(self.position);

        let reason = if self.age > self.max_age {
            Some(ExpiryReason::Age)
        } else if r > params.radial_limit {
            Some(ExpiryReason::Radial)
        } else if self.position.z.abs() > params.longitudinal_limit {
            Some(ExpiryReason::Longitudinal)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                self.alive = false;
                self.fade = Some(FadeTask::new(params.fade_ms));
                Step::Expired(reason)
            }
            None => Step::Moved,
        }
    }

    /// Advance the fade of a dead entity by wall-clock milliseconds.
    pub fn advance_fade(&mut self, wall_ms: f32) {
        if let Some(fade) = self.fade.as_mut() {
            fade.advance(wall_ms);
        }
    }
}
