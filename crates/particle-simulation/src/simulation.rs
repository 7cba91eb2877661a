//! Simulation session: entity store, clock and event fan-out
//!
//! NOTE: A session is single-threaded. All mutation of the store happens inside
//! `spawn`, `tick` and `clear`, and the crossed-layer records are always reset
//! together with the store.

use crate::detector::{check_crossings, CrossedLayers};
use crate::events::{EventBus, EventSink, ParticleCreated, SimEvent, SinkId};
use crate::frame::FrameParticle;
use crate::params::SimParams;
use crate::particle::{ExpiryReason, Particle, ParticleId, Step};
use crate::resources::ResourceTracker;
use glam::Vec3;
use particle_physics::{max_age, ParticleCatalog, Sampler};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

pub struct ParticleSimulation {
    catalog: ParticleCatalog,
    pub(crate) params: SimParams,
    pub(crate) sampler: Box<dyn Sampler>,

    particles: Vec<Particle>,
    crossed: CrossedLayers,
    events: EventBus,
    resources: ResourceTracker,

    /// Simulation seconds since the last clear
    time: f32,
    speed: f32,
    paused: bool,
    next_id: u64,
}

impl ParticleSimulation {
    /// Session drawing randomness from the operating system
    pub fn new(catalog: ParticleCatalog) -> Self {
        Self::with_sampler(catalog, Box::new(StdRng::from_os_rng()))
    }

    /// Reproducible session
    pub fn with_seed(catalog: ParticleCatalog, seed: u64) -> Self {
        Self::with_sampler(catalog, Box::new(StdRng::seed_from_u64(seed)))
    }

    pub fn with_sampler(catalog: ParticleCatalog, sampler: Box<dyn Sampler>) -> Self {
        log::debug!("Simulation session created ({} particle types)", catalog.len());
        Self {
            catalog,
            params: SimParams::default(),
            sampler,
            particles: Vec::new(),
            crossed: CrossedLayers::new(),
            events: EventBus::new(),
            resources: ResourceTracker::new(),
            time: 0.0,
            speed: 1.0,
            paused: false,
            next_id: 1,
        }
    }

    pub fn with_params(mut self, params: SimParams) -> Self {
        self.params = params;
        self
    }

    pub fn catalog(&self) -> &ParticleCatalog {
        &self.catalog
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Negative values are treated as 0
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Simulation seconds since the last clear
    pub fn elapsed(&self) -> f32 {
        self.time
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.time * 1000.0
    }

    /// Wall milliseconds until a simulation-time offset is reached at the
    /// current speed; `None` while the clock is frozen.
    pub fn wall_ms(&self, sim_ms: f32) -> Option<f32> {
        (self.speed > 0.0).then(|| sim_ms / self.speed)
    }

    /// Clamp a raw frame delta (seconds) to what one tick may integrate.
    pub fn clamp_frame_delta(&self, wall_dt: f32) -> f32 {
        wall_dt.clamp(0.0, self.params.max_tick_seconds)
    }

    /// Every entity still holding render resources (dormant, active or fading)
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id() == id)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_alive()).count()
    }

    pub fn crossed_layers(&self) -> &CrossedLayers {
        &self.crossed
    }

    pub fn resources(&self) -> &ResourceTracker {
        &self.resources
    }

    pub fn subscribe(&mut self, sink: impl EventSink + 'static) -> SinkId {
        self.events.subscribe(Box::new(sink))
    }

    pub fn unsubscribe(&mut self, id: SinkId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Create a particle of `type_key` at `origin` heading along `direction`.
    ///
    /// Unknown types are skipped and return `None`. A degenerate direction
    /// falls back to the beam axis.
    pub fn spawn(
        &mut self,
        type_key: &str,
        origin: Vec3,
        direction: Vec3,
        energy: f32,
        delay_ms: f32,
    ) -> Option<ParticleId> {
        let Some(def) = self.catalog.get(type_key).map(Arc::clone) else {
            log::debug!("Skipping spawn of unknown particle type '{}'", type_key);
            return None;
        };

        let direction = direction.try_normalize().unwrap_or(Vec3::Z);
        let speed = self
            .params
            .kinematics
            .initial_speed(energy, def.mass, &mut *self.sampler);
        let max_age = max_age(&def, &mut *self.sampler);

        let id = ParticleId(self.next_id);
        self.next_id += 1;

        let particle = Particle::new(
            id,
            type_key,
            Arc::clone(&def),
            origin,
            direction * speed,
            energy,
            delay_ms,
            max_age,
            self.params.trail_capacity,
            self.resources.allocate(id),
        );
        log::debug!(
            "Spawned {} {} ({:.1} GeV, speed {:.2}, max age {:.2}s, delay {:.0}ms)",
            type_key,
            id,
            energy,
            speed,
            max_age,
            particle.delay_ms()
        );
        self.particles.push(particle);

        self.events.emit(&SimEvent::ParticleCreated(ParticleCreated {
            id,
            type_key: type_key.to_owned(),
            def,
            position: origin,
            energy,
            delay_ms: delay_ms.max(0.0),
        }));

        Some(id)
    }

    /// Advance the session by `wall_dt` wall-clock seconds.
    ///
    /// Entities advance by `wall_dt * speed`; fades advance by unscaled wall
    /// time. Callers should clamp frame deltas with [`Self::clamp_frame_delta`].
    pub fn tick(&mut self, wall_dt: f32) {
        if self.paused {
            return;
        }

        let wall_dt = wall_dt.max(0.0);
        let dt = wall_dt * self.speed;
        self.time += dt;

        let mut events = Vec::new();
        for particle in &mut self.particles {
            if !particle.is_alive() {
                particle.advance_fade(wall_dt * 1000.0);
                continue;
            }

            match particle.advance(dt, &self.params) {
                Step::Idle | Step::Moved => {}
                Step::Activated => {
                    log::debug!("{} {} activated", particle.type_key(), particle.id());
                    events.push(SimEvent::ParticleActivated { id: particle.id() });
                }
                Step::Expired(reason) => {
                    if reason == ExpiryReason::Malformed {
                        log::warn!(
                            "Dropping {} {}: non-finite position or velocity",
                            particle.type_key(),
                            particle.id()
                        );
                    } else {
                        log::debug!("{} {} expired: {}", particle.type_key(), particle.id(), reason);
                    }
                    events.push(SimEvent::ParticleExpired {
                        id: particle.id(),
                        reason,
                    });
                }
            }
        }

        let crossed = &mut self.crossed;
        self.particles.retain(|particle| {
            let release = particle.is_spent();
            if release {
                crossed.forget(particle.id());
                events.push(SimEvent::ResourcesReleased { id: particle.id() });
            }
            !release
        });

        let hits = check_crossings(
            &self.particles,
            &self.params.layers,
            self.params.crossing_tolerance,
            &mut self.crossed,
        );
        for hit in hits {
            log::debug!("{} {} hit {}", hit.def.symbol, hit.id, hit.layer.abbr);
            events.push(SimEvent::LayerHit(hit));
        }

        log::trace!(
            "tick dt={:.4}s t={:.3}s entities={} alive={}",
            dt,
            self.time,
            self.particles.len(),
            self.alive_count()
        );

        for event in &events {
            self.events.emit(event);
        }
    }

    /// Release every entity regardless of phase and reset the clock.
    pub fn clear(&mut self) {
        let released: Vec<ParticleId> = self.particles.drain(..).map(|p| p.id()).collect();
        self.crossed.clear();
        self.time = 0.0;

        if !released.is_empty() {
            log::info!("Cleared {} particles", released.len());
        }
        for id in released {
            self.events.emit(&SimEvent::ResourcesReleased { id });
        }
        self.events.emit(&SimEvent::Cleared);
    }

    /// Render snapshot of every entity still holding resources
    pub fn frame(&self) -> Vec<FrameParticle> {
        self.particles.iter().map(FrameParticle::from_particle).collect()
    }
}
