//! Time-stamped event log for a headless run

use particle_physics::ParticleTypeDef;
use particle_simulation::{EventSink, SimEvent};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    System,
    Beam,
    Countdown,
    Collision,
    Energy,
    Decay,
    Particle,
    Detect,
}

impl EntryKind {
    fn tag(self) -> &'static str {
        match self {
            EntryKind::System => "system",
            EntryKind::Beam => "beam",
            EntryKind::Countdown => "countdown",
            EntryKind::Collision => "collision",
            EntryKind::Energy => "energy",
            EntryKind::Decay => "decay",
            EntryKind::Particle => "particle",
            EntryKind::Detect => "detect",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Wall milliseconds since the log was last reset
    pub at_ms: f32,
    pub kind: EntryKind,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T+{:.2}s [{}] {}", self.at_ms / 1000.0, self.kind.tag(), self.message)
    }
}

/// Created non-beam particles per type, in order of first appearance
#[derive(Debug, Clone, Default)]
pub struct ParticleTally {
    counts: Vec<(String, Arc<ParticleTypeDef>, usize)>,
}

impl ParticleTally {
    pub fn add(&mut self, type_key: &str, def: &Arc<ParticleTypeDef>) {
        match self.counts.iter_mut().find(|(key, _, _)| key == type_key) {
            Some((_, _, count)) => *count += 1,
            None => self.counts.push((type_key.to_owned(), Arc::clone(def), 1)),
        }
    }

    #[cfg(test)]
    pub fn count(&self, type_key: &str) -> usize {
        self.counts
            .iter()
            .find(|(key, _, _)| key == type_key)
            .map_or(0, |(_, _, count)| *count)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, _, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParticleTypeDef, usize)> {
        self.counts
            .iter()
            .map(|(key, def, count)| (key.as_str(), def.as_ref(), *count))
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Collects narration lines and simulation events, stamped with the run clock
#[derive(Debug, Default)]
pub struct EventLog {
    clock_ms: f32,
    entries: Vec<LogEntry>,
    tally: ParticleTally,
    hits: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall time used to stamp the next entries
    pub fn set_clock(&mut self, wall_ms: f32) {
        self.clock_ms = wall_ms;
    }

    pub fn record(&mut self, kind: EntryKind, message: impl Into<String>) {
        let entry = LogEntry {
            at_ms: self.clock_ms,
            kind,
            message: message.into(),
        };
        log::info!("{}", entry);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn tally(&self) -> &ParticleTally {
        &self.tally
    }

    pub fn hits(&self) -> usize {
        self.hits
    }
}

impl EventSink for EventLog {
    fn on_event(&mut self, event: &SimEvent) {
        match event {
            SimEvent::ParticleCreated(created) => {
                if created.def.trail.is_beam() {
                    return;
                }
                self.tally.add(&created.type_key, &created.def);
                self.record(
                    EntryKind::Particle,
                    format!(
                        "{} {} produced ({:.0} GeV)",
                        created.def.symbol, created.def.name, created.energy
                    ),
                );
            }
            SimEvent::LayerHit(hit) => {
                self.hits += 1;
                self.record(
                    EntryKind::Detect,
                    format!("{} detected in {}", hit.def.symbol, hit.layer.label),
                );
            }
            SimEvent::Cleared => {
                self.tally.clear();
                self.hits = 0;
            }
            other => log::trace!("{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use particle_physics::ParticleCatalog;
    use particle_simulation::{ParticleSimulation, SharedSink};

    #[test]
    fn tallies_products_but_not_beams() {
        let log = SharedSink::new(EventLog::new());
        let mut sim = ParticleSimulation::with_seed(ParticleCatalog::standard(), 4);
        sim.subscribe(log.clone());

        sim.spawn("proton", Vec3::new(0.0, 0.0, -25.0), Vec3::Z, 6800.0, 0.0);
        sim.spawn("photon", Vec3::ZERO, Vec3::X, 42.4, 1300.0);
        sim.spawn("muon_m", Vec3::ZERO, Vec3::Y, 30.0, 1300.0);
        sim.spawn("photon", Vec3::ZERO, Vec3::NEG_X, 55.0, 1300.0);

        let log = log.borrow();
        assert_eq!(log.tally().total(), 3);
        assert_eq!(log.tally().count("photon"), 2);
        assert_eq!(log.tally().count("proton"), 0);
        let order: Vec<&str> = log.tally().iter().map(|(key, _, _)| key).collect();
        assert_eq!(order, ["photon", "muon_m"]);
        assert_eq!(log.entries()[0].message, "γ Photon produced (42 GeV)");
    }

    #[test]
    fn stamps_entries_with_the_run_clock() {
        let mut log = EventLog::new();
        log.set_clock(1534.0);
        log.record(EntryKind::Collision, "COLLISION!");
        assert_eq!(log.entries()[0].to_string(), "T+1.53s [collision] COLLISION!");
        assert_eq!(log.entries()[0].at_ms, 1534.0);
    }

    #[test]
    fn layer_hits_name_the_layer() {
        let log = SharedSink::new(EventLog::new());
        let mut sim = ParticleSimulation::with_seed(ParticleCatalog::standard(), 4);
        sim.subscribe(log.clone());
        sim.spawn("photon", Vec3::ZERO, Vec3::X, 30.0, 0.0);
        for _ in 0..20 {
            sim.tick(0.01);
        }

        {
            let log = log.borrow();
            assert_eq!(log.hits(), 1);
            let last = log.entries().last().unwrap();
            assert_eq!(last.kind, EntryKind::Detect);
            assert_eq!(last.message, "γ detected in Inner Tracker");
        }

        // 12..18 units/s, so the photon is past r = 5.3 by now
        for _ in 0..40 {
            sim.tick(0.01);
        }
        let log = log.borrow();
        let detections: Vec<&str> = log
            .entries()
            .iter()
            .filter(|e| e.kind == EntryKind::Detect)
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(detections[1], "γ detected in ECAL");
        assert!(detections.iter().all(|m| !m.contains("Calorimeter")));
    }
}
