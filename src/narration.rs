//! Scripted commentary: the countdown before a collision and the event after it

use crate::event_log::{EntryKind, EventLog};
use particle_physics::{ExperimentPreset, ParticleCatalog};

/// Spacing of the injection and countdown lines before the collision
const PRE_ROLL_STEP_MS: f32 = 400.0;
const PRIMARY_DECAY_MS: f32 = 200.0;
const CASCADE_DEFAULT_MS: f32 = 200.0;
const CASCADE_LAG_MS: f32 = 300.0;
const SUMMARY_MS: f32 = 800.0;
const COMPLETE_MS: f32 = 5000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// Milliseconds on the clock this timeline is narrated against
    pub at_ms: f32,
    pub kind: EntryKind,
    pub message: String,
}

/// Ordered narration cues, released as the simulation clock passes them
#[derive(Debug, Clone)]
pub struct Timeline {
    cues: Vec<Cue>,
    next: usize,
}

impl Timeline {
    /// Beam injection and countdown, ending with "COLLIDE!".
    ///
    /// Times count from the start of the pre-roll; the simulation is launched
    /// once every cue has been released.
    pub fn pre_roll(preset: &ExperimentPreset, beam_symbol: &str, beam_energy_gev: f32) -> Self {
        let injected = |beam: u32| {
            format!(
                "Beam {} ({}) injected → accelerating to {:.1} TeV",
                beam,
                beam_symbol,
                beam_energy_gev / 1000.0
            )
        };
        let mut cues = vec![
            Cue {
                at_ms: 0.0,
                kind: EntryKind::System,
                message: format!("Experiment: {}", preset.name),
            },
            Cue {
                at_ms: 0.0,
                kind: EntryKind::System,
                message: format!("Beam energy: {} per beam", preset.energy),
            },
            Cue {
                at_ms: 0.0,
                kind: EntryKind::Beam,
                message: "Initializing beam injection sequence...".to_owned(),
            },
        ];

        let steps = [
            (EntryKind::Beam, injected(1)),
            (EntryKind::Beam, injected(2)),
            (EntryKind::System, "Beams stable. Focusing magnets aligned.".to_owned()),
            (EntryKind::Countdown, "3".to_owned()),
            (EntryKind::Countdown, "2".to_owned()),
            (EntryKind::Countdown, "1".to_owned()),
            (EntryKind::Countdown, "COLLIDE!".to_owned()),
        ];
        for (i, (kind, message)) in steps.into_iter().enumerate() {
            cues.push(Cue {
                at_ms: PRE_ROLL_STEP_MS * (i + 1) as f32,
                kind,
                message,
            });
        }
        Self { cues, next: 0 }
    }

    /// Commentary for `preset`, anchored at the collision instant.
    pub fn for_preset(preset: &ExperimentPreset, catalog: &ParticleCatalog, collision_ms: f32) -> Self {
        let symbol = |key: &str| catalog.get(key).map_or_else(|| key.to_owned(), |def| def.symbol.clone());
        let products = |keys: &[String]| keys.iter().map(|key| symbol(key.as_str())).collect::<Vec<_>>().join(" + ");

        let mut cues = Vec::new();
        let mut cue = |offset_ms: f32, kind: EntryKind, message: String| {
            cues.push(Cue {
                at_ms: collision_ms + offset_ms,
                kind,
                message,
            });
        };

        cue(
            0.0,
            EntryKind::Collision,
            format!("COLLISION! Center-of-mass energy: {}", preset.energy),
        );
        cue(
            0.0,
            EntryKind::Energy,
            "Energy released: converting mass to particles via E=mc²".to_owned(),
        );

        if let Some(primary) = preset.decay_chain.first() {
            let parent = primary.parent.as_deref().map_or_else(|| "pp".to_owned(), symbol);
            cue(
                PRIMARY_DECAY_MS,
                EntryKind::Decay,
                format!("Primary: {} → {}", parent, products(primary.products.as_slice())),
            );
        }

        for step in preset.decay_chain.iter().skip(1) {
            let parent = step.parent.as_deref().map_or_else(|| "?".to_owned(), symbol);
            let delay = if step.delay_ms > 0.0 {
                step.delay_ms
            } else {
                CASCADE_DEFAULT_MS
            };
            cue(
                delay + CASCADE_LAG_MS,
                EntryKind::Decay,
                format!("Cascade: {} → {}", parent, products(step.products.as_slice())),
            );
        }

        cue(
            SUMMARY_MS,
            EntryKind::Energy,
            format!("Total particles produced: {}", preset.total_produced()),
        );
        cue(SUMMARY_MS, EntryKind::System, "Collecting detector data...".to_owned());
        cue(
            COMPLETE_MS,
            EntryKind::System,
            "Event complete. Ready for next collision.".to_owned(),
        );

        // Stable: ties keep their insertion order
        cues.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
        Self { cues, next: 0 }
    }

    /// Cues whose time has come at `now_ms`, each returned once
    pub fn due(&mut self, now_ms: f32) -> &[Cue] {
        let start = self.next;
        while self.next < self.cues.len() && self.cues[self.next].at_ms <= now_ms {
            self.next += 1;
        }
        &self.cues[start..self.next]
    }

    /// Write due cues into `log`
    pub fn narrate(&mut self, now_ms: f32, log: &mut EventLog) {
        for cue in self.due(now_ms) {
            log.record(cue.kind, cue.message.clone());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.cues.len()
    }

    /// Time of the last cue
    pub fn end_ms(&self) -> f32 {
        self.cues.last().map_or(0.0, |cue| cue.at_ms)
    }

    #[cfg(test)]
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }
}
