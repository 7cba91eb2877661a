//! Detector layers and first-crossing detection

use crate::events::LayerHit;
use crate::particle::{Particle, ParticleId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Concentric cylinder around the beam axis
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorLayer {
    pub name: String,
    pub abbr: String,
    /// Name used in hit log lines
    pub label: String,
    pub radius: f32,
    /// Half of the cylinder length along z
    pub half_length: f32,
    /// 0xRRGGBB
    pub color: u32,
}

impl DetectorLayer {
    pub fn new(name: &str, abbr: &str, radius: f32, length: f32, color: u32) -> Self {
        Self {
            name: name.to_owned(),
            abbr: abbr.to_owned(),
            label: name.to_owned(),
            radius,
            half_length: length / 2.0,
            color,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    /// ATLAS/CMS-style barrel, innermost first
    pub fn standard() -> Vec<Self> {
        vec![
            Self::new("Inner Tracker", "TRACKER", 2.0, 12.0, 0x00ffff),
            Self::new("Electromagnetic Calorimeter", "ECAL", 5.0, 16.0, 0x00ff88).with_label("ECAL"),
            Self::new("Hadronic Calorimeter", "HCAL", 8.0, 18.0, 0xff8800).with_label("HCAL"),
            Self::new("Muon Spectrometer", "MUON", 12.0, 22.0, 0xff00ff),
        ]
    }

    /// Whether transverse radius `r` lies in this layer's hit band
    pub fn contains_radius(&self, r: f32, tolerance: f32) -> bool {
        r >= self.radius - tolerance && r <= self.radius + tolerance
    }
}

/// Layers each particle has already been reported in
#[derive(Debug, Clone, Default)]
pub struct CrossedLayers {
    crossed: HashMap<ParticleId, HashSet<usize>>,
}

impl CrossedLayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_crossed(&self, id: ParticleId, layer_index: usize) -> bool {
        self.crossed
            .get(&id)
            .is_some_and(|layers| layers.contains(&layer_index))
    }

    /// Records a crossing; false if it was already recorded
    pub fn record(&mut self, id: ParticleId, layer_index: usize) -> bool {
        self.crossed.entry(id).or_default().insert(layer_index)
    }

    pub fn layers_of(&self, id: ParticleId) -> usize {
        self.crossed.get(&id).map_or(0, HashSet::len)
    }

    /// Drop the record of a particle that no longer exists
    pub fn forget(&mut self, id: ParticleId) {
        self.crossed.remove(&id);
    }

    pub fn clear(&mut self) {
        self.crossed.clear();
    }

    /// Number of particles with at least one record
    pub fn len(&self) -> usize {
        self.crossed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crossed.is_empty()
    }
}

/// First crossings of active, non-beam particles through `layers`.
///
/// A (particle, layer) pair is reported at most once, even if curvature brings
/// the particle back into the band later.
pub fn check_crossings<'a>(
    particles: impl IntoIterator<Item = &'a Particle>,
    layers: &[DetectorLayer],
    tolerance: f32,
    crossed: &mut CrossedLayers,
) -> Vec<LayerHit> {
    let mut hits = Vec::new();

    for particle in particles {
        if !particle.is_active() || particle.is_beam() {
            continue;
        }

        let r = particle.transverse_radius();
        for (layer_index, layer) in layers.iter().enumerate() {
            if crossed.has_crossed(particle.id(), layer_index) || !layer.contains_radius(r, tolerance) {
                continue;
            }
            crossed.record(particle.id(), layer_index);
            hits.push(LayerHit {
                id: particle.id(),
                def: Arc::clone(particle.def()),
                layer_index,
                layer: layer.clone(),
                position: particle.position(),
            });
        }
    }

    hits
}
