//! Random sampling boundary
//!
//! Every randomized quantity in the model (base speed, lifetime budget, decay
//! directions, energies, jitter) is drawn through [`Sampler`], so a session can
//! run on a seeded generator or on a scripted sequence.

use rand::Rng;

pub trait Sampler {
    /// Uniform sample in `[0, 1)`
    fn unit(&mut self) -> f32;

    /// Uniform sample in `[lo, hi)`
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit()
    }
}

impl<R: Rng + ?Sized> Sampler for R {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Replays a fixed cycle of unit samples
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedSampler {
    /// Values are clamped into `[0, 1)`; an empty script always yields 0.5.
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f32::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Always yields the same value
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of samples drawn so far
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl Sampler for ScriptedSampler {
    fn unit(&mut self) -> f32 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.5;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
