//! Fade-out of dead entities

/// Time-based opacity ramp from 1 to 0.
///
/// Advanced by the session clock, never by a detached loop, so dropping the
/// owning entity cancels it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeTask {
    elapsed_ms: f32,
    duration_ms: f32,
}

impl FadeTask {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            elapsed_ms: 0.0,
            duration_ms: duration_ms.max(0.0),
        }
    }

    pub fn advance(&mut self, wall_ms: f32) {
        self.elapsed_ms = (self.elapsed_ms + wall_ms.max(0.0)).min(self.duration_ms);
    }

    /// 0 at death, 1 when fully faded
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).min(1.0)
        }
    }

    pub fn opacity(&self) -> f32 {
        1.0 - self.progress()
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}
