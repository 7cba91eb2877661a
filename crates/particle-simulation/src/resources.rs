//! Render resource accounting
//!
//! Each entity owns one [`RenderHandle`] standing for its trail buffer, head
//! mesh and label. Dropping the handle releases them, so release happens
//! exactly once no matter which path (fade completion or `clear`) removes the
//! entity.

use crate::particle::ParticleId;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Counters {
    allocated: Cell<u64>,
    released: Cell<u64>,
}

/// Hands out render handles and counts what is still outstanding
#[derive(Debug, Clone, Default)]
pub struct ResourceTracker {
    counters: Rc<Counters>,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&self, owner: ParticleId) -> RenderHandle {
        let counters = &self.counters;
        counters.allocated.set(counters.allocated.get() + 1);
        RenderHandle {
            owner,
            counters: Rc::clone(&self.counters),
        }
    }

    /// Handles allocated and not yet released
    pub fn outstanding(&self) -> u64 {
        self.counters.allocated.get() - self.counters.released.get()
    }

    pub fn allocated(&self) -> u64 {
        self.counters.allocated.get()
    }

    pub fn released(&self) -> u64 {
        self.counters.released.get()
    }
}

#[derive(Debug)]
pub struct RenderHandle {
    owner: ParticleId,
    counters: Rc<Counters>,
}

impl RenderHandle {
    pub fn owner(&self) -> ParticleId {
        self.owner
    }
}

impl Drop for RenderHandle {
    fn drop(&mut self) {
        self.counters.released.set(self.counters.released.get() + 1);
        log::trace!("released render resources of {}", self.owner);
    }
}
