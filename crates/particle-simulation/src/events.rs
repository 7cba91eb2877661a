//! Events emitted by the simulation and the sinks that consume them

use crate::detector::DetectorLayer;
use crate::particle::{ExpiryReason, ParticleId};
use glam::Vec3;
use particle_physics::ParticleTypeDef;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ParticleCreated {
    pub id: ParticleId,
    pub type_key: String,
    pub def: Arc<ParticleTypeDef>,
    pub position: Vec3,
    pub energy: f32,
    /// Activation delay in simulation milliseconds
    pub delay_ms: f32,
}

#[derive(Debug, Clone)]
pub struct LayerHit {
    pub id: ParticleId,
    pub def: Arc<ParticleTypeDef>,
    /// Index into the configured layer list
    pub layer_index: usize,
    pub layer: DetectorLayer,
    /// Where the particle was when the crossing registered
    pub position: Vec3,
}

#[derive(Debug, Clone)]
pub enum SimEvent {
    ParticleCreated(ParticleCreated),
    ParticleActivated { id: ParticleId },
    ParticleExpired { id: ParticleId, reason: ExpiryReason },
    /// Render resources of the entity are gone; emitted exactly once per entity
    ResourcesReleased { id: ParticleId },
    LayerHit(LayerHit),
    /// The store was emptied and the clock reset
    Cleared,
}

pub trait EventSink {
    fn on_event(&mut self, event: &SimEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&SimEvent),
{
    fn on_event(&mut self, event: &SimEvent) {
        self(event)
    }
}

/// Sink shared between the simulation and its owner, who keeps reading it
/// after subscribing a clone.
pub struct SharedSink<S>(Rc<RefCell<S>>);

impl<S> SharedSink<S> {
    pub fn new(sink: S) -> Self {
        Self(Rc::new(RefCell::new(sink)))
    }

    pub fn borrow(&self) -> std::cell::Ref<'_, S> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, S> {
        self.0.borrow_mut()
    }
}

impl<S> Clone for SharedSink<S> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<S: EventSink> EventSink for SharedSink<S> {
    fn on_event(&mut self, event: &SimEvent) {
        self.0.borrow_mut().on_event(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkId(u64);

/// Fan-out to every subscribed sink, in subscription order
#[derive(Default)]
pub struct EventBus {
    sinks: Vec<(SinkId, Box<dyn EventSink>)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) -> SinkId {
        let id = SinkId(self.next_id);
        self.next_id += 1;
        self.sinks.push((id, sink));
        id
    }

    /// Returns whether the sink was subscribed
    pub fn unsubscribe(&mut self, id: SinkId) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|(sink_id, _)| *sink_id != id);
        self.sinks.len() != before
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn emit(&mut self, event: &SimEvent) {
        for (_, sink) in &mut self.sinks {
            sink.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fans_out_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let log = Rc::clone(&seen);
        let first = bus.subscribe(Box::new(move |event: &SimEvent| {
            if let SimEvent::ParticleActivated { id } = event {
                log.borrow_mut().push(("first", *id));
            }
        }));
        let log = Rc::clone(&seen);
        bus.subscribe(Box::new(move |event: &SimEvent| {
            if let SimEvent::ParticleActivated { id } = event {
                log.borrow_mut().push(("second", *id));
            }
        }));

        bus.emit(&SimEvent::ParticleActivated { id: ParticleId(3) });
        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        bus.emit(&SimEvent::ParticleActivated { id: ParticleId(4) });

        assert_eq!(
            *seen.borrow(),
            vec![
                ("first", ParticleId(3)),
                ("second", ParticleId(3)),
                ("second", ParticleId(4)),
            ]
        );
    }

    #[derive(Default)]
    struct Counter(usize);

    impl EventSink for Counter {
        fn on_event(&mut self, _event: &SimEvent) {
            self.0 += 1;
        }
    }

    #[test]
    fn shared_sink_stays_readable() {
        let counter = SharedSink::new(Counter::default());
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(counter.clone()));
        bus.emit(&SimEvent::Cleared);
        bus.emit(&SimEvent::Cleared);
        assert_eq!(counter.borrow().0, 2);
    }
}
