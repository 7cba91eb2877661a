//! Trail history and its fading polyline

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::collections::VecDeque;

/// Vertex of a trail polyline, laid out for direct GPU upload
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TrailVertex {
    pub position: [f32; 3],
    /// RGBA, alpha carries the head-to-tail gradient
    pub color: [f32; 4],
}

/// Alpha of trail point `index` out of `len` points.
///
/// Quadratic ease from 0.1 at the oldest point to 1.0 at the newest.
pub fn trail_alpha(index: usize, len: usize) -> f32 {
    if len < 2 {
        return 1.0;
    }
    let t = index as f32 / (len - 1) as f32;
    t * t * 0.9 + 0.1
}

/// Bounded position history; the oldest point is evicted first
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    points: VecDeque<Vec3>,
    capacity: usize,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: Vec3) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest
    pub fn points(&self) -> impl ExactSizeIterator<Item = Vec3> + '_ {
        self.points.iter().copied()
    }

    pub fn newest(&self) -> Option<Vec3> {
        self.points.back().copied()
    }

    pub fn oldest(&self) -> Option<Vec3> {
        self.points.front().copied()
    }

    /// A polyline needs at least two points
    pub fn is_renderable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Polyline vertices colored with `rgb`; empty when not renderable.
    pub fn vertices(&self, rgb: [f32; 3]) -> Vec<TrailVertex> {
        if !self.is_renderable() {
            return Vec::new();
        }
        let len = self.points.len();
        self.points
            .iter()
            .enumerate()
            .map(|(i, point)| TrailVertex {
                position: point.to_array(),
                color: [rgb[0], rgb[1], rgb[2], trail_alpha(i, len)],
            })
            .collect()
    }
}
