//! Deferred expiry for ephemeral overlay shapes.

use crate::shapes::ShapeId;
use std::time::{Duration, Instant};

/// How long an ephemeral shape stays on the canvas after commit.
pub const OVERLAY_TTL: Duration = Duration::from_millis(1000);

/// Tracks removal deadlines for ephemeral shapes, keyed by shape id.
///
/// There is no background timer: the host pumps
/// [`CanvasManager::expire_overlays`](crate::CanvasManager::expire_overlays)
/// from its frame loop, which drains the due ids from here. Ids whose shape
/// has already disappeared (undo, clear, erase) are dropped harmlessly.
#[derive(Debug, Default)]
pub struct OverlayScheduler {
    pending: Vec<(ShapeId, Instant)>,
}

impl OverlayScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `id` for removal [`OVERLAY_TTL`] after `now`.
    pub fn schedule(&mut self, id: ShapeId, now: Instant) {
        self.pending.push((id, now + OVERLAY_TTL));
    }

    /// Remove and return the ids whose deadline has passed.
    pub fn drain_due(&mut self, now: Instant) -> Vec<ShapeId> {
        let mut due = Vec::new();
        self.pending.retain(|&(id, deadline)| {
            if deadline <= now {
                due.push(id);
                false
            } else {
                true
            }
        });
        due
    }

    /// Drop every pending deadline.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Number of shapes still awaiting expiry.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
