//! Slide-to-page handshake between the gesture layer and the engine.
//!
//! The gesture layer reports which carousel slot came to rest; the engine
//! turns that into a direction and applies it once the slide has settled.
//! A newer request arriving before the settle delay replaces the pending
//! one, so only the latest direction is ever applied.

use std::time::{Duration, Instant};

/// Delay between a slide coming to rest and the page move being applied.
pub const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Direction implied by moving from `current_slot` to `visible_slot` on a
/// three-slot looping carousel: +1 forward, -1 backward, 0 for no move.
pub fn slide_direction(current_slot: usize, visible_slot: usize) -> i32 {
    match (visible_slot % 3 + 3 - current_slot % 3) % 3 {
        1 => 1,
        2 => -1,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingMove {
    direction: i32,
    requested_at: Instant,
}

#[derive(Debug, Clone)]
pub struct PagingController {
    pending: Option<PendingMove>,
    settle_delay: Duration,
}

impl Default for PagingController {
    fn default() -> Self {
        Self::new(SETTLE_DELAY)
    }
}

impl PagingController {
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            pending: None,
            settle_delay,
        }
    }

    /// Queue a move, superseding any move still waiting to settle.
    pub fn request(&mut self, direction: i32, now: Instant) {
        if direction == 0 {
            self.pending = None;
            return;
        }
        if let Some(previous) = self.pending {
            log::debug!(
                "paging request {:+} supersedes pending {:+}",
                direction,
                previous.direction
            );
        }
        self.pending = Some(PendingMove {
            direction: direction.signum(),
            requested_at: now,
        });
    }

    /// Take the pending direction once it has settled.
    pub fn poll(&mut self, now: Instant) -> Option<i32> {
        let pending = self.pending?;
        if now.saturating_duration_since(pending.requested_at) < self.settle_delay {
            return None;
        }
        self.pending = None;
        Some(pending.direction)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
