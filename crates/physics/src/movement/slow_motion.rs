//! Slow-motion charge resource.
//!
//! The charge sits between 0 and 1. A full charge can be spent to start slow
//! motion for a fixed duration; afterwards it refills linearly. While slow
//! motion runs the charge does not refill.

use serde::{Deserialize, Serialize};

/// Something that happened to the slow-motion resource this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlowMotionEvent {
    /// Slow motion ran out.
    Ended,
}

/// Slow-motion state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlowMotion {
    /// Stored charge, 0.0 to 1.0.
    charge: f32,

    /// Time spent recharging since the charge was last spent.
    recharge_elapsed: f32,

    /// Time remaining while active. Zero when inactive.
    remaining: f32,
}

impl Default for SlowMotion {
    fn default() -> Self {
        Self {
            charge: 1.0,
            recharge_elapsed: 0.0,
            remaining: 0.0,
        }
    }
}

impl SlowMotion {
    /// Create a fully charged resource.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance timers.
    ///
    /// # Arguments
    ///
    /// * `delta_time` - Seconds since last tick
    /// * `recharge_time` - Seconds to refill from empty
    pub fn tick(&mut self, delta_time: f32, recharge_time: f32) -> Option<SlowMotionEvent> {
        if self.remaining > 0.0 {
            self.remaining -= delta_time;
            if self.remaining <= 0.0 {
                self.remaining = 0.0;
                return Some(SlowMotionEvent::Ended);
            }
            return None;
        }

        if self.charge < 1.0 {
            self.recharge_elapsed += delta_time;
            self.charge = if recharge_time > 0.0 {
                (self.recharge_elapsed / recharge_time).min(1.0)
            } else {
                1.0
            };
        }

        None
    }

    /// Spend a full charge to start slow motion.
    ///
    /// Returns `true` if slow motion started. Does nothing unless the charge
    /// is full and slow motion is not already running.
    pub fn try_trigger(&mut self, duration: f32) -> bool {
        if self.is_active() || !self.is_full() {
            return false;
        }
        self.charge = 0.0;
        self.recharge_elapsed = 0.0;
        self.remaining = duration;
        true
    }

    /// Whether slow motion is currently running.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Whether the charge is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.charge >= 1.0
    }

    /// Current charge, 0.0 to 1.0.
    #[inline]
    pub fn charge(&self) -> f32 {
        self.charge
    }

    /// Seconds of slow motion left.
    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: f32 = 3.0;
    const RECHARGE: f32 = 7.0;
    const FRAME: f32 = 0.1;

    #[test]
    fn test_starts_full() {
        let slow = SlowMotion::new();
        assert!(slow.is_full());
        assert!(!slow.is_active());
    }

    #[test]
    fn test_trigger_consumes_charge() {
        let mut slow = SlowMotion::new();
        assert!(slow.try_trigger(DURATION));
        assert!(slow.is_active());
        assert_eq!(slow.charge(), 0.0);

        // Cannot trigger again while active or empty
        assert!(!slow.try_trigger(DURATION));
    }

    #[test]
    fn test_expires_then_recharges() {
        let mut slow = SlowMotion::new();
        slow.try_trigger(DURATION);

        let mut ended = false;
        for _ in 0..40 {
            if slow.tick(FRAME, RECHARGE) == Some(SlowMotionEvent::Ended) {
                ended = true;
                break;
            }
        }
        assert!(ended);
        assert!(!slow.is_active());
        assert_eq!(slow.charge(), 0.0);

        // Half the recharge time gives half a charge
        for _ in 0..35 {
            slow.tick(FRAME, RECHARGE);
        }
        assert!((slow.charge() - 0.5).abs() < 0.02);

        for _ in 0..40 {
            slow.tick(FRAME, RECHARGE);
        }
        assert!(slow.is_full());
        assert!(slow.try_trigger(DURATION));
    }

    #[test]
    fn test_no_recharge_while_active() {
        let mut slow = SlowMotion::new();
        slow.try_trigger(DURATION);
        slow.tick(1.0, RECHARGE);
        assert_eq!(slow.charge(), 0.0);
    }
}
