//! Player input handling.
//!
//! This module converts raw keyboard and multi-touch events into the
//! canonical [`InputIntent`] read once per simulation tick.
//!
//! Touches are tracked by id so independent fingers can hold independent
//! zones. Held flags are derived from the set of live touches, so lifting one
//! finger never clears a zone another finger is still holding.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use skyrunner_physics::DeviceClass;

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Touches left of this fraction of the width turn left.
    pub left_zone_edge: f32,

    /// Touches right of this fraction of the width turn right.
    pub right_zone_edge: f32,

    /// Center-column touches above this fraction of the height jump.
    pub jump_zone_edge: f32,

    /// Center-column touches above this fraction (and below the jump band) go forward.
    pub forward_zone_edge: f32,

    /// Further jump presses are ignored this long after one is accepted (seconds).
    pub jump_lock: f32,

    /// Player jumps are ignored until this long after the run starts.
    pub jump_grace_delay: Option<f32>,

    /// An unconsumed jump request expires after this long.
    pub jump_request_ttl: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            left_zone_edge: 0.3,
            right_zone_edge: 0.7,
            jump_zone_edge: 0.4,
            forward_zone_edge: 0.8,
            jump_lock: 1.5,
            jump_grace_delay: Some(10.0),
            jump_request_ttl: 0.5,
        }
    }
}

/// Keys the router understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
}

impl Key {
    /// Map a DOM-style key code (`"KeyW"`, `"Space"`, ...) to a key.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" | "ArrowUp" => Some(Self::Forward),
            "KeyS" | "ArrowDown" => Some(Self::Backward),
            "KeyA" | "ArrowLeft" => Some(Self::Left),
            "KeyD" | "ArrowRight" => Some(Self::Right),
            "Space" => Some(Self::Jump),
            _ => None,
        }
    }
}

/// Screen regions for touch control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchZone {
    Left,
    Right,
    Jump,
    Forward,
    Backward,
}

/// Canonical intent snapshot for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,

    /// One-shot; stays set until consumed or expired.
    pub jump_requested: bool,

    pub device: DeviceClass,
}

/// Keyboard hold state.
#[derive(Debug, Clone, Copy, Default)]
struct HeldKeys {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
}

/// Normalizes keyboard and touch events into an [`InputIntent`].
#[derive(Debug, Clone)]
pub struct InputRouter {
    config: InputConfig,
    keys: HeldKeys,
    touches: HashMap<u64, TouchZone>,
    viewport: (f32, f32),
    device: DeviceClass,

    /// Remaining lifetime of the pending jump request.
    jump_pending: Option<f32>,

    /// Countdown until another jump press is accepted.
    jump_lock: f32,

    /// Seconds since the router was created or restarted.
    elapsed: f32,
}

impl InputRouter {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            keys: HeldKeys::default(),
            touches: HashMap::new(),
            viewport: (1.0, 1.0),
            device: DeviceClass::Desktop,
            jump_pending: None,
            jump_lock: 0.0,
            elapsed: 0.0,
        }
    }

    /// Set the screen size used to classify touches.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = (width.max(1.0), height.max(1.0));
    }

    /// Device class driving the turn rate and Run exit rule.
    ///
    /// Starts as Desktop and switches to Mobile on the first touch. It stays
    /// Mobile for the rest of the session, even if later input only comes
    /// from the keyboard.
    pub fn device(&self) -> DeviceClass {
        self.device
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Forward => self.keys.forward = true,
            Key::Backward => self.keys.backward = true,
            Key::Left => self.keys.left = true,
            Key::Right => self.keys.right = true,
            Key::Jump => self.request_jump(),
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Forward => self.keys.forward = false,
            Key::Backward => self.keys.backward = false,
            Key::Left => self.keys.left = false,
            Key::Right => self.keys.right = false,
            Key::Jump => {}
        }
    }

    // ========================================================================
    // Touch
    // ========================================================================

    /// Classify a screen position into a touch zone.
    pub fn zone_at(&self, x: f32, y: f32) -> TouchZone {
        let (width, height) = self.viewport;

        if x < width * self.config.left_zone_edge {
            TouchZone::Left
        } else if x > width * self.config.right_zone_edge {
            TouchZone::Right
        } else if y < height * self.config.jump_zone_edge {
            TouchZone::Jump
        } else if y < height * self.config.forward_zone_edge {
            TouchZone::Forward
        } else {
            TouchZone::Backward
        }
    }

    pub fn touch_start(&mut self, id: u64, x: f32, y: f32) {
        self.device = DeviceClass::Mobile;

        let zone = self.zone_at(x, y);
        self.touches.insert(id, zone);
        if zone == TouchZone::Jump {
            self.request_jump();
        }
    }

    /// Move a tracked touch. Unknown ids are ignored.
    pub fn touch_move(&mut self, id: u64, x: f32, y: f32) {
        let zone = self.zone_at(x, y);
        let Some(current) = self.touches.get_mut(&id) else {
            return;
        };

        if *current != zone {
            *current = zone;
            if zone == TouchZone::Jump {
                self.request_jump();
            }
        }
    }

    /// End a tracked touch. Unknown ids are ignored.
    pub fn touch_end(&mut self, id: u64) {
        self.touches.remove(&id);
    }

    fn zone_held(&self, zone: TouchZone) -> bool {
        self.touches.values().any(|held| *held == zone)
    }

    // ========================================================================
    // Jump latch
    // ========================================================================

    /// A player jump press, subject to the lock and the start-of-run grace delay.
    pub fn request_jump(&mut self) {
        if self.jump_lock > 0.0 {
            return;
        }
        if let Some(delay) = self.config.jump_grace_delay {
            if self.elapsed < delay {
                return;
            }
        }

        self.jump_pending = Some(self.config.jump_request_ttl);
        self.jump_lock = self.config.jump_lock;
    }

    /// Queue a jump regardless of the lock and grace delay.
    pub fn inject_jump(&mut self) {
        self.jump_pending = Some(self.config.jump_request_ttl);
    }

    /// Take the pending jump request. Returns whether there was one.
    pub fn consume_jump(&mut self) -> bool {
        self.jump_pending.take().is_some()
    }

    pub fn jump_locked(&self) -> bool {
        self.jump_lock > 0.0
    }

    // ========================================================================
    // Per tick
    // ========================================================================

    /// Advance latch timers.
    pub fn tick(&mut self, delta_time: f32) {
        self.elapsed += delta_time;
        self.jump_lock = (self.jump_lock - delta_time).max(0.0);

        if let Some(remaining) = self.jump_pending {
            let remaining = remaining - delta_time;
            self.jump_pending = (remaining > 0.0).then_some(remaining);
        }
    }

    /// Current intent snapshot.
    pub fn intent(&self) -> InputIntent {
        InputIntent {
            forward: self.keys.forward || self.zone_held(TouchZone::Forward),
            backward: self.keys.backward || self.zone_held(TouchZone::Backward),
            left: self.keys.left || self.zone_held(TouchZone::Left),
            right: self.keys.right || self.zone_held(TouchZone::Right),
            jump_requested: self.jump_pending.is_some(),
            device: self.device,
        }
    }

    /// Start a new run: drop any pending jump and its lock, and restart the
    /// grace clock. Held keys and touches survive.
    pub fn reset(&mut self) {
        self.jump_pending = None;
        self.jump_lock = 0.0;
        self.elapsed = 0.0;
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> InputRouter {
        let mut router = InputRouter::new(InputConfig {
            jump_grace_delay: None,
            ..Default::default()
        });
        router.set_viewport(1000.0, 1000.0);
        router
    }

    #[test]
    fn test_key_toggles() {
        let mut router = router();
        router.key_down(Key::Forward);
        router.key_down(Key::Left);

        let intent = router.intent();
        assert!(intent.forward);
        assert!(intent.left);
        assert!(!intent.backward);

        router.key_up(Key::Forward);
        assert!(!router.intent().forward);
        assert_eq!(router.intent().device, DeviceClass::Desktop);
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("KeyW"), Some(Key::Forward));
        assert_eq!(Key::from_code("Space"), Some(Key::Jump));
        assert_eq!(Key::from_code("KeyQ"), None);
    }

    #[test]
    fn test_touch_zones() {
        let router = router();
        assert_eq!(router.zone_at(100.0, 500.0), TouchZone::Left);
        assert_eq!(router.zone_at(900.0, 500.0), TouchZone::Right);
        assert_eq!(router.zone_at(500.0, 100.0), TouchZone::Jump);
        assert_eq!(router.zone_at(500.0, 500.0), TouchZone::Forward);
        assert_eq!(router.zone_at(500.0, 900.0), TouchZone::Backward);
    }

    #[test]
    fn test_independent_fingers() {
        let mut router = router();
        router.touch_start(1, 100.0, 500.0);
        router.touch_start(2, 500.0, 500.0);

        let intent = router.intent();
        assert!(intent.left);
        assert!(intent.forward);
        assert_eq!(intent.device, DeviceClass::Mobile);

        router.touch_end(1);
        let intent = router.intent();
        assert!(!intent.left);
        assert!(intent.forward);
    }

    #[test]
    fn test_touch_move_changes_zone() {
        let mut router = router();
        router.touch_start(7, 500.0, 500.0);
        router.touch_move(7, 900.0, 500.0);

        let intent = router.intent();
        assert!(!intent.forward);
        assert!(intent.right);
    }

    #[test]
    fn test_two_fingers_same_zone() {
        let mut router = router();
        router.touch_start(1, 500.0, 500.0);
        router.touch_start(2, 550.0, 600.0);

        router.touch_end(1);
        assert!(router.intent().forward);

        router.touch_end(2);
        assert!(!router.intent().forward);
    }

    #[test]
    fn test_unknown_touch_ids_ignored() {
        let mut router = router();
        router.touch_move(99, 100.0, 100.0);
        router.touch_end(99);

        assert_eq!(router.intent(), InputIntent::default());
    }

    #[test]
    fn test_jump_one_shot() {
        let mut router = router();
        router.key_down(Key::Jump);

        assert!(router.intent().jump_requested);
        assert!(router.consume_jump());
        assert!(!router.consume_jump());
        assert!(!router.intent().jump_requested);
    }

    #[test]
    fn test_jump_lock() {
        let mut router = router();
        router.key_down(Key::Jump);
        router.consume_jump();

        // Locked: ignored
        router.tick(1.0);
        router.key_down(Key::Jump);
        assert!(!router.intent().jump_requested);

        // Lock expired
        router.tick(0.5);
        router.key_down(Key::Jump);
        assert!(router.intent().jump_requested);
    }

    #[test]
    fn test_jump_grace_delay() {
        let mut router = InputRouter::default();
        router.key_down(Key::Jump);
        assert!(!router.intent().jump_requested);

        router.tick(10.0);
        router.key_down(Key::Jump);
        assert!(router.intent().jump_requested);
    }

    #[test]
    fn test_jump_request_expires() {
        let mut router = router();
        router.key_down(Key::Jump);

        router.tick(0.25);
        assert!(router.intent().jump_requested);

        router.tick(0.25);
        assert!(!router.intent().jump_requested);
    }

    #[test]
    fn test_injected_jump_bypasses_lock() {
        let mut router = InputRouter::default();
        router.inject_jump();
        assert!(router.consume_jump());
    }

    #[test]
    fn test_touch_jump_zone() {
        let mut router = router();
        router.touch_start(3, 500.0, 100.0);
        assert!(router.intent().jump_requested);
    }

    #[test]
    fn test_reset_restarts_grace_delay() {
        let mut router = InputRouter::new(InputConfig {
            jump_grace_delay: Some(2.0),
            ..Default::default()
        });
        router.tick(3.0);
        router.request_jump();
        assert!(router.intent().jump_requested);

        router.reset();
        assert!(!router.intent().jump_requested);
        assert!(!router.jump_locked());

        router.request_jump();
        assert!(!router.intent().jump_requested);
    }

    #[test]
    fn test_device_stays_mobile_after_touch() {
        let mut router = router();
        assert_eq!(router.device(), DeviceClass::Desktop);

        router.touch_start(1, 500.0, 600.0);
        router.touch_end(1);
        router.key_down(Key::Forward);

        assert_eq!(router.intent().device, DeviceClass::Mobile);
    }
}
