//! The runner entity and its timers.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use skyrunner_physics::{CharacterMotion, SlowMotion};

/// Countdown/count-up timers owned by the character.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterTimers {
    /// Time until another jump may start.
    pub jump_cooldown: f32,

    /// Time spent in the initial drop, once it has started.
    pub auto_jump_elapsed: Option<f32>,
    pub auto_jump_done: bool,

    /// Time since the first landing.
    pub auto_dance_elapsed: f32,
    pub auto_dance_done: bool,
}

/// The runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Movement physics state.
    pub motion: CharacterMotion,

    pub slow_motion: SlowMotion,

    pub timers: CharacterTimers,

    spawn_position: Vec3,
}

impl Character {
    /// Create a character falling from the given spawn position.
    pub fn new(spawn_position: Vec3) -> Self {
        Self {
            motion: CharacterMotion::new(spawn_position),
            slow_motion: SlowMotion::new(),
            timers: CharacterTimers::default(),
            spawn_position,
        }
    }

    /// Get the character's current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.motion.position
    }

    #[inline]
    pub fn orientation(&self) -> Quat {
        self.motion.orientation
    }

    #[inline]
    pub fn grounded(&self) -> bool {
        self.motion.grounded
    }

    #[inline]
    pub fn has_spawned(&self) -> bool {
        self.motion.has_spawned
    }

    /// Check if the jump cooldown has run out.
    #[inline]
    pub fn jump_ready(&self) -> bool {
        self.timers.jump_cooldown <= 0.0
    }

    pub fn start_jump_cooldown(&mut self, duration: f32) {
        self.timers.jump_cooldown = duration;
    }

    pub fn tick_jump_cooldown(&mut self, delta_time: f32) {
        if self.timers.jump_cooldown > 0.0 {
            self.timers.jump_cooldown -= delta_time;
        }
    }

    /// Advance the initial-drop timer. Returns `true` once, when the
    /// automatic jump is due.
    pub fn tick_auto_jump(&mut self, delta_time: f32, delay: f32) -> bool {
        let timers = &mut self.timers;
        if self.motion.has_spawned
            || timers.auto_jump_done
            || self.motion.position.y >= self.spawn_position.y
        {
            return false;
        }

        let elapsed = timers.auto_jump_elapsed.get_or_insert(0.0);
        *elapsed += delta_time;
        if *elapsed >= delay {
            timers.auto_jump_done = true;
            return true;
        }
        false
    }

    /// Advance the post-landing timer. Returns `true` once, when the
    /// automatic dance is due and `may_start` allows it. A due dance waits
    /// until then.
    pub fn tick_auto_dance(&mut self, delta_time: f32, delay: f32, may_start: bool) -> bool {
        let timers = &mut self.timers;
        if !self.motion.has_spawned || timers.auto_dance_done {
            return false;
        }

        timers.auto_dance_elapsed += delta_time;
        if timers.auto_dance_elapsed >= delay && may_start {
            timers.auto_dance_done = true;
            return true;
        }
        false
    }

    /// Put the character back at the top of the drop with fresh timers.
    pub fn reset(&mut self) {
        self.motion = CharacterMotion::new(self.spawn_position);
        self.slow_motion = SlowMotion::new();
        self.timers = CharacterTimers::default();
    }
}
