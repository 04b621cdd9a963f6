//! Locomotion state machine.
//!
//! Six closed states govern animation selection and the physics modifiers
//! handed to the integrator:
//!
//! | From | Trigger | To |
//! |------|---------|----|
//! | Idle | forward held | Run |
//! | Idle | backward held | Dance |
//! | Walk | forward held | Run |
//! | Run | forward released (touch input: after a sustained release) | Walk |
//! | Jump | clip finished | Walk |
//! | Dance | clip finished | Walk |
//! | Fall | grounded | Walk |
//! | Idle, Walk, Run, Dance | jump request, cooldown elapsed, Walk settled | Jump |
//! | any but Fall | ungrounded below the fall line | Fall |
//!
//! The last two rows are driven from outside via
//! [`LocomotionMachine::try_jump`] and [`LocomotionMachine::set_state`].

mod animation;
mod machine;
mod state;

pub use animation::{AnimationError, AnimationPlayer, AnimationSet, ClipHandle, LoopMode};
pub use machine::{LocomotionMachine, Transition};
pub use state::{
    JumpState, LocomotionState, RunState, StateContext, StateName, StateNameError, WalkState,
};

use serde::{Deserialize, Serialize};

/// Crossfade duration into each state, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossfadeDurations {
    pub idle: f32,
    pub walk: f32,
    pub run: f32,
    pub jump: f32,
    pub dance: f32,
    pub fall: f32,
}

impl Default for CrossfadeDurations {
    fn default() -> Self {
        Self {
            idle: 0.5,
            walk: 0.5,
            run: 1.0,
            jump: 0.2,
            dance: 0.5,
            fall: 0.5,
        }
    }
}

impl CrossfadeDurations {
    pub fn for_state(&self, state: StateName) -> f32 {
        match state {
            StateName::Idle => self.idle,
            StateName::Walk => self.walk,
            StateName::Run => self.run,
            StateName::Jump => self.jump,
            StateName::Dance => self.dance,
            StateName::Fall => self.fall,
        }
    }
}

/// Locomotion tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub crossfade: CrossfadeDurations,

    /// Gravity is off for this long after a jump starts.
    pub jump_gravity_hold: f32,

    /// Walk refuses jumps for this long after landing from one.
    pub walk_settle_cooldown: f32,

    /// Sustained forward release needed to leave Run on touch input.
    pub mobile_run_exit_delay: f32,

    /// Global animation rate while dancing.
    pub dance_playback_rate: f32,

    /// Repeat count of the fall clip.
    pub fall_loop_repeat: u32,

    /// Dance starts this long after the first landing.
    pub auto_dance_delay: f32,

    /// A jump is injected this long into the initial drop.
    pub auto_jump_delay: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            crossfade: CrossfadeDurations::default(),
            jump_gravity_hold: 0.43,
            walk_settle_cooldown: 0.3,
            mobile_run_exit_delay: 1.0,
            dance_playback_rate: 0.5,
            fall_loop_repeat: 10,
            auto_dance_delay: 3.2,
            auto_jump_delay: 0.0,
        }
    }
}
