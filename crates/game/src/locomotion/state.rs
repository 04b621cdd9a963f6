//! Locomotion states and their private sub-state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use skyrunner_physics::{DeviceClass, Gait};
use thiserror::Error;

use super::LocomotionConfig;

/// Name of a locomotion state. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateName {
    Idle,
    Walk,
    Run,
    Jump,
    Dance,
    Fall,
}

impl StateName {
    pub const COUNT: usize = 6;

    pub const ALL: [StateName; Self::COUNT] = [
        Self::Idle,
        Self::Walk,
        Self::Run,
        Self::Jump,
        Self::Dance,
        Self::Fall,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Dance => "dance",
            Self::Fall => "fall",
        }
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateNameError {
    #[error("unknown locomotion state `{0}`")]
    Unknown(String),
}

impl FromStr for StateName {
    type Err = StateNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| StateNameError::Unknown(s.to_string()))
    }
}

/// What a state may look at while updating.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateContext {
    pub forward: bool,
    pub backward: bool,
    pub device: DeviceClass,
    pub grounded: bool,
}

/// Walk sub-state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WalkState {
    /// Lockout after landing from a jump; no new jump until it runs out.
    pub settle_cooldown: f32,
}

/// Run sub-state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Seconds of sustained forward release, while counting (touch input only).
    pub exit_timer: Option<f32>,
}

/// Jump sub-state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JumpState {
    /// Remaining apex hang with gravity switched off.
    pub gravity_hold: f32,
}

/// The active locomotion state with its private data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LocomotionState {
    Idle,
    Walk(WalkState),
    Run(RunState),
    Jump(JumpState),
    Dance,
    Fall,
}

impl LocomotionState {
    /// Fresh sub-state for a state being entered.
    pub fn fresh(name: StateName, previous: Option<StateName>, config: &LocomotionConfig) -> Self {
        match name {
            StateName::Idle => Self::Idle,
            StateName::Walk => Self::Walk(WalkState {
                settle_cooldown: if previous == Some(StateName::Jump) {
                    config.walk_settle_cooldown
                } else {
                    0.0
                },
            }),
            StateName::Run => Self::Run(RunState::default()),
            StateName::Jump => Self::Jump(JumpState {
                gravity_hold: config.jump_gravity_hold,
            }),
            StateName::Dance => Self::Dance,
            StateName::Fall => Self::Fall,
        }
    }

    pub fn name(&self) -> StateName {
        match self {
            Self::Idle => StateName::Idle,
            Self::Walk(_) => StateName::Walk,
            Self::Run(_) => StateName::Run,
            Self::Jump(_) => StateName::Jump,
            Self::Dance => StateName::Dance,
            Self::Fall => StateName::Fall,
        }
    }

    /// Speed class the integrator should use.
    pub fn gait(&self) -> Gait {
        match self {
            Self::Run(_) => Gait::Run,
            Self::Jump(_) => Gait::Jump,
            _ => Gait::Cruise,
        }
    }

    /// Plain ground locomotion, where scripted actions such as the auto-dance may start.
    pub fn is_on_ground(&self) -> bool {
        matches!(self, Self::Idle | Self::Walk(_) | Self::Run(_))
    }

    /// Dancing keeps the heading fixed.
    pub fn holds_heading(&self) -> bool {
        matches!(self, Self::Dance)
    }

    pub fn gravity_disabled(&self) -> bool {
        matches!(self, Self::Jump(jump) if jump.gravity_hold > 0.0)
    }

    /// Whether a jump request may be honored from this state, ignoring cooldown.
    pub fn accepts_jump(&self) -> bool {
        match self {
            Self::Walk(walk) => walk.settle_cooldown <= 0.0,
            Self::Jump(_) | Self::Fall => false,
            Self::Idle | Self::Run(_) | Self::Dance => true,
        }
    }

    /// Advance sub-state timers and pick the next state, if any.
    pub fn update(
        &mut self,
        delta_time: f32,
        context: &StateContext,
        config: &LocomotionConfig,
    ) -> Option<StateName> {
        match self {
            Self::Idle => {
                if context.forward {
                    Some(StateName::Run)
                } else if context.backward {
                    Some(StateName::Dance)
                } else {
                    None
                }
            }
            Self::Walk(walk) => {
                if walk.settle_cooldown > 0.0 {
                    walk.settle_cooldown = (walk.settle_cooldown - delta_time).max(0.0);
                }
                context.forward.then_some(StateName::Run)
            }
            Self::Run(run) => match context.device {
                DeviceClass::Desktop => (!context.forward).then_some(StateName::Walk),
                DeviceClass::Mobile => {
                    if context.forward {
                        run.exit_timer = None;
                        return None;
                    }
                    let held = run.exit_timer.unwrap_or(0.0) + delta_time;
                    run.exit_timer = Some(held);
                    (held >= config.mobile_run_exit_delay).then_some(StateName::Walk)
                }
            },
            Self::Jump(jump) => {
                if jump.gravity_hold > 0.0 {
                    jump.gravity_hold = (jump.gravity_hold - delta_time).max(0.0);
                }
                None
            }
            Self::Dance => None,
            Self::Fall => context.grounded.then_some(StateName::Walk),
        }
    }
}
