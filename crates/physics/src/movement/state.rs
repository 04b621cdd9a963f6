//! Character motion state and per-tick motion commands.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::config::DeviceClass;

/// Forward-speed class selected by the active locomotion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gait {
    /// Constant auto-move speed (walking, idling, dancing, falling).
    #[default]
    Cruise,
    /// Sprinting.
    Run,
    /// Airborne jump.
    Jump,
}

/// What the integrator should do this tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MotionCommand {
    /// Speed class from the locomotion state.
    pub gait: Gait,

    /// The slow intent is held.
    pub slow: bool,

    /// Turn left this tick.
    pub turn_left: bool,

    /// Turn right this tick.
    pub turn_right: bool,

    /// Device the input came from. Scales turn rate.
    pub device: DeviceClass,

    /// The active state has suspended gravity (jump hang).
    pub gravity_disabled: bool,

    /// The active state keeps the current heading; turn input is ignored.
    pub hold_heading: bool,
}

/// Physical state of the character.
///
/// Position is the character's feet. Orientation is yaw-only in practice;
/// local +Z is forward and local +X is sideways.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterMotion {
    /// Position in world space.
    pub position: Vec3,

    /// Velocity in character-local space (x sideways, y up, z forward).
    pub velocity: Vec3,

    /// Orientation as a unit quaternion.
    pub orientation: Quat,

    /// Resting on a collidable surface this tick.
    pub grounded: bool,

    /// Has touched ground at least once since spawn.
    pub has_spawned: bool,
}

impl Default for CharacterMotion {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            grounded: false,
            has_spawned: false,
        }
    }
}

impl CharacterMotion {
    /// Create a new motion state at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// World-space forward direction.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        (self.orientation * Vec3::Z).normalize_or_zero()
    }

    /// World-space sideways direction.
    #[inline]
    pub fn sideways(&self) -> Vec3 {
        (self.orientation * Vec3::X).normalize_or_zero()
    }

    /// Yaw angle in radians.
    pub fn yaw(&self) -> f32 {
        let (yaw, _pitch, _roll) = self.orientation.to_euler(glam::EulerRot::YXZ);
        yaw
    }
}
