//! Movement configuration constants.
//!
//! All movement parameters are grouped here for easy tuning.
//! Units are world units and seconds.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Input device family. Scales turning and changes some exit timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceClass {
    #[default]
    Desktop,
    Mobile,
}

/// Layout of the downward ground rays around the character's feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RayPattern {
    /// Center plus four rays on the axes.
    Cross { spread: f32 },
    /// Center plus eight rays on the axes and diagonals.
    Ring { spread: f32 },
}

impl RayPattern {
    /// Lateral offsets of every ray, center first.
    pub fn offsets(&self) -> Vec<Vec3> {
        match *self {
            Self::Cross { spread } => vec![
                Vec3::ZERO,
                Vec3::new(0.0, 0.0, spread),
                Vec3::new(0.0, 0.0, -spread),
                Vec3::new(spread, 0.0, 0.0),
                Vec3::new(-spread, 0.0, 0.0),
            ],
            Self::Ring { spread } => vec![
                Vec3::ZERO,
                Vec3::new(spread, 0.0, spread),
                Vec3::new(-spread, 0.0, spread),
                Vec3::new(spread, 0.0, -spread),
                Vec3::new(-spread, 0.0, -spread),
                Vec3::new(0.0, 0.0, spread),
                Vec3::new(0.0, 0.0, -spread),
                Vec3::new(spread, 0.0, 0.0),
                Vec3::new(-spread, 0.0, 0.0),
            ],
        }
    }
}

impl Default for RayPattern {
    fn default() -> Self {
        Self::Ring { spread: 1.0 }
    }
}

/// Configuration for character movement physics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Forward Speeds
    // ========================================================================
    /// Speed while walking, idling or dancing.
    pub auto_move_speed: f32,

    /// Speed while the slow intent is held.
    pub slow_move_speed: f32,

    /// Speed while running.
    pub run_speed: f32,

    /// Speed while jumping.
    pub jump_speed: f32,

    // ========================================================================
    // Physics
    // ========================================================================
    /// Gravity acceleration magnitude (units/second²).
    pub gravity: f32,

    /// Per-axis damping factors applied as `v += v * damping * dt`.
    pub damping: Vec3,

    /// Turn rate on desktop (half-turns per second before tuning).
    pub desktop_turn_rate: f32,

    /// Turn rate on touch devices.
    pub mobile_turn_rate: f32,

    /// Extra multiplier on the yaw step.
    pub turn_tuning: f32,

    /// Largest frame delta the simulation will integrate.
    pub max_frame_delta: f32,

    // ========================================================================
    // Ground Detection
    // ========================================================================
    /// Height the character is dropped from at spawn.
    pub spawn_height: f32,

    /// Ray layout around the feet.
    pub ray_pattern: RayPattern,

    /// Ray origins are lifted this far above the feet.
    pub ray_lift: f32,

    /// Maximum ray length.
    pub ray_length: f32,

    /// Hits closer than this count as ground contact.
    pub ground_snap_distance: f32,

    /// Clearance kept between feet and ground after snapping.
    pub ground_buffer: f32,

    /// Extra height added on the very first landing.
    pub landing_bounce_height: f32,

    /// Upward speed given on the very first landing.
    pub landing_bounce_velocity: f32,

    /// Height of the track plane.
    pub path_plane_y: f32,

    /// Distance below the track plane at which the character is falling.
    pub fall_threshold: f32,

    /// Seconds after start during which the spawn platform clamp applies.
    pub spawn_grace_duration: f32,

    /// Minimum height above the spawn platform top during the grace window.
    pub spawn_clearance: f32,

    // ========================================================================
    // Timers (seconds)
    // ========================================================================
    /// Minimum time between jumps.
    pub jump_cooldown: f32,

    /// How long slow motion lasts once triggered.
    pub slow_motion_duration: f32,

    /// Time to recharge slow motion from empty to full.
    pub slow_motion_recharge: f32,

    /// Forward speed multiplier while slow motion is active.
    pub slow_motion_speed_factor: f32,

    /// Animation playback rate while slow motion is active.
    pub slow_motion_playback_rate: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            // Forward speeds
            auto_move_speed: 40.0,
            slow_move_speed: 20.0,
            run_speed: 60.0,
            jump_speed: 80.0,

            // Physics
            gravity: 39.2,
            damping: Vec3::new(-0.001, -0.0002, -10.0),
            desktop_turn_rate: 0.5,
            mobile_turn_rate: 0.5,
            turn_tuning: 0.5,
            max_frame_delta: 0.1,

            // Ground detection
            spawn_height: 100.0,
            ray_pattern: RayPattern::default(),
            ray_lift: 0.1,
            ray_length: 10.0,
            ground_snap_distance: 1.0,
            ground_buffer: 0.2,
            landing_bounce_height: 0.5,
            landing_bounce_velocity: 2.0,
            path_plane_y: 0.0,
            fall_threshold: 1.0,
            spawn_grace_duration: 3.1,
            spawn_clearance: 1.0,

            // Timers
            jump_cooldown: 1.5,
            slow_motion_duration: 3.0,
            slow_motion_recharge: 7.0,
            slow_motion_speed_factor: 0.5,
            slow_motion_playback_rate: 0.5,
        }
    }
}

impl MovementConfig {
    /// A gentler config for first-time players: slower track, longer slow motion.
    pub fn practice() -> Self {
        Self {
            auto_move_speed: 30.0,
            slow_move_speed: 15.0,
            run_speed: 45.0,
            jump_speed: 60.0,
            slow_motion_duration: 4.0,
            slow_motion_recharge: 5.0,
            ..Default::default()
        }
    }

    /// Turn rate for the given device.
    pub fn turn_rate(&self, device: DeviceClass) -> f32 {
        match device {
            DeviceClass::Desktop => self.desktop_turn_rate,
            DeviceClass::Mobile => self.mobile_turn_rate,
        }
    }

    /// Height below which an ungrounded character is falling.
    #[inline]
    pub fn fall_line(&self) -> f32 {
        self.path_plane_y - self.fall_threshold
    }

    /// Clamp a raw frame delta into the range the integrator accepts.
    ///
    /// A negative or NaN delta, or a nonsensical `max_frame_delta`, yields 0.
    #[inline]
    pub fn clamp_delta(&self, delta_time: f32) -> f32 {
        delta_time.max(0.0).min(self.max_frame_delta.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MovementConfig::default();
        assert!(config.run_speed > config.auto_move_speed);
        assert!(config.auto_move_speed > config.slow_move_speed);
        assert!(config.gravity > 0.0);
        assert_eq!(config.fall_line(), -1.0);
    }

    #[test]
    fn test_ray_pattern_sizes() {
        assert_eq!(RayPattern::Cross { spread: 1.0 }.offsets().len(), 5);
        assert_eq!(RayPattern::Ring { spread: 1.0 }.offsets().len(), 9);
        assert_eq!(RayPattern::default().offsets()[0], Vec3::ZERO);
    }

    #[test]
    fn test_clamp_delta() {
        let config = MovementConfig::default();
        assert_eq!(config.clamp_delta(5.0), 0.1);
        assert_eq!(config.clamp_delta(-1.0), 0.0);
        assert_eq!(config.clamp_delta(0.016), 0.016);
        assert_eq!(config.clamp_delta(f32::NAN), 0.0);
    }

    #[test]
    fn test_clamp_delta_bad_limit() {
        for max_frame_delta in [-1.0, f32::NAN] {
            let config = MovementConfig {
                max_frame_delta,
                ..Default::default()
            };
            assert_eq!(config.clamp_delta(0.016), 0.0);
        }
    }

    #[test]
    fn test_turn_rate_by_device() {
        let config = MovementConfig {
            mobile_turn_rate: 0.8,
            ..Default::default()
        };
        assert_eq!(config.turn_rate(DeviceClass::Desktop), 0.5);
        assert_eq!(config.turn_rate(DeviceClass::Mobile), 0.8);
    }
}
