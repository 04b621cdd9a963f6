//! Physics integrator.
//!
//! This is the main entry point for character motion. It takes a motion
//! command and advances the motion state by one frame.

use glam::{Quat, Vec3};

use super::config::MovementConfig;
use super::slow_motion::SlowMotion;
use super::state::{CharacterMotion, Gait, MotionCommand};

/// What changed during an integration step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationOutcome {
    /// The slow intent spent a full charge and slow motion started.
    pub slow_motion_started: bool,
}

/// Character physics integrator.
///
/// Handles:
/// - Gravity (unless grounded or suspended by the active state)
/// - Per-axis damping
/// - Forward speed selection by gait
/// - Yaw turning
/// - Translation along the post-turn orientation
///
/// # Example
///
/// ```ignore
/// let integrator = Integrator::new(MovementConfig::default());
/// let mut motion = CharacterMotion::new(spawn_position);
///
/// // Each frame:
/// integrator.step(&mut motion, &mut slow_motion, &command, delta_time);
/// ```
#[derive(Debug, Clone)]
pub struct Integrator {
    /// Movement configuration.
    pub config: MovementConfig,
}

impl Integrator {
    /// Create a new integrator with the given configuration.
    pub fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    /// Create an integrator with default configuration.
    pub fn with_default_config() -> Self {
        Self::new(MovementConfig::default())
    }

    /// Advance motion for one frame.
    ///
    /// Forward control (speed and turning) only applies once the character has
    /// landed for the first time; until then it just falls.
    ///
    /// # Arguments
    ///
    /// * `motion` - The character's motion state (will be modified)
    /// * `slow_motion` - Slow-motion resource, spent by the slow intent
    /// * `command` - What the locomotion state and input ask for this frame
    /// * `delta_time` - Time step in seconds, already clamped
    pub fn step(
        &self,
        motion: &mut CharacterMotion,
        slow_motion: &mut SlowMotion,
        command: &MotionCommand,
        delta_time: f32,
    ) -> IntegrationOutcome {
        let mut outcome = IntegrationOutcome::default();

        self.apply_gravity(motion, command, delta_time);
        self.apply_damping(motion, delta_time);

        if motion.has_spawned {
            motion.velocity.z = self.forward_speed(command.gait, command.slow);

            if command.slow && slow_motion.try_trigger(self.config.slow_motion_duration) {
                outcome.slow_motion_started = true;
            }
            if slow_motion.is_active() {
                motion.velocity.z *= self.config.slow_motion_speed_factor;
            }

            if !command.hold_heading {
                self.apply_turn(motion, command, delta_time);
            }
        }

        self.translate(motion, delta_time);

        outcome
    }

    /// Forward speed for a gait. The slow intent overrides every gait.
    pub fn forward_speed(&self, gait: Gait, slow: bool) -> f32 {
        if slow {
            return self.config.slow_move_speed;
        }
        match gait {
            Gait::Cruise => self.config.auto_move_speed,
            Gait::Run => self.config.run_speed,
            Gait::Jump => self.config.jump_speed,
        }
    }

    // ========================================================================
    // Forces
    // ========================================================================

    fn apply_gravity(&self, motion: &mut CharacterMotion, command: &MotionCommand, delta_time: f32) {
        if !motion.grounded && !command.gravity_disabled {
            motion.velocity.y -= self.config.gravity * delta_time;
        }
    }

    fn apply_damping(&self, motion: &mut CharacterMotion, delta_time: f32) {
        let velocity = motion.velocity;
        let mut frame_damping = velocity * self.config.damping * delta_time;

        // Never let damping flip the sign of forward velocity
        frame_damping.z = frame_damping.z.signum() * frame_damping.z.abs().min(velocity.z.abs());

        motion.velocity += frame_damping;
    }

    // ========================================================================
    // Orientation and translation
    // ========================================================================

    fn apply_turn(&self, motion: &mut CharacterMotion, command: &MotionCommand, delta_time: f32) {
        let step = self.config.turn_rate(command.device)
            * std::f32::consts::PI
            * delta_time
            * self.config.turn_tuning;

        let mut orientation = motion.orientation;
        if command.turn_left {
            orientation *= Quat::from_axis_angle(Vec3::Y, step);
        }
        if command.turn_right {
            orientation *= Quat::from_axis_angle(Vec3::Y, -step);
        }
        motion.orientation = orientation.normalize();
    }

    fn translate(&self, motion: &mut CharacterMotion, delta_time: f32) {
        let forward = motion.forward() * (motion.velocity.z * delta_time);
        let sideways = motion.sideways() * (motion.velocity.x * delta_time);

        motion.position += forward + sideways;
        motion.position.y += motion.velocity.y * delta_time;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::config::DeviceClass;

    const DT: f32 = 0.016;

    fn spawned_motion() -> CharacterMotion {
        CharacterMotion {
            grounded: true,
            has_spawned: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_gravity_when_airborne() {
        let integrator = Integrator::with_default_config();
        let mut motion = CharacterMotion::new(Vec3::new(0.0, 100.0, 0.0));
        let mut slow = SlowMotion::new();

        integrator.step(&mut motion, &mut slow, &MotionCommand::default(), DT);

        assert!(motion.velocity.y < 0.0);
        assert!(motion.position.y < 100.0);
    }

    #[test]
    fn test_no_gravity_when_grounded_or_disabled() {
        let integrator = Integrator::with_default_config();
        let mut slow = SlowMotion::new();

        let mut grounded = spawned_motion();
        integrator.step(&mut grounded, &mut slow, &MotionCommand::default(), DT);
        assert_eq!(grounded.velocity.y, 0.0);

        let mut hanging = CharacterMotion {
            has_spawned: true,
            ..Default::default()
        };
        let command = MotionCommand {
            gravity_disabled: true,
            ..Default::default()
        };
        integrator.step(&mut hanging, &mut slow, &command, DT);
        assert_eq!(hanging.velocity.y, 0.0);
    }

    #[test]
    fn test_speed_selected_by_gait() {
        let integrator = Integrator::with_default_config();
        let config = &integrator.config;
        let mut slow = SlowMotion::new();

        for (gait, expected) in [
            (Gait::Cruise, config.auto_move_speed),
            (Gait::Run, config.run_speed),
            (Gait::Jump, config.jump_speed),
        ] {
            let mut motion = spawned_motion();
            let command = MotionCommand {
                gait,
                ..Default::default()
            };
            integrator.step(&mut motion, &mut slow, &command, DT);
            assert_eq!(motion.velocity.z, expected);
            assert!((motion.position.z - expected * DT).abs() < 1e-4);
        }
    }

    #[test]
    fn test_speed_not_accumulated() {
        let integrator = Integrator::with_default_config();
        let mut motion = spawned_motion();
        let mut slow = SlowMotion::new();
        let command = MotionCommand {
            gait: Gait::Run,
            ..Default::default()
        };

        for _ in 0..100 {
            integrator.step(&mut motion, &mut slow, &command, DT);
        }
        assert_eq!(motion.velocity.z, integrator.config.run_speed);
    }

    #[test]
    fn test_slow_intent_spends_charge() {
        let integrator = Integrator::with_default_config();
        let mut motion = spawned_motion();
        let mut slow = SlowMotion::new();
        let command = MotionCommand {
            slow: true,
            ..Default::default()
        };

        let outcome = integrator.step(&mut motion, &mut slow, &command, DT);

        assert!(outcome.slow_motion_started);
        assert!(slow.is_active());
        let expected = integrator.config.slow_move_speed * integrator.config.slow_motion_speed_factor;
        assert_eq!(motion.velocity.z, expected);

        // Held again: still slow, no second trigger
        let outcome = integrator.step(&mut motion, &mut slow, &command, DT);
        assert!(!outcome.slow_motion_started);
    }

    #[test]
    fn test_slow_motion_scales_any_gait() {
        let integrator = Integrator::with_default_config();
        let mut motion = spawned_motion();
        let mut slow = SlowMotion::new();
        slow.try_trigger(3.0);

        let command = MotionCommand {
            gait: Gait::Run,
            ..Default::default()
        };
        integrator.step(&mut motion, &mut slow, &command, DT);
        assert_eq!(motion.velocity.z, integrator.config.run_speed * 0.5);
    }

    #[test]
    fn test_no_forward_control_before_spawn() {
        let integrator = Integrator::with_default_config();
        let mut motion = CharacterMotion::new(Vec3::new(0.0, 100.0, 0.0));
        let mut slow = SlowMotion::new();
        let command = MotionCommand {
            gait: Gait::Run,
            turn_left: true,
            ..Default::default()
        };

        integrator.step(&mut motion, &mut slow, &command, DT);

        assert_eq!(motion.velocity.z, 0.0);
        assert_eq!(motion.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_turn_before_translate() {
        let integrator = Integrator::with_default_config();
        let mut motion = spawned_motion();
        let mut slow = SlowMotion::new();
        let command = MotionCommand {
            turn_left: true,
            ..Default::default()
        };

        integrator.step(&mut motion, &mut slow, &command, DT);

        // Left turn is a positive yaw, which swings forward towards +X
        let expected_yaw = 0.5 * std::f32::consts::PI * DT * 0.5;
        assert!((motion.yaw() - expected_yaw).abs() < 1e-5);
        assert!(motion.position.x > 0.0);
    }

    #[test]
    fn test_opposite_turns_cancel() {
        let integrator = Integrator::with_default_config();
        let mut motion = spawned_motion();
        let mut slow = SlowMotion::new();
        let command = MotionCommand {
            turn_left: true,
            turn_right: true,
            device: DeviceClass::Mobile,
            ..Default::default()
        };

        integrator.step(&mut motion, &mut slow, &command, DT);
        assert!(motion.yaw().abs() < 1e-5);
    }

    #[test]
    fn test_damping_never_flips_forward_velocity() {
        let integrator = Integrator::with_default_config();
        let mut motion = CharacterMotion::new(Vec3::new(0.0, 50.0, 0.0));
        motion.velocity.z = 1.0;
        let mut slow = SlowMotion::new();

        // Large step: -10 * 1.0 * 0.5 would overshoot to -4 without the clamp
        integrator.step(&mut motion, &mut slow, &MotionCommand::default(), 0.5);
        assert_eq!(motion.velocity.z, 0.0);
    }

    #[test]
    fn test_held_heading_ignores_turns() {
        let integrator = Integrator::with_default_config();
        let mut motion = spawned_motion();
        let mut slow = SlowMotion::new();
        let command = MotionCommand {
            turn_left: true,
            hold_heading: true,
            ..Default::default()
        };

        integrator.step(&mut motion, &mut slow, &command, DT);

        assert_eq!(motion.orientation, Quat::IDENTITY);
        assert_eq!(motion.velocity.z, integrator.config.auto_move_speed);
        assert!(motion.position.z > 0.0);
    }
}
