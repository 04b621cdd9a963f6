//! Third-person chase camera.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// How the camera approaches its ideal pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraPolicy {
    /// Jump straight to the ideal pose every tick.
    #[default]
    Snap,
    /// Frame-rate independent exponential follow.
    Follow,
}

/// Camera rig configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position in the character's local frame.
    pub offset: Vec3,

    /// Look-at point in the character's local frame.
    pub look_at: Vec3,

    pub policy: CameraPolicy,

    /// Fraction of the gap left after one second of following.
    pub follow_residual: f32,

    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(-15.0, 16.0, -30.0),
            look_at: Vec3::new(160.0, 10.0, 620.0),
            policy: CameraPolicy::Snap,
            follow_residual: 0.001,
            fov: 60.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

/// Where the camera is and what it looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    /// Get the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }
}

/// Derives the camera pose from the character pose.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub config: CameraConfig,
    pose: CameraPose,
    initialized: bool,
}

impl CameraRig {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            pose: CameraPose::default(),
            initialized: false,
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    /// Ideal pose for a character pose.
    ///
    /// While dancing both local vectors are turned half a revolution first,
    /// so the camera faces the character head-on.
    pub fn ideal(&self, position: Vec3, orientation: Quat, dancing: bool) -> CameraPose {
        let flip = if dancing {
            Quat::from_rotation_y(std::f32::consts::PI)
        } else {
            Quat::IDENTITY
        };
        let to_world = |local: Vec3| orientation * (flip * local) + position;

        CameraPose {
            position: to_world(self.config.offset),
            look_at: to_world(self.config.look_at),
        }
    }

    /// Move the camera for this tick.
    pub fn update(
        &mut self,
        position: Vec3,
        orientation: Quat,
        dancing: bool,
        delta_time: f32,
    ) -> CameraPose {
        let ideal = self.ideal(position, orientation, dancing);

        self.pose = match self.config.policy {
            CameraPolicy::Follow if self.initialized => {
                let t = 1.0 - self.config.follow_residual.powf(delta_time);
                CameraPose {
                    position: self.pose.position.lerp(ideal.position, t),
                    look_at: self.pose.look_at.lerp(ideal.look_at, t),
                }
            }
            _ => ideal,
        };
        self.initialized = true;

        self.pose
    }

    /// Forget the current pose; the next update snaps.
    pub fn reset(&mut self) {
        self.pose = CameraPose::default();
        self.initialized = false;
    }

    /// Get the projection matrix for rendering.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.config.fov.to_radians(), aspect, self.config.near, self.config.far)
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_snap_follows_character() {
        let mut rig = CameraRig::default();
        let position = Vec3::new(0.0, 1.0, 100.0);

        let pose = rig.update(position, Quat::IDENTITY, false, 0.016);

        assert!(approx(pose.position, Vec3::new(-15.0, 17.0, 70.0)));
        assert!(approx(pose.look_at, Vec3::new(160.0, 11.0, 720.0)));
    }

    #[test]
    fn test_rotates_with_character() {
        let rig = CameraRig::default();
        let half_turn = Quat::from_rotation_y(std::f32::consts::PI);

        let pose = rig.ideal(Vec3::ZERO, half_turn, false);

        assert!(approx(pose.position, Vec3::new(15.0, 16.0, 30.0)));
    }

    #[test]
    fn test_dance_flips_camera() {
        let rig = CameraRig::default();
        let normal = rig.ideal(Vec3::ZERO, Quat::IDENTITY, false);
        let dancing = rig.ideal(Vec3::ZERO, Quat::IDENTITY, true);

        assert!(approx(dancing.position, Vec3::new(15.0, 16.0, 30.0)));
        assert!(approx(dancing.look_at, Vec3::new(-160.0, 10.0, -620.0)));
        assert!(normal.position.z < 0.0);
    }

    #[test]
    fn test_follow_is_frame_rate_independent() {
        let config = CameraConfig {
            policy: CameraPolicy::Follow,
            ..Default::default()
        };
        let target = Vec3::new(0.0, 0.0, 100.0);

        let mut coarse = CameraRig::new(config.clone());
        coarse.update(Vec3::ZERO, Quat::IDENTITY, false, 0.0);
        coarse.update(target, Quat::IDENTITY, false, 0.1);

        let mut fine = CameraRig::new(config);
        fine.update(Vec3::ZERO, Quat::IDENTITY, false, 0.0);
        for _ in 0..10 {
            fine.update(target, Quat::IDENTITY, false, 0.01);
        }

        assert!((coarse.pose().position - fine.pose().position).length() < 1e-2);
        assert!(coarse.pose().position.z < target.z - 30.0);
    }

    #[test]
    fn test_view_matrix_valid() {
        let mut rig = CameraRig::default();
        let pose = rig.update(Vec3::ZERO, Quat::IDENTITY, false, 0.016);
        assert!(pose.view_matrix().determinant().abs() > 0.0001);
    }
}
