//! Observer interfaces for the HUD and the render scene.
//!
//! The simulation holds no UI or scene-graph objects. It pushes plain values
//! through these sinks and the host decides what to draw.

use glam::{Quat, Vec3};

use crate::camera::CameraPose;
use crate::locomotion::StateName;
use crate::path::PathSegment;

/// HUD observer.
pub trait HudSink {
    /// Score text; `None` hides it.
    fn score_changed(&mut self, score: Option<u32>);

    /// Slow-motion charge bar, 0.0 to 1.0. `full` drives the ready pulse.
    fn slow_motion_charge(&mut self, charge: f32, full: bool);

    /// Show or hide the restart prompt.
    fn restart_prompt(&mut self, visible: bool);
}

/// Render-scene observer.
pub trait SceneSink {
    /// Character transform and active state for this tick.
    fn character_moved(&mut self, position: Vec3, orientation: Quat, state: StateName);

    fn camera_moved(&mut self, pose: &CameraPose);

    /// A track segment needs a mesh.
    fn segment_created(&mut self, segment: &PathSegment);

    /// A track segment's mesh can be released.
    fn segment_released(&mut self, segment: &PathSegment);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHud;

impl HudSink for NullHud {
    fn score_changed(&mut self, _score: Option<u32>) {}
    fn slow_motion_charge(&mut self, _charge: f32, _full: bool) {}
    fn restart_prompt(&mut self, _visible: bool) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScene;

impl SceneSink for NullScene {
    fn character_moved(&mut self, _position: Vec3, _orientation: Quat, _state: StateName) {}
    fn camera_moved(&mut self, _pose: &CameraPose) {}
    fn segment_created(&mut self, _segment: &PathSegment) {}
    fn segment_released(&mut self, _segment: &PathSegment) {}
}
