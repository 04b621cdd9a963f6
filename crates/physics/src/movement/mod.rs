//! Character movement physics.
//!
//! This module implements the runner's per-tick motion:
//!
//! - Gait-selected forward speed (not accumulated)
//! - Yaw turning applied before translation
//! - Gravity with an optional per-state disable
//! - Per-axis exponential damping with a clamped forward axis
//! - Multi-ray ground detection with a spawn grace window
//! - A slow-motion charge that is consumed and recharges linearly
//!
//! # Design
//!
//! The [`Integrator`] moves a [`CharacterMotion`] according to a
//! [`MotionCommand`], then the [`GroundResolver`] snaps it onto whatever
//! collidable surface lies below.

mod config;
mod controller;
mod ground;
mod slow_motion;
mod state;

pub use config::{DeviceClass, MovementConfig, RayPattern};
pub use controller::{IntegrationOutcome, Integrator};
pub use ground::{GroundContext, GroundReport, GroundResolver};
pub use slow_motion::{SlowMotion, SlowMotionEvent};
pub use state::{CharacterMotion, Gait, MotionCommand};
