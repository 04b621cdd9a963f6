//! Skyrunner Physics
//!
//! Per-tick character physics for an endless runner. The character is pushed
//! forward at a speed chosen by its locomotion gait, turned about the vertical
//! axis, pulled down by gravity and kept on the track by a fan of downward rays.
//!
//! # Architecture
//!
//! - **Collision**: collidable surfaces and downward ray queries against them
//! - **Movement**: integrator, ground resolver and the slow-motion resource
//!
//! Everything is driven by an explicit frame delta. There are no background
//! timers; cooldowns are countdown fields decremented by each step.

pub mod collision;
pub mod movement;

// Re-export commonly used types
pub use collision::{Collidable, CollisionScene, CollisionWorld, ContentFlags, RayHit, ShapeKind};
pub use movement::{
    CharacterMotion, DeviceClass, Gait, GroundContext, GroundReport, GroundResolver,
    IntegrationOutcome, Integrator, MotionCommand, MovementConfig, RayPattern, SlowMotion,
    SlowMotionEvent,
};
