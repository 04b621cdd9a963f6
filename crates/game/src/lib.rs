//! Skyrunner Game Logic
//!
//! This crate contains the endless-runner simulation including:
//!
//! - Keyboard and touch input routing
//! - The locomotion state machine driving character animation
//! - Procedural track generation and its colliders
//! - The chase camera, score and HUD observers
//!
//! # Architecture
//!
//! Each frame runs one deterministic step. Input produces an intent, the
//! locomotion machine picks a gait, physics moves the character and the world
//! (track, camera, HUD) follows.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Game Simulation                        │
//! │  ┌─────────┐   ┌────────────┐   ┌─────────┐   ┌───────────┐  │
//! │  │ Input   │──►│ Locomotion │──►│ Physics │──►│ Track,    │  │
//! │  │ Router  │   │ Machine    │   │ (move,  │   │ camera,   │  │
//! │  └─────────┘   └────────────┘   │ ground) │   │ HUD       │  │
//! │                                 └─────────┘   └───────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod camera;
pub mod character;
pub mod hud;
pub mod input;
pub mod level;
pub mod locomotion;
pub mod path;
pub mod random;
pub mod score;
pub mod simulation;

// Re-export main types
pub use camera::{CameraConfig, CameraPolicy, CameraPose, CameraRig};
pub use character::Character;
pub use hud::{HudSink, NullHud, NullScene, SceneSink};
pub use input::{InputConfig, InputIntent, InputRouter, Key, TouchZone};
pub use level::{Level, SpawnPlatform};
pub use locomotion::{
    AnimationError, AnimationPlayer, AnimationSet, ClipHandle, LocomotionConfig,
    LocomotionMachine, LoopMode, StateName, Transition,
};
pub use path::{Heading, PathConfig, PathEvent, PathGenerator, PathSegment};
pub use random::{FixedTurns, SeededRandom, TurnSource};
pub use score::{ScoreConfig, ScoreKeeper};
pub use simulation::{GameConfig, LoadTicket, Simulation, StepReport};

// Re-export physics types for convenience
pub use skyrunner_physics::{
    CollisionWorld, ContentFlags, DeviceClass, Gait, MovementConfig, SlowMotion,
};
