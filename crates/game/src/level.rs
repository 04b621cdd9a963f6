//! Level geometry: the spawn platform plus one collider per track segment.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skyrunner_physics::{CollisionWorld, ContentFlags};

use crate::path::{PathConfig, PathSegment};

/// The solid box the runner drops onto at the start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPlatform {
    pub center: Vec3,
    pub size: Vec3,
}

impl Default for SpawnPlatform {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, -499.0, 60.0),
            size: Vec3::new(120.0, 1000.0, 130.0),
        }
    }
}

impl SpawnPlatform {
    /// Height of the top face.
    pub fn top(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }
}

/// Collision geometry for a run.
#[derive(Debug)]
pub struct Level {
    /// Collision world for physics.
    pub collision: CollisionWorld,

    pub platform: SpawnPlatform,

    /// Track segment order -> collider brush id.
    segment_colliders: HashMap<u64, u32>,
}

impl Level {
    /// A level with just the spawn platform.
    pub fn new(platform: SpawnPlatform) -> Self {
        let mut collision = CollisionWorld::new();
        collision.add_box(platform.center, platform.size / 2.0, ContentFlags::SOLID);

        Self {
            collision,
            platform,
            segment_colliders: HashMap::new(),
        }
    }

    /// Add the invisible walkable collider for a new segment.
    pub fn add_segment(&mut self, segment: &PathSegment, config: &PathConfig) {
        let id = self.collision.add_plane(
            segment.position,
            config.collider_width(),
            config.segment_length,
            ContentFlags::WALKABLE,
            false,
        );
        self.segment_colliders.insert(segment.order, id);
    }

    /// Drop the collider of an evicted segment. Unknown segments are ignored.
    pub fn remove_segment(&mut self, segment: &PathSegment) {
        if let Some(id) = self.segment_colliders.remove(&segment.order) {
            self.collision.remove(id);
        }
    }

    pub fn segment_collider_count(&self) -> usize {
        self.segment_colliders.len()
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new(SpawnPlatform::default())
    }
}
