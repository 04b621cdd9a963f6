//! Ray hit records and the collidable capability.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::ContentFlags;

/// Result of a ray intersecting a collidable surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,

    /// World-space hit point.
    pub point: Vec3,

    /// Surface normal at the hit point. Points away from the surface.
    pub normal: Vec3,

    /// Identifier of the surface that was hit.
    pub surface_id: u32,

    /// Content flags of the surface that was hit.
    pub contents: ContentFlags,
}

impl RayHit {
    /// Pick the closer of two optional hits. Ties keep `self`.
    #[inline]
    pub fn nearest(current: Option<Self>, candidate: Self) -> Option<Self> {
        match current {
            Some(hit) if hit.distance <= candidate.distance => Some(hit),
            _ => Some(candidate),
        }
    }
}

/// A surface that can be tested against rays.
///
/// Supplied by whoever owns the geometry (the level, or a host scene graph).
/// Implementations must not panic; a miss is `None`.
pub trait Collidable {
    /// Whether this surface takes part in ground checks at all.
    fn is_collidable(&self) -> bool;

    /// Cast a ray against this surface.
    ///
    /// `direction` is expected to be normalized. Hits beyond `max_distance`
    /// are reported as misses.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// Source of collidable surfaces, queried once per collision check.
pub trait CollisionScene {
    /// Every surface that may currently be hit.
    fn collidables(&self) -> Vec<&dyn Collidable>;

    /// Nearest hit among all collidable surfaces.
    fn nearest_hit(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.collidables()
            .into_iter()
            .filter(|surface| surface.is_collidable())
            .filter_map(|surface| surface.cast_ray(origin, direction, max_distance))
            .fold(None, RayHit::nearest)
    }
}
