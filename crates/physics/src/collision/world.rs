//! Collision world containing the spawn platform and track colliders.
//!
//! Surfaces are added and removed as the track grows and is pruned, so every
//! brush keeps a stable id that the owner can hand back to [`CollisionWorld::remove`].

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{Ray, RayCast};
use parry3d::shape::SharedShape;

use super::flags::{self, ContentFlags, ShapeKind};
use super::trace::{Collidable, CollisionScene, RayHit};

/// Half thickness given to plane colliders so rays starting on them still hit.
const PLANE_HALF_THICKNESS: f32 = 0.05;

/// A piece of collision geometry in the world.
#[derive(Debug, Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: u32,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position in world space.
    pub transform: Isometry<Real>,
    /// Explicit content markers.
    pub contents: ContentFlags,
    /// Geometry type, for the unmarked fallback.
    pub kind: ShapeKind,
    /// Whether the surface is rendered. Invisible surfaces are collision proxies.
    pub visible: bool,
}

impl Collidable for CollisionBrush {
    fn is_collidable(&self) -> bool {
        flags::is_collidable(self.contents, self.kind, self.visible)
    }

    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(direction.x, direction.y, direction.z),
        );

        let distance = self.shape.cast_ray(&self.transform, &ray, max_distance, true)?;
        if distance > max_distance {
            return None;
        }

        let normal = self
            .shape
            .cast_ray_and_get_normal(&self.transform, &ray, max_distance, true)
            .map(|intersection| {
                Vec3::new(intersection.normal.x, intersection.normal.y, intersection.normal.z)
            })
            .unwrap_or(-direction);

        let hit_point = ray.point_at(distance);
        Some(RayHit {
            distance,
            point: Vec3::new(hit_point.x, hit_point.y, hit_point.z),
            normal,
            surface_id: self.id,
            contents: self.contents,
        })
    }
}

/// The collision world containing all ground geometry.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `contents` - Content markers for collision filtering
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> u32 {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::translation(center.x, center.y, center.z);
        self.push(shape, transform, contents, ShapeKind::Box, true)
    }

    /// Add a horizontal rectangle whose top surface lies at `center.y`.
    ///
    /// `width` spans the x axis and `length` spans the z axis.
    pub fn add_plane(
        &mut self,
        center: Vec3,
        width: f32,
        length: f32,
        contents: ContentFlags,
        visible: bool,
    ) -> u32 {
        let shape = SharedShape::cuboid(width / 2.0, PLANE_HALF_THICKNESS, length / 2.0);
        let transform =
            Isometry::translation(center.x, center.y - PLANE_HALF_THICKNESS, center.z);
        self.push(shape, transform, contents, ShapeKind::Plane, visible)
    }

    /// Remove a brush by id. Returns whether it existed.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.brushes.len();
        self.brushes.retain(|brush| brush.id != id);
        self.brushes.len() != before
    }

    /// Remove all collision geometry.
    pub fn clear(&mut self) {
        self.brushes.clear();
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Look up a brush by id.
    pub fn brush(&self, id: u32) -> Option<&CollisionBrush> {
        self.brushes.iter().find(|brush| brush.id == id)
    }

    /// Cast a ray and return the nearest collidable hit.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir.length_squared() < 0.5 {
            return None;
        }
        self.nearest_hit(origin, dir, max_distance)
    }

    fn push(
        &mut self,
        shape: SharedShape,
        transform: Isometry<Real>,
        contents: ContentFlags,
        kind: ShapeKind,
        visible: bool,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            contents,
            kind,
            visible,
        });

        id
    }
}

impl CollisionScene for CollisionWorld {
    fn collidables(&self) -> Vec<&dyn Collidable> {
        self.brushes
            .iter()
            .map(|brush| brush as &dyn Collidable)
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
