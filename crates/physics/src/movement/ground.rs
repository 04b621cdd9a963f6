//! Ground collision resolver.
//!
//! Casts a fan of downward rays from just above the character's feet and
//! snaps the character onto the nearest collidable surface below.

use glam::Vec3;

use super::config::MovementConfig;
use super::state::CharacterMotion;
use crate::collision::{CollisionScene, RayHit};

/// Per-tick facts the resolver needs from outside the motion state.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroundContext {
    /// Seconds since the current run started.
    pub elapsed_since_start: f32,

    /// Top surface of the spawn platform, if the level has one.
    pub spawn_platform_top: Option<f32>,
}

/// Result of a ground check.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroundReport {
    /// Character is resting on a surface this tick.
    pub grounded: bool,

    /// Nearest hit among all rays, even when too far to ground on.
    pub hit: Option<RayHit>,

    /// This was the first grounding since spawn; the landing bounce was applied.
    pub landed_first_time: bool,

    /// Ungrounded and below the fall line. The owner should switch to Fall.
    pub below_fall_line: bool,

    /// Height was held up by the spawn grace window.
    pub clamped: bool,
}

/// Multi-ray ground detector.
#[derive(Debug, Clone)]
pub struct GroundResolver {
    pub config: MovementConfig,
    offsets: Vec<Vec3>,
}

impl GroundResolver {
    pub fn new(config: MovementConfig) -> Self {
        let offsets = config.ray_pattern.offsets();
        Self { config, offsets }
    }

    /// Recompute `grounded` for this tick and correct the character's height.
    ///
    /// Never fails: a scene with nothing collidable below simply leaves the
    /// character ungrounded.
    pub fn resolve<S>(
        &self,
        motion: &mut CharacterMotion,
        scene: &S,
        context: &GroundContext,
    ) -> GroundReport
    where
        S: CollisionScene + ?Sized,
    {
        if let Some(report) = self.apply_spawn_grace(motion, context) {
            return report;
        }

        let hit = self.nearest_below(motion.position, scene);
        let mut report = GroundReport {
            hit,
            ..Default::default()
        };

        match hit {
            Some(hit)
                if hit.distance < self.config.ground_snap_distance && motion.velocity.y <= 0.0 =>
            {
                motion.grounded = true;
                motion.position.y = hit.point.y + self.config.ground_buffer;
                motion.velocity.y = 0.0;

                if !motion.has_spawned {
                    motion.has_spawned = true;
                    motion.position.y += self.config.landing_bounce_height;
                    motion.velocity.y = self.config.landing_bounce_velocity;
                    report.landed_first_time = true;
                    log::debug!("first landing on surface {}", hit.surface_id);
                }
                report.grounded = true;
            }
            _ => {
                motion.grounded = false;
                report.below_fall_line = motion.position.y < self.config.fall_line();
            }
        }

        report
    }

    /// Hold the character above the spawn platform while geometry may still be loading.
    fn apply_spawn_grace(
        &self,
        motion: &mut CharacterMotion,
        context: &GroundContext,
    ) -> Option<GroundReport> {
        let top = context.spawn_platform_top?;
        if context.elapsed_since_start >= self.config.spawn_grace_duration {
            return None;
        }

        let min_height = top + self.config.spawn_clearance;
        if motion.position.y >= min_height {
            return None;
        }

        motion.position.y = min_height;
        motion.velocity.y = 0.0;
        motion.grounded = true;

        Some(GroundReport {
            grounded: true,
            clamped: true,
            ..Default::default()
        })
    }

    fn nearest_below<S>(&self, position: Vec3, scene: &S) -> Option<RayHit>
    where
        S: CollisionScene + ?Sized,
    {
        let start = position + Vec3::Y * self.config.ray_lift;

        self.offsets
            .iter()
            .filter_map(|offset| scene.nearest_hit(start + *offset, Vec3::NEG_Y, self.config.ray_length))
            .fold(None, RayHit::nearest)
    }
}

impl Default for GroundResolver {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionWorld, ContentFlags};

    fn flat_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_plane(Vec3::ZERO, 100.0, 100.0, ContentFlags::WALKABLE, true);
        world
    }

    fn spawned_at(y: f32) -> CharacterMotion {
        CharacterMotion {
            position: Vec3::new(0.0, y, 0.0),
            has_spawned: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_grounds_and_snaps_to_buffer() {
        let resolver = GroundResolver::default();
        let world = flat_world();
        let mut motion = spawned_at(0.05);
        motion.velocity.y = -1.0;

        let report = resolver.resolve(&mut motion, &world, &GroundContext::default());

        assert!(report.grounded);
        assert!(motion.grounded);
        assert!((motion.position.y - 0.2).abs() < 1e-4);
        assert_eq!(motion.velocity.y, 0.0);
        assert!(!report.landed_first_time);
    }

    #[test]
    fn test_first_landing_bounces() {
        let resolver = GroundResolver::default();
        let world = flat_world();
        let mut motion = CharacterMotion::new(Vec3::new(0.0, 0.5, 0.0));

        let report = resolver.resolve(&mut motion, &world, &GroundContext::default());

        assert!(report.landed_first_time);
        assert!(motion.has_spawned);
        assert!((motion.position.y - 0.7).abs() < 1e-4);
        assert_eq!(motion.velocity.y, 2.0);

        // Only once
        motion.position.y = 0.5;
        motion.velocity.y = 0.0;
        let report = resolver.resolve(&mut motion, &world, &GroundContext::default());
        assert!(!report.landed_first_time);
        assert!((motion.position.y - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_rising_is_not_grounded() {
        let resolver = GroundResolver::default();
        let world = flat_world();
        let mut motion = spawned_at(0.5);
        motion.velocity.y = 2.0;
        motion.grounded = true;

        let report = resolver.resolve(&mut motion, &world, &GroundContext::default());

        assert!(!report.grounded);
        assert!(!motion.grounded);
        assert!(report.hit.is_some());
    }

    #[test]
    fn test_too_far_is_not_grounded() {
        let resolver = GroundResolver::default();
        let world = flat_world();
        let mut motion = spawned_at(5.0);

        let report = resolver.resolve(&mut motion, &world, &GroundContext::default());

        assert!(!report.grounded);
        assert!((report.hit.map(|h| h.distance).unwrap_or(0.0) - 5.1).abs() < 1e-3);
        assert_eq!(motion.position.y, 5.0);
    }

    #[test]
    fn test_empty_scene_is_not_grounded() {
        let resolver = GroundResolver::default();
        let world = CollisionWorld::new();
        let mut motion = spawned_at(0.1);
        motion.grounded = true;

        let report = resolver.resolve(&mut motion, &world, &GroundContext::default());

        assert!(!report.grounded);
        assert!(report.hit.is_none());
        assert!(!report.below_fall_line);
    }

    #[test]
    fn test_below_fall_line() {
        let resolver = GroundResolver::default();
        let world = CollisionWorld::new();

        let mut motion = spawned_at(-1.5);
        let report = resolver.resolve(&mut motion, &world, &GroundContext::default());
        assert!(report.below_fall_line);

        let mut motion = spawned_at(-0.5);
        let report = resolver.resolve(&mut motion, &world, &GroundContext::default());
        assert!(!report.below_fall_line);
    }

    #[test]
    fn test_offset_ray_catches_edge() {
        let resolver = GroundResolver::default();
        let mut world = CollisionWorld::new();
        // Narrow strip only under the +x ray
        world.add_plane(Vec3::new(1.0, 0.0, 0.0), 0.5, 0.5, ContentFlags::WALKABLE, true);

        let mut motion = spawned_at(0.3);
        let report = resolver.resolve(&mut motion, &world, &GroundContext::default());

        assert!(report.grounded);
    }

    #[test]
    fn test_nearest_surface_wins() {
        let resolver = GroundResolver::default();
        let mut world = flat_world();
        let step = world.add_plane(Vec3::new(0.0, 0.4, 0.0), 4.0, 4.0, ContentFlags::WALKABLE, true);

        let mut motion = spawned_at(0.6);
        let report = resolver.resolve(&mut motion, &world, &GroundContext::default());

        assert_eq!(report.hit.map(|h| h.surface_id), Some(step));
        assert!((motion.position.y - 0.6).abs() < 1e-4);
    }

    #[test]
    fn test_decoration_is_ignored() {
        let resolver = GroundResolver::default();
        let mut world = CollisionWorld::new();
        world.add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::splat(0.5), ContentFlags::DECORATION);

        let mut motion = spawned_at(0.05);
        let report = resolver.resolve(&mut motion, &world, &GroundContext::default());

        assert!(!report.grounded);
    }

    #[test]
    fn test_spawn_grace_clamps_height() {
        let resolver = GroundResolver::default();
        let world = CollisionWorld::new();
        let context = GroundContext {
            elapsed_since_start: 1.0,
            spawn_platform_top: Some(1.0),
        };

        let mut motion = CharacterMotion::new(Vec3::new(0.0, 0.5, 0.0));
        motion.velocity.y = -10.0;
        let report = resolver.resolve(&mut motion, &world, &context);

        assert!(report.clamped);
        assert!(report.grounded);
        assert_eq!(motion.position.y, 2.0);
        assert_eq!(motion.velocity.y, 0.0);
        assert!(!motion.has_spawned);
    }

    #[test]
    fn test_spawn_grace_expires() {
        let resolver = GroundResolver::default();
        let world = CollisionWorld::new();
        let context = GroundContext {
            elapsed_since_start: 3.2,
            spawn_platform_top: Some(1.0),
        };

        let mut motion = CharacterMotion::new(Vec3::new(0.0, 0.5, 0.0));
        let report = resolver.resolve(&mut motion, &world, &context);

        assert!(!report.clamped);
        assert_eq!(motion.position.y, 0.5);
    }
}
