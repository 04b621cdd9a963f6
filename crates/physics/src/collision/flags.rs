//! Content flags and shape kinds for collision filtering.
//!
//! Surfaces carrying an explicit marker are classified by that marker alone.
//! Unmarked surfaces fall back to a shape heuristic: boxes, planes and
//! invisible helpers are treated as ground, arbitrary meshes are not.

use serde::{Deserialize, Serialize};

/// Content flags describe what a surface is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Unmarked. Collidability is decided by [`ShapeKind`].
    pub const EMPTY: Self = Self(0);

    /// Solid world geometry such as the spawn platform.
    pub const SOLID: Self = Self(1 << 0);

    /// Walkable track surface laid down by the path generator.
    pub const WALKABLE: Self = Self(1 << 1);

    /// Visual-only geometry. Never collidable.
    pub const DECORATION: Self = Self(1 << 2);

    /// Everything the character can stand on.
    pub const MASK_GROUND: Self = Self(Self::SOLID.0 | Self::WALKABLE.0);

    /// Check if these flags contain a specific flag.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given flags are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Check if no flags are set.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Geometry type of a surface, used by the fallback heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Axis-aligned box.
    Box,
    /// Flat horizontal rectangle.
    Plane,
    /// Anything else (character meshes, props).
    Mesh,
}

impl ShapeKind {
    /// Whether an unmarked surface of this kind counts as ground.
    #[inline]
    pub fn is_ground_like(self) -> bool {
        matches!(self, Self::Box | Self::Plane)
    }
}

/// Decide whether a surface participates in ground checks.
pub fn is_collidable(contents: ContentFlags, kind: ShapeKind, visible: bool) -> bool {
    if contents.intersects(ContentFlags::MASK_GROUND) {
        return true;
    }
    if contents.contains(ContentFlags::DECORATION) {
        return false;
    }
    !visible || kind.is_ground_like()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_marker_wins() {
        assert!(is_collidable(ContentFlags::SOLID, ShapeKind::Mesh, true));
        assert!(is_collidable(ContentFlags::WALKABLE, ShapeKind::Mesh, true));
        assert!(!is_collidable(ContentFlags::DECORATION, ShapeKind::Box, true));
    }

    #[test]
    fn test_heuristic_fallback() {
        assert!(is_collidable(ContentFlags::EMPTY, ShapeKind::Box, true));
        assert!(is_collidable(ContentFlags::EMPTY, ShapeKind::Plane, true));
        assert!(!is_collidable(ContentFlags::EMPTY, ShapeKind::Mesh, true));
        // Invisible helpers are collision proxies
        assert!(is_collidable(ContentFlags::EMPTY, ShapeKind::Mesh, false));
    }

    #[test]
    fn test_mask_ground() {
        assert!(ContentFlags::MASK_GROUND.contains(ContentFlags::SOLID));
        assert!(ContentFlags::MASK_GROUND.contains(ContentFlags::WALKABLE));
        assert!(!ContentFlags::MASK_GROUND.intersects(ContentFlags::DECORATION));
        assert_eq!(
            ContentFlags::SOLID | ContentFlags::WALKABLE,
            ContentFlags::MASK_GROUND
        );
    }
}
