//! Collision surfaces for ground detection.
//!
//! The runner only ever asks one question of the world: "what is directly
//! below this point?". Surfaces expose that through the [`Collidable`]
//! capability and a scene hands out the list of them per query.
//!
//! # Key Types
//!
//! - [`CollisionWorld`]: parry3d-backed store of boxes and planes
//! - [`RayHit`]: uniform record of a ray intersection
//! - [`ContentFlags`]: explicit markers deciding what is collidable

mod flags;
mod trace;
mod world;

pub use flags::{ContentFlags, ShapeKind};
pub use trace::{Collidable, CollisionScene, RayHit};
pub use world::{CollisionBrush, CollisionWorld};
