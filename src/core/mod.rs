//! World model and physics: catalog, level grid, document I/O, player,
//! collision engine, camera and checkpoints.

pub mod camera;
pub mod catalog;
pub mod checkpoint;
pub mod collision;
pub mod document;
pub mod level;
pub mod player;

pub use camera::Camera;
pub use catalog::{CollisionEffect, HitboxKind, ObjectCatalog, ObjectType};
pub use checkpoint::Checkpoint;
pub use collision::{Collision, VerticalSide};
pub use document::{DocumentError, LevelDocument};
pub use level::{ChannelId, Level, LevelObject};
pub use player::{Player, SpawnState};
