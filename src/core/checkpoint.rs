//! Practice-mode checkpoints: plain-old-data snapshots of player physics.

use crate::core::player::Player;
use crate::types::{Gamemode, SpeedClass};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkpoint {
    pub x: f64,
    pub y: f64,
    pub velocity_y: f64,
    pub gravity_sign: f64,
    pub mode: Gamemode,
    pub speed: SpeedClass,
}

impl Checkpoint {
    pub fn capture(player: &Player) -> Self {
        Self {
            x: player.x,
            y: player.y,
            velocity_y: player.velocity_y,
            gravity_sign: player.gravity_sign,
            mode: player.mode,
            speed: player.speed,
        }
    }

    /// Restore a player onto this checkpoint, clearing transient state.
    pub fn apply(&self, player: &mut Player) {
        player.reset(crate::core::player::SpawnState {
            x: self.x,
            y: self.y,
            mode: self.mode,
            speed: self.speed,
            gravity_sign: self.gravity_sign,
        });
        player.velocity_y = self.velocity_y;
    }
}
