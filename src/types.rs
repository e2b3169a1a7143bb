//! Core types shared across the application
//! This module contains pure data types with no external dependencies

/// Player hitbox edge length in blocks.
pub const PLAYER_SIZE: f64 = 1.0;

/// Horizontal travel at `SpeedClass::Normal`, in blocks per second.
pub const BASE_SPEED: f64 = 10.4;

/// Vertical acceleration magnitude (blocks/s²).
pub const GRAVITY_ACCEL: f64 = 65.0;

/// Vertical envelope for cube-style modes (cube, ufo, ball).
pub const CUBE_TERMINAL_VELOCITY: f64 = 26.0;
pub const CUBE_JUMP_VELOCITY: f64 = 20.0;
pub const UFO_JUMP_VELOCITY: f64 = 16.0;

/// Ship control acceleration and envelope.
pub const SHIP_ACCEL: f64 = 32.0;
pub const SHIP_TERMINAL_VELOCITY: f64 = 13.0;

/// Fixed wave climb/dive rate (no gravity in wave mode).
pub const WAVE_RATE: f64 = 10.4;

/// Top face of a solid hitbox, measured from its cell origin.
pub const SOLID_TOP: f64 = 0.9;

/// Landing leniency at the faces of a solid hitbox.
pub const LENIENCY: f64 = 0.2;

/// Neighborhood padding around the player hitbox for collision scans.
pub const SCAN_PADDING: f64 = 0.25;

/// Blocks past the last column before an attempt counts as complete.
pub const END_PADDING: f64 = 10.0;

/// Camera follows this many blocks behind the player.
pub const CAMERA_BACK: f64 = 5.0;
/// How far below the world floor the camera may sink (keeps a ground strip
/// in view).
pub const CAMERA_GROUND_MARGIN: f64 = 2.0;
/// Vertical hysteresis band, as fractions of the viewport height.
pub const CAMERA_BAND_LOW: f64 = 0.25;
pub const CAMERA_BAND_HIGH: f64 = 0.75;

/// Game timing constants (in milliseconds)
pub const PHYSICS_TICK_MS: u64 = 4;
pub const RENDER_TICK_MS: u64 = 33;
pub const RESPAWN_COOLDOWN_MS: u64 = 1000;
pub const AUTO_CHECKPOINT_MS: u64 = 2500;
pub const EARLY_CRASH_WINDOW_MS: u64 = 2000;

/// Jump-strength multiplier table (orb/pad family), relative to
/// `CUBE_JUMP_VELOCITY`. Negative = directed with gravity (slam).
pub const YELLOW_ORB_MULT: f64 = 1.0;
pub const PURPLE_ORB_MULT: f64 = 0.62;
pub const RED_ORB_MULT: f64 = 1.26;
pub const GREEN_ORB_MULT: f64 = 1.0;
pub const BLACK_ORB_MULT: f64 = -1.3;
pub const YELLOW_PAD_MULT: f64 = 1.37;
pub const PURPLE_PAD_MULT: f64 = 0.72;
pub const RED_PAD_MULT: f64 = 1.77;

/// Speed-class multipliers over `BASE_SPEED`, slow → fastest.
pub const SPEED_MULTIPLIERS: [f64; 5] = [0.81, 1.0, 1.24, 1.52, 1.85];

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation toward `other`; `t` is clamped to [0, 1].
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

/// Player movement behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gamemode {
    Cube,
    Ship,
    Ball,
    Ufo,
    Wave,
}

impl Gamemode {
    /// Parse from the document/effect vocabulary name.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "cube" => Some(Gamemode::Cube),
            "ship" => Some(Gamemode::Ship),
            "ball" => Some(Gamemode::Ball),
            "ufo" => Some(Gamemode::Ufo),
            "wave" => Some(Gamemode::Wave),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gamemode::Cube => "cube",
            Gamemode::Ship => "ship",
            Gamemode::Ball => "ball",
            Gamemode::Ufo => "ufo",
            Gamemode::Wave => "wave",
        }
    }
}

/// Horizontal speed classes (applied by speed portals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedClass {
    Slow,
    Normal,
    Fast,
    Faster,
    Fastest,
}

impl SpeedClass {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "slow" => Some(SpeedClass::Slow),
            "normal" => Some(SpeedClass::Normal),
            "fast" => Some(SpeedClass::Fast),
            "faster" => Some(SpeedClass::Faster),
            "fastest" => Some(SpeedClass::Fastest),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpeedClass::Slow => "slow",
            SpeedClass::Normal => "normal",
            SpeedClass::Fast => "fast",
            SpeedClass::Faster => "faster",
            SpeedClass::Fastest => "fastest",
        }
    }

    /// Horizontal speed in blocks per second.
    pub fn blocks_per_sec(&self) -> f64 {
        let idx = match self {
            SpeedClass::Slow => 0,
            SpeedClass::Normal => 1,
            SpeedClass::Fast => 2,
            SpeedClass::Faster => 3,
            SpeedClass::Fastest => 4,
        };
        BASE_SPEED * SPEED_MULTIPLIERS[idx]
    }
}

/// Object orientation on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    Up,
    Right,
    Down,
    Left,
}

impl Rotation {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Rotation::Up),
            "right" => Some(Rotation::Right),
            "down" => Some(Rotation::Down),
            "left" => Some(Rotation::Left),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rotation::Up => "up",
            Rotation::Right => "right",
            Rotation::Down => "down",
            Rotation::Left => "left",
        }
    }

    /// Quarter turns clockwise from `Up`.
    pub fn quarter_turns(&self) -> usize {
        match self {
            Rotation::Up => 0,
            Rotation::Right => 1,
            Rotation::Down => 2,
            Rotation::Left => 3,
        }
    }
}

/// Object mirroring, applied before rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reflection {
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Reflection {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Reflection::None),
            "horizontal" => Some(Reflection::Horizontal),
            "vertical" => Some(Reflection::Vertical),
            "both" => Some(Reflection::Both),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Reflection::None => "none",
            Reflection::Horizontal => "horizontal",
            Reflection::Vertical => "vertical",
            Reflection::Both => "both",
        }
    }

    pub fn flips_x(&self) -> bool {
        matches!(self, Reflection::Horizontal | Reflection::Both)
    }

    pub fn flips_y(&self) -> bool {
        matches!(self, Reflection::Vertical | Reflection::Both)
    }
}

/// Discrete input events consumed by the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    Jump,
    Pause,
    CheckpointAdd,
    CheckpointRemove,
    TogglePractice,
    Restart,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamemode_names_round_trip() {
        for mode in [
            Gamemode::Cube,
            Gamemode::Ship,
            Gamemode::Ball,
            Gamemode::Ufo,
            Gamemode::Wave,
        ] {
            assert_eq!(Gamemode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(Gamemode::from_name("spider"), None);
    }

    #[test]
    fn speed_classes_are_monotonic() {
        let mut last = 0.0;
        for class in [
            SpeedClass::Slow,
            SpeedClass::Normal,
            SpeedClass::Fast,
            SpeedClass::Faster,
            SpeedClass::Fastest,
        ] {
            assert!(class.blocks_per_sec() > last);
            last = class.blocks_per_sec();
        }
    }

    #[test]
    fn rgb_lerp_endpoints() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(255, 100, 10);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 2.0), b);
    }
}
