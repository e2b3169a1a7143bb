//! Base sprite bitmaps, fixed palettes and the overlay digit font.
//!
//! Sprites are 4x4 grayscale+alpha blocks in screen orientation (row 0 =
//! top). Gray is the recolor weight: 0 draws the first resolved color, 255
//! the second. The texture cache owns every transform; nothing here mutates.

use crate::core::catalog::ObjectType;
use crate::term::fb::PixelBuffer;
use crate::types::{Gamemode, Rgb};

/// Sprite edge length in pixels; one world block.
pub const SPRITE_PX: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Object(ObjectType),
    Player(Gamemode),
}

#[derive(Debug, Clone, Copy)]
pub struct SpriteData {
    pub gray: [u8; SPRITE_PX * SPRITE_PX],
    pub alpha: [u8; SPRITE_PX * SPRITE_PX],
}

#[rustfmt::skip]
const BLOCK: SpriteData = SpriteData {
    gray: [
         30,  30,  30,  30,
         30, 220, 220,  30,
         30, 220, 220,  30,
         30,  30,  30,  30,
    ],
    alpha: [255; 16],
};

#[rustfmt::skip]
const SPIKE: SpriteData = SpriteData {
    gray: [
          0, 240, 240,   0,
          0, 180, 180,   0,
        120, 120, 120, 120,
         60,  60,  60,  60,
    ],
    alpha: [
          0, 255, 255,   0,
          0, 255, 255,   0,
        255, 255, 255, 255,
        255, 255, 255, 255,
    ],
};

#[rustfmt::skip]
const SPIKE_SHORT: SpriteData = SpriteData {
    gray: [
          0,   0,   0,   0,
          0,   0,   0,   0,
          0, 200, 200,   0,
         80,  80,  80,  80,
    ],
    alpha: [
          0,   0,   0,   0,
          0,   0,   0,   0,
          0, 255, 255,   0,
        255, 255, 255, 255,
    ],
};

#[rustfmt::skip]
const CHAIN: SpriteData = SpriteData {
    gray: [
          0, 180,   0,   0,
          0, 180, 180,   0,
          0,   0, 180,   0,
          0, 180, 180,   0,
    ],
    alpha: [
          0, 255,   0,   0,
          0, 255, 255,   0,
          0,   0, 255,   0,
          0, 255, 255,   0,
    ],
};

#[rustfmt::skip]
const ORB: SpriteData = SpriteData {
    gray: [
          0,  70,  70,   0,
         70, 240, 240,  70,
         70, 240, 240,  70,
          0,  70,  70,   0,
    ],
    alpha: [
          0, 255, 255,   0,
        255, 255, 255, 255,
        255, 255, 255, 255,
          0, 255, 255,   0,
    ],
};

#[rustfmt::skip]
const PAD: SpriteData = SpriteData {
    gray: [
          0,   0,   0,   0,
          0,   0,   0,   0,
          0, 240, 240,   0,
        140, 140, 140, 140,
    ],
    alpha: [
          0,   0,   0,   0,
          0,   0,   0,   0,
          0, 255, 255,   0,
        255, 255, 255, 255,
    ],
};

#[rustfmt::skip]
const PORTAL: SpriteData = SpriteData {
    gray: [
          0, 200, 200,   0,
        120,   0,   0, 120,
        120,   0,   0, 120,
          0, 200, 200,   0,
    ],
    alpha: [
          0, 255, 255,   0,
        255,   0,   0, 255,
        255,   0,   0, 255,
          0, 255, 255,   0,
    ],
};

#[rustfmt::skip]
const SPEED_PORTAL: SpriteData = SpriteData {
    gray: [
        200,  80,   0,   0,
          0, 200,  80,   0,
          0, 200,  80,   0,
        200,  80,   0,   0,
    ],
    alpha: [
        255, 255,   0,   0,
          0, 255, 255,   0,
          0, 255, 255,   0,
        255, 255,   0,   0,
    ],
};

#[rustfmt::skip]
const TRIGGER: SpriteData = SpriteData {
    gray: [
          0, 160, 160,   0,
        160, 255, 255, 160,
        160, 255, 255, 160,
          0, 160, 160,   0,
    ],
    alpha: [
          0, 255, 255,   0,
        255, 255, 255, 255,
        255, 255, 255, 255,
          0, 255, 255,   0,
    ],
};

#[rustfmt::skip]
const PLAYER_CUBE: SpriteData = SpriteData {
    gray: [
         20,  20,  20,  20,
         20, 230,  90,  20,
         20, 230, 230,  20,
         20,  20,  20,  20,
    ],
    alpha: [255; 16],
};

#[rustfmt::skip]
const PLAYER_SHIP: SpriteData = SpriteData {
    gray: [
          0,   0, 220,   0,
          0, 220, 120, 220,
        220, 120, 120, 120,
          0,   0,   0,   0,
    ],
    alpha: [
          0,   0, 255,   0,
          0, 255, 255, 255,
        255, 255, 255, 255,
          0,   0,   0,   0,
    ],
};

#[rustfmt::skip]
const PLAYER_BALL: SpriteData = SpriteData {
    gray: [
          0,  40,  40,   0,
         40, 230,  40,  40,
         40,  40, 230,  40,
          0,  40,  40,   0,
    ],
    alpha: [
          0, 255, 255,   0,
        255, 255, 255, 255,
        255, 255, 255, 255,
          0, 255, 255,   0,
    ],
};

#[rustfmt::skip]
const PLAYER_UFO: SpriteData = SpriteData {
    gray: [
          0, 230, 230,   0,
         60, 120, 120,  60,
        230, 230, 230, 230,
          0,   0,   0,   0,
    ],
    alpha: [
          0, 255, 255,   0,
        255, 255, 255, 255,
        255, 255, 255, 255,
          0,   0,   0,   0,
    ],
};

#[rustfmt::skip]
const PLAYER_WAVE: SpriteData = SpriteData {
    gray: [
        230, 230,   0,   0,
          0, 230, 230, 120,
          0, 230, 230, 120,
        230, 230,   0,   0,
    ],
    alpha: [
        255, 255,   0,   0,
          0, 255, 255, 255,
          0, 255, 255, 255,
        255, 255,   0,   0,
    ],
};

/// Base sprite for a renderable entity. Total over the closed id space:
/// every object type and every gamemode has pixel data.
pub fn base_sprite(id: SpriteId) -> &'static SpriteData {
    match id {
        SpriteId::Object(ty) => match ty {
            ObjectType::Block => &BLOCK,
            ObjectType::Spike => &SPIKE,
            ObjectType::SpikeShort => &SPIKE_SHORT,
            ObjectType::Chain => &CHAIN,
            ObjectType::YellowOrb
            | ObjectType::PurpleOrb
            | ObjectType::RedOrb
            | ObjectType::BlueOrb
            | ObjectType::GreenOrb
            | ObjectType::BlackOrb => &ORB,
            ObjectType::YellowPad
            | ObjectType::PurplePad
            | ObjectType::RedPad
            | ObjectType::BluePad => &PAD,
            ObjectType::GravityPortalNormal
            | ObjectType::GravityPortalReverse
            | ObjectType::PortalCube
            | ObjectType::PortalShip
            | ObjectType::PortalBall
            | ObjectType::PortalUfo
            | ObjectType::PortalWave => &PORTAL,
            ObjectType::SpeedPortalSlow
            | ObjectType::SpeedPortalNormal
            | ObjectType::SpeedPortalFast
            | ObjectType::SpeedPortalFaster
            | ObjectType::SpeedPortalFastest => &SPEED_PORTAL,
            ObjectType::ColorTrigger => &TRIGGER,
        },
        SpriteId::Player(mode) => match mode {
            Gamemode::Cube => &PLAYER_CUBE,
            Gamemode::Ship => &PLAYER_SHIP,
            Gamemode::Ball => &PLAYER_BALL,
            Gamemode::Ufo => &PLAYER_UFO,
            Gamemode::Wave => &PLAYER_WAVE,
        },
    }
}

/// Fixed color pair for objects that do not reference color channels.
pub fn object_palette(ty: ObjectType) -> (Rgb, Rgb) {
    match ty {
        ObjectType::YellowOrb | ObjectType::YellowPad => {
            (Rgb::new(120, 90, 0), Rgb::new(255, 220, 70))
        }
        ObjectType::PurpleOrb | ObjectType::PurplePad => {
            (Rgb::new(90, 30, 130), Rgb::new(210, 120, 255))
        }
        ObjectType::RedOrb | ObjectType::RedPad => (Rgb::new(130, 20, 20), Rgb::new(255, 90, 70)),
        ObjectType::BlueOrb | ObjectType::BluePad => {
            (Rgb::new(20, 60, 130), Rgb::new(90, 190, 255))
        }
        ObjectType::GreenOrb => (Rgb::new(20, 110, 40), Rgb::new(120, 255, 140)),
        ObjectType::BlackOrb => (Rgb::new(25, 25, 25), Rgb::new(150, 150, 150)),
        ObjectType::GravityPortalNormal => (Rgb::new(140, 110, 0), Rgb::new(255, 230, 110)),
        ObjectType::GravityPortalReverse => (Rgb::new(0, 80, 140), Rgb::new(110, 210, 255)),
        ObjectType::PortalCube => (Rgb::new(30, 120, 50), Rgb::new(130, 255, 160)),
        ObjectType::PortalShip => (Rgb::new(150, 40, 110), Rgb::new(255, 140, 230)),
        ObjectType::PortalBall => (Rgb::new(150, 80, 20), Rgb::new(255, 180, 90)),
        ObjectType::PortalUfo => (Rgb::new(120, 120, 20), Rgb::new(250, 250, 120)),
        ObjectType::PortalWave => (Rgb::new(20, 90, 140), Rgb::new(120, 220, 255)),
        ObjectType::SpeedPortalSlow => (Rgb::new(90, 40, 100), Rgb::new(190, 130, 210)),
        ObjectType::SpeedPortalNormal => (Rgb::new(100, 50, 110), Rgb::new(210, 140, 230)),
        ObjectType::SpeedPortalFast => (Rgb::new(110, 55, 120), Rgb::new(225, 150, 245)),
        ObjectType::SpeedPortalFaster => (Rgb::new(120, 60, 130), Rgb::new(235, 160, 250)),
        ObjectType::SpeedPortalFastest => (Rgb::new(130, 65, 140), Rgb::new(245, 170, 255)),
        // Channel-colored objects fall back to neutral when a slot is unset.
        ObjectType::Block | ObjectType::Spike | ObjectType::SpikeShort | ObjectType::Chain => {
            (Rgb::new(60, 60, 70), Rgb::new(220, 220, 230))
        }
        ObjectType::ColorTrigger => (Rgb::new(255, 255, 255), Rgb::new(200, 200, 200)),
    }
}

/// Fixed icon color pair per gamemode.
pub fn player_palette(mode: Gamemode) -> (Rgb, Rgb) {
    match mode {
        Gamemode::Cube => (Rgb::new(10, 90, 50), Rgb::new(90, 255, 160)),
        Gamemode::Ship => (Rgb::new(90, 30, 90), Rgb::new(255, 120, 240)),
        Gamemode::Ball => (Rgb::new(110, 60, 10), Rgb::new(255, 170, 60)),
        Gamemode::Ufo => (Rgb::new(20, 80, 110), Rgb::new(110, 230, 255)),
        Gamemode::Wave => (Rgb::new(10, 60, 120), Rgb::new(80, 190, 255)),
    }
}

/// 3x5 bitmap digits for the attempt counter overlay.
#[rustfmt::skip]
pub const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

pub fn draw_digit(fb: &mut PixelBuffer, x: i64, y: i64, digit: u8, color: Rgb) {
    let glyph = &DIGITS[digit as usize % 10];
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                fb.set(x + col as i64, y + row as i64, color);
            }
        }
    }
}

/// Draw `n` left-aligned at (x, y); returns the width used in pixels.
pub fn draw_number(fb: &mut PixelBuffer, x: i64, y: i64, n: u32, color: Rgb) -> i64 {
    let digits: Vec<u8> = {
        let mut v = Vec::new();
        let mut n = n;
        loop {
            v.push((n % 10) as u8);
            n /= 10;
            if n == 0 {
                break;
            }
        }
        v.reverse();
        v
    };
    let mut cx = x;
    for d in digits {
        draw_digit(fb, cx, y, d, color);
        cx += 4;
    }
    cx - x
}
