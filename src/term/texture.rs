//! Texture cache - memoized rotate/reflect/recolor of base sprites.
//!
//! Keys carry the *resolved* color pair, so a color-trigger recolor simply
//! produces new keys; stale entries age out via the size bound and are never
//! invalidated in place.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::core::catalog::ObjectCatalog;
use crate::core::level::{Level, LevelObject};
use crate::term::sprites::{base_sprite, object_palette, SpriteId, SPRITE_PX};
use crate::types::{Reflection, Rgb, Rotation};

/// Cache bound; past this the map is dropped wholesale. Plenty for every
/// (type, transform, palette) combination a level realistically uses.
const MAX_ENTRIES: usize = 512;

pub type TextureKey = (SpriteId, Rotation, Reflection, Rgb, Rgb);

/// A colorized, transformed sprite: RGB plus preserved alpha per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBlock {
    px: [(Rgb, u8); SPRITE_PX * SPRITE_PX],
}

impl PixelBlock {
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> (Rgb, u8) {
        self.px[y * SPRITE_PX + x]
    }
}

#[derive(Debug, Default)]
pub struct TextureCache {
    map: HashMap<TextureKey, PixelBlock>,
    recomputes: usize,
}

impl TextureCache {
    pub fn new() -> Self {
        Self { map: HashMap::new(), recomputes: 0 }
    }

    /// How many blocks were built rather than served from cache.
    pub fn recomputes(&self) -> usize {
        self.recomputes
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Transformed texture for a placed object, with its color channels
    /// resolved through the level (fixed palette for channel-less slots).
    pub fn get_for_object(
        &mut self,
        level: &Level,
        catalog: &ObjectCatalog,
        object: &LevelObject,
    ) -> &PixelBlock {
        let ty = object.object_type();
        let entry = catalog.get(ty);
        let (fallback1, fallback2) = object_palette(ty);
        let c1 = if entry.color_channels >= 1 {
            level.resolve_color(object.color1)
        } else {
            fallback1
        };
        let c2 = if entry.color_channels >= 2 {
            level.resolve_color(object.color2)
        } else {
            fallback2
        };
        self.get(SpriteId::Object(ty), object.rotation, object.reflection, c1, c2)
    }

    /// Look up (or build) the block for a fully resolved key.
    pub fn get(
        &mut self,
        id: SpriteId,
        rotation: Rotation,
        reflection: Reflection,
        color1: Rgb,
        color2: Rgb,
    ) -> &PixelBlock {
        if self.map.len() >= MAX_ENTRIES {
            self.map.clear();
        }
        let key = (id, rotation, reflection, color1, color2);
        match self.map.entry(key) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(v) => {
                self.recomputes += 1;
                v.insert(build_block(id, rotation, reflection, color1, color2))
            }
        }
    }
}

/// Apply reflection, then rotation, then recolor the base sprite. Pure: the
/// base data is never touched.
fn build_block(
    id: SpriteId,
    rotation: Rotation,
    reflection: Reflection,
    color1: Rgb,
    color2: Rgb,
) -> PixelBlock {
    let base = base_sprite(id);
    let n = SPRITE_PX;
    let mut px = [(Rgb::default(), 0u8); SPRITE_PX * SPRITE_PX];

    for sy in 0..n {
        for sx in 0..n {
            // Reflection first.
            let mut x = if reflection.flips_x() { n - 1 - sx } else { sx };
            let mut y = if reflection.flips_y() { n - 1 - sy } else { sy };
            // Then clockwise quarter turns (screen coordinates, y down).
            for _ in 0..rotation.quarter_turns() {
                let (nx, ny) = (n - 1 - y, x);
                x = nx;
                y = ny;
            }

            let src = sy * n + sx;
            let gray = base.gray[src];
            let alpha = base.alpha[src];
            let color = color1.lerp(color2, gray as f64 / 255.0);
            px[y * n + x] = (color, alpha);
        }
    }

    PixelBlock { px }
}
