//! GameView: maps world state into the pixel framebuffer.
//!
//! This module is pure (no I/O). It rebuilds the whole frame every call;
//! the renderer's differ decides what actually reaches the terminal.

use crate::core::camera::Camera;
use crate::core::catalog::{ObjectCatalog, ObjectType};
use crate::core::checkpoint::Checkpoint;
use crate::core::level::{ChannelId, Level};
use crate::core::player::Player;
use crate::term::fb::PixelBuffer;
use crate::term::sprites::{draw_number, player_palette, SpriteId, SPRITE_PX};
use crate::term::texture::TextureCache;
use crate::types::{Gamemode, Reflection, Rgb, Rotation};

/// Pixels per world block on both axes.
pub const PX_PER_BLOCK: i64 = SPRITE_PX as i64;

const PROGRESS_FILL: Rgb = Rgb::new(120, 255, 150);
const PROGRESS_TRACK: Rgb = Rgb::new(45, 45, 55);
const OVERLAY_TEXT: Rgb = Rgb::new(245, 245, 245);
const CHECKPOINT_MARK: Rgb = Rgb::new(110, 255, 130);
const PRACTICE_MARK: Rgb = Rgb::new(110, 220, 255);
const DIM_FACTOR: f64 = 0.45;

/// Everything one frame needs to read. Borrowed immutably from the session
/// so rendering can never mutate world state.
pub struct Scene<'a> {
    pub level: &'a Level,
    pub catalog: &'a ObjectCatalog,
    pub player: &'a Player,
    pub camera: &'a Camera,
    pub checkpoints: &'a [Checkpoint],
    pub attempts: u32,
    pub percent: f64,
    pub practice: bool,
    /// Paused/crashed frames render dimmed.
    pub dimmed: bool,
}

pub struct GameView {
    cache: TextureCache,
}

impl GameView {
    pub fn new() -> Self {
        Self { cache: TextureCache::new() }
    }

    pub fn texture_cache(&self) -> &TextureCache {
        &self.cache
    }

    /// Compose a full frame into `fb`.
    pub fn render_into(&mut self, scene: &Scene<'_>, fb: &mut PixelBuffer) {
        fb.clear(scene.level.resolve_color(Some(ChannelId::Bg)));
        self.draw_ground(scene, fb);
        self.draw_grid(scene, fb);
        self.draw_trail(scene, fb);
        self.draw_player(scene, fb);

        if scene.dimmed {
            fb.fade(DIM_FACTOR);
        }

        self.draw_overlays(scene, fb);
    }

    fn px_x(cam: &Camera, wx: f64) -> i64 {
        ((wx - cam.left) * PX_PER_BLOCK as f64).floor() as i64
    }

    /// Screen row of the *top* edge of something whose top sits at world
    /// `wy` (screen y grows downward).
    fn px_y_top(cam: &Camera, fb: &PixelBuffer, wy: f64) -> i64 {
        fb.height() as i64 - ((wy - cam.bottom) * PX_PER_BLOCK as f64).floor() as i64
    }

    fn draw_ground(&mut self, scene: &Scene<'_>, fb: &mut PixelBuffer) {
        let ground = scene.level.resolve_color(Some(ChannelId::Grnd));
        let top = Self::px_y_top(scene.camera, fb, 0.0);
        if top < fb.height() as i64 {
            fb.fill_rect(0, top, fb.width() as i64, fb.height() as i64 - top, ground);
            // Surface line reads slightly brighter.
            let line = ground.lerp(Rgb::new(255, 255, 255), 0.35);
            fb.fill_rect(0, top, fb.width() as i64, 1, line);
        }
    }

    fn draw_grid(&mut self, scene: &Scene<'_>, fb: &mut PixelBuffer) {
        let cam = scene.camera;
        let w_blocks = fb.width() as f64 / PX_PER_BLOCK as f64;
        let h_blocks = fb.height() as f64 / PX_PER_BLOCK as f64;

        let x0 = cam.left.floor().max(0.0) as usize;
        let x1 = ((cam.left + w_blocks).ceil() as i64).min(scene.level.width() as i64 - 1);
        let y0 = cam.bottom.floor().max(0.0) as usize;
        let y1 = ((cam.bottom + h_blocks).ceil() as i64).min(scene.level.height() as i64 - 1);

        if x1 < 0 || y1 < 0 {
            return;
        }

        for cy in y0..=y1 as usize {
            for cx in x0..=x1 as usize {
                let Some(obj) = scene.level.object_at(cx, cy) else {
                    continue;
                };
                // Triggers act through the queue and stay invisible in play.
                if obj.object_type() == ObjectType::ColorTrigger {
                    continue;
                }
                let block = *self.cache.get_for_object(scene.level, scene.catalog, obj);
                let sx = Self::px_x(cam, cx as f64);
                let sy = Self::px_y_top(cam, fb, cy as f64 + 1.0);
                blit_block(fb, sx, sy, &block);
            }
        }
    }

    fn draw_player(&mut self, scene: &Scene<'_>, fb: &mut PixelBuffer) {
        let player = scene.player;
        let (c1, c2) = player_palette(player.mode);
        let reflection = if player.gravity_sign < 0.0 {
            Reflection::Vertical
        } else {
            Reflection::None
        };
        let block = *self.cache.get(
            SpriteId::Player(player.mode),
            Rotation::Up,
            reflection,
            c1,
            c2,
        );
        let sx = Self::px_x(scene.camera, player.x);
        let sy = Self::px_y_top(scene.camera, fb, player.y + 1.0);
        blit_block(fb, sx, sy, &block);
    }

    fn draw_trail(&mut self, scene: &Scene<'_>, fb: &mut PixelBuffer) {
        if scene.player.mode != Gamemode::Wave || scene.player.trail.is_empty() {
            return;
        }
        let (_, bright) = player_palette(Gamemode::Wave);
        let cam = scene.camera;
        let center = |&(wx, wy): &(f64, f64)| {
            (
                Self::px_x(cam, wx + 0.5),
                Self::px_y_top(cam, fb, wy + 0.5),
            )
        };

        let mut points: Vec<(i64, i64)> = scene.player.trail.iter().map(center).collect();
        points.push(center(&(scene.player.x, scene.player.y)));
        for pair in points.windows(2) {
            fb.line(pair[0].0, pair[0].1, pair[1].0, pair[1].1, bright);
        }
    }

    fn draw_overlays(&mut self, scene: &Scene<'_>, fb: &mut PixelBuffer) {
        let width = fb.width() as i64;

        // Progress bar across the top edge.
        let filled = ((scene.percent / 100.0).clamp(0.0, 1.0) * width as f64) as i64;
        fb.fill_rect(0, 0, width, 2, PROGRESS_TRACK);
        fb.fill_rect(0, 0, filled, 2, PROGRESS_FILL);

        // Attempt counter.
        draw_number(fb, 2, 4, scene.attempts, OVERLAY_TEXT);

        // Practice-mode marker in the top-right corner.
        if scene.practice {
            fb.fill_rect(width - 5, 4, 3, 3, PRACTICE_MARK);
        }

        // Checkpoint diamonds at their world positions.
        for cp in scene.checkpoints {
            let sx = Self::px_x(scene.camera, cp.x + 0.5);
            let sy = Self::px_y_top(scene.camera, fb, cp.y + 0.5);
            fb.set(sx, sy - 1, CHECKPOINT_MARK);
            fb.set(sx - 1, sy, CHECKPOINT_MARK);
            fb.set(sx + 1, sy, CHECKPOINT_MARK);
            fb.set(sx, sy + 1, CHECKPOINT_MARK);
        }
    }
}

impl Default for GameView {
    fn default() -> Self {
        Self::new()
    }
}

fn blit_block(fb: &mut PixelBuffer, sx: i64, sy: i64, block: &crate::term::texture::PixelBlock) {
    for py in 0..SPRITE_PX {
        for px in 0..SPRITE_PX {
            let (color, alpha) = block.at(px, py);
            fb.blend(sx + px as i64, sy + py as i64, color, alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::ObjectCatalog;
    use crate::core::level::{Level, LevelObject};
    use crate::core::player::{Player, SpawnState};
    use crate::types::SpeedClass;

    fn scene_fixture(level: &Level, catalog: &ObjectCatalog, player: &Player, camera: &Camera) -> PixelBuffer {
        let scene = Scene {
            level,
            catalog,
            player,
            camera,
            checkpoints: &[],
            attempts: 3,
            percent: 50.0,
            practice: false,
            dimmed: false,
        };
        let mut view = GameView::new();
        let mut fb = PixelBuffer::new(80, 48);
        view.render_into(&scene, &mut fb);
        fb
    }

    fn player_at(x: f64, y: f64) -> Player {
        Player::new(SpawnState {
            x,
            y,
            mode: Gamemode::Cube,
            speed: SpeedClass::Normal,
            gravity_sign: 1.0,
        })
    }

    #[test]
    fn background_fills_with_bg_channel() {
        let mut level = Level::new(30, 12);
        level.set_channel_color(ChannelId::Bg, Rgb::new(10, 20, 30));
        let catalog = ObjectCatalog::new();
        let player = player_at(5.0, 5.0);
        let mut camera = Camera::new();
        camera.reset(5.0, 5.0, 12.0);

        let fb = scene_fixture(&level, &catalog, &player, &camera);
        // A pixel away from ground/overlays/player shows the background.
        assert_eq!(fb.get(70, 10), Rgb::new(10, 20, 30));
    }

    #[test]
    fn progress_bar_fills_half_the_width_at_fifty_percent() {
        let level = Level::new(30, 12);
        let catalog = ObjectCatalog::new();
        let player = player_at(5.0, 5.0);
        let camera = Camera::new();

        let fb = scene_fixture(&level, &catalog, &player, &camera);
        assert_eq!(fb.get(0, 0), PROGRESS_FILL);
        assert_eq!(fb.get(39, 0), PROGRESS_FILL);
        assert_eq!(fb.get(41, 0), PROGRESS_TRACK);
    }

    #[test]
    fn visible_block_lands_at_its_projected_pixels() {
        let mut level = Level::new(60, 12);
        let mut obj = LevelObject::new(crate::core::catalog::ObjectType::Block);
        obj.color1 = Some(ChannelId::Index(1));
        level.set_channel_color(ChannelId::Index(1), Rgb::new(200, 0, 0));
        level.set_object_at(8, 0, Some(obj));
        level.set_channel_color(ChannelId::Bg, Rgb::new(0, 0, 0));

        let catalog = ObjectCatalog::new();
        let player = player_at(5.0, 5.0);
        let mut camera = Camera::new();
        camera.reset(5.0, 0.0, 12.0);

        // Camera: left = 0, bottom = -2. The block cell (8, 0) projects to
        // pixel columns 32..35, rows 36..39.
        let fb = scene_fixture(&level, &catalog, &player, &camera);
        assert_ne!(fb.get(33, 37), Rgb::new(0, 0, 0), "block pixel painted");
        assert_eq!(fb.get(33, 30), Rgb::new(0, 0, 0), "above the block is sky");

        // Ground strip occupies everything below world y = 0 (row 40 down).
        let ground = level.resolve_color(Some(ChannelId::Grnd));
        assert_eq!(fb.get(70, 44), ground);
    }
}
