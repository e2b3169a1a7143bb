//! Terminal rendering: pixel framebuffer, sprites, texture cache, scene
//! composition and the diffing renderer.

pub mod fb;
pub mod game_view;
pub mod render_throttle;
pub mod renderer;
pub mod sprites;
pub mod texture;

pub use fb::PixelBuffer;
pub use game_view::{GameView, Scene, PX_PER_BLOCK};
pub use render_throttle::RenderThrottle;
pub use renderer::{row_dirty_span, TerminalRenderer};
pub use sprites::{SpriteId, SPRITE_PX};
pub use texture::{PixelBlock, TextureCache};
