//! Collision engine
//!
//! Scans the grid neighborhood around the player hitbox into an ordered list
//! of `Collision` records, executes collision effects, and answers the
//! bounded directional nearest-solid queries used by ground catch.

use arrayvec::ArrayVec;

use crate::core::catalog::{CollisionEffect, HitboxKind, ObjectCatalog, OrbKind, PadKind};
use crate::core::level::Level;
use crate::core::player::Player;
use crate::types::{
    BLACK_ORB_MULT, CUBE_JUMP_VELOCITY, GREEN_ORB_MULT, LENIENCY, PLAYER_SIZE, PURPLE_ORB_MULT,
    PURPLE_PAD_MULT, RED_ORB_MULT, RED_PAD_MULT, SCAN_PADDING, YELLOW_ORB_MULT, YELLOW_PAD_MULT,
};

/// Upper bound on collisions a single tick can produce. The scan window is
/// a padded 1x1 hitbox, so the real count stays far below this.
pub const MAX_COLLISIONS: usize = 24;

const EPS: f64 = 1e-9;
const VELOCITY_EPS: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalSide {
    Top,
    Bottom,
}

/// One contact record. Ephemeral: created and consumed within a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub x: usize,
    pub y: usize,
    pub side: Option<VerticalSide>,
    /// World y of the contacted face (solids with a side only).
    pub surface_y: Option<f64>,
}

/// Inclusive grid column range spanned by a hitbox at `px`.
pub fn spanned_columns(px: f64) -> (i64, i64) {
    let lo = px.floor() as i64;
    let hi = (px + PLAYER_SIZE - EPS).floor() as i64;
    (lo, hi)
}

/// Scan the padded neighborhood of the player hitbox at (`px`, `py`).
///
/// Deterministic: cells are visited bottom-up then left-to-right, and a solid
/// contributes at most one record (top, bottom, or an unqualified crash
/// overlap - the three cases are mutually exclusive).
pub fn generate_collisions(
    level: &Level,
    catalog: &ObjectCatalog,
    px: f64,
    py: f64,
) -> ArrayVec<Collision, MAX_COLLISIONS> {
    let mut out = ArrayVec::new();

    let x_lo = ((px - SCAN_PADDING).floor() as i64).max(0);
    let x_hi = ((px + PLAYER_SIZE + SCAN_PADDING).floor() as i64).min(level.width() as i64 - 1);
    let y_lo = ((py - SCAN_PADDING).floor() as i64).max(0);
    let y_hi = ((py + PLAYER_SIZE + SCAN_PADDING).floor() as i64).min(level.height() as i64 - 1);

    for cy in y_lo..=y_hi {
        for cx in x_lo..=x_hi {
            let (cx, cy) = (cx as usize, cy as usize);
            let Some(obj) = level.object_at(cx, cy) else {
                continue;
            };
            let entry = catalog.get(obj.object_type());
            if entry.hitbox_kind == HitboxKind::None {
                continue;
            }

            let hx0 = cx as f64 + entry.hitbox.x0;
            let hx1 = cx as f64 + entry.hitbox.x1;
            let hy0 = cy as f64 + entry.hitbox.y0;
            let hy1 = cy as f64 + entry.hitbox.y1;

            // Horizontal gate: open interval on both sides.
            if !(px < hx1 && px + PLAYER_SIZE > hx0) {
                continue;
            }

            let p_bot = py;
            let p_top = py + PLAYER_SIZE;

            let record = match entry.hitbox_kind {
                HitboxKind::AnyTouch => {
                    if p_bot < hy1 && p_top > hy0 {
                        Some(Collision { x: cx, y: cy, side: None, surface_y: None })
                    } else {
                        None
                    }
                }
                HitboxKind::Solid => {
                    if p_bot >= hy1 - LENIENCY && p_bot <= hy1 {
                        Some(Collision {
                            x: cx,
                            y: cy,
                            side: Some(VerticalSide::Top),
                            surface_y: Some(hy1),
                        })
                    } else if p_top >= hy0 && p_top <= hy0 + LENIENCY {
                        Some(Collision {
                            x: cx,
                            y: cy,
                            side: Some(VerticalSide::Bottom),
                            surface_y: Some(hy0),
                        })
                    } else if p_bot < hy1 && p_top > hy0 {
                        Some(Collision { x: cx, y: cy, side: None, surface_y: None })
                    } else {
                        None
                    }
                }
                HitboxKind::None => None,
            };

            if let Some(c) = record {
                let _ = out.try_push(c);
            }
        }
    }

    out
}

/// Nearest solid top face at or below `from_y`, searched over at most
/// `max_rows` rows under the hitbox columns at `px`. Nearest row wins;
/// within a row, the leftmost column.
pub fn highest_solid_beneath(
    level: &Level,
    catalog: &ObjectCatalog,
    px: f64,
    from_y: f64,
    max_rows: usize,
) -> Option<f64> {
    let (c0, c1) = spanned_columns(px);
    let start = from_y.floor() as i64;

    for row in (start - max_rows as i64..=start).rev() {
        if row < 0 || row >= level.height() as i64 {
            continue;
        }
        for col in c0.max(0)..=c1.min(level.width() as i64 - 1) {
            if let Some(top) = solid_face(level, catalog, col, row, px, Face::Top) {
                if top <= from_y + EPS {
                    return Some(top);
                }
            }
        }
    }
    None
}

/// Nearest solid underside at or above `from_top_y` (the hitbox top edge),
/// mirror of `highest_solid_beneath` for reverse-gravity / upward travel.
pub fn lowest_solid_above(
    level: &Level,
    catalog: &ObjectCatalog,
    px: f64,
    from_top_y: f64,
    max_rows: usize,
) -> Option<f64> {
    let (c0, c1) = spanned_columns(px);
    let start = from_top_y.floor() as i64;

    for row in start..=start + max_rows as i64 {
        if row < 0 || row >= level.height() as i64 {
            continue;
        }
        for col in c0.max(0)..=c1.min(level.width() as i64 - 1) {
            if let Some(bottom) = solid_face(level, catalog, col, row, px, Face::Bottom) {
                if bottom >= from_top_y - EPS {
                    return Some(bottom);
                }
            }
        }
    }
    None
}

enum Face {
    Top,
    Bottom,
}

fn solid_face(
    level: &Level,
    catalog: &ObjectCatalog,
    col: i64,
    row: i64,
    px: f64,
    face: Face,
) -> Option<f64> {
    let obj = level.object_at(col as usize, row as usize)?;
    let entry = catalog.get(obj.object_type());
    if entry.hitbox_kind != HitboxKind::Solid {
        return None;
    }
    let hx0 = col as f64 + entry.hitbox.x0;
    let hx1 = col as f64 + entry.hitbox.x1;
    if !(px < hx1 && px + PLAYER_SIZE > hx0) {
        return None;
    }
    Some(match face {
        Face::Top => row as f64 + entry.hitbox.y1,
        Face::Bottom => row as f64 + entry.hitbox.y0,
    })
}

/// Execute the effect attached to one collision.
///
/// Sided collisions never dispatch catalog effects: mode tick functions
/// handle glide-landing directly, so the only thing left to check is a crash
/// against a face the current gravity sign cannot land on. Callers are
/// responsible for activation gating (`requires_click`, `activated`,
/// `multi_activate`).
pub fn run_collision_effect(
    c: &Collision,
    level: &mut Level,
    catalog: &ObjectCatalog,
    player: &mut Player,
) {
    if let Some(side) = c.side {
        match side {
            VerticalSide::Bottom if player.gravity_sign > 0.0 => {
                if player.velocity_y > VELOCITY_EPS {
                    player.crashed = true;
                }
            }
            VerticalSide::Top if player.gravity_sign < 0.0 => {
                if player.velocity_y < -VELOCITY_EPS {
                    player.crashed = true;
                }
            }
            _ => {}
        }
        return;
    }

    let Some(obj) = level.object_at(c.x, c.y) else {
        return;
    };
    let entry = catalog.get(obj.object_type());
    let Some(effect) = entry.effect else {
        return;
    };

    match effect {
        CollisionEffect::CrashBlock | CollisionEffect::CrashObstacle => {
            player.crashed = true;
            return;
        }
        CollisionEffect::GravityNormal => player.gravity_sign = 1.0,
        CollisionEffect::GravityReverse => player.gravity_sign = -1.0,
        CollisionEffect::Orb(kind) => apply_orb(kind, player),
        CollisionEffect::Pad(kind) => apply_pad(kind, player),
        CollisionEffect::Gamemode(mode) => player.change_mode(mode),
        CollisionEffect::Speed(class) => player.speed = class,
    }
    level.mark_activated(c.x, c.y);
}

fn apply_orb(kind: OrbKind, player: &mut Player) {
    let sign = player.gravity_sign;
    match kind {
        OrbKind::Yellow => player.velocity_y = CUBE_JUMP_VELOCITY * YELLOW_ORB_MULT * sign,
        OrbKind::Purple => player.velocity_y = CUBE_JUMP_VELOCITY * PURPLE_ORB_MULT * sign,
        OrbKind::Red => player.velocity_y = CUBE_JUMP_VELOCITY * RED_ORB_MULT * sign,
        OrbKind::Blue => player.gravity_sign = -sign,
        OrbKind::Green => {
            player.gravity_sign = -sign;
            player.velocity_y = CUBE_JUMP_VELOCITY * GREEN_ORB_MULT * -sign;
        }
        OrbKind::Black => player.velocity_y = CUBE_JUMP_VELOCITY * BLACK_ORB_MULT * sign,
    }
    player.in_air = true;
}

fn apply_pad(kind: PadKind, player: &mut Player) {
    let sign = player.gravity_sign;
    match kind {
        PadKind::Yellow => player.velocity_y = CUBE_JUMP_VELOCITY * YELLOW_PAD_MULT * sign,
        PadKind::Purple => player.velocity_y = CUBE_JUMP_VELOCITY * PURPLE_PAD_MULT * sign,
        PadKind::Red => player.velocity_y = CUBE_JUMP_VELOCITY * RED_PAD_MULT * sign,
        PadKind::Blue => player.gravity_sign = -sign,
    }
    player.in_air = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::ObjectType;
    use crate::core::level::LevelObject;
    use crate::types::SOLID_TOP;

    fn level_with(objects: &[(i64, i64, ObjectType)]) -> Level {
        let mut level = Level::new(20, 10);
        for &(x, y, ty) in objects {
            level.set_object_at(x, y, Some(LevelObject::new(ty)));
        }
        level
    }

    #[test]
    fn spanned_columns_single_and_double() {
        assert_eq!(spanned_columns(3.0), (3, 3));
        assert_eq!(spanned_columns(3.5), (3, 4));
    }

    #[test]
    fn top_contact_within_leniency() {
        let level = level_with(&[(5, 2, ObjectType::Block)]);
        let catalog = ObjectCatalog::new();
        let top = 2.0 + SOLID_TOP;

        let cols = generate_collisions(&level, &catalog, 5.0, top);
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].side, Some(VerticalSide::Top));
        assert_eq!(cols[0].surface_y, Some(top));

        // Slightly sunk in, still a top contact.
        let cols = generate_collisions(&level, &catalog, 5.0, top - LENIENCY);
        assert_eq!(cols[0].side, Some(VerticalSide::Top));
    }

    #[test]
    fn bottom_contact_within_leniency() {
        let level = level_with(&[(5, 4, ObjectType::Block)]);
        let catalog = ObjectCatalog::new();

        // Player top just past the block underside at y = 4.
        let cols = generate_collisions(&level, &catalog, 5.0, 3.0 + LENIENCY * 0.5);
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].side, Some(VerticalSide::Bottom));
        assert_eq!(cols[0].surface_y, Some(4.0));
    }

    #[test]
    fn deep_overlap_is_unqualified() {
        let level = level_with(&[(5, 2, ObjectType::Block)]);
        let catalog = ObjectCatalog::new();
        let cols = generate_collisions(&level, &catalog, 5.0, 2.4);
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].side, None);
    }

    #[test]
    fn horizontal_gate_is_open_interval() {
        let level = level_with(&[(5, 2, ObjectType::Block)]);
        let catalog = ObjectCatalog::new();
        // Touching exactly at the edge: no overlap.
        assert!(generate_collisions(&level, &catalog, 4.0, 2.4).is_empty());
        assert!(generate_collisions(&level, &catalog, 6.0, 2.4).is_empty());
        assert_eq!(generate_collisions(&level, &catalog, 4.01, 2.4).len(), 1);
    }

    #[test]
    fn scan_is_deterministic() {
        let level = level_with(&[
            (5, 2, ObjectType::Block),
            (6, 2, ObjectType::Block),
            (5, 4, ObjectType::Spike),
        ]);
        let catalog = ObjectCatalog::new();
        let a = generate_collisions(&level, &catalog, 5.3, 2.9);
        let b = generate_collisions(&level, &catalog, 5.3, 2.9);
        assert_eq!(a.as_slice(), b.as_slice());
        // At most one sided record per object.
        for c in &a {
            let same: Vec<_> =
                a.iter().filter(|o| o.x == c.x && o.y == c.y && o.side.is_some()).collect();
            assert!(same.len() <= 1);
        }
    }

    #[test]
    fn any_touch_ignores_sides() {
        let level = level_with(&[(5, 2, ObjectType::YellowPad)]);
        let catalog = ObjectCatalog::new();
        let cols = generate_collisions(&level, &catalog, 5.0, 2.1);
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].side, None);
    }

    #[test]
    fn decorative_objects_are_skipped() {
        let level = level_with(&[(5, 2, ObjectType::Chain)]);
        let catalog = ObjectCatalog::new();
        assert!(generate_collisions(&level, &catalog, 5.0, 2.0).is_empty());
    }

    #[test]
    fn nearest_solid_beneath_prefers_near_row_then_left_column() {
        let catalog = ObjectCatalog::new();
        // Two columns: the left solid is lower than the right one.
        let level = level_with(&[(5, 1, ObjectType::Block), (6, 3, ObjectType::Block)]);
        // Hitbox spans columns 5 and 6.
        let top = highest_solid_beneath(&level, &catalog, 5.5, 6.0, 6).unwrap();
        assert_eq!(top, 3.0 + SOLID_TOP, "nearer row wins over column order");

        // Same row in both columns: leftmost wins (same face height here).
        let level = level_with(&[(5, 2, ObjectType::Block), (6, 2, ObjectType::Block)]);
        let top = highest_solid_beneath(&level, &catalog, 5.5, 6.0, 6).unwrap();
        assert_eq!(top, 2.0 + SOLID_TOP);
    }

    #[test]
    fn nearest_solid_search_is_bounded() {
        let catalog = ObjectCatalog::new();
        let level = level_with(&[(5, 0, ObjectType::Block)]);
        // Window of 2 rows starting from y=8 cannot see row 0.
        assert_eq!(highest_solid_beneath(&level, &catalog, 5.0, 8.0, 2), None);
        assert!(highest_solid_beneath(&level, &catalog, 5.0, 8.0, 8).is_some());
    }

    #[test]
    fn lowest_solid_above_finds_underside() {
        let catalog = ObjectCatalog::new();
        let level = level_with(&[(5, 6, ObjectType::Block)]);
        let bottom = lowest_solid_above(&level, &catalog, 5.0, 3.0, 4).unwrap();
        assert_eq!(bottom, 6.0);
        assert_eq!(lowest_solid_above(&level, &catalog, 5.0, 3.0, 1), None);
    }
}
