//! Level - the static/semi-static world grid
//!
//! Owns the rectangular grid of placed objects, the named color channels and
//! the queue of unresolved color triggers. Rows are stored bottom-to-top
//! (row 0 = world ground row); the document layer flips its storage order on
//! the way in and out.

use std::collections::HashMap;

use crate::core::catalog::{ObjectCatalog, ObjectType};
use crate::types::Rgb;

/// Indirection key for level-wide recolorable channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    Index(u16),
    Bg,
    Grnd,
}

impl ChannelId {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "bg" => Some(ChannelId::Bg),
            "grnd" => Some(ChannelId::Grnd),
            _ => s.parse::<u16>().ok().map(ChannelId::Index),
        }
    }

    pub fn name(&self) -> String {
        match self {
            ChannelId::Index(n) => n.to_string(),
            ChannelId::Bg => "bg".to_string(),
            ChannelId::Grnd => "grnd".to_string(),
        }
    }
}

/// Fallback for unassigned channels and objects without channel colors.
pub const DEFAULT_CHANNEL_COLOR: Rgb = Rgb::new(255, 255, 255);

/// A placed (or clipboard) object. Position is not stored here: grid
/// residency gives an object its coordinates, a bare `LevelObject` is the
/// abstract clipboard form.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelObject {
    object_type: ObjectType,
    pub rotation: crate::types::Rotation,
    pub reflection: crate::types::Reflection,
    pub color1: Option<ChannelId>,
    pub color2: Option<ChannelId>,
    /// Color-trigger objects only.
    pub trigger_target: Option<ChannelId>,
    pub trigger_color: Option<Rgb>,
    pub activated: bool,
}

impl LevelObject {
    pub fn new(object_type: ObjectType) -> Self {
        Self {
            object_type,
            rotation: crate::types::Rotation::Up,
            reflection: crate::types::Reflection::None,
            color1: None,
            color2: None,
            trigger_target: None,
            trigger_color: None,
            activated: false,
        }
    }

    /// The catalog key. Immutable for the object's lifetime.
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }
}

/// A pending channel recolor, fired when the player's x passes `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingTrigger {
    pub x: f64,
    pub target: ChannelId,
    pub color: Rgb,
}

/// The world grid plus its color state.
#[derive(Debug, Clone)]
pub struct Level {
    width: usize,
    height: usize,
    /// `cells[y][x]`, y = 0 at the world ground row.
    cells: Vec<Vec<Option<LevelObject>>>,
    colors: HashMap<ChannelId, Rgb>,
    /// Sorted by descending x; consumed from the back as the player advances.
    trigger_queue: Vec<PendingTrigger>,
    /// Objects whose `activated` flag was set since the last reset.
    activated_positions: Vec<(usize, usize)>,
    /// Bumped on every channel recolor; render caching keys off this.
    colors_version: u64,
}

impl Level {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![None; width]; height],
            colors: HashMap::new(),
            trigger_queue: Vec::new(),
            activated_positions: Vec::new(),
            colors_version: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Level length in blocks, for progress and completion checks.
    pub fn length(&self) -> f64 {
        self.width as f64
    }

    pub fn object_at(&self, x: usize, y: usize) -> Option<&LevelObject> {
        self.cells.get(y).and_then(|row| row.get(x)).and_then(|c| c.as_ref())
    }

    pub fn object_at_mut(&mut self, x: usize, y: usize) -> Option<&mut LevelObject> {
        self.cells.get_mut(y).and_then(|row| row.get_mut(x)).and_then(|c| c.as_mut())
    }

    /// Place (or clear) a cell. The grid only ever grows: coordinates past
    /// the current bounds extend it with empty cells. Negative coordinates
    /// are a precondition violation.
    pub fn set_object_at(&mut self, x: i64, y: i64, object: Option<LevelObject>) {
        assert!(x >= 0 && y >= 0, "object coordinates must be non-negative");
        let (x, y) = (x as usize, y as usize);

        if y >= self.height {
            self.height = y + 1;
            self.cells.resize_with(self.height, || vec![None; self.width]);
        }
        if x >= self.width {
            self.width = x + 1;
            for row in &mut self.cells {
                row.resize(self.width, None);
            }
        }
        self.cells[y][x] = object;
    }

    /// Resolved color of a channel, or the default when unassigned.
    pub fn resolve_color(&self, channel: Option<ChannelId>) -> Rgb {
        channel
            .and_then(|c| self.colors.get(&c).copied())
            .unwrap_or(DEFAULT_CHANNEL_COLOR)
    }

    pub fn set_channel_color(&mut self, channel: ChannelId, color: Rgb) {
        self.colors.insert(channel, color);
        self.colors_version += 1;
    }

    pub fn channel_colors(&self) -> &HashMap<ChannelId, Rgb> {
        &self.colors
    }

    pub fn colors_version(&self) -> u64 {
        self.colors_version
    }

    /// Install the trigger queue, normalizing to descending-x order.
    pub fn set_trigger_queue(&mut self, mut triggers: Vec<PendingTrigger>) {
        triggers.sort_by(|a, b| b.x.total_cmp(&a.x));
        self.trigger_queue = triggers;
    }

    pub fn trigger_queue(&self) -> &[PendingTrigger] {
        &self.trigger_queue
    }

    /// Fire every trigger the player has passed. Permanent for the session:
    /// consumed triggers do not return on respawn.
    pub fn advance_triggers(&mut self, player_x: f64) {
        while let Some(next) = self.trigger_queue.last().copied() {
            if next.x > player_x {
                break;
            }
            self.trigger_queue.pop();
            self.set_channel_color(next.target, next.color);
        }
    }

    /// Set an object's `activated` flag and remember it for the next reset.
    pub fn mark_activated(&mut self, x: usize, y: usize) {
        if let Some(obj) = self.object_at_mut(x, y) {
            if !obj.activated {
                obj.activated = true;
                self.activated_positions.push((x, y));
            }
        }
    }

    /// Clear every `activated` flag set since the previous reset.
    pub fn clear_activated(&mut self) {
        let positions = std::mem::take(&mut self.activated_positions);
        for (x, y) in positions {
            if let Some(obj) = self.object_at_mut(x, y) {
                obj.activated = false;
            }
        }
    }

    /// Assert grid invariants against the catalog: rectangular rows and
    /// channel cardinality. Violations are programmer/data errors.
    pub fn assert_invariants(&self, catalog: &ObjectCatalog) {
        for row in &self.cells {
            assert_eq!(row.len(), self.width, "ragged level row");
        }
        for row in &self.cells {
            for obj in row.iter().flatten() {
                let entry = catalog.get(obj.object_type());
                if entry.color_channels < 2 {
                    assert!(obj.color2.is_none(), "color2 set on single-channel object");
                }
            }
        }
    }

    /// Iterate placed objects with their coordinates, bottom-up then
    /// left-to-right.
    pub fn iter_objects(&self) -> impl Iterator<Item = (usize, usize, &LevelObject)> {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, cell)| cell.as_ref().map(|obj| (x, y, obj)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rotation;

    fn trigger(x: f64, target: ChannelId, color: Rgb) -> PendingTrigger {
        PendingTrigger { x, target, color }
    }

    #[test]
    fn grid_grows_and_pads_with_empty_cells() {
        let mut level = Level::new(4, 3);
        level.set_object_at(10, 5, Some(LevelObject::new(ObjectType::Block)));
        assert_eq!(level.width(), 11);
        assert_eq!(level.height(), 6);
        assert!(level.object_at(10, 5).is_some());
        assert!(level.object_at(9, 5).is_none());
        // Old rows padded to the new width.
        assert!(level.object_at(10, 0).is_none());
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn negative_coordinates_are_a_precondition_error() {
        let mut level = Level::new(4, 3);
        level.set_object_at(-1, 0, None);
    }

    #[test]
    fn channel_resolution_falls_back_to_default() {
        let mut level = Level::new(2, 2);
        assert_eq!(level.resolve_color(Some(ChannelId::Index(3))), DEFAULT_CHANNEL_COLOR);
        level.set_channel_color(ChannelId::Index(3), Rgb::new(10, 20, 30));
        assert_eq!(level.resolve_color(Some(ChannelId::Index(3))), Rgb::new(10, 20, 30));
        assert_eq!(level.resolve_color(None), DEFAULT_CHANNEL_COLOR);
    }

    #[test]
    fn triggers_fire_in_ascending_x_order_exactly_once() {
        let mut level = Level::new(30, 4);
        level.set_trigger_queue(vec![
            trigger(20.0, ChannelId::Bg, Rgb::new(3, 3, 3)),
            trigger(5.0, ChannelId::Bg, Rgb::new(1, 1, 1)),
            trigger(10.0, ChannelId::Bg, Rgb::new(2, 2, 2)),
        ]);

        level.advance_triggers(4.9);
        assert_eq!(level.resolve_color(Some(ChannelId::Bg)), DEFAULT_CHANNEL_COLOR);

        level.advance_triggers(12.0);
        assert_eq!(level.resolve_color(Some(ChannelId::Bg)), Rgb::new(2, 2, 2));
        assert_eq!(level.trigger_queue().len(), 1);

        let version = level.colors_version();
        level.advance_triggers(12.0);
        assert_eq!(level.colors_version(), version, "no re-fire on a later tick");
    }

    #[test]
    fn activated_flags_clear_on_reset() {
        let mut level = Level::new(4, 2);
        level.set_object_at(1, 0, Some(LevelObject::new(ObjectType::YellowOrb)));
        level.set_object_at(2, 0, Some(LevelObject::new(ObjectType::YellowPad)));

        level.mark_activated(1, 0);
        level.mark_activated(2, 0);
        level.mark_activated(2, 0); // idempotent
        assert!(level.object_at(1, 0).unwrap().activated);

        level.clear_activated();
        assert!(!level.object_at(1, 0).unwrap().activated);
        assert!(!level.object_at(2, 0).unwrap().activated);
    }

    #[test]
    fn channel_names_round_trip() {
        for id in [ChannelId::Bg, ChannelId::Grnd, ChannelId::Index(7)] {
            assert_eq!(ChannelId::from_name(&id.name()), Some(id));
        }
        assert_eq!(ChannelId::from_name("nope"), None);
    }

    #[test]
    fn iter_objects_is_bottom_up_left_to_right() {
        let mut level = Level::new(3, 3);
        let mut obj = LevelObject::new(ObjectType::Block);
        obj.rotation = Rotation::Right;
        level.set_object_at(2, 0, Some(obj));
        level.set_object_at(0, 1, Some(LevelObject::new(ObjectType::Spike)));

        let coords: Vec<(usize, usize)> =
            level.iter_objects().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(2, 0), (0, 1)]);
    }
}
