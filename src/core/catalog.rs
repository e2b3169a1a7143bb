//! Object catalog - the fixed table of physical/behavioral object data
//!
//! Every placeable object kind is a variant of the closed `ObjectType` enum;
//! its hitbox, collision effect and color-channel count come from one table
//! built at compile time. Unknown type names never get past document parsing,
//! so catalog lookups are infallible.

use crate::types::{Gamemode, SpeedClass, LENIENCY, SOLID_TOP};

/// Every placeable object kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Block,
    Spike,
    SpikeShort,
    Chain,
    YellowOrb,
    PurpleOrb,
    RedOrb,
    BlueOrb,
    GreenOrb,
    BlackOrb,
    YellowPad,
    PurplePad,
    RedPad,
    BluePad,
    GravityPortalNormal,
    GravityPortalReverse,
    PortalCube,
    PortalShip,
    PortalBall,
    PortalUfo,
    PortalWave,
    SpeedPortalSlow,
    SpeedPortalNormal,
    SpeedPortalFast,
    SpeedPortalFaster,
    SpeedPortalFastest,
    ColorTrigger,
}

/// All object types, for table-driven tests and sprite coverage checks.
pub const ALL_OBJECT_TYPES: [ObjectType; 27] = [
    ObjectType::Block,
    ObjectType::Spike,
    ObjectType::SpikeShort,
    ObjectType::Chain,
    ObjectType::YellowOrb,
    ObjectType::PurpleOrb,
    ObjectType::RedOrb,
    ObjectType::BlueOrb,
    ObjectType::GreenOrb,
    ObjectType::BlackOrb,
    ObjectType::YellowPad,
    ObjectType::PurplePad,
    ObjectType::RedPad,
    ObjectType::BluePad,
    ObjectType::GravityPortalNormal,
    ObjectType::GravityPortalReverse,
    ObjectType::PortalCube,
    ObjectType::PortalShip,
    ObjectType::PortalBall,
    ObjectType::PortalUfo,
    ObjectType::PortalWave,
    ObjectType::SpeedPortalSlow,
    ObjectType::SpeedPortalNormal,
    ObjectType::SpeedPortalFast,
    ObjectType::SpeedPortalFaster,
    ObjectType::SpeedPortalFastest,
    ObjectType::ColorTrigger,
];

impl ObjectType {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "block" => Some(ObjectType::Block),
            "spike" => Some(ObjectType::Spike),
            "spike-short" => Some(ObjectType::SpikeShort),
            "chain" => Some(ObjectType::Chain),
            "yellow-orb" => Some(ObjectType::YellowOrb),
            "purple-orb" => Some(ObjectType::PurpleOrb),
            "red-orb" => Some(ObjectType::RedOrb),
            "blue-orb" => Some(ObjectType::BlueOrb),
            "green-orb" => Some(ObjectType::GreenOrb),
            "black-orb" => Some(ObjectType::BlackOrb),
            "yellow-pad" => Some(ObjectType::YellowPad),
            "purple-pad" => Some(ObjectType::PurplePad),
            "red-pad" => Some(ObjectType::RedPad),
            "blue-pad" => Some(ObjectType::BluePad),
            "portal-gravity-normal" => Some(ObjectType::GravityPortalNormal),
            "portal-gravity-reverse" => Some(ObjectType::GravityPortalReverse),
            "portal-cube" => Some(ObjectType::PortalCube),
            "portal-ship" => Some(ObjectType::PortalShip),
            "portal-ball" => Some(ObjectType::PortalBall),
            "portal-ufo" => Some(ObjectType::PortalUfo),
            "portal-wave" => Some(ObjectType::PortalWave),
            "portal-speed-slow" => Some(ObjectType::SpeedPortalSlow),
            "portal-speed-normal" => Some(ObjectType::SpeedPortalNormal),
            "portal-speed-fast" => Some(ObjectType::SpeedPortalFast),
            "portal-speed-faster" => Some(ObjectType::SpeedPortalFaster),
            "portal-speed-fastest" => Some(ObjectType::SpeedPortalFastest),
            "color-trigger" => Some(ObjectType::ColorTrigger),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ObjectType::Block => "block",
            ObjectType::Spike => "spike",
            ObjectType::SpikeShort => "spike-short",
            ObjectType::Chain => "chain",
            ObjectType::YellowOrb => "yellow-orb",
            ObjectType::PurpleOrb => "purple-orb",
            ObjectType::RedOrb => "red-orb",
            ObjectType::BlueOrb => "blue-orb",
            ObjectType::GreenOrb => "green-orb",
            ObjectType::BlackOrb => "black-orb",
            ObjectType::YellowPad => "yellow-pad",
            ObjectType::PurplePad => "purple-pad",
            ObjectType::RedPad => "red-pad",
            ObjectType::BluePad => "blue-pad",
            ObjectType::GravityPortalNormal => "portal-gravity-normal",
            ObjectType::GravityPortalReverse => "portal-gravity-reverse",
            ObjectType::PortalCube => "portal-cube",
            ObjectType::PortalShip => "portal-ship",
            ObjectType::PortalBall => "portal-ball",
            ObjectType::PortalUfo => "portal-ufo",
            ObjectType::PortalWave => "portal-wave",
            ObjectType::SpeedPortalSlow => "portal-speed-slow",
            ObjectType::SpeedPortalNormal => "portal-speed-normal",
            ObjectType::SpeedPortalFast => "portal-speed-fast",
            ObjectType::SpeedPortalFaster => "portal-speed-faster",
            ObjectType::SpeedPortalFastest => "portal-speed-fastest",
            ObjectType::ColorTrigger => "color-trigger",
        }
    }
}

/// Collision behavior class of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitboxKind {
    /// Supports standing on top / bumping the underside; crashes otherwise.
    Solid,
    /// Effect fires on any overlap; no sides.
    AnyTouch,
    /// Decorative, skipped by the collision scan.
    None,
}

/// Hitbox extents as offsets from the cell origin, in blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl Hitbox {
    const fn new(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        Self { x0, x1, y0, y1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrbKind {
    Yellow,
    Purple,
    Red,
    Blue,
    Green,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadKind {
    Yellow,
    Purple,
    Red,
    Blue,
}

/// Closed effect vocabulary. Each variant maps to exactly one behavior and
/// (for the orb/pad family) one multiplier constant in `types`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEffect {
    GravityNormal,
    GravityReverse,
    CrashBlock,
    CrashObstacle,
    Orb(OrbKind),
    Pad(PadKind),
    Gamemode(Gamemode),
    Speed(SpeedClass),
}

impl CollisionEffect {
    pub fn name(&self) -> &'static str {
        match self {
            CollisionEffect::GravityNormal => "gravity-normal",
            CollisionEffect::GravityReverse => "gravity-reverse",
            CollisionEffect::CrashBlock => "crash-block",
            CollisionEffect::CrashObstacle => "crash-obstacle",
            CollisionEffect::Orb(OrbKind::Yellow) => "yellow-orb",
            CollisionEffect::Orb(OrbKind::Purple) => "purple-orb",
            CollisionEffect::Orb(OrbKind::Red) => "red-orb",
            CollisionEffect::Orb(OrbKind::Blue) => "blue-orb",
            CollisionEffect::Orb(OrbKind::Green) => "green-orb",
            CollisionEffect::Orb(OrbKind::Black) => "black-orb",
            CollisionEffect::Pad(PadKind::Yellow) => "yellow-pad",
            CollisionEffect::Pad(PadKind::Purple) => "purple-pad",
            CollisionEffect::Pad(PadKind::Red) => "red-pad",
            CollisionEffect::Pad(PadKind::Blue) => "blue-pad",
            CollisionEffect::Gamemode(Gamemode::Cube) => "gamemode-cube",
            CollisionEffect::Gamemode(Gamemode::Ship) => "gamemode-ship",
            CollisionEffect::Gamemode(Gamemode::Ball) => "gamemode-ball",
            CollisionEffect::Gamemode(Gamemode::Ufo) => "gamemode-ufo",
            CollisionEffect::Gamemode(Gamemode::Wave) => "gamemode-wave",
            CollisionEffect::Speed(SpeedClass::Slow) => "speed-slow",
            CollisionEffect::Speed(SpeedClass::Normal) => "speed-normal",
            CollisionEffect::Speed(SpeedClass::Fast) => "speed-fast",
            CollisionEffect::Speed(SpeedClass::Faster) => "speed-faster",
            CollisionEffect::Speed(SpeedClass::Fastest) => "speed-fastest",
        }
    }
}

/// One row of the catalog table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry {
    pub hitbox_kind: HitboxKind,
    pub hitbox: Hitbox,
    pub effect: Option<CollisionEffect>,
    /// How many color channels the object references (0, 1 or 2).
    pub color_channels: u8,
    /// Effect only fires on an explicit jump press while overlapping.
    pub requires_click: bool,
    /// Effect may fire again without a respawn in between.
    pub multi_activate: bool,
}

/// Read-only lookup over the fixed per-type table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectCatalog;

const FULL_CELL: Hitbox = Hitbox::new(0.0, 1.0, 0.0, SOLID_TOP);
const SPIKE_BOX: Hitbox = Hitbox::new(0.3, 0.7, 0.0, 0.6);
const SPIKE_SHORT_BOX: Hitbox = Hitbox::new(0.3, 0.7, 0.0, 0.3);
const ORB_BOX: Hitbox = Hitbox::new(-0.1, 1.1, -0.1, 1.1);
const PAD_BOX: Hitbox = Hitbox::new(0.1, 0.9, 0.0, 0.25);
const PORTAL_BOX: Hitbox = Hitbox::new(0.2, 0.8, 0.0, 1.0);

const fn solid(effect: CollisionEffect, channels: u8) -> CatalogEntry {
    CatalogEntry {
        hitbox_kind: HitboxKind::Solid,
        hitbox: FULL_CELL,
        effect: Some(effect),
        color_channels: channels,
        requires_click: false,
        multi_activate: false,
    }
}

const fn hazard(hitbox: Hitbox, channels: u8) -> CatalogEntry {
    CatalogEntry {
        hitbox_kind: HitboxKind::AnyTouch,
        hitbox,
        effect: Some(CollisionEffect::CrashObstacle),
        color_channels: channels,
        requires_click: false,
        multi_activate: false,
    }
}

const fn orb(kind: OrbKind) -> CatalogEntry {
    CatalogEntry {
        hitbox_kind: HitboxKind::AnyTouch,
        hitbox: ORB_BOX,
        effect: Some(CollisionEffect::Orb(kind)),
        color_channels: 0,
        requires_click: true,
        multi_activate: false,
    }
}

const fn pad(kind: PadKind) -> CatalogEntry {
    CatalogEntry {
        hitbox_kind: HitboxKind::AnyTouch,
        hitbox: PAD_BOX,
        effect: Some(CollisionEffect::Pad(kind)),
        color_channels: 0,
        requires_click: false,
        multi_activate: false,
    }
}

const fn portal(effect: CollisionEffect) -> CatalogEntry {
    CatalogEntry {
        hitbox_kind: HitboxKind::AnyTouch,
        hitbox: PORTAL_BOX,
        effect: Some(effect),
        color_channels: 0,
        requires_click: false,
        multi_activate: true,
    }
}

impl ObjectCatalog {
    pub const fn new() -> Self {
        Self
    }

    /// Look up the table row for a type. Total over the closed enum.
    pub const fn get(&self, ty: ObjectType) -> CatalogEntry {
        match ty {
            ObjectType::Block => solid(CollisionEffect::CrashBlock, 2),
            ObjectType::Spike => hazard(SPIKE_BOX, 2),
            ObjectType::SpikeShort => hazard(SPIKE_SHORT_BOX, 2),
            ObjectType::Chain => CatalogEntry {
                hitbox_kind: HitboxKind::None,
                hitbox: FULL_CELL,
                effect: None,
                color_channels: 1,
                requires_click: false,
                multi_activate: false,
            },
            ObjectType::YellowOrb => orb(OrbKind::Yellow),
            ObjectType::PurpleOrb => orb(OrbKind::Purple),
            ObjectType::RedOrb => orb(OrbKind::Red),
            ObjectType::BlueOrb => orb(OrbKind::Blue),
            ObjectType::GreenOrb => orb(OrbKind::Green),
            ObjectType::BlackOrb => orb(OrbKind::Black),
            ObjectType::YellowPad => pad(PadKind::Yellow),
            ObjectType::PurplePad => pad(PadKind::Purple),
            ObjectType::RedPad => pad(PadKind::Red),
            ObjectType::BluePad => pad(PadKind::Blue),
            ObjectType::GravityPortalNormal => portal(CollisionEffect::GravityNormal),
            ObjectType::GravityPortalReverse => portal(CollisionEffect::GravityReverse),
            ObjectType::PortalCube => portal(CollisionEffect::Gamemode(Gamemode::Cube)),
            ObjectType::PortalShip => portal(CollisionEffect::Gamemode(Gamemode::Ship)),
            ObjectType::PortalBall => portal(CollisionEffect::Gamemode(Gamemode::Ball)),
            ObjectType::PortalUfo => portal(CollisionEffect::Gamemode(Gamemode::Ufo)),
            ObjectType::PortalWave => portal(CollisionEffect::Gamemode(Gamemode::Wave)),
            ObjectType::SpeedPortalSlow => portal(CollisionEffect::Speed(SpeedClass::Slow)),
            ObjectType::SpeedPortalNormal => portal(CollisionEffect::Speed(SpeedClass::Normal)),
            ObjectType::SpeedPortalFast => portal(CollisionEffect::Speed(SpeedClass::Fast)),
            ObjectType::SpeedPortalFaster => portal(CollisionEffect::Speed(SpeedClass::Faster)),
            ObjectType::SpeedPortalFastest => portal(CollisionEffect::Speed(SpeedClass::Fastest)),
            // Color triggers act through the level's trigger queue, not the
            // collision scan.
            ObjectType::ColorTrigger => CatalogEntry {
                hitbox_kind: HitboxKind::None,
                hitbox: FULL_CELL,
                effect: None,
                color_channels: 0,
                requires_click: false,
                multi_activate: false,
            },
        }
    }
}

/// Leniency re-exported next to the hitbox data it qualifies.
pub const SOLID_FACE_LENIENCY: f64 = LENIENCY;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_name_round_trips() {
        for ty in ALL_OBJECT_TYPES {
            assert_eq!(ObjectType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(ObjectType::from_name("sawblade"), None);
    }

    #[test]
    fn solid_block_has_leniency_smaller_than_height() {
        let entry = ObjectCatalog::new().get(ObjectType::Block);
        assert_eq!(entry.hitbox_kind, HitboxKind::Solid);
        assert!(SOLID_FACE_LENIENCY < entry.hitbox.y1 - entry.hitbox.y0);
    }

    #[test]
    fn orbs_require_click_pads_do_not() {
        let catalog = ObjectCatalog::new();
        assert!(catalog.get(ObjectType::YellowOrb).requires_click);
        assert!(!catalog.get(ObjectType::YellowPad).requires_click);
        assert!(catalog.get(ObjectType::PortalShip).multi_activate);
        assert!(!catalog.get(ObjectType::RedPad).multi_activate);
    }

    #[test]
    fn decorative_types_have_no_effect() {
        let catalog = ObjectCatalog::new();
        for ty in [ObjectType::Chain, ObjectType::ColorTrigger] {
            let entry = catalog.get(ty);
            assert_eq!(entry.hitbox_kind, HitboxKind::None);
            assert!(entry.effect.is_none());
        }
    }

    #[test]
    fn effect_names_match_vocabulary() {
        let catalog = ObjectCatalog::new();
        assert_eq!(
            catalog.get(ObjectType::GravityPortalReverse).effect.map(|e| e.name()),
            Some("gravity-reverse")
        );
        assert_eq!(
            catalog.get(ObjectType::SpeedPortalFastest).effect.map(|e| e.name()),
            Some("speed-fastest")
        );
        assert_eq!(
            catalog.get(ObjectType::BlackOrb).effect.map(|e| e.name()),
            Some("black-orb")
        );
    }
}
