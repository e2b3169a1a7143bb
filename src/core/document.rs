//! Level document - the owned JSON interchange format
//!
//! Storage rows run top-to-bottom while the world grid runs bottom-to-top;
//! the conversion here flips the row order both ways. Parsing validates
//! every name against the catalog vocabulary so the rest of the engine can
//! treat lookups as infallible.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::catalog::{ObjectCatalog, ObjectType};
use crate::core::level::{ChannelId, Level, LevelObject, PendingTrigger};
use crate::core::player::SpawnState;
use crate::types::{Gamemode, Reflection, Rgb, Rotation, SpeedClass};

/// The only level-type tag this engine understands.
pub const LEVEL_TYPE: &str = "platformer";

const REQUIRED_METADATA: [&str; 10] = [
    "name",
    "start",
    "gamemode",
    "speed",
    "gravity",
    "bgColor",
    "groundColor",
    "colors",
    "normalPercent",
    "practicePercent",
];

/// Distinct parse-error kind for level loading. Fatal to the load attempt
/// only; the session that produced it keeps running.
#[derive(Debug)]
pub enum DocumentError {
    MissingMetadata(&'static str),
    UnknownLevelType(String),
    UnknownName { kind: &'static str, name: String },
    Malformed(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::MissingMetadata(key) => {
                write!(f, "missing required metadata key `{key}`")
            }
            DocumentError::UnknownLevelType(tag) => write!(f, "unknown level type `{tag}`"),
            DocumentError::UnknownName { kind, name } => {
                write!(f, "unknown {kind} name `{name}`")
            }
            DocumentError::Malformed(msg) => write!(f, "malformed level document: {msg}"),
        }
    }
}

impl std::error::Error for DocumentError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDocument {
    #[serde(rename = "levelType")]
    pub level_type: String,
    pub metadata: Metadata,
    /// Storage row 0 = topmost world row.
    pub leveldata: Vec<Vec<Option<ObjectRecord>>>,
    /// Trigger metadata keyed by stringified `"x,y"` world coordinates,
    /// kept outside the grid for fast scanning.
    #[serde(rename = "colorTriggerLocs", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub color_trigger_locs: BTreeMap<String, TriggerRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub start: StartRecord,
    pub gamemode: String,
    pub speed: String,
    pub gravity: String,
    #[serde(rename = "bgColor")]
    pub bg_color: [u8; 3],
    #[serde(rename = "groundColor")]
    pub ground_color: [u8; 3],
    pub colors: BTreeMap<String, [u8; 3]>,
    #[serde(rename = "normalPercent")]
    pub normal_percent: f64,
    #[serde(rename = "practicePercent")]
    pub practice_percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StartRecord {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRecord {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default = "default_rotation")]
    pub rotation: String,
    #[serde(default = "default_reflection")]
    pub reflection: String,
    #[serde(rename = "color1Channel", default, skip_serializing_if = "Option::is_none")]
    pub color1_channel: Option<ChannelRepr>,
    #[serde(rename = "color2Channel", default, skip_serializing_if = "Option::is_none")]
    pub color2_channel: Option<ChannelRepr>,
    #[serde(rename = "triggerTarget", default, skip_serializing_if = "Option::is_none")]
    pub trigger_target: Option<ChannelRepr>,
    #[serde(rename = "triggerColor", default, skip_serializing_if = "Option::is_none")]
    pub trigger_color: Option<[u8; 3]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRecord {
    pub target: ChannelRepr,
    pub color: [u8; 3],
}

/// Channel reference as it appears on the wire: a small integer or one of
/// the named channels (`"bg"`, `"grnd"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelRepr {
    Num(u16),
    Name(String),
}

fn default_rotation() -> String {
    "up".to_string()
}

fn default_reflection() -> String {
    "none".to_string()
}

impl ChannelRepr {
    fn to_channel(&self) -> Result<ChannelId, DocumentError> {
        match self {
            ChannelRepr::Num(n) => Ok(ChannelId::Index(*n)),
            ChannelRepr::Name(s) => ChannelId::from_name(s).ok_or(DocumentError::UnknownName {
                kind: "color channel",
                name: s.clone(),
            }),
        }
    }

    fn from_channel(channel: ChannelId) -> Self {
        match channel {
            ChannelId::Index(n) => ChannelRepr::Num(n),
            other => ChannelRepr::Name(other.name()),
        }
    }
}

fn rgb_from(arr: [u8; 3]) -> Rgb {
    Rgb::new(arr[0], arr[1], arr[2])
}

fn rgb_to(color: Rgb) -> [u8; 3] {
    [color.r, color.g, color.b]
}

impl LevelDocument {
    /// Parse a document from JSON, checking the level-type tag and the
    /// required metadata keys before handing over to serde.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| DocumentError::Malformed(e.to_string()))?;

        let tag = value
            .get("levelType")
            .and_then(|v| v.as_str())
            .ok_or(DocumentError::MissingMetadata("levelType"))?;
        if tag != LEVEL_TYPE {
            return Err(DocumentError::UnknownLevelType(tag.to_string()));
        }

        let metadata = value
            .get("metadata")
            .and_then(|v| v.as_object())
            .ok_or(DocumentError::MissingMetadata("metadata"))?;
        for key in REQUIRED_METADATA {
            if !metadata.contains_key(key) {
                return Err(DocumentError::MissingMetadata(key));
            }
        }

        serde_json::from_value(value).map_err(|e| DocumentError::Malformed(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::Malformed(e.to_string()))
    }

    /// Build the runtime level and spawn state, validating every name
    /// against the engine vocabulary.
    pub fn build(&self, catalog: &ObjectCatalog) -> Result<(Level, SpawnState), DocumentError> {
        let height = self.leveldata.len();
        let width = self.leveldata.first().map_or(0, |row| row.len());
        for row in &self.leveldata {
            if row.len() != width {
                return Err(DocumentError::Malformed("ragged leveldata rows".to_string()));
            }
        }

        let mut level = Level::new(width.max(1), height.max(1));

        for (storage_y, row) in self.leveldata.iter().enumerate() {
            let world_y = height - 1 - storage_y;
            for (x, cell) in row.iter().enumerate() {
                let Some(record) = cell else {
                    continue;
                };
                let object = record.to_object(catalog)?;
                level.set_object_at(x as i64, world_y as i64, Some(object));
            }
        }

        for (name, color) in &self.metadata.colors {
            let channel = ChannelId::from_name(name).ok_or(DocumentError::UnknownName {
                kind: "color channel",
                name: name.clone(),
            })?;
            level.set_channel_color(channel, rgb_from(*color));
        }
        level.set_channel_color(ChannelId::Bg, rgb_from(self.metadata.bg_color));
        level.set_channel_color(ChannelId::Grnd, rgb_from(self.metadata.ground_color));

        let mut triggers = Vec::with_capacity(self.color_trigger_locs.len());
        for (key, record) in &self.color_trigger_locs {
            let (x, _y) = parse_loc_key(key)?;
            triggers.push(PendingTrigger {
                x: x as f64,
                target: record.target.to_channel()?,
                color: rgb_from(record.color),
            });
        }
        level.set_trigger_queue(triggers);
        level.assert_invariants(catalog);

        let mode = Gamemode::from_name(&self.metadata.gamemode).ok_or_else(|| {
            DocumentError::UnknownName { kind: "gamemode", name: self.metadata.gamemode.clone() }
        })?;
        let speed = SpeedClass::from_name(&self.metadata.speed).ok_or_else(|| {
            DocumentError::UnknownName { kind: "speed", name: self.metadata.speed.clone() }
        })?;
        let gravity_sign = match self.metadata.gravity.as_str() {
            "normal" => 1.0,
            "reverse" => -1.0,
            other => {
                return Err(DocumentError::UnknownName {
                    kind: "gravity",
                    name: other.to_string(),
                })
            }
        };

        let spawn = SpawnState {
            x: self.metadata.start.x,
            y: self.metadata.start.y,
            mode,
            speed,
            gravity_sign,
        };
        Ok((level, spawn))
    }

    /// Serialize a runtime level back into document form.
    pub fn from_level(
        level: &Level,
        spawn: &SpawnState,
        name: &str,
        normal_percent: f64,
        practice_percent: f64,
    ) -> Self {
        let height = level.height();
        let mut leveldata: Vec<Vec<Option<ObjectRecord>>> = Vec::with_capacity(height);
        for storage_y in 0..height {
            let world_y = height - 1 - storage_y;
            let mut row = Vec::with_capacity(level.width());
            for x in 0..level.width() {
                row.push(level.object_at(x, world_y).map(ObjectRecord::from_object));
            }
            leveldata.push(row);
        }

        let mut colors = BTreeMap::new();
        let mut bg_color = [255, 255, 255];
        let mut ground_color = [255, 255, 255];
        for (channel, color) in level.channel_colors() {
            match channel {
                ChannelId::Bg => bg_color = rgb_to(*color),
                ChannelId::Grnd => ground_color = rgb_to(*color),
                ChannelId::Index(_) => {
                    colors.insert(channel.name(), rgb_to(*color));
                }
            }
        }

        let mut color_trigger_locs = BTreeMap::new();
        for (x, y, obj) in level.iter_objects() {
            if obj.object_type() != ObjectType::ColorTrigger {
                continue;
            }
            if let (Some(target), Some(color)) = (obj.trigger_target, obj.trigger_color) {
                color_trigger_locs.insert(
                    format!("{x},{y}"),
                    TriggerRecord { target: ChannelRepr::from_channel(target), color: rgb_to(color) },
                );
            }
        }

        Self {
            level_type: LEVEL_TYPE.to_string(),
            metadata: Metadata {
                name: name.to_string(),
                start: StartRecord { x: spawn.x, y: spawn.y },
                gamemode: spawn.mode.name().to_string(),
                speed: spawn.speed.name().to_string(),
                gravity: if spawn.gravity_sign >= 0.0 { "normal" } else { "reverse" }.to_string(),
                bg_color,
                ground_color,
                colors,
                normal_percent,
                practice_percent,
            },
            leveldata,
            color_trigger_locs,
        }
    }
}

impl ObjectRecord {
    fn to_object(&self, catalog: &ObjectCatalog) -> Result<LevelObject, DocumentError> {
        let ty = ObjectType::from_name(&self.type_name).ok_or_else(|| {
            DocumentError::UnknownName { kind: "object type", name: self.type_name.clone() }
        })?;
        let rotation = Rotation::from_name(&self.rotation).ok_or_else(|| {
            DocumentError::UnknownName { kind: "rotation", name: self.rotation.clone() }
        })?;
        let reflection = Reflection::from_name(&self.reflection).ok_or_else(|| {
            DocumentError::UnknownName { kind: "reflection", name: self.reflection.clone() }
        })?;

        let mut object = LevelObject::new(ty);
        object.rotation = rotation;
        object.reflection = reflection;
        object.color1 = self.color1_channel.as_ref().map(|c| c.to_channel()).transpose()?;
        object.color2 = self.color2_channel.as_ref().map(|c| c.to_channel()).transpose()?;
        object.trigger_target =
            self.trigger_target.as_ref().map(|c| c.to_channel()).transpose()?;
        object.trigger_color = self.trigger_color.map(rgb_from);

        let entry = catalog.get(ty);
        if entry.color_channels < 2 && object.color2.is_some() {
            return Err(DocumentError::Malformed(format!(
                "`{}` does not take a second color channel",
                self.type_name
            )));
        }
        Ok(object)
    }

    fn from_object(object: &LevelObject) -> Self {
        Self {
            type_name: object.object_type().name().to_string(),
            rotation: object.rotation.name().to_string(),
            reflection: object.reflection.name().to_string(),
            color1_channel: object.color1.map(ChannelRepr::from_channel),
            color2_channel: object.color2.map(ChannelRepr::from_channel),
            trigger_target: object.trigger_target.map(ChannelRepr::from_channel),
            trigger_color: object.trigger_color.map(rgb_to),
        }
    }
}

fn parse_loc_key(key: &str) -> Result<(i64, i64), DocumentError> {
    let mut parts = key.splitn(2, ',');
    let x = parts.next().and_then(|p| p.trim().parse::<i64>().ok());
    let y = parts.next().and_then(|p| p.trim().parse::<i64>().ok());
    match (x, y) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(DocumentError::Malformed(format!("bad trigger location key `{key}`"))),
    }
}
