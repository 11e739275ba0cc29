//! Core type definitions for the viewer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a sprite layout in the snapshot's sprite table
pub type SpriteId = u32;

/// 2D point in world (or sprite) space, serialized as `[x, y]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Creature heading resolved to its trigonometric form.
///
/// Built once per creature per frame so organ transforms never call into
/// `sin`/`cos` themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heading {
    pub cos: f64,
    pub sin: f64,
}

impl Heading {
    pub const EAST: Heading = Heading { cos: 1.0, sin: 0.0 };

    pub fn from_radians(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { cos, sin }
    }

    /// Rotate a body-relative offset by this heading
    pub fn rotate(&self, offset: Point) -> Point {
        Point {
            x: offset.x * self.cos - offset.y * self.sin,
            y: offset.x * self.sin + offset.y * self.cos,
        }
    }
}

/// Simulation-side creature identifier (numeric or a user-supplied string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatureId {
    Number(u64),
    Text(String),
}

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreatureId::Number(n) => write!(f, "{}", n),
            CreatureId::Text(s) => f.write_str(s),
        }
    }
}

/// A creature as reported in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub position: Point,
    /// Heading in radians
    pub direction: f64,
    pub sprite_id: SpriteId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CreatureId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(
        default,
        rename = "isAlive",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_alive: Option<bool>,
}

impl Creature {
    pub fn new(position: Point, direction: f64, sprite_id: SpriteId) -> Self {
        Self {
            position,
            direction,
            sprite_id,
            id: None,
            name: None,
            energy: None,
            is_alive: None,
        }
    }

    pub fn heading(&self) -> Heading {
        Heading::from_radians(self.direction)
    }

    /// Label for log lines: the name, else the id, else the sprite
    pub fn label(&self) -> String {
        match (&self.name, &self.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => format!("sprite#{}", self.sprite_id),
        }
    }
}

/// A food pellet, serialized as a bare `[x, y]` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoodItem {
    pub position: Point,
}

impl FoodItem {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
        }
    }
}

/// One immutable view of simulation state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub creatures: Vec<Creature>,
    pub food: Vec<FoodItem>,
    #[serde(default)]
    pub sprites: BTreeMap<SpriteId, String>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty() && self.food.is_empty()
    }

    /// Raw layout string for a sprite id
    pub fn sprite(&self, id: SpriteId) -> Option<&str> {
        self.sprites.get(&id).map(String::as_str)
    }

    pub fn summary(&self) -> String {
        format!(
            "Creatures: {} | Food: {}",
            self.creatures.len(),
            self.food.len()
        )
    }
}

/// Organ type within a sprite layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganKind {
    Body,
    Spike,
    Mouth,
    Eye,
    Flipper,
    Unknown,
}

impl OrganKind {
    /// Exact, case-sensitive match against the known organ labels
    pub fn from_label(label: &str) -> Self {
        match label {
            "body" => OrganKind::Body,
            "spike" => OrganKind::Spike,
            "mouth" => OrganKind::Mouth,
            "eye" => OrganKind::Eye,
            "flipper" => OrganKind::Flipper,
            _ => OrganKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrganKind::Body => "body",
            OrganKind::Spike => "spike",
            OrganKind::Mouth => "mouth",
            OrganKind::Eye => "eye",
            OrganKind::Flipper => "flipper",
            OrganKind::Unknown => "unknown",
        }
    }

    /// Fill color used when drawing an organ of this kind
    pub fn color(&self) -> Color {
        match self {
            OrganKind::Body => Color::BODY,
            OrganKind::Spike => Color::RED,
            OrganKind::Mouth => Color::YELLOW,
            OrganKind::Eye => Color::WHITE,
            OrganKind::Flipper => Color::ORANGE,
            OrganKind::Unknown => Color::GRAY,
        }
    }
}

impl fmt::Display for OrganKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, positioned, sized part of a creature sprite
#[derive(Debug, Clone, PartialEq)]
pub struct Organ {
    pub kind: OrganKind,
    /// Type text as it appeared in the layout (differs from `kind` only for unknown types)
    pub label: String,
    /// Offset from the body center in unrotated sprite space
    pub offset: Point,
    pub size: f64,
}

impl Organ {
    pub fn new(kind: OrganKind, offset: Point, size: f64) -> Self {
        Self {
            kind,
            label: kind.as_str().to_string(),
            offset,
            size,
        }
    }

    pub fn is_body(&self) -> bool {
        self.kind == OrganKind::Body
    }
}

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BODY: Color = Color::rgb(0x34, 0x98, 0xdb);
    pub const RED: Color = Color::rgb(0xe7, 0x4c, 0x3c);
    pub const YELLOW: Color = Color::rgb(0xf1, 0xc4, 0x0f);
    pub const WHITE: Color = Color::rgb(0xf5, 0xf5, 0xf5);
    pub const ORANGE: Color = Color::rgb(0xe6, 0x7e, 0x22);
    pub const GRAY: Color = Color::rgb(0x95, 0xa5, 0xa6);
    pub const GREEN: Color = Color::rgb(0x2e, 0xcc, 0x71);
    pub const CONNECTOR: Color = Color::rgb(0x55, 0x55, 0x55);
    pub const BACKGROUND: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
