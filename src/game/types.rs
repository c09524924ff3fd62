use super::constants::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vec2 {
  pub x: i32,
  pub y: i32,
}

impl Vec2 {
  pub const ZERO: Self = Self { x: 0, y: 0 };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
  pub width: i32,
  pub height: i32,
}

impl Default for Screen {
  fn default() -> Self {
    Self {
      width: DEFAULT_SCREEN_WIDTH,
      height: DEFAULT_SCREEN_HEIGHT,
    }
  }
}

/// The four accepted movement keys. The direction vector stores "up" as
/// positive y while the actual y coordinate decreases when moving up;
/// rendering coordinates grow downward and all tail math relies on that
/// inversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Up,
  Right,
  Down,
  Left,
}

impl Direction {
  pub fn vector(self) -> Vec2 {
    match self {
      Self::Up => Vec2 { x: 0, y: 1 },
      Self::Right => Vec2 { x: 1, y: 0 },
      Self::Down => Vec2 { x: 0, y: -1 },
      Self::Left => Vec2 { x: -1, y: 0 },
    }
  }

  pub fn key(self) -> &'static str {
    match self {
      Self::Up => "up",
      Self::Right => "right",
      Self::Down => "down",
      Self::Left => "left",
    }
  }
}

/// One trailing body cell. Index 0 of a player's tail is the segment
/// nearest the head. A freshly grown segment has a zero direction until
/// the first propagation records the step it took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailSegment {
  pub x: i32,
  pub y: i32,
  #[serde(rename = "moveDirection", default)]
  pub move_direction: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
  pub id: String,
  pub nickname: String,
  pub x: i32,
  pub y: i32,
  #[serde(rename = "moveDirection", default)]
  pub move_direction: Vec2,
  #[serde(default)]
  pub tail: Vec<TailSegment>,
  #[serde(default)]
  pub score: i64,
  #[serde(rename = "lastKey", default)]
  pub last_key: Option<Direction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fruit {
  pub id: String,
  pub x: i32,
  pub y: i32,
}

/// Read-only defensive copy of the whole game state, safe to hand to
/// rendering or serialize across a process boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
  pub screen: Screen,
  pub players: BTreeMap<String, Player>,
  pub fruits: BTreeMap<String, Fruit>,
}

/// Trusted/debug payload for the `set-state` command. Each field that is
/// present replaces the corresponding top-level state field wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialState {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub screen: Option<Screen>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub players: Option<BTreeMap<String, Player>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fruits: Option<BTreeMap<String, Fruit>>,
}
