//! Authoritative simulation core for a multiplayer grid snake game.
//!
//! The core owns all game state, applies commands, advances movement on
//! fixed timers and broadcasts every externally visible state change as a
//! typed event. Rendering and network transport are external consumers of
//! the snapshot and event surfaces.

pub mod game;

pub use game::events::{Command, EventBus, GameEvent, Observer};
pub use game::state::{Game, GameState};
pub use game::types::{
  Direction, Fruit, GameSnapshot, PartialState, Player, Screen, TailSegment, Vec2,
};
