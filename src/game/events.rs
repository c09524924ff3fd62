use super::types::PartialState;
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Inputs to the core, one command per call. Tagged so a transport layer
/// can hand raw JSON straight to [`crate::GameState::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
  #[serde(rename = "add-player")]
  AddPlayer {
    #[serde(rename = "playerId")]
    player_id: String,
    nickname: String,
    #[serde(rename = "playerX", default, skip_serializing_if = "Option::is_none")]
    x: Option<i32>,
    #[serde(rename = "playerY", default, skip_serializing_if = "Option::is_none")]
    y: Option<i32>,
  },
  #[serde(rename = "remove-player")]
  RemovePlayer {
    #[serde(rename = "playerId")]
    player_id: String,
  },
  #[serde(rename = "move-player")]
  MovePlayer {
    #[serde(rename = "playerId")]
    player_id: String,
    direction: String,
  },
  #[serde(rename = "auto-move-player")]
  AutoMovePlayer {
    #[serde(rename = "playerId")]
    player_id: String,
    direction: String,
  },
  #[serde(rename = "add-fruit")]
  AddFruit {
    #[serde(rename = "fruitId", default, skip_serializing_if = "Option::is_none")]
    fruit_id: Option<String>,
    #[serde(rename = "fruitX", default, skip_serializing_if = "Option::is_none")]
    x: Option<i32>,
    #[serde(rename = "fruitY", default, skip_serializing_if = "Option::is_none")]
    y: Option<i32>,
  },
  #[serde(rename = "remove-fruit")]
  RemoveFruit {
    #[serde(rename = "fruitId")]
    fruit_id: String,
  },
  #[serde(rename = "set-screen")]
  SetScreen { width: i32, height: i32 },
  #[serde(rename = "set-state")]
  SetState { state: PartialState },
}

/// Every externally visible state change, flat and tagged so a thin
/// client can replay it against a remote mirror of the state without
/// running the simulation itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
  #[serde(rename = "add-player")]
  AddPlayer {
    #[serde(rename = "playerId")]
    player_id: String,
    nickname: String,
    #[serde(rename = "playerX")]
    x: i32,
    #[serde(rename = "playerY")]
    y: i32,
  },
  #[serde(rename = "remove-player")]
  RemovePlayer {
    #[serde(rename = "playerId")]
    player_id: String,
  },
  /// Raw echo of an incoming move command, emitted before any validity
  /// check so transports can relay exactly what arrived.
  #[serde(rename = "move-player")]
  MovePlayer {
    #[serde(rename = "playerId")]
    player_id: String,
    direction: String,
  },
  #[serde(rename = "auto-move-player")]
  AutoMovePlayer {
    #[serde(rename = "playerId")]
    player_id: String,
    direction: String,
  },
  #[serde(rename = "add-fruit")]
  AddFruit {
    #[serde(rename = "fruitId")]
    fruit_id: String,
    #[serde(rename = "fruitX")]
    x: i32,
    #[serde(rename = "fruitY")]
    y: i32,
  },
  #[serde(rename = "remove-fruit")]
  RemoveFruit {
    #[serde(rename = "fruitId")]
    fruit_id: String,
  },
  #[serde(rename = "screen-change")]
  ScreenChange { width: i32, height: i32 },
  #[serde(rename = "set-state")]
  SetState { state: PartialState },
  #[serde(rename = "player-collision")]
  PlayerCollision {
    #[serde(rename = "playerId")]
    player_id: String,
    #[serde(rename = "otherPlayerId")]
    other_player_id: String,
  },
  /// Carries the new total so mirrors need not recompute it.
  #[serde(rename = "update-score")]
  UpdateScore {
    #[serde(rename = "playerId")]
    player_id: String,
    score: i64,
  },
}

pub type Observer = Box<dyn FnMut(&GameEvent) + Send>;

/// Ordered subscriber registry. Delivery is synchronous, in registration
/// order, for the lifetime of the process; there is no unsubscribe.
#[derive(Default)]
pub struct EventBus {
  observers: Vec<Observer>,
}

impl EventBus {
  pub fn new() -> Self {
    Self {
      observers: Vec::new(),
    }
  }

  pub fn subscribe(&mut self, observer: Observer) {
    self.observers.push(observer);
  }

  /// Invokes every subscriber with the event. A panicking subscriber is
  /// caught and logged so the remaining subscribers still see the event.
  pub fn notify_all(&mut self, event: &GameEvent) {
    for (index, observer) in self.observers.iter_mut().enumerate() {
      if catch_unwind(AssertUnwindSafe(|| observer(event))).is_err() {
        tracing::warn!(observer = index, ?event, "subscriber panicked during notify");
      }
    }
  }
}
