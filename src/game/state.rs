use super::constants::{AUTO_MOVE_INTERVAL_MS, FRUIT_SPAWN_INTERVAL_MS, MAX_FRUITS};
use super::events::{Command, EventBus, GameEvent, Observer};
use super::input::parse_direction;
use super::math::wrap;
use super::tail::{grow_tail, propagate_tail};
use super::types::{
  Direction, Fruit, GameSnapshot, PartialState, Player, Screen, TailSegment, Vec2,
};
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Shared handle over one game instance. The mutex spans every top-level
/// operation, so command handling, tail propagation and collision checks
/// always observe a consistent state even while the tick drivers run.
pub struct Game {
  state: Mutex<GameState>,
  running: AtomicBool,
}

/// The deterministic simulation core. All operations are synchronous and
/// run to completion; entity maps are ordered by id so multi-way collision
/// resolution is reproducible.
pub struct GameState {
  screen: Screen,
  players: BTreeMap<String, Player>,
  fruits: BTreeMap<String, Fruit>,
  bus: EventBus,
}

impl Game {
  pub fn new() -> Self {
    Self::with_screen(Screen::default())
  }

  pub fn with_screen(screen: Screen) -> Self {
    Self {
      state: Mutex::new(GameState::with_screen(screen)),
      running: AtomicBool::new(false),
    }
  }

  pub async fn subscribe(&self, observer: Observer) {
    self.state.lock().await.subscribe(observer);
  }

  pub async fn apply(&self, command: Command) {
    self.state.lock().await.apply(command);
  }

  pub async fn snapshot(&self) -> GameSnapshot {
    self.state.lock().await.snapshot()
  }

  /// Starts the two tick drivers with the default intervals.
  pub fn start(self: &Arc<Self>) {
    self.start_with_intervals(
      Duration::from_millis(AUTO_MOVE_INTERVAL_MS),
      Duration::from_millis(FRUIT_SPAWN_INTERVAL_MS),
    );
  }

  /// Starts the auto-move and fruit-spawn drivers. Idempotent: only the
  /// first call spawns the tasks. Each tick locks the state for its full
  /// duration, so ticks never interleave with commands or each other.
  pub fn start_with_intervals(self: &Arc<Self>, auto_move: Duration, fruit_spawn: Duration) {
    if self
      .running
      .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
      .is_err()
    {
      return;
    }

    let game = Arc::clone(self);
    tokio::spawn(async move {
      let mut interval = tokio::time::interval(auto_move);
      loop {
        interval.tick().await;
        game.state.lock().await.auto_move_tick();
      }
    });

    let game = Arc::clone(self);
    tokio::spawn(async move {
      let mut interval = tokio::time::interval(fruit_spawn);
      loop {
        interval.tick().await;
        game.state.lock().await.spawn_fruit_tick();
      }
    });
  }
}

impl Default for Game {
  fn default() -> Self {
    Self::new()
  }
}

impl GameState {
  pub fn new() -> Self {
    Self::with_screen(Screen::default())
  }

  pub fn with_screen(screen: Screen) -> Self {
    Self {
      screen,
      players: BTreeMap::new(),
      fruits: BTreeMap::new(),
      bus: EventBus::new(),
    }
  }

  pub fn subscribe(&mut self, observer: Observer) {
    self.bus.subscribe(observer);
  }

  pub fn snapshot(&self) -> GameSnapshot {
    GameSnapshot {
      screen: self.screen,
      players: self.players.clone(),
      fruits: self.fruits.clone(),
    }
  }

  pub fn screen(&self) -> Screen {
    self.screen
  }

  pub fn player(&self, player_id: &str) -> Option<&Player> {
    self.players.get(player_id)
  }

  pub fn fruit_count(&self) -> usize {
    self.fruits.len()
  }

  pub fn apply(&mut self, command: Command) {
    match command {
      Command::AddPlayer {
        player_id,
        nickname,
        x,
        y,
      } => self.add_player(&player_id, &nickname, x, y),
      Command::RemovePlayer { player_id } => self.remove_player(&player_id),
      Command::MovePlayer {
        player_id,
        direction,
      } => self.move_player(&player_id, &direction),
      Command::AutoMovePlayer {
        player_id,
        direction,
      } => self.auto_move_player(&player_id, &direction),
      Command::AddFruit { fruit_id, x, y } => self.add_fruit(fruit_id, x, y),
      Command::RemoveFruit { fruit_id } => self.remove_fruit(&fruit_id),
      Command::SetScreen { width, height } => self.set_screen(width, height),
      Command::SetState { state } => self.set_state(state),
    }
  }

  pub fn set_screen(&mut self, width: i32, height: i32) {
    if width <= 0 || height <= 0 {
      return;
    }
    self.screen = Screen { width, height };
    self.bus.notify_all(&GameEvent::ScreenChange { width, height });
  }

  /// Trusted/debug shallow merge: each field present in the payload
  /// replaces the corresponding state field wholesale.
  pub fn set_state(&mut self, state: PartialState) {
    if let Some(screen) = state.screen {
      self.screen = screen;
    }
    if let Some(players) = &state.players {
      self.players = players.clone();
    }
    if let Some(fruits) = &state.fruits {
      self.fruits = fruits.clone();
    }
    self.bus.notify_all(&GameEvent::SetState { state });
  }

  /// Creates (or replaces, on rejoin) a player. Missing coordinates are
  /// drawn uniformly from the grid.
  pub fn add_player(&mut self, player_id: &str, nickname: &str, x: Option<i32>, y: Option<i32>) {
    let mut rng = rand::thread_rng();
    let x = x.unwrap_or_else(|| rng.gen_range(0..self.screen.width));
    let y = y.unwrap_or_else(|| rng.gen_range(0..self.screen.height));

    self.players.insert(
      player_id.to_string(),
      Player {
        id: player_id.to_string(),
        nickname: nickname.to_string(),
        x,
        y,
        move_direction: Vec2::ZERO,
        tail: Vec::new(),
        score: 0,
        last_key: None,
      },
    );
    tracing::debug!(player_id, nickname, x, y, "player joined");

    self.bus.notify_all(&GameEvent::AddPlayer {
      player_id: player_id.to_string(),
      nickname: nickname.to_string(),
      x,
      y,
    });
  }

  /// Removal of an unknown id is a no-op at the store layer but still
  /// broadcasts, so mirrors converge regardless of delivery order.
  pub fn remove_player(&mut self, player_id: &str) {
    if self.players.remove(player_id).is_some() {
      tracing::debug!(player_id, "player left");
    }
    self.bus.notify_all(&GameEvent::RemovePlayer {
      player_id: player_id.to_string(),
    });
  }

  /// Spawns a fruit unless the population cap is reached; attempts beyond
  /// the cap are dropped silently. A missing id gets a generated one.
  pub fn add_fruit(&mut self, fruit_id: Option<String>, x: Option<i32>, y: Option<i32>) {
    if self.fruits.len() >= MAX_FRUITS {
      return;
    }
    let mut rng = rand::thread_rng();
    let fruit_id = fruit_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let x = x.unwrap_or_else(|| rng.gen_range(0..self.screen.width));
    let y = y.unwrap_or_else(|| rng.gen_range(0..self.screen.height));

    self.fruits.insert(
      fruit_id.clone(),
      Fruit {
        id: fruit_id.clone(),
        x,
        y,
      },
    );

    self.bus.notify_all(&GameEvent::AddFruit { fruit_id, x, y });
  }

  pub fn remove_fruit(&mut self, fruit_id: &str) {
    self.fruits.remove(fruit_id);
    self.bus.notify_all(&GameEvent::RemoveFruit {
      fruit_id: fruit_id.to_string(),
    });
  }

  pub fn move_player(&mut self, player_id: &str, key: &str) {
    // Raw echo first, before any validity check, so transports can relay
    // exactly what arrived.
    self.bus.notify_all(&GameEvent::MovePlayer {
      player_id: player_id.to_string(),
      direction: key.to_string(),
    });
    self.apply_move(player_id, key);
  }

  pub fn auto_move_player(&mut self, player_id: &str, key: &str) {
    self.bus.notify_all(&GameEvent::AutoMovePlayer {
      player_id: player_id.to_string(),
      direction: key.to_string(),
    });
    self.apply_move(player_id, key);
  }

  fn apply_move(&mut self, player_id: &str, key: &str) {
    let Some(direction) = parse_direction(key) else { return };
    let Some(player) = self.players.get_mut(player_id) else { return };

    player.last_key = Some(direction);
    let step = direction.vector();
    player.move_direction = step;
    player.x = wrap(player.x + step.x, self.screen.width);
    player.y = wrap(player.y - step.y, self.screen.height);

    let screen = self.screen;
    propagate_tail(player, &screen);

    // Fruit first: eating grows the tail that the player-collision check
    // below transfers.
    self.check_fruit_collision(player_id);
    self.check_player_collision(player_id);
  }

  /// Eats every fruit under the player's head. No early exit; coincident
  /// fruits are all consumed in the same tick.
  pub fn check_fruit_collision(&mut self, player_id: &str) {
    let Some(player) = self.players.get(player_id) else { return };
    let (head_x, head_y) = (player.x, player.y);
    let eaten: Vec<String> = self
      .fruits
      .values()
      .filter(|fruit| fruit.x == head_x && fruit.y == head_y)
      .map(|fruit| fruit.id.clone())
      .collect();

    for fruit_id in eaten {
      self.remove_fruit(&fruit_id);
      self.update_score(player_id);
      let screen = self.screen;
      if let Some(player) = self.players.get_mut(player_id) {
        grow_tail(player, &screen);
      }
    }
  }

  pub fn update_score(&mut self, player_id: &str) {
    let Some(player) = self.players.get_mut(player_id) else { return };
    player.score += 1;
    let score = player.score;
    self.bus.notify_all(&GameEvent::UpdateScore {
      player_id: player_id.to_string(),
      score,
    });
  }

  /// Checks this player's head against every other player, in ascending
  /// id order so simultaneous collisions resolve deterministically. Later
  /// collisions in the same pass observe the already-mutated state.
  pub fn check_player_collision(&mut self, player_id: &str) {
    let other_ids: Vec<String> = self
      .players
      .keys()
      .filter(|id| id.as_str() != player_id)
      .cloned()
      .collect();

    for other_id in other_ids {
      let collided = {
        let Some(player) = self.players.get(player_id) else { return };
        let Some(other) = self.players.get(&other_id) else { continue };
        let head_on_head = player.x == other.x && player.y == other.y;
        head_on_head
          || other
            .tail
            .iter()
            .any(|segment| segment.x == player.x && segment.y == player.y)
      };
      if collided {
        self.resolve_player_collision(player_id, &other_id);
      }
    }
  }

  /// The other player absorbs: this player's whole tail is appended to the
  /// other's tail in order, and the score is transferred, never destroyed.
  fn resolve_player_collision(&mut self, player_id: &str, other_player_id: &str) {
    self.bus.notify_all(&GameEvent::PlayerCollision {
      player_id: player_id.to_string(),
      other_player_id: other_player_id.to_string(),
    });

    let Some(player) = self.players.get_mut(player_id) else { return };
    let transferred: Vec<TailSegment> = std::mem::take(&mut player.tail);
    let score = player.score;
    player.score = 0;
    tracing::debug!(
      player_id,
      other_player_id,
      segments = transferred.len(),
      score,
      "player absorbed"
    );

    let Some(other) = self.players.get_mut(other_player_id) else { return };
    other.tail.extend(transferred);
    other.score += score;
  }

  /// Auto-move tick body: re-applies each player's last recorded key so
  /// motion continues without fresh input. Players that never moved are
  /// skipped.
  pub fn auto_move_tick(&mut self) {
    let moves: Vec<(String, Direction)> = self
      .players
      .iter()
      .filter_map(|(id, player)| player.last_key.map(|key| (id.clone(), key)))
      .collect();

    for (player_id, key) in moves {
      self.auto_move_player(&player_id, key.key());
    }
  }

  /// Spawn tick body: one random fruit attempt, bounded by the cap.
  pub fn spawn_fruit_tick(&mut self) {
    self.add_fruit(None, None, None);
  }
}

impl Default for GameState {
  fn default() -> Self {
    Self::new()
  }
}
