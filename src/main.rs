use grid_snake::{Command, Game, Screen};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// Headless demo session: two scripted players on a small grid, events
// logged as JSON. Rendering and transport layers subscribe the same way.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let run_seconds: u64 = env::var("RUN_SECONDS")
    .ok()
    .and_then(|value| value.parse().ok())
    .unwrap_or(5);

  let game = Arc::new(Game::with_screen(Screen {
    width: 20,
    height: 20,
  }));

  game
    .subscribe(Box::new(|event| match serde_json::to_string(event) {
      Ok(json) => tracing::info!(%json, "event"),
      Err(error) => tracing::warn!(?error, "failed to serialize event"),
    }))
    .await;

  game
    .apply(Command::AddPlayer {
      player_id: "ana".to_string(),
      nickname: "Ana".to_string(),
      x: Some(5),
      y: Some(10),
    })
    .await;
  game
    .apply(Command::AddPlayer {
      player_id: "bob".to_string(),
      nickname: "Bob".to_string(),
      x: Some(15),
      y: Some(10),
    })
    .await;
  game
    .apply(Command::AddFruit {
      fruit_id: None,
      x: Some(6),
      y: Some(10),
    })
    .await;

  game.start();

  game
    .apply(Command::MovePlayer {
      player_id: "ana".to_string(),
      direction: "right".to_string(),
    })
    .await;
  game
    .apply(Command::MovePlayer {
      player_id: "bob".to_string(),
      direction: "left".to_string(),
    })
    .await;

  tokio::time::sleep(Duration::from_secs(run_seconds)).await;

  let snapshot = game.snapshot().await;
  println!("{}", serde_json::to_string_pretty(&snapshot)?);

  Ok(())
}
