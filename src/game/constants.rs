pub const DEFAULT_SCREEN_WIDTH: i32 = 50;
pub const DEFAULT_SCREEN_HEIGHT: i32 = 50;
pub const MAX_FRUITS: usize = 20;
pub const AUTO_MOVE_INTERVAL_MS: u64 = 500;
pub const FRUIT_SPAWN_INTERVAL_MS: u64 = 2000;
