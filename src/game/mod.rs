pub mod constants;
pub mod events;
pub mod input;
pub mod math;
pub mod state;
pub mod tail;
pub mod types;
