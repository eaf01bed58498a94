//! Core types: players, RNG, configuration.

pub mod config;
pub mod player;
pub mod rng;

pub use config::{AnimSpeed, AppConfig, ConfigError};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
