// Library exports for the crossing player
// This allows the self-play driver, the replay tool and the integration tests to use the core player logic

pub mod config;
pub mod error;
pub mod game_state;
pub mod heuristics;
pub mod journal;
pub mod pace;
pub mod profiler;
pub mod replay;
pub mod scheduler;
pub mod self_play;
pub mod spatial_index;
pub mod strategy;
pub mod types;
