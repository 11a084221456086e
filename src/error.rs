//! Error types for the player
//!
//! Strategy failures never surface here: they are logged and excluded from selection.

use crate::types::{Coord, VertexId};

/// Rejected placements
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("coordinate {0} is outside the canvas")]
    OutOfBounds(Coord),

    #[error("coordinate {0} is already used")]
    Occupied(Coord),

    #[error("vertex {0} is already placed")]
    AlreadyPlaced(VertexId),

    #[error("vertex {0} is not part of the graph")]
    UnknownVertex(VertexId),
}

/// Failures of the move entry point
#[derive(thiserror::Error, Debug)]
pub enum PlayerError {
    /// compute_move was called before start_round
    #[error("no round has been started")]
    NoActiveRound,

    /// The referee forwarded a move that cannot be applied
    #[error("illegal move: {0}")]
    IllegalMove(#[from] GameError),

    /// No unplaced vertex or no free cell left; the board is full
    #[error("no legal move left (all vertices placed or canvas full)")]
    Exhausted,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Configuration loading failures
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Journal loading failures
#[derive(thiserror::Error, Debug)]
pub enum ReplayError {
    #[error("failed to open journal: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("move on line {line} comes before any round start")]
    MoveOutsideRound { line: usize },
}
