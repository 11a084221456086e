// In-process referee: lets two players place a whole graph against each other

use log::info;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{GameError, PlayerError};
use crate::game_state::RoundView;
use crate::scheduler::Player;
use crate::types::{GameMove, Graph, Role};

/// Outcome of one round as seen by the referee
#[derive(Debug, Clone)]
pub struct RoundSummary {
    pub max_player: String,
    pub min_player: String,
    pub moves: Vec<GameMove>,
    /// Every vertex got placed
    pub completed: bool,
    pub estimated_crossings: u64,
    pub max_thinking: Duration,
    pub min_thinking: Duration,
}

/// Plays one round, `max` moving first. The referee keeps its own view and rejects illegal moves.
pub fn play_round(
    max: &mut Player,
    min: &mut Player,
    graph: Arc<Graph>,
    width: i32,
    height: i32,
) -> Result<RoundSummary, PlayerError> {
    max.start_round(Arc::clone(&graph), width, height, Role::Max);
    min.start_round(Arc::clone(&graph), width, height, Role::Min);

    let threshold = max.config().index.big_tree_threshold;
    let mut referee = RoundView::new(Arc::clone(&graph), width, height, threshold);
    let total = graph.vertex_count().min(referee.state.cell_count());
    let mut moves = Vec::with_capacity(total);
    let mut thinking = [Duration::ZERO; 2];
    let mut last: Option<GameMove> = None;

    while moves.len() < total {
        let turn = moves.len() % 2;
        let player = if turn == 0 { &mut *max } else { &mut *min };
        let started = Instant::now();
        let mv = player.compute_move(last)?;
        thinking[turn] += started.elapsed();
        referee.apply(&mv).map_err(|e: GameError| {
            log::error!("{} played an illegal move {:?}: {}", player.name(), mv, e);
            PlayerError::IllegalMove(e)
        })?;
        moves.push(mv);
        last = Some(mv);
    }

    max.end_round();
    min.end_round();

    let summary = RoundSummary {
        max_player: max.name().to_string(),
        min_player: min.name().to_string(),
        completed: referee.state.placed_count() == graph.vertex_count(),
        estimated_crossings: referee.estimated_crossings(),
        max_thinking: thinking[0],
        min_thinking: thinking[1],
        moves,
    };
    info!(
        "Round over: {} (max) vs {} (min), {} moves, ~{} crossings, thinking {:?} / {:?}",
        summary.max_player,
        summary.min_player,
        summary.moves.len(),
        summary.estimated_crossings,
        summary.max_thinking,
        summary.min_thinking
    );
    Ok(summary)
}
