// Replay module for checking recorded rounds offline
//
// This module provides functionality to:
// 1. Parse JSONL move journals
// 2. Rebuild each round and re-apply its moves, checking legality
// 3. Summarise which strategies produced the player's moves and how long they took

use log::{info, warn};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{GameError, ReplayError};
use crate::game_state::RoundView;
use crate::journal::JournalEntry;
use crate::strategy::StrategyName;
use crate::types::{Coord, GameMove, Graph, Role};

/// One journaled placement
#[derive(Debug, Clone)]
pub struct RecordedMove {
    pub actor: Role,
    pub mv: GameMove,
    pub strategy: Option<StrategyName>,
    pub quality: Option<u64>,
    pub elapsed_ms: Option<f64>,
}

/// One journaled round
#[derive(Debug, Clone)]
pub struct RecordedRound {
    pub player: String,
    pub role: Role,
    pub width: i32,
    pub height: i32,
    pub graph: Arc<Graph>,
    pub moves: Vec<RecordedMove>,
}

/// Result of re-applying one round
#[derive(Debug, Clone)]
pub struct RoundReplay {
    pub round: usize,
    pub player: String,
    pub role: Role,
    pub moves_applied: usize,
    /// (move index, move, reason)
    pub illegal: Vec<(usize, GameMove, GameError)>,
    pub completed: bool,
    pub estimated_crossings: u64,
    pub strategy_wins: BTreeMap<StrategyName, usize>,
    pub own_moves: usize,
    pub avg_elapsed_ms: f64,
    pub max_elapsed_ms: f64,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub rounds: usize,
    pub completed_rounds: usize,
    pub moves: usize,
    pub illegal_moves: usize,
}

/// Replay engine for move journals
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all entries from a JSONL journal, skipping blank lines
    pub fn load_journal<P: AsRef<Path>>(&self, path: P) -> Result<Vec<JournalEntry>, ReplayError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: JournalEntry =
                serde_json::from_str(&line).map_err(|source| ReplayError::Parse {
                    line: line_num + 1,
                    source,
                })?;
            entries.push(entry);
        }

        info!("Loaded {} journal entries", entries.len());
        Ok(entries)
    }

    /// Groups entries into rounds, each opened by a `RoundStart`
    pub fn group_rounds(&self, entries: &[JournalEntry]) -> Result<Vec<RecordedRound>, ReplayError> {
        let mut rounds: Vec<RecordedRound> = Vec::new();

        for (i, entry) in entries.iter().enumerate() {
            match entry {
                JournalEntry::RoundStart {
                    player,
                    role,
                    width,
                    height,
                    vertices,
                    edges,
                    ..
                } => rounds.push(RecordedRound {
                    player: player.clone(),
                    role: *role,
                    width: *width,
                    height: *height,
                    graph: Arc::new(Graph::new(*vertices, edges)),
                    moves: Vec::new(),
                }),
                JournalEntry::Move {
                    actor,
                    vertex,
                    x,
                    y,
                    strategy,
                    quality,
                    elapsed_ms,
                    ..
                } => {
                    let round = rounds
                        .last_mut()
                        .ok_or(ReplayError::MoveOutsideRound { line: i + 1 })?;
                    round.moves.push(RecordedMove {
                        actor: *actor,
                        mv: GameMove::new(*vertex, Coord::new(*x, *y)),
                        strategy: strategy.as_deref().and_then(StrategyName::parse),
                        quality: *quality,
                        elapsed_ms: *elapsed_ms,
                    });
                }
            }
        }

        Ok(rounds)
    }

    /// Re-applies every move of `round` to a fresh view
    pub fn replay_round(&self, index: usize, round: &RecordedRound) -> RoundReplay {
        let mut view = RoundView::new(
            Arc::clone(&round.graph),
            round.width,
            round.height,
            self.config.index.big_tree_threshold,
        );
        let mut illegal = Vec::new();
        let mut strategy_wins: BTreeMap<StrategyName, usize> = BTreeMap::new();
        let mut elapsed = Vec::new();

        for (i, recorded) in round.moves.iter().enumerate() {
            if let Err(e) = view.apply(&recorded.mv) {
                warn!(
                    "Round {}: move {} ({} -> {}) is illegal: {}",
                    index, i, recorded.mv.vertex, recorded.mv.coord, e
                );
                illegal.push((i, recorded.mv, e));
                continue;
            }
            if recorded.actor == round.role {
                if let Some(name) = recorded.strategy {
                    *strategy_wins.entry(name).or_insert(0) += 1;
                }
                if let Some(ms) = recorded.elapsed_ms {
                    elapsed.push(ms);
                }
            }
            if self.verbose {
                info!(
                    "Round {} move {}: {} places {} at {} ({}, quality {})",
                    index,
                    i,
                    recorded.actor.as_str(),
                    recorded.mv.vertex,
                    recorded.mv.coord,
                    recorded.strategy.map(|s| s.as_str()).unwrap_or("-"),
                    recorded
                        .quality
                        .map(|q| q.to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
            }
        }

        let own_moves = round.moves.iter().filter(|m| m.actor == round.role).count();
        let avg_elapsed_ms = if elapsed.is_empty() {
            0.0
        } else {
            elapsed.iter().sum::<f64>() / elapsed.len() as f64
        };

        RoundReplay {
            round: index,
            player: round.player.clone(),
            role: round.role,
            moves_applied: round.moves.len() - illegal.len(),
            completed: view.state.placed_count() == round.graph.vertex_count(),
            estimated_crossings: view.estimated_crossings(),
            illegal,
            strategy_wins,
            own_moves,
            avg_elapsed_ms,
            max_elapsed_ms: elapsed.iter().copied().fold(0.0, f64::max),
        }
    }

    pub fn replay_all(&self, rounds: &[RecordedRound]) -> Vec<RoundReplay> {
        rounds
            .iter()
            .enumerate()
            .map(|(i, r)| self.replay_round(i, r))
            .collect()
    }

    pub fn generate_stats(&self, results: &[RoundReplay]) -> ReplayStats {
        ReplayStats {
            rounds: results.len(),
            completed_rounds: results.iter().filter(|r| r.completed).count(),
            moves: results.iter().map(|r| r.moves_applied + r.illegal.len()).sum(),
            illegal_moves: results.iter().map(|r| r.illegal.len()).sum(),
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[RoundReplay]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Rounds:          {}", stats.rounds);
        println!("Completed:       {}", stats.completed_rounds);
        println!("Moves:           {}", stats.moves);
        println!("Illegal moves:   {}", stats.illegal_moves);
        println!("═══════════════════════════════════════════════════════════\n");

        for r in results {
            println!(
                "Round {} - {} as {}: {} moves, ~{} crossings, own moves {} (avg {:.2}ms, max {:.2}ms)",
                r.round,
                r.player,
                r.role.as_str(),
                r.moves_applied,
                r.estimated_crossings,
                r.own_moves,
                r.avg_elapsed_ms,
                r.max_elapsed_ms
            );
            for (name, wins) in &r.strategy_wins {
                println!("    {:<28} {:>5}", name.as_str(), wins);
            }
            for (i, mv, e) in &r.illegal {
                println!("    ✗ move {}: {} -> {}: {}", i, mv.vertex, mv.coord, e);
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VertexId;

    fn start(vertices: usize, edges: Vec<(u32, u32)>) -> JournalEntry {
        JournalEntry::RoundStart {
            player: "p".into(),
            role: Role::Max,
            width: 3,
            height: 3,
            vertices,
            edges,
            timestamp: String::new(),
        }
    }

    fn placed(actor: Role, v: u32, x: i32, y: i32) -> JournalEntry {
        JournalEntry::Move {
            round_role: Role::Max,
            actor,
            vertex: VertexId(v),
            x,
            y,
            strategy: (actor == Role::Max).then(|| "random_move".to_string()),
            quality: None,
            elapsed_ms: (actor == Role::Max).then_some(2.0),
            timestamp: String::new(),
        }
    }

    #[test]
    fn test_replay_flags_illegal_moves() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![
            start(3, vec![(0, 1), (1, 2), (2, 0)]),
            placed(Role::Max, 0, 0, 0),
            placed(Role::Min, 1, 0, 0),
            placed(Role::Min, 1, 2, 2),
            placed(Role::Max, 2, 1, 2),
        ];
        let rounds = engine.group_rounds(&entries).unwrap();
        assert_eq!(rounds.len(), 1);

        let result = engine.replay_round(0, &rounds[0]);
        assert_eq!(result.illegal.len(), 1);
        assert_eq!(result.illegal[0].0, 1);
        assert_eq!(result.illegal[0].2, GameError::Occupied(Coord::new(0, 0)));
        assert!(result.completed);
        assert_eq!(result.own_moves, 2);
        assert_eq!(result.strategy_wins.get(&StrategyName::RandomMove), Some(&2));
        assert!((result.avg_elapsed_ms - 2.0).abs() < 1e-9);

        let stats = engine.generate_stats(&[result]);
        assert_eq!(stats.moves, 4);
        assert_eq!(stats.illegal_moves, 1);
    }

    #[test]
    fn test_move_before_round_start_is_rejected() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![placed(Role::Max, 0, 0, 0)];
        assert!(matches!(
            engine.group_rounds(&entries),
            Err(ReplayError::MoveOutsideRound { line: 1 })
        ));
    }

    #[test]
    fn test_missing_journal_is_io_error() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        assert!(matches!(
            engine.load_journal("does-not-exist.jsonl"),
            Err(ReplayError::Io(_))
        ));
    }
}
