//! Move scheduler: one `Player` per role
//!
//! Each move request goes Updating → Budgeting → Racing → Joining → Selecting → Applying:
//! 1. The opponent's move is applied to the round view on the calling thread
//! 2. The pace controller hands out this move's budget and sample parameters, and the calling
//!    thread draws the random baseline; without one the player is exhausted
//! 3. Every eligible strategy is spawned on the rayon pool against an `Arc` snapshot
//! 4. Results are collected until all strategies reported or the shared deadline passed
//! 5. The extremal-quality candidate for the role wins; ties keep the earlier one
//! 6. The winner is applied and returned
//!
//! Strategies never see mutable state. The view is only mutated through `Arc::make_mut`, which
//! copies it if an abandoned task still holds the previous snapshot.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::error::PlayerError;
use crate::game_state::RoundView;
use crate::heuristics;
use crate::journal::{Journal, JournalEntry};
use crate::pace::{PaceController, SampleParameters};
use crate::profiler::{RunOutcome, StrategyProfiler};
use crate::strategy::{
    random_move, Candidate, RaceClock, Strategy, StrategyContext, StrategyName, VertexRanking,
};
use crate::types::{GameMove, Graph, Role};

/// What one spawned strategy sends back
struct TaskReport {
    index: usize,
    candidate: Option<Candidate>,
}

/// Everything needed to run one strategy off the calling thread
struct RaceTask {
    index: usize,
    seed: u64,
    role: Role,
    samples: SampleParameters,
    last: Option<GameMove>,
    opening: bool,
    view: Arc<RoundView>,
    ranking: Arc<VertexRanking>,
    strategies: Arc<Vec<Box<dyn Strategy>>>,
    config: Arc<Config>,
    clock: Arc<RaceClock>,
    profiler: Arc<StrategyProfiler>,
}

impl RaceTask {
    fn run(self) -> TaskReport {
        let strategy = &self.strategies[self.index];
        let started = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut ctx = StrategyContext {
                view: &self.view,
                ranking: &self.ranking,
                role: self.role,
                samples: self.samples,
                rng: StdRng::seed_from_u64(self.seed),
                clock: &self.clock,
                tuning: &self.config.strategies,
                index_tuning: &self.config.index,
                retry_factor: self.config.sampling.retry_factor,
            };
            match (self.opening, self.last) {
                (false, Some(last)) => strategy.execute(&mut ctx, last),
                (_, last) => strategy.opening(&mut ctx, last),
            }
        }));

        let outcome = match &result {
            Ok(Some(_)) => RunOutcome::Produced,
            Ok(None) => RunOutcome::Empty,
            Err(_) => RunOutcome::Panicked,
        };
        self.profiler
            .record_run(strategy.name(), started.elapsed(), outcome);
        if outcome == RunOutcome::Panicked {
            warn!("Strategy {} panicked, ignoring it this move", strategy.name());
        }

        TaskReport {
            index: self.index,
            candidate: result.ok().flatten(),
        }
    }
}

/// Per-round state, dropped by `end_round`
struct Round {
    role: Role,
    view: Arc<RoundView>,
    ranking: Arc<VertexRanking>,
    strategies: Arc<Vec<Box<dyn Strategy>>>,
    pace: PaceController,
    journal: Journal,
    rng: StdRng,
    /// Most recent move applied by either side
    last_applied: Option<GameMove>,
}

/// A crossing-game player for one role at a time
pub struct Player {
    name: String,
    config: Arc<Config>,
    pool: rayon::ThreadPool,
    rng: StdRng,
    profiler: Arc<StrategyProfiler>,
    round: Option<Round>,
}

impl Player {
    /// Builds the worker pool. `seed` makes every random choice of this player reproducible.
    pub fn new(name: impl Into<String>, config: Config, seed: u64) -> Result<Self, PlayerError> {
        let name = name.into();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.scheduler.worker_threads)
            .thread_name({
                let name = name.clone();
                move |i| format!("{}-strategy-{}", name, i)
            })
            .build()
            .map_err(|e| PlayerError::ThreadPool(e.to_string()))?;

        Ok(Player {
            profiler: Arc::new(StrategyProfiler::new(config.profiling.clone())),
            config: Arc::new(config),
            pool,
            rng: StdRng::seed_from_u64(seed),
            round: None,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Role of the running round
    pub fn role(&self) -> Option<Role> {
        self.round.as_ref().map(|r| r.role)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn profiler(&self) -> &StrategyProfiler {
        &self.profiler
    }

    /// Snapshot of the running round
    pub fn view(&self) -> Option<&RoundView> {
        self.round.as_ref().map(|r| r.view.as_ref())
    }

    pub fn pace(&self) -> Option<&PaceController> {
        self.round.as_ref().map(|r| &r.pace)
    }

    /// Starts a round with the default strategies for `role`
    pub fn start_round(&mut self, graph: Arc<Graph>, width: i32, height: i32, role: Role) {
        let ranking = VertexRanking::new(&graph, width, height);
        let strategies = heuristics::roster(role, &self.config.strategies, width, height, &ranking);
        self.start_round_with(graph, width, height, role, ranking, strategies);
    }

    /// Starts a round racing a custom set of strategies, in the given order
    pub fn start_round_with_strategies(
        &mut self,
        graph: Arc<Graph>,
        width: i32,
        height: i32,
        role: Role,
        strategies: Vec<Box<dyn Strategy>>,
    ) {
        let ranking = VertexRanking::new(&graph, width, height);
        self.start_round_with(graph, width, height, role, ranking, strategies);
    }

    fn start_round_with(
        &mut self,
        graph: Arc<Graph>,
        width: i32,
        height: i32,
        role: Role,
        ranking: VertexRanking,
        strategies: Vec<Box<dyn Strategy>>,
    ) {
        if self.round.is_some() {
            warn!("{}: starting a new round before the previous one ended", self.name);
            self.end_round();
        }

        let journal = Journal::for_player(&self.config.journal, &self.name);
        journal.record(JournalEntry::round_start(&self.name, role, &graph, width, height));

        let names: Vec<&str> = strategies.iter().map(|s| s.name().as_str()).collect();
        info!(
            "{}: round start as {} ({} vertices, {} edges, {}x{} canvas), strategies: {}",
            self.name,
            role.as_str(),
            graph.vertex_count(),
            graph.edges().len(),
            width,
            height,
            names.join(", ")
        );

        let view = RoundView::new(
            Arc::clone(&graph),
            width,
            height,
            self.config.index.big_tree_threshold,
        );
        self.round = Some(Round {
            role,
            pace: PaceController::new(graph.vertex_count(), &self.config.timing, &self.config.sampling),
            view: Arc::new(view),
            ranking: Arc::new(ranking),
            strategies: Arc::new(strategies),
            journal,
            rng: StdRng::seed_from_u64(self.rng.random()),
            last_applied: None,
        });
    }

    /// Answers the opponent's `last` move (none on the opening move) with this player's move
    pub fn compute_move(&mut self, last: Option<GameMove>) -> Result<GameMove, PlayerError> {
        let round = self.round.as_mut().ok_or(PlayerError::NoActiveRound)?;
        round.pace.start_timer();

        // Updating
        if let Some(mv) = last {
            if let Err(e) = Arc::make_mut(&mut round.view).apply(&mv) {
                round.pace.stop_timer();
                return Err(e.into());
            }
            round.pace.record_opponent_move();
            round.last_applied = Some(mv);
            round.journal.record(JournalEntry::opponent_move(round.role, &mv));
        }

        // Budgeting
        let budget = round.pace.per_move_budget();
        let samples = round.pace.adjust_sample_parameters();
        let progress = round.pace.progress();
        let clock = Arc::new(RaceClock::new(budget));
        let opening = round.view.state.placed_count() == 0;
        let last_move = last.or(round.last_applied);

        // The fallback doubles as the exhaustion check: without it nothing is worth racing
        let Some(baseline) = random_move(&round.view, &mut round.rng)
            .map(|mv| Candidate::evaluate(&round.view, mv.vertex, mv.coord))
        else {
            round.pace.stop_timer();
            warn!("{}: no free cell or unplaced vertex left", self.name);
            return Err(PlayerError::Exhausted);
        };

        // Racing
        let (tx, rx) = mpsc::channel::<TaskReport>();
        let mut spawned: Vec<usize> = Vec::new();
        for (index, strategy) in round.strategies.iter().enumerate() {
            if !strategy.is_eligible(&progress) {
                continue;
            }
            let task = RaceTask {
                index,
                seed: round.rng.random(),
                role: round.role,
                samples,
                last: last_move,
                opening,
                view: Arc::clone(&round.view),
                ranking: Arc::clone(&round.ranking),
                strategies: Arc::clone(&round.strategies),
                config: Arc::clone(&self.config),
                clock: Arc::clone(&clock),
                profiler: Arc::clone(&self.profiler),
            };
            let tx = tx.clone();
            self.pool.spawn(move || {
                // The receiver is gone once the scheduler stopped waiting
                let _ = tx.send(task.run());
            });
            spawned.push(index);
        }
        drop(tx);

        // Joining
        let mut results: Vec<Option<Option<Candidate>>> = vec![None; round.strategies.len()];
        let mut pending = spawned.len();
        while pending > 0 {
            match rx.recv_timeout(clock.remaining()) {
                Ok(report) => {
                    results[report.index] = Some(report.candidate);
                    pending -= 1;
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        clock.cancel();

        // Selecting
        let mut best = baseline;
        let mut winner = StrategyName::Baseline;
        for &index in &spawned {
            let name = round.strategies[index].name();
            let candidate = match results[index] {
                None => {
                    debug!("{} did not finish within {:?}", name, budget);
                    self.profiler.record_timeout(name);
                    continue;
                }
                Some(None) => {
                    debug!("{} found no move", name);
                    continue;
                }
                Some(Some(candidate)) => candidate,
            };
            if let Err(e) = round.view.state.validate(&round.view.graph, &candidate.to_move()) {
                warn!("{} proposed an illegal move ({}), ignoring it", name, e);
                continue;
            }
            debug!(
                "{} proposes {} at {} (quality {})",
                name, candidate.vertex, candidate.coord, candidate.quality
            );
            if round.role.prefers(candidate.quality, best.quality) {
                best = candidate;
                winner = name;
            }
        }

        // Applying
        let chosen = best.to_move();
        if let Err(e) = Arc::make_mut(&mut round.view).apply(&chosen) {
            round.pace.stop_timer();
            return Err(e.into());
        }
        round.last_applied = Some(chosen);
        round.pace.record_own_move(winner);
        let elapsed = round.pace.stop_timer();
        self.profiler.record_win(winner);
        round.journal.record(JournalEntry::own_move(
            round.role,
            &chosen,
            winner,
            best.quality,
            elapsed,
        ));

        info!(
            "{} ({}): {} -> {} via {} (quality {}, {}/{} reported, {:.1}ms of {:?})",
            self.name,
            round.role.as_str(),
            chosen.vertex,
            chosen.coord,
            winner,
            best.quality,
            spawned.len() - pending,
            spawned.len(),
            elapsed.as_secs_f64() * 1000.0,
            budget
        );

        Ok(chosen)
    }

    /// Reports the round and releases its state
    pub fn end_round(&mut self) {
        let Some(round) = self.round.take() else {
            return;
        };
        info!(
            "{}: round as {} over, {} of {} vertices placed",
            self.name,
            round.role.as_str(),
            round.view.state.placed_count(),
            round.view.graph.vertex_count()
        );
        round.pace.report();
        self.profiler.print_report(&self.name);
        round.journal.close();
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        if let Some(round) = self.round.take() {
            round.journal.close();
        }
    }
}
