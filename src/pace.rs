// Time budgeting and adaptive sampling for one round
// Also keeps the observer bookkeeping: progress through the round and which strategies won moves

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::config::{SamplingConfig, TimingConfig};
use crate::strategy::{Progress, StrategyName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleAdjustment {
    Increment,
    Decrement,
    Keep,
}

/// How widely strategies sample this move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleParameters {
    pub adjustment: SampleAdjustment,
    pub samples: u32,
    /// Added to the half extents of sampling boxes
    pub perimeter: u32,
}

impl SampleParameters {
    pub fn new(samples: u32, perimeter: u32) -> Self {
        SampleParameters {
            adjustment: SampleAdjustment::Keep,
            samples: samples.max(1),
            perimeter: perimeter.max(1),
        }
    }

    fn apply(&mut self, adjustment: SampleAdjustment) {
        self.adjustment = adjustment;
        match adjustment {
            SampleAdjustment::Increment => {
                self.samples = self.samples.saturating_add(1);
                self.perimeter = self.perimeter.saturating_add(1);
            }
            SampleAdjustment::Decrement => {
                self.samples = self.samples.saturating_sub(1).max(1);
                self.perimeter = self.perimeter.saturating_sub(1).max(1);
            }
            SampleAdjustment::Keep => {}
        }
    }
}

/// Per-round pacing state of one player
#[derive(Debug, Clone)]
pub struct PaceController {
    timing: TimingConfig,
    total_vertices: usize,
    placed: usize,
    own_moves: usize,
    started: Option<Instant>,
    total_elapsed: Duration,
    last_duration: Duration,
    params: SampleParameters,
    usage: BTreeMap<StrategyName, usize>,
    usage_order: Vec<StrategyName>,
}

impl PaceController {
    pub fn new(total_vertices: usize, timing: &TimingConfig, sampling: &SamplingConfig) -> Self {
        PaceController {
            timing: timing.clone(),
            total_vertices,
            placed: 0,
            own_moves: 0,
            started: None,
            total_elapsed: Duration::ZERO,
            last_duration: Duration::ZERO,
            params: SampleParameters::new(sampling.initial_samples, sampling.initial_perimeter),
            usage: BTreeMap::new(),
            usage_order: Vec::new(),
        }
    }

    /// `(limit - buffer) / (vertices / 2)`, never below the configured floor
    pub fn per_move_budget(&self) -> Duration {
        let usable = self
            .timing
            .match_time_limit()
            .saturating_sub(self.timing.safety_buffer());
        let own_moves = u32::try_from((self.total_vertices / 2).max(1)).unwrap_or(u32::MAX);
        (usable / own_moves).max(self.timing.min_move_budget())
    }

    pub fn start_timer(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Stops the running timer and records its duration. Zero if no timer ran.
    pub fn stop_timer(&mut self) -> Duration {
        let elapsed = self.started.take().map(|s| s.elapsed()).unwrap_or_default();
        self.record_move_duration(elapsed);
        elapsed
    }

    #[cfg(test)]
    pub(crate) fn timer_running(&self) -> bool {
        self.started.is_some()
    }

    pub fn record_move_duration(&mut self, duration: Duration) {
        self.last_duration = duration;
        self.total_elapsed += duration;
    }

    pub fn total_elapsed(&self) -> Duration {
        self.total_elapsed
    }

    pub fn last_move_duration(&self) -> Duration {
        self.last_duration
    }

    /// Grows sampling when the last move left more than the slack margin unused,
    /// shrinks it when the last move overran the budget
    pub fn adjust_sample_parameters(&mut self) -> SampleParameters {
        let budget = self.per_move_budget();
        let adjustment = if self.last_duration > budget {
            SampleAdjustment::Decrement
        } else if budget - self.last_duration > self.timing.slack_margin() {
            SampleAdjustment::Increment
        } else {
            SampleAdjustment::Keep
        };
        self.params.apply(adjustment);
        self.params
    }

    pub fn record_own_move(&mut self, strategy: StrategyName) {
        self.placed += 1;
        self.own_moves += 1;
        *self.usage.entry(strategy).or_insert(0) += 1;
        self.usage_order.push(strategy);
    }

    pub fn record_opponent_move(&mut self) {
        self.placed += 1;
    }

    pub fn placed(&self) -> usize {
        self.placed
    }

    pub fn remaining_moves(&self) -> usize {
        self.total_vertices.saturating_sub(self.placed)
    }

    pub fn percent_placed(&self) -> f64 {
        if self.total_vertices == 0 {
            return 100.0;
        }
        self.placed as f64 * 100.0 / self.total_vertices as f64
    }

    pub fn progress(&self) -> Progress {
        Progress {
            percent_placed: self.percent_placed(),
            moves_remaining: self.remaining_moves(),
            total_moves: self.total_vertices,
        }
    }

    pub fn usage(&self, strategy: StrategyName) -> usize {
        self.usage.get(&strategy).copied().unwrap_or(0)
    }

    /// Winning strategy of each own move, in move order
    pub fn usage_order(&self) -> &[StrategyName] {
        &self.usage_order
    }

    pub fn report(&self) {
        log::info!(
            "Pace: {} own moves, {:.1}% placed, {:?} thinking, budget {:?}/move, samples={} perimeter={}",
            self.own_moves,
            self.percent_placed(),
            self.total_elapsed,
            self.per_move_budget(),
            self.params.samples,
            self.params.perimeter
        );
        for (name, count) in &self.usage {
            log::info!("  {:<28} {:>5} moves", name.as_str(), count);
        }
        let order: Vec<&str> = self.usage_order.iter().map(|n| n.as_str()).collect();
        log::debug!("Strategy order: {}", order.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn timing(limit_ms: u64, buffer_ms: u64, slack_ms: u64) -> TimingConfig {
        TimingConfig {
            match_time_limit_ms: limit_ms,
            safety_buffer_ms: buffer_ms,
            min_move_budget_ms: 1,
            slack_margin_ms: slack_ms,
        }
    }

    fn sampling(samples: u32, perimeter: u32) -> SamplingConfig {
        SamplingConfig {
            initial_samples: samples,
            initial_perimeter: perimeter,
            retry_factor: 4,
        }
    }

    #[test]
    fn test_budget_splits_usable_time_over_own_moves() {
        let pace = PaceController::new(4, &timing(10, 0, 1), &sampling(10, 3));
        assert_eq!(pace.per_move_budget(), Duration::from_millis(5));
    }

    #[test]
    fn test_budget_is_never_zero() {
        let pace = PaceController::new(1_000_000, &timing(10, 10, 1), &sampling(10, 1));
        assert_eq!(pace.per_move_budget(), Duration::from_millis(1));

        // One vertex still counts as one own move
        let pace = PaceController::new(1, &timing(10, 0, 1), &sampling(10, 1));
        assert_eq!(pace.per_move_budget(), Duration::from_millis(10));
    }

    #[test]
    fn test_default_budget() {
        let config = Config::default_hardcoded();
        let pace = PaceController::new(100, &config.timing, &config.sampling);
        assert_eq!(pace.per_move_budget(), Duration::from_millis(290_000 / 50));
    }

    #[test]
    fn test_overrun_decrements_samples() {
        let mut pace = PaceController::new(4, &timing(10, 0, 1), &sampling(10, 3));
        pace.record_move_duration(Duration::from_millis(6));
        let params = pace.adjust_sample_parameters();
        assert_eq!(params.adjustment, SampleAdjustment::Decrement);
        assert_eq!(params.samples, 9);
        assert_eq!(params.perimeter, 2);
    }

    #[test]
    fn test_slack_increments_samples() {
        let mut pace = PaceController::new(4, &timing(10_000, 0, 1_000), &sampling(10, 1));
        pace.record_move_duration(Duration::from_millis(100));
        let params = pace.adjust_sample_parameters();
        assert_eq!(params.adjustment, SampleAdjustment::Increment);
        assert_eq!(params.samples, 11);
        assert_eq!(params.perimeter, 2);
    }

    #[test]
    fn test_within_slack_keeps_samples() {
        let mut pace = PaceController::new(4, &timing(10_000, 0, 1_000), &sampling(10, 1));
        pace.record_move_duration(Duration::from_millis(4_500));
        let params = pace.adjust_sample_parameters();
        assert_eq!(params.adjustment, SampleAdjustment::Keep);
        assert_eq!(params.samples, 10);
    }

    #[test]
    fn test_samples_floor_at_one() {
        let mut pace = PaceController::new(4, &timing(10, 0, 1), &sampling(1, 1));
        for _ in 0..3 {
            pace.record_move_duration(Duration::from_millis(50));
            let params = pace.adjust_sample_parameters();
            assert_eq!(params.samples, 1);
            assert_eq!(params.perimeter, 1);
        }
    }

    #[test]
    fn test_elapsed_accumulates() {
        let mut pace = PaceController::new(4, &timing(10, 0, 1), &sampling(1, 1));
        pace.record_move_duration(Duration::from_millis(3));
        pace.record_move_duration(Duration::from_millis(4));
        assert_eq!(pace.total_elapsed(), Duration::from_millis(7));
        assert_eq!(pace.last_move_duration(), Duration::from_millis(4));
        assert_eq!(pace.stop_timer(), Duration::ZERO);
    }

    #[test]
    fn test_progress_and_usage_bookkeeping() {
        let mut pace = PaceController::new(4, &timing(10, 0, 1), &sampling(1, 1));
        pace.record_own_move(StrategyName::RandomMove);
        pace.record_opponent_move();
        pace.record_own_move(StrategyName::MinimizeEllipse);

        let progress = pace.progress();
        assert_eq!(progress.moves_remaining, 1);
        assert_eq!(progress.moves_made(), 3);
        assert!((progress.percent_placed - 75.0).abs() < 1e-9);
        assert_eq!(pace.usage(StrategyName::RandomMove), 1);
        assert_eq!(pace.usage(StrategyName::BruteforceCrossing), 0);
        assert_eq!(
            pace.usage_order(),
            &[StrategyName::RandomMove, StrategyName::MinimizeEllipse]
        );
    }
}
