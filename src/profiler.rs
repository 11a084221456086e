//! Per-strategy profiling
//!
//! Worker threads record how long each strategy ran and what came of it; the scheduler records
//! timeouts and which strategy won the move. All counters are lock-free atomics so recording from
//! the race never contends.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::config::ProfilingConfig;
use crate::strategy::StrategyName;

/// What happened to one strategy invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Produced,
    Empty,
    Panicked,
}

#[derive(Debug, Default)]
struct Slot {
    time_ns: AtomicU64,
    runs: AtomicUsize,
    produced: AtomicUsize,
    empty: AtomicUsize,
    panicked: AtomicUsize,
    timeouts: AtomicUsize,
    wins: AtomicUsize,
}

/// Point-in-time copy of one strategy's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrategyStats {
    pub total_time: Duration,
    pub runs: usize,
    pub produced: usize,
    pub empty: usize,
    pub panicked: usize,
    pub timeouts: usize,
    pub wins: usize,
}

impl StrategyStats {
    pub fn average_time(&self) -> Duration {
        if self.runs == 0 {
            return Duration::ZERO;
        }
        self.total_time / self.runs as u32
    }
}

/// Shared across the worker pool behind an `Arc`
#[derive(Debug)]
pub struct StrategyProfiler {
    config: ProfilingConfig,
    slots: Vec<Slot>,
}

impl StrategyProfiler {
    pub fn new(config: ProfilingConfig) -> Self {
        StrategyProfiler {
            config,
            slots: StrategyName::ALL.iter().map(|_| Slot::default()).collect(),
        }
    }

    fn slot(&self, name: StrategyName) -> &Slot {
        &self.slots[name.index()]
    }

    pub fn record_run(&self, name: StrategyName, elapsed: Duration, outcome: RunOutcome) {
        if !self.config.enabled {
            return;
        }
        let slot = self.slot(name);
        slot.time_ns
            .fetch_add(elapsed.as_nanos().min(u64::MAX as u128) as u64, Ordering::Relaxed);
        slot.runs.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            RunOutcome::Produced => &slot.produced,
            RunOutcome::Empty => &slot.empty,
            RunOutcome::Panicked => &slot.panicked,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// The strategy did not report before the deadline
    pub fn record_timeout(&self, name: StrategyName) {
        if self.config.enabled {
            self.slot(name).timeouts.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_win(&self, name: StrategyName) {
        if self.config.enabled {
            self.slot(name).wins.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn stats(&self, name: StrategyName) -> StrategyStats {
        let slot = self.slot(name);
        StrategyStats {
            total_time: Duration::from_nanos(slot.time_ns.load(Ordering::Relaxed)),
            runs: slot.runs.load(Ordering::Relaxed),
            produced: slot.produced.load(Ordering::Relaxed),
            empty: slot.empty.load(Ordering::Relaxed),
            panicked: slot.panicked.load(Ordering::Relaxed),
            timeouts: slot.timeouts.load(Ordering::Relaxed),
            wins: slot.wins.load(Ordering::Relaxed),
        }
    }

    /// Logs one line per strategy that ran or won at least once
    pub fn print_report(&self, label: &str) {
        if !self.config.enabled {
            return;
        }
        log::info!("Strategy profile ({})", label);
        log::info!(
            "  {:<28} {:>6} {:>6} {:>6} {:>6} {:>6} {:>10}",
            "strategy",
            "runs",
            "moves",
            "empty",
            "late",
            "wins",
            "avg"
        );
        for name in StrategyName::ALL {
            let s = self.stats(name);
            if s.runs == 0 && s.wins == 0 && s.timeouts == 0 {
                continue;
            }
            log::info!(
                "  {:<28} {:>6} {:>6} {:>6} {:>6} {:>6} {:>8.2}ms",
                name.as_str(),
                s.runs,
                s.produced,
                s.empty + s.panicked,
                s.timeouts,
                s.wins,
                s.average_time().as_secs_f64() * 1000.0
            );
            if s.panicked > 0 {
                log::warn!("  {} panicked {} times", name, s.panicked);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate_per_strategy() {
        let profiler = StrategyProfiler::new(ProfilingConfig { enabled: true });
        profiler.record_run(
            StrategyName::MinimizeEllipse,
            Duration::from_millis(2),
            RunOutcome::Produced,
        );
        profiler.record_run(
            StrategyName::MinimizeEllipse,
            Duration::from_millis(4),
            RunOutcome::Empty,
        );
        profiler.record_timeout(StrategyName::MinimizeEllipse);
        profiler.record_win(StrategyName::Baseline);

        let s = profiler.stats(StrategyName::MinimizeEllipse);
        assert_eq!(s.runs, 2);
        assert_eq!(s.produced, 1);
        assert_eq!(s.empty, 1);
        assert_eq!(s.timeouts, 1);
        assert_eq!(s.average_time(), Duration::from_millis(3));
        assert_eq!(profiler.stats(StrategyName::Baseline).wins, 1);
        assert_eq!(profiler.stats(StrategyName::RandomMove), StrategyStats::default());
    }

    #[test]
    fn test_disabled_profiler_records_nothing() {
        let profiler = StrategyProfiler::new(ProfilingConfig { enabled: false });
        profiler.record_run(
            StrategyName::RandomMove,
            Duration::from_millis(1),
            RunOutcome::Panicked,
        );
        profiler.record_win(StrategyName::RandomMove);
        assert_eq!(profiler.stats(StrategyName::RandomMove), StrategyStats::default());
    }
}
