//! Opt-in wall-clock timing of the layout pipeline.
//!
//! Every sample carries the number of rows it covered, so a report shows
//! throughput next to latency. Phases are reported in the order they first
//! ran (`input.read`, `check.run`, `layout.calculate`, `layout.render`, then
//! the enclosing command).
//!
//! Enabled by `--timing` or a truthy `LANES_TIMING`. Samples stay on the
//! recording thread until [`collect_report`] drains them.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde_json::json;

#[derive(Debug, Clone, Copy)]
struct Sample {
    phase: &'static str,
    elapsed: Duration,
    rows: usize,
}

thread_local! {
    static SAMPLES: RefCell<Vec<Sample>> = const { RefCell::new(Vec::new()) };
}

static ENABLED: AtomicBool = AtomicBool::new(false);

/// `LANES_TIMING` set to `1`, `true`, `yes` or `on`, in any case.
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("LANES_TIMING").is_ok_and(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

pub fn set_timing_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
    if !enabled {
        clear_timings();
    }
}

#[must_use]
pub fn is_timing_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn clear_timings() {
    SAMPLES.with(|samples| samples.borrow_mut().clear());
}

/// Time a phase that does not map onto a row count.
pub fn timed<R>(phase: &'static str, f: impl FnOnce() -> R) -> R {
    timed_rows(phase, 0, f)
}

/// Time a phase that processed `rows` entries.
pub fn timed_rows<R>(phase: &'static str, rows: usize, f: impl FnOnce() -> R) -> R {
    if !is_timing_enabled() {
        return f();
    }

    let started = Instant::now();
    let result = f();
    let elapsed = started.elapsed();
    SAMPLES.with(|samples| {
        samples.borrow_mut().push(Sample {
            phase,
            elapsed,
            rows,
        });
    });
    result
}

/// Aggregate of every sample recorded for one phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTiming {
    pub phase: &'static str,
    pub samples: usize,
    pub total: Duration,
    pub median: Duration,
    pub max: Duration,
    pub rows: usize,
}

impl PhaseTiming {
    fn from_samples(phase: &'static str, mut elapsed: Vec<Duration>, rows: usize) -> Self {
        elapsed.sort_unstable();
        Self {
            phase,
            samples: elapsed.len(),
            total: elapsed.iter().sum(),
            median: elapsed.get(elapsed.len() / 2).copied().unwrap_or_default(),
            max: elapsed.last().copied().unwrap_or_default(),
            rows,
        }
    }

    /// Rows processed per second of total time, for phases that count rows.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rows_per_sec(&self) -> Option<f64> {
        if self.rows == 0 || self.total.is_zero() {
            return None;
        }
        Some(self.rows as f64 / self.total.as_secs_f64())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingReport {
    pub phases: Vec<PhaseTiming>,
}

/// Drain this thread's samples, grouped by phase in first-seen order.
#[must_use]
pub fn collect_report() -> TimingReport {
    let samples = SAMPLES.with(|samples| std::mem::take(&mut *samples.borrow_mut()));

    let mut order: Vec<&'static str> = Vec::new();
    for sample in &samples {
        if !order.contains(&sample.phase) {
            order.push(sample.phase);
        }
    }

    let phases = order
        .into_iter()
        .map(|phase| {
            let of_phase = samples.iter().filter(|s| s.phase == phase);
            let rows = of_phase.clone().map(|s| s.rows).sum();
            PhaseTiming::from_samples(phase, of_phase.map(|s| s.elapsed).collect(), rows)
        })
        .collect();

    TimingReport { phases }
}

impl TimingReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let phases: Vec<_> = self
            .phases
            .iter()
            .map(|p| {
                json!({
                    "phase": p.phase,
                    "samples": p.samples,
                    "total_us": p.total.as_micros(),
                    "median_us": p.median.as_micros(),
                    "max_us": p.max.as_micros(),
                    "rows": p.rows,
                    "rows_per_sec": p.rows_per_sec(),
                })
            })
            .collect();

        json!({ "phases": phases })
    }

    /// Fixed-width table for stderr.
    #[must_use]
    pub fn display_table(&self) -> String {
        let mut out = format!(
            "{:<20} {:>7} {:>10} {:>10} {:>10} {:>12}\n",
            "phase", "samples", "total", "median", "max", "rows/s"
        );
        for p in &self.phases {
            let throughput = p
                .rows_per_sec()
                .map_or_else(|| "-".to_string(), |r| format!("{r:.0}"));
            let _ = writeln!(
                out,
                "{:<20} {:>7} {:>10} {:>10} {:>10} {:>12}",
                p.phase,
                p.samples,
                format!("{:.1?}", p.total),
                format!("{:.1?}", p.median),
                format!("{:.1?}", p.max),
                throughput
            );
        }
        out
    }
}
