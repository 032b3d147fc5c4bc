//! Progress reporting over the subhalo loop.
//!
//! With the `progress` feature, [`SubhaloProgress`] drives an `indicatif` bar showing the
//! subhalo just processed, the mean time per subhalo and the slowest one so far. Without it,
//! every method is a no-op so the engine loop stays identical in both builds.
#[cfg(feature = "progress")]
use std::time::{Duration, Instant};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "progress")]
use tracing::debug;

use crate::constants::SubhaloId;

/// Per-subhalo wall times of one profile call.
#[cfg(feature = "progress")]
#[derive(Debug, Default)]
struct SubhaloTimings {
    count: u32,
    total: Duration,
    slowest: Option<(SubhaloId, Duration)>,
}

#[cfg(feature = "progress")]
impl SubhaloTimings {
    fn record(&mut self, id: SubhaloId, elapsed: Duration) {
        self.count += 1;
        self.total += elapsed;
        if self.slowest.is_none_or(|(_, worst)| elapsed > worst) {
            self.slowest = Some((id, elapsed));
        }
    }

    fn mean(&self) -> Duration {
        self.total.checked_div(self.count).unwrap_or_default()
    }

    fn message(&self, id: SubhaloId, elapsed: Duration) -> String {
        match self.slowest {
            Some((worst_id, worst)) => format!(
                "subhalo {id} {elapsed:.1?} | mean {:.1?} | slowest {worst_id} ({worst:.1?})",
                self.mean()
            ),
            None => format!("subhalo {id} {elapsed:.1?}"),
        }
    }
}

#[cfg(feature = "progress")]
pub(crate) struct SubhaloProgress {
    bar: ProgressBar,
    label: &'static str,
    last: Instant,
    timings: SubhaloTimings,
}

#[cfg(feature = "progress")]
impl SubhaloProgress {
    pub(crate) fn new(total: usize, label: &'static str) -> Self {
        let bar = ProgressBar::new((total as u64).max(1));
        bar.set_style(
            ProgressStyle::with_template(
                "{prefix} {bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | ETA {eta_precise} | {msg}",
            )
            .expect("indicatif template"),
        );
        bar.set_prefix(label);
        bar.enable_steady_tick(Duration::from_millis(200));
        Self {
            bar,
            label,
            last: Instant::now(),
            timings: SubhaloTimings::default(),
        }
    }

    pub(crate) fn done(&mut self, id: SubhaloId) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;

        self.timings.record(id, elapsed);
        self.bar.set_message(self.timings.message(id, elapsed));
        self.bar.inc(1);
    }

    pub(crate) fn finish(self) {
        self.bar.finish_and_clear();
        if let Some((id, worst)) = self.timings.slowest {
            debug!(
                model = self.label,
                subhalos = self.timings.count,
                mean = ?self.timings.mean(),
                slowest = id,
                slowest_time = ?worst,
                "subhalo timings"
            );
        }
    }
}

#[cfg(not(feature = "progress"))]
pub(crate) struct SubhaloProgress;

#[cfg(not(feature = "progress"))]
impl SubhaloProgress {
    #[inline]
    pub(crate) fn new(_total: usize, _label: &'static str) -> Self {
        SubhaloProgress
    }

    #[inline]
    pub(crate) fn done(&mut self, _id: SubhaloId) {}

    #[inline]
    pub(crate) fn finish(self) {}
}

#[cfg(all(test, feature = "progress"))]
mod progress_bar_test {
    use super::*;

    #[test]
    fn test_timings_track_mean_and_slowest() {
        let mut timings = SubhaloTimings::default();
        assert_eq!(timings.mean(), Duration::ZERO);

        timings.record(5, Duration::from_millis(30));
        timings.record(9, Duration::from_millis(90));
        timings.record(12, Duration::from_millis(60));

        assert_eq!(timings.count, 3);
        assert_eq!(timings.mean(), Duration::from_millis(60));
        assert_eq!(timings.slowest, Some((9, Duration::from_millis(90))));
    }

    #[test]
    fn test_message_names_slowest_subhalo() {
        let mut timings = SubhaloTimings::default();
        timings.record(9, Duration::from_millis(90));
        timings.record(5, Duration::from_micros(250));

        assert_eq!(
            timings.message(5, Duration::from_micros(250)),
            "subhalo 5 250.0µs | mean 45.1ms | slowest 9 (90.0ms)"
        );
    }
}
