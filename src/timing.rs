//! Build stage timing.

use std::time::{Duration, Instant};

/// Elapsed time of each build stage in the order the stages ran.
#[derive(Debug, Default, Clone)]
pub struct StageTimings {
    stages: Vec<(&'static str, Duration)>,
}

impl StageTimings {
    /// Runs `f` and records how long it took under `stage`.
    ///
    /// The elapsed time is recorded even if `f` returns an error.
    pub fn time<T>(&mut self, stage: &'static str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        log::trace!(target: "godll::timing", "{stage} took {}", elapsed.display());
        self.stages.push((stage, elapsed));
        result
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Duration)> + '_ {
        self.stages.iter().copied()
    }

    /// Returns the sum of all recorded stage times.
    pub fn total(&self) -> Duration {
        self.stages.iter().map(|(_, elapsed)| *elapsed).sum()
    }
}

/// Extension trait for [`std::time::Duration`].
pub trait DurationExt {
    fn display(&self) -> DurationDisplay;
}

impl DurationExt for Duration {
    fn display(&self) -> DurationDisplay {
        DurationDisplay(*self)
    }
}

/// Displays a [`Duration`] in the largest unit that keeps the value below
/// 1000, with the unit suffix.
///
/// Precision in the format specifier applies to the converted value.
#[derive(Debug, Clone, Copy)]
pub struct DurationDisplay(Duration);

impl std::fmt::Display for DurationDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let nanos = self.0.as_nanos();
        if nanos < 1_000 {
            return write!(f, "{nanos}ns");
        }

        let (unit, suffix) = [
            (Duration::from_micros(1), "us"),
            (Duration::from_millis(1), "ms"),
        ]
        .into_iter()
        .find(|(unit, _)| self.0 < *unit * 1_000)
        .unwrap_or((Duration::from_secs(1), "s"));

        let value = self.0.div_duration_f64(unit);
        match f.precision() {
            Some(precision) => write!(f, "{value:.precision$}{suffix}"),
            None => write!(f, "{value}{suffix}"),
        }
    }
}
