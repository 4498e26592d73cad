//! Per-episode metrics and the sinks they are handed to.
//!
//! The diagnostics filter only depends on [`MetricsSink`]: a structural
//! registration event, a keyed record write, and a flush. Backends live behind
//! that trait.

use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info, warn};

use crate::core::{GymError, Info, InfoValue, Result};

pub const EPISODE_REWARD: &str = "global/episode_reward";
pub const EPISODE_LENGTH: &str = "global/episode_length";
pub const EPISODE_TIME: &str = "global/episode_time";
pub const REWARD_PER_TIME: &str = "global/reward_per_time";
pub const FPS: &str = "diagnostics/fps";

/// Shortest episode duration, in seconds, that a reward rate is derived from.
/// A one-step episode is timed within a single step call and lands below it.
pub const MIN_EPISODE_TIME: f64 = 1e-3;

/// Derived statistics of one finished episode.
///
/// Ratio metrics are `None` when their denominator was degenerate (zero,
/// negative or non-finite); they are then left out of the emitted record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeMetrics {
    pub episode_reward: f64,
    pub episode_length: u64,
    /// Wall-clock duration in seconds.
    pub episode_time: f64,
    pub reward_per_time: Option<f64>,
    /// Seconds per step.
    pub fps: Option<f64>,
}

impl EpisodeMetrics {
    /// Derive the record from the raw accumulator values.
    pub fn compute(episode_reward: f64, episode_length: u64, episode_time: f64) -> Self {
        Self {
            episode_reward,
            episode_length,
            episode_time,
            reward_per_time: recover(ratio_above(REWARD_PER_TIME, episode_reward, episode_time, MIN_EPISODE_TIME)),
            fps: recover(checked_ratio(FPS, episode_time, episode_length as f64)),
        }
    }

    /// Key/value view in emission order. Degenerate ratios are skipped.
    pub fn scalars(&self) -> Vec<(&'static str, f64)> {
        let mut out = vec![
            (EPISODE_REWARD, self.episode_reward),
            (EPISODE_LENGTH, self.episode_length as f64),
            (EPISODE_TIME, self.episode_time),
        ];
        if let Some(v) = self.reward_per_time {
            out.push((REWARD_PER_TIME, v));
        }
        if let Some(v) = self.fps {
            out.push((FPS, v));
        }
        out
    }

    /// Info map holding only the derived metrics.
    pub fn to_info(&self) -> Info {
        let mut info = Info::new();
        for (k, v) in self.scalars() {
            if k == EPISODE_LENGTH {
                info.insert(k, InfoValue::from(self.episode_length));
            } else {
                info.insert(k, InfoValue::from(v));
            }
        }
        info
    }
}

/// `numerator / denominator`, or `DegenerateMetric` when the denominator is not
/// a positive finite number.
pub fn checked_ratio(metric: &'static str, numerator: f64, denominator: f64) -> Result<f64> {
    ratio_above(metric, numerator, denominator, 0.0)
}

fn ratio_above(metric: &'static str, numerator: f64, denominator: f64, floor: f64) -> Result<f64> {
    if denominator.is_finite() && denominator > floor {
        Ok(numerator / denominator)
    } else {
        Err(GymError::DegenerateMetric { metric, denominator })
    }
}

fn recover(ratio: Result<f64>) -> Option<f64> {
    match ratio {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Skipping metric: {e}");
            None
        }
    }
}

/// Destination of per-episode diagnostics.
pub trait MetricsSink {
    /// Structural event, sent on every reset before the episode starts.
    fn register(&mut self) {}

    /// Record the metrics of episode number `episode` (1-based).
    fn write(&mut self, episode: u64, metrics: &EpisodeMetrics);

    /// Push buffered records to the backend.
    fn flush(&mut self) {}
}

impl<S: MetricsSink + ?Sized> MetricsSink for Box<S> {
    fn register(&mut self) { (**self).register() }
    fn write(&mut self, episode: u64, metrics: &EpisodeMetrics) { (**self).write(episode, metrics) }
    fn flush(&mut self) { (**self).flush() }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl MetricsSink for NullSink {
    fn write(&mut self, _episode: u64, _metrics: &EpisodeMetrics) {}
}

/// Writes each record through the `log` facade at info level.
#[derive(Clone, Debug, Default)]
pub struct LogSink {
    tag: String,
}

impl LogSink {
    pub fn new<S: Into<String>>(tag: S) -> Self { Self { tag: tag.into() } }
}

impl MetricsSink for LogSink {
    fn register(&mut self) {
        debug!("[{}] episode starting", self.tag);
    }

    fn write(&mut self, episode: u64, metrics: &EpisodeMetrics) {
        let line = metrics
            .scalars()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ");
        info!("[{}] episode {}: {}", self.tag, episode, line);
    }
}

/// Everything a [`MemorySink`] has been handed so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryLog {
    pub registrations: usize,
    pub flushes: usize,
    pub records: Vec<(u64, EpisodeMetrics)>,
}

/// In-memory sink. Clones share one buffer, so a handle kept by the caller
/// observes what the environment wrote.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    log: Arc<Mutex<MemoryLog>>,
}

impl MemorySink {
    pub fn new() -> Self { Self::default() }

    /// Copy of the current buffer.
    pub fn snapshot(&self) -> MemoryLog {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn records(&self) -> Vec<(u64, EpisodeMetrics)> { self.snapshot().records }

    fn with_log(&self, f: impl FnOnce(&mut MemoryLog)) {
        f(&mut self.log.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

impl MetricsSink for MemorySink {
    fn register(&mut self) { self.with_log(|l| l.registrations += 1) }

    fn write(&mut self, episode: u64, metrics: &EpisodeMetrics) {
        let metrics = metrics.clone();
        self.with_log(|l| l.records.push((episode, metrics)));
    }

    fn flush(&mut self) { self.with_log(|l| l.flushes += 1) }
}

#[cfg(feature = "tensorboard")]
pub use tensorboard_sink::TensorboardSink;

#[cfg(feature = "tensorboard")]
mod tensorboard_sink {
    use std::path::Path;

    use tensorboard_rs::summary_writer::SummaryWriter;

    use super::{EpisodeMetrics, MetricsSink};

    /// Writes scalars as TFRecord event files, stepped by episode number.
    pub struct TensorboardSink {
        writer: SummaryWriter,
    }

    impl TensorboardSink {
        /// Event files are stored in `logdir`.
        pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
            Self { writer: SummaryWriter::new(logdir) }
        }
    }

    impl MetricsSink for TensorboardSink {
        fn write(&mut self, episode: u64, metrics: &EpisodeMetrics) {
            for (k, v) in metrics.scalars() {
                self.writer.add_scalar(k, v as f32, episode as usize);
            }
        }

        fn flush(&mut self) { self.writer.flush() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

    #[test]
    fn five_step_episode_over_two_seconds() {
        let m = EpisodeMetrics::compute(5.0, 5, 2.0);
        assert!(approx(m.episode_reward, 5.0));
        assert_eq!(m.episode_length, 5);
        assert!(approx(m.reward_per_time.unwrap(), 2.5));
        assert!(approx(m.fps.unwrap(), 0.4));
        let keys: Vec<_> = m.scalars().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![EPISODE_REWARD, EPISODE_LENGTH, EPISODE_TIME, REWARD_PER_TIME, FPS]);
    }

    #[test]
    fn zero_duration_skips_reward_rate() {
        let m = EpisodeMetrics::compute(1.0, 1, 0.0);
        assert_eq!(m.reward_per_time, None);
        assert_eq!(m.fps, Some(0.0));
        assert!(m.scalars().iter().all(|(k, _)| *k != REWARD_PER_TIME));
    }

    #[test]
    fn sub_millisecond_duration_skips_reward_rate() {
        let m = EpisodeMetrics::compute(1.0, 1, 4e-9);
        assert_eq!(m.reward_per_time, None);
        assert!(m.fps.is_some());
        assert!(approx(EpisodeMetrics::compute(1.0, 1, 0.5).reward_per_time.unwrap(), 2.0));
    }

    #[test]
    fn zero_length_skips_fps() {
        let m = EpisodeMetrics::compute(0.0, 0, 1.0);
        assert_eq!(m.fps, None);
        assert_eq!(m.reward_per_time, Some(0.0));
    }

    #[test]
    fn checked_ratio_rejects_non_finite() {
        assert!(matches!(
            checked_ratio(FPS, 1.0, f64::NAN),
            Err(GymError::DegenerateMetric { metric: FPS, .. })
        ));
        assert!(checked_ratio(FPS, 1.0, -1.0).is_err());
        assert_eq!(checked_ratio(FPS, 3.0, 2.0), Ok(1.5));
    }

    #[test]
    fn info_view_keeps_length_integral() {
        let info = EpisodeMetrics::compute(3.0, 3, 1.5).to_info();
        assert_eq!(info.get(EPISODE_LENGTH), Some(&InfoValue::I64(3)));
        assert_eq!(info.get_f64(EPISODE_REWARD), Some(3.0));
        assert_eq!(info.len(), 5);
    }

    #[test]
    fn memory_sink_clones_share_buffer() {
        let handle = MemorySink::new();
        let mut sink: Box<dyn MetricsSink> = Box::new(handle.clone());
        sink.register();
        sink.write(1, &EpisodeMetrics::compute(1.0, 2, 1.0));
        sink.flush();
        let log = handle.snapshot();
        assert_eq!(log.registrations, 1);
        assert_eq!(log.flushes, 1);
        assert_eq!(log.records.len(), 1);
        assert_eq!(log.records[0].0, 1);
    }
}
