use log::debug;

use crate::app_config::TimeCalibration;

// @module: Calibration-based duration prediction

/// Converts a cue count into a predicted total translation duration.
///
/// Pure arithmetic over an injected [`TimeCalibration`], so tests can supply
/// deterministic throughput values and operators can retune the constants
/// without touching code.
#[derive(Debug, Clone)]
pub struct TimeEstimator {
    calibration: TimeCalibration,
}

impl TimeEstimator {
    /// Create an estimator from a calibration table
    pub fn new(calibration: TimeCalibration) -> Self {
        Self { calibration }
    }

    /// Predicted total duration in seconds for translating `count` cues
    pub fn estimate(&self, count: usize, fast_mode: bool) -> f64 {
        let seconds_per_100 = if fast_mode {
            self.calibration.seconds_per_100_fast
        } else {
            self.calibration.seconds_per_100_normal
        };

        let estimated = (count as f64 / 100.0) * seconds_per_100;
        debug!(
            "Estimate: {} cues will take ~{:.1}s ({}s per 100 cues)",
            count, estimated, seconds_per_100
        );
        estimated
    }
}

impl Default for TimeEstimator {
    fn default() -> Self {
        Self::new(TimeCalibration::default())
    }
}
