use log::debug;
use serde::Serialize;

// @module: Per-session progress simulation state machine

// Phase allocation for the 0-100 range: upload/handoff ends at 10, simulated
// translation work runs 10-95, and the final 95-100 is only ever crossed by
// the terminal success event.
const UPLOAD_PHASE_END: f64 = 10.0;
const TRANSLATION_SPAN: f64 = 85.0;
const SIMULATED_CEILING: f64 = 95.0;

/// Safety margin applied when re-estimating the total duration mid-flight
const RECALIBRATION_MARGIN: f64 = 1.2;

/// One progress emission consumed by the front end
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressState {
    /// Completion percentage, 0-100
    pub progress: u8,

    /// Estimated cue currently being translated
    pub current: usize,

    /// Total translatable cues in the file
    pub total: usize,

    /// Estimated seconds until completion, never negative
    pub estimated_time_remaining: f64,

    /// Status text for display
    pub message: String,

    /// True only on the terminal success emission
    pub complete: bool,
}

/// Smoothed, monotonically non-decreasing progress for one request.
///
/// The backend reports nothing while a request is in flight, so this state
/// machine manufactures progress from elapsed wall-clock time against a
/// calibrated duration estimate. It re-estimates the duration upward when the
/// real pace overruns the prediction, and it never reaches 100 on its own -
/// completion is only signaled by [`ProgressSimulator::terminal_state`].
///
/// Clock injection: callers pass elapsed seconds into [`tick`], which keeps
/// the transition function deterministic and directly testable.
///
/// [`tick`]: ProgressSimulator::tick
#[derive(Debug, Clone)]
pub struct ProgressSimulator {
    /// Total translatable cues
    total_units: usize,

    /// Current duration estimate in seconds, revised upward mid-flight if the
    /// calibration under-predicted
    estimated_duration_secs: f64,

    /// Last emitted progress value; starts at 10 (upload/handoff complete)
    last_progress: f64,
}

impl ProgressSimulator {
    /// Create a simulator for one request session
    pub fn new(total_units: usize, estimated_duration_secs: f64) -> Self {
        Self {
            total_units,
            estimated_duration_secs,
            last_progress: UPLOAD_PHASE_END,
        }
    }

    /// Current duration estimate in seconds
    pub fn estimated_duration_secs(&self) -> f64 {
        self.estimated_duration_secs
    }

    /// Advance the simulation to `elapsed_seconds` since translation started
    /// and produce the next emission.
    ///
    /// Guarantees: emissions never decrease, never exceed the 95 ceiling, and
    /// this method never panics - degenerate inputs (zero cues, zero
    /// estimate, non-finite elapsed) saturate quietly at the ceiling.
    pub fn tick(&mut self, elapsed_seconds: f64) -> ProgressState {
        let elapsed = if elapsed_seconds.is_finite() {
            elapsed_seconds.max(0.0)
        } else {
            0.0
        };

        // The calibration under-predicted: elapsed time has overrun the
        // estimate while the backend is still working. Assume 85% of the work
        // is done right now, derive the implied per-cue rate, and scale the
        // new estimate up by a safety margin so progress does not stall at
        // the ceiling. Upward revisions only.
        if elapsed > self.estimated_duration_secs && self.total_units > 0 {
            let implied_secs_per_unit = elapsed / (self.total_units as f64 * 0.85);
            let revised =
                self.total_units as f64 * implied_secs_per_unit * RECALIBRATION_MARGIN;
            if revised > self.estimated_duration_secs {
                debug!(
                    "Adjusted estimate: {:.1}s ({:.3}s per cue)",
                    revised, implied_secs_per_unit
                );
                self.estimated_duration_secs = revised;
            }
        }

        let raw_pct = if self.estimated_duration_secs > 0.0 {
            (elapsed / self.estimated_duration_secs * TRANSLATION_SPAN).min(TRANSLATION_SPAN)
        } else {
            TRANSLATION_SPAN
        };

        let target = (UPLOAD_PHASE_END + raw_pct).min(SIMULATED_CEILING);
        let smoothed = self.last_progress.max(target);

        // Shrink the visible step as progress nears the ceiling so the bar
        // does not jump
        let max_increase = if smoothed > 80.0 {
            0.5
        } else if smoothed > 60.0 {
            1.0
        } else {
            2.0
        };
        let final_progress =
            self.last_progress + (smoothed - self.last_progress).min(max_increase);
        self.last_progress = final_progress;

        let translated_fraction = (final_progress - UPLOAD_PHASE_END) / TRANSLATION_SPAN;
        let current = ((translated_fraction * self.total_units as f64).floor() as usize)
            .min(self.total_units);

        let remaining_secs = ((SIMULATED_CEILING - final_progress) / TRANSLATION_SPAN
            * self.estimated_duration_secs)
            .max(0.0);

        let message = if final_progress < 90.0 {
            format!("Translating subtitles... ({}/{})", current, self.total_units)
        } else {
            "Almost done, finalizing...".to_string()
        };

        ProgressState {
            progress: final_progress.round() as u8,
            current,
            total: self.total_units,
            estimated_time_remaining: remaining_secs,
            message,
            complete: false,
        }
    }

    /// Terminal emission for a successfully settled request
    pub fn terminal_state(&self) -> ProgressState {
        ProgressState {
            progress: 100,
            current: self.total_units,
            total: self.total_units,
            estimated_time_remaining: 0.0,
            message: "Translation complete!".to_string(),
            complete: true,
        }
    }
}

/// Initial emission before the request is handed to the backend
pub fn uploading_state(total_units: usize, estimated_duration_secs: f64) -> ProgressState {
    ProgressState {
        progress: 5,
        current: 0,
        total: total_units,
        estimated_time_remaining: estimated_duration_secs,
        message: "Uploading subtitle file...".to_string(),
        complete: false,
    }
}
