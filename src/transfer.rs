/*!
 * Transfer orchestration.
 *
 * Drives one translation request end to end: counts cues, seeds the duration
 * estimate, issues the single backend request, and ticks the progress
 * simulator on a fixed cadence until the request settles. Sessions are
 * identified by a monotonically increasing id so a superseded session can
 * never emit after a new one has started, even within the same tick interval.
 */

use log::{info, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

use crate::app_config::{Config, Settings};
use crate::backend::TranslationBackend;
use crate::errors::TransferError;
use crate::progress::{self, ProgressSimulator, ProgressState};
use crate::subtitle_counter;
use crate::time_estimator::TimeEstimator;

/// Orchestrates translation transfers against a backend.
///
/// At most one session is in flight at a time: starting a new [`run`] or
/// calling [`reset`] supersedes the current session, which stops emitting and
/// resolves [`TransferError::Cancelled`] at its next tick.
///
/// [`run`]: TransferOrchestrator::run
/// [`reset`]: TransferOrchestrator::reset
#[derive(Debug)]
pub struct TransferOrchestrator<B: TranslationBackend> {
    backend: B,
    estimator: TimeEstimator,
    tick_interval: Duration,
    /// Source of session ids; 0 is reserved for "no active session"
    session_counter: AtomicU64,
    /// Id of the session currently allowed to emit
    active_session: AtomicU64,
    /// Most recent emission, for consumers that poll instead of subscribing
    last_state: Mutex<Option<ProgressState>>,
}

impl<B: TranslationBackend> TransferOrchestrator<B> {
    /// Create an orchestrator with an explicit estimator and tick cadence
    pub fn new(backend: B, estimator: TimeEstimator, tick_interval: Duration) -> Self {
        Self {
            backend,
            estimator,
            tick_interval,
            session_counter: AtomicU64::new(0),
            active_session: AtomicU64::new(0),
            last_state: Mutex::new(None),
        }
    }

    /// Create an orchestrator from the application configuration
    pub fn from_config(backend: B, config: &Config) -> Self {
        Self::new(
            backend,
            TimeEstimator::new(config.calibration.clone()),
            Duration::from_millis(config.tick_interval_ms),
        )
    }

    /// Backend this orchestrator submits to
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Most recent progress emission, if a session has produced one
    pub fn last_state(&self) -> Option<ProgressState> {
        self.last_state.lock().clone()
    }

    /// Deactivate the current session.
    ///
    /// Called when the user selects a new file or explicitly resets the UI.
    /// The superseded session observes the identity mismatch on its next tick
    /// and stops without emitting.
    pub fn reset(&self) {
        self.active_session.store(0, Ordering::SeqCst);
        *self.last_state.lock() = None;
    }

    /// Run one translation transfer.
    ///
    /// Emits an initial uploading state, then a simulated [`ProgressState`]
    /// per tick while the backend request is outstanding, and finally exactly
    /// one terminal state with `progress = 100` on success. On failure the
    /// classified error is returned and no success state is emitted. The tick
    /// timer lives inside this call, so every exit path releases it.
    pub async fn run<F>(
        &self,
        content: &str,
        settings: &Settings,
        mut on_progress: F,
    ) -> Result<String, TransferError>
    where
        F: FnMut(ProgressState),
    {
        settings
            .validate()
            .map_err(|e| TransferError::Unexpected(e.to_string()))?;

        let session_id = self.session_counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.active_session.store(session_id, Ordering::SeqCst);

        let total_units = subtitle_counter::count(content);
        let estimated_secs = self.estimator.estimate(total_units, settings.fast_mode);
        info!(
            "Session {}: {} cues, estimated {:.1}s ({} mode)",
            session_id,
            total_units,
            estimated_secs,
            if settings.fast_mode { "fast" } else { "normal" }
        );

        self.emit(
            session_id,
            progress::uploading_state(total_units, estimated_secs),
            &mut on_progress,
        )?;

        let mut simulator = ProgressSimulator::new(total_units, estimated_secs);
        let started = Instant::now();

        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick fires immediately; consume it so emissions
        // start one cadence after the request does
        ticker.tick().await;

        let request = self.backend.translate(content, settings);
        tokio::pin!(request);

        let outcome = loop {
            tokio::select! {
                outcome = &mut request => break outcome,
                _ = ticker.tick() => {
                    let state = simulator.tick(started.elapsed().as_secs_f64());
                    self.emit(session_id, state, &mut on_progress)?;
                }
            }
        };

        if !self.is_active(session_id) {
            warn!("Session {} superseded while request was settling", session_id);
            return Err(TransferError::Cancelled);
        }

        match outcome {
            Ok(translated) => {
                if translated.trim().is_empty() {
                    return Err(TransferError::Server(
                        "Service returned an empty translation".to_string(),
                    ));
                }
                info!(
                    "Session {}: translation finished in {:.1}s",
                    session_id,
                    started.elapsed().as_secs_f64()
                );
                self.emit(session_id, simulator.terminal_state(), &mut on_progress)?;
                Ok(translated)
            }
            Err(e) => {
                warn!("Session {} failed: {}", session_id, e);
                Err(e)
            }
        }
    }

    fn is_active(&self, session_id: u64) -> bool {
        self.active_session.load(Ordering::SeqCst) == session_id
    }

    /// Deliver an emission, unless the owning session has been superseded
    fn emit<F>(
        &self,
        session_id: u64,
        state: ProgressState,
        on_progress: &mut F,
    ) -> Result<(), TransferError>
    where
        F: FnMut(ProgressState),
    {
        if !self.is_active(session_id) {
            return Err(TransferError::Cancelled);
        }
        *self.last_state.lock() = Some(state.clone());
        on_progress(state);
        Ok(())
    }
}
