/*!
 * # subrelay - Subtitle Translation Relay
 *
 * A Rust client for hosted subtitle-translation backends. Uploads an English
 * SRT file to a remote translation service and synthesizes a smooth,
 * monotonically increasing progress stream while the single request is in
 * flight, since the backend reports no incremental progress of its own.
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management (endpoint, calibration, settings)
 * - `subtitle_counter`: Counting translatable cues in raw SRT text
 * - `time_estimator`: Calibration-based duration prediction
 * - `progress`: Per-session progress simulation state machine
 * - `transfer`: Transfer orchestration (request + tick loop + cancellation)
 * - `backend`: HTTP client for the remote translation service
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod backend;
pub mod errors;
pub mod file_utils;
pub mod progress;
pub mod subtitle_counter;
pub mod time_estimator;
pub mod transfer;

// Re-export main types for easier usage
pub use app_config::{Config, Settings, TimeCalibration};
pub use backend::{HttpBackend, TranslationBackend};
pub use errors::TransferError;
pub use progress::{ProgressSimulator, ProgressState};
pub use time_estimator::TimeEstimator;
pub use transfer::TransferOrchestrator;
