//! Asynchronous post-match mode and rank detection.
//!
//! ## Key Types
//!
//! - `ModeDetector`: Spawns one cancellable polling loop at a time
//! - `DetectionSignals`: What loops read (published by `Game`)
//! - `DetectionReport`: What loops hand back when they finish

pub mod signals;
pub mod detector;

pub use signals::{DetectionOutcome, DetectionReport, DetectionSignals, DetectionStage};
pub use detector::ModeDetector;
