//! Core of the camera level overlay.
//!
//! Platform-agnostic code shared by the desktop simulator and any firmware
//! front end:
//!
//! - [`gravity`]: Gravity vector and face-up classification
//! - [`attitude`]: Resolving gravity into a pitch/roll deviation from level
//! - [`thresholds`]: Level detection threshold
//! - [`tilt`]: Rule-of-thirds tilt indicator geometry and drawing
//! - [`scheduler`]: Redraw coalescing state machine
//! - [`pipeline`]: Shared latest-sample slot plus scheduler and event signals
//! - [`motion`]: Gravity source trait and sensor errors
//! - [`diagnostics`]: Text readout of the raw and resolved values
//! - [`colors`]: RGB565 color constants
//! - [`config`]: Normalization, geometry and layout constants
//!
//! # no_std Compatibility
//!
//! This crate is `no_std` in every build, tests included. Square roots and
//! rounding go through `micromath` so host tests exercise the same math as
//! the firmware.

#![no_std]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod attitude;
pub mod colors;
pub mod config;
pub mod diagnostics;
pub mod gravity;
pub mod motion;
pub mod pipeline;
pub mod scheduler;
pub mod thresholds;
pub mod tilt;

// Re-export commonly used items
pub use attitude::{Attitude, AttitudeReading, resolve, resolve_reading};
pub use colors::*;
pub use config::*;
pub use gravity::{DeviceAxis, FaceUp, GravityVector, Sign};
pub use motion::{GravitySource, SensorError};
pub use pipeline::{OverlayEvent, OverlayPipeline, Submission};
pub use scheduler::{RedrawTicket, ScheduleOutcome, SchedulerStats, UpdateScheduler};
pub use tilt::{TiltStyle, draw_tilt, render_tilt, tilt_geometry};
