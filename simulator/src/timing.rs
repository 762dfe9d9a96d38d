//! Timing constants for the simulator.
//!
//! These use `std::time::Duration`, which the `no_std` common crate does not
//! have, so they live here.

use std::time::Duration;

use level_common::config::SAMPLE_INTERVAL_US;

/// Target frame time (~50 FPS). The render loop sleeps if a frame finishes early.
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// Time between simulated sensor samples.
pub const SAMPLE_INTERVAL: Duration = Duration::from_micros(SAMPLE_INTERVAL_US as u64);

/// How often redraw counters are written to the log.
pub const STATS_INTERVAL: Duration = Duration::from_secs(1);
