//! Level detection thresholds.
//!
//! A pitch or roll component counts as level when its magnitude is strictly
//! below [`LEVEL_THRESHOLD`]. Attitudes are rounded to hundredths before they
//! reach this check, so the threshold effectively accepts 0.00, ±0.01 and ±0.02.
//!
//! # Usage
//!
//! ```ignore
//! use level_common::thresholds::{LEVEL_THRESHOLD, is_level};
//! ```

use crate::config::ATTITUDE_LIMIT;

/// Magnitude below which a pitch or roll component is drawn in the "level" color.
pub const LEVEL_THRESHOLD: f32 = 0.025;

const _: () = assert!(LEVEL_THRESHOLD > 0.0);
const _: () = assert!(LEVEL_THRESHOLD < ATTITUDE_LIMIT);

/// Check whether a single attitude component is level.
#[inline]
pub fn is_level(component: f32) -> bool { component.abs() < LEVEL_THRESHOLD }

// =============================================================================
// Unit Tests
// =============================================================================
