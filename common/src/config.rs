//! Overlay configuration constants.
//!
//! Everything here is a compile-time `const`. Values that must stay in a
//! particular relationship are checked with `const` assertions, so a bad edit
//! fails the build instead of drawing garbage.

// =============================================================================
// Attitude Normalization
// =============================================================================

/// Largest magnitude a pitch or roll component may take after clamping.
pub const ATTITUDE_LIMIT: f32 = 1.0;

/// Decimal places kept after rounding a pitch or roll component.
///
/// Two places quantizes sensor noise near level so it cannot drive redraws on
/// its own.
pub const ATTITUDE_DECIMALS: u32 = 2;

/// Multiplier used to round to [`ATTITUDE_DECIMALS`] places.
pub const ATTITUDE_SCALE: f32 = 100.0;

const _: () = assert!(ATTITUDE_LIMIT > 0.0);
const _: () = assert!(10u32.pow(ATTITUDE_DECIMALS) as f32 == ATTITUDE_SCALE);

// =============================================================================
// Tilt Indicator Geometry
// =============================================================================

/// A full-scale pitch (or roll) shifts bar endpoints by `extent / TILT_OFFSET_DIVISOR`.
///
/// With 6, the endpoints of a third-line can swing at most halfway to the edge
/// of the surface or to the neighbouring third-line.
pub const TILT_OFFSET_DIVISOR: f32 = 6.0;

/// Half the thickness of a tilt bar, in pixels, on either side of its centre line.
pub const BAR_HALF_THICKNESS: i32 = 2;

/// Outline width of a tilt bar, in pixels.
pub const BAR_STROKE_WIDTH: u32 = 1;

const _: () = assert!(TILT_OFFSET_DIVISOR >= 6.0);
const _: () = assert!(BAR_HALF_THICKNESS > 0);

// =============================================================================
// Motion Sampling
// =============================================================================

/// Rate at which the motion collaborator delivers gravity samples.
pub const SAMPLE_RATE_HZ: u32 = 120;

/// Interval between gravity samples in microseconds (~8.3 ms).
pub const SAMPLE_INTERVAL_US: u32 = 1_000_000 / SAMPLE_RATE_HZ;

const _: () = assert!(SAMPLE_INTERVAL_US > 0);

// =============================================================================
// Display Configuration
// =============================================================================

/// Overlay surface width in pixels.
pub const SCREEN_WIDTH: u32 = 320;

/// Overlay surface height in pixels.
pub const SCREEN_HEIGHT: u32 = 240;

/// Top-left corner of the diagnostics panel.
pub const DIAGNOSTICS_X: i32 = 6;

/// Baseline of the first diagnostics line.
pub const DIAGNOSTICS_Y: i32 = 14;

/// Vertical distance between diagnostics lines.
pub const DIAGNOSTICS_LINE_HEIGHT: i32 = 13;
