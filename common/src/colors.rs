//! Color constants for the level overlay.
//!
//! Standard colors come straight from the `RgbColor` trait constants so the
//! Rgb565 values are exact (5 bits red, 6 bits green, 5 bits blue).

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors
// =============================================================================

/// Pure black. Surface background behind the indicator.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white. Bar outlines and diagnostics text.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red. Fill for a tilted pitch or roll bar.
pub const RED: Rgb565 = Rgb565::RED;

/// Pure green. Fill for a level pitch or roll bar.
pub const GREEN: Rgb565 = Rgb565::GREEN;

/// Pure yellow. Diagnostics line for an unavailable sensor.
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

// =============================================================================
// Custom Colors
// =============================================================================

/// Dark gray for secondary diagnostics text.
/// RGB565: (8, 16, 8), roughly 25% brightness.
pub const GRAY: Rgb565 = Rgb565::new(8, 16, 8);
