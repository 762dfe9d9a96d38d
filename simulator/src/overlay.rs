//! Render side of the simulator: tilt bars plus the optional diagnostics panel.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use level_common::attitude::{Attitude, AttitudeReading};
use level_common::config::{DIAGNOSTICS_X, DIAGNOSTICS_Y};
use level_common::diagnostics::{DiagnosticLines, draw_diagnostics};
use level_common::motion::SensorError;
use level_common::scheduler::SchedulerStats;
use level_common::tilt::{TiltStyle, render_tilt};

/// Paints the overlay surface.
pub struct OverlayView {
    bounds: Rectangle,
    style: TiltStyle,
    show_diagnostics: bool,
    sensor_error: Option<SensorError>,
}

impl OverlayView {
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            bounds,
            style: TiltStyle::DEFAULT,
            // Development builds start with the readout visible
            show_diagnostics: cfg!(debug_assertions),
            sensor_error: None,
        }
    }

    pub fn toggle_diagnostics(&mut self) -> bool {
        self.show_diagnostics = !self.show_diagnostics;
        self.show_diagnostics
    }

    pub fn set_sensor_error(
        &mut self,
        error: Option<SensorError>,
    ) {
        self.sensor_error = error;
    }

    /// Draw the indicator for `reading`, or a level grid before the first sample.
    pub fn paint<D>(
        &self,
        display: &mut D,
        reading: Option<&AttitudeReading>,
        stats: &SchedulerStats,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let attitude = reading.map_or(Attitude::LEVEL, |r| r.attitude);
        render_tilt(display, attitude, self.bounds, &self.style)?;

        if !self.show_diagnostics {
            return Ok(());
        }

        let mut lines = reading.map(|r| DiagnosticLines::from_reading(r, &self.style)).unwrap_or_default();
        lines.push_stats(stats);
        if let Some(error) = self.sensor_error {
            lines.push_error(error);
        }

        let origin = self.bounds.top_left + Point::new(DIAGNOSTICS_X, DIAGNOSTICS_Y);
        draw_diagnostics(display, &lines, origin)
    }

    /// Blank the surface while the overlay is hidden.
    pub fn clear<D>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        display.fill_solid(&self.bounds, self.style.background)
    }
}
