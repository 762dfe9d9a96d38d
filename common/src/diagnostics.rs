//! Text readout of the raw gravity sample and the resolved attitude.
//!
//! Meant for development builds: it shows which face the resolver picked and
//! the numbers behind the bars, each as signed two-decimal text.
//!
//! ```text
//! GX +0.02
//! GY +0.05
//! GZ -0.98
//! AXIS Z+
//! PITCH -0.05
//! ROLL +0.02
//! ```

use core::fmt::{self, Write};

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use heapless::{String, Vec};
use profont::PROFONT_12_POINT;

use crate::attitude::AttitudeReading;
use crate::colors::{GRAY, WHITE, YELLOW};
use crate::config::DIAGNOSTICS_LINE_HEIGHT;
use crate::motion::SensorError;
use crate::scheduler::SchedulerStats;
use crate::tilt::{LevelState, TiltStyle};

/// Maximum characters per diagnostics line.
pub const DIAGNOSTICS_LINE_LENGTH: usize = 32;

/// Maximum number of diagnostics lines.
pub const DIAGNOSTICS_MAX_LINES: usize = 8;

/// Printed after the label when a value does not fit on its line.
pub const DIAGNOSTICS_OVERFLOW: &str = "----";

/// One line of text and the color to draw it in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticLine {
    pub text: String<DIAGNOSTICS_LINE_LENGTH>,
    pub color: Rgb565,
}

/// Prepared diagnostics text, ready for [`draw_diagnostics`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticLines {
    lines: Vec<DiagnosticLine, DIAGNOSTICS_MAX_LINES>,
}

impl DiagnosticLines {
    pub const fn new() -> Self { Self { lines: Vec::new() } }

    /// Raw components, face up, then pitch and roll.
    ///
    /// Pitch and roll take the bar fill color of their level state.
    pub fn from_reading(
        reading: &AttitudeReading,
        style: &TiltStyle,
    ) -> Self {
        let mut lines = Self::new();
        let g = reading.gravity;
        let attitude = reading.attitude;

        lines.push_signed("GX", g.x, GRAY);
        lines.push_signed("GY", g.y, GRAY);
        lines.push_signed("GZ", g.z, GRAY);

        lines.push_line(format_line("AXIS", format_args!("AXIS {}", reading.face_up)), WHITE);

        lines.push_signed("PITCH", attitude.pitch(), style.fill_for(LevelState::of(attitude.pitch())));
        lines.push_signed("ROLL", attitude.roll(), style.fill_for(LevelState::of(attitude.roll())));
        lines
    }

    /// Append redraw counters: drawn, superseded and suppressed.
    pub fn push_stats(
        &mut self,
        stats: &SchedulerStats,
    ) {
        let text = format_line(
            "DRAW",
            format_args!("DRAW {} SKIP {} HID {}", stats.completed, stats.superseded, stats.suppressed),
        );
        self.push_line(text, GRAY);
    }

    /// Append a sensor failure.
    pub fn push_error(
        &mut self,
        error: SensorError,
    ) {
        self.push_line(format_line("SENSOR", format_args!("{error}")), YELLOW);
    }

    #[inline]
    pub fn lines(&self) -> &[DiagnosticLine] { &self.lines }

    /// Line texts, top to bottom.
    pub fn texts(&self) -> impl Iterator<Item = &str> { self.lines.iter().map(|line| line.text.as_str()) }

    fn push_signed(
        &mut self,
        label: &str,
        value: f32,
        color: Rgb565,
    ) {
        // `+ 0.0` keeps -0.0 from printing as "-0.00"
        self.push_line(format_line(label, format_args!("{label} {:+.2}", value + 0.0)), color);
    }

    fn push_line(
        &mut self,
        text: String<DIAGNOSTICS_LINE_LENGTH>,
        color: Rgb565,
    ) {
        // Full: extra lines are dropped
        self.lines.push(DiagnosticLine { text, color }).ok();
    }
}

/// Format one line, falling back to `"<label> ----"` when the text would be
/// cut off.
fn format_line(
    label: &str,
    args: fmt::Arguments<'_>,
) -> String<DIAGNOSTICS_LINE_LENGTH> {
    let mut text = String::new();
    if text.write_fmt(args).is_err() {
        text.clear();
        write!(text, "{label} {DIAGNOSTICS_OVERFLOW}").ok();
    }
    text
}

/// Draw the lines top to bottom, first baseline at `origin`.
pub fn draw_diagnostics<D>(
    display: &mut D,
    lines: &DiagnosticLines,
    origin: Point,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let mut position = origin;
    for line in lines.lines() {
        let style = MonoTextStyle::new(&PROFONT_12_POINT, line.color);
        Text::new(&line.text, position, style).draw(display)?;
        position.y += DIAGNOSTICS_LINE_HEIGHT;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
