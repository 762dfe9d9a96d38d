//! Tilt indicator: rule-of-thirds bars that shear with pitch and roll.
//!
//! The indicator is four thin quadrilaterals laid over the camera preview on a
//! rule-of-thirds grid:
//!
//! ```text
//!        x⅓+p       x⅔-p
//!          \         /
//!   y⅓-r ---\-------/--- y⅓+r
//!            \     /
//!   y⅔+r -----\---/----- y⅔-r
//!              \ /
//!        x⅓-p       x⅔+p
//! ```
//!
//! Pitch swings the two vertical bars in opposite directions at top and bottom
//! (a scissor effect) by `pitch * width / 6`; roll does the same to the
//! horizontal bars by `roll * height / 6`. With a level attitude the bars form
//! a plain grid.
//!
//! Pitch bars and roll bars are colored independently: "level" when the
//! component is under [`LEVEL_THRESHOLD`](crate::thresholds::LEVEL_THRESHOLD),
//! "tilted" otherwise.
//!
//! Geometry ([`tilt_geometry`]) is separate from painting ([`draw_tilt`]) so
//! it can be checked without a display.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Polyline, PrimitiveStyle, Rectangle, Triangle};
use heapless::Vec;
use micromath::F32;

use crate::attitude::Attitude;
use crate::colors::{BLACK, GREEN, RED, WHITE};
use crate::config::{BAR_HALF_THICKNESS, BAR_STROKE_WIDTH, TILT_OFFSET_DIVISOR};
use crate::thresholds::is_level;

// =============================================================================
// Geometry Types
// =============================================================================

/// Whether an attitude component is within the level threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LevelState {
    Level,
    Tilted,
}

impl LevelState {
    /// Classify a single pitch or roll component.
    #[inline]
    pub fn of(component: f32) -> Self {
        if is_level(component) {
            Self::Level
        } else {
            Self::Tilted
        }
    }
}

/// Which of the four indicator bars.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BarKind {
    /// Vertical bar on the left third-line, driven by pitch.
    PitchLeft,
    /// Vertical bar on the right third-line, driven by pitch.
    PitchRight,
    /// Horizontal bar on the upper third-line, driven by roll.
    RollTop,
    /// Horizontal bar on the lower third-line, driven by roll.
    RollBottom,
}

/// One indicator bar as a filled quadrilateral.
///
/// Corners go start-minus, end-minus, end-plus, start-plus, where start/end
/// are the centre-line endpoints and minus/plus the two sides of the bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TiltBar {
    pub kind: BarKind,
    pub corners: [Point; 4],
    pub state: LevelState,
}

/// The indicator bars for one draw call. Empty for a zero-area surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TiltGeometry {
    bars: Vec<TiltBar, 4>,
}

impl TiltGeometry {
    /// Geometry with no bars.
    pub const fn empty() -> Self { Self { bars: Vec::new() } }

    /// All bars, pitch bars first.
    #[inline]
    pub fn bars(&self) -> &[TiltBar] { &self.bars }

    /// Look up a bar by kind.
    pub fn bar(
        &self,
        kind: BarKind,
    ) -> Option<&TiltBar> {
        self.bars.iter().find(|bar| bar.kind == kind)
    }

    /// True when there is nothing to draw.
    #[inline]
    pub fn is_empty(&self) -> bool { self.bars.is_empty() }

    fn push(
        &mut self,
        bar: TiltBar,
    ) {
        // Capacity is exactly the four bars built by `tilt_geometry`
        self.bars.push(bar).ok();
    }
}

impl Default for TiltGeometry {
    fn default() -> Self { Self::empty() }
}

// =============================================================================
// Geometry
// =============================================================================

/// Compute the indicator bars for an attitude on a surface.
pub fn tilt_geometry(
    attitude: Attitude,
    bounds: Rectangle,
) -> TiltGeometry {
    let mut geometry = TiltGeometry::empty();

    let Size { width, height } = bounds.size;
    if width == 0 || height == 0 {
        return geometry;
    }

    let w = width as f32;
    let h = height as f32;
    let left = bounds.top_left.x as f32;
    let top = bounds.top_left.y as f32;
    let right = left + (width - 1) as f32;
    let bottom = top + (height - 1) as f32;

    let x_one_third = left + w / 3.0;
    let x_two_thirds = left + w * 2.0 / 3.0;
    let y_one_third = top + h / 3.0;
    let y_two_thirds = top + h * 2.0 / 3.0;

    let dx = attitude.pitch() * w / TILT_OFFSET_DIVISOR;
    let dy = attitude.roll() * h / TILT_OFFSET_DIVISOR;

    let pitch_state = LevelState::of(attitude.pitch());
    let roll_state = LevelState::of(attitude.roll());

    geometry.push(vertical_bar(
        BarKind::PitchLeft,
        (x_one_third + dx, top),
        (x_one_third - dx, bottom),
        pitch_state,
    ));
    geometry.push(vertical_bar(
        BarKind::PitchRight,
        (x_two_thirds - dx, top),
        (x_two_thirds + dx, bottom),
        pitch_state,
    ));
    geometry.push(horizontal_bar(
        BarKind::RollTop,
        (left, y_one_third - dy),
        (right, y_one_third + dy),
        roll_state,
    ));
    geometry.push(horizontal_bar(
        BarKind::RollBottom,
        (left, y_two_thirds + dy),
        (right, y_two_thirds - dy),
        roll_state,
    ));

    geometry
}

fn vertical_bar(
    kind: BarKind,
    start: (f32, f32),
    end: (f32, f32),
    state: LevelState,
) -> TiltBar {
    let (start, end) = (to_point(start), to_point(end));
    let t = BAR_HALF_THICKNESS;
    TiltBar {
        kind,
        corners: [
            Point::new(start.x - t, start.y),
            Point::new(end.x - t, end.y),
            Point::new(end.x + t, end.y),
            Point::new(start.x + t, start.y),
        ],
        state,
    }
}

fn horizontal_bar(
    kind: BarKind,
    start: (f32, f32),
    end: (f32, f32),
    state: LevelState,
) -> TiltBar {
    let (start, end) = (to_point(start), to_point(end));
    let t = BAR_HALF_THICKNESS;
    TiltBar {
        kind,
        corners: [
            Point::new(start.x, start.y - t),
            Point::new(end.x, end.y - t),
            Point::new(end.x, end.y + t),
            Point::new(start.x, start.y + t),
        ],
        state,
    }
}

#[inline]
fn to_point((x, y): (f32, f32)) -> Point { Point::new(F32(x).round().0 as i32, F32(y).round().0 as i32) }

// =============================================================================
// Drawing
// =============================================================================

/// Colors used to paint the indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TiltStyle {
    /// Bar outline.
    pub stroke: Rgb565,
    /// Bar outline width in pixels.
    pub stroke_width: u32,
    /// Fill for bars whose component is level.
    pub level_fill: Rgb565,
    /// Fill for bars whose component is tilted.
    pub tilted_fill: Rgb565,
    /// Surface color painted by [`render_tilt`] before the bars.
    pub background: Rgb565,
}

impl TiltStyle {
    /// White outline, green when level, red when tilted, on black.
    pub const DEFAULT: Self = Self {
        stroke: WHITE,
        stroke_width: BAR_STROKE_WIDTH,
        level_fill: GREEN,
        tilted_fill: RED,
        background: BLACK,
    };

    /// Fill color for a bar in the given state.
    #[inline]
    pub const fn fill_for(
        &self,
        state: LevelState,
    ) -> Rgb565 {
        match state {
            LevelState::Level => self.level_fill,
            LevelState::Tilted => self.tilted_fill,
        }
    }
}

impl Default for TiltStyle {
    fn default() -> Self { Self::DEFAULT }
}

/// Paint precomputed indicator bars.
///
/// Each bar is filled as two triangles, then outlined.
pub fn draw_tilt<D>(
    display: &mut D,
    geometry: &TiltGeometry,
    style: &TiltStyle,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let outline_style = PrimitiveStyle::with_stroke(style.stroke, style.stroke_width);

    for bar in geometry.bars() {
        let fill_style = PrimitiveStyle::with_fill(style.fill_for(bar.state));
        let [a, b, c, d] = bar.corners;

        Triangle::new(a, b, c).into_styled(fill_style).draw(display)?;
        Triangle::new(a, c, d).into_styled(fill_style).draw(display)?;

        let outline = [a, b, c, d, a];
        Polyline::new(&outline).into_styled(outline_style).draw(display)?;
    }

    Ok(())
}

/// Clear the surface and draw the indicator for an attitude.
pub fn render_tilt<D>(
    display: &mut D,
    attitude: Attitude,
    bounds: Rectangle,
    style: &TiltStyle,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    display.fill_solid(&bounds, style.background)?;
    draw_tilt(display, &tilt_geometry(attitude, bounds), style)
}

// =============================================================================
// Unit Tests
// =============================================================================
