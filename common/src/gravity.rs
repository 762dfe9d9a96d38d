//! Gravity vector and "which face is up" classification.
//!
//! The motion collaborator reports gravity in device-local coordinates, one
//! sample per tick, each component roughly in [-1, 1] (units of g):
//!
//! - X: volume buttons (-) to power button (+)
//! - Y: bottom edge (-) to top edge (+)
//! - Z: back of the device (-) to the screen (+)
//!
//! Gravity points *down*, toward the centre of the Earth. The local axis most
//! nearly aligned with it is the one currently standing vertical, and the face
//! pointing *up* along that axis is on the opposite side from the gravity
//! component.

use core::fmt;

use micromath::F32;

/// Gravity direction in device-local coordinates.
///
/// Equality is component-wise; the pipeline uses it to ignore repeated samples.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GravityVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl GravityVector {
    /// Create a vector from raw components.
    pub const fn new(
        x: f32,
        y: f32,
        z: f32,
    ) -> Self {
        Self { x, y, z }
    }

    /// Copy of this vector with NaN components replaced by zero.
    ///
    /// A NaN never wins the dominance comparison and never reaches the attitude.
    pub const fn sanitized(self) -> Self {
        Self {
            x: zero_if_nan(self.x),
            y: zero_if_nan(self.y),
            z: zero_if_nan(self.z),
        }
    }

    /// Euclidean length. Close to 1.0 while the device is held still.
    pub fn magnitude(&self) -> f32 {
        let v = self.sanitized();
        sqrt(v.x * v.x + v.y * v.y + v.z * v.z)
    }

    /// Component along the given axis.
    #[inline]
    pub const fn component(
        &self,
        axis: DeviceAxis,
    ) -> f32 {
        match axis {
            DeviceAxis::X => self.x,
            DeviceAxis::Y => self.y,
            DeviceAxis::Z => self.z,
        }
    }

    /// Axis whose component has the largest magnitude.
    ///
    /// Ties go to Z, then Y, then X. The zero vector therefore resolves to Z.
    pub fn dominant_axis(&self) -> DeviceAxis {
        let v = self.sanitized();
        let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());

        if az >= ax && az >= ay {
            DeviceAxis::Z
        } else if ay >= ax {
            DeviceAxis::Y
        } else {
            DeviceAxis::X
        }
    }

    /// Classify which face of the device is pointing up.
    pub fn face_up(&self) -> FaceUp {
        let axis = self.dominant_axis();
        let component = zero_if_nan(self.component(axis));

        // Gravity points down, so the up-facing side has the opposite sign.
        let sign = if component > 0.0 {
            Sign::Negative
        } else {
            Sign::Positive
        };

        FaceUp { axis, sign }
    }
}

const fn zero_if_nan(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v }
}

/// Square root to full `f32` precision.
///
/// `micromath` gives a fast estimate (off by several percent between powers
/// of two); three Newton steps bring it down to rounding error. `n` is a sum
/// of squares, never negative.
fn sqrt(n: f32) -> f32 {
    if n == 0.0 || n.is_infinite() {
        return n;
    }
    let mut r = F32(n).sqrt().0;
    for _ in 0..3 {
        r = 0.5 * (r + n / r);
    }
    r
}

// =============================================================================
// Face-Up Classification
// =============================================================================

/// A local device axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceAxis {
    X,
    Y,
    Z,
}

/// Direction along a [`DeviceAxis`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sign {
    Positive,
    Negative,
}

/// The axis standing vertical and which end of it points up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaceUp {
    pub axis: DeviceAxis,
    pub sign: Sign,
}

impl FaceUp {
    /// All six orientations, in the order the simulator cycles through them.
    pub const ALL: [Self; 6] = [
        Self::new(DeviceAxis::Z, Sign::Positive),
        Self::new(DeviceAxis::Y, Sign::Positive),
        Self::new(DeviceAxis::X, Sign::Negative),
        Self::new(DeviceAxis::Y, Sign::Negative),
        Self::new(DeviceAxis::X, Sign::Positive),
        Self::new(DeviceAxis::Z, Sign::Negative),
    ];

    pub const fn new(
        axis: DeviceAxis,
        sign: Sign,
    ) -> Self {
        Self { axis, sign }
    }
}

impl fmt::Display for DeviceAxis {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        })
    }
}

impl fmt::Display for Sign {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            Self::Positive => "+",
            Self::Negative => "-",
        })
    }
}

impl fmt::Display for FaceUp {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}{}", self.axis, self.sign)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
