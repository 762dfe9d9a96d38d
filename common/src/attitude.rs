//! Attitude resolution: gravity vector in, deviation from level out.
//!
//! The sensor axes only line up with what the user sees as "horizontal" and
//! "vertical" for one way of holding the device. Reading `z` as pitch and `x`
//! as roll unconditionally falls apart as soon as the device is turned 90° or
//! laid face up, so [`resolve`] first classifies which face is up and then
//! picks and signs the components through a fixed table:
//!
//! | Face up | Pitch | Roll |
//! |---------|-------|------|
//! | X+      | gz    | -gy  |
//! | X-      | gz    | gy   |
//! | Y+      | gz    | gx   |
//! | Y-      | gz    | -gx  |
//! | Z+      | -gy   | gx   |
//! | Z-      | gy    | gx   |
//!
//! Positive pitch and positive roll keep the same on-screen meaning in every row.

use micromath::F32;

use crate::config::{ATTITUDE_LIMIT, ATTITUDE_SCALE};
use crate::gravity::{DeviceAxis, FaceUp, GravityVector, Sign};

/// Normalized deviation from level, `pitch` and `roll` each in [-1, 1].
///
/// Components are clamped and rounded to hundredths on construction; there is
/// no way to build an `Attitude` that breaks that.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Attitude {
    pitch: f32,
    roll: f32,
}

impl Attitude {
    /// Perfectly level.
    pub const LEVEL: Self = Self { pitch: 0.0, roll: 0.0 };

    /// Build an attitude, clamping and rounding both components.
    pub fn new(
        pitch: f32,
        roll: f32,
    ) -> Self {
        Self {
            pitch: normalize(pitch),
            roll: normalize(roll),
        }
    }

    /// Forward/backward deviation along the visual horizontal.
    #[inline]
    pub const fn pitch(&self) -> f32 { self.pitch }

    /// Left/right deviation along the visual vertical.
    #[inline]
    pub const fn roll(&self) -> f32 { self.roll }
}

/// Clamp to [-ATTITUDE_LIMIT, ATTITUDE_LIMIT] and round to hundredths.
fn normalize(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    let clamped = value.clamp(-ATTITUDE_LIMIT, ATTITUDE_LIMIT);
    // `+ 0.0` folds -0.0 into 0.0
    F32(clamped * ATTITUDE_SCALE).round().0 / ATTITUDE_SCALE + 0.0
}

/// An attitude together with the inputs it was derived from.
///
/// Used by the diagnostics display.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AttitudeReading {
    pub gravity: GravityVector,
    pub face_up: FaceUp,
    pub attitude: Attitude,
}

/// Resolve a gravity sample into a pitch/roll deviation from level.
#[inline]
pub fn resolve(gravity: GravityVector) -> Attitude { resolve_reading(gravity).attitude }

/// Resolve a gravity sample, keeping the face-up classification and raw input.
pub fn resolve_reading(gravity: GravityVector) -> AttitudeReading {
    let g = gravity.sanitized();
    let face_up = g.face_up();

    let (pitch, roll) = match (face_up.axis, face_up.sign) {
        (DeviceAxis::X, Sign::Positive) => (g.z, -g.y),
        (DeviceAxis::X, Sign::Negative) => (g.z, g.y),
        (DeviceAxis::Y, Sign::Positive) => (g.z, g.x),
        (DeviceAxis::Y, Sign::Negative) => (g.z, -g.x),
        (DeviceAxis::Z, Sign::Positive) => (-g.y, g.x),
        (DeviceAxis::Z, Sign::Negative) => (g.y, g.x),
    };

    AttitudeReading {
        gravity,
        face_up,
        attitude: Attitude::new(pitch, roll),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn assert_attitude(
        attitude: Attitude,
        pitch: f32,
        roll: f32,
    ) {
        assert!(
            (attitude.pitch() - pitch).abs() < EPS && (attitude.roll() - roll).abs() < EPS,
            "expected ({pitch}, {roll}), got ({}, {})",
            attitude.pitch(),
            attitude.roll()
        );
    }

    #[test]
    fn test_basis_vectors_are_level() {
        let basis = [
            (GravityVector::new(1.0, 0.0, 0.0), FaceUp::new(DeviceAxis::X, Sign::Negative)),
            (GravityVector::new(-1.0, 0.0, 0.0), FaceUp::new(DeviceAxis::X, Sign::Positive)),
            (GravityVector::new(0.0, 1.0, 0.0), FaceUp::new(DeviceAxis::Y, Sign::Negative)),
            (GravityVector::new(0.0, -1.0, 0.0), FaceUp::new(DeviceAxis::Y, Sign::Positive)),
            (GravityVector::new(0.0, 0.0, 1.0), FaceUp::new(DeviceAxis::Z, Sign::Negative)),
            (GravityVector::new(0.0, 0.0, -1.0), FaceUp::new(DeviceAxis::Z, Sign::Positive)),
        ];

        for (gravity, expected_face) in basis {
            let reading = resolve_reading(gravity);
            assert_eq!(reading.face_up, expected_face, "face for {gravity:?}");
            assert_eq!(reading.attitude, Attitude::LEVEL, "attitude for {gravity:?}");
        }
    }

    #[test]
    fn test_table_x_faces() {
        // X+ up: gravity along -X
        assert_attitude(resolve(GravityVector::new(-0.9, 0.2, 0.3)), 0.3, -0.2);
        // X- up: gravity along +X
        assert_attitude(resolve(GravityVector::new(0.9, 0.2, 0.3)), 0.3, 0.2);
    }

    #[test]
    fn test_table_y_faces() {
        // Y+ up (portrait, held upright)
        assert_attitude(resolve(GravityVector::new(0.2, -0.9, 0.3)), 0.3, 0.2);
        // Y- up (portrait, upside down)
        assert_attitude(resolve(GravityVector::new(0.2, 0.9, 0.3)), 0.3, -0.2);
    }

    #[test]
    fn test_table_z_faces() {
        // Z+ up (lying screen up)
        assert_attitude(resolve(GravityVector::new(0.2, 0.3, -0.9)), -0.3, 0.2);
        // Z- up (lying screen down)
        assert_attitude(resolve(GravityVector::new(0.2, 0.3, 0.9)), 0.3, 0.2);
    }

    #[test]
    fn test_end_to_end_example() {
        let reading = resolve_reading(GravityVector::new(0.02, 0.05, -0.98));
        assert_eq!(reading.face_up, FaceUp::new(DeviceAxis::Z, Sign::Positive));
        assert_attitude(reading.attitude, -0.05, 0.02);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let g = GravityVector::new(0.123, -0.456, 0.789);
        assert_eq!(resolve(g), resolve(g));
        assert_eq!(resolve_reading(g), resolve_reading(g));
    }

    #[test]
    fn test_clamp_invariant() {
        // Sweep components through [-10, 10]
        let steps = 21;
        for i in 0..steps {
            for j in 0..steps {
                for k in 0..steps {
                    let c = |n: i32| -10.0 + n as f32 * 20.0 / (steps - 1) as f32;
                    let a = resolve(GravityVector::new(c(i), c(j), c(k)));
                    assert!((-1.0..=1.0).contains(&a.pitch()), "pitch {} out of range", a.pitch());
                    assert!((-1.0..=1.0).contains(&a.roll()), "roll {} out of range", a.roll());
                }
            }
        }
    }

    #[test]
    fn test_clamps_large_components() {
        // Z+ up with a large lateral component still dominated by Z
        assert_attitude(resolve(GravityVector::new(3.0, -4.0, -9.0)), 1.0, 1.0);
        assert_attitude(resolve(GravityVector::new(-3.0, 4.0, -9.0)), -1.0, -1.0);
    }

    #[test]
    fn test_rounding_quantizes_noise() {
        let a = resolve(GravityVector::new(0.0041, -0.0049, -0.999));
        assert_eq!(a, Attitude::LEVEL);

        let b = resolve(GravityVector::new(0.0151, 0.0, -0.999));
        assert_attitude(b, 0.0, 0.02);
    }

    #[test]
    fn test_continuity_within_dominance_region() {
        let base = resolve(GravityVector::new(0.10, 0.20, -0.95));
        let nudged = resolve(GravityVector::new(0.11, 0.21, -0.95));
        assert!((base.pitch() - nudged.pitch()).abs() <= 0.011);
        assert!((base.roll() - nudged.roll()).abs() <= 0.011);
    }

    #[test]
    fn test_dominance_boundary_jump() {
        // Either side of |x| == |y| with Z small: Y+ up vs X+ up
        let y_side = resolve_reading(GravityVector::new(-0.70, -0.71, 0.05));
        let x_side = resolve_reading(GravityVector::new(-0.71, -0.70, 0.05));
        assert_eq!(y_side.face_up, FaceUp::new(DeviceAxis::Y, Sign::Positive));
        assert_eq!(x_side.face_up, FaceUp::new(DeviceAxis::X, Sign::Positive));

        // Pitch comes from gz on both sides; roll swaps source component and jumps
        assert_attitude(y_side.attitude, 0.05, -0.70);
        assert_attitude(x_side.attitude, 0.05, 0.70);

        // Exactly on the boundary the tie goes to Y
        let tie = resolve_reading(GravityVector::new(-0.70, -0.70, 0.05));
        assert_eq!(tie.face_up, FaceUp::new(DeviceAxis::Y, Sign::Positive));
    }

    #[test]
    fn test_attitude_new_normalizes() {
        assert_attitude(Attitude::new(1.7, -2.3), 1.0, -1.0);
        assert_attitude(Attitude::new(0.126, -0.124), 0.13, -0.12);
        assert_attitude(Attitude::new(f32::NAN, f32::INFINITY), 0.0, 1.0);
        assert!(Attitude::new(-0.001, 0.0).pitch().is_sign_positive());
    }

    #[test]
    fn test_reading_keeps_raw_gravity() {
        let g = GravityVector::new(0.5, -2.0, 0.25);
        assert_eq!(resolve_reading(g).gravity, g);
    }
}
