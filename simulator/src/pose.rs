//! Keyboard-driven device pose and the gravity vector it produces.
//!
//! The pose is described the way the overlay reports it: which face is up,
//! plus the pitch and roll the overlay should show. [`DevicePose::gravity`]
//! runs the attitude table backwards to get a sample that resolves to it.

use level_common::gravity::{DeviceAxis, FaceUp, GravityVector, Sign};

/// Pitch/roll change per key press.
pub const POSE_STEP: f32 = 0.01;

/// Largest pitch or roll the keyboard can reach.
///
/// Keeps the vertical axis dominant so the face never flips by accident.
pub const POSE_LIMIT: f32 = 0.5;

/// Simulated device orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DevicePose {
    pub face: FaceUp,
    pub pitch: f32,
    pub roll: f32,
    /// When false the simulated sensor reports itself unavailable.
    pub sensor_online: bool,
}

impl DevicePose {
    /// Lying screen up, perfectly level.
    pub const fn new() -> Self {
        Self {
            face: FaceUp::new(DeviceAxis::Z, Sign::Positive),
            pitch: 0.0,
            roll: 0.0,
            sensor_online: true,
        }
    }

    pub fn nudge_pitch(
        &mut self,
        steps: f32,
    ) {
        self.pitch = (self.pitch + steps * POSE_STEP).clamp(-POSE_LIMIT, POSE_LIMIT);
    }

    pub fn nudge_roll(
        &mut self,
        steps: f32,
    ) {
        self.roll = (self.roll + steps * POSE_STEP).clamp(-POSE_LIMIT, POSE_LIMIT);
    }

    /// Back to level on the current face.
    pub fn level(&mut self) {
        self.pitch = 0.0;
        self.roll = 0.0;
    }

    /// Turn the device so the next face in [`FaceUp::ALL`] is up.
    pub fn next_face(&mut self) {
        let index = FaceUp::ALL.iter().position(|face| *face == self.face).unwrap_or(0);
        self.face = FaceUp::ALL[(index + 1) % FaceUp::ALL.len()];
    }

    /// Gravity sample for this pose with extra `(pitch, roll)` jitter.
    pub fn gravity(
        &self,
        jitter: (f32, f32),
    ) -> GravityVector {
        let p = self.pitch + jitter.0;
        let r = self.roll + jitter.1;
        let v = (1.0 - p * p - r * r).max(0.0).sqrt();

        match (self.face.axis, self.face.sign) {
            (DeviceAxis::Z, Sign::Positive) => GravityVector::new(r, -p, -v),
            (DeviceAxis::Z, Sign::Negative) => GravityVector::new(r, p, v),
            (DeviceAxis::X, Sign::Positive) => GravityVector::new(-v, -r, p),
            (DeviceAxis::X, Sign::Negative) => GravityVector::new(v, r, p),
            (DeviceAxis::Y, Sign::Positive) => GravityVector::new(r, -v, p),
            (DeviceAxis::Y, Sign::Negative) => GravityVector::new(-r, v, p),
        }
    }
}

impl Default for DevicePose {
    fn default() -> Self { Self::new() }
}
