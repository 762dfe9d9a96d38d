//! Boundary to whatever delivers gravity samples.
//!
//! On a phone this is the platform motion service, on a board an IMU driver,
//! in the simulator a synthetic pose. They all sit behind [`GravitySource`]
//! and feed the pipeline through [`pump`].

use embassy_sync::blocking_mutex::raw::RawMutex;
use log::trace;

use crate::gravity::GravityVector;
use crate::pipeline::{OverlayPipeline, Submission};

/// Why a gravity sample could not be read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// The device has no motion sensor, or access was refused.
    #[error("motion sensor unavailable")]
    Unavailable,
    /// The sensor has not produced its first sample yet.
    #[error("motion sensor not ready")]
    NotReady,
    /// Communication with the sensor failed.
    #[error("motion sensor bus error")]
    Bus,
}

/// A producer of device-local gravity samples.
pub trait GravitySource {
    /// Read the current gravity vector in units of g.
    fn read_gravity(&mut self) -> Result<GravityVector, SensorError>;
}

/// Read one sample from `source` and submit it to `pipeline`.
///
/// On error nothing is submitted; the last attitude stays on screen.
pub fn pump<S, M>(
    source: &mut S,
    pipeline: &OverlayPipeline<M>,
) -> Result<Submission, SensorError>
where
    S: GravitySource + ?Sized,
    M: RawMutex,
{
    let gravity = source.read_gravity()?;
    let submission = pipeline.submit_gravity(gravity);
    trace!("sample {gravity:?} -> {submission:?}");
    Ok(submission)
}

// =============================================================================
// Unit Tests
// =============================================================================
