//! Simulated motion sensor running on its own thread.
//!
//! Reads the latest [`DevicePose`] from a `Watch`, adds a little hand tremor
//! and pumps the result into the overlay pipeline at the sensor sample rate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_sync::watch::Receiver;
use level_common::gravity::GravityVector;
use level_common::motion::{GravitySource, SensorError, pump};
use level_common::pipeline::OverlayPipeline;
use log::{info, warn};

use crate::pose::DevicePose;
use crate::timing::SAMPLE_INTERVAL;

/// Peak tremor added to pitch and roll.
const TREMOR_AMPLITUDE: f32 = 0.006;

/// Tremor frequencies in Hz, one per component so they drift apart.
const TREMOR_HZ: (f32, f32) = (1.3, 0.7);

/// Receivers the pose `Watch` can hand out.
pub const POSE_RECEIVERS: usize = 1;

/// Sensor health as last reported by the motion thread. `None` means healthy.
pub type SensorStatus = Signal<CriticalSectionRawMutex, Option<SensorError>>;

/// Gravity source backed by the keyboard pose.
pub struct SimulatedSensor<'a> {
    pose: Receiver<'a, CriticalSectionRawMutex, DevicePose, POSE_RECEIVERS>,
    started: Instant,
}

impl<'a> SimulatedSensor<'a> {
    pub fn new(pose: Receiver<'a, CriticalSectionRawMutex, DevicePose, POSE_RECEIVERS>) -> Self {
        Self {
            pose,
            started: Instant::now(),
        }
    }

    fn tremor(&self) -> (f32, f32) {
        let t = self.started.elapsed().as_secs_f32();
        let phase = |hz: f32| (t * hz * std::f32::consts::TAU).sin() * TREMOR_AMPLITUDE;
        (phase(TREMOR_HZ.0), phase(TREMOR_HZ.1))
    }
}

impl GravitySource for SimulatedSensor<'_> {
    fn read_gravity(&mut self) -> Result<GravityVector, SensorError> {
        let pose = self.pose.try_get().ok_or(SensorError::NotReady)?;
        if !pose.sensor_online {
            return Err(SensorError::Unavailable);
        }
        Ok(pose.gravity(self.tremor()))
    }
}

/// Sample `sensor` into `pipeline` until `running` goes false.
///
/// Errors are logged and posted on `status` once per transition, not per sample.
pub fn run_motion<S: GravitySource>(
    mut sensor: S,
    pipeline: &OverlayPipeline<CriticalSectionRawMutex>,
    status: &SensorStatus,
    running: &AtomicBool,
) {
    let mut last_error: Option<SensorError> = None;

    while running.load(Ordering::Relaxed) {
        let tick = Instant::now();

        let error = pump(&mut sensor, pipeline).err();
        if error != last_error {
            match error {
                Some(e) => warn!("motion: {e}"),
                None => info!("motion: sensor online"),
            }
            status.signal(error);
            last_error = error;
        }

        if let Some(remaining) = SAMPLE_INTERVAL.checked_sub(tick.elapsed()) {
            thread::sleep(remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use embassy_sync::watch::Watch;
    use level_common::attitude::Attitude;

    use super::*;

    #[test]
    fn test_sensor_not_ready_before_first_pose() {
        let watch: Watch<CriticalSectionRawMutex, DevicePose, POSE_RECEIVERS> = Watch::new();
        let Some(receiver) = watch.receiver() else {
            panic!("receiver slot");
        };
        let mut sensor = SimulatedSensor::new(receiver);
        assert_eq!(sensor.read_gravity(), Err(SensorError::NotReady));
    }

    #[test]
    fn test_sensor_follows_pose() {
        let watch: Watch<CriticalSectionRawMutex, DevicePose, POSE_RECEIVERS> = Watch::new();
        let Some(receiver) = watch.receiver() else {
            panic!("receiver slot");
        };
        let sender = watch.sender();
        let mut sensor = SimulatedSensor::new(receiver);

        let mut pose = DevicePose::new();
        pose.nudge_roll(30.0);
        sender.send(pose);

        let reading = sensor.read_gravity().map(level_common::attitude::resolve);
        let Ok(attitude) = reading else {
            panic!("expected a sample, got {reading:?}");
        };
        assert!((attitude.roll() - 0.3).abs() <= 0.011, "roll {}", attitude.roll());
        assert!(attitude.pitch().abs() <= 0.011);

        pose.sensor_online = false;
        sender.send(pose);
        assert_eq!(sensor.read_gravity(), Err(SensorError::Unavailable));
    }

    #[test]
    fn test_run_motion_reports_transitions_and_stops() {
        static PIPELINE: OverlayPipeline<CriticalSectionRawMutex> = OverlayPipeline::new();
        static STATUS: SensorStatus = Signal::new();
        static RUNNING: AtomicBool = AtomicBool::new(true);

        struct Flaky(u32);
        impl GravitySource for Flaky {
            fn read_gravity(&mut self) -> Result<GravityVector, SensorError> {
                self.0 += 1;
                if self.0 >= 3 {
                    RUNNING.store(false, Ordering::Relaxed);
                    return Err(SensorError::Bus);
                }
                Ok(GravityVector::new(0.0, 0.0, -1.0))
            }
        }

        run_motion(Flaky(0), &PIPELINE, &STATUS, &RUNNING);

        assert_eq!(STATUS.try_take(), Some(Some(SensorError::Bus)));
        assert_eq!(PIPELINE.latest().map(|r| r.attitude), Some(Attitude::LEVEL));
    }
}
