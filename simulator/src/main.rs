//! Desktop simulator for the camera level overlay.
//!
//! A motion thread synthesizes gravity samples from a keyboard-controlled
//! pose and feeds the shared pipeline; the main thread owns the window and
//! repaints only when the pipeline hands it a redraw.
//!
//! Keys:
//!
//! - `W` / `S`: pitch up / down
//! - `A` / `D`: roll left / right
//! - `F`: turn the device to the next face
//! - `R`: back to level
//! - `H`: hide / show the overlay
//! - `G`: diagnostics readout on / off
//! - `U`: unplug / replug the motion sensor
//! - `Q`: quit
//!
//! Set `RUST_LOG=debug` for scheduler counters, `trace` for every sample.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod motion;
mod overlay;
mod pose;
mod timing;

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_sync::watch::Watch;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use level_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use level_common::pipeline::{OverlayEvent, OverlayPipeline};
use log::{debug, error, info};

use crate::motion::{POSE_RECEIVERS, SensorStatus, SimulatedSensor, run_motion};
use crate::overlay::OverlayView;
use crate::pose::DevicePose;
use crate::timing::{FRAME_TIME, STATS_INTERVAL};

/// Shared between the motion thread and the render loop.
static PIPELINE: OverlayPipeline<CriticalSectionRawMutex> = OverlayPipeline::new();

/// Latest keyboard pose, read by the simulated sensor.
static POSE: Watch<CriticalSectionRawMutex, DevicePose, POSE_RECEIVERS> = Watch::new();

/// Sensor health transitions from the motion thread.
static SENSOR_STATUS: SensorStatus = Signal::new();

/// Cleared on quit to stop the motion thread.
static RUNNING: AtomicBool = AtomicBool::new(true);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(pose_receiver) = POSE.receiver() else {
        error!("pose watch has no free receiver");
        return;
    };
    let pose_sender = POSE.sender();
    let mut pose = DevicePose::new();
    pose_sender.send(pose);

    let motion = thread::Builder::new().name("motion".into()).spawn(move || {
        run_motion(SimulatedSensor::new(pose_receiver), &PIPELINE, &SENSOR_STATUS, &RUNNING);
    });
    let motion = match motion {
        Ok(handle) => handle,
        Err(e) => {
            error!("failed to start motion thread: {e}");
            return;
        }
    };

    let size = Size::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(size);
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("Level Overlay Sim", &output_settings);

    let mut view = OverlayView::new(Rectangle::new(Point::zero(), size));
    view.paint(&mut display, PIPELINE.latest().as_ref(), &PIPELINE.stats()).ok();
    window.update(&display);

    info!("level simulator running: W/S pitch, A/D roll, F face, R level, H hide, G diagnostics, U sensor, Q quit");

    let mut last_stats = Instant::now();
    let mut frames = 0u32;

    'frames: loop {
        let frame_start = Instant::now();
        let mut repaint = false;

        // Handle input
        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => break 'frames,
                SimulatorEvent::KeyDown { keycode, .. } => {
                    match keycode {
                        Keycode::Q => break 'frames,
                        Keycode::W => pose.nudge_pitch(1.0),
                        Keycode::S => pose.nudge_pitch(-1.0),
                        Keycode::A => pose.nudge_roll(-1.0),
                        Keycode::D => pose.nudge_roll(1.0),
                        Keycode::R => pose.level(),
                        Keycode::F => {
                            pose.next_face();
                            info!("face up: {}", pose.face);
                        }
                        Keycode::U => {
                            pose.sensor_online = !pose.sensor_online;
                        }
                        Keycode::H => {
                            PIPELINE.set_hidden(!PIPELINE.is_hidden());
                            continue;
                        }
                        Keycode::G => {
                            let shown = view.toggle_diagnostics();
                            debug!("diagnostics {}", if shown { "on" } else { "off" });
                            repaint = true;
                            continue;
                        }
                        _ => continue,
                    }
                    pose_sender.send(pose);
                }
                _ => {}
            }
        }

        if let Some(status) = SENSOR_STATUS.try_take() {
            view.set_sensor_error(status);
            repaint = true;
        }

        // Drain pipeline events; visibility always comes out first
        while let Some(event) = PIPELINE.try_next_event() {
            match event {
                OverlayEvent::VisibilityChanged { hidden: true } => {
                    view.clear(&mut display).ok();
                    repaint = false;
                }
                OverlayEvent::VisibilityChanged { hidden: false } => repaint = true,
                OverlayEvent::Redraw(ticket) => {
                    if let Some(reading) = PIPELINE.begin_redraw(ticket) {
                        view.paint(&mut display, Some(&reading), &PIPELINE.stats()).ok();
                        PIPELINE.finish_redraw(ticket);
                        frames = frames.wrapping_add(1);
                        repaint = false;
                    }
                }
            }
        }

        // Direct repaint: unhide, diagnostics toggle or sensor status
        if repaint && !PIPELINE.is_hidden() {
            view.paint(&mut display, PIPELINE.latest().as_ref(), &PIPELINE.stats()).ok();
            frames = frames.wrapping_add(1);
        }

        window.update(&display);

        if last_stats.elapsed() >= STATS_INTERVAL {
            let stats = PIPELINE.stats();
            debug!(
                "paints {frames}/s, scheduled {}, superseded {}, suppressed {}, stale {}",
                stats.scheduled, stats.superseded, stats.suppressed, stats.stale
            );
            frames = 0;
            last_stats = Instant::now();
        }

        if let Some(remaining) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    RUNNING.store(false, Ordering::Relaxed);
    if motion.join().is_err() {
        error!("motion thread panicked");
    }
    info!("level simulator stopped");
}
