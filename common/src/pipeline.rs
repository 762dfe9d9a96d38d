//! Sample-to-redraw pipeline shared between the motion producer and the renderer.
//!
//! ```text
//!  motion thread                         render thread
//!  ─────────────                         ─────────────
//!  submit_gravity(g)                     next_event() / try_next_event()
//!    ├─ same sample?   → SampleUnchanged    ├─ VisibilityChanged (first)
//!    ├─ store latest reading                └─ Redraw(ticket)
//!    ├─ same attitude? → AttitudeUnchanged        │
//!    └─ scheduler ─► redraw signal ───────────────┘
//!                                        begin_redraw(ticket) → latest reading
//!  set_hidden(h) ─► visibility signal    draw
//!                                        finish_redraw(ticket)
//! ```
//!
//! The redraw signal holds one ticket: posting a newer one overwrites an older
//! one that has not been taken yet. Whatever ticket the renderer ends up with,
//! it paints the reading that is current when the redraw *starts*, never the
//! one that triggered it.
//!
//! Visibility changes travel on a separate signal that [`OverlayPipeline::next_event`]
//! checks first, so a hide takes effect even with a redraw queued.
//!
//! All state sits behind `embassy_sync` primitives, so a pipeline can live in a
//! `static` and be shared across threads or tasks with a suitable `RawMutex`.

use core::cell::{Cell, RefCell};

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use log::{debug, trace};

use crate::attitude::{AttitudeReading, resolve_reading};
use crate::gravity::GravityVector;
use crate::scheduler::{RedrawTicket, ScheduleOutcome, SchedulerStats, UpdateScheduler};

/// Result of feeding one gravity sample into the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Submission {
    /// Identical to the previous sample; nothing recomputed.
    SampleUnchanged,
    /// New sample, but it resolved to the same attitude as before.
    AttitudeUnchanged,
    /// The attitude changed and went through the scheduler.
    Changed(ScheduleOutcome),
}

/// Work item for the rendering side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverlayEvent {
    /// The overlay was hidden or shown.
    VisibilityChanged { hidden: bool },
    /// A redraw was scheduled.
    Redraw(RedrawTicket),
}

/// Latest reading, redraw scheduler and the two event signals.
pub struct OverlayPipeline<M: RawMutex> {
    latest: Mutex<M, Cell<Option<AttitudeReading>>>,
    scheduler: Mutex<M, RefCell<UpdateScheduler>>,
    visibility: Signal<M, bool>,
    redraw: Signal<M, RedrawTicket>,
}

impl<M: RawMutex> OverlayPipeline<M> {
    /// Empty, visible pipeline. `const` so it can initialize a `static`.
    pub const fn new() -> Self {
        Self {
            latest: Mutex::new(Cell::new(None)),
            scheduler: Mutex::new(RefCell::new(UpdateScheduler::new())),
            visibility: Signal::new(),
            redraw: Signal::new(),
        }
    }

    // =========================================================================
    // Producer Side
    // =========================================================================

    /// Feed one gravity sample.
    ///
    /// The very first sample always counts as a change.
    pub fn submit_gravity(
        &self,
        gravity: GravityVector,
    ) -> Submission {
        let changed = self.latest.lock(|latest| {
            let previous = latest.get();
            if previous.is_some_and(|reading| reading.gravity == gravity) {
                return None;
            }

            let reading = resolve_reading(gravity);
            latest.set(Some(reading));
            Some(previous.is_none_or(|prev| prev.attitude != reading.attitude))
        });

        match changed {
            None => Submission::SampleUnchanged,
            Some(false) => Submission::AttitudeUnchanged,
            Some(true) => {
                let outcome = self.scheduler.lock(|scheduler| {
                    let outcome = scheduler.borrow_mut().on_attitude_changed();
                    // Posted under the scheduler lock so the signal never
                    // carries a ticket older than the scheduler's.
                    if let Some(ticket) = outcome.ticket() {
                        self.redraw.signal(ticket);
                    }
                    outcome
                });
                trace!("attitude changed: {outcome:?}");
                Submission::Changed(outcome)
            }
        }
    }

    /// Show or hide the overlay.
    ///
    /// Hiding drops a queued redraw that has not started. Showing does not
    /// schedule anything by itself; the renderer gets a `VisibilityChanged`
    /// event and can paint the latest reading straight away.
    pub fn set_hidden(
        &self,
        hidden: bool,
    ) {
        let cancelled = self.scheduler.lock(|scheduler| {
            let cancelled = scheduler.borrow_mut().set_hidden(hidden);
            if hidden {
                self.redraw.reset();
            }
            cancelled
        });

        if let Some(ticket) = cancelled {
            debug!("hidden: cancelled pending redraw {}", ticket.id());
        }
        debug!("overlay {}", if hidden { "hidden" } else { "shown" });
        self.visibility.signal(hidden);
    }

    // =========================================================================
    // Renderer Side
    // =========================================================================

    /// Next event without waiting. Visibility changes come first.
    pub fn try_next_event(&self) -> Option<OverlayEvent> {
        if let Some(hidden) = self.visibility.try_take() {
            return Some(OverlayEvent::VisibilityChanged { hidden });
        }
        self.redraw.try_take().map(OverlayEvent::Redraw)
    }

    /// Wait for the next event. Visibility changes come first.
    pub async fn next_event(&self) -> OverlayEvent {
        // `select` polls its first future first, which gives visibility priority
        match select(self.visibility.wait(), self.redraw.wait()).await {
            Either::First(hidden) => OverlayEvent::VisibilityChanged { hidden },
            Either::Second(ticket) => OverlayEvent::Redraw(ticket),
        }
    }

    /// Start a redraw, returning the reading to paint.
    ///
    /// `None` when the ticket was superseded, cancelled or the overlay is
    /// hidden; skip the draw in that case. After `Some`, call
    /// [`finish_redraw`](Self::finish_redraw) once painting is done.
    pub fn begin_redraw(
        &self,
        ticket: RedrawTicket,
    ) -> Option<AttitudeReading> {
        let started = self.scheduler.lock(|scheduler| scheduler.borrow_mut().start_redraw(ticket));
        if !started {
            trace!("redraw {} is stale", ticket.id());
            return None;
        }

        let reading = self.latest();
        if reading.is_none() {
            self.finish_redraw(ticket);
        }
        reading
    }

    /// Retire a redraw started with [`begin_redraw`](Self::begin_redraw).
    pub fn finish_redraw(
        &self,
        ticket: RedrawTicket,
    ) {
        self.scheduler.lock(|scheduler| scheduler.borrow_mut().finish_redraw(ticket));
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Most recently resolved reading, if any sample has arrived.
    #[inline]
    pub fn latest(&self) -> Option<AttitudeReading> { self.latest.lock(Cell::get) }

    #[inline]
    pub fn is_hidden(&self) -> bool { self.scheduler.lock(|scheduler| scheduler.borrow().is_hidden()) }

    #[inline]
    pub fn stats(&self) -> SchedulerStats { self.scheduler.lock(|scheduler| scheduler.borrow().stats()) }
}

impl<M: RawMutex> Default for OverlayPipeline<M> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    use super::*;
    use crate::attitude::{Attitude, resolve};

    type Pipeline = OverlayPipeline<CriticalSectionRawMutex>;

    fn roll_sample(roll: f32) -> GravityVector { GravityVector::new(roll, 0.0, -1.0) }

    fn expect_redraw(pipeline: &Pipeline) -> RedrawTicket {
        match pipeline.try_next_event() {
            Some(OverlayEvent::Redraw(ticket)) => ticket,
            other => panic!("expected redraw, got {other:?}"),
        }
    }

    #[test]
    fn test_first_sample_schedules() {
        let pipeline = Pipeline::new();
        assert!(pipeline.latest().is_none());

        let submission = pipeline.submit_gravity(roll_sample(0.0));
        assert!(matches!(submission, Submission::Changed(ScheduleOutcome::Scheduled(_))));
        assert_eq!(pipeline.latest().map(|r| r.attitude), Some(Attitude::LEVEL));
    }

    #[test]
    fn test_repeated_sample_is_ignored() {
        let pipeline = Pipeline::new();
        pipeline.submit_gravity(roll_sample(0.3));
        assert_eq!(pipeline.submit_gravity(roll_sample(0.3)), Submission::SampleUnchanged);
        assert_eq!(pipeline.stats().scheduled, 1);
    }

    #[test]
    fn test_same_attitude_does_not_schedule() {
        let pipeline = Pipeline::new();
        pipeline.submit_gravity(GravityVector::new(0.301, 0.0, -1.0));

        // Different sample, same rounded attitude
        let g = GravityVector::new(0.302, 0.0, -1.0);
        assert_eq!(pipeline.submit_gravity(g), Submission::AttitudeUnchanged);
        assert_eq!(pipeline.latest().map(|r| r.gravity), Some(g));
        assert_eq!(pipeline.stats().scheduled, 1);
    }

    #[test]
    fn test_burst_coalesces_and_draws_latest() {
        let pipeline = Pipeline::new();
        for i in 1..=10 {
            pipeline.submit_gravity(roll_sample(i as f32 * 0.05));
        }

        let ticket = expect_redraw(&pipeline);
        assert_eq!(pipeline.try_next_event(), None, "burst must coalesce to one event");

        let reading = pipeline.begin_redraw(ticket);
        assert_eq!(reading.map(|r| r.attitude), Some(Attitude::new(0.0, 0.5)));
        pipeline.finish_redraw(ticket);

        let stats = pipeline.stats();
        assert_eq!(stats.scheduled, 10);
        assert_eq!(stats.superseded, 9);
        assert_eq!(stats.completed, 1);
    }

    #[test]
    fn test_redraw_reads_latest_not_trigger() {
        let pipeline = Pipeline::new();
        pipeline.submit_gravity(roll_sample(0.1));
        let ticket = expect_redraw(&pipeline);

        // A change lands between dequeue and start
        pipeline.submit_gravity(roll_sample(0.4));

        // The old ticket was superseded; the new one paints 0.4
        assert_eq!(pipeline.begin_redraw(ticket), None);
        let newer = expect_redraw(&pipeline);
        assert_eq!(pipeline.begin_redraw(newer).map(|r| r.attitude.roll()), Some(0.4));
        pipeline.finish_redraw(newer);
    }

    #[test]
    fn test_hidden_suppresses_until_shown() {
        let pipeline = Pipeline::new();
        pipeline.set_hidden(true);
        assert!(pipeline.is_hidden());
        assert_eq!(
            pipeline.try_next_event(),
            Some(OverlayEvent::VisibilityChanged { hidden: true })
        );

        for i in 1..=5 {
            let submission = pipeline.submit_gravity(roll_sample(i as f32 * 0.1));
            assert_eq!(submission, Submission::Changed(ScheduleOutcome::Suppressed));
        }
        assert_eq!(pipeline.try_next_event(), None);

        // Latest is still tracked while hidden
        assert_eq!(pipeline.latest().map(|r| r.attitude.roll()), Some(0.5));

        pipeline.set_hidden(false);
        assert_eq!(
            pipeline.try_next_event(),
            Some(OverlayEvent::VisibilityChanged { hidden: false })
        );

        pipeline.submit_gravity(roll_sample(0.6));
        let ticket = expect_redraw(&pipeline);
        assert!(pipeline.begin_redraw(ticket).is_some());
        pipeline.finish_redraw(ticket);
        assert_eq!(pipeline.try_next_event(), None);
        assert_eq!(pipeline.stats().started, 1);
    }

    #[test]
    fn test_hide_drops_queued_redraw() {
        let pipeline = Pipeline::new();
        pipeline.submit_gravity(roll_sample(0.2));
        pipeline.set_hidden(true);

        assert_eq!(
            pipeline.try_next_event(),
            Some(OverlayEvent::VisibilityChanged { hidden: true })
        );
        assert_eq!(pipeline.try_next_event(), None);
    }

    #[test]
    fn test_visibility_outranks_redraw() {
        let pipeline = Pipeline::new();
        pipeline.submit_gravity(roll_sample(0.2));
        pipeline.set_hidden(false);

        assert_eq!(
            pipeline.try_next_event(),
            Some(OverlayEvent::VisibilityChanged { hidden: false })
        );
        assert!(matches!(pipeline.try_next_event(), Some(OverlayEvent::Redraw(_))));
    }

    #[test]
    fn test_async_next_event_priority() {
        let pipeline = Pipeline::new();
        pipeline.submit_gravity(roll_sample(0.2));
        pipeline.set_hidden(false);

        let first = block_on(pipeline.next_event());
        let second = block_on(pipeline.next_event());
        assert_eq!(first, OverlayEvent::VisibilityChanged { hidden: false });
        assert!(matches!(second, OverlayEvent::Redraw(_)));
    }

    #[test]
    fn test_threaded_producer_final_state_drawn() {
        let pipeline = Pipeline::new();
        let samples: Vec<GravityVector> = (0..2000)
            .map(|i| GravityVector::new((i % 200) as f32 * 0.004, (i / 200) as f32 * 0.01, -0.98))
            .collect();
        let last = samples.last().copied().unwrap_or_default();

        let mut drawn = Vec::new();
        std::thread::scope(|scope| {
            let producer = scope.spawn(|| {
                for g in &samples {
                    pipeline.submit_gravity(*g);
                }
            });

            let mut render = |pipeline: &Pipeline| {
                while let Some(event) = pipeline.try_next_event() {
                    let OverlayEvent::Redraw(ticket) = event else { continue };
                    if let Some(reading) = pipeline.begin_redraw(ticket) {
                        drawn.push(reading.attitude);
                        pipeline.finish_redraw(ticket);
                    }
                }
            };

            while !producer.is_finished() {
                render(&pipeline);
                std::thread::yield_now();
            }
            producer.join().ok();
            render(&pipeline);
        });

        assert!(!drawn.is_empty());
        assert!(drawn.len() <= samples.len());
        assert_eq!(drawn.last().copied(), Some(resolve(last)));

        let stats = pipeline.stats();
        assert_eq!(stats.started as usize, drawn.len());
        // Every paint was retired, including ones overtaken by a follow-up
        assert_eq!(stats.completed, stats.started);
    }

    #[test]
    fn test_paint_overtaken_by_change_counts_completed() {
        let pipeline = Pipeline::new();
        pipeline.submit_gravity(roll_sample(0.1));
        let first = expect_redraw(&pipeline);
        assert!(pipeline.begin_redraw(first).is_some());

        // Change arrives mid-paint
        pipeline.submit_gravity(roll_sample(0.3));
        pipeline.finish_redraw(first);
        assert_eq!(pipeline.stats().completed, 1);

        let follow_up = expect_redraw(&pipeline);
        assert_ne!(follow_up, first);
        assert!(pipeline.begin_redraw(follow_up).is_some());
        pipeline.finish_redraw(follow_up);
        assert_eq!(pipeline.stats().completed, 2);
        assert_eq!(pipeline.try_next_event(), None);
    }
}
