//! Redraw coalescing.
//!
//! Attitude changes can arrive far faster than the overlay can be repainted.
//! [`UpdateScheduler`] keeps at most one redraw outstanding: a newer change
//! replaces a redraw that has not started yet, and changes that arrive while
//! the overlay is hidden are dropped outright.
//!
//! The scheduler holds no data and does no I/O. It only issues, cancels and
//! retires [`RedrawTicket`]s; the caller decides how a ticket reaches the
//! drawing side and which attitude gets painted when it does.
//!
//! ```text
//!            on_attitude_changed            start_redraw
//!   Idle ─────────────────────────► Pending ───────────► Pending (started)
//!    ▲                               │  ▲                        │
//!    │       set_hidden(true)        │  │ on_attitude_changed    │
//!    ├───────────────────────────────┘  └─ (supersedes)          │
//!    │                         finish_redraw                     │
//!    └───────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Tickets and Outcomes
// =============================================================================

/// Identifies one scheduled redraw.
///
/// Tickets are issued in increasing order (wrapping); only the most recent
/// one can be started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RedrawTicket(u32);

impl RedrawTicket {
    /// Raw generation number.
    #[inline]
    pub const fn id(self) -> u32 { self.0 }
}

/// What [`UpdateScheduler::on_attitude_changed`] did with a change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleOutcome {
    /// Overlay is hidden; nothing scheduled.
    Suppressed,
    /// A new redraw was scheduled.
    Scheduled(RedrawTicket),
    /// A pending redraw that had not started was cancelled and replaced.
    Superseded {
        cancelled: RedrawTicket,
        scheduled: RedrawTicket,
    },
}

impl ScheduleOutcome {
    /// Ticket the caller should deliver to the drawing side, if any.
    #[inline]
    pub const fn ticket(&self) -> Option<RedrawTicket> {
        match self {
            Self::Suppressed => None,
            Self::Scheduled(ticket) | Self::Superseded { scheduled: ticket, .. } => Some(*ticket),
        }
    }
}

/// Running counters, for logs and the diagnostics panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SchedulerStats {
    /// Tickets issued.
    pub scheduled: u32,
    /// Pending redraws replaced by a newer change before they started.
    pub superseded: u32,
    /// Changes dropped because the overlay was hidden.
    pub suppressed: u32,
    /// Redraws that actually began.
    pub started: u32,
    /// Started redraws that finished, including ones a newer ticket replaced
    /// while they were painting.
    pub completed: u32,
    /// Start attempts with a cancelled or outdated ticket.
    pub stale: u32,
}

// =============================================================================
// Scheduler
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    RedrawPending { ticket: RedrawTicket, started: bool },
}

/// Single-slot redraw scheduler.
#[derive(Debug)]
pub struct UpdateScheduler {
    state: State,
    /// Redraw between `start_redraw` and `finish_redraw`. Outlives its slot
    /// in `state` when a follow-up is scheduled mid-paint.
    painting: Option<RedrawTicket>,
    hidden: bool,
    next_id: u32,
    stats: SchedulerStats,
}

impl UpdateScheduler {
    /// Visible, idle scheduler.
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            painting: None,
            hidden: false,
            next_id: 0,
            stats: SchedulerStats {
                scheduled: 0,
                superseded: 0,
                suppressed: 0,
                started: 0,
                completed: 0,
                stale: 0,
            },
        }
    }

    /// React to a new, different attitude.
    pub fn on_attitude_changed(&mut self) -> ScheduleOutcome {
        if self.hidden {
            self.stats.suppressed = self.stats.suppressed.wrapping_add(1);
            return ScheduleOutcome::Suppressed;
        }

        match self.state {
            State::RedrawPending { ticket, started: false } => {
                let scheduled = self.issue();
                self.stats.superseded = self.stats.superseded.wrapping_add(1);
                ScheduleOutcome::Superseded {
                    cancelled: ticket,
                    scheduled,
                }
            }
            // A redraw already in progress runs to completion; the new
            // ticket takes over the slot and repaints after it.
            State::Idle | State::RedrawPending { started: true, .. } => ScheduleOutcome::Scheduled(self.issue()),
        }
    }

    /// Record overlay visibility.
    ///
    /// Hiding cancels a pending redraw that has not started and returns its
    /// ticket. A redraw already in progress is left alone.
    pub fn set_hidden(
        &mut self,
        hidden: bool,
    ) -> Option<RedrawTicket> {
        self.hidden = hidden;
        if !hidden {
            return None;
        }

        match self.state {
            State::RedrawPending { ticket, started: false } => {
                self.state = State::Idle;
                Some(ticket)
            }
            _ => None,
        }
    }

    /// Mark a redraw as started.
    ///
    /// Returns `false` (and counts a stale ticket) unless `ticket` is the
    /// current pending redraw, has not started, and the overlay is visible.
    pub fn start_redraw(
        &mut self,
        ticket: RedrawTicket,
    ) -> bool {
        match self.state {
            State::RedrawPending { ticket: current, started: false } if current == ticket && !self.hidden => {
                self.state = State::RedrawPending { ticket, started: true };
                self.painting = Some(ticket);
                self.stats.started = self.stats.started.wrapping_add(1);
                true
            }
            _ => {
                self.stats.stale = self.stats.stale.wrapping_add(1);
                false
            }
        }
    }

    /// Retire a redraw.
    ///
    /// A started redraw counts as completed even when a follow-up has taken
    /// its slot; the follow-up stays pending. Unknown tickets are ignored.
    pub fn finish_redraw(
        &mut self,
        ticket: RedrawTicket,
    ) {
        if self.painting == Some(ticket) {
            self.painting = None;
            self.stats.completed = self.stats.completed.wrapping_add(1);
        }

        if matches!(self.state, State::RedrawPending { ticket: current, .. } if current == ticket) {
            self.state = State::Idle;
        }
    }

    /// Ticket of the outstanding redraw, started or not.
    #[inline]
    pub const fn pending(&self) -> Option<RedrawTicket> {
        match self.state {
            State::Idle => None,
            State::RedrawPending { ticket, .. } => Some(ticket),
        }
    }

    #[inline]
    pub const fn is_idle(&self) -> bool { matches!(self.state, State::Idle) }

    #[inline]
    pub const fn is_hidden(&self) -> bool { self.hidden }

    #[inline]
    pub const fn stats(&self) -> SchedulerStats { self.stats }

    fn issue(&mut self) -> RedrawTicket {
        let ticket = RedrawTicket(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.state = State::RedrawPending { ticket, started: false };
        self.stats.scheduled = self.stats.scheduled.wrapping_add(1);
        ticket
    }
}

impl Default for UpdateScheduler {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================
