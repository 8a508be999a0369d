//! Slide navigation state machine.
//!
//! Two phases: `Idle` and `Transitioning`. A committed move locks the
//! controller and arms a [`PendingSettle`]; the host feeds its monotonic clock
//! into [`NavigationController::tick`] and the settle fires once the fixed
//! transition duration has elapsed. Requests that arrive while locked are
//! dropped, not queued.

use tracing::debug;

pub const DEFAULT_TRANSITION_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning,
}

/// Observable navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub current_index: usize,
    pub direction: Direction,
    pub locked: bool,
}

/// The scheduled unlock for the move in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSettle {
    pub id: u64,
    pub due_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Locked,
    AtFirstSlide,
    AtLastSlide,
    OutOfRange,
    AlreadyShowing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Committed {
        from: usize,
        to: usize,
        direction: Direction,
        settle: PendingSettle,
    },
    Rejected(Rejection),
}

impl NavOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, NavOutcome::Committed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavInput {
    Next,
    Previous,
    JumpTo(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Keyboard,
    Pointer,
}

#[derive(Debug, Clone)]
pub struct NavigationController {
    slide_count: usize,
    current_index: usize,
    direction: Direction,
    transition_ms: u64,
    pending: Option<PendingSettle>,
    // Last transition start, kept for progress reporting.
    started_ms: u64,
    next_settle_id: u64,
}

impl NavigationController {
    /// A controller over `slide_count` slides (at least one), showing slide 0.
    pub fn new(slide_count: usize, transition_ms: u64) -> Self {
        Self {
            slide_count: slide_count.max(1),
            current_index: 0,
            direction: Direction::Forward,
            transition_ms,
            pending: None,
            started_ms: 0,
            next_settle_id: 0,
        }
    }

    pub fn state(&self) -> NavigationState {
        NavigationState {
            current_index: self.current_index,
            direction: self.direction,
            locked: self.is_locked(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::Transitioning
        } else {
            Phase::Idle
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_locked(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_settle(&self) -> Option<PendingSettle> {
        self.pending
    }

    pub fn transition_ms(&self) -> u64 {
        self.transition_ms
    }

    /// Whether the "previous" control should be enabled.
    pub fn can_go_previous(&self) -> bool {
        self.current_index > 0
    }

    /// Whether the "next" control should be enabled.
    pub fn can_go_next(&self) -> bool {
        self.current_index + 1 < self.slide_count
    }

    pub fn go_next(&mut self, now_ms: u64) -> NavOutcome {
        if self.is_locked() {
            return self.reject(Rejection::Locked);
        }
        if !self.can_go_next() {
            return self.reject(Rejection::AtLastSlide);
        }
        self.commit(self.current_index + 1, Direction::Forward, now_ms)
    }

    pub fn go_previous(&mut self, now_ms: u64) -> NavOutcome {
        if self.is_locked() {
            return self.reject(Rejection::Locked);
        }
        if !self.can_go_previous() {
            return self.reject(Rejection::AtFirstSlide);
        }
        self.commit(self.current_index - 1, Direction::Backward, now_ms)
    }

    pub fn go_to_index(&mut self, index: usize, now_ms: u64) -> NavOutcome {
        if self.is_locked() {
            return self.reject(Rejection::Locked);
        }
        if index >= self.slide_count {
            return self.reject(Rejection::OutOfRange);
        }
        if index == self.current_index {
            return self.reject(Rejection::AlreadyShowing);
        }
        let direction = if index > self.current_index {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.commit(index, direction, now_ms)
    }

    /// Route keyboard and pointer input through the same guard.
    pub fn dispatch(&mut self, input: NavInput, source: InputSource, now_ms: u64) -> NavOutcome {
        debug!(?input, ?source, now_ms, "nav: input");
        match input {
            NavInput::Next => self.go_next(now_ms),
            NavInput::Previous => self.go_previous(now_ms),
            NavInput::JumpTo(index) => self.go_to_index(index, now_ms),
        }
    }

    /// Fire the pending settle if it is due. Returns true when it fired.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.pending {
            Some(p) if now_ms >= p.due_ms => {
                self.pending = None;
                debug!(settle_id = p.id, index = self.current_index, "nav: settled");
                true
            }
            _ => false,
        }
    }

    /// Progress of the transition in flight, 0.0..=1.0; 1.0 when idle.
    pub fn transition_progress(&self, now_ms: u64) -> f64 {
        if self.pending.is_none() || self.transition_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.started_ms) as f64;
        (elapsed / self.transition_ms as f64).clamp(0.0, 1.0)
    }

    fn commit(&mut self, to: usize, direction: Direction, now_ms: u64) -> NavOutcome {
        let from = self.current_index;
        self.next_settle_id += 1;
        let settle = PendingSettle {
            id: self.next_settle_id,
            due_ms: now_ms.saturating_add(self.transition_ms),
        };
        self.current_index = to;
        self.direction = direction;
        self.pending = Some(settle);
        self.started_ms = now_ms;
        debug!(from, to, ?direction, due_ms = settle.due_ms, "nav: committed");
        NavOutcome::Committed {
            from,
            to,
            direction,
            settle,
        }
    }

    fn reject(&self, reason: Rejection) -> NavOutcome {
        debug!(?reason, index = self.current_index, "nav: rejected");
        NavOutcome::Rejected(reason)
    }
}
