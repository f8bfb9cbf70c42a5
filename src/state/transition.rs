//! Forward/reverse transition state machine.
//!
//! Models an animated two-position switch (hidden/shown, inactive/active)
//! without a clock of its own: the animation layer reports elapsed time
//! through [`Transition::advance`] or snaps to the target with
//! [`Transition::finish`]. Actions registered for an edge are handed back
//! in a [`Completion`] when that edge is reached, so the caller can run them
//! after releasing whatever lock guards the transition.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

const PROGRESS_EPSILON: f64 = 1e-9;

/// Action run when a transition reaches one of its ends.
pub type CompletionAction = Arc<dyn Fn() + Send + Sync>;

/// Where the transition currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    AtStart,
    Forward,
    AtEnd,
    Reverse,
}

/// End reached by a running transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEdge {
    ReachedEnd,
    ReachedStart,
}

/// An edge that was just reached, with the actions registered for it.
#[must_use = "completion actions only fire when run"]
pub struct Completion {
    pub edge: TransitionEdge,
    actions: Vec<CompletionAction>,
}

impl Completion {
    /// Runs the registered actions in registration order.
    pub fn run(self) {
        for action in self.actions {
            action();
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("edge", &self.edge)
            .field("actions", &self.actions.len())
            .finish()
    }
}

pub struct Transition {
    phase: TransitionPhase,
    /// 0.0 at the start position, 1.0 at the end position.
    progress: f64,
    forward_duration: Duration,
    reverse_duration: Duration,
    on_reached_end: Vec<CompletionAction>,
    on_reached_start: Vec<CompletionAction>,
}

impl Transition {
    /// Creates a transition resting at its start position.
    pub fn new(forward_duration: Duration, reverse_duration: Duration) -> Self {
        Self {
            phase: TransitionPhase::AtStart,
            progress: 0.0,
            forward_duration,
            reverse_duration,
            on_reached_end: Vec::new(),
            on_reached_start: Vec::new(),
        }
    }

    /// Creates a transition that starts out resting at its end position.
    ///
    /// No edge is reported for this initial placement.
    pub fn at_end(forward_duration: Duration, reverse_duration: Duration) -> Self {
        Self {
            phase: TransitionPhase::AtEnd,
            progress: 1.0,
            ..Self::new(forward_duration, reverse_duration)
        }
    }

    /// Registers an action for every completed forward run.
    pub fn on_reached_end(&mut self, action: CompletionAction) {
        self.on_reached_end.push(action);
    }

    /// Registers an action for every completed reverse run.
    pub fn on_reached_start(&mut self, action: CompletionAction) {
        self.on_reached_start.push(action);
    }

    /// Starts (or turns around into) the forward run. Returns false if the
    /// transition is already heading to or resting at the end.
    pub fn forward(&mut self) -> bool {
        match self.phase {
            TransitionPhase::AtStart | TransitionPhase::Reverse => {
                self.phase = TransitionPhase::Forward;
                true
            }
            TransitionPhase::Forward | TransitionPhase::AtEnd => false,
        }
    }

    /// Starts (or turns around into) the reverse run. Returns false if the
    /// transition is already heading to or resting at the start.
    pub fn reverse(&mut self) -> bool {
        match self.phase {
            TransitionPhase::AtEnd | TransitionPhase::Forward => {
                self.phase = TransitionPhase::Reverse;
                true
            }
            TransitionPhase::Reverse | TransitionPhase::AtStart => false,
        }
    }

    /// Moves a running transition along by `elapsed`.
    pub fn advance(&mut self, elapsed: Duration) -> Option<Completion> {
        match self.phase {
            TransitionPhase::Forward => {
                self.progress += Self::fraction(elapsed, self.forward_duration);
                if self.progress >= 1.0 - PROGRESS_EPSILON {
                    return Some(self.complete(TransitionEdge::ReachedEnd));
                }
                None
            }
            TransitionPhase::Reverse => {
                self.progress -= Self::fraction(elapsed, self.reverse_duration);
                if self.progress <= PROGRESS_EPSILON {
                    return Some(self.complete(TransitionEdge::ReachedStart));
                }
                None
            }
            TransitionPhase::AtStart | TransitionPhase::AtEnd => None,
        }
    }

    /// Completes a running transition immediately.
    pub fn finish(&mut self) -> Option<Completion> {
        match self.phase {
            TransitionPhase::Forward => Some(self.complete(TransitionEdge::ReachedEnd)),
            TransitionPhase::Reverse => Some(self.complete(TransitionEdge::ReachedStart)),
            TransitionPhase::AtStart | TransitionPhase::AtEnd => None,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Position between start (0.0) and end (1.0).
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// True anywhere except resting at the start position.
    pub fn is_away_from_start(&self) -> bool {
        self.phase != TransitionPhase::AtStart
    }

    fn fraction(elapsed: Duration, duration: Duration) -> f64 {
        if duration.is_zero() {
            return 1.0;
        }
        elapsed.as_secs_f64() / duration.as_secs_f64()
    }

    fn complete(&mut self, edge: TransitionEdge) -> Completion {
        let actions = match edge {
            TransitionEdge::ReachedEnd => {
                self.phase = TransitionPhase::AtEnd;
                self.progress = 1.0;
                self.on_reached_end.clone()
            }
            TransitionEdge::ReachedStart => {
                self.phase = TransitionPhase::AtStart;
                self.progress = 0.0;
                self.on_reached_start.clone()
            }
        };
        Completion { edge, actions }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("phase", &self.phase)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}
