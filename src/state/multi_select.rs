//! Multi-select mode with animated entry and exit.

use crate::state::transition::{Completion, CompletionAction, Transition, TransitionPhase};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Observable phase of multi-select mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultiSelectPhase {
    Inactive,
    Activating,
    Active,
    Deactivating,
}

/// Multi-select mode.
///
/// The exit action (clearing the selection) is attached to the completion
/// of the reverse run, so an in-flight selection stays visible while the
/// mode animates out.
#[derive(Debug)]
pub struct MultiSelectMode {
    transition: Transition,
}

impl MultiSelectMode {
    /// Creates the mode resting in `Active` when `initially_active`, else in
    /// `Inactive`. `on_deactivated` runs each time a deactivation completes.
    pub fn new(
        initially_active: bool,
        enter: Duration,
        exit: Duration,
        on_deactivated: CompletionAction,
    ) -> Self {
        let mut transition = if initially_active {
            Transition::at_end(enter, exit)
        } else {
            Transition::new(enter, exit)
        };
        transition.on_reached_start(on_deactivated);
        Self { transition }
    }

    /// Inactive/Deactivating -> Activating. Returns false if already
    /// activating or active.
    pub fn activate(&mut self) -> bool {
        self.transition.forward()
    }

    /// Active/Activating -> Deactivating. The selection is not touched yet.
    pub fn deactivate(&mut self) -> bool {
        self.transition.reverse()
    }

    pub fn advance(&mut self, elapsed: Duration) -> Option<Completion> {
        self.transition.advance(elapsed)
    }

    pub fn finish(&mut self) -> Option<Completion> {
        self.transition.finish()
    }

    pub fn phase(&self) -> MultiSelectPhase {
        match self.transition.phase() {
            TransitionPhase::AtStart => MultiSelectPhase::Inactive,
            TransitionPhase::Forward => MultiSelectPhase::Activating,
            TransitionPhase::AtEnd => MultiSelectPhase::Active,
            TransitionPhase::Reverse => MultiSelectPhase::Deactivating,
        }
    }

    /// Whether taps toggle items rather than completing the picker.
    pub fn accepts_toggles(&self) -> bool {
        matches!(
            self.phase(),
            MultiSelectPhase::Activating | MultiSelectPhase::Active
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ENTER: Duration = Duration::from_millis(250);
    const EXIT: Duration = Duration::from_millis(200);

    fn mode(initially_active: bool) -> (MultiSelectMode, Arc<AtomicUsize>) {
        let cleared = Arc::new(AtomicUsize::new(0));
        let counter = cleared.clone();
        let mode = MultiSelectMode::new(
            initially_active,
            ENTER,
            EXIT,
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (mode, cleared)
    }

    #[test]
    fn starts_active_with_prior_selection() {
        let (mode, _) = mode(true);
        assert_eq!(mode.phase(), MultiSelectPhase::Active);
    }

    #[test]
    fn starts_inactive_without_prior_selection() {
        let (mode, _) = mode(false);
        assert_eq!(mode.phase(), MultiSelectPhase::Inactive);
        assert!(!mode.accepts_toggles());
    }

    #[test]
    fn exit_action_waits_for_reverse_completion() {
        let (mut mode, cleared) = mode(true);
        assert!(mode.deactivate());
        assert_eq!(mode.phase(), MultiSelectPhase::Deactivating);
        assert_eq!(cleared.load(Ordering::SeqCst), 0);

        assert!(mode.advance(Duration::from_millis(100)).is_none());
        assert_eq!(cleared.load(Ordering::SeqCst), 0);

        mode.advance(Duration::from_millis(100)).unwrap().run();
        assert_eq!(mode.phase(), MultiSelectPhase::Inactive);
        assert_eq!(cleared.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reactivating_mid_exit_cancels_the_clear() {
        let (mut mode, cleared) = mode(true);
        mode.deactivate();
        let _ = mode.advance(Duration::from_millis(50));
        assert!(mode.activate());
        mode.finish().unwrap().run();

        assert_eq!(mode.phase(), MultiSelectPhase::Active);
        assert_eq!(cleared.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn activation_completes_without_clearing() {
        let (mut mode, cleared) = mode(false);
        assert!(mode.activate());
        assert!(mode.accepts_toggles());
        mode.advance(ENTER).unwrap().run();
        assert_eq!(mode.phase(), MultiSelectPhase::Active);
        assert_eq!(cleared.load(Ordering::SeqCst), 0);
    }
}
