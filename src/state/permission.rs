//! Permission status and the two permission banners.

use crate::model::PermissionStatus;
use crate::state::transition::{Transition, TransitionPhase};
use std::time::Duration;

/// Current permission status plus the banners it drives.
///
/// The "limited" banner slides in when limited access is observed, the
/// "blocked" banner when access is denied or restricted. Full authorization
/// slides both out.
#[derive(Debug)]
pub struct PermissionState {
    status: PermissionStatus,
    limited_banner: Transition,
    blocked_banner: Transition,
}

impl PermissionState {
    pub fn new(banner_duration: Duration) -> Self {
        Self {
            status: PermissionStatus::NotDetermined,
            limited_banner: Transition::new(banner_duration, banner_duration),
            blocked_banner: Transition::new(banner_duration, banner_duration),
        }
    }

    /// Records a new status. Returns true if it differs from the previous one.
    pub fn apply(&mut self, status: PermissionStatus) -> bool {
        let changed = self.status != status;
        self.status = status;

        match status {
            PermissionStatus::Limited => {
                self.limited_banner.forward();
                self.blocked_banner.reverse();
            }
            PermissionStatus::Denied | PermissionStatus::Restricted => {
                self.blocked_banner.forward();
                self.limited_banner.reverse();
            }
            PermissionStatus::Authorized => {
                self.limited_banner.reverse();
                self.blocked_banner.reverse();
            }
            PermissionStatus::NotDetermined => {}
        }

        changed
    }

    /// Moves both banners along. Returns true if either reached an end.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let limited = self.limited_banner.advance(elapsed);
        let blocked = self.blocked_banner.advance(elapsed);
        let changed = limited.is_some() || blocked.is_some();
        limited.into_iter().chain(blocked).for_each(|c| c.run());
        changed
    }

    /// Snaps both banners to their targets. Returns true if either moved.
    pub fn finish(&mut self) -> bool {
        let limited = self.limited_banner.finish();
        let blocked = self.blocked_banner.finish();
        let changed = limited.is_some() || blocked.is_some();
        limited.into_iter().chain(blocked).for_each(|c| c.run());
        changed
    }

    pub fn status(&self) -> PermissionStatus {
        self.status
    }

    pub fn has_access(&self) -> bool {
        self.status.has_access()
    }

    pub fn limited_banner_visible(&self) -> bool {
        self.limited_banner.is_away_from_start()
    }

    pub fn blocked_banner_visible(&self) -> bool {
        self.blocked_banner.is_away_from_start()
    }

    pub fn limited_banner_phase(&self) -> TransitionPhase {
        self.limited_banner.phase()
    }

    pub fn blocked_banner_phase(&self) -> TransitionPhase {
        self.blocked_banner.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANNER: Duration = Duration::from_millis(300);

    #[test]
    fn limited_shows_only_the_limited_banner() {
        let mut state = PermissionState::new(BANNER);
        assert!(state.apply(PermissionStatus::Limited));
        state.finish();

        assert!(state.has_access());
        assert!(state.limited_banner_visible());
        assert!(!state.blocked_banner_visible());
    }

    #[test]
    fn authorized_hides_both_banners() {
        let mut state = PermissionState::new(BANNER);
        state.apply(PermissionStatus::Limited);
        state.finish();

        state.apply(PermissionStatus::Authorized);
        assert_eq!(state.limited_banner_phase(), TransitionPhase::Reverse);
        assert!(state.advance(BANNER));

        assert!(!state.limited_banner_visible());
        assert!(!state.blocked_banner_visible());
    }

    #[test]
    fn denied_and_restricted_show_the_blocked_banner() {
        for status in [PermissionStatus::Denied, PermissionStatus::Restricted] {
            let mut state = PermissionState::new(BANNER);
            state.apply(status);
            state.finish();
            assert!(!state.has_access());
            assert!(state.blocked_banner_visible());
            assert!(!state.limited_banner_visible());
        }
    }

    #[test]
    fn repeated_status_is_not_a_change() {
        let mut state = PermissionState::new(BANNER);
        assert!(state.apply(PermissionStatus::Authorized));
        assert!(!state.apply(PermissionStatus::Authorized));
        assert!(!state.limited_banner_visible());
    }
}
