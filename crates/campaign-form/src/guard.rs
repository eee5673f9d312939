//! Submission cooldown and inactivity expiry.
//!
//! The cooldown is a plain timestamp comparison. The session expiry is a
//! single scheduled callback owned by the guard through [`ExpiryTimer`]; it is
//! replaced on every activity signal and cancelled when the guard drops.

use std::time::Duration;

use crate::clock::Millis;

pub const DEFAULT_SUBMISSION_COOLDOWN: Duration = Duration::from_secs(30);
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(300);

/// Host-provided one-shot timer.
///
/// `arm` replaces any pending expiry; at most one is ever outstanding. When it
/// fires the host calls `FormController::handle_session_expiry`.
pub trait ExpiryTimer {
    fn arm(&mut self, delay: Duration);
    fn cancel(&mut self);
}

/// Timer for hosts that never expire sessions (CLI runs, disabled option).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopExpiryTimer;

impl ExpiryTimer for NoopExpiryTimer {
    fn arm(&mut self, _delay: Duration) {}

    fn cancel(&mut self) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardClock {
    pub last_submission_at: Option<Millis>,
    pub session_deadline: Option<Millis>,
}

/// False iff a previous attempt started less than `cooldown` ago.
#[must_use]
pub fn can_submit_now(last_submission_at: Option<Millis>, now: Millis, cooldown: Duration) -> bool {
    match last_submission_at {
        Some(last) => now.saturating_sub(last) >= duration_millis(cooldown),
        None => true,
    }
}

#[must_use]
pub fn schedule_session_expiry(now: Millis, timeout: Duration) -> Millis {
    now.saturating_add(duration_millis(timeout))
}

fn duration_millis(duration: Duration) -> Millis {
    Millis::try_from(duration.as_millis()).unwrap_or(Millis::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardSettings {
    pub cooldown_enabled: bool,
    pub cooldown: Duration,
    pub session_timeout_enabled: bool,
    pub session_timeout: Duration,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            cooldown_enabled: true,
            cooldown: DEFAULT_SUBMISSION_COOLDOWN,
            session_timeout_enabled: true,
            session_timeout: DEFAULT_SESSION_TIMEOUT,
        }
    }
}

pub struct SubmissionGuard {
    settings: GuardSettings,
    clock: GuardClock,
    timer: Box<dyn ExpiryTimer>,
}

impl SubmissionGuard {
    pub fn new(settings: GuardSettings, timer: Box<dyn ExpiryTimer>) -> Self {
        Self {
            settings,
            clock: GuardClock::default(),
            timer,
        }
    }

    #[must_use]
    pub fn clock(&self) -> GuardClock {
        self.clock
    }

    #[must_use]
    pub fn settings(&self) -> GuardSettings {
        self.settings
    }

    #[must_use]
    pub fn allows_submission(&self, now: Millis) -> bool {
        !self.settings.cooldown_enabled
            || can_submit_now(self.clock.last_submission_at, now, self.settings.cooldown)
    }

    pub fn record_submission(&mut self, now: Millis) {
        self.clock.last_submission_at = Some(now);
    }

    /// Pushes the expiry out to `now + timeout`, replacing the pending one.
    pub fn record_activity(&mut self, now: Millis) -> Option<Millis> {
        if !self.settings.session_timeout_enabled {
            return None;
        }
        let deadline = schedule_session_expiry(now, self.settings.session_timeout);
        self.clock.session_deadline = Some(deadline);
        self.timer.arm(self.settings.session_timeout);
        Some(deadline)
    }

    /// Consumes the deadline when it has been reached. A firing that lands
    /// before the wall-clock deadline re-arms the timer for the remainder, so
    /// a pending deadline always has a timer behind it. Firings with no
    /// deadline return false.
    pub fn take_expiry(&mut self, now: Millis) -> bool {
        match self.clock.session_deadline {
            Some(deadline) if now >= deadline => {
                self.clock.session_deadline = None;
                true
            }
            Some(deadline) => {
                self.timer.arm(Duration::from_millis(deadline - now));
                false
            }
            None => false,
        }
    }

    pub fn release(&mut self) {
        self.clock.session_deadline = None;
        self.timer.cancel();
    }
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        self.timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TimerCall {
        Arm(Duration),
        Cancel,
    }

    #[derive(Clone, Default)]
    struct RecordingTimer {
        calls: Rc<RefCell<Vec<TimerCall>>>,
    }

    impl ExpiryTimer for RecordingTimer {
        fn arm(&mut self, delay: Duration) {
            self.calls.borrow_mut().push(TimerCall::Arm(delay));
        }

        fn cancel(&mut self) {
            self.calls.borrow_mut().push(TimerCall::Cancel);
        }
    }

    #[test]
    fn cooldown_boundary_is_inclusive() {
        let t = 1_000_000;
        assert!(can_submit_now(None, t, DEFAULT_SUBMISSION_COOLDOWN));
        assert!(!can_submit_now(Some(t), t + 29_999, DEFAULT_SUBMISSION_COOLDOWN));
        assert!(can_submit_now(Some(t), t + 30_000, DEFAULT_SUBMISSION_COOLDOWN));
    }

    #[test]
    fn clock_going_backwards_keeps_cooldown_closed() {
        let t = 1_000_000;
        assert!(!can_submit_now(Some(t), t - 5, DEFAULT_SUBMISSION_COOLDOWN));
    }

    #[test]
    fn activity_debounces_instead_of_accumulating() {
        let timer = RecordingTimer::default();
        let mut guard = SubmissionGuard::new(GuardSettings::default(), Box::new(timer.clone()));
        let t0 = 50_000;

        assert_eq!(guard.record_activity(t0), Some(t0 + 300_000));
        assert_eq!(guard.record_activity(t0 + 100_000), Some(t0 + 400_000));
        assert_eq!(guard.clock().session_deadline, Some(t0 + 400_000));
        assert_eq!(
            *timer.calls.borrow(),
            vec![
                TimerCall::Arm(DEFAULT_SESSION_TIMEOUT),
                TimerCall::Arm(DEFAULT_SESSION_TIMEOUT)
            ]
        );
    }

    #[test]
    fn expiry_only_fires_once_the_deadline_is_reached() {
        let mut guard = SubmissionGuard::new(GuardSettings::default(), Box::new(NoopExpiryTimer));
        guard.record_activity(0);
        assert!(!guard.take_expiry(299_999));
        assert!(guard.take_expiry(300_000));
        assert!(!guard.take_expiry(300_001));
    }

    #[test]
    fn early_firing_rearms_for_the_remaining_time() {
        let timer = RecordingTimer::default();
        let mut guard = SubmissionGuard::new(GuardSettings::default(), Box::new(timer.clone()));
        guard.record_activity(1_000);

        assert!(!guard.take_expiry(300_999));
        assert_eq!(guard.clock().session_deadline, Some(301_000));
        assert_eq!(
            *timer.calls.borrow(),
            vec![
                TimerCall::Arm(DEFAULT_SESSION_TIMEOUT),
                TimerCall::Arm(Duration::from_millis(1))
            ]
        );

        assert!(guard.take_expiry(301_000));
        assert!(!guard.take_expiry(301_001));
        assert_eq!(timer.calls.borrow().len(), 2);
    }

    #[test]
    fn disabled_session_timeout_never_arms() {
        let timer = RecordingTimer::default();
        let settings = GuardSettings {
            session_timeout_enabled: false,
            ..GuardSettings::default()
        };
        let mut guard = SubmissionGuard::new(settings, Box::new(timer.clone()));
        assert_eq!(guard.record_activity(10), None);
        assert!(!guard.take_expiry(u64::MAX));
        assert!(timer.calls.borrow().is_empty());
    }

    #[test]
    fn disabled_cooldown_always_allows() {
        let settings = GuardSettings {
            cooldown_enabled: false,
            ..GuardSettings::default()
        };
        let mut guard = SubmissionGuard::new(settings, Box::new(NoopExpiryTimer));
        guard.record_submission(1_000);
        assert!(guard.allows_submission(1_001));
    }

    #[test]
    fn dropping_the_guard_cancels_the_pending_timer() {
        let timer = RecordingTimer::default();
        let calls = Rc::clone(&timer.calls);
        {
            let mut guard =
                SubmissionGuard::new(GuardSettings::default(), Box::new(timer));
            guard.record_activity(0);
        }
        assert_eq!(calls.borrow().last(), Some(&TimerCall::Cancel));
    }
}
