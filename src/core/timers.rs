//! Scheduled tasks - start/stop wrappers over host timer registration

use std::time::Duration;

use tracing::debug;

use super::traits::{TimerHost, TimerKind};

/// One periodic callback with an explicit running flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    kind: TimerKind,
    interval: Duration,
    running: bool,
}

impl ScheduledTask {
    pub fn new(kind: TimerKind, interval: Duration) -> Self {
        Self {
            kind,
            interval,
            running: false,
        }
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Register with the host; restarting an already running task is a no-op
    pub fn start<T: TimerHost + ?Sized>(&mut self, timers: &T) {
        if self.running {
            return;
        }
        debug!(timer = ?self.kind, interval_ms = self.interval.as_millis() as u64, "[timer] Start");
        timers.register_timer(self.kind, self.interval);
        self.running = true;
    }

    /// Unregister from the host
    ///
    /// Always unregisters, so a host-side leftover from a previous load is
    /// cleared as well.
    pub fn stop<T: TimerHost + ?Sized>(&mut self, timers: &T) {
        if self.running {
            debug!(timer = ?self.kind, "[timer] Stop");
        }
        timers.unregister_timer(self.kind);
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::mocks::{MockTimers, TimerCall};

    #[test]
    fn test_start_registers_once() {
        let timers = MockTimers::new();
        let mut task = ScheduledTask::new(TimerKind::Slow, Duration::from_secs(5));
        task.start(&timers);
        task.start(&timers);
        assert!(task.is_running());
        assert_eq!(
            *timers.calls.borrow(),
            vec![TimerCall::Register(TimerKind::Slow, Duration::from_secs(5))]
        );
    }

    #[test]
    fn test_stop_unregisters() {
        let timers = MockTimers::new();
        let mut task = ScheduledTask::new(TimerKind::Fast, Duration::from_millis(41));
        task.start(&timers);
        task.stop(&timers);
        assert!(!task.is_running());
        assert!(!timers.is_active(TimerKind::Fast));
    }

    #[test]
    fn test_stop_when_not_running_still_unregisters() {
        let timers = MockTimers::new();
        let mut task = ScheduledTask::new(TimerKind::Fast, Duration::from_millis(41));
        task.stop(&timers);
        assert_eq!(
            *timers.calls.borrow(),
            vec![TimerCall::Unregister(TimerKind::Fast)]
        );
    }
}
