//! Update gating for the animation loop.
//!
//! The display side calls [`AnimationScheduler::on_refresh`] once per
//! refresh with a monotonic timestamp. An update cycle is started only when
//! the scheduler is idle and at least the minimum interval has passed since
//! the previous cycle began. Cycles never overlap and are never queued.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the next refresh
    Idle,
    /// A poll+render cycle is in progress
    Rendering,
    /// No further cycles will start
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    /// Start a poll+render cycle now, then call `complete`
    Update,
    /// Nothing to do on this refresh
    Wait,
    /// The loop should exit
    Stop,
}

pub struct AnimationScheduler {
    min_interval: Duration,
    state: SchedulerState,
    last_update: Option<Duration>,
    cycles: u64,
}

impl AnimationScheduler {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            state: SchedulerState::Idle,
            last_update: None,
            cycles: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Number of cycles started so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Handle a display refresh at time `now`
    pub fn on_refresh(&mut self, now: Duration) -> RefreshDecision {
        match self.state {
            SchedulerState::Stopped => RefreshDecision::Stop,
            SchedulerState::Rendering => RefreshDecision::Wait,
            SchedulerState::Idle => {
                let due = self
                    .last_update
                    .map_or(true, |last| now.saturating_sub(last) >= self.min_interval);

                if due {
                    self.state = SchedulerState::Rendering;
                    self.last_update = Some(now);
                    self.cycles += 1;
                    RefreshDecision::Update
                } else {
                    RefreshDecision::Wait
                }
            }
        }
    }

    /// Finish the running cycle at time `now`, returning how long it took
    pub fn complete(&mut self, now: Duration) -> Duration {
        if self.state == SchedulerState::Rendering {
            self.state = SchedulerState::Idle;
        }
        self.last_update
            .map_or(Duration::ZERO, |started| now.saturating_sub(started))
    }

    /// Prevent any further cycle from starting
    pub fn stop(&mut self) {
        self.state = SchedulerState::Stopped;
    }

    pub fn is_stopped(&self) -> bool {
        self.state == SchedulerState::Stopped
    }
}
