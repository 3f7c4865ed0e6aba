use std::time::Duration;

/// Whether the tick loop is allowed to arm the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Stopped,
}

/// Adaptive frame scheduler.
///
/// While `Running`, each tick is followed by a delay computed from the
/// post-tick score; the delay shrinks as the score grows, so the game speeds
/// up. Death moves the scheduler to `Stopped`, which simply means the tick
/// timer is never rearmed; only a restart resumes it.
pub struct FrameScheduler {
    state: SchedulerState,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn stop(&mut self) {
        self.state = SchedulerState::Stopped;
    }

    pub fn resume(&mut self) {
        self.state = SchedulerState::Running;
    }

    /// Delay before the next tick: `ln(100 / (score + 1)) * 20` milliseconds.
    /// From score 99 on the logarithm is non-positive, which means "schedule
    /// as soon as possible"; a negative duration is never produced.
    pub fn delay_after(score: u32) -> Duration {
        let millis = (100.0 / (f64::from(score) + 1.0)).ln() * 20.0;
        if millis <= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(millis / 1000.0)
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}
