use bevy::prelude::*;
use std::time::Duration;

use crate::constants::RECENTER_DELAY_SECS;

/// Pending delayed recentres, one per authorization grant
#[derive(Resource, Debug, Default)]
pub struct RecenterSchedule {
    pending: Vec<Timer>,
}

impl RecenterSchedule {
    pub fn schedule(&mut self) {
        self.pending
            .push(Timer::from_seconds(RECENTER_DELAY_SECS, TimerMode::Once));
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn cancel(&mut self) {
        self.pending.clear();
    }

    /// Advance every timer and return how many came due
    pub fn tick(&mut self, delta: Duration) -> usize {
        let before = self.pending.len();
        self.pending.retain_mut(|timer| !timer.tick(delta).just_finished());
        before - self.pending.len()
    }
}
