//! Game clock and the single-slot queue of deferred phase transitions.
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::rules::RulesConfig;

/// Transition waiting for the clock to reach its due time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionKind {
    /// Apply the drawn event, refill energy, deal the day's cards.
    MorningResolution { event_id: String },
    /// Charge rent and stress, roll the day counter.
    SettlementResolution,
}

impl TransitionKind {
    /// Delay between the trigger and the resolution.
    #[must_use]
    pub const fn delay(&self, rules: &RulesConfig) -> Duration {
        match self {
            Self::MorningResolution { .. } => rules.start_day_delay(),
            Self::SettlementResolution => rules.sleep_delay(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub kind: TransitionKind,
    pub due_ms: u64,
}

/// Holds at most one task and the millisecond clock it is measured against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeferredQueue {
    now_ms: u64,
    task: Option<ScheduledTask>,
}

impl DeferredQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    #[must_use]
    pub const fn pending(&self) -> Option<&ScheduledTask> {
        self.task.as_ref()
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.task.is_none()
    }

    /// Queue `kind` to fire `delay` from now. Refuses when the slot is taken.
    pub fn schedule(&mut self, kind: TransitionKind, delay: Duration) -> bool {
        if self.task.is_some() {
            return false;
        }
        self.task = Some(ScheduledTask {
            kind,
            due_ms: self.now_ms.saturating_add(duration_ms(delay)),
        });
        true
    }

    /// Move the clock forward and hand back the task if it became due.
    pub fn advance(&mut self, elapsed: Duration) -> Option<ScheduledTask> {
        self.now_ms = self.now_ms.saturating_add(duration_ms(elapsed));
        if self.task.as_ref().is_some_and(|task| task.due_ms <= self.now_ms) {
            return self.task.take();
        }
        None
    }

    /// Jump the clock to the pending task's due time and hand it back.
    pub fn settle(&mut self) -> Option<ScheduledTask> {
        let task = self.task.take()?;
        self.now_ms = self.now_ms.max(task.due_ms);
        Some(task)
    }

    /// Drop any pending task. The clock keeps its value.
    pub fn clear(&mut self) {
        self.task = None;
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
