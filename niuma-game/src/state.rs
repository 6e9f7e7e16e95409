//! Game state snapshot and the phase of the day cycle.
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::action::Action;
use crate::content::{Card, Messages};
use crate::delta::ResourceDelta;
use crate::engine::{DefeatCause, DeltaOutcome, apply_delta};
use crate::journal::{Journal, LogTone};
use crate::resources::{ResourceKind, Resources};
use crate::rng::RandomSource;
use crate::rules::RulesConfig;
use crate::schedule::TransitionKind;

/// Stage of the day cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Morning,
    Work,
    Night,
    Settlement,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Work => "work",
            Self::Night => "night",
            Self::Settlement => "settlement",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defeat {
    pub cause: DefeatCause,
    pub reason: String,
}

/// Complete state of one run. Transitions clone it and return the successor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub day: u32,
    pub phase: Phase,
    pub resources: Resources,
    pub talent_path: Option<String>,
    pub journal: Journal,
    pub defeat: Option<Defeat>,
    pub current_hand: Vec<Card>,
    pub night_actions: Vec<Card>,
    /// False until the first `StartDay`.
    pub started: bool,
    pub pending: Option<TransitionKind>,
}

impl GameState {
    /// Fresh run on day 1 with the welcome entry logged.
    #[must_use]
    pub fn new(rules: &RulesConfig, messages: &Messages, now_ms: u64) -> Self {
        let mut journal = Journal::with_capacity(rules.log_capacity);
        journal.push(messages.welcome.as_str(), LogTone::System, now_ms);
        Self {
            day: 1,
            phase: Phase::Morning,
            resources: rules.initial.to_resources(),
            talent_path: None,
            journal,
            defeat: None,
            current_hand: Vec::new(),
            night_actions: Vec::new(),
            started: false,
            pending: None,
        }
    }

    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.defeat.is_some()
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// First resource the card cannot pay for, with `(need, have)`.
    #[must_use]
    pub fn shortfall(&self, card: &Card) -> Option<(ResourceKind, i32, i32)> {
        card.cost.iter().find_map(|(kind, amount)| {
            let need = i32::try_from(*amount).unwrap_or(i32::MAX);
            let have = self.resources.get(*kind);
            (have < need).then_some((*kind, need, have))
        })
    }

    /// Whether every cost of `card` is covered right now.
    #[must_use]
    pub fn can_afford(&self, card: &Card) -> bool {
        self.shortfall(card).is_none()
    }

    /// Card pool the current phase plays from, if any.
    #[must_use]
    pub fn active_pool(&self) -> Option<&[Card]> {
        match self.phase {
            Phase::Work => Some(&self.current_hand),
            Phase::Night => Some(&self.night_actions),
            Phase::Morning | Phase::Settlement => None,
        }
    }

    /// Progress actions legal right now, affordable cards included.
    ///
    /// `ResetGame` is always legal and is not listed. Talent choice needs the
    /// content tables and is not listed either.
    #[must_use]
    pub fn available_actions(&self) -> Vec<Action> {
        if self.is_defeated() || self.is_pending() {
            return Vec::new();
        }
        let mut actions: Vec<Action> = self
            .active_pool()
            .unwrap_or_default()
            .iter()
            .filter(|card| self.can_afford(card))
            .map(|card| Action::play(card.id.as_str()))
            .collect();
        match self.phase {
            Phase::Morning => actions.push(Action::StartDay),
            Phase::Work => actions.push(Action::EndWork),
            Phase::Night => actions.push(Action::GoToSleep),
            Phase::Settlement => {}
        }
        actions
    }

    /// Push a delta through the resource engine and record a first defeat.
    ///
    /// An existing defeat is never replaced.
    pub(crate) fn apply_delta(
        &mut self,
        delta: &ResourceDelta,
        rng: &mut dyn RandomSource,
        messages: &Messages,
        now_ms: u64,
    ) -> DeltaOutcome {
        let outcome = apply_delta(&self.resources, delta, rng);
        self.resources = outcome.resources;
        if let Some(cause) = outcome.defeat
            && self.defeat.is_none()
        {
            let reason = messages.defeat.reason(cause).to_string();
            info!("run ended on day {} ({cause})", self.day);
            self.journal.push(reason.as_str(), LogTone::Neg, now_ms);
            self.defeat = Some(Defeat { cause, reason });
        }
        outcome
    }

    pub(crate) fn log(&mut self, text: impl Into<String>, tone: LogTone, now_ms: u64) {
        self.journal.push(text, tone, now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentTables;
    use crate::rng::ScriptedRandom;

    fn fresh() -> (GameState, ContentTables) {
        let content = ContentTables::embedded().unwrap();
        let state = GameState::new(&RulesConfig::default(), &content.messages, 0);
        (state, content)
    }

    #[test]
    fn initial_state_matches_rules() {
        let (state, content) = fresh();
        assert_eq!(state.day, 1);
        assert_eq!(state.phase, Phase::Morning);
        assert!(!state.started);
        assert_eq!(state.resources.get(ResourceKind::Money), 1_000);
        assert_eq!(state.resources.get(ResourceKind::Energy), 3);
        assert_eq!(state.journal.len(), 1);
        assert_eq!(
            state.journal.latest().map(|entry| entry.text.as_str()),
            Some(content.messages.welcome.as_str())
        );
        assert_eq!(state.available_actions(), vec![Action::StartDay]);
    }

    #[test]
    fn affordability_is_all_or_nothing() {
        let (mut state, content) = fresh();
        let allnighter = content
            .cards
            .iter()
            .find(|card| card.id == "allnighter")
            .unwrap();
        assert!(state.can_afford(allnighter));
        state.resources = Resources::new(1_000, 10, 75, 20, 3, 20, 50);
        assert!(!state.can_afford(allnighter));
        assert_eq!(
            state.shortfall(allnighter),
            Some((ResourceKind::Health, 15, 10))
        );
    }

    #[test]
    fn defeat_is_recorded_once() {
        let (mut state, content) = fresh();
        let mut rng = ScriptedRandom::new();
        let drain = ResourceDelta::new().with(ResourceKind::Kpi, -50);
        state.apply_delta(&drain, &mut rng, &content.messages, 10);
        let first = state.defeat.clone().unwrap();
        assert_eq!(first.cause, DefeatCause::Fired);
        assert_eq!(first.reason, content.messages.defeat.fired);

        let broke = ResourceDelta::new().with(ResourceKind::Money, -5_000);
        state.apply_delta(&broke, &mut rng, &content.messages, 20);
        assert_eq!(state.defeat, Some(first));
        assert_eq!(state.journal.len(), 2);
        assert_eq!(state.journal.latest().map(|e| e.tone), Some(LogTone::Neg));
    }

    #[test]
    fn work_phase_lists_affordable_cards_and_end_work() {
        let (mut state, content) = fresh();
        state.phase = Phase::Work;
        state.current_hand = content.cards[..3].to_vec();
        state.resources = Resources::new(1_000, 10, 75, 20, 3, 20, 50);
        let actions = state.available_actions();
        assert!(actions.contains(&Action::play("huleng")));
        assert!(!actions.contains(&Action::play("allnighter")));
        assert_eq!(actions.last(), Some(&Action::EndWork));

        state.pending = Some(TransitionKind::SettlementResolution);
        assert!(state.available_actions().is_empty());
    }
}
