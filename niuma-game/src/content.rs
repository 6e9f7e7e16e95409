//! Static content tables: cards, events, talents, and narrative text.
//!
//! The shipped tables are compiled in from `assets/content.json`; callers may
//! supply their own JSON with the same shape.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::delta::{DeltaValue, ResourceDelta};
use crate::engine::DefeatCause;
use crate::journal::LogTone;
use crate::resources::ResourceKind;

const EMBEDDED_CONTENT: &str = include_str!("../assets/content.json");

/// A playable card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub desc: String,
    /// Amount subtracted per resource; only listed resources are charged.
    #[serde(default)]
    pub cost: BTreeMap<ResourceKind, u32>,
    #[serde(default)]
    pub gain: BTreeMap<ResourceKind, DeltaValue>,
}

impl Card {
    /// Negated costs merged with the gains, one entry per resource.
    ///
    /// A gain on a resource the card also charges replaces the charge, so a
    /// stake paid back as a prize is never debited twice.
    #[must_use]
    pub fn combined_delta(&self) -> ResourceDelta {
        let mut merged: BTreeMap<ResourceKind, DeltaValue> = self
            .cost
            .iter()
            .map(|(kind, amount)| {
                let charge = i32::try_from(*amount).unwrap_or(i32::MAX);
                (*kind, DeltaValue::Fixed(-charge))
            })
            .collect();
        merged.extend(self.gain.iter().map(|(kind, value)| (*kind, *value)));
        merged.into_iter().collect()
    }

    #[must_use]
    pub fn gain_delta(&self) -> ResourceDelta {
        self.gain.iter().map(|(kind, value)| (*kind, *value)).collect()
    }

    /// Cost on a single resource, 0 if the card does not charge it.
    #[must_use]
    pub fn cost_of(&self, kind: ResourceKind) -> u32 {
        self.cost.get(&kind).copied().unwrap_or(0)
    }
}

/// Tone classification for events, mirrored into the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventTone {
    Pos,
    Neg,
    Neutral,
}

impl From<EventTone> for LogTone {
    fn from(tone: EventTone) -> Self {
        match tone {
            EventTone::Pos => Self::Pos,
            EventTone::Neg => Self::Neg,
            EventTone::Neutral => Self::Neutral,
        }
    }
}

/// A morning event applied directly to the resource vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: String,
    pub title: String,
    pub desc: String,
    #[serde(default)]
    pub effect: BTreeMap<ResourceKind, DeltaValue>,
    pub tone: EventTone,
}

impl GameEvent {
    #[must_use]
    pub fn effect_delta(&self) -> ResourceDelta {
        self.effect
            .iter()
            .map(|(kind, value)| (*kind, *value))
            .collect()
    }
}

/// Descriptive talent metadata. Talents carry no rule changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talent {
    pub id: String,
    pub name: String,
    pub desc: String,
    #[serde(default)]
    pub req: Option<String>,
}

/// Narrative strings for the journal.
///
/// Templates use `{day}`, `{title}`, `{name}`, `{rent}`, `{talent}` slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    pub welcome: String,
    pub morning: String,
    pub insufficient: String,
    pub play_card: String,
    pub end_work: String,
    pub sleep: String,
    pub rent: String,
    pub talent_selected: String,
    pub defeat: DefeatMessages,
}

/// One fixed narrative per end condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefeatMessages {
    pub bankrupt: String,
    pub overwork: String,
    pub breakdown: String,
    pub fired: String,
}

impl DefeatMessages {
    #[must_use]
    pub fn reason(&self, cause: DefeatCause) -> &str {
        match cause {
            DefeatCause::Bankrupt => &self.bankrupt,
            DefeatCause::Overwork => &self.overwork,
            DefeatCause::Breakdown => &self.breakdown,
            DefeatCause::Fired => &self.fired,
        }
    }
}

/// Fill `{key}` slots in a template.
#[must_use]
pub fn render(template: &str, slots: &[(&str, &str)]) -> String {
    slots
        .iter()
        .fold(template.to_string(), |text, (key, value)| {
            text.replace(&format!("{{{key}}}"), value)
        })
}

/// Container for all static content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTables {
    pub cards: Vec<Card>,
    pub night_actions: Vec<Card>,
    pub events: Vec<GameEvent>,
    #[serde(default)]
    pub talents: Vec<Talent>,
    pub messages: Messages,
}

/// Errors raised when content tables violate their invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ContentError {
    #[error("{table} must not be empty")]
    EmptyTable { table: &'static str },
    #[error("duplicate id `{id}` in {table}")]
    DuplicateId { table: &'static str, id: String },
    #[error("{owner} has chance {chance} outside [0, 1]")]
    ChanceOutOfRange { owner: String, chance: f64 },
}

impl ContentTables {
    /// Load content from a JSON string without validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into content tables.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The tables shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded asset fails to parse.
    pub fn embedded() -> Result<Self, serde_json::Error> {
        Self::from_json(EMBEDDED_CONTENT)
    }

    /// Check pool sizes, id uniqueness, and chance ranges.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.cards.is_empty() {
            return Err(ContentError::EmptyTable { table: "cards" });
        }
        if self.night_actions.is_empty() {
            return Err(ContentError::EmptyTable {
                table: "night_actions",
            });
        }
        if self.events.is_empty() {
            return Err(ContentError::EmptyTable { table: "events" });
        }
        unique_ids("cards", self.cards.iter().map(|card| card.id.as_str()))?;
        unique_ids(
            "night_actions",
            self.night_actions.iter().map(|card| card.id.as_str()),
        )?;
        unique_ids("events", self.events.iter().map(|event| event.id.as_str()))?;
        unique_ids(
            "talents",
            self.talents.iter().map(|talent| talent.id.as_str()),
        )?;
        for card in self.cards.iter().chain(&self.night_actions) {
            check_chances(&card.id, card.gain.values())?;
        }
        for event in &self.events {
            check_chances(&event.id, event.effect.values())?;
        }
        Ok(())
    }

    #[must_use]
    pub fn event(&self, id: &str) -> Option<&GameEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    #[must_use]
    pub fn talent(&self, id: &str) -> Option<&Talent> {
        self.talents.iter().find(|talent| talent.id == id)
    }
}

fn unique_ids<'a>(
    table: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ContentError::DuplicateId {
                table,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn check_chances<'a>(
    owner: &str,
    values: impl Iterator<Item = &'a DeltaValue>,
) -> Result<(), ContentError> {
    for value in values {
        if let DeltaValue::Chance { chance, .. } = value
            && !(0.0..=1.0).contains(chance)
        {
            return Err(ContentError::ChanceOutOfRange {
                owner: owner.to_string(),
                chance: *chance,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_tables_parse_and_validate() {
        let content = ContentTables::embedded().unwrap();
        content.validate().unwrap();
        assert_eq!(content.cards.len(), 6);
        assert_eq!(content.night_actions.len(), 5);
        assert_eq!(content.events.len(), 5);
        assert_eq!(content.talents.len(), 3);
    }

    #[test]
    fn combined_delta_merges_cost_and_gain() {
        let content = ContentTables::embedded().unwrap();
        let allnighter = content
            .cards
            .iter()
            .find(|card| card.id == "allnighter")
            .unwrap();
        let delta = allnighter.combined_delta();
        let entries: Vec<_> = delta
            .iter()
            .map(|entry| (entry.resource, entry.value.preview()))
            .collect();
        assert_eq!(
            entries,
            vec![
                (ResourceKind::Health, Some(-15)),
                (ResourceKind::Sanity, Some(-5)),
                (ResourceKind::Kpi, Some(15)),
                (ResourceKind::Energy, Some(-2)),
                (ResourceKind::Stress, Some(10)),
            ]
        );
        assert_eq!(allnighter.cost_of(ResourceKind::Health), 15);
        assert_eq!(allnighter.cost_of(ResourceKind::Money), 0);
    }

    #[test]
    fn gain_replaces_cost_on_the_same_resource() {
        let content = ContentTables::embedded().unwrap();
        let gacha = content
            .night_actions
            .iter()
            .find(|card| card.id == "gacha")
            .unwrap();
        let delta = gacha.combined_delta();
        let money: Vec<_> = delta
            .iter()
            .filter(|entry| entry.resource == ResourceKind::Money)
            .collect();
        assert_eq!(money.len(), 1);
        assert!(money[0].value.is_random());
        assert_eq!(gacha.cost_of(ResourceKind::Money), 20);
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut content = ContentTables::embedded().unwrap();
        let dup = content.cards[0].clone();
        content.cards.push(dup);
        assert!(matches!(
            content.validate(),
            Err(ContentError::DuplicateId { table: "cards", .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_chance_and_empty_pools() {
        let mut content = ContentTables::embedded().unwrap();
        content.night_actions[0].gain.insert(
            ResourceKind::Money,
            DeltaValue::Chance {
                chance: 1.5,
                hit: 1,
                miss: None,
            },
        );
        assert!(matches!(
            content.validate(),
            Err(ContentError::ChanceOutOfRange { .. })
        ));

        content.events.clear();
        assert_eq!(
            content.validate(),
            Err(ContentError::EmptyTable { table: "events" })
        );
    }

    #[test]
    fn render_fills_named_slots() {
        let text = render("第 {day} 天：{title}", &[("day", "3"), ("title", "晚霞")]);
        assert_eq!(text, "第 3 天：晚霞");
        assert_eq!(render("no slots", &[("day", "1")]), "no slots");
    }
}
