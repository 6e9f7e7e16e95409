use std::fmt;

use clap::ValueEnum;
use niuma_game::{Action, Card, GameState, Phase, ResourceKind, RulesConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    pub action: Action,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub const fn new(action: Action, rationale: Option<String>) -> Self {
        Self { action, rationale }
    }

    fn play(card: &Card, rationale: String) -> Self {
        Self::new(Action::play(card.id.as_str()), Some(rationale))
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pick the next action during the work or night phase.
    fn decide(&mut self, state: &GameState) -> PolicyDecision;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum GameplayStrategy {
    /// Recovers health and sanity, keeps a cash buffer.
    Frugal,
    /// Chases KPI by day and side income by night.
    Grinder,
    /// Uniform choice among the legal actions.
    Random,
}

impl GameplayStrategy {
    pub const ALL: [Self; 3] = [Self::Frugal, Self::Grinder, Self::Random];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Frugal => "Frugal",
            Self::Grinder => "Grinder",
            Self::Random => "Random",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Frugal => "plays recovery cards, never spends into the rent buffer",
            Self::Grinder => "maximizes KPI at work and money at night",
            Self::Random => "ChaCha-seeded uniform choice among legal actions",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64, rules: &RulesConfig) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Frugal => Box::new(FrugalPolicy {
                money_buffer: rules.rent.saturating_mul(3),
            }),
            Self::Grinder => Box::new(GrinderPolicy),
            Self::Random => Box::new(RandomPolicy {
                rng: ChaCha20Rng::seed_from_u64(seed),
            }),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct FrugalPolicy {
    money_buffer: i32,
}

struct GrinderPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

/// Action that closes the current phase.
#[must_use]
pub const fn phase_exit(phase: Phase) -> Action {
    match phase {
        Phase::Morning | Phase::Settlement => Action::StartDay,
        Phase::Work => Action::EndWork,
        Phase::Night => Action::GoToSleep,
    }
}

/// Fixed gain on one resource; random gains count as zero.
fn gain(card: &Card, kind: ResourceKind) -> i32 {
    card.gain
        .get(&kind)
        .and_then(|value| value.preview())
        .unwrap_or(0)
}

fn cost(card: &Card, kind: ResourceKind) -> i32 {
    i32::try_from(card.cost_of(kind)).unwrap_or(i32::MAX)
}

/// Net change to the survival stats, stress counted against.
fn recovery_score(card: &Card) -> i32 {
    gain(card, ResourceKind::Health) + gain(card, ResourceKind::Sanity)
        + gain(card, ResourceKind::Kpi)
        - gain(card, ResourceKind::Stress)
        - cost(card, ResourceKind::Health)
        - cost(card, ResourceKind::Sanity)
}

fn playable(state: &GameState) -> impl Iterator<Item = &Card> {
    state
        .active_pool()
        .unwrap_or_default()
        .iter()
        .filter(|card| state.can_afford(card))
}

impl PlayerPolicy for FrugalPolicy {
    fn name(&self) -> &'static str {
        "Frugal"
    }

    fn decide(&mut self, state: &GameState) -> PolicyDecision {
        let money = state.resources.get(ResourceKind::Money);
        let best = playable(state)
            .filter(|card| money - cost(card, ResourceKind::Money) >= self.money_buffer)
            .map(|card| (recovery_score(card), card))
            .filter(|(score, _)| *score > 0)
            .max_by_key(|(score, _)| *score);
        match best {
            Some((score, card)) => PolicyDecision::play(card, format!("recovery {score}")),
            None => PolicyDecision::new(phase_exit(state.phase), Some("nothing safe".into())),
        }
    }
}

impl PlayerPolicy for GrinderPolicy {
    fn name(&self) -> &'static str {
        "Grinder"
    }

    fn decide(&mut self, state: &GameState) -> PolicyDecision {
        let target = match state.phase {
            Phase::Night => ResourceKind::Money,
            _ => ResourceKind::Kpi,
        };
        let best = playable(state)
            .map(|card| (gain(card, target), card))
            .filter(|(reward, _)| *reward > 0)
            .max_by_key(|(reward, _)| *reward);
        if let Some((reward, card)) = best {
            return PolicyDecision::play(card, format!("{target} +{reward}"));
        }
        let worn_out = [ResourceKind::Health, ResourceKind::Sanity]
            .into_iter()
            .any(|kind| state.resources.get(kind) < 40);
        if worn_out
            && let Some(card) = playable(state)
                .filter(|card| recovery_score(card) > 0)
                .max_by_key(|card| recovery_score(card))
        {
            return PolicyDecision::play(card, "patch up".into());
        }
        PolicyDecision::new(phase_exit(state.phase), None)
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn decide(&mut self, state: &GameState) -> PolicyDecision {
        let mut actions = state.available_actions();
        if actions.is_empty() {
            return PolicyDecision::new(phase_exit(state.phase), None);
        }
        let idx = self.rng.gen_range(0..actions.len());
        PolicyDecision::new(actions.swap_remove(idx), Some(format!("pick {idx}")))
    }
}
