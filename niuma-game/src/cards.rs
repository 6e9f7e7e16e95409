//! Card play: phase and pool checks, affordability, atomic resolution.
use log::debug;

use crate::action::ActionRejected;
use crate::content::{Messages, render};
use crate::journal::LogTone;
use crate::rng::RandomSource;
use crate::state::{GameState, Phase};

/// Play `card_id` from the pool of the current phase.
///
/// Costs and gains resolve as one delta, so a card either applies in full or
/// not at all. The played card leaves its pool; the other pool is untouched.
///
/// # Errors
///
/// Rejects outside work and night, for cards missing from the active pool,
/// and when any cost exceeds the current value.
pub fn play_card(
    state: &GameState,
    card_id: &str,
    messages: &Messages,
    rng: &mut dyn RandomSource,
    now_ms: u64,
) -> Result<GameState, ActionRejected> {
    let Some(pool) = state.active_pool() else {
        return Err(ActionRejected::WrongPhase {
            action: "play_card",
            phase: state.phase,
        });
    };
    let Some(card) = pool.iter().find(|card| card.id == card_id) else {
        return Err(ActionRejected::UnknownCard {
            card_id: card_id.to_string(),
            phase: state.phase,
        });
    };
    if let Some((resource, need, have)) = state.shortfall(card) {
        debug!("{card_id} rejected: {resource} {have} < {need}");
        return Err(ActionRejected::InsufficientResources {
            card_id: card_id.to_string(),
            resource,
            need,
            have,
        });
    }

    let mut next = state.clone();
    let text = render(&messages.play_card, &[("name", card.name.as_str())]);
    next.log(text, LogTone::Neutral, now_ms);
    next.apply_delta(&card.combined_delta(), rng, messages, now_ms);
    let origin = match state.phase {
        Phase::Night => &mut next.night_actions,
        _ => &mut next.current_hand,
    };
    if let Some(idx) = origin.iter().position(|card| card.id == card_id) {
        origin.remove(idx);
    }
    debug!("played {card_id} during {}", state.phase);
    Ok(next)
}

/// Journal the failed attempt after an insufficiency rejection.
#[must_use]
pub fn record_insufficient(state: &GameState, messages: &Messages, now_ms: u64) -> GameState {
    let mut next = state.clone();
    next.log(messages.insufficient.as_str(), LogTone::Neg, now_ms);
    next
}
