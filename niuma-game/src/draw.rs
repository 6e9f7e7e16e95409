//! Card pool sampling and daily event selection.
use log::debug;

use crate::content::{Card, ContentTables, GameEvent};
use crate::rng::RandomSource;

/// Sample up to `count` cards without replacement, in shuffled order.
///
/// A pool smaller than `count` is returned whole, shuffled.
pub fn sample_cards(pool: &[Card], count: usize, rng: &mut dyn RandomSource) -> Vec<Card> {
    rng.shuffled_indices(pool.len())
        .into_iter()
        .filter_map(|idx| pool.get(idx).cloned())
        .take(count)
        .collect()
}

/// Fresh work-phase hand.
pub fn draw_work_hand(
    content: &ContentTables,
    count: usize,
    rng: &mut dyn RandomSource,
) -> Vec<Card> {
    let hand = sample_cards(&content.cards, count, rng);
    debug!("work hand: {:?}", card_ids(&hand));
    hand
}

/// Fresh night-phase pool.
pub fn draw_night_actions(
    content: &ContentTables,
    count: usize,
    rng: &mut dyn RandomSource,
) -> Vec<Card> {
    let pool = sample_cards(&content.night_actions, count, rng);
    debug!("night pool: {:?}", card_ids(&pool));
    pool
}

/// One event, uniformly with replacement. `None` only for an empty table.
pub fn draw_event<'a>(
    content: &'a ContentTables,
    rng: &mut dyn RandomSource,
) -> Option<&'a GameEvent> {
    if content.events.is_empty() {
        return None;
    }
    let event = content.events.get(rng.pick_index(content.events.len()));
    if let Some(event) = event {
        debug!("daily event: {}", event.id);
    }
    event
}

fn card_ids(cards: &[Card]) -> Vec<&str> {
    cards.iter().map(|card| card.id.as_str()).collect()
}
