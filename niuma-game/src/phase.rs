//! Day-cycle transitions.
//!
//! Each function reads a state snapshot and returns its successor; none of
//! them touch the input. Triggers (`start_day`, `go_to_sleep`) only mark a
//! pending transition, the matching `resolve_*` function runs it once the
//! controller's clock says it is due.
use log::{debug, warn};

use crate::action::ActionRejected;
use crate::content::{ContentTables, render};
use crate::delta::ResourceDelta;
use crate::draw::{draw_event, draw_night_actions, draw_work_hand};
use crate::journal::LogTone;
use crate::resources::ResourceKind;
use crate::rng::RngBundle;
use crate::rules::RulesConfig;
use crate::schedule::TransitionKind;
use crate::state::{GameState, Phase};

/// Everything a transition may read besides the state itself.
#[derive(Debug)]
pub struct TransitionCtx<'a> {
    pub content: &'a ContentTables,
    pub rules: &'a RulesConfig,
    pub rng: &'a mut RngBundle,
    pub now_ms: u64,
}

/// Shared gate for mutating actions: no defeat, nothing pending, right phase.
///
/// # Errors
///
/// Returns the first failed condition.
pub fn ensure_ready(
    state: &GameState,
    action: &'static str,
    expected: &[Phase],
) -> Result<(), ActionRejected> {
    if state.is_defeated() {
        return Err(ActionRejected::Defeated);
    }
    if state.is_pending() {
        return Err(ActionRejected::TransitionPending);
    }
    if !expected.contains(&state.phase) {
        return Err(ActionRejected::WrongPhase {
            action,
            phase: state.phase,
        });
    }
    Ok(())
}

/// Draw the day's event, announce it, and mark the morning resolution pending.
///
/// # Errors
///
/// Rejects outside the morning or while defeated or pending.
pub fn start_day(
    state: &GameState,
    ctx: &mut TransitionCtx<'_>,
) -> Result<GameState, ActionRejected> {
    ensure_ready(state, "start_day", &[Phase::Morning])?;
    let mut next = state.clone();
    next.started = true;
    match draw_event(ctx.content, ctx.rng.event()) {
        Some(event) => {
            let day = next.day.to_string();
            let title = render(
                &ctx.content.messages.morning,
                &[("day", day.as_str()), ("title", event.title.as_str())],
            );
            next.log(title, LogTone::System, ctx.now_ms);
            next.log(event.desc.as_str(), event.tone.into(), ctx.now_ms);
            next.pending = Some(TransitionKind::MorningResolution {
                event_id: event.id.clone(),
            });
        }
        None => {
            warn!("no events loaded; day {} starts without one", next.day);
            next.pending = Some(TransitionKind::MorningResolution {
                event_id: String::new(),
            });
        }
    }
    debug!("day {} started", next.day);
    Ok(next)
}

/// Apply the drawn event, refill energy, deal both pools, and open work.
///
/// A defeat caused by the event still opens the work phase; every action
/// other than reset is refused from then on.
#[must_use]
pub fn resolve_morning(
    state: &GameState,
    event_id: &str,
    ctx: &mut TransitionCtx<'_>,
) -> GameState {
    let mut next = state.clone();
    let messages = &ctx.content.messages;
    if let Some(event) = ctx.content.event(event_id) {
        next.apply_delta(&event.effect_delta(), ctx.rng.gain(), messages, ctx.now_ms);
    }
    let refill = ctx.rules.daily_energy - next.resources.get(ResourceKind::Energy);
    if refill != 0 {
        let delta = ResourceDelta::new().with(ResourceKind::Energy, refill);
        next.apply_delta(&delta, ctx.rng.gain(), messages, ctx.now_ms);
    }
    next.current_hand = draw_work_hand(ctx.content, ctx.rules.hand_size, ctx.rng.draw());
    next.night_actions =
        draw_night_actions(ctx.content, ctx.rules.night_pool_size, ctx.rng.draw());
    next.phase = Phase::Work;
    next.pending = None;
    debug!("day {} morning resolved", next.day);
    next
}

/// Clock out. Resources are unchanged.
///
/// # Errors
///
/// Rejects outside the work phase or while defeated or pending.
pub fn end_work(state: &GameState, ctx: &TransitionCtx<'_>) -> Result<GameState, ActionRejected> {
    ensure_ready(state, "end_work", &[Phase::Work])?;
    let mut next = state.clone();
    next.phase = Phase::Night;
    next.log(ctx.content.messages.end_work.as_str(), LogTone::System, ctx.now_ms);
    debug!("day {} night begins", next.day);
    Ok(next)
}

/// Enter settlement and mark its resolution pending.
///
/// # Errors
///
/// Rejects outside the night phase or while defeated or pending.
pub fn go_to_sleep(
    state: &GameState,
    ctx: &TransitionCtx<'_>,
) -> Result<GameState, ActionRejected> {
    ensure_ready(state, "go_to_sleep", &[Phase::Night])?;
    let mut next = state.clone();
    next.phase = Phase::Settlement;
    next.log(ctx.content.messages.sleep.as_str(), LogTone::System, ctx.now_ms);
    next.pending = Some(TransitionKind::SettlementResolution);
    Ok(next)
}

/// Roll the day, charge rent and nightly stress, and return to morning.
#[must_use]
pub fn resolve_settlement(state: &GameState, ctx: &mut TransitionCtx<'_>) -> GameState {
    let mut next = state.clone();
    next.day = next.day.saturating_add(1);
    let upkeep = ResourceDelta::new()
        .with(ResourceKind::Money, -ctx.rules.rent)
        .with(ResourceKind::Stress, ctx.rules.nightly_stress);
    next.apply_delta(&upkeep, ctx.rng.gain(), &ctx.content.messages, ctx.now_ms);
    let rent = ctx.rules.rent.to_string();
    let text = render(&ctx.content.messages.rent, &[("rent", rent.as_str())]);
    next.log(text, LogTone::Neg, ctx.now_ms);
    next.phase = Phase::Morning;
    next.pending = None;
    debug!("settled into day {}", next.day);
    next
}

/// Record a talent choice. Only allowed before the first day begins.
///
/// # Errors
///
/// Rejects unknown talents, choices after the first `StartDay`, and any
/// choice once the run has ended.
pub fn select_talent(
    state: &GameState,
    talent_id: &str,
    ctx: &TransitionCtx<'_>,
) -> Result<GameState, ActionRejected> {
    if state.is_defeated() {
        return Err(ActionRejected::Defeated);
    }
    if state.started || state.is_pending() {
        return Err(ActionRejected::TalentLocked);
    }
    let Some(talent) = ctx.content.talent(talent_id) else {
        return Err(ActionRejected::UnknownTalent {
            talent_id: talent_id.to_string(),
        });
    };
    let mut next = state.clone();
    next.talent_path = Some(talent.id.clone());
    let text = render(
        &ctx.content.messages.talent_selected,
        &[("talent", talent.name.as_str())],
    );
    next.log(text, LogTone::System, ctx.now_ms);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DefeatCause;
    use crate::resources::Resources;
    use crate::rng::ScriptedRandom;

    struct Fixture {
        content: ContentTables,
        rules: RulesConfig,
        rng: RngBundle,
    }

    impl Fixture {
        fn new(event_index: usize) -> Self {
            Self {
                content: ContentTables::embedded().unwrap(),
                rules: RulesConfig::default(),
                rng: RngBundle::from_sources(
                    Box::new(ScriptedRandom::new()),
                    Box::new(ScriptedRandom::new().with_indices([event_index])),
                    Box::new(ScriptedRandom::new()),
                ),
            }
        }

        fn ctx(&mut self, now_ms: u64) -> TransitionCtx<'_> {
            TransitionCtx {
                content: &self.content,
                rules: &self.rules,
                rng: &mut self.rng,
                now_ms,
            }
        }

        fn fresh(&self) -> GameState {
            GameState::new(&self.rules, &self.content.messages, 0)
        }
    }

    #[test]
    fn start_day_logs_and_defers_the_event() {
        let mut fx = Fixture::new(3);
        let state = fx.fresh();
        let next = start_day(&state, &mut fx.ctx(0)).unwrap();
        assert!(next.started);
        assert_eq!(next.phase, Phase::Morning);
        assert_eq!(next.resources, state.resources, "effect waits for resolution");
        assert_eq!(
            next.pending,
            Some(TransitionKind::MorningResolution {
                event_id: "bonus".into()
            })
        );
        assert!(next.journal.contains_text("【第 1 天】早上好。今日事件：项目奖金"));
        assert_eq!(next.journal.latest().map(|e| e.tone), Some(LogTone::Pos));

        let err = start_day(&next, &mut fx.ctx(10)).unwrap_err();
        assert_eq!(err, ActionRejected::TransitionPending);
    }

    #[test]
    fn morning_resolution_opens_work_with_fresh_pools() {
        let mut fx = Fixture::new(3);
        let mut state = fx.fresh();
        state.resources = Resources::new(1_000, 80, 75, 20, 7, 20, 50);
        let started = start_day(&state, &mut fx.ctx(0)).unwrap();
        let next = resolve_morning(&started, "bonus", &mut fx.ctx(1_000));
        assert_eq!(next.phase, Phase::Work);
        assert!(next.pending.is_none());
        assert_eq!(next.resources.get(ResourceKind::Money), 1_300);
        assert_eq!(next.resources.get(ResourceKind::Sanity), 85);
        assert_eq!(next.resources.get(ResourceKind::Energy), 3);
        assert_eq!(next.current_hand.len(), 3);
        assert_eq!(next.night_actions.len(), 3);
    }

    #[test]
    fn kpi_event_fires_player() {
        let mut fx = Fixture::new(2);
        let mut state = fx.fresh();
        state.resources = Resources::new(1_000, 80, 75, 5, 3, 20, 50);
        let started = start_day(&state, &mut fx.ctx(0)).unwrap();
        let next = resolve_morning(&started, "subway", &mut fx.ctx(1_000));
        assert_eq!(next.resources.get(ResourceKind::Kpi), 0);
        let defeat = next.defeat.clone().unwrap();
        assert_eq!(defeat.cause, DefeatCause::Fired);
        assert_eq!(defeat.reason, fx.content.messages.defeat.fired);
        assert_eq!(next.phase, Phase::Work);
        assert_eq!(end_work(&next, &fx.ctx(1_100)), Err(ActionRejected::Defeated));
    }

    #[test]
    fn settlement_charges_rent_and_stress() {
        let mut fx = Fixture::new(0);
        let mut state = fx.fresh();
        state.started = true;
        state.phase = Phase::Night;
        state.resources = Resources::new(200, 80, 75, 20, 3, 20, 50);
        let sleeping = go_to_sleep(&state, &fx.ctx(0)).unwrap();
        assert_eq!(sleeping.phase, Phase::Settlement);
        assert_eq!(sleeping.pending, Some(TransitionKind::SettlementResolution));

        let next = resolve_settlement(&sleeping, &mut fx.ctx(1_500));
        assert_eq!(next.day, 2);
        assert_eq!(next.phase, Phase::Morning);
        assert_eq!(next.resources.get(ResourceKind::Money), 80);
        assert_eq!(next.resources.get(ResourceKind::Stress), 22);
        assert!(next.journal.contains_text("支付每日开销/房租：¥120"));
        assert!(next.defeat.is_none());
    }

    #[test]
    fn rent_can_bankrupt() {
        let mut fx = Fixture::new(0);
        let mut state = fx.fresh();
        state.phase = Phase::Settlement;
        state.resources = Resources::new(100, 80, 75, 20, 3, 20, 50);
        let next = resolve_settlement(&state, &mut fx.ctx(0));
        assert_eq!(next.resources.get(ResourceKind::Money), -20);
        assert_eq!(
            next.defeat.map(|defeat| defeat.cause),
            Some(DefeatCause::Bankrupt)
        );
    }

    #[test]
    fn phase_gates_reject_out_of_order_actions() {
        let mut fx = Fixture::new(0);
        let state = fx.fresh();
        assert_eq!(
            end_work(&state, &fx.ctx(0)),
            Err(ActionRejected::WrongPhase {
                action: "end_work",
                phase: Phase::Morning
            })
        );
        assert!(matches!(
            go_to_sleep(&state, &fx.ctx(0)),
            Err(ActionRejected::WrongPhase { .. })
        ));
        let mut settling = state;
        settling.phase = Phase::Settlement;
        assert!(matches!(
            start_day(&settling, &mut fx.ctx(0)),
            Err(ActionRejected::WrongPhase { .. })
        ));
    }

    #[test]
    fn talent_choice_locks_after_first_day() {
        let mut fx = Fixture::new(0);
        let state = fx.fresh();
        let chosen = select_talent(&state, "moyu", &fx.ctx(0)).unwrap();
        assert_eq!(chosen.talent_path.as_deref(), Some("moyu"));
        assert_eq!(chosen.resources, state.resources);
        assert!(chosen.journal.contains_text("天赋已选择：摸鱼达人"));
        assert_eq!(
            select_talent(&state, "wizard", &fx.ctx(0)),
            Err(ActionRejected::UnknownTalent {
                talent_id: "wizard".into()
            })
        );
        let started = start_day(&chosen, &mut fx.ctx(0)).unwrap();
        assert_eq!(
            select_talent(&started, "juan", &fx.ctx(0)),
            Err(ActionRejected::TalentLocked)
        );
    }
}
