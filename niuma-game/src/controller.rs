//! Owner of the single game state: routes actions and drives the clock.
use log::{debug, info};
use std::time::Duration;
use thiserror::Error;

use crate::action::{Action, ActionRejected};
use crate::cards::{play_card, record_insufficient};
use crate::content::{ContentError, ContentTables};
use crate::phase::{
    TransitionCtx, end_work, ensure_ready, go_to_sleep, resolve_morning, resolve_settlement,
    select_talent, start_day,
};
use crate::rng::RngBundle;
use crate::rules::{RulesConfig, RulesError};
use crate::schedule::{DeferredQueue, ScheduledTask, TransitionKind};
use crate::state::{GameState, Phase};

/// Content or rules refused at construction.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid content: {0}")]
    Content(#[from] ContentError),
    #[error("invalid rules: {0}")]
    Rules(#[from] RulesError),
}

/// Runs one game: holds the state, the RNG streams, and the deferred queue.
#[derive(Debug)]
pub struct GameController {
    content: ContentTables,
    rules: RulesConfig,
    rng: RngBundle,
    state: GameState,
    queue: DeferredQueue,
}

impl GameController {
    /// Controller seeded from a single user seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the content or rules fail validation.
    pub fn new(
        content: ContentTables,
        rules: RulesConfig,
        seed: u64,
    ) -> Result<Self, SetupError> {
        Self::with_rng(content, rules, RngBundle::from_user_seed(seed))
    }

    /// Controller drawing from caller-supplied random sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the content or rules fail validation.
    pub fn with_rng(
        content: ContentTables,
        rules: RulesConfig,
        rng: RngBundle,
    ) -> Result<Self, SetupError> {
        content.validate()?;
        rules.validate()?;
        let queue = DeferredQueue::new();
        let state = GameState::new(&rules, &content.messages, queue.now_ms());
        Ok(Self {
            content,
            rules,
            rng,
            state,
            queue,
        })
    }

    /// Current snapshot.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn content(&self) -> &ContentTables {
        &self.content
    }

    #[must_use]
    pub const fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Game-clock milliseconds.
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.queue.now_ms()
    }

    #[must_use]
    pub const fn pending(&self) -> Option<&ScheduledTask> {
        self.queue.pending()
    }

    /// Draws consumed across every RNG stream.
    #[must_use]
    pub fn rng_draws(&self) -> u64 {
        self.rng.total_draws()
    }

    /// Apply one player action.
    ///
    /// Triggers that defer a step (`StartDay`, `GoToSleep`) return as soon as
    /// the step is queued; advance the clock or call [`Self::settle`] to run it.
    ///
    /// # Errors
    ///
    /// Returns the reason the action was refused. Only an insufficiency
    /// changes the state, by logging the failed attempt.
    pub fn dispatch(&mut self, action: Action) -> Result<&GameState, ActionRejected> {
        debug!("dispatch {action} on day {} ({})", self.state.day, self.state.phase);
        let now_ms = self.queue.now_ms();
        if action == Action::ResetGame {
            self.reset();
            return Ok(&self.state);
        }
        let mut ctx = TransitionCtx {
            content: &self.content,
            rules: &self.rules,
            rng: &mut self.rng,
            now_ms,
        };
        let outcome = match &action {
            Action::StartDay => start_day(&self.state, &mut ctx),
            Action::PlayCard { card_id } => play_guarded(&self.state, card_id, &mut ctx),
            Action::EndWork => end_work(&self.state, &ctx),
            Action::GoToSleep => go_to_sleep(&self.state, &ctx),
            Action::SelectTalent { talent_id } => select_talent(&self.state, talent_id, &ctx),
            Action::ResetGame => Ok(self.state.clone()),
        };
        match outcome {
            Ok(next) => {
                self.replace(next);
                Ok(&self.state)
            }
            Err(err @ ActionRejected::InsufficientResources { .. }) => {
                self.state = record_insufficient(&self.state, &self.content.messages, now_ms);
                debug!("{action} rejected: {err}");
                Err(err)
            }
            Err(err) => {
                debug!("{action} rejected: {err}");
                Err(err)
            }
        }
    }

    /// Move the game clock forward, running the pending step if it is due.
    /// Returns whether a step ran.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        match self.queue.advance(elapsed) {
            Some(task) => {
                self.run(task);
                true
            }
            None => false,
        }
    }

    /// Run the pending step right away. Returns whether one was pending.
    pub fn settle(&mut self) -> bool {
        match self.queue.settle() {
            Some(task) => {
                self.run(task);
                true
            }
            None => false,
        }
    }

    /// Discard the run and the pending step. RNG streams continue.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.state = GameState::new(&self.rules, &self.content.messages, self.queue.now_ms());
        info!("game reset");
    }

    fn replace(&mut self, next: GameState) {
        if self.queue.is_idle()
            && let Some(kind) = next.pending.clone()
        {
            let delay = kind.delay(&self.rules);
            debug!("scheduling {kind:?} in {delay:?}");
            self.queue.schedule(kind, delay);
        }
        self.state = next;
    }

    fn run(&mut self, task: ScheduledTask) {
        let mut ctx = TransitionCtx {
            content: &self.content,
            rules: &self.rules,
            rng: &mut self.rng,
            now_ms: task.due_ms,
        };
        let next = match &task.kind {
            TransitionKind::MorningResolution { event_id } => {
                resolve_morning(&self.state, event_id, &mut ctx)
            }
            TransitionKind::SettlementResolution => resolve_settlement(&self.state, &mut ctx),
        };
        self.state = next;
    }
}

fn play_guarded(
    state: &GameState,
    card_id: &str,
    ctx: &mut TransitionCtx<'_>,
) -> Result<GameState, ActionRejected> {
    ensure_ready(state, "play_card", &[Phase::Work, Phase::Night])?;
    play_card(state, card_id, &ctx.content.messages, ctx.rng.gain(), ctx.now_ms)
}
