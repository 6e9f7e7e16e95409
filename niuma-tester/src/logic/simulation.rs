use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Serialize;

use niuma_game::{Action, DefeatCause, GameController, Phase, Resources};

use crate::assets::TesterAssets;
use crate::logic::policy::{GameplayStrategy, phase_exit};

/// Upper bound on dispatched actions per simulated day.
const ACTIONS_PER_DAY_LIMIT: u32 = 64;
const POLICY_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Configuration for a simulation session.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub max_days: u32,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            strategy,
            max_days: 30,
        }
    }

    #[must_use]
    pub const fn with_max_days(mut self, max_days: u32) -> Self {
        self.max_days = max_days;
        self
    }
}

/// Outcome of one automated playthrough.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub strategy: String,
    pub seed: u64,
    /// Day the run ended on.
    pub final_day: u32,
    /// Full days completed before the run ended.
    pub days_survived: u32,
    pub defeat: Option<DefeatCause>,
    pub cards_played: u32,
    pub rejected_actions: u32,
    pub final_resources: Resources,
}

impl RunRecord {
    #[must_use]
    pub const fn survived(&self) -> bool {
        self.defeat.is_none()
    }
}

/// Play one game to defeat or to the day cap, settling every deferred step
/// immediately.
///
/// # Errors
///
/// Returns an error if the controller refuses the assets or a phase-closing
/// action is rejected.
pub fn run_game(assets: &TesterAssets, config: SimulationConfig) -> Result<RunRecord> {
    let mut game = GameController::new(assets.content.clone(), assets.rules.clone(), config.seed)
        .context("building controller")?;
    let mut policy = config
        .strategy
        .create_policy(config.seed ^ POLICY_SEED_SALT, &assets.rules);
    let mut cards_played = 0u32;
    let mut rejected_actions = 0u32;
    let mut actions_today = 0u32;

    while !game.state().is_defeated() && game.state().day <= config.max_days {
        match game.state().phase {
            Phase::Morning => {
                actions_today = 0;
                game.dispatch(Action::StartDay).context("starting the day")?;
                game.settle();
            }
            Phase::Settlement => {
                game.settle();
            }
            phase @ (Phase::Work | Phase::Night) => {
                actions_today += 1;
                let decision = if actions_today > ACTIONS_PER_DAY_LIMIT {
                    warn!("{} stalled on day {}", policy.name(), game.state().day);
                    phase_exit(phase)
                } else {
                    let decision = policy.decide(game.state());
                    debug!(
                        "{} day {} {phase}: {} ({})",
                        policy.name(),
                        game.state().day,
                        decision.action,
                        decision.rationale.as_deref().unwrap_or("-")
                    );
                    decision.action
                };
                let is_card = matches!(decision, Action::PlayCard { .. });
                match game.dispatch(decision) {
                    Ok(_) if is_card => cards_played += 1,
                    Ok(_) => {}
                    Err(err) => {
                        rejected_actions += 1;
                        debug!("rejected: {err}");
                        if !is_card {
                            return Err(err).context("closing the phase");
                        }
                    }
                }
                game.settle();
            }
        }
    }

    let state = game.state();
    let days_survived = if state.is_defeated() {
        state.day.saturating_sub(1)
    } else {
        config.max_days
    };
    Ok(RunRecord {
        strategy: config.strategy.label().to_string(),
        seed: config.seed,
        final_day: state.day,
        days_survived,
        defeat: state.defeat.as_ref().map(|defeat| defeat.cause),
        cards_played,
        rejected_actions,
        final_resources: state.resources,
    })
}

/// Run `iterations` games per seed per strategy.
///
/// # Errors
///
/// Returns the first failed run.
pub fn run_batch(
    assets: &TesterAssets,
    strategies: &[GameplayStrategy],
    seeds: &[u64],
    iterations: usize,
    max_days: u32,
) -> Result<Vec<RunRecord>> {
    let mut records = Vec::with_capacity(strategies.len() * seeds.len() * iterations);
    for &strategy in strategies {
        for &seed in seeds {
            for iteration in 0..iterations {
                let run_seed = seed.wrapping_add(u64::try_from(iteration).unwrap_or(u64::MAX));
                let config = SimulationConfig::new(strategy, run_seed).with_max_days(max_days);
                let record = run_game(assets, config)
                    .with_context(|| format!("{strategy} seed {run_seed}"))?;
                records.push(record);
            }
        }
    }
    Ok(records)
}
