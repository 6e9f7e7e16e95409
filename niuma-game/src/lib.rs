//! Niuma Game Engine
//!
//! Platform-agnostic core of the 都市牛马 office-survival card game: the
//! resource vector, the card and event engine, and the morning → work →
//! night → settlement day cycle. No rendering or platform dependencies.

pub mod action;
pub mod cards;
pub mod constants;
pub mod content;
pub mod controller;
pub mod delta;
pub mod draw;
pub mod engine;
pub mod journal;
pub mod numbers;
pub mod phase;
pub mod resources;
pub mod rng;
pub mod rules;
pub mod schedule;
pub mod state;

// Re-export commonly used types
pub use action::{Action, ActionRejected};
pub use cards::play_card;
pub use content::{
    Card, ContentError, ContentTables, DefeatMessages, EventTone, GameEvent, Messages, Talent,
};
pub use controller::{GameController, SetupError};
pub use delta::{DeltaEntry, DeltaValue, ResourceDelta};
pub use draw::{draw_event, draw_night_actions, draw_work_hand};
pub use engine::{DefeatCause, DeltaOutcome, apply_delta, check_end_conditions};
pub use journal::{Journal, LogEntry, LogTone};
pub use resources::{ResourceKind, Resources};
pub use rng::{CountingRng, RandomSource, RngBundle, ScriptedRandom};
pub use rules::{InitialResources, RulesConfig, RulesError};
pub use schedule::{DeferredQueue, ScheduledTask, TransitionKind};
pub use state::{Defeat, GameState, Phase};

/// Trait for abstracting content and rules loading.
/// Platform-specific front ends provide the implementation.
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the card, event, talent, and message tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be read or parsed.
    fn load_content(&self) -> Result<ContentTables, Self::Error>;

    /// Load the rules configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules cannot be read or parsed.
    fn load_rules(&self) -> Result<RulesConfig, Self::Error>;
}

/// Loader serving the tables compiled into the crate with default rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedLoader;

impl DataLoader for EmbeddedLoader {
    type Error = serde_json::Error;

    fn load_content(&self) -> Result<ContentTables, Self::Error> {
        ContentTables::embedded()
    }

    fn load_rules(&self) -> Result<RulesConfig, Self::Error> {
        Ok(RulesConfig::default())
    }
}
