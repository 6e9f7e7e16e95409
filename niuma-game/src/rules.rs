//! Tunable rules: starting values, daily upkeep, pool sizes, pacing delays.
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::constants::{
    DEFAULT_DAILY_ENERGY, DEFAULT_HAND_SIZE, DEFAULT_LOG_CAPACITY, DEFAULT_NIGHTLY_STRESS,
    DEFAULT_RENT, DEFAULT_SLEEP_DELAY_MS, DEFAULT_START_DAY_DELAY_MS, ENERGY_MAX,
};
use crate::resources::{ResourceKind, Resources};

/// Starting resource values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialResources {
    pub money: i32,
    pub health: i32,
    pub sanity: i32,
    pub kpi: i32,
    pub energy: i32,
    pub stress: i32,
    pub reputation: i32,
}

impl Default for InitialResources {
    fn default() -> Self {
        Self {
            money: 1_000,
            health: 80,
            sanity: 75,
            kpi: 20,
            energy: 3,
            stress: 20,
            reputation: 50,
        }
    }
}

impl InitialResources {
    #[must_use]
    pub fn to_resources(self) -> Resources {
        Resources::new(
            self.money,
            self.health,
            self.sanity,
            self.kpi,
            self.energy,
            self.stress,
            self.reputation,
        )
    }
}

/// Rules shared by every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub initial: InitialResources,
    /// Money charged at every settlement.
    #[serde(default = "RulesConfig::default_rent")]
    pub rent: i32,
    /// Stress added at every settlement.
    #[serde(default = "RulesConfig::default_nightly_stress")]
    pub nightly_stress: i32,
    /// Energy value set at the start of each work day.
    #[serde(default = "RulesConfig::default_daily_energy")]
    pub daily_energy: i32,
    #[serde(default = "RulesConfig::default_pool_size")]
    pub hand_size: usize,
    #[serde(default = "RulesConfig::default_pool_size")]
    pub night_pool_size: usize,
    #[serde(default = "RulesConfig::default_log_capacity")]
    pub log_capacity: usize,
    #[serde(default = "RulesConfig::default_start_day_delay_ms")]
    pub start_day_delay_ms: u64,
    #[serde(default = "RulesConfig::default_sleep_delay_ms")]
    pub sleep_delay_ms: u64,
}

impl RulesConfig {
    const fn default_rent() -> i32 {
        DEFAULT_RENT
    }

    const fn default_nightly_stress() -> i32 {
        DEFAULT_NIGHTLY_STRESS
    }

    const fn default_daily_energy() -> i32 {
        DEFAULT_DAILY_ENERGY
    }

    const fn default_pool_size() -> usize {
        DEFAULT_HAND_SIZE
    }

    const fn default_log_capacity() -> usize {
        DEFAULT_LOG_CAPACITY
    }

    const fn default_start_day_delay_ms() -> u64 {
        DEFAULT_START_DAY_DELAY_MS
    }

    const fn default_sleep_delay_ms() -> u64 {
        DEFAULT_SLEEP_DELAY_MS
    }

    /// Load rules from JSON; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub const fn start_day_delay(&self) -> Duration {
        Duration::from_millis(self.start_day_delay_ms)
    }

    #[must_use]
    pub const fn sleep_delay(&self) -> Duration {
        Duration::from_millis(self.sleep_delay_ms)
    }

    /// Check that the rules describe a playable game.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.rent < 0 {
            return Err(RulesError::MinViolation {
                field: "rent",
                min: 0,
                value: i64::from(self.rent),
            });
        }
        if self.nightly_stress < 0 {
            return Err(RulesError::MinViolation {
                field: "nightly_stress",
                min: 0,
                value: i64::from(self.nightly_stress),
            });
        }
        if !(0..=ENERGY_MAX).contains(&self.daily_energy) {
            return Err(RulesError::RangeViolation {
                field: "daily_energy",
                min: 0,
                max: i64::from(ENERGY_MAX),
                value: i64::from(self.daily_energy),
            });
        }
        for (field, size) in [
            ("hand_size", self.hand_size),
            ("night_pool_size", self.night_pool_size),
            ("log_capacity", self.log_capacity),
        ] {
            if size == 0 {
                return Err(RulesError::MinViolation {
                    field,
                    min: 1,
                    value: 0,
                });
            }
        }
        let start = self.initial.to_resources();
        for kind in [
            ResourceKind::Money,
            ResourceKind::Health,
            ResourceKind::Sanity,
            ResourceKind::Kpi,
        ] {
            if start.get(kind) <= 0 {
                return Err(RulesError::StartsDefeated { resource: kind });
            }
        }
        Ok(())
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            initial: InitialResources::default(),
            rent: Self::default_rent(),
            nightly_stress: Self::default_nightly_stress(),
            daily_energy: Self::default_daily_energy(),
            hand_size: Self::default_pool_size(),
            night_pool_size: Self::default_pool_size(),
            log_capacity: Self::default_log_capacity(),
            start_day_delay_ms: Self::default_start_day_delay_ms(),
            sleep_delay_ms: Self::default_sleep_delay_ms(),
        }
    }
}

/// Errors raised when rules invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: i64,
        value: i64,
    },
    #[error("{field} must be within [{min}, {max}] (got {value})")]
    RangeViolation {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("starting {resource} would end the game before it begins")]
    StartsDefeated { resource: ResourceKind },
}
