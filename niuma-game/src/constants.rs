//! Centralized bounds and tuning constants for Niuma game logic.
//!
//! Balance values that designers are expected to tweak (starting resources,
//! rent, delays) live in [`crate::rules::RulesConfig`]; the values here are
//! structural limits of the resource model.

// Resource bounds ----------------------------------------------------------
pub(crate) const MONEY_FLOOR: i32 = -1_000;
pub(crate) const STAT_MIN: i32 = 0;
pub(crate) const STAT_MAX: i32 = 120;
pub(crate) const ENERGY_MAX: i32 = 8;

// Display model ------------------------------------------------------------
pub(crate) const MONEY_DISPLAY_MAX: i32 = 5_000;
pub(crate) const DEFAULT_DISPLAY_MAX: i32 = 100;
pub(crate) const CRITICAL_PERCENT: i32 = 20;

// Rules defaults -----------------------------------------------------------
pub(crate) const DEFAULT_RENT: i32 = 120;
pub(crate) const DEFAULT_NIGHTLY_STRESS: i32 = 2;
pub(crate) const DEFAULT_DAILY_ENERGY: i32 = 3;
pub(crate) const DEFAULT_HAND_SIZE: usize = 3;
pub(crate) const DEFAULT_LOG_CAPACITY: usize = 50;
pub(crate) const DEFAULT_START_DAY_DELAY_MS: u64 = 1_000;
pub(crate) const DEFAULT_SLEEP_DELAY_MS: u64 = 1_500;

// RNG stream tags ----------------------------------------------------------
pub(crate) const STREAM_DRAW: &[u8] = b"draw";
pub(crate) const STREAM_EVENT: &[u8] = b"event";
pub(crate) const STREAM_GAIN: &[u8] = b"gain";
