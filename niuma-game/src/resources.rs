//! The player's resource vector and its per-resource bounds.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    CRITICAL_PERCENT, DEFAULT_DISPLAY_MAX, ENERGY_MAX, MONEY_DISPLAY_MAX, MONEY_FLOOR, STAT_MAX,
    STAT_MIN,
};
use crate::numbers::percent_of;

/// One of the seven tracked resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Money,
    Health,
    Sanity,
    Kpi,
    Energy,
    Stress,
    Reputation,
}

impl ResourceKind {
    pub const ALL: [Self; 7] = [
        Self::Money,
        Self::Health,
        Self::Sanity,
        Self::Kpi,
        Self::Energy,
        Self::Stress,
        Self::Reputation,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Money => "money",
            Self::Health => "health",
            Self::Sanity => "sanity",
            Self::Kpi => "kpi",
            Self::Energy => "energy",
            Self::Stress => "stress",
            Self::Reputation => "reputation",
        }
    }

    /// Inclusive lower bound; `None` upper bound means unbounded.
    #[must_use]
    pub const fn bounds(self) -> (i32, Option<i32>) {
        match self {
            Self::Money => (MONEY_FLOOR, None),
            Self::Energy => (STAT_MIN, Some(ENERGY_MAX)),
            Self::Health | Self::Sanity | Self::Kpi | Self::Stress | Self::Reputation => {
                (STAT_MIN, Some(STAT_MAX))
            }
        }
    }

    /// Clamp a raw value into this resource's legal range.
    #[must_use]
    pub fn clamp(self, value: i32) -> i32 {
        let (min, max) = self.bounds();
        let floored = value.max(min);
        max.map_or(floored, |max| floored.min(max))
    }

    /// Soft maximum the value is displayed against.
    #[must_use]
    pub const fn display_max(self) -> i32 {
        match self {
            Self::Money => MONEY_DISPLAY_MAX,
            Self::Energy => ENERGY_MAX,
            _ => DEFAULT_DISPLAY_MAX,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current value of every resource.
///
/// Fields are private so that only the resource engine changes them; reads go
/// through [`Resources::get`]. Deserialized values are clamped like
/// [`Resources::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawResources")]
pub struct Resources {
    money: i32,
    health: i32,
    sanity: i32,
    kpi: i32,
    energy: i32,
    stress: i32,
    reputation: i32,
}

#[derive(Deserialize)]
struct RawResources {
    money: i32,
    health: i32,
    sanity: i32,
    kpi: i32,
    energy: i32,
    stress: i32,
    reputation: i32,
}

impl From<RawResources> for Resources {
    fn from(raw: RawResources) -> Self {
        Self::new(
            raw.money,
            raw.health,
            raw.sanity,
            raw.kpi,
            raw.energy,
            raw.stress,
            raw.reputation,
        )
    }
}

impl Resources {
    /// Build a vector, clamping every value into its range.
    #[must_use]
    pub fn new(
        money: i32,
        health: i32,
        sanity: i32,
        kpi: i32,
        energy: i32,
        stress: i32,
        reputation: i32,
    ) -> Self {
        let mut resources = Self {
            money,
            health,
            sanity,
            kpi,
            energy,
            stress,
            reputation,
        };
        for kind in ResourceKind::ALL {
            let value = resources.get(kind);
            *resources.slot_mut(kind) = kind.clamp(value);
        }
        resources
    }

    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> i32 {
        match kind {
            ResourceKind::Money => self.money,
            ResourceKind::Health => self.health,
            ResourceKind::Sanity => self.sanity,
            ResourceKind::Kpi => self.kpi,
            ResourceKind::Energy => self.energy,
            ResourceKind::Stress => self.stress,
            ResourceKind::Reputation => self.reputation,
        }
    }

    const fn slot_mut(&mut self, kind: ResourceKind) -> &mut i32 {
        match kind {
            ResourceKind::Money => &mut self.money,
            ResourceKind::Health => &mut self.health,
            ResourceKind::Sanity => &mut self.sanity,
            ResourceKind::Kpi => &mut self.kpi,
            ResourceKind::Energy => &mut self.energy,
            ResourceKind::Stress => &mut self.stress,
            ResourceKind::Reputation => &mut self.reputation,
        }
    }

    /// Add `amount` to one resource and clamp. Returns the applied change.
    pub(crate) fn add_clamped(&mut self, kind: ResourceKind, amount: i32) -> i32 {
        let before = self.get(kind);
        let after = kind.clamp(before.saturating_add(amount));
        *self.slot_mut(kind) = after;
        after - before
    }

    /// Percentage of the display maximum, clamped to `0..=100`.
    #[must_use]
    pub fn display_percent(&self, kind: ResourceKind) -> i32 {
        percent_of(self.get(kind), kind.display_max())
    }

    /// Whether the resource sits in the danger band of its display range.
    #[must_use]
    pub fn is_critical(&self, kind: ResourceKind) -> bool {
        self.display_percent(kind) <= CRITICAL_PERCENT
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, i32)> + '_ {
        ResourceKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_clamps_out_of_range_values() {
        let resources = Resources::new(-5_000, 200, -1, 50, 12, 121, 0);
        assert_eq!(resources.get(ResourceKind::Money), MONEY_FLOOR);
        assert_eq!(resources.get(ResourceKind::Health), STAT_MAX);
        assert_eq!(resources.get(ResourceKind::Sanity), 0);
        assert_eq!(resources.get(ResourceKind::Energy), ENERGY_MAX);
        assert_eq!(resources.get(ResourceKind::Stress), STAT_MAX);
    }

    #[test]
    fn money_has_no_ceiling() {
        let mut resources = Resources::new(1_000, 80, 75, 20, 3, 20, 50);
        let applied = resources.add_clamped(ResourceKind::Money, 1_000_000);
        assert_eq!(applied, 1_000_000);
        assert_eq!(resources.get(ResourceKind::Money), 1_001_000);
    }

    #[test]
    fn add_reports_clamped_change() {
        let mut resources = Resources::new(100, 115, 75, 20, 7, 20, 50);
        assert_eq!(resources.add_clamped(ResourceKind::Health, 30), 5);
        assert_eq!(resources.add_clamped(ResourceKind::Energy, 4), 1);
        assert_eq!(resources.add_clamped(ResourceKind::Money, -5_000), -1_100);
    }

    #[test]
    fn display_percent_and_critical_band() {
        let resources = Resources::new(1_000, 80, 20, 21, 1, 20, 50);
        assert_eq!(resources.display_percent(ResourceKind::Money), 20);
        assert!(resources.is_critical(ResourceKind::Money));
        assert!(resources.is_critical(ResourceKind::Sanity));
        assert!(!resources.is_critical(ResourceKind::Kpi));
        assert!(resources.is_critical(ResourceKind::Energy));
        assert!(!resources.is_critical(ResourceKind::Health));
    }

    #[test]
    fn kind_uses_lowercase_name() {
        let kind: ResourceKind = serde_json::from_str(r#""kpi""#).unwrap();
        assert_eq!(kind, ResourceKind::Kpi);
        assert!(serde_json::from_str::<ResourceKind>(r#""mana""#).is_err());
        assert_eq!(ResourceKind::Reputation.to_string(), "reputation");
    }

    #[test]
    fn deserialized_values_are_clamped() {
        let json = r#"{"money": -9000, "health": 500, "sanity": 75, "kpi": -3,
            "energy": 99, "stress": 20, "reputation": 50}"#;
        let resources: Resources = serde_json::from_str(json).unwrap();
        assert_eq!(resources, Resources::new(-9_000, 500, 75, -3, 99, 20, 50));
        assert_eq!(resources.get(ResourceKind::Money), MONEY_FLOOR);
        assert_eq!(resources.get(ResourceKind::Health), STAT_MAX);
        assert_eq!(resources.get(ResourceKind::Kpi), 0);
        assert_eq!(resources.get(ResourceKind::Energy), ENERGY_MAX);
    }
}
