//! Resource deltas: the single currency every state change is expressed in.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::resources::ResourceKind;
use crate::rng::RandomSource;

/// Amount applied to a resource, either fixed or decided at application time.
///
/// Deserializes from a bare integer (`12`) or a chance object
/// (`{"chance": 0.1, "hit": 500, "miss": 0}`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeltaValue {
    Fixed(i32),
    Chance {
        /// Probability in `[0, 1]` of applying `hit`.
        chance: f64,
        hit: i32,
        /// Applied on a miss; absent means the entry is skipped.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        miss: Option<i32>,
    },
}

impl DeltaValue {
    /// Resolve to a concrete amount. `None` means the entry is skipped.
    pub fn resolve(&self, rng: &mut dyn RandomSource) -> Option<i32> {
        match *self {
            Self::Fixed(amount) => Some(amount),
            Self::Chance { chance, hit, miss } => {
                if rng.roll_unit() < chance {
                    Some(hit)
                } else {
                    miss
                }
            }
        }
    }

    /// Amount shown on a card face; random gains have no fixed preview.
    #[must_use]
    pub const fn preview(&self) -> Option<i32> {
        match *self {
            Self::Fixed(amount) => Some(amount),
            Self::Chance { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_random(&self) -> bool {
        matches!(self, Self::Chance { .. })
    }
}

impl From<i32> for DeltaValue {
    fn from(value: i32) -> Self {
        Self::Fixed(value)
    }
}

/// One `(resource, amount)` entry of a delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaEntry {
    pub resource: ResourceKind,
    pub value: DeltaValue,
}

/// Ordered list of resource changes applied as one transaction.
///
/// Entries are resolved in order; a resource listed twice is changed twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceDelta(SmallVec<[DeltaEntry; 4]>);

impl ResourceDelta {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    #[must_use]
    pub fn with(mut self, resource: ResourceKind, value: impl Into<DeltaValue>) -> Self {
        self.push(resource, value);
        self
    }

    pub fn push(&mut self, resource: ResourceKind, value: impl Into<DeltaValue>) {
        self.0.push(DeltaEntry {
            resource,
            value: value.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeltaEntry> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve every entry up front, before any of them is applied, so all
    /// amounts are decided against the pre-delta state.
    pub fn resolve(&self, rng: &mut dyn RandomSource) -> Vec<(ResourceKind, i32)> {
        self.0
            .iter()
            .filter_map(|entry| {
                entry
                    .value
                    .resolve(rng)
                    .map(|amount| (entry.resource, amount))
            })
            .collect()
    }
}

impl FromIterator<(ResourceKind, DeltaValue)> for ResourceDelta {
    fn from_iter<I: IntoIterator<Item = (ResourceKind, DeltaValue)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(resource, value)| DeltaEntry { resource, value })
                .collect(),
        )
    }
}
