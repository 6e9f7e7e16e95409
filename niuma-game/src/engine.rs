//! Resource engine: applies deltas with clamping and evaluates end conditions.
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::delta::ResourceDelta;
use crate::resources::{ResourceKind, Resources};
use crate::rng::RandomSource;

/// Why a run ended. Variants are listed in evaluation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefeatCause {
    /// Money at or below zero.
    Bankrupt,
    /// Health at or below zero.
    Overwork,
    /// Sanity at or below zero.
    Breakdown,
    /// KPI at or below zero.
    Fired,
}

impl DefeatCause {
    pub const PRIORITY: [Self; 4] = [Self::Bankrupt, Self::Overwork, Self::Breakdown, Self::Fired];

    /// Resource whose depletion triggers this cause.
    #[must_use]
    pub const fn resource(self) -> ResourceKind {
        match self {
            Self::Bankrupt => ResourceKind::Money,
            Self::Overwork => ResourceKind::Health,
            Self::Breakdown => ResourceKind::Sanity,
            Self::Fired => ResourceKind::Kpi,
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Bankrupt => "bankrupt",
            Self::Overwork => "overwork",
            Self::Breakdown => "breakdown",
            Self::Fired => "fired",
        }
    }
}

impl fmt::Display for DefeatCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// First end condition met by `resources`, in priority order.
#[must_use]
pub fn check_end_conditions(resources: &Resources) -> Option<DefeatCause> {
    DefeatCause::PRIORITY
        .into_iter()
        .find(|cause| resources.get(cause.resource()) <= 0)
}

/// Result of one delta transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaOutcome {
    pub resources: Resources,
    /// Post-clamp change per applied entry, in application order.
    pub applied: Vec<(ResourceKind, i32)>,
    /// End condition evaluated on the fully-updated vector.
    pub defeat: Option<DefeatCause>,
}

/// Apply `delta` to a copy of `resources`.
///
/// Every entry is resolved before any is applied, then each is added and
/// clamped in order. End conditions are checked once, after the last entry.
pub fn apply_delta(
    resources: &Resources,
    delta: &ResourceDelta,
    rng: &mut dyn RandomSource,
) -> DeltaOutcome {
    let resolved = delta.resolve(rng);
    let mut next = *resources;
    let applied = resolved
        .into_iter()
        .map(|(kind, amount)| {
            let change = next.add_clamped(kind, amount);
            trace!("delta {kind}: requested {amount:+}, applied {change:+}");
            (kind, change)
        })
        .collect();
    DeltaOutcome {
        defeat: check_end_conditions(&next),
        resources: next,
        applied,
    }
}
