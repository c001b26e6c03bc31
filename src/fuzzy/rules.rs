//! The declarative rule base.
//!
//! Rules live in a flat table iterated generically by the engine rather than
//! as per-rule branches, which keeps the base trivially testable and lets a
//! decision report exactly which rules fired.

use serde::{Deserialize, Serialize};

use super::membership::{CongestionSet, EfficiencySet};

/// Output linguistic sets, each with a fixed representative adjustment
/// expressed as a signed fraction of the base green duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjustment {
    ReduceStrong,
    ReduceMild,
    Maintain,
    ExtendMild,
    ExtendStrong,
}

impl Adjustment {
    /// All output sets, ordered from strongest reduction to strongest extension.
    pub const ALL: [Adjustment; 5] = [
        Adjustment::ReduceStrong,
        Adjustment::ReduceMild,
        Adjustment::Maintain,
        Adjustment::ExtendMild,
        Adjustment::ExtendStrong,
    ];

    /// The representative green-time adjustment of this set, as a signed
    /// fraction (-0.30 to +0.30).
    pub const fn value(self) -> f64 {
        match self {
            Adjustment::ReduceStrong => -0.30,
            Adjustment::ReduceMild => -0.15,
            Adjustment::Maintain => 0.0,
            Adjustment::ExtendMild => 0.15,
            Adjustment::ExtendStrong => 0.30,
        }
    }

    /// Index of this set within [`Adjustment::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Adjustment::ReduceStrong => 0,
            Adjustment::ReduceMild => 1,
            Adjustment::Maintain => 2,
            Adjustment::ExtendMild => 3,
            Adjustment::ExtendStrong => 4,
        }
    }
}

/// Stable identifier of a rule in the base, for decision traces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleId(pub u8);

/// A congestion/efficiency inference rule. Antecedents combine with the MIN
/// operator; the rule contributes its firing strength to `output`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    /// Priority tier, 2 (severe congestion) through 4 (free flow). Tier 1 is
    /// the emergency override, which bypasses the table entirely.
    pub tier: u8,
    pub congestion: CongestionSet,
    pub efficiency: EfficiencySet,
    pub output: Adjustment,
}

/// The emergency override. When an emergency vehicle is present the
/// direction's output is pinned to [`Adjustment::ExtendStrong`] and the
/// congestion/efficiency rules are suppressed for that direction.
pub const EMERGENCY_RULE_ID: RuleId = RuleId(1);

const fn rule(
    id: u8,
    tier: u8,
    congestion: CongestionSet,
    efficiency: EfficiencySet,
    output: Adjustment,
) -> Rule {
    Rule {
        id: RuleId(id),
        tier,
        congestion,
        efficiency,
        output,
    }
}

/// The non-emergency rule base: every congestion × efficiency combination,
/// grouped by tier.
pub const RULES: [Rule; 9] = [
    // Tier 2: severe congestion.
    rule(2, 2, CongestionSet::High, EfficiencySet::Inefficient, Adjustment::ExtendStrong),
    rule(3, 2, CongestionSet::High, EfficiencySet::Moderate, Adjustment::ExtendMild),
    rule(4, 2, CongestionSet::High, EfficiencySet::HighlyEfficient, Adjustment::Maintain),
    // Tier 3: moderate congestion.
    rule(5, 3, CongestionSet::Medium, EfficiencySet::Inefficient, Adjustment::ExtendMild),
    rule(6, 3, CongestionSet::Medium, EfficiencySet::Moderate, Adjustment::Maintain),
    rule(7, 3, CongestionSet::Medium, EfficiencySet::HighlyEfficient, Adjustment::ReduceMild),
    // Tier 4: free flow.
    rule(8, 4, CongestionSet::Low, EfficiencySet::Inefficient, Adjustment::Maintain),
    rule(9, 4, CongestionSet::Low, EfficiencySet::Moderate, Adjustment::ReduceMild),
    rule(10, 4, CongestionSet::Low, EfficiencySet::HighlyEfficient, Adjustment::ReduceStrong),
];
