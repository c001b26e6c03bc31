//! The fuzzy decision engine.
//!
//! A Mamdani-style pipeline run once per decision for each of the two
//! perpendicular directions: fuzzification, MIN rule evaluation, MAX
//! aggregation over the output sets, centroid defuzzification, and finally
//! the cycle-balancing step shared by both directions. Pure and stateless;
//! callers may invoke it concurrently without synchronization.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::InvalidConfig;
use crate::timing::PhaseTimingConfig;
use crate::util::Interval;

pub use membership::{
    fuzzify_congestion, fuzzify_efficiency, CongestionDegrees, CongestionSet, EfficiencyDegrees,
    EfficiencySet, MembershipFn,
};
pub use rules::{Adjustment, Rule, RuleId, EMERGENCY_RULE_ID, RULES};

pub mod membership;
pub mod rules;

/// The range of defuzzified adjustments, bounded by the extreme output sets.
pub const ADJUSTMENT_RANGE: Interval<f64> = Interval::new(-0.30, 0.30);

/// Crisp inputs for one direction of a decision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuzzyInput {
    /// Congestion score in [0, 1], typically from [`score`](crate::score()).
    pub congestion: f64,
    /// Efficiency parameter in [0, 1]; higher means the observed flow is
    /// being served better.
    pub efficiency: f64,
    /// Whether an emergency vehicle is present on this direction.
    pub emergency: bool,
}

/// One rule's contribution to a decision, for traceability.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiredRule {
    pub id: RuleId,
    pub strength: f64,
    pub output: Adjustment,
}

/// The per-direction outcome of a decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionOutcome {
    /// The defuzzified green-time adjustment, a signed fraction in
    /// [`ADJUSTMENT_RANGE`].
    pub adjustment: f64,
    /// The adjusted green before cycle balancing, in s.
    pub unbalanced_green: f64,
    /// The final green after cycle balancing, in s.
    pub green: f64,
    /// The rules that fired for this direction, strongest tier first.
    pub fired: SmallVec<[FiredRule; 10]>,
}

/// A complete green-time decision for one intersection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuzzyDecision {
    pub ns: DirectionOutcome,
    pub eo: DirectionOutcome,
    /// The proportional cycle-squeeze factor; 1.0 when no squeeze was needed.
    pub balance_factor: f64,
}

/// Computes the green-time decision for both directions of an intersection.
///
/// `timing` is validated before any fuzzy computation; an invalid
/// configuration is a setup error and propagates immediately. The stages then
/// run in order for each direction, and the balancing constraint is applied to
/// the pair.
pub fn decide(
    ns: FuzzyInput,
    eo: FuzzyInput,
    timing: &PhaseTimingConfig,
) -> Result<FuzzyDecision, InvalidConfig> {
    timing.validate()?;

    let (adjustment_ns, fired_ns) = infer(ns);
    let (adjustment_eo, fired_eo) = infer(eo);

    let balanced = timing.balance(adjustment_ns, adjustment_eo);

    log::debug!(
        "decision: NS {:+.0}% -> {:.1}s, EO {:+.0}% -> {:.1}s (factor {:.3})",
        100.0 * adjustment_ns,
        balanced.green_ns,
        100.0 * adjustment_eo,
        balanced.green_eo,
        balanced.factor,
    );

    Ok(FuzzyDecision {
        ns: DirectionOutcome {
            adjustment: adjustment_ns,
            unbalanced_green: balanced.unbalanced_ns,
            green: balanced.green_ns,
            fired: fired_ns,
        },
        eo: DirectionOutcome {
            adjustment: adjustment_eo,
            unbalanced_green: balanced.unbalanced_eo,
            green: balanced.green_eo,
            fired: fired_eo,
        },
        balance_factor: balanced.factor,
    })
}

/// Runs fuzzification, rule evaluation, aggregation and defuzzification for
/// one direction.
fn infer(input: FuzzyInput) -> (f64, SmallVec<[FiredRule; 10]>) {
    let mut fired = SmallVec::new();

    // Tier 1: an emergency pins the output to the strongest extension and
    // suppresses the congestion/efficiency rules for this direction.
    if input.emergency {
        fired.push(FiredRule {
            id: EMERGENCY_RULE_ID,
            strength: 1.0,
            output: Adjustment::ExtendStrong,
        });
        return (Adjustment::ExtendStrong.value(), fired);
    }

    let congestion = fuzzify_congestion(input.congestion);
    let efficiency = fuzzify_efficiency(input.efficiency);

    // MIN over antecedents, MAX-aggregated per output set.
    let mut aggregated = [0.0f64; Adjustment::ALL.len()];
    for rule in &RULES {
        let strength = congestion
            .get(rule.congestion)
            .min(efficiency.get(rule.efficiency));
        if strength > 0.0 {
            let slot = &mut aggregated[rule.output.index()];
            *slot = slot.max(strength);
            fired.push(FiredRule {
                id: rule.id,
                strength,
                output: rule.output,
            });
        }
    }

    (defuzzify(&aggregated), fired)
}

/// Centroid defuzzification: the membership-weighted average of the output
/// sets' representative values. An empty aggregation defaults to no
/// adjustment.
fn defuzzify(aggregated: &[f64; 5]) -> f64 {
    let weight: f64 = aggregated.iter().sum();
    if weight <= 0.0 {
        return Adjustment::Maintain.value();
    }
    let moment: f64 = Adjustment::ALL
        .iter()
        .map(|set| aggregated[set.index()] * set.value())
        .sum();
    ADJUSTMENT_RANGE.clamp(moment / weight)
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use itertools::iproduct;

    fn input(congestion: f64, efficiency: f64, emergency: bool) -> FuzzyInput {
        FuzzyInput {
            congestion,
            efficiency,
            emergency,
        }
    }

    /// A grid of crisp inputs spanning the whole input space, including the
    /// set boundaries.
    fn unit_grid() -> Vec<f64> {
        (0..=10).map(|i| i as f64 / 10.0).collect()
    }

    #[test]
    fn severe_congestion_against_free_flow() {
        let timing = PhaseTimingConfig::default();
        let decision = decide(
            input(0.75, 0.25, false),
            input(0.20, 0.85, false),
            &timing,
        )
        .unwrap();

        // NS sits fully in High/Inefficient: strong extension.
        assert_approx_eq!(decision.ns.adjustment, 0.30);
        assert_approx_eq!(decision.ns.green, 39.0);
        assert_eq!(decision.ns.fired.len(), 1);
        assert_eq!(decision.ns.fired[0].output, Adjustment::ExtendStrong);

        // EO sits fully in Low/HighlyEfficient: strong reduction.
        assert_approx_eq!(decision.eo.adjustment, -0.30);
        assert_approx_eq!(decision.eo.green, 21.0);
        assert_eq!(decision.eo.fired[0].output, Adjustment::ReduceStrong);

        // 39 + 21 + 10 fits a 90 s cycle without a squeeze.
        assert_eq!(decision.balance_factor, 1.0);
    }

    #[test]
    fn emergency_pins_the_adjustment_to_the_maximum() {
        let timing = PhaseTimingConfig::default();
        for (congestion, efficiency) in iproduct!(unit_grid(), unit_grid()) {
            let decision = decide(
                input(congestion, efficiency, true),
                input(0.5, 0.5, false),
                &timing,
            )
            .unwrap();
            assert_eq!(decision.ns.adjustment, 0.30);
            assert_eq!(decision.ns.fired.len(), 1);
            assert_eq!(decision.ns.fired[0].id, EMERGENCY_RULE_ID);
        }
    }

    #[test]
    fn emergency_dominates_the_plain_outcome() {
        let timing = PhaseTimingConfig::default();
        for (congestion, efficiency) in iproduct!(unit_grid(), unit_grid()) {
            let plain = decide(
                input(congestion, efficiency, false),
                input(0.5, 0.5, false),
                &timing,
            )
            .unwrap();
            let urgent = decide(
                input(congestion, efficiency, true),
                input(0.5, 0.5, false),
                &timing,
            )
            .unwrap();
            assert!(urgent.ns.adjustment >= plain.ns.adjustment);
        }
    }

    #[test]
    fn adjustments_stay_within_the_output_range() {
        let timing = PhaseTimingConfig::default();
        for (congestion, efficiency) in iproduct!(unit_grid(), unit_grid()) {
            let decision = decide(
                input(congestion, efficiency, false),
                input(1.0 - congestion, efficiency, false),
                &timing,
            )
            .unwrap();
            assert!(ADJUSTMENT_RANGE.contains(decision.ns.adjustment));
            assert!(ADJUSTMENT_RANGE.contains(decision.eo.adjustment));
        }
    }

    #[test]
    fn cycle_constraint_holds_after_every_decision() {
        let timing = PhaseTimingConfig {
            green_ns: 38.0,
            green_eo: 38.0,
            ..PhaseTimingConfig::default()
        };
        for (congestion_ns, congestion_eo) in iproduct!(unit_grid(), unit_grid()) {
            let decision = decide(
                input(congestion_ns, 0.2, false),
                input(congestion_eo, 0.2, false),
                &timing,
            )
            .unwrap();
            let total = decision.ns.green + decision.eo.green + timing.clearance();
            assert!(total <= timing.cycle + 1e-9);
        }
    }

    #[test]
    fn decisions_are_idempotent() {
        let timing = PhaseTimingConfig::default();
        let ns = input(0.47, 0.61, false);
        let eo = input(0.33, 0.18, true);
        let first = decide(ns, eo, &timing).unwrap();
        let second = decide(ns, eo, &timing).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_timing_fails_before_inference() {
        let timing = PhaseTimingConfig {
            amber: 0.0,
            ..PhaseTimingConfig::default()
        };
        assert!(matches!(
            decide(input(0.5, 0.5, false), input(0.5, 0.5, false), &timing),
            Err(InvalidConfig::NonPositive { name: "amber", .. })
        ));
    }

    #[test]
    fn boundary_scores_blend_adjacent_rules() {
        // At 0.3 congestion, Low and Medium both hold 0.5 membership, so with
        // an inefficient approach both Maintain (tier 4) and ExtendMild
        // (tier 3) fire and the centroid lands between their values.
        let (adjustment, fired) = infer(input(0.3, 0.1, false));
        assert_eq!(fired.len(), 2);
        assert_approx_eq!(adjustment, 0.075);
    }

    #[test]
    fn empty_aggregation_defaults_to_maintain() {
        assert_eq!(defuzzify(&[0.0; 5]), 0.0);
    }

    #[test]
    fn defuzzification_is_a_weighted_centroid() {
        let mut aggregated = [0.0; 5];
        aggregated[Adjustment::ExtendStrong.index()] = 0.6;
        aggregated[Adjustment::Maintain.index()] = 0.2;
        assert_approx_eq!(defuzzify(&aggregated), (0.6 * 0.30) / 0.8);
    }
}
