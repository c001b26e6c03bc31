//! A registry-style host wrapper over the scorer and the fuzzy engine.
//!
//! The core functions are pure; this module gives a host application a
//! convenient place to keep per-intersection configuration and run a full
//! score-then-decide tick for one intersection. Configuration is validated at
//! registration time so a misconfigured intersection fails at startup, not
//! in the middle of a control loop.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::error::InvalidConfig;
use crate::fuzzy::{decide, FuzzyDecision, FuzzyInput};
use crate::observation::{Observation, ScoringParameters};
use crate::score::{score, CongestionResult};
use crate::timing::PhaseTimingConfig;
use crate::{IntersectionId, IntersectionSet};

/// Per-intersection configuration: scoring ceilings/weights plus the phase
/// timing plan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IntersectionConfig {
    pub scoring: ScoringParameters,
    pub timing: PhaseTimingConfig,
}

impl IntersectionConfig {
    /// Validates both halves of the configuration.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        self.scoring.validate()?;
        self.timing.validate()
    }
}

/// Measured inputs for one approach direction on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Approach {
    /// The raw observables for this direction.
    pub observation: Observation,
    /// Efficiency parameter in [0, 1]; see
    /// [`metrics::intensity_parameter`](crate::metrics::intensity_parameter).
    pub efficiency: f64,
    /// Whether an emergency vehicle is present.
    pub emergency: bool,
}

/// Everything one tick produced for one intersection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    /// Congestion scoring for the north-south direction.
    pub ns: CongestionResult,
    /// Congestion scoring for the east-west direction.
    pub eo: CongestionResult,
    /// The green-time decision for the pair.
    pub decision: FuzzyDecision,
}

/// Holds the registered intersections and evaluates control ticks.
///
/// The controller carries no mutable cross-tick state beyond the registered
/// configurations; each evaluation is an independent pure computation, so
/// intersections may be evaluated in any order or in parallel.
#[derive(Default)]
pub struct Controller {
    intersections: IntersectionSet,
}

impl Controller {
    /// Creates an empty controller.
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers an intersection, validating its configuration first.
    pub fn add_intersection(
        &mut self,
        config: IntersectionConfig,
    ) -> Result<IntersectionId, InvalidConfig> {
        config.validate()?;
        Ok(self.intersections.insert(config))
    }

    /// Removes an intersection, returning its configuration if it existed.
    pub fn remove_intersection(&mut self, id: IntersectionId) -> Option<IntersectionConfig> {
        self.intersections.remove(id)
    }

    /// Gets the configuration of an intersection.
    pub fn get_config(&self, id: IntersectionId) -> Option<&IntersectionConfig> {
        self.intersections.get(id)
    }

    /// Replaces an intersection's configuration, validating it first.
    pub fn set_config(
        &mut self,
        id: IntersectionId,
        config: IntersectionConfig,
    ) -> Result<(), InvalidConfig> {
        config.validate()?;
        if let Some(slot) = self.intersections.get_mut(id) {
            *slot = config;
        }
        Ok(())
    }

    /// Returns an iterator over all the registered intersections.
    pub fn iter_intersections(
        &self,
    ) -> impl Iterator<Item = (IntersectionId, &IntersectionConfig)> {
        self.intersections.iter()
    }

    /// Runs one control tick for an intersection: scores both approaches,
    /// then feeds the scores through the fuzzy engine.
    ///
    /// # Panics
    /// Panics if the intersection is not registered.
    pub fn evaluate(
        &self,
        id: IntersectionId,
        ns: &Approach,
        eo: &Approach,
    ) -> Result<TickOutcome, InvalidConfig> {
        let config = &self.intersections[id];

        let ns_result = score(&ns.observation, &config.scoring)?;
        let eo_result = score(&eo.observation, &config.scoring)?;

        let decision = decide(
            FuzzyInput {
                congestion: ns_result.score,
                efficiency: ns.efficiency,
                emergency: ns.emergency,
            },
            FuzzyInput {
                congestion: eo_result.score,
                efficiency: eo.efficiency,
                emergency: eo.emergency,
            },
            &config.timing,
        )?;

        Ok(TickOutcome {
            ns: ns_result,
            eo: eo_result,
            decision,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn approach(queue: f64, speed: f64, flow: f64, count: u32, efficiency: f64) -> Approach {
        Approach {
            observation: Observation {
                queue_length: queue,
                avg_speed: speed,
                flow,
                vehicle_count: count,
            },
            efficiency,
            emergency: false,
        }
    }

    #[test]
    fn registration_rejects_invalid_configs() {
        let mut controller = Controller::new();

        let mut bad_scoring = IntersectionConfig::default();
        bad_scoring.scoring.flow_weight = 0.5;
        assert!(controller.add_intersection(bad_scoring).is_err());

        let mut bad_timing = IntersectionConfig::default();
        bad_timing.timing.cycle = 0.0;
        assert!(controller.add_intersection(bad_timing).is_err());

        assert_eq!(controller.iter_intersections().count(), 0);
    }

    #[test]
    fn evaluate_scores_then_decides() {
        let mut controller = Controller::new();
        let id = controller
            .add_intersection(IntersectionConfig::default())
            .unwrap();

        let congested = approach(120.0, 8.0, 27.0, 38, 0.2);
        let free = approach(8.0, 52.0, 6.0, 4, 0.9);
        let outcome = controller.evaluate(id, &congested, &free).unwrap();

        assert!(outcome.ns.score > outcome.eo.score);
        assert!(outcome.decision.ns.green > outcome.decision.eo.green);
        assert!(outcome.decision.ns.adjustment > 0.0);
        assert!(outcome.decision.eo.adjustment < 0.0);
    }

    #[test]
    fn evaluation_is_deterministic_across_ticks() {
        let mut controller = Controller::new();
        let id = controller
            .add_intersection(IntersectionConfig::default())
            .unwrap();

        let ns = approach(60.0, 22.0, 18.0, 25, 0.4);
        let eo = approach(30.0, 35.0, 12.0, 12, 0.6);
        let first = controller.evaluate(id, &ns, &eo).unwrap();
        let second = controller.evaluate(id, &ns, &eo).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn removed_intersections_release_their_config() {
        let mut controller = Controller::new();
        let id = controller
            .add_intersection(IntersectionConfig::default())
            .unwrap();
        assert!(controller.get_config(id).is_some());

        let config = controller.remove_intersection(id).unwrap();
        assert_eq!(config, IntersectionConfig::default());
        assert!(controller.get_config(id).is_none());
    }
}
