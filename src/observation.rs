use serde::{Deserialize, Serialize};

use crate::error::InvalidConfig;

/// Tolerance allowed on the sum of the four scoring weights.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// A snapshot of the raw traffic observables for one approach direction.
///
/// Produced fresh on every measurement cycle by a simulator, a video
/// pipeline or a test harness, and discarded after scoring. Units are fixed
/// by contract: metres, km/h, veh/min and a plain vehicle count. No unit
/// conversion happens inside the crate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Measured queue length in m.
    pub queue_length: f64,
    /// Average vehicle speed in km/h.
    pub avg_speed: f64,
    /// Vehicular flow in veh/min.
    pub flow: f64,
    /// Number of vehicles observed on the approach.
    pub vehicle_count: u32,
}

/// Normalization ceilings and weights for the congestion score.
///
/// Immutable per run. The weights must sum to 1.0 within
/// [`WEIGHT_SUM_TOLERANCE`] and every ceiling must be strictly positive;
/// [`ScoringParameters::validate`] rejects anything else.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringParameters {
    /// Queue length at which the queue term saturates, in m.
    pub max_queue_length: f64,
    /// Free-flow speed of the approach in km/h.
    pub free_flow_speed: f64,
    /// Saturation flow in veh/min.
    pub saturation_flow: f64,
    /// Vehicle count at which the density term saturates.
    ///
    /// Hosts that reason in jam density terms can derive this as
    /// `jam_density * lane_length`; any ceiling that yields a [0,1] density
    /// ratio is equivalent.
    pub max_vehicle_count: f64,
    /// Weight of the queue-length term.
    pub queue_weight: f64,
    /// Weight of the (inverted) speed term.
    pub speed_weight: f64,
    /// Weight of the flow term.
    pub flow_weight: f64,
    /// Weight of the density term.
    pub density_weight: f64,
}

impl ScoringParameters {
    /// Builds parameters with the density ceiling derived from a jam density
    /// (veh/m) and an effective lane length (m).
    pub fn from_jam_density(
        max_queue_length: f64,
        free_flow_speed: f64,
        saturation_flow: f64,
        jam_density: f64,
        lane_length: f64,
        weights: [f64; 4],
    ) -> Self {
        Self {
            max_queue_length,
            free_flow_speed,
            saturation_flow,
            max_vehicle_count: jam_density * lane_length,
            queue_weight: weights[0],
            speed_weight: weights[1],
            flow_weight: weights[2],
            density_weight: weights[3],
        }
    }

    /// Checks the weight-sum and ceiling invariants.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        let weights = [
            ("queue_weight", self.queue_weight),
            ("speed_weight", self.speed_weight),
            ("flow_weight", self.flow_weight),
            ("density_weight", self.density_weight),
        ];
        for (name, value) in weights {
            if value < 0.0 {
                return Err(InvalidConfig::NegativeWeight { name, value });
            }
        }

        let sum = self.queue_weight + self.speed_weight + self.flow_weight + self.density_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(InvalidConfig::WeightSum { sum });
        }

        let ceilings = [
            ("max_queue_length", self.max_queue_length),
            ("free_flow_speed", self.free_flow_speed),
            ("saturation_flow", self.saturation_flow),
            ("max_vehicle_count", self.max_vehicle_count),
        ];
        for (name, value) in ceilings {
            if value <= 0.0 {
                return Err(InvalidConfig::NonPositive { name, value });
            }
        }

        Ok(())
    }
}

impl Default for ScoringParameters {
    /// Urban arterial defaults: 150 m queue ceiling, 60 km/h free flow,
    /// 30 veh/min saturation, and a density ceiling equivalent to a
    /// 0.2 veh/m jam over a 200 m approach.
    fn default() -> Self {
        Self {
            max_queue_length: 150.0,
            free_flow_speed: 60.0,
            saturation_flow: 30.0,
            max_vehicle_count: 40.0,
            queue_weight: 0.35,
            speed_weight: 0.25,
            flow_weight: 0.25,
            density_weight: 0.15,
        }
    }
}
