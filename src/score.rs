//! The congestion scorer.
//!
//! Collapses the four raw observables of an approach into a single bounded
//! congestion score with a three-tier classification. Pure and stateless:
//! identical inputs always produce identical output.

use serde::{Deserialize, Serialize};

use crate::error::InvalidConfig;
use crate::observation::{Observation, ScoringParameters};

/// Scores at or above this threshold classify as at least [`CongestionLevel::Medium`].
pub const MEDIUM_THRESHOLD: f64 = 0.3;

/// Scores at or above this threshold classify as [`CongestionLevel::High`].
pub const HIGH_THRESHOLD: f64 = 0.6;

/// Three-tier congestion classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
}

/// Advisory display colour associated with a congestion level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvisoryColor {
    Green,
    Yellow,
    Red,
}

impl CongestionLevel {
    /// Classifies a score against the fixed thresholds.
    ///
    /// Bands are half-open on the lower bound: exactly 0.3 is `Medium` and
    /// exactly 0.6 is `High`.
    pub fn from_score(score: f64) -> Self {
        if score < MEDIUM_THRESHOLD {
            CongestionLevel::Low
        } else if score < HIGH_THRESHOLD {
            CongestionLevel::Medium
        } else {
            CongestionLevel::High
        }
    }

    /// The advisory colour for this level.
    pub fn color(self) -> AdvisoryColor {
        match self {
            CongestionLevel::Low => AdvisoryColor::Green,
            CongestionLevel::Medium => AdvisoryColor::Yellow,
            CongestionLevel::High => AdvisoryColor::Red,
        }
    }
}

/// The weighted contribution of each observable to a score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub queue: f64,
    pub speed: f64,
    pub flow: f64,
    pub density: f64,
}

/// The result of scoring one observation.
///
/// `level` and `color` are pure functions of `score`; they are carried here
/// so telemetry sinks get a self-contained record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CongestionResult {
    /// The congestion score, clamped to [0, 1].
    pub score: f64,
    /// The three-tier classification of the score.
    pub level: CongestionLevel,
    /// The advisory colour for the classification.
    pub color: AdvisoryColor,
    /// Per-observable weighted contributions.
    pub components: ScoreComponents,
}

/// Score deltas produced by perturbing one observable at a time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sensitivity {
    /// The unperturbed score.
    pub base: f64,
    /// Score change from scaling the queue length by `1 + fraction`.
    pub queue_delta: f64,
    /// Score change from scaling the average speed by `1 + fraction`.
    pub speed_delta: f64,
    /// Score change from scaling the flow by `1 + fraction`.
    pub flow_delta: f64,
}

fn clamp_unit(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Computes the congestion score for one observation.
///
/// Each observable is normalized against its ceiling and clamped to [0, 1]
/// before weighting, so transiently out-of-range readings (a speed briefly
/// above free flow, a queue past the nominal maximum) degrade gracefully
/// instead of failing. The weighted sum is clamped once more against
/// floating-point drift.
///
/// Fails with [`InvalidConfig`] when `params` violates the weight-sum or
/// ceiling invariants; observations themselves are never rejected.
pub fn score(
    obs: &Observation,
    params: &ScoringParameters,
) -> Result<CongestionResult, InvalidConfig> {
    params.validate()?;

    let queue_term = clamp_unit(obs.queue_length / params.max_queue_length);
    // Congestion rises as speed drops toward zero.
    let speed_term = clamp_unit(1.0 - obs.avg_speed / params.free_flow_speed);
    let flow_term = clamp_unit(obs.flow / params.saturation_flow);
    let density_term = clamp_unit(f64::from(obs.vehicle_count) / params.max_vehicle_count);

    let components = ScoreComponents {
        queue: params.queue_weight * queue_term,
        speed: params.speed_weight * speed_term,
        flow: params.flow_weight * flow_term,
        density: params.density_weight * density_term,
    };

    let score = clamp_unit(components.queue + components.speed + components.flow + components.density);
    let level = CongestionLevel::from_score(score);

    log::debug!(
        "congestion score {:.3} ({:?}): queue {:.3}, speed {:.3}, flow {:.3}, density {:.3}",
        score,
        level,
        components.queue,
        components.speed,
        components.flow,
        components.density,
    );

    Ok(CongestionResult {
        score,
        level,
        color: level.color(),
        components,
    })
}

/// Measures how the score responds to small perturbations of the queue,
/// speed and flow observables, each scaled by `1 + fraction` in turn.
pub fn sensitivity(
    obs: &Observation,
    params: &ScoringParameters,
    fraction: f64,
) -> Result<Sensitivity, InvalidConfig> {
    let base = score(obs, params)?.score;

    let perturbed = |obs: Observation| -> Result<f64, InvalidConfig> { Ok(score(&obs, params)?.score) };

    let queue_delta = perturbed(Observation {
        queue_length: obs.queue_length * (1.0 + fraction),
        ..*obs
    })? - base;
    let speed_delta = perturbed(Observation {
        avg_speed: obs.avg_speed * (1.0 + fraction),
        ..*obs
    })? - base;
    let flow_delta = perturbed(Observation {
        flow: obs.flow * (1.0 + fraction),
        ..*obs
    })? - base;

    Ok(Sensitivity {
        base,
        queue_delta,
        speed_delta,
        flow_delta,
    })
}
