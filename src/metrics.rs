//! Derivation of traffic observables from per-vehicle samples.
//!
//! Upstream producers (a simulator or a video pipeline) typically hold raw
//! per-vehicle speeds and crossing counts rather than the aggregate fields an
//! [`Observation`](crate::Observation) wants. These helpers perform that
//! aggregation, including the efficiency parameter the fuzzy engine takes as
//! its secondary input. All of them are pure and clamp rather than fail.

/// Speed below which a vehicle counts as stopped, in km/h.
pub const STOPPED_EPSILON: f64 = 2.0;

/// Small constant guarding the intensity quotient against an empty
/// stopped-vehicle count.
pub const INTENSITY_DELTA: f64 = 0.1;

/// Counts the vehicles whose speed is below `epsilon` km/h.
pub fn stopped_count(speeds: &[f64], epsilon: f64) -> usize {
    speeds.iter().filter(|v| **v < epsilon).count()
}

/// Mean speed of the vehicles that are actually moving (speed >= `epsilon`).
///
/// Returns 0.0 when nothing is moving, which reads as a full standstill.
pub fn moving_average_speed(speeds: &[f64], epsilon: f64) -> f64 {
    let moving: Vec<f64> = speeds.iter().copied().filter(|v| *v >= epsilon).collect();
    if moving.is_empty() {
        return 0.0;
    }
    moving.iter().sum::<f64>() / moving.len() as f64
}

/// Vehicular flow in veh/min from a crossing count over `[t0, t1]` seconds.
///
/// A non-positive interval yields 0.0 rather than a division blow-up.
pub fn vehicular_flow(crossed: u32, t0: f64, t1: f64) -> f64 {
    let dt = t1 - t0;
    if dt <= 0.0 {
        return 0.0;
    }
    f64::from(crossed) / dt * 60.0
}

/// Vehicle density in veh/m over an effective lane length in m.
pub fn vehicle_density(count: u32, lane_length: f64) -> f64 {
    if lane_length <= 0.0 {
        return 0.0;
    }
    f64::from(count) / lane_length
}

/// The efficiency (intensity) parameter: how well the observed flow is being
/// served, normalized to [0, 1].
///
/// The raw quotient `avg_moving_speed / (stopped + delta)` grows without
/// bound when nothing is stopped, so it is referenced against the free-flow
/// speed and clamped: a direction moving at free-flow speed with no stopped
/// vehicles reads 1.0, a saturated standstill reads 0.0.
pub fn intensity_parameter(
    avg_moving_speed: f64,
    stopped: usize,
    free_flow_speed: f64,
    delta: f64,
) -> f64 {
    if free_flow_speed <= 0.0 {
        return 0.0;
    }
    let quotient = avg_moving_speed / (stopped as f64 + delta.max(f64::EPSILON));
    (quotient / free_flow_speed).clamp(0.0, 1.0)
}
