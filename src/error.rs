use thiserror::Error;

/// Raised when a structural precondition on a parameter set or timing
/// configuration is violated.
///
/// This is the crate's only error kind. Raw observations are never rejected;
/// out-of-range readings are clamped during scoring instead, since transient
/// sensor excursions must not halt a control loop. A configuration error, by
/// contrast, indicates a setup mistake and should stop the host before it
/// starts issuing green-time decisions.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InvalidConfig {
    /// The four scoring weights must sum to 1.0 within a tolerance of 1e-3.
    #[error("scoring weights must sum to 1.0, got {sum}")]
    WeightSum { sum: f64 },
    /// Scoring weights must be non-negative.
    #[error("scoring weight {name} must be non-negative, got {value}")]
    NegativeWeight { name: &'static str, value: f64 },
    /// Normalization ceilings and timing durations must be strictly positive.
    #[error("{name} must be strictly positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    /// The base green phases plus clearance intervals must fit in the cycle.
    #[error("green phases plus clearances need {required}s but the cycle is {cycle}s")]
    CycleOverrun { required: f64, cycle: f64 },
    /// The green safety bounds must satisfy `0 < min <= max`.
    #[error("green safety bounds are invalid: min {min}s, max {max}s")]
    GreenBounds { min: f64, max: f64 },
}
