//! Core of an adaptive traffic-signal controller: a deterministic congestion
//! scorer and a Mamdani-style fuzzy engine that turns congestion, efficiency
//! and emergency inputs into balanced green-phase durations.
//!
//! Both halves are pure, synchronous and stateless; the surrounding control
//! loop owns scheduling, actuation and persistence.

pub use controller::{Approach, Controller, IntersectionConfig, TickOutcome};
pub use error::InvalidConfig;
pub use fuzzy::{decide, Adjustment, DirectionOutcome, FuzzyDecision, FuzzyInput};
pub use observation::{Observation, ScoringParameters};
pub use score::{score, sensitivity, AdvisoryColor, CongestionLevel, CongestionResult};
pub use timing::{BalancedPhases, PhaseTimingConfig};
pub use util::Interval;

use slotmap::{new_key_type, SlotMap};

mod controller;
mod error;
pub mod fuzzy;
pub mod metrics;
mod observation;
mod score;
mod timing;
mod util;

new_key_type! {
    /// Unique ID of an intersection registered with a [Controller].
    pub struct IntersectionId;
}

type IntersectionSet = SlotMap<IntersectionId, IntersectionConfig>;
