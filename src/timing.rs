//! Signal-cycle timing and the green-time balancing constraint.

use serde::{Deserialize, Serialize};

use crate::error::InvalidConfig;
use crate::util::Interval;

/// Base phase durations for one intersection's two perpendicular directions.
///
/// Owned by the host control loop and passed into each decision; the engine
/// never mutates it. [`PhaseTimingConfig::validate`] enforces that every
/// duration is strictly positive and that the base greens plus clearance
/// intervals fit inside the cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimingConfig {
    /// Base green duration for the north-south direction, in s.
    pub green_ns: f64,
    /// Base green duration for the east-west direction, in s.
    pub green_eo: f64,
    /// Total cycle time, in s.
    pub cycle: f64,
    /// Amber duration per phase transition, in s.
    pub amber: f64,
    /// All-red clearance per phase transition, in s.
    pub all_red: f64,
    /// Safety bounds applied to each adjusted green before balancing.
    ///
    /// The lower bound protects pedestrian crossings; the upper bound caps
    /// starvation of the cross street. The cycle constraint still wins: when
    /// the proportional squeeze kicks in, a green may end up below the lower
    /// bound.
    pub green_bounds: Interval<f64>,
}

impl PhaseTimingConfig {
    /// The total clearance time in one cycle: two amber and two all-red
    /// intervals.
    pub fn clearance(&self) -> f64 {
        2.0 * self.amber + 2.0 * self.all_red
    }

    /// The cycle time left over for the two green phases.
    pub fn available_green(&self) -> f64 {
        self.cycle - self.clearance()
    }

    /// Checks the positivity and cycle-fit invariants.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        let durations = [
            ("green_ns", self.green_ns),
            ("green_eo", self.green_eo),
            ("cycle", self.cycle),
            ("amber", self.amber),
            ("all_red", self.all_red),
        ];
        for (name, value) in durations {
            if value <= 0.0 {
                return Err(InvalidConfig::NonPositive { name, value });
            }
        }

        if self.green_bounds.min <= 0.0 || self.green_bounds.min > self.green_bounds.max {
            return Err(InvalidConfig::GreenBounds {
                min: self.green_bounds.min,
                max: self.green_bounds.max,
            });
        }

        let required = self.green_ns + self.green_eo + self.clearance();
        if required > self.cycle {
            return Err(InvalidConfig::CycleOverrun {
                required,
                cycle: self.cycle,
            });
        }

        Ok(())
    }

    /// Applies the per-direction adjustments to the base greens and enforces
    /// the cycle constraint.
    ///
    /// Each green becomes `base * (1 + adjustment)` clamped to the safety
    /// bounds. If the pair plus clearances would overrun the cycle, both are
    /// scaled down by the same factor so neither direction is favoured.
    pub fn balance(&self, adjustment_ns: f64, adjustment_eo: f64) -> BalancedPhases {
        let raw_ns = self.green_bounds.clamp(self.green_ns * (1.0 + adjustment_ns));
        let raw_eo = self.green_bounds.clamp(self.green_eo * (1.0 + adjustment_eo));

        let available = self.available_green();
        let sum = raw_ns + raw_eo;

        let factor = if sum > available {
            let factor = available / sum;
            log::warn!(
                "cycle squeeze: greens {:.1}s + {:.1}s exceed {:.1}s available, scaling by {:.3}",
                raw_ns,
                raw_eo,
                available,
                factor,
            );
            factor
        } else {
            1.0
        };

        BalancedPhases {
            green_ns: raw_ns * factor,
            green_eo: raw_eo * factor,
            unbalanced_ns: raw_ns,
            unbalanced_eo: raw_eo,
            factor,
        }
    }
}

impl Default for PhaseTimingConfig {
    /// A symmetric 90 s cycle: 30 s base green each way, 3 s amber and 2 s
    /// all-red per transition.
    fn default() -> Self {
        Self {
            green_ns: 30.0,
            green_eo: 30.0,
            cycle: 90.0,
            amber: 3.0,
            all_red: 2.0,
            green_bounds: Interval::new(10.0, 120.0),
        }
    }
}

/// Green durations after adjustment, safety clamping and cycle balancing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalancedPhases {
    /// Final north-south green, in s.
    pub green_ns: f64,
    /// Final east-west green, in s.
    pub green_eo: f64,
    /// North-south green before the cycle squeeze, in s.
    pub unbalanced_ns: f64,
    /// East-west green before the cycle squeeze, in s.
    pub unbalanced_eo: f64,
    /// The proportional scaling applied; 1.0 when the cycle already fit.
    pub factor: f64,
}
