//! Piecewise-linear membership functions and the linguistic families used by
//! the inference engine.

use serde::{Deserialize, Serialize};

/// A piecewise-linear fuzzy membership function.
///
/// Shoulder sets are expressed as trapezoids with a degenerate rising or
/// falling edge (`a == b` or `c == d`); the evaluator handles those without
/// dividing by zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MembershipFn {
    /// Triangle with feet at `a` and `c` and its peak at `b`.
    Triangular { a: f64, b: f64, c: f64 },
    /// Trapezoid rising over `[a, b]`, flat over `[b, c]`, falling over `[c, d]`.
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
}

impl MembershipFn {
    /// Evaluates the degree of membership of `x`, in [0, 1].
    pub fn degree(&self, x: f64) -> f64 {
        let (a, b, c, d) = match *self {
            MembershipFn::Triangular { a, b, c } => (a, b, b, c),
            MembershipFn::Trapezoidal { a, b, c, d } => (a, b, c, d),
        };
        rising_edge(x, a, b).min(falling_edge(x, c, d))
    }
}

fn rising_edge(x: f64, a: f64, b: f64) -> f64 {
    if x >= b {
        1.0
    } else if x <= a {
        0.0
    } else {
        (x - a) / (b - a)
    }
}

fn falling_edge(x: f64, c: f64, d: f64) -> f64 {
    if x <= c {
        1.0
    } else if x >= d {
        0.0
    } else {
        (d - x) / (d - c)
    }
}

/// Congestion-score linguistic family over [0, 1].
///
/// Adjacent sets overlap around the 0.3 and 0.6 crisp classification
/// boundaries, so intermediate scores hold partial membership in two sets at
/// once (unlike the hard display thresholds).
pub const CONGESTION_LOW: MembershipFn = MembershipFn::Trapezoidal {
    a: 0.0,
    b: 0.0,
    c: 0.2,
    d: 0.4,
};
pub const CONGESTION_MEDIUM: MembershipFn = MembershipFn::Triangular {
    a: 0.2,
    b: 0.4,
    c: 0.7,
};
pub const CONGESTION_HIGH: MembershipFn = MembershipFn::Trapezoidal {
    a: 0.4,
    b: 0.7,
    c: 1.0,
    d: 1.0,
};

/// Efficiency-parameter linguistic family over [0, 1].
pub const EFFICIENCY_INEFFICIENT: MembershipFn = MembershipFn::Trapezoidal {
    a: 0.0,
    b: 0.0,
    c: 0.3,
    d: 0.5,
};
pub const EFFICIENCY_MODERATE: MembershipFn = MembershipFn::Triangular {
    a: 0.3,
    b: 0.5,
    c: 0.8,
};
pub const EFFICIENCY_HIGH: MembershipFn = MembershipFn::Trapezoidal {
    a: 0.5,
    b: 0.8,
    c: 1.0,
    d: 1.0,
};

/// The congestion linguistic sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CongestionSet {
    Low,
    Medium,
    High,
}

/// The efficiency linguistic sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EfficiencySet {
    Inefficient,
    Moderate,
    HighlyEfficient,
}

/// Membership degrees of a congestion score in its three sets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CongestionDegrees {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl CongestionDegrees {
    pub fn get(&self, set: CongestionSet) -> f64 {
        match set {
            CongestionSet::Low => self.low,
            CongestionSet::Medium => self.medium,
            CongestionSet::High => self.high,
        }
    }
}

/// Membership degrees of an efficiency parameter in its three sets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyDegrees {
    pub inefficient: f64,
    pub moderate: f64,
    pub highly_efficient: f64,
}

impl EfficiencyDegrees {
    pub fn get(&self, set: EfficiencySet) -> f64 {
        match set {
            EfficiencySet::Inefficient => self.inefficient,
            EfficiencySet::Moderate => self.moderate,
            EfficiencySet::HighlyEfficient => self.highly_efficient,
        }
    }
}

/// Fuzzifies a congestion score. The input is clamped to [0, 1] first.
pub fn fuzzify_congestion(score: f64) -> CongestionDegrees {
    let x = score.clamp(0.0, 1.0);
    CongestionDegrees {
        low: CONGESTION_LOW.degree(x),
        medium: CONGESTION_MEDIUM.degree(x),
        high: CONGESTION_HIGH.degree(x),
    }
}

/// Fuzzifies an efficiency parameter. The input is clamped to [0, 1] first.
pub fn fuzzify_efficiency(efficiency: f64) -> EfficiencyDegrees {
    let x = efficiency.clamp(0.0, 1.0);
    EfficiencyDegrees {
        inefficient: EFFICIENCY_INEFFICIENT.degree(x),
        moderate: EFFICIENCY_MODERATE.degree(x),
        highly_efficient: EFFICIENCY_HIGH.degree(x),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn shoulder_trapezoids_saturate_at_the_edges() {
        assert_eq!(CONGESTION_LOW.degree(0.0), 1.0);
        assert_eq!(CONGESTION_LOW.degree(0.2), 1.0);
        assert_eq!(CONGESTION_LOW.degree(0.4), 0.0);

        assert_eq!(CONGESTION_HIGH.degree(1.0), 1.0);
        assert_eq!(CONGESTION_HIGH.degree(0.7), 1.0);
        assert_eq!(CONGESTION_HIGH.degree(0.4), 0.0);
    }

    #[test]
    fn triangle_interpolates_linearly() {
        assert_eq!(CONGESTION_MEDIUM.degree(0.2), 0.0);
        assert_eq!(CONGESTION_MEDIUM.degree(0.4), 1.0);
        assert_approx_eq!(CONGESTION_MEDIUM.degree(0.3), 0.5);
        assert_approx_eq!(CONGESTION_MEDIUM.degree(0.55), 0.5);
        assert_eq!(CONGESTION_MEDIUM.degree(0.7), 0.0);
    }

    #[test]
    fn adjacent_sets_overlap_at_the_crisp_boundaries() {
        // At the 0.3 display threshold the score belongs partly to Low and
        // partly to Medium.
        let at_medium = fuzzify_congestion(0.3);
        assert!(at_medium.low > 0.0 && at_medium.medium > 0.0);
        assert_eq!(at_medium.high, 0.0);

        // Likewise at the 0.6 threshold for Medium and High.
        let at_high = fuzzify_congestion(0.6);
        assert!(at_high.medium > 0.0 && at_high.high > 0.0);
        assert_eq!(at_high.low, 0.0);
    }

    #[test]
    fn fuzzification_clamps_out_of_range_inputs() {
        assert_eq!(fuzzify_congestion(-0.5), fuzzify_congestion(0.0));
        assert_eq!(fuzzify_congestion(3.0), fuzzify_congestion(1.0));
        assert_eq!(fuzzify_efficiency(1.7).highly_efficient, 1.0);
    }

    #[test]
    fn efficiency_family_breakpoints() {
        let inefficient = fuzzify_efficiency(0.25);
        assert_eq!(inefficient.inefficient, 1.0);
        assert_eq!(inefficient.moderate, 0.0);

        let efficient = fuzzify_efficiency(0.85);
        assert_eq!(efficient.highly_efficient, 1.0);
        assert_eq!(efficient.moderate, 0.0);

        let mid = fuzzify_efficiency(0.5);
        assert_eq!(mid.moderate, 1.0);
        assert_eq!(mid.inefficient, 0.0);
        assert_eq!(mid.highly_efficient, 0.0);
    }
}
