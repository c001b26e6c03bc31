use adaptive_signals::{
    metrics, Approach, Controller, IntersectionConfig, Observation, TickOutcome,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Synthetic per-direction traffic, drifting between free flow and
/// saturation so the demo exercises the whole rule base.
struct ApproachModel {
    pressure: f64,
    drift: f64,
}

impl ApproachModel {
    fn new(pressure: f64, drift: f64) -> Self {
        Self { pressure, drift }
    }

    fn tick(&mut self, rng: &mut StdRng) -> Approach {
        self.pressure = (self.pressure + self.drift + rng.gen_range(-0.03..0.03)).clamp(0.0, 1.0);
        if self.pressure == 0.0 || self.pressure == 1.0 {
            self.drift = -self.drift;
        }

        let p = self.pressure;
        let noise = Normal::new(0.0, 0.05).expect("valid stddev");

        // Sample plausible observables for the current pressure level.
        let speeds: Vec<f64> = (0..(5.0 + 35.0 * p) as usize)
            .map(|_| {
                let stopped = rng.gen_bool(0.8 * p);
                if stopped {
                    rng.gen_range(0.0..1.5)
                } else {
                    (55.0 * (1.0 - p) + 5.0) * (1.0 + noise.sample(rng))
                }
            })
            .collect();

        let stopped = metrics::stopped_count(&speeds, metrics::STOPPED_EPSILON);
        let avg_speed = metrics::moving_average_speed(&speeds, metrics::STOPPED_EPSILON);
        let crossed = (25.0 * (1.0 - 0.6 * p)) as u32;

        Approach {
            observation: Observation {
                queue_length: 140.0 * p * (1.0 + noise.sample(rng)),
                avg_speed,
                flow: metrics::vehicular_flow(crossed, 0.0, 60.0),
                vehicle_count: speeds.len() as u32,
            },
            efficiency: metrics::intensity_parameter(
                avg_speed,
                stopped,
                60.0,
                metrics::INTENSITY_DELTA,
            ),
            emergency: rng.gen_bool(0.02),
        }
    }
}

fn print_tick(tick: usize, outcome: &TickOutcome) {
    println!(
        "tick {:>3}: NS {:.2} ({:?}) {}{:.0}% -> {:>5.1}s | EO {:.2} ({:?}) {}{:.0}% -> {:>5.1}s{}",
        tick,
        outcome.ns.score,
        outcome.ns.level,
        if outcome.decision.ns.adjustment >= 0.0 { "+" } else { "" },
        100.0 * outcome.decision.ns.adjustment,
        outcome.decision.ns.green,
        outcome.eo.score,
        outcome.eo.level,
        if outcome.decision.eo.adjustment >= 0.0 { "+" } else { "" },
        100.0 * outcome.decision.eo.adjustment,
        outcome.decision.eo.green,
        if outcome.decision.balance_factor < 1.0 {
            " [squeezed]"
        } else {
            ""
        },
    );
}

fn main() {
    env_logger::init();

    let mut controller = Controller::new();
    let id = controller
        .add_intersection(IntersectionConfig::default())
        .expect("default configuration is valid");

    let mut rng = StdRng::seed_from_u64(7);
    let mut ns = ApproachModel::new(0.7, 0.01);
    let mut eo = ApproachModel::new(0.2, -0.01);

    let mut last = None;
    for tick in 0..30 {
        let outcome = controller
            .evaluate(id, &ns.tick(&mut rng), &eo.tick(&mut rng))
            .expect("registered configuration stays valid");
        print_tick(tick, &outcome);
        last = Some(outcome);
    }

    if let Some(outcome) = last {
        println!(
            "\nlast decision as JSON:\n{}",
            serde_json::to_string_pretty(&outcome.decision).expect("decision serializes")
        );
    }
}
