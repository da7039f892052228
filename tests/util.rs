#![allow(dead_code)]

use boxoffice::config::TierCapacities;
use boxoffice::inventory::Shape;
use boxoffice::SimulationConfig;

/// Check whether two floats have a relative difference of at most 5e-5 times the smaller value.
#[macro_export]
macro_rules! assert_floats_near_equal {
    ($val1:expr, $val2:expr, $msg:expr) => {{
        let a: f64 = $val1;
        let b: f64 = $val2;
        let diff = (a - b).abs();
        let relative_diff = if a.abs() < b.abs() { diff / a.abs() } else { diff / b.abs() };
        assert!(diff == 0.0 || relative_diff < 0.00005, "{}: {} vs {}", $msg, a, b);
    }};
}

/// Ten general admission places and a single seat in each seated tier.
pub fn tiny_venue(seed: u64) -> SimulationConfig {
    SimulationConfig {
        tier_capacities: TierCapacities {
            general: 10,
            regular: Shape::flat(1),
            premium: Shape::flat(1),
        },
        random_seed: seed,
        ..SimulationConfig::default()
    }
}

/// Big enough for contiguity to matter, small enough to sell out quickly.
pub fn small_venue(seed: u64) -> SimulationConfig {
    SimulationConfig {
        tier_capacities: TierCapacities {
            general: 120,
            regular: Shape {
                sections: 2,
                rows: 4,
                seats: 12,
            },
            premium: Shape {
                sections: 1,
                rows: 2,
                seats: 10,
            },
        },
        random_seed: seed,
        ..SimulationConfig::default()
    }
}
