//! Inputs for a single simulation run.
//!
//! [`SimulationConfig::default()`] describes the reference venue: a 4056-seat general admission floor, three sections
//! of 50 rows × 52 regular seats, and three sections of 2 rows × 52 premium seats, with customers arriving every five
//! minutes on average. Everything can be overridden from JSON, where omitted keys keep their defaults.

use crate::engine::RunLimits;
use crate::inventory::{Shape, Tier};
use crate::Error;

use serde::{Deserialize, Serialize};

/// Parameters of a normal distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalParams {
    pub mean: f64,
    pub sd: f64,
}

impl NormalParams {
    fn validate(&self, name: &'static str) -> crate::Result {
        if !self.mean.is_finite() {
            return Err(malformed(name, format!("mean must be finite, got {}", self.mean)));
        }
        if !(self.sd > 0.0 && self.sd.is_finite()) {
            return Err(malformed(name, format!("sd must be positive, got {}", self.sd)));
        }
        Ok(())
    }
}

/// Weights of the categorical draw that picks a customer's tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionProbabilities {
    pub general: f64,
    pub regular: f64,
    pub premium: f64,
}

impl SectionProbabilities {
    /// Weights in [`Tier::ALL`] order.
    pub fn weights(&self) -> [f64; 3] {
        [self.general, self.regular, self.premium]
    }

    pub fn get(&self, tier: Tier) -> f64 {
        self.weights()[tier.index()]
    }

    fn validate(&self) -> crate::Result {
        let weights = self.weights();
        if weights.iter().any(|weight| !(*weight >= 0.0 && weight.is_finite())) {
            return Err(malformed("section", format!("weights must be non-negative, got {weights:?}")));
        }
        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > 1e-9 {
            return Err(malformed("section", format!("weights must sum to 1, got {total}")));
        }
        Ok(())
    }
}

impl Default for SectionProbabilities {
    fn default() -> Self {
        Self {
            general: 0.5,
            regular: 0.3,
            premium: 0.2,
        }
    }
}

/// Size of each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCapacities {
    /// Number of general admission places.
    pub general: usize,
    pub regular: Shape,
    pub premium: Shape,
}

impl TierCapacities {
    pub fn shape(&self, tier: Tier) -> Shape {
        match tier {
            Tier::General => Shape::flat(self.general),
            Tier::Regular => self.regular,
            Tier::Premium => self.premium,
        }
    }
}

impl Default for TierCapacities {
    fn default() -> Self {
        Self {
            general: 4056,
            regular: Shape {
                sections: 3,
                rows: 50,
                seats: 52,
            },
            premium: Shape {
                sections: 3,
                rows: 2,
                seats: 52,
            },
        }
    }
}

/// Inclusive range for the number of tickets a customer asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRange {
    pub min: u32,
    pub max: u32,
}

impl Default for TicketRange {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

/// When duration draws happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// Draw a new interarrival, seat-selection and purchase-decision time every time one is needed.
    #[default]
    PerEvent,
    /// Draw each of the three durations once when the run starts and reuse it throughout. Every customer then arrives
    /// at the same spacing and takes the same time to choose and to decide.
    PerRun,
}

/// When a customer gives up their booking session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingRelease {
    /// Hold the booking session until the purchase attempt resolves.
    #[default]
    AfterPurchase,
    /// Give the booking session back once seats are chosen and the customer has queued for the purchase slot.
    AfterSelection,
}

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Mean of the exponential distribution of time between arrivals.
    pub mean_interarrival_time: f64,
    pub seat_selection_time: NormalParams,
    pub purchase_decision_time: NormalParams,
    pub section_probabilities: SectionProbabilities,
    pub tier_capacities: TierCapacities,
    /// Concurrent customers allowed past the booking gate.
    pub booking_session_capacity: usize,
    /// Concurrent customers allowed to commit purchases. Anything above one lets allocations interleave.
    pub purchase_action_capacity: usize,
    /// Chance that an arriving customer insists on adjacent seats.
    pub picky_probability: f64,
    /// Chance that a picky customer walks away after finding seats.
    pub balk_probability: f64,
    pub tickets_per_order: TicketRange,
    /// Sell-through every tier must reach before arrivals stop.
    pub stop_threshold: f64,
    pub random_seed: u64,
    pub sampling: SamplingMode,
    pub booking_release: BookingRelease,
    pub limits: RunLimits,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mean_interarrival_time: 5.0,
            seat_selection_time: NormalParams { mean: 5.0, sd: 1.0 },
            purchase_decision_time: NormalParams { mean: 10.0, sd: 2.0 },
            section_probabilities: SectionProbabilities::default(),
            tier_capacities: TierCapacities::default(),
            booking_session_capacity: 1000,
            purchase_action_capacity: 1,
            picky_probability: 0.5,
            balk_probability: 0.2,
            tickets_per_order: TicketRange::default(),
            stop_threshold: 0.95,
            random_seed: 42,
            sampling: SamplingMode::default(),
            booking_release: BookingRelease::default(),
            limits: RunLimits::default(),
        }
    }
}

impl SimulationConfig {
    /// Decode a configuration from JSON. Missing keys take their default values; the result is not yet validated.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] if the text is not valid JSON for this type.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every parameter before a run starts.
    ///
    /// # Errors
    ///
    /// * [`Error::MalformedDistribution`] for a non-positive mean interarrival time, non-positive standard deviation,
    ///   or section weights that are negative or do not sum to one.
    /// * [`Error::InvalidCapacity`] for a resource pool with capacity zero.
    /// * [`Error::InvalidConfig`] for anything else out of range.
    pub fn validate(&self) -> crate::Result {
        if !(self.mean_interarrival_time > 0.0 && self.mean_interarrival_time.is_finite()) {
            return Err(malformed(
                "interarrival",
                format!("mean must be positive, got {}", self.mean_interarrival_time),
            ));
        }
        self.seat_selection_time.validate("seat selection time")?;
        self.purchase_decision_time.validate("purchase decision time")?;
        self.section_probabilities.validate()?;

        if self.booking_session_capacity < 1 {
            return Err(Error::InvalidCapacity {
                pool: "booking session",
                capacity: self.booking_session_capacity,
            });
        }
        if self.purchase_action_capacity < 1 {
            return Err(Error::InvalidCapacity {
                pool: "purchase action",
                capacity: self.purchase_action_capacity,
            });
        }

        for tier in Tier::ALL {
            if self.tier_capacities.shape(tier).is_empty() {
                return Err(Error::InvalidConfig(format!("{tier} has no seats")));
            }
        }

        check_probability("picky probability", self.picky_probability)?;
        check_probability("balk probability", self.balk_probability)?;

        let tickets = self.tickets_per_order;
        if tickets.min < 1 || tickets.min > tickets.max {
            return Err(Error::InvalidConfig(format!(
                "tickets per order must satisfy 1 <= min <= max, got {}..={}",
                tickets.min, tickets.max
            )));
        }

        if !(self.stop_threshold > 0.0 && self.stop_threshold <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "stop threshold must lie in (0, 1], got {}",
                self.stop_threshold
            )));
        }

        if let Some(horizon) = self.limits.max_simulated_time {
            if !(horizon >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "max simulated time must be non-negative, got {horizon}"
                )));
            }
        }
        Ok(())
    }
}

fn malformed(name: &'static str, reason: String) -> Error {
    Error::MalformedDistribution { name, reason }
}

fn check_probability(name: &str, value: f64) -> crate::Result {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{name} must lie in [0, 1], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_reference_venue() {
        let config = SimulationConfig::default();
        config.validate().expect("defaults should be valid");

        assert_eq!(7800, config.tier_capacities.regular.len());
        assert_eq!(312, config.tier_capacities.premium.len());
        assert_eq!(0.3, config.section_probabilities.get(Tier::Regular));
        assert!(config.limits.max_simulated_time.is_some(), "runs should be bounded by default");
    }

    #[test]
    fn json_overrides_only_what_it_names() {
        let json = r#"{
            "mean_interarrival_time": 2.5,
            "tier_capacities": {
                "general": 10,
                "regular": { "sections": 1, "rows": 1, "seats": 1 },
                "premium": { "sections": 1, "rows": 1, "seats": 1 }
            },
            "sampling": "per_run",
            "booking_release": "after_selection",
            "limits": { "max_events": 5000 }
        }"#;
        let config = SimulationConfig::from_json_str(json).unwrap();

        assert_eq!(2.5, config.mean_interarrival_time);
        assert_eq!(10, config.tier_capacities.general);
        assert_eq!(SamplingMode::PerRun, config.sampling);
        assert_eq!(BookingRelease::AfterSelection, config.booking_release);
        assert_eq!(Some(5000), config.limits.max_events);
        assert_eq!(
            RunLimits::default().max_simulated_time,
            config.limits.max_simulated_time,
            "unnamed limit should keep its default"
        );
        assert_eq!(42, config.random_seed, "unnamed keys should keep their defaults");
        config.validate().unwrap();
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let err = SimulationConfig::from_json_str(r#"{ "random_seed": "forty-two" }"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "unexpected error {err:?}");
    }

    #[test]
    fn malformed_distributions_are_rejected() {
        let mut config = SimulationConfig {
            mean_interarrival_time: 0.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::MalformedDistribution { name: "interarrival", .. })
        ));

        config.mean_interarrival_time = 5.0;
        config.purchase_decision_time.sd = -2.0;
        assert!(matches!(
            config.validate(),
            Err(Error::MalformedDistribution {
                name: "purchase decision time",
                ..
            })
        ));

        config.purchase_decision_time.sd = 2.0;
        config.section_probabilities.premium = 0.3;
        assert!(matches!(
            config.validate(),
            Err(Error::MalformedDistribution { name: "section", .. })
        ));
    }

    #[test]
    fn zero_capacity_pools_are_rejected() {
        let config = SimulationConfig {
            purchase_action_capacity: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(
            Err(Error::InvalidCapacity {
                pool: "purchase action",
                capacity: 0
            }),
            config.validate()
        );
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let cases = [
            SimulationConfig {
                stop_threshold: 0.0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                stop_threshold: 1.5,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                balk_probability: -0.1,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                tickets_per_order: TicketRange { min: 0, max: 4 },
                ..SimulationConfig::default()
            },
            SimulationConfig {
                tickets_per_order: TicketRange { min: 5, max: 4 },
                ..SimulationConfig::default()
            },
            SimulationConfig {
                tier_capacities: TierCapacities {
                    general: 0,
                    ..TierCapacities::default()
                },
                ..SimulationConfig::default()
            },
        ];

        for config in cases {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfig(_))),
                "expected {config:?} to be rejected"
            );
        }
    }
}
