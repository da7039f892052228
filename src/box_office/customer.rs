use crate::config::{SimulationConfig, TicketRange};
use crate::inventory::Tier;
use crate::Error;

use rand::distr::weighted::WeightedIndex;
use rand::Rng;
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};

/// How fussy a customer is about where they sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    /// Wants adjacent seats in a seated tier, and may walk away even when seats are available.
    Picky,
    /// Takes whatever seats are free.
    NonPicky,
}

impl Behavior {
    /// Picky with probability `picky_probability`, otherwise non-picky.
    pub fn draw<R>(rng: &mut R, picky_probability: f64) -> Self
    where
        R: Rng + ?Sized,
    {
        if rng.random_bool(picky_probability) {
            Behavior::Picky
        } else {
            Behavior::NonPicky
        }
    }
}

/// An arriving customer. Lives only as long as their purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Customer {
    pub id: u64,
    pub behavior: Behavior,
}

/// What a customer asks for once they have browsed the seating plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub customer: Customer,
    pub tier: Tier,
    pub tickets: u32,
}

impl Order {
    pub fn is_picky(&self) -> bool {
        self.customer.behavior == Behavior::Picky
    }
}

/// Draws the tier and ticket count of each order.
#[derive(Debug, Clone)]
pub struct OrderSampler {
    sections: WeightedIndex<f64>,
    tickets: TicketRange,
}

impl OrderSampler {
    /// # Errors
    ///
    /// [`Error::MalformedDistribution`] if the section weights cannot be sampled.
    pub fn new(config: &SimulationConfig) -> crate::Result<Self> {
        let sections = WeightedIndex::new(config.section_probabilities.weights()).map_err(|err| {
            Error::MalformedDistribution {
                name: "section",
                reason: err.to_string(),
            }
        })?;

        Ok(Self {
            sections,
            tickets: config.tickets_per_order,
        })
    }

    /// Tier first, then ticket count, each drawn independently.
    pub fn sample<R>(&self, customer: Customer, rng: &mut R) -> Order
    where
        R: Rng + ?Sized,
    {
        let tier = Tier::ALL[self.sections.sample(rng)];
        let tickets = rng.random_range(self.tickets.min..=self.tickets.max);
        Order { customer, tier, tickets }
    }
}
