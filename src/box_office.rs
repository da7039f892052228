//! Ticket sales for the tiered venue, built on the [`engine`](crate::engine).
//!
//! A run has one perpetual process, the arrival generator, which checks the [`StopMonitor`] before every arrival and
//! otherwise spawns a purchase process per customer. Each purchase process queues for a booking session slot, picks
//! seats, queues for the single purchase slot, decides, and then either buys, is oversold, or balks. All inventory
//! reads and writes happen while holding the purchase slot.

mod arrivals;
mod customer;
mod purchase;
mod report;

pub use arrivals::StopMonitor;
pub use customer::{Behavior, Customer, Order, OrderSampler};
pub use purchase::{decide_purchase, PendingPurchase, PurchaseOutcome, PurchaseStage};
pub use report::{SimulationResult, TierReport};

use crate::config::{NormalParams, SamplingMode, SimulationConfig};
use crate::engine::{SimState, Simulation};
use crate::inventory::{Tier, TieredInventory};
use crate::resource::ResourcePool;
use crate::Error;

use rand::SeedableRng;
use rand_distr::{Distribution, Exp, Normal};
use rand_pcg::Pcg64;

/// Source of one kind of processing or interarrival delay.
#[derive(Debug, Clone)]
enum DurationSource<D> {
    Sampled(D),
    Fixed(f64),
}

impl<D> DurationSource<D>
where
    D: Distribution<f64>,
{
    fn new(distribution: D, mode: SamplingMode, rng: &mut Pcg64) -> Self {
        match mode {
            SamplingMode::PerEvent => Self::Sampled(distribution),
            SamplingMode::PerRun => Self::Fixed(distribution.sample(rng).max(0.0)),
        }
    }

    /// Next delay. Negative normal draws are clamped to zero so the clock never runs backwards.
    fn sample(&self, rng: &mut Pcg64) -> f64 {
        match self {
            Self::Sampled(distribution) => distribution.sample(rng).max(0.0),
            Self::Fixed(delay) => *delay,
        }
    }
}

#[derive(Debug, Clone)]
struct Durations {
    interarrival: DurationSource<Exp<f64>>,
    seat_selection: DurationSource<Normal<f64>>,
    purchase_decision: DurationSource<Normal<f64>>,
}

impl Durations {
    fn new(config: &SimulationConfig, rng: &mut Pcg64) -> crate::Result<Self> {
        let interarrival = Exp::new(1.0 / config.mean_interarrival_time).map_err(|err| Error::MalformedDistribution {
            name: "interarrival",
            reason: err.to_string(),
        })?;
        let seat_selection = normal("seat selection time", config.seat_selection_time)?;
        let purchase_decision = normal("purchase decision time", config.purchase_decision_time)?;

        Ok(Self {
            interarrival: DurationSource::new(interarrival, config.sampling, rng),
            seat_selection: DurationSource::new(seat_selection, config.sampling, rng),
            purchase_decision: DurationSource::new(purchase_decision, config.sampling, rng),
        })
    }
}

fn normal(name: &'static str, params: NormalParams) -> crate::Result<Normal<f64>> {
    Normal::new(params.mean, params.sd).map_err(|err| Error::MalformedDistribution {
        name,
        reason: err.to_string(),
    })
}

/// Running totals of what customers bought and failed to buy, per tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesLedger {
    sold: [u64; 3],
    oversold: [u64; 3],
    balked: [u64; 3],
}

impl SalesLedger {
    pub fn record(&mut self, outcome: &PurchaseOutcome) {
        match *outcome {
            PurchaseOutcome::Committed { tier, tickets } => self.sold[tier.index()] += u64::from(tickets),
            PurchaseOutcome::Oversold { tier, tickets } => self.oversold[tier.index()] += u64::from(tickets),
            PurchaseOutcome::Balked { tier } => self.balked[tier.index()] += 1,
        }
    }

    /// Tickets sold in `tier`.
    pub fn sold(&self, tier: Tier) -> u64 {
        self.sold[tier.index()]
    }

    /// Tickets requested in `tier` that could not be supplied.
    pub fn oversold(&self, tier: Tier) -> u64 {
        self.oversold[tier.index()]
    }

    /// Customers who walked away from seats in `tier`.
    pub fn balked(&self, tier: Tier) -> u64 {
        self.balked[tier.index()]
    }
}

/// State of a box office simulation.
///
/// Owns everything a run touches: the random number generator, the seat inventory, both resource pools and the sales
/// ledger. There is no global state, so independent runs can execute side by side.
#[derive(Debug)]
pub struct BoxOffice {
    config: SimulationConfig,
    rng: Pcg64,
    durations: Durations,
    orders: OrderSampler,
    monitor: StopMonitor,
    inventory: TieredInventory,
    booking_session: ResourcePool<Customer>,
    purchase_action: ResourcePool<PendingPurchase>,
    ledger: SalesLedger,
    customers_arrived: u64,
    customers_resolved: u64,
    stopped_at: Option<f64>,
}

impl BoxOffice {
    /// Validate `config` and set up an unsold venue.
    ///
    /// # Errors
    ///
    /// Any error from [`SimulationConfig::validate()`].
    pub fn new(config: SimulationConfig) -> crate::Result<Self> {
        config.validate()?;

        let mut rng = Pcg64::seed_from_u64(config.random_seed);
        let durations = Durations::new(&config, &mut rng)?;
        let orders = OrderSampler::new(&config)?;

        Ok(Self {
            monitor: StopMonitor::new(config.stop_threshold),
            inventory: TieredInventory::new(&config.tier_capacities),
            booking_session: ResourcePool::new("booking session", config.booking_session_capacity)?,
            purchase_action: ResourcePool::new("purchase action", config.purchase_action_capacity)?,
            ledger: SalesLedger::default(),
            customers_arrived: 0,
            customers_resolved: 0,
            stopped_at: None,
            config,
            rng,
            durations,
            orders,
        })
    }

    /// Build a simulation at time zero with the arrival generator ready to start.
    ///
    /// # Errors
    ///
    /// Any error from [`SimulationConfig::validate()`].
    pub fn simulation(config: SimulationConfig) -> crate::Result<Simulation<BoxOffice>> {
        let office = Self::new(config)?;
        let mut sim = Simulation::new(office, 0.0);
        sim.event_queue_mut().schedule_now(arrivals::OpenDoors {});
        Ok(sim)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn inventory(&self) -> &TieredInventory {
        &self.inventory
    }

    pub fn ledger(&self) -> &SalesLedger {
        &self.ledger
    }

    pub fn booking_session(&self) -> &ResourcePool<Customer> {
        &self.booking_session
    }

    pub fn purchase_action(&self) -> &ResourcePool<PendingPurchase> {
        &self.purchase_action
    }

    pub fn customers_arrived(&self) -> u64 {
        self.customers_arrived
    }

    /// Customers whose purchase attempt reached a terminal state.
    pub fn customers_resolved(&self) -> u64 {
        self.customers_resolved
    }

    /// Time at which the stop condition fired, if it has.
    pub fn stopped_at(&self) -> Option<f64> {
        self.stopped_at
    }
}

impl SimState for BoxOffice {
    fn is_complete(&self, _: f64) -> bool {
        self.stopped_at.is_some()
    }
}

/// Run one simulation to completion and summarize it.
///
/// # Errors
///
/// Configuration errors from [`SimulationConfig::validate()`], or an error raised while executing an event.
pub fn simulate(config: &SimulationConfig) -> crate::Result<SimulationResult> {
    let limits = config.limits;
    let mut sim = BoxOffice::simulation(config.clone())?;
    tracing::info!(seed = config.random_seed, "box office opened");

    let termination = sim.run(&limits)?;
    let result = SimulationResult::from_simulation(&sim, termination);
    tracing::info!(
        %termination,
        elapsed = result.elapsed_time,
        customers = result.customers_arrived,
        events = result.events_executed,
        "box office closed"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_run_sampling_fixes_every_duration() {
        let mut rng = Pcg64::seed_from_u64(7);
        let config = SimulationConfig {
            sampling: SamplingMode::PerRun,
            ..SimulationConfig::default()
        };
        let durations = Durations::new(&config, &mut rng).unwrap();

        let first = durations.seat_selection.sample(&mut rng);
        for _ in 0..10 {
            assert_eq!(first, durations.seat_selection.sample(&mut rng), "duration should not change");
        }
        assert!(matches!(durations.interarrival, DurationSource::Fixed(_)));
    }

    #[test]
    fn sampled_durations_are_never_negative() {
        let mut rng = Pcg64::seed_from_u64(11);
        let source = DurationSource::new(Normal::new(0.0, 5.0).unwrap(), SamplingMode::PerEvent, &mut rng);
        assert!((0..1000).all(|_| source.sample(&mut rng) >= 0.0));
    }

    #[test]
    fn ledger_routes_outcomes_to_their_tier() {
        let mut ledger = SalesLedger::default();
        ledger.record(&PurchaseOutcome::Committed {
            tier: Tier::Regular,
            tickets: 4,
        });
        ledger.record(&PurchaseOutcome::Oversold {
            tier: Tier::Premium,
            tickets: 7,
        });
        ledger.record(&PurchaseOutcome::Balked { tier: Tier::Regular });

        assert_eq!(4, ledger.sold(Tier::Regular));
        assert_eq!(0, ledger.oversold(Tier::Regular));
        assert_eq!(1, ledger.balked(Tier::Regular));
        assert_eq!(7, ledger.oversold(Tier::Premium));
        assert_eq!(0, ledger.sold(Tier::General));
    }

    #[test]
    fn simulation_starts_with_one_pending_event() {
        let sim = BoxOffice::simulation(SimulationConfig::default()).unwrap();
        assert_eq!(1, sim.event_queue().len());
        assert_eq!(0.0, sim.now());
        assert_eq!(0, sim.state().customers_arrived());
    }
}
