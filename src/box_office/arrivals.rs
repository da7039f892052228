use super::purchase::PurchaseProcess;
use super::{BoxOffice, Behavior, Customer};
use crate::engine::{Event, EventQueue};
use crate::inventory::{Tier, TieredInventory};

/// Decides when the venue counts as sold out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopMonitor {
    threshold: f64,
}

impl StopMonitor {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// True once every tier has sold at least the threshold fraction of its seats.
    pub fn should_stop(&self, inventory: &TieredInventory) -> bool {
        Tier::ALL
            .iter()
            .all(|&tier| inventory.sellthrough(tier) >= self.threshold)
    }
}

/// Starts the arrival generator.
#[derive(Debug)]
pub(super) struct OpenDoors {}

impl Event<BoxOffice> for OpenDoors {
    fn execute(&mut self, office: &mut BoxOffice, event_queue: &mut EventQueue<BoxOffice>) -> crate::Result {
        office.await_next_arrival(event_queue)
    }
}

/// The next customer walks in.
#[derive(Debug)]
pub(super) struct ArrivalEvent {}

impl Event<BoxOffice> for ArrivalEvent {
    /// Spawn a purchase process for the new customer without waiting on it, then go back to waiting for the one
    /// after.
    fn execute(&mut self, office: &mut BoxOffice, event_queue: &mut EventQueue<BoxOffice>) -> crate::Result {
        office.customers_arrived += 1;
        let customer = Customer {
            id: office.customers_arrived,
            behavior: Behavior::draw(&mut office.rng, office.config.picky_probability),
        };
        tracing::trace!(customer = customer.id, behavior = ?customer.behavior, "customer arrived");
        event_queue.schedule_now(PurchaseProcess::arrive(customer));

        office.await_next_arrival(event_queue)
    }
}

impl BoxOffice {
    /// One turn of the generator loop: stop for good if the venue is sold out, otherwise schedule the next arrival.
    fn await_next_arrival(&mut self, event_queue: &mut EventQueue<BoxOffice>) -> crate::Result {
        if self.monitor.should_stop(&self.inventory) {
            let now = event_queue.now();
            self.stopped_at = Some(now);
            tracing::debug!(now, threshold = self.monitor.threshold(), "sell-through reached, arrivals stopped");
            return Ok(());
        }

        let delay = self.durations.interarrival.sample(&mut self.rng);
        event_queue.schedule_after(ArrivalEvent {}, delay)
    }
}
