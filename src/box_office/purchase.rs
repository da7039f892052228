//! The per-customer purchase process.
//!
//! A process is a single [`PurchaseProcess`] event re-scheduled at every suspension point, carrying its current
//! [`PurchaseStage`]. Resource slots travel inside the stage as [`SlotGrant`]s and are handed back exactly once, in
//! [`PurchaseStage::DecisionMade`], before the outcome (or any error) is reported.

use super::{BoxOffice, Customer, Order};
use crate::config::BookingRelease;
use crate::engine::{Event, EventQueue};
use crate::inventory::{Tier, TieredInventory};
use crate::resource::{Acquisition, SlotGrant};

use rand::Rng;

/// How a purchase attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// Seats were marked sold.
    Committed { tier: Tier, tickets: u32 },
    /// Not enough suitable seats were left.
    Oversold { tier: Tier, tickets: u32 },
    /// Seats were available but the customer walked away.
    Balked { tier: Tier },
}

/// Where a purchase process will pick up when its event next executes.
#[derive(Debug, Default)]
pub enum PurchaseStage {
    /// Just arrived; about to ask for a booking session.
    Arrived,
    /// Holds a booking session and starts choosing seats.
    BookingSlotGranted { booking: SlotGrant },
    /// Finished choosing seats; about to draw an order and ask for the purchase slot.
    SeatsSelected { booking: SlotGrant },
    /// Holds the purchase slot and starts deciding.
    PurchaseSlotGranted {
        order: Order,
        booking: Option<SlotGrant>,
        purchase: SlotGrant,
    },
    /// Finished deciding; commits or not, then gives every slot back.
    DecisionMade {
        order: Order,
        booking: Option<SlotGrant>,
        purchase: SlotGrant,
    },
    /// Terminal.
    #[default]
    Resolved,
}

impl PurchaseStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Arrived => "arrived",
            Self::BookingSlotGranted { .. } => "selecting seats",
            Self::SeatsSelected { .. } => "awaiting purchase slot",
            Self::PurchaseSlotGranted { .. } => "deciding purchase",
            Self::DecisionMade { .. } => "purchase decided",
            Self::Resolved => "resolved",
        }
    }
}

/// A customer waiting in line for the purchase slot.
#[derive(Debug)]
pub struct PendingPurchase {
    order: Order,
    booking: Option<SlotGrant>,
}

impl PendingPurchase {
    pub fn order(&self) -> &Order {
        &self.order
    }
}

/// Resumption of one customer's purchase process.
#[derive(Debug)]
pub(super) struct PurchaseProcess {
    customer: Customer,
    stage: PurchaseStage,
}

impl PurchaseProcess {
    pub(super) fn arrive(customer: Customer) -> Self {
        Self {
            customer,
            stage: PurchaseStage::Arrived,
        }
    }

    fn at(customer: Customer, stage: PurchaseStage) -> Self {
        Self { customer, stage }
    }
}

impl Event<BoxOffice> for PurchaseProcess {
    fn execute(&mut self, office: &mut BoxOffice, event_queue: &mut EventQueue<BoxOffice>) -> crate::Result {
        let customer = self.customer;
        tracing::trace!(customer = customer.id, stage = self.stage.name(), "purchase process resumed");
        match std::mem::take(&mut self.stage) {
            PurchaseStage::Arrived => {
                office.request_booking(customer, event_queue);
                Ok(())
            },
            PurchaseStage::BookingSlotGranted { booking } => {
                let delay = office.durations.seat_selection.sample(&mut office.rng);
                let next = PurchaseStage::SeatsSelected { booking };
                event_queue.schedule_after(Self::at(customer, next), delay)
            },
            PurchaseStage::SeatsSelected { booking } => {
                let order = office.orders.sample(customer, &mut office.rng);
                match office.config.booking_release {
                    BookingRelease::AfterPurchase => {
                        office.request_purchase(order, Some(booking), event_queue);
                    },
                    BookingRelease::AfterSelection => {
                        office.request_purchase(order, None, event_queue);
                        office.release_booking(booking, event_queue);
                    },
                }
                Ok(())
            },
            PurchaseStage::PurchaseSlotGranted {
                order,
                booking,
                purchase,
            } => {
                let delay = office.durations.purchase_decision.sample(&mut office.rng);
                let next = PurchaseStage::DecisionMade {
                    order,
                    booking,
                    purchase,
                };
                event_queue.schedule_after(Self::at(customer, next), delay)
            },
            PurchaseStage::DecisionMade {
                order,
                booking,
                purchase,
            } => {
                let outcome = decide_purchase(
                    &order,
                    &mut office.inventory,
                    &mut office.rng,
                    office.config.balk_probability,
                );

                office.release_purchase(purchase, event_queue);
                if let Some(booking) = booking {
                    office.release_booking(booking, event_queue);
                }

                let outcome = outcome?;
                office.resolve(&order, outcome, event_queue.now());
                Ok(())
            },
            PurchaseStage::Resolved => Ok(()),
        }
    }
}

impl BoxOffice {
    fn request_booking(&mut self, customer: Customer, event_queue: &mut EventQueue<BoxOffice>) {
        if let Acquisition::Granted(customer, booking) = self.booking_session.acquire(customer) {
            let stage = PurchaseStage::BookingSlotGranted { booking };
            event_queue.schedule_now(PurchaseProcess::at(customer, stage));
        }
    }

    fn release_booking(&mut self, booking: SlotGrant, event_queue: &mut EventQueue<BoxOffice>) {
        if let Some((customer, booking)) = self.booking_session.release(booking) {
            let stage = PurchaseStage::BookingSlotGranted { booking };
            event_queue.schedule_now(PurchaseProcess::at(customer, stage));
        }
    }

    fn request_purchase(
        &mut self,
        order: Order,
        booking: Option<SlotGrant>,
        event_queue: &mut EventQueue<BoxOffice>,
    ) {
        let pending = PendingPurchase { order, booking };
        if let Acquisition::Granted(pending, purchase) = self.purchase_action.acquire(pending) {
            Self::resume_purchase(pending, purchase, event_queue);
        }
    }

    fn release_purchase(&mut self, purchase: SlotGrant, event_queue: &mut EventQueue<BoxOffice>) {
        if let Some((pending, purchase)) = self.purchase_action.release(purchase) {
            Self::resume_purchase(pending, purchase, event_queue);
        }
    }

    fn resume_purchase(pending: PendingPurchase, purchase: SlotGrant, event_queue: &mut EventQueue<BoxOffice>) {
        let PendingPurchase { order, booking } = pending;
        let stage = PurchaseStage::PurchaseSlotGranted {
            order,
            booking,
            purchase,
        };
        event_queue.schedule_now(PurchaseProcess::at(order.customer, stage));
    }

    fn resolve(&mut self, order: &Order, outcome: PurchaseOutcome, now: f64) {
        self.ledger.record(&outcome);
        self.customers_resolved += 1;

        let customer = order.customer.id;
        match outcome {
            PurchaseOutcome::Committed { tier, tickets } => {
                tracing::debug!(customer, %tier, tickets, now, "tickets sold");
            },
            PurchaseOutcome::Oversold { tier, tickets } => {
                tracing::debug!(customer, %tier, tickets, now, "not enough seats");
            },
            PurchaseOutcome::Balked { tier } => {
                tracing::debug!(customer, %tier, now, "customer balked");
            },
        }
    }
}

/// Apply the allocation rules for `order` to the inventory, committing seats when the customer buys.
///
/// * General admission: sold from the first free places if enough are free; picky customers may still balk.
/// * Regular or premium, picky: needs `tickets` adjacent seats in one row, then may balk.
/// * Regular or premium, non-picky: sold from the first free seats anywhere in the tier.
///
/// A customer who cannot be served is oversold by the full ticket count and the inventory is left untouched. A
/// customer who balks changes nothing. The balk draw only happens once seats have been found.
///
/// Must only be called while holding the purchase slot.
///
/// # Errors
///
/// Propagates commit errors, which indicate seats were found that were not actually free.
pub fn decide_purchase<R>(
    order: &Order,
    inventory: &mut TieredInventory,
    rng: &mut R,
    balk_probability: f64,
) -> crate::Result<PurchaseOutcome>
where
    R: Rng + ?Sized,
{
    let tier = order.tier;
    let tickets = order.tickets;
    let wanted = tickets as usize;
    let oversold = PurchaseOutcome::Oversold { tier, tickets };
    let contiguous = order.is_picky() && tier != Tier::General;

    if contiguous {
        let Some(start) = inventory.find_contiguous_run(tier, wanted) else {
            return Ok(oversold);
        };
        if rng.random_bool(balk_probability) {
            return Ok(PurchaseOutcome::Balked { tier });
        }
        inventory.commit_run(tier, start, wanted)?;
    } else {
        let Some(seats) = inventory.first_n_free(tier, wanted) else {
            return Ok(oversold);
        };
        if order.is_picky() && rng.random_bool(balk_probability) {
            return Ok(PurchaseOutcome::Balked { tier });
        }
        inventory.commit_cells(tier, &seats)?;
    }

    Ok(PurchaseOutcome::Committed { tier, tickets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box_office::Behavior;
    use crate::config::TierCapacities;
    use crate::inventory::{SeatCoord, Shape};

    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn inventory() -> TieredInventory {
        TieredInventory::new(&TierCapacities {
            general: 6,
            regular: Shape {
                sections: 1,
                rows: 2,
                seats: 4,
            },
            premium: Shape {
                sections: 1,
                rows: 1,
                seats: 3,
            },
        })
    }

    fn order(behavior: Behavior, tier: Tier, tickets: u32) -> Order {
        Order {
            customer: Customer { id: 1, behavior },
            tier,
            tickets,
        }
    }

    #[test]
    fn non_picky_customers_take_the_first_free_seats() {
        let mut inventory = inventory();
        let mut rng = Pcg64::seed_from_u64(1);
        inventory.commit_cells(Tier::Regular, &[0, 2]).unwrap();

        let outcome = decide_purchase(&order(Behavior::NonPicky, Tier::Regular, 3), &mut inventory, &mut rng, 1.0);
        assert_eq!(
            Ok(PurchaseOutcome::Committed {
                tier: Tier::Regular,
                tickets: 3
            }),
            outcome,
            "non-picky customers never balk"
        );
        assert_eq!(&[true, true, true, true], inventory.regular.row(0, 0));
        assert_eq!(&[true, false, false, false], inventory.regular.row(0, 1));
    }

    #[test]
    fn picky_customers_need_adjacent_seats() {
        let mut inventory = inventory();
        let mut rng = Pcg64::seed_from_u64(2);
        inventory.commit_cells(Tier::Regular, &[1, 6]).unwrap();

        // six seats are free, but no row has three adjacent ones
        let outcome = decide_purchase(&order(Behavior::Picky, Tier::Regular, 3), &mut inventory, &mut rng, 0.0);
        assert_eq!(
            Ok(PurchaseOutcome::Oversold {
                tier: Tier::Regular,
                tickets: 3
            }),
            outcome
        );
        assert_eq!(2, inventory.count_sold(Tier::Regular), "oversell must not touch the inventory");

        let outcome = decide_purchase(&order(Behavior::Picky, Tier::Regular, 2), &mut inventory, &mut rng, 0.0);
        assert_eq!(
            Ok(PurchaseOutcome::Committed {
                tier: Tier::Regular,
                tickets: 2
            }),
            outcome
        );
        assert_eq!(&[false, true, true, true], inventory.regular.row(0, 0));
    }

    #[test]
    fn picky_customers_commit_the_run_that_was_found() {
        let mut inventory = inventory();
        let mut rng = Pcg64::seed_from_u64(3);
        inventory.commit_cells(Tier::Premium, &[0]).unwrap();

        let expected = SeatCoord {
            section: 0,
            row: 0,
            seat: 1,
        };
        assert_eq!(Some(expected), inventory.find_contiguous_run(Tier::Premium, 2));
        decide_purchase(&order(Behavior::Picky, Tier::Premium, 2), &mut inventory, &mut rng, 0.0).unwrap();
        assert_eq!(0, inventory.count_free(Tier::Premium));
    }

    #[test]
    fn balking_changes_nothing() {
        let mut inventory = inventory();
        let mut rng = Pcg64::seed_from_u64(4);

        for tier in Tier::ALL {
            let outcome = decide_purchase(&order(Behavior::Picky, tier, 2), &mut inventory, &mut rng, 1.0);
            assert_eq!(Ok(PurchaseOutcome::Balked { tier }), outcome);
            assert_eq!(0, inventory.count_sold(tier), "balked purchase sold seats in {tier}");
        }
    }

    #[test]
    fn oversell_is_reported_before_any_balk() {
        let mut inventory = inventory();
        let mut rng = Pcg64::seed_from_u64(5);

        let outcome = decide_purchase(&order(Behavior::Picky, Tier::General, 7), &mut inventory, &mut rng, 1.0);
        assert_eq!(
            Ok(PurchaseOutcome::Oversold {
                tier: Tier::General,
                tickets: 7
            }),
            outcome
        );
        assert_eq!(6, inventory.count_free(Tier::General));
    }

    #[test]
    fn general_admission_ignores_adjacency_even_for_picky_customers() {
        let mut inventory = inventory();
        let mut rng = Pcg64::seed_from_u64(6);
        inventory.commit_cells(Tier::General, &[1, 3]).unwrap();

        let outcome = decide_purchase(&order(Behavior::Picky, Tier::General, 3), &mut inventory, &mut rng, 0.0);
        assert_eq!(
            Ok(PurchaseOutcome::Committed {
                tier: Tier::General,
                tickets: 3
            }),
            outcome
        );
        assert_eq!(&[true, true, true, true, true, false], inventory.general.cells());
    }

    #[test]
    fn stage_names_follow_the_process() {
        assert_eq!("arrived", PurchaseStage::Arrived.name());
        assert_eq!("resolved", PurchaseStage::default().name());
    }
}
