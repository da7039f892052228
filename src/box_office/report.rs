use super::BoxOffice;
use crate::engine::{Simulation, Termination};
use crate::inventory::{Tier, TieredInventory};

use serde::Serialize;
use std::fmt::Formatter;

/// Sales figures for one tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierReport {
    pub tier: Tier,
    pub tickets_sold: u64,
    /// Tickets requested but not available, summed over customers.
    pub tickets_oversell: u64,
    pub customers_balked: u64,
    /// Fraction of the tier's seats that were sold.
    pub sellthrough: f64,
}

/// Everything a reporting collaborator needs from a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    /// One entry per tier, in [`Tier::ALL`] order.
    pub tiers: [TierReport; 3],
    /// Simulated time at which the stop condition fired, or at which the run was cut short.
    pub elapsed_time: f64,
    pub termination: Termination,
    pub customers_arrived: u64,
    pub customers_resolved: u64,
    pub events_executed: u64,
    pub peak_booking_sessions: usize,
    pub inventory: TieredInventory,
}

impl SimulationResult {
    /// Summarize a simulation that has stopped running.
    pub fn from_simulation(sim: &Simulation<BoxOffice>, termination: Termination) -> Self {
        let office = sim.state();
        let ledger = office.ledger();
        let inventory = office.inventory();
        let tiers = Tier::ALL.map(|tier| TierReport {
            tier,
            tickets_sold: ledger.sold(tier),
            tickets_oversell: ledger.oversold(tier),
            customers_balked: ledger.balked(tier),
            sellthrough: inventory.sellthrough(tier),
        });

        Self {
            tiers,
            elapsed_time: office.stopped_at().unwrap_or_else(|| sim.now()),
            termination,
            customers_arrived: office.customers_arrived(),
            customers_resolved: office.customers_resolved(),
            events_executed: sim.events_executed(),
            peak_booking_sessions: office.booking_session().peak_in_use(),
            inventory: inventory.clone(),
        }
    }

    pub fn tier(&self, tier: Tier) -> &TierReport {
        &self.tiers[tier.index()]
    }

    /// Whether the run ended because the venue sold out, rather than hitting a limit.
    pub fn sold_out(&self) -> bool {
        self.termination == Termination::StopCondition
    }
}

impl std::fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        for report in &self.tiers {
            writeln!(
                f,
                "{} sellthrough is {:.2}% with {} tickets.",
                report.tier,
                report.sellthrough * 100.0,
                report.tickets_sold
            )?;
            writeln!(
                f,
                "{} {} tickets missed due to being sold out; {} customers balked.",
                report.tickets_oversell, report.tier, report.customers_balked
            )?;
        }

        let minutes = self.elapsed_time;
        let days = (minutes / (24.0 * 60.0)).floor();
        let hours = ((minutes % (24.0 * 60.0)) / 60.0).floor();
        writeln!(f, "Total simulation time: {minutes:.2} time units ({termination})", termination = self.termination)?;
        write!(
            f,
            "Total simulation time: {days} days, {hours} hours, {:.2} minutes",
            minutes % 60.0
        )
    }
}
