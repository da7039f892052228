//! The event clock and scheduler driving every simulated process.
//!
//! A [`Simulation`] owns its state and an [`EventQueue`]. Each [`Event`] gets exclusive access to both while it
//! executes, so a logical process that needs to wait (for a timeout, or for a resource slot) expresses the wait by
//! scheduling the event that continues it. Nothing runs in parallel; concurrency between customers is purely the
//! interleaving of their events on the shared clock.

mod events;
mod simulation;

pub use events::event_traits::{Event, OkEvent};
pub use events::EventQueue;
pub use simulation::{RunLimits, SimState, Simulation, Termination};
