//! # Overview
//!
//! boxoffice simulates ticket sales for a venue with three seating tiers as a discrete-event simulation. Customers
//! arrive at random intervals, contend for a high-capacity booking session gate and a single purchase slot, and try to
//! buy seats under tier-specific rules until every tier is at least 95% sold.
//!
//! The crate is split into layers, leaves first:
//!
//! * [`engine`] is a small, generic discrete-event core: an [`EventQueue`] ordered by due time with FIFO tie
//!   breaking, and a [`Simulation`] that owns the queue and the client's [`SimState`], executing [`Event`]s one at a
//!   time with exclusive access to both.
//! * [`resource`] provides the capacity-limited [`ResourcePool`] with a FIFO wait queue and move-only
//!   [`SlotGrant`](resource::SlotGrant)s.
//! * [`inventory`] holds the seat occupancy tables for the three tiers and the contiguous-run finder used by picky
//!   customers.
//! * [`box_office`] wires those together into the arrival generator, the per-customer purchase process and the stop
//!   condition, and reports a [`SimulationResult`].
//!
//! A run is fully determined by its [`SimulationConfig`], including the random seed: the same configuration always
//! produces the same final seating plan and the same counts.
//!
//! ```no_run
//! use boxoffice::{simulate, SimulationConfig, Tier};
//!
//! let result = simulate(&SimulationConfig::default())?;
//! println!("premium sell-through: {:.1}%", result.tier(Tier::Premium).sellthrough * 100.0);
//! # Ok::<(), boxoffice::Error>(())
//! ```
//!
//! # Logging
//!
//! boxoffice reports through [`tracing`] and never installs a subscriber itself. Run start and end are logged at
//! `info`, customer outcomes and the stop condition at `debug`, and resource traffic at `trace`.
//!
//! [`EventQueue`]: engine::EventQueue
//! [`Simulation`]: engine::Simulation
//! [`SimState`]: engine::SimState
//! [`Event`]: engine::Event
//! [`ResourcePool`]: resource::ResourcePool

pub mod box_office;
pub mod config;
pub mod engine;
mod error;
pub mod inventory;
pub mod resource;

pub use box_office::{simulate, BoxOffice, SimulationResult, TierReport};
pub use config::SimulationConfig;
pub use engine::{RunLimits, Termination};
pub use error::{Error, Result};
pub use inventory::Tier;
