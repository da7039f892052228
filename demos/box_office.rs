//! Runs one box office simulation and prints the sales report.
//!
//! With no arguments the reference venue is simulated with seed 42. Pass the path of a JSON file to override any
//! part of the configuration, for example:
//!
//! ```text
//! {
//!     "random_seed": 7,
//!     "sampling": "per_run",
//!     "tier_capacities": {
//!         "general": 500,
//!         "regular": { "sections": 2, "rows": 10, "seats": 20 },
//!         "premium": { "sections": 1, "rows": 2, "seats": 20 }
//!     }
//! }
//! ```
//!
//! Set `RUST_LOG=boxoffice=debug` to watch individual purchases go through.

use boxoffice::{simulate, SimulationConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SimulationConfig::default(),
    };

    let result = simulate(&config)?;
    println!("{result}");
    Ok(())
}
