use crate::inventory::Tier;

/// Errors that may be encountered while configuring or
/// executing a box office simulation.
///
/// Every variant except [`SeatAlreadySold`] and
/// [`SeatOutOfRange`] is a configuration-time failure and is reported by
/// [`SimulationConfig::validate()`] before the first event
/// executes. Running out of seats is not an error; it is
/// recorded as oversell in the simulation's results.
///
/// The [`InvalidDelay`] variant originates from the
/// [`EventQueue`] to indicate that an event would have
/// been scheduled before the queue's current time. This
/// likely corresponds to a logical bug on the client side,
/// e.g. feeding an unclamped random draw to
/// [`EventQueue::schedule_after()`].
///
/// [`SimulationConfig::validate()`]: crate::SimulationConfig::validate
/// [`EventQueue`]: crate::engine::EventQueue
/// [`EventQueue::schedule_after()`]: crate::engine::EventQueue::schedule_after
/// [`InvalidDelay`]: Error::InvalidDelay
/// [`SeatAlreadySold`]: Error::SeatAlreadySold
/// [`SeatOutOfRange`]: Error::SeatOutOfRange
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The event queue rejected an event whose delay was
    /// negative or not a number.
    #[error("cannot schedule an event with delay {delay}")]
    InvalidDelay { delay: f64 },
    /// A resource pool was configured without room for
    /// even a single holder.
    #[error("resource pool `{pool}` needs a capacity of at least 1, got {capacity}")]
    InvalidCapacity { pool: &'static str, capacity: usize },
    /// A random distribution was given parameters it
    /// cannot be sampled with.
    #[error("malformed {name} distribution: {reason}")]
    MalformedDistribution { name: &'static str, reason: String },
    /// Some other configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// An allocation tried to sell a seat that was already
    /// sold. Seats are never returned, so this points at a
    /// bug in the allocation logic.
    #[error("seat {index} in {tier} is already sold")]
    SeatAlreadySold { tier: Tier, index: usize },
    /// An allocation addressed seats outside the table, or a
    /// run that spills past the end of its row.
    #[error("seat {index} is outside {tier}")]
    SeatOutOfRange { tier: Tier, index: usize },
    /// Configuration text could not be decoded.
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// [`std::result::Result`]`<T, `[`boxoffice::Error`]`>`
///
/// A type alias that simplifies the signatures of
/// various functions in boxoffice. Defaults to `()` for
/// the many operations, such as scheduling an event,
/// which only report success or failure.
///
/// [`boxoffice::Error`]: Error
pub type Result<T = ()> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_their_context() {
        let err = Error::InvalidCapacity {
            pool: "purchase action",
            capacity: 0,
        };
        assert_eq!(
            "resource pool `purchase action` needs a capacity of at least 1, got 0",
            err.to_string(),
            "unexpected error message"
        );

        let err = Error::SeatAlreadySold {
            tier: Tier::Premium,
            index: 7,
        };
        assert_eq!("seat 7 in premium seating is already sold", err.to_string());
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Parse(_)), "expected a parse error, got {err:?}");
    }
}
