use super::EventQueue;
use crate::engine::SimState;
use std::fmt::Debug;

/// A resumption of some simulated process.
///
/// Implementors describe what happens when the process wakes up: they may mutate the simulation state and schedule
/// further events, which is how one process spawns another or suspends itself until a timeout elapses.
///
/// Requiring implementors to be [`Debug`] enables printing the full contents of an [`EventQueue`] when necessary.
pub trait Event<State>: Debug
where
    State: SimState,
{
    /// Resume the process this event belongs to. The simulation will invoke this method during
    /// [`Simulation::run()`] once the event reaches the front of the queue, after the clock has advanced to the event's
    /// due time.
    ///
    /// # Errors
    ///
    /// Any error returned here halts [`Simulation::run()`] and is handed back to its caller unchanged. Scheduling a
    /// follow-up event with a negative delay is the most common source, reported as [`Error::InvalidDelay`].
    ///
    /// [`Simulation::run()`]: crate::engine::Simulation::run
    /// [`Error::InvalidDelay`]: crate::Error::InvalidDelay
    fn execute(&mut self, simulation_state: &mut State, event_queue: &mut EventQueue<State>) -> crate::Result;
}

/// An [`Event`] that is guaranteed not to return an [`Error`] on execution.
///
/// An implementation of [`Event`] is provided for all implementors of this trait which simply invokes
/// [`OkEvent::execute()`] then returns `Ok(())`.
///
/// [`Error`]: crate::Error
/// [`OkEvent::execute()`]: OkEvent::execute
pub trait OkEvent<State>: Debug
where
    State: SimState,
{
    /// Resume the process this event belongs to. See [`Event::execute()`].
    fn execute(&mut self, simulation_state: &mut State, event_queue: &mut EventQueue<State>);
}

impl<State, OkEventType> Event<State> for OkEventType
where
    State: SimState,
    OkEventType: OkEvent<State>,
{
    fn execute(&mut self, simulation_state: &mut State, event_queue: &mut EventQueue<State>) -> crate::Result {
        OkEvent::execute(self, simulation_state, event_queue);
        Ok(())
    }
}
