use super::EventQueue;

use serde::{Deserialize, Serialize};
use std::fmt::Formatter;

/// The type used for a simulation's overall state.
///
/// This trait has only one method, which provides a way for [`Simulation::run()`] to ask whether it should wrap up
/// event execution. The default implementation of this method will always answer "no," and so a simulation running
/// with the default will continue until the event queue becomes empty or a [`RunLimits`] bound is hit.
pub trait SimState {
    /// Reports whether the simulation has run to completion. This method will be invoked in [`Simulation::run()`]
    /// before popping each event off the queue: `true` indicates that the simulation is finished, whereas `false`
    /// means that `run()` should continue with the next scheduled event.
    // expect that other implementations will make use of the
    // argument even though this one doesn't
    #[allow(unused_variables)]
    fn is_complete(&self, now: f64) -> bool {
        false
    }
}

/// Hard bounds on how far a single [`Simulation::run()`] may go.
///
/// A stop condition that can never be satisfied would otherwise keep a simulation with a self-perpetuating event
/// source (such as an arrival generator) running forever. `None` disables the corresponding bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunLimits {
    /// No event due after this simulated time will execute.
    pub max_simulated_time: Option<f64>,
    /// Maximum number of events to execute.
    pub max_events: Option<u64>,
}

impl RunLimits {
    /// No bounds at all. Only use this with a state whose completion is guaranteed.
    pub const UNBOUNDED: Self = Self {
        max_simulated_time: None,
        max_events: None,
    };
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            max_simulated_time: Some(10_000_000.0),
            max_events: None,
        }
    }
}

/// Why [`Simulation::run()`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// [`SimState::is_complete()`] reported true.
    StopCondition,
    /// No events were left to execute.
    QueueExhausted,
    /// The next event was due after [`RunLimits::max_simulated_time`].
    TimeLimit,
    /// [`RunLimits::max_events`] events have executed.
    EventLimit,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let descriptor = match self {
            Self::StopCondition => "stop condition reached",
            Self::QueueExhausted => "event queue exhausted",
            Self::TimeLimit => "simulated time limit reached",
            Self::EventLimit => "event limit reached",
        };
        f.write_str(descriptor)
    }
}

/// Contains the event queue and other state belonging to a simulation.
///
/// A [`Simulation`] owns both its state and its event queue, providing both shared and mutable access to each so
/// clients can set up and tear down instances as needed - for example, scheduling initial events or reading the final
/// state for a report.
///
/// The expected workflow for a Simulation is:
///
/// 1. Initialize a struct that implements [`SimState`].
/// 2. Pass this struct and the start time to [`new()`].
/// 3. Schedule at least one initial event.
/// 4. Call [`run()`]. Handle any error it might return.
/// 5. Use the [`state()`] accessor to finish processing the results.
///
/// [`new()`]: Simulation::new
/// [`run()`]: Simulation::run
/// [`state()`]: Simulation::state
#[derive(Debug)]
pub struct Simulation<State>
where
    State: SimState,
{
    event_queue: EventQueue<State>,
    state: State,
    events_executed: u64,
}

impl<State> Simulation<State>
where
    State: SimState,
{
    /// Initialize a Simulation instance with the provided starting state and an event queue with clock set to the
    /// provided starting time.
    pub fn new(initial_state: State, start_time: f64) -> Self {
        Self {
            event_queue: EventQueue::new(start_time),
            state: initial_state,
            events_executed: 0,
        }
    }

    /// Execute events from the priority queue, one at a time, in ascending order by due time.
    ///
    /// Follows this loop:
    ///
    /// 1. Does [`state.is_complete()`] return true? If so, return [`Termination::StopCondition`].
    /// 2. Is the queue empty? If so, return [`Termination::QueueExhausted`].
    /// 3. Is the next event due after `limits.max_simulated_time`, or have `limits.max_events` events already
    ///    executed? If so, return [`Termination::TimeLimit`] or [`Termination::EventLimit`] without popping.
    /// 4. Pop the next event, advancing the clock, and pass exclusive references to the state and event queue to
    ///    [`event.execute()`]. Forward any error as-is to the caller, otherwise go back to step 1.
    ///
    /// Calling `run()` again after a limit was hit picks up where the previous call left off.
    ///
    /// # Errors
    ///
    /// Errors returned by events are passed back unchanged.
    ///
    /// [`state.is_complete()`]: SimState::is_complete
    /// [`event.execute()`]: super::Event::execute
    pub fn run(&mut self, limits: &RunLimits) -> crate::Result<Termination> {
        loop {
            if self.state.is_complete(self.event_queue.now()) {
                return Ok(Termination::StopCondition);
            }

            let Some(next_time) = self.event_queue.peek_time() else {
                return Ok(Termination::QueueExhausted);
            };
            if limits.max_simulated_time.is_some_and(|horizon| next_time > horizon) {
                return Ok(Termination::TimeLimit);
            }
            if limits.max_events.is_some_and(|budget| self.events_executed >= budget) {
                return Ok(Termination::EventLimit);
            }

            let Some(mut next_event) = self.event_queue.next() else {
                return Ok(Termination::QueueExhausted);
            };
            self.events_executed += 1;
            next_event.execute(&mut self.state, &mut self.event_queue)?;
        }
    }

    /// Number of events executed so far.
    pub fn events_executed(&self) -> u64 {
        self.events_executed
    }

    /// The current simulated time.
    pub fn now(&self) -> f64 {
        self.event_queue.now()
    }

    /// Get a shared reference to the simulation state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Get an exclusive reference to the simulation state.
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Get a shared reference to the event queue.
    pub fn event_queue(&self) -> &EventQueue<State> {
        &self.event_queue
    }

    /// Get an exclusive reference to the event queue.
    pub fn event_queue_mut(&mut self) -> &mut EventQueue<State> {
        &mut self.event_queue
    }

    /// Split into exclusive references to the state and the event queue, as an executing event sees them. Useful for
    /// scheduling initial events that need to consult the state.
    pub fn parts_mut(&mut self) -> (&mut State, &mut EventQueue<State>) {
        (&mut self.state, &mut self.event_queue)
    }

    /// Consume the simulation, keeping only its final state.
    pub fn into_state(self) -> State {
        self.state
    }
}

impl<State> std::fmt::Display for Simulation<State>
where
    State: SimState,
{
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Simulation at time {}", self.event_queue.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Event, OkEvent};

    #[derive(Debug)]
    struct State {
        executed_event_values: Vec<u32>,
        complete: bool,
    }

    impl SimState for State {
        fn is_complete(&self, _: f64) -> bool {
            self.complete
        }
    }

    #[derive(Debug)]
    struct TestEvent {
        value: u32,
    }

    impl Event<State> for TestEvent {
        fn execute(&mut self, simulation_state: &mut State, _: &mut EventQueue<State>) -> crate::Result {
            simulation_state.executed_event_values.push(self.value);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct CompletionEvent {}

    impl OkEvent<State> for CompletionEvent {
        fn execute(&mut self, simulation_state: &mut State, _: &mut EventQueue<State>) {
            simulation_state.complete = true;
        }
    }

    /// Reschedules itself forever, one time unit apart.
    #[derive(Debug)]
    struct Ticker {}

    impl Event<State> for Ticker {
        fn execute(&mut self, _: &mut State, event_queue: &mut EventQueue<State>) -> crate::Result {
            event_queue.schedule_after(Ticker {}, 1.0)
        }
    }

    /// Fails by scheduling a follow-up in the past.
    #[derive(Debug)]
    struct Rewind {}

    impl Event<State> for Rewind {
        fn execute(&mut self, _: &mut State, event_queue: &mut EventQueue<State>) -> crate::Result {
            event_queue.schedule_after(Rewind {}, -1.0)
        }
    }

    fn setup() -> Simulation<State> {
        let mut sim = Simulation::new(
            State {
                executed_event_values: Vec::with_capacity(3),
                complete: false,
            },
            0.0,
        );

        let events: [TestEvent; 3] = [TestEvent { value: 1 }, TestEvent { value: 3 }, TestEvent { value: 2 }];

        for (i, event) in events.into_iter().enumerate() {
            sim.event_queue.schedule_after(event, 2.0 * i as f64).unwrap();
        }
        sim
    }

    #[test]
    fn simulation_executes_events() {
        let mut sim = setup();
        let termination = sim.run(&RunLimits::UNBOUNDED).unwrap();

        assert_eq!(Termination::QueueExhausted, termination);
        assert_eq!(
            vec![1, 3, 2],
            sim.state.executed_event_values,
            "events did not execute in correct order"
        );
        assert_eq!(3, sim.events_executed());
        assert_eq!(4.0, sim.now(), "clock should rest at the last due time");
    }

    #[test]
    fn simulation_stops_with_events_still_in_queue() {
        let mut sim = setup();
        sim.event_queue.schedule_after(CompletionEvent {}, 3.0).unwrap();
        let termination = sim.run(&RunLimits::UNBOUNDED).unwrap();

        assert_eq!(Termination::StopCondition, termination);
        assert_eq!(
            vec![1, 3],
            sim.state.executed_event_values,
            "simulation did not terminate with completion event"
        );
        assert_eq!(1, sim.event_queue().len(), "pending event should stay queued");
    }

    #[test]
    fn time_limit_bounds_a_perpetual_process() {
        let mut sim = setup();
        sim.event_queue.schedule_now(Ticker {});
        let limits = RunLimits {
            max_simulated_time: Some(10.5),
            max_events: None,
        };

        assert_eq!(Termination::TimeLimit, sim.run(&limits).unwrap());
        assert_eq!(10.0, sim.now(), "no event beyond the horizon should execute");
    }

    #[test]
    fn event_limit_bounds_a_perpetual_process() {
        let mut sim = setup();
        sim.event_queue.schedule_now(Ticker {});
        let limits = RunLimits {
            max_simulated_time: None,
            max_events: Some(20),
        };

        assert_eq!(Termination::EventLimit, sim.run(&limits).unwrap());
        assert_eq!(20, sim.events_executed());

        let more = RunLimits {
            max_simulated_time: None,
            max_events: Some(25),
        };
        assert_eq!(Termination::EventLimit, sim.run(&more).unwrap());
        assert_eq!(25, sim.events_executed(), "second run should resume the first");
    }

    #[test]
    fn event_errors_halt_the_run() {
        let mut sim = setup();
        sim.event_queue.schedule_after(Rewind {}, 1.0).unwrap();

        let result = sim.run(&RunLimits::UNBOUNDED);
        assert_eq!(Err(crate::Error::InvalidDelay { delay: -1.0 }), result);
        assert_eq!(vec![1], sim.state.executed_event_values, "run should stop at the failing event");
    }
}
