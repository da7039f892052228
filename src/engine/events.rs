mod event_holder;
pub(super) mod event_traits;

use super::SimState;
use crate::Error;
use event_holder::EventHolder;
use event_traits::Event;

use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Priority queue of scheduled events, together with the simulation clock.
///
/// Events will execute in ascending order of due time, with ties broken by the order in which they were scheduled.
/// The clock only moves when [`Simulation::run()`] pops an event, at which point it jumps to that event's due time;
/// it is read-only to everything else.
///
/// All scheduling methods compare the requested due time against the current clock. Attempting to schedule an event
/// in the past (a negative or NaN delay) results in an [`Error::InvalidDelay`] without modifying the queue.
///
/// [`Simulation::run()`]: crate::engine::Simulation::run
/// [`Error::InvalidDelay`]: crate::Error::InvalidDelay
#[derive(Debug)]
pub struct EventQueue<State>
where
    State: SimState,
{
    events: BinaryHeap<Reverse<EventHolder<State>>>,
    now: OrderedFloat<f64>,
    events_added: u64,
}

impl<State> Default for EventQueue<State>
where
    State: SimState,
{
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<State> EventQueue<State>
where
    State: SimState,
{
    /// Construct a new [`EventQueue`] with no scheduled events and a clock initialized to the provided time.
    pub(crate) fn new(start_time: f64) -> Self {
        Self {
            events: BinaryHeap::default(),
            now: OrderedFloat(start_time),
            events_added: 0,
        }
    }

    /// Schedule the provided event to resume after `delay` time units.
    ///
    /// # Errors
    ///
    /// If `delay` is negative or NaN, returns an [`Error::InvalidDelay`] with no modifications to the queue.
    ///
    /// [`Error::InvalidDelay`]: crate::Error::InvalidDelay
    pub fn schedule_after<EventType>(&mut self, event: EventType, delay: f64) -> crate::Result
    where
        EventType: Event<State> + 'static,
    {
        // written this way round so that NaN is rejected as well
        if !(delay >= 0.0) {
            return Err(Error::InvalidDelay { delay });
        }

        self.push(Box::new(event), OrderedFloat(self.now.0 + delay));
        Ok(())
    }

    /// Schedule the provided event at the specified absolute time.
    ///
    /// # Errors
    ///
    /// If `time` is earlier than the current clock time, returns an [`Error::InvalidDelay`] carrying the (negative)
    /// difference, with no modifications to the queue.
    ///
    /// [`Error::InvalidDelay`]: crate::Error::InvalidDelay
    pub fn schedule_at<EventType>(&mut self, event: EventType, time: f64) -> crate::Result
    where
        EventType: Event<State> + 'static,
    {
        self.schedule_after(event, time - self.now.0)
    }

    /// Schedule the provided event to resume at the current time. Events previously scheduled for "now" will still
    /// execute before this event does.
    pub fn schedule_now<EventType>(&mut self, event: EventType)
    where
        EventType: Event<State> + 'static,
    {
        self.push(Box::new(event), self.now);
    }

    fn push(&mut self, event: Box<dyn Event<State>>, due_time: OrderedFloat<f64>) {
        let sequence_id = self.events_added;
        self.events_added += 1;
        self.events.push(Reverse(EventHolder {
            due_time,
            sequence_id,
            event,
        }));
    }

    /// Crate-internal function to pop an event from the queue. Advances the clock to the due time of the popped event.
    pub(crate) fn next(&mut self) -> Option<Box<dyn Event<State>>> {
        let Reverse(holder) = self.events.pop()?;
        debug_assert!(holder.due_time >= self.now, "clock must never run backwards");
        self.now = holder.due_time;
        Some(holder.event)
    }

    /// Due time of the earliest pending event, if any.
    pub fn peek_time(&self) -> Option<f64> {
        self.events.peek().map(|Reverse(holder)| holder.due_time.0)
    }

    /// The current simulated time.
    pub fn now(&self) -> f64 {
        self.now.0
    }

    /// Number of events waiting to execute.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<State> std::fmt::Display for EventQueue<State>
where
    State: SimState,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            formatter,
            "EventQueue with {} scheduled events at current time {}",
            self.events.len(),
            self.now.0
        )
    }
}
