use super::Event;
use crate::engine::SimState;

use ordered_float::OrderedFloat;
use std::cmp::Ordering;

/// Entry in the event queue: the boxed event alongside its due time and the sequence number it was scheduled with.
///
/// Ordering looks at the due time first and falls back to the sequence number, so that events due at the same instant
/// run in the order they were scheduled. Replays with the same seed depend on this.
#[derive(Debug)]
pub(super) struct EventHolder<State>
where
    State: SimState,
{
    pub due_time: OrderedFloat<f64>,
    pub sequence_id: u64,
    pub event: Box<dyn Event<State>>,
}

impl<State> PartialEq<Self> for EventHolder<State>
where
    State: SimState,
{
    fn eq(&self, other: &Self) -> bool {
        self.sequence_id == other.sequence_id && self.due_time == other.due_time
    }
}

impl<State> Eq for EventHolder<State> where State: SimState {}

impl<State> PartialOrd<Self> for EventHolder<State>
where
    State: SimState,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<State> Ord for EventHolder<State>
where
    State: SimState,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.due_time
            .cmp(&other.due_time)
            .then_with(|| self.sequence_id.cmp(&other.sequence_id))
    }
}
