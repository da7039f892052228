//! Capacity-limited resources with a FIFO wait queue.
//!
//! A [`ResourcePool`] does not know about events or the clock. Acquiring either hands back a [`SlotGrant`] right away
//! or parks the waiter; releasing a grant either frees the slot or passes it straight to the longest-waiting waiter.
//! In both "granted" cases the caller is responsible for resuming the process that now holds the slot, normally by
//! scheduling its next event for the current time.

use crate::Error;

use std::collections::VecDeque;

/// Proof that the holder occupies one slot of a [`ResourcePool`].
///
/// A grant cannot be cloned or built outside this module, and the only way to give up a slot is to hand the grant
/// back through [`ResourcePool::release()`]. Processes carry their grants along with them from event to event.
#[must_use = "a slot stays occupied until its grant is released"]
#[derive(Debug, PartialEq, Eq)]
pub struct SlotGrant {
    pool: &'static str,
}

impl SlotGrant {
    /// Name of the pool this grant belongs to.
    pub fn pool(&self) -> &'static str {
        self.pool
    }
}

/// Result of [`ResourcePool::acquire()`].
#[must_use]
#[derive(Debug)]
pub enum Acquisition<W> {
    /// A slot was free. The waiter is handed back together with its grant.
    Granted(W, SlotGrant),
    /// Every slot is taken. The waiter joined the back of the queue and will be handed out by a later release.
    Queued,
}

/// A reusable mutual-exclusion primitive admitting up to `capacity` holders at once.
///
/// Invariants:
///
/// * `in_use <= capacity` at all times.
/// * Waiters are only queued while `in_use == capacity`, and are granted slots strictly in arrival order. A released
///   slot goes to the head of the queue before anyone else can ask for it.
#[derive(Debug)]
pub struct ResourcePool<W> {
    name: &'static str,
    capacity: usize,
    in_use: usize,
    wait_queue: VecDeque<W>,
    peak_in_use: usize,
    total_grants: u64,
}

impl<W> ResourcePool<W> {
    /// Create an idle pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    pub fn new(name: &'static str, capacity: usize) -> crate::Result<Self> {
        if capacity < 1 {
            return Err(Error::InvalidCapacity { pool: name, capacity });
        }

        Ok(Self {
            name,
            capacity,
            in_use: 0,
            wait_queue: VecDeque::new(),
            peak_in_use: 0,
            total_grants: 0,
        })
    }

    /// Ask for a slot on behalf of `waiter`.
    pub fn acquire(&mut self, waiter: W) -> Acquisition<W> {
        if self.in_use < self.capacity {
            self.in_use += 1;
            self.peak_in_use = self.peak_in_use.max(self.in_use);
            tracing::trace!(pool = self.name, in_use = self.in_use, "slot granted");
            Acquisition::Granted(waiter, self.grant())
        } else {
            self.wait_queue.push_back(waiter);
            tracing::trace!(pool = self.name, queued = self.wait_queue.len(), "waiting for slot");
            Acquisition::Queued
        }
    }

    /// Give a slot back. If anyone is waiting, the slot moves directly to the head of the queue and that waiter is
    /// returned with its new grant; `in_use` does not change in that case.
    pub fn release(&mut self, grant: SlotGrant) -> Option<(W, SlotGrant)> {
        let SlotGrant { pool } = grant;
        debug_assert_eq!(self.name, pool, "grant released to the wrong pool");
        debug_assert!(self.in_use > 0, "release without a matching acquire");

        if let Some(next) = self.wait_queue.pop_front() {
            tracing::trace!(pool = self.name, queued = self.wait_queue.len(), "slot handed off");
            Some((next, self.grant()))
        } else {
            self.in_use -= 1;
            None
        }
    }

    fn grant(&mut self) -> SlotGrant {
        self.total_grants += 1;
        SlotGrant { pool: self.name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently held.
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Number of waiters queued for a slot.
    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    /// Highest value `in_use` has reached.
    pub fn peak_in_use(&self) -> usize {
        self.peak_in_use
    }

    /// Number of slots handed out so far, including hand-offs.
    pub fn total_grants(&self) -> u64 {
        self.total_grants
    }
}
