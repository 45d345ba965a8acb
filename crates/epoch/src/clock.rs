//! Process-wide epoch broadcaster.
//!
//! The clock holds the most recently confirmed epoch and the ordered list of
//! subscribers. Advances are delivered synchronously, under the subscriber
//! lock, so every subscriber observes the same sequence of epochs in the same
//! order. Subscribers must not call [`EpochClock::subscribe`] or
//! [`EpochClock::advance_to`] from inside a notification.
//!
//! The clock only holds weak references. A subscriber whose last strong
//! reference is dropped stops receiving epochs and is pruned on the next
//! advance.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use shardnode_core::{EpochNotifier, EpochSubscriber};
use shardnode_types::{Epoch, Round};
use tracing::{debug, trace};

use crate::schedule::RoundSchedule;

/// Broadcasts the current epoch to its subscribers.
pub struct EpochClock {
    /// Last confirmed epoch, readable without the subscriber lock
    current: AtomicU32,
    /// Subscribers in registration order; the lock also serializes advances
    subscribers: Mutex<Vec<Weak<dyn EpochSubscriber>>>,
}

impl EpochClock {
    /// Create a clock starting at `start_epoch`.
    pub fn new(start_epoch: Epoch) -> Self {
        Self {
            current: AtomicU32::new(start_epoch),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Confirm `epoch`.
    ///
    /// Epochs only move forward: an epoch equal to or older than the current
    /// one is ignored and `false` is returned. Otherwise every subscriber is
    /// notified with `(epoch, previous)` and `true` is returned.
    pub fn advance_to(&self, epoch: Epoch) -> bool {
        let mut subscribers = self.subscribers.lock();

        let previous = self.current.load(Ordering::Acquire);
        if epoch <= previous {
            trace!(epoch, current = previous, "Ignoring non-advancing epoch");
            return false;
        }
        self.current.store(epoch, Ordering::Release);

        let registered = subscribers.len();
        subscribers.retain(|subscriber| subscriber.strong_count() > 0);
        if subscribers.len() < registered {
            trace!(
                pruned = registered - subscribers.len(),
                "Dropped subscribers pruned"
            );
        }

        debug!(
            new_epoch = epoch,
            previous_epoch = previous,
            subscribers = subscribers.len(),
            "Epoch confirmed"
        );
        for subscriber in subscribers.iter().filter_map(Weak::upgrade) {
            subscriber.on_epoch_confirmed(epoch, previous);
        }
        true
    }

    /// Advance the clock to the epoch containing `round`, if that is newer.
    pub fn observe_round(&self, schedule: &RoundSchedule, round: Round) -> bool {
        self.advance_to(schedule.epoch_for_round(round))
    }

    /// Number of registered subscribers still alive.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .iter()
            .filter(|subscriber| subscriber.strong_count() > 0)
            .count()
    }
}

impl EpochNotifier for EpochClock {
    fn subscribe(&self, handler: Arc<dyn EpochSubscriber>) {
        let mut subscribers = self.subscribers.lock();
        let current = self.current.load(Ordering::Acquire);
        handler.on_epoch_confirmed(current, current);
        subscribers.push(Arc::downgrade(&handler));
    }

    fn current_epoch(&self) -> Epoch {
        self.current.load(Ordering::Acquire)
    }
}

impl Default for EpochClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Debug for EpochClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpochClock")
            .field("current", &self.current.load(Ordering::Relaxed))
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
