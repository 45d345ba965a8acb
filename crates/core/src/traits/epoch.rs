//! Epoch change broadcast.

use std::sync::Arc;

use shardnode_types::Epoch;

/// Receives epoch change notifications.
///
/// Handlers run synchronously on the notifying thread and must not block:
/// copy the epoch somewhere cheap (an atomic) and return.
pub trait EpochSubscriber: Send + Sync {
    /// Called once at subscription with `(current, current)` and then on every
    /// epoch advance with `(new_epoch, previous_epoch)`.
    fn on_epoch_confirmed(&self, new_epoch: Epoch, previous_epoch: Epoch);
}

/// Source of epoch change notifications.
pub trait EpochNotifier: Send + Sync {
    /// Register `handler`. Handlers are notified in registration order.
    ///
    /// Notifiers may hold `handler` weakly, so the caller keeps it alive for
    /// as long as it wants notifications.
    fn subscribe(&self, handler: Arc<dyn EpochSubscriber>);

    /// The most recently confirmed epoch.
    fn current_epoch(&self) -> Epoch;
}
