//! In-process publish/subscribe channel with typed topics.
//!
//! The channel is the only coupling between panels: a panel publishes a
//! message on a [`Topic`] and every handler subscribed to that topic at the
//! moment of publishing receives it, synchronously and in subscription
//! order. There is no buffering or replay, so a handler registered after a
//! publish never sees that message.
//!
//! One channel is created per process and handed to each panel. Cloning a
//! [`NotificationChannel`] yields another handle onto the same registry.
//!
//! # Invariants
//!
//! 1. Handlers of one topic run in registration order.
//! 2. The subscriber set is captured when `publish` starts; handlers added or
//!    removed during dispatch take effect from the next publish.
//! 3. Dropping a [`Subscription`] removes its handler.
//! 4. Publishing with no subscribers is not an error.
//!
//! Handler panics are not caught and propagate to the publisher.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::data::RecordId;

/// Label attached to selection messages published by the results panel.
pub const CURRENT_BOAT_LOCATION: &str = "Current Boat Location";

/// A named, typed message stream.
pub trait Topic: 'static {
    /// Payload carried by the topic.
    type Message: Send + Sync + 'static;

    /// Stable topic name used in logs.
    const NAME: &'static str;
}

/// Topic announcing that the operator selected a boat.
#[derive(Debug, Clone, Copy)]
pub struct BoatSelected;

impl Topic for BoatSelected {
    type Message = SelectionMessage;

    const NAME: &'static str = "BoatMessageChannel";
}

/// Payload of [`BoatSelected`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionMessage {
    /// Selected boat.
    pub record_id: RecordId,
    /// Free-form context describing where the selection came from.
    pub context_label: String,
}

impl SelectionMessage {
    /// Builds a message for `record_id` with the standard context label.
    #[must_use]
    pub fn current_boat(record_id: RecordId) -> Self {
        Self {
            record_id,
            context_label: CURRENT_BOAT_LOCATION.to_owned(),
        }
    }
}

type ErasedHandler = Arc<dyn Fn(&dyn Any) + Send + Sync>;

struct Registration {
    id: u64,
    handler: ErasedHandler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    topics: HashMap<TypeId, Vec<Registration>>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared publish/subscribe bus.
#[derive(Clone, Default)]
pub struct NotificationChannel {
    registry: Arc<Mutex<Registry>>,
}

impl NotificationChannel {
    /// Creates an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for messages published on `T` from now on.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// dropped.
    pub fn subscribe<T, F>(&self, handler: F) -> Subscription
    where
        T: Topic,
        F: Fn(&T::Message) + Send + Sync + 'static,
    {
        let erased: ErasedHandler = Arc::new(move |message: &dyn Any| {
            if let Some(typed) = message.downcast_ref::<T::Message>() {
                handler(typed);
            }
        });

        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id = registry.next_id.wrapping_add(1);
        registry
            .topics
            .entry(TypeId::of::<T>())
            .or_default()
            .push(Registration {
                id,
                handler: erased,
            });
        tracing::trace!("subscription {id} registered on {}", T::NAME);

        Subscription {
            registry: Arc::downgrade(&self.registry),
            topic: TypeId::of::<T>(),
            id,
        }
    }

    /// Delivers `message` to every current subscriber of `T`.
    ///
    /// Returns the number of handlers that were invoked.
    pub fn publish<T: Topic>(&self, message: T::Message) -> usize {
        let handlers: Vec<ErasedHandler> = lock(&self.registry)
            .topics
            .get(&TypeId::of::<T>())
            .map(|registrations| {
                registrations
                    .iter()
                    .map(|registration| Arc::clone(&registration.handler))
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!("publishing on {} to {} subscriber(s)", T::NAME, handlers.len());
        for handler in &handlers {
            handler(&message);
        }
        handlers.len()
    }

    /// Number of handlers currently subscribed to `T`.
    #[must_use]
    pub fn subscriber_count<T: Topic>(&self) -> usize {
        lock(&self.registry)
            .topics
            .get(&TypeId::of::<T>())
            .map_or(0, Vec::len)
    }
}

impl fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = lock(&self.registry);
        let subscribers: usize = registry.topics.values().map(Vec::len).sum();
        f.debug_struct("NotificationChannel")
            .field("topics", &registry.topics.len())
            .field("subscribers", &subscribers)
            .finish()
    }
}

/// Registration handle returned by [`NotificationChannel::subscribe`].
///
/// Dropping the handle unsubscribes, so a panel's subscriptions end with the
/// panel.
#[derive(Debug)]
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    topic: TypeId,
    id: u64,
}

impl Subscription {
    /// Unsubscribes explicitly.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(shared) = self.registry.upgrade() else {
            return;
        };
        let mut registry = lock(&shared);
        if let Some(registrations) = registry.topics.get_mut(&self.topic) {
            registrations.retain(|registration| registration.id != self.id);
            if registrations.is_empty() {
                registry.topics.remove(&self.topic);
            }
        }
    }
}
