//! Address-keyed single-consumer message routing.
//!
//! The bus stores at most one consumer per routable address (last write
//! wins; there is no fan-out — a deliberate design limit, and any broadcast
//! is an explicit loop over destinations at the call site, see
//! [`crate::wifi`]). Delivery is synchronous on the sender's execution
//! context: the registered consumer's [`MessageSink::on_message`] runs
//! before [`MessageBus::send`] returns. Crossing a task boundary is the
//! consumer's job, which is what [`MessageReceiver`] does by copying the
//! message into the destination subsystem's queue and raising its
//! notification bit.
//!
//! The registry is written during system initialization only, before any
//! subsystem loop starts dispatching, and is read-only afterwards. That
//! ordering is an integrator invariant, not something enforced here.

use core::cell::RefCell;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::message::{ADDRESS_COUNT, Address, Message};
use crate::task::{MessageQueue, NOTIFY_QUEUE, Notifier};

/// A consumer of bus messages.
pub trait MessageSink: Sync {
    /// Deliver one message. Runs on the sender's execution context and must
    /// not block.
    fn on_message(&self, message: &Message);
}

type Registry = [Option<&'static dyn MessageSink>; ADDRESS_COUNT];

/// Address-indexed registry routing each message to the single consumer
/// registered for its destination.
pub struct MessageBus {
    registry: Mutex<CriticalSectionRawMutex, RefCell<Registry>>,
}

impl MessageBus {
    /// New bus with no registered consumers.
    pub const fn new() -> Self {
        Self {
            registry: Mutex::new(RefCell::new([None; ADDRESS_COUNT])),
        }
    }

    /// Register `sink` as the consumer for `address`.
    ///
    /// Exactly one consumer per address; registering twice replaces the
    /// earlier one. Pseudo-addresses are rejected with a log line.
    pub fn register(&self, address: Address, sink: &'static dyn MessageSink) {
        let Some(slot) = address.index() else {
            warn!("MessageBus: refusing to register pseudo-address {}", address.as_str());
            return;
        };
        self.registry.lock(|registry| {
            registry.borrow_mut()[slot] = Some(sink);
        });
    }

    /// Route `message` to the consumer registered for its destination.
    ///
    /// Sending to an address with no registered consumer is not an error:
    /// the message is silently dropped (destinations may not be ready yet).
    pub fn send(&self, message: &Message) {
        debug_assert!(message.source.index().is_some(), "source must be routable");
        let Some(slot) = message.destination.index() else {
            warn!(
                "MessageBus: dropping message to pseudo-address {}",
                message.destination.as_str()
            );
            return;
        };
        // Copy the handle out so the consumer runs outside the registry lock.
        let sink = self.registry.lock(|registry| registry.borrow()[slot]);
        match sink {
            Some(sink) => sink.on_message(message),
            None => {
                trace!(
                    "MessageBus: no consumer for {}, message dropped",
                    message.destination.as_str()
                );
            }
        }
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

/// The standard bus consumer for a subsystem: copy the message into the
/// subsystem's queue and raise its queue notification bit.
///
/// If the queue is full the message is dropped — the bus never applies
/// back-pressure to the sender, only the receiver's own consumption is
/// delayed.
pub struct MessageReceiver {
    queue: &'static MessageQueue,
    notifier: &'static Notifier,
}

impl MessageReceiver {
    /// New receiver feeding `queue` and waking `notifier`.
    pub const fn new(queue: &'static MessageQueue, notifier: &'static Notifier) -> Self {
        Self { queue, notifier }
    }
}

impl MessageSink for MessageReceiver {
    fn on_message(&self, message: &Message) {
        if self.queue.try_send(*message).is_err() {
            warn!(
                "MessageReceiver: queue full, dropping message for {}",
                message.destination.as_str()
            );
        }
        self.notifier.notify(NOTIFY_QUEUE);
    }
}
