//! Per-subsystem cooperative runtime.
//!
//! Every logical subsystem owns one message queue and one [`Notifier`], a
//! small bitset it blocks on. Distinct bits multiplex distinct wake reasons
//! over a single wait: [`NOTIFY_QUEUE`] ("inbound queue has data"),
//! [`NOTIFY_TICK`] ("periodic event fired"), and anything above
//! [`NOTIFY_USER_BASE`] is free for a subsystem's own sub-protocols.
//!
//! The loop in [`TaskRuntime::run`]:
//!
//! 1. Block on the notifier; the fired subset is returned and cleared.
//! 2. Queue bit set → drain the queue completely. Timer-delivery messages
//!    (destination [`Address::Internal`], id [`MessageId::TimerTimeout`])
//!    are routed to [`TaskHandler::on_timer`] with the decoded timer id;
//!    everything else goes to [`TaskHandler::on_message`]. Control yields
//!    between messages so a long burst cannot starve other subsystems.
//! 3. Tick bit set → [`TaskHandler::on_timer`] with [`TICK_TIMER_ID`].
//! 4. Any remaining bits → [`TaskHandler::on_unknown_notification`]
//!    (default: warn and ignore).
//!
//! A burst of N enqueues followed by one notification coalesces into a
//! single wake that drains all N, in FIFO order per producer.

use core::future::poll_fn;
use core::task::Poll;

use embassy_futures::yield_now;
use embassy_sync::channel::Channel;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::waitqueue::AtomicWaker;
use portable_atomic::{AtomicU32, Ordering};

use crate::bus::MessageBus;
use crate::message::{Address, Message, MessageId};

/// Depth of each subsystem's inbound message queue.
pub const MESSAGE_QUEUE_DEPTH: usize = 8;

/// Inbound queue type owned by each subsystem.
pub type MessageQueue = Channel<CriticalSectionRawMutex, Message, MESSAGE_QUEUE_DEPTH>;

/// Notification bit: the inbound queue has data.
pub const NOTIFY_QUEUE: u32 = 1 << 0;
/// Notification bit: a periodic event fired without a queued message.
pub const NOTIFY_TICK: u32 = 1 << 1;
/// First bit free for subsystem-defined notifications.
pub const NOTIFY_USER_BASE: u32 = 1 << 2;

/// Timer id reported for a bare [`NOTIFY_TICK`] wake.
pub const TICK_TIMER_ID: u32 = 0;

/// A small bitset a task blocks on.
///
/// `wait` has clear-on-exit semantics: it resolves once any bit is set and
/// returns the whole fired subset, atomically clearing it. Wakes are level
/// coalescing — notifying twice before the waiter runs yields one wake.
pub struct Notifier {
    bits: AtomicU32,
    waker: AtomicWaker,
}

impl Notifier {
    /// New notifier with no pending bits.
    pub const fn new() -> Self {
        Self {
            bits: AtomicU32::new(0),
            waker: AtomicWaker::new(),
        }
    }

    /// Set `bits` and wake the waiting task, if any. Callable from any
    /// context, including another subsystem's dispatch.
    pub fn notify(&self, bits: u32) {
        self.bits.fetch_or(bits, Ordering::SeqCst);
        self.waker.wake();
    }

    /// Atomically take and clear all pending bits without waiting.
    pub fn take(&self) -> u32 {
        self.bits.swap(0, Ordering::SeqCst)
    }

    /// Block until at least one bit is set; returns and clears the fired
    /// subset.
    pub async fn wait(&self) -> u32 {
        poll_fn(|cx| {
            let fired = self.bits.swap(0, Ordering::SeqCst);
            if fired != 0 {
                return Poll::Ready(fired);
            }
            self.waker.register(cx.waker());
            // Re-check after registering so a notify racing with the
            // registration is not lost.
            let fired = self.bits.swap(0, Ordering::SeqCst);
            if fired != 0 {
                Poll::Ready(fired)
            } else {
                Poll::Pending
            }
        })
        .await
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-owning aggregate of the shared objects a task needs: its inbound
/// queue, its notifier, and the bus. Handed to the task at initialization;
/// the task never takes ownership of any of them.
#[derive(Clone, Copy)]
pub struct TaskObjects {
    /// This subsystem's inbound queue.
    pub inbox: &'static MessageQueue,
    /// This subsystem's notification bits.
    pub notifier: &'static Notifier,
    /// The system-wide message bus.
    pub bus: &'static MessageBus,
}

/// Per-subsystem dispatch hooks. Defaults are deliberate no-ops so a
/// subsystem only overrides what it handles.
pub trait TaskHandler {
    /// A message arrived on the subsystem's queue.
    fn on_message(&mut self, message: &Message) {
        trace!(
            "task: unhandled message from {} id {}",
            message.source.as_str(),
            message.id as u8
        );
    }

    /// A periodic event fired, either as a bare tick ([`TICK_TIMER_ID`]) or
    /// delivered by a [`TimerBridge`](crate::timer::TimerBridge) with its
    /// timer id.
    fn on_timer(&mut self, timer_id: u32) {
        let _ = timer_id;
    }

    /// A notification bit outside the runtime's protocol fired.
    fn on_unknown_notification(&mut self, bits: u32) {
        warn!("task: unknown notification bits {:x}", bits);
    }
}

/// The cooperative loop driving one subsystem.
pub struct TaskRuntime {
    name: &'static str,
    objects: TaskObjects,
}

impl TaskRuntime {
    /// New runtime for the subsystem that owns `objects`.
    pub const fn new(name: &'static str, objects: TaskObjects) -> Self {
        Self { name, objects }
    }

    /// Shared objects this runtime was built with.
    pub const fn objects(&self) -> &TaskObjects {
        &self.objects
    }

    /// Run the subsystem loop forever.
    pub async fn run(&self, handler: &mut impl TaskHandler) -> ! {
        debug!("task '{}' started", self.name);
        loop {
            self.step(handler).await;
        }
    }

    /// Process a single wake: wait for notification bits, then dispatch.
    ///
    /// Exposed separately so integrators and tests can drive the loop one
    /// wake at a time.
    pub async fn step(&self, handler: &mut impl TaskHandler) {
        let fired = self.objects.notifier.wait().await;

        if fired & NOTIFY_QUEUE != 0 {
            while let Ok(message) = self.objects.inbox.try_receive() {
                self.dispatch(handler, &message);
                // Allow other tasks to run between messages.
                yield_now().await;
            }
        }

        if fired & NOTIFY_TICK != 0 {
            handler.on_timer(TICK_TIMER_ID);
        }

        let other = fired & !(NOTIFY_QUEUE | NOTIFY_TICK);
        if other != 0 {
            handler.on_unknown_notification(other);
        }
    }

    fn dispatch(&self, handler: &mut impl TaskHandler, message: &Message) {
        let is_timer_delivery =
            message.destination == Address::Internal && message.id == MessageId::TimerTimeout;
        if is_timer_delivery {
            match message.decode_u32_payload() {
                Ok(timer_id) => handler.on_timer(timer_id),
                Err(_) => {
                    warn!("task '{}': truncated timer message dropped", self.name);
                }
            }
        } else {
            handler.on_message(message);
        }
    }
}
