//! Periodic-timer-to-message bridge.
//!
//! A [`TimerBridge`] converts a recurring tick into a message on the owning
//! subsystem's own queue (bypassing the bus — this is intra-subsystem
//! traffic) plus a queue notification, so periodic work is handled by the
//! same dispatch path as message-driven work.

use embassy_time::{Duration, Ticker};
use portable_atomic::{AtomicBool, Ordering};

use crate::message::{Address, Message, MessageId};
use crate::task::{NOTIFY_QUEUE, TaskObjects};

/// Recurring (or one-shot) timer delivering [`MessageId::TimerTimeout`]
/// messages carrying its timer id.
pub struct TimerBridge {
    timer_id: u32,
    period: Duration,
    repeat: bool,
    running: AtomicBool,
}

impl TimerBridge {
    /// New bridge firing every `period`, repeatedly if `repeat`.
    ///
    /// The bridge starts enabled; `run` must be spawned by the integrator
    /// for fires to actually happen.
    pub const fn new(timer_id: u32, period: Duration, repeat: bool) -> Self {
        Self {
            timer_id,
            period,
            repeat,
            running: AtomicBool::new(true),
        }
    }

    /// Timer id delivered with each fire.
    pub const fn timer_id(&self) -> u32 {
        self.timer_id
    }

    /// Re-enable future fires.
    pub fn start(&self) {
        self.running.store(true, Ordering::Relaxed);
    }

    /// Stop future fires. An already-enqueued timeout message is not
    /// recalled; the receiving task will still see it.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// The spawnable timer loop. Ticks every `period` and fires into
    /// `objects` while running; a one-shot bridge exits after its first
    /// delivered fire.
    pub async fn run(&self, objects: TaskObjects) {
        let mut ticker = Ticker::every(self.period);
        loop {
            ticker.next().await;
            if !self.running.load(Ordering::Relaxed) {
                continue;
            }
            self.fire(&objects);
            if !self.repeat {
                break;
            }
        }
    }

    /// Deliver one fire: build the timer message, pack the id, enqueue it on
    /// the subsystem's own queue and raise the queue bit.
    ///
    /// A payload-encode failure (unreachable for a 4-byte id in a 4-byte
    /// field) drops the fire with a warning; a full queue likewise drops the
    /// message but still notifies.
    pub fn fire(&self, objects: &TaskObjects) {
        let mut message = Message::new(Address::Timer, Address::Internal, MessageId::TimerTimeout);
        if message.encode_u32_payload(self.timer_id).is_err() {
            warn!("TimerBridge: timer id {} encode failed, fire dropped", self.timer_id);
            return;
        }
        if objects.inbox.try_send(message).is_err() {
            warn!("TimerBridge: queue full, timer {} fire dropped", self.timer_id);
        }
        objects.notifier.notify(NOTIFY_QUEUE);
    }
}
