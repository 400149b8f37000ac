//! Time keeping: local clock observation and sync-service supervision.
//!
//! [`TimeKeeper`] watches the platform clock on a 1 s poll and publishes a
//! [`MessageId::DatetimeChanged`] to the display whenever the visible
//! hour/minute changes. It never publishes before the first completed sync,
//! so the face stays blank instead of showing the epoch default. The sync
//! service itself is started and stopped by connectivity status.

use embassy_time::Duration;

use crate::datetime::DateTime;
use crate::message::{Address, Message, MessageId};
use crate::task::{TaskHandler, TaskObjects};

/// Timer id of the 1 s clock observation poll.
pub const TIME_POLL_TIMER_ID: u32 = 2;
/// Period of the poll timer.
pub const TIME_POLL_PERIOD: Duration = Duration::from_secs(1);

/// The platform's readable and settable local clock.
pub trait WallClock {
    /// Current local date and time.
    fn now(&self) -> DateTime;
    /// Step the clock to `datetime`.
    fn set(&mut self, datetime: DateTime);
}

/// The external time-sync service; it reports completions through
/// [`publish_sync_completed`].
pub trait SyncService {
    /// Begin periodic synchronization.
    fn start(&mut self);
    /// Stop synchronization, e.g. while the network is down.
    fn stop(&mut self);
}

/// Report a completed sync round into the time subsystem's mailbox.
///
/// Called from the sync service's completion callback with an explicit bus
/// handle.
pub fn publish_sync_completed(bus: &crate::bus::MessageBus, datetime: DateTime) {
    let mut message = Message::new(Address::Time, Address::Time, MessageId::SntpSyncCompleted);
    if message.encode_u32_payload(datetime.to_dword()).is_err() {
        warn!("clock: sync result encode failed, dropped");
        return;
    }
    bus.send(&message);
}

/// The time subsystem.
pub struct TimeKeeper<C: WallClock, S: SyncService> {
    clock: C,
    sync: S,
    objects: TaskObjects,
    synced: bool,
    last_published: Option<(u8, u8)>,
}

impl<C: WallClock, S: SyncService> TimeKeeper<C, S> {
    /// New keeper; nothing is published until a sync completes.
    pub const fn new(clock: C, sync: S, objects: TaskObjects) -> Self {
        Self {
            clock,
            sync,
            objects,
            synced: false,
            last_published: None,
        }
    }

    /// Whether at least one sync round has completed.
    pub const fn is_synced(&self) -> bool {
        self.synced
    }

    /// The platform clock, for integrators that need direct access.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Publish the current time if the visible hour/minute moved since the
    /// last publication.
    fn observe_clock(&mut self) {
        if !self.synced {
            return;
        }
        let now = self.clock.now();
        let visible = (now.time.hour, now.time.minute);
        if self.last_published == Some(visible) {
            return;
        }
        self.last_published = Some(visible);
        debug!("clock: {}:{}, notifying display", visible.0, visible.1);
        let mut message = Message::new(Address::Time, Address::Display, MessageId::DatetimeChanged);
        if message.encode_u32_payload(now.to_dword()).is_err() {
            warn!("clock: datetime encode failed, dropped");
            return;
        }
        self.objects.bus.send(&message);
    }
}

impl<C: WallClock, S: SyncService> TaskHandler for TimeKeeper<C, S> {
    fn on_message(&mut self, message: &Message) {
        match message.id {
            MessageId::WifiStaConnected => {
                info!("clock: network up, starting sync");
                self.sync.start();
            }
            MessageId::WifiNotConnected => {
                info!("clock: network down, stopping sync");
                self.sync.stop();
            }
            MessageId::SntpSyncCompleted => match message.decode_u32_payload() {
                Ok(dword) => {
                    let datetime = DateTime::from_dword(dword);
                    self.clock.set(datetime);
                    self.synced = true;
                    debug!(
                        "clock: sync completed at {}:{}:{}",
                        datetime.time.hour, datetime.time.minute, datetime.time.second
                    );
                }
                Err(_) => warn!("clock: truncated sync result dropped"),
            },
            _ => {}
        }
    }

    fn on_timer(&mut self, timer_id: u32) {
        if timer_id == TIME_POLL_TIMER_ID {
            self.observe_clock();
        }
    }
}
