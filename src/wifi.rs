//! Connectivity state machine.
//!
//! [`WifiManager`] owns the station/access-point lifecycle on top of a
//! platform [`WifiLink`]. It runs as a normal subsystem: hardware events
//! arrive as messages (see [`publish_link_event`]) and the connect timeout
//! is polled on a 1 s [`TimerBridge`](crate::timer::TimerBridge) tick, so a
//! hardware event and a timeout expiry in the same dispatch cannot both
//! apply.
//!
//! Status changes fan out to the time and web subsystems with one explicit
//! `send` per destination; the bus itself routes to a single consumer per
//! address and never broadcasts.

use embassy_time::Duration;

use crate::message::{Address, Message, MessageId};
use crate::task::{TaskHandler, TaskObjects};

/// Timer id of the 1 s poll driving the timeout check.
pub const WIFI_POLL_TIMER_ID: u32 = 1;
/// Period of the poll timer.
pub const WIFI_POLL_PERIOD: Duration = Duration::from_secs(1);
/// Poll ticks a connection attempt may take before a reconnect is issued.
pub const CONNECT_TIMEOUT_TICKS: u32 = 30;
/// Upper bound on the internet reachability probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// A link-layer event reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LinkEvent {
    StationStart = 0,
    StationStop = 1,
    StationConnected = 2,
    StationDisconnected = 3,
    GotIp = 4,
    LostIp = 5,
    AccessPointStarted = 6,
}

impl LinkEvent {
    /// Decode a serialized event byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::StationStart),
            1 => Some(Self::StationStop),
            2 => Some(Self::StationConnected),
            3 => Some(Self::StationDisconnected),
            4 => Some(Self::GotIp),
            5 => Some(Self::LostIp),
            6 => Some(Self::AccessPointStarted),
            _ => None,
        }
    }
}

/// The platform's network stack, reduced to what the state machine needs.
pub trait WifiLink {
    /// Whether station credentials are configured.
    fn has_credentials(&self) -> bool;
    /// Begin a station connection attempt with the configured credentials.
    fn connect_station(&mut self);
    /// Reissue the connection attempt after a timeout or disconnect.
    fn reconnect(&mut self);
    /// Bring up access-point mode; completion is reported as
    /// [`LinkEvent::AccessPointStarted`].
    fn start_access_point(&mut self);
    /// Whether the station link is currently up.
    fn is_link_connected(&self) -> bool;
    /// Probe reachability of a well-known external address, bounded by
    /// `timeout`.
    fn probe_internet(&mut self, timeout: Duration) -> bool;
    /// Start the captive-portal DNS responder.
    fn start_dns_responder(&mut self) -> crate::Result<()>;
}

/// Connectivity states. There is no terminal state; the machine runs for
/// the device's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WifiState {
    #[default]
    Idle,
    Connecting,
    Reconnecting,
    StaConnected,
    ApStarted,
}

/// Serialize a hardware event into the Wi-Fi subsystem's own mailbox.
///
/// Platform event callbacks call this with an explicit bus handle; the
/// manager itself never registers with the platform.
pub fn publish_link_event(bus: &crate::bus::MessageBus, event: LinkEvent) {
    let mut message = Message::new(Address::Wifi, Address::Wifi, MessageId::WifiLinkEvent);
    if message.encode_u8_payload(event as u8).is_err() {
        warn!("wifi: link event encode failed, dropped");
        return;
    }
    bus.send(&message);
}

/// The connectivity subsystem.
pub struct WifiManager<L: WifiLink> {
    link: L,
    objects: TaskObjects,
    state: WifiState,
    ticks_since_attempt: u32,
}

impl<L: WifiLink> WifiManager<L> {
    /// New manager in [`WifiState::Idle`]; the first poll tick decides the
    /// station-or-AP path.
    pub const fn new(link: L, objects: TaskObjects) -> Self {
        Self {
            link,
            objects,
            state: WifiState::Idle,
            ticks_since_attempt: 0,
        }
    }

    /// Current state, for integrators that surface it.
    pub const fn state(&self) -> WifiState {
        self.state
    }

    /// The platform link, for integrators that need direct access.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Advance the machine on a poll tick (`event == None`) or a hardware
    /// event.
    fn process(&mut self, event: Option<LinkEvent>) {
        match self.state {
            WifiState::Idle => self.leave_idle(),
            WifiState::Connecting | WifiState::Reconnecting => self.while_connecting(event),
            WifiState::StaConnected => self.while_connected(event),
            WifiState::ApStarted => {
                // AP mode is exited only by an external restart.
            }
        }
    }

    fn leave_idle(&mut self) {
        if self.link.has_credentials() {
            info!("wifi: credentials configured, starting station mode");
            self.link.connect_station();
            self.ticks_since_attempt = 0;
            self.state = WifiState::Connecting;
            self.emit_status(MessageId::WifiConnecting);
        } else {
            info!("wifi: no credentials, starting access point");
            self.link.start_access_point();
            self.ticks_since_attempt = 0;
            // Stay in Connecting until the AP-start event arrives.
            self.state = WifiState::Connecting;
        }
    }

    fn while_connecting(&mut self, event: Option<LinkEvent>) {
        match event {
            Some(LinkEvent::StationConnected) => {
                info!("wifi: station connected");
                self.state = WifiState::StaConnected;
                self.emit_status(MessageId::WifiStaConnected);
            }
            Some(LinkEvent::AccessPointStarted) => {
                if let Err(error) = self.link.start_dns_responder() {
                    // Degraded captive portal, not fatal.
                    error!("wifi: DNS responder failed to start: {}", error);
                }
                info!("wifi: access point up");
                self.state = WifiState::ApStarted;
                self.emit_status(MessageId::WifiApStarted);
            }
            other => {
                if other.is_none() {
                    self.ticks_since_attempt += 1;
                }
                if self.ticks_since_attempt >= CONNECT_TIMEOUT_TICKS
                    && !self.link.is_link_connected()
                {
                    error!(
                        "wifi: not connected after {} s, reconnecting",
                        CONNECT_TIMEOUT_TICKS
                    );
                    self.state = WifiState::Reconnecting;
                    self.emit_status(MessageId::WifiNotConnected);
                    self.ticks_since_attempt = 0;
                    self.link.reconnect();
                }
            }
        }
    }

    fn while_connected(&mut self, event: Option<LinkEvent>) {
        match event {
            Some(LinkEvent::GotIp) => {
                if self.link.probe_internet(PROBE_TIMEOUT) {
                    info!("wifi: internet reachable");
                    self.emit_status(MessageId::InternetAvailable);
                } else {
                    warn!("wifi: got IP but internet unreachable");
                }
            }
            Some(LinkEvent::StationDisconnected) => {
                warn!("wifi: station disconnected, reconnecting");
                self.state = WifiState::Reconnecting;
                self.emit_status(MessageId::WifiNotConnected);
                self.ticks_since_attempt = 0;
                self.link.reconnect();
            }
            _ => {}
        }
    }

    /// One send per interested subsystem; the bus has no fan-out.
    fn emit_status(&self, id: MessageId) {
        for destination in [Address::Time, Address::Web] {
            let message = Message::new(Address::Wifi, destination, id);
            self.objects.bus.send(&message);
        }
    }
}

impl<L: WifiLink> TaskHandler for WifiManager<L> {
    fn on_message(&mut self, message: &Message) {
        if message.id != MessageId::WifiLinkEvent {
            return;
        }
        match message.decode_u8_payload() {
            Ok(byte) => match LinkEvent::from_byte(byte) {
                Some(event) => self.process(Some(event)),
                None => warn!("wifi: unknown link event byte {}", byte),
            },
            Err(_) => warn!("wifi: truncated link event dropped"),
        }
    }

    fn on_timer(&mut self, timer_id: u32) {
        if timer_id == WIFI_POLL_TIMER_ID {
            self.process(None);
        }
    }
}
