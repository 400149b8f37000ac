//! Fixed-shape addressed datagrams used for all inter-subsystem traffic.

use crate::codec;
use crate::{Error, Result};

/// Length of the fixed message payload buffer.
pub const MESSAGE_PAYLOAD_LEN: usize = 4;

/// Number of routable module addresses (pseudo-addresses excluded).
pub const ADDRESS_COUNT: usize = 5;

/// Source/destination module identifiers.
///
/// The first five values are routable through the
/// [`MessageBus`](crate::bus::MessageBus). [`Address::Timer`] and
/// [`Address::Internal`] are reserved for intra-subsystem timer delivery and
/// are never valid bus destinations; [`Address::index`] makes that explicit
/// by returning `None` for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Address {
    /// Application-level supervisor.
    Application = 0,
    /// LED matrix display subsystem.
    Display,
    /// Time-keeping subsystem.
    Time,
    /// Wi-Fi connectivity subsystem.
    Wifi,
    /// Web control-panel subsystem.
    Web,
    /// Pseudo-source of timer-delivery messages (not routable).
    Timer,
    /// Pseudo-destination for a subsystem's own queue (not routable).
    Internal,
}

impl Address {
    /// Slot index in the bus registry, or `None` for pseudo-addresses.
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::Application | Self::Display | Self::Time | Self::Wifi | Self::Web => {
                Some(self as usize)
            }
            Self::Timer | Self::Internal => None,
        }
    }

    /// Short name for log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Application => "APP",
            Self::Display => "DISPLAY",
            Self::Time => "TIME",
            Self::Wifi => "WIFI",
            Self::Web => "WEB",
            Self::Timer => "TIMER",
            Self::Internal => "INTERNAL",
        }
    }
}

/// Message identifiers.
///
/// Each value carries an implicit payload contract, noted per variant; most
/// status broadcasts carry none.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MessageId {
    /// No-op placeholder.
    None = 0,
    /// Periodic timer fired; payload is the `u32` timer id.
    TimerTimeout,
    /// Raw Wi-Fi hardware event; payload is one [`LinkEvent`](crate::wifi::LinkEvent) byte.
    WifiLinkEvent,
    /// Station link lost or never established.
    WifiNotConnected,
    /// Station connection attempt in progress.
    WifiConnecting,
    /// Station link established.
    WifiStaConnected,
    /// Access-point mode is up.
    WifiApStarted,
    /// Reachability probe to the internet succeeded.
    InternetAvailable,
    /// Time sync finished; payload is the packed date-time dword.
    SntpSyncCompleted,
    /// Wall-clock minute changed; payload is the packed date-time dword.
    DatetimeChanged,
    /// A persisted setting changed; consumers should reload.
    SettingsChanged,
}

/// Addressed datagram with a small fixed payload.
///
/// Messages are plain values: a producer constructs one, the bus or a queue
/// copies it, and the receiving task consumes and discards it. There is no
/// shared ownership.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    /// Producing module.
    pub source: Address,
    /// Consuming module.
    pub destination: Address,
    /// What the payload means.
    pub id: MessageId,
    /// Number of valid payload bytes.
    pub payload_len: u8,
    /// Payload storage; only the first `payload_len` bytes are meaningful.
    pub payload: [u8; MESSAGE_PAYLOAD_LEN],
}

impl Message {
    /// New message with an empty payload.
    pub const fn new(source: Address, destination: Address, id: MessageId) -> Self {
        Self {
            source,
            destination,
            id,
            payload_len: 0,
            payload: [0; MESSAGE_PAYLOAD_LEN],
        }
    }

    /// Pack a `u32` into the payload.
    pub fn encode_u32_payload(&mut self, value: u32) -> Result<()> {
        let written = codec::put_u32(&mut self.payload, 0, value);
        if written != size_of::<u32>() {
            return Err(Error::PayloadOverflow);
        }
        self.payload_len = size_of::<u32>() as u8;
        Ok(())
    }

    /// Pack a `u8` into the payload.
    pub fn encode_u8_payload(&mut self, value: u8) -> Result<()> {
        let written = codec::put_u8(&mut self.payload, 0, value);
        if written != size_of::<u8>() {
            return Err(Error::PayloadOverflow);
        }
        self.payload_len = size_of::<u8>() as u8;
        Ok(())
    }

    /// Unpack a `u32` payload, checking the declared length.
    pub fn decode_u32_payload(&self) -> Result<u32> {
        if (self.payload_len as usize) < size_of::<u32>() {
            return Err(Error::PayloadTruncated);
        }
        let (value, consumed) = codec::get_u32(&self.payload, 0);
        if consumed != size_of::<u32>() {
            return Err(Error::PayloadTruncated);
        }
        Ok(value)
    }

    /// Unpack a `u8` payload, checking the declared length.
    pub fn decode_u8_payload(&self) -> Result<u8> {
        if (self.payload_len as usize) < size_of::<u8>() {
            return Err(Error::PayloadTruncated);
        }
        let (value, consumed) = codec::get_u8(&self.payload, 0);
        if consumed != size_of::<u8>() {
            return Err(Error::PayloadTruncated);
        }
        Ok(value)
    }
}
