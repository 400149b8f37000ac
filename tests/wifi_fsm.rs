#![allow(missing_docs)]
//! Host-level tests for the connectivity state machine.

use std::sync::Mutex;

use embassy_time::Duration;

use wordclock_core::bus::{MessageBus, MessageSink};
use wordclock_core::message::{Address, Message, MessageId};
use wordclock_core::task::{MessageQueue, Notifier, TaskHandler, TaskObjects};
use wordclock_core::wifi::{
    CONNECT_TIMEOUT_TICKS, LinkEvent, WIFI_POLL_TIMER_ID, WifiLink, WifiManager, WifiState,
    publish_link_event,
};

/// Bus sink recording everything sent to one address.
#[derive(Default)]
struct Capture {
    messages: Mutex<Vec<Message>>,
}

impl Capture {
    fn count_of(&self, id: MessageId) -> usize {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|message| message.id == id)
            .count()
    }
}

impl MessageSink for Capture {
    fn on_message(&self, message: &Message) {
        self.messages.lock().unwrap().push(*message);
    }
}

/// Scriptable stand-in for the platform network stack.
struct FakeLink {
    has_credentials: bool,
    link_connected: bool,
    probe_result: bool,
    dns_result: wordclock_core::Result<()>,
    connect_calls: u32,
    reconnect_calls: u32,
    access_point_calls: u32,
    dns_calls: u32,
    probe_calls: u32,
}

impl FakeLink {
    fn new(has_credentials: bool) -> Self {
        Self {
            has_credentials,
            link_connected: false,
            probe_result: true,
            dns_result: Ok(()),
            connect_calls: 0,
            reconnect_calls: 0,
            access_point_calls: 0,
            dns_calls: 0,
            probe_calls: 0,
        }
    }
}

impl WifiLink for FakeLink {
    fn has_credentials(&self) -> bool {
        self.has_credentials
    }

    fn connect_station(&mut self) {
        self.connect_calls += 1;
    }

    fn reconnect(&mut self) {
        self.reconnect_calls += 1;
    }

    fn start_access_point(&mut self) {
        self.access_point_calls += 1;
    }

    fn is_link_connected(&self) -> bool {
        self.link_connected
    }

    fn probe_internet(&mut self, _timeout: Duration) -> bool {
        self.probe_calls += 1;
        self.probe_result
    }

    fn start_dns_responder(&mut self) -> wordclock_core::Result<()> {
        self.dns_calls += 1;
        self.dns_result
    }
}

fn link_event_message(event: LinkEvent) -> Message {
    let mut message = Message::new(Address::Wifi, Address::Wifi, MessageId::WifiLinkEvent);
    message.encode_u8_payload(event as u8).unwrap();
    message
}

fn tick(manager: &mut WifiManager<FakeLink>) {
    manager.on_timer(WIFI_POLL_TIMER_ID);
}

macro_rules! fixture {
    () => {{
        static QUEUE: MessageQueue = MessageQueue::new();
        static NOTIFIER: Notifier = Notifier::new();
        static BUS: MessageBus = MessageBus::new();
        static TIME_CAPTURE: Capture = Capture {
            messages: Mutex::new(Vec::new()),
        };
        static WEB_CAPTURE: Capture = Capture {
            messages: Mutex::new(Vec::new()),
        };
        BUS.register(Address::Time, &TIME_CAPTURE);
        BUS.register(Address::Web, &WEB_CAPTURE);
        (
            TaskObjects {
                inbox: &QUEUE,
                notifier: &NOTIFIER,
                bus: &BUS,
            },
            &TIME_CAPTURE,
            &WEB_CAPTURE,
        )
    }};
}

#[test]
fn without_credentials_the_machine_brings_up_the_access_point() {
    let (objects, time_capture, web_capture) = fixture!();
    let mut manager = WifiManager::new(FakeLink::new(false), objects);

    tick(&mut manager);
    assert_eq!(manager.state(), WifiState::Connecting);
    assert_eq!(manager.link_mut().access_point_calls, 1);
    assert_eq!(manager.link_mut().connect_calls, 0);

    manager.on_message(&link_event_message(LinkEvent::AccessPointStarted));
    assert_eq!(manager.state(), WifiState::ApStarted);
    assert_eq!(manager.link_mut().dns_calls, 1);
    // Exactly one AP-started status per interested subsystem.
    assert_eq!(time_capture.count_of(MessageId::WifiApStarted), 1);
    assert_eq!(web_capture.count_of(MessageId::WifiApStarted), 1);

    // AP mode has no exit: further events and ticks change nothing.
    tick(&mut manager);
    manager.on_message(&link_event_message(LinkEvent::StationDisconnected));
    assert_eq!(manager.state(), WifiState::ApStarted);
    assert_eq!(time_capture.count_of(MessageId::WifiApStarted), 1);
}

#[test]
fn dns_responder_failure_degrades_but_does_not_block_ap_mode() {
    let (objects, time_capture, _web_capture) = fixture!();
    let mut link = FakeLink::new(false);
    link.dns_result = Err(wordclock_core::Error::DnsResponder);
    let mut manager = WifiManager::new(link, objects);

    tick(&mut manager);
    manager.on_message(&link_event_message(LinkEvent::AccessPointStarted));
    assert_eq!(manager.state(), WifiState::ApStarted);
    assert_eq!(time_capture.count_of(MessageId::WifiApStarted), 1);
}

#[test]
fn with_credentials_the_machine_connects_as_station() {
    let (objects, time_capture, web_capture) = fixture!();
    let mut manager = WifiManager::new(FakeLink::new(true), objects);

    tick(&mut manager);
    assert_eq!(manager.state(), WifiState::Connecting);
    assert_eq!(manager.link_mut().connect_calls, 1);
    assert_eq!(time_capture.count_of(MessageId::WifiConnecting), 1);

    manager.on_message(&link_event_message(LinkEvent::StationConnected));
    assert_eq!(manager.state(), WifiState::StaConnected);
    assert_eq!(time_capture.count_of(MessageId::WifiStaConnected), 1);
    assert_eq!(web_capture.count_of(MessageId::WifiStaConnected), 1);
}

#[test]
fn a_stalled_connection_attempt_times_out_into_reconnecting() {
    let (objects, time_capture, web_capture) = fixture!();
    let mut manager = WifiManager::new(FakeLink::new(true), objects);

    tick(&mut manager); // Leaves Idle and starts the attempt.
    for _ in 0..CONNECT_TIMEOUT_TICKS - 1 {
        tick(&mut manager);
    }
    // One tick short of the timeout: still connecting.
    assert_eq!(manager.state(), WifiState::Connecting);
    assert_eq!(manager.link_mut().reconnect_calls, 0);

    tick(&mut manager);
    assert_eq!(manager.state(), WifiState::Reconnecting);
    assert_eq!(manager.link_mut().reconnect_calls, 1);
    assert_eq!(time_capture.count_of(MessageId::WifiNotConnected), 1);
    assert_eq!(web_capture.count_of(MessageId::WifiNotConnected), 1);
}

#[test]
fn a_connected_link_does_not_time_out() {
    let (objects, time_capture, _web_capture) = fixture!();
    let mut manager = WifiManager::new(FakeLink::new(true), objects);

    tick(&mut manager);
    manager.link_mut().link_connected = true;
    for _ in 0..CONNECT_TIMEOUT_TICKS * 2 {
        tick(&mut manager);
    }
    assert_eq!(manager.state(), WifiState::Connecting);
    assert_eq!(manager.link_mut().reconnect_calls, 0);
    assert_eq!(time_capture.count_of(MessageId::WifiNotConnected), 0);
}

#[test]
fn got_ip_probes_and_announces_internet() {
    let (objects, time_capture, web_capture) = fixture!();
    let mut manager = WifiManager::new(FakeLink::new(true), objects);

    tick(&mut manager);
    manager.on_message(&link_event_message(LinkEvent::StationConnected));
    manager.on_message(&link_event_message(LinkEvent::GotIp));
    assert_eq!(manager.link_mut().probe_calls, 1);
    assert_eq!(time_capture.count_of(MessageId::InternetAvailable), 1);
    assert_eq!(web_capture.count_of(MessageId::InternetAvailable), 1);
}

#[test]
fn a_failed_probe_only_logs() {
    let (objects, time_capture, _web_capture) = fixture!();
    let mut link = FakeLink::new(true);
    link.probe_result = false;
    let mut manager = WifiManager::new(link, objects);

    tick(&mut manager);
    manager.on_message(&link_event_message(LinkEvent::StationConnected));
    manager.on_message(&link_event_message(LinkEvent::GotIp));
    assert_eq!(manager.state(), WifiState::StaConnected);
    assert_eq!(time_capture.count_of(MessageId::InternetAvailable), 0);
}

#[test]
fn a_disconnect_while_online_triggers_reconnect() {
    let (objects, time_capture, _web_capture) = fixture!();
    let mut manager = WifiManager::new(FakeLink::new(true), objects);

    tick(&mut manager);
    manager.on_message(&link_event_message(LinkEvent::StationConnected));
    manager.on_message(&link_event_message(LinkEvent::StationDisconnected));
    assert_eq!(manager.state(), WifiState::Reconnecting);
    assert_eq!(manager.link_mut().reconnect_calls, 1);
    assert_eq!(time_capture.count_of(MessageId::WifiNotConnected), 1);

    // Recovery path: the reconnect succeeds.
    manager.on_message(&link_event_message(LinkEvent::StationConnected));
    assert_eq!(manager.state(), WifiState::StaConnected);
    assert_eq!(time_capture.count_of(MessageId::WifiStaConnected), 2);
}

#[test]
fn published_link_events_arrive_through_the_bus() {
    static QUEUE: MessageQueue = MessageQueue::new();
    static NOTIFIER: Notifier = Notifier::new();
    static BUS: MessageBus = MessageBus::new();
    static RECEIVER: wordclock_core::bus::MessageReceiver =
        wordclock_core::bus::MessageReceiver::new(&QUEUE, &NOTIFIER);

    BUS.register(Address::Wifi, &RECEIVER);
    publish_link_event(&BUS, LinkEvent::GotIp);

    let message = QUEUE.try_receive().unwrap();
    assert_eq!(message.id, MessageId::WifiLinkEvent);
    assert_eq!(
        LinkEvent::from_byte(message.decode_u8_payload().unwrap()),
        Some(LinkEvent::GotIp)
    );
}

#[test]
fn unknown_and_ignored_events_leave_the_state_alone() {
    let (objects, time_capture, _web_capture) = fixture!();
    let mut manager = WifiManager::new(FakeLink::new(true), objects);

    tick(&mut manager);
    manager.on_message(&link_event_message(LinkEvent::StationStart));
    manager.on_message(&link_event_message(LinkEvent::LostIp));
    assert_eq!(manager.state(), WifiState::Connecting);

    // A non-event message id is ignored entirely.
    manager.on_message(&Message::new(
        Address::Time,
        Address::Wifi,
        MessageId::SettingsChanged,
    ));
    assert_eq!(manager.state(), WifiState::Connecting);
    assert_eq!(time_capture.count_of(MessageId::WifiNotConnected), 0);
}
