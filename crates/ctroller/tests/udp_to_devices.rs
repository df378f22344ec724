//! Integration tests for the daemon pipeline.
//!
//! A real UDP socket on loopback feeds the listener; the use case decodes and
//! dispatches into a `MockPlatform`, so the frames each device would receive
//! can be inspected without touching `/dev/uinput`.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use ctroller::application::forward_input::{ForwardInputUseCase, LinkState};
use ctroller::application::registry::DeviceRegistry;
use ctroller::infrastructure::input_emulation::mock::MockPlatform;
use ctroller::infrastructure::network::{
    ListenerConfig, ListenerEvent, PacketListener, RECV_BUFFER_SIZE,
};
use ctroller_core::device::gamepad::GAMEPAD_NAME;
use ctroller_core::keymap::codes::{ABS_HAT0X, ABS_Y, BTN_EAST, BTN_SOUTH};
use ctroller_core::{
    encode_packet, DeviceKind, DeviceMask, HidButton, HidSnapshot,
    KeyRemapTable, OutputEvent,
};
use tokio::net::UdpSocket;

fn loopback(timeout_ms: u64) -> ListenerConfig {
    ListenerConfig {
        bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        receive_timeout: Duration::from_millis(timeout_ms),
    }
}

fn make_use_case(mask: DeviceMask, keymap: &KeyRemapTable) -> (ForwardInputUseCase, MockPlatform) {
    let platform = MockPlatform::new();
    let registry = DeviceRegistry::initialize(mask, keymap, &platform)
        .expect("mock devices are always created");
    (ForwardInputUseCase::new(registry, Duration::from_secs(1)), platform)
}

/// Receives one event and feeds it to the use case, like the daemon loop.
async fn pump(listener: &PacketListener, use_case: &mut ForwardInputUseCase) -> ListenerEvent {
    let mut buf = [0u8; RECV_BUFFER_SIZE];
    let event = listener.recv(&mut buf).await.expect("recv");
    match event {
        ListenerEvent::Datagram { len, peer } => {
            let _ = use_case.handle_datagram(&buf[..len], peer);
        }
        ListenerEvent::Timeout => {
            use_case.handle_timeout();
        }
    }
    event
}

#[tokio::test]
async fn test_datagram_over_udp_reaches_gamepad() {
    // Arrange
    let (mut use_case, platform) = make_use_case(DeviceMask::ALL, &KeyRemapTable::default());
    let listener = PacketListener::bind(&loopback(2000)).await.unwrap();
    let handheld = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    let mut snapshot = HidSnapshot::neutral();
    snapshot.keys.held = HidButton::A.mask() | HidButton::DLeft.mask();
    snapshot.circlepad.dy = 100;

    // Act
    handheld
        .send_to(&encode_packet(&snapshot), listener.local_addr().unwrap())
        .await
        .unwrap();
    pump(&listener, &mut use_case).await;

    // Assert
    let frames = platform.frames_for(GAMEPAD_NAME);
    assert_eq!(frames.len(), 1);
    let frame = &frames[0];
    assert!(frame.contains(&OutputEvent::button(BTN_SOUTH, true)));
    assert!(frame.contains(&OutputEvent::axis(ABS_Y, -100)));
    assert!(frame.contains(&OutputEvent::axis(ABS_HAT0X, -1)));
    assert_eq!(frame.last(), Some(&OutputEvent::Sync));
    assert!(matches!(
        use_case.link_state(),
        LinkState::Streaming { peer, .. } if peer == handheld.local_addr().unwrap()
    ));
}

#[tokio::test]
async fn test_garbage_datagram_is_dropped_and_loop_continues() {
    let (mut use_case, platform) = make_use_case(DeviceMask::ALL, &KeyRemapTable::default());
    let listener = PacketListener::bind(&loopback(2000)).await.unwrap();
    let target = listener.local_addr().unwrap();
    let handheld = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    handheld.send_to(b"hello", target).await.unwrap();
    pump(&listener, &mut use_case).await;
    assert!(platform.frames.lock().unwrap().is_empty());

    handheld
        .send_to(&encode_packet(&HidSnapshot::neutral()), target)
        .await
        .unwrap();
    pump(&listener, &mut use_case).await;
    assert_eq!(platform.frames.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn test_silence_after_stream_resets_devices_once() {
    // Arrange
    let (mut use_case, platform) = make_use_case(DeviceMask::ALL, &KeyRemapTable::default());
    let listener = PacketListener::bind(&loopback(30)).await.unwrap();
    let handheld = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let mut snapshot = HidSnapshot::neutral();
    snapshot.keys.held = HidButton::B.mask();
    handheld
        .send_to(&encode_packet(&snapshot), listener.local_addr().unwrap())
        .await
        .unwrap();
    pump(&listener, &mut use_case).await;
    platform.frames.lock().unwrap().clear();

    // Act – two timeouts in a row
    let first = pump(&listener, &mut use_case).await;
    let second = pump(&listener, &mut use_case).await;

    // Assert – one neutral frame per device from the first timeout only
    assert_eq!(first, ListenerEvent::Timeout);
    assert_eq!(second, ListenerEvent::Timeout);
    assert_eq!(platform.frames.lock().unwrap().len(), 4);
    let gamepad = platform.frames_for(GAMEPAD_NAME);
    assert!(gamepad[0].contains(&OutputEvent::button(BTN_EAST, false)));
    assert_eq!(use_case.link_state(), LinkState::Waiting);
}

#[tokio::test]
async fn test_only_enabled_devices_receive_frames() {
    let mask: DeviceMask = [DeviceKind::Touchscreen].into_iter().collect();
    let (mut use_case, platform) = make_use_case(mask, &KeyRemapTable::default());
    let listener = PacketListener::bind(&loopback(2000)).await.unwrap();
    let handheld = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    handheld
        .send_to(
            &encode_packet(&HidSnapshot::neutral()),
            listener.local_addr().unwrap(),
        )
        .await
        .unwrap();
    pump(&listener, &mut use_case).await;

    assert_eq!(platform.created.lock().unwrap().len(), 1);
    let frames = platform.frames.lock().unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].1.len(), 3);
}

#[test]
fn test_shutdown_destroys_every_created_device() {
    let (mut use_case, platform) = make_use_case(DeviceMask::ALL, &KeyRemapTable::default());

    use_case.shutdown();
    drop(use_case);

    let created: Vec<String> = platform
        .created
        .lock()
        .unwrap()
        .iter()
        .map(|layout| layout.name.clone())
        .collect();
    let mut destroyed = platform.destroyed.lock().unwrap().clone();
    destroyed.reverse();
    assert_eq!(created, destroyed);
}
