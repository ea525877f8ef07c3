#![allow(clippy::unwrap_used)]

mod common;

use common::{answer_once, connected, listener, pack};
use srcrcon::{
    codec::PacketRegistry,
    connection::{Connection, ConnectionState},
    error::RconError,
    packet::{Packet, PacketType},
};
use tokio::io::AsyncWriteExt;

#[tokio::test]
async fn connects_and_disconnects() {
    let (listener, port) = listener().await;
    let accept = tokio::spawn(async move { listener.accept().await.unwrap() });

    let mut conn = Connection::new("127.0.0.1", port);
    assert_eq!(conn.state(), ConnectionState::Disconnected);
    conn.connect().await.unwrap();
    assert!(conn.is_open());
    accept.await.unwrap();

    conn.disconnect();
    assert!(!conn.is_open());
    assert_eq!(conn.state(), ConnectionState::Closed);
    conn.disconnect();
    assert_eq!(conn.state(), ConnectionState::Closed);

    let err = conn.send(&Packet::auth(1, "pw")).await.unwrap_err();
    assert!(matches!(err, RconError::NotOpen));
}

#[tokio::test]
async fn connect_failure_reports_host_and_port() {
    // Grab a free port, then close it so nobody is listening.
    let (listener, port) = listener().await;
    drop(listener);

    let mut conn = Connection::new("127.0.0.1", port);
    match conn.connect().await.unwrap_err() {
        RconError::ConnectionFailure { host, port: p, .. } => {
            assert_eq!(host, "127.0.0.1");
            assert_eq!(p, port);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(!conn.is_open());
}

#[tokio::test]
async fn sends_encoded_packet() {
    let (listener, port) = listener().await;
    let server = answer_once(listener, Vec::new());

    let mut conn = connected(port, 1).await;
    let auth = Packet::auth(77, "me");
    conn.send(&auth).await.unwrap();

    assert_eq!(server.await.unwrap(), pack(&auth));
}

#[tokio::test]
async fn send_refuses_untyped_packet() {
    let (listener, port) = listener().await;
    let _accept = tokio::spawn(async move { listener.accept().await.unwrap() });

    let mut conn = connected(port, 1).await;
    let err = conn.send(&Packet::untyped(1, "x")).await.unwrap_err();
    assert!(matches!(err, RconError::MissingPacketType));
    assert!(conn.is_open());
}

#[tokio::test]
async fn reads_packet() {
    let (listener, port) = listener().await;
    let reply = Packet::auth_response(3);
    let server = answer_once(listener, pack(&reply));

    let mut conn = connected(port, 3).await;
    conn.send(&Packet::auth(3, "pw")).await.unwrap();
    let packet = conn.read().await.unwrap().unwrap();

    assert_eq!(packet, reply);
    assert!(packet.is(PacketType::AuthResponse));
    server.await.unwrap();
}

#[tokio::test]
async fn partial_frames_are_completed_by_later_reads() {
    let (listener, port) = listener().await;
    let first = Packet::response_value(1, "first");
    let second = Packet::response_value(2, "second");
    let mut bytes = pack(&first);
    bytes.extend(pack(&second));
    let split = 6;

    let (go_tx, go_rx) = tokio::sync::oneshot::channel::<()>();
    let head = bytes[..split].to_vec();
    let tail = bytes[split..].to_vec();
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        stream.write_all(&head).await.unwrap();
        go_rx.await.unwrap();
        stream.write_all(&tail).await.unwrap();
        stream
    });

    let mut conn = connected(port, 1).await;
    assert_eq!(conn.read().await.unwrap(), None);
    go_tx.send(()).unwrap();

    let mut packets = Vec::new();
    while packets.len() < 2 {
        if let Some(packet) = conn.read().await.unwrap() {
            packets.push(packet);
        }
    }
    assert_eq!(packets, vec![first, second]);
    drop(server.await.unwrap());
}

#[tokio::test]
async fn peer_close_reads_none() {
    let (listener, port) = listener().await;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        drop(stream);
    });

    let mut conn = connected(port, 1).await;
    server.await.unwrap();

    assert_eq!(conn.read().await.unwrap(), None);
    assert!(!conn.is_open());
    assert_eq!(conn.state(), ConnectionState::Closed);
}

#[tokio::test]
async fn unknown_reply_type_is_a_decode_error() {
    let (listener, port) = listener().await;
    let server = answer_once(listener, pack(&Packet::auth(4, "echo")));

    let mut conn = connected(port, 4).await;
    conn.send(&Packet::auth(4, "pw")).await.unwrap();
    let err = conn.read().await.unwrap_err();
    assert!(err.is_decode_error());
    server.await.unwrap();
}

#[tokio::test]
async fn custom_registry_limits_decodable_replies() {
    let (listener, port) = listener().await;
    let server = answer_once(listener, pack(&Packet::auth_response(2)));

    let mut registry = PacketRegistry::empty();
    registry.register(PacketType::ResponseValue);
    let mut conn = Connection::new("127.0.0.1", port).with_registry(registry);
    conn.connect().await.unwrap();
    conn.send(&Packet::auth(2, "pw")).await.unwrap();

    let err = conn.read().await.unwrap_err();
    assert!(matches!(err, RconError::UnknownPacketType(2)));
    server.await.unwrap();
}
