#![allow(dead_code, clippy::unwrap_used)]

use srcrcon::{connection::Connection, id::FixedId, packet::Packet};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

/// Listener on an ephemeral localhost port.
pub async fn listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// Read one whole frame, size field included.
pub async fn read_frame(stream: &mut TcpStream) -> Vec<u8> {
    let mut size = [0u8; 4];
    stream.read_exact(&mut size).await.unwrap();
    let mut rest = vec![0u8; i32::from_le_bytes(size) as usize];
    stream.read_exact(&mut rest).await.unwrap();

    let mut frame = size.to_vec();
    frame.extend(rest);
    frame
}

/// A server that reads one request frame, answers with `reply` and hands the
/// request back.
pub fn answer_once(listener: TcpListener, reply: Vec<u8>) -> JoinHandle<Vec<u8>> {
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_frame(&mut stream).await;
        stream.write_all(&reply).await.unwrap();
        request
    })
}

/// Like [answer_once], for a sequence of request/reply pairs on one stream.
pub fn answer_each(listener: TcpListener, replies: Vec<Vec<u8>>) -> JoinHandle<Vec<Vec<u8>>> {
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut requests = Vec::new();
        for reply in replies {
            requests.push(read_frame(&mut stream).await);
            stream.write_all(&reply).await.unwrap();
        }
        requests
    })
}

pub fn pack(packet: &Packet) -> Vec<u8> {
    packet.pack().unwrap()
}

/// Open connection to `port` whose requests always use id `id`.
pub async fn connected(port: u16, id: i32) -> Connection {
    let mut conn = Connection::new("127.0.0.1", port).with_id_source(FixedId(id));
    conn.connect().await.unwrap();
    conn
}
