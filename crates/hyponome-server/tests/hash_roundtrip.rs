//! End-to-end tests: real server, real client, real sockets.

use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::thread::JoinHandle;

use bytes::{Bytes, BytesMut};

use hyponome_client::{Client, ClientConfig};
use hyponome_hash::{hash, hex};
use hyponome_server::{Server, ServerConfig, ServerResult, ShutdownHandle};
use hyponome_wire::{
    Frame, HashRequest, Request, RequestId, RequestPayload, Response, ResponsePayload,
};

/// Boots a server on an ephemeral port and returns its address plus the
/// pieces needed to stop it.
fn start_server() -> (SocketAddr, ShutdownHandle, JoinHandle<ServerResult<()>>) {
    let config = ServerConfig::new("127.0.0.1:0".parse().unwrap());
    let mut server = Server::new(config).expect("server should start");
    let addr = server.local_addr().expect("listener should be bound");
    let handle = server.shutdown_handle();
    let thread = std::thread::spawn(move || server.run());
    (addr, handle, thread)
}

#[test]
fn rpc_digest_matches_local_sha256() {
    let (addr, shutdown, thread) = start_server();

    let payload = b"This is a test file.\n";
    let mut client = Client::connect(&addr.to_string(), ClientConfig::default()).unwrap();

    let remote_hex = client.hash_hex(payload).unwrap();
    let local_hex = hex::bin2hex(&hash::sha256(payload).unwrap());
    assert_eq!(remote_hex, local_hex);
    assert_eq!(
        remote_hex,
        "649b8b471e7d7bc175eec758a7006ac693c434c8297c07db15286788c837154a"
    );

    shutdown.shutdown();
    thread.join().unwrap().unwrap();
}

#[test]
fn connection_serves_multiple_exchanges() {
    let (addr, shutdown, thread) = start_server();

    let mut client = Client::connect(&addr.to_string(), ClientConfig::default()).unwrap();
    for payload in [&b""[..], b"one", b"two", b"three"] {
        let digest = client.hash(payload).unwrap();
        assert_eq!(digest, hash::sha256(payload).unwrap().to_vec());
    }

    shutdown.shutdown();
    thread.join().unwrap().unwrap();
}

#[test]
fn concurrent_clients_get_independent_digests() {
    let (addr, shutdown, thread) = start_server();

    let workers: Vec<_> = (0u8..4)
        .map(|i| {
            std::thread::spawn(move || {
                let mut client =
                    Client::connect(&addr.to_string(), ClientConfig::default()).unwrap();
                let payload = vec![i; 1024];
                let digest = client.hash(&payload).unwrap();
                assert_eq!(digest, hash::sha256(&payload).unwrap().to_vec());
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    shutdown.shutdown();
    thread.join().unwrap().unwrap();
}

#[test]
fn request_sent_before_half_close_is_answered() {
    let (addr, shutdown, thread) = start_server();

    let payload = b"one-shot";
    let request = Request::new(
        RequestId::new(7),
        RequestPayload::Hash(HashRequest {
            data: Bytes::from_static(payload),
        }),
    );

    // A one-shot client: send the request, shut down the write side,
    // then wait for the answer on the still-open read side.
    let mut stream = TcpStream::connect(addr).unwrap();
    stream
        .write_all(&request.to_frame().unwrap().encode_to_bytes())
        .unwrap();
    stream.shutdown(Shutdown::Write).unwrap();

    let mut buf = BytesMut::new();
    let mut chunk = [0u8; 4096];
    let response = loop {
        if let Some(frame) = Frame::decode(&mut buf).unwrap() {
            break Response::from_frame(&frame).unwrap();
        }
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "connection closed before a response arrived");
        buf.extend_from_slice(&chunk[..n]);
    };

    assert_eq!(response.id, RequestId::new(7));
    match response.payload {
        ResponsePayload::Hash(h) => {
            assert_eq!(&h.hash[..], &hash::sha256(payload).unwrap()[..]);
        }
        ResponsePayload::Error(e) => panic!("unexpected error: {e:?}"),
    }

    shutdown.shutdown();
    thread.join().unwrap().unwrap();
}

#[test]
fn large_payload_round_trips() {
    let (addr, shutdown, thread) = start_server();

    // Larger than both the 4 KiB socket read chunks and the 64 KiB buffers.
    let payload = vec![0x5a; 256 * 1024];
    let mut client = Client::connect(&addr.to_string(), ClientConfig::default()).unwrap();
    let digest = client.hash(&payload).unwrap();
    assert_eq!(digest, hash::sha256(&payload).unwrap().to_vec());

    shutdown.shutdown();
    thread.join().unwrap().unwrap();
}
