//! Round-trip tests for the Tokio client, run with `--features async`.

#![cfg(feature = "async")]

use aircast_client::{AsyncClient, Config, Toggle};
use serde_json::{json, Value};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

fn spawn_streamer(response: Value) -> (String, thread::JoinHandle<Value>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).unwrap();
        stream.write_all(response.to_string().as_bytes()).unwrap();
        serde_json::from_slice(&buf).unwrap()
    });

    (addr, handle)
}

fn test_config() -> Config {
    let dir = tempfile::tempdir().unwrap();
    Config::load(dir.path().join("config")).unwrap()
}

#[tokio::test]
async fn async_state_round_trip() {
    let (addr, streamer) = spawn_streamer(json!({
        "jsonrpc": "2.0",
        "result": { "state": "idle" },
        "id": 1,
    }));
    let client = AsyncClient::with_addr(addr, test_config());

    let state = client.state().await.unwrap();
    assert_eq!(state["result"]["state"], "idle");

    let request = streamer.join().unwrap();
    assert_eq!(request["method"], "getState");
    assert_eq!(request["params"], json!([]));
}

#[tokio::test]
async fn async_set_video_translates_to_av_flags() {
    let (addr, streamer) = spawn_streamer(json!({ "jsonrpc": "2.0", "result": "ok", "id": 1 }));
    let client = AsyncClient::with_addr(addr, test_config());

    client.set_video(Toggle::Off).await.unwrap();

    let request = streamer.join().unwrap();
    assert_eq!(request["method"], "setStreamerSettings");
    assert_eq!(request["params"], json!(["av_flags", "0"]));
}

#[tokio::test]
async fn async_rpc_error_is_surfaced() {
    let (addr, streamer) = spawn_streamer(json!({
        "jsonrpc": "2.0",
        "error": { "code": -32601, "message": "no such method" },
        "id": 1,
    }));
    let client = AsyncClient::with_addr(addr, test_config());

    let err = client.close_streamer().await.unwrap_err();
    let rpc = err.rpc().expect("rpc error");
    assert_eq!(rpc.code, Some(-32601));

    streamer.join().unwrap();
}
