//! Integration tests for the prediction service client.
//!
//! A minimal canned-response TCP server stands in for the real service so the
//! transport and error paths can be exercised without network access.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread;
use typestress::{
    BlockingPredictorClient, FeatureVector, PredictorConfig, PredictorError, StressLevel,
};

const PREDICTION_BODY: &str = r#"{
    "stress_level": "Low",
    "confidence": 91.5,
    "tips": ["Keep maintaining healthy work habits"],
    "features": {"typing_speed": 4.2, "avg_pause": 120.0, "error_rate": 2.5}
}"#;

/// Spawn a one-shot HTTP stub that answers the next request with the given
/// status line and body, then exits.
fn spawn_stub(status: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Failed to get stub address");

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    addr
}

/// Consume one full HTTP request (headers plus Content-Length body).
fn read_request(stream: &mut std::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]);
            let content_length = headers
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() - (end + 4) >= content_length {
                return;
            }
        }
    }
}

fn client_for(addr: SocketAddr) -> BlockingPredictorClient {
    let config = PredictorConfig::new("127.0.0.1", addr.port());
    BlockingPredictorClient::new(config).expect("Failed to create client")
}

fn sample_features() -> FeatureVector {
    FeatureVector {
        typing_speed: 4.2,
        avg_pause: 120.0,
        error_rate: 0.025,
    }
}

#[test]
fn test_predict_success() {
    let addr = spawn_stub("200 OK", PREDICTION_BODY);
    let client = client_for(addr);

    let prediction = client
        .predict(&sample_features())
        .expect("Prediction should succeed");

    assert_eq!(prediction.stress_level, StressLevel::Low);
    assert!((prediction.confidence - 91.5).abs() < 1e-9);
    assert_eq!(prediction.tips.len(), 1);
    assert!((prediction.features.typing_speed - 4.2).abs() < 1e-9);
}

#[test]
fn test_predict_service_error() {
    let addr = spawn_stub("500 Internal Server Error", r#"{"error":"model failure"}"#);
    let client = client_for(addr);

    match client.predict(&sample_features()) {
        Err(PredictorError::Service { status, .. }) => assert_eq!(status, 500),
        other => panic!("Expected service error, got {other:?}"),
    }
}

#[test]
fn test_predict_malformed_response() {
    let addr = spawn_stub("200 OK", "this is not json");
    let client = client_for(addr);

    match client.predict(&sample_features()) {
        Err(PredictorError::Malformed(_)) => {}
        other => panic!("Expected malformed-response error, got {other:?}"),
    }
}

#[test]
fn test_predict_connection_refused() {
    // Bind and immediately drop a listener to get a port nothing listens on
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = client_for(addr);

    match client.predict(&sample_features()) {
        Err(PredictorError::Network(_)) => {}
        other => panic!("Expected network error, got {other:?}"),
    }
}

#[test]
fn test_connection_probe() {
    let addr = spawn_stub("200 OK", "{}");
    let client = client_for(addr);

    assert!(client.test_connection().expect("Probe should not error"));
}
