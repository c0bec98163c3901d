//! Round-trip tests: the API client against a canned HTTP/1.1 server on a
//! real socket, plus scripted transports for the failure paths.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use davit::{Transfer, TransferError, Transport};
use davit_docker::{ApiClient, ClientConfig, Error, UploadBody};

// ── Helpers ─────────────────────────────────────────────────────────────

/// Serve exactly one connection: read the full request, write `response`,
/// close. The join handle yields the raw request bytes the server saw.
fn serve_once(response: &'static [u8]) -> (u16, thread::JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let request = read_request(&mut stream);
        stream.write_all(response).expect("write response");
        request
    });
    (port, handle)
}

/// Read the request head plus any content-length body.
fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).expect("read request");
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(end) = find(&data, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&data[..end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    data
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn plain_client(port: u16) -> ApiClient {
    ApiClient::new(ClientConfig {
        host: "127.0.0.1".to_string(),
        port,
        use_tls: false,
        ..ClientConfig::default()
    })
}

/// Transport that replays canned chunks through the capture sink without
/// touching a socket.
struct ScriptedTransport {
    chunks: Vec<Vec<u8>>,
}

impl Transport for ScriptedTransport {
    fn run(&self, transfer: &mut Transfer) -> Result<(), TransferError> {
        for chunk in &self.chunks {
            transfer.deliver(chunk)?;
        }
        Ok(())
    }
}

// ── Socket round trips ──────────────────────────────────────────────────

#[test]
fn get_containers_json() {
    let (port, server) =
        serve_once(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\r\n[]");
    let response = plain_client(port)
        .get("/containers/json", &[], None)
        .expect("get");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text(), "[]");
    assert_eq!(
        response.header("content-type").as_deref(),
        Some("application/json")
    );

    let request = server.join().expect("server thread");
    let head = String::from_utf8_lossy(&request);
    assert!(head.starts_with("GET /containers/json HTTP/1.1\r\n"));
    assert!(head.contains("connection: close\r\n"));
}

#[test]
fn post_sets_method_and_query() {
    let (port, server) = serve_once(b"HTTP/1.1 201 Created\r\n\r\n{\"Id\":\"abc\"}");
    let response = plain_client(port)
        .post("/containers/create", &[("name", "x")], None)
        .expect("post");

    assert_eq!(response.status(), 201);
    assert_eq!(response.text(), "{\"Id\":\"abc\"}");

    let request = server.join().expect("server thread");
    let head = String::from_utf8_lossy(&request);
    assert!(head.starts_with("POST /containers/create?name=x HTTP/1.1\r\n"));
}

#[test]
fn head_ping_captures_no_body() {
    let (port, server) = serve_once(b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\n\r\nOK");
    let response = plain_client(port).head("/_ping", &[], None).expect("head");

    assert_eq!(response.status(), 200);
    assert_eq!(response.body().len(), 0);
    assert_eq!(response.header("content-length").as_deref(), Some("2"));

    let request = server.join().expect("server thread");
    assert!(String::from_utf8_lossy(&request).starts_with("HEAD /_ping HTTP/1.1\r\n"));
}

#[test]
fn server_errors_are_normal_responses() {
    let (port, server) =
        serve_once(b"HTTP/1.1 404 Not Found\r\n\r\n{\"message\":\"no such container\"}");
    let response = plain_client(port)
        .get("/containers/nope/json", &[], None)
        .expect("4xx is not an error");

    assert_eq!(response.status(), 404);
    assert_eq!(response.text(), "{\"message\":\"no such container\"}");
    server.join().expect("server thread");
}

#[test]
fn delete_sends_method_override() {
    let (port, server) = serve_once(b"HTTP/1.1 204 No Content\r\n\r\n");
    let response = plain_client(port)
        .delete("/containers/abc", &[("force", "1")], None)
        .expect("delete");

    assert_eq!(response.status(), 204);
    let request = server.join().expect("server thread");
    assert!(
        String::from_utf8_lossy(&request).starts_with("DELETE /containers/abc?force=1 HTTP/1.1\r\n")
    );
}

#[test]
fn customizer_attaches_body_and_headers() {
    let (port, server) = serve_once(b"HTTP/1.1 201 Created\r\n\r\n{}");
    let body = UploadBody::json(r#"{"name":"x"}"#);
    let response = plain_client(port)
        .post("/containers/create", &[], Some(&body))
        .expect("post");

    assert_eq!(response.status(), 201);
    let request = server.join().expect("server thread");
    let text = String::from_utf8_lossy(&request);
    assert!(text.contains("content-type: application/json\r\n"));
    assert!(text.contains("content-length: 12\r\n"));
    assert!(text.ends_with("\r\n\r\n{\"name\":\"x\"}"));
}

#[test]
fn connection_refused_is_service_unavailable() {
    // Bind then drop to find a port nothing is listening on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr").port()
    };

    let err = plain_client(port)
        .get("/containers/json", &[], None)
        .expect_err("nothing is listening");
    assert!(matches!(err, Error::ServiceUnavailable));
    assert_eq!(err.status(), 503);
}

// ── Scripted transports ─────────────────────────────────────────────────

#[test]
fn scripted_transfer_streams_header_then_body() {
    let transport = ScriptedTransport {
        chunks: vec![b"HTTP/1.1 200 OK\r\n\r\n".to_vec(), b"[]".to_vec()],
    };
    let client = ApiClient::with_transport(
        ClientConfig {
            host: "localhost".to_string(),
            port: 2375,
            use_tls: false,
            ..ClientConfig::default()
        },
        Arc::new(transport),
    );

    let response = client.get("/containers/json", &[], None).expect("get");
    assert_eq!(response.status(), 200);
    assert_eq!(response.text(), "[]");
}

#[test]
fn silent_transport_is_service_unavailable() {
    let client = ApiClient::with_transport(
        ClientConfig {
            host: "localhost".to_string(),
            port: 2375,
            use_tls: false,
            ..ClientConfig::default()
        },
        Arc::new(ScriptedTransport { chunks: Vec::new() }),
    );

    let err = client
        .get("/containers/json", &[], None)
        .expect_err("no response at all");
    assert!(matches!(err, Error::ServiceUnavailable));
    assert_eq!(err.status(), 503);
}

#[test]
fn version_segment_reaches_the_transport() {
    struct RecordingTransport {
        seen: Mutex<Option<String>>,
    }

    impl Transport for RecordingTransport {
        fn run(&self, transfer: &mut Transfer) -> Result<(), TransferError> {
            *self.seen.lock().unwrap() = transfer.url().map(|u| u.as_str().to_string());
            Ok(())
        }
    }

    let transport = Arc::new(RecordingTransport {
        seen: Mutex::new(None),
    });
    let client = ApiClient::with_transport(
        ClientConfig {
            host: "localhost".to_string(),
            port: 2375,
            use_tls: false,
            version: Some("v1.43".to_string()),
            ..ClientConfig::default()
        },
        Arc::clone(&transport) as Arc<dyn Transport>,
    );

    // No data delivered, so the call itself reports total failure.
    assert!(matches!(
        client.get("/containers/json", &[], None),
        Err(Error::ServiceUnavailable)
    ));
    assert_eq!(
        transport.seen.lock().unwrap().as_deref(),
        Some("http://localhost:2375/v1.43/containers/json")
    );
}
