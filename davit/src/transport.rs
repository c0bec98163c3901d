//! Transfer execution.
//!
//! [`Transport`] is the seam between a configured [`Transfer`] and the
//! bytes on the wire. [`TcpTransport`] is the built-in backend: one TCP
//! connection per transfer, request serialized by hand, response pumped
//! into the registered sink chunk by chunk until end-of-stream.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::BytesMut;

use crate::error::TransferError;
use crate::method::Method;
use crate::metrics;
use crate::options::TransferOptions;
use crate::transfer::Transfer;

/// Executes transfers.
///
/// `run` is synchronous: it returns once the exchange has terminated, with
/// the registered sink having seen every chunk it is going to see. The sink
/// may be invoked from a different execution context internally; callers
/// must not assume which thread drives it.
pub trait Transport: Send + Sync {
    fn run(&self, transfer: &mut Transfer) -> Result<(), TransferError>;
}

/// Built-in synchronous backend for `http` and `https` URLs.
///
/// The request always carries `connection: close` and the response is read
/// to end-of-stream, so no connection ever outlives its transfer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpTransport;

impl Transport for TcpTransport {
    fn run(&self, transfer: &mut Transfer) -> Result<(), TransferError> {
        transfer.options().validate()?;
        metrics::TRANSFERS_STARTED.increment();
        match run_inner(transfer) {
            Ok(()) => {
                metrics::TRANSFERS_COMPLETED.increment();
                Ok(())
            }
            Err(e) => {
                metrics::TRANSFERS_FAILED.increment();
                Err(e)
            }
        }
    }
}

fn run_inner(transfer: &mut Transfer) -> Result<(), TransferError> {
    let url = transfer
        .url()
        .ok_or_else(|| TransferError::InvalidUrl("no url set".to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| TransferError::InvalidUrl("missing host".to_string()))?
        .to_string();
    let port = url
        .port_or_known_default()
        .ok_or_else(|| TransferError::InvalidUrl("missing port".to_string()))?;
    let tls = url.scheme() == "https";

    let mut stream = connect(&host, port, transfer.options())?;

    if tls {
        #[cfg(feature = "tls")]
        {
            return crate::tls::exchange_tls(stream, &host, transfer);
        }
        #[cfg(not(feature = "tls"))]
        {
            return Err(TransferError::UnsupportedScheme("https".to_string()));
        }
    }

    exchange(&mut stream, transfer)
}

fn connect(host: &str, port: u16, options: &TransferOptions) -> Result<TcpStream, TransferError> {
    let stream = match options.connect_timeout {
        Some(timeout) => connect_with_timeout((host, port), timeout)?,
        None => TcpStream::connect((host, port))?,
    };
    stream.set_nodelay(options.tcp_nodelay)?;
    stream.set_read_timeout(options.read_timeout)?;
    Ok(stream)
}

/// `TcpStream::connect_timeout` wants resolved addresses; try each in turn
/// and keep the last error.
fn connect_with_timeout(addr: (&str, u16), timeout: Duration) -> io::Result<TcpStream> {
    let mut last_err = None;
    for resolved in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&resolved, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses resolved")))
}

/// Write the serialized request, then pump received chunks into the sink
/// until the stream ends (or the header block completes, for no-body
/// transfers).
pub(crate) fn exchange<S: Read + Write>(
    stream: &mut S,
    transfer: &mut Transfer,
) -> Result<(), TransferError> {
    let request = serialize_request(transfer)?;
    stream.write_all(&request)?;
    stream.flush()?;
    metrics::BYTES_SENT.add(request.len() as u64);

    let mut buf = vec![0u8; transfer.options().recv_buffer_size];
    let mut filter = HeadFilter::new(transfer.include_headers(), transfer.no_body());
    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        transfer.mark_responded();
        metrics::BYTES_RECEIVED.add(n as u64);
        if filter.feed(&buf[..n], transfer)? == FeedOutcome::Stop {
            break;
        }
    }
    Ok(())
}

/// Serialize the request line, headers and body.
fn serialize_request(transfer: &Transfer) -> Result<Vec<u8>, TransferError> {
    let url = transfer
        .url()
        .ok_or_else(|| TransferError::InvalidUrl("no url set".to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| TransferError::InvalidUrl("missing host".to_string()))?;

    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut req = Vec::with_capacity(256);
    req.extend_from_slice(transfer.method().as_str().as_bytes());
    req.push(b' ');
    req.extend_from_slice(target.as_bytes());
    req.extend_from_slice(b" HTTP/1.1\r\n");

    req.extend_from_slice(b"host: ");
    req.extend_from_slice(host.as_bytes());
    if let Some(port) = url.port() {
        req.extend_from_slice(b":");
        req.extend_from_slice(port.to_string().as_bytes());
    }
    req.extend_from_slice(b"\r\n");

    if let Some(agent) = &transfer.options().user_agent {
        req.extend_from_slice(b"user-agent: ");
        req.extend_from_slice(agent.as_bytes());
        req.extend_from_slice(b"\r\n");
    }

    for (name, value) in transfer.request_headers() {
        req.extend_from_slice(name.as_bytes());
        req.extend_from_slice(b": ");
        req.extend_from_slice(value.as_bytes());
        req.extend_from_slice(b"\r\n");
    }

    let body = transfer.body();
    // POST/PUT need an explicit length even when the body is empty.
    let needs_length =
        !body.is_empty() || matches!(transfer.method(), Method::Post | Method::Put);
    if needs_length {
        req.extend_from_slice(b"content-length: ");
        req.extend_from_slice(body.len().to_string().as_bytes());
        req.extend_from_slice(b"\r\n");
    }

    req.extend_from_slice(b"connection: close\r\n\r\n");

    if !body.is_empty() {
        req.extend_from_slice(body.as_bytes());
    }

    Ok(req)
}

#[derive(Debug, PartialEq, Eq)]
enum FeedOutcome {
    Continue,
    Stop,
}

/// Filters the raw receive stream according to header retention and the
/// no-body flag before it reaches the sink.
struct HeadFilter {
    include_headers: bool,
    no_body: bool,
    /// Still looking for the header/body separator.
    searching: bool,
    /// Bytes withheld while searching.
    pending: BytesMut,
}

impl HeadFilter {
    fn new(include_headers: bool, no_body: bool) -> Self {
        Self {
            include_headers,
            no_body,
            searching: !include_headers || no_body,
            pending: BytesMut::new(),
        }
    }

    fn feed(&mut self, chunk: &[u8], transfer: &mut Transfer) -> Result<FeedOutcome, TransferError> {
        if !self.searching {
            transfer.deliver(chunk)?;
            return Ok(FeedOutcome::Continue);
        }

        self.pending.extend_from_slice(chunk);
        let Some(end) = find_header_end(&self.pending) else {
            return Ok(FeedOutcome::Continue);
        };
        self.searching = false;
        let boundary = end + 4;

        if self.include_headers {
            let head = self.pending.split_to(boundary);
            transfer.deliver(&head)?;
        } else {
            let _ = self.pending.split_to(boundary);
        }
        if self.no_body {
            return Ok(FeedOutcome::Stop);
        }
        if !self.pending.is_empty() {
            let rest = self.pending.split_to(self.pending.len());
            transfer.deliver(&rest)?;
        }
        Ok(FeedOutcome::Continue)
    }
}

/// Find the position of `\r\n\r\n` in data, returns index of the first `\r`.
fn find_header_end(data: &[u8]) -> Option<usize> {
    (0..data.len().saturating_sub(3)).find(|&i| &data[i..i + 4] == b"\r\n\r\n")
}
