//! Incremental response capture.
//!
//! A [`Response`] owns one transfer handle and accumulates the raw byte
//! stream the transport delivers, header bytes included. The first
//! occurrence of `\r\n\r\n` fixes the header/body boundary and releases
//! anyone blocked in [`wait_for_header`](Response::wait_for_header); the
//! body may still be streaming at that point.
//!
//! The capture state sits behind a mutex shared between the transfer's
//! sink and the caller, so the sink may run on whatever execution context
//! drives the transport's I/O (the caller's own thread or a different one)
//! and the header wait is a condition-variable wait either way.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use bytes::{Bytes, BytesMut};
use davit::{DataSink, Transfer};

/// Locate the header/body separator. Returns the offset of the first byte
/// of `\r\n\r\n`.
pub(crate) fn find_boundary(data: &[u8]) -> Option<usize> {
    (0..data.len().saturating_sub(3)).find(|&i| &data[i..i + 4] == b"\r\n\r\n")
}

/// Parse the status code out of a status line (`HTTP/1.1 200 OK`).
pub(crate) fn parse_status(head: &[u8]) -> Option<u16> {
    let text = std::str::from_utf8(head).ok()?;
    let status_line = text.split("\r\n").next()?;
    let mut parts = status_line.splitn(3, ' ');
    let _version = parts.next()?;
    parts.next()?.parse().ok()
}

struct CaptureState {
    /// Raw accumulated stream, header bytes first.
    buf: BytesMut,
    /// Offset of the first `\r\n\r\n`, once seen. Doubles as the one-shot
    /// readiness flag.
    boundary: Option<usize>,
    /// The transfer has terminated, boundary or not.
    finished: bool,
}

struct Shared {
    state: Mutex<CaptureState>,
    header_ready: Condvar,
}

/// Sink installed on the transfer handle. Appends each chunk and signals
/// header readiness the moment the boundary first appears.
struct CaptureSink {
    shared: Arc<Shared>,
}

impl DataSink for CaptureSink {
    fn write(&mut self, chunk: &[u8]) -> usize {
        let mut state = self
            .shared
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        state.buf.extend_from_slice(chunk);
        if state.boundary.is_none()
            && let Some(end) = find_boundary(&state.buf)
        {
            state.boundary = Some(end);
            self.shared.header_ready.notify_all();
        }
        chunk.len()
    }
}

/// One response, owned exclusively by the call that created it.
pub struct Response {
    shared: Arc<Shared>,
    transfer: Option<Transfer>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(CaptureState {
                    buf: BytesMut::new(),
                    boundary: None,
                    finished: false,
                }),
                header_ready: Condvar::new(),
            }),
            transfer: None,
        }
    }

    /// The transfer handle backing this response.
    ///
    /// Created on first call, with the capture sink installed and header
    /// bytes retained in the delivered stream; the same handle is returned
    /// for the lifetime of the response.
    pub fn transfer(&mut self) -> &mut Transfer {
        let shared = &self.shared;
        self.transfer.get_or_insert_with(|| {
            let mut transfer = Transfer::new();
            transfer.set_include_headers(true);
            transfer.set_sink(Box::new(CaptureSink {
                shared: Arc::clone(shared),
            }));
            transfer
        })
    }

    /// Block until the header block is complete.
    ///
    /// Returns immediately if the boundary has already been seen, and
    /// returns without blocking once the transfer has finished, even when
    /// no boundary ever appeared (total connection failure; the status
    /// stays 0 in that case).
    pub fn wait_for_header(&self) {
        let mut state = self.lock();
        while state.boundary.is_none() && !state.finished {
            state = self
                .shared
                .header_ready
                .wait(state)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Mark the transfer as terminated and wake any waiter.
    pub fn complete(&self) {
        let mut state = self.lock();
        state.finished = true;
        self.shared.header_ready.notify_all();
    }

    /// Status code parsed from the captured status line, or 0 when no
    /// header boundary was ever observed ("no response at all", as
    /// distinct from any status the server actually returned).
    pub fn status(&self) -> u16 {
        let state = self.lock();
        match state.boundary {
            Some(end) => parse_status(&state.buf[..end]).unwrap_or(0),
            None => 0,
        }
    }

    /// Response headers as (name, value) pairs, status line excluded.
    pub fn headers(&self) -> Vec<(String, String)> {
        let state = self.lock();
        let Some(end) = state.boundary else {
            return Vec::new();
        };
        let Ok(text) = std::str::from_utf8(&state.buf[..end]) else {
            return Vec::new();
        };
        text.split("\r\n")
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
            .collect()
    }

    /// First header value matching `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers()
            .into_iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Body bytes captured so far, everything past the boundary. Stable
    /// once the transfer has completed; before that, only as consistent as
    /// [`wait_for_header`](Response::wait_for_header) promises.
    pub fn body(&self) -> Bytes {
        let state = self.lock();
        match state.boundary {
            Some(end) => Bytes::copy_from_slice(&state.buf[end + 4..]),
            None => Bytes::new(),
        }
    }

    /// Body as text, lossily converted from UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body()).into_owned()
    }

    fn lock(&self) -> MutexGuard<'_, CaptureState> {
        self.shared.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
