//! The per-exchange transfer handle.

use url::Url;

use crate::body::Body;
use crate::error::TransferError;
use crate::method::Method;
use crate::options::TransferOptions;
use crate::sink::DataSink;

/// One in-flight HTTP exchange.
///
/// A handle is configured by its owner (target URL, verb override, request
/// headers, body, options, sink) and then run by a
/// [`Transport`](crate::Transport). Configuration order does not matter;
/// nothing touches the network until the transport runs the handle.
pub struct Transfer {
    url: Option<Url>,
    method: Method,
    no_body: bool,
    include_headers: bool,
    headers: Vec<(String, String)>,
    body: Body,
    options: TransferOptions,
    sink: Option<Box<dyn DataSink>>,
    responded: bool,
}

impl Default for Transfer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transfer {
    pub fn new() -> Self {
        Self {
            url: None,
            method: Method::Get,
            no_body: false,
            include_headers: false,
            headers: Vec::new(),
            body: Body::Empty,
            options: TransferOptions::default(),
            sink: None,
            responded: false,
        }
    }

    /// Set the target URL. Parsed and validated immediately; only `http`
    /// and `https` URLs with a host are accepted.
    pub fn set_url(&mut self, url: &str) -> Result<(), TransferError> {
        let parsed =
            Url::parse(url).map_err(|e| TransferError::InvalidUrl(format!("{url}: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(TransferError::UnsupportedScheme(other.to_string())),
        }
        if parsed.host_str().is_none() {
            return Err(TransferError::InvalidUrl(format!("{url}: missing host")));
        }
        self.url = Some(parsed);
        Ok(())
    }

    /// Override the request method.
    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    /// Suppress body capture (HEAD semantics): the transport stops reading
    /// once the header block is complete and forwards no body bytes.
    pub fn set_no_body(&mut self, no_body: bool) {
        self.no_body = no_body;
    }

    /// Keep header bytes in the stream delivered to the sink. Off by
    /// default: the sink then sees body bytes only.
    pub fn set_include_headers(&mut self, include: bool) {
        self.include_headers = include;
    }

    /// Append a request header.
    pub fn header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Attach an upload body.
    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.body = body.into();
    }

    /// Replace the transfer options.
    pub fn set_options(&mut self, options: TransferOptions) {
        self.options = options;
    }

    /// Register the streaming destination for response bytes. A transfer
    /// without a sink discards everything it receives.
    pub fn set_sink(&mut self, sink: Box<dyn DataSink>) {
        self.sink = Some(sink);
    }

    /// Whether any response bytes arrived during execution.
    pub fn responded(&self) -> bool {
        self.responded
    }

    /// Deliver one received chunk to the registered sink, in arrival order.
    ///
    /// Called by transports. A sink that consumes less than the full chunk
    /// aborts the transfer.
    pub fn deliver(&mut self, chunk: &[u8]) -> Result<(), TransferError> {
        self.responded = true;
        if let Some(sink) = self.sink.as_mut() {
            let consumed = sink.write(chunk);
            if consumed != chunk.len() {
                return Err(TransferError::Aborted);
            }
        }
        Ok(())
    }

    /// Record that response bytes arrived without going through the sink
    /// (e.g. withheld header bytes).
    pub fn mark_responded(&mut self) {
        self.responded = true;
    }

    // ── Accessors used by transports ────────────────────────────────────

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn no_body(&self) -> bool {
        self.no_body
    }

    pub fn include_headers(&self) -> bool {
        self.include_headers
    }

    pub fn request_headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn options(&self) -> &TransferOptions {
        &self.options
    }
}
