use std::time::Duration;

#[cfg(feature = "tls")]
use std::sync::Arc;

use crate::error::TransferError;

/// TLS client configuration for `https` transfers.
#[cfg(feature = "tls")]
#[derive(Clone)]
pub struct TlsClientConfig {
    /// Pre-built rustls ClientConfig. The caller loads root certs, client
    /// certs and ALPN.
    pub client_config: Arc<rustls::ClientConfig>,
}

/// Tuning applied to a transfer before it starts.
///
/// An immutable value: the owner clones it into every handle it configures,
/// so no option state is shared between in-flight transfers. Cancellation
/// lives here too; the engine has no clock of its own, a timeout simply
/// ends the exchange.
#[derive(Clone)]
pub struct TransferOptions {
    /// Connect timeout. `None` blocks until the OS gives up.
    pub connect_timeout: Option<Duration>,
    /// Per-read timeout on the established socket. `None` blocks
    /// indefinitely.
    pub read_timeout: Option<Duration>,
    /// Enable TCP_NODELAY on the connection.
    pub tcp_nodelay: bool,
    /// Size of the buffer handed to each socket read.
    pub recv_buffer_size: usize,
    /// Value for the `user-agent` request header. `None` sends none.
    pub user_agent: Option<String>,
    /// TLS client configuration, required for `https` URLs.
    #[cfg(feature = "tls")]
    pub tls_client: Option<TlsClientConfig>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            read_timeout: None,
            tcp_nodelay: true,
            recv_buffer_size: 16384,
            user_agent: None,
            #[cfg(feature = "tls")]
            tls_client: None,
        }
    }
}

impl TransferOptions {
    /// Validate option values. Returns an error if any value is out of range.
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.recv_buffer_size == 0 {
            return Err(TransferError::InvalidOptions(
                "recv_buffer_size must be > 0",
            ));
        }
        if matches!(self.connect_timeout, Some(t) if t.is_zero()) {
            return Err(TransferError::InvalidOptions(
                "connect_timeout must be > 0",
            ));
        }
        if matches!(self.read_timeout, Some(t) if t.is_zero()) {
            return Err(TransferError::InvalidOptions("read_timeout must be > 0"));
        }
        Ok(())
    }
}
