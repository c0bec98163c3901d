use std::io;

use thiserror::Error;

/// Errors returned by the transfer engine.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The target URL was missing, unparseable, or had no host.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// The URL scheme is not one the engine speaks.
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),
    /// Option values out of range.
    #[error("invalid options: {0}")]
    InvalidOptions(&'static str),
    /// Socket setup or I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// TLS session setup failed.
    #[cfg(feature = "tls")]
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),
    /// An `https` URL was requested without a TLS client configuration.
    #[cfg(feature = "tls")]
    #[error("https requested but no TLS client config was supplied")]
    TlsConfigMissing,
    /// The registered sink consumed fewer bytes than it was given.
    #[error("transfer aborted by sink")]
    Aborted,
}
