//! TLS exchange path.
//!
//! Layers a rustls client session over the connected socket and runs the
//! same exchange loop as the plaintext path. The caller supplies the
//! `rustls::ClientConfig` (roots, client certs, ALPN) through
//! [`TlsClientConfig`](crate::TlsClientConfig); the engine does not build
//! trust anchors of its own.

use std::net::TcpStream;

use rustls::ClientConnection;
use rustls::pki_types::ServerName;

use crate::error::TransferError;
use crate::transfer::Transfer;
use crate::transport::exchange;

/// Run the exchange through a rustls client session on `stream`.
pub(crate) fn exchange_tls(
    mut stream: TcpStream,
    host: &str,
    transfer: &mut Transfer,
) -> Result<(), TransferError> {
    let config = transfer
        .options()
        .tls_client
        .as_ref()
        .ok_or(TransferError::TlsConfigMissing)?
        .client_config
        .clone();

    let server_name = ServerName::try_from(host.to_string())
        .map_err(|_| TransferError::InvalidUrl(format!("{host}: not a valid TLS server name")))?;
    let mut session = ClientConnection::new(config, server_name)?;
    let mut tls = rustls::Stream::new(&mut session, &mut stream);
    exchange(&mut tls, transfer)
}
