//! davit — synchronous HTTP transfer engine.
//!
//! One [`Transfer`] handle describes one exchange: target URL, verb
//! override, request headers, upload body, tuning options, and a streaming
//! [`DataSink`] that receives response bytes as they arrive. A
//! [`Transport`] runs the handle to completion; [`TcpTransport`] is the
//! built-in backend for `http` and (with the `tls` feature) `https`.
//!
//! Handles are single-shot. There is no connection reuse, no redirect
//! handling and no retry policy: one handle, one connection, one exchange.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use davit::{TcpTransport, Transfer, Transport};
//!
//! fn main() -> Result<(), davit::TransferError> {
//!     let mut transfer = Transfer::new();
//!     transfer.set_url("http://localhost:2375/_ping")?;
//!     transfer.set_sink(Box::new(|chunk: &[u8]| {
//!         print!("{}", String::from_utf8_lossy(chunk));
//!         chunk.len()
//!     }));
//!     TcpTransport.run(&mut transfer)?;
//!     Ok(())
//! }
//! ```

pub mod body;
pub mod error;
pub mod metrics;
pub mod method;
pub mod options;
pub mod sink;
pub mod transfer;
pub mod transport;
#[cfg(feature = "tls")]
pub(crate) mod tls;

pub use body::Body;
pub use error::TransferError;
pub use method::Method;
#[cfg(feature = "tls")]
pub use options::TlsClientConfig;
pub use options::TransferOptions;
pub use sink::DataSink;
pub use transfer::Transfer;
pub use transport::{TcpTransport, Transport};
