//! Docker Engine API client over the davit transfer engine.
//!
//! [`ApiClient`] turns a logical request (verb, path, query parameters,
//! optional per-request customization) into one synchronous transfer and a
//! [`Response`] whose status and headers can be inspected as soon as the
//! header block has arrived, even while the body is still streaming in.
//!
//! Server-returned statuses are never errors here: a 404 from the daemon is
//! a normal [`Response`]. The only fatal conditions are a malformed path
//! and a transfer that produced no response at all.
//!
//! # Example
//!
//! ```rust,no_run
//! use davit_docker::{ApiClient, ClientConfig};
//!
//! fn main() -> Result<(), davit_docker::Error> {
//!     let client = ApiClient::new(ClientConfig {
//!         host: "localhost".to_string(),
//!         port: 2375,
//!         use_tls: false,
//!         ..ClientConfig::default()
//!     });
//!     let containers = client.get("/containers/json", &[("all", "1")], None)?;
//!     println!("{} {}", containers.status(), containers.text());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod response;
pub mod verb;

pub use client::{ApiClient, ClientConfig};
pub use error::Error;
pub use response::Response;
pub use verb::{RequestCustomizer, UploadBody};
