//! The API client: URL building and the per-request execution pipeline.

use std::sync::Arc;

use davit::{TcpTransport, TransferOptions, Transport};

use crate::error::Error;
use crate::response::Response;
use crate::verb::{RequestCustomizer, Verb};

/// Connection settings for an [`ApiClient`].
///
/// Immutable once the client is constructed; every request clones the
/// option set into its own transfer handle, so concurrent calls share
/// nothing mutable.
#[derive(Clone)]
pub struct ClientConfig {
    /// Daemon host name or address.
    pub host: String,
    /// Daemon port.
    pub port: u16,
    /// Use `https` instead of `http`.
    pub use_tls: bool,
    /// API version inserted as a path segment (e.g. `v1.43`), or `None`
    /// to address unversioned paths.
    pub version: Option<String>,
    /// Transfer tuning applied to every request.
    pub options: TransferOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 2376,
            use_tls: true,
            version: None,
            options: TransferOptions::default(),
        }
    }
}

/// Client for a Docker-daemon-style REST API.
///
/// One instance is safely shared by any number of concurrent calls; each
/// call owns its transfer and response exclusively.
///
/// # Example
///
/// ```rust,no_run
/// use davit_docker::{ApiClient, ClientConfig, UploadBody};
///
/// # fn main() -> Result<(), davit_docker::Error> {
/// let client = ApiClient::new(ClientConfig {
///     host: "localhost".to_string(),
///     port: 2375,
///     use_tls: false,
///     ..ClientConfig::default()
/// });
///
/// let created = client.post(
///     "/containers/create",
///     &[("name", "web")],
///     Some(&UploadBody::json(r#"{"Image":"nginx"}"#)),
/// )?;
/// assert_eq!(created.status(), 201);
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Create a client over the built-in TCP/TLS transport.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: Arc::new(TcpTransport),
        }
    }

    /// Create a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
        customizer: Option<&dyn RequestCustomizer>,
    ) -> Result<Response, Error> {
        self.execute(Verb::Get, path, params, customizer)
    }

    pub fn head(
        &self,
        path: &str,
        params: &[(&str, &str)],
        customizer: Option<&dyn RequestCustomizer>,
    ) -> Result<Response, Error> {
        self.execute(Verb::Head, path, params, customizer)
    }

    pub fn delete(
        &self,
        path: &str,
        params: &[(&str, &str)],
        customizer: Option<&dyn RequestCustomizer>,
    ) -> Result<Response, Error> {
        self.execute(Verb::Delete, path, params, customizer)
    }

    pub fn post(
        &self,
        path: &str,
        params: &[(&str, &str)],
        customizer: Option<&dyn RequestCustomizer>,
    ) -> Result<Response, Error> {
        self.execute(Verb::Post, path, params, customizer)
    }

    pub fn put(
        &self,
        path: &str,
        params: &[(&str, &str)],
        customizer: Option<&dyn RequestCustomizer>,
    ) -> Result<Response, Error> {
        self.execute(Verb::Put, path, params, customizer)
    }

    /// Build the request URL for `path` and `params`.
    ///
    /// `{scheme}://{host}:{port}` + optional `/{version}` + `path`, with a
    /// `?`-query appended only when `params` is non-empty.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<String, Error> {
        if !path.starts_with('/') {
            return Err(Error::InvalidPath(path.to_string()));
        }
        let scheme = if self.config.use_tls { "https" } else { "http" };
        let version = match &self.config.version {
            Some(v) => format!("/{v}"),
            None => String::new(),
        };
        let mut url = format!(
            "{scheme}://{}:{}{version}{path}",
            self.config.host, self.config.port
        );
        if !params.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        Ok(url)
    }

    fn execute(
        &self,
        verb: Verb,
        path: &str,
        params: &[(&str, &str)],
        customizer: Option<&dyn RequestCustomizer>,
    ) -> Result<Response, Error> {
        let url = self.build_url(path, params)?;

        let mut response = Response::new();
        let transfer = response.transfer();
        if transfer.set_url(&url).is_err() {
            // A host string the URL parser rejects can never resolve; at
            // this layer that is the same total failure as a DNS miss.
            return Err(Error::ServiceUnavailable);
        }
        transfer.set_options(self.config.options.clone());
        verb.apply(transfer);
        if let Some(customizer) = customizer {
            customizer.customize(transfer);
        }

        // A transport failure leaves the capture without a boundary; the
        // status check below turns that into the connection error.
        let _ = self.transport.run(transfer);
        response.complete();

        response.wait_for_header();
        if response.status() == 0 {
            return Err(Error::ServiceUnavailable);
        }
        Ok(response)
    }
}
