//! Per-verb transfer configuration and per-request customization.
//!
//! Each API operation maps to a fixed configuration step on the transfer
//! handle; a caller-supplied [`RequestCustomizer`] runs after it and may
//! reshape the handle further. Application order is always: client
//! options, verb defaults, customizer.

use davit::{Body, Method, Transfer};

/// The five operations the API client exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verb {
    Get,
    Head,
    Delete,
    Post,
    Put,
}

impl Verb {
    /// Apply this verb's defaults to a transfer handle.
    pub(crate) fn apply(self, transfer: &mut Transfer) {
        match self {
            Verb::Get => {}
            Verb::Head => {
                transfer.set_method(Method::Head);
                transfer.set_no_body(true);
            }
            Verb::Delete => transfer.set_method(Method::Delete),
            Verb::Post => transfer.set_method(Method::Post),
            Verb::Put => transfer.set_method(Method::Put),
        }
    }
}

/// Per-request capability that may reshape the transfer before it starts:
/// attach an upload body, add headers, swap options.
pub trait RequestCustomizer {
    fn customize(&self, transfer: &mut Transfer);
}

impl<F> RequestCustomizer for F
where
    F: Fn(&mut Transfer),
{
    fn customize(&self, transfer: &mut Transfer) {
        self(transfer)
    }
}

/// Customizer that attaches a complete upload body with a content type.
pub struct UploadBody {
    content_type: String,
    body: Body,
}

impl UploadBody {
    /// Arbitrary payload with an explicit content type.
    pub fn new(content_type: &str, body: impl Into<Body>) -> Self {
        Self {
            content_type: content_type.to_string(),
            body: body.into(),
        }
    }

    /// JSON payload (`application/json`), the daemon's lingua franca.
    pub fn json(body: impl Into<Body>) -> Self {
        Self::new("application/json", body)
    }
}

impl RequestCustomizer for UploadBody {
    fn customize(&self, transfer: &mut Transfer) {
        transfer.header("content-type", &self.content_type);
        transfer.set_body(self.body.clone());
    }
}
