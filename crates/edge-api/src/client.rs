//! Authenticated request construction shared by the resource clients.

use crate::{classify, ApiError, HttpTransport, Method, Request, Response};

/// Accept header pinning the API schema version.
pub const API_VERSION_ACCEPT: &str = "application/json; version=3";

/// Base client bound to one API host.
pub struct ApiClient<T> {
    transport: T,
    base_url: String,
    token: String,
}

impl<T: HttpTransport> ApiClient<T> {
    /// Create a client for `base_url` authenticating with `token`.
    pub fn new(transport: T, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Start a request carrying the auth and version headers.
    pub fn request(&self, method: Method, path: impl Into<String>) -> Request {
        Request::new(method, &self.base_url, path)
            .token_auth(&self.token)
            .accept(API_VERSION_ACCEPT)
    }

    /// Send `request` and classify the outcome on behalf of `resource`.
    pub async fn execute(
        &self,
        resource: &'static str,
        request: Request,
    ) -> Result<Response, ApiError> {
        tracing::debug!(
            method = request.method.as_str(),
            url = %request.url(),
            "sending request"
        );

        let outcome = self.transport.send(request).await;
        if let Ok(response) = &outcome {
            tracing::debug!(status = response.status, "received response");
        }

        classify(resource, outcome)
    }
}
