//! Typed REST clients for the edge platform API.
//!
//! Each resource family gets a thin client that builds authenticated
//! requests, sends them through an [`HttpTransport`], and funnels the outcome
//! through the shared [`classify`] step so every caller sees the same error
//! shape.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use edge_api::{EdgeFunctionsClient, ListOptions, ReqwestTransport};
//!
//! let transport = ReqwestTransport::new(Duration::from_secs(10), "edge-cli/0.1.0")?;
//! let client = EdgeFunctionsClient::new(transport, edge_api::DEFAULT_FUNCTIONS_URL, token);
//!
//! let function = client.get(1337).await?;
//! let page = client.list(&ListOptions::new(1, 10)).await?;
//! ```

mod client;
mod edge_functions;
mod edge_services;
mod error;
mod options;
mod request;
mod response;
mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

use serde::{Deserialize, Deserializer};

pub use client::{ApiClient, API_VERSION_ACCEPT};
pub use edge_functions::{
    CreateFunctionRequest, EdgeFunction, EdgeFunctionsClient, UpdateFunctionRequest, JAVASCRIPT,
};
pub use edge_services::{
    CreateServiceRequest, EdgeService, EdgeServicesClient, UpdateServiceRequest, Variable,
};
pub use error::{classify, ApiError, FetchError};
pub use options::{validate_id, ListOptions, SortOrder, DEFAULT_PAGE_SIZE};
pub use request::{Method, Request};
pub use response::Response;
pub use transport::{HttpTransport, ReqwestTransport};

/// Default host for the edge functions API.
pub const DEFAULT_FUNCTIONS_URL: &str = "https://api.azionapi.net";

/// Default host for the edge services API.
pub const DEFAULT_SERVICES_URL: &str = "https://api.azion.net/edge_services";

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        ApiError, EdgeFunction, EdgeFunctionsClient, EdgeService, EdgeServicesClient,
        HttpTransport, ListOptions, SortOrder,
    };
}
