//! Edge services resource client.

use serde::{Deserialize, Serialize};

use crate::options::validate_id;
use crate::{nullable, ApiClient, ApiError, HttpTransport, ListOptions, Method};

const RESOURCE: &str = "edge service";

/// A name/value pair exposed to the service at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub value: String,
}

/// An edge service as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeService {
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub active: bool,
    #[serde(deserialize_with = "nullable")]
    pub updated_at: String,
    #[serde(deserialize_with = "nullable")]
    pub last_editor: String,
    pub bound_nodes: i64,
    #[serde(deserialize_with = "nullable")]
    pub permissions: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub variables: Vec<Variable>,
}

/// Payload for creating an edge service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateServiceRequest {
    pub name: String,
}

impl CreateServiceRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Partial update of an edge service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateServiceRequest {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<Variable>>,
}

impl UpdateServiceRequest {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    services: Vec<EdgeService>,
}

/// Client for the edge services API (`/services`).
pub struct EdgeServicesClient<T> {
    api: ApiClient<T>,
}

impl<T: HttpTransport> EdgeServicesClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api: ApiClient::new(transport, base_url, token),
        }
    }

    /// Fetch a single service without its variables.
    pub async fn get(&self, id: i64) -> Result<EdgeService, ApiError> {
        self.fetch(id, false).await
    }

    /// Fetch a single service including its variables.
    pub async fn get_with_variables(&self, id: i64) -> Result<EdgeService, ApiError> {
        self.fetch(id, true).await
    }

    async fn fetch(&self, id: i64, with_vars: bool) -> Result<EdgeService, ApiError> {
        validate_id(id)?;
        let request = self
            .api
            .request(Method::Get, format!("services/{}", id))
            .query("with_vars", with_vars);
        let response = self.api.execute(RESOURCE, request).await?;
        response.decode(RESOURCE)
    }

    /// Fetch one page of services. `page_size` is sent as `limit`.
    pub async fn list(&self, opts: &ListOptions) -> Result<Vec<EdgeService>, ApiError> {
        opts.validate()?;
        let mut request = self
            .api
            .request(Method::Get, "services")
            .query("page", opts.page)
            .query("limit", opts.page_size);
        if let Some(filter) = &opts.filter {
            request = request.query("filter", filter);
        }

        let response = self.api.execute(RESOURCE, request).await?;
        Ok(response.decode::<Page>(RESOURCE)?.services)
    }

    pub async fn create(&self, req: CreateServiceRequest) -> Result<EdgeService, ApiError> {
        let request = self
            .api
            .request(Method::Post, "services")
            .json(&req)
            .map_err(|e| ApiError::Invalid(e.to_string()))?;
        let response = self.api.execute(RESOURCE, request).await?;
        response.decode(RESOURCE)
    }

    pub async fn update(&self, req: UpdateServiceRequest) -> Result<EdgeService, ApiError> {
        validate_id(req.id)?;
        let request = self
            .api
            .request(Method::Patch, format!("services/{}", req.id))
            .json(&req)
            .map_err(|e| ApiError::Invalid(e.to_string()))?;
        let response = self.api.execute(RESOURCE, request).await?;
        response.decode(RESOURCE)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        validate_id(id)?;
        let request = self
            .api
            .request(Method::Delete, format!("services/{}", id));
        self.api.execute(RESOURCE, request).await?;
        Ok(())
    }
}
