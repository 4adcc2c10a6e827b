//! Edge functions resource client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::options::validate_id;
use crate::{nullable, ApiClient, ApiError, HttpTransport, ListOptions, Method};

const RESOURCE: &str = "edge function";

/// The only language the API accepts, and a required field on create.
pub const JAVASCRIPT: &str = "javascript";

/// An edge function as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeFunction {
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub language: String,
    #[serde(deserialize_with = "nullable")]
    pub code: String,
    pub json_args: Value,
    #[serde(deserialize_with = "nullable")]
    pub function_to_run: String,
    #[serde(deserialize_with = "nullable")]
    pub initiator_type: String,
    pub active: bool,
    #[serde(deserialize_with = "nullable")]
    pub last_editor: String,
    #[serde(deserialize_with = "nullable")]
    pub modified: String,
    pub reference_count: i64,
}

/// Payload for creating an edge function. The id is assigned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateFunctionRequest {
    pub name: String,
    #[serde(default)]
    pub language: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_args: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiator_type: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CreateFunctionRequest {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            active: true,
            ..Self::default()
        }
    }
}

/// Partial update of an edge function; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateFunctionRequest {
    #[serde(skip)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_args: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiator_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl UpdateFunctionRequest {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    results: EdgeFunction,
}

#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    results: Vec<EdgeFunction>,
}

/// Client for `/edge_functions`.
pub struct EdgeFunctionsClient<T> {
    api: ApiClient<T>,
}

impl<T: HttpTransport> EdgeFunctionsClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api: ApiClient::new(transport, base_url, token),
        }
    }

    /// Fetch a single edge function.
    pub async fn get(&self, id: i64) -> Result<EdgeFunction, ApiError> {
        validate_id(id)?;
        let request = self
            .api
            .request(Method::Get, format!("edge_functions/{}", id));
        let response = self.api.execute(RESOURCE, request).await?;
        Ok(response.decode::<Envelope>(RESOURCE)?.results)
    }

    /// Fetch one page of edge functions.
    pub async fn list(&self, opts: &ListOptions) -> Result<Vec<EdgeFunction>, ApiError> {
        opts.validate()?;
        let mut request = self
            .api
            .request(Method::Get, "edge_functions")
            .query("page", opts.page)
            .query("page_size", opts.page_size)
            .query("sort", opts.sort);
        if let Some(order_by) = &opts.order_by {
            request = request.query("order_by", order_by);
        }

        let response = self.api.execute(RESOURCE, request).await?;
        Ok(response.decode::<Page>(RESOURCE)?.results)
    }

    /// Create an edge function. The language is always JavaScript.
    pub async fn create(&self, mut req: CreateFunctionRequest) -> Result<EdgeFunction, ApiError> {
        req.language = JAVASCRIPT.to_string();
        let request = self
            .api
            .request(Method::Post, "edge_functions")
            .json(&req)
            .map_err(|e| ApiError::Invalid(e.to_string()))?;
        let response = self.api.execute(RESOURCE, request).await?;
        Ok(response.decode::<Envelope>(RESOURCE)?.results)
    }

    /// Apply a partial update to the function named by `req.id`.
    pub async fn update(&self, req: UpdateFunctionRequest) -> Result<EdgeFunction, ApiError> {
        validate_id(req.id)?;
        let request = self
            .api
            .request(Method::Patch, format!("edge_functions/{}", req.id))
            .json(&req)
            .map_err(|e| ApiError::Invalid(e.to_string()))?;
        let response = self.api.execute(RESOURCE, request).await?;
        Ok(response.decode::<Envelope>(RESOURCE)?.results)
    }

    /// Delete an edge function.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        validate_id(id)?;
        let request = self
            .api
            .request(Method::Delete, format!("edge_functions/{}", id));
        self.api.execute(RESOURCE, request).await?;
        Ok(())
    }
}
