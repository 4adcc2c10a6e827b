//! In-memory transport for tests.
//!
//! Stubs are matched by method and path and each stub answers exactly once,
//! so a sequence like GET, DELETE, GET can return different results.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{FetchError, HttpTransport, Method, Request, Response};

/// What a stub answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A response with the given status and body.
    Respond(Response),
    /// Simulate a connection that never produced a response.
    NoResponse,
}

impl Reply {
    /// A JSON response.
    pub fn json(status: u16, body: &str) -> Self {
        let headers = HashMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]);
        Reply::Respond(Response::new(status, headers, body.as_bytes().to_vec()))
    }

    /// A plain-text response.
    pub fn status(status: u16, body: &str) -> Self {
        Reply::Respond(Response::new(
            status,
            HashMap::new(),
            body.as_bytes().to_vec(),
        ))
    }
}

#[derive(Debug)]
struct Stub {
    method: Method,
    path: String,
    reply: Reply,
    matched: bool,
}

/// Registry of canned replies standing in for the platform API.
#[derive(Debug, Default)]
pub struct MockTransport {
    stubs: Mutex<Vec<Stub>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reply for `method` on `path` (relative to the base URL).
    pub fn register(self, method: Method, path: &str, reply: Reply) -> Self {
        self.stubs.lock().expect("mock stubs poisoned").push(Stub {
            method,
            path: path.trim_start_matches('/').to_string(),
            reply,
            matched: false,
        });
        self
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().expect("mock requests poisoned").clone()
    }

    /// Whether every registered stub has been used.
    pub fn all_matched(&self) -> bool {
        self.stubs
            .lock()
            .expect("mock stubs poisoned")
            .iter()
            .all(|stub| stub.matched)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        self.requests
            .lock()
            .expect("mock requests poisoned")
            .push(request.clone());

        let mut stubs = self.stubs.lock().expect("mock stubs poisoned");
        let stub = stubs
            .iter_mut()
            .find(|s| !s.matched && s.method == request.method && s.path == request.path)
            .ok_or_else(|| {
                FetchError::RequestError(format!(
                    "no stub registered for {} {}",
                    request.method.as_str(),
                    request.path
                ))
            })?;
        stub.matched = true;

        match &stub.reply {
            Reply::Respond(response) => Ok(response.clone()),
            Reply::NoResponse => Err(FetchError::RequestError("connection refused".to_string())),
        }
    }
}
