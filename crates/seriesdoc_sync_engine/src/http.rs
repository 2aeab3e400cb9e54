//! HTTP store implementation.
//!
//! This module speaks the document store's REST API. The actual HTTP client
//! is abstracted via a trait so the engine does not pick a networking stack.

use crate::error::{SyncError, SyncResult};
use crate::store::DocumentStore;
use parking_lot::RwLock;
use seriesdoc_sync_protocol::{
    BulkRequest, BulkResponse, ClusterInfo, CreateIndexResponse, DeleteByQueryResponse,
    ErrorCause, IndexSettings, Query,
};
use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;

const JSON: &str = "application/json";
const NDJSON: &str = "application/x-ndjson";

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// HEAD
    Head,
    /// PUT
    Put,
    /// POST
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
        };
        f.write_str(name)
    }
}

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Why no response was received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// The request did not complete in time.
    #[error("timed out: {0}")]
    Timeout(String),

    /// The connection failed or was cut; sending again may succeed.
    #[error("{0}")]
    Connection(String),

    /// The request itself is unusable (bad URL, bad header).
    #[error("invalid request: {0}")]
    Request(String),
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport. A returned
/// `Err` means no response was received; any status code is an `Ok`.
pub trait HttpClient: Send + Sync {
    /// Sends a request and returns the response.
    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        content_type: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, HttpError>;
}

/// HTTP-based document store.
pub struct HttpStore<C: HttpClient> {
    /// Base URL of the store (e.g., "http://localhost:9200").
    base_url: String,
    /// HTTP client implementation.
    client: C,
    /// Last transport error message.
    last_error: RwLock<Option<String>>,
}

impl<C: HttpClient> HttpStore<C> {
    /// Creates a new HTTP store.
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            last_error: RwLock::new(None),
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the last transport error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn call(
        &self,
        method: HttpMethod,
        path: &str,
        content_type: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> SyncResult<HttpResponse> {
        let url = self.url(path);
        match self.client.send(method, &url, content_type, body) {
            Ok(resp) => {
                *self.last_error.write() = None;
                Ok(resp)
            }
            Err(e) => {
                *self.last_error.write() = Some(e.to_string());
                Err(match e {
                    HttpError::Timeout(_) => SyncError::Timeout,
                    HttpError::Connection(e) => {
                        SyncError::transport_retryable(format!("{} {}: {}", method, url, e))
                    }
                    HttpError::Request(e) => {
                        SyncError::transport_fatal(format!("{} {}: {}", method, url, e))
                    }
                })
            }
        }
    }

    fn call_json<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        content_type: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> SyncResult<T> {
        let resp = self.call(method, path, content_type, body)?;
        if !resp.is_success() {
            return Err(store_error(&resp));
        }
        serde_json::from_slice(&resp.body)
            .map_err(|e| SyncError::Protocol(format!("{} {}: {}", method, path, e)))
    }
}

fn store_error(resp: &HttpResponse) -> SyncError {
    SyncError::Store {
        status: resp.status,
        cause: ErrorCause::from_body(resp.status, &resp.body),
    }
}

fn to_json_body(value: &serde_json::Value) -> SyncResult<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| SyncError::Protocol(format!("failed to encode request: {}", e)))
}

impl<C: HttpClient> DocumentStore for HttpStore<C> {
    fn ping(&self) -> SyncResult<ClusterInfo> {
        self.call_json(HttpMethod::Get, "", None, None)
    }

    fn index_exists(&self, index: &str) -> SyncResult<bool> {
        let resp = self.call(HttpMethod::Head, index, None, None)?;
        match resp.status {
            200..=299 => Ok(true),
            404 => Ok(false),
            _ => Err(store_error(&resp)),
        }
    }

    fn create_index(
        &self,
        index: &str,
        settings: &IndexSettings,
    ) -> SyncResult<CreateIndexResponse> {
        let body = to_json_body(&settings.to_body())?;
        self.call_json(HttpMethod::Put, index, Some(JSON), Some(body))
    }

    fn bulk(&self, request: &BulkRequest) -> SyncResult<BulkResponse> {
        let body = request.to_ndjson()?;
        self.call_json(HttpMethod::Post, "_bulk", Some(NDJSON), Some(body))
    }

    fn delete_by_query(&self, index: &str, query: &Query) -> SyncResult<DeleteByQueryResponse> {
        let body = to_json_body(&query.to_body())?;
        let path = format!("{}/_delete_by_query", index);
        self.call_json(HttpMethod::Post, &path, Some(JSON), Some(body))
    }
}
