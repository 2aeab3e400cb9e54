//! Blocking HTTP client backed by reqwest.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use seriesdoc_sync_engine::{HttpClient, HttpError, HttpMethod, HttpResponse, HttpStore};
use std::time::Duration;

/// `HttpClient` over a reqwest blocking client.
pub struct ReqwestClient {
    inner: Client,
}

impl ReqwestClient {
    /// Creates a client with a per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let inner = Client::builder().timeout(timeout).build()?;
        Ok(Self { inner })
    }
}

impl HttpClient for ReqwestClient {
    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        content_type: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, HttpError> {
        let method = match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Post => Method::POST,
        };
        let mut request = self.inner.request(method, url);
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().map_err(http_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(http_error)?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

fn http_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout(e.to_string())
    } else if e.is_builder() {
        HttpError::Request(e.to_string())
    } else {
        HttpError::Connection(e.to_string())
    }
}

/// Opens an HTTP store at `url`.
pub fn connect(url: &str, timeout_secs: u64) -> Result<HttpStore<ReqwestClient>, reqwest::Error> {
    let client = ReqwestClient::new(Duration::from_secs(timeout_secs))?;
    Ok(HttpStore::new(url, client))
}
