//! Outbound HTTP seam.
//!
//! [`CatalogClient`](crate::CatalogClient) only needs "GET this URL, give me
//! the body". The production implementation uses `reqwest`; tests and the API
//! crate's black-box suite use [`InMemoryTransport`], a small fake of the CMS
//! REST surface.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use reqwest::Url;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait]
pub trait CatalogTransport: Send + Sync {
    /// Fetch `url` and return the raw response body of a 2xx response.
    async fn get(&self, url: &Url) -> Result<String, TransportError>;
}

/// `reqwest`-backed transport with optional bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(token: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), token)
    }

    pub fn with_client(client: reqwest::Client, token: Option<String>) -> Self {
        Self { client, token }
    }
}

#[async_trait]
impl CatalogTransport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String, TransportError> {
        let mut req = self.client.get(url.clone());
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        resp.text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))
    }
}

/// In-memory stand-in for the CMS.
///
/// Serves `/api/products` (honouring the slug filter and the slug-only field
/// projection) and `/api/catagories` from the records it was seeded with.
/// Records are stored in wire shape so tests can also feed malformed data.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    products: RwLock<Vec<Value>>,
    categories: RwLock<Vec<Value>>,
    failure: RwLock<Option<TransportError>>,
    path_failures: RwLock<Vec<(String, TransportError)>>,
    raw_body: RwLock<Option<String>>,
    requests: AtomicUsize,
    requested: RwLock<Vec<String>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(self, products: Vec<Value>) -> Self {
        self.set_products(products);
        self
    }

    pub fn with_categories(self, categories: Vec<Value>) -> Self {
        self.set_categories(categories);
        self
    }

    pub fn set_products(&self, products: Vec<Value>) {
        *write(&self.products) = products;
    }

    pub fn set_categories(&self, categories: Vec<Value>) {
        *write(&self.categories) = categories;
    }

    /// Every following request fails with `err` until [`Self::recover`].
    pub fn fail_with(&self, err: TransportError) {
        *write(&self.failure) = Some(err);
    }

    /// Requests whose path ends with `path` fail with `err` until
    /// [`Self::recover`]; other endpoints keep answering.
    pub fn fail_path_with(&self, path: impl Into<String>, err: TransportError) {
        let path = path.into();
        let mut failures = write(&self.path_failures);
        failures.retain(|(p, _)| *p != path);
        failures.push((path, err));
    }

    /// Every following request answers 200 with `body` verbatim.
    pub fn respond_with_raw(&self, body: impl Into<String>) {
        *write(&self.raw_body) = Some(body.into());
    }

    /// Drop any injected failure or raw body.
    pub fn recover(&self) {
        *write(&self.failure) = None;
        write(&self.path_failures).clear();
        *write(&self.raw_body) = None;
    }

    /// Requests received so far, including failed ones.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn requested_urls(&self) -> Vec<String> {
        read(&self.requested).clone()
    }

    fn products_response(&self, query: &HashMap<String, String>) -> Value {
        let products = read(&self.products);
        let matching = products.iter().filter(|p| match query.get("filters[slug][$eq]") {
            Some(slug) => p.get("slug").and_then(Value::as_str) == Some(slug.as_str()),
            None => true,
        });

        let data: Vec<Value> = if query.get("fields[0]").map(String::as_str) == Some("slug") {
            matching
                .map(|p| {
                    json!({
                        "id": p.get("id").cloned().unwrap_or(Value::Null),
                        "documentId": p.get("documentId").cloned().unwrap_or(Value::Null),
                        "slug": p.get("slug").cloned().unwrap_or(Value::Null),
                    })
                })
                .collect()
        } else {
            matching.cloned().collect()
        };
        envelope(data)
    }
}

#[async_trait]
impl CatalogTransport for InMemoryTransport {
    async fn get(&self, url: &Url) -> Result<String, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        write(&self.requested).push(url.to_string());

        let path = url.path().trim_end_matches('/');

        if let Some(err) = read(&self.failure).clone() {
            return Err(err);
        }
        let path_failure = read(&self.path_failures)
            .iter()
            .find(|(failing, _)| path.ends_with(failing.trim_end_matches('/')))
            .map(|(_, err)| err.clone());
        if let Some(err) = path_failure {
            return Err(err);
        }
        if let Some(body) = read(&self.raw_body).clone() {
            return Ok(body);
        }

        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();

        if path.ends_with("/api/products") {
            Ok(self.products_response(&query).to_string())
        } else if path.ends_with("/api/catagories") {
            Ok(envelope(read(&self.categories).clone()).to_string())
        } else {
            Err(TransportError::Status {
                status: 404,
                body: json!({
                    "data": null,
                    "error": { "status": 404, "name": "NotFoundError", "message": "Not Found" }
                })
                .to_string(),
            })
        }
    }
}

fn envelope(data: Vec<Value>) -> Value {
    let total = data.len();
    json!({
        "data": data,
        "meta": {
            "pagination": { "page": 1, "pageSize": 25, "pageCount": 1, "total": total }
        }
    })
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
