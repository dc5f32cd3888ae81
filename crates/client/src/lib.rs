//! `storefront-client`: catalog access layer.
//!
//! **Responsibility:** every read the storefront makes against the headless
//! CMS goes through [`CatalogClient`]. It owns:
//! - the four catalog queries and their staleness budgets
//! - the response cache keyed by the fully-qualified request URL
//! - decoding of the CMS `{ "data": ... }` envelopes into catalog projections
//! - collapsing upstream failures into empty/absent results (after logging)
//!
//! The CMS stays the authority; nothing here writes upstream.

pub mod cache;
pub mod client;
pub mod config;
pub mod request;
pub mod transport;
mod wire;

pub use cache::{Clock, ManualClock, ResponseCache, SystemClock};
pub use client::{CatalogClient, FetchError};
pub use config::{CatalogConfig, ConfigError, StalenessBudgets};
pub use request::{CatalogRequest, Operation};
pub use transport::{CatalogTransport, HttpTransport, InMemoryTransport, TransportError};
