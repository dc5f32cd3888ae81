//! `storefront-core`: shared building blocks for the storefront catalog.
//!
//! This crate contains **pure domain** primitives (no IO, no HTTP, no caching).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, DocumentId, ImageId, ProductId, SizeId};
pub use money::Price;
