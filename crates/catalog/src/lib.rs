//! Catalog domain module.
//!
//! Read-only projections of the records the CMS owns (products, images,
//! categories, sizes) plus the pure logic the storefront pages run over them:
//! image URL resolution, category filtering, price sorting and gallery
//! selection. No IO, no HTTP, no caching.

pub mod category;
pub mod gallery;
pub mod image;
pub mod listing;
pub mod product;

pub use category::{Category, CategoryRef, ProductRef};
pub use gallery::{Gallery, LensOffset, Magnifier, Thumbnail};
pub use image::{Image, ImageUrlResolver, DEFAULT_PLACEHOLDER_URL, THUMBNAIL_RENDITION};
pub use listing::{CategoryFilter, SortOrder};
pub use product::{Availability, DescriptionBlock, Product, Size, TextSpan};
