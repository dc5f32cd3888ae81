//! Product images and the URL resolver that makes them displayable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use storefront_core::{DocumentId, Entity, ImageId};

/// Returned for empty or missing image URLs.
pub const DEFAULT_PLACEHOLDER_URL: &str = "/placeholder.svg?height=400&width=400";

/// Rendition name the CMS uses for its smallest derived image.
pub const THUMBNAIL_RENDITION: &str = "thumbnail";

/// An uploaded image with its derived renditions (`thumbnail`, `small`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub document_id: Option<DocumentId>,
    /// Absolute or origin-relative URL exactly as the CMS reports it.
    pub url: String,
    pub renditions: BTreeMap<String, String>,
}

impl Image {
    pub fn new(id: ImageId, url: impl Into<String>) -> Self {
        Self {
            id,
            document_id: None,
            url: url.into(),
            renditions: BTreeMap::new(),
        }
    }

    pub fn with_rendition(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.renditions.insert(name.into(), url.into());
        self
    }

    pub fn rendition(&self, name: &str) -> Option<&str> {
        self.renditions
            .get(name)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }

    /// Thumbnail rendition when present, otherwise the full image.
    pub fn thumbnail_source(&self) -> &str {
        self.rendition(THUMBNAIL_RENDITION).unwrap_or(&self.url)
    }
}

impl Entity for Image {
    type Id = ImageId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Turns CMS image URLs into URLs a browser can load.
///
/// Absolute URLs (`http://`, `https://`) pass through untouched, relative ones
/// are appended to the media origin, and empty input yields the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlResolver {
    origin: String,
    placeholder: String,
}

impl ImageUrlResolver {
    /// The origin is stored without a trailing slash.
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        Self {
            origin,
            placeholder: DEFAULT_PLACEHOLDER_URL.to_string(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn resolve(&self, url: Option<&str>) -> String {
        match url.map(str::trim) {
            None | Some("") => self.placeholder.clone(),
            Some(url) if has_network_scheme(url) => url.to_string(),
            Some(url) => format!("{}{}", self.origin, url),
        }
    }

    pub fn resolve_image(&self, image: &Image) -> String {
        self.resolve(Some(&image.url))
    }

    pub fn resolve_thumbnail(&self, image: &Image) -> String {
        self.resolve(Some(image.thumbnail_source()))
    }
}

fn has_network_scheme(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
