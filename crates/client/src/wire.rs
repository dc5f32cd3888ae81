//! CMS response shapes and their conversion into catalog projections.
//!
//! Everything except the record ids is optional: the CMS omits relations that
//! were not populated and editors leave fields blank.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use storefront_catalog::{Category, CategoryRef, DescriptionBlock, Image, Product, ProductRef, Size, TextSpan};
use storefront_core::{CategoryId, DocumentId, ImageId, ProductId, SizeId};

/// `{ "data": ..., "meta": ... }`. `data` may be a list, a single record or
/// null depending on the endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    data: Option<Data<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Data<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_records(self) -> Vec<T> {
        match self.data {
            Some(Data::Many(records)) => records,
            Some(Data::One(record)) => vec![record],
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireProduct {
    id: u64,
    #[serde(default)]
    document_id: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "price_string")]
    price: String,
    #[serde(default, rename = "isavailable")]
    is_available: Option<bool>,
    #[serde(default, rename = "Description")]
    description: Option<Vec<WireBlock>>,
    #[serde(default)]
    images: Option<Vec<WireImage>>,
    #[serde(default)]
    catagory: Option<WireCategoryRef>,
    #[serde(default)]
    size: Option<Vec<WireSize>>,
}

#[derive(Debug, Deserialize)]
struct WireBlock {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    children: Option<Vec<WireSpan>>,
}

#[derive(Debug, Deserialize)]
struct WireSpan {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireImage {
    id: u64,
    #[serde(default)]
    document_id: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    formats: Option<BTreeMap<String, WireFormat>>,
}

#[derive(Debug, Deserialize)]
struct WireFormat {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireCategoryRef {
    id: u64,
    #[serde(default, rename = "Name")]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireSize {
    id: u64,
    #[serde(default)]
    size: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireCategory {
    id: u64,
    #[serde(default)]
    document_id: Option<String>,
    #[serde(default, rename = "Name")]
    name: Option<String>,
    #[serde(default)]
    products: Option<Vec<WireProductRef>>,
}

#[derive(Debug, Deserialize)]
struct WireProductRef {
    id: u64,
    #[serde(default)]
    slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireSlug {
    #[serde(default)]
    slug: Option<String>,
}

impl WireSlug {
    pub(crate) fn into_slug(self) -> Option<String> {
        self.slug.filter(|s| !s.is_empty())
    }
}

/// Prices arrive as decimal strings; older entries store plain numbers.
fn price_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<RawPrice>::deserialize(deserializer)? {
        Some(RawPrice::Text(s)) => s,
        Some(RawPrice::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

impl From<WireProduct> for Product {
    fn from(wire: WireProduct) -> Self {
        let mut product = Product::new(
            ProductId::new(wire.id),
            wire.slug.unwrap_or_default(),
            wire.title.unwrap_or_default(),
            wire.price,
        );
        product.document_id = DocumentId::new(wire.document_id.unwrap_or_default());
        product.is_available = wire.is_available;
        product.description = wire
            .description
            .unwrap_or_default()
            .into_iter()
            .map(|block| DescriptionBlock {
                kind: block.kind.unwrap_or_default(),
                spans: block
                    .children
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|span| span.text.map(|text| TextSpan { text }))
                    .collect(),
            })
            .collect();
        product.images = wire.images.unwrap_or_default().into_iter().map(Image::from).collect();
        product.category = wire.catagory.map(|c| CategoryRef {
            id: CategoryId::new(c.id),
            name: c.name.unwrap_or_default(),
        });
        product.sizes = wire
            .size
            .unwrap_or_default()
            .into_iter()
            .map(|s| Size {
                id: SizeId::new(s.id),
                label: s.size.unwrap_or_default(),
            })
            .collect();
        product
    }
}

impl From<WireImage> for Image {
    fn from(wire: WireImage) -> Self {
        let mut image = Image::new(ImageId::new(wire.id), wire.url.unwrap_or_default());
        image.document_id = wire.document_id.map(DocumentId::new);
        for (name, format) in wire.formats.unwrap_or_default() {
            if let Some(url) = format.url.filter(|u| !u.is_empty()) {
                image = image.with_rendition(name, url);
            }
        }
        image
    }
}

impl From<WireCategory> for Category {
    fn from(wire: WireCategory) -> Self {
        let mut category = Category::new(CategoryId::new(wire.id), wire.name.unwrap_or_default());
        category.document_id = DocumentId::new(wire.document_id.unwrap_or_default());
        category.products = wire
            .products
            .unwrap_or_default()
            .into_iter()
            .map(|p| ProductRef {
                id: ProductId::new(p.id),
                slug: p.slug,
            })
            .collect();
        category
    }
}
