use serde::{Deserialize, Serialize};

use storefront_core::{CategoryId, DocumentId, DomainResult, Entity, Price, ProductId, SizeId};

use crate::category::CategoryRef;
use crate::image::Image;

/// Read-only projection of a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Stable across catalog edits; the storefront shows it as the SKU.
    pub document_id: DocumentId,
    pub slug: String,
    pub title: String,
    /// Decimal string as delivered upstream. See [`Product::price_value`].
    pub price: String,
    /// `None` when the CMS omitted the flag.
    pub is_available: Option<bool>,
    pub description: Vec<DescriptionBlock>,
    pub sizes: Vec<Size>,
    pub images: Vec<Image>,
    pub category: Option<CategoryRef>,
}

impl Product {
    /// Minimal product used by tests and fixtures; every optional part empty.
    pub fn new(
        id: ProductId,
        slug: impl Into<String>,
        title: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            id,
            document_id: DocumentId::default(),
            slug: slug.into(),
            title: title.into(),
            price: price.into(),
            is_available: None,
            description: Vec::new(),
            sizes: Vec::new(),
            images: Vec::new(),
            category: None,
        }
    }

    pub fn price_value(&self) -> DomainResult<Price> {
        Price::parse(&self.price)
    }

    pub fn availability(&self) -> Availability {
        match self.is_available {
            Some(true) => Availability::InStock,
            Some(false) => Availability::OutOfStock,
            None => Availability::Unknown,
        }
    }

    /// First size variant; the detail page preselects it.
    pub fn default_size(&self) -> Option<&Size> {
        self.sizes.first()
    }

    pub fn primary_image(&self) -> Option<&Image> {
        self.images.first()
    }

    /// Second image, shown when a listing card is hovered.
    pub fn hover_image(&self) -> Option<&Image> {
        self.images.get(1)
    }

    /// Description text as display lines: every span split on `\n`, in
    /// block then span order.
    pub fn description_lines(&self) -> Vec<&str> {
        self.description
            .iter()
            .flat_map(|block| block.spans.iter())
            .flat_map(|span| span.text.split('\n'))
            .collect()
    }

    pub fn in_category(&self, category_id: CategoryId) -> bool {
        self.category.as_ref().is_some_and(|c| c.id == category_id)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Stock state as the storefront reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    InStock,
    OutOfStock,
    /// Flag absent upstream; never treated as purchasable.
    Unknown,
}

impl Availability {
    pub fn is_purchasable(&self) -> bool {
        matches!(self, Availability::InStock)
    }

    pub fn label(&self) -> &'static str {
        if self.is_purchasable() { "IN STOCK" } else { "OUT OF STOCK" }
    }
}

/// One rich-text block (`paragraph`, `heading`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionBlock {
    pub kind: String,
    pub spans: Vec<TextSpan>,
}

impl DescriptionBlock {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: "paragraph".to_string(),
            spans: vec![TextSpan { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
}

/// A size variant owned by a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub id: SizeId,
    pub label: String,
}
