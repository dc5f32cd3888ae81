use serde::{Deserialize, Serialize};

use storefront_catalog::{
    Availability, Category, CategoryFilter, CategoryRef, Gallery, ImageUrlResolver, Magnifier, Product, Size,
    SortOrder, Thumbnail,
};
use storefront_core::{CategoryId, DocumentId, ImageId, Price, ProductId, SizeId};

/// Number of equal parts in the "pay in installments" hint.
pub const INSTALLMENTS: u32 = 3;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    /// Comma-separated category ids; absent or blank means "All".
    pub category: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    /// Image to show as the main gallery image.
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RevalidateRequest {
    pub tag: String,
}

// -------------------------
// Response DTOs
// -------------------------

/// Listing grid card.
#[derive(Debug, Serialize)]
pub struct ProductCard {
    pub id: ProductId,
    pub slug: String,
    pub title: String,
    pub price: String,
    pub price_display: String,
    pub image_url: String,
    /// Swapped in on hover; only present when the product has a second image.
    pub hover_image_url: Option<String>,
    pub category: Option<String>,
    pub availability: Availability,
}

impl ProductCard {
    pub fn from_product(product: &Product, resolver: &ImageUrlResolver, currency: &str) -> Self {
        Self {
            id: product.id,
            slug: product.slug.clone(),
            title: product.title.clone(),
            price: product.price.clone(),
            price_display: price_display(&product.price, currency),
            image_url: resolver.resolve(product.primary_image().map(|img| img.url.as_str())),
            hover_image_url: product.hover_image().map(|img| resolver.resolve_image(img)),
            category: product.category.as_ref().map(|c| c.name.clone()),
            availability: product.availability(),
        }
    }
}

/// Sidebar filter entry.
#[derive(Debug, Serialize)]
pub struct CategoryOption {
    pub id: CategoryId,
    pub name: String,
    pub product_count: usize,
    pub selected: bool,
}

impl CategoryOption {
    pub fn from_category(category: &Category, filter: &CategoryFilter) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            product_count: category.product_count(),
            selected: filter.is_selected(category.id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub products: Vec<ProductCard>,
    pub categories: Vec<CategoryOption>,
    pub selected: Vec<CategoryId>,
    pub sort: SortOrder,
    pub sort_label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub id: ProductId,
    pub sku: DocumentId,
    pub slug: String,
    pub title: String,
    pub price: String,
    pub price_display: String,
    /// e.g. `"PKR 333.33"`; absent when the price does not parse.
    pub installment: Option<String>,
    pub availability: Availability,
    pub availability_label: &'static str,
    pub category: Option<CategoryRef>,
    pub sizes: Vec<Size>,
    pub default_size: Option<SizeId>,
    pub description: Vec<String>,
    pub main_image_url: Option<String>,
    pub thumbnails: Vec<Thumbnail>,
    pub magnifier: Magnifier,
}

impl ProductDetail {
    pub fn from_product(
        product: &Product,
        selected_image: Option<ImageId>,
        resolver: &ImageUrlResolver,
        currency: &str,
        magnifier: Magnifier,
    ) -> Self {
        let mut gallery = Gallery::for_product(product);
        if let Some(id) = selected_image {
            gallery.select(id);
        }
        let availability = product.availability();

        Self {
            id: product.id,
            sku: product.document_id.clone(),
            slug: product.slug.clone(),
            title: product.title.clone(),
            price: product.price.clone(),
            price_display: price_display(&product.price, currency),
            installment: installment_display(&product.price, currency),
            availability,
            availability_label: availability.label(),
            category: product.category.clone(),
            sizes: product.sizes.clone(),
            default_size: product.default_size().map(|s| s.id),
            description: product.description_lines().into_iter().map(str::to_string).collect(),
            main_image_url: gallery.main_image_url(resolver),
            thumbnails: gallery.thumbnails(resolver),
            magnifier,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct SlugsResponse {
    pub slugs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RevalidateResponse {
    pub tag: String,
    pub purged: usize,
}

// -------------------------
// Mapping helpers
// -------------------------

/// `"<currency> <price>"`; unparseable prices are shown as delivered.
pub fn price_display(raw: &str, currency: &str) -> String {
    match Price::parse(raw) {
        Ok(price) => price.display_with(currency),
        Err(_) => format!("{currency} {}", raw.trim()),
    }
}

pub fn installment_display(raw: &str, currency: &str) -> Option<String> {
    let share = Price::parse(raw).ok()?.installment(INSTALLMENTS).ok()?;
    Some(format!("{currency} {}", share.to_fixed(storefront_core::money::DISPLAY_SCALE)))
}
