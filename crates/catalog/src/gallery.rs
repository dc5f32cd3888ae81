//! Product detail gallery: image selection and the hover magnifier.

use serde::Serialize;
use storefront_core::{Entity, ImageId};

use crate::image::{Image, ImageUrlResolver};
use crate::product::Product;

/// Gallery over a product's images. The first image starts selected.
#[derive(Debug, Clone)]
pub struct Gallery<'a> {
    images: &'a [Image],
    selected: usize,
}

/// One entry of the thumbnail strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub image_id: ImageId,
    pub url: String,
    pub selected: bool,
}

impl<'a> Gallery<'a> {
    pub fn new(images: &'a [Image]) -> Self {
        Self { images, selected: 0 }
    }

    pub fn for_product(product: &'a Product) -> Self {
        Self::new(&product.images)
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Switch the main image. Unknown ids leave the selection unchanged.
    pub fn select(&mut self, id: ImageId) -> bool {
        match self.images.iter().position(|img| img.id() == &id) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<&'a Image> {
        self.images.get(self.selected)
    }

    /// `None` for a product without images: nothing is rendered.
    pub fn main_image_url(&self, resolver: &ImageUrlResolver) -> Option<String> {
        self.selected().map(|img| resolver.resolve_image(img))
    }

    pub fn thumbnails(&self, resolver: &ImageUrlResolver) -> Vec<Thumbnail> {
        self.images
            .iter()
            .enumerate()
            .map(|(idx, img)| Thumbnail {
                image_id: img.id,
                url: resolver.resolve_thumbnail(img),
                selected: idx == self.selected,
            })
            .collect()
    }
}

/// Square lens that shows a zoomed patch of the image under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Magnifier {
    pub side: f64,
    pub zoom: f64,
}

impl Default for Magnifier {
    fn default() -> Self {
        Self { side: 120.0, zoom: 2.5 }
    }
}

/// Background offset (px) of the zoomed image inside the lens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LensOffset {
    pub x: f64,
    pub y: f64,
}

impl Magnifier {
    /// Pointer coordinates are relative to the image box. Outside the box
    /// the lens is hidden.
    pub fn lens(&self, x: f64, y: f64, width: f64, height: f64) -> Option<LensOffset> {
        let inside = (0.0..=width).contains(&x) && (0.0..=height).contains(&y);
        if !inside {
            return None;
        }
        let half = self.side / 2.0;
        Some(LensOffset {
            x: -(x * self.zoom - half),
            y: -(y * self.zoom - half),
        })
    }
}
