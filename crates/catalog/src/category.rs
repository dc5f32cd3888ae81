use serde::{Deserialize, Serialize};

use storefront_core::{CategoryId, DocumentId, Entity, ProductId};

/// A catalog category with references to the products filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub document_id: DocumentId,
    pub name: String,
    pub products: Vec<ProductRef>,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            document_id: DocumentId::default(),
            name: name.into(),
            products: Vec::new(),
        }
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Category as embedded in a product record (foreign key + display name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
}

/// Product as embedded in a category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    pub slug: Option<String>,
}
