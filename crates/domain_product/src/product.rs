//! Product entity and its inbound request

use core_kernel::{ProductId, ProductView};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stored catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub product_type: String,
    pub coverage_type: String,
    pub min_premium: Decimal,
    pub max_coverage: Decimal,
    pub description: String,
    pub active: bool,
}

/// A validated product not yet stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub product_type: String,
    pub coverage_type: String,
    pub min_premium: Decimal,
    pub max_coverage: Decimal,
    pub description: String,
    pub active: bool,
}

impl NewProduct {
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            product_type: self.product_type,
            coverage_type: self.coverage_type,
            min_premium: self.min_premium,
            max_coverage: self.max_coverage,
            description: self.description,
            active: self.active,
        }
    }
}

/// Add/update request as received on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductRequest {
    pub product_name: String,
    pub product_type: String,
    pub coverage_type: String,
    pub min_premium: Decimal,
    pub max_coverage: Decimal,
    pub description: String,
    pub active: bool,
}

impl Default for ProductRequest {
    fn default() -> Self {
        Self {
            product_name: String::new(),
            product_type: String::new(),
            coverage_type: String::new(),
            min_premium: Decimal::ZERO,
            max_coverage: Decimal::ZERO,
            description: String::new(),
            active: true,
        }
    }
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        ProductView {
            product_id: product.id,
            product_name: product.name.clone(),
            product_type: product.product_type.clone(),
            coverage_type: product.coverage_type.clone(),
            min_premium: product.min_premium,
            max_coverage: product.max_coverage,
            description: Some(product.description.clone()),
            active: product.active,
        }
    }
}
