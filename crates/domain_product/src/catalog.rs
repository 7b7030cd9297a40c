//! Product catalog service

use std::sync::Arc;

use async_trait::async_trait;
use core_kernel::{DomainPort, PortError, ProductClient, ProductId, ProductView};
use infra_cache::{regions, CacheLayer};

use crate::error::ProductError;
use crate::ports::ProductRepository;
use crate::product::ProductRequest;
use crate::validation::{validate_product_id, validate_product_request};

/// Administers catalog products and answers product lookups
///
/// Reads go through the `product-by-id` and `products` cache regions; every
/// write evicts both regions.
pub struct ProductCatalog {
    repository: Arc<dyn ProductRepository>,
    cache: CacheLayer,
}

impl ProductCatalog {
    pub fn new(repository: Arc<dyn ProductRepository>, cache: CacheLayer) -> Self {
        Self { repository, cache }
    }

    /// Adds a product to the catalog
    ///
    /// # Errors
    ///
    /// * `Invalid` - a field failed validation
    /// * `Duplicate` - a product with the same name and type exists
    pub async fn add_product(&self, request: &ProductRequest) -> Result<ProductId, ProductError> {
        let product = validate_product_request(request)?;

        if let Some(existing) = self
            .repository
            .find_by_name_and_type(&product.name, &product.product_type)
            .await
            .map_err(ProductError::Storage)?
        {
            tracing::info!(existing_id = %existing.id, name = %product.name, "duplicate product rejected");
            return Err(ProductError::Duplicate {
                name: product.name,
                product_type: product.product_type,
            });
        }

        let name = product.name.clone();
        let product_type = product.product_type.clone();
        let stored = self.repository.insert(product).await.map_err(|e| {
            if e.is_conflict() {
                ProductError::Duplicate { name, product_type }
            } else {
                ProductError::Storage(e)
            }
        })?;

        self.evict();
        tracing::info!(product_id = %stored.id, name = %stored.name, "product added");
        Ok(stored.id)
    }

    pub async fn get_product(&self, id: ProductId) -> Result<ProductView, ProductError> {
        let id = validate_product_id(id)?;
        let key = format!("product-{}", id);
        self.cache
            .read_through(regions::PRODUCT_BY_ID, &key, || async {
                self.repository
                    .find_by_id(id)
                    .await
                    .map_err(ProductError::Storage)?
                    .map(|p| ProductView::from(&p))
                    .ok_or(ProductError::NotFound(id))
            })
            .await
    }

    pub async fn list_products(&self) -> Result<Vec<ProductView>, ProductError> {
        self.cache
            .read_through(regions::PRODUCTS, "all-products", || async {
                let products = self.repository.find_all().await.map_err(ProductError::Storage)?;
                Ok(products.iter().map(ProductView::from).collect())
            })
            .await
    }

    pub async fn products_by_type(&self, product_type: &str) -> Result<Vec<ProductView>, ProductError> {
        let product_type = product_type.trim();
        if product_type.is_empty() {
            return Err(core_kernel::ValidationFailure::new(
                "INVALID_PRODUCT_TYPE",
                "Product type cannot be empty",
            )
            .into());
        }
        let key = format!("type-{}", product_type);
        self.cache
            .read_through(regions::PRODUCTS, &key, || async {
                let products = self
                    .repository
                    .find_by_type(product_type)
                    .await
                    .map_err(ProductError::Storage)?;
                Ok(products.iter().map(ProductView::from).collect())
            })
            .await
    }

    pub async fn update_product(&self, id: ProductId, request: &ProductRequest) -> Result<(), ProductError> {
        let id = validate_product_id(id)?;
        let update = validate_product_request(request)?;

        if self
            .repository
            .find_by_id(id)
            .await
            .map_err(ProductError::Storage)?
            .is_none()
        {
            return Err(ProductError::NotFound(id));
        }

        self.repository
            .update(&update.into_product(id))
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ProductError::NotFound(id)
                } else {
                    ProductError::Storage(e)
                }
            })?;

        self.evict();
        tracing::info!(product_id = %id, "product updated");
        Ok(())
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), ProductError> {
        let id = validate_product_id(id)?;
        let removed = self.repository.delete(id).await.map_err(ProductError::Storage)?;
        if !removed {
            return Err(ProductError::NotFound(id));
        }
        self.evict();
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Succeeds if the product exists, active or not
    pub async fn validate_product(&self, id: ProductId) -> Result<(), ProductError> {
        self.get_product(id).await.map(|_| ())
    }

    fn evict(&self) {
        self.cache
            .invalidate(&[regions::PRODUCTS, regions::PRODUCT_BY_ID]);
    }
}

impl DomainPort for ProductCatalog {}

#[async_trait]
impl ProductClient for ProductCatalog {
    async fn validate_product(&self, product_id: ProductId) -> Result<(), PortError> {
        ProductCatalog::validate_product(self, product_id)
            .await
            .map_err(PortError::from)
    }

    async fn get_product(&self, product_id: ProductId) -> Result<ProductView, PortError> {
        ProductCatalog::get_product(self, product_id)
            .await
            .map_err(PortError::from)
    }
}
