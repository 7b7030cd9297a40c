//! Product Domain Ports

use async_trait::async_trait;
use core_kernel::{DomainPort, PortError, ProductId};

use crate::product::{NewProduct, Product};

/// Keyed store for catalog products
#[async_trait]
pub trait ProductRepository: DomainPort {
    /// Stores a product and assigns its id
    ///
    /// Fails with `Conflict` if a product with the same name and type exists.
    async fn insert(&self, product: NewProduct) -> Result<Product, PortError>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, PortError>;

    async fn find_all(&self) -> Result<Vec<Product>, PortError>;

    async fn find_by_type(&self, product_type: &str) -> Result<Vec<Product>, PortError>;

    async fn find_by_name_and_type(
        &self,
        name: &str,
        product_type: &str,
    ) -> Result<Option<Product>, PortError>;

    /// Replaces a stored product, `NotFound` if it does not exist
    async fn update(&self, product: &Product) -> Result<(), PortError>;

    /// Returns whether a product was removed
    async fn delete(&self, id: ProductId) -> Result<bool, PortError>;
}

/// In-memory repository, used when no database is configured and in tests
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    struct Store {
        next_id: i64,
        products: BTreeMap<ProductId, Product>,
    }

    #[derive(Debug, Default, Clone)]
    pub struct InMemoryProductRepository {
        store: Arc<RwLock<Store>>,
    }

    impl InMemoryProductRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for InMemoryProductRepository {}

    #[async_trait]
    impl ProductRepository for InMemoryProductRepository {
        async fn insert(&self, product: NewProduct) -> Result<Product, PortError> {
            let mut store = self.store.write().await;
            let duplicate = store
                .products
                .values()
                .any(|p| p.name == product.name && p.product_type == product.product_type);
            if duplicate {
                return Err(PortError::conflict(format!(
                    "product {} / {} already exists",
                    product.name, product.product_type
                )));
            }
            store.next_id += 1;
            let stored = product.into_product(ProductId::new(store.next_id));
            store.products.insert(stored.id, stored.clone());
            Ok(stored)
        }

        async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, PortError> {
            Ok(self.store.read().await.products.get(&id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Product>, PortError> {
            Ok(self.store.read().await.products.values().cloned().collect())
        }

        async fn find_by_type(&self, product_type: &str) -> Result<Vec<Product>, PortError> {
            Ok(self
                .store
                .read()
                .await
                .products
                .values()
                .filter(|p| p.product_type == product_type)
                .cloned()
                .collect())
        }

        async fn find_by_name_and_type(
            &self,
            name: &str,
            product_type: &str,
        ) -> Result<Option<Product>, PortError> {
            Ok(self
                .store
                .read()
                .await
                .products
                .values()
                .find(|p| p.name == name && p.product_type == product_type)
                .cloned())
        }

        async fn update(&self, product: &Product) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            match store.products.get_mut(&product.id) {
                Some(existing) => {
                    *existing = product.clone();
                    Ok(())
                }
                None => Err(PortError::not_found("Product", product.id)),
            }
        }

        async fn delete(&self, id: ProductId) -> Result<bool, PortError> {
            Ok(self.store.write().await.products.remove(&id).is_some())
        }
    }
}
