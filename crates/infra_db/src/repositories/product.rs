//! Product catalog repository

use async_trait::async_trait;
use core_kernel::{DomainPort, PortError, ProductId};
use domain_product::ports::ProductRepository;
use domain_product::product::{NewProduct, Product};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::error::port_error;

const COLUMNS: &str = "product_id, product_name, product_type, coverage_type, \
                       min_premium, max_coverage, description, active";

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub product_id: i64,
    pub product_name: String,
    pub product_type: String,
    pub coverage_type: String,
    pub min_premium: Decimal,
    pub max_coverage: Decimal,
    pub description: String,
    pub active: bool,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId::new(row.product_id),
            name: row.product_name,
            product_type: row.product_type,
            coverage_type: row.coverage_type,
            min_premium: row.min_premium,
            max_coverage: row.max_coverage,
            description: row.description,
            active: row.active,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresProductRepository {}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn insert(&self, product: NewProduct) -> Result<Product, PortError> {
        let sql = format!(
            "INSERT INTO products (product_name, product_type, coverage_type, min_premium, \
             max_coverage, description, active) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&product.name)
            .bind(&product.product_type)
            .bind(&product.coverage_type)
            .bind(product.min_premium)
            .bind(product.max_coverage)
            .bind(&product.description)
            .bind(product.active)
            .fetch_one(&self.pool)
            .await
            .map_err(port_error)?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, PortError> {
        let sql = format!("SELECT {} FROM products WHERE product_id = $1", COLUMNS);
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(port_error)?;
        Ok(row.map(Product::from))
    }

    async fn find_all(&self) -> Result<Vec<Product>, PortError> {
        let sql = format!("SELECT {} FROM products ORDER BY product_id", COLUMNS);
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(port_error)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_type(&self, product_type: &str) -> Result<Vec<Product>, PortError> {
        let sql = format!(
            "SELECT {} FROM products WHERE product_type = $1 ORDER BY product_id",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(product_type)
            .fetch_all(&self.pool)
            .await
            .map_err(port_error)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_name_and_type(
        &self,
        name: &str,
        product_type: &str,
    ) -> Result<Option<Product>, PortError> {
        let sql = format!(
            "SELECT {} FROM products WHERE product_name = $1 AND product_type = $2",
            COLUMNS
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(name)
            .bind(product_type)
            .fetch_optional(&self.pool)
            .await
            .map_err(port_error)?;
        Ok(row.map(Product::from))
    }

    async fn update(&self, product: &Product) -> Result<(), PortError> {
        let result = sqlx::query(
            "UPDATE products SET product_name = $2, product_type = $3, coverage_type = $4, \
             min_premium = $5, max_coverage = $6, description = $7, active = $8 \
             WHERE product_id = $1",
        )
        .bind(product.id.value())
        .bind(&product.name)
        .bind(&product.product_type)
        .bind(&product.coverage_type)
        .bind(product.min_premium)
        .bind(product.max_coverage)
        .bind(&product.description)
        .bind(product.active)
        .execute(&self.pool)
        .await
        .map_err(port_error)?;

        if result.rows_affected() == 0 {
            return Err(PortError::not_found("Product", product.id));
        }
        Ok(())
    }

    async fn delete(&self, id: ProductId) -> Result<bool, PortError> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(port_error)?;
        Ok(result.rows_affected() > 0)
    }
}
