//! Policy repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_kernel::{DomainPort, PolicyId, PortError, ProductId};
use domain_policy::ports::PolicyRepository;
use domain_policy::policy::{NewPolicy, Policy};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use super::parse_column;
use crate::error::port_error;

const COLUMNS: &str = "policy_id, policy_number, customer_id, product_id, premium_amount, \
                       coverage_amount, policy_start_date, policy_end_date, policy_status, \
                       payment_mode, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct PolicyRow {
    pub policy_id: i64,
    pub policy_number: String,
    pub customer_id: i64,
    pub product_id: i64,
    pub premium_amount: Decimal,
    pub coverage_amount: Decimal,
    pub policy_start_date: DateTime<Utc>,
    pub policy_end_date: DateTime<Utc>,
    pub policy_status: String,
    pub payment_mode: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PolicyRow> for Policy {
    type Error = PortError;

    fn try_from(row: PolicyRow) -> Result<Self, Self::Error> {
        Ok(Policy {
            id: PolicyId::new(row.policy_id),
            policy_number: row.policy_number,
            customer_id: row.customer_id,
            product_id: ProductId::new(row.product_id),
            premium_amount: row.premium_amount,
            coverage_amount: row.coverage_amount,
            start_date: row.policy_start_date,
            end_date: row.policy_end_date,
            status: parse_column("policy_status", &row.policy_status)?,
            payment_mode: parse_column("payment_mode", &row.payment_mode)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PostgresPolicyRepository {
    pool: PgPool,
}

impl PostgresPolicyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresPolicyRepository {}

#[async_trait]
impl PolicyRepository for PostgresPolicyRepository {
    async fn insert(&self, policy: NewPolicy) -> Result<Policy, PortError> {
        let sql = format!(
            "INSERT INTO policy_details (policy_number, customer_id, product_id, premium_amount, \
             coverage_amount, policy_start_date, policy_end_date, policy_status, payment_mode, \
             created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10) \
             RETURNING {}",
            COLUMNS
        );
        let terms = &policy.terms;
        let row = sqlx::query_as::<_, PolicyRow>(&sql)
            .bind(&policy.policy_number)
            .bind(terms.customer_id)
            .bind(terms.product_id.value())
            .bind(terms.premium_amount)
            .bind(terms.coverage_amount)
            .bind(terms.start_date)
            .bind(terms.end_date)
            .bind(policy.status.as_str())
            .bind(terms.payment_mode.as_str())
            .bind(policy.issued_at)
            .fetch_one(&self.pool)
            .await
            .map_err(port_error)?;
        Policy::try_from(row)
    }

    async fn find_by_id(&self, id: PolicyId) -> Result<Option<Policy>, PortError> {
        let sql = format!("SELECT {} FROM policy_details WHERE policy_id = $1", COLUMNS);
        sqlx::query_as::<_, PolicyRow>(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(port_error)?
            .map(Policy::try_from)
            .transpose()
    }
}
