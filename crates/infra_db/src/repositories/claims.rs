//! Claim repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_kernel::{ClaimId, DomainPort, PolicyId, PortError};
use domain_claims::ports::ClaimRepository;
use domain_claims::{Claim, NewClaim};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use super::parse_column;
use crate::error::port_error;

const COLUMNS: &str = "claim_id, claim_number, policy_id, customer_id, claim_type, claim_amount, \
                       description, claim_status, approved_amount, rejection_reason, claim_date, \
                       created_at, updated_at, processed_at";

#[derive(Debug, Clone, FromRow)]
pub struct ClaimRow {
    pub claim_id: i64,
    pub claim_number: String,
    pub policy_id: i64,
    pub customer_id: String,
    pub claim_type: String,
    pub claim_amount: Decimal,
    pub description: String,
    pub claim_status: String,
    pub approved_amount: Decimal,
    pub rejection_reason: Option<String>,
    pub claim_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed_at: DateTime<Utc>,
}

impl TryFrom<ClaimRow> for Claim {
    type Error = PortError;

    fn try_from(row: ClaimRow) -> Result<Self, Self::Error> {
        Ok(Claim {
            id: ClaimId::new(row.claim_id),
            claim_number: row.claim_number,
            policy_id: PolicyId::new(row.policy_id),
            customer_id: row.customer_id,
            claim_type: row.claim_type,
            claim_amount: row.claim_amount,
            description: row.description,
            status: parse_column("claim_status", &row.claim_status)?,
            approved_amount: row.approved_amount,
            rejection_reason: row.rejection_reason,
            claim_date: row.claim_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
            processed_at: row.processed_at,
        })
    }
}

/// Claims table; the unique index on `policy_id` keeps one claim per policy
#[derive(Debug, Clone)]
pub struct PostgresClaimRepository {
    pool: PgPool,
}

impl PostgresClaimRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresClaimRepository {}

#[async_trait]
impl ClaimRepository for PostgresClaimRepository {
    async fn insert(&self, claim: NewClaim) -> Result<Claim, PortError> {
        let stored = claim.into_claim(ClaimId::new(0));
        let sql = format!(
            "INSERT INTO claims (claim_number, policy_id, customer_id, claim_type, claim_amount, \
             description, claim_status, approved_amount, rejection_reason, claim_date, \
             created_at, updated_at, processed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(&stored.claim_number)
            .bind(stored.policy_id.value())
            .bind(&stored.customer_id)
            .bind(&stored.claim_type)
            .bind(stored.claim_amount)
            .bind(&stored.description)
            .bind(stored.status.as_str())
            .bind(stored.approved_amount)
            .bind(&stored.rejection_reason)
            .bind(stored.claim_date)
            .bind(stored.created_at)
            .bind(stored.updated_at)
            .bind(stored.processed_at)
            .fetch_one(&self.pool)
            .await
            .map_err(port_error)?;
        Claim::try_from(row)
    }

    async fn find_by_id(&self, id: ClaimId) -> Result<Option<Claim>, PortError> {
        let sql = format!("SELECT {} FROM claims WHERE claim_id = $1", COLUMNS);
        sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(port_error)?
            .map(Claim::try_from)
            .transpose()
    }

    async fn latest_for_policy(&self, policy_id: PolicyId) -> Result<Option<Claim>, PortError> {
        let sql = format!(
            "SELECT {} FROM claims WHERE policy_id = $1 \
             ORDER BY claim_date DESC, claim_id DESC LIMIT 1",
            COLUMNS
        );
        sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(policy_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(port_error)?
            .map(Claim::try_from)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::ClaimStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_row_maps_to_claim() {
        let now = Utc::now();
        let row = ClaimRow {
            claim_id: 5,
            claim_number: "CLM-1".to_string(),
            policy_id: 2,
            customer_id: "CUST1".to_string(),
            claim_type: "ACCIDENT".to_string(),
            claim_amount: dec!(1000),
            description: "Fender".to_string(),
            claim_status: "PENDING".to_string(),
            approved_amount: dec!(0),
            rejection_reason: None,
            claim_date: now,
            created_at: now,
            updated_at: now,
            processed_at: now,
        };

        let claim = Claim::try_from(row).unwrap();

        assert_eq!(claim.id, ClaimId::new(5));
        assert_eq!(claim.status, ClaimStatus::Pending);
    }
}
