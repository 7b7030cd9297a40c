//! Payment repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_kernel::{DomainPort, PaymentId, PolicyId, PortError};
use domain_billing::ports::TransactionRepository;
use domain_billing::{NewTransaction, Transaction};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use super::parse_column;
use crate::error::port_error;

const COLUMNS: &str = "payment_id, policy_id, customer_id, policy_number, payment_mode, \
                       payment_type, reference_number, transaction_id, amount, payment_status, \
                       description, payment_date";

#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    pub payment_id: i64,
    pub policy_id: i64,
    pub customer_id: String,
    pub policy_number: String,
    pub payment_mode: String,
    pub payment_type: String,
    pub reference_number: String,
    pub transaction_id: String,
    pub amount: Decimal,
    pub payment_status: String,
    pub description: Option<String>,
    pub payment_date: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = PortError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Transaction {
            id: PaymentId::new(row.payment_id),
            policy_id: PolicyId::new(row.policy_id),
            customer_id: row.customer_id,
            policy_number: row.policy_number,
            payment_mode: parse_column("payment_mode", &row.payment_mode)?,
            payment_type: parse_column("payment_type", &row.payment_type)?,
            reference_number: row.reference_number,
            transaction_id: row.transaction_id,
            amount: row.amount,
            status: parse_column("payment_status", &row.payment_status)?,
            description: row.description,
            payment_date: row.payment_date,
        })
    }
}

/// Payments table; the unique index on `policy_id` keeps one payment per policy
#[derive(Debug, Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresTransactionRepository {}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn insert(&self, transaction: NewTransaction) -> Result<Transaction, PortError> {
        let sql = format!(
            "INSERT INTO payment_details (policy_id, customer_id, policy_number, payment_mode, \
             payment_type, reference_number, transaction_id, amount, payment_status, description, \
             payment_date) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(transaction.policy_id.value())
            .bind(&transaction.customer_id)
            .bind(&transaction.policy_number)
            .bind(transaction.payment_mode.as_str())
            .bind(transaction.payment_type.as_str())
            .bind(&transaction.reference_number)
            .bind(&transaction.transaction_id)
            .bind(transaction.amount)
            .bind(transaction.status.as_str())
            .bind(&transaction.description)
            .bind(transaction.payment_date)
            .fetch_one(&self.pool)
            .await
            .map_err(port_error)?;
        Transaction::try_from(row)
    }

    async fn find_by_policy_id(&self, policy_id: PolicyId) -> Result<Option<Transaction>, PortError> {
        let sql = format!("SELECT {} FROM payment_details WHERE policy_id = $1", COLUMNS);
        sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(policy_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(port_error)?
            .map(Transaction::try_from)
            .transpose()
    }

    async fn latest_for_customer(&self, customer_id: &str) -> Result<Option<Transaction>, PortError> {
        let sql = format!(
            "SELECT {} FROM payment_details WHERE customer_id = $1 \
             ORDER BY payment_date DESC, payment_id DESC LIMIT 1",
            COLUMNS
        );
        sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(port_error)?
            .map(Transaction::try_from)
            .transpose()
    }
}
