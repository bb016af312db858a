use crate::domain::model::{ChargeOutcome, LedgerEntry, NewTransaction, Transaction};
use crate::domain::repository::{self, StoreError};
use crate::infra::repository::is_unique_violation;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres};

pub struct PgLedgerRepository {
    pub pool: PgPool,
}

impl PgLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_transaction(
        entry: &NewTransaction,
        tx: &mut sqlx::Transaction<'_, Postgres>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO transactions(invoice_number, email, service_code, service_name, transaction_type, total_amount, created_on)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&entry.invoice_number)
        .bind(&entry.email)
        .bind(&entry.service_code)
        .bind(&entry.service_name)
        .bind(entry.transaction_type.as_str())
        .bind(entry.total_amount)
        .bind(entry.created_on)
        .execute(&mut **tx)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                anyhow::Error::new(StoreError::DuplicateInvoice(entry.invoice_number.clone()))
            } else {
                anyhow::Error::new(err).context("insert transaction")
            }
        })?;

        Ok(())
    }
}

#[async_trait]
impl repository::LedgerRepository for PgLedgerRepository {
    async fn balance(&self, email: &str) -> anyhow::Result<Option<i64>> {
        let balance = sqlx::query_scalar("SELECT balance FROM balances WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(balance)
    }

    async fn top_up(&self, entry: NewTransaction) -> anyhow::Result<LedgerEntry> {
        let mut tx = self.pool.begin().await?;

        Self::insert_transaction(&entry, &mut tx).await?;

        // the upsert takes the row lock, concurrent top-ups queue behind it
        let balance: i64 = sqlx::query_scalar(
            "INSERT INTO balances(email, balance) VALUES ($1, $2)
             ON CONFLICT (email) DO UPDATE SET balance = balances.balance + EXCLUDED.balance
             RETURNING balance",
        )
        .bind(&entry.email)
        .bind(entry.total_amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(LedgerEntry {
            transaction: Transaction::from(entry),
            balance,
        })
    }

    async fn charge(
        &self,
        entry: NewTransaction,
        allow_negative: bool,
    ) -> anyhow::Result<ChargeOutcome> {
        let mut tx = self.pool.begin().await?;

        let current: Option<i64> =
            sqlx::query_scalar("SELECT balance FROM balances WHERE email = $1 FOR UPDATE")
                .bind(&entry.email)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(current) = current else {
            tx.rollback().await?;
            return Ok(ChargeOutcome::NoBalance);
        };

        if !allow_negative && current < entry.total_amount {
            tx.rollback().await?;
            return Ok(ChargeOutcome::Insufficient { balance: current });
        }

        Self::insert_transaction(&entry, &mut tx).await?;

        let balance: i64 = sqlx::query_scalar(
            "UPDATE balances SET balance = balance - $1 WHERE email = $2 RETURNING balance",
        )
        .bind(entry.total_amount)
        .bind(&entry.email)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ChargeOutcome::Charged(LedgerEntry {
            transaction: Transaction::from(entry),
            balance,
        }))
    }

    async fn history(&self, email: &str, limit: Option<i64>) -> anyhow::Result<Vec<Transaction>> {
        // LIMIT NULL means no limit in postgres
        let rows = sqlx::query(
            "SELECT invoice_number, email, service_code, service_name, transaction_type, total_amount, created_on
             FROM transactions
             WHERE email = $1
             ORDER BY created_on DESC, id DESC
             LIMIT $2",
        )
        .bind(email)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }
}
