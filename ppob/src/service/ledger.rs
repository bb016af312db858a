use crate::domain::model::{
    ChargeOutcome, LedgerEntry, NewTransaction, Transaction, TransactionType, TOPUP_SERVICE_CODE,
    TOPUP_SERVICE_NAME,
};
use crate::domain::repository::{CatalogRepository, LedgerRepository, StoreError};
use crate::service::error::{AppError, AppResult};
use crate::service::invoice::invoice_number;
use std::future::Future;
use std::sync::Arc;

/// Total insert attempts when the store rejects a generated invoice number.
pub const MAX_INVOICE_ATTEMPTS: usize = 3;

pub struct LedgerService {
    ledger_repo: Arc<dyn LedgerRepository>,
    catalog_repo: Arc<dyn CatalogRepository>,
    allow_negative_balance: bool,
}

impl LedgerService {
    pub fn new(
        ledger_repo: Arc<dyn LedgerRepository>,
        catalog_repo: Arc<dyn CatalogRepository>,
        allow_negative_balance: bool,
    ) -> LedgerService {
        LedgerService {
            ledger_repo,
            catalog_repo,
            allow_negative_balance,
        }
    }

    pub async fn balance(&self, email: &str) -> AppResult<i64> {
        self.ledger_repo
            .balance(email)
            .await?
            .ok_or(AppError::BalanceNotFound)
    }

    pub async fn top_up(&self, email: &str, amount: i64) -> AppResult<LedgerEntry> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount);
        }

        let entry = self
            .write_with_fresh_invoice(
                || {
                    new_entry(
                        email,
                        TOPUP_SERVICE_CODE,
                        TOPUP_SERVICE_NAME,
                        TransactionType::Topup,
                        amount,
                    )
                },
                move |entry| self.ledger_repo.top_up(entry),
            )
            .await?;

        log::info!(
            email = email,
            invoice = entry.transaction.invoice_number.as_str(),
            amount = amount,
            balance = entry.balance;
            "Balance topped up"
        );
        Ok(entry)
    }

    pub async fn charge(&self, email: &str, service_code: &str, amount: i64) -> AppResult<LedgerEntry> {
        // resolved before the ledger opens its transaction
        let service = self
            .catalog_repo
            .find_service(service_code)
            .await?
            .ok_or_else(|| AppError::ServiceNotFound(service_code.to_string()))?;

        if amount <= 0 {
            return Err(AppError::InvalidAmount);
        }

        let allow_negative = self.allow_negative_balance;
        let outcome = self
            .write_with_fresh_invoice(
                || {
                    new_entry(
                        email,
                        &service.service_code,
                        &service.service_name,
                        TransactionType::Payment,
                        amount,
                    )
                },
                move |entry| self.ledger_repo.charge(entry, allow_negative),
            )
            .await?;

        match outcome {
            ChargeOutcome::Charged(entry) => {
                log::info!(
                    email = email,
                    invoice = entry.transaction.invoice_number.as_str(),
                    service = service_code,
                    amount = amount,
                    balance = entry.balance;
                    "Payment charged"
                );
                Ok(entry)
            }
            ChargeOutcome::NoBalance => Err(AppError::BalanceNotFound),
            ChargeOutcome::Insufficient { balance } => {
                log::info!(email = email, balance = balance, amount = amount; "Charge refused");
                Err(AppError::InsufficientBalance)
            }
        }
    }

    pub async fn history(&self, email: &str, limit: Option<i64>) -> AppResult<Vec<Transaction>> {
        if matches!(limit, Some(limit) if limit <= 0) {
            return Err(AppError::InvalidLimit);
        }

        let records = self.ledger_repo.history(email, limit).await?;
        if records.is_empty() {
            return Err(AppError::HistoryNotFound);
        }
        Ok(records)
    }

    /// Runs `write` with a freshly numbered entry, regenerating the invoice
    /// number when the store reports it as taken.
    async fn write_with_fresh_invoice<T, B, W, Fut>(&self, build: B, write: W) -> AppResult<T>
    where
        B: Fn() -> NewTransaction,
        W: Fn(NewTransaction) -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let mut attempt = 1;
        loop {
            let err = match write(build()).await {
                Ok(written) => return Ok(written),
                Err(err) => err,
            };

            match err.downcast_ref::<StoreError>() {
                Some(StoreError::DuplicateInvoice(invoice)) if attempt < MAX_INVOICE_ATTEMPTS => {
                    log::warn!(invoice = invoice.as_str(), attempt = attempt; "Invoice number taken, retrying");
                    attempt += 1;
                }
                Some(StoreError::DuplicateInvoice(_)) => return Err(AppError::InvoiceCollision),
                _ => return Err(AppError::Internal(err)),
            }
        }
    }
}

fn new_entry(
    email: &str,
    service_code: &str,
    service_name: &str,
    transaction_type: TransactionType,
    total_amount: i64,
) -> NewTransaction {
    let created_on = chrono::Utc::now();
    NewTransaction {
        invoice_number: invoice_number(created_on),
        email: email.to_string(),
        service_code: service_code.to_string(),
        service_name: service_name.to_string(),
        transaction_type,
        total_amount,
        created_on,
    }
}
