use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile_image: Option<String>,
}

impl From<PgRow> for User {
    fn from(row: PgRow) -> Self {
        User {
            id: row.get("id"),
            email: row.get("email"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            password_hash: row.get("password_hash"),
            profile_image: row.get("profile_image"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Banner {
    pub banner_name: String,
    pub banner_image: String,
    pub description: String,
}

impl From<PgRow> for Banner {
    fn from(row: PgRow) -> Self {
        Banner {
            banner_name: row.get("banner_name"),
            banner_image: row.get("banner_image"),
            description: row.get("description"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Service {
    pub service_code: String,
    pub service_name: String,
    pub service_icon: String,
    pub service_tarif: i64,
}

impl From<PgRow> for Service {
    fn from(row: PgRow) -> Self {
        Service {
            service_code: row.get("service_code"),
            service_name: row.get("service_name"),
            service_icon: row.get("service_icon"),
            service_tarif: row.get("service_tarif"),
        }
    }
}

/// Credit or debit. Stored as text in `transactions.transaction_type`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Topup,
    Payment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Topup => "TOPUP",
            TransactionType::Payment => "PAYMENT",
        }
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TOPUP" => Ok(TransactionType::Topup),
            "PAYMENT" => Ok(TransactionType::Payment),
            other => Err(anyhow::anyhow!("unknown transaction type {other}")),
        }
    }
}

pub const TOPUP_SERVICE_CODE: &str = "TOPUP";
pub const TOPUP_SERVICE_NAME: &str = "Top Up Balance";

/// A ledger entry that has not been written yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub invoice_number: String,
    pub email: String,
    pub service_code: String,
    pub service_name: String,
    pub transaction_type: TransactionType,
    pub total_amount: i64,
    pub created_on: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Transaction {
    pub invoice_number: String,
    #[serde(skip_serializing)]
    pub email: String,
    pub service_code: String,
    pub service_name: String,
    pub transaction_type: TransactionType,
    pub total_amount: i64,
    pub created_on: DateTime<Utc>,
}

impl From<NewTransaction> for Transaction {
    fn from(entry: NewTransaction) -> Self {
        Transaction {
            invoice_number: entry.invoice_number,
            email: entry.email,
            service_code: entry.service_code,
            service_name: entry.service_name,
            transaction_type: entry.transaction_type,
            total_amount: entry.total_amount,
            created_on: entry.created_on,
        }
    }
}

impl TryFrom<PgRow> for Transaction {
    type Error = anyhow::Error;

    fn try_from(row: PgRow) -> Result<Self, Self::Error> {
        let transaction_type: String = row.try_get("transaction_type")?;
        Ok(Transaction {
            invoice_number: row.try_get("invoice_number")?,
            email: row.try_get("email")?,
            service_code: row.try_get("service_code")?,
            service_name: row.try_get("service_name")?,
            transaction_type: transaction_type.parse()?,
            total_amount: row.try_get("total_amount")?,
            created_on: row.try_get("created_on")?,
        })
    }
}

/// Result of a committed balance mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub transaction: Transaction,
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChargeOutcome {
    Charged(LedgerEntry),
    NoBalance,
    Insufficient { balance: i64 },
}
