use crate::domain::model::*;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Store-level conflicts that callers are expected to react to.
/// Carried inside `anyhow::Error` and recovered with `downcast_ref`.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("invoice number {0} already exists")]
    DuplicateInvoice(String),
    #[error("email {0} already registered")]
    DuplicateEmail(String),
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> anyhow::Result<User>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn update_profile(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> anyhow::Result<Option<User>>;
    async fn update_profile_image(&self, email: &str, image: &str) -> anyhow::Result<Option<User>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_banners(&self) -> anyhow::Result<Vec<Banner>>;
    async fn list_services(&self) -> anyhow::Result<Vec<Service>>;
    async fn find_service(&self, code: &str) -> anyhow::Result<Option<Service>>;
}

/// Sole writer of balances and transactions.
///
/// `top_up` and `charge` write the transaction row and the balance row in a
/// single database transaction and serialize on the user's balance row.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn balance(&self, email: &str) -> anyhow::Result<Option<i64>>;
    async fn top_up(&self, entry: NewTransaction) -> anyhow::Result<LedgerEntry>;
    /// With `allow_negative` unset the charge is refused when the locked
    /// balance is lower than the amount.
    async fn charge(
        &self,
        entry: NewTransaction,
        allow_negative: bool,
    ) -> anyhow::Result<ChargeOutcome>;
    async fn history(&self, email: &str, limit: Option<i64>) -> anyhow::Result<Vec<Transaction>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persists `bytes` and returns the public reference of the stored file.
    async fn store(&self, owner: &str, extension: &str, bytes: Vec<u8>) -> anyhow::Result<String>;
}
