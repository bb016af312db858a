pub mod account;
pub mod catalog;
pub mod error;
pub mod invoice;
pub mod ledger;
