use chrono::{DateTime, Utc};
use rand::Rng;

/// `INV{DDMMYYYY}-{100..=999}` for the UTC date of `at`.
pub fn invoice_number(at: DateTime<Utc>) -> String {
    let sequence: u16 = rand::thread_rng().gen_range(100..=999);
    format!("INV{}-{}", at.format("%d%m%Y"), sequence)
}
