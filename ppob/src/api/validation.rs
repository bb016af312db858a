use crate::service::error::AppError;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain part.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let (local, domain) = email.split_once('@').ok_or(AppError::InvalidEmail)?;
    let clean = |part: &str| !part.is_empty() && !part.contains('@') && !part.contains(char::is_whitespace);

    let dotted = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());

    if clean(local) && clean(domain) && dotted {
        Ok(())
    } else {
        Err(AppError::InvalidEmail)
    }
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

/// Positive JSON integer; floats, strings and null are refused.
pub fn parse_amount(value: &Value) -> Result<i64, AppError> {
    value
        .as_i64()
        .filter(|amount| *amount > 0)
        .ok_or(AppError::InvalidAmount)
}

/// Absent or empty means "no limit".
pub fn parse_limit(raw: Option<&str>) -> Result<Option<i64>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|limit| *limit > 0)
            .map(Some)
            .ok_or(AppError::InvalidLimit),
    }
}

pub fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, AppError> {
    serde_json::from_str::<T>(body).map_err(|err| AppError::MalformedBody(err.to_string()))
}
