use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid email format")]
    InvalidEmail,
    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("login password shorter than {0} characters")]
    LoginPasswordTooShort(usize),
    #[error("wrong email or password")]
    WrongCredentials,
    #[error("invalid or expired token")]
    Unauthorized,
    #[error("amount must be a positive integer")]
    InvalidAmount,
    #[error("limit must be a positive integer")]
    InvalidLimit,
    #[error("service {0} not found")]
    ServiceNotFound(String),
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("user not found")]
    UserNotFound,
    #[error("balance not found")]
    BalanceNotFound,
    #[error("transactions not found")]
    HistoryNotFound,
    #[error("unsupported image format")]
    UnsupportedMediaType,
    #[error("image exceeds {0} bytes")]
    ImageTooLarge(usize),
    #[error("invoice number collision")]
    InvoiceCollision,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
