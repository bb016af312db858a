use crate::service::error::AppError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

/// `{status, message, data}` wrapper shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: i32,
    pub message: String,
    pub data: Option<T>,
}

pub const STATUS_OK: i32 = 0;
pub const STATUS_INVALID_PARAMETER: i32 = 102;
pub const STATUS_WRONG_CREDENTIALS: i32 = 103;
pub const STATUS_UNAUTHORIZED: i32 = 108;
pub const STATUS_INTERNAL: i32 = 500;

pub fn success<T: Serialize>(message: &str, data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope {
        status: STATUS_OK,
        message: message.to_string(),
        data: Some(data),
    })
}

pub fn success_empty(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::<()> {
        status: STATUS_OK,
        message: message.to_string(),
        data: None,
    })
}

struct Described {
    http: StatusCode,
    status: i32,
    message: &'static str,
}

const fn described(http: StatusCode, status: i32, message: &'static str) -> Described {
    Described {
        http,
        status,
        message,
    }
}

fn describe(err: &AppError) -> Described {
    use AppError::*;
    match err {
        InvalidEmail => described(
            StatusCode::BAD_REQUEST,
            STATUS_INVALID_PARAMETER,
            "Parameter email tidak sesuai format",
        ),
        PasswordTooShort(_) => described(
            StatusCode::BAD_REQUEST,
            STATUS_INVALID_PARAMETER,
            "Password harus minimal 8 karakter",
        ),
        MalformedBody(_) => described(
            StatusCode::BAD_REQUEST,
            STATUS_INVALID_PARAMETER,
            "Parameter request tidak sesuai format",
        ),
        DuplicateEmail => described(
            StatusCode::BAD_REQUEST,
            STATUS_INVALID_PARAMETER,
            "Email sudah terdaftar",
        ),
        InvalidAmount => described(
            StatusCode::BAD_REQUEST,
            STATUS_INVALID_PARAMETER,
            "Parameter amount hanya boleh angka dan tidak boleh lebih kecil dari 0",
        ),
        InvalidLimit => described(
            StatusCode::BAD_REQUEST,
            STATUS_INVALID_PARAMETER,
            "Parameter limit harus berupa angka positif",
        ),
        ServiceNotFound(_) => described(
            StatusCode::BAD_REQUEST,
            STATUS_INVALID_PARAMETER,
            "Service atau Layanan tidak ditemukan",
        ),
        InsufficientBalance => described(
            StatusCode::BAD_REQUEST,
            STATUS_INVALID_PARAMETER,
            "Saldo tidak mencukupi",
        ),
        UnsupportedMediaType => described(
            StatusCode::BAD_REQUEST,
            STATUS_INVALID_PARAMETER,
            "Format Image tidak sesuai",
        ),
        ImageTooLarge(_) => described(
            StatusCode::PAYLOAD_TOO_LARGE,
            STATUS_INVALID_PARAMETER,
            "Ukuran Image terlalu besar",
        ),
        LoginPasswordTooShort(_) => described(
            StatusCode::BAD_REQUEST,
            STATUS_WRONG_CREDENTIALS,
            "Password harus minimal 8 karakter",
        ),
        WrongCredentials => described(
            StatusCode::UNAUTHORIZED,
            STATUS_WRONG_CREDENTIALS,
            "Username atau password salah",
        ),
        Unauthorized => described(
            StatusCode::UNAUTHORIZED,
            STATUS_UNAUTHORIZED,
            "Token tidak valid atau kadaluwarsa",
        ),
        UserNotFound => described(
            StatusCode::NOT_FOUND,
            STATUS_UNAUTHORIZED,
            "User tidak ditemukan",
        ),
        BalanceNotFound => described(
            StatusCode::NOT_FOUND,
            STATUS_UNAUTHORIZED,
            "Balance tidak ditemukan",
        ),
        HistoryNotFound => described(
            StatusCode::NOT_FOUND,
            STATUS_UNAUTHORIZED,
            "Transactions Tidak Ditemukan",
        ),
        InvoiceCollision => described(
            StatusCode::SERVICE_UNAVAILABLE,
            STATUS_INTERNAL,
            "Transaksi gagal, silakan coba lagi",
        ),
        Internal(_) => described(
            StatusCode::INTERNAL_SERVER_ERROR,
            STATUS_INTERNAL,
            "Internal server error",
        ),
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        describe(self).http
    }

    fn error_response(&self) -> HttpResponse {
        let described = describe(self);
        match self {
            AppError::Internal(err) => log::error!("request failed: {err:#}"),
            other => log::debug!(error:% = other; "request rejected"),
        }

        HttpResponse::build(described.http).json(Envelope::<()> {
            status: described.status,
            message: described.message.to_string(),
            data: None,
        })
    }
}
