use crate::api::error::{success, success_empty};
use crate::api::extract::Identity;
use crate::api::validation::{
    parse_amount, parse_body, parse_limit, validate_email, validate_password,
    MIN_PASSWORD_LENGTH,
};
use crate::domain::model::{Transaction, TransactionType, User};
use crate::infra::auth::jwt::JwtManager;
use crate::service::account::{AccountService, ProfileImage};
use crate::service::catalog::CatalogService;
use crate::service::error::{AppError, AppResult};
use crate::service::ledger::LedgerService;
use actix_multipart::Multipart;
use actix_web::{get, post, put, web, HttpResponse};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PROFILE_IMAGE_FIELD: &str = "profile_image";

/// Cap on multipart bytes read for one profile image request.
pub struct UploadLimit {
    pub max_bytes: usize,
}

#[derive(Deserialize, Serialize, Debug)]
struct RegisterBody {
    email: String,
    first_name: String,
    last_name: String,
    password: String,
}

#[derive(Deserialize, Serialize, Debug)]
struct LoginBody {
    email: String,
    password: String,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Deserialize, Serialize, Debug)]
struct UpdateProfileBody {
    first_name: String,
    last_name: String,
}

#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct ProfileResponse {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image: Option<String>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        ProfileResponse {
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_image: user.profile_image,
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
struct TopUpBody {
    #[serde(default)]
    top_up_amount: Value,
}

#[derive(Deserialize, Serialize, Debug)]
struct TransactionBody {
    service_code: String,
    #[serde(default)]
    amount: Value,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct BalanceResponse {
    pub balance: i64,
}

#[derive(Deserialize, Debug)]
struct HistoryQuery {
    limit: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct HistoryRecord {
    pub invoice_number: String,
    pub transaction_type: TransactionType,
    pub description: String,
    pub total_amount: i64,
    pub created_on: DateTime<Utc>,
}

impl From<Transaction> for HistoryRecord {
    fn from(tx: Transaction) -> Self {
        HistoryRecord {
            invoice_number: tx.invoice_number,
            transaction_type: tx.transaction_type,
            description: tx.service_name,
            total_amount: tx.total_amount,
            created_on: tx.created_on,
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct HistoryResponse {
    pub offset: i64,
    pub limit: i64,
    pub records: Vec<HistoryRecord>,
}

#[post("/registration")]
async fn registration(req_body: String, app: web::Data<AccountService>) -> AppResult<HttpResponse> {
    let body: RegisterBody = parse_body(&req_body)?;
    validate_email(&body.email)?;
    validate_password(&body.password)?;

    let user = app
        .register(body.email, body.first_name, body.last_name, body.password)
        .await?;
    log::info!(email = user.email.as_str(); "User registered");

    Ok(success_empty("Registrasi berhasil silahkan login"))
}

#[post("/login")]
async fn login(
    req_body: String,
    jwt_manager: web::Data<JwtManager>,
    app: web::Data<AccountService>,
) -> AppResult<HttpResponse> {
    let body: LoginBody = parse_body(&req_body)?;
    validate_email(&body.email)?;
    validate_password(&body.password)
        .map_err(|_| AppError::LoginPasswordTooShort(MIN_PASSWORD_LENGTH))?;

    let user = match app.login(body.email.clone(), body.password).await {
        Ok(user) => user,
        Err(err) => {
            log::info!(email = body.email.as_str(); "Failed login attempt");
            return Err(err);
        }
    };

    let token = jwt_manager
        .gen_user_token(&user)
        .map_err(|err| AppError::Internal(err.into()))?;

    log::info!(email = user.email.as_str(); "User authenticated");

    Ok(success("Login Sukses", LoginResponse { token }))
}

#[get("/profile")]
async fn profile(identity: Identity, app: web::Data<AccountService>) -> AppResult<HttpResponse> {
    let user = app.profile(identity.email()).await?;
    Ok(success("Sukses", ProfileResponse::from(user)))
}

#[put("/profile/update")]
async fn update_profile(
    identity: Identity,
    req_body: String,
    app: web::Data<AccountService>,
) -> AppResult<HttpResponse> {
    let body: UpdateProfileBody = parse_body(&req_body)?;
    let user = app
        .update_profile(identity.email(), &body.first_name, &body.last_name)
        .await?;
    Ok(success("Update Profile berhasil", ProfileResponse::from(user)))
}

#[put("/profile/image")]
async fn update_profile_image(
    identity: Identity,
    mut payload: Multipart,
    limit: web::Data<UploadLimit>,
    app: web::Data<AccountService>,
) -> AppResult<HttpResponse> {
    let image = read_profile_image(&mut payload, limit.max_bytes)
        .await?
        .ok_or(AppError::UnsupportedMediaType)?;

    let user = app.update_profile_image(identity.email(), image).await?;
    Ok(success("Update Profile Image berhasil", ProfileResponse::from(user)))
}

/// First `profile_image` part of the form; other parts are drained.
/// Fails with `ImageTooLarge` once the form exceeds `max_bytes`.
async fn read_profile_image(
    payload: &mut Multipart,
    max_bytes: usize,
) -> AppResult<Option<ProfileImage>> {
    let mut read = 0usize;
    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|err| {
            log::debug!(reason:% = err; "Unreadable multipart payload");
            AppError::UnsupportedMediaType
        })?;

        let wanted = field.name() == Some(PROFILE_IMAGE_FIELD);
        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|_| AppError::UnsupportedMediaType)?;
            read += chunk.len();
            if read > max_bytes {
                log::info!(limit = max_bytes; "Profile image upload too large");
                return Err(AppError::ImageTooLarge(max_bytes));
            }
            if wanted {
                bytes.extend_from_slice(&chunk);
            }
        }

        if wanted {
            return Ok(Some(ProfileImage {
                content_type,
                bytes,
            }));
        }
    }
    Ok(None)
}

#[get("/information/banner")]
async fn banners(_: Identity, app: web::Data<CatalogService>) -> AppResult<HttpResponse> {
    Ok(success("Sukses", app.banners().await?))
}

#[get("/information/services")]
async fn services(_: Identity, app: web::Data<CatalogService>) -> AppResult<HttpResponse> {
    Ok(success("Sukses", app.services().await?))
}

#[get("/balance")]
async fn balance(identity: Identity, app: web::Data<LedgerService>) -> AppResult<HttpResponse> {
    let balance = app.balance(identity.email()).await?;
    Ok(success("Get Balance Berhasil", BalanceResponse { balance }))
}

#[post("/topup")]
async fn top_up(
    identity: Identity,
    req_body: String,
    app: web::Data<LedgerService>,
) -> AppResult<HttpResponse> {
    let body: TopUpBody = parse_body(&req_body).map_err(|_| AppError::InvalidAmount)?;
    let amount = parse_amount(&body.top_up_amount)?;

    let entry = app.top_up(identity.email(), amount).await?;
    Ok(success(
        "Top Up Balance Berhasil",
        BalanceResponse {
            balance: entry.balance,
        },
    ))
}

#[post("/transaction")]
async fn transaction(
    identity: Identity,
    req_body: String,
    app: web::Data<LedgerService>,
) -> AppResult<HttpResponse> {
    let body: TransactionBody = parse_body(&req_body)?;
    let amount = parse_amount(&body.amount)?;

    let entry = app
        .charge(identity.email(), &body.service_code, amount)
        .await?;
    Ok(success("Transaksi berhasil", entry.transaction))
}

#[get("/transaction/history")]
async fn history(
    identity: Identity,
    query: web::Query<HistoryQuery>,
    app: web::Data<LedgerService>,
) -> AppResult<HttpResponse> {
    let limit = parse_limit(query.limit.as_deref())?;

    let records: Vec<HistoryRecord> = app
        .history(identity.email(), limit)
        .await?
        .into_iter()
        .map(HistoryRecord::from)
        .collect();

    Ok(success(
        "Get Transactions Berhasil",
        HistoryResponse {
            offset: 0,
            limit: limit.unwrap_or(records.len() as i64),
            records,
        },
    ))
}
