use crate::infra::auth::jwt::{Claims, JwtManager};
use crate::service::error::AppError;
use actix_web::dev::Payload;
use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};

/// Caller resolved from the `Authorization: Bearer` token.
#[derive(Debug)]
pub struct Identity(pub Claims);

impl Identity {
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<JwtManager>>() {
            Some(jwt_manager) => extract_token(req.headers(), jwt_manager),
            None => Err(AppError::Internal(anyhow::anyhow!(
                "jwt manager is not registered"
            ))),
        };
        ready(result)
    }
}

fn extract_token(headers: &HeaderMap, jwt_manager: &JwtManager) -> Result<Identity, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)?;

    jwt_manager.verify(token).map(Identity).map_err(|err| {
        log::debug!(reason:% = err; "Token rejected");
        AppError::Unauthorized
    })
}
