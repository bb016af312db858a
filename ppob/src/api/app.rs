use crate::api::routes::{
    balance, banners, history, login, profile, registration, services, top_up, transaction,
    update_profile, update_profile_image, UploadLimit,
};
use crate::domain::repository::{BlobStore, CatalogRepository, LedgerRepository, UserRepository};
use crate::infra::auth::jwt::JwtManager;
use crate::infra::auth::password::PasswordHasher;
use crate::infra::config::Config;
use crate::infra::repository::catalog::PgCatalogRepository;
use crate::infra::repository::ledger::PgLedgerRepository;
use crate::infra::repository::user::PgUserRepository;
use crate::infra::storage::{LocalBlobStore, PROFILE_IMAGE_PREFIX};
use crate::service::account::AccountService;
use crate::service::catalog::CatalogService;
use crate::service::ledger::LedgerService;
use actix_web::web;
use actix_web::web::ServiceConfig;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

/// Everything the HTTP layer needs, built once and cloned into each worker.
#[derive(Clone)]
pub struct AppContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub catalog_repo: Arc<dyn CatalogRepository>,
    pub ledger_repo: Arc<dyn LedgerRepository>,
    pub blob_store: Arc<dyn BlobStore>,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    pub max_upload_bytes: usize,
    pub allow_negative_balance: bool,
}

impl AppContext {
    pub fn postgres(pool: Pool<Postgres>, config: &Config) -> AppContext {
        AppContext {
            user_repo: Arc::new(PgUserRepository::new(pool.clone())),
            catalog_repo: Arc::new(PgCatalogRepository::new(pool.clone())),
            ledger_repo: Arc::new(PgLedgerRepository::new(pool)),
            blob_store: Arc::new(LocalBlobStore::new(
                config.upload_dir.clone(),
                PROFILE_IMAGE_PREFIX,
            )),
            jwt_secret: config.jwt_secret.clone(),
            bcrypt_cost: config.bcrypt_cost,
            max_upload_bytes: config.max_upload_bytes,
            allow_negative_balance: config.allow_negative_balance,
        }
    }
}

pub fn create_app(ctx: AppContext) -> Box<dyn Fn(&mut ServiceConfig)> {
    Box::new(move |cfg: &mut ServiceConfig| {
        let jwt_manager = web::Data::new(JwtManager::new(&ctx.jwt_secret));

        let account_service = web::Data::new(AccountService::new(
            Arc::clone(&ctx.user_repo),
            Arc::clone(&ctx.blob_store),
            PasswordHasher::new(ctx.bcrypt_cost),
        ));
        let catalog_service = web::Data::new(CatalogService::new(Arc::clone(&ctx.catalog_repo)));
        let ledger_service = web::Data::new(LedgerService::new(
            Arc::clone(&ctx.ledger_repo),
            Arc::clone(&ctx.catalog_repo),
            ctx.allow_negative_balance,
        ));

        let upload_limit = web::Data::new(UploadLimit {
            max_bytes: ctx.max_upload_bytes,
        });

        cfg.app_data(jwt_manager)
            .app_data(upload_limit)
            .app_data(account_service)
            .app_data(catalog_service)
            .app_data(ledger_service)
            .service(registration)
            .service(login)
            .service(profile)
            .service(update_profile)
            .service(update_profile_image)
            .service(banners)
            .service(services)
            .service(balance)
            .service(top_up)
            .service(transaction)
            .service(history);
    })
}
