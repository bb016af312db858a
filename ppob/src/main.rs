use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, App, HttpServer};
use ppob::api::app::{create_app, AppContext};
use ppob::infra::config::Config;
use ppob::infra::db;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let pool = db::pg(&config.database_url, config.db_max_connections).await?;
    db::migrate(&pool).await?;

    let ctx = AppContext::postgres(pool, &config);
    let cors_origin = config.cors_origin.clone();

    log::info!(host = config.http_host.as_str(), port = config.http_port; "Start server");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT"])
            .allowed_headers(vec![
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::AUTHORIZATION,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .configure(create_app(ctx.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
    })
    .bind((config.http_host.as_str(), config.http_port))?
    .run()
    .await?;

    Ok(())
}
