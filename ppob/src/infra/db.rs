use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub async fn pg(database_url: &str, max_connections: u32) -> anyhow::Result<Pool<Postgres>> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("connect to postgres")
}

pub async fn migrate(pool: &Pool<Postgres>) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("run migrations")
}

/// Pool for integration tests, configured from `DATABASE_URL` / `.env`.
pub async fn pg_from_env() -> anyhow::Result<Pool<Postgres>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = pg(&database_url, 5).await?;
    migrate(&pool).await?;
    Ok(pool)
}
