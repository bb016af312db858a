use crate::domain::model::{Banner, Service};
use crate::domain::repository;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};

#[derive(Clone)]
pub struct PgCatalogRepository {
    pub pool: Pool<Postgres>,
}

impl PgCatalogRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PgCatalogRepository { pool }
    }
}

#[async_trait]
impl repository::CatalogRepository for PgCatalogRepository {
    async fn list_banners(&self) -> anyhow::Result<Vec<Banner>> {
        let rows = sqlx::query("SELECT banner_name, banner_image, description FROM banners ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Banner::from).collect())
    }

    async fn list_services(&self) -> anyhow::Result<Vec<Service>> {
        let rows = sqlx::query(
            "SELECT service_code, service_name, service_icon, service_tarif FROM services ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn find_service(&self, code: &str) -> anyhow::Result<Option<Service>> {
        let row = sqlx::query(
            "SELECT service_code, service_name, service_icon, service_tarif FROM services WHERE service_code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Service::from))
    }
}
