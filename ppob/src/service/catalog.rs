use crate::domain::model::{Banner, Service};
use crate::domain::repository::CatalogRepository;
use crate::service::error::AppResult;
use std::sync::Arc;

pub struct CatalogService {
    catalog_repo: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(catalog_repo: Arc<dyn CatalogRepository>) -> CatalogService {
        CatalogService { catalog_repo }
    }

    pub async fn banners(&self) -> AppResult<Vec<Banner>> {
        Ok(self.catalog_repo.list_banners().await?)
    }

    pub async fn services(&self) -> AppResult<Vec<Service>> {
        Ok(self.catalog_repo.list_services().await?)
    }
}
