use crate::domain::model::{NewUser, User};
use crate::domain::repository::{BlobStore, StoreError, UserRepository};
use crate::infra::auth::password::PasswordHasher;
use crate::service::error::{AppError, AppResult};
use std::sync::Arc;

/// Uploaded profile picture as received from the client.
#[derive(Debug, Clone)]
pub struct ProfileImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ProfileImage {
    fn extension(&self) -> Option<&'static str> {
        match self.content_type.as_str() {
            "image/jpeg" => Some("jpg"),
            "image/png" => Some("png"),
            _ => None,
        }
    }
}

pub struct AccountService {
    user_repo: Arc<dyn UserRepository>,
    blob_store: Arc<dyn BlobStore>,
    hasher: PasswordHasher,
}

impl AccountService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        blob_store: Arc<dyn BlobStore>,
        hasher: PasswordHasher,
    ) -> AccountService {
        AccountService {
            user_repo,
            blob_store,
            hasher,
        }
    }

    pub async fn register(
        &self,
        email: String,
        first_name: String,
        last_name: String,
        password: String,
    ) -> AppResult<User> {
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(&password).await?;
        let new_user = NewUser {
            email,
            first_name,
            last_name,
            password_hash,
        };

        self.user_repo
            .create_user(new_user)
            .await
            .map_err(|err| match err.downcast_ref::<StoreError>() {
                Some(StoreError::DuplicateEmail(_)) => AppError::DuplicateEmail,
                _ => AppError::Internal(err),
            })
    }

    pub async fn login(&self, email: String, password: String) -> AppResult<User> {
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AppError::WrongCredentials)?;

        if self.hasher.verify(&password, &user.password_hash).await? {
            Ok(user)
        } else {
            Err(AppError::WrongCredentials)
        }
    }

    pub async fn profile(&self, email: &str) -> AppResult<User> {
        self.user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn update_profile(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> AppResult<User> {
        self.user_repo
            .update_profile(email, first_name, last_name)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn update_profile_image(&self, email: &str, image: ProfileImage) -> AppResult<User> {
        let extension = image.extension().ok_or(AppError::UnsupportedMediaType)?;

        // no orphan files for unknown users
        self.profile(email).await?;

        let reference = self
            .blob_store
            .store(email, extension, image.bytes)
            .await?;
        log::info!(email = email, image = reference.as_str(); "Profile image stored");

        self.user_repo
            .update_profile_image(email, &reference)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}
