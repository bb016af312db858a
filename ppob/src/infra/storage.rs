use crate::domain::repository::BlobStore;
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;

/// Writes uploads under `dir` and hands out `{public_prefix}/{file}` references.
pub struct LocalBlobStore {
    dir: PathBuf,
    public_prefix: String,
}

pub const PROFILE_IMAGE_PREFIX: &str = "/uploads/profile_images";

impl LocalBlobStore {
    pub fn new(dir: PathBuf, public_prefix: &str) -> LocalBlobStore {
        LocalBlobStore {
            dir,
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, owner: &str, extension: &str, bytes: Vec<u8>) -> anyhow::Result<String> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create upload dir {}", self.dir.display()))?;

        let file_name = format!(
            "{}-{}.{}",
            file_stem(owner),
            chrono::Utc::now().timestamp_millis(),
            file_stem(extension)
        );
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;

        Ok(format!("{}/{}", self.public_prefix, file_name))
    }
}

/// Keeps `[A-Za-z0-9@._-]` and drops everything else, so the result is
/// always a single path component.
fn file_stem(raw: &str) -> String {
    let mut output = String::with_capacity(raw.len().min(128));
    let mut dot_run = 0;

    for c in raw.chars() {
        if !(c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '-')) {
            continue;
        }

        if c == '.' {
            if dot_run >= 1 {
                continue;
            }
            dot_run += 1;
        } else {
            dot_run = 0;
        }

        output.push(c);
        if output.len() >= 128 {
            break;
        }
    }

    let trimmed = output.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}
