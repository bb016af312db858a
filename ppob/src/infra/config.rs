use clap::Parser;
use std::path::PathBuf;

/// Process configuration. Every flag can also come from the environment
/// (and therefore from `.env`).
#[derive(Debug, Clone, Parser)]
#[command(name = "ppob", about = "PPOB balance and payment service")]
pub struct Config {
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5)]
    pub db_max_connections: u32,

    #[arg(long, env = "HTTP_HOST", default_value = "127.0.0.1")]
    pub http_host: String,

    #[arg(long, env = "HTTP_PORT", default_value_t = 8080)]
    pub http_port: u16,

    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    #[arg(long, env = "BCRYPT_COST", default_value_t = 10)]
    pub bcrypt_cost: u32,

    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads/profile_images")]
    pub upload_dir: PathBuf,

    /// Largest accepted profile image, in bytes.
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = 2 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:5173")]
    pub cors_origin: String,

    /// Let payments drive the balance below zero.
    #[arg(long, env = "ALLOW_NEGATIVE_BALANCE", action = clap::ArgAction::Set, default_value_t = false)]
    pub allow_negative_balance: bool,
}

impl Config {
    pub fn load() -> Config {
        dotenvy::dotenv().ok();
        Config::parse()
    }
}
