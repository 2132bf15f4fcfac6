//! Configuration module
//!
//! Configuration is read from the environment (optionally seeded from a `.env` file)
//! into [`FacemarkConfig`] and wrapped in [`Config`], which exposes getters.

use std::env;
use std::str::FromStr;

use crate::constants::MAX_UPLOADS_PER_DAY;
use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const SIGNED_URL_TTL_SECS: u64 = 3600;
const STAGE_TIMEOUT_SECS: u64 = 10;
// Base64 inflates a 5 MiB image to roughly 7 MiB; leave room for the JSON envelope.
const MAX_REQUEST_BODY_BYTES: usize = 8 * 1024 * 1024;
const SMTP_PORT: u16 = 587;

/// Full service configuration
#[derive(Clone, Debug)]
pub struct FacemarkConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_request_body_bytes: usize,
    // Database
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Authentication
    pub jwt_secret: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub signed_url_ttl_secs: u64,
    // Admission policy
    pub max_stored_photos: i64,
    pub require_image_dimensions: bool,
    // Submission pipeline
    pub stage_timeout_secs: u64,
    // Email notifications
    pub email_notifications_enabled: bool,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: bool,
}

impl Default for FacemarkConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            max_request_body_bytes: MAX_REQUEST_BODY_BYTES,
            database_url: "postgresql://localhost/facemark".to_string(),
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            jwt_secret: String::new(),
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: None,
            local_storage_base_url: None,
            signed_url_ttl_secs: SIGNED_URL_TTL_SECS,
            max_stored_photos: MAX_UPLOADS_PER_DAY,
            require_image_dimensions: false,
            stage_timeout_secs: STAGE_TIMEOUT_SECS,
            email_notifications_enabled: false,
            smtp_host: None,
            smtp_port: SMTP_PORT,
            smtp_user: None,
            smtp_password: None,
            smtp_from: None,
            smtp_tls: true,
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

impl FacemarkConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .parse::<StorageBackend>()?;

        let config = Self {
            server_port,
            environment,
            cors_origins,
            max_request_body_bytes: env_parse("MAX_REQUEST_BODY_BYTES", MAX_REQUEST_BODY_BYTES),
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: env_parse("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            jwt_secret,
            storage_backend,
            s3_bucket: env_opt("S3_BUCKET"),
            s3_region: env_opt("S3_REGION").or_else(|| env_opt("AWS_REGION")),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            signed_url_ttl_secs: env_parse("SIGNED_URL_TTL_SECS", SIGNED_URL_TTL_SECS),
            max_stored_photos: env_parse("MAX_STORED_PHOTOS", MAX_UPLOADS_PER_DAY),
            require_image_dimensions: env_bool("REQUIRE_IMAGE_DIMENSIONS", false),
            stage_timeout_secs: env_parse("STAGE_TIMEOUT_SECS", STAGE_TIMEOUT_SECS),
            email_notifications_enabled: env_bool("EMAIL_NOTIFICATIONS_ENABLED", false),
            smtp_host: env_opt("SMTP_HOST"),
            smtp_port: env_parse("SMTP_PORT", SMTP_PORT),
            smtp_user: env_opt("SMTP_USER"),
            smtp_password: env_opt("SMTP_PASSWORD"),
            smtp_from: env_opt("SMTP_FROM"),
            smtp_tls: env_bool("SMTP_TLS", true),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 if self.s3_bucket.is_none() || self.s3_region.is_none() => {
                return Err(anyhow::anyhow!(
                    "STORAGE_BACKEND=s3 requires S3_BUCKET and S3_REGION (or AWS_REGION)"
                ));
            }
            StorageBackend::Local
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() =>
            {
                return Err(anyhow::anyhow!(
                    "STORAGE_BACKEND=local requires LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL"
                ));
            }
            _ => {}
        }

        if self.max_stored_photos <= 0 {
            return Err(anyhow::anyhow!("MAX_STORED_PHOTOS must be positive"));
        }

        if self.stage_timeout_secs == 0 {
            return Err(anyhow::anyhow!("STAGE_TIMEOUT_SECS must be at least 1"));
        }

        if self.email_notifications_enabled && (self.smtp_host.is_none() || self.smtp_from.is_none())
        {
            return Err(anyhow::anyhow!(
                "EMAIL_NOTIFICATIONS_ENABLED=true requires SMTP_HOST and SMTP_FROM to be set"
            ));
        }

        Ok(())
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<FacemarkConfig>);

impl Config {
    pub fn new(inner: FacemarkConfig) -> Self {
        Config(Box::new(inner))
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        Ok(Config::new(FacemarkConfig::from_env()?))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.0.validate()
    }

    pub fn inner(&self) -> &FacemarkConfig {
        &self.0
    }

    pub fn is_production(&self) -> bool {
        self.0.is_production()
    }

    pub fn environment(&self) -> &str {
        &self.0.environment
    }

    pub fn server_port(&self) -> u16 {
        self.0.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.0.cors_origins
    }

    pub fn max_request_body_bytes(&self) -> usize {
        self.0.max_request_body_bytes
    }

    pub fn database_url(&self) -> &str {
        &self.0.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.0.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.0.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.0.jwt_secret
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.0.storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.0.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.0.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.0.s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.0.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.0.local_storage_base_url.as_deref()
    }

    pub fn signed_url_ttl_secs(&self) -> u64 {
        self.0.signed_url_ttl_secs
    }

    pub fn max_stored_photos(&self) -> i64 {
        self.0.max_stored_photos
    }

    pub fn require_image_dimensions(&self) -> bool {
        self.0.require_image_dimensions
    }

    pub fn stage_timeout_secs(&self) -> u64 {
        self.0.stage_timeout_secs
    }

    pub fn email_notifications_enabled(&self) -> bool {
        self.0.email_notifications_enabled
    }

    pub fn smtp_host(&self) -> Option<&str> {
        self.0.smtp_host.as_deref()
    }

    pub fn smtp_port(&self) -> u16 {
        self.0.smtp_port
    }

    pub fn smtp_user(&self) -> Option<&str> {
        self.0.smtp_user.as_deref()
    }

    pub fn smtp_password(&self) -> Option<&str> {
        self.0.smtp_password.as_deref()
    }

    pub fn smtp_from(&self) -> Option<&str> {
        self.0.smtp_from.as_deref()
    }

    pub fn smtp_tls(&self) -> bool {
        self.0.smtp_tls
    }
}
