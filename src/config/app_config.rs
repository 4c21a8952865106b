use crate::error::{AppError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub session: SessionConfig,
    pub identity: IdentityConfig,
    pub storage: StorageConfig,
    pub client_url: String,
    pub backend_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub jwt_secret: String,
}

/// Managed auth service (GoTrue) endpoint and key.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub base_url: String,
    pub service_key: String,
}

/// S3-compatible bucket holding equipment images.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub public_base_url: String,
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let supabase_url = required("SUPABASE_URL")?
            .trim_end_matches('/')
            .to_string();
        let client_url = env::var("CLIENT_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .trim_end_matches('/')
            .to_string();
        let backend_url = env::var("BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            environment: Environment::parse(
                &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            ),
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?,
                max_body_size: env::var("MAX_BODY_SIZE")
                    .unwrap_or_else(|_| "10485760".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid MAX_BODY_SIZE value".to_string())
                    })?,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid DB_MAX_CONNECTIONS value".to_string())
                    })?,
            },
            cors: CorsConfig {
                allowed_origins: split_origins(
                    &env::var("CORS_ORIGINS").unwrap_or_else(|_| client_url.clone()),
                ),
            },
            session: SessionConfig {
                jwt_secret: required("JWT_SECRET")?,
            },
            identity: IdentityConfig {
                base_url: supabase_url.clone(),
                service_key: required("SUPABASE_SERVICE_ROLE")?,
            },
            storage: StorageConfig {
                endpoint: env::var("STORAGE_ENDPOINT")
                    .unwrap_or_else(|_| format!("{}/storage/v1/s3", supabase_url)),
                public_base_url: format!("{}/storage/v1/object/public", supabase_url),
                bucket: env::var("STORAGE_BUCKET").unwrap_or_else(|_| "equipment".to_string()),
                region: env::var("STORAGE_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                access_key_id: required("STORAGE_ACCESS_KEY_ID")?,
                secret_access_key: required("STORAGE_SECRET_ACCESS_KEY")?,
            },
            client_url,
            backend_url,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| AppError::ConfigError(format!("{} not set", name)))
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
