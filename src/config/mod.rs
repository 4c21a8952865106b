mod app_config;
mod s3_config;

pub use app_config::{
    AppConfig, CorsConfig, DatabaseConfig, Environment, IdentityConfig, ServerConfig,
    SessionConfig, StorageConfig,
};
pub use s3_config::*;
