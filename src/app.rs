use aws_sdk_s3::Client as S3Client;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::{AppConfig, load_s3_client},
    database,
    error::{AppError, Result},
    routes,
    services::{identity_service::IdentityClient, storage_service::ImageStorage},
    utils::{cookies::CookiePolicy, jwt::SessionCodec},
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub sessions: SessionCodec,
    pub cookies: CookiePolicy,
    pub identity: IdentityClient,
    pub storage: ImageStorage,
    pub client_url: String,
    pub backend_url: String,
}

impl AppState {
    pub fn new(config: &AppConfig, db: PgPool, s3_client: S3Client) -> Self {
        Self {
            db,
            sessions: SessionCodec::new(&config.session.jwt_secret),
            cookies: CookiePolicy::new(config.environment),
            identity: IdentityClient::new(&config.identity),
            storage: ImageStorage::new(s3_client, &config.storage),
            client_url: config.client_url.clone(),
            backend_url: config.backend_url.clone(),
        }
    }
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let s3_client = load_s3_client(&config.storage);
    let state = AppState::new(config, pool, s3_client);

    build_router(state, config)
}

pub fn build_router(state: AppState, config: &AppConfig) -> Result<Router> {
    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_origin(allowed_origins)
        .allow_credentials(true);

    let app = routes::create_router(&state)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}
