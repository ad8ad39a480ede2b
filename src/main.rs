mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::{str::FromStr, sync::Arc};

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use db::{memorydb::MemoryStore, DBClient, Store};
use dotenv::dotenv;
use routes::create_router;
use service::{
    background_jobs::start_enrollment_expiry_job, catalog_service::CatalogService,
    enrollment_service::EnrollmentService, error::ServiceError, identity::IdentityVerifier,
    plan_service::PlanService, user_service::UserService,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<dyn Store>,
    pub identity: IdentityVerifier,
}

impl AppState {
    pub fn new(env: Config, db_client: Arc<dyn Store>) -> Result<Self, ServiceError> {
        let identity = IdentityVerifier::from_config(&env)?;

        Ok(Self {
            env,
            db_client,
            identity,
        })
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(
            self.db_client.clone(),
            self.env.bootstrap_admin_emails.clone(),
        )
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(self.db_client.clone())
    }

    pub fn plan_service(&self) -> PlanService {
        PlanService::new(self.db_client.clone())
    }

    pub fn enrollment_service(&self) -> EnrollmentService {
        EnrollmentService::new(self.db_client.clone(), self.env.default_currency.clone())
    }
}

async fn connect_store(config: &Config) -> Arc<dyn Store> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL is not set, using the in-memory store. Data will not survive a restart");
        return Arc::new(MemoryStore::new());
    };

    let pool = match PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            tracing::error!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = DBClient::new(pool);
    if let Err(err) = db_client.migrate().await {
        tracing::error!("🔥 Failed to run database migrations: {}", err);
        std::process::exit(1);
    }

    Arc::new(db_client)
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = match Config::init() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("🔥 Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from_str(&config.log_level).unwrap_or(LevelFilter::DEBUG))
        .init();

    let db_client = connect_store(&config).await;

    let app_state = match AppState::new(config.clone(), db_client) {
        Ok(app_state) => Arc::new(app_state),
        Err(err) => {
            tracing::error!("🔥 Failed to set up identity verification: {}", err);
            std::process::exit(1);
        }
    };

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ]);

    if config.expiry_sweep_interval_secs > 0 {
        tokio::spawn(start_enrollment_expiry_job(
            app_state.clone(),
            config.expiry_sweep_interval_secs,
        ));
    } else {
        tracing::info!("Enrollment expiry job disabled");
    }

    let app = create_router(app_state).layer(cors);

    tracing::info!("🚀 Server is running on http://localhost:{}", config.port);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("🔥 Failed to bind port {}: {}", config.port, err);
            std::process::exit(1);
        }
    };

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("🔥 Server error: {}", err);
    }
}
