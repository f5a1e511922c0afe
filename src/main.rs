mod config;
mod models;
mod dtos;
mod error;
mod db;
mod service;
mod handler;
mod routes;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::db::db::DBClient;
use crate::service::{
    bid_service::BidService,
    design_service::DesignService,
    notification_service::{NotificationDispatcher, NotificationService},
    payment_service::PaymentService,
    progress_service::ProgressService,
    settlement_service::SettlementService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    // Services
    pub bid_service: Arc<BidService>,
    pub settlement_service: Arc<SettlementService>,
    pub progress_service: Arc<ProgressService>,
    pub design_service: Arc<DesignService>,
    pub payment_service: Arc<PaymentService>,
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> (Self, NotificationDispatcher) {
        let db_client_arc = Arc::new(db_client);

        // The dispatcher owns the receiving half of the notification queue
        // and must be spawned by the caller.
        let (notification_service, dispatcher) = NotificationService::new(db_client_arc.clone());
        let notification_service = Arc::new(notification_service);

        let settlement_service = Arc::new(SettlementService::new(db_client_arc.clone()));

        let bid_service = Arc::new(BidService::new(
            db_client_arc.clone(),
            settlement_service.clone(),
            notification_service.clone(),
        ));

        let progress_service = Arc::new(ProgressService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));

        let design_service = Arc::new(DesignService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));

        let payment_service = Arc::new(PaymentService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));

        let state = Self {
            env: config,
            db_client: db_client_arc,
            bid_service,
            settlement_service,
            progress_service,
            design_service,
            payment_service,
            notification_service,
        };

        (state, dispatcher)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            println!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            println!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    // Background task to monitor pool health
    let max_connections = config.max_connections;
    let pool_for_monitoring = pool.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(30));
        loop {
            interval.tick().await;
            let size = pool_for_monitoring.size();
            let idle = pool_for_monitoring.num_idle();
            tracing::debug!(
                "Pool status - active: {}, idle: {}, total: {}",
                size - idle as u32,
                idle,
                size
            );

            if size >= max_connections * 8 / 10 {
                tracing::warn!("Connection pool at 80% capacity");
            }
        }
    });

    let db_client = DBClient::new(pool);

    let allowed_origins = vec![
        "http://localhost:5173".parse::<HeaderValue>().unwrap(),
        "http://localhost:8000".parse::<HeaderValue>().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let (app_state, dispatcher) = AppState::new(db_client, config.clone());
    let app_state = Arc::new(app_state);

    let app = create_router(app_state.clone()).layer(cors);

    // Persist and fan out queued notifications until the process receives CTRL+C
    tokio::spawn(async move {
        dispatcher
            .run_forever(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await;
    });

    println!("🚀 Server is running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
