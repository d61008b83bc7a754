use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use fintrack_api::data::db;
use fintrack_api::infrastructure::config::{CorsSettings, Settings};
use fintrack_api::infrastructure::logging::init_logging;
use fintrack_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use fintrack_api::presentation::routes;
use fintrack_api::presentation::state::AppState;
use tracing::{error, info, instrument};

fn cors(settings: &CorsSettings) -> Cors {
    settings
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .supports_credentials()
        .max_age(3600)
}

#[tokio::main]
#[instrument]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading FINTRACK__* variables
    dotenv::dotenv().ok();

    init_logging();
    info!("Logging initialized");

    let settings = Settings::new().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;
    info!(
        host = %settings.server.host,
        port = settings.server.port,
        database = %settings.database.url,
        "Configuration loaded"
    );

    let pool = db::connect(&settings.database).await?;
    db::migrate(&pool).await?;

    let state = web::Data::new(AppState::new(pool, settings.jwt.clone()));
    info!("Application state initialized");

    let jwt_secret = settings.jwt.secret.clone();
    let cors_settings = settings.cors.clone();
    let server = HttpServer::new(move || {
        tracing::trace!("Creating new application instance");
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
            .wrap(cors(&cors_settings))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .configure(routes::configure)
    });

    let bind_addr = (settings.server.host.clone(), settings.server.port);
    info!(address = %format!("{}:{}", bind_addr.0, bind_addr.1), "Starting HTTP server");
    server.bind(bind_addr)?.run().await?;

    info!("Server stopped");
    Ok(())
}
