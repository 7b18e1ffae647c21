use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wondercare_match::config::Settings;
use wondercare_match::core::Matcher;
use wondercare_match::routes::{self, handle_json_payload_error, matches::AppState};
use wondercare_match::services::{spawn_refresh, ProviderSnapshot, ProviderSource, SnapshotStore};

fn io_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().map_err(|e| io_error(format!("Configuration error: {}", e)))?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting WonderCare matching service...");

    // Initialize matcher with configured weights
    let weights = settings.scoring.weights.into();
    let matcher = Matcher::new(weights, settings.scoring.signal_settings()).map_err(|e| {
        error!("Invalid scoring configuration: {}", e);
        io_error(e.to_string())
    })?;

    info!("Matcher initialized with weights: {:?}", matcher.weights());

    // Initial provider load; the service does not start without one
    let source = ProviderSource::from_settings(&settings).await.map_err(|e| {
        error!("Failed to initialize {:?} source: {}", settings.source.kind, e);
        io_error(e.to_string())
    })?;

    let providers = source.load().await.map_err(|e| {
        error!("Failed to load providers: {}", e);
        io_error(e.to_string())
    })?;

    info!("Loaded {} providers from {} source", providers.len(), source.kind());

    let snapshots = Arc::new(SnapshotStore::new(ProviderSnapshot::new(providers, source.kind())));

    if settings.source.refresh_secs > 0 {
        let every = Duration::from_secs(settings.source.refresh_secs);
        spawn_refresh(Arc::clone(&snapshots), Arc::new(source), every);
        info!("Provider refresh scheduled every {}s", settings.source.refresh_secs);
    }

    // Build application state
    let app_state = AppState {
        snapshots,
        matcher: Arc::new(matcher),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
