use actix_cors::Cors;
use actix_middleware::{Logging, MetricsMiddleware};
use actix_web::{App, HttpServer};
use anyhow::Context;
use api_service::config::{Config, StoreBackend};
use api_service::db::Stores;
use api_service::routes;
use db_pool::{create_pool, DbConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn open_stores(config: &Config) -> anyhow::Result<Stores> {
    match config.store {
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on restart");
            Ok(Stores::in_memory())
        }
        StoreBackend::Postgres => {
            let db_cfg = DbConfig::from_env("api-service").map_err(anyhow::Error::msg)?;
            db_cfg.log_config();

            let pool = create_pool(db_cfg)
                .await
                .context("failed to create database pool")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("failed to run database migrations")?;
            tracing::info!("database migrations applied");

            Ok(Stores::postgres(pool))
        }
    }
}

fn build_cors(config: &Config) -> Cors {
    let mut cors = Cors::default();
    if config.allows_any_origin() {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.cors.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method().allow_any_header().max_age(3600)
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("WARNING: failed to load .env: {}", e);
        }
    }

    init_tracing();

    let config = Config::from_env().map_err(|e| {
        tracing::error!("Configuration loading failed: {}", e);
        anyhow::anyhow!("failed to load configuration: {}", e)
    })?;

    tracing::info!("Starting api-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(environment = %config.app.env, store = ?config.store, "configuration loaded");

    let stores = open_stores(&config).await?;

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    let jwt_secret = config.auth.jwt_secret.clone();
    let server_config = config.clone();

    let server = HttpServer::new(move || {
        let stores = stores.clone();
        let secret = jwt_secret.clone();

        App::new()
            .wrap(MetricsMiddleware)
            .wrap(Logging::default())
            .wrap(build_cors(&server_config))
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(move |cfg| routes::configure(cfg, stores, &secret))
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .shutdown_timeout(30)
    .disable_signals()
    .run();

    tracing::info!("HTTP server listening on {}", bind_address);

    let handle = server.handle();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.context("HTTP server failed")?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, stopping HTTP server");
            handle.stop(true).await;
            server.await.context("HTTP server failed during shutdown")?;
        }
    }

    tracing::info!("api-service shut down");
    Ok(())
}
