use actix_web::{web, HttpServer};
use anyhow::Context;
use sg_api::{app::create_app, bootstrap, config, middleware::create_cors};
use sg_shared::{LogFormat, LoggingConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = config::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting SessionGuard API server"
    );

    let runtime = bootstrap::build(&config).await?;
    runtime.cleanup.clone().start_background_task();

    let state = web::Data::new(runtime.state);
    let environment = config.environment;
    let bind_address = config.server.bind_address();
    info!(%bind_address, "Server will bind to");

    let mut server = HttpServer::new(move || create_app(state.clone()).wrap(create_cors(environment)));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server terminated with an error")?;

    runtime.database.close().await;
    info!("Server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}
