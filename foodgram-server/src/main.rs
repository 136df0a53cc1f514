use anyhow::{Context, Result};
use clap::Parser;
use foodgram_server::{
    cache::new_cache,
    config::Config,
    database::Database,
    routes::{router, AppState},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// Path to the YAML configuration file
    #[clap(long, default_value = "foodgram.yml")]
    config: String,

    /// Override the address and optionally port to bind to
    #[clap(long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    // Parse command line arguments
    let args = Args::parse();
    let config = Config::load(&args.config)
        .with_context(|| format!("Loading configuration from {}", args.config))?;

    // initialize tracing
    let _guard = match &config.logging.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "access.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .json()
                .with_writer(non_blocking)
                .with_env_filter(EnvFilter::from_default_env())
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
            None
        }
    };

    // connect to the database
    let db = Database::connect(&config.database.path)
        .await
        .context("Connecting to database")?;

    let app = router(AppState {
        db,
        cache: new_cache(),
        page_size: config.api.page_size,
    })
    .layer(
        tower_http::compression::CompressionLayer::new()
            .quality(tower_http::CompressionLevel::Fastest),
    );

    let address = args.address.unwrap_or(config.server.address);
    // In development, use HTTP. In production, use HTTPS.
    if let Some(tls) = &config.server.tls {
        rustls::crypto::ring::default_provider()
            .install_default()
            .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;
        let tls_config =
            axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                .await
                .context("Loading TLS certificate")?;

        let addr = address.parse()?;
        tracing::info!("Listening on {} with TLS", addr);
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .context("Starting TLS server")?;
    } else {
        let listener = tokio::net::TcpListener::bind(&address).await?;
        tracing::info!("Listening on {}", address);
        axum::serve(listener, app).await?;
    }
    Ok(())
}
