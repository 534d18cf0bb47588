use incident_classifier::{
    api::{build_router, AppState},
    config::Config,
    context::InferenceContext,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "incident_classifier=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    tracing::info!("Starting incident classifier v{}", env!("CARGO_PKG_VERSION"));

    // Build the process-wide read-only inference context
    let ctx = Arc::new(InferenceContext::from_config(&config));
    tracing::info!(
        model = ctx.model.descriptor(),
        fine_tuned = ctx.model.is_fine_tuned(),
        "✅ Inference context initialized"
    );

    let api_key = config.auth.resolve_api_key();
    if api_key.is_some() {
        tracing::info!("✅ API key authentication enabled");
    } else {
        tracing::info!("⚠️  API key authentication disabled");
    }

    let state = AppState::new(ctx).with_api_key(api_key);
    let app = build_router(state);

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("🚀 HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   Classification: http://{}/classify", http_addr);

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = server => {
            tracing::warn!("HTTP server stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}
