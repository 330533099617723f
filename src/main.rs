mod config;
mod data_uri;
mod error;
mod flows;
mod handlers;
mod middleware;
mod models;
mod routes;
mod schema;
mod services;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Context;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

use config::Config;
use services::gemini_service::GeminiService;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "nutrisnap=debug,tower_http=debug,axum::rejection=trace".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::info!("Environment: {:?}", config.server.environment);
    tracing::info!("CORS enabled: {}", config.security.cors_enabled);

    let gemini_service = Arc::new(
        GeminiService::new(&config.gemini).context("Failed to build Gemini client")?
    );
    tracing::info!("Initialized Gemini service with model {}", config.gemini.model);

    let food_lookup = state::setup_food_lookup(&config)?;

    let state = AppState::new(config.clone(), gemini_service, food_lookup);

    let app = routes
        ::create_routes(state)
        .layer(middleware::cors::setup_cors(&config))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("NutriSnap API server starting on {}", addr);

    let listener = tokio::net::TcpListener
        ::bind(&addr).await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
