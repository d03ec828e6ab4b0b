use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use intake::adapters::ai::{AnthropicCollaborator, AnthropicConfig};
use intake::adapters::http::{interview_routes, InterviewHandlers};
use intake::adapters::session::InMemorySessionStore;
use intake::application::InterviewOrchestrator;
use intake::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    config.validate()?;

    // RUST_LOG wins over the configured default filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    info!(model = %config.ai.model, "starting intake server");

    let collaborator = Arc::new(AnthropicCollaborator::new(
        AnthropicConfig::new(config.ai.anthropic_api_key.clone().unwrap_or_default())
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout())
            .with_max_tokens(config.ai.max_tokens),
    )?);

    let store = Arc::new(InMemorySessionStore::new());
    let orchestrator = Arc::new(InterviewOrchestrator::new(
        store.clone(),
        collaborator.clone(),
        collaborator.clone(),
    ));

    let origins = config
        .server
        .cors_origins_list()
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest(
            "/api/interview",
            interview_routes(InterviewHandlers::new(orchestrator, store)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors);

    let addr = config.server.socket_addr();
    info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
