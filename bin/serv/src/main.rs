use anyhow::Context;
use axum::{Router, middleware, routing::get};
use cpt_api::{
    config::ApiConfig,
    metrics::{init_metrics, metrics_handler, track_metrics},
    middleware::{
        cors::create_cors_layer, request_id::request_id_middleware,
        security_headers::apply_security_headers,
    },
    state::ApiState,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env().context("invalid configuration")?;

    cpt_api::tracing::init_tracing(config.env);

    let metrics_handle = init_metrics()?;

    let pool = cpt_db::create_pool(&config.database_url, config.db_max_connections).await?;
    cpt_db::ensure_db_and_migrate(&config.database_url, &pool).await?;

    let state = ApiState::new(&config, pool);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Served from the same listener but outside the API state
    let metrics_app = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    let app = cpt_api::router::router()
        .merge(metrics_app)
        .with_state(state)
        .layer(create_cors_layer(config.parsed_allowed_origins()))
        .layer(trace_layer)
        .layer(middleware::from_fn(track_metrics))
        .layer(middleware::from_fn(request_id_middleware));

    let app = apply_security_headers(app, config.env);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, environment = ?config.env, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
