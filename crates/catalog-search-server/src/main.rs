use axum::http::StatusCode;
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use catalog_search_core::{build_filter, id_projection, Config, SearchRequest, SearchResponse};
use catalog_search_storage::{Catalog, MongoCatalog};
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};
mod metrics;

#[derive(Clone)]
struct AppState {
    catalog: Arc<dyn Catalog>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let catalog = MongoCatalog::connect(&config).await?;
    if let Err(e) = catalog.ping().await {
        warn!("database ping failed: {}; serving anyway", e);
    }
    metrics::init();

    let app = router(AppState {
        catalog: Arc::new(catalog),
    });

    let addr = config.bind_addr;
    match &config.tls {
        Some(tls) => {
            let rustls =
                axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;
            info!("https listening on {}", addr);
            axum_server::bind_rustls(addr, rustls)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            info!("http listening on {}", addr);
            axum_server::bind(addr)
                .serve(app.into_make_service())
                .await?;
        }
    }
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", post(search))
        .route("/metrics", get(metrics_text))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn search(State(app): State<AppState>, Json(req): Json<SearchRequest>) -> impl IntoResponse {
    let _timer = metrics::SEARCH_DURATION_SEC.start_timer();
    let filter = build_filter(&req);
    debug!("search filter {}", filter);
    match app.catalog.find(filter, id_projection()).await {
        Ok(docs) => {
            let resp = SearchResponse::from_documents(docs);
            metrics::SEARCH_REQUESTS_TOTAL.with_label_values(&["ok"]).inc();
            metrics::SEARCH_RESULTS_COUNT.observe(resp.results.len() as f64);
            info!(
                backend = app.catalog.backend(),
                "search {:?} returned {} products",
                req.query,
                resp.results.len()
            );
            (StatusCode::OK, Json(resp)).into_response()
        }
        Err(e) => {
            metrics::SEARCH_REQUESTS_TOTAL.with_label_values(&["error"]).inc();
            error!("search failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

async fn metrics_text() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buf = Vec::new();
    let _ = encoder.encode(&metric_families, &mut buf);
    (StatusCode::OK, String::from_utf8(buf).unwrap_or_default())
}
