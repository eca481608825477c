use axum::{
    body::Body,
    extract::{Request, State},
    routing::get,
};
use exception_advice::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tower::{ServiceBuilder, service_fn};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone, Serialize)]
struct Bucket {
    name: String,
    owner: String,
}

#[derive(Debug, Deserialize)]
struct NewBucket {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Paging {
    page: usize,
    size: Option<usize>,
}

#[derive(Clone, Default)]
struct AppState {
    buckets: Arc<RwLock<BTreeMap<String, Bucket>>>,
}

async fn list_buckets(
    State(state): State<AppState>,
    QueryParams(paging): QueryParams<Paging>,
) -> Result<Json<Vec<Bucket>>, Exception> {
    let size = paging.size.unwrap_or(20);
    if size == 0 {
        return Err(ClientException::bad_request("page size must be positive").into());
    }

    let buckets = state.buckets.read().await;
    Ok(Json(
        buckets
            .values()
            .skip(paging.page.saturating_mul(size))
            .take(size)
            .cloned()
            .collect(),
    ))
}

async fn find_bucket(
    State(state): State<AppState>,
    PathParams(name): PathParams<String>,
) -> Result<Json<Bucket>, Exception> {
    state
        .buckets
        .read()
        .await
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| ClientException::not_found(format!("bucket '{name}' does not exist")).into())
}

async fn create_bucket(
    State(state): State<AppState>,
    SessionId(owner): SessionId,
    JsonBody(new): JsonBody<NewBucket>,
) -> Result<(StatusCode, Json<Bucket>), Exception> {
    let mut buckets = state.buckets.write().await;
    if buckets.contains_key(&new.name) {
        return Err(ClientException::conflict(format!("bucket '{}' already exists", new.name)).into());
    }

    let bucket = Bucket {
        name: new.name.clone(),
        owner,
    };
    buckets.insert(new.name, bucket.clone());
    Ok((StatusCode::CREATED, Json(bucket)))
}

async fn legacy_export(_req: Request<Body>) -> Result<Response, anyhow::Error> {
    Err(anyhow::anyhow!("export backend is not configured"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AdviceConfig::from_env()?;
    ExceptionAdvice::install(config)?;
    tracing::info!(
        hide_exceptions = config.hide_exceptions,
        "Exception advice installed"
    );

    let export = ServiceBuilder::new()
        .layer(ExceptionLayer::new(HttpExceptionFilter::default()))
        .service(service_fn(legacy_export));

    let app = Router::new()
        .route("/buckets", get(list_buckets).post(create_bucket))
        .route("/buckets/{name}", get(find_bucket))
        .route_service("/export", export)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::default());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
