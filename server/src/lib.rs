use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use retrieval::tokenizer::tokenize;
use retrieval::{open_source, Document, DocumentStore, RecordSchema, Retriever, SharedRetriever, DEFAULT_TOP_K};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tools::{default_registry, HttpConfig, ToolDescriptor, ToolError, ToolRegistry};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub corpus: PathBuf,
    pub schema: RecordSchema,
    pub admin_token: Option<String>,
    /// Comma-separated origins; any origin when unset or unparsable.
    pub cors_allow_origin: Option<String>,
    pub http: HttpConfig,
}

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ToolRegistry>,
    pub retriever: SharedRetriever,
    pub corpus: PathBuf,
    pub schema: RecordSchema,
    pub admin_token: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { DEFAULT_TOP_K }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub id: String,
    pub position: usize,
    pub score: f64,
    pub snippet: String,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Serialize)]
pub struct CallResponse {
    pub tool: String,
    pub output: String,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub generation: u64,
    pub documents: usize,
    pub loaded_at: String,
}

/// Read the configured corpus and build a retriever over it.
pub fn load_retriever(corpus: &std::path::Path, schema: &RecordSchema) -> retrieval::Result<Retriever> {
    let source = open_source(corpus);
    let store = DocumentStore::load(&*source, schema)?;
    Ok(Retriever::new(store))
}

pub fn build_app(config: ServerConfig) -> Result<Router> {
    // Load the corpus once at startup
    let retriever = SharedRetriever::new(load_retriever(&config.corpus, &config.schema)?);
    let registry = default_registry(retriever.clone(), &config.http)?;
    let state = AppState {
        registry: Arc::new(registry),
        retriever,
        corpus: config.corpus,
        schema: config.schema,
        admin_token: config.admin_token,
    };
    Ok(router(state, config.cors_allow_origin.as_deref()))
}

pub fn router(state: AppState, cors_allow_origin: Option<&str>) -> Router {
    let cors = match cors_allow_origin {
        Some(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        None => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/tools", get(list_tools))
        .route("/tools/:name", post(call_tool))
        .route("/search", get(search_handler))
        .route("/guests/:id", get(guest_handler))
        .route("/admin/reload", post(reload_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub struct ApiError(ToolError);

impl From<ToolError> for ApiError {
    fn from(err: ToolError) -> Self { ApiError(err) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ToolError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ToolError::NotFound(_) | ToolError::UnknownTool(_) => StatusCode::NOT_FOUND,
            ToolError::Duplicate(_) => StatusCode::CONFLICT,
            ToolError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        let body = serde_json::json!({ "error": { "kind": self.0.kind(), "message": self.0.to_string() } });
        (status, Json(body)).into_response()
    }
}

pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDescriptor>> {
    Json(state.registry.descriptors().into_iter().cloned().collect())
}

pub async fn call_tool(State(state): State<AppState>, Path(name): Path<String>, body: Bytes) -> Result<Json<CallResponse>, ApiError> {
    let args: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| ToolError::InvalidArgument(format!("request body is not JSON: {e}")))?
    };
    let output = state.registry.invoke(&name, args).await?;
    Ok(Json(CallResponse { tool: name, output }))
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let snapshot = state.retriever.snapshot();
    let k = params.k.clamp(1, 100);
    // Blank queries are a caller error for the tool, but just an empty page here
    let hits = snapshot.search(&params.q, k).unwrap_or_default();
    let terms = tokenize(&params.q);
    let results: Vec<SearchHit> = hits
        .iter()
        .map(|h| SearchHit {
            id: h.document.id.clone(),
            position: h.position,
            score: h.score,
            snippet: highlight_terms(&h.document.text, &terms),
            metadata: h.document.metadata.clone(),
        })
        .collect();
    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits: results.len(), results })
}

pub async fn guest_handler(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Document>, ApiError> {
    let snapshot = state.retriever.snapshot();
    let doc = snapshot.lookup(&id).map_err(ToolError::from)?;
    Ok(Json(doc.clone()))
}

async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<ReloadResponse>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let (corpus, schema) = (state.corpus.clone(), state.schema.clone());
    let retriever = tokio::task::spawn_blocking(move || load_retriever(&corpus, &schema))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| {
            tracing::warn!(error = %e, "corpus reload failed");
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        })?;
    let documents = retriever.store().len();
    let generation = state.retriever.replace(retriever);
    let loaded_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default();
    Ok(Json(ReloadResponse { generation, documents, loaded_at }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}

/// Wrap whole-word, case-insensitive occurrences of `terms` in `<em>`.
fn highlight_terms(text: &str, terms: &[String]) -> String {
    if terms.is_empty() {
        return text.to_string();
    }
    let alternation = terms.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    match regex::RegexBuilder::new(&format!(r"\b(?:{alternation})\b")).case_insensitive(true).build() {
        Ok(pat) => pat.replace_all(text, |caps: &regex::Captures| format!("<em>{}</em>", &caps[0])).to_string(),
        Err(_) => text.to_string(),
    }
}
