//! HTTP API gateway for PonyPrompt.
//!
//! Exposes the prompt generator over HTTP:
//!
//! - `POST /generate`            — Compose a prompt from `user_text`
//! - `GET  /health`              — Liveness and uptime
//! - `GET  /info`                — Generator metadata
//! - `GET  /v1/categories`       — Corpus survey
//! - `POST /v1/generate/debug`   — Prompt plus fragments and diagnostics
//!
//! Built on Axum. Composition reads the corpus synchronously, so every
//! request runs it on the blocking thread pool.

pub mod api_v1;

use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span};

use ponyprompt_config::AppConfig;
use ponyprompt_core::prompt::PromptResult;
use ponyprompt_corpus::FsCorpus;
use ponyprompt_engine::PromptComposer;

/// Maximum accepted request body.
const MAX_BODY_BYTES: usize = 64 * 1024;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error while generating prompt.";

/// Shared application state for the gateway.
pub struct GatewayState {
    pub config: AppConfig,
    pub composer: Arc<PromptComposer>,
    pub start_time: chrono::DateTime<chrono::Utc>,
}

impl GatewayState {
    pub fn new(config: AppConfig, composer: PromptComposer) -> Self {
        Self {
            config,
            composer: Arc::new(composer),
            start_time: chrono::Utc::now(),
        }
    }
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .route("/generate", post(generate_handler))
        .nest("/v1", api_v1::v1_router())
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server against the filesystem corpus.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let composer = PromptComposer::from_config(Arc::new(FsCorpus::new()), &config);
    info!(
        source = composer.sampler().source_name(),
        root = %composer.sampler().root().display(),
        categories = composer.categories().len(),
        selection = ?composer.sampler().policy(),
        "Prompt composer ready"
    );

    let state = Arc::new(GatewayState::new(config, composer));
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Errors ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Parse a JSON request body; an empty body means "all fields absent".
pub(crate) fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Invalid request body: {e}")))
}

/// Run a composition on the blocking pool and map failures to responses.
pub(crate) async fn compose_blocking(
    composer: Arc<PromptComposer>,
    user_text: String,
    seed: Option<u64>,
) -> Result<PromptResult, ApiError> {
    let joined = tokio::task::spawn_blocking(move || match seed {
        Some(seed) => composer.compose(&user_text, &mut StdRng::seed_from_u64(seed)),
        None => composer.compose(&user_text, &mut rand::rng()),
    })
    .await;

    match joined {
        Ok(Ok(result)) => {
            result.emit_diagnostics();
            Ok(result)
        }
        Ok(Err(e)) => {
            for diagnostic in e.diagnostics() {
                diagnostic.emit();
            }
            info!("No user text and no fragments; nothing to generate");
            Err(api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e) => {
            error!(error = %e, "Prompt composition task panicked or was cancelled");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE,
            ))
        }
    }
}

// --- Handlers ---

#[derive(Serialize, Deserialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: i64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = chrono::Utc::now() - state.start_time;
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_secs: uptime.num_seconds(),
    })
}

#[derive(Serialize, Deserialize)]
struct InfoResponse {
    id: String,
    name: String,
    description: String,
    version: String,
    tags: Vec<String>,
}

async fn info_handler() -> Json<InfoResponse> {
    Json(InfoResponse {
        id: "pony-prompt".into(),
        name: "Pony Prompt Generator".into(),
        description: "Generates prompt components for Pony Diffusion from local text files."
            .into(),
        version: env!("CARGO_PKG_VERSION").into(),
        tags: vec!["text-generation".into(), "utility".into()],
    })
}

#[derive(Debug, Default, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    user_text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GenerateResponse {
    full_prompt: String,
}

async fn generate_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request_id = uuid::Uuid::new_v4();
    let span = info_span!("generate", %request_id);

    async move {
        let payload: GenerateRequest = parse_body(&body)?;
        let user_text = payload.user_text.unwrap_or_default();
        info!(user_text = %user_text, "Generate request received");

        let result = compose_blocking(state.composer.clone(), user_text, None).await?;
        info!(
            full_prompt = %result.full_prompt,
            fragments = result.fragments.len(),
            "Prompt generated"
        );

        Ok::<_, ApiError>(Json(GenerateResponse {
            full_prompt: result.full_prompt,
        }))
    }
    .instrument(span)
    .await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use ponyprompt_core::{Category, EmptyPromptPolicy};
    use ponyprompt_corpus::InMemoryCorpus;
    use tower::ServiceExt;

    pub(crate) fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.corpus.root = "/corpus".into();
        config.corpus.categories = vec![
            Category::new("faces", "01_faces"),
            Category::new("clothing", "02_clothing"),
            Category::new("actions", "06_actions"),
        ];
        config
    }

    pub(crate) fn test_corpus() -> InMemoryCorpus {
        InMemoryCorpus::new()
            .with_file("/corpus/01_faces/faces.txt", "face = blue eyes\nnovalue")
            .with_file("/corpus/02_clothing/clothing.txt", "outfit = red dress")
    }

    pub(crate) fn test_state_with(config: AppConfig, corpus: InMemoryCorpus) -> SharedState {
        let composer = PromptComposer::from_config(Arc::new(corpus), &config);
        Arc::new(GatewayState::new(config, composer))
    }

    pub(crate) fn test_state() -> SharedState {
        test_state_with(test_config(), test_corpus())
    }

    fn post_generate(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/generate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_state());
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn info_endpoint() {
        let app = build_router(test_state());
        let req = Request::builder().uri("/info").body(Body::empty()).unwrap();
        let json = json_body(app.oneshot(req).await.unwrap()).await;
        assert_eq!(json["id"], "pony-prompt");
    }

    #[tokio::test]
    async fn generate_composes_prompt() {
        let app = build_router(test_state());
        let response = app
            .oneshot(post_generate(r#"{"user_text": "  a girl "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["full_prompt"], "/imagine a girl blue eyes, red dress");
        assert!(json.get("fragments").is_none());
    }

    #[tokio::test]
    async fn generate_without_user_text() {
        for body in ["{}", r#"{"user_text": null}"#, ""] {
            let app = build_router(test_state());
            let response = app.oneshot(post_generate(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "body {body:?}");
            let json = json_body(response).await;
            assert_eq!(json["full_prompt"], "/imagine blue eyes, red dress");
        }
    }

    #[tokio::test]
    async fn generate_with_missing_corpus_is_permissive() {
        let app = build_router(test_state_with(test_config(), InMemoryCorpus::new()));
        let response = app.oneshot(post_generate("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["full_prompt"], "");
    }

    #[tokio::test]
    async fn generate_strict_empty_is_client_error() {
        let mut config = test_config();
        config.compose.empty_prompt = EmptyPromptPolicy::Strict;
        let app = build_router(test_state_with(config, InMemoryCorpus::new()));

        let response = app.oneshot(post_generate("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("Nothing to generate"));
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn count(&self, needle: &str) -> usize {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .filter(|line| line.contains(needle))
                .count()
        }
    }

    async fn warnings_logged(policy: EmptyPromptPolicy) -> (usize, StatusCode) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut config = test_config();
        config.compose.empty_prompt = policy;
        let state = test_state_with(config, InMemoryCorpus::new());
        let status = match compose_blocking(state.composer.clone(), String::new(), None).await {
            Ok(_) => StatusCode::OK,
            Err((status, _)) => status,
        };
        (logs.count("corpus_unavailable"), status)
    }

    #[tokio::test]
    async fn diagnostics_logged_under_both_empty_policies() {
        let (permissive, status) = warnings_logged(EmptyPromptPolicy::Permissive).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(permissive, 3);

        let (strict, status) = warnings_logged(EmptyPromptPolicy::Strict).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(strict, 3);
    }

    #[tokio::test]
    async fn generate_rejects_malformed_json() {
        let app = build_router(test_state());
        let response = app.oneshot(post_generate("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("Invalid request body"));
    }

    #[tokio::test]
    async fn generate_rejects_non_string_user_text() {
        let app = build_router(test_state());
        let response = app
            .oneshot(post_generate(r#"{"user_text": 42}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_body_rejected() {
        let app = build_router(test_state());
        let text = "x".repeat(MAX_BODY_BYTES + 1);
        let body = serde_json::json!({ "user_text": text }).to_string();
        let response = app.oneshot(post_generate(&body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
