//! HTTP API v1 — inspection endpoints for corpus authors.
//!
//! Endpoints:
//!
//! - `GET  /v1/categories`      — Availability and file count per category
//! - `POST /v1/generate/debug`  — Prompt with fragments and diagnostics, optionally seeded

use axum::body::Bytes;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use ponyprompt_core::policy::SelectionPolicy;
use ponyprompt_core::prompt::{CategoryStatus, PromptResult};

use crate::{ApiError, INTERNAL_ERROR_MESSAGE, SharedState, api_error, compose_blocking, parse_body};

/// Routes mounted under `/v1`.
pub fn v1_router() -> Router<SharedState> {
    Router::new()
        .route("/categories", get(list_categories_handler))
        .route("/generate/debug", post(generate_debug_handler))
}

// ── DTOs ──────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct CategoryListResponse {
    root: String,
    selection: SelectionPolicy,
    count: usize,
    categories: Vec<CategoryStatus>,
}

#[derive(Debug, Default, Deserialize)]
struct DebugRequest {
    #[serde(default)]
    user_text: Option<String>,
    /// Fixes every random draw for a reproducible result
    #[serde(default)]
    seed: Option<u64>,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn list_categories_handler(
    State(state): State<SharedState>,
) -> Result<Json<CategoryListResponse>, ApiError> {
    let composer = state.composer.clone();
    let categories = tokio::task::spawn_blocking(move || composer.survey())
        .await
        .map_err(|e| {
            error!(error = %e, "Corpus survey task failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        })?;

    Ok(Json(CategoryListResponse {
        root: state.config.corpus.resolved_root().display().to_string(),
        selection: state.config.sampling.selection,
        count: categories.len(),
        categories,
    }))
}

async fn generate_debug_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<PromptResult>, ApiError> {
    let payload: DebugRequest = parse_body(&body)?;
    info!(seed = ?payload.seed, "v1/generate/debug request");

    let result = compose_blocking(
        state.composer.clone(),
        payload.user_text.unwrap_or_default(),
        payload.seed,
    )
    .await?;

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_router;
    use crate::tests::{test_config, test_corpus, test_state, test_state_with};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use ponyprompt_core::diagnostic::DiagnosticKind;
    use tower::ServiceExt;

    fn post_debug(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/generate/debug")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn list_categories() {
        let app = build_router(test_state());
        let req = Request::builder()
            .uri("/v1/categories")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: CategoryListResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.count, 3);
        assert_eq!(json.root, "/corpus");
        assert_eq!(json.selection, SelectionPolicy::ShuffleFallback);
        assert!(json.categories[0].available);
        assert_eq!(json.categories[0].files, 1);
        assert_eq!(json.categories[2].name, "actions");
        assert!(!json.categories[2].available);
    }

    #[tokio::test]
    async fn debug_reports_fragments_and_diagnostics() {
        let app = build_router(test_state());
        let response = app
            .oneshot(post_debug(serde_json::json!({"user_text": "a girl", "seed": 7})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let result: PromptResult = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.full_prompt, "/imagine a girl blue eyes, red dress");
        assert_eq!(result.fragments.len(), 2);
        assert_eq!(result.fragments[0].file, "faces.txt");
        // "actions" has no directory in the fixture corpus.
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.category == "actions" && d.kind == DiagnosticKind::CorpusUnavailable)
        );
    }

    #[tokio::test]
    async fn debug_seed_is_reproducible() {
        let corpus = test_corpus()
            .with_file("/corpus/06_actions/a.txt", "x = run\nx = jump\nx = sit")
            .with_file("/corpus/06_actions/b.txt", "x = wave\nx = dance");
        let state = test_state_with(test_config(), corpus);

        let mut prompts = Vec::new();
        for _ in 0..3 {
            let app = build_router(state.clone());
            let response = app
                .oneshot(post_debug(serde_json::json!({"seed": 1234})))
                .await
                .unwrap();
            let body = response.into_body().collect().await.unwrap().to_bytes();
            let result: PromptResult = serde_json::from_slice(&body).unwrap();
            prompts.push(result.full_prompt);
        }
        assert_eq!(prompts[0], prompts[1]);
        assert_eq!(prompts[1], prompts[2]);
    }
}
