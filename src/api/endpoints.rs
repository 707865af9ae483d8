//! API endpoint handlers
//!
//! This module implements the HTTP surface of the service: one endpoint per
//! generation flow, the maintenance task scheduler, the static catalog and
//! health checks.

use crate::core::config::Config;
use crate::core::constants::{DIAGRAM_TYPES, VEHICLE_MODELS};
use crate::core::error::FlowError;
use crate::core::model_manager::ModelTier;
use crate::flows::{
    FlowContext, conversation, electrical_analysis, error_code, schematic, technical_data,
};
use crate::maintenance::MaintenanceStore;
use crate::models::flows::{
    ApiSettings, ConversationInput, ConversationReply, ElectricalAnalysisInput,
    ElectricalAnalysisOutput, ErrorCodeTroubleshootingInput, ErrorCodeTroubleshootingOutput,
    SchematicInput, SchematicOutput, TechnicalDataInput, TechnicalDataOutput,
};
use crate::models::maintenance::{MaintenanceTask, NewMaintenanceTask};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub flows: Arc<FlowContext>,
    pub maintenance: Arc<MaintenanceStore>,
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/test-connection", get(test_connection))
        .route("/v1/catalog", get(catalog))
        .route("/v1/flows/error-code-troubleshooting", post(troubleshoot))
        .route("/v1/flows/chat", post(chat))
        .route("/v1/flows/guided-diagnostic", post(guided_diagnostic))
        .route("/v1/flows/electrical-analysis", post(analyze_electrical))
        .route("/v1/flows/schematic", post(create_schematic))
        .route("/v1/flows/technical-data", post(lookup_technical_data))
        .route("/v1/maintenance/tasks", get(list_tasks).post(add_task))
        .route("/v1/maintenance/tasks/{id}/toggle", post(toggle_task))
        .route("/v1/maintenance/tasks/{id}", delete(delete_task))
        .with_state(state)
}

/// Fill in the upstream key from request headers when the body has none
///
/// Accepts `x-api-key` or `Authorization: Bearer <key>`.
fn with_header_key(mut settings: ApiSettings, headers: &HeaderMap) -> ApiSettings {
    let body_has_key = settings
        .api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());
    if body_has_key {
        return settings;
    }

    settings.api_key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(bearer_token)
        })
        .map(str::to_string);
    settings
}

/// Token of an `Authorization` value using the Bearer scheme, in any case
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|t| !t.is_empty())
}

/// POST /v1/flows/error-code-troubleshooting
async fn troubleshoot(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ErrorCodeTroubleshootingInput>, JsonRejection>,
) -> Result<Json<ErrorCodeTroubleshootingOutput>, FlowError> {
    let Json(mut input) = payload?;
    input.settings = with_header_key(input.settings, &headers);
    error_code::error_code_troubleshooting(&state.flows, input)
        .await
        .map(Json)
}

/// POST /v1/flows/chat
async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ConversationInput>, JsonRejection>,
) -> Result<Json<ConversationReply>, FlowError> {
    let Json(mut input) = payload?;
    input.settings = with_header_key(input.settings, &headers);
    conversation::continue_conversation(&state.flows, input)
        .await
        .map(Json)
}

/// POST /v1/flows/guided-diagnostic
async fn guided_diagnostic(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ConversationInput>, JsonRejection>,
) -> Result<Json<ConversationReply>, FlowError> {
    let Json(mut input) = payload?;
    input.settings = with_header_key(input.settings, &headers);
    conversation::continue_guided_diagnostic(&state.flows, input)
        .await
        .map(Json)
}

/// POST /v1/flows/electrical-analysis
async fn analyze_electrical(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ElectricalAnalysisInput>, JsonRejection>,
) -> Result<Json<ElectricalAnalysisOutput>, FlowError> {
    let Json(mut input) = payload?;
    input.settings = with_header_key(input.settings, &headers);
    electrical_analysis::analyze_electrical_system(&state.flows, input)
        .await
        .map(Json)
}

/// POST /v1/flows/schematic
async fn create_schematic(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SchematicInput>, JsonRejection>,
) -> Result<Json<SchematicOutput>, FlowError> {
    let Json(mut input) = payload?;
    input.settings = with_header_key(input.settings, &headers);
    schematic::generate_schematic(&state.flows, input)
        .await
        .map(Json)
}

/// POST /v1/flows/technical-data
async fn lookup_technical_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<TechnicalDataInput>, JsonRejection>,
) -> Result<Json<TechnicalDataOutput>, FlowError> {
    let Json(mut input) = payload?;
    input.settings = with_header_key(input.settings, &headers);
    technical_data::technical_data(&state.flows, input)
        .await
        .map(Json)
}

/// GET /v1/maintenance/tasks
async fn list_tasks(State(state): State<AppState>) -> Json<Vec<MaintenanceTask>> {
    Json(state.maintenance.list().await)
}

/// POST /v1/maintenance/tasks
async fn add_task(
    State(state): State<AppState>,
    payload: Result<Json<NewMaintenanceTask>, JsonRejection>,
) -> Result<(StatusCode, Json<MaintenanceTask>), FlowError> {
    let Json(new_task) = payload?;
    let task = state.maintenance.add(new_task).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// POST /v1/maintenance/tasks/{id}/toggle
async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MaintenanceTask>, FlowError> {
    state.maintenance.toggle(id).await.map(Json)
}

/// DELETE /v1/maintenance/tasks/{id}
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, FlowError> {
    state.maintenance.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/catalog - Vehicle models and diagram types known to the pickers
async fn catalog() -> impl IntoResponse {
    let entries = |items: &[(&str, &str)]| {
        items
            .iter()
            .map(|(value, label)| json!({ "value": value, "label": label }))
            .collect::<Vec<_>>()
    };

    Json(json!({
        "vehicle_models": entries(VEHICLE_MODELS),
        "diagram_types": entries(DIAGRAM_TYPES),
    }))
}

/// GET / - Root endpoint
async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": "Repair Assist API v0.1.0",
        "status": "running",
        "config": {
            "provider": state.flows.provider().provider_name(),
            "base_url": state.config.base_url,
            "text_model": state.config.text_model,
            "image_model": state.config.image_model,
            "default_api_key_configured": state.config.has_default_api_key(),
        },
        "endpoints": {
            "error_code_troubleshooting": "/v1/flows/error-code-troubleshooting",
            "chat": "/v1/flows/chat",
            "guided_diagnostic": "/v1/flows/guided-diagnostic",
            "electrical_analysis": "/v1/flows/electrical-analysis",
            "schematic": "/v1/flows/schematic",
            "technical_data": "/v1/flows/technical-data",
            "maintenance_tasks": "/v1/maintenance/tasks",
            "catalog": "/v1/catalog",
            "health": "/health",
            "test_connection": "/test-connection",
        },
    }))
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "provider": state.flows.provider().provider_name(),
        "default_api_key_configured": state.config.has_default_api_key(),
    }))
}

/// GET /test-connection - Test backend connectivity with the default key
async fn test_connection(State(state): State<AppState>) -> impl IntoResponse {
    let provider_name = state.flows.provider().provider_name().to_string();

    let credentials = match state.flows.credentials(&ApiSettings::default()) {
        Ok(credentials) => credentials,
        Err(e) => {
            return Json(json!({
                "status": "failed",
                "error_type": "Configuration Error",
                "message": e.to_string(),
                "provider": provider_name,
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "suggestions": [
                    "Set a default API key in config.toml or GEMINI_API_KEY",
                ],
            }));
        }
    };

    let mut request = state.flows.request(ModelTier::Text, "Hello");
    request.max_output_tokens = Some(5);

    match state.flows.provider().generate(&credentials, &request).await {
        Ok(_) => Json(json!({
            "status": "success",
            "message": format!("Successfully connected to {} API", provider_name),
            "provider": provider_name,
            "model_used": request.model,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
        Err(e) => {
            error!("API connectivity test failed: {}", e);
            Json(json!({
                "status": "failed",
                "error_type": "API Error",
                "message": e.to_string(),
                "provider": provider_name,
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "suggestions": [
                    "Check your API key is valid",
                    "Verify your API key has access to the configured model",
                    "Check if you have reached rate limits",
                ],
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::test_config;
    use crate::core::provider::ProviderError;
    use crate::flows::testing::FakeProvider;
    use crate::models::generation::GenerateResponse;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_with(config: Config, provider: Arc<FakeProvider>) -> Router {
        let flows = Arc::new(FlowContext::new(&config, provider));
        create_router(AppState {
            config: Arc::new(config),
            flows,
            maintenance: Arc::new(MaintenanceStore::new()),
        })
    }

    fn app(provider: Arc<FakeProvider>) -> Router {
        app_with(test_config(), provider)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_chat_returns_model_text() {
        let provider = Arc::new(FakeProvider::replying(GenerateResponse::text(
            "Kiểm tra van an toàn chính.",
        )));
        let (status, body) = send(
            app(provider.clone()),
            post_json(
                "/v1/flows/chat",
                json!({"history": [], "message": "Cần yếu khi nâng", "api_key": "AIza-body"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Kiểm tra van an toàn chính.");
        assert_eq!(provider.last_credentials().api_key, "AIza-body");
    }

    #[tokio::test]
    async fn test_empty_vehicle_model_is_rejected_without_network_call() {
        let provider = Arc::new(FakeProvider::replying(GenerateResponse::text("{}")));
        let (status, body) = send(
            app(provider.clone()),
            post_json(
                "/v1/flows/error-code-troubleshooting",
                json!({"error_code": "E02", "vehicle_model": ""}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["type"], "error");
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_rejected_without_network_call() {
        let mut config = test_config();
        config.default_api_key = None;
        let provider = Arc::new(FakeProvider::replying(GenerateResponse::text("x")));

        let (status, body) = send(
            app_with(config, provider.clone()),
            post_json("/v1/flows/guided-diagnostic", json!({"message": "Bắt đầu"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "API key is required");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_header_key_used_when_body_has_none() {
        let provider = Arc::new(FakeProvider::replying(GenerateResponse::text("ok")));
        let request = Request::builder()
            .method("POST")
            .uri("/v1/flows/chat")
            .header("content-type", "application/json")
            .header("authorization", "Bearer AIza-header")
            .body(Body::from(json!({"message": "hi"}).to_string()))
            .unwrap();

        let (status, _) = send(app(provider.clone()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(provider.last_credentials().api_key, "AIza-header");
    }

    #[tokio::test]
    async fn test_lowercase_bearer_scheme_accepted() {
        let provider = Arc::new(FakeProvider::replying(GenerateResponse::text("ok")));
        let request = Request::builder()
            .method("POST")
            .uri("/v1/flows/chat")
            .header("content-type", "application/json")
            .header("authorization", "bearer AIza-lower")
            .body(Body::from(json!({"message": "hi"}).to_string()))
            .unwrap();

        let (status, _) = send(app(provider.clone()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(provider.last_credentials().api_key, "AIza-lower");
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER  abc "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
    }

    #[tokio::test]
    async fn test_undecodable_body_returns_json_error() {
        let provider = Arc::new(FakeProvider::replying(GenerateResponse::text("unused")));
        let (status, body) = send(
            app(provider.clone()),
            post_json("/v1/flows/technical-data", json!({"vehicle_model": "CAT 320D"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["type"], "error");
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert!(
            body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("request_type")
        );
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_request_type_returns_json_error() {
        let provider = Arc::new(FakeProvider::replying(GenerateResponse::text("unused")));
        let (status, body) = send(
            app(provider.clone()),
            post_json(
                "/v1/flows/technical-data",
                json!({"vehicle_model": "CAT 320D", "request_type": "brochure"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_auth_failure_maps_to_401() {
        let provider = Arc::new(FakeProvider::failing(|| {
            ProviderError::Authentication("Invalid API key".into())
        }));
        let (status, body) = send(
            app(provider),
            post_json(
                "/v1/flows/schematic",
                json!({"vehicle_model": "CAT 320D", "diagram_type": "wiring"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["type"], "authentication_error");
    }

    #[tokio::test]
    async fn test_technical_data_markdown() {
        let provider = Arc::new(FakeProvider::replying(GenerateResponse::text(
            "| Hạng mục | 250 giờ |\n|---|---|\n| Dầu động cơ | Kiểm tra |",
        )));
        let (status, body) = send(
            app(provider),
            post_json(
                "/v1/flows/technical-data",
                json!({"vehicle_model": "Doosan DX225", "request_type": "maintenance_schedule"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["format"], "markdown");
        assert_eq!(body["request_type"], "maintenance_schedule");
        assert!(body.get("data_uri").is_none());
    }

    #[tokio::test]
    async fn test_maintenance_lifecycle() {
        let provider = Arc::new(FakeProvider::replying(GenerateResponse::text("unused")));
        let app = app(provider);

        let (status, created) = send(
            app.clone(),
            post_json(
                "/v1/maintenance/tasks",
                json!({"task": "Engine Oil Change", "vehicle": "Komatsu PC200-8", "due_date": "2024-08-15"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "pending");
        assert_eq!(created["due_date"], "2024-08-15");
        let id = created["id"].as_u64().unwrap();

        let toggle = Request::builder()
            .method("POST")
            .uri(format!("/v1/maintenance/tasks/{}/toggle", id))
            .body(Body::empty())
            .unwrap();
        let (_, toggled) = send(app.clone(), toggle).await;
        assert_eq!(toggled["status"], "completed");

        let remove = |id: u64| {
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/maintenance/tasks/{}", id))
                .body(Body::empty())
                .unwrap()
        };
        let (status, _) = send(app.clone(), remove(id)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send(app.clone(), remove(id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "not_found_error");
    }

    #[tokio::test]
    async fn test_catalog_lists_vehicle_models() {
        let provider = Arc::new(FakeProvider::replying(GenerateResponse::text("unused")));
        let request = Request::builder()
            .uri("/v1/catalog")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(provider), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["vehicle_models"][0]["label"], "Komatsu PC200-8");
        assert_eq!(body["diagram_types"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_connection_without_default_key() {
        let mut config = test_config();
        config.default_api_key = None;
        let provider = Arc::new(FakeProvider::replying(GenerateResponse::text("hi")));
        let request = Request::builder()
            .uri("/test-connection")
            .body(Body::empty())
            .unwrap();

        let (_, body) = send(app_with(config, provider.clone()), request).await;

        assert_eq!(body["status"], "failed");
        assert_eq!(provider.call_count(), 0);
    }
}
