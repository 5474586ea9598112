//! # API REST
//!
//! REST API implementation for DX.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, input rejection)
//!
//! Uses `api-shared` for wire types and `dx-core` for the analysis itself.

#![warn(rust_2018_idioms)]

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    AnalysisRes, AnalyzeReq, DiagnosisRes, EducationReq, EducationRes, HealthRes, HealthService,
    ModelsHealthRes, PatientInfoReq, QuestionsReq, QuestionsRes, SlotHealthRes,
};
use dx_core::{NonEmptyText, SymptomAnalysisService};

/// Application state shared across REST API handlers
///
/// Holds the analysis service; the service owns the injected model gateway.
#[derive(Clone)]
pub struct AppState {
    pub analysis: SymptomAnalysisService,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, analyze, generate_questions, education),
    components(schemas(
        HealthRes,
        ModelsHealthRes,
        SlotHealthRes,
        AnalyzeReq,
        AnalysisRes,
        DiagnosisRes,
        PatientInfoReq,
        QuestionsReq,
        QuestionsRes,
        EducationReq,
        EducationRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/analyze", post(analyze))
        .route("/api/generate-questions", post(generate_questions))
        .route("/api/education", post(education))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service and model slot status", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Always answers 200 while the process is up. `ok` reports whether both model slots are
/// reachable; when they are not, analysis still works through the demo fallback.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(state.analysis.check_models().await))
}

#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body = AnalyzeReq,
    responses(
        (status = 200, description = "Differential diagnosis", body = AnalysisRes),
        (status = 400, description = "Symptoms missing"),
        (status = 422, description = "Unknown mode or malformed body")
    )
)]
/// Analyse a symptom description
///
/// Runs the reasoning model and, when its reply carries no follow-up questions, a second chat
/// model call for them. Model failures are absorbed: the response then comes from the demo
/// engine and `source` is `demo`.
///
/// # Errors
/// Returns `400 Bad Request` if the symptom text is blank.
#[axum::debug_handler]
async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeReq>,
) -> Result<Json<AnalysisRes>, (StatusCode, &'static str)> {
    let session_id = req.session_id.clone();
    let input = match req.into_input() {
        Ok(input) => input,
        Err(e) => {
            tracing::error!("Rejected analysis request: {}", e);
            return Err((StatusCode::BAD_REQUEST, "Symptoms are required"));
        }
    };

    tracing::info!(
        session_id = session_id.as_deref().unwrap_or("-"),
        mode = %input.mode,
        "analysis requested"
    );

    let outcome = state.analysis.analyze_with_follow_ups(&input).await;
    let mut res = AnalysisRes::from(outcome);
    res.session_id = session_id;
    Ok(Json(res))
}

#[utoipa::path(
    post,
    path = "/api/generate-questions",
    request_body = QuestionsReq,
    responses(
        (status = 200, description = "Follow-up questions", body = QuestionsRes),
        (status = 400, description = "Symptoms missing"),
        (status = 422, description = "Unknown mode or malformed body")
    )
)]
/// Generate follow-up questions for a symptom description
///
/// The returned list is never empty.
#[axum::debug_handler]
async fn generate_questions(
    State(state): State<AppState>,
    Json(req): Json<QuestionsReq>,
) -> Result<Json<QuestionsRes>, (StatusCode, &'static str)> {
    let input = match req.into_input() {
        Ok(input) => input,
        Err(e) => {
            tracing::error!("Rejected question request: {}", e);
            return Err((StatusCode::BAD_REQUEST, "Symptoms are required"));
        }
    };

    let questions = state.analysis.generate_follow_up_questions(&input).await;
    Ok(Json(QuestionsRes { questions }))
}

#[utoipa::path(
    post,
    path = "/api/education",
    request_body = EducationReq,
    responses(
        (status = 200, description = "Patient education text", body = EducationRes),
        (status = 400, description = "Diagnosis name missing")
    )
)]
/// Plain-language education about one diagnosis
#[axum::debug_handler]
async fn education(
    State(state): State<AppState>,
    Json(req): Json<EducationReq>,
) -> Result<Json<EducationRes>, (StatusCode, &'static str)> {
    let diagnosis = match NonEmptyText::new(&req.diagnosis) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!("Rejected education request: {}", e);
            return Err((StatusCode::BAD_REQUEST, "Diagnosis is required"));
        }
    };

    let content = state.analysis.generate_education(diagnosis.as_str()).await;
    Ok(Json(EducationRes { content }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use dx_core::{DxResult, ModelGateway, ModelSlot, OfflineGateway};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct CannedGateway;

    #[async_trait]
    impl ModelGateway for CannedGateway {
        async fn complete(&self, _prompt: &str, slot: ModelSlot) -> DxResult<String> {
            Ok(match slot {
                ModelSlot::Reasoning => r#"{"diagnoses":[{"name":"Influenza","description":"flu","confidence":82,"category":"Respiratory","redFlags":["Breathlessness"],"recommendedTests":["Flu swab"]}],"overallConfidence":82,"redFlags":["Breathlessness"],"recommendedTests":["Flu swab"]}"#.to_string(),
                ModelSlot::Chat => "1. Any fever?\n2. Any aches?".to_string(),
            })
        }

        fn model_name(&self, _slot: ModelSlot) -> &str {
            "canned"
        }
    }

    fn app(gateway: Arc<dyn ModelGateway>) -> Router {
        router(AppState {
            analysis: SymptomAnalysisService::new(gateway),
        })
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn analyze_returns_model_result_with_follow_ups() {
        let req = post_json(
            "/api/analyze",
            serde_json::json!({"symptoms": "cough and fever", "mode": "doctor", "sessionId": "abc"}),
        );
        let response = app(Arc::new(CannedGateway)).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["source"], "model");
        assert_eq!(json["sessionId"], "abc");
        assert_eq!(json["diagnoses"][0]["name"], "Influenza");
        assert_eq!(json["overallConfidence"], 82);
        assert_eq!(
            json["followUpQuestions"],
            serde_json::json!(["Any fever?", "Any aches?"])
        );
    }

    #[tokio::test]
    async fn analyze_offline_uses_demo_engine() {
        let req = post_json(
            "/api/analyze",
            serde_json::json!({"symptoms": "fever and joint pain", "mode": "patient"}),
        );
        let response = app(Arc::new(OfflineGateway)).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["source"], "demo");
        assert_eq!(json["diagnoses"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["overallConfidence"], 65);
        assert!(json.get("sessionId").is_none());
    }

    #[tokio::test]
    async fn blank_symptoms_are_bad_request() {
        let req = post_json(
            "/api/analyze",
            serde_json::json!({"symptoms": "   ", "mode": "doctor"}),
        );
        let response = app(Arc::new(OfflineGateway)).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_mode_is_rejected() {
        let req = post_json(
            "/api/generate-questions",
            serde_json::json!({"symptoms": "cough", "mode": "nurse"}),
        );
        let response = app(Arc::new(OfflineGateway)).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn generate_questions_parses_chat_reply() {
        let req = post_json(
            "/api/generate-questions",
            serde_json::json!({"symptoms": "cough", "mode": "patient", "patientInfo": {"age": 8}}),
        );
        let response = app(Arc::new(CannedGateway)).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["questions"], serde_json::json!(["Any fever?", "Any aches?"]));
    }

    #[tokio::test]
    async fn education_requires_diagnosis() {
        let response = app(Arc::new(OfflineGateway))
            .oneshot(post_json("/api/education", serde_json::json!({"diagnosis": ""})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app(Arc::new(OfflineGateway))
            .oneshot(post_json("/api/education", serde_json::json!({"diagnosis": "Migraine"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert!(json["content"].as_str().unwrap().contains("Migraine"));
    }

    #[tokio::test]
    async fn health_reports_slots() {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app(Arc::new(OfflineGateway)).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["ok"], false);
        assert_eq!(json["models"]["reasoning"]["connected"], false);
        assert_eq!(json["models"]["chat"]["model"], "offline");
        assert!(json["checkedAt"].is_string());
    }
}
