//! API request handlers
//!
//! Handlers for all REST API endpoints. Store access is blocking, so every
//! tracker call runs on the blocking thread pool.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::server::AppState;
use crate::core::{ExamSelection, Kpis, MoverComparison};
use crate::error::{ExamError, ExamResult};
use crate::report::{RankedList, StudentReport};
use crate::store::RecordStore;
use crate::tracker::Tracker;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Client mistakes (bad file, bad input) are 400; everything else is 500
fn status_for(error: &ExamError) -> StatusCode {
    match error {
        ExamError::MissingAnchor { .. } | ExamError::Import(_) | ExamError::Validation(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(result: ExamResult<T>) -> (StatusCode, Json<ApiResponse<T>>) {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))),
        Err(e) => (status_for(&e), Json(ApiResponse::err(e.to_string()))),
    }
}

/// Run `f` against the tracker on the blocking pool
async fn with_tracker<S, T, F>(state: Arc<AppState<S>>, f: F) -> ExamResult<T>
where
    S: RecordStore + 'static,
    T: Send + 'static,
    F: FnOnce(&Tracker<S>) -> ExamResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state.tracker))
        .await
        .map_err(|e| ExamError::Store(format!("worker task failed: {}", e)))?
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

fn endpoint(path: &str, method: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        path: path.to_string(),
        method: method.to_string(),
        description: description.to_string(),
    }
}

/// GET / - Root info
pub async fn root<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    let response = RootResponse {
        name: "ExamTrack API Server".to_string(),
        version: state.version.clone(),
        description: "Exam result ingestion, rankings and trend reports".to_string(),
        endpoints: vec![
            endpoint("/health", "GET", "Health check endpoint"),
            endpoint("/version", "GET", "Get server version"),
            endpoint("/api/v1/upload", "POST", "Parse an exam export, optionally saving it"),
            endpoint("/api/v1/exams", "POST", "List grade tiers with their exams and classes"),
            endpoint("/api/v1/rankings", "POST", "Top-N list for one exam or all exams"),
            endpoint("/api/v1/student", "POST", "Per-student history, trend and net scores"),
            endpoint("/api/v1/movers", "POST", "Risers and fallers against the previous exam"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: ["upload", "exams", "rankings", "student", "movers"]
            .iter()
            .map(|f| f.to_string())
            .collect(),
    }))
}

/// Upload request
#[derive(Deserialize)]
pub struct UploadRequest {
    pub file_path: String,
    #[serde(default)]
    pub save: bool,
}

/// Upload response
#[derive(Serialize, Default)]
pub struct UploadResponse {
    pub exam_name: String,
    pub records: usize,
    pub columns: Vec<String>,
    pub summary_rows_excluded: usize,
    /// Rows written, when the upload was saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<usize>,
}

/// POST /api/v1/upload - Parse (and optionally save) an exam export
pub async fn upload<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<UploadRequest>,
) -> impl IntoResponse {
    let result = with_tracker(state, move |tracker| {
        let parsed = tracker.parse_file(&PathBuf::from(&req.file_path))?;
        let saved = if req.save {
            Some(tracker.save(&parsed)?)
        } else {
            None
        };
        Ok(UploadResponse {
            exam_name: parsed.exam_name().to_string(),
            records: parsed.records.len(),
            columns: parsed.sheet.columns.clone(),
            summary_rows_excluded: parsed.summary_row_count(),
            saved,
        })
    })
    .await;
    respond(result)
}

/// Exams request; all tiers when `grade_tier` is omitted
#[derive(Deserialize, Default)]
pub struct ExamsRequest {
    #[serde(default)]
    pub grade_tier: Option<u32>,
}

#[derive(Serialize, Default)]
pub struct TierExams {
    pub grade_tier: u32,
    /// Canonical (chronological) exam order
    pub exams: Vec<String>,
    pub classes: Vec<String>,
}

#[derive(Serialize, Default)]
pub struct ExamsResponse {
    pub tiers: Vec<TierExams>,
}

/// POST /api/v1/exams - Exams and classes per grade tier
pub async fn exams<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<ExamsRequest>,
) -> impl IntoResponse {
    let result = with_tracker(state, move |tracker| {
        let tiers = match req.grade_tier {
            Some(tier) => vec![tier],
            None => tracker.grade_tiers()?,
        };
        let tiers = tiers
            .into_iter()
            .map(|tier| -> ExamResult<TierExams> {
                Ok(TierExams {
                    grade_tier: tier,
                    exams: tracker.exams(tier)?,
                    classes: tracker.class_labels(tier)?,
                })
            })
            .collect::<ExamResult<Vec<_>>>()?;
        Ok(ExamsResponse { tiers })
    })
    .await;
    respond(result)
}

/// Rankings request
#[derive(Deserialize)]
pub struct RankingsRequest {
    pub grade_tier: u32,
    /// Single exam; all exams when omitted
    #[serde(default)]
    pub exam: Option<String>,
    /// Selected class labels; all classes when omitted
    #[serde(default)]
    pub classes: Option<Vec<String>>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Rankings response
#[derive(Serialize)]
pub struct RankingsResponse {
    pub list: RankedList,
    pub summary: Kpis,
}

/// POST /api/v1/rankings - Top-N list
pub async fn rankings<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<RankingsRequest>,
) -> impl IntoResponse {
    let result = with_tracker(state, move |tracker| {
        let selection = ExamSelection::from_option(req.exam);
        let classes = req.classes.as_deref();
        Ok(RankingsResponse {
            list: tracker.rankings(req.grade_tier, &selection, classes, req.limit)?,
            summary: tracker.summary(req.grade_tier, &selection, classes)?,
        })
    })
    .await;
    respond(result)
}

/// Student report request
#[derive(Deserialize)]
pub struct StudentRequest {
    pub grade_tier: u32,
    pub name: String,
}

/// POST /api/v1/student - Per-student report data
pub async fn student<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<StudentRequest>,
) -> impl IntoResponse {
    let result: ExamResult<StudentReport> = with_tracker(state, move |tracker| {
        tracker.student_report(req.grade_tier, &req.name)
    })
    .await;
    respond(result)
}

/// Movers request
#[derive(Deserialize)]
pub struct MoversRequest {
    pub grade_tier: u32,
    pub exam: String,
}

/// POST /api/v1/movers - Risers and fallers
pub async fn movers<S: RecordStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<MoversRequest>,
) -> impl IntoResponse {
    let result: ExamResult<MoverComparison> = with_tracker(state, move |tracker| {
        tracker.movers(req.grade_tier, &req.exam)
    })
    .await;
    respond(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::server::router;
    use crate::config::AppConfig;
    use crate::core::test_support::record;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    // ==================== ApiResponse Tests ====================

    #[test]
    fn test_api_response_ok_creates_success_response() {
        let response = ApiResponse::ok("payload");
        assert!(response.success);
        assert_eq!(response.data, Some("payload"));
        assert!(response.error.is_none());
        assert!(!response.request_id.is_empty());
    }

    #[test]
    fn test_api_response_err_serializes_without_data() {
        let response: ApiResponse<UploadResponse> = ApiResponse::err("boom");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"error\":\"boom\""));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_api_response_request_id_is_unique() {
        let a = ApiResponse::ok(1);
        let b = ApiResponse::ok(1);
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_status_for_errors() {
        let anchor = ExamError::MissingAnchor {
            token: "Öğr.No".to_string(),
        };
        assert_eq!(status_for(&anchor), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&ExamError::Store("down".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rankings_request_defaults() {
        let req: RankingsRequest = serde_json::from_str(r#"{"grade_tier": 8}"#).unwrap();
        assert_eq!(req.grade_tier, 8);
        assert!(req.exam.is_none());
        assert!(req.classes.is_none());
        assert!(req.limit.is_none());
    }

    #[test]
    fn test_upload_request_save_defaults_false() {
        let req: UploadRequest = serde_json::from_str(r#"{"file_path": "d.xlsx"}"#).unwrap();
        assert!(!req.save);
    }

    // ==================== Router Tests ====================

    fn app() -> axum::Router {
        let store = MemoryStore::with_records(vec![
            record("Deneme-1", "Ali", Some(300.0), 0),
            record("Deneme-1", "Veli", Some(350.0), 0),
            record("Deneme-2", "Ali", Some(340.0), 60),
            record("Deneme-2", "Veli", Some(330.0), 60),
        ]);
        let tracker = Tracker::new(store, AppConfig::default());
        router(Arc::new(AppState::new(tracker)))
    }

    async fn call(method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_exams_endpoint() {
        let (status, body) = call("POST", "/api/v1/exams", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["tiers"][0]["grade_tier"], 8);
        assert_eq!(body["data"]["tiers"][0]["exams"], json!(["Deneme-1", "Deneme-2"]));
    }

    #[tokio::test]
    async fn test_rankings_endpoint() {
        let (status, body) = call("POST", "/api/v1/rankings", json!({"grade_tier": 8})).await;
        assert_eq!(status, StatusCode::OK);
        let rows = body["data"]["list"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "VELI");
        assert_eq!(body["data"]["summary"]["students"], 2);
    }

    #[tokio::test]
    async fn test_movers_endpoint() {
        let (_, body) = call(
            "POST",
            "/api/v1/movers",
            json!({"grade_tier": 8, "exam": "Deneme-2"}),
        )
        .await;
        assert_eq!(body["data"]["outcome"], "compared");
        assert_eq!(body["data"]["risers"][0]["name"], "Ali");

        let (_, body) = call(
            "POST",
            "/api/v1/movers",
            json!({"grade_tier": 8, "exam": "Deneme-1"}),
        )
        .await;
        assert_eq!(body["data"]["outcome"], "no_predecessor");

        let (_, body) = call(
            "POST",
            "/api/v1/movers",
            json!({"grade_tier": 8, "exam": "Deneme-9"}),
        )
        .await;
        assert_eq!(body["data"]["outcome"], "unknown_exam");
        assert_eq!(body["data"]["exam"], "Deneme-9");
    }

    #[tokio::test]
    async fn test_student_endpoint_unknown_name() {
        let (status, body) = call(
            "POST",
            "/api/v1/student",
            json!({"grade_tier": 8, "name": "Yok"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let (status, body) = call(
            "POST",
            "/api/v1/upload",
            json!({"file_path": "/nonexistent/deneme.xlsx"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Failed to open Excel file"));
    }
}
