use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use toxref_models::{DossierExtraction, PdfExtraction};
use toxref_utils::{log_error, ErrorResponse, ToxrefError};
use tower_http::trace::TraceLayer;

use crate::service::{DossierLink, LookupService, ReportLink};
use crate::similarity::RankedCandidate;

/// Error body returned by every handler.
pub struct ApiError(ToxrefError);

impl From<ToxrefError> for ApiError {
    fn from(error: ToxrefError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            log_error!(self.0, "Lookup action failed");
        }
        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}

pub fn create_router(service: LookupService) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/ingredients", get(list_ingredients))
        .route("/api/v1/ingredients/:name/report", get(report_link))
        .route("/api/v1/ingredients/:name/extract", post(extract_report))
        .route("/api/v1/ingredients/:name/echa-candidates", get(echa_candidates))
        .route("/api/v1/echa/:key/dossier", get(dossier_link))
        .route("/api/v1/echa/:key/extract", post(extract_dossier))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn health_check(State(service): State<LookupService>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "toxicology-lookup",
        "version": env!("CARGO_PKG_VERSION"),
        "ingredients": service.store().ingredients.len()
    }))
}

#[derive(Debug, Deserialize)]
struct IngredientQuery {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
struct IngredientListResponse {
    ingredients: Vec<String>,
}

async fn list_ingredients(
    State(service): State<LookupService>,
    Query(query): Query<IngredientQuery>,
) -> Json<IngredientListResponse> {
    Json(IngredientListResponse {
        ingredients: service.list_ingredients(query.q.as_deref()),
    })
}

async fn report_link(
    State(service): State<LookupService>,
    Path(name): Path<String>,
) -> Result<Json<ReportLink>, ApiError> {
    Ok(Json(service.report_link(&name).await?))
}

async fn extract_report(
    State(service): State<LookupService>,
    Path(name): Path<String>,
) -> Result<Json<PdfExtraction>, ApiError> {
    Ok(Json(service.extract_report(&name).await?))
}

#[derive(Debug, Serialize)]
struct CandidatesResponse {
    ingredient: String,
    candidates: Vec<RankedCandidate>,
}

async fn echa_candidates(
    State(service): State<LookupService>,
    Path(name): Path<String>,
) -> Json<CandidatesResponse> {
    let candidates = service.echa_candidates(&name);
    Json(CandidatesResponse {
        ingredient: name,
        candidates,
    })
}

async fn dossier_link(
    State(service): State<LookupService>,
    Path(key): Path<String>,
) -> Result<Json<DossierLink>, ApiError> {
    Ok(Json(service.dossier_link(&key)?))
}

async fn extract_dossier(
    State(service): State<LookupService>,
    Path(key): Path<String>,
) -> Result<Json<DossierExtraction>, ApiError> {
    Ok(Json(service.extract_dossier(&key).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cir_client::CirClient;
    use crate::echa_client::EchaClient;
    use crate::store::Store;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use std::sync::Arc;
    use toxref_models::{CrossReferenceIndex, IngredientIndex};
    use toxref_utils::{CirConfig, EchaConfig, HttpConfig};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let store = Store::new(
            IngredientIndex::from_json_str(r#"{"Aloe Vera": "a1", "Zinc Oxide": "z2", "Talc": "t3"}"#)
                .unwrap(),
            CrossReferenceIndex::from_json_str(r#"{"Zinc oxide": 16139, "Zinc stearate": 1}"#).unwrap(),
        );
        let http = HttpConfig::default();
        let service = LookupService::new(
            Arc::new(store),
            CirClient::new(&CirConfig::default(), &http).unwrap(),
            EchaClient::new(&EchaConfig::default(), &http).unwrap(),
        );
        create_router(service)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().method(Method::GET).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = get_json(test_router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["ingredients"], 3);
    }

    #[tokio::test]
    async fn test_list_ingredients_with_query() {
        let (status, body) = get_json(test_router(), "/api/v1/ingredients?q=ZINC").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ingredients"], serde_json::json!(["Zinc Oxide"]));

        let (_, body) = get_json(test_router(), "/api/v1/ingredients").await;
        assert_eq!(body["ingredients"], serde_json::json!(["Aloe Vera", "Zinc Oxide", "Talc"]));
    }

    #[tokio::test]
    async fn test_echa_candidates_route_decodes_name() {
        let (status, body) = get_json(test_router(), "/api/v1/ingredients/Zinc%20Oxide/echa-candidates").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ingredient"], "Zinc Oxide");
        assert_eq!(body["candidates"][0]["key"], "Zinc oxide");
        assert_eq!(body["candidates"][1]["key"], "Zinc stearate");
    }

    #[tokio::test]
    async fn test_dossier_link_route() {
        let (status, body) = get_json(test_router(), "/api/v1/echa/Zinc%20oxide/dossier").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["dossier_url"],
            "https://echa.europa.eu/it/registration-dossier/-/registered-dossier/16139/7/1"
        );
    }

    #[tokio::test]
    async fn test_unknown_ingredient_maps_to_not_found() {
        let (status, body) = get_json(test_router(), "/api/v1/ingredients/Unobtainium/report").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = get_json(test_router(), "/api/v1/echa/Water/dossier").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
