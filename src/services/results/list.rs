use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ResultService;
use crate::middlewares::RequireJWT;
use crate::models::results::entities::Decision;
use crate::models::results::responses::ResultListResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// GET /semesters/{id}/results?decision=
pub async fn handle_list_by_semester(
    service: &ResultService,
    semester_id: i64,
    decision: Option<String>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let decision_filter = match decision.as_deref() {
        Some(raw) => match raw.parse::<Decision>() {
            Ok(d) => Some(d),
            Err(_) => {
                return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
                    ErrorCode::UnprocessableEntity,
                    "Décision inconnue, valeurs acceptées: ADM, AJ, RAT, EXC",
                )));
            }
        },
        None => None,
    };

    let storage = service.get_storage(request);
    match storage.list_results_by_semester(semester_id).await {
        Ok(results) => {
            let results = match decision_filter {
                Some(wanted) => results
                    .into_iter()
                    .filter(|r| r.decision == Some(wanted))
                    .collect(),
                None => results,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ResultListResponse { results },
                "Résultats chargés",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

/// GET /enrollments/{id}/results，学生只能查自己的
pub async fn handle_list_by_enrollment(
    service: &ResultService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentification requise",
        )));
    };

    let storage = service.get_storage(request);

    if user.role == UserRole::Student {
        match storage.get_enrollment_by_id(enrollment_id).await {
            Ok(Some(enrollment)) if enrollment.student_id == user.id => {}
            Ok(Some(_)) => {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::Forbidden,
                    "Cette inscription ne vous appartient pas",
                )));
            }
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::NotFound,
                    "Inscription introuvable",
                )));
            }
            Err(e) => return Ok(error_response(&e)),
        }
    }

    match storage.list_results_by_enrollment(enrollment_id).await {
        Ok(results) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ResultListResponse { results },
            "Résultats chargés",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
