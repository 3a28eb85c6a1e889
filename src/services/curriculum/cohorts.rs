use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CurriculumService;
use crate::models::curriculum::requests::CreateCohortRequest;
use crate::models::curriculum::responses::{CohortListResponse, CohortResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// POST /cohorts
pub async fn handle_create_cohort(
    service: &CurriculumService,
    req: CreateCohortRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if req.label.trim().is_empty() {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            "Le libellé de la promotion est obligatoire",
        )));
    }
    if req.end_date <= req.start_date {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            "La date de fin doit être postérieure à la date de début",
        )));
    }

    let storage = service.get_storage(request);
    match storage.create_cohort(req).await {
        Ok(cohort) => Ok(HttpResponse::Created().json(ApiResponse::success(
            CohortResponse { cohort },
            "Promotion créée",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// GET /cohorts
pub async fn handle_list_cohorts(
    service: &CurriculumService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.list_cohorts().await {
        Ok(cohorts) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CohortListResponse { cohorts },
            "Promotions chargées",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
