use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradingService;
use crate::middlewares::RequireJWT;
use crate::models::submissions::requests::CreateAssignmentRequest;
use crate::models::submissions::responses::{
    AssignmentListResponse, AssignmentResponse, SubmissionListResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// POST /modules/{id}/assignments
pub async fn handle_create_assignment(
    service: &GradingService,
    module_id: i64,
    req: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if req.title.trim().is_empty() {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            "Le titre de l'évaluation est obligatoire",
        )));
    }
    if req.total_points <= 0.0 || !req.total_points.is_finite() {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            "Le barème doit être strictement positif",
        )));
    }
    if req.coefficient <= 0.0 || !req.coefficient.is_finite() {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            "Le coefficient doit être strictement positif",
        )));
    }

    let Some(creator_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentification requise",
        )));
    };

    let storage = service.get_storage(request);

    match storage.get_module_by_id(module_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotFound,
                "Unité d'enseignement introuvable",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.create_assignment(module_id, req, creator_id).await {
        Ok(assignment) => Ok(HttpResponse::Created().json(ApiResponse::success(
            AssignmentResponse { assignment },
            "Évaluation créée",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// GET /modules/{id}/assignments
pub async fn handle_list_assignments(
    service: &GradingService,
    module_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.list_assignments_by_module(module_id).await {
        Ok(assignments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssignmentListResponse { assignments },
            "Évaluations chargées",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// GET /assignments/{id}/submissions
pub async fn handle_list_submissions(
    service: &GradingService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotFound,
                "Évaluation introuvable",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.list_submissions_by_assignment(assignment_id).await {
        Ok(submissions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionListResponse { submissions },
            "Copies chargées",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
