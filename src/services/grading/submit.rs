use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradingService;
use crate::middlewares::RequireJWT;
use crate::models::submissions::requests::SubmitAnswerRequest;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// POST /assignments/{id}/submissions
///
/// 重复提交覆盖草稿；已评分的提交拒绝覆盖（409）。
pub async fn handle_submit_answer(
    service: &GradingService,
    assignment_id: i64,
    req: SubmitAnswerRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if req.answer_text.trim().is_empty() {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            "La réponse ne peut pas être vide",
        )));
    }

    let Some(student_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentification requise",
        )));
    };

    let storage = service.get_storage(request);

    // 只有已发布的测评接受提交
    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) if assignment.is_published => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
                ErrorCode::UnprocessableEntity,
                "Cette évaluation n'est pas encore publiée",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotFound,
                "Évaluation introuvable",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage
        .submit_answer(assignment_id, student_id, req.answer_text)
        .await
    {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionResponse { submission },
            "Copie remise",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
