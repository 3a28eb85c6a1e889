use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradingService;
use crate::middlewares::RequireJWT;
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// PUT /submissions/{id}/grade
///
/// 原始分与 /20 归一分在同一次写入里落库；score_raw 为 None 撤销评分。
/// 所属学期已锁定时整个操作被 423 拒绝。
pub async fn handle_grade_submission(
    service: &GradingService,
    submission_id: i64,
    req: GradeSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(grader_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentification requise",
        )));
    };

    let storage = service.get_storage(request);

    match storage
        .grade_submission(submission_id, grader_id, req.score_raw, req.feedback)
        .await
    {
        Ok(Some(submission)) => {
            tracing::info!(
                "Submission {} graded by user {} (note_20: {:?})",
                submission_id,
                grader_id,
                submission.note_20
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmissionResponse { submission },
                "Note enregistrée",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Copie introuvable",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
