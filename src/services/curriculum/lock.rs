use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CurriculumService;
use crate::middlewares::RequireJWT;
use crate::models::results::responses::LockResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// POST /semesters/{id}/lock
///
/// 单向锁定。重复锁定返回成功但不重写时间戳，响应中的 locked_at 始终
/// 是第一次锁定的时刻。
pub async fn handle_lock_semester(
    service: &CurriculumService,
    semester_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(actor_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentification requise",
        )));
    };

    let storage = service.get_storage(request);
    match storage.lock_semester(semester_id, actor_id).await {
        Ok(Some(outcome)) => {
            if outcome.newly_locked {
                tracing::info!(
                    "Semester {} locked by user {}",
                    semester_id,
                    actor_id
                );
            }
            let message = if outcome.newly_locked {
                "Semestre verrouillé"
            } else {
                "Semestre déjà verrouillé"
            };
            let response = LockResponse {
                semester_id,
                locked: true,
                locked_at: outcome.semester.locked_at,
                locked_by: outcome.semester.locked_by,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, message)))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Semestre introuvable",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
