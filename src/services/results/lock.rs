use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ResultService;
use crate::middlewares::RequireJWT;
use crate::models::results::responses::ResultLockResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// POST /results/{id}/lock
///
/// 单向锁定单个成绩单。学期锁定会级联冻结全部成绩单，这里用于在
/// 学期仍开放时提前定稿个别学生的相关记录。重复锁定返回成功但不重写时间戳。
pub async fn handle_lock_result(
    service: &ResultService,
    result_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(actor_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentification requise",
        )));
    };

    let storage = service.get_storage(request);
    match storage.lock_result(result_id, actor_id).await {
        Ok(Some(outcome)) => {
            if outcome.newly_locked {
                tracing::info!("Result {} locked by user {}", result_id, actor_id);
            }
            let message = if outcome.newly_locked {
                "Relevé verrouillé"
            } else {
                "Relevé déjà verrouillé"
            };
            let response = ResultLockResponse {
                result_id,
                locked: true,
                locked_at: outcome.result.locked_at,
                locked_by: outcome.result.locked_by,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, message)))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Relevé introuvable",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
