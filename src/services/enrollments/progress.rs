use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::EnrollmentService;
use crate::middlewares::RequireJWT;
use crate::models::enrollments::requests::LessonWatchRequest;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::storage::Storage;

// 学生只能访问自己的注册，管理角色不受限
async fn check_enrollment_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    enrollment_id: i64,
) -> Result<(), HttpResponse> {
    if user.role != UserRole::Student {
        return Ok(());
    }

    match storage.get_enrollment_by_id(enrollment_id).await {
        Ok(Some(enrollment)) if enrollment.student_id == user.id => Ok(()),
        Ok(Some(_)) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Cette inscription ne vous appartient pas",
        ))),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Inscription introuvable",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}

/// GET /enrollments/{id}/progress
///
/// 进度为空时先尝试一次补链再返回（结构建好晚于注册的自愈路径）。
pub async fn handle_get_progress(
    service: &EnrollmentService,
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
    if let Err(resp) = check_enrollment_access(&storage, &user, enrollment_id).await {
        return Ok(resp);
    }

    let progress = match storage.get_progress(enrollment_id).await {
        Ok(Some(progress)) => progress,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotFound,
                "Inscription introuvable",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    let progress = if progress.modules.is_empty() {
        match storage.link_enrollment(enrollment_id).await {
            Ok(stats) if stats.modules_linked > 0 => {
                tracing::info!(
                    "Self-healed enrollment {}: linked {} modules",
                    enrollment_id,
                    stats.modules_linked
                );
                match storage.get_progress(enrollment_id).await {
                    Ok(Some(refreshed)) => refreshed,
                    _ => progress,
                }
            }
            Ok(_) => progress,
            Err(e) => {
                tracing::error!("Lazy link failed for enrollment {}: {}", enrollment_id, e);
                progress
            }
        }
    } else {
        progress
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(progress, "Progression chargée")))
}

/// POST /enrollments/{id}/lessons/{lesson_id}/watch
///
/// 观看秒数只增不减；completed 为真时记一次完成时间，重复上报幂等。
pub async fn handle_record_lesson_watch(
    service: &EnrollmentService,
    enrollment_id: i64,
    lesson_id: i64,
    req: LessonWatchRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if req.seconds_watched < 0 {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            "Durée de visionnage invalide",
        )));
    }

    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentification requise",
        )));
    };

    let storage = service.get_storage(request);
    if let Err(resp) = check_enrollment_access(&storage, &user, enrollment_id).await {
        return Ok(resp);
    }

    match storage
        .record_lesson_watch(enrollment_id, lesson_id, req.seconds_watched, req.completed)
        .await
    {
        Ok(true) => Ok(HttpResponse::Ok()
            .json(ApiResponse::<()>::success_empty("Progression enregistrée"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Leçon non liée à cette inscription",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
