use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// GET /dashboard/student/{enrollment_id}
///
/// 学生只能查看自己的注册，教职员工可以查看任意注册。
pub async fn handle_student_overview(
    service: &DashboardService,
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

    match storage.student_overview(enrollment_id).await {
        Ok(Some(overview)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            overview,
            "Tableau de bord chargé",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Inscription introuvable",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
