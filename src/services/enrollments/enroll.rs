use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::enrollments::requests::EnrollStudentRequest;
use crate::models::enrollments::responses::EnrollmentResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::utils::validate::validate_program_code;

/// POST /enrollments
///
/// 注册是幂等的：同一 (学生, 课程, 届别) 重复注册返回已有记录，
/// 链接统计只计入本次新建的进度行。
pub async fn handle_enroll_student(
    service: &EnrollmentService,
    req: EnrollStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_program_code(&req.program_code) {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            msg,
        )));
    }

    let storage = service.get_storage(request);

    // 学生必须存在且角色正确
    match storage.get_user_by_id(req.student_id).await {
        Ok(Some(user)) if user.role == UserRole::Student => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
                ErrorCode::UnprocessableEntity,
                "Seul un compte étudiant peut être inscrit",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotFound,
                "Étudiant introuvable",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.get_cohort_by_id(req.cohort_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
                ErrorCode::UnprocessableEntity,
                "Promotion introuvable",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.enroll_student(req).await {
        Ok((enrollment, stats)) => {
            tracing::info!(
                "Enrollment {} linked: {} modules, {} lessons",
                enrollment.id,
                stats.modules_linked,
                stats.lessons_linked
            );
            let message = if stats.modules_linked == 0 {
                // 零模块匹配也是合法结果，让调用方知道没有激活内容
                "Inscription enregistrée, aucun contenu actif pour ce parcours"
            } else {
                "Inscription enregistrée"
            };
            Ok(HttpResponse::Created().json(ApiResponse::success(
                EnrollmentResponse {
                    enrollment,
                    modules_linked: stats.modules_linked,
                    lessons_linked: stats.lessons_linked,
                },
                message,
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

/// POST /enrollments/{id}/link
///
/// 手工补链，课程结构在注册之后才建好时使用。
pub async fn handle_relink_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let enrollment = match storage.get_enrollment_by_id(enrollment_id).await {
        Ok(Some(enrollment)) => enrollment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotFound,
                "Inscription introuvable",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    match storage.link_enrollment(enrollment_id).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EnrollmentResponse {
                enrollment,
                modules_linked: stats.modules_linked,
                lessons_linked: stats.lessons_linked,
            },
            "Liaison des progressions effectuée",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
