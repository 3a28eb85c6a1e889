use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CurriculumService;
use crate::models::curriculum::requests::CreateSemesterRequest;
use crate::models::curriculum::responses::{
    SemesterDetailResponse, SemesterListResponse, SemesterResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::utils::validate::validate_program_code;

/// POST /semesters
pub async fn handle_create_semester(
    service: &CurriculumService,
    req: CreateSemesterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_program_code(&req.program_code) {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            msg,
        )));
    }
    if req.name.trim().is_empty() {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            "Le nom du semestre est obligatoire",
        )));
    }

    let storage = service.get_storage(request);

    // 届别必须存在，否则外键约束会以 500 形式暴露出来
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

    match storage.create_semester(req).await {
        Ok(semester) => Ok(HttpResponse::Created().json(ApiResponse::success(
            SemesterResponse { semester },
            "Semestre créé",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// GET /semesters?program_code=
pub async fn handle_list_semesters(
    service: &CurriculumService,
    program_code: Option<String>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.list_semesters(program_code).await {
        Ok(semesters) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SemesterListResponse { semesters },
            "Semestres chargés",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// GET /semesters/{id}，模块按 sort_order 排列
pub async fn handle_get_semester(
    service: &CurriculumService,
    semester_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let semester = match storage.get_semester_by_id(semester_id).await {
        Ok(Some(semester)) => semester,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotFound,
                "Semestre introuvable",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    match storage.list_modules_by_semester(semester_id).await {
        Ok(modules) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SemesterDetailResponse { semester, modules },
            "Semestre chargé",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
