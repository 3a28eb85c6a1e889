use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CurriculumService;
use crate::models::curriculum::requests::CreateModuleRequest;
use crate::models::curriculum::responses::{ModuleDetailResponse, ModuleResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// POST /semesters/{id}/modules
pub async fn handle_create_module(
    service: &CurriculumService,
    semester_id: i64,
    req: CreateModuleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if req.title.trim().is_empty() || req.code.trim().is_empty() {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            "Le code et le titre de l'unité sont obligatoires",
        )));
    }
    if req.coefficient <= 0.0 || req.credits < 0.0 {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            "Coefficient ou crédits invalides",
        )));
    }

    let storage = service.get_storage(request);

    // 学期必须存在
    match storage.get_semester_by_id(semester_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotFound,
                "Semestre introuvable",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.create_module(semester_id, req).await {
        Ok(module) => Ok(HttpResponse::Created().json(ApiResponse::success(
            ModuleResponse { module },
            "Unité d'enseignement créée",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// GET /modules/{id}，返回章节/课时树
pub async fn handle_get_module_tree(
    service: &CurriculumService,
    module_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.get_module_tree(module_id).await {
        Ok(Some((module, chapters))) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ModuleDetailResponse { module, chapters },
            "Unité chargée",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Unité d'enseignement introuvable",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
