use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CurriculumService;
use crate::models::curriculum::requests::{
    CreateChapterRequest, CreateLessonRequest, PublishLessonRequest,
};
use crate::models::curriculum::responses::{ChapterResponse, LessonResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// POST /modules/{id}/chapters
pub async fn handle_create_chapter(
    service: &CurriculumService,
    module_id: i64,
    req: CreateChapterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if req.title.trim().is_empty() {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            "Le titre du chapitre est obligatoire",
        )));
    }

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

    match storage.create_chapter(module_id, req).await {
        Ok(chapter) => Ok(HttpResponse::Created().json(ApiResponse::success(
            ChapterResponse { chapter },
            "Chapitre créé",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// POST /chapters/{id}/lessons
pub async fn handle_create_lesson(
    service: &CurriculumService,
    chapter_id: i64,
    req: CreateLessonRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if req.title.trim().is_empty() {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            "Le titre de la leçon est obligatoire",
        )));
    }

    let storage = service.get_storage(request);
    let publish_on_create = req.is_published;

    match storage.create_lesson(chapter_id, req).await {
        Ok(lesson) => {
            // 创建即发布的课时也要为已有注册补链进度
            if publish_on_create {
                match storage.link_published_lesson(lesson.id).await {
                    Ok(linked) => tracing::info!(
                        "Lesson {} published on create, linked {} progress rows",
                        lesson.id,
                        linked
                    ),
                    Err(e) => tracing::error!(
                        "Failed to link progress for new lesson {}: {}",
                        lesson.id,
                        e
                    ),
                }
            }
            Ok(HttpResponse::Created().json(ApiResponse::success(
                LessonResponse { lesson },
                "Leçon créée",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

/// PUT /lessons/{id}/publish
///
/// 发布会为范围内所有注册补链课时进度；撤销发布只隐藏课时，不删进度。
pub async fn handle_publish_lesson(
    service: &CurriculumService,
    lesson_id: i64,
    req: PublishLessonRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.set_lesson_published(lesson_id, req.is_published).await {
        Ok(Some(lesson)) => {
            if lesson.is_published {
                match storage.link_published_lesson(lesson.id).await {
                    Ok(linked) => tracing::info!(
                        "Lesson {} published, linked {} progress rows",
                        lesson.id,
                        linked
                    ),
                    Err(e) => {
                        tracing::error!("Failed to link progress for lesson {}: {}", lesson.id, e)
                    }
                }
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                LessonResponse { lesson },
                "Leçon mise à jour",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Leçon introuvable",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
