use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::curriculum::requests::{
    CreateChapterRequest, CreateLessonRequest, PublishLessonRequest,
};
use crate::models::submissions::requests::CreateAssignmentRequest;
use crate::models::users::entities::UserRole;
use crate::services::{CurriculumService, GradingService};

static CURRICULUM_SERVICE: Lazy<CurriculumService> = Lazy::new(CurriculumService::new_lazy);
static GRADING_SERVICE: Lazy<GradingService> = Lazy::new(GradingService::new_lazy);

pub async fn get_module_tree(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .get_module_tree(path.into_inner(), &req)
        .await
}

pub async fn create_chapter(
    req: HttpRequest,
    path: web::Path<i64>,
    data: web::Json<CreateChapterRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .create_chapter(path.into_inner(), data.into_inner(), &req)
        .await
}

pub async fn create_lesson(
    req: HttpRequest,
    path: web::Path<i64>,
    data: web::Json<CreateLessonRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .create_lesson(path.into_inner(), data.into_inner(), &req)
        .await
}

pub async fn publish_lesson(
    req: HttpRequest,
    path: web::Path<i64>,
    data: web::Json<PublishLessonRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .publish_lesson(path.into_inner(), data.into_inner(), &req)
        .await
}

pub async fn create_assignment(
    req: HttpRequest,
    path: web::Path<i64>,
    data: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .create_assignment(path.into_inner(), data.into_inner(), &req)
        .await
}

pub async fn list_assignments(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .list_assignments(path.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_module_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/modules")
            .wrap(middlewares::RequireJWT)
            // 模块树（章节+课程）- 所有登录用户可访问
            .service(web::resource("/{id}").route(web::get().to(get_module_tree)))
            .service(
                web::resource("/{id}/chapters")
                    .route(web::post().to(create_chapter))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            .service(
                web::resource("/{id}/assignments")
                    // 列出测评 - 所有登录用户可访问
                    .route(web::get().to(list_assignments))
                    // 创建测评 - 教师、教务和校长
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(middlewares::RequireRole::new_any(
                                UserRole::instructor_roles(),
                            )),
                    ),
            ),
    );

    cfg.service(
        web::scope("/api/v1/chapters")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}/lessons")
                    .route(web::post().to(create_lesson))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            ),
    );

    cfg.service(
        web::scope("/api/v1/lessons")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}/publish")
                    .route(web::put().to(publish_lesson))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            ),
    );
}
