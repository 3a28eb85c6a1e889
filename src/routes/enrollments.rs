use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::enrollments::requests::{EnrollStudentRequest, LessonWatchRequest};
use crate::models::users::entities::UserRole;
use crate::services::{EnrollmentService, ResultService};

static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);
static RESULT_SERVICE: Lazy<ResultService> = Lazy::new(ResultService::new_lazy);

pub async fn enroll_student(
    req: HttpRequest,
    data: web::Json<EnrollStudentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .enroll_student(data.into_inner(), &req)
        .await
}

pub async fn relink_enrollment(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .relink_enrollment(path.into_inner(), &req)
        .await
}

pub async fn get_progress(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.get_progress(path.into_inner(), &req).await
}

pub async fn record_lesson_watch(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    data: web::Json<LessonWatchRequest>,
) -> ActixResult<HttpResponse> {
    let (enrollment_id, lesson_id) = path.into_inner();
    ENROLLMENT_SERVICE
        .record_lesson_watch(enrollment_id, lesson_id, data.into_inner(), &req)
        .await
}

pub async fn list_results(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.list_by_enrollment(path.into_inner(), &req).await
}

// 配置路由
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            // 注册学生 - 仅教务和校长
            .service(
                web::resource("")
                    .route(web::post().to(enroll_student))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            // 手动重链接在读内容 - 仅教务和校长
            .service(
                web::resource("/{id}/link")
                    .route(web::post().to(relink_enrollment))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            // 进度与成绩 - 学生本人或教职员工，归属校验在业务层
            .service(web::resource("/{id}/progress").route(web::get().to(get_progress)))
            .service(web::resource("/{id}/results").route(web::get().to(list_results)))
            .service(
                web::resource("/{id}/lessons/{lesson_id}/watch")
                    .route(web::post().to(record_lesson_watch)),
            ),
    );
}
