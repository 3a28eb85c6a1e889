use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::submissions::requests::{GradeSubmissionRequest, SubmitAnswerRequest};
use crate::models::users::entities::UserRole;
use crate::services::GradingService;

static GRADING_SERVICE: Lazy<GradingService> = Lazy::new(GradingService::new_lazy);

pub async fn submit_answer(
    req: HttpRequest,
    path: web::Path<i64>,
    data: web::Json<SubmitAnswerRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .submit_answer(path.into_inner(), data.into_inner(), &req)
        .await
}

pub async fn list_submissions(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .list_submissions(path.into_inner(), &req)
        .await
}

pub async fn grade_submission(
    req: HttpRequest,
    path: web::Path<i64>,
    data: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .grade_submission(path.into_inner(), data.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}/submissions")
                    // 交卷 - 学生（重复提交覆盖草稿）
                    .route(web::post().to(submit_answer))
                    // 查看全部提交 - 教师、教务和校长
                    .route(
                        web::get()
                            .to(list_submissions)
                            .wrap(middlewares::RequireRole::new_any(
                                UserRole::instructor_roles(),
                            )),
                    ),
            ),
    );

    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}/grade")
                    .route(web::put().to(grade_submission))
                    .wrap(middlewares::RequireRole::new_any(
                        UserRole::instructor_roles(),
                    )),
            ),
    );
}
