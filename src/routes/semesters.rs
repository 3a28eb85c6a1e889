use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::curriculum::requests::{
    CreateCohortRequest, CreateModuleRequest, CreateSemesterRequest, SemesterListQuery,
};
use crate::models::results::requests::{ComputeResultsRequest, ResultListQuery};
use crate::models::users::entities::UserRole;
use crate::services::{CurriculumService, ResultService};

static CURRICULUM_SERVICE: Lazy<CurriculumService> = Lazy::new(CurriculumService::new_lazy);
static RESULT_SERVICE: Lazy<ResultService> = Lazy::new(ResultService::new_lazy);

pub async fn create_cohort(
    req: HttpRequest,
    data: web::Json<CreateCohortRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.create_cohort(data.into_inner(), &req).await
}

pub async fn list_cohorts(req: HttpRequest) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.list_cohorts(&req).await
}

pub async fn create_semester(
    req: HttpRequest,
    data: web::Json<CreateSemesterRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .create_semester(data.into_inner(), &req)
        .await
}

pub async fn list_semesters(
    req: HttpRequest,
    query: web::Query<SemesterListQuery>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .list_semesters(query.into_inner().program, &req)
        .await
}

pub async fn get_semester(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.get_semester(path.into_inner(), &req).await
}

pub async fn lock_semester(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .lock_semester(path.into_inner(), &req)
        .await
}

pub async fn create_module(
    req: HttpRequest,
    path: web::Path<i64>,
    data: web::Json<CreateModuleRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .create_module(path.into_inner(), data.into_inner(), &req)
        .await
}

pub async fn compute_results(
    req: HttpRequest,
    path: web::Path<i64>,
    data: web::Json<ComputeResultsRequest>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .compute_results(path.into_inner(), data.into_inner(), &req)
        .await
}

pub async fn lock_result(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.lock_result(path.into_inner(), &req).await
}

pub async fn list_results(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<ResultListQuery>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .list_by_semester(path.into_inner(), query.into_inner().decision, &req)
        .await
}

// 配置路由
pub fn configure_semester_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/cohorts")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列出届别 - 所有登录用户可访问
                    .route(web::get().to(list_cohorts))
                    // 创建届别 - 仅教务和校长
                    .route(
                        web::post()
                            .to(create_cohort)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            ),
    );
    cfg.service(
        web::scope("/api/v1/semesters")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列出学期 - 所有登录用户可访问
                    .route(web::get().to(list_semesters))
                    // 创建学期 - 仅教务和校长
                    .route(
                        web::post()
                            .to(create_semester)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(web::resource("/{id}").route(web::get().to(get_semester)))
            // 锁定学期 - 仅校长，锁定后成绩不可再改
            .service(
                web::resource("/{id}/lock")
                    .route(web::post().to(lock_semester))
                    .wrap(middlewares::RequireRole::new_any(UserRole::director_roles())),
            )
            .service(
                web::resource("/{id}/modules")
                    .route(web::post().to(create_module))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            // 成绩单列表 - 教师、教务和校长
            .service(
                web::resource("/{id}/results")
                    .route(web::get().to(list_results))
                    .wrap(middlewares::RequireRole::new_any(
                        UserRole::instructor_roles(),
                    )),
            )
            // 重算成绩单 - 仅校长
            .service(
                web::resource("/{id}/results/compute")
                    .route(web::post().to(compute_results))
                    .wrap(middlewares::RequireRole::new_any(UserRole::director_roles())),
            ),
    );
    cfg.service(
        web::scope("/api/v1/results")
            .wrap(middlewares::RequireJWT)
            // 锁定单个成绩单 - 仅校长
            .service(
                web::resource("/{id}/lock")
                    .route(web::post().to(lock_result))
                    .wrap(middlewares::RequireRole::new_any(UserRole::director_roles())),
            ),
    );
}
