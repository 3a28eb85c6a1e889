use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::DashboardService;

static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn student_overview(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE
        .student_overview(path.into_inner(), &req)
        .await
}

pub async fn director_overview(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.director_overview(&req).await
}

// 配置路由
pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/dashboard")
            .wrap(middlewares::RequireJWT)
            // 学生总览 - 归属校验在业务层
            .service(
                web::resource("/student/{enrollment_id}").route(web::get().to(student_overview)),
            )
            // 校长总览 - 仅校长
            .service(
                web::resource("/director")
                    .route(web::get().to(director_overview))
                    .wrap(middlewares::RequireRole::new_any(UserRole::director_roles())),
            ),
    );
}
