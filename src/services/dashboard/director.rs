use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::models::ApiResponse;
use crate::services::error_response;

/// GET /dashboard/director
pub async fn handle_director_overview(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.director_overview().await {
        Ok(overview) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            overview,
            "Tableau de bord chargé",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
