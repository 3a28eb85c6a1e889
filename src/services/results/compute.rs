use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ResultService;
use crate::models::results::requests::ComputeResultsRequest;
use crate::models::results::responses::ComputeResultsResponse;
use crate::models::ApiResponse;
use crate::services::error_response;

/// POST /semesters/{id}/results/compute
///
/// enrollment_ids 为空时对学期内全部注册重算。锁定前可重复执行并覆盖，
/// 学期锁定后整体以 423 拒绝。
pub async fn handle_compute_results(
    service: &ResultService,
    semester_id: i64,
    req: ComputeResultsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .compute_semester_results(semester_id, req.enrollment_ids)
        .await
    {
        Ok(outcome) => {
            tracing::info!(
                "Computed {} results for semester {} ({} locked rows skipped)",
                outcome.computed,
                semester_id,
                outcome.skipped_locked
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ComputeResultsResponse {
                    semester_id,
                    computed: outcome.computed,
                    skipped_locked: outcome.skipped_locked,
                    results: outcome.results,
                },
                "Moyennes calculées",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
