pub mod compute;
pub mod list;
pub mod lock;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::results::requests::ComputeResultsRequest;
use crate::storage::Storage;

pub struct ResultService {
    storage: Option<Arc<dyn Storage>>,
}

impl ResultService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn compute_results(
        &self,
        semester_id: i64,
        req: ComputeResultsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        compute::handle_compute_results(self, semester_id, req, request).await
    }

    pub async fn lock_result(
        &self,
        result_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lock::handle_lock_result(self, result_id, request).await
    }

    pub async fn list_by_semester(
        &self,
        semester_id: i64,
        decision: Option<String>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_by_semester(self, semester_id, decision, request).await
    }

    pub async fn list_by_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_by_enrollment(self, enrollment_id, request).await
    }
}
