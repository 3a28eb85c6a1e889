pub mod enroll;
pub mod progress;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::enrollments::requests::{EnrollStudentRequest, LessonWatchRequest};
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
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

    pub async fn enroll_student(
        &self,
        req: EnrollStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enroll::handle_enroll_student(self, req, request).await
    }

    pub async fn relink_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enroll::handle_relink_enrollment(self, enrollment_id, request).await
    }

    pub async fn get_progress(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        progress::handle_get_progress(self, enrollment_id, request).await
    }

    pub async fn record_lesson_watch(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
        req: LessonWatchRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        progress::handle_record_lesson_watch(self, enrollment_id, lesson_id, req, request).await
    }
}
