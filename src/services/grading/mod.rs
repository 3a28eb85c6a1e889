pub mod assignments;
pub mod grade;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::submissions::requests::{
    CreateAssignmentRequest, GradeSubmissionRequest, SubmitAnswerRequest,
};
use crate::storage::Storage;

pub struct GradingService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradingService {
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

    pub async fn create_assignment(
        &self,
        module_id: i64,
        req: CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::handle_create_assignment(self, module_id, req, request).await
    }

    pub async fn list_assignments(
        &self,
        module_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::handle_list_assignments(self, module_id, request).await
    }

    pub async fn list_submissions(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::handle_list_submissions(self, assignment_id, request).await
    }

    pub async fn submit_answer(
        &self,
        assignment_id: i64,
        req: SubmitAnswerRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::handle_submit_answer(self, assignment_id, req, request).await
    }

    pub async fn grade_submission(
        &self,
        submission_id: i64,
        req: GradeSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade::handle_grade_submission(self, submission_id, req, request).await
    }
}
