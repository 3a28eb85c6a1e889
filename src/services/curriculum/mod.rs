pub mod cohorts;
pub mod lessons;
pub mod lock;
pub mod modules;
pub mod semesters;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::curriculum::requests::{
    CreateChapterRequest, CreateCohortRequest, CreateLessonRequest, CreateModuleRequest,
    CreateSemesterRequest, PublishLessonRequest,
};
use crate::storage::Storage;

pub struct CurriculumService {
    storage: Option<Arc<dyn Storage>>,
}

impl CurriculumService {
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

    pub async fn create_cohort(
        &self,
        req: CreateCohortRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        cohorts::handle_create_cohort(self, req, request).await
    }

    pub async fn list_cohorts(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        cohorts::handle_list_cohorts(self, request).await
    }

    pub async fn create_semester(
        &self,
        req: CreateSemesterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        semesters::handle_create_semester(self, req, request).await
    }

    pub async fn list_semesters(
        &self,
        program_code: Option<String>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        semesters::handle_list_semesters(self, program_code, request).await
    }

    pub async fn get_semester(
        &self,
        semester_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        semesters::handle_get_semester(self, semester_id, request).await
    }

    pub async fn lock_semester(
        &self,
        semester_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lock::handle_lock_semester(self, semester_id, request).await
    }

    pub async fn create_module(
        &self,
        semester_id: i64,
        req: CreateModuleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        modules::handle_create_module(self, semester_id, req, request).await
    }

    pub async fn get_module_tree(
        &self,
        module_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        modules::handle_get_module_tree(self, module_id, request).await
    }

    pub async fn create_chapter(
        &self,
        module_id: i64,
        req: CreateChapterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lessons::handle_create_chapter(self, module_id, req, request).await
    }

    pub async fn create_lesson(
        &self,
        chapter_id: i64,
        req: CreateLessonRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lessons::handle_create_lesson(self, chapter_id, req, request).await
    }

    pub async fn publish_lesson(
        &self,
        lesson_id: i64,
        req: PublishLessonRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lessons::handle_publish_lesson(self, lesson_id, req, request).await
    }
}
