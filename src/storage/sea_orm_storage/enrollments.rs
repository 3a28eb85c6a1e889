use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{
    chapters, enrollments, lesson_progress, lessons, module_progress, modules, semesters,
};
use crate::errors::{CampusError, Result};
use crate::models::enrollments::{
    entities::{Enrollment, EnrollmentStatus, LessonProgressEntry, ModuleProgressEntry},
    requests::EnrollStudentRequest,
    responses::ProgressResponse,
};
use crate::storage::LinkStats;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 注册学生并链接进度记录
    ///
    /// 注册本身是幂等的：重复注册返回已有记录，链接只补缺失的进度行。
    pub async fn enroll_student_impl(
        &self,
        req: EnrollStudentRequest,
    ) -> Result<(Enrollment, LinkStats)> {
        let now = chrono::Utc::now().timestamp();

        let model = EnrollmentActiveModel {
            student_id: Set(req.student_id),
            program_code: Set(req.program_code.clone()),
            cohort_id: Set(req.cohort_id),
            status: Set(EnrollmentStatus::Active.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        Enrollments::insert(model)
            .on_conflict(
                OnConflict::columns([
                    enrollments::Column::StudentId,
                    enrollments::Column::ProgramCode,
                    enrollments::Column::CohortId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .do_nothing()
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Enroll failed: {e}")))?;

        // 无论是否新插入，都按唯一键取回当前记录
        let enrollment = Enrollments::find()
            .filter(enrollments::Column::StudentId.eq(req.student_id))
            .filter(enrollments::Column::ProgramCode.eq(req.program_code.clone()))
            .filter(enrollments::Column::CohortId.eq(req.cohort_id))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query enrollment failed: {e}")))?
            .ok_or_else(|| CampusError::database_operation("Enrollment vanished after insert"))?;

        let stats = self.link_enrollment_impl(enrollment.id).await?;

        Ok((enrollment.into_enrollment(), stats))
    }

    /// 通过 ID 获取注册信息
    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query enrollment failed: {e}"))
            })?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 列出某学期涉及的全部注册
    pub async fn list_enrollments_for_semester_impl(
        &self,
        semester_id: i64,
    ) -> Result<Vec<Enrollment>> {
        let Some(semester) = Semesters::find_by_id(semester_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query semester failed: {e}")))?
        else {
            return Ok(Vec::new());
        };

        let rows = Enrollments::find()
            .filter(enrollments::Column::ProgramCode.eq(semester.program_code))
            .filter(enrollments::Column::CohortId.eq(semester.cohort_id))
            .all(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("List enrollments failed: {e}"))
            })?;

        Ok(rows.into_iter().map(|m| m.into_enrollment()).collect())
    }

    /// 为注册补链进度记录（幂等）
    ///
    /// 唯一约束 + ON CONFLICT DO NOTHING 保证并发调用下先写者胜出，
    /// 已有进度（含 percent > 0 的）绝不会被重置。
    pub async fn link_enrollment_impl(&self, enrollment_id: i64) -> Result<LinkStats> {
        let Some(enrollment) = Enrollments::find_by_id(enrollment_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query enrollment failed: {e}")))?
        else {
            return Err(CampusError::not_found("Inscription introuvable"));
        };

        let now = chrono::Utc::now().timestamp();

        // 注册范围内的学期 → 启用的教学单元
        let semester_ids: Vec<i64> = Semesters::find()
            .filter(semesters::Column::ProgramCode.eq(enrollment.program_code.clone()))
            .filter(semesters::Column::CohortId.eq(enrollment.cohort_id))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("List semesters failed: {e}")))?
            .into_iter()
            .map(|s| s.id)
            .collect();

        let module_rows = Modules::find()
            .filter(modules::Column::SemesterId.is_in(semester_ids))
            .filter(modules::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("List modules failed: {e}")))?;

        let module_ids: Vec<i64> = module_rows.iter().map(|m| m.id).collect();

        let mut modules_linked = 0u64;
        if !module_ids.is_empty() {
            let progress_models: Vec<ModuleProgressActiveModel> = module_ids
                .iter()
                .map(|module_id| ModuleProgressActiveModel {
                    enrollment_id: Set(enrollment_id),
                    module_id: Set(*module_id),
                    percent: Set(0.0),
                    updated_at: Set(now),
                    ..Default::default()
                })
                .collect();

            modules_linked = ModuleProgress::insert_many(progress_models)
                .on_conflict(
                    OnConflict::columns([
                        module_progress::Column::EnrollmentId,
                        module_progress::Column::ModuleId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await
                .map_err(|e| {
                    CampusError::database_operation(format!("Link module progress failed: {e}"))
                })?;
        }

        // 已发布课时 → 课时进度
        let chapter_ids: Vec<i64> = Chapters::find()
            .filter(chapters::Column::ModuleId.is_in(module_ids))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("List chapters failed: {e}")))?
            .into_iter()
            .map(|c| c.id)
            .collect();

        let lesson_ids: Vec<i64> = Lessons::find()
            .filter(lessons::Column::ChapterId.is_in(chapter_ids))
            .filter(lessons::Column::IsPublished.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("List lessons failed: {e}")))?
            .into_iter()
            .map(|l| l.id)
            .collect();

        let mut lessons_linked = 0u64;
        if !lesson_ids.is_empty() {
            let progress_models: Vec<LessonProgressActiveModel> = lesson_ids
                .iter()
                .map(|lesson_id| LessonProgressActiveModel {
                    enrollment_id: Set(enrollment_id),
                    lesson_id: Set(*lesson_id),
                    completed_at: Set(None),
                    seconds_watched: Set(0),
                    ..Default::default()
                })
                .collect();

            lessons_linked = LessonProgress::insert_many(progress_models)
                .on_conflict(
                    OnConflict::columns([
                        lesson_progress::Column::EnrollmentId,
                        lesson_progress::Column::LessonId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await
                .map_err(|e| {
                    CampusError::database_operation(format!("Link lesson progress failed: {e}"))
                })?;
        }

        Ok(LinkStats {
            modules_linked,
            lessons_linked,
        })
    }

    /// 课时发布后为相关注册补链课时进度
    pub async fn link_published_lesson_impl(&self, lesson_id: i64) -> Result<u64> {
        let Some(lesson) = Lessons::find_by_id(lesson_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query lesson failed: {e}")))?
        else {
            return Ok(0);
        };
        if !lesson.is_published {
            return Ok(0);
        }

        // lesson → chapter → module → semester 确定课程/届别范围
        let Some(chapter) = Chapters::find_by_id(lesson.chapter_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query chapter failed: {e}")))?
        else {
            return Ok(0);
        };
        let Some(module) = Modules::find_by_id(chapter.module_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query module failed: {e}")))?
        else {
            return Ok(0);
        };
        let Some(semester) = Semesters::find_by_id(module.semester_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query semester failed: {e}")))?
        else {
            return Ok(0);
        };

        let enrollment_ids: Vec<i64> = Enrollments::find()
            .filter(enrollments::Column::ProgramCode.eq(semester.program_code))
            .filter(enrollments::Column::CohortId.eq(semester.cohort_id))
            .all(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("List enrollments failed: {e}"))
            })?
            .into_iter()
            .map(|e| e.id)
            .collect();

        if enrollment_ids.is_empty() {
            return Ok(0);
        }

        let progress_models: Vec<LessonProgressActiveModel> = enrollment_ids
            .iter()
            .map(|enrollment_id| LessonProgressActiveModel {
                enrollment_id: Set(*enrollment_id),
                lesson_id: Set(lesson_id),
                completed_at: Set(None),
                seconds_watched: Set(0),
                ..Default::default()
            })
            .collect();

        let linked = LessonProgress::insert_many(progress_models)
            .on_conflict(
                OnConflict::columns([
                    lesson_progress::Column::EnrollmentId,
                    lesson_progress::Column::LessonId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Link lesson progress failed: {e}"))
            })?;

        Ok(linked)
    }

    /// 获取注册的进度详情
    pub async fn get_progress_impl(&self, enrollment_id: i64) -> Result<Option<ProgressResponse>> {
        if Enrollments::find_by_id(enrollment_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query enrollment failed: {e}")))?
            .is_none()
        {
            return Ok(None);
        }

        let module_rows = ModuleProgress::find()
            .filter(module_progress::Column::EnrollmentId.eq(enrollment_id))
            .find_also_related(Modules)
            .all(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("List module progress failed: {e}"))
            })?;

        let modules = module_rows
            .into_iter()
            .filter_map(|(progress, module)| {
                module.map(|m| ModuleProgressEntry {
                    module_id: m.id,
                    module_code: m.code,
                    module_title: m.title,
                    percent: progress.percent,
                })
            })
            .collect();

        let lesson_rows = LessonProgress::find()
            .filter(lesson_progress::Column::EnrollmentId.eq(enrollment_id))
            .find_also_related(Lessons)
            .all(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("List lesson progress failed: {e}"))
            })?;

        let lessons = lesson_rows
            .into_iter()
            .filter_map(|(progress, lesson)| {
                lesson.map(|l| LessonProgressEntry {
                    lesson_id: l.id,
                    lesson_title: l.title,
                    seconds_watched: progress.seconds_watched,
                    completed_at: progress.completed_at.map(|ts| {
                        chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0).unwrap_or_default()
                    }),
                })
            })
            .collect();

        Ok(Some(ProgressResponse {
            enrollment_id,
            modules,
            lessons,
        }))
    }

    /// 上报课时观看进度，并重算所属教学单元的完成百分比
    pub async fn record_lesson_watch_impl(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
        seconds_watched: i64,
        completed: bool,
    ) -> Result<bool> {
        let Some(progress) = LessonProgress::find()
            .filter(lesson_progress::Column::EnrollmentId.eq(enrollment_id))
            .filter(lesson_progress::Column::LessonId.eq(lesson_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query lesson progress failed: {e}"))
            })?
        else {
            return Ok(false);
        };

        let now = chrono::Utc::now().timestamp();
        let already_completed = progress.completed_at.is_some();
        let best_seconds = progress.seconds_watched.max(seconds_watched);

        let mut active: LessonProgressActiveModel = progress.into();
        active.seconds_watched = Set(best_seconds);
        if completed && !already_completed {
            active.completed_at = Set(Some(now));
        }
        active
            .update(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Update lesson progress failed: {e}"))
            })?;

        self.recompute_module_percent(enrollment_id, lesson_id, now)
            .await?;

        Ok(true)
    }

    /// 以已发布课时的完成比例刷新模块进度
    async fn recompute_module_percent(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
        now: i64,
    ) -> Result<()> {
        let Some(lesson) = Lessons::find_by_id(lesson_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query lesson failed: {e}")))?
        else {
            return Ok(());
        };
        let Some(chapter) = Chapters::find_by_id(lesson.chapter_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query chapter failed: {e}")))?
        else {
            return Ok(());
        };
        let module_id = chapter.module_id;

        let chapter_ids: Vec<i64> = Chapters::find()
            .filter(chapters::Column::ModuleId.eq(module_id))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("List chapters failed: {e}")))?
            .into_iter()
            .map(|c| c.id)
            .collect();

        let published_ids: Vec<i64> = Lessons::find()
            .filter(lessons::Column::ChapterId.is_in(chapter_ids))
            .filter(lessons::Column::IsPublished.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("List lessons failed: {e}")))?
            .into_iter()
            .map(|l| l.id)
            .collect();

        if published_ids.is_empty() {
            return Ok(());
        }

        let completed = LessonProgress::find()
            .filter(lesson_progress::Column::EnrollmentId.eq(enrollment_id))
            .filter(lesson_progress::Column::LessonId.is_in(published_ids.clone()))
            .filter(lesson_progress::Column::CompletedAt.is_not_null())
            .all(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Count lesson progress failed: {e}"))
            })?
            .len();

        let percent = (completed as f64 / published_ids.len() as f64 * 100.0).clamp(0.0, 100.0);

        ModuleProgress::update_many()
            .col_expr(module_progress::Column::Percent, Expr::value(percent))
            .col_expr(module_progress::Column::UpdatedAt, Expr::value(now))
            .filter(module_progress::Column::EnrollmentId.eq(enrollment_id))
            .filter(module_progress::Column::ModuleId.eq(module_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Update module progress failed: {e}"))
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::models::curriculum::requests::{CreateCohortRequest, CreateModuleRequest, CreateSemesterRequest};
    use crate::models::enrollments::requests::EnrollStudentRequest;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};

    #[tokio::test]
    async fn test_enroll_and_relink_are_idempotent() {
        let storage = memory_storage().await;

        let student = storage
            .create_user_impl(CreateUserRequest {
                username: "moussa".to_string(),
                email: "moussa@esfe-mali.edu.ml".to_string(),
                password: "not-a-real-hash".to_string(),
                role: UserRole::Student,
                display_name: None,
            })
            .await
            .unwrap();

        let cohort = storage
            .create_cohort_impl(CreateCohortRequest {
                label: "2025-2027".to_string(),
                start_date: chrono::Utc::now(),
                end_date: chrono::Utc::now() + chrono::Duration::days(730),
            })
            .await
            .unwrap();

        let semester = storage
            .create_semester_impl(CreateSemesterRequest {
                program_code: "MRH".to_string(),
                cohort_id: cohort.id,
                name: "Semestre 1".to_string(),
                sort_order: 1,
                ects_target: 30,
            })
            .await
            .unwrap();

        storage
            .create_module_impl(
                semester.id,
                CreateModuleRequest {
                    code: "UE11".to_string(),
                    title: "Gestion des ressources humaines".to_string(),
                    coefficient: 2.0,
                    credits: 6.0,
                    sort_order: 1,
                },
            )
            .await
            .unwrap();

        let (enrollment, stats) = storage
            .enroll_student_impl(EnrollStudentRequest {
                student_id: student.id,
                program_code: "MRH".to_string(),
                cohort_id: cohort.id,
            })
            .await
            .unwrap();
        assert_eq!(stats.modules_linked, 1);

        // 重复注册返回同一条记录，不再补链任何进度行
        let (again, stats_again) = storage
            .enroll_student_impl(EnrollStudentRequest {
                student_id: student.id,
                program_code: "MRH".to_string(),
                cohort_id: cohort.id,
            })
            .await
            .unwrap();
        assert_eq!(again.id, enrollment.id);
        assert_eq!(stats_again.modules_linked, 0);
        assert_eq!(stats_again.lessons_linked, 0);

        let relinked = storage.link_enrollment_impl(enrollment.id).await.unwrap();
        assert_eq!(relinked.modules_linked, 0);
        assert_eq!(relinked.lessons_linked, 0);
    }
}
