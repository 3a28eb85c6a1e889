use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{chapters, cohorts, lessons, modules, semester_results, semesters};
use crate::errors::{CampusError, Result};
use crate::models::curriculum::{
    entities::{Chapter, Cohort, Lesson, ModuleUnit, Semester},
    requests::{
        CreateChapterRequest, CreateCohortRequest, CreateLessonRequest, CreateModuleRequest,
        CreateSemesterRequest,
    },
};
use crate::storage::LockOutcome;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建届别，标签唯一
    pub async fn create_cohort_impl(&self, req: CreateCohortRequest) -> Result<Cohort> {
        let existing = Cohorts::find()
            .filter(cohorts::Column::Label.eq(req.label.clone()))
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query cohort failed: {e}")))?;

        if existing.is_some() {
            return Err(CampusError::conflict("Ce libellé de promotion existe déjà"));
        }

        let model = CohortActiveModel {
            label: Set(req.label),
            start_date: Set(req.start_date.timestamp()),
            end_date: Set(req.end_date.timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Create cohort failed: {e}")))?;

        Ok(result.into_cohort())
    }

    /// 通过 ID 获取届别
    pub async fn get_cohort_by_id_impl(&self, id: i64) -> Result<Option<Cohort>> {
        let result = Cohorts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query cohort failed: {e}")))?;

        Ok(result.map(|m| m.into_cohort()))
    }

    /// 列出全部届别
    pub async fn list_cohorts_impl(&self) -> Result<Vec<Cohort>> {
        let rows = Cohorts::find()
            .order_by_asc(cohorts::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("List cohorts failed: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_cohort()).collect())
    }

    /// 创建学期
    pub async fn create_semester_impl(&self, req: CreateSemesterRequest) -> Result<Semester> {
        let model = SemesterActiveModel {
            program_code: Set(req.program_code),
            cohort_id: Set(req.cohort_id),
            name: Set(req.name),
            sort_order: Set(req.sort_order),
            ects_target: Set(req.ects_target),
            is_locked: Set(false),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            CampusError::database_operation(format!("Create semester failed: {e}"))
        })?;

        Ok(result.into_semester())
    }

    /// 通过 ID 获取学期
    pub async fn get_semester_by_id_impl(&self, id: i64) -> Result<Option<Semester>> {
        let result = Semesters::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query semester failed: {e}")))?;

        Ok(result.map(|m| m.into_semester()))
    }

    /// 列出学期
    pub async fn list_semesters_impl(
        &self,
        program_code: Option<String>,
    ) -> Result<Vec<Semester>> {
        let mut select = Semesters::find().order_by_asc(semesters::Column::SortOrder);

        if let Some(code) = program_code {
            select = select.filter(semesters::Column::ProgramCode.eq(code));
        }

        let rows = select
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("List semesters failed: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_semester()).collect())
    }

    /// 锁定学期
    ///
    /// 通过条件更新实现一次性锁定：只有 is_locked = false 的行会被写入时间戳，
    /// 并发或重复调用不会覆盖第一次锁定的 locked_at / locked_by。
    pub async fn lock_semester_impl(
        &self,
        id: i64,
        locked_by: i64,
    ) -> Result<Option<LockOutcome>> {
        if Semesters::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query semester failed: {e}")))?
            .is_none()
        {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let update = Semesters::update_many()
            .col_expr(semesters::Column::IsLocked, Expr::value(true))
            .col_expr(semesters::Column::LockedAt, Expr::value(now))
            .col_expr(semesters::Column::LockedBy, Expr::value(locked_by))
            .filter(semesters::Column::Id.eq(id))
            .filter(semesters::Column::IsLocked.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Lock semester failed: {e}")))?;

        let newly_locked = update.rows_affected > 0;

        if newly_locked {
            // 学期锁定同时冻结其下所有成绩单
            SemesterResults::update_many()
                .col_expr(semester_results::Column::IsLocked, Expr::value(true))
                .col_expr(semester_results::Column::LockedAt, Expr::value(now))
                .col_expr(semester_results::Column::LockedBy, Expr::value(locked_by))
                .filter(semester_results::Column::SemesterId.eq(id))
                .filter(semester_results::Column::IsLocked.eq(false))
                .exec(&self.db)
                .await
                .map_err(|e| {
                    CampusError::database_operation(format!("Lock results failed: {e}"))
                })?;
        }

        let semester = Semesters::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query semester failed: {e}")))?
            .ok_or_else(|| CampusError::not_found("Semestre introuvable"))?;

        Ok(Some(LockOutcome {
            semester: semester.into_semester(),
            newly_locked,
        }))
    }

    /// 创建教学单元
    pub async fn create_module_impl(
        &self,
        semester_id: i64,
        req: CreateModuleRequest,
    ) -> Result<ModuleUnit> {
        let model = ModuleActiveModel {
            semester_id: Set(semester_id),
            code: Set(req.code),
            title: Set(req.title),
            coefficient: Set(req.coefficient),
            credits: Set(req.credits),
            sort_order: Set(req.sort_order),
            is_active: Set(true),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Create module failed: {e}")))?;

        Ok(result.into_module_unit())
    }

    /// 通过 ID 获取教学单元
    pub async fn get_module_by_id_impl(&self, id: i64) -> Result<Option<ModuleUnit>> {
        let result = Modules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query module failed: {e}")))?;

        Ok(result.map(|m| m.into_module_unit()))
    }

    /// 按学期列出教学单元
    pub async fn list_modules_by_semester_impl(&self, semester_id: i64) -> Result<Vec<ModuleUnit>> {
        let rows = Modules::find()
            .filter(modules::Column::SemesterId.eq(semester_id))
            .order_by_asc(modules::Column::SortOrder)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("List modules failed: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_module_unit()).collect())
    }

    /// 获取教学单元的章节/课时树
    pub async fn get_module_tree_impl(
        &self,
        module_id: i64,
    ) -> Result<Option<(ModuleUnit, Vec<Chapter>)>> {
        let Some(module) = Modules::find_by_id(module_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query module failed: {e}")))?
        else {
            return Ok(None);
        };

        let chapter_rows = Chapters::find()
            .filter(chapters::Column::ModuleId.eq(module_id))
            .order_by_asc(chapters::Column::SortOrder)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("List chapters failed: {e}")))?;

        let chapter_ids: Vec<i64> = chapter_rows.iter().map(|c| c.id).collect();
        let lesson_rows = Lessons::find()
            .filter(lessons::Column::ChapterId.is_in(chapter_ids))
            .order_by_asc(lessons::Column::SortOrder)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("List lessons failed: {e}")))?;

        let mut result_chapters: Vec<Chapter> = chapter_rows
            .into_iter()
            .map(|c| c.into_chapter())
            .collect();
        for lesson in lesson_rows {
            if let Some(chapter) = result_chapters
                .iter_mut()
                .find(|c| c.id == lesson.chapter_id)
            {
                chapter.lessons.push(lesson.into_lesson());
            }
        }

        Ok(Some((module.into_module_unit(), result_chapters)))
    }

    /// 创建章节
    pub async fn create_chapter_impl(
        &self,
        module_id: i64,
        req: CreateChapterRequest,
    ) -> Result<Chapter> {
        let model = ChapterActiveModel {
            module_id: Set(module_id),
            title: Set(req.title),
            sort_order: Set(req.sort_order),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Create chapter failed: {e}")))?;

        Ok(result.into_chapter())
    }

    /// 创建课时
    pub async fn create_lesson_impl(
        &self,
        chapter_id: i64,
        req: CreateLessonRequest,
    ) -> Result<Lesson> {
        let model = LessonActiveModel {
            chapter_id: Set(chapter_id),
            title: Set(req.title),
            sort_order: Set(req.sort_order),
            duration_seconds: Set(req.duration_seconds),
            external_url: Set(req.external_url),
            is_published: Set(req.is_published),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Create lesson failed: {e}")))?;

        Ok(result.into_lesson())
    }

    /// 切换课时发布状态
    pub async fn set_lesson_published_impl(
        &self,
        id: i64,
        published: bool,
    ) -> Result<Option<Lesson>> {
        let Some(lesson) = Lessons::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query lesson failed: {e}")))?
        else {
            return Ok(None);
        };

        let mut active: LessonActiveModel = lesson.into();
        active.is_published = Set(published);
        let result = active.update(&self.db).await.map_err(|e| {
            CampusError::database_operation(format!("Update lesson failed: {e}"))
        })?;

        Ok(Some(result.into_lesson()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_semester_with_enrollment};

    #[tokio::test]
    async fn test_lock_semester_is_one_way() {
        let storage = memory_storage().await;
        let (semester_id, _) = seed_semester_with_enrollment(&storage).await;

        let first = storage.lock_semester_impl(semester_id, 3).await.unwrap().unwrap();
        assert!(first.newly_locked);
        assert!(first.semester.is_locked);
        assert_eq!(first.semester.locked_by, Some(3));

        // 重复锁定幂等，不重写第一次的锁定者和时间戳
        let second = storage.lock_semester_impl(semester_id, 4).await.unwrap().unwrap();
        assert!(!second.newly_locked);
        assert_eq!(second.semester.locked_by, Some(3));
        assert_eq!(second.semester.locked_at, first.semester.locked_at);

        assert!(storage.lock_semester_impl(9999, 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lock_semester_freezes_its_results() {
        let storage = memory_storage().await;
        let (semester_id, _) = seed_semester_with_enrollment(&storage).await;

        let outcome = storage
            .compute_semester_results_impl(semester_id, vec![])
            .await
            .unwrap();
        assert!(!outcome.results[0].is_locked);

        storage.lock_semester_impl(semester_id, 3).await.unwrap();

        let results = storage.list_results_by_semester_impl(semester_id).await.unwrap();
        assert!(results[0].is_locked);
        assert_eq!(results[0].locked_by, Some(3));
    }
}
