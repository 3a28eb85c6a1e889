use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{
    assignments, enrollments, lesson_progress, module_progress, modules, semesters, submissions,
    users,
};
use crate::errors::{CampusError, Result};
use crate::models::dashboard::responses::{
    DecisionBreakdown, DirectorOverviewResponse, StudentOverviewResponse,
};
use crate::models::enrollments::entities::EnrollmentStatus;
use crate::models::results::entities::Decision;
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::users::entities::UserRole;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use std::collections::HashSet;

impl SeaOrmStorage {
    /// 学生端总览：进度计数、待做测评数与历次成绩单
    pub async fn student_overview_impl(
        &self,
        enrollment_id: i64,
    ) -> Result<Option<StudentOverviewResponse>> {
        let Some(enrollment) = Enrollments::find_by_id(enrollment_id)
            .one(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query enrollment failed: {e}"))
            })?
        else {
            return Ok(None);
        };

        let module_rows = ModuleProgress::find()
            .filter(module_progress::Column::EnrollmentId.eq(enrollment_id))
            .all(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query module progress failed: {e}"))
            })?;
        let modules_total = module_rows.len() as u64;
        let modules_completed = module_rows.iter().filter(|m| m.percent >= 100.0).count() as u64;

        let lesson_rows = LessonProgress::find()
            .filter(lesson_progress::Column::EnrollmentId.eq(enrollment_id))
            .all(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query lesson progress failed: {e}"))
            })?;
        let lessons_total = lesson_rows.len() as u64;
        let lessons_completed = lesson_rows
            .iter()
            .filter(|l| l.completed_at.is_some())
            .count() as u64;

        let pending_assignments = self
            .count_pending_assignments(&enrollment)
            .await?;

        let results = self.list_results_by_enrollment_impl(enrollment_id).await?;

        Ok(Some(StudentOverviewResponse {
            enrollment_id,
            program_code: enrollment.program_code,
            modules_total,
            modules_completed,
            lessons_total,
            lessons_completed,
            pending_assignments,
            results,
        }))
    }

    /// 注册范围内已发布但学生尚未提交的测评数
    async fn count_pending_assignments(
        &self,
        enrollment: &crate::entity::enrollments::Model,
    ) -> Result<u64> {
        let semester_rows = Semesters::find()
            .filter(semesters::Column::ProgramCode.eq(enrollment.program_code.clone()))
            .filter(semesters::Column::CohortId.eq(enrollment.cohort_id))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query semesters failed: {e}")))?;
        let semester_ids: Vec<i64> = semester_rows.iter().map(|s| s.id).collect();
        if semester_ids.is_empty() {
            return Ok(0);
        }

        let module_rows = Modules::find()
            .filter(modules::Column::SemesterId.is_in(semester_ids))
            .filter(modules::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query modules failed: {e}")))?;
        let module_ids: Vec<i64> = module_rows.iter().map(|m| m.id).collect();
        if module_ids.is_empty() {
            return Ok(0);
        }

        let assignment_rows = Assignments::find()
            .filter(assignments::Column::ModuleId.is_in(module_ids))
            .filter(assignments::Column::IsPublished.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query assignments failed: {e}"))
            })?;
        let assignment_ids: Vec<i64> = assignment_rows.iter().map(|a| a.id).collect();
        if assignment_ids.is_empty() {
            return Ok(0);
        }

        let submitted: HashSet<i64> = Submissions::find()
            .filter(submissions::Column::AssignmentId.is_in(assignment_ids.clone()))
            .filter(submissions::Column::StudentId.eq(enrollment.student_id))
            .all(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query submissions failed: {e}"))
            })?
            .into_iter()
            .map(|s| s.assignment_id)
            .collect();

        Ok(assignment_ids
            .iter()
            .filter(|id| !submitted.contains(id))
            .count() as u64)
    }

    /// 校长端总览：全校计数与评审决定分布
    pub async fn director_overview_impl(&self) -> Result<DirectorOverviewResponse> {
        let students_total = Users::find()
            .filter(users::Column::Role.eq(UserRole::Student.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Count students failed: {e}")))?;

        let enrollments_active = Enrollments::find()
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Count enrollments failed: {e}"))
            })?;

        let semesters_total = Semesters::find()
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Count semesters failed: {e}")))?;

        let semesters_locked = Semesters::find()
            .filter(semesters::Column::IsLocked.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Count semesters failed: {e}")))?;

        let submissions_pending_grading = Submissions::find()
            .filter(submissions::Column::Status.eq(SubmissionStatus::Submitted.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Count submissions failed: {e}"))
            })?;

        let result_rows = SemesterResults::find()
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query results failed: {e}")))?;

        let mut decisions = DecisionBreakdown::default();
        for row in &result_rows {
            match row
                .decision
                .as_deref()
                .map(|d| d.parse::<Decision>())
            {
                Some(Ok(Decision::Adm)) => decisions.admitted += 1,
                Some(Ok(Decision::Aj)) => decisions.adjourned += 1,
                Some(Ok(Decision::Rat)) => decisions.remedial += 1,
                Some(Ok(Decision::Exc)) => decisions.excluded += 1,
                _ => decisions.undecided += 1,
            }
        }

        Ok(DirectorOverviewResponse {
            students_total,
            enrollments_active,
            semesters_total,
            semesters_locked,
            submissions_pending_grading,
            decisions,
        })
    }
}
