use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{assignments, submissions};
use crate::errors::{CampusError, Result};
use crate::models::submissions::{
    entities::{Assignment, Submission, SubmissionStatus},
    requests::CreateAssignmentRequest,
};
use crate::utils::note::normalize_note_20;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建测评
    pub async fn create_assignment_impl(
        &self,
        module_id: i64,
        req: CreateAssignmentRequest,
        created_by: i64,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = AssignmentActiveModel {
            module_id: Set(module_id),
            kind: Set(req.kind.to_string()),
            eval_kind: Set(req.eval_kind.to_string()),
            title: Set(req.title),
            description: Set(req.description),
            total_points: Set(req.total_points),
            coefficient: Set(req.coefficient),
            is_published: Set(req.is_published),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            CampusError::database_operation(format!("Create assignment failed: {e}"))
        })?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取测评
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query assignment failed: {e}"))
            })?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 按教学单元列出测评
    pub async fn list_assignments_by_module_impl(&self, module_id: i64) -> Result<Vec<Assignment>> {
        let rows = Assignments::find()
            .filter(assignments::Column::ModuleId.eq(module_id))
            .order_by_asc(assignments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("List assignments failed: {e}"))
            })?;

        Ok(rows.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 学生提交答案
    ///
    /// (assignment, student) 唯一，重复提交覆盖旧答案；已评分的提交不再接受覆盖。
    pub async fn submit_answer_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        answer_text: String,
    ) -> Result<Submission> {
        self.ensure_assignment_unlocked(assignment_id).await?;

        let now = chrono::Utc::now().timestamp();

        let existing = Submissions::find()
            .filter(submissions::Column::AssignmentId.eq(assignment_id))
            .filter(submissions::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query submission failed: {e}"))
            })?;

        let result = match existing {
            Some(submission) => {
                if submission.status == SubmissionStatus::Graded.to_string() {
                    return Err(CampusError::conflict(
                        "Cette copie est déjà notée et ne peut plus être modifiée",
                    ));
                }
                let mut active: SubmissionActiveModel = submission.into();
                active.answer_text = Set(Some(answer_text));
                active.status = Set(SubmissionStatus::Submitted.to_string());
                active.submitted_at = Set(Some(now));
                active.update(&self.db).await.map_err(|e| {
                    CampusError::database_operation(format!("Update submission failed: {e}"))
                })?
            }
            None => {
                let model = SubmissionActiveModel {
                    assignment_id: Set(assignment_id),
                    student_id: Set(student_id),
                    status: Set(SubmissionStatus::Submitted.to_string()),
                    answer_text: Set(Some(answer_text)),
                    submitted_at: Set(Some(now)),
                    ..Default::default()
                };
                model.insert(&self.db).await.map_err(|e| {
                    CampusError::database_operation(format!("Create submission failed: {e}"))
                })?
            }
        };

        Ok(result.into_submission())
    }

    /// 按测评列出提交
    pub async fn list_submissions_by_assignment_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>> {
        let rows = Submissions::find()
            .filter(submissions::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(submissions::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("List submissions failed: {e}"))
            })?;

        Ok(rows.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 评分
    ///
    /// score_raw 为 None 表示撤销评分（分数与 /20 归一值一并清空）。
    /// 所属学期已锁定时任何写入都被拒绝。
    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        grader_id: i64,
        score_raw: Option<f64>,
        feedback: Option<String>,
    ) -> Result<Option<Submission>> {
        let Some(submission) = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| {
                CampusError::database_operation(format!("Query submission failed: {e}"))
            })?
        else {
            return Ok(None);
        };

        let assignment = Assignments::find_by_id(submission.assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query assignment failed: {e}")))?
            .ok_or_else(|| CampusError::not_found("Évaluation introuvable"))?;

        self.ensure_module_semester_unlocked(assignment.module_id)
            .await?;

        if let Some(raw) = score_raw
            && (!raw.is_finite() || raw < 0.0)
        {
            return Err(CampusError::validation("Note brute invalide"));
        }

        let now = chrono::Utc::now().timestamp();
        let note_20 = normalize_note_20(score_raw, assignment.total_points);

        let mut active: SubmissionActiveModel = submission.into();
        active.score_raw = Set(score_raw);
        active.note_20 = Set(note_20);
        active.feedback = Set(feedback);
        match score_raw {
            Some(_) => {
                active.status = Set(SubmissionStatus::Graded.to_string());
                active.graded_by = Set(Some(grader_id));
                active.graded_at = Set(Some(now));
            }
            None => {
                // 撤销评分回到已提交状态
                active.status = Set(SubmissionStatus::Submitted.to_string());
                active.graded_by = Set(None);
                active.graded_at = Set(None);
            }
        }

        let result = active.update(&self.db).await.map_err(|e| {
            CampusError::database_operation(format!("Grade submission failed: {e}"))
        })?;

        Ok(Some(result.into_submission()))
    }

    /// 检查测评所属学期未被锁定
    async fn ensure_assignment_unlocked(&self, assignment_id: i64) -> Result<()> {
        let assignment = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query assignment failed: {e}")))?
            .ok_or_else(|| CampusError::not_found("Évaluation introuvable"))?;

        self.ensure_module_semester_unlocked(assignment.module_id)
            .await
    }

    pub(crate) async fn ensure_module_semester_unlocked(&self, module_id: i64) -> Result<()> {
        let module = Modules::find_by_id(module_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query module failed: {e}")))?
            .ok_or_else(|| CampusError::not_found("Unité d'enseignement introuvable"))?;

        let semester = Semesters::find_by_id(module.semester_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query semester failed: {e}")))?
            .ok_or_else(|| CampusError::not_found("Semestre introuvable"))?;

        if semester.is_locked {
            return Err(CampusError::locked(
                "Le semestre est verrouillé, aucune modification de note n'est possible",
            ));
        }
        Ok(())
    }
}
