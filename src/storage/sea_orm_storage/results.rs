use super::SeaOrmStorage;
use crate::config::AppConfig;
use crate::entity::prelude::*;
use crate::entity::{assignments, modules, semester_results, submissions};
use crate::errors::{CampusError, Result};
use crate::models::results::entities::{Decision, SemesterResult};
use crate::storage::{ComputeOutcome, ResultLockOutcome};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

/// 系数加权平均，(值, 权重) 对为空或总权重为 0 时返回 None
fn weighted_average(pairs: &[(f64, f64)]) -> Option<f64> {
    let total_weight: f64 = pairs.iter().map(|(_, w)| w).sum();
    if pairs.is_empty() || total_weight <= 0.0 {
        return None;
    }
    let weighted_sum: f64 = pairs.iter().map(|(v, w)| v * w).sum();
    Some(weighted_sum / total_weight)
}

impl SeaOrmStorage {
    /// 为学期内注册聚合成绩单
    ///
    /// 整个批次在一个事务内完成。全量重算时已锁定的成绩单原样保留并计入
    /// skipped_locked；显式点名的注册撞上已锁成绩单则整体以 Locked 拒绝。
    pub async fn compute_semester_results_impl(
        &self,
        semester_id: i64,
        enrollment_ids: Vec<i64>,
    ) -> Result<ComputeOutcome> {
        let targeted = !enrollment_ids.is_empty();
        let semester = Semesters::find_by_id(semester_id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query semester failed: {e}")))?
            .ok_or_else(|| CampusError::not_found("Semestre introuvable"))?;

        if semester.is_locked {
            return Err(CampusError::locked(
                "Le semestre est verrouillé, les moyennes ne peuvent plus être recalculées",
            ));
        }

        let enrollments = if enrollment_ids.is_empty() {
            self.list_enrollments_for_semester_impl(semester_id).await?
        } else {
            let all = self.list_enrollments_for_semester_impl(semester_id).await?;
            all.into_iter()
                .filter(|e| enrollment_ids.contains(&e.id))
                .collect()
        };

        let grading = &AppConfig::get().grading;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::database_operation(format!("Begin txn failed: {e}")))?;

        let module_rows = Modules::find()
            .filter(modules::Column::SemesterId.eq(semester_id))
            .filter(modules::Column::IsActive.eq(true))
            .all(&txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("List modules failed: {e}")))?;

        let mut computed = 0u64;
        let mut skipped_locked = 0u64;
        let mut results = Vec::with_capacity(enrollments.len());
        let now = chrono::Utc::now().timestamp();

        for enrollment in &enrollments {
            let existing = SemesterResults::find()
                .filter(semester_results::Column::EnrollmentId.eq(enrollment.id))
                .filter(semester_results::Column::SemesterId.eq(semester_id))
                .one(&txn)
                .await
                .map_err(|e| {
                    CampusError::database_operation(format!("Query result failed: {e}"))
                })?;

            if let Some(row) = &existing
                && row.is_locked
            {
                if targeted {
                    return Err(CampusError::locked(
                        "Le relevé de cette inscription est verrouillé, il ne peut plus être recalculé",
                    ));
                }
                skipped_locked += 1;
                results.push(row.clone().into_result());
                continue;
            }

            let (average_20, credits_earned) = Self::aggregate_enrollment(
                &txn,
                enrollment.student_id,
                &module_rows,
                grading.module_pass_threshold,
            )
            .await?;

            let decision = average_20.map(|avg| {
                Decision::from_average(
                    avg,
                    grading.pass_threshold,
                    grading.remedial_threshold,
                    grading.exclusion_threshold,
                )
            });

            let model = match existing {
                Some(row) => {
                    // 条件更新：读取和写入之间被并发锁定的行保持原值
                    let update = SemesterResults::update_many()
                        .col_expr(semester_results::Column::Average20, Expr::value(average_20))
                        .col_expr(
                            semester_results::Column::CreditsEarned,
                            Expr::value(credits_earned),
                        )
                        .col_expr(
                            semester_results::Column::Decision,
                            Expr::value(decision.map(|d| d.to_string())),
                        )
                        .col_expr(semester_results::Column::ComputedAt, Expr::value(now))
                        .filter(semester_results::Column::Id.eq(row.id))
                        .filter(semester_results::Column::IsLocked.eq(false))
                        .exec(&txn)
                        .await
                        .map_err(|e| {
                            CampusError::database_operation(format!("Update result failed: {e}"))
                        })?;

                    let refreshed = SemesterResults::find_by_id(row.id)
                        .one(&txn)
                        .await
                        .map_err(|e| {
                            CampusError::database_operation(format!("Query result failed: {e}"))
                        })?
                        .ok_or_else(|| {
                            CampusError::database_operation("Result vanished during compute")
                        })?;

                    if update.rows_affected == 0 {
                        if targeted {
                            return Err(CampusError::locked(
                                "Le relevé de cette inscription est verrouillé, il ne peut plus être recalculé",
                            ));
                        }
                        skipped_locked += 1;
                        results.push(refreshed.into_result());
                        continue;
                    }

                    refreshed
                }
                None => {
                    let active = SemesterResultActiveModel {
                        enrollment_id: Set(enrollment.id),
                        semester_id: Set(semester_id),
                        average_20: Set(average_20),
                        credits_earned: Set(credits_earned),
                        decision: Set(decision.map(|d| d.to_string())),
                        is_locked: Set(false),
                        computed_at: Set(Some(now)),
                        ..Default::default()
                    };
                    active.insert(&txn).await.map_err(|e| {
                        CampusError::database_operation(format!("Insert result failed: {e}"))
                    })?
                }
            };

            computed += 1;
            results.push(model.into_result());
        }

        txn.commit()
            .await
            .map_err(|e| CampusError::database_operation(format!("Commit txn failed: {e}")))?;

        Ok(ComputeOutcome {
            computed,
            skipped_locked,
            results,
        })
    }

    /// 单个学生的学期聚合：模块内按测评系数加权，模块间按模块系数加权
    async fn aggregate_enrollment(
        txn: &DatabaseTransaction,
        student_id: i64,
        module_rows: &[crate::entity::modules::Model],
        module_pass_threshold: f64,
    ) -> Result<(Option<f64>, f64)> {
        let mut module_notes: Vec<(f64, f64)> = Vec::new();
        let mut credits_earned = 0.0;

        for module in module_rows {
            let assignment_rows = Assignments::find()
                .filter(assignments::Column::ModuleId.eq(module.id))
                .filter(assignments::Column::IsPublished.eq(true))
                .all(txn)
                .await
                .map_err(|e| {
                    CampusError::database_operation(format!("List assignments failed: {e}"))
                })?;

            if assignment_rows.is_empty() {
                continue;
            }

            let assignment_ids: Vec<i64> = assignment_rows.iter().map(|a| a.id).collect();
            let submission_rows = Submissions::find()
                .filter(submissions::Column::AssignmentId.is_in(assignment_ids))
                .filter(submissions::Column::StudentId.eq(student_id))
                .filter(submissions::Column::Note20.is_not_null())
                .all(txn)
                .await
                .map_err(|e| {
                    CampusError::database_operation(format!("List submissions failed: {e}"))
                })?;

            let graded: Vec<(f64, f64)> = submission_rows
                .iter()
                .filter_map(|s| {
                    let note = s.note_20?;
                    let coeff = assignment_rows
                        .iter()
                        .find(|a| a.id == s.assignment_id)
                        .map(|a| a.coefficient)?;
                    Some((note, coeff))
                })
                .collect();

            if let Some(module_note) = weighted_average(&graded) {
                module_notes.push((module_note, module.coefficient));
                if module_note >= module_pass_threshold {
                    credits_earned += module.credits;
                }
            }
        }

        Ok((weighted_average(&module_notes), credits_earned))
    }

    /// 锁定单个成绩单
    ///
    /// 与学期锁定同样的条件更新：只有 is_locked = false 的行会被写入时间戳，
    /// 重复或并发调用不会覆盖第一次锁定的 locked_at / locked_by。
    pub async fn lock_result_impl(
        &self,
        id: i64,
        locked_by: i64,
    ) -> Result<Option<ResultLockOutcome>> {
        if SemesterResults::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query result failed: {e}")))?
            .is_none()
        {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let update = SemesterResults::update_many()
            .col_expr(semester_results::Column::IsLocked, Expr::value(true))
            .col_expr(semester_results::Column::LockedAt, Expr::value(now))
            .col_expr(semester_results::Column::LockedBy, Expr::value(locked_by))
            .filter(semester_results::Column::Id.eq(id))
            .filter(semester_results::Column::IsLocked.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Lock result failed: {e}")))?;

        let newly_locked = update.rows_affected > 0;

        let result = SemesterResults::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("Query result failed: {e}")))?
            .ok_or_else(|| CampusError::not_found("Relevé introuvable"))?;

        Ok(Some(ResultLockOutcome {
            result: result.into_result(),
            newly_locked,
        }))
    }

    /// 按学期列出成绩单
    pub async fn list_results_by_semester_impl(
        &self,
        semester_id: i64,
    ) -> Result<Vec<SemesterResult>> {
        let rows = SemesterResults::find()
            .filter(semester_results::Column::SemesterId.eq(semester_id))
            .order_by_asc(semester_results::Column::EnrollmentId)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("List results failed: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_result()).collect())
    }

    /// 按注册列出成绩单
    pub async fn list_results_by_enrollment_impl(
        &self,
        enrollment_id: i64,
    ) -> Result<Vec<SemesterResult>> {
        let rows = SemesterResults::find()
            .filter(semester_results::Column::EnrollmentId.eq(enrollment_id))
            .order_by_asc(semester_results::Column::SemesterId)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("List results failed: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_result()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_semester_with_enrollment};
    use super::weighted_average;
    use crate::errors::CampusError;

    #[tokio::test]
    async fn test_lock_result_is_one_way() {
        let storage = memory_storage().await;
        let (semester_id, _) = seed_semester_with_enrollment(&storage).await;

        let outcome = storage
            .compute_semester_results_impl(semester_id, vec![])
            .await
            .unwrap();
        assert_eq!(outcome.computed, 1);
        let result_id = outcome.results[0].id;
        assert!(!outcome.results[0].is_locked);

        let first = storage.lock_result_impl(result_id, 7).await.unwrap().unwrap();
        assert!(first.newly_locked);
        assert!(first.result.is_locked);
        assert_eq!(first.result.locked_by, Some(7));

        // 重复锁定不重写第一次的锁定者和时间戳
        let second = storage.lock_result_impl(result_id, 8).await.unwrap().unwrap();
        assert!(!second.newly_locked);
        assert_eq!(second.result.locked_by, Some(7));
        assert_eq!(second.result.locked_at, first.result.locked_at);

        assert!(storage.lock_result_impl(9999, 7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_targeted_recompute_rejected_when_result_locked() {
        let storage = memory_storage().await;
        let (semester_id, enrollment_id) = seed_semester_with_enrollment(&storage).await;

        let outcome = storage
            .compute_semester_results_impl(semester_id, vec![])
            .await
            .unwrap();
        storage
            .lock_result_impl(outcome.results[0].id, 7)
            .await
            .unwrap();

        let err = storage
            .compute_semester_results_impl(semester_id, vec![enrollment_id])
            .await
            .unwrap_err();
        assert!(matches!(err, CampusError::Locked(_)));
    }

    #[tokio::test]
    async fn test_full_recompute_preserves_locked_rows() {
        let storage = memory_storage().await;
        let (semester_id, _) = seed_semester_with_enrollment(&storage).await;

        let before = storage
            .compute_semester_results_impl(semester_id, vec![])
            .await
            .unwrap();
        storage
            .lock_result_impl(before.results[0].id, 7)
            .await
            .unwrap();

        let after = storage
            .compute_semester_results_impl(semester_id, vec![])
            .await
            .unwrap();
        assert_eq!(after.computed, 0);
        assert_eq!(after.skipped_locked, 1);
        assert_eq!(after.results[0].computed_at, before.results[0].computed_at);
        assert_eq!(after.results[0].credits_earned, before.results[0].credits_earned);
        assert!(after.results[0].is_locked);
    }

    #[test]
    fn test_weighted_average_basic() {
        // (15 * 2 + 9 * 1) / 3 = 13
        assert_eq!(weighted_average(&[(15.0, 2.0), (9.0, 1.0)]), Some(13.0));
    }

    #[test]
    fn test_weighted_average_empty() {
        assert_eq!(weighted_average(&[]), None);
    }

    #[test]
    fn test_weighted_average_zero_weight() {
        assert_eq!(weighted_average(&[(12.0, 0.0)]), None);
    }

    #[test]
    fn test_weighted_average_single() {
        assert_eq!(weighted_average(&[(11.5, 3.0)]), Some(11.5));
    }
}
