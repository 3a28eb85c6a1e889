use serde::Serialize;
use ts_rs::TS;

use crate::models::results::entities::SemesterResult;

// 学生端总览
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentOverviewResponse {
    pub enrollment_id: i64,
    pub program_code: String,
    pub modules_total: u64,
    pub modules_completed: u64,
    pub lessons_total: u64,
    pub lessons_completed: u64,
    pub pending_assignments: u64,
    pub results: Vec<SemesterResult>,
}

// 校长端总览
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DirectorOverviewResponse {
    pub students_total: u64,
    pub enrollments_active: u64,
    pub semesters_total: u64,
    pub semesters_locked: u64,
    pub submissions_pending_grading: u64,
    pub decisions: DecisionBreakdown,
}

// 各评审决定的人数分布
#[derive(Debug, Serialize, TS, Default)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DecisionBreakdown {
    pub admitted: u64,
    pub adjourned: u64,
    pub remedial: u64,
    pub excluded: u64,
    pub undecided: u64,
}
