use serde::Serialize;
use ts_rs::TS;

use crate::models::results::entities::SemesterResult;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultListResponse {
    pub results: Vec<SemesterResult>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ComputeResultsResponse {
    pub semester_id: i64,
    pub computed: u64,
    pub skipped_locked: u64,
    pub results: Vec<SemesterResult>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct LockResponse {
    pub semester_id: i64,
    pub locked: bool,
    pub locked_at: Option<chrono::DateTime<chrono::Utc>>,
    pub locked_by: Option<i64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultLockResponse {
    pub result_id: i64,
    pub locked: bool,
    pub locked_at: Option<chrono::DateTime<chrono::Utc>>,
    pub locked_by: Option<i64>,
}
