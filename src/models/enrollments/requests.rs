use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollStudentRequest {
    pub student_id: i64,
    pub program_code: String,
    pub cohort_id: i64,
}

// 课时观看进度上报
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct LessonWatchRequest {
    pub seconds_watched: i64,
    #[serde(default)]
    pub completed: bool,
}
