use serde::Serialize;
use ts_rs::TS;

use crate::models::enrollments::entities::{
    Enrollment, LessonProgressEntry, ModuleProgressEntry,
};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentResponse {
    pub enrollment: Enrollment,
    /// 本次注册创建的模块进度条数
    pub modules_linked: u64,
    /// 本次注册创建的课时进度条数（只统计已发布课时）
    pub lessons_linked: u64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListResponse {
    pub enrollments: Vec<Enrollment>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct ProgressResponse {
    pub enrollment_id: i64,
    pub modules: Vec<ModuleProgressEntry>,
    pub lessons: Vec<LessonProgressEntry>,
}
