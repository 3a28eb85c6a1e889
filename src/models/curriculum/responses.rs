use serde::Serialize;
use ts_rs::TS;

use crate::models::curriculum::entities::{Chapter, Cohort, Lesson, ModuleUnit, Semester};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CohortResponse {
    pub cohort: Cohort,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CohortListResponse {
    pub cohorts: Vec<Cohort>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct SemesterResponse {
    pub semester: Semester,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct SemesterListResponse {
    pub semesters: Vec<Semester>,
}

// 学期详情，模块按 sort_order 排列
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct SemesterDetailResponse {
    pub semester: Semester,
    pub modules: Vec<ModuleUnit>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct ModuleResponse {
    pub module: ModuleUnit,
}

// 模块详情树：章节下挂课时
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct ModuleDetailResponse {
    pub module: ModuleUnit,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct ChapterResponse {
    pub chapter: Chapter,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct LessonResponse {
    pub lesson: Lesson,
}
