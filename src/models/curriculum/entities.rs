use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 届别（promotion），学期与注册都挂在届别下
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct Cohort {
    pub id: i64,
    pub label: String,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: chrono::DateTime<chrono::Utc>,
}

// 学期，锁定后所有成绩相关写入被拒绝
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct Semester {
    pub id: i64,
    pub program_code: String,
    pub cohort_id: i64,
    pub name: String,
    pub sort_order: i32,
    pub ects_target: i32,
    pub is_locked: bool,
    pub locked_at: Option<chrono::DateTime<chrono::Utc>>,
    pub locked_by: Option<i64>,
}

// 教学单元（unité d'enseignement）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct ModuleUnit {
    pub id: i64,
    pub semester_id: i64,
    pub code: String,
    pub title: String,
    pub coefficient: f64,
    pub credits: f64,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct Chapter {
    pub id: i64,
    pub module_id: i64,
    pub title: String,
    pub sort_order: i32,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct Lesson {
    pub id: i64,
    pub chapter_id: i64,
    pub title: String,
    pub sort_order: i32,
    pub duration_seconds: i64,
    pub external_url: Option<String>,
    pub is_published: bool,
}
