use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CreateCohortRequest {
    /// 届别标签，如 "2025-2027"
    pub label: String,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CreateSemesterRequest {
    pub program_code: String,
    pub cohort_id: i64,
    pub name: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: i32,
    #[serde(default = "default_ects_target")]
    pub ects_target: i32,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CreateModuleRequest {
    pub code: String,
    pub title: String,
    #[serde(default = "default_coefficient")]
    pub coefficient: f64,
    #[serde(default = "default_credits")]
    pub credits: f64,
    #[serde(default = "default_sort_order")]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CreateChapterRequest {
    pub title: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CreateLessonRequest {
    pub title: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: i32,
    #[serde(default)]
    pub duration_seconds: i64,
    pub external_url: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct PublishLessonRequest {
    pub is_published: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct SemesterListQuery {
    /// 按培养方向过滤，如 GLSI
    pub program: Option<String>,
}

fn default_sort_order() -> i32 {
    1
}

fn default_ects_target() -> i32 {
    30
}

fn default_coefficient() -> f64 {
    1.0
}

fn default_credits() -> f64 {
    6.0
}
