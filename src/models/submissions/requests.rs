use serde::Deserialize;
use ts_rs::TS;

use crate::models::submissions::entities::{AssignmentKind, EvalKind};

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct CreateAssignmentRequest {
    pub kind: AssignmentKind,
    pub eval_kind: EvalKind,
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_total_points")]
    pub total_points: f64,
    #[serde(default = "default_coefficient")]
    pub coefficient: f64,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitAnswerRequest {
    pub answer_text: String,
}

// 评分请求，score_raw 为 None 表示撤销评分
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct GradeSubmissionRequest {
    pub score_raw: Option<f64>,
    pub feedback: Option<String>,
}

fn default_total_points() -> f64 {
    20.0
}

fn default_coefficient() -> f64 {
    1.0
}
