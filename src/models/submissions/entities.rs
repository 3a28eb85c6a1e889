use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 测评类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum AssignmentKind {
    Homework, // devoir
    Exam,     // examen
}

impl<'de> Deserialize<'de> for AssignmentKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AssignmentKind>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的测评类型: '{s}'. 支持的类型: homework, exam"
            ))
        })
    }
}

impl std::fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentKind::Homework => write!(f, "homework"),
            AssignmentKind::Exam => write!(f, "exam"),
        }
    }
}

impl std::str::FromStr for AssignmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "homework" => Ok(AssignmentKind::Homework),
            "exam" => Ok(AssignmentKind::Exam),
            _ => Err(format!("Invalid assignment kind: {s}")),
        }
    }
}

// 计分方式：平时成绩或期末成绩
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum EvalKind {
    Continuous, // contrôle continu
    Final,      // examen final
}

impl<'de> Deserialize<'de> for EvalKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<EvalKind>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的计分方式: '{s}'. 支持的方式: continuous, final"
            ))
        })
    }
}

impl std::fmt::Display for EvalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalKind::Continuous => write!(f, "continuous"),
            EvalKind::Final => write!(f, "final"),
        }
    }
}

impl std::str::FromStr for EvalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "continuous" => Ok(EvalKind::Continuous),
            "final" => Ok(EvalKind::Final),
            _ => Err(format!("Invalid eval kind: {s}")),
        }
    }
}

// 提交状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Draft,     // 草稿
    Submitted, // 已提交
    Graded,    // 已评分
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<SubmissionStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的提交状态: '{s}'. 支持的状态: draft, submitted, graded"
            ))
        })
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Draft => write!(f, "draft"),
            SubmissionStatus::Submitted => write!(f, "submitted"),
            SubmissionStatus::Graded => write!(f, "graded"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(SubmissionStatus::Draft),
            "submitted" => Ok(SubmissionStatus::Submitted),
            "graded" => Ok(SubmissionStatus::Graded),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 测评实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Assignment {
    pub id: i64,
    pub module_id: i64,
    pub kind: AssignmentKind,
    pub eval_kind: EvalKind,
    pub title: String,
    pub description: Option<String>,
    pub total_points: f64,
    pub coefficient: f64,
    pub is_published: bool,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 提交实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub status: SubmissionStatus,
    pub answer_text: Option<String>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub score_raw: Option<f64>,
    /// 归一化到 /20 的分数，保留两位小数
    pub note_20: Option<f64>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub feedback: Option<String>,
}
