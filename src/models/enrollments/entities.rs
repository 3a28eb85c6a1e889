use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学籍状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub enum EnrollmentStatus {
    Active,    // 在读
    Suspended, // 休学
    Completed, // 结业
}

impl<'de> Deserialize<'de> for EnrollmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<EnrollmentStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的学籍状态: '{s}'. 支持的状态: active, suspended, completed"
            ))
        })
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Active => write!(f, "active"),
            EnrollmentStatus::Suspended => write!(f, "suspended"),
            EnrollmentStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EnrollmentStatus::Active),
            "suspended" => Ok(EnrollmentStatus::Suspended),
            "completed" => Ok(EnrollmentStatus::Completed),
            _ => Err(format!("Invalid enrollment status: {s}")),
        }
    }
}

// 学籍记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub program_code: String,
    pub cohort_id: i64,
    pub status: EnrollmentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 模块进度
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct ModuleProgressEntry {
    pub module_id: i64,
    pub module_code: String,
    pub module_title: String,
    pub percent: f64,
}

// 课时进度
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct LessonProgressEntry {
    pub lesson_id: i64,
    pub lesson_title: String,
    pub seconds_watched: i64,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}
