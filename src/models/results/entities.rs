use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学期评审决定，线上编码沿用评审委员会的缩写
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub enum Decision {
    Adm, // admis
    Aj,  // ajourné
    Rat, // rattrapage
    Exc, // exclu
}

impl Decision {
    pub const ADM: &'static str = "ADM";
    pub const AJ: &'static str = "AJ";
    pub const RAT: &'static str = "RAT";
    pub const EXC: &'static str = "EXC";

    /// 根据加权平均分给出评审决定
    ///
    /// 阈值来自配置（`[grading]`），默认 10 / 7 / 5：
    /// - 平均分 ≥ pass → 录取（ADM）
    /// - 平均分 ≥ remedial → 补考（RAT）
    /// - 平均分 ≥ exclusion → 延期（AJ）
    /// - 其余 → 除名（EXC）
    pub fn from_average(average_20: f64, pass: f64, remedial: f64, exclusion: f64) -> Decision {
        if average_20 >= pass {
            Decision::Adm
        } else if average_20 >= remedial {
            Decision::Rat
        } else if average_20 >= exclusion {
            Decision::Aj
        } else {
            Decision::Exc
        }
    }
}

impl<'de> Deserialize<'de> for Decision {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Decision>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的评审决定: '{s}'. 支持的决定: ADM, AJ, RAT, EXC"
            ))
        })
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Adm => write!(f, "{}", Decision::ADM),
            Decision::Aj => write!(f, "{}", Decision::AJ),
            Decision::Rat => write!(f, "{}", Decision::RAT),
            Decision::Exc => write!(f, "{}", Decision::EXC),
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Decision::ADM => Ok(Decision::Adm),
            Decision::AJ => Ok(Decision::Aj),
            Decision::RAT => Ok(Decision::Rat),
            Decision::EXC => Ok(Decision::Exc),
            _ => Err(format!("Invalid decision: {s}")),
        }
    }
}

// 学期成绩单
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct SemesterResult {
    pub id: i64,
    pub enrollment_id: i64,
    pub semester_id: i64,
    /// 加权平均分 /20，无有效成绩时为 None
    pub average_20: Option<f64>,
    pub credits_earned: f64,
    pub decision: Option<Decision>,
    pub is_locked: bool,
    pub locked_at: Option<chrono::DateTime<chrono::Utc>>,
    pub locked_by: Option<i64>,
    pub computed_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_thresholds() {
        assert_eq!(Decision::from_average(14.5, 10.0, 7.0, 5.0), Decision::Adm);
        assert_eq!(Decision::from_average(10.0, 10.0, 7.0, 5.0), Decision::Adm);
        assert_eq!(Decision::from_average(9.99, 10.0, 7.0, 5.0), Decision::Rat);
        assert_eq!(Decision::from_average(7.0, 10.0, 7.0, 5.0), Decision::Rat);
        assert_eq!(Decision::from_average(6.0, 10.0, 7.0, 5.0), Decision::Aj);
        assert_eq!(Decision::from_average(5.0, 10.0, 7.0, 5.0), Decision::Aj);
        assert_eq!(Decision::from_average(4.99, 10.0, 7.0, 5.0), Decision::Exc);
        assert_eq!(Decision::from_average(0.0, 10.0, 7.0, 5.0), Decision::Exc);
    }

    #[test]
    fn test_decision_wire_codes() {
        assert_eq!(Decision::Adm.to_string(), "ADM");
        assert_eq!("RAT".parse::<Decision>().unwrap(), Decision::Rat);
        assert!("ADMIS".parse::<Decision>().is_err());
    }
}
