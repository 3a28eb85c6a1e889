use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 通话状态机：init → live → ended，单向流转
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/messenger.ts")]
pub enum CallStatus {
    Init,  // 已创建，未开始
    Live,  // 进行中
    Ended, // 已结束
}

impl CallStatus {
    /// start() 只允许从 init 进入 live
    pub fn can_start(&self) -> bool {
        matches!(self, CallStatus::Init)
    }

    /// end() 允许从 init（取消）或 live 进入 ended
    pub fn can_end(&self) -> bool {
        matches!(self, CallStatus::Init | CallStatus::Live)
    }
}

impl<'de> Deserialize<'de> for CallStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<CallStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的通话状态: '{s}'. 支持的状态: init, live, ended"
            ))
        })
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallStatus::Init => write!(f, "init"),
            CallStatus::Live => write!(f, "live"),
            CallStatus::Ended => write!(f, "ended"),
        }
    }
}

impl std::str::FromStr for CallStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "init" => Ok(CallStatus::Init),
            "live" => Ok(CallStatus::Live),
            "ended" => Ok(CallStatus::Ended),
            _ => Err(format!("Invalid call status: {s}")),
        }
    }
}

// 会话
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/messenger.ts")]
pub struct Conversation {
    pub id: String,
    pub title: Option<String>,
    pub is_group: bool,
    pub module_id: Option<i64>,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 聊天消息，sender_name 冗余存放便于直接下发
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/messenger.ts")]
pub struct ChatMessage {
    pub id: i64,
    pub conversation_id: String,
    pub sender_id: i64,
    pub sender_name: String,
    pub text: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 通话会话
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/messenger.ts")]
pub struct CallSession {
    pub id: String,
    pub conversation_id: String,
    pub host_id: Option<i64>,
    pub room_name: String,
    pub status: CallStatus,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub ended_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_transitions() {
        assert!(CallStatus::Init.can_start());
        assert!(!CallStatus::Live.can_start());
        assert!(!CallStatus::Ended.can_start());

        // init 状态下 end 等于取消
        assert!(CallStatus::Init.can_end());
        assert!(CallStatus::Live.can_end());
        assert!(!CallStatus::Ended.can_end());
    }

    #[test]
    fn test_call_status_round_trip() {
        for status in [CallStatus::Init, CallStatus::Live, CallStatus::Ended] {
            assert_eq!(status.to_string().parse::<CallStatus>().unwrap(), status);
        }
    }
}
