use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/messenger.ts")]
pub struct CreateConversationRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub is_group: bool,
    pub module_id: Option<i64>,
    /// 创建者以外的初始成员
    #[serde(default)]
    pub participant_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/messenger.ts")]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/messenger.ts")]
pub struct HistoryQuery {
    /// 只取该消息 id 之前的历史
    pub before_id: Option<i64>,
    #[serde(default = "default_history_limit")]
    pub limit: u64,
}

fn default_history_limit() -> u64 {
    50
}
