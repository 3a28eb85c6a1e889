use serde::Serialize;
use ts_rs::TS;

use crate::models::messenger::entities::{CallSession, ChatMessage, Conversation};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/messenger.ts")]
pub struct ConversationResponse {
    pub conversation: Conversation,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/messenger.ts")]
pub struct ConversationListResponse {
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/messenger.ts")]
pub struct MessageResponse {
    pub message: ChatMessage,
}

// 历史按时间正序返回
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/messenger.ts")]
pub struct MessageHistoryResponse {
    pub messages: Vec<ChatMessage>,
    pub has_more: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/messenger.ts")]
pub struct CallSessionResponse {
    pub call: CallSession,
}
