/*!
 * WebSocket 实时服务
 *
 * 两类通道：
 * - 聊天：`ws://host/api/v1/ws/chat/{conversation_id}?token=<access_token>`，
 *   消息先落库再广播给会话全体在线成员（含发送者）。
 * - 信令：`ws://host/api/v1/ws/call/{room_name}?token=<access_token>`，
 *   任意 JSON 原样包进 `{"type":"signal_event","payload":...}` 转发给
 *   房间内的其他连接（同一用户的另一台设备也会收到），服务端不理解其内容。
 *
 * 鉴权在握手完成后进行：token 无效关 4001，非会话成员关 4003。
 *
 * ## 聊天消息格式
 *
 * ### 客户端发送
 * ```json
 * {"type": "message", "text": "Bonjour"}
 * {"type": "ping"}
 * ```
 *
 * ### 服务端下发
 * ```json
 * {
 *     "event": "message",
 *     "id": 42,
 *     "conversation_id": "uuid",
 *     "sender_id": 7,
 *     "sender_name": "Aminata Traoré",
 *     "text": "Bonjour",
 *     "created_at": "2026-03-12T09:30:00Z"
 * }
 * ```
 */

pub mod chat;
pub mod signaling;

use std::sync::atomic::{AtomicU64, Ordering};

use actix_ws::{CloseCode, CloseReason};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::messenger::entities::ChatMessage;

/// 鉴权失败
pub const CLOSE_UNAUTHENTICATED: u16 = 4001;
/// 非会话成员
pub const CLOSE_NOT_MEMBER: u16 = 4003;

/// 全局房间管理器
static ROOM_MANAGER: Lazy<RoomManager> = Lazy::new(RoomManager::new);

/// 非连接来源（HTTP 回退、落库后的服务端广播），永不被回声过滤命中
pub const ORIGIN_NONE: u64 = 0;

static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

/// 分配连接序号，同一用户的多台设备各自持有不同序号
pub fn next_conn_id() -> u64 {
    NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed)
}

/// 聊天入站消息
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatInbound {
    Message { text: String },
    Ping,
}

/// 聊天下发事件
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChatEvent {
    Message {
        id: i64,
        conversation_id: String,
        sender_id: i64,
        sender_name: String,
        text: String,
        created_at: chrono::DateTime<chrono::Utc>,
    },
    Pong,
    Error {
        message: String,
    },
}

impl From<ChatMessage> for ChatEvent {
    fn from(m: ChatMessage) -> Self {
        ChatEvent::Message {
            id: m.id,
            conversation_id: m.conversation_id,
            sender_id: m.sender_id,
            sender_name: m.sender_name,
            text: m.text,
            created_at: m.created_at,
        }
    }
}

/// 广播帧，json 已序列化，origin 是发出连接的序号，信令侧据此过滤回声
#[derive(Debug, Clone)]
pub struct RoomFrame {
    pub origin: u64,
    pub json: String,
}

/// 按房间键分发的连接管理器
pub struct RoomManager {
    /// 房间键 -> 广播发送器
    rooms: DashMap<String, broadcast::Sender<RoomFrame>>,
}

/// 聊天房间键
pub fn chat_room(conversation_id: &str) -> String {
    format!("chat:{conversation_id}")
}

/// 信令房间键
pub fn call_room(room_name: &str) -> String {
    format!("call:{room_name}")
}

impl RoomManager {
    fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// 获取全局实例
    pub fn get() -> &'static Self {
        &ROOM_MANAGER
    }

    /// 加入房间，返回接收端
    pub fn join(&self, room: &str) -> broadcast::Receiver<RoomFrame> {
        let entry = self.rooms.entry(room.to_string()).or_insert_with(|| {
            let (tx, _) = broadcast::channel(100);
            tx
        });
        entry.subscribe()
    }

    /// 离开房间，最后一个订阅者走后移除条目
    pub fn leave(&self, room: &str) {
        if let Some(entry) = self.rooms.get(room)
            && entry.receiver_count() == 0
        {
            drop(entry);
            self.rooms.remove(room);
        }
    }

    /// 向房间广播，返回送达的接收端数量
    pub fn broadcast(&self, room: &str, origin: u64, json: String) -> usize {
        if let Some(sender) = self.rooms.get(room) {
            sender.send(RoomFrame { origin, json }).unwrap_or(0)
        } else {
            0
        }
    }

    /// 房间在线人数
    pub fn room_size(&self, room: &str) -> usize {
        self.rooms
            .get(room)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }
}

/// 辅助函数：把已落库的聊天消息广播到对应会话房间，HTTP 发送回退也走这里。
/// 聊天帧回送给发送者本人作送达确认，因此来源固定为 ORIGIN_NONE。
pub fn broadcast_chat_message(message: &ChatMessage) -> usize {
    let room = chat_room(&message.conversation_id);
    match serde_json::to_string(&ChatEvent::from(message.clone())) {
        Ok(json) => RoomManager::get().broadcast(&room, ORIGIN_NONE, json),
        Err(e) => {
            tracing::warn!("Failed to serialize chat event: {}", e);
            0
        }
    }
}

/// 握手完成后的拒绝关闭
pub(crate) async fn close_with(session: actix_ws::Session, code: u16, reason: &str) {
    let _ = session
        .close(Some(CloseReason {
            code: CloseCode::Other(code),
            description: Some(reason.to_string()),
        }))
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_room_fan_out_reaches_all_subscribers() {
        let manager = RoomManager::new();
        let mut rx1 = manager.join("chat:c1");
        let mut rx2 = manager.join("chat:c1");

        let delivered = manager.broadcast("chat:c1", 7, "{\"event\":\"message\"}".to_string());
        assert_eq!(delivered, 2);

        let f1 = rx1.recv().await.unwrap();
        let f2 = rx2.recv().await.unwrap();
        assert_eq!(f1.origin, 7);
        assert_eq!(f1.json, f2.json);
    }

    #[tokio::test]
    async fn test_fan_out_preserves_send_order() {
        let manager = RoomManager::new();
        let mut rx1 = manager.join("chat:c1");
        let mut rx2 = manager.join("chat:c1");

        manager.broadcast("chat:c1", ORIGIN_NONE, r#"{"id":1}"#.to_string());
        manager.broadcast("chat:c1", ORIGIN_NONE, r#"{"id":2}"#.to_string());
        manager.broadcast("chat:c1", ORIGIN_NONE, r#"{"id":3}"#.to_string());

        // 每个订阅者都按广播顺序收到全部帧
        for rx in [&mut rx1, &mut rx2] {
            assert_eq!(rx.recv().await.unwrap().json, r#"{"id":1}"#);
            assert_eq!(rx.recv().await.unwrap().json, r#"{"id":2}"#);
            assert_eq!(rx.recv().await.unwrap().json, r#"{"id":3}"#);
        }
    }

    #[tokio::test]
    async fn test_frames_carry_connection_origin() {
        let manager = RoomManager::new();
        let mut rx_a = manager.join("call:r1");
        let mut rx_b = manager.join("call:r1");

        // 同一用户的两台设备拿到不同的连接序号
        let conn_a = next_conn_id();
        let conn_b = next_conn_id();
        assert_ne!(conn_a, conn_b);
        assert_ne!(conn_a, ORIGIN_NONE);

        manager.broadcast("call:r1", conn_a, "{}".to_string());

        // 另一台设备据 origin 判断这不是自己发出的帧
        let frame = rx_b.recv().await.unwrap();
        assert_eq!(frame.origin, conn_a);
        assert_ne!(frame.origin, conn_b);

        let echo = rx_a.recv().await.unwrap();
        assert_eq!(echo.origin, conn_a);
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        let manager = RoomManager::new();
        let mut rx_other = manager.join("chat:c2");
        let _rx = manager.join("chat:c1");

        manager.broadcast("chat:c1", 1, "{}".to_string());
        assert!(matches!(
            rx_other.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_room_delivers_nothing() {
        let manager = RoomManager::new();
        assert_eq!(manager.broadcast("chat:nobody", 1, "{}".to_string()), 0);
    }

    #[tokio::test]
    async fn test_room_size_tracks_subscribers() {
        let manager = RoomManager::new();
        assert_eq!(manager.room_size("call:r1"), 0);
        let rx1 = manager.join("call:r1");
        let rx2 = manager.join("call:r1");
        assert_eq!(manager.room_size("call:r1"), 2);
        drop(rx1);
        drop(rx2);
        assert_eq!(manager.room_size("call:r1"), 0);
        manager.leave("call:r1");
        assert!(manager.rooms.get("call:r1").is_none());
    }

    #[test]
    fn test_chat_inbound_parsing() {
        let msg: ChatInbound = serde_json::from_str(r#"{"type":"message","text":"salut"}"#)
            .expect("message frame should parse");
        assert!(matches!(msg, ChatInbound::Message { ref text } if text == "salut"));

        let ping: ChatInbound = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(ping, ChatInbound::Ping));
    }

    #[test]
    fn test_chat_event_shape() {
        let event = ChatEvent::Message {
            id: 1,
            conversation_id: "c1".to_string(),
            sender_id: 2,
            sender_name: "Moussa".to_string(),
            text: "bonjour".to_string(),
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""event":"message""#));
        assert!(json.contains(r#""sender_name":"Moussa""#));
    }
}
