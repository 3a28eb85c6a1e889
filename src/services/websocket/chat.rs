//! 聊天通道：鉴权、成员校验、先落库再广播。

use std::sync::Arc;

use actix_ws::Message;
use futures_util::StreamExt;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::{
    CLOSE_NOT_MEMBER, CLOSE_UNAUTHENTICATED, ChatEvent, ChatInbound, RoomManager,
    broadcast_chat_message, chat_room, close_with,
};
use crate::models::users::entities::{User, UserStatus};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

/// 根据查询参数里的 token 还原用户，握手已完成，失败由调用方关 4001
pub async fn authenticate(storage: &Arc<dyn Storage>, token: Option<&str>) -> Option<User> {
    let token = token?;
    let claims = JwtUtils::verify_access_token(token).ok()?;
    let user_id = claims.sub.parse::<i64>().ok()?;
    let user = storage.get_user_by_id(user_id).await.ok()??;
    if user.status != UserStatus::Active {
        return None;
    }
    Some(user)
}

/// 处理一条聊天 WebSocket 连接
pub async fn handle_chat_connection(
    storage: Arc<dyn Storage>,
    conversation_id: String,
    token: Option<String>,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) {
    let Some(user) = authenticate(&storage, token.as_deref()).await else {
        close_with(session, CLOSE_UNAUTHENTICATED, "Authentification requise").await;
        return;
    };

    match storage.is_participant(&conversation_id, user.id).await {
        Ok(true) => {}
        Ok(false) => {
            close_with(session, CLOSE_NOT_MEMBER, "Vous n'êtes pas membre de cette conversation")
                .await;
            return;
        }
        Err(e) => {
            warn!("Membership check failed for conversation {}: {}", conversation_id, e);
            close_with(session, CLOSE_NOT_MEMBER, "Vous n'êtes pas membre de cette conversation")
                .await;
            return;
        }
    }

    info!(
        "Chat socket connected: user {} in conversation {}",
        user.id, conversation_id
    );

    let room = chat_room(&conversation_id);
    let mut rx = RoomManager::get().join(&room);

    let heartbeat_interval = std::time::Duration::from_secs(30);
    let mut heartbeat = tokio::time::interval(heartbeat_interval);

    loop {
        tokio::select! {
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ChatInbound>(&text) {
                            Ok(ChatInbound::Message { text }) => {
                                if text.trim().is_empty() {
                                    continue;
                                }
                                match storage.create_message(&conversation_id, user.id, text).await {
                                    Ok(message) => {
                                        // 发送者也通过广播收到自己的消息，作为送达确认
                                        broadcast_chat_message(&message);
                                    }
                                    Err(e) => {
                                        warn!(
                                            "Failed to persist message from user {} in {}: {}",
                                            user.id, conversation_id, e
                                        );
                                        let error = ChatEvent::Error {
                                            message: "Le message n'a pas pu être enregistré".to_string(),
                                        };
                                        if let Ok(json) = serde_json::to_string(&error)
                                            && session.text(json).await.is_err() {
                                                break;
                                            }
                                    }
                                }
                            }
                            Ok(ChatInbound::Ping) => {
                                let pong = serde_json::to_string(&ChatEvent::Pong)
                                    .unwrap_or_else(|_| r#"{"event":"pong"}"#.to_string());
                                if session.text(pong).await.is_err() {
                                    break;
                                }
                            }
                            Err(_) => {
                                debug!("Unparseable chat frame from user {}", user.id);
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if session.pong(&data).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("Chat socket error for user {}: {:?}", user.id, e);
                        break;
                    }
                    _ => {}
                }
            }

            frame = rx.recv() => {
                match frame {
                    Ok(frame) => {
                        if session.text(frame.json).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Chat socket for user {} lagged by {} messages", user.id, n);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }

            _ = heartbeat.tick() => {
                if session.ping(b"").await.is_err() {
                    break;
                }
            }
        }
    }

    drop(rx);
    RoomManager::get().leave(&room);
    info!(
        "Chat socket disconnected: user {} from conversation {}",
        user.id, conversation_id
    );
}
