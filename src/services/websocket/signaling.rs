//! 通话信令通道：哑中继，载荷原样转发给房间内其他成员。

use std::sync::Arc;

use actix_ws::Message;
use futures_util::StreamExt;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::chat::authenticate;
use super::{
    CLOSE_NOT_MEMBER, CLOSE_UNAUTHENTICATED, RoomManager, call_room, close_with, next_conn_id,
};
use crate::storage::Storage;

/// 处理一条信令 WebSocket 连接
pub async fn handle_call_connection(
    storage: Arc<dyn Storage>,
    room_name: String,
    token: Option<String>,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) {
    let Some(user) = authenticate(&storage, token.as_deref()).await else {
        close_with(session, CLOSE_UNAUTHENTICATED, "Authentification requise").await;
        return;
    };

    // 房间必须对应一个通话，且用户是底层会话的成员
    let call = match storage.get_call_by_room(&room_name).await {
        Ok(Some(call)) => call,
        Ok(None) => {
            close_with(session, CLOSE_NOT_MEMBER, "Salle d'appel inconnue").await;
            return;
        }
        Err(e) => {
            warn!("Call lookup failed for room {}: {}", room_name, e);
            close_with(session, CLOSE_NOT_MEMBER, "Salle d'appel inconnue").await;
            return;
        }
    };

    match storage.is_participant(&call.conversation_id, user.id).await {
        Ok(true) => {}
        _ => {
            close_with(session, CLOSE_NOT_MEMBER, "Vous n'êtes pas membre de cet appel").await;
            return;
        }
    }

    info!("Call socket connected: user {} in room {}", user.id, room_name);

    let room = call_room(&room_name);
    let mut rx = RoomManager::get().join(&room);
    // 回声按连接过滤而不是按用户：同一用户的另一台设备也要收到中继
    let conn_id = next_conn_id();

    let heartbeat_interval = std::time::Duration::from_secs(30);
    let mut heartbeat = tokio::time::interval(heartbeat_interval);

    loop {
        tokio::select! {
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        // 服务端不理解信令内容，仅校验是合法 JSON 后转发
                        match serde_json::from_str::<serde_json::Value>(&text) {
                            Ok(payload) => {
                                let envelope = json!({
                                    "type": "signal_event",
                                    "payload": payload,
                                });
                                RoomManager::get().broadcast(
                                    &room,
                                    conn_id,
                                    envelope.to_string(),
                                );
                            }
                            Err(_) => {
                                debug!("Dropping non-JSON signal frame from user {}", user.id);
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
                        warn!("Call socket error for user {}: {:?}", user.id, e);
                        break;
                    }
                    _ => {}
                }
            }

            frame = rx.recv() => {
                match frame {
                    Ok(frame) => {
                        // 不回送给发出这条帧的连接
                        if frame.origin == conn_id {
                            continue;
                        }
                        if session.text(frame.json).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Call socket for user {} lagged by {} frames", user.id, n);
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
        "Call socket disconnected: user {} from room {}",
        user.id, room_name
    );
}
