use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MessengerService;
use crate::middlewares::RequireJWT;
use crate::models::messenger::requests::{HistoryQuery, SendMessageRequest};
use crate::models::messenger::responses::{MessageHistoryResponse, MessageResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::services::websocket::broadcast_chat_message;
use crate::storage::Storage;
use std::sync::Arc;

const HISTORY_LIMIT_MAX: u64 = 200;

/// 历史与发送共用的成员校验，返回 Err 时直接回包
async fn check_membership(
    storage: &Arc<dyn Storage>,
    conversation_id: &str,
    user_id: i64,
) -> Result<(), HttpResponse> {
    match storage.is_participant(conversation_id, user_id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Vous n'êtes pas membre de cette conversation",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}

/// GET /conversations/{id}/messages?before_id=&limit=
pub async fn handle_get_history(
    service: &MessengerService,
    conversation_id: &str,
    query: HistoryQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentification requise",
        )));
    };

    let storage = service.get_storage(request);
    if let Err(resp) = check_membership(&storage, conversation_id, user_id).await {
        return Ok(resp);
    }

    let limit = query.limit.clamp(1, HISTORY_LIMIT_MAX);
    match storage
        .list_messages(conversation_id, query.before_id, limit)
        .await
    {
        Ok((messages, has_more)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MessageHistoryResponse { messages, has_more },
            "Historique chargé",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// POST /conversations/{id}/messages
///
/// WebSocket 不可用时的发送回退，同样先落库再广播给在线成员。
pub async fn handle_send_message(
    service: &MessengerService,
    conversation_id: &str,
    req: SendMessageRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentification requise",
        )));
    };

    if req.text.trim().is_empty() {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            "Le message ne peut pas être vide",
        )));
    }

    let storage = service.get_storage(request);
    if let Err(resp) = check_membership(&storage, conversation_id, user_id).await {
        return Ok(resp);
    }

    match storage.create_message(conversation_id, user_id, req.text).await {
        Ok(message) => {
            let delivered = broadcast_chat_message(&message);
            tracing::debug!(
                "Message {} relayed to {} online members of {}",
                message.id,
                delivered,
                conversation_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                MessageResponse { message },
                "Message envoyé",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
