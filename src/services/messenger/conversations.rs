use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MessengerService;
use crate::middlewares::RequireJWT;
use crate::models::messenger::requests::CreateConversationRequest;
use crate::models::messenger::responses::{ConversationListResponse, ConversationResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// POST /conversations
///
/// 创建者自动成为成员，participant_ids 去重后入座。
pub async fn handle_create_conversation(
    service: &MessengerService,
    req: CreateConversationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(creator_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentification requise",
        )));
    };

    if req.is_group && req.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::UnprocessableEntity,
            "Un groupe doit avoir un titre",
        )));
    }

    let storage = service.get_storage(request);
    match storage.create_conversation(creator_id, req).await {
        Ok(conversation) => {
            tracing::info!(
                "Conversation {} created by user {}",
                conversation.id,
                creator_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ConversationResponse { conversation },
                "Conversation créée",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

/// GET /conversations，只返回当前用户参与的会话
pub async fn handle_list_conversations(
    service: &MessengerService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentification requise",
        )));
    };

    let storage = service.get_storage(request);
    match storage.list_conversations_for_user(user_id).await {
        Ok(conversations) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ConversationListResponse { conversations },
            "Conversations chargées",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
