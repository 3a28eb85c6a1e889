use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MessengerService;
use crate::middlewares::RequireJWT;
use crate::models::messenger::responses::CallSessionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// POST /conversations/{id}/calls
pub async fn handle_create_call(
    service: &MessengerService,
    conversation_id: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(host_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentification requise",
        )));
    };

    let storage = service.get_storage(request);

    match storage.is_participant(conversation_id, host_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "Vous n'êtes pas membre de cette conversation",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.create_call_session(conversation_id, host_id).await {
        Ok(call) => {
            tracing::info!(
                "Call {} created in conversation {} by user {}",
                call.id,
                conversation_id,
                host_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                CallSessionResponse { call },
                "Appel créé",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

/// 成员校验加状态流转共用的查找，start/end 都要先确认调用者在会话里
async fn check_call_membership(
    service: &MessengerService,
    call_id: &str,
    request: &HttpRequest,
) -> Result<(), HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Err(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentification requise",
        )));
    };

    let storage = service.get_storage(request);
    let call = match storage.get_call_session(call_id).await {
        Ok(Some(call)) => call,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotFound,
                "Appel introuvable",
            )));
        }
        Err(e) => return Err(error_response(&e)),
    };

    match storage.is_participant(&call.conversation_id, user_id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Vous n'êtes pas membre de cet appel",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}

/// POST /calls/{id}/start，只允许从 init 进入 live
pub async fn handle_start_call(
    service: &MessengerService,
    call_id: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(resp) = check_call_membership(service, call_id, request).await {
        return Ok(resp);
    }

    let storage = service.get_storage(request);
    match storage.start_call(call_id).await {
        Ok(Some(call)) => {
            tracing::info!("Call {} is now live (room {})", call.id, call.room_name);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                CallSessionResponse { call },
                "Appel démarré",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Appel introuvable",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// POST /calls/{id}/end，init 状态下等于取消
pub async fn handle_end_call(
    service: &MessengerService,
    call_id: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(resp) = check_call_membership(service, call_id, request).await {
        return Ok(resp);
    }

    let storage = service.get_storage(request);
    match storage.end_call(call_id).await {
        Ok(Some(call)) => {
            tracing::info!("Call {} ended", call.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                CallSessionResponse { call },
                "Appel terminé",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Appel introuvable",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
