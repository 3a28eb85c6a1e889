use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Deserialize;
use std::sync::Arc;

use crate::services::websocket::{chat, signaling};
use crate::storage::Storage;

/// token 走查询参数，浏览器的 WebSocket API 不能带自定义头
#[derive(Debug, Deserialize)]
pub struct WsTokenQuery {
    pub token: Option<String>,
}

fn storage_from_request(req: &HttpRequest) -> Arc<dyn Storage> {
    req.app_data::<web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}

/// 聊天通道，鉴权在握手完成后由连接任务处理
pub async fn chat_socket(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<WsTokenQuery>,
    body: web::Payload,
) -> ActixResult<HttpResponse> {
    let (response, session, stream) = actix_ws::handle(&req, body)?;
    let storage = storage_from_request(&req);

    actix_web::rt::spawn(chat::handle_chat_connection(
        storage,
        path.into_inner(),
        query.into_inner().token,
        session,
        stream,
    ));

    Ok(response)
}

/// 通话信令通道
pub async fn call_socket(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<WsTokenQuery>,
    body: web::Payload,
) -> ActixResult<HttpResponse> {
    let (response, session, stream) = actix_ws::handle(&req, body)?;
    let storage = storage_from_request(&req);

    actix_web::rt::spawn(signaling::handle_call_connection(
        storage,
        path.into_inner(),
        query.into_inner().token,
        session,
        stream,
    ));

    Ok(response)
}

// 配置路由
pub fn configure_ws_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/ws")
            .route("/chat/{conversation_id}", web::get().to(chat_socket))
            .route("/call/{room_name}", web::get().to(call_socket)),
    );
}
