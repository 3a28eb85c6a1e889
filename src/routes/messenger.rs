use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::messenger::requests::{
    CreateConversationRequest, HistoryQuery, SendMessageRequest,
};
use crate::services::MessengerService;

static MESSENGER_SERVICE: Lazy<MessengerService> = Lazy::new(MessengerService::new_lazy);

pub async fn create_conversation(
    req: HttpRequest,
    data: web::Json<CreateConversationRequest>,
) -> ActixResult<HttpResponse> {
    MESSENGER_SERVICE
        .create_conversation(data.into_inner(), &req)
        .await
}

pub async fn list_conversations(req: HttpRequest) -> ActixResult<HttpResponse> {
    MESSENGER_SERVICE.list_conversations(&req).await
}

pub async fn get_history(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> ActixResult<HttpResponse> {
    MESSENGER_SERVICE
        .get_history(&path.into_inner(), query.into_inner(), &req)
        .await
}

pub async fn send_message(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    MESSENGER_SERVICE
        .send_message(&path.into_inner(), data.into_inner(), &req)
        .await
}

pub async fn create_call(req: HttpRequest, path: web::Path<String>) -> ActixResult<HttpResponse> {
    MESSENGER_SERVICE.create_call(&path.into_inner(), &req).await
}

pub async fn start_call(req: HttpRequest, path: web::Path<String>) -> ActixResult<HttpResponse> {
    MESSENGER_SERVICE.start_call(&path.into_inner(), &req).await
}

pub async fn end_call(req: HttpRequest, path: web::Path<String>) -> ActixResult<HttpResponse> {
    MESSENGER_SERVICE.end_call(&path.into_inner(), &req).await
}

// 配置路由，成员资格统一在业务层校验
pub fn configure_messenger_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/conversations")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_conversations))
                    .route(web::post().to(create_conversation)),
            )
            .service(
                web::resource("/{id}/messages")
                    .route(web::get().to(get_history))
                    // WebSocket 不可用时的发送回退
                    .route(web::post().to(send_message)),
            )
            .service(web::resource("/{id}/calls").route(web::post().to(create_call))),
    );

    cfg.service(
        web::scope("/api/v1/calls")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/{id}/start").route(web::post().to(start_call)))
            .service(web::resource("/{id}/end").route(web::post().to(end_call))),
    );
}
