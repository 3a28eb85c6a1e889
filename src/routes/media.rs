use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::media::requests::MediaProxyQuery;
use crate::services::MediaService;

static MEDIA_SERVICE: Lazy<MediaService> = Lazy::new(MediaService::new_lazy);

pub async fn video_proxy(
    req: HttpRequest,
    query: web::Query<MediaProxyQuery>,
) -> ActixResult<HttpResponse> {
    MEDIA_SERVICE.proxy(query.into_inner(), &req).await
}

// 配置路由
//
// 不挂 JWT：<video> 标签无法携带 Authorization 头，白名单是唯一的闸门。
pub fn configure_media_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/media").service(web::resource("/proxy").route(web::get().to(video_proxy))),
    );
}
