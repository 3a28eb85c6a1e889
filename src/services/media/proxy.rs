use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MediaService;
use crate::config::AppConfig;
use crate::models::media::requests::MediaProxyQuery;
use crate::models::{ApiResponse, ErrorCode};

/// 判断上游主机是否在白名单内，大小写不敏感
fn host_allowed(host: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|h| h.eq_ignore_ascii_case(host))
}

/// GET /media/proxy?url=
///
/// 上游视频中继。只放行白名单主机，上游失败一律 502，不降级直连。
/// Range 头透传以支持播放器拖动。
pub async fn handle_proxy(
    service: &MediaService,
    query: MediaProxyQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if query.url.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Paramètre url manquant",
        )));
    }

    let url = match reqwest::Url::parse(&query.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        _ => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "URL invalide",
            )));
        }
    };

    let config = AppConfig::get();
    let host = url.host_str().unwrap_or_default();
    if !host_allowed(host, &config.media.allowed_hosts) {
        tracing::warn!("Media proxy refused host: {}", host);
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Hôte non autorisé",
        )));
    }

    let mut upstream_req = service.client().get(url);
    if let Some(range) = request.headers().get(header::RANGE) {
        upstream_req = upstream_req.header(reqwest::header::RANGE, range.as_bytes());
    }

    let upstream = match upstream_req.send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!("Media proxy upstream failed: {}", e);
            return Ok(HttpResponse::BadGateway().json(ApiResponse::error_empty(
                ErrorCode::BadGateway,
                "Le serveur vidéo en amont est injoignable",
            )));
        }
    };

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("video/mp4")
        .to_string();

    let mut builder = HttpResponse::build(status);
    builder.insert_header((header::CONTENT_TYPE, content_type));

    if let Some(len) = upstream.headers().get(reqwest::header::CONTENT_LENGTH) {
        builder.insert_header((header::CONTENT_LENGTH, len.as_bytes()));
    }
    match upstream.headers().get(reqwest::header::ACCEPT_RANGES) {
        Some(ranges) => {
            builder.insert_header((header::ACCEPT_RANGES, ranges.as_bytes()));
        }
        None => {
            builder.insert_header((header::ACCEPT_RANGES, "bytes"));
        }
    }
    if let Some(range) = upstream.headers().get(reqwest::header::CONTENT_RANGE) {
        builder.insert_header((header::CONTENT_RANGE, range.as_bytes()));
    }

    Ok(builder.streaming(upstream.bytes_stream()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_allow_list_is_case_insensitive() {
        let allowed = vec!["cdn.esfe-mali.edu.ml".to_string()];
        assert!(host_allowed("cdn.esfe-mali.edu.ml", &allowed));
        assert!(host_allowed("CDN.ESFE-MALI.EDU.ML", &allowed));
        assert!(!host_allowed("evil.example.com", &allowed));
        assert!(!host_allowed("", &allowed));
    }
}
