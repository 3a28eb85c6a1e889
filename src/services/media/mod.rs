pub mod proxy;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;
use crate::models::media::requests::MediaProxyQuery;

pub struct MediaService {
    client: reqwest::Client,
}

impl MediaService {
    pub fn new_lazy() -> Self {
        let config = AppConfig::get();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.media.upstream_timeout))
            .user_agent("ESFe/1.0")
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build media HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            });
        Self { client }
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn proxy(
        &self,
        query: MediaProxyQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        proxy::handle_proxy(self, query, request).await
    }
}
