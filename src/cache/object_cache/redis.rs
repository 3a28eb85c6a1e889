use crate::cache::traits::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use tokio::sync::OnceCell;

declare_object_cache_plugin!("redis", RedisCacheWrapper);

/// 基于 Redis 的分布式对象缓存
///
/// 连接在首次访问时惰性建立，所有键自动加上配置的前缀。
pub struct RedisCacheWrapper {
    client: Client,
    connection: OnceCell<MultiplexedConnection>,
    key_prefix: String,
}

impl RedisCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let client = Client::open(config.cache.redis.url.as_str())
            .map_err(|e| format!("Invalid redis url: {e}"))?;
        Ok(Self {
            client,
            connection: OnceCell::new(),
            key_prefix: config.cache.redis.key_prefix.clone(),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, String> {
        let conn = self
            .connection
            .get_or_try_init(|| async {
                self.client
                    .get_multiplexed_async_connection()
                    .await
                    .map_err(|e| format!("Redis connection failed: {e}"))
            })
            .await?;
        Ok(conn.clone())
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => return CacheResult::Error(e),
        };
        match conn.get::<_, Option<String>>(self.prefixed(key)).await {
            Ok(Some(value)) => CacheResult::Found(value),
            Ok(None) => CacheResult::NotFound,
            Err(e) => CacheResult::Error(e.to_string()),
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Redis insert skipped: {}", e);
                return;
            }
        };
        if let Err(e) = conn
            .set_ex::<_, _, ()>(self.prefixed(&key), value, ttl)
            .await
        {
            tracing::warn!("Redis SET failed for key {}: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Redis remove skipped: {}", e);
                return;
            }
        };
        if let Err(e) = conn.del::<_, ()>(self.prefixed(key)).await {
            tracing::warn!("Redis DEL failed for key {}: {}", key, e);
        }
    }

    async fn invalidate_all(&self) {
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Redis invalidate skipped: {}", e);
                return;
            }
        };
        let pattern = format!("{}*", self.key_prefix);
        let keys: Vec<String> = match conn.keys(&pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("Redis KEYS failed: {}", e);
                return;
            }
        };
        if keys.is_empty() {
            return;
        }
        if let Err(e) = conn.del::<_, ()>(keys).await {
            tracing::warn!("Redis bulk DEL failed: {}", e);
        }
    }
}
