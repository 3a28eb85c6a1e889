use crate::cache::traits::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;
use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use std::time::{Duration, Instant};

declare_object_cache_plugin!("moka", MokaCacheWrapper);

/// 按条目 TTL 过期策略，TTL 随值一起写入
struct PerEntryExpiry;

impl Expiry<String, (String, u64)> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &(String, u64),
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(Duration::from_secs(value.1))
    }
}

/// 基于 moka 的进程内对象缓存
pub struct MokaCacheWrapper {
    cache: Cache<String, (String, u64)>,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let cache = Cache::builder()
            .max_capacity(config.cache.memory.max_capacity)
            .expire_after(PerEntryExpiry)
            .build();
        Ok(Self { cache })
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.cache.get(key).await {
            Some((value, _)) => CacheResult::Found(value),
            None => CacheResult::NotFound,
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        self.cache.insert(key, (value, ttl)).await;
    }

    async fn remove(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_get() {
        let wrapper = MokaCacheWrapper {
            cache: Cache::builder().expire_after(PerEntryExpiry).build(),
        };
        wrapper
            .insert_raw("k".to_string(), "v".to_string(), 60)
            .await;
        match wrapper.get_raw("k").await {
            CacheResult::Found(v) => assert_eq!(v, "v"),
            other => panic!("unexpected cache result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn remove_clears_entry() {
        let wrapper = MokaCacheWrapper {
            cache: Cache::builder().expire_after(PerEntryExpiry).build(),
        };
        wrapper
            .insert_raw("k".to_string(), "v".to_string(), 60)
            .await;
        wrapper.remove("k").await;
        assert!(matches!(wrapper.get_raw("k").await, CacheResult::NotFound));
    }
}
