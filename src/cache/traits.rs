use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    Error(String),
}

/// 对象缓存统一接口
///
/// 所有后端以字符串键值对存取，调用方自行负责序列化。
#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;

    async fn insert_raw(&self, key: String, value: String, ttl: u64);

    async fn remove(&self, key: &str);

    async fn invalidate_all(&self);
}
