use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};

use crate::models::MovieDetail;

struct CachedDetail {
    detail: MovieDetail,
    fetched_at: Instant,
}

/// 电影详情缓存，弹窗反复打开同一部电影时不再请求
///
/// 所有条目共用同一个有效期；克隆出的句柄共享同一份数据，
/// 清理任务和浏览器各持有一个。
#[derive(Clone)]
pub struct DetailCache {
    entries: Arc<RwLock<HashMap<String, CachedDetail>>>,
    ttl: Duration,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl DetailCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 按电影 ID 查询，过期条目视为不存在
    pub fn get(&self, id: &str) -> Option<MovieDetail> {
        let found = self.entries.read().ok().and_then(|entries| {
            entries
                .get(id)
                .filter(|cached| cached.fetched_at.elapsed() <= self.ttl)
                .map(|cached| cached.detail.clone())
        });

        match found {
            Some(detail) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(detail)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn set(&self, id: &str, detail: MovieDetail) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                id.to_string(),
                CachedDetail {
                    detail,
                    fetched_at: Instant::now(),
                },
            );
        }
    }

    /// 删除过期条目，返回删除的数量
    pub fn cleanup_expired(&self) -> usize {
        let ttl = self.ttl;
        match self.entries.write() {
            Ok(mut entries) => {
                let before = entries.len();
                entries.retain(|_, cached| cached.fetched_at.elapsed() <= ttl);
                before - entries.len()
            }
            Err(_) => 0,
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    pub fn get_stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.read().map(|e| e.len()).unwrap_or(0),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for DetailCache {
    fn default() -> Self {
        // 详情缓存2小时
        Self::new(Duration::from_secs(2 * 60 * 60))
    }
}

/// 缓存统计信息
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// 缓存清理任务
pub struct CacheCleanupTask {
    cache: DetailCache,
    interval: Duration,
}

impl CacheCleanupTask {
    pub fn new(cache: DetailCache, interval: Duration) -> Self {
        Self { cache, interval }
    }

    /// 启动定期清理任务
    pub async fn start(self) {
        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;
            let removed = self.cache.cleanup_expired();
            tracing::debug!(
                "Detail cache cleanup removed {} entries. Stats: {:?}",
                removed,
                self.cache.get_stats()
            );
        }
    }
}
