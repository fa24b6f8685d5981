pub mod cache;
pub mod graphql;

use async_trait::async_trait;

pub use cache::{CacheCleanupTask, CacheStats, DetailCache};
pub use graphql::GraphqlCatalogClient;

use crate::models::{FilterBounds, MovieDetail, PageResult, QuerySpec};
use crate::services::error::BrowseResult;

/// 电影目录后端
///
/// 三个查询：筛选边界、分页搜索、按 ID 查询详情。页码从 1 开始。
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn filter_bounds(&self) -> BrowseResult<FilterBounds>;

    async fn search_movies(&self, spec: &QuerySpec) -> BrowseResult<PageResult>;

    async fn movie_detail(&self, id: &str) -> BrowseResult<MovieDetail>;
}
