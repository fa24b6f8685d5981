use crate::models::{FilterIntent, QuerySpec, SortIntent};
use crate::services::store::FieldStore;

/// 查询规格构建器
///
/// 纯投影步骤：没有副作用，不发起网络请求。
/// 任一输入仍处于未初始化状态时返回 None（尚未就绪）。
pub struct QueryBuilder {
    page_size: u32,
}

impl QueryBuilder {
    pub fn new(page_size: u32) -> Self {
        Self { page_size }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn build(
        &self,
        search: Option<&str>,
        sort: Option<SortIntent>,
        filter: Option<&FilterIntent>,
        page: u32,
    ) -> Option<QuerySpec> {
        build(search, sort, filter, page, self.page_size)
    }

    /// 从存储中当前已提交的意图构建第 `page` 页的规格
    pub fn build_from_store(&self, store: &FieldStore, page: u32) -> Option<QuerySpec> {
        let search = store.search.get();
        let sort = store.sort.get();
        let filter = store.filter.get();
        self.build(Some(&search), Some(sort), filter.as_ref(), page)
    }
}

pub fn build(
    search: Option<&str>,
    sort: Option<SortIntent>,
    filter: Option<&FilterIntent>,
    page: u32,
    page_size: u32,
) -> Option<QuerySpec> {
    let search = search?;
    let sort = sort?;
    let filter = filter?;

    Some(QuerySpec {
        search: search.to_string(),
        sort_field: sort.field,
        sort_direction: sort.direction,
        filter: filter.clone(),
        page,
        page_size,
    })
}
