// 电影浏览编排器
//
// 把各组件串起来并提供给展示层的接口：
// - 意图写入（搜索、排序、筛选草稿与提交、弹窗）
// - 由已提交的意图推导查询规格，变化时重置分页
// - 发出页请求、合并结果、视口不足一屏时自动补页
//
// 单线程协作式模型：所有状态变更都在一次事件处理中同步完成，
// 网络请求是唯一的挂起点。

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::BrowserConfig;
use crate::external::{CatalogProvider, DetailCache};
use crate::models::{
    FilterBounds, FilterField, FilterIntent, MovieDetail, MovieSummary, PageResult, QuerySpec,
    SortDirection, SortField, SortIntent,
};
use crate::services::error::BrowseResult;
use crate::services::filter_draft::FilterDraftReconciler;
use crate::services::pagination::{
    BrowseStatus, PageRequest, PageTicket, PaginationEngine, PaginationState,
};
use crate::services::query_builder::QueryBuilder;
use crate::services::sort_policy;
use crate::services::store::{FieldStore, SubscriptionId};
use crate::services::viewport::ViewportFill;

pub struct MovieBrowser {
    store: Arc<FieldStore>,
    provider: Arc<dyn CatalogProvider>,
    details: DetailCache,
    reconciler: FilterDraftReconciler,
    builder: QueryBuilder,
    engine: PaginationEngine,
    viewport: ViewportFill,
    /// 已决定发出但尚未执行的页请求
    pending: VecDeque<PageRequest>,
    /// 搜索、排序或已提交筛选被写入过，需要重新推导查询
    query_dirty: Arc<AtomicBool>,
    /// 上一次应用排序联动时的搜索词
    coupled_search: String,
    subscriptions: Vec<QuerySubscription>,
}

enum QuerySubscription {
    Search(SubscriptionId),
    Sort(SubscriptionId),
    Filter(SubscriptionId),
}

impl MovieBrowser {
    pub fn new(store: Arc<FieldStore>, provider: Arc<dyn CatalogProvider>, config: &BrowserConfig) -> Self {
        let query_dirty = Arc::new(AtomicBool::new(true));

        // 任何写入者对这三个字段的写入都会让查询重新推导
        let subscriptions = vec![
            QuerySubscription::Search(store.search.subscribe(mark_dirty::<String>(&query_dirty))),
            QuerySubscription::Sort(store.sort.subscribe(mark_dirty::<SortIntent>(&query_dirty))),
            QuerySubscription::Filter(store.filter.subscribe(mark_dirty::<Option<FilterIntent>>(&query_dirty))),
        ];

        Self {
            reconciler: FilterDraftReconciler::new(store.clone()),
            coupled_search: store.search.get(),
            store,
            provider,
            details: DetailCache::new(config.detail_cache_ttl),
            builder: QueryBuilder::new(config.page_size),
            engine: PaginationEngine::new(),
            viewport: ViewportFill::new(),
            pending: VecDeque::new(),
            query_dirty,
            subscriptions,
        }
    }

    pub fn store(&self) -> &Arc<FieldStore> {
        &self.store
    }

    pub fn detail_cache(&self) -> &DetailCache {
        &self.details
    }

    // ---- 展示层读取 ----

    pub fn current_results(&self) -> &[MovieSummary] {
        self.engine.results()
    }

    pub fn status(&self) -> BrowseStatus {
        self.engine.status()
    }

    pub fn state(&self) -> &PaginationState {
        self.engine.state()
    }

    pub fn current_query(&self) -> Option<QuerySpec> {
        self.engine.current_spec()
    }

    pub fn last_error(&self) -> Option<String> {
        self.engine.last_error().map(|e| e.to_string())
    }

    /// 列表底部的提示文字
    pub fn footer_text(&self) -> Option<String> {
        match self.status() {
            BrowseStatus::End => {
                let n = self.current_results().len();
                Some(format!("{} {}", n, if n == 1 { "RESULT" } else { "RESULTS" }))
            }
            BrowseStatus::Empty => Some("NO RESULTS".to_string()),
            BrowseStatus::Errored => Some("FAILED TO LOAD, TRY AGAIN".to_string()),
            BrowseStatus::Loading | BrowseStatus::Active => None,
        }
    }

    // ---- 初始化 ----

    /// 获取筛选边界，成功后用完整边界初始化并提交筛选，查询由此就绪
    pub async fn load_bounds(&mut self) -> BrowseResult<FilterBounds> {
        let bounds = match self.provider.filter_bounds().await {
            Ok(bounds) => bounds,
            Err(e) => {
                tracing::warn!("Failed to load filter bounds: {}", e);
                return Err(e);
            }
        };

        tracing::info!(
            "Filter bounds loaded: {} genres, {} countries, years {}, runtime {}",
            bounds.genres.len(),
            bounds.production_countries.len(),
            bounds.release_year,
            bounds.runtime
        );

        self.reconciler.initialize_from_bounds(&bounds, true);
        self.sync_query();
        Ok(bounds)
    }

    // ---- 意图写入 ----

    pub fn open_search(&mut self) {
        self.store.search_open.replace_if_changed(true);
    }

    /// 提交搜索词，并同步应用排序联动规则
    pub fn set_search(&mut self, text: &str) {
        let text = text.trim();
        self.store.search.replace_if_changed(text.to_string());
        self.store.search_open.replace_if_changed(false);
        self.sync_query();
    }

    pub fn toggle_sort_menu(&mut self) {
        let open = self.store.sort_open.get();
        self.store.sort_open.set(!open);
    }

    pub fn set_sort_field(&mut self, field: SortField) {
        let search = self.store.search.get();
        let next = sort_policy::select_field(&search, self.store.sort.get(), field);
        self.store.sort.replace_if_changed(next);
        self.sync_query();
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        let next = sort_policy::select_direction(self.store.sort.get(), direction);
        self.store.sort.replace_if_changed(next);
        self.sync_query();
    }

    pub fn open_filter(&mut self) {
        self.reconciler.open_panel();
    }

    pub fn set_filter_draft_field(&mut self, field: FilterField) -> bool {
        self.reconciler.update_draft_field(field)
    }

    pub fn toggle_genre(&mut self, genre: &str) -> bool {
        self.reconciler.toggle_genre(genre)
    }

    pub fn toggle_country(&mut self, country: &str) -> bool {
        self.reconciler.toggle_country(country)
    }

    pub fn reset_filter_draft(&mut self) -> bool {
        self.reconciler.reset_draft()
    }

    /// 关闭筛选面板，草稿有变化时提交，返回是否提交
    pub fn commit_filter(&mut self) -> bool {
        let committed = self.reconciler.on_panel_close();
        self.sync_query();
        committed
    }

    // ---- 分页 ----

    /// 滚动到阈值或视口未填满时调用，可以任意频繁地调用
    pub fn request_more(&mut self) -> bool {
        // 先消化其他写入者对存储的写入，避免为已过期的查询翻页
        let reset = self.sync_query();
        match self.engine.next_page() {
            Some(request) => {
                self.pending.push_back(request);
                true
            }
            None => reset,
        }
    }

    /// 上报最新的内容高度与视口高度
    pub fn on_layout(&mut self, content_extent: f64, viewport_extent: f64) -> bool {
        self.sync_query();
        if self.viewport.measure(content_extent, viewport_extent) {
            return self.request_more();
        }
        false
    }

    /// 根据已提交的意图重新推导查询，身份字段变化时重置分页并请求第一页
    ///
    /// 所有公开的入口都会先调用它，所以直接写入存储的变化也会在下一次事件中生效
    pub fn sync_query(&mut self) -> bool {
        if !self.query_dirty.swap(false, Ordering::SeqCst) {
            return false;
        }

        // 搜索词变化后同步应用排序联动，联动写回排序不再重复触发推导
        let search = self.store.search.get();
        if search != self.coupled_search {
            let coupled = sort_policy::couple(&search, self.store.sort.get());
            self.store.sort.replace_if_changed(coupled);
            self.query_dirty.store(false, Ordering::SeqCst);
            self.coupled_search = search;
        }

        let spec = match self.builder.build_from_store(&self.store, 1) {
            Some(spec) => spec,
            None => {
                tracing::debug!("Query not ready: waiting for filter bounds");
                return false;
            }
        };

        if !self.engine.needs_reset(&spec) {
            return false;
        }

        self.viewport.clear_content();
        let request = self.engine.reset(spec);
        // 尚未发出的旧周期请求直接丢弃
        let epoch = self.engine.epoch();
        self.pending.retain(|r| r.ticket.epoch == epoch);
        self.pending.push_back(request);
        true
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// 取出下一个待发出的页请求，供自行调度请求的调用方使用
    pub fn next_request(&mut self) -> Option<PageRequest> {
        self.sync_query();
        self.pending.pop_front()
    }

    /// 执行一个页请求（不修改状态）
    pub async fn fetch(&self, request: &PageRequest) -> BrowseResult<PageResult> {
        self.provider.search_movies(&request.spec).await
    }

    /// 把页请求的结果交给分页引擎，返回 false 表示结果已过期被丢弃
    pub fn apply(&mut self, ticket: PageTicket, result: BrowseResult<PageResult>) -> bool {
        // 查询已被其他写入者改变时，这个结果属于旧周期
        self.sync_query();
        match result {
            Ok(page) => {
                let merged = self.engine.settle(ticket, page);
                // 新页渲染后旧的内容高度作废，等下一次测量再决定是否补页
                if merged {
                    self.viewport.clear_content();
                }
                merged
            }
            // 失败后不自动补页，等待调用方重试
            Err(e) => self.engine.fail(ticket, e),
        }
    }

    /// 依次执行所有待发出的页请求，返回执行的请求数
    pub async fn run_pending(&mut self) -> usize {
        self.sync_query();
        let mut executed = 0;
        while let Some(request) = self.pending.pop_front() {
            let result = self.fetch(&request).await;
            self.apply(request.ticket, result);
            executed += 1;
        }
        executed
    }

    // ---- 详情弹窗 ----

    pub fn open_popup(&mut self, id: &str) {
        self.store.popup_movie.set(Some(id.to_string()));
        self.store.popup_open.replace_if_changed(true);
    }

    pub fn close_popup(&mut self) {
        self.store.popup_open.replace_if_changed(false);
    }

    /// 当前弹窗电影的详情，弹窗关闭时返回 None
    pub async fn popup_detail(&self) -> BrowseResult<Option<MovieDetail>> {
        if !self.store.popup_open.get() {
            return Ok(None);
        }
        let id = match self.store.popup_movie.get() {
            Some(id) => id,
            None => return Ok(None),
        };

        if let Some(detail) = self.details.get(&id) {
            tracing::debug!("Cache hit for movie detail: {}", id);
            return Ok(Some(detail));
        }

        let detail = self.provider.movie_detail(&id).await?;
        self.details.set(&id, detail.clone());
        Ok(Some(detail))
    }
}

impl Drop for MovieBrowser {
    fn drop(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            match subscription {
                QuerySubscription::Search(id) => self.store.search.unsubscribe(id),
                QuerySubscription::Sort(id) => self.store.sort.unsubscribe(id),
                QuerySubscription::Filter(id) => self.store.filter.unsubscribe(id),
            };
        }
    }
}

fn mark_dirty<T>(flag: &Arc<AtomicBool>) -> impl Fn(&T) + Send + Sync + 'static {
    let flag = flag.clone();
    move |_: &T| flag.store(true, Ordering::SeqCst)
}
