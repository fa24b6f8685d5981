// 分页引擎
//
// 状态机，负责：
// - 查询规格变化时重置（开始新的查询周期 epoch）
// - 判断何时请求下一页，同一周期内最多只有一个未完成的页请求
// - 按服务端顺序追加新页的结果
// - 丢弃过期周期的响应
// - 推导加载中 / 出错 / 已到末尾 / 无结果 / 可继续 状态

use serde::Serialize;

use crate::models::{MovieSummary, PageResult, QueryKey, QuerySpec};
use crate::services::error::BrowseError;

/// 一次页请求的身份：所属查询周期与页码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageTicket {
    pub epoch: u64,
    pub page: u32,
}

/// 需要发给分页查询服务的请求
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub ticket: PageTicket,
    pub spec: QuerySpec,
}

/// 面向展示层的列表状态，按优先级依次判断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowseStatus {
    /// 有页请求未完成，或者查询尚未就绪
    Loading,
    /// 最近一次页请求失败，可以重试
    Errored,
    /// 所有页都已取回
    End,
    /// 查询没有任何结果
    Empty,
    /// 可能还有更多页
    Active,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaginationState {
    pub current_page: u32,
    pub page_count: u32,
    /// 同一查询周期内只追加
    pub accumulated: Vec<MovieSummary>,
    pub page_loading: bool,
    /// 当前周期的第一页尚未返回
    pub query_loading: bool,
}

impl PaginationState {
    fn fresh_epoch() -> Self {
        Self {
            current_page: 1,
            page_count: 1,
            accumulated: Vec::new(),
            page_loading: true,
            query_loading: true,
        }
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.page_count
    }

    // 服务端页数可能在周期之间缩小，当前页不会被向下修正，越过页数同样视为末尾
    fn is_exhausted(&self) -> bool {
        self.current_page >= self.page_count && self.page_count != 0
    }
}

#[derive(Debug, Default)]
pub struct PaginationEngine {
    state: PaginationState,
    epoch: u64,
    /// 当前周期的查询规格（第一页）
    base: Option<QuerySpec>,
    in_flight: Option<PageTicket>,
    last_error: Option<BrowseError>,
}

impl PaginationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询规格尚未就绪，引擎不发起任何请求
    pub fn is_dormant(&self) -> bool {
        self.base.is_none()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    pub fn results(&self) -> &[MovieSummary] {
        &self.state.accumulated
    }

    pub fn current_spec(&self) -> Option<QuerySpec> {
        self.base
            .as_ref()
            .map(|base| base.for_page(self.state.current_page.max(1)))
    }

    pub fn current_key(&self) -> Option<QueryKey> {
        self.base.as_ref().map(|base| base.key())
    }

    pub fn in_flight(&self) -> Option<PageTicket> {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&BrowseError> {
        self.last_error.as_ref()
    }

    /// 规格与当前周期不同则需要重置
    pub fn needs_reset(&self, spec: &QuerySpec) -> bool {
        match &self.base {
            Some(base) => !base.same_query(spec),
            None => true,
        }
    }

    /// 开始新的查询周期并发出第一页请求
    ///
    /// 重置先于请求发生，之前周期未完成的请求在返回时会被丢弃
    pub fn reset(&mut self, spec: QuerySpec) -> PageRequest {
        self.epoch += 1;
        self.state = PaginationState::fresh_epoch();
        self.last_error = None;

        let base = spec.for_page(1);
        let ticket = PageTicket {
            epoch: self.epoch,
            page: 1,
        };
        self.in_flight = Some(ticket);
        self.base = Some(base.clone());

        tracing::info!(
            "Query epoch {} started (search={:?}, sort={} {})",
            self.epoch,
            base.search,
            base.sort_field,
            base.sort_direction
        );

        PageRequest { ticket, spec: base }
    }

    /// 请求下一页
    ///
    /// 仅当没有未完成的页请求且还有更多页时生效，其余情况不做任何事，可以任意频繁地调用
    pub fn next_page(&mut self) -> Option<PageRequest> {
        let base = self.base.as_ref()?;
        if self.state.page_loading || !self.state.has_more() {
            return None;
        }

        self.state.page_loading = true;
        self.state.current_page += 1;
        self.last_error = None;

        let ticket = PageTicket {
            epoch: self.epoch,
            page: self.state.current_page,
        };
        self.in_flight = Some(ticket);

        tracing::debug!("Requesting page {} of epoch {}", ticket.page, ticket.epoch);
        Some(PageRequest {
            ticket,
            spec: base.for_page(ticket.page),
        })
    }

    /// 页请求成功返回，合并结果
    ///
    /// 返回 false 表示响应属于已过期的周期或不是当前等待的页，已被丢弃
    pub fn settle(&mut self, ticket: PageTicket, result: PageResult) -> bool {
        if !self.accepts(ticket) {
            tracing::debug!(
                "Dropping stale page {} of epoch {} (current epoch {})",
                ticket.page,
                ticket.epoch,
                self.epoch
            );
            return false;
        }

        // 服务端保证各页互不重叠，按原顺序追加，不去重
        self.state.accumulated.extend(result.items);
        self.state.page_count = result.page_count;
        self.finish_request();

        tracing::debug!(
            "Page {}/{} merged, {} results in total",
            ticket.page,
            self.state.page_count,
            self.state.accumulated.len()
        );
        true
    }

    /// 页请求失败
    ///
    /// 当前页回退到失败请求之前，重试时请求的是同一页
    pub fn fail(&mut self, ticket: PageTicket, error: BrowseError) -> bool {
        if !self.accepts(ticket) {
            tracing::debug!("Dropping stale failure for page {} of epoch {}", ticket.page, ticket.epoch);
            return false;
        }

        tracing::warn!("Failed to fetch page {}: {}", ticket.page, error);
        self.state.current_page = ticket.page.saturating_sub(1);
        self.finish_request();
        self.last_error = Some(error);
        true
    }

    pub fn status(&self) -> BrowseStatus {
        let state = &self.state;

        if self.is_dormant() || state.page_loading || (state.query_loading && state.accumulated.is_empty()) {
            BrowseStatus::Loading
        } else if self.last_error.is_some() {
            BrowseStatus::Errored
        } else if state.is_exhausted() && !state.accumulated.is_empty() {
            BrowseStatus::End
        } else if state.page_count == 0 && state.accumulated.is_empty() {
            BrowseStatus::Empty
        } else {
            BrowseStatus::Active
        }
    }

    fn accepts(&self, ticket: PageTicket) -> bool {
        ticket.epoch == self.epoch && self.in_flight == Some(ticket)
    }

    fn finish_request(&mut self) {
        self.state.page_loading = false;
        self.state.query_loading = false;
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterIntent, Interval, SortDirection, SortField};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn spec(search: &str) -> QuerySpec {
        QuerySpec {
            search: search.to_string(),
            sort_field: if search.is_empty() { SortField::Rating } else { SortField::Relevance },
            sort_direction: SortDirection::Desc,
            filter: FilterIntent {
                genres: BTreeSet::new(),
                production_countries: BTreeSet::new(),
                release_year: Interval::new(1916, 2017),
                runtime: Interval::new(0, 338),
            },
            page: 1,
            page_size: 20,
        }
    }

    fn movies(prefix: &str, n: usize) -> Vec<MovieSummary> {
        (0..n)
            .map(|i| MovieSummary::new(format!("{}{}", prefix, i), format!("Movie {}{}", prefix, i)))
            .collect()
    }

    #[test]
    fn test_dormant_engine() {
        let mut engine = PaginationEngine::new();
        assert!(engine.is_dormant());
        assert_eq!(engine.status(), BrowseStatus::Loading);
        assert!(engine.next_page().is_none());
        assert!(engine.results().is_empty());
    }

    #[test]
    fn test_reset_issues_first_page() {
        let mut engine = PaginationEngine::new();
        let request = engine.reset(spec(""));

        assert_eq!(request.ticket, PageTicket { epoch: 1, page: 1 });
        assert_eq!(request.spec.page, 1);
        assert_eq!(engine.state().current_page, 1);
        assert_eq!(engine.state().page_count, 1);
        assert!(engine.state().query_loading);
        assert_eq!(engine.status(), BrowseStatus::Loading);
    }

    #[test]
    fn test_next_page_after_first_settles() {
        let mut engine = PaginationEngine::new();
        let first = engine.reset(spec(""));
        assert!(engine.settle(first.ticket, PageResult::new(movies("a", 20), 5)));
        assert_eq!(engine.status(), BrowseStatus::Active);

        let second = engine.next_page().unwrap();
        assert_eq!(second.ticket.page, 2);
        assert_eq!(second.spec.page, 2);
        assert!(second.spec.same_query(&first.spec));
        assert!(engine.state().page_loading);
    }

    #[test]
    fn test_no_duplicate_in_flight_requests() {
        let mut engine = PaginationEngine::new();
        let first = engine.reset(spec(""));
        engine.settle(first.ticket, PageResult::new(movies("a", 20), 5));

        let issued: Vec<_> = (0..10).filter_map(|_| engine.next_page()).collect();
        assert_eq!(issued.len(), 1);
        assert_eq!(engine.state().current_page, 2);
    }

    #[test]
    fn test_first_page_outstanding_blocks_next_page() {
        let mut engine = PaginationEngine::new();
        engine.reset(spec(""));
        assert!(engine.next_page().is_none());
    }

    #[test]
    fn test_end_after_all_pages() {
        let mut engine = PaginationEngine::new();
        let first = engine.reset(spec(""));
        engine.settle(first.ticket, PageResult::new(movies("a", 20), 3));

        let second = engine.next_page().unwrap();
        engine.settle(second.ticket, PageResult::new(movies("b", 20), 3));
        assert_eq!(engine.status(), BrowseStatus::Active);

        let third = engine.next_page().unwrap();
        engine.settle(third.ticket, PageResult::new(movies("c", 5), 3));

        assert_eq!(engine.status(), BrowseStatus::End);
        assert_eq!(engine.results().len(), 45);
        assert!(engine.next_page().is_none());
    }

    #[test]
    fn test_empty_result() {
        let mut engine = PaginationEngine::new();
        let first = engine.reset(spec("zzzz"));
        engine.settle(first.ticket, PageResult::empty());

        assert_eq!(engine.status(), BrowseStatus::Empty);
        assert!(engine.next_page().is_none());
    }

    #[test]
    fn test_reset_clears_accumulated() {
        let mut engine = PaginationEngine::new();
        let first = engine.reset(spec(""));
        engine.settle(first.ticket, PageResult::new(movies("a", 20), 5));
        let second = engine.next_page().unwrap();
        engine.settle(second.ticket, PageResult::new(movies("b", 20), 5));

        let request = engine.reset(spec("batman"));
        assert!(engine.results().is_empty());
        assert_eq!(engine.state().current_page, 1);
        assert_eq!(request.ticket.epoch, 2);
        assert_eq!(request.spec.sort_field.as_str(), "none");
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut engine = PaginationEngine::new();
        let first = engine.reset(spec(""));
        engine.settle(first.ticket, PageResult::new(movies("a", 20), 5));
        let stale = engine.next_page().unwrap();

        let fresh = engine.reset(spec("alien"));
        assert!(!engine.settle(stale.ticket, PageResult::new(movies("old", 20), 5)));
        assert!(engine.results().is_empty());
        assert_eq!(engine.status(), BrowseStatus::Loading);

        assert!(engine.settle(fresh.ticket, PageResult::new(movies("new", 3), 1)));
        assert_eq!(engine.results()[0].id, "new0");
        assert_eq!(engine.status(), BrowseStatus::End);
    }

    #[test]
    fn test_duplicate_settle_is_dropped() {
        let mut engine = PaginationEngine::new();
        let first = engine.reset(spec(""));
        assert!(engine.settle(first.ticket, PageResult::new(movies("a", 2), 2)));
        assert!(!engine.settle(first.ticket, PageResult::new(movies("a", 2), 2)));
        assert_eq!(engine.results().len(), 2);
    }

    #[test]
    fn test_failure_allows_retry_of_same_page() {
        let mut engine = PaginationEngine::new();
        let first = engine.reset(spec(""));
        engine.settle(first.ticket, PageResult::new(movies("a", 20), 5));

        let second = engine.next_page().unwrap();
        assert!(engine.fail(second.ticket, BrowseError::Timeout));
        assert_eq!(engine.status(), BrowseStatus::Errored);
        assert!(!engine.state().page_loading);
        assert_eq!(engine.state().current_page, 1);

        let retry = engine.next_page().unwrap();
        assert_eq!(retry.ticket.page, 2);
        assert!(engine.last_error().is_none());
        assert_eq!(engine.status(), BrowseStatus::Loading);
    }

    #[test]
    fn test_first_page_failure_is_retryable() {
        let mut engine = PaginationEngine::new();
        let first = engine.reset(spec(""));
        engine.fail(first.ticket, BrowseError::Http(502));

        assert_eq!(engine.status(), BrowseStatus::Errored);
        let retry = engine.next_page().unwrap();
        assert_eq!(retry.ticket.page, 1);
        assert_eq!(retry.ticket.epoch, first.ticket.epoch);
    }

    #[test]
    fn test_needs_reset_ignores_page() {
        let mut engine = PaginationEngine::new();
        assert!(engine.needs_reset(&spec("")));
        engine.reset(spec(""));
        assert!(!engine.needs_reset(&spec("").for_page(4)));
        assert!(engine.needs_reset(&spec("heat")));
    }

    proptest! {
        #[test]
        fn prop_merge_is_append_only(sizes in proptest::collection::vec(0usize..25, 1..6)) {
            let mut engine = PaginationEngine::new();
            let page_count = sizes.len() as u32;
            let mut expected = Vec::new();

            let mut request = Some(engine.reset(spec("")));
            for (i, size) in sizes.iter().enumerate() {
                let items = movies(&format!("p{}-", i), *size);
                expected.extend(items.clone());
                let ticket = request.take().unwrap().ticket;
                prop_assert!(engine.settle(ticket, PageResult::new(items, page_count)));
                request = engine.next_page();
            }

            prop_assert!(request.is_none());
            prop_assert_eq!(engine.results(), expected.as_slice());
        }
    }
}
