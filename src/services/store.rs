// 响应式字段存储
//
// 保存界面层的当前意图（搜索词、排序、筛选、面板开关、弹窗目标），包括：
// - 每个字段独立的 get / set / subscribe
// - set 为同步的整体替换，订阅者在 set 返回前被同步通知
// - 未初始化的字段以 None 表示

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::models::{FilterBounds, FilterIntent, SortIntent};

/// 订阅句柄，用于取消订阅
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

/// 单个可观察字段
pub struct Field<T> {
    value: RwLock<T>,
    subscribers: RwLock<Vec<(SubscriptionId, Subscriber<T>)>>,
}

impl<T: Clone> Field<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: RwLock::new(initial),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    pub fn get(&self) -> T {
        match self.value.read() {
            Ok(value) => value.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// 在不克隆的情况下读取当前值
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        match self.value.read() {
            Ok(value) => f(&*value),
            Err(poisoned) => f(&*poisoned.into_inner()),
        }
    }

    /// 整体替换字段值并同步通知所有订阅者
    pub fn set(&self, value: T) {
        {
            let mut slot = match self.value.write() {
                Ok(slot) => slot,
                Err(poisoned) => poisoned.into_inner(),
            };
            *slot = value.clone();
        }
        // 通知前释放值锁，订阅者可以读取任意字段
        self.notify(&value);
    }

    pub fn subscribe(&self, subscriber: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed));
        let subscriber: Subscriber<T> = Arc::new(subscriber);
        if let Ok(mut subscribers) = self.subscribers.write() {
            subscribers.push((id, subscriber));
        }
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if let Ok(mut subscribers) = self.subscribers.write() {
            let before = subscribers.len();
            subscribers.retain(|(existing, _)| *existing != id);
            return subscribers.len() != before;
        }
        false
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().map(|s| s.len()).unwrap_or(0)
    }

    fn notify(&self, value: &T) {
        // 先复制订阅者列表，回调中订阅或取消订阅不会死锁
        let snapshot: Vec<Subscriber<T>> = match self.subscribers.read() {
            Ok(subscribers) => subscribers.iter().map(|(_, s)| s.clone()).collect(),
            Err(_) => return,
        };
        for subscriber in snapshot {
            subscriber(value);
        }
    }
}

impl<T: Clone + PartialEq> Field<T> {
    /// 仅在值发生变化时写入，返回是否写入
    pub fn replace_if_changed(&self, value: T) -> bool {
        if self.with(|current| *current == value) {
            return false;
        }
        self.set(value);
        true
    }
}

impl<T: Clone + Default> Default for Field<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + std::fmt::Debug> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("value", &self.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// 浏览客户端的全部界面意图字段
///
/// 以 `Arc<FieldStore>` 注入各组件，而不是作为全局变量导入
#[derive(Debug)]
pub struct FieldStore {
    pub search_open: Field<bool>,
    /// 已提交的搜索词（提交时写入，而非每次按键）
    pub search: Field<String>,
    pub sort_open: Field<bool>,
    pub sort: Field<SortIntent>,
    pub filter_open: Field<bool>,
    /// 筛选面板打开期间编辑的草稿
    pub filter_draft: Field<Option<FilterIntent>>,
    /// 已提交的筛选，首次取得边界之前为 None
    pub filter: Field<Option<FilterIntent>>,
    pub filter_bounds: Field<Option<FilterBounds>>,
    pub popup_open: Field<bool>,
    pub popup_movie: Field<Option<String>>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self {
            search_open: Field::new(false),
            search: Field::new(String::new()),
            sort_open: Field::new(false),
            sort: Field::new(SortIntent::browse_default()),
            filter_open: Field::new(false),
            filter_draft: Field::new(None),
            filter: Field::new(None),
            filter_bounds: Field::new(None),
            popup_open: Field::new(false),
            popup_movie: Field::new(None),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for FieldStore {
    fn default() -> Self {
        Self::new()
    }
}
