// 筛选草稿协调器
//
// 筛选面板打开期间所有编辑只写入草稿；面板关闭时，
// 草稿与已提交筛选结构不同才提交，这是筛选编辑进入查询层的唯一途径。

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::models::{FilterBounds, FilterField, FilterIntent};
use crate::services::store::FieldStore;

pub struct FilterDraftReconciler {
    store: Arc<FieldStore>,
}

impl FilterDraftReconciler {
    pub fn new(store: Arc<FieldStore>) -> Self {
        Self { store }
    }

    /// 用服务端边界初始化草稿，`also_commit` 时同时覆盖已提交筛选
    ///
    /// 首次取得边界时以 `also_commit = true` 调用；面板中点击“重置”时以 false 调用
    pub fn initialize_from_bounds(&self, bounds: &FilterBounds, also_commit: bool) {
        let defaults = FilterIntent::from_bounds(bounds);

        self.store.filter_bounds.replace_if_changed(Some(bounds.clone()));
        self.store.filter_draft.set(Some(defaults.clone()));

        if also_commit {
            self.store.filter.set(Some(defaults));
        }
    }

    /// 重置草稿为完整边界，已提交筛选保持不变
    ///
    /// 只在面板打开期间生效
    pub fn reset_draft(&self) -> bool {
        if !self.store.filter_open.get() {
            tracing::debug!("Ignoring filter reset: panel is closed");
            return false;
        }
        match self.store.filter_bounds.get() {
            Some(bounds) => {
                self.initialize_from_bounds(&bounds, false);
                true
            }
            None => false,
        }
    }

    /// 替换草稿中的一个字段，草稿未初始化时不做任何事
    ///
    /// 区间在写入前修正到边界以内
    pub fn update_draft_field(&self, field: FilterField) -> bool {
        let draft = match self.store.filter_draft.get() {
            Some(draft) => draft,
            None => {
                tracing::debug!("Ignoring {} edit: filter draft not initialized", field.name());
                return false;
            }
        };

        let field = self.sanitize(field);
        self.store.filter_draft.set(Some(draft.with_field(field)));
        true
    }

    /// 切换草稿中某个类型的选中状态
    pub fn toggle_genre(&self, genre: &str) -> bool {
        let genres = match self.store.filter_draft.with(|d| d.as_ref().map(|d| d.genres.clone())) {
            Some(genres) => toggled(genres, genre),
            None => return false,
        };
        self.update_draft_field(FilterField::Genres(genres))
    }

    /// 切换草稿中某个制片国家的选中状态
    pub fn toggle_country(&self, country: &str) -> bool {
        let countries = match self
            .store
            .filter_draft
            .with(|d| d.as_ref().map(|d| d.production_countries.clone()))
        {
            Some(countries) => toggled(countries, country),
            None => return false,
        };
        self.update_draft_field(FilterField::ProductionCountries(countries))
    }

    pub fn open_panel(&self) {
        self.store.filter_open.replace_if_changed(true);
    }

    /// 关闭筛选面板，草稿与已提交筛选不同时提交草稿
    ///
    /// 返回是否发生了提交
    pub fn on_panel_close(&self) -> bool {
        self.store.filter_open.replace_if_changed(false);

        let draft = match self.store.filter_draft.get() {
            Some(draft) => draft,
            None => return false,
        };

        let changed = self
            .store
            .filter
            .with(|committed| committed.as_ref() != Some(&draft));

        if changed {
            tracing::debug!("Committing filter draft: {:?}", draft);
            self.store.filter.set(Some(draft));
        }
        changed
    }

    pub fn has_pending_changes(&self) -> bool {
        let draft = self.store.filter_draft.get();
        draft.is_some() && self.store.filter.with(|committed| *committed != draft)
    }

    fn sanitize(&self, field: FilterField) -> FilterField {
        let bounds = match self.store.filter_bounds.get() {
            Some(bounds) => bounds,
            None => return field,
        };
        match field {
            FilterField::ReleaseYear(interval) => {
                FilterField::ReleaseYear(interval.sanitized(bounds.release_year))
            }
            FilterField::Runtime(interval) => FilterField::Runtime(interval.sanitized(bounds.runtime)),
            other => other,
        }
    }
}

fn toggled(mut set: BTreeSet<String>, value: &str) -> BTreeSet<String> {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
    set
}
