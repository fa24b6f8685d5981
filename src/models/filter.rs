use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 闭区间 `[start, end]`，约定 `start <= end`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: i32,
    pub end: i32,
}

impl Interval {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, value: i32) -> bool {
        self.start <= value && value <= self.end
    }

    /// 将编辑后的区间修正到 `bounds` 以内
    ///
    /// 规则与输入框失焦时的校验一致：
    /// - 起点小于最小值时取最小值，起点大于终点时取终点
    /// - 终点大于最大值时取最大值，终点小于起点时取起点
    pub fn sanitized(self, bounds: Interval) -> Interval {
        let mut start = self.start;
        let mut end = self.end;

        if start < bounds.start {
            start = bounds.start;
        } else if start > end {
            start = end;
        }

        if end > bounds.end {
            end = bounds.end;
        } else if end < start {
            end = start;
        }

        // 起点超出上界时，终点已被压到上界，起点随之回落
        if start > end {
            start = end;
        }

        Interval { start, end }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// 服务端提供的筛选边界（菜单选项）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterBounds {
    pub genres: Vec<String>,
    pub production_countries: Vec<String>,
    #[serde(rename = "releaseDateInterval")]
    pub release_year: Interval,
    #[serde(rename = "runtimeInterval")]
    pub runtime: Interval,
}

/// 用户筛选意图
///
/// 有两份实时副本：已提交（用于查询）与草稿（筛选面板打开时编辑）。
/// 比较使用结构相等，多选字段为集合语义。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FilterIntent {
    pub genres: BTreeSet<String>,
    pub production_countries: BTreeSet<String>,
    pub release_year: Interval,
    pub runtime: Interval,
}

impl FilterIntent {
    /// 覆盖全部边界、不选任何类型与国家的默认筛选
    pub fn from_bounds(bounds: &FilterBounds) -> Self {
        Self {
            genres: BTreeSet::new(),
            production_countries: BTreeSet::new(),
            release_year: bounds.release_year,
            runtime: bounds.runtime,
        }
    }

    /// 用一个字段的新值构造新的筛选，其余字段保持不变
    pub fn with_field(&self, field: FilterField) -> Self {
        let mut updated = self.clone();
        match field {
            FilterField::Genres(genres) => updated.genres = genres,
            FilterField::ProductionCountries(countries) => updated.production_countries = countries,
            FilterField::ReleaseYear(interval) => updated.release_year = interval,
            FilterField::Runtime(interval) => updated.runtime = interval,
        }
        updated
    }

    pub fn is_unrestricted(&self, bounds: &FilterBounds) -> bool {
        *self == Self::from_bounds(bounds)
    }
}

/// 筛选中可单独替换的一个字段
#[derive(Debug, Clone, PartialEq)]
pub enum FilterField {
    Genres(BTreeSet<String>),
    ProductionCountries(BTreeSet<String>),
    ReleaseYear(Interval),
    Runtime(Interval),
}

impl FilterField {
    pub fn name(&self) -> &'static str {
        match self {
            FilterField::Genres(_) => "genres",
            FilterField::ProductionCountries(_) => "production_countries",
            FilterField::ReleaseYear(_) => "release_year",
            FilterField::Runtime(_) => "runtime",
        }
    }
}
