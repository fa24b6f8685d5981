use serde::{Deserialize, Serialize};

/// 排序字段
///
/// `Relevance` 表示按与搜索词的匹配度排序，仅在搜索词非空时有效
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SortField {
    #[serde(rename = "none")]
    Relevance,
    #[serde(rename = "rating")]
    Rating,
    #[serde(rename = "original_title")]
    Title,
    #[serde(rename = "runtime")]
    Runtime,
    #[serde(rename = "release_date")]
    ReleaseDate,
}

impl SortField {
    /// 后端 `sortBy` 参数的取值
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Relevance => "none",
            SortField::Rating => "rating",
            SortField::Title => "original_title",
            SortField::Runtime => "runtime",
            SortField::ReleaseDate => "release_date",
        }
    }

    /// 菜单中展示的名称
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Relevance => "Relevance",
            SortField::Rating => "Rating",
            SortField::Title => "Title",
            SortField::Runtime => "Runtime",
            SortField::ReleaseDate => "Release date",
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "relevance" => Ok(SortField::Relevance),
            "rating" => Ok(SortField::Rating),
            "original_title" | "title" => Ok(SortField::Title),
            "runtime" => Ok(SortField::Runtime),
            "release_date" | "released" => Ok(SortField::ReleaseDate),
            _ => Err(format!("Invalid sort field: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

/// 排序意图
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SortIntent {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortIntent {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// 没有搜索词时使用的排序：评分降序
    pub fn browse_default() -> Self {
        Self::new(SortField::Rating, SortDirection::Desc)
    }

    /// 按相关度排序时方向不起作用
    pub fn direction_applies(&self) -> bool {
        self.field != SortField::Relevance
    }
}

impl Default for SortIntent {
    fn default() -> Self {
        Self::browse_default()
    }
}
