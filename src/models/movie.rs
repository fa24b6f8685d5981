use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 列表中的电影摘要（卡片展示所需的最小字段）
///
/// 一旦收到即不可变，`id` 在整个目录中唯一且稳定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    #[serde(rename = "imdb_id")]
    pub id: String,
    pub poster_path: Option<String>,
    #[serde(rename = "original_title")]
    pub title: String,
    pub rating: Option<f32>,
}

impl MovieSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            poster_path: None,
            title: title.into(),
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }
}

/// 单页查询结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    #[serde(rename = "movies")]
    pub items: Vec<MovieSummary>,
    pub page_count: u32,
}

impl PageResult {
    pub fn new(items: Vec<MovieSummary>, page_count: u32) -> Self {
        Self { items, page_count }
    }

    /// 没有任何匹配结果的响应
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionCountry {
    pub name: String,
}

/// 弹窗中展示的电影详情
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub original_title: String,
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub production_companies: Vec<String>,
    pub runtime: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_release_date")]
    pub release_date: Option<NaiveDate>,
    pub trailer: Option<String>,
    pub rating: Option<f32>,
}

impl MovieDetail {
    /// 上映年份，没有日期时返回 None
    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|d| d.year())
    }

    pub fn country_names(&self) -> Vec<&str> {
        self.production_countries
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }
}

// 后端返回的日期可能是空字符串、纯日期或带时间的 ISO 字符串
fn deserialize_release_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| parse_release_date(&s)))
}

fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_wire_names() {
        let json = r#"{
            "imdb_id": "tt0372784",
            "poster_path": "/poster.jpg",
            "original_title": "Batman Begins",
            "rating": 8.2
        }"#;

        let movie: MovieSummary = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, "tt0372784");
        assert_eq!(movie.title, "Batman Begins");
        assert_eq!(movie.poster_path.as_deref(), Some("/poster.jpg"));
        assert_eq!(movie.rating, Some(8.2));
    }

    #[test]
    fn test_page_result_wire_names() {
        let json = r#"{
            "movies": [{"imdb_id": "tt1", "poster_path": null, "original_title": "A", "rating": null}],
            "pageCount": 5
        }"#;

        let page: PageResult = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.page_count, 5);
    }

    #[test]
    fn test_detail_release_date_parsing() {
        let json = r#"{
            "original_title": "Heat",
            "overview": "A group of professional bank robbers...",
            "genres": ["Crime", "Drama"],
            "production_countries": [{"name": "United States of America"}],
            "production_companies": ["Warner Bros."],
            "runtime": 170,
            "release_date": "1995-12-15T00:00:00.000Z",
            "trailer": null,
            "rating": 7.9
        }"#;

        let detail: MovieDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.release_year(), Some(1995));
        assert_eq!(detail.country_names(), vec!["United States of America"]);
    }

    #[test]
    fn test_detail_empty_release_date() {
        let json = r#"{"original_title": "Untitled", "release_date": ""}"#;
        let detail: MovieDetail = serde_json::from_str(json).unwrap();
        assert!(detail.release_date.is_none());
        assert!(detail.genres.is_empty());
    }
}
