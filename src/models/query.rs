use serde::{Deserialize, Serialize};

use super::{FilterIntent, Interval, SortDirection, SortField};

/// 远程查询规格
///
/// 只有 `page` 会在同一逻辑查询的后续翻页中变化，其余字段共同决定一个查询周期（epoch）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuerySpec {
    pub search: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub filter: FilterIntent,
    pub page: u32,
    pub page_size: u32,
}

/// 查询规格中除页码外的部分，相等即属于同一查询周期
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub search: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub filter: FilterIntent,
}

impl QuerySpec {
    pub fn key(&self) -> QueryKey {
        QueryKey {
            search: self.search.clone(),
            sort_field: self.sort_field,
            sort_direction: self.sort_direction,
            filter: self.filter.clone(),
        }
    }

    pub fn same_query(&self, other: &QuerySpec) -> bool {
        self.search == other.search
            && self.sort_field == other.sort_field
            && self.sort_direction == other.sort_direction
            && self.filter == other.filter
    }

    /// 同一查询的另一页
    pub fn for_page(&self, page: u32) -> QuerySpec {
        QuerySpec {
            page,
            ..self.clone()
        }
    }

    /// 转换为 `movies` 查询的变量
    pub fn to_variables(&self) -> MoviesVariables {
        MoviesVariables {
            search: self.search.clone(),
            sort_by: self.sort_field.as_str().to_string(),
            sort_direction: self.sort_direction.as_str().to_string(),
            filter: FilterVariables {
                genres: self.filter.genres.iter().cloned().collect(),
                production_countries: self.filter.production_countries.iter().cloned().collect(),
                release_date: self.filter.release_year,
                runtime: self.filter.runtime,
            },
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// `movies` 查询的请求变量
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoviesVariables {
    pub search: String,
    pub sort_by: String,
    pub sort_direction: String,
    pub filter: FilterVariables,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterVariables {
    pub genres: Vec<String>,
    pub production_countries: Vec<String>,
    pub release_date: Interval,
    pub runtime: Interval,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn spec() -> QuerySpec {
        QuerySpec {
            search: String::new(),
            sort_field: SortField::Rating,
            sort_direction: SortDirection::Desc,
            filter: FilterIntent {
                genres: BTreeSet::from(["Drama".to_string()]),
                production_countries: BTreeSet::new(),
                release_year: Interval::new(1900, 2020),
                runtime: Interval::new(0, 300),
            },
            page: 1,
            page_size: 20,
        }
    }

    #[test]
    fn test_key_ignores_page() {
        let first = spec();
        let second = first.for_page(3);
        assert_eq!(first.key(), second.key());
        assert!(first.same_query(&second));
        assert_ne!(first, second);
    }

    #[test]
    fn test_variables_json_shape() {
        let json = serde_json::to_value(spec().to_variables()).unwrap();

        assert_eq!(json["search"], "");
        assert_eq!(json["sortBy"], "rating");
        assert_eq!(json["sortDirection"], "DESC");
        assert_eq!(json["filter"]["genres"][0], "Drama");
        assert!(json["filter"]["production_countries"].is_array());
        assert_eq!(json["filter"]["release_date"]["start"], 1900);
        assert_eq!(json["filter"]["runtime"]["end"], 300);
        assert_eq!(json["page"], 1);
        assert_eq!(json["pageSize"], 20);
    }

    #[test]
    fn test_relevance_sort_serializes_as_none() {
        let mut relevance = spec();
        relevance.search = "batman".to_string();
        relevance.sort_field = SortField::Relevance;

        let vars = relevance.to_variables();
        assert_eq!(vars.sort_by, "none");
    }
}
