// 客户端配置
//
// 从环境变量（以及 .env 文件）读取，缺省值适用于本地开发

use std::time::Duration;

use url::Url;

use crate::services::error::{BrowseError, BrowseResult};

/// 每页条数
pub const DEFAULT_PAGE_SIZE: u32 = 20;

const DEFAULT_API_URL: &str = "http://localhost:4000/graphql";

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserConfig {
    /// GraphQL 接口地址
    pub api_url: Url,
    /// 每页条数，运行期间不变
    pub page_size: u32,
    pub request_timeout: Duration,
    /// 详情缓存有效期
    pub detail_cache_ttl: Duration,
}

impl BrowserConfig {
    /// 从环境变量加载配置
    ///
    /// - `CATALOG_API_URL`: 接口地址
    /// - `PAGE_SIZE`: 每页条数
    /// - `REQUEST_TIMEOUT_SECS`: 请求超时（秒）
    /// - `DETAIL_CACHE_TTL_SECS`: 详情缓存有效期（秒）
    pub fn from_env() -> BrowseResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置，便于测试
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BrowseResult<Self> {
        let api_url = lookup("CATALOG_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&api_url)
            .map_err(|e| BrowseError::InvalidConfig(format!("CATALOG_API_URL {}: {}", api_url, e)))?;

        let page_size = parse_number(&lookup, "PAGE_SIZE", DEFAULT_PAGE_SIZE as u64)?;
        let page_size = u32::try_from(page_size)
            .map_err(|_| BrowseError::InvalidConfig(format!("PAGE_SIZE is too large: {}", page_size)))?;
        if page_size == 0 {
            return Err(BrowseError::InvalidConfig("PAGE_SIZE must be positive".to_string()));
        }

        let request_timeout = Duration::from_secs(parse_number(&lookup, "REQUEST_TIMEOUT_SECS", 15)?);
        let detail_cache_ttl =
            Duration::from_secs(parse_number(&lookup, "DETAIL_CACHE_TTL_SECS", 2 * 60 * 60)?);

        Ok(Self {
            api_url,
            page_size,
            request_timeout,
            detail_cache_ttl,
        })
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(15),
            detail_cache_ttl: Duration::from_secs(2 * 60 * 60),
        }
    }
}

fn parse_number(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> BrowseResult<u64> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| BrowseError::InvalidConfig(format!("{} is not a number: {}", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BrowserConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, BrowserConfig::default());
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_overrides() {
        let config = BrowserConfig::from_lookup(lookup(&[
            ("CATALOG_API_URL", "https://movies.example.com/graphql"),
            ("PAGE_SIZE", "40"),
            ("REQUEST_TIMEOUT_SECS", " 5 "),
        ]))
        .unwrap();

        assert_eq!(config.api_url.host_str(), Some("movies.example.com"));
        assert_eq!(config.page_size, 40);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            BrowserConfig::from_lookup(lookup(&[("CATALOG_API_URL", "not a url")])),
            Err(BrowseError::InvalidConfig(_))
        ));
        assert!(BrowserConfig::from_lookup(lookup(&[("PAGE_SIZE", "0")])).is_err());
        assert!(BrowserConfig::from_lookup(lookup(&[("PAGE_SIZE", "twenty")])).is_err());
    }

    #[test]
    fn test_page_size_out_of_range() {
        // 超出 u32 的值不能被截断成一个看似合法的页大小
        assert!(matches!(
            BrowserConfig::from_lookup(lookup(&[("PAGE_SIZE", "4294967297")])),
            Err(BrowseError::InvalidConfig(_))
        ));
        let config = BrowserConfig::from_lookup(lookup(&[("PAGE_SIZE", "4294967295")])).unwrap();
        assert_eq!(config.page_size, u32::MAX);
    }
}
