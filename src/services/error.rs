// 浏览模块错误类型定义
//
// 定义了获取筛选边界、分页查询与详情查询中可能出现的错误

use thiserror::Error;

/// 浏览操作的统一错误类型
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BrowseError {
    #[error("网络错误: {0}")]
    Network(String),

    #[error("请求超时")]
    Timeout,

    #[error("HTTP 错误: 状态码 {0}")]
    Http(u16),

    #[error("查询错误: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("响应解析失败: {0}")]
    Decode(String),

    #[error("响应缺少数据: {0}")]
    MissingData(&'static str),

    #[error("配置错误: {0}")]
    InvalidConfig(String),
}

impl BrowseError {
    /// 是否值得由用户重试
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BrowseError::Network(_) | BrowseError::Timeout | BrowseError::Http(500..=599)
        )
    }
}

// 实现从 reqwest::Error 到 BrowseError 的转换
impl From<reqwest::Error> for BrowseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BrowseError::Timeout
        } else if err.is_status() {
            if let Some(status) = err.status() {
                BrowseError::Http(status.as_u16())
            } else {
                BrowseError::Network(err.to_string())
            }
        } else if err.is_decode() {
            BrowseError::Decode(err.to_string())
        } else {
            BrowseError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BrowseError {
    fn from(err: serde_json::Error) -> Self {
        BrowseError::Decode(err.to_string())
    }
}

/// Result类型别名
pub type BrowseResult<T> = Result<T, BrowseError>;
