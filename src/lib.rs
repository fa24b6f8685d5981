// 电影目录浏览客户端库
//
// 本库提供浏览客户端的查询状态编排核心，包括：
// - 响应式意图存储
// - 筛选草稿与提交
// - 排序与搜索联动
// - 查询规格构建与分页合并
// - 目录后端接入

pub mod config;
pub mod external;
pub mod models;
pub mod services;
pub mod shell;

pub use config::BrowserConfig;
pub use services::{BrowseError, BrowseStatus, MovieBrowser};
