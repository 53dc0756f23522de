//! # Cachebust Library
//!
//! 为 HTML 中引用的本地静态资源加上内容指纹查询参数，使浏览器在文件变化后重新请求。
//!
//! `<script src="/js/app.js?v=2">` becomes
//! `<script src="/js/app.js?v=2&cachebust=<sha256 of app.js>">`.
//!
//! ## 模块组织
//!
//! - `core` - 选项、错误类型、单个 URL 的 cachebust 与文档入口
//! - `parsers` - HTML 解析、标签更新、序列化
//! - `utils` - URL 拆分与重写、资源路径解析、内容指纹
//! - `env` - 环境变量配置
//! - `logging` - 日志初始化

pub mod core;
pub mod env;
pub mod logging;
pub mod parsers;
pub mod utils;

// Re-export commonly used items for convenience
pub use crate::core::*;
pub use parsers::*;
pub use utils::*;
