//! # 工具模块
//!
//! 这个模块包含各种工具函数和实用程序：
//!
//! - URL拆分、本地资源路径解析和查询参数重写
//! - 资源文件内容指纹计算
//!
//! # 模块组织
//!
//! - `url` - URL处理、资源路径解析、cachebust 参数合并
//! - `fingerprint` - 文件内容哈希

pub mod fingerprint;
pub mod url;

// Re-export commonly used items for convenience
pub use fingerprint::{fingerprint_bytes, fingerprint_file, DigestAlgorithm};
pub use url::{parse_query, parse_url, resolve_asset_path, rewrite_query, ParsedUrl};
