//! # 解析器模块
//!
//! - `html` - HTML文档解析、资源标签查找与更新、序列化

pub mod html;

// Re-export commonly used items for convenience
pub use html::{
    asset_attribute, html_to_dom, serialize_document, update_document, update_tag, AssetDocument,
    AssetTag,
};
