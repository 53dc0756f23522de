//! HTML解析和处理模块
//!
//! html5ever 负责解析与序列化，本模块只在其上做资源引用的重写：
//!
//! - `dom`: 解析、节点查找、属性读写、字符集探测
//! - `tag`: 更新器所依赖的最小能力接口
//! - `updater`: 单个标签与整个文档的 cachebust 更新
//! - `serializer`: 序列化功能

pub mod dom;
pub mod serializer;
pub mod tag;
pub mod updater;

pub use dom::{
    find_nodes, get_charset, get_node_attr, get_node_name, html_to_dom, set_node_attr,
};
pub use serializer::serialize_document;
pub use tag::{AssetDocument, AssetTag};
pub use updater::{asset_attribute, update_document, update_tag, LINK_TAG_NAMES, SRC_TAG_NAMES};
