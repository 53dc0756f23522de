//! 标签与文档的最小能力接口
//!
//! The updaters only need to read a tag's name, get and set one attribute, and list the
//! elements of a given kind.  Keeping those behind traits lets any tree representation be
//! cachebusted, not just the rcdom one produced by html5ever.

use markup5ever_rcdom::Handle;

use super::dom::{find_nodes, get_node_attr, get_node_name, set_node_attr};

/// An element whose asset reference can be read and rewritten
///
/// Setters take `&self`: DOM handles are shared and mutate through interior mutability.
pub trait AssetTag {
    /// Lowercase element name, empty for anything that isn't an element
    fn tag_name(&self) -> String;
    fn get_attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
}

/// A parsed document that can enumerate its elements by kind
pub trait AssetDocument {
    type Tag: AssetTag;

    /// All elements named `tag_name`, in document order
    fn elements_by_tag_name(&self, tag_name: &str) -> Vec<Self::Tag>;
}

impl AssetTag for Handle {
    fn tag_name(&self) -> String {
        get_node_name(self).unwrap_or_default().to_string()
    }

    fn get_attribute(&self, name: &str) -> Option<String> {
        get_node_attr(self, name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        set_node_attr(self, name, value)
    }
}

impl AssetDocument for Handle {
    type Tag = Handle;

    fn elements_by_tag_name(&self, tag_name: &str) -> Vec<Handle> {
        find_nodes(self, &[tag_name])
    }
}
