use std::rc::Rc;

use encoding_rs::Encoding;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{namespace_url, ns, parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::core::CachebustError;

/// 将 HTML 字节按给定编码转换为 DOM
///
/// Scripting is disabled while parsing so that `<noscript>` fallbacks come out as elements
/// rather than raw text.  `<template>` contents are moved under their template element.
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> Result<RcDom, CachebustError> {
    let s: String = if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        let (string, _, _) = encoding.decode(data);
        string.into_owned()
    } else {
        String::from_utf8_lossy(data).into_owned()
    };

    let parse_opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_document(RcDom::default(), parse_opts)
        .from_utf8()
        .read_from(&mut s.as_bytes())
        .map_err(CachebustError::Parse)?;

    adopt_template_contents(&dom.document);

    Ok(dom)
}

/// 将 `<template>` 的内容片段挂回模板元素本身
///
/// html5ever keeps template children in a separate fragment which neither `find_nodes` nor
/// the rcdom serializer visit.  Re-parsing the serialized output puts them back into a
/// fragment, so the move is invisible in the resulting HTML.
fn adopt_template_contents(node: &Handle) {
    if let NodeData::Element {
        template_contents, ..
    } = &node.data
    {
        if let Some(fragment) = template_contents.borrow_mut().take() {
            let adopted: Vec<Handle> = fragment.children.borrow_mut().drain(..).collect();
            for child in adopted {
                child.parent.set(Some(Rc::downgrade(node)));
                node.children.borrow_mut().push(child);
            }
        }
    }

    for child_node in node.children.borrow().iter() {
        adopt_template_contents(child_node);
    }
}

/// 查找指定路径的DOM节点
///
/// With a single name every matching element at any depth is returned, in document order.
/// Longer paths have to match element by element from the top, e.g. `["html", "head", "meta"]`.
pub fn find_nodes(node: &Handle, node_names: &[&str]) -> Vec<Handle> {
    let mut found_nodes = Vec::new();

    let Some((node_name, rest)) = node_names.split_first() else {
        return found_nodes;
    };

    let is_match = matches!(&node.data, NodeData::Element { name, .. } if &*name.local == *node_name);

    if rest.is_empty() {
        if is_match {
            found_nodes.push(node.clone());
        }
        for child_node in node.children.borrow().iter() {
            found_nodes.append(&mut find_nodes(child_node, node_names));
        }
    } else if is_match {
        for child_node in node.children.borrow().iter() {
            found_nodes.append(&mut find_nodes(child_node, rest));
        }
    } else if !matches!(node.data, NodeData::Element { .. }) {
        // Document and other non-element nodes are transparent
        for child_node in node.children.borrow().iter() {
            found_nodes.append(&mut find_nodes(child_node, node_names));
        }
    }

    found_nodes
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 设置节点属性，不存在时添加
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: &str) {
    use html5ever::interface::{Attribute, QualName};
    use html5ever::tendril::format_tendril;
    use html5ever::LocalName;

    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut found_existing_attr: bool = false;

        for attr in attrs_mut.iter_mut() {
            if &*attr.name.local == attr_name {
                found_existing_attr = true;
                attr.value.clear();
                attr.value.push_slice(attr_value);
            }
        }

        if !found_existing_attr {
            attrs_mut.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                value: format_tendril!("{}", attr_value),
            });
        }
    }
}

/// 获取文档字符编码
///
/// Supports both `<meta charset="...">` and
/// `<meta http-equiv="content-type" content="text/html; charset=...">`.
pub fn get_charset(node: &Handle) -> Option<String> {
    for meta_node in find_nodes(node, &["html", "head", "meta"]).iter() {
        if let Some(meta_charset_node_attr_value) = get_node_attr(meta_node, "charset") {
            return Some(meta_charset_node_attr_value.trim().to_string());
        }

        if get_node_attr(meta_node, "http-equiv")
            .unwrap_or_default()
            .eq_ignore_ascii_case("content-type")
        {
            if let Some(content) = get_node_attr(meta_node, "content") {
                return parse_content_type_charset(&content);
            }
        }
    }

    None
}

/// Extracts the charset parameter out of a Content-Type value
pub fn parse_content_type_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .map(str::trim)
        .find_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches('"').to_string())
        })
        .filter(|charset| !charset.is_empty())
}
