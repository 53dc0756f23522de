//! URL 拆分、解析与查询参数重写
//!
//! Asset URLs found in HTML attributes are frequently relative (`/css/site.css`,
//! `img/logo.png`), which `url::Url` refuses to parse without a base.  This module keeps
//! its own component split so that a relative URL stays relative once it's rewritten.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use url::form_urlencoded;

use crate::core::CachebustError;

/// URL schemes that can never point at a file under the asset root
pub const NON_LOCAL_SCHEMES: &[&str] = &["data", "blob", "javascript", "mailto", "tel"];

/// A URL split into the pieces needed to put it back together
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedUrl {
    pub scheme: Option<String>,
    pub authority: Option<String>,
    pub path: String,
    /// Decoded query parameters, in their original order
    pub query: Vec<(String, String)>,
    pub fragment: Option<String>,
}

fn url_regex() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| {
        Regex::new(
            r"(?s)^(?:(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*):)?(?://(?P<authority>[^/?#]*))?(?P<path>[^?#]*)(?:\?(?P<query>[^#]*))?(?:#(?P<fragment>.*))?$",
        )
        .expect("valid URL pattern")
    })
}

/// Splits a raw attribute value into scheme, authority, path, query and fragment
pub fn parse_url(raw_url: &str) -> ParsedUrl {
    let captures = url_regex().captures(raw_url.trim());

    // Every group is optional, so the pattern matches any string
    let group = |name: &str| {
        captures
            .as_ref()
            .and_then(|captures| captures.name(name))
            .map(|m| m.as_str().to_string())
    };

    ParsedUrl {
        scheme: group("scheme"),
        authority: group("authority"),
        path: group("path").unwrap_or_default(),
        query: group("query")
            .map(|query| parse_query(&query))
            .unwrap_or_default(),
        fragment: group("fragment"),
    }
}

/// Decodes a query string into ordered key/value pairs
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Rebuilds `parsed_url` with `param_name` set to `fingerprint`
///
/// Every existing `param_name` pair is dropped (exact, case-sensitive match), the remaining
/// pairs keep their order and the new pair is appended last.
pub fn rewrite_query(parsed_url: &ParsedUrl, param_name: &str, fingerprint: &str) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(
        parsed_url
            .query
            .iter()
            .filter(|(key, _)| key != param_name),
    );
    serializer.append_pair(param_name, fingerprint);
    let query = serializer.finish();

    let mut result = String::new();

    if let Some(scheme) = &parsed_url.scheme {
        result.push_str(scheme);
        result.push(':');
    }
    if let Some(authority) = &parsed_url.authority {
        result.push_str("//");
        result.push_str(authority);
    }
    result.push_str(&parsed_url.path);
    result.push('?');
    result.push_str(&query);
    if let Some(fragment) = &parsed_url.fragment {
        result.push('#');
        result.push_str(fragment);
    }

    result
}

/// Maps an asset URL onto the file it refers to
///
/// A path starting with `/` is looked up under `asset_root`, anything else under
/// `relative_root`.  Scheme and host take no part in the lookup.  Returns the file path
/// together with the parsed URL so that callers can reassemble it.
pub fn resolve_asset_path(
    raw_url: &str,
    asset_root: &Path,
    relative_root: &Path,
) -> Result<(PathBuf, ParsedUrl), CachebustError> {
    let parsed_url = parse_url(raw_url);

    if let Some(scheme) = &parsed_url.scheme {
        if NON_LOCAL_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) {
            return Err(CachebustError::NotLocalAsset(raw_url.to_string()));
        }
    }

    if parsed_url.path.is_empty() {
        return Err(CachebustError::AssetNotFound {
            url: raw_url.to_string(),
            path: relative_root.to_path_buf(),
        });
    }

    // 文件名按解码后的形式查找，写回的 URL 保持原样
    let decoded_path = percent_decode_str(&parsed_url.path).decode_utf8_lossy();

    let path = match decoded_path.strip_prefix('/') {
        Some(root_relative) => asset_root.join(root_relative.trim_start_matches('/')),
        None => relative_root.join(decoded_path.as_ref()),
    };

    if !path.is_file() {
        return Err(CachebustError::AssetNotFound {
            url: raw_url.to_string(),
            path,
        });
    }

    Ok((path, parsed_url))
}
