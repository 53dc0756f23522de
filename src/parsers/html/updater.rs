//! Tag and document updaters
//!
//! Which attribute holds the asset URL depends on the element:
//!
//! | element  | attribute                                   |
//! |----------|---------------------------------------------|
//! | `img`    | `src`                                       |
//! | `script` | `src`                                       |
//! | `link`   | `options.link_attribute` (`rel` by default) |

use tracing::warn;

use crate::core::{cachebust_url, CachebustError, CachebustOptions};

use super::tag::{AssetDocument, AssetTag};

/// Elements whose asset reference lives in `src`
pub const SRC_TAG_NAMES: &[&str] = &["img", "script"];
/// Elements whose asset reference lives in `options.link_attribute`
pub const LINK_TAG_NAMES: &[&str] = &["link"];

/// Picks the attribute holding the asset URL for an element kind
pub fn asset_attribute<'a>(
    tag_name: &str,
    options: &'a CachebustOptions,
) -> Result<&'a str, CachebustError> {
    if SRC_TAG_NAMES.contains(&tag_name) {
        Ok("src")
    } else if LINK_TAG_NAMES.contains(&tag_name) {
        Ok(options.link_attribute.as_str())
    } else {
        Err(CachebustError::UnresolvableTagKind(tag_name.to_string()))
    }
}

/// Cachebusts a single tag
///
/// When `field_name` is `None` the attribute is picked by [`asset_attribute`]; tags of any
/// other kind are left alone.  Returns `true` only if the attribute was actually rewritten.
pub fn update_tag<T: AssetTag + ?Sized>(
    tag: &T,
    field_name: Option<&str>,
    options: &CachebustOptions,
) -> bool {
    let tag_name = tag.tag_name();

    let field_name = match field_name {
        Some(field_name) => field_name,
        None => match asset_attribute(&tag_name, options) {
            Ok(field_name) => field_name,
            Err(error) => {
                if !options.quiet {
                    warn!(tag = %tag_name, "{error}");
                }
                return false;
            }
        },
    };

    let attr_value = match tag.get_attribute(field_name) {
        Some(value) if !value.is_empty() => value,
        _ => return false,
    };

    let new_value = cachebust_url(&attr_value, options);
    if new_value == attr_value {
        return false;
    }

    tag.set_attribute(field_name, &new_value);
    true
}

/// Cachebusts every `img`, `script` and `link` element of a document
///
/// `img` and `script` elements are visited first, then `link` elements, each group in
/// document order.  Returns how many tags were rewritten.
pub fn update_document<D: AssetDocument + ?Sized>(
    document: &D,
    options: &CachebustOptions,
) -> usize {
    let mut updated = 0;

    for tag_name in SRC_TAG_NAMES.iter().chain(LINK_TAG_NAMES) {
        let Ok(field_name) = asset_attribute(tag_name, options) else {
            continue;
        };

        for element in document.elements_by_tag_name(tag_name) {
            if update_tag(&element, Some(field_name), options) {
                updated += 1;
            }
        }
    }

    updated
}
