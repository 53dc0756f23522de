use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use markup5ever_rcdom::RcDom;
use thiserror::Error;
use tracing::{debug, warn};

use crate::parsers::html::{get_charset, html_to_dom, serialize_document, update_document};
use crate::utils::fingerprint::{fingerprint_file, DigestAlgorithm};
use crate::utils::url::{resolve_asset_path, rewrite_query};

/// Query parameter that carries the fingerprint
pub const DEFAULT_PARAM_NAME: &str = "cachebust";
/// Attribute of `<link>` elements treated as the asset reference
pub const DEFAULT_LINK_ATTRIBUTE: &str = "rel";
pub const DEFAULT_ENCODING: &str = "utf-8";

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// Represents errors that can occur while cachebusting
///
/// `AssetNotFound`, `NotLocalAsset`, `Read` and `UnresolvableTagKind` only ever concern a
/// single asset and are recovered from internally.  The rest abort the whole document.
#[derive(Debug, Error)]
pub enum CachebustError {
    #[error("could not find file for {url}, tried {}", .path.display())]
    AssetNotFound { url: String, path: PathBuf },

    #[error("{0} does not refer to a local file")]
    NotLocalAsset(String),

    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no attribute to cachebust is known for tag <{0}>")]
    UnresolvableTagKind(String),

    #[error("unknown encoding \"{0}\"")]
    UnknownEncoding(String),

    #[error("unable to parse document: {0}")]
    Parse(#[source] io::Error),

    #[error("unable to serialize document: {0}")]
    Serialize(#[source] io::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Configuration options for cachebusting
///
/// Both roots default to `"."`, which the operating system resolves against the
/// process working directory.  Front-ends that want absolute paths in their
/// diagnostics should fill them in once, up front.
#[derive(Clone, Debug)]
pub struct CachebustOptions {
    /// Directory that a leading `/` in a URL maps to
    pub asset_root: PathBuf,
    /// Directory that relative URLs are looked up in
    pub relative_root: PathBuf,
    /// Input encoding; detected from the document when `None`
    pub encoding: Option<String>,
    pub quiet: bool,
    pub param_name: String,
    pub algorithm: DigestAlgorithm,
    pub link_attribute: String,
}

impl Default for CachebustOptions {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("."),
            relative_root: PathBuf::from("."),
            encoding: None,
            quiet: false,
            param_name: DEFAULT_PARAM_NAME.to_string(),
            algorithm: DigestAlgorithm::default(),
            link_attribute: DEFAULT_LINK_ATTRIBUTE.to_string(),
        }
    }
}

impl CachebustOptions {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            ..Default::default()
        }
    }
}

/// Returns `raw_url` with its fingerprint parameter set to the digest of the file it names
///
/// Never fails: if the file can't be found or read, `raw_url` comes back untouched and a
/// warning is logged unless `options.quiet` is set.
pub fn cachebust_url(raw_url: &str, options: &CachebustOptions) -> String {
    let (path, parsed_url) =
        match resolve_asset_path(raw_url, &options.asset_root, &options.relative_root) {
            Ok(resolved) => resolved,
            Err(error) => {
                if !options.quiet {
                    warn!("{error}, not modifying {}", options.param_name);
                }
                return raw_url.to_string();
            }
        };

    let fingerprint = match fingerprint_file(&path, options.algorithm) {
        Ok(fingerprint) => fingerprint,
        Err(error) => {
            if !options.quiet {
                warn!(
                    "exception trying to generate {} of file {}: {error}",
                    options.algorithm,
                    path.display()
                );
            }
            return raw_url.to_string();
        }
    };

    let cachebusted_url = rewrite_query(&parsed_url, &options.param_name, &fingerprint);
    debug!(url = raw_url, path = %path.display(), "{cachebusted_url}");

    cachebusted_url
}

/// Cachebusts every asset reference in an HTML document and returns the serialized result
///
/// # Arguments
///
/// * `input_data` - Raw HTML data as bytes
/// * `options` - Roots, encoding and fingerprint settings
///
/// # Returns
///
/// The document re-encoded in its own encoding, or an error if it couldn't be
/// decoded, parsed or serialized.  Individual assets that can't be fingerprinted
/// never produce an error.
///
/// # Examples
///
/// ```
/// use cachebust::core::{cachebust_html, CachebustOptions};
///
/// let mut options = CachebustOptions::new("/nonexistent");
/// options.quiet = true;
///
/// let html = b"<html><body><img src=\"/logo.png\"></body></html>";
/// let result = cachebust_html(html, &options).unwrap();
/// assert!(String::from_utf8(result).unwrap().contains("src=\"/logo.png\""));
/// ```
pub fn cachebust_html(
    input_data: &[u8],
    options: &CachebustOptions,
) -> Result<Vec<u8>, CachebustError> {
    let (dom, document_encoding) = parse_input(input_data, options.encoding.as_deref())?;

    let updated = update_document(&dom.document, options);
    debug!("updated {updated} asset reference(s)");

    serialize_document(dom, &document_encoding)
}

/// Reads an HTML file and cachebusts it, see [`cachebust_html`]
pub fn cachebust_file(
    path: impl AsRef<Path>,
    options: &CachebustOptions,
) -> Result<Vec<u8>, CachebustError> {
    let path = path.as_ref();
    let input_data = fs::read(path).map_err(|source| CachebustError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    cachebust_html(&input_data, options)
}

/// 解析输入文档并确定其编码
///
/// An explicit encoding must be known to `encoding_rs`.  Without one the document is
/// read as UTF-8 and re-parsed if it declares a valid charset of its own.
fn parse_input(
    input_data: &[u8],
    input_encoding: Option<&str>,
) -> Result<(RcDom, String), CachebustError> {
    if let Some(label) = input_encoding {
        if Encoding::for_label_no_replacement(label.as_bytes()).is_none() {
            return Err(CachebustError::UnknownEncoding(label.to_string()));
        }
        let dom = html_to_dom(input_data, label)?;
        return Ok((dom, label.to_string()));
    }

    let dom = html_to_dom(input_data, DEFAULT_ENCODING)?;

    if let Some(html_charset) = get_charset(&dom.document) {
        if let Some(document_charset) = Encoding::for_label_no_replacement(html_charset.as_bytes())
        {
            if document_charset != encoding_rs::UTF_8 {
                let dom = html_to_dom(input_data, document_charset.name())?;
                return Ok((dom, html_charset));
            }
        }
    }

    Ok((dom, DEFAULT_ENCODING.to_string()))
}

/// Prints an error message to stderr
pub fn print_error_message(msg: &str) {
    if atty::is(atty::Stream::Stderr) {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    } else {
        eprintln!("{msg}");
    }
}
