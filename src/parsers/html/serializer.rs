use encoding_rs::Encoding;
use html5ever::serialize::{serialize, SerializeOpts};
use markup5ever_rcdom::{RcDom, SerializableHandle};

use crate::core::CachebustError;

/// 序列化文档
///
/// The DOM is serialized as UTF-8 first and then re-encoded into `document_encoding`
/// when that names an encoding other than UTF-8.  `<noscript>` text is escaped to match
/// the scripting-disabled parse in [`html_to_dom`](super::html_to_dom).
pub fn serialize_document(
    dom: RcDom,
    document_encoding: &str,
) -> Result<Vec<u8>, CachebustError> {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = dom.document.into();
    let serialize_opts = SerializeOpts {
        scripting_enabled: false,
        ..Default::default()
    };
    serialize(&mut buf, &serializable, serialize_opts)
        .map_err(CachebustError::Serialize)?;

    if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        if encoding != encoding_rs::UTF_8 {
            let s: &str = &String::from_utf8_lossy(&buf);
            let (data, _, _) = encoding.encode(s);
            buf = data.into_owned();
        }
    }

    Ok(buf)
}
