//! Document id extraction from the request path.
//!
//! Paths have the shape `/<api-root>/<version>/<kind-plural>/<id>[/...]`,
//! e.g. `/api/2.5/tenders/abc123/documents`. Resolution answers one
//! question per kind: "does this path address a document of kind K, and
//! which id?". Probing several kinds against the same path is cheap and
//! never fails for a well-formed path.

use edge_core::PathDecodeError;
use percent_encoding::percent_decode_str;

const KIND_SEGMENT: usize = 3;
const ID_SEGMENT: usize = 4;

/// Percent-decodes a raw path and validates it as UTF-8.
///
/// # Errors
///
/// Returns [`PathDecodeError`] with the byte offset of the first invalid byte
/// in the decoded bytes.
///
/// ```
/// use edge_extract::decode_path;
///
/// assert_eq!(decode_path("/api/2.5/tenders/a%2Fb").unwrap(), "/api/2.5/tenders/a/b");
///
/// let err = decode_path("/api/%FF").unwrap_err();
/// assert_eq!(err.offset, 5);
/// ```
pub fn decode_path(raw: &str) -> Result<String, PathDecodeError> {
    let bytes: Vec<u8> = percent_decode_str(raw).collect();
    match String::from_utf8(bytes) {
        Ok(path) => Ok(path),
        Err(err) => {
            let utf8 = err.utf8_error();
            let reason = match utf8.error_len() {
                Some(len) => format!("invalid utf-8 sequence of {len} bytes"),
                None => "unexpected end of data".to_string(),
            };
            Err(PathDecodeError {
                offset: utf8.valid_up_to(),
                raw: err.into_bytes(),
                reason,
            })
        }
    }
}

/// Returns the id a path addresses for the given kind name.
///
/// An absent or empty path is treated as `/`. Returns `Ok(None)` when the
/// path has too few segments, addresses another kind, or stops right after
/// the kind segment. The id is returned as supplied, without validation.
///
/// Decoding happens before splitting, so an encoded `/` (`%2F`) separates
/// segments.
///
/// # Errors
///
/// Returns [`PathDecodeError`] if the decoded path is not UTF-8. This is a
/// malformed request, not a different route.
///
/// ```
/// use edge_extract::resolve_document_id;
///
/// let id = resolve_document_id(Some("/api/2.5/tenders/abc123"), "Tender").unwrap();
/// assert_eq!(id.as_deref(), Some("abc123"));
///
/// assert_eq!(resolve_document_id(Some("/api/2.5/auctions/abc123"), "Tender").unwrap(), None);
/// assert_eq!(resolve_document_id(None, "Tender").unwrap(), None);
/// ```
pub fn resolve_document_id(path: Option<&str>, kind: &str) -> Result<Option<String>, PathDecodeError> {
    let raw = match path {
        Some(p) if !p.is_empty() => p,
        _ => "/",
    };
    let decoded = decode_path(raw)?;
    let segments: Vec<&str> = decoded.split('/').collect();

    let plural = format!("{}s", kind.to_lowercase());
    if segments.len() <= KIND_SEGMENT || segments[KIND_SEGMENT] != plural {
        return Ok(None);
    }
    Ok(segments.get(ID_SEGMENT).map(|id| (*id).to_string()))
}
