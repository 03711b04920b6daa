//! Query string parsing and rendering.

use crate::error::ExtractionError;
use crate::params::Params;
use indexmap::IndexMap;

/// Parses a URL-encoded query string into ordered parameters.
///
/// An absent or empty query yields no parameters. Repeated names are kept.
///
/// # Errors
///
/// Returns an error if the query cannot be decoded.
pub fn parse_query(query: Option<&str>) -> Result<Params, ExtractionError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query.unwrap_or(""))
        .map_err(ExtractionError::query)?;
    Ok(pairs.into_iter().collect())
}

/// Renders parameters as a dict literal, e.g. `{'offset': '10', 'mode': 'test'}`.
///
/// For repeated names the last value wins; names keep the position where
/// they first appeared. This is the form logged under `PARAMS`.
///
/// ```
/// use edge_extract::{params_repr, Params};
///
/// let params: Params = [("a", "1"), ("b", "it's"), ("a", "2")].into_iter().collect();
/// assert_eq!(params_repr(&params), r#"{'a': '2', 'b': "it's"}"#);
/// assert_eq!(params_repr(&Params::new()), "{}");
/// ```
#[must_use]
pub fn params_repr(params: &Params) -> String {
    let mut merged: IndexMap<&str, &str> = IndexMap::new();
    for (name, value) in params {
        merged.insert(name, value);
    }

    let body = merged
        .iter()
        .map(|(name, value)| format!("{}: {}", quote(name), quote(value)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{body}}}")
}

/// Quotes a string literal: single quotes unless the text contains a single
/// quote and no double quote.
fn quote(text: &str) -> String {
    let delim = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(text.len() + 2);
    out.push(delim);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let params = parse_query(Some("offset=2024-01-01&mode=_all_&mode=test")).unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("offset"), Some("2024-01-01"));
        assert_eq!(params.get_last("mode"), Some("test"));
    }

    #[test]
    fn test_parse_query_decodes() {
        let params = parse_query(Some("q=road+works&x=%D0%B0")).unwrap();
        assert_eq!(params.get("q"), Some("road works"));
        assert_eq!(params.get("x"), Some("а"));
    }

    #[test]
    fn test_parse_empty_and_absent() {
        assert!(parse_query(None).unwrap().is_empty());
        assert!(parse_query(Some("")).unwrap().is_empty());
    }

    #[test]
    fn test_repr_single_pair() {
        let params: Params = [("opt_pretty", "1")].into_iter().collect();
        assert_eq!(params_repr(&params), "{'opt_pretty': '1'}");
    }

    #[test]
    fn test_repr_escapes() {
        assert_eq!(quote("a\\b"), r"'a\\b'");
        assert_eq!(quote("line\nbreak"), r"'line\nbreak'");
        assert_eq!(quote(r#"both ' and ""#), r#"'both \' and "'"#);
        assert_eq!(quote("\u{1}"), r"'\x01'");
    }
}
