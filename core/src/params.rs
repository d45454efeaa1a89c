//! Request parameters and query-string encoding.

use std::collections::BTreeMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Request parameters. Keys are unique; iteration order is by key.
pub type Params = BTreeMap<String, String>;

/// Everything except the RFC 3986 unreserved characters
/// `ALPHA / DIGIT / "-" / "." / "_" / "~"`.
const RFC3986_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string as UTF-8 with the RFC 3986 unreserved set.
///
/// The same encoding is used for the query string and for the OAuth
/// signature base string, so a signed query can be decoded and re-encoded
/// without changing a byte.
pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, RFC3986_ENCODE_SET).to_string()
}

/// Encode every pair as `key=value` and join with `&`.
pub fn encode_params(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Split an encoded query string back into decoded pairs.
///
/// Returns `None` if a component does not decode to valid UTF-8.
pub fn decode_query(query: &str) -> Option<Vec<(String, String)>> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            let k = percent_decode_str(k).decode_utf8().ok()?;
            let v = percent_decode_str(v).decode_utf8().ok()?;
            Some((k.into_owned(), v.into_owned()))
        })
        .collect()
}

/// Build a [`Params`] map from string pairs.
pub fn params<K, V, I>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
