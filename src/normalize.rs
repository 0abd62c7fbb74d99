//! Input normalization: scheme and whitespace stripping, host/query split
//! and punycode conversion.

const SCHEMES: [&str; 2] = ["http://", "https://"];
const PUNYCODE_MARKER: &str = "xn--";

/// Strip surrounding whitespace and a leading `http://` or `https://`.
///
/// The scheme is only removed at the start of the input (ASCII
/// case-insensitive); scheme-like text later in the URL is left alone.
pub fn trim_url(url: &str) -> &str {
    let url = url.trim();
    for scheme in SCHEMES {
        if let Some(prefix) = url.get(..scheme.len()) {
            if prefix.eq_ignore_ascii_case(scheme) {
                return url[scheme.len()..].trim();
            }
        }
    }
    url
}

/// Split a trimmed URL on the first `/` into host candidate and query.
///
/// The query is everything after that slash, unchanged.
pub fn split_host_and_query(url: &str) -> (&str, Option<&str>) {
    match url.split_once('/') {
        Some((host, query)) => (host, Some(query)),
        None => (url, None),
    }
}

/// Check if the host contains punycode labels
pub fn is_puny_encoded(host: &str) -> bool {
    host.contains(PUNYCODE_MARKER)
}

/// Decode a punycode host to Unicode.
pub fn puny_to_unicode(host: &str) -> Option<String> {
    let (unicode, result) = idna::domain_to_unicode(host);
    result.ok().map(|_| unicode)
}

/// Encode a Unicode domain (one or more labels) to its ASCII-compatible form.
pub fn to_ascii(domain: &str) -> Option<String> {
    idna::domain_to_ascii(domain).ok()
}
