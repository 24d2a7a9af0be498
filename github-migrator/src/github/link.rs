//! `Link` header parsing.

use url::Url;

/// Extracts the `rel="next"` target of a `Link` header.
///
/// Entries that are not `<url>; rel="..."` pairs or whose URL does not parse
/// are ignored.
#[must_use]
pub fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';').map(str::trim);
        let target = parts.next()?.strip_prefix('<')?.strip_suffix('>')?;
        let is_next = parts.any(|param| {
            param
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"'))
                .is_some_and(|rel| rel.split_whitespace().any(|r| r == "next"))
        });
        if !is_next {
            return None;
        }
        Url::parse(target).ok().map(String::from)
    })
}
