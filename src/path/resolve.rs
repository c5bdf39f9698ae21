use memchr::memchr;

use super::segments::{segmentize, strip_slashes};

pub(crate) fn split_query(value: &str) -> (&str, Option<&str>) {
    match memchr(b'?', value.as_bytes()) {
        Some(at) => (&value[..at], Some(&value[at + 1..])),
        None => (value, None),
    }
}

fn attach_query(pathname: String, query: Option<&str>) -> String {
    match query {
        Some(query) => format!("{pathname}?{query}"),
        None => pathname,
    }
}

/// Resolves `to` against `base` with directory-style semantics.
///
/// Absolute targets pass through verbatim. A query-only target merges onto
/// the base pathname. A plain relative target appends to the base directory;
/// a base without a trailing slash resolves against its parent, so
/// `resolve("foo", "/bar")` is `/foo` while `resolve("foo", "/bar/")` is
/// `/bar/foo`. Dot-leading targets walk the full base segment list, popping
/// on `..` and skipping `.`. The target's query is preserved; the base's is
/// discarded.
#[tracing::instrument(level = "trace", fields(to = %to, base = %base))]
pub fn resolve(to: &str, base: &str) -> String {
    if to.starts_with('/') {
        return to.to_string();
    }
    let (to_pathname, to_query) = split_query(to);
    let (base_pathname, _) = split_query(base);
    let to_segments = segmentize(to_pathname);
    let base_segments: Vec<&str> = segmentize(base_pathname)
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect();

    if to_segments.first().is_none_or(|first| first.is_empty()) {
        return attach_query(base_pathname.to_string(), to_query);
    }
    if !to_segments[0].starts_with('.') {
        let mut resolved = base_segments;
        if !base_pathname.ends_with('/') {
            resolved.pop();
        }
        resolved.extend(to_segments.iter().copied().filter(|s| !s.is_empty()));
        return attach_query(format!("/{}", resolved.join("/")), to_query);
    }

    let mut resolved: Vec<&str> = Vec::new();
    for segment in base_segments
        .iter()
        .copied()
        .chain(to_segments.iter().copied())
    {
        match segment {
            ".." => {
                resolved.pop();
            }
            "." | "" => {}
            other => resolved.push(other),
        }
    }
    attach_query(format!("/{}", resolved.join("/")), to_query)
}

/// Joins a base path and a route pattern. A `"/"` pattern uses the base path
/// alone. The result always carries a single trailing slash, so recombining
/// from an original pattern is stable under base changes.
pub fn combine_paths(base_path: &str, pattern: &str) -> String {
    let joined = if pattern == "/" {
        base_path.to_string()
    } else {
        format!("{}/{}", strip_slashes(base_path), strip_slashes(pattern))
    };
    format!("{}/", strip_slashes(&joined))
}

/// Truncates a pattern at its splat marker so descendants inherit a
/// directory-like base.
pub fn strip_splat(path: &str) -> &str {
    match memchr(b'*', path.as_bytes()) {
        Some(at) => &path[..at],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_uses_base_alone_for_root_pattern() {
        assert_eq!(combine_paths("/app", "/"), "app/");
        assert_eq!(combine_paths("/app", "/users/:id"), "app/users/:id/");
        assert_eq!(combine_paths("app/", "settings"), "app/settings/");
        assert_eq!(combine_paths("/", "/"), "/");
    }

    #[test]
    fn strip_splat_truncates_at_marker() {
        assert_eq!(strip_splat("app/files/*"), "app/files/");
        assert_eq!(strip_splat("app/files/*rest/"), "app/files/");
        assert_eq!(strip_splat("app/files/"), "app/files/");
    }

    #[test]
    fn query_only_targets_merge_onto_the_base_pathname() {
        assert_eq!(resolve("?sort=asc", "/inventory/works"), "/inventory/works?sort=asc");
        assert_eq!(resolve("", "/inventory/works"), "/inventory/works");
    }
}
