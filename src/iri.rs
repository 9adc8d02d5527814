//! IRI reference resolution and relativization (RFC 3986 §5).
//!
//! Two pure functions over IRI strings:
//! - [`resolve`] turns a relative reference into an absolute IRI against a
//!   base, implementing the RFC 3986 §5.2 algorithm including path merging
//!   and dot-segment removal.
//! - [`relativize`] computes the shortest relative reference that resolves
//!   back to a given absolute IRI, constrained by
//!   [`RelativizationOptions`]. It is a left inverse of [`resolve`]: every
//!   candidate is verified by resolving it back before it may be returned.

use crate::error::{RdfError, Result};
use crate::term::has_scheme;

/// Constraints on the forms [`relativize`] may produce.
///
/// The four candidate forms, in preference order on equal length:
/// same-document (`#fragment`), absolute-path (`/a/b`), dot-notation
/// (`../a/b`), and the unchanged absolute IRI.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RelativizationOptions {
    /// Maximum number of `../` levels in dot-notation candidates.
    /// `None` means unlimited.
    pub max_up_levels: Option<usize>,
    /// Cap on how many characters longer than the absolute IRI a candidate
    /// may be. `None` means unlimited.
    pub max_additional_length: Option<usize>,
    /// Permit dot-notation that climbs up and descends into a sibling
    /// directory (`../sibling/x`).
    pub allow_sibling_directories: bool,
    /// Permit the absolute-path form (`/a/b`).
    pub allow_absolute_path: bool,
}

impl Default for RelativizationOptions {
    fn default() -> Self {
        RelativizationOptions {
            max_up_levels: None,
            max_additional_length: None,
            allow_sibling_directories: true,
            allow_absolute_path: true,
        }
    }
}

impl RelativizationOptions {
    /// All forms permitted, no limits.
    #[must_use]
    pub fn full() -> Self {
        Self::default()
    }

    /// Only same-document and descending relative paths: no `../`, no
    /// absolute-path form.
    #[must_use]
    pub fn local() -> Self {
        RelativizationOptions {
            max_up_levels: Some(0),
            max_additional_length: None,
            allow_sibling_directories: false,
            allow_absolute_path: false,
        }
    }
}

/// Parsed components of an IRI reference.
#[derive(Debug, Clone, PartialEq, Default)]
struct IriParts<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

fn parse_parts(input: &str) -> IriParts<'_> {
    let mut parts = IriParts::default();
    let mut rest = input;

    if let Some(hash) = rest.find('#') {
        parts.fragment = Some(&rest[hash + 1..]);
        rest = &rest[..hash];
    }
    if let Some(question) = rest.find('?') {
        parts.query = Some(&rest[question + 1..]);
        rest = &rest[..question];
    }
    if let Some(colon) = rest.find(':') {
        let candidate = &rest[..colon];
        let scheme_like = candidate
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && candidate
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if scheme_like && !candidate.contains('/') {
            parts.scheme = Some(candidate);
            rest = &rest[colon + 1..];
        }
    }
    if let Some(after) = rest.strip_prefix("//") {
        let end = after
            .find(|c| matches!(c, '/' | '?' | '#'))
            .unwrap_or(after.len());
        parts.authority = Some(&after[..end]);
        rest = &after[end..];
    }
    parts.path = rest;
    parts
}

fn recompose(parts: &IriParts<'_>) -> String {
    let mut out = String::new();
    if let Some(scheme) = parts.scheme {
        out.push_str(scheme);
        out.push(':');
    }
    if let Some(authority) = parts.authority {
        out.push_str("//");
        out.push_str(authority);
    }
    out.push_str(parts.path);
    if let Some(query) = parts.query {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = parts.fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// RFC 3986 §5.2.4 `remove_dot_segments`.
fn remove_dot_segments(path: &str) -> String {
    let mut input = path.to_string();
    let mut output = String::with_capacity(path.len());

    while !input.is_empty() {
        if input.starts_with("../") {
            input.drain(..3);
        } else if input.starts_with("./") {
            input.drain(..2);
        } else if input.starts_with("/./") {
            input.replace_range(..3, "/");
        } else if input == "/." {
            input.replace_range(.., "/");
        } else if input.starts_with("/../") {
            input.replace_range(..4, "/");
            pop_last_segment(&mut output);
        } else if input == "/.." {
            input.replace_range(.., "/");
            pop_last_segment(&mut output);
        } else if input == "." || input == ".." {
            input.clear();
        } else {
            let start = usize::from(input.starts_with('/'));
            let end = input[start..].find('/').map_or(input.len(), |i| i + start);
            output.push_str(&input[..end]);
            input.drain(..end);
        }
    }
    output
}

fn pop_last_segment(output: &mut String) {
    if let Some(slash) = output.rfind('/') {
        output.truncate(slash);
    } else {
        output.clear();
    }
}

/// RFC 3986 §5.3 path merge.
fn merge_paths(base: &IriParts<'_>, reference_path: &str) -> String {
    if base.authority.is_some() && base.path.is_empty() {
        format!("/{reference_path}")
    } else if let Some(slash) = base.path.rfind('/') {
        format!("{}{}", &base.path[..=slash], reference_path)
    } else {
        reference_path.to_string()
    }
}

/// Resolve a relative IRI reference against an optional base.
///
/// Implements RFC 3986 §5.2. The base's fragment, if any, is ignored per
/// §5.1.
///
/// # Errors
///
/// Returns [`RdfError::MissingBase`] if `relative` has no scheme and no
/// base (or a schemeless base) was supplied.
pub fn resolve(base: Option<&str>, relative: &str) -> Result<String> {
    let r = parse_parts(relative);
    if r.scheme.is_some() {
        let path = remove_dot_segments(r.path);
        return Ok(recompose(&IriParts { path: &path, ..r }));
    }

    let base = match base {
        Some(base) if has_scheme(base) => base,
        _ => return Err(RdfError::MissingBase(relative.to_string())),
    };
    let b = parse_parts(base);

    let (authority, path, query);
    if r.authority.is_some() {
        authority = r.authority;
        path = remove_dot_segments(r.path);
        query = r.query;
    } else {
        authority = b.authority;
        if r.path.is_empty() {
            path = b.path.to_string();
            query = r.query.or(b.query);
        } else {
            if r.path.starts_with('/') {
                path = remove_dot_segments(r.path);
            } else {
                path = remove_dot_segments(&merge_paths(&b, r.path));
            }
            query = r.query;
        }
    }

    Ok(recompose(&IriParts {
        scheme: b.scheme,
        authority,
        path: &path,
        query,
        fragment: r.fragment,
    }))
}

/// Compute the shortest relative form of `absolute` against `base`.
///
/// Returns `absolute` unchanged when no permitted shorter form exists, when
/// `absolute` is not actually absolute, or when base and target differ in
/// scheme or authority. Every returned value satisfies
/// `resolve(base, result) == absolute`.
#[must_use]
pub fn relativize(base: &str, absolute: &str, options: &RelativizationOptions) -> String {
    if !has_scheme(absolute) || !has_scheme(base) {
        return absolute.to_string();
    }
    let b = parse_parts(base);
    let a = parse_parts(absolute);
    if b.scheme != a.scheme || b.authority != a.authority {
        return absolute.to_string();
    }

    // (rank, candidate); rank encodes form preference for equal lengths
    let mut candidates: Vec<(u8, String)> = Vec::new();

    // same-document: fragment-only reference
    if b.path == a.path && b.query == a.query {
        let candidate = match a.fragment {
            Some(fragment) => format!("#{fragment}"),
            None => String::new(),
        };
        candidates.push((0, candidate));
    }

    let suffix = {
        let mut s = String::new();
        if let Some(query) = a.query {
            s.push('?');
            s.push_str(query);
        }
        if let Some(fragment) = a.fragment {
            s.push('#');
            s.push_str(fragment);
        }
        s
    };

    // absolute-path form
    if options.allow_absolute_path && a.path.starts_with('/') {
        candidates.push((1, format!("{}{suffix}", a.path)));
    }

    // dot-notation form
    if a.path.starts_with('/') && b.path.starts_with('/') {
        if let Some(candidate) = dot_notation_candidate(&b, &a, &suffix, options) {
            candidates.push((2, candidate));
        }
    }

    let mut best: Option<(usize, u8, String)> = None;
    for (rank, candidate) in candidates {
        if let Some(max_extra) = options.max_additional_length {
            if candidate.len() > absolute.len().saturating_add(max_extra) {
                continue;
            }
        }
        // left-inverse check: a candidate that does not resolve back is
        // discarded rather than emitted
        match resolve(Some(base), &candidate) {
            Ok(resolved) if resolved == absolute => {}
            _ => continue,
        }
        let key = (candidate.len(), rank);
        if best.as_ref().map_or(true, |(len, r, _)| key < (*len, *r)) {
            best = Some((candidate.len(), rank, candidate));
        }
    }

    match best {
        Some((len, _, candidate)) if len < absolute.len() => candidate,
        Some((len, _, candidate)) if len == absolute.len() => candidate,
        _ => absolute.to_string(),
    }
}

fn dot_notation_candidate(
    base: &IriParts<'_>,
    target: &IriParts<'_>,
    suffix: &str,
    options: &RelativizationOptions,
) -> Option<String> {
    let base_segments: Vec<&str> = base.path[1..].split('/').collect();
    let target_segments: Vec<&str> = target.path[1..].split('/').collect();

    // the "directory" of each path is everything before its final segment
    let base_dir = &base_segments[..base_segments.len().saturating_sub(1)];
    let target_dir = &target_segments[..target_segments.len().saturating_sub(1)];

    let common = base_dir
        .iter()
        .zip(target_dir.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let ups = base_dir.len() - common;
    let downs = &target_segments[common..];

    if let Some(max_up) = options.max_up_levels {
        if ups > max_up {
            return None;
        }
    }
    if !options.allow_sibling_directories && ups > 0 && downs.len() >= 2 {
        return None;
    }

    let mut path = "../".repeat(ups);
    path.push_str(&downs.join("/"));
    if path.is_empty() {
        // same directory, empty final segment: "." would resolve with a
        // trailing slash mismatch, so leave this form out
        return None;
    }
    // a leading segment with a colon would parse as a scheme
    if ups == 0 {
        let first = downs.first().copied().unwrap_or("");
        if first.contains(':') {
            path = format!("./{path}");
        }
    }
    Some(format!("{path}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://a/b/c/d;p?q";

    fn check(relative: &str, expected: &str) {
        assert_eq!(
            resolve(Some(BASE), relative).unwrap(),
            expected,
            "resolving {relative:?}"
        );
    }

    // RFC 3986 §5.4.1 normal examples
    #[test]
    fn test_resolve_normal_examples() {
        check("g", "http://a/b/c/g");
        check("./g", "http://a/b/c/g");
        check("g/", "http://a/b/c/g/");
        check("/g", "http://a/g");
        check("//g", "http://g");
        check("?y", "http://a/b/c/d;p?y");
        check("g?y", "http://a/b/c/g?y");
        check("#s", "http://a/b/c/d;p?q#s");
        check("g#s", "http://a/b/c/g#s");
        check(";x", "http://a/b/c/;x");
        check("", "http://a/b/c/d;p?q");
        check(".", "http://a/b/c/");
        check("./", "http://a/b/c/");
        check("..", "http://a/b/");
        check("../", "http://a/b/");
        check("../g", "http://a/b/g");
        check("../..", "http://a/");
        check("../../", "http://a/");
        check("../../g", "http://a/g");
    }

    // RFC 3986 §5.4.2 abnormal examples
    #[test]
    fn test_resolve_abnormal_examples() {
        check("../../../g", "http://a/g");
        check("../../../../g", "http://a/g");
        check("/./g", "http://a/g");
        check("/../g", "http://a/g");
        check("g.", "http://a/b/c/g.");
        check(".g", "http://a/b/c/.g");
        check("g..", "http://a/b/c/g..");
        check("..g", "http://a/b/c/..g");
        check("./../g", "http://a/b/g");
        check("./g/.", "http://a/b/c/g/");
        check("g/./h", "http://a/b/c/g/h");
        check("g/../h", "http://a/b/c/h");
        check("g;x=1/./y", "http://a/b/c/g;x=1/y");
        check("g;x=1/../y", "http://a/b/c/y");
    }

    #[test]
    fn test_resolve_absolute_reference_passes_through() {
        assert_eq!(
            resolve(Some(BASE), "https://other/x").unwrap(),
            "https://other/x"
        );
        assert_eq!(resolve(None, "https://other/x").unwrap(), "https://other/x");
    }

    #[test]
    fn test_resolve_without_base_fails() {
        let err = resolve(None, "relative/path").unwrap_err();
        assert!(matches!(err, RdfError::MissingBase(_)));
    }

    #[test]
    fn test_resolve_strips_base_fragment() {
        assert_eq!(
            resolve(Some("http://a/b#frag"), "c").unwrap(),
            "http://a/c"
        );
    }

    fn rel(base: &str, abs: &str) -> String {
        relativize(base, abs, &RelativizationOptions::default())
    }

    #[test]
    fn test_relativize_same_document() {
        assert_eq!(rel("http://a/b/c", "http://a/b/c#frag"), "#frag");
        assert_eq!(rel("http://a/b/c", "http://a/b/c"), "");
    }

    #[test]
    fn test_relativize_child_path() {
        assert_eq!(rel("http://a/b/c", "http://a/b/g"), "g");
        assert_eq!(rel("http://a/b/c/", "http://a/b/c/g"), "g");
    }

    #[test]
    fn test_relativize_dot_notation() {
        // the absolute-path form ties ("/b/g") or wins ("/x/y"), so pin the
        // dot-notation form by disabling it
        let options = RelativizationOptions {
            allow_absolute_path: false,
            ..RelativizationOptions::default()
        };
        assert_eq!(
            relativize("http://a/b/c/d", "http://a/b/g", &options),
            "../g"
        );
        assert_eq!(
            relativize("http://a/b/c/d", "http://a/x/y", &options),
            "../../x/y"
        );
        // with every form permitted the shorter absolute path is chosen
        assert_eq!(rel("http://a/b/c/d", "http://a/x/y"), "/x/y");
    }

    #[test]
    fn test_relativize_prefers_shorter_absolute_path() {
        // dot-notation would be "../../../g"; the absolute path "/g" is shorter
        assert_eq!(rel("http://a/b/c/d/e", "http://a/g"), "/g");
    }

    #[test]
    fn test_relativize_foreign_authority_stays_absolute() {
        assert_eq!(rel("http://a/b", "http://other/b"), "http://other/b");
        assert_eq!(rel("http://a/b", "https://a/b"), "https://a/b");
    }

    #[test]
    fn test_relativize_respects_max_up_levels() {
        let options = RelativizationOptions {
            max_up_levels: Some(1),
            allow_absolute_path: false,
            ..RelativizationOptions::default()
        };
        assert_eq!(
            relativize("http://a/b/c/d", "http://a/x/y", &options),
            "http://a/x/y"
        );
        assert_eq!(relativize("http://a/b/c/d", "http://a/b/g", &options), "../g");
    }

    #[test]
    fn test_relativize_sibling_directories_flag() {
        let options = RelativizationOptions {
            allow_sibling_directories: false,
            allow_absolute_path: false,
            ..RelativizationOptions::default()
        };
        // climbing into a sibling directory is rejected
        assert_eq!(
            relativize("http://a/b/c/d", "http://a/b/x/y", &options),
            "http://a/b/x/y"
        );
        // plain parent-file reference is still fine
        assert_eq!(relativize("http://a/b/c/d", "http://a/b/g", &options), "../g");
    }

    #[test]
    fn test_relativize_local_preset_never_climbs() {
        let options = RelativizationOptions::local();
        assert_eq!(
            relativize("http://a/b/c/d", "http://a/b/g", &options),
            "http://a/b/g"
        );
        assert_eq!(relativize("http://a/b/c", "http://a/b/c#f", &options), "#f");
        assert_eq!(relativize("http://a/b/c", "http://a/b/g", &options), "g");
    }

    #[test]
    fn test_relativize_is_left_inverse_of_resolve() {
        let cases = [
            ("http://a/b/c/d?q", "http://a/b/c/e#f"),
            ("http://a/b/", "http://a/b/c/d"),
            ("http://a/b/c", "http://a/"),
            ("http://a/b#frag", "http://a/b"),
            ("http://a/", "http://a/x?y=1#z"),
        ];
        for (base, abs) in cases {
            let relative = rel(base, abs);
            assert_eq!(
                resolve(Some(base), &relative).unwrap(),
                abs,
                "relativize({base}, {abs}) = {relative} must resolve back"
            );
        }
    }

    #[test]
    fn test_relativize_colon_segment_guard() {
        // a bare "x:y" first segment would parse as a scheme
        let relative = rel("http://a/b/c", "http://a/b/x:y");
        assert_eq!(resolve(Some("http://a/b/c"), &relative).unwrap(), "http://a/b/x:y");
        assert!(relative.starts_with("./") || relative.starts_with('/') || has_scheme_free(&relative));
    }

    fn has_scheme_free(s: &str) -> bool {
        !crate::term::has_scheme(s)
    }
}
