//! Namespace prefix management and IRI compaction.
//!
//! A [`PrefixMap`] maps prefixes to namespace IRIs and drives the
//! compaction of absolute IRIs into `prefix:local` or base-relative form.
//! Compaction is role-aware: predicates and type objects never use
//! base-relative form, and type objects never compact to an empty local
//! name.
//!
//! When auto-synthesis is enabled, the map can invent a prefix for an
//! unknown namespace: hyphenated components contribute their initials
//! (`test-complex-ontology` → `tco`), collisions are resolved with a
//! numeric suffix, and the result is registered so later lookups are
//! stable.

use indexmap::IndexMap;
use lazy_static::lazy_static;

use crate::iri::{relativize, RelativizationOptions};
use crate::term::Iri;

lazy_static! {
    /// Curated default namespace table.
    static ref DEFAULT_PREFIXES: Vec<(&'static str, &'static str)> = vec![
        ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
        ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
        ("xsd", "http://www.w3.org/2001/XMLSchema#"),
        ("foaf", "http://xmlns.com/foaf/0.1/"),
        ("schema", "https://schema.org/"),
        ("dc", "http://purl.org/dc/elements/1.1/"),
        ("dcterms", "http://purl.org/dc/terms/"),
        ("skos", "http://www.w3.org/2004/02/skos/core#"),
        ("owl", "http://www.w3.org/2002/07/owl#"),
        ("vcard", "http://www.w3.org/2006/vcard/ns#"),
        ("geo", "http://www.w3.org/2003/01/geo/wgs84_pos#"),
        ("prov", "http://www.w3.org/ns/prov#"),
        ("void", "http://rdfs.org/ns/void#"),
        ("time", "http://www.w3.org/2006/time#"),
        ("gr", "http://purl.org/goodrelations/v1#"),
    ];
}

/// The syntactic role an IRI plays at its emission site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IriRole {
    /// Subject position.
    Subject,
    /// Predicate position. Never base-relative.
    Predicate,
    /// Object of an `rdf:type` statement. Never base-relative, never the
    /// empty local name.
    TypeObject,
    /// Any other object position.
    Object,
    /// An IRI inside a base-URI context such as a JSON-LD `@base`.
    BaseContext,
}

impl IriRole {
    fn permits_base_relative(self) -> bool {
        !matches!(self, IriRole::Predicate | IriRole::TypeObject)
    }
}

/// Options controlling [`PrefixMap::compact_iri`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CompactionOptions {
    /// Permit all-digit local names in prefixed form. Off by default; an
    /// all-digit local is then emitted as a full IRI.
    pub use_numeric_local_names: bool,
    /// Constraints for base-relative candidates.
    pub relativization: RelativizationOptions,
}

impl Default for CompactionOptions {
    fn default() -> Self {
        CompactionOptions {
            use_numeric_local_names: false,
            relativization: RelativizationOptions::default(),
        }
    }
}

/// The result of compacting one IRI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompactedIri {
    /// A base-relative reference.
    Relative(String),
    /// `prefix:local` form; fields are the prefix and the local name.
    Prefixed(String, String),
    /// The full absolute IRI.
    Absolute(String),
}

impl CompactedIri {
    /// Render in Turtle syntax (`<…>` for IRIs, bare for prefixed names).
    #[must_use]
    pub fn to_turtle(&self) -> String {
        match self {
            CompactedIri::Relative(relative) => format!("<{relative}>"),
            CompactedIri::Prefixed(prefix, local) => format!("{prefix}:{local}"),
            CompactedIri::Absolute(iri) => format!("<{iri}>"),
        }
    }

    /// The prefix this compaction used, if any.
    #[must_use]
    pub fn used_prefix(&self) -> Option<&str> {
        match self {
            CompactedIri::Prefixed(prefix, _) => Some(prefix),
            _ => None,
        }
    }
}

/// An ordered mapping from prefixes to namespace IRIs.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PrefixMap {
    entries: IndexMap<String, String>,
}

impl PrefixMap {
    /// Create an empty prefix map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map pre-populated with the curated default namespaces
    /// (rdf, rdfs, xsd, foaf, schema, dc, dcterms, skos, owl, vcard, geo,
    /// prov, void, time, gr).
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut map = PrefixMap::new();
        for (prefix, namespace) in DEFAULT_PREFIXES.iter() {
            map.insert(*prefix, *namespace);
        }
        map
    }

    /// Register a prefix, replacing any previous binding.
    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.entries.insert(prefix.into(), namespace.into());
    }

    /// The namespace bound to a prefix.
    #[must_use]
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.entries.get(prefix).map(String::as_str)
    }

    /// Whether the prefix is bound.
    #[must_use]
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.entries.contains_key(prefix)
    }

    /// Number of bound prefixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no prefixes are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(prefix, namespace)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(prefix, namespace)| (prefix.as_str(), namespace.as_str()))
    }

    /// Merge another map into this one; other's bindings win on conflict.
    pub fn extend_from(&mut self, other: &PrefixMap) {
        for (prefix, namespace) in other.iter() {
            self.insert(prefix, namespace);
        }
    }

    /// Expand a prefixed name to a full IRI.
    #[must_use]
    pub fn expand(&self, prefix: &str, local: &str) -> Option<Iri> {
        self.namespace(prefix)
            .map(|namespace| Iri::new_unchecked(format!("{namespace}{local}")))
    }

    /// The longest registered namespace that prefixes `iri` with a valid
    /// PN_LOCAL remainder. Returns `(prefix, local)`.
    #[must_use]
    pub fn find_longest_match<'a>(&self, iri: &'a str) -> Option<(&str, &'a str)> {
        let mut best: Option<(&str, &str)> = None;
        for (prefix, namespace) in &self.entries {
            if let Some(local) = iri.strip_prefix(namespace.as_str()) {
                if is_valid_local_name(local)
                    && best.map_or(true, |(_, l)| local.len() < l.len())
                {
                    best = Some((prefix.as_str(), local));
                }
            }
        }
        best
    }

    /// Compact one IRI for the given role.
    ///
    /// Follows the role rules described in the
    /// [module documentation](self); see [`CompactionOptions`] for the
    /// tunables.
    #[must_use]
    pub fn compact_iri(
        &self,
        iri: &str,
        role: IriRole,
        base: Option<&str>,
        options: &CompactionOptions,
    ) -> CompactedIri {
        if role.permits_base_relative() {
            if let Some(base) = base {
                let relative = relativize(base, iri, &options.relativization);
                if relative != iri {
                    return CompactedIri::Relative(relative);
                }
            }
        }

        if let Some((prefix, local)) = self.find_longest_match(iri) {
            let empty_forbidden = role == IriRole::TypeObject && local.is_empty();
            let numeric_forbidden = !options.use_numeric_local_names
                && !local.is_empty()
                && local.chars().all(|c| c.is_ascii_digit());
            if !empty_forbidden && !numeric_forbidden {
                return CompactedIri::Prefixed(prefix.to_string(), local.to_string());
            }
        }

        CompactedIri::Absolute(iri.to_string())
    }

    /// Find or invent a prefix for the namespace of `iri`.
    ///
    /// Returns `false` when the IRI has no usable namespace (no `#` or `/`
    /// delimiter, or an invalid remainder) and nothing was registered.
    pub fn ensure_prefix_for(&mut self, iri: &str) -> bool {
        if self.find_longest_match(iri).is_some() {
            return true;
        }
        let Some(namespace) = namespace_of(iri) else {
            return false;
        };
        let local = &iri[namespace.len()..];
        if !is_valid_local_name(local) {
            return false;
        }
        let prefix = self.synthesize_prefix(&namespace);
        self.insert(prefix, namespace);
        true
    }

    /// Invent a fresh prefix name for a namespace.
    fn synthesize_prefix(&self, namespace: &str) -> String {
        let stem = namespace_stem(namespace);
        let parts: Vec<&str> = stem
            .split(|c: char| matches!(c, '-' | '_' | '.'))
            .filter(|part| !part.is_empty())
            .collect();
        let mut candidate: String = if parts.len() > 1 {
            parts
                .iter()
                .filter_map(|part| part.chars().next())
                .collect()
        } else {
            parts.first().copied().unwrap_or("ns").to_string()
        };
        candidate = candidate
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();
        if candidate.len() > 8 {
            candidate.truncate(8);
        }
        if candidate.is_empty() {
            candidate = "ns".to_string();
        }
        if candidate.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            candidate.insert(0, 'n');
        }
        if !self.entries.contains_key(&candidate) {
            return candidate;
        }
        let mut counter = 2;
        loop {
            let numbered = format!("{candidate}{counter}");
            if !self.entries.contains_key(&numbered) {
                return numbered;
            }
            counter += 1;
        }
    }
}

impl<'a> IntoIterator for &'a PrefixMap {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The namespace portion of an IRI: everything up to and including the
/// last `#`, or failing that the last `/` after the authority.
#[must_use]
pub fn namespace_of(iri: &str) -> Option<String> {
    if let Some(hash) = iri.rfind('#') {
        return Some(iri[..=hash].to_string());
    }
    let authority_end = iri.find("//").map_or(0, |i| i + 2);
    let slash = iri[authority_end..].rfind('/')? + authority_end;
    if slash + 1 >= iri.len() {
        // the IRI *is* a namespace; no local part to split off
        return None;
    }
    Some(iri[..=slash].to_string())
}

fn namespace_stem(namespace: &str) -> &str {
    let trimmed = namespace.trim_end_matches(['#', '/']);
    let authority_end = trimmed.find("//").map_or(0, |i| i + 2);
    match trimmed[authority_end..].rfind('/') {
        Some(slash) => &trimmed[authority_end + slash + 1..],
        // no path: derive from the host
        None => &trimmed[authority_end..],
    }
}

/// Whether a string is acceptable as the local part of a prefixed name.
///
/// Follows the Turtle 1.1 PN_LOCAL constraints the encoder relies on: no
/// leading `.` or `-`, no trailing `.`, no `..` or `-.` sequences, and no
/// percent-escapes (those would not round-trip through PN_LOCAL). Leading
/// digits are additionally rejected because the strict lexer configuration
/// does not read them back.
#[must_use]
pub fn is_valid_local_name(local: &str) -> bool {
    if local.is_empty() {
        return true;
    }
    if local.starts_with('.') || local.starts_with('-') || local.ends_with('.') {
        return false;
    }
    if local.contains("..") || local.contains("-.") {
        return false;
    }
    if local.contains('%') || local.contains('\\') {
        return false;
    }
    let mut chars = local.chars();
    let first = chars.next().expect("non-empty");
    if !(first.is_alphabetic() || first == '_' || first == ':') {
        return false;
    }
    local
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}
