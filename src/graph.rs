//! In-memory RDF graphs with set semantics.
//!
//! A [`Graph`] is a mathematical set of [`Triple`]s: duplicates are
//! impossible and iteration order carries no meaning (insertion order is
//! preserved internally so that encoders can produce deterministic output).
//!
//! Graphs are value-typed: every mutating operation returns a new graph and
//! leaves the receiver untouched. A subject-keyed index is built lazily on
//! the first subject-constrained query and lives for the lifetime of the
//! graph instance.
//!
//! # Examples
//!
//! ```ignore
//! use rdfmap::{Graph, Triple, Iri, Literal, TriplePattern};
//!
//! let graph = Graph::from_triples([Triple::new(
//!     Iri::new_unchecked("http://example.org/alice"),
//!     Iri::new_unchecked("http://xmlns.com/foaf/0.1/name"),
//!     Literal::new("Alice"),
//! )]);
//!
//! let hits = graph.find(&TriplePattern::new()
//!     .with_predicate(Iri::new_unchecked("http://xmlns.com/foaf/0.1/name")));
//! assert_eq!(hits.len(), 1);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexSet;

use crate::term::{Iri, Subject, Term};
use crate::triple::Triple;

/// A pattern for matching triples.
///
/// Built fluently; unset positions are wildcards. The `*_in` constraints
/// match disjunctively against a set of terms and combine conjunctively
/// with the single-term constraints.
#[derive(Debug, Clone, Default)]
pub struct TriplePattern {
    subject: Option<Subject>,
    predicate: Option<Iri>,
    object: Option<Term>,
    subject_in: Option<Vec<Subject>>,
    predicate_in: Option<Vec<Iri>>,
    object_in: Option<Vec<Term>>,
}

impl TriplePattern {
    /// Create an empty pattern matching every triple.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain the subject position.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<Subject>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Constrain the predicate position.
    #[must_use]
    pub fn with_predicate(mut self, predicate: Iri) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Constrain the object position.
    #[must_use]
    pub fn with_object(mut self, object: impl Into<Term>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Constrain the subject position to a set of admissible subjects.
    #[must_use]
    pub fn with_subject_in(mut self, subjects: impl IntoIterator<Item = Subject>) -> Self {
        self.subject_in = Some(subjects.into_iter().collect());
        self
    }

    /// Constrain the predicate position to a set of admissible predicates.
    #[must_use]
    pub fn with_predicate_in(mut self, predicates: impl IntoIterator<Item = Iri>) -> Self {
        self.predicate_in = Some(predicates.into_iter().collect());
        self
    }

    /// Constrain the object position to a set of admissible objects.
    #[must_use]
    pub fn with_object_in(mut self, objects: impl IntoIterator<Item = Term>) -> Self {
        self.object_in = Some(objects.into_iter().collect());
        self
    }

    /// Whether a triple satisfies every constraint of this pattern.
    #[must_use]
    pub fn matches(&self, triple: &Triple) -> bool {
        if let Some(subject) = &self.subject {
            if &triple.subject != subject {
                return false;
            }
        }
        if let Some(predicate) = &self.predicate {
            if &triple.predicate != predicate {
                return false;
            }
        }
        if let Some(object) = &self.object {
            if &triple.object != object {
                return false;
            }
        }
        if let Some(subjects) = &self.subject_in {
            if !subjects.contains(&triple.subject) {
                return false;
            }
        }
        if let Some(predicates) = &self.predicate_in {
            if !predicates.contains(&triple.predicate) {
                return false;
            }
        }
        if let Some(objects) = &self.object_in {
            if !objects.contains(&triple.object) {
                return false;
            }
        }
        true
    }

    /// The subjects this pattern can ever match, if it is subject-bounded.
    ///
    /// Used to route the query through the subject index.
    fn bounded_subjects(&self) -> Option<Vec<&Subject>> {
        match (&self.subject, &self.subject_in) {
            (Some(subject), _) => Some(vec![subject]),
            (None, Some(subjects)) => Some(subjects.iter().collect()),
            (None, None) => None,
        }
    }
}

/// An immutable set of triples.
///
/// See the [module documentation](self) for semantics.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: IndexSet<Triple>,
    subject_index: OnceLock<HashMap<Subject, Vec<usize>>>,
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph from triples, deduplicating on the way in.
    #[must_use]
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        Graph {
            triples: triples.into_iter().collect(),
            subject_index: OnceLock::new(),
        }
    }

    /// Number of triples in the graph.
    #[must_use]
    pub fn triple_count(&self) -> usize {
        self.triples.len()
    }

    /// Whether the graph contains no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Whether the graph contains this exact triple.
    #[must_use]
    pub fn has_triple(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Iterate over all triples.
    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Distinct subjects, in first-appearance order.
    #[must_use]
    pub fn subjects(&self) -> Vec<&Subject> {
        let mut seen = IndexSet::new();
        for triple in &self.triples {
            seen.insert(&triple.subject);
        }
        seen.into_iter().collect()
    }

    /// A new graph with this triple added.
    #[must_use]
    pub fn add(&self, triple: Triple) -> Graph {
        let mut triples = self.triples.clone();
        triples.insert(triple);
        Graph::from_triples(triples)
    }

    /// A new graph with all the given triples added.
    #[must_use]
    pub fn add_triples(&self, extra: impl IntoIterator<Item = Triple>) -> Graph {
        let mut triples = self.triples.clone();
        triples.extend(extra);
        Graph::from_triples(triples)
    }

    /// A new graph with this triple removed.
    #[must_use]
    pub fn without_triple(&self, triple: &Triple) -> Graph {
        let mut triples = self.triples.clone();
        triples.shift_remove(triple);
        Graph::from_triples(triples)
    }

    /// Set union with another graph.
    #[must_use]
    pub fn merge(&self, other: &Graph) -> Graph {
        let mut triples = self.triples.clone();
        triples.extend(other.triples.iter().cloned());
        Graph::from_triples(triples)
    }

    /// Set difference: every triple of `self` not present in `other`.
    #[must_use]
    pub fn without_triples(&self, other: &Graph) -> Graph {
        Graph::from_triples(
            self.triples
                .iter()
                .filter(|t| !other.has_triple(t))
                .cloned(),
        )
    }

    /// Triples matching the pattern.
    ///
    /// Subject-bounded patterns are answered through the lazily built
    /// subject index; unbounded patterns scan the whole graph.
    #[must_use]
    pub fn find(&self, pattern: &TriplePattern) -> Vec<&Triple> {
        if let Some(subjects) = pattern.bounded_subjects() {
            let index = self.subject_index();
            let mut out = Vec::new();
            for subject in subjects {
                if let Some(positions) = index.get(subject) {
                    for &position in positions {
                        if let Some(triple) = self.triples.get_index(position) {
                            if pattern.matches(triple) {
                                out.push(triple);
                            }
                        }
                    }
                }
            }
            out
        } else {
            self.triples.iter().filter(|t| pattern.matches(t)).collect()
        }
    }

    /// Whether any triple matches the pattern.
    #[must_use]
    pub fn has(&self, pattern: &TriplePattern) -> bool {
        if let Some(subjects) = pattern.bounded_subjects() {
            let index = self.subject_index();
            subjects.into_iter().any(|subject| {
                index.get(subject).is_some_and(|positions| {
                    positions.iter().any(|&position| {
                        self.triples
                            .get_index(position)
                            .is_some_and(|t| pattern.matches(t))
                    })
                })
            })
        } else {
            self.triples.iter().any(|t| pattern.matches(t))
        }
    }

    /// All triples with the given subject.
    #[must_use]
    pub fn triples_with_subject(&self, subject: &Subject) -> Vec<&Triple> {
        let index = self.subject_index();
        index
            .get(subject)
            .map(|positions| {
                positions
                    .iter()
                    .filter_map(|&position| self.triples.get_index(position))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All objects for a subject/predicate pair.
    #[must_use]
    pub fn objects_for(&self, subject: &Subject, predicate: &Iri) -> Vec<&Term> {
        self.triples_with_subject(subject)
            .into_iter()
            .filter(|t| &t.predicate == predicate)
            .map(|t| &t.object)
            .collect()
    }

    /// The first object for a subject/predicate pair, if any.
    #[must_use]
    pub fn object_for(&self, subject: &Subject, predicate: &Iri) -> Option<&Term> {
        self.objects_for(subject, predicate).into_iter().next()
    }

    /// A new graph containing only the triples matching the pattern.
    #[must_use]
    pub fn subgraph_by_pattern(&self, pattern: &TriplePattern) -> Graph {
        Graph::from_triples(self.find(pattern).into_iter().cloned())
    }

    fn subject_index(&self) -> &HashMap<Subject, Vec<usize>> {
        self.subject_index.get_or_init(|| {
            let mut index: HashMap<Subject, Vec<usize>> = HashMap::new();
            for (position, triple) in self.triples.iter().enumerate() {
                index.entry(triple.subject.clone()).or_default().push(position);
            }
            index
        })
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        // IndexSet equality is order-insensitive, matching set semantics
        self.triples == other.triples
    }
}

impl Eq for Graph {}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Graph::from_triples(iter)
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = indexmap::set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = indexmap::set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for triple in &self.triples {
            writeln!(f, "{triple}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{BlankNode, Literal};

    fn iri(s: &str) -> Iri {
        Iri::new_unchecked(s)
    }

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(iri(s), iri(p), iri(o))
    }

    #[test]
    fn test_graph_deduplicates_on_add() {
        let t = triple("http://ex/s", "http://ex/p", "http://ex/o");
        let graph = Graph::new().add(t.clone()).add(t.clone());
        assert_eq!(graph.triple_count(), 1);
        assert_eq!(graph, Graph::new().add(t));
    }

    #[test]
    fn test_add_leaves_original_untouched() {
        let graph = Graph::new();
        let bigger = graph.add(triple("http://ex/s", "http://ex/p", "http://ex/o"));
        assert!(graph.is_empty());
        assert_eq!(bigger.triple_count(), 1);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let graph = Graph::from_triples([
            triple("http://ex/s", "http://ex/p", "http://ex/o"),
            triple("http://ex/s2", "http://ex/p", "http://ex/o"),
        ]);
        assert_eq!(graph.merge(&graph), graph);
    }

    #[test]
    fn test_subtract_removes_shared_triples() {
        let shared = triple("http://ex/s", "http://ex/p", "http://ex/o");
        let own = triple("http://ex/s2", "http://ex/p2", "http://ex/o2");
        let graph = Graph::from_triples([shared.clone(), own.clone()]);
        let remainder = graph.without_triples(&Graph::from_triples([shared]));
        assert_eq!(remainder.triple_count(), 1);
        assert!(remainder.has_triple(&own));
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = triple("http://ex/a", "http://ex/p", "http://ex/o");
        let b = triple("http://ex/b", "http://ex/p", "http://ex/o");
        let forward = Graph::from_triples([a.clone(), b.clone()]);
        let backward = Graph::from_triples([b, a]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_find_with_subject_uses_index() {
        let graph = Graph::from_triples([
            triple("http://ex/s", "http://ex/p", "http://ex/o1"),
            triple("http://ex/s", "http://ex/q", "http://ex/o2"),
            triple("http://ex/other", "http://ex/p", "http://ex/o3"),
        ]);
        let subject = Subject::Iri(iri("http://ex/s"));
        let hits = graph.find(&TriplePattern::new().with_subject(subject.clone()));
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|t| t.subject == subject));
    }

    #[test]
    fn test_find_with_set_constraints() {
        let graph = Graph::from_triples([
            triple("http://ex/a", "http://ex/p", "http://ex/o"),
            triple("http://ex/b", "http://ex/p", "http://ex/o"),
            triple("http://ex/c", "http://ex/p", "http://ex/o"),
        ]);
        let hits = graph.find(
            &TriplePattern::new().with_subject_in([
                Subject::Iri(iri("http://ex/a")),
                Subject::Iri(iri("http://ex/c")),
            ]),
        );
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_find_by_object() {
        let graph = Graph::from_triples([
            Triple::new(iri("http://ex/s"), iri("http://ex/p"), Literal::new("x")),
            triple("http://ex/s", "http://ex/p", "http://ex/o"),
        ]);
        let hits = graph.find(&TriplePattern::new().with_object(Literal::new("x")));
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_objects_for_subject_predicate() {
        let subject = Subject::BlankNode(BlankNode::new());
        let graph = Graph::from_triples([
            Triple::new(subject.clone(), iri("http://ex/p"), Literal::new("a")),
            Triple::new(subject.clone(), iri("http://ex/p"), Literal::new("b")),
            Triple::new(subject.clone(), iri("http://ex/q"), Literal::new("c")),
        ]);
        let objects = graph.objects_for(&subject, &iri("http://ex/p"));
        assert_eq!(objects.len(), 2);
        assert_eq!(graph.object_for(&subject, &iri("http://ex/q")), Some(&Term::Literal(Literal::new("c"))));
    }

    #[test]
    fn test_subgraph_by_pattern() {
        let graph = Graph::from_triples([
            triple("http://ex/s", "http://ex/p", "http://ex/o"),
            triple("http://ex/s2", "http://ex/q", "http://ex/o"),
        ]);
        let sub = graph.subgraph_by_pattern(&TriplePattern::new().with_predicate(iri("http://ex/p")));
        assert_eq!(sub.triple_count(), 1);
    }
}
