//! Root-subject selection for graph → object decoding.
//!
//! Selection order: an explicit caller subject wins; otherwise subjects
//! typed with the mapper's declared `rdf:type`; otherwise subjects not
//! referenced as objects anywhere. Remaining ties break toward the
//! subject with the most distinct outgoing predicates; a persistent tie
//! is an error.

use indexmap::IndexSet;

use crate::error::{MapperError, MapperResult};
use crate::graph::{Graph, TriplePattern};
use crate::term::{Iri, Subject, Term};
use crate::vocab::rdf;

/// Subjects carrying `rdf:type type_iri`, in graph order.
pub(crate) fn subjects_with_type(graph: &Graph, type_iri: &Iri) -> Vec<Subject> {
    let mut seen: IndexSet<Subject> = IndexSet::new();
    for triple in graph.find(
        &TriplePattern::new()
            .with_predicate(rdf::TYPE)
            .with_object(Term::Iri(type_iri.clone())),
    ) {
        seen.insert(triple.subject.clone());
    }
    seen.into_iter().collect()
}

/// Subjects that never appear in object position.
pub(crate) fn unreferenced_subjects(graph: &Graph) -> Vec<Subject> {
    let referenced: IndexSet<Subject> = graph
        .triples()
        .filter_map(|triple| triple.object.as_subject())
        .collect();
    graph
        .subjects()
        .into_iter()
        .filter(|subject| !referenced.contains(*subject))
        .cloned()
        .collect()
}

fn distinct_predicate_count(graph: &Graph, subject: &Subject) -> usize {
    let mut predicates: IndexSet<&Iri> = IndexSet::new();
    for triple in graph.triples_with_subject(subject) {
        predicates.insert(&triple.predicate);
    }
    predicates.len()
}

/// Choose the root subject for decoding a value of `type_name`.
pub(crate) fn select_root_subject(
    graph: &Graph,
    type_iri: Option<&Iri>,
    type_name: &'static str,
) -> MapperResult<Subject> {
    let mut candidates = match type_iri {
        Some(type_iri) => subjects_with_type(graph, type_iri),
        None => Vec::new(),
    };
    if candidates.is_empty() {
        candidates = unreferenced_subjects(graph);
    }

    match candidates.len() {
        0 => Err(MapperError::NoRootSubject { type_name }),
        1 => Ok(candidates.remove(0)),
        _ => {
            let best = candidates
                .iter()
                .map(|subject| distinct_predicate_count(graph, subject))
                .max()
                .expect("non-empty candidates");
            let mut winners: Vec<Subject> = candidates
                .into_iter()
                .filter(|subject| distinct_predicate_count(graph, subject) == best)
                .collect();
            if winners.len() == 1 {
                Ok(winners.remove(0))
            } else {
                Err(MapperError::AmbiguousRootSubject {
                    type_name,
                    candidate_count: winners.len(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Literal;
    use crate::triple::Triple;

    fn iri(s: &str) -> Iri {
        Iri::new_unchecked(s)
    }

    #[test]
    fn test_type_match_wins() {
        let graph = Graph::from_triples([
            Triple::new(iri("http://ex/a"), rdf::TYPE, iri("http://ex/Person")),
            Triple::new(iri("http://ex/b"), rdf::TYPE, iri("http://ex/Dog")),
        ]);
        let subject =
            select_root_subject(&graph, Some(&iri("http://ex/Person")), "Person").unwrap();
        assert_eq!(subject, Subject::Iri(iri("http://ex/a")));
    }

    #[test]
    fn test_unreferenced_subject_fallback() {
        let graph = Graph::from_triples([
            Triple::new(iri("http://ex/root"), iri("http://ex/p"), iri("http://ex/leaf")),
            Triple::new(iri("http://ex/leaf"), iri("http://ex/q"), Literal::new("x")),
        ]);
        let subject = select_root_subject(&graph, None, "Thing").unwrap();
        assert_eq!(subject, Subject::Iri(iri("http://ex/root")));
    }

    #[test]
    fn test_tie_breaks_on_predicate_count() {
        let graph = Graph::from_triples([
            Triple::new(iri("http://ex/rich"), iri("http://ex/p"), Literal::new("1")),
            Triple::new(iri("http://ex/rich"), iri("http://ex/q"), Literal::new("2")),
            Triple::new(iri("http://ex/poor"), iri("http://ex/p"), Literal::new("3")),
        ]);
        let subject = select_root_subject(&graph, None, "Thing").unwrap();
        assert_eq!(subject, Subject::Iri(iri("http://ex/rich")));
    }

    #[test]
    fn test_persistent_tie_is_ambiguous() {
        let graph = Graph::from_triples([
            Triple::new(iri("http://ex/a"), iri("http://ex/p"), Literal::new("1")),
            Triple::new(iri("http://ex/b"), iri("http://ex/p"), Literal::new("2")),
        ]);
        let err = select_root_subject(&graph, None, "Thing").unwrap_err();
        assert!(matches!(err, MapperError::AmbiguousRootSubject { candidate_count: 2, .. }));
    }

    #[test]
    fn test_empty_graph_has_no_root() {
        let err = select_root_subject(&Graph::new(), None, "Thing").unwrap_err();
        assert!(matches!(err, MapperError::NoRootSubject { .. }));
    }
}
