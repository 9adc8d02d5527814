//! Consumed-triple accounting and completeness enforcement.
//!
//! Every triple read during deserialization is marked consumed. After the
//! value has been built, the remainder (graph minus consumed) is judged
//! under a [`CompletenessMode`].

use indexmap::IndexSet;

use crate::error::{MapperError, MapperResult};
use crate::graph::Graph;
use crate::term::{Iri, Subject};
use crate::triple::Triple;
use crate::vocab::rdf;

/// Policy for triples left unconsumed after deserialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CompletenessMode {
    /// Any leftover raises
    /// [`MapperError::IncompleteDeserialization`].
    #[default]
    Strict,
    /// Leftovers are silently dropped.
    Lenient,
    /// Leftovers are logged at warning level.
    WarnOnly,
    /// Leftovers are logged at info level.
    InfoOnly,
}

/// Records which triples deserialization has consumed.
#[derive(Debug, Clone, Default)]
pub struct ConsumptionTracker {
    consumed: IndexSet<Triple>,
}

impl ConsumptionTracker {
    /// An empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one triple as consumed.
    pub fn mark(&mut self, triple: &Triple) {
        self.consumed.insert(triple.clone());
    }

    /// Mark several triples as consumed.
    pub fn mark_all<'a>(&mut self, triples: impl IntoIterator<Item = &'a Triple>) {
        for triple in triples {
            self.mark(triple);
        }
    }

    /// Whether a triple has been consumed.
    #[must_use]
    pub fn is_consumed(&self, triple: &Triple) -> bool {
        self.consumed.contains(triple)
    }

    /// Number of consumed triples.
    #[must_use]
    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }

    /// The triples of `graph` that were never consumed.
    #[must_use]
    pub fn remainder(&self, graph: &Graph) -> Graph {
        Graph::from_triples(
            graph
                .triples()
                .filter(|triple| !self.is_consumed(triple))
                .cloned(),
        )
    }
}

/// Apply a completeness mode to the remainder of a decode.
///
/// # Errors
///
/// In [`CompletenessMode::Strict`], a non-empty remainder raises
/// [`MapperError::IncompleteDeserialization`] carrying the remaining
/// count, the unmapped subjects, and the unmapped `rdf:type` IRIs.
pub fn enforce_completeness(mode: CompletenessMode, remainder: &Graph) -> MapperResult<()> {
    if remainder.is_empty() {
        return Ok(());
    }
    match mode {
        CompletenessMode::Strict => {
            let unmapped_subjects: Vec<Subject> =
                remainder.subjects().into_iter().cloned().collect();
            let unmapped_types: Vec<Iri> = remainder
                .triples()
                .filter(|triple| triple.predicate == rdf::TYPE)
                .filter_map(|triple| triple.object.as_iri().cloned())
                .collect();
            Err(MapperError::IncompleteDeserialization {
                remaining_triple_count: remainder.triple_count(),
                unmapped_subjects,
                unmapped_types,
            })
        }
        CompletenessMode::Lenient => Ok(()),
        CompletenessMode::WarnOnly => {
            tracing::warn!(
                remaining = remainder.triple_count(),
                "dropping triples left unconsumed after deserialization"
            );
            Ok(())
        }
        CompletenessMode::InfoOnly => {
            tracing::info!(
                remaining = remainder.triple_count(),
                "triples left unconsumed after deserialization"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{Iri, Literal};

    fn iri(s: &str) -> Iri {
        Iri::new_unchecked(s)
    }

    fn sample() -> (Graph, Triple, Triple) {
        let a = Triple::new(iri("http://ex/s"), iri("http://ex/p"), Literal::new("a"));
        let b = Triple::new(iri("http://ex/s"), rdf::TYPE, iri("http://ex/T"));
        (Graph::from_triples([a.clone(), b.clone()]), a, b)
    }

    #[test]
    fn test_remainder_excludes_consumed() {
        let (graph, a, b) = sample();
        let mut tracker = ConsumptionTracker::new();
        tracker.mark(&a);
        let remainder = tracker.remainder(&graph);
        assert_eq!(remainder.triple_count(), 1);
        assert!(remainder.has_triple(&b));
    }

    #[test]
    fn test_strict_mode_reports_diagnostics() {
        let (graph, a, _) = sample();
        let mut tracker = ConsumptionTracker::new();
        tracker.mark(&a);
        let remainder = tracker.remainder(&graph);
        let err = enforce_completeness(CompletenessMode::Strict, &remainder).unwrap_err();
        match err {
            MapperError::IncompleteDeserialization {
                remaining_triple_count,
                unmapped_subjects,
                unmapped_types,
            } => {
                assert_eq!(remaining_triple_count, 1);
                assert_eq!(unmapped_subjects, vec![Subject::Iri(iri("http://ex/s"))]);
                assert_eq!(unmapped_types, vec![iri("http://ex/T")]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_non_strict_modes_accept_leftovers() {
        let (graph, _, _) = sample();
        let tracker = ConsumptionTracker::new();
        let remainder = tracker.remainder(&graph);
        assert!(enforce_completeness(CompletenessMode::Lenient, &remainder).is_ok());
        assert!(enforce_completeness(CompletenessMode::WarnOnly, &remainder).is_ok());
        assert!(enforce_completeness(CompletenessMode::InfoOnly, &remainder).is_ok());
    }

    #[test]
    fn test_empty_remainder_always_passes_strict() {
        let (graph, a, b) = sample();
        let mut tracker = ConsumptionTracker::new();
        tracker.mark(&a);
        tracker.mark(&b);
        let remainder = tracker.remainder(&graph);
        assert!(enforce_completeness(CompletenessMode::Strict, &remainder).is_ok());
    }
}
