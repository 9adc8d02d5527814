//! Reachability-based subgraph extraction.
//!
//! [`Graph::subgraph`] walks the graph breadth-first from a root subject,
//! following predicates from subject to object. A filter callback decides
//! per visited triple whether to keep it and whether to descend into its
//! object, which makes it possible to extract precise fragments such as
//! rdf:List items without the list plumbing.

use std::collections::{HashSet, VecDeque};

use crate::graph::Graph;
use crate::term::Subject;
use crate::triple::Triple;

/// Decision returned by a traversal filter for one visited triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalDecision {
    /// Keep the triple and continue the traversal into its object.
    Include,
    /// Drop the triple and do not descend into its object.
    Skip,
    /// Keep the triple but treat its object as a leaf.
    IncludeButDontDescend,
    /// Drop the triple but still traverse its object.
    ///
    /// This is the decision that lets callers unwrap rdf:List plumbing:
    /// dropping `rdf:rest` links while still walking down the chain.
    SkipButDescend,
}

impl TraversalDecision {
    fn keeps_triple(self) -> bool {
        matches!(
            self,
            TraversalDecision::Include | TraversalDecision::IncludeButDontDescend
        )
    }

    fn descends(self) -> bool {
        matches!(
            self,
            TraversalDecision::Include | TraversalDecision::SkipButDescend
        )
    }
}

impl Graph {
    /// Extract the subgraph reachable from `root`.
    ///
    /// Equivalent to [`Graph::subgraph_with_filter`] with a filter that
    /// includes everything.
    #[must_use]
    pub fn subgraph(&self, root: &Subject) -> Graph {
        self.subgraph_with_filter(root, |_, _| TraversalDecision::Include)
    }

    /// Extract a filtered subgraph reachable from `root`.
    ///
    /// The traversal is breadth-first and cycle-safe: each subject is
    /// expanded at most once, keyed on its identity (IRI value or blank
    /// node instance). The filter is invoked once per visited triple with
    /// the current depth — `0` for triples of the root subject, increasing
    /// by one per subject-to-object hop — and its
    /// [decision](TraversalDecision) controls inclusion and descent
    /// independently.
    #[must_use]
    pub fn subgraph_with_filter<F>(&self, root: &Subject, mut filter: F) -> Graph
    where
        F: FnMut(&Triple, usize) -> TraversalDecision,
    {
        let mut kept: Vec<Triple> = Vec::new();
        let mut visited: HashSet<Subject> = HashSet::new();
        let mut queue: VecDeque<(Subject, usize)> = VecDeque::new();

        visited.insert(root.clone());
        queue.push_back((root.clone(), 0));

        while let Some((subject, depth)) = queue.pop_front() {
            for triple in self.triples_with_subject(&subject) {
                let decision = filter(triple, depth);
                if decision.keeps_triple() {
                    kept.push(triple.clone());
                }
                if decision.descends() {
                    if let Some(next) = triple.object.as_subject() {
                        if visited.insert(next.clone()) {
                            queue.push_back((next, depth + 1));
                        }
                    }
                }
            }
        }

        Graph::from_triples(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{BlankNode, Iri, Literal};
    use crate::vocab::rdf;

    fn iri(s: &str) -> Iri {
        Iri::new_unchecked(s)
    }

    #[test]
    fn test_subgraph_follows_object_links() {
        let a = Subject::Iri(iri("http://ex/a"));
        let b = Subject::Iri(iri("http://ex/b"));
        let graph = Graph::from_triples([
            Triple::new(a.clone(), iri("http://ex/p"), iri("http://ex/b")),
            Triple::new(b.clone(), iri("http://ex/p"), Literal::new("leaf")),
            Triple::new(
                Subject::Iri(iri("http://ex/unrelated")),
                iri("http://ex/p"),
                Literal::new("other"),
            ),
        ]);
        let sub = graph.subgraph(&a);
        assert_eq!(sub.triple_count(), 2);
    }

    #[test]
    fn test_subgraph_is_cycle_safe() {
        let a = Subject::Iri(iri("http://ex/a"));
        let b = Subject::Iri(iri("http://ex/b"));
        let graph = Graph::from_triples([
            Triple::new(a.clone(), iri("http://ex/p"), iri("http://ex/b")),
            Triple::new(b, iri("http://ex/p"), iri("http://ex/a")),
        ]);
        let sub = graph.subgraph(&a);
        assert_eq!(sub.triple_count(), 2);
    }

    #[test]
    fn test_include_but_dont_descend_stops_at_leaf() {
        let a = Subject::Iri(iri("http://ex/a"));
        let b = Subject::Iri(iri("http://ex/b"));
        let graph = Graph::from_triples([
            Triple::new(a.clone(), iri("http://ex/p"), iri("http://ex/b")),
            Triple::new(b, iri("http://ex/p"), Literal::new("hidden")),
        ]);
        let sub = graph.subgraph_with_filter(&a, |_, _| TraversalDecision::IncludeButDontDescend);
        assert_eq!(sub.triple_count(), 1);
    }

    #[test]
    fn test_depth_is_reported_per_hop() {
        let a = Subject::Iri(iri("http://ex/a"));
        let b = Subject::Iri(iri("http://ex/b"));
        let graph = Graph::from_triples([
            Triple::new(a.clone(), iri("http://ex/p"), iri("http://ex/b")),
            Triple::new(b, iri("http://ex/p"), Literal::new("leaf")),
        ]);
        let mut depths = Vec::new();
        let _ = graph.subgraph_with_filter(&a, |_, depth| {
            depths.push(depth);
            TraversalDecision::Include
        });
        depths.sort_unstable();
        assert_eq!(depths, vec![0, 1]);
    }

    #[test]
    fn test_skip_but_descend_unwraps_list_plumbing() {
        // <s> <p> ( "a" "b" "c" ) — drop rdf:rest links, keep rdf:first
        let s = Subject::Iri(iri("http://ex/s"));
        let n1 = BlankNode::new();
        let n2 = BlankNode::new();
        let n3 = BlankNode::new();
        let graph = Graph::from_triples([
            Triple::new(s.clone(), iri("http://ex/p"), n1.clone()),
            Triple::new(n1.clone(), rdf::FIRST, Literal::new("a")),
            Triple::new(n1.clone(), rdf::REST, n2.clone()),
            Triple::new(n2.clone(), rdf::FIRST, Literal::new("b")),
            Triple::new(n2.clone(), rdf::REST, n3.clone()),
            Triple::new(n3.clone(), rdf::FIRST, Literal::new("c")),
            Triple::new(n3.clone(), rdf::REST, rdf::NIL),
        ]);

        let sub = graph.subgraph_with_filter(&s, |triple, _| {
            if triple.predicate == rdf::REST {
                TraversalDecision::SkipButDescend
            } else {
                TraversalDecision::Include
            }
        });

        assert_eq!(sub.triple_count(), 4);
        assert!(sub
            .triples()
            .all(|t| t.predicate != rdf::REST));
        let first_count = sub.triples().filter(|t| t.predicate == rdf::FIRST).count();
        assert_eq!(first_count, 3);
    }
}
