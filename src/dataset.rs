//! RDF datasets: a default graph plus named graphs.

use std::fmt;

use indexmap::IndexMap;

use crate::graph::Graph;
use crate::triple::{GraphName, Quad};

/// An RDF dataset.
///
/// Holds a default [`Graph`] and a mapping from graph names (IRIs or blank
/// nodes) to named graphs. Like graphs, datasets are value-typed: mutating
/// operations return a new dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    default_graph: Graph,
    named_graphs: IndexMap<GraphName, Graph>,
}

impl Dataset {
    /// Create an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dataset holding only a default graph.
    #[must_use]
    pub fn from_default_graph(graph: Graph) -> Self {
        Dataset {
            default_graph: graph,
            named_graphs: IndexMap::new(),
        }
    }

    /// Create a dataset from quads.
    #[must_use]
    pub fn from_quads(quads: impl IntoIterator<Item = Quad>) -> Self {
        let mut default_triples = Vec::new();
        let mut named: IndexMap<GraphName, Vec<crate::triple::Triple>> = IndexMap::new();
        for quad in quads {
            match quad.graph_name.clone() {
                Some(name) => named.entry(name).or_default().push(quad.into_triple()),
                None => default_triples.push(quad.into_triple()),
            }
        }
        Dataset {
            default_graph: Graph::from_triples(default_triples),
            named_graphs: named
                .into_iter()
                .map(|(name, triples)| (name, Graph::from_triples(triples)))
                .collect(),
        }
    }

    /// The default graph.
    #[must_use]
    pub fn default_graph(&self) -> &Graph {
        &self.default_graph
    }

    /// The named graph with this name, if present.
    #[must_use]
    pub fn named_graph(&self, name: &GraphName) -> Option<&Graph> {
        self.named_graphs.get(name)
    }

    /// Iterate over `(name, graph)` pairs of the named graphs.
    pub fn named_graphs(&self) -> impl Iterator<Item = (&GraphName, &Graph)> {
        self.named_graphs.iter()
    }

    /// Number of named graphs.
    #[must_use]
    pub fn named_graph_count(&self) -> usize {
        self.named_graphs.len()
    }

    /// Total number of statements across the default and named graphs.
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.default_graph.triple_count()
            + self
                .named_graphs
                .values()
                .map(Graph::triple_count)
                .sum::<usize>()
    }

    /// Whether the dataset holds no statements at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quad_count() == 0
    }

    /// Every statement as a quad, default graph first.
    #[must_use]
    pub fn quads(&self) -> Vec<Quad> {
        let mut out = Vec::with_capacity(self.quad_count());
        for triple in self.default_graph.triples() {
            out.push(triple.clone().in_graph(None));
        }
        for (name, graph) in &self.named_graphs {
            for triple in graph.triples() {
                out.push(triple.clone().in_graph(Some(name.clone())));
            }
        }
        out
    }

    /// A new dataset with a named graph replaced (or inserted).
    #[must_use]
    pub fn with_named_graph(&self, name: GraphName, graph: Graph) -> Dataset {
        let mut named_graphs = self.named_graphs.clone();
        named_graphs.insert(name, graph);
        Dataset {
            default_graph: self.default_graph.clone(),
            named_graphs,
        }
    }

    /// A new dataset with the default graph replaced.
    #[must_use]
    pub fn with_default_graph(&self, graph: Graph) -> Dataset {
        Dataset {
            default_graph: graph,
            named_graphs: self.named_graphs.clone(),
        }
    }

    /// Every named graph merged into the default graph.
    #[must_use]
    pub fn flattened(&self) -> Graph {
        let mut merged = self.default_graph.clone();
        for graph in self.named_graphs.values() {
            merged = merged.merge(graph);
        }
        merged
    }
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        if self.default_graph != other.default_graph
            || self.named_graphs.len() != other.named_graphs.len()
        {
            return false;
        }
        self.named_graphs
            .iter()
            .all(|(name, graph)| other.named_graphs.get(name) == Some(graph))
    }
}

impl Eq for Dataset {}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for quad in self.quads() {
            writeln!(f, "{quad}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{Iri, Subject};
    use crate::triple::Triple;

    fn iri(s: &str) -> Iri {
        Iri::new_unchecked(s)
    }

    fn quad(s: &str, p: &str, o: &str, g: Option<&str>) -> Quad {
        Quad::new(
            iri(s),
            iri(p),
            iri(o),
            g.map(|g| GraphName::Iri(iri(g))),
        )
    }

    #[test]
    fn test_from_quads_splits_graphs() {
        let dataset = Dataset::from_quads([
            quad("http://ex/s", "http://ex/p", "http://ex/o", None),
            quad("http://ex/s", "http://ex/p", "http://ex/o", Some("http://ex/g")),
            quad("http://ex/s2", "http://ex/p", "http://ex/o", Some("http://ex/g")),
        ]);
        assert_eq!(dataset.default_graph().triple_count(), 1);
        assert_eq!(dataset.named_graph_count(), 1);
        let name = GraphName::Iri(iri("http://ex/g"));
        assert_eq!(dataset.named_graph(&name).unwrap().triple_count(), 2);
        assert_eq!(dataset.quad_count(), 3);
    }

    #[test]
    fn test_quads_roundtrip() {
        let quads = vec![
            quad("http://ex/s", "http://ex/p", "http://ex/o", None),
            quad("http://ex/s", "http://ex/p", "http://ex/o", Some("http://ex/g")),
        ];
        let dataset = Dataset::from_quads(quads.clone());
        let back = Dataset::from_quads(dataset.quads());
        assert_eq!(dataset, back);
    }

    #[test]
    fn test_flattened_merges_named_graphs() {
        let dataset = Dataset::from_quads([
            quad("http://ex/s", "http://ex/p", "http://ex/o", None),
            quad("http://ex/s", "http://ex/p", "http://ex/o", Some("http://ex/g")),
            quad("http://ex/s2", "http://ex/p", "http://ex/o", Some("http://ex/h")),
        ]);
        let flat = dataset.flattened();
        // the default-graph triple and the named-graph copy are set-equal
        assert_eq!(flat.triple_count(), 2);
    }

    #[test]
    fn test_equality_ignores_named_graph_order() {
        let a = Dataset::new()
            .with_named_graph(
                GraphName::Iri(iri("http://ex/g1")),
                Graph::from_triples([Triple::new(
                    Subject::Iri(iri("http://ex/s")),
                    iri("http://ex/p"),
                    iri("http://ex/o"),
                )]),
            )
            .with_named_graph(GraphName::Iri(iri("http://ex/g2")), Graph::new());
        let b = Dataset::new()
            .with_named_graph(GraphName::Iri(iri("http://ex/g2")), Graph::new())
            .with_named_graph(
                GraphName::Iri(iri("http://ex/g1")),
                Graph::from_triples([Triple::new(
                    Subject::Iri(iri("http://ex/s")),
                    iri("http://ex/p"),
                    iri("http://ex/o"),
                )]),
            );
        assert_eq!(a, b);
    }
}
