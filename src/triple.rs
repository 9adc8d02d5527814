//! Triples and quads.
//!
//! A [`Triple`] is an ordered `(subject, predicate, object)` tuple with
//! structural equality. A [`Quad`] adds an optional graph name for use in
//! datasets.

use std::fmt;

use crate::term::{Iri, Subject, Term};

/// The name of a graph inside a dataset: an IRI or a blank node.
pub type GraphName = Subject;

/// An RDF triple.
///
/// Equality is structural over the three terms. Blank-node components
/// compare by identity, so two parses of the same document produce unequal
/// triples wherever blank nodes are involved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject of the triple: an IRI or a blank node.
    pub subject: Subject,
    /// Predicate of the triple; only IRIs are admissible.
    pub predicate: Iri,
    /// Object of the triple: any term.
    pub object: Term,
}

impl Triple {
    /// Create a triple.
    #[must_use]
    pub fn new(subject: impl Into<Subject>, predicate: Iri, object: impl Into<Term>) -> Self {
        Triple {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }

    /// Pair this triple with an optional graph name.
    #[must_use]
    pub fn in_graph(self, graph_name: Option<GraphName>) -> Quad {
        Quad {
            subject: self.subject,
            predicate: self.predicate,
            object: self.object,
            graph_name,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// An RDF quad: a triple plus an optional graph name.
///
/// A quad with no graph name belongs to the default graph of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    /// Subject of the statement.
    pub subject: Subject,
    /// Predicate of the statement.
    pub predicate: Iri,
    /// Object of the statement.
    pub object: Term,
    /// Graph the statement belongs to; `None` means the default graph.
    pub graph_name: Option<GraphName>,
}

impl Quad {
    /// Create a quad.
    #[must_use]
    pub fn new(
        subject: impl Into<Subject>,
        predicate: Iri,
        object: impl Into<Term>,
        graph_name: Option<GraphName>,
    ) -> Self {
        Quad {
            subject: subject.into(),
            predicate,
            object: object.into(),
            graph_name,
        }
    }

    /// Drop the graph name, leaving the bare triple.
    #[must_use]
    pub fn into_triple(self) -> Triple {
        Triple {
            subject: self.subject,
            predicate: self.predicate,
            object: self.object,
        }
    }

    /// Borrow the statement as a triple, cloning the three terms.
    #[must_use]
    pub fn triple(&self) -> Triple {
        Triple {
            subject: self.subject.clone(),
            predicate: self.predicate.clone(),
            object: self.object.clone(),
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.graph_name {
            Some(graph_name) => write!(
                f,
                "{} {} {} {} .",
                self.subject, self.predicate, self.object, graph_name
            ),
            None => write!(f, "{} {} {} .", self.subject, self.predicate, self.object),
        }
    }
}

impl From<Triple> for Quad {
    fn from(triple: Triple) -> Self {
        triple.in_graph(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Literal;

    fn iri(s: &str) -> Iri {
        Iri::new_unchecked(s)
    }

    #[test]
    fn test_triple_structural_equality() {
        let a = Triple::new(iri("http://ex/s"), iri("http://ex/p"), Literal::new("o"));
        let b = Triple::new(iri("http://ex/s"), iri("http://ex/p"), Literal::new("o"));
        assert_eq!(a, b);

        let c = Triple::new(iri("http://ex/s"), iri("http://ex/p"), Literal::new("x"));
        assert_ne!(a, c);
    }

    #[test]
    fn test_quad_roundtrips_through_triple() {
        let triple = Triple::new(iri("http://ex/s"), iri("http://ex/p"), iri("http://ex/o"));
        let graph = GraphName::Iri(iri("http://ex/g"));
        let quad = triple.clone().in_graph(Some(graph));
        assert_eq!(quad.into_triple(), triple);
    }

    #[test]
    fn test_display_forms() {
        let triple = Triple::new(iri("http://ex/s"), iri("http://ex/p"), Literal::new("o"));
        assert_eq!(
            triple.to_string(),
            "<http://ex/s> <http://ex/p> \"o\" ."
        );
        let quad = triple.in_graph(Some(GraphName::Iri(iri("http://ex/g"))));
        assert_eq!(
            quad.to_string(),
            "<http://ex/s> <http://ex/p> \"o\" <http://ex/g> ."
        );
    }
}
