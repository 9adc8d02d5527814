//! Collection strategies: multi-objects, rdf:List, rdf:Seq/Bag/Alt.
//!
//! All strategies delegate per-item conversion to an inner mapper
//! resolved from the registry or supplied at the call site. Structure
//! building and reading live here; the builder and reader expose them as
//! `add_…`/`require_…` calls.

use indexmap::IndexSet;

use crate::error::{MapperError, MapperResult, RdfError};
use crate::term::{BlankNode, Iri, Subject, Term};
use crate::triple::Triple;
use crate::vocab::rdf;

use super::context::{DeserializationContext, SerializationContext};
use super::traits::ItemMapper;

/// How a collection of values is represented in RDF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CollectionStrategy {
    /// One triple per item under the shared predicate. Unordered; the
    /// default for lists and sets without a declared strategy.
    #[default]
    MultiObjects,
    /// Nested `rdf:first`/`rdf:rest`/`rdf:nil`. Ordered.
    RdfList,
    /// Numbered `rdf:_1`, `rdf:_2`, … with type `rdf:Seq`. Ordered.
    RdfSeq,
    /// Numbered container with type `rdf:Bag`.
    RdfBag,
    /// Numbered container with type `rdf:Alt`.
    RdfAlt,
}

/// Serialize each item to exactly one object term.
pub(crate) fn serialize_item_terms<T: 'static>(
    items: &[T],
    mapper: Option<&ItemMapper<'_, T>>,
    context: &mut SerializationContext<'_>,
) -> MapperResult<(Vec<Term>, Vec<Triple>)> {
    let mut terms = Vec::with_capacity(items.len());
    let mut aux = Vec::new();
    for item in items {
        let (objects, mut triples) = context.serialize_value_with(item, mapper)?;
        if objects.len() != 1 {
            return Err(MapperError::Rdf(RdfError::ConstraintViolation(format!(
                "collection items must map to exactly one term, got {}",
                objects.len()
            ))));
        }
        terms.extend(objects);
        aux.append(&mut triples);
    }
    Ok((terms, aux))
}

/// Build an `rdf:first`/`rdf:rest` chain. The empty list is `rdf:nil`.
pub(crate) fn build_rdf_list(items: Vec<Term>) -> (Term, Vec<Triple>) {
    if items.is_empty() {
        return (Term::Iri(rdf::NIL), Vec::new());
    }
    let nodes: Vec<BlankNode> = items.iter().map(|_| BlankNode::new()).collect();
    let mut triples = Vec::with_capacity(items.len() * 2);
    for (index, (node, item)) in nodes.iter().zip(items).enumerate() {
        triples.push(Triple::new(
            Subject::BlankNode(node.clone()),
            rdf::FIRST,
            item,
        ));
        let rest = match nodes.get(index + 1) {
            Some(next) => Term::BlankNode(next.clone()),
            None => Term::Iri(rdf::NIL),
        };
        triples.push(Triple::new(
            Subject::BlankNode(node.clone()),
            rdf::REST,
            rest,
        ));
    }
    (Term::BlankNode(nodes[0].clone()), triples)
}

/// Build a numbered container (`rdf:Seq`/`rdf:Bag`/`rdf:Alt`).
///
/// An empty container is a node carrying only the type triple.
pub(crate) fn build_rdf_container(container_type: Iri, items: Vec<Term>) -> (Term, Vec<Triple>) {
    let node = BlankNode::new();
    let subject = Subject::BlankNode(node.clone());
    let mut triples = Vec::with_capacity(items.len() + 1);
    triples.push(Triple::new(subject.clone(), rdf::TYPE, container_type));
    for (index, item) in items.into_iter().enumerate() {
        triples.push(Triple::new(subject.clone(), rdf::member(index + 1), item));
    }
    (Term::BlankNode(node), triples)
}

/// Walk an `rdf:first`/`rdf:rest` chain, returning the item terms.
///
/// Marks every structure triple consumed. Cycle-safe; malformed chains
/// raise [`MapperError::InvalidRdfListStructure`] with the offending
/// head.
pub(crate) fn read_rdf_list_terms(
    head: &Term,
    context: &mut DeserializationContext<'_>,
) -> MapperResult<Vec<Term>> {
    if let Term::Iri(iri) = head {
        if *iri == rdf::NIL {
            return Ok(Vec::new());
        }
    }
    let Some(head_subject) = head.as_subject() else {
        return Err(MapperError::InvalidRdfListStructure {
            head: Subject::Iri(rdf::NIL),
            message: format!("list head must be a resource, found literal {head}"),
        });
    };

    let graph = context.graph();
    let mut items = Vec::new();
    let mut visited: IndexSet<Subject> = IndexSet::new();
    let mut current = head_subject.clone();
    loop {
        if !visited.insert(current.clone()) {
            return Err(MapperError::CircularRdfList {
                head: head_subject,
            });
        }
        let firsts = graph.objects_for(&current, &rdf::FIRST);
        let rests = graph.objects_for(&current, &rdf::REST);
        if firsts.is_empty() {
            return Err(MapperError::InvalidRdfListStructure {
                head: head_subject,
                message: format!("node {current} has no rdf:first"),
            });
        }
        if firsts.len() > 1 || rests.len() > 1 {
            return Err(MapperError::InvalidRdfListStructure {
                head: head_subject,
                message: format!("node {current} has multiple rdf:first or rdf:rest values"),
            });
        }
        let Some(rest) = rests.first() else {
            return Err(MapperError::InvalidRdfListStructure {
                head: head_subject,
                message: format!("node {current} has no rdf:rest"),
            });
        };
        let first = (*firsts.first().expect("checked non-empty")).clone();
        let rest = (*rest).clone();

        context.tracker_mut().mark(&Triple::new(
            current.clone(),
            rdf::FIRST,
            first.clone(),
        ));
        context
            .tracker_mut()
            .mark(&Triple::new(current.clone(), rdf::REST, rest.clone()));
        items.push(first);

        match rest {
            Term::Iri(iri) if iri == rdf::NIL => return Ok(items),
            Term::BlankNode(node) => current = Subject::BlankNode(node),
            Term::Iri(iri) => current = Subject::Iri(iri),
            Term::Literal(literal) => {
                return Err(MapperError::InvalidRdfListStructure {
                    head: head_subject,
                    message: format!("rdf:rest points at literal {literal}"),
                });
            }
        }
    }
}

/// Read a numbered container, returning item terms sorted by index.
///
/// Marks the type triple and every membership triple consumed.
pub(crate) fn read_rdf_container_terms(
    node: &Term,
    container_type: &Iri,
    context: &mut DeserializationContext<'_>,
) -> MapperResult<Vec<Term>> {
    let Some(subject) = node.as_subject() else {
        return Err(MapperError::Rdf(RdfError::ConstraintViolation(format!(
            "container must be a resource, found literal {node}"
        ))));
    };

    let graph = context.graph();
    let type_triple = Triple::new(
        subject.clone(),
        rdf::TYPE,
        Term::Iri(container_type.clone()),
    );
    if !graph.has_triple(&type_triple) {
        return Err(MapperError::Rdf(RdfError::ConstraintViolation(format!(
            "container {subject} is not typed {container_type}"
        ))));
    }
    context.tracker_mut().mark(&type_triple);

    let mut numbered: Vec<(usize, Triple)> = graph
        .triples_with_subject(&subject)
        .into_iter()
        .filter_map(|triple| {
            rdf::member_index(&triple.predicate).map(|index| (index, triple.clone()))
        })
        .collect();
    numbered.sort_by_key(|(index, _)| *index);

    let mut items = Vec::with_capacity(numbered.len());
    for (_, triple) in numbered {
        context.tracker_mut().mark(&triple);
        items.push(triple.object);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::mapper::registry::MapperRegistry;
    use crate::term::Literal;

    fn ctx_graph(triples: Vec<Triple>) -> Graph {
        Graph::from_triples(triples)
    }

    #[test]
    fn test_build_rdf_list_structure() {
        let (head, triples) = build_rdf_list(vec![
            Term::Literal(Literal::new("a")),
            Term::Literal(Literal::new("b")),
        ]);
        assert!(head.is_blank_node());
        assert_eq!(triples.len(), 4);
        let nil_count = triples
            .iter()
            .filter(|t| t.object == Term::Iri(rdf::NIL))
            .count();
        assert_eq!(nil_count, 1);
    }

    #[test]
    fn test_empty_list_is_nil() {
        let (head, triples) = build_rdf_list(Vec::new());
        assert_eq!(head, Term::Iri(rdf::NIL));
        assert!(triples.is_empty());
    }

    #[test]
    fn test_container_numbering() {
        let (node, triples) = build_rdf_container(
            rdf::SEQ,
            vec![Term::Literal(Literal::new("x")), Term::Literal(Literal::new("y"))],
        );
        assert!(node.is_blank_node());
        assert_eq!(triples.len(), 3);
        assert!(triples
            .iter()
            .any(|t| t.predicate == rdf::member(1)));
        assert!(triples
            .iter()
            .any(|t| t.predicate == rdf::member(2)));
    }

    #[test]
    fn test_list_roundtrip_through_read() {
        let registry = MapperRegistry::with_defaults();
        let (head, triples) = build_rdf_list(vec![
            Term::Literal(Literal::new("a")),
            Term::Literal(Literal::new("b")),
            Term::Literal(Literal::new("c")),
        ]);
        let graph = ctx_graph(triples);
        let mut context = DeserializationContext::new(&registry, &graph);
        let items = read_rdf_list_terms(&head, &mut context).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], Term::Literal(Literal::new("a")));
        assert_eq!(items[2], Term::Literal(Literal::new("c")));
        // every structure triple was consumed
        assert!(context.tracker().remainder(&graph).is_empty());
    }

    #[test]
    fn test_cyclic_list_detected() {
        let registry = MapperRegistry::with_defaults();
        let a = BlankNode::new();
        let b = BlankNode::new();
        let graph = ctx_graph(vec![
            Triple::new(a.clone(), rdf::FIRST, Literal::new("a")),
            Triple::new(a.clone(), rdf::REST, b.clone()),
            Triple::new(b.clone(), rdf::FIRST, Literal::new("b")),
            Triple::new(b.clone(), rdf::REST, a.clone()),
        ]);
        let mut context = DeserializationContext::new(&registry, &graph);
        let err = read_rdf_list_terms(&Term::BlankNode(a), &mut context).unwrap_err();
        assert!(matches!(err, MapperError::CircularRdfList { .. }));
    }

    #[test]
    fn test_malformed_list_reports_node() {
        let registry = MapperRegistry::with_defaults();
        let a = BlankNode::new();
        // rdf:first but no rdf:rest
        let graph = ctx_graph(vec![Triple::new(a.clone(), rdf::FIRST, Literal::new("a"))]);
        let mut context = DeserializationContext::new(&registry, &graph);
        let err = read_rdf_list_terms(&Term::BlankNode(a), &mut context).unwrap_err();
        assert!(matches!(err, MapperError::InvalidRdfListStructure { .. }));
    }

    #[test]
    fn test_container_roundtrip_through_read() {
        let registry = MapperRegistry::with_defaults();
        let (node, triples) = build_rdf_container(
            rdf::BAG,
            vec![Term::Literal(Literal::new("x")), Term::Literal(Literal::new("y"))],
        );
        let graph = ctx_graph(triples);
        let mut context = DeserializationContext::new(&registry, &graph);
        let items = read_rdf_container_terms(&node, &rdf::BAG, &mut context).unwrap();
        assert_eq!(items.len(), 2);
        assert!(context.tracker().remainder(&graph).is_empty());
    }

    #[test]
    fn test_container_type_mismatch() {
        let registry = MapperRegistry::with_defaults();
        let (node, triples) = build_rdf_container(rdf::BAG, vec![Term::Literal(Literal::new("x"))]);
        let graph = ctx_graph(triples);
        let mut context = DeserializationContext::new(&registry, &graph);
        let err = read_rdf_container_terms(&node, &rdf::SEQ, &mut context).unwrap_err();
        assert!(matches!(err, MapperError::Rdf(RdfError::ConstraintViolation(_))));
    }
}
