//! Shared helpers for the integration suites.

use std::collections::HashMap;

use rdfmap::{BlankNode, Graph, Subject, Term, Triple};

/// Assert two graphs are equal modulo blank-node renaming.
#[allow(dead_code)]
pub fn assert_isomorphic(a: &Graph, b: &Graph) {
    assert!(
        isomorphic(a, b),
        "graphs are not isomorphic:\nleft:\n{a}\nright:\n{b}"
    );
}

/// Whether two graphs are equal modulo a bijection between their blank
/// nodes. Backtracking search; intended for small test graphs.
#[allow(dead_code)]
pub fn isomorphic(a: &Graph, b: &Graph) -> bool {
    if a.triple_count() != b.triple_count() {
        return false;
    }
    let a_triples: Vec<&Triple> = a.triples().collect();
    let b_triples: Vec<&Triple> = b.triples().collect();
    let mut used = vec![false; b_triples.len()];
    let mut mapping = HashMap::new();
    match_from(&a_triples, 0, &b_triples, &mut used, &mut mapping)
}

fn match_from(
    a: &[&Triple],
    index: usize,
    b: &[&Triple],
    used: &mut [bool],
    mapping: &mut HashMap<BlankNode, BlankNode>,
) -> bool {
    if index == a.len() {
        return true;
    }
    for (candidate_index, candidate) in b.iter().enumerate() {
        if used[candidate_index] {
            continue;
        }
        let saved = mapping.clone();
        if triples_match(a[index], candidate, mapping) {
            used[candidate_index] = true;
            if match_from(a, index + 1, b, used, mapping) {
                return true;
            }
            used[candidate_index] = false;
        }
        *mapping = saved;
    }
    false
}

fn triples_match(x: &Triple, y: &Triple, mapping: &mut HashMap<BlankNode, BlankNode>) -> bool {
    x.predicate == y.predicate
        && subjects_match(&x.subject, &y.subject, mapping)
        && terms_match(&x.object, &y.object, mapping)
}

fn subjects_match(
    x: &Subject,
    y: &Subject,
    mapping: &mut HashMap<BlankNode, BlankNode>,
) -> bool {
    match (x, y) {
        (Subject::Iri(a), Subject::Iri(b)) => a == b,
        (Subject::BlankNode(a), Subject::BlankNode(b)) => blank_nodes_match(a, b, mapping),
        _ => false,
    }
}

fn terms_match(x: &Term, y: &Term, mapping: &mut HashMap<BlankNode, BlankNode>) -> bool {
    match (x, y) {
        (Term::Iri(a), Term::Iri(b)) => a == b,
        (Term::Literal(a), Term::Literal(b)) => a == b,
        (Term::BlankNode(a), Term::BlankNode(b)) => blank_nodes_match(a, b, mapping),
        _ => false,
    }
}

fn blank_nodes_match(
    a: &BlankNode,
    b: &BlankNode,
    mapping: &mut HashMap<BlankNode, BlankNode>,
) -> bool {
    match mapping.get(a) {
        Some(mapped) => mapped == b,
        None => {
            // the mapping must stay injective
            if mapping.values().any(|mapped| mapped == b) {
                return false;
            }
            mapping.insert(a.clone(), b.clone());
            true
        }
    }
}
