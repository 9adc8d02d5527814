//! Deterministic pretty encoder for Turtle.
//!
//! The encoder produces grouped, sorted output:
//! subjects are sorted (IRIs lexicographically, blank nodes by their
//! assigned `b0, b1, …` labels), predicates within a subject are grouped
//! with `;` (with `rdf:type` rendered first as `a`), and repeated objects
//! are grouped with `,`.
//!
//! Blank nodes referenced exactly once as an object are inlined as
//! `[ … ]` property lists; well-formed `rdf:first`/`rdf:rest` chains whose
//! head and intermediate nodes are referenced exactly once are rendered
//! with the `( … )` collection syntax. Both checks are cycle-safe: a node
//! involved in a reference cycle falls back to the labeled form.

use std::collections::{BTreeSet, HashMap};

use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;

use crate::error::Result;
use crate::graph::Graph;
use crate::iri::RelativizationOptions;
use crate::prefix::{CompactedIri, CompactionOptions, IriRole, PrefixMap};
use crate::term::{lexical, BlankNode, Iri, Literal, Subject, Term};
use crate::vocab::{rdf, xsd};

/// How aggressively the encoder relativizes IRIs against the base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum IriRelativizationMode {
    /// All relative forms: same-document, absolute-path, dot-notation.
    #[default]
    Full,
    /// Only same-document and descending relative paths.
    Local,
    /// Never relativize; every IRI is prefixed or absolute.
    None,
}

/// Options for the Turtle encoder.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TurtleEncoderOptions {
    /// Prefixes to use in addition to those passed per call.
    pub custom_prefixes: PrefixMap,
    /// Synthesize prefixes for namespaces with no binding; well-known
    /// namespaces receive their canonical prefix first.
    pub generate_missing_prefixes: bool,
    /// Emit an `@base` directive when a base IRI was supplied.
    pub include_base_declaration: bool,
    /// Relativization aggressiveness.
    pub iri_relativization: IriRelativizationMode,
    /// Prefer `prefix:local` over `<#fragment>` for fragment IRIs under
    /// the base.
    pub render_fragments_as_prefixed: bool,
    /// Permit all-digit local names in prefixed form.
    pub use_numeric_local_names: bool,
}

impl Default for TurtleEncoderOptions {
    fn default() -> Self {
        TurtleEncoderOptions {
            custom_prefixes: PrefixMap::new(),
            generate_missing_prefixes: true,
            include_base_declaration: true,
            iri_relativization: IriRelativizationMode::Full,
            render_fragments_as_prefixed: false,
            use_numeric_local_names: false,
        }
    }
}

const INDENT: &str = "    ";

/// Encode a graph as pretty Turtle.
pub(crate) fn encode_turtle(
    graph: &Graph,
    base_uri: Option<&str>,
    extra_prefixes: Option<&PrefixMap>,
    options: &TurtleEncoderOptions,
) -> Result<String> {
    let mut encoder = TurtleEncoder::new(graph, base_uri, extra_prefixes, options);
    encoder.analyze();
    Ok(encoder.render())
}

struct TurtleEncoder<'g> {
    graph: &'g Graph,
    options: &'g TurtleEncoderOptions,
    base: Option<String>,
    prefixes: PrefixMap,
    compaction: CompactionOptions,
    /// subject → predicate → deduplicated objects
    groups: IndexMap<Subject, IndexMap<Iri, IndexSet<Term>>>,
    object_refs: HashMap<BlankNode, usize>,
    inline: IndexSet<BlankNode>,
    lists: IndexMap<BlankNode, Vec<Term>>,
    list_nodes: IndexSet<BlankNode>,
    labels: IndexMap<BlankNode, usize>,
    used_prefixes: BTreeSet<String>,
}

impl<'g> TurtleEncoder<'g> {
    fn new(
        graph: &'g Graph,
        base_uri: Option<&str>,
        extra_prefixes: Option<&PrefixMap>,
        options: &'g TurtleEncoderOptions,
    ) -> Self {
        let mut prefixes = options.custom_prefixes.clone();
        if let Some(extra) = extra_prefixes {
            prefixes.extend_from(extra);
        }
        let relativization = match options.iri_relativization {
            IriRelativizationMode::Local => RelativizationOptions::local(),
            _ => RelativizationOptions::full(),
        };
        TurtleEncoder {
            graph,
            options,
            base: base_uri.map(str::to_string),
            prefixes,
            compaction: CompactionOptions {
                use_numeric_local_names: options.use_numeric_local_names,
                relativization,
            },
            groups: IndexMap::new(),
            object_refs: HashMap::new(),
            inline: IndexSet::new(),
            lists: IndexMap::new(),
            list_nodes: IndexSet::new(),
            labels: IndexMap::new(),
            used_prefixes: BTreeSet::new(),
        }
    }

    // ---- analysis ----------------------------------------------------------

    fn analyze(&mut self) {
        for triple in self.graph.triples() {
            self.groups
                .entry(triple.subject.clone())
                .or_default()
                .entry(triple.predicate.clone())
                .or_default()
                .insert(triple.object.clone());
            if let Term::BlankNode(node) = &triple.object {
                *self.object_refs.entry(node.clone()).or_insert(0) += 1;
            }
        }

        if self.options.generate_missing_prefixes {
            self.prepare_prefixes();
        }
        self.detect_lists();
        self.detect_inline_candidates();
        self.assign_labels();
    }

    fn prepare_prefixes(&mut self) {
        let defaults = PrefixMap::with_defaults();
        let mut iris: Vec<Iri> = Vec::new();
        for triple in self.graph.triples() {
            if let Subject::Iri(iri) = &triple.subject {
                iris.push(iri.clone());
            }
            iris.push(triple.predicate.clone());
            match &triple.object {
                Term::Iri(iri) => iris.push(iri.clone()),
                Term::Literal(literal) => iris.push(literal.datatype().clone()),
                Term::BlankNode(_) => {}
            }
        }
        for iri in iris {
            if self.prefixes.find_longest_match(iri.as_str()).is_some() {
                continue;
            }
            if let Some((prefix, _)) = defaults.find_longest_match(iri.as_str()) {
                if !self.prefixes.contains_prefix(prefix) {
                    let namespace = defaults.namespace(prefix).expect("default entry").to_string();
                    self.prefixes.insert(prefix, namespace);
                    continue;
                }
            }
            self.prefixes.ensure_prefix_for(iri.as_str());
        }
    }

    fn detect_lists(&mut self) {
        let heads: Vec<BlankNode> = self
            .groups
            .keys()
            .filter_map(|subject| match subject {
                Subject::BlankNode(node) => Some(node.clone()),
                Subject::Iri(_) => None,
            })
            .filter(|node| self.object_refs.get(node).copied().unwrap_or(0) == 1)
            .collect();

        'heads: for head in heads {
            let mut chain = vec![head.clone()];
            let mut items = Vec::new();
            let mut current = head.clone();
            loop {
                let Some((first, rest)) = self.list_node_parts(&current) else {
                    continue 'heads;
                };
                items.push(first);
                match rest {
                    Term::Iri(iri) if iri == rdf::NIL => break,
                    Term::BlankNode(next) => {
                        let single_use = self.object_refs.get(&next).copied().unwrap_or(0) == 1;
                        if !single_use || chain.contains(&next) {
                            continue 'heads;
                        }
                        chain.push(next.clone());
                        current = next;
                    }
                    _ => continue 'heads,
                }
            }
            self.lists.insert(head, items);
            self.list_nodes.extend(chain);
        }
    }

    /// The `(rdf:first, rdf:rest)` pair of a well-formed list node, which
    /// must carry exactly those two predicates with one object each.
    fn list_node_parts(&self, node: &BlankNode) -> Option<(Term, Term)> {
        let predicates = self.groups.get(&Subject::BlankNode(node.clone()))?;
        if predicates.len() != 2 {
            return None;
        }
        let firsts = predicates.get(&rdf::FIRST)?;
        let rests = predicates.get(&rdf::REST)?;
        if firsts.len() != 1 || rests.len() != 1 {
            return None;
        }
        Some((
            firsts.first().expect("len checked").clone(),
            rests.first().expect("len checked").clone(),
        ))
    }

    fn detect_inline_candidates(&mut self) {
        let mut candidates: IndexSet<BlankNode> = self
            .groups
            .keys()
            .filter_map(|subject| match subject {
                Subject::BlankNode(node) => Some(node.clone()),
                Subject::Iri(_) => None,
            })
            .filter(|node| {
                self.object_refs.get(node).copied().unwrap_or(0) == 1
                    && !self.list_nodes.contains(node)
            })
            .collect();

        // inlining recurses through blank-node objects; a node that can
        // reach itself through candidate edges must keep its label
        loop {
            let cyclic = candidates
                .iter()
                .find(|node| self.reaches_itself(node, &candidates))
                .cloned();
            match cyclic {
                Some(node) => {
                    candidates.shift_remove(&node);
                }
                None => break,
            }
        }

        self.inline = candidates;
    }

    fn reaches_itself(&self, start: &BlankNode, candidates: &IndexSet<BlankNode>) -> bool {
        let mut stack: Vec<BlankNode> = vec![start.clone()];
        let mut seen: IndexSet<BlankNode> = IndexSet::new();
        while let Some(node) = stack.pop() {
            for next in self.candidate_edges(&node, candidates) {
                if &next == start {
                    return true;
                }
                if seen.insert(next.clone()) {
                    stack.push(next);
                }
            }
        }
        false
    }

    fn candidate_edges(
        &self,
        node: &BlankNode,
        candidates: &IndexSet<BlankNode>,
    ) -> Vec<BlankNode> {
        let mut out = Vec::new();
        if let Some(predicates) = self.groups.get(&Subject::BlankNode(node.clone())) {
            for objects in predicates.values() {
                for object in objects {
                    if let Term::BlankNode(next) = object {
                        if candidates.contains(next) {
                            out.push(next.clone());
                        }
                    }
                }
            }
        }
        out
    }

    fn assign_labels(&mut self) {
        let mut order: Vec<BlankNode> = Vec::new();
        for triple in self.graph.triples() {
            if let Subject::BlankNode(node) = &triple.subject {
                order.push(node.clone());
            }
            if let Term::BlankNode(node) = &triple.object {
                order.push(node.clone());
            }
        }
        for node in order {
            if self.labels.contains_key(&node) || !self.needs_label(&node) {
                continue;
            }
            let index = self.labels.len();
            self.labels.insert(node, index);
        }
    }

    fn needs_label(&self, node: &BlankNode) -> bool {
        if self.inline.contains(node) || self.list_nodes.contains(node) {
            return false;
        }
        let has_triples = self.groups.contains_key(&Subject::BlankNode(node.clone()));
        let refs = self.object_refs.get(node).copied().unwrap_or(0);
        // a leaf referenced once renders as anonymous []
        has_triples || refs > 1
    }

    // ---- rendering ---------------------------------------------------------

    fn render(&mut self) -> String {
        let body = self.render_body();
        let mut head = String::new();
        if self.options.include_base_declaration {
            if let Some(base) = self.base.clone() {
                head.push_str(&format!("@base <{base}> .\n"));
            }
        }
        for prefix in self.used_prefixes.clone() {
            if let Some(namespace) = self.prefixes.namespace(&prefix) {
                head.push_str(&format!("@prefix {prefix}: <{namespace}> .\n"));
            }
        }
        if head.is_empty() {
            body
        } else if body.is_empty() {
            head
        } else {
            format!("{head}\n{body}")
        }
    }

    fn render_body(&mut self) -> String {
        let mut iri_subjects: Vec<Subject> = Vec::new();
        let mut blank_subjects: Vec<(usize, Subject)> = Vec::new();
        for subject in self.groups.keys() {
            match subject {
                Subject::Iri(_) => iri_subjects.push(subject.clone()),
                Subject::BlankNode(node) => {
                    if self.inline.contains(node) || self.list_nodes.contains(node) {
                        continue;
                    }
                    let label = self.labels.get(node).copied().unwrap_or(usize::MAX);
                    blank_subjects.push((label, subject.clone()));
                }
            }
        }
        iri_subjects.sort_by(|a, b| {
            a.as_iri()
                .map(Iri::as_str)
                .cmp(&b.as_iri().map(Iri::as_str))
        });
        blank_subjects.sort_by_key(|(label, _)| *label);

        let mut groups = Vec::new();
        for subject in iri_subjects
            .into_iter()
            .chain(blank_subjects.into_iter().map(|(_, s)| s))
        {
            groups.push(self.render_subject_group(&subject));
        }
        if groups.is_empty() {
            String::new()
        } else {
            // double line break between subject groups
            format!("{}\n", groups.join("\n\n"))
        }
    }

    fn render_subject_group(&mut self, subject: &Subject) -> String {
        let subject_text = match subject {
            Subject::Iri(iri) => self.render_iri(iri, IriRole::Subject),
            Subject::BlankNode(node) => self.blank_node_label(node),
        };
        let predicates = self.render_predicate_lines(subject, INDENT);
        let joined = predicates.join(&format!(" ;\n{INDENT}"));
        format!("{subject_text} {joined} .")
    }

    /// One `predicate objects` line per predicate, `rdf:type` first.
    fn render_predicate_lines(&mut self, subject: &Subject, indent: &str) -> Vec<String> {
        let Some(predicate_map) = self.groups.get(subject).cloned() else {
            return Vec::new();
        };
        let mut predicates: Vec<Iri> = predicate_map.keys().cloned().collect();
        predicates.sort_by(|a, b| {
            let a_type = *a == rdf::TYPE;
            let b_type = *b == rdf::TYPE;
            b_type.cmp(&a_type).then_with(|| a.as_str().cmp(b.as_str()))
        });

        let mut lines = Vec::new();
        for predicate in predicates {
            let objects = predicate_map.get(&predicate).expect("key from map");
            let role = if predicate == rdf::TYPE {
                IriRole::TypeObject
            } else {
                IriRole::Object
            };
            let mut rendered: SmallVec<[String; 4]> = objects
                .iter()
                .map(|object| self.render_term(object, role, indent))
                .collect();
            rendered.sort();
            let predicate_text = if predicate == rdf::TYPE {
                "a".to_string()
            } else {
                self.render_iri(&predicate, IriRole::Predicate)
            };
            lines.push(format!("{predicate_text} {}", rendered.join(", ")));
        }
        lines
    }

    fn render_term(&mut self, term: &Term, role: IriRole, indent: &str) -> String {
        match term {
            Term::Iri(iri) => self.render_iri(iri, role),
            Term::Literal(literal) => self.render_literal(literal),
            Term::BlankNode(node) => self.render_blank_node(node, indent),
        }
    }

    fn render_blank_node(&mut self, node: &BlankNode, indent: &str) -> String {
        if let Some(items) = self.lists.get(node).cloned() {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| self.render_term(item, IriRole::Object, indent))
                .collect();
            return format!("( {} )", rendered.join(" "));
        }
        if self.inline.contains(node) {
            let inner_indent = format!("{indent}{INDENT}");
            let lines = self.render_predicate_lines(&Subject::BlankNode(node.clone()), &inner_indent);
            let joined = lines.join(&format!(" ;\n{inner_indent}"));
            return format!("[\n{inner_indent}{joined}\n{indent}]");
        }
        if self.labels.contains_key(node) {
            self.blank_node_label(node)
        } else {
            // single-use leaf with no properties
            "[]".to_string()
        }
    }

    fn blank_node_label(&self, node: &BlankNode) -> String {
        match self.labels.get(node) {
            Some(index) => format!("_:b{index}"),
            None => "[]".to_string(),
        }
    }

    fn render_literal(&mut self, literal: &Literal) -> String {
        if let Some(language) = literal.language() {
            return format!("{}@{language}", quote_string(literal.value()));
        }
        let value = literal.value();
        let datatype = literal.datatype();
        if *datatype == xsd::INTEGER && lexical::is_integer(value) {
            return value.to_string();
        }
        if *datatype == xsd::DECIMAL && lexical::is_decimal(value) {
            return value.to_string();
        }
        if *datatype == xsd::DOUBLE
            && lexical::is_double(value)
            && (value.contains('e') || value.contains('E'))
        {
            return value.to_string();
        }
        if *datatype == xsd::BOOLEAN && lexical::is_boolean(value) {
            return value.to_string();
        }
        if *datatype == xsd::STRING {
            return quote_string(value);
        }
        let datatype_text = self.render_iri(datatype, IriRole::TypeObject);
        format!("{}^^{datatype_text}", quote_string(value))
    }

    fn render_iri(&mut self, iri: &Iri, role: IriRole) -> String {
        let base = match self.options.iri_relativization {
            IriRelativizationMode::None => None,
            _ => self.base.as_deref(),
        };
        let mut compacted = self
            .prefixes
            .compact_iri(iri.as_str(), role, base, &self.compaction);
        if self.options.render_fragments_as_prefixed {
            if let CompactedIri::Relative(relative) = &compacted {
                if relative.starts_with('#') {
                    let prefixed =
                        self.prefixes
                            .compact_iri(iri.as_str(), role, None, &self.compaction);
                    if matches!(prefixed, CompactedIri::Prefixed(..)) {
                        compacted = prefixed;
                    }
                }
            }
        }
        if let Some(prefix) = compacted.used_prefix() {
            self.used_prefixes.insert(prefix.to_string());
        }
        compacted.to_turtle()
    }
}

/// Quote a string literal, using triple quotes when the content has
/// newlines or both quote characters.
fn quote_string(value: &str) -> String {
    let has_newline = value.contains('\n') || value.contains('\r');
    let has_both_quotes = value.contains('"') && value.contains('\'');
    if has_newline || has_both_quotes {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"\"\"{escaped}\"\"\"")
    } else {
        format!("\"{}\"", crate::term::escape_literal_value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triple::Triple;
    use crate::turtle::parser::{parse_turtle, TurtleDecoderOptions};

    fn iri(s: &str) -> Iri {
        Iri::new_unchecked(s)
    }

    fn encode(graph: &Graph) -> String {
        encode_turtle(graph, None, None, &TurtleEncoderOptions::default()).unwrap()
    }

    fn reparse(output: &str) -> Graph {
        parse_turtle(output, &TurtleDecoderOptions::default(), None).unwrap()
    }

    #[test]
    fn test_simple_graph_grouping() {
        let subject = iri("http://ex/s");
        let graph = Graph::from_triples([
            Triple::new(subject.clone(), rdf::TYPE, iri("http://xmlns.com/foaf/0.1/Person")),
            Triple::new(
                subject.clone(),
                iri("http://xmlns.com/foaf/0.1/name"),
                Literal::new("Alice"),
            ),
        ]);
        let output = encode(&graph);
        assert!(output.contains("@prefix foaf: <http://xmlns.com/foaf/0.1/> ."));
        assert!(output.contains("<http://ex/s> a foaf:Person ;"));
        assert!(output.contains("foaf:name \"Alice\" ."));
    }

    #[test]
    fn test_objects_grouped_with_comma() {
        let subject = iri("http://ex/s");
        let predicate = iri("http://ex/p");
        let graph = Graph::from_triples([
            Triple::new(subject.clone(), predicate.clone(), Literal::new("a")),
            Triple::new(subject.clone(), predicate.clone(), Literal::new("b")),
        ]);
        let output = encode(&graph);
        assert!(output.contains("\"a\", \"b\""));
    }

    #[test]
    fn test_literal_shorthands() {
        let subject = iri("http://ex/s");
        let graph = Graph::from_triples([
            Triple::new(subject.clone(), iri("http://ex/i"), Literal::from_i64(42)),
            Triple::new(
                subject.clone(),
                iri("http://ex/d"),
                Literal::typed("3.14", xsd::DECIMAL),
            ),
            Triple::new(subject.clone(), iri("http://ex/b"), Literal::from_bool(true)),
            Triple::new(
                subject.clone(),
                iri("http://ex/e"),
                Literal::typed("1.0E0", xsd::DOUBLE),
            ),
        ]);
        let output = encode(&graph);
        assert!(output.contains(" 42"));
        assert!(output.contains(" 3.14"));
        assert!(output.contains(" true"));
        assert!(output.contains(" 1.0E0"));
        assert!(!output.contains("XMLSchema#integer"));
    }

    #[test]
    fn test_lang_tagged_literal() {
        let graph = Graph::from_triples([Triple::new(
            iri("http://ex/s"),
            iri("http://ex/p"),
            Literal::lang_tagged("bonjour", "fr").unwrap(),
        )]);
        assert!(encode(&graph).contains("\"bonjour\"@fr"));
    }

    #[test]
    fn test_multiline_string_uses_triple_quotes() {
        let graph = Graph::from_triples([Triple::new(
            iri("http://ex/s"),
            iri("http://ex/p"),
            Literal::new("line one\nline two"),
        )]);
        let output = encode(&graph);
        assert!(output.contains("\"\"\"line one\nline two\"\"\""));
        assert_eq!(reparse(&output).triple_count(), 1);
    }

    #[test]
    fn test_single_use_blank_node_is_inlined() {
        let address = BlankNode::new();
        let graph = Graph::from_triples([
            Triple::new(
                iri("http://ex/p1"),
                iri("https://schema.org/address"),
                address.clone(),
            ),
            Triple::new(
                Subject::BlankNode(address.clone()),
                iri("https://schema.org/city"),
                Literal::new("Springfield"),
            ),
        ]);
        let output = encode(&graph);
        assert!(output.contains('['), "expected inline bnode in:\n{output}");
        assert!(!output.contains("_:b"), "no labels expected in:\n{output}");
        assert_eq!(reparse(&output).triple_count(), 2);
    }

    #[test]
    fn test_twice_referenced_blank_node_keeps_label() {
        let shared = BlankNode::new();
        let graph = Graph::from_triples([
            Triple::new(iri("http://ex/a"), iri("http://ex/p"), shared.clone()),
            Triple::new(iri("http://ex/b"), iri("http://ex/p"), shared.clone()),
            Triple::new(
                Subject::BlankNode(shared.clone()),
                iri("http://ex/name"),
                Literal::new("shared"),
            ),
        ]);
        let output = encode(&graph);
        assert!(output.contains("_:b0"), "expected label in:\n{output}");
        assert!(!output.contains('['));
    }

    #[test]
    fn test_cyclic_blank_nodes_fall_back_to_labels() {
        let a = BlankNode::new();
        let b = BlankNode::new();
        let graph = Graph::from_triples([
            Triple::new(
                Subject::BlankNode(a.clone()),
                iri("http://ex/next"),
                b.clone(),
            ),
            Triple::new(
                Subject::BlankNode(b.clone()),
                iri("http://ex/next"),
                a.clone(),
            ),
        ]);
        let output = encode(&graph);
        assert!(output.contains("_:b0"));
        assert!(output.contains("_:b1"));
        let back = reparse(&output);
        assert_eq!(back.triple_count(), 2);
    }

    #[test]
    fn test_well_formed_list_renders_as_collection() {
        let graph = reparse("<http://ex/s> <http://ex/p> ( \"a\" \"b\" \"c\" ) .");
        let output = encode(&graph);
        assert!(
            output.contains("( \"a\" \"b\" \"c\" )"),
            "expected collection in:\n{output}"
        );
        assert!(!output.contains("rdf:first"));
        assert_eq!(reparse(&output).triple_count(), 7);
    }

    #[test]
    fn test_shared_list_head_uses_explicit_plumbing() {
        let head = BlankNode::new();
        let graph = Graph::from_triples([
            Triple::new(iri("http://ex/a"), iri("http://ex/p"), head.clone()),
            Triple::new(iri("http://ex/b"), iri("http://ex/p"), head.clone()),
            Triple::new(
                Subject::BlankNode(head.clone()),
                rdf::FIRST,
                Literal::new("x"),
            ),
            Triple::new(Subject::BlankNode(head.clone()), rdf::REST, rdf::NIL),
        ]);
        let output = encode(&graph);
        assert!(!output.contains('('), "no collection in:\n{output}");
        assert!(output.contains("rdf:first"));
    }

    #[test]
    fn test_base_relativization_and_declaration() {
        let graph = Graph::from_triples([Triple::new(
            iri("http://ex/docs/child"),
            iri("http://ex/vocab#p"),
            iri("http://ex/docs/other"),
        )]);
        let output = encode_turtle(
            &graph,
            Some("http://ex/docs/"),
            None,
            &TurtleEncoderOptions::default(),
        )
        .unwrap();
        assert!(output.contains("@base <http://ex/docs/> ."));
        assert!(output.contains("<child>"));
        assert!(output.contains("<other>"));
        // predicates never relativize
        assert!(!output.contains("<../vocab#p>"));
    }

    #[test]
    fn test_relativization_none_keeps_absolute() {
        let graph = Graph::from_triples([Triple::new(
            iri("http://ex/docs/child"),
            iri("http://ex/vocab#p"),
            Literal::new("x"),
        )]);
        let options = TurtleEncoderOptions {
            iri_relativization: IriRelativizationMode::None,
            include_base_declaration: false,
            ..TurtleEncoderOptions::default()
        };
        let output = encode_turtle(&graph, Some("http://ex/docs/"), None, &options).unwrap();
        assert!(output.contains("<http://ex/docs/child>"));
    }

    #[test]
    fn test_unused_prefixes_dropped() {
        let mut custom = PrefixMap::new();
        custom.insert("unused", "http://nowhere.example/");
        let graph = Graph::from_triples([Triple::new(
            iri("http://ex/s"),
            iri("http://ex/p"),
            Literal::new("x"),
        )]);
        let options = TurtleEncoderOptions {
            custom_prefixes: custom,
            generate_missing_prefixes: false,
            ..TurtleEncoderOptions::default()
        };
        let output = encode_turtle(&graph, None, None, &options).unwrap();
        assert!(!output.contains("unused"));
    }

    #[test]
    fn test_prefix_synthesis_for_unknown_namespace() {
        let graph = Graph::from_triples([Triple::new(
            iri("http://my.app/test-complex-ontology#Widget"),
            rdf::TYPE,
            iri("http://my.app/test-complex-ontology#Type"),
        )]);
        let output = encode(&graph);
        assert!(output.contains("@prefix tco: <http://my.app/test-complex-ontology#> ."));
        assert!(output.contains("tco:Widget"));
        assert!(output.contains("a tco:Type"));
    }

    #[test]
    fn test_deterministic_output() {
        let graph = Graph::from_triples([
            Triple::new(iri("http://ex/b"), iri("http://ex/p"), Literal::new("1")),
            Triple::new(iri("http://ex/a"), iri("http://ex/q"), Literal::new("2")),
            Triple::new(iri("http://ex/a"), iri("http://ex/p"), Literal::new("3")),
        ]);
        let first = encode(&graph);
        let second = encode(&graph);
        assert_eq!(first, second);
        // subjects sorted lexicographically
        let a_pos = first.find("<http://ex/a>").unwrap();
        let b_pos = first.find("<http://ex/b>").unwrap();
        assert!(a_pos < b_pos);
    }

    #[test]
    fn test_subject_groups_separated_by_blank_line() {
        let graph = Graph::from_triples([
            Triple::new(iri("http://ex/a"), iri("http://ex/p"), Literal::new("1")),
            Triple::new(iri("http://ex/b"), iri("http://ex/p"), Literal::new("2")),
        ]);
        let output = encode(&graph);
        assert!(output.contains(".\n\n"));
    }
}
