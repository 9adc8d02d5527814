//! JSON-LD encoder: context synthesis and compaction.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::codec::GraphEncoder;
use crate::error::Result;
use crate::graph::Graph;
use crate::ntriples::BlankNodeLabeler;
use crate::prefix::{CompactedIri, CompactionOptions, IriRole, PrefixMap};
use crate::term::{lexical, Iri, Literal, Subject, Term};
use crate::vocab::{rdf, xsd};

/// Options for the JSON-LD encoder.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct JsonLdEncoderOptions {
    /// Prefixes usable for compaction, in addition to the curated
    /// defaults and any prefixes passed per call.
    pub custom_prefixes: PrefixMap,
    /// Relativize IRIs against the supplied base and declare it as
    /// `@base` in the context. When off, the base is ignored entirely and
    /// every IRI stays absolute or prefixed.
    pub include_base_in_context: bool,
}

impl Default for JsonLdEncoderOptions {
    fn default() -> Self {
        JsonLdEncoderOptions {
            custom_prefixes: PrefixMap::new(),
            include_base_in_context: true,
        }
    }
}

/// Encoder instance carrying [`JsonLdEncoderOptions`].
#[derive(Debug, Clone, Default)]
pub struct JsonLdEncoder {
    options: JsonLdEncoderOptions,
}

impl JsonLdEncoder {
    /// An encoder with the given options.
    #[must_use]
    pub fn with_options(options: JsonLdEncoderOptions) -> Self {
        JsonLdEncoder { options }
    }
}

impl GraphEncoder for JsonLdEncoder {
    fn convert(
        &self,
        graph: &Graph,
        base_uri: Option<&str>,
        custom_prefixes: Option<&PrefixMap>,
    ) -> Result<String> {
        let mut prefixes = PrefixMap::with_defaults();
        prefixes.extend_from(&self.options.custom_prefixes);
        if let Some(extra) = custom_prefixes {
            prefixes.extend_from(extra);
        }
        // when the base is not going into the context, relativizing against
        // it would produce references the consumer cannot resolve
        let base = if self.options.include_base_in_context {
            base_uri.map(str::to_string)
        } else {
            None
        };
        let mut state = EncodeState {
            prefixes,
            base,
            compaction: CompactionOptions::default(),
            labeler: BlankNodeLabeler::new(),
            used_prefixes: std::collections::BTreeSet::new(),
        };
        let value = state.encode(graph);
        Ok(serde_json::to_string_pretty(&value).expect("valid JSON value"))
    }
}

struct EncodeState {
    prefixes: PrefixMap,
    base: Option<String>,
    compaction: CompactionOptions,
    labeler: BlankNodeLabeler,
    used_prefixes: std::collections::BTreeSet<String>,
}

impl EncodeState {
    fn encode(&mut self, graph: &Graph) -> Value {
        // subject → predicate → objects, deduplicated
        let mut groups: IndexMap<Subject, IndexMap<Iri, Vec<Term>>> = IndexMap::new();
        for triple in graph.triples() {
            let objects = groups
                .entry(triple.subject.clone())
                .or_default()
                .entry(triple.predicate.clone())
                .or_default();
            if !objects.contains(&triple.object) {
                objects.push(triple.object.clone());
            }
        }

        let mut subjects: Vec<Subject> = groups.keys().cloned().collect();
        subjects.sort_by(|a, b| match (a, b) {
            (Subject::Iri(x), Subject::Iri(y)) => x.cmp(y),
            (Subject::Iri(_), Subject::BlankNode(_)) => std::cmp::Ordering::Less,
            (Subject::BlankNode(_), Subject::Iri(_)) => std::cmp::Ordering::Greater,
            (Subject::BlankNode(x), Subject::BlankNode(y)) => x.cmp(y),
        });

        let nodes: Vec<Value> = subjects
            .iter()
            .map(|subject| self.encode_node(subject, groups.get(subject).expect("grouped")))
            .collect();

        let context = self.build_context();
        match (nodes.len(), context) {
            (1, None) => nodes.into_iter().next().expect("one node"),
            (1, Some(context)) => {
                let mut node = match nodes.into_iter().next().expect("one node") {
                    Value::Object(map) => map,
                    other => {
                        let mut map = Map::new();
                        map.insert("@graph".to_string(), json!([other]));
                        map
                    }
                };
                node.insert("@context".to_string(), context);
                Value::Object(node)
            }
            (_, context) => {
                let mut root = Map::new();
                if let Some(context) = context {
                    root.insert("@context".to_string(), context);
                }
                root.insert("@graph".to_string(), Value::Array(nodes));
                Value::Object(root)
            }
        }
    }

    fn encode_node(&mut self, subject: &Subject, predicates: &IndexMap<Iri, Vec<Term>>) -> Value {
        let mut node = Map::new();
        node.insert(
            "@id".to_string(),
            Value::String(match subject {
                Subject::Iri(iri) => self.render_iri(iri, IriRole::Subject),
                Subject::BlankNode(bnode) => self.labeler.label(bnode),
            }),
        );

        for (predicate, objects) in predicates {
            if *predicate == rdf::TYPE {
                let types: Vec<Value> = objects
                    .iter()
                    .filter_map(|object| object.as_iri())
                    .map(|iri| Value::String(self.render_iri(iri, IriRole::TypeObject)))
                    .collect();
                if !types.is_empty() {
                    node.insert("@type".to_string(), unwrap_single(types));
                }
                // blank-node or literal type objects cannot ride on @type;
                // they fall through to the plain predicate form
                let leftover: Vec<Value> = objects
                    .iter()
                    .filter(|object| object.as_iri().is_none())
                    .map(|object| self.encode_term(object))
                    .collect();
                if !leftover.is_empty() {
                    node.insert(rdf::TYPE.as_str().to_string(), unwrap_single(leftover));
                }
                continue;
            }
            let key = self.render_iri(predicate, IriRole::Predicate);
            let values: Vec<Value> = objects
                .iter()
                .map(|object| self.encode_term(object))
                .collect();
            node.insert(key, unwrap_single(values));
        }
        Value::Object(node)
    }

    fn encode_term(&mut self, term: &Term) -> Value {
        match term {
            Term::Iri(iri) => json!({ "@id": self.render_iri(iri, IriRole::Object) }),
            Term::BlankNode(node) => json!({ "@id": self.labeler.label(node) }),
            Term::Literal(literal) => self.encode_literal(literal),
        }
    }

    fn encode_literal(&mut self, literal: &Literal) -> Value {
        if let Some(language) = literal.language() {
            return json!({ "@value": literal.value(), "@language": language });
        }
        let datatype = literal.datatype();
        if *datatype == xsd::STRING {
            return Value::String(literal.value().to_string());
        }
        if *datatype == xsd::BOOLEAN && lexical::is_boolean(literal.value()) {
            return Value::Bool(literal.value() == "true");
        }
        if let Some(number) = coerce_number(literal.value(), datatype) {
            return Value::Number(number);
        }
        // explicit value object; the datatype stays a full IRI
        json!({ "@value": literal.value(), "@type": datatype.as_str() })
    }

    fn render_iri(&mut self, iri: &Iri, role: IriRole) -> String {
        let compacted =
            self.prefixes
                .compact_iri(iri.as_str(), role, self.base.as_deref(), &self.compaction);
        if let Some(prefix) = compacted.used_prefix() {
            self.used_prefixes.insert(prefix.to_string());
        }
        match compacted {
            CompactedIri::Relative(relative) => relative,
            CompactedIri::Prefixed(prefix, local) => format!("{prefix}:{local}"),
            CompactedIri::Absolute(iri) => iri,
        }
    }

    fn build_context(&self) -> Option<Value> {
        let mut context = Map::new();
        if let Some(base) = &self.base {
            context.insert("@base".to_string(), Value::String(base.clone()));
        }
        for prefix in &self.used_prefixes {
            if let Some(namespace) = self.prefixes.namespace(prefix) {
                context.insert(prefix.clone(), Value::String(namespace.to_string()));
            }
        }
        if context.is_empty() {
            None
        } else {
            Some(Value::Object(context))
        }
    }
}

fn unwrap_single(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        values.pop().expect("one value")
    } else {
        Value::Array(values)
    }
}

/// Render a numeric literal as a bare JSON number when its lexical form
/// survives the trip through JSON unchanged and the number's printed shape
/// still identifies the datatype on decode.
fn coerce_number(value: &str, datatype: &Iri) -> Option<serde_json::Number> {
    let number: serde_json::Number = value.parse().ok()?;
    let printed = number.to_string();
    if printed != value {
        return None;
    }
    let class_matches = if *datatype == xsd::INTEGER {
        number.is_i64() || number.is_u64()
    } else if *datatype == xsd::DECIMAL {
        printed.contains('.') && !printed.contains(&['e', 'E'][..])
    } else if *datatype == xsd::DOUBLE {
        printed.contains(&['e', 'E'][..])
    } else {
        return None;
    };
    class_matches.then_some(number)
}
