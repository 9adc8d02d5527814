//! JSON-LD decoder: context resolution, expansion, named-graph policy.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::codec::GraphDecoder;
use crate::error::{RdfError, Result};
use crate::graph::Graph;
use crate::iri;
use crate::term::{has_scheme, BlankNode, Iri, Literal, Subject, Term};
use crate::triple::Triple;
use crate::vocab::{rdf, xsd};

use super::NamedGraphMode;

/// Options for the JSON-LD decoder.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct JsonLdDecoderOptions {
    /// Policy for `@graph` entries with an explicit `@id`.
    pub named_graphs: NamedGraphMode,
    /// Base IRI used when the document's context does not declare one.
    pub base_uri: Option<String>,
}

/// Decoder instance carrying [`JsonLdDecoderOptions`].
#[derive(Debug, Clone, Default)]
pub struct JsonLdDecoder {
    options: JsonLdDecoderOptions,
}

impl JsonLdDecoder {
    /// A decoder with the given options.
    #[must_use]
    pub fn with_options(options: JsonLdDecoderOptions) -> Self {
        JsonLdDecoder { options }
    }
}

impl GraphDecoder for JsonLdDecoder {
    fn convert(&self, input: &str, document_url: Option<&str>) -> Result<Graph> {
        let value: Value = serde_json::from_str(input).map_err(|error| {
            RdfError::syntax(format!("invalid JSON: {error}"), error.line(), error.column())
        })?;
        let base = self
            .options
            .base_uri
            .clone()
            .or_else(|| document_url.map(str::to_string));
        let mut state = DecodeState {
            mode: self.options.named_graphs,
            triples: Vec::new(),
            blank_nodes: HashMap::new(),
        };
        let root_context = Context {
            terms: IndexMap::new(),
            base,
        };
        match value {
            Value::Object(object) => {
                state.process_node(&object, &root_context)?;
            }
            Value::Array(nodes) => {
                for node in nodes {
                    match node {
                        Value::Object(object) => {
                            state.process_node(&object, &root_context)?;
                        }
                        other => {
                            return Err(RdfError::ConstraintViolation(format!(
                                "top-level array entries must be node objects, found {other}"
                            )));
                        }
                    }
                }
            }
            other => {
                return Err(RdfError::ConstraintViolation(format!(
                    "top-level JSON-LD value must be an object or array, found {other}"
                )));
            }
        }
        Ok(Graph::from_triples(state.triples))
    }
}

/// Active term definitions and base.
#[derive(Debug, Clone)]
struct Context {
    terms: IndexMap<String, String>,
    base: Option<String>,
}

impl Context {
    /// Merge a local `@context` value over this context.
    fn with_local(&self, value: &Value) -> Result<Context> {
        let mut merged = self.clone();
        match value {
            Value::Object(entries) => {
                for (key, definition) in entries {
                    if key == "@base" {
                        match definition {
                            Value::String(base) => merged.base = Some(base.clone()),
                            Value::Null => merged.base = None,
                            other => {
                                return Err(RdfError::ConstraintViolation(format!(
                                    "@base must be a string, found {other}"
                                )));
                            }
                        }
                        continue;
                    }
                    if key.starts_with('@') {
                        // other keywords (@vocab, @language defaults) are out
                        // of scope
                        continue;
                    }
                    let target = match definition {
                        Value::String(iri) => iri.clone(),
                        Value::Object(map) => match map.get("@id") {
                            Some(Value::String(iri)) => iri.clone(),
                            _ => {
                                return Err(RdfError::ConstraintViolation(format!(
                                    "term definition for '{key}' must be a string or \
                                     an object with @id"
                                )));
                            }
                        },
                        other => {
                            return Err(RdfError::ConstraintViolation(format!(
                                "unsupported term definition for '{key}': {other}"
                            )));
                        }
                    };
                    merged.terms.insert(key.clone(), target);
                }
                Ok(merged)
            }
            Value::String(url) => Err(RdfError::ConstraintViolation(format!(
                "remote context '{url}' is not supported; inline the context object"
            ))),
            other => Err(RdfError::ConstraintViolation(format!(
                "@context must be an object, found {other}"
            ))),
        }
    }
}

struct DecodeState {
    mode: NamedGraphMode,
    triples: Vec<Triple>,
    blank_nodes: HashMap<String, BlankNode>,
}

impl DecodeState {
    /// Process one node object. Returns the node's subject, or `None` for
    /// pure graph containers.
    fn process_node(&mut self, object: &Map<String, Value>, outer: &Context) -> Result<Option<Subject>> {
        let context = match object.get("@context") {
            Some(value) => outer.with_local(value)?,
            None => outer.clone(),
        };

        if let Some(graph_value) = object.get("@graph") {
            return self.process_graph_container(object, graph_value, &context);
        }

        let subject = match object.get("@id") {
            Some(Value::String(id)) => self.expand_id(id, &context)?,
            Some(other) => {
                return Err(RdfError::ConstraintViolation(format!(
                    "@id must be a string, found {other}"
                )));
            }
            None => Subject::BlankNode(BlankNode::new()),
        };

        if let Some(types) = object.get("@type") {
            for type_value in as_array(types) {
                let Value::String(type_name) = type_value else {
                    return Err(RdfError::ConstraintViolation(format!(
                        "@type values must be strings, found {type_value}"
                    )));
                };
                let type_iri = self.expand_type(type_name, &context)?;
                self.triples
                    .push(Triple::new(subject.clone(), rdf::TYPE, type_iri));
            }
        }

        for (key, value) in object {
            if key.starts_with('@') {
                continue;
            }
            let predicate = self.expand_predicate(key, &context)?;
            for entry in as_array(value) {
                if entry.is_null() {
                    continue;
                }
                let term = self.object_term(entry, &context)?;
                self.triples
                    .push(Triple::new(subject.clone(), predicate.clone(), term));
            }
        }

        Ok(Some(subject))
    }

    fn process_graph_container(
        &mut self,
        object: &Map<String, Value>,
        graph_value: &Value,
        context: &Context,
    ) -> Result<Option<Subject>> {
        let named = object.contains_key("@id");
        if named {
            match self.mode {
                NamedGraphMode::Strict => {
                    let id = object
                        .get("@id")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    return Err(RdfError::ConstraintViolation(format!(
                        "named graph '{id}' is not allowed; configure \
                         ignore_named_graphs or merge_into_default to accept it"
                    )));
                }
                NamedGraphMode::Ignore => return Ok(None),
                NamedGraphMode::Merge => {}
            }
        }
        for node in as_array(graph_value) {
            match node {
                Value::Object(inner) => {
                    self.process_node(inner, context)?;
                }
                other => {
                    return Err(RdfError::ConstraintViolation(format!(
                        "@graph entries must be node objects, found {other}"
                    )));
                }
            }
        }
        Ok(None)
    }

    fn object_term(&mut self, value: &Value, context: &Context) -> Result<Term> {
        match value {
            Value::String(text) => Ok(Term::Literal(Literal::new(text.clone()))),
            Value::Bool(flag) => Ok(Term::Literal(Literal::from_bool(*flag))),
            Value::Number(number) => Ok(Term::Literal(number_literal(number))),
            Value::Object(object) => {
                if object.contains_key("@list") {
                    return Err(RdfError::ConstraintViolation(
                        "@list containers are not supported; nest rdf:first/rdf:rest \
                         objects instead"
                            .to_string(),
                    ));
                }
                if object.contains_key("@value") {
                    return self.value_object(object, context);
                }
                match self.process_node(object, context)? {
                    Some(subject) => Ok(Term::from(subject)),
                    None => Err(RdfError::ConstraintViolation(
                        "graph container cannot appear in value position".to_string(),
                    )),
                }
            }
            other => Err(RdfError::ConstraintViolation(format!(
                "unsupported object value: {other}"
            ))),
        }
    }

    fn value_object(&mut self, object: &Map<String, Value>, context: &Context) -> Result<Term> {
        let raw = object.get("@value").expect("caller checked");
        let language = match object.get("@language") {
            Some(Value::String(language)) => Some(language.clone()),
            Some(other) => {
                return Err(RdfError::ConstraintViolation(format!(
                    "@language must be a string, found {other}"
                )));
            }
            None => None,
        };
        let datatype = match object.get("@type") {
            Some(Value::String(datatype)) => Some(self.expand_type(datatype, context)?),
            Some(other) => {
                return Err(RdfError::ConstraintViolation(format!(
                    "@type in a value object must be a string, found {other}"
                )));
            }
            None => None,
        };

        let literal = match raw {
            Value::String(text) => Literal::try_with(text.clone(), datatype, language)?,
            Value::Bool(flag) => {
                Literal::try_with(flag.to_string(), datatype.or(Some(xsd::BOOLEAN)), language)?
            }
            Value::Number(number) => match datatype {
                Some(datatype) => Literal::try_with(number.to_string(), Some(datatype), language)?,
                None => number_literal(number),
            },
            other => {
                return Err(RdfError::ConstraintViolation(format!(
                    "@value must be a scalar, found {other}"
                )));
            }
        };
        Ok(Term::Literal(literal))
    }

    // ---- IRI expansion -----------------------------------------------------

    fn expand_id(&mut self, id: &str, context: &Context) -> Result<Subject> {
        if let Some(label) = id.strip_prefix("_:") {
            return Ok(Subject::BlankNode(self.blank_node(label)));
        }
        if let Some(expanded) = expand_compact(id, context) {
            return Ok(Subject::Iri(Iri::new(expanded)?));
        }
        if has_scheme(id) {
            return Ok(Subject::Iri(Iri::new(id)?));
        }
        let resolved = iri::resolve(context.base.as_deref(), id)?;
        Ok(Subject::Iri(Iri::new(resolved)?))
    }

    fn expand_predicate(&self, key: &str, context: &Context) -> Result<Iri> {
        if let Some(expanded) = expand_compact(key, context) {
            return Iri::new(expanded);
        }
        if has_scheme(key) {
            return Iri::new(key);
        }
        Err(RdfError::ConstraintViolation(format!(
            "cannot expand property '{key}': no term definition, prefix, or scheme"
        )))
    }

    fn expand_type(&self, name: &str, context: &Context) -> Result<Iri> {
        if let Some(expanded) = expand_compact(name, context) {
            return Iri::new(expanded);
        }
        if has_scheme(name) {
            return Iri::new(name);
        }
        let resolved = iri::resolve(context.base.as_deref(), name)?;
        Iri::new(resolved)
    }

    fn blank_node(&mut self, label: &str) -> BlankNode {
        self.blank_nodes
            .entry(label.to_string())
            .or_insert_with(BlankNode::new)
            .clone()
    }
}

/// Expand a term or `prefix:local` form against the context, if it maps.
fn expand_compact(name: &str, context: &Context) -> Option<String> {
    if let Some(iri) = context.terms.get(name) {
        return Some(iri.clone());
    }
    let (prefix, local) = name.split_once(':')?;
    context
        .terms
        .get(prefix)
        .map(|namespace| format!("{namespace}{local}"))
}

/// Classify a bare JSON number into a typed literal.
fn number_literal(number: &serde_json::Number) -> Literal {
    if number.is_i64() || number.is_u64() {
        Literal::typed(number.to_string(), xsd::INTEGER)
    } else {
        let printed = number.to_string();
        if printed.contains(&['e', 'E'][..]) {
            Literal::typed(printed, xsd::DOUBLE)
        } else {
            Literal::typed(printed, xsd::DECIMAL)
        }
    }
}

fn as_array(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(values) => values.iter().collect(),
        other => vec![other],
    }
}
