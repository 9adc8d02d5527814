//! Stock mappers for standard types.
//!
//! Registered by [`super::registry::MapperRegistry::with_defaults`]:
//! literal mappers for `String`, `bool`, `i32`, `i64`, and `f64`, the
//! identity IRI mapper for [`Iri`], and the graph-fragment sink used by
//! unmapped-triples fields.

use std::collections::HashMap;

use crate::error::{MapperError, MapperResult};
use crate::graph::Graph;
use crate::term::{Iri, Literal};
use crate::triple::Triple;
use crate::vocab::xsd;

use super::context::{DeserializationContext, SerializationContext};
use super::registry::MapperRegistry;
use super::traits::{IriTermMapper, LiteralTermMapper, UnmappedTriplesMapper};

pub(crate) fn register_defaults(registry: &mut MapperRegistry) {
    registry.register_literal_mapper::<String, _>(StringLiteralMapper);
    registry.register_literal_mapper::<bool, _>(BoolLiteralMapper);
    registry.register_literal_mapper::<i32, _>(I32LiteralMapper);
    registry.register_literal_mapper::<i64, _>(I64LiteralMapper);
    registry.register_literal_mapper::<f64, _>(F64LiteralMapper);
    registry.register_iri_mapper::<Iri, _>(IriIdentityMapper);
    registry.register_unmapped_triples_mapper::<Graph, _>(GraphFragmentMapper);
}

fn lexical_error(
    literal: &Literal,
    type_name: &'static str,
    message: impl Into<String>,
) -> MapperError {
    MapperError::InvalidLexicalForm {
        value: literal.value().to_string(),
        type_name,
        message: message.into(),
    }
}

/// `String` ↔ `xsd:string`.
#[derive(Debug, Clone, Copy)]
pub struct StringLiteralMapper;

impl LiteralTermMapper<String> for StringLiteralMapper {
    fn datatype(&self) -> Iri {
        xsd::STRING
    }

    fn to_literal_term(
        &self,
        value: &String,
        _context: &mut SerializationContext<'_>,
    ) -> MapperResult<Literal> {
        Ok(Literal::new(value.clone()))
    }

    fn from_literal_term(
        &self,
        literal: &Literal,
        _context: &mut DeserializationContext<'_>,
    ) -> MapperResult<String> {
        Ok(literal.value().to_string())
    }
}

/// `bool` ↔ `xsd:boolean`.
#[derive(Debug, Clone, Copy)]
pub struct BoolLiteralMapper;

impl LiteralTermMapper<bool> for BoolLiteralMapper {
    fn datatype(&self) -> Iri {
        xsd::BOOLEAN
    }

    fn to_literal_term(
        &self,
        value: &bool,
        _context: &mut SerializationContext<'_>,
    ) -> MapperResult<Literal> {
        Ok(Literal::from_bool(*value))
    }

    fn from_literal_term(
        &self,
        literal: &Literal,
        _context: &mut DeserializationContext<'_>,
    ) -> MapperResult<bool> {
        match literal.value() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(lexical_error(literal, "bool", "expected true/false/1/0")),
        }
    }
}

/// `i32` ↔ `xsd:integer`.
#[derive(Debug, Clone, Copy)]
pub struct I32LiteralMapper;

impl LiteralTermMapper<i32> for I32LiteralMapper {
    fn datatype(&self) -> Iri {
        xsd::INTEGER
    }

    fn to_literal_term(
        &self,
        value: &i32,
        _context: &mut SerializationContext<'_>,
    ) -> MapperResult<Literal> {
        Ok(Literal::typed(value.to_string(), xsd::INTEGER))
    }

    fn from_literal_term(
        &self,
        literal: &Literal,
        _context: &mut DeserializationContext<'_>,
    ) -> MapperResult<i32> {
        literal
            .value()
            .parse()
            .map_err(|_| lexical_error(literal, "i32", "expected a 32-bit integer"))
    }
}

/// `i64` ↔ `xsd:integer`.
#[derive(Debug, Clone, Copy)]
pub struct I64LiteralMapper;

impl LiteralTermMapper<i64> for I64LiteralMapper {
    fn datatype(&self) -> Iri {
        xsd::INTEGER
    }

    fn to_literal_term(
        &self,
        value: &i64,
        _context: &mut SerializationContext<'_>,
    ) -> MapperResult<Literal> {
        Ok(Literal::from_i64(*value))
    }

    fn from_literal_term(
        &self,
        literal: &Literal,
        _context: &mut DeserializationContext<'_>,
    ) -> MapperResult<i64> {
        literal
            .value()
            .parse()
            .map_err(|_| lexical_error(literal, "i64", "expected a 64-bit integer"))
    }
}

/// `f64` ↔ `xsd:double`.
#[derive(Debug, Clone, Copy)]
pub struct F64LiteralMapper;

impl LiteralTermMapper<f64> for F64LiteralMapper {
    fn datatype(&self) -> Iri {
        xsd::DOUBLE
    }

    fn to_literal_term(
        &self,
        value: &f64,
        _context: &mut SerializationContext<'_>,
    ) -> MapperResult<Literal> {
        Ok(Literal::from_f64(*value))
    }

    fn from_literal_term(
        &self,
        literal: &Literal,
        _context: &mut DeserializationContext<'_>,
    ) -> MapperResult<f64> {
        literal
            .value()
            .parse()
            .map_err(|_| lexical_error(literal, "f64", "expected a floating point number"))
    }
}

/// Identity mapping for raw [`Iri`] values.
#[derive(Debug, Clone, Copy)]
pub struct IriIdentityMapper;

impl IriTermMapper<Iri> for IriIdentityMapper {
    fn to_iri_term(
        &self,
        value: &Iri,
        _context: &mut SerializationContext<'_>,
    ) -> MapperResult<Iri> {
        Ok(value.clone())
    }

    fn from_iri_term(
        &self,
        term: &Iri,
        _context: &mut DeserializationContext<'_>,
    ) -> MapperResult<Iri> {
        Ok(term.clone())
    }
}

/// Graph-fragment sink for unmapped triples.
#[derive(Debug, Clone, Copy)]
pub struct GraphFragmentMapper;

impl UnmappedTriplesMapper<Graph> for GraphFragmentMapper {
    fn from_unmapped_triples(&self, triples: Vec<Triple>) -> Graph {
        Graph::from_triples(triples)
    }

    fn to_unmapped_triples(&self, value: &Graph) -> Vec<Triple> {
        value.triples().cloned().collect()
    }
}

/// An IRI mapper driven by a template such as
/// `http://example.org/users/{id}#me`.
///
/// The `{value}` placeholder is filled with the mapped value itself;
/// other placeholders are filled from values supplied through
/// [`TemplatedIriMapper::resolve_placeholder`] (parent providers, global
/// factories, or runtime providers). Deserialization reverses the
/// template, extracting the `{value}` segment.
#[derive(Debug, Clone)]
pub struct TemplatedIriMapper {
    template: String,
    placeholders: HashMap<String, String>,
}

impl TemplatedIriMapper {
    /// A mapper over the given template.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        TemplatedIriMapper {
            template: template.into(),
            placeholders: HashMap::new(),
        }
    }

    /// Supply a value for a named placeholder.
    #[must_use]
    pub fn resolve_placeholder(mut self, name: &str, value: impl Into<String>) -> Self {
        self.placeholders.insert(name.to_string(), value.into());
        self
    }

    /// The template with every named placeholder substituted; `{value}`
    /// is left in place.
    fn expanded_template(&self) -> MapperResult<String> {
        let mut expanded = self.template.clone();
        for (name, value) in &self.placeholders {
            expanded = expanded.replace(&format!("{{{name}}}"), value);
        }
        let mut scan = expanded.as_str();
        while let Some(start) = scan.find('{') {
            if !scan[start..].starts_with("{value}") {
                return Err(MapperError::Rdf(crate::error::RdfError::ConstraintViolation(
                    format!("unresolved placeholder in IRI template '{expanded}'"),
                )));
            }
            scan = &scan[start + "{value}".len()..];
        }
        Ok(expanded)
    }
}

impl IriTermMapper<String> for TemplatedIriMapper {
    fn to_iri_term(
        &self,
        value: &String,
        context: &mut SerializationContext<'_>,
    ) -> MapperResult<Iri> {
        let expanded = self.expanded_template()?;
        context.create_iri_term(&expanded.replace("{value}", value))
    }

    fn from_iri_term(
        &self,
        term: &Iri,
        _context: &mut DeserializationContext<'_>,
    ) -> MapperResult<String> {
        let expanded = self.expanded_template()?;
        let Some(marker) = expanded.find("{value}") else {
            // a fully static template maps every value to the same IRI
            return if term.as_str() == expanded {
                Ok(String::new())
            } else {
                Err(MapperError::InvalidLexicalForm {
                    value: term.as_str().to_string(),
                    type_name: "String",
                    message: format!("IRI does not match template '{expanded}'"),
                })
            };
        };
        let prefix = &expanded[..marker];
        let suffix = &expanded[marker + "{value}".len()..];
        term.as_str()
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(suffix))
            .map(str::to_string)
            .ok_or_else(|| MapperError::InvalidLexicalForm {
                value: term.as_str().to_string(),
                type_name: "String",
                message: format!("IRI does not match template '{expanded}'"),
            })
    }
}
