//! Error types for RDF graph and mapping operations.
//!
//! This module provides the [`RdfError`] type for codec and graph operations,
//! the [`MapperError`] type for object-mapping operations, and the matching
//! [`Result`] / [`MapperResult`] convenience aliases.

use thiserror::Error;

use crate::term::{Iri, Subject};

/// Error type for RDF model, codec, and registry operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RdfError {
    /// Malformed input encountered while decoding a serialized document.
    ///
    /// Carries the position (1-based line and column) where the problem was
    /// detected.
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        /// Human-readable description of the problem.
        message: String,
        /// 1-based line of the offending input.
        line: usize,
        /// 1-based column of the offending input.
        column: usize,
    },

    /// Structurally valid input that violates an RDF constraint, such as a
    /// language tag on a non-`rdf:langString` literal or a blank node used
    /// in predicate position.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// No decoder is registered for the requested content type.
    #[error("No decoder registered for content type '{0}'")]
    DecoderNotFound(String),

    /// No encoder is registered for the requested content type.
    #[error("No encoder registered for content type '{0}'")]
    EncoderNotFound(String),

    /// A relative IRI was supplied where an absolute IRI was required and no
    /// base IRI was available to resolve it against.
    #[error("Cannot resolve relative IRI '{0}': no base IRI available")]
    MissingBase(String),
}

impl RdfError {
    /// Create a syntax error at the given position.
    #[must_use]
    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        RdfError::Syntax {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Convenience type alias for [`std::result::Result`] with [`RdfError`].
pub type Result<T> = std::result::Result<T, RdfError>;

/// Error type for object-mapping operations.
///
/// Mapping errors are raised while converting between application values and
/// RDF graphs. Codec errors encountered on the way are wrapped as
/// [`MapperError::Rdf`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapperError {
    /// No serializer is registered for the requested value type.
    #[error("No serializer registered for type '{type_name}'")]
    SerializerNotFound {
        /// Name of the value type that could not be serialized.
        type_name: &'static str,
    },

    /// No deserializer is registered for the requested value type.
    #[error("No deserializer registered for type '{type_name}'")]
    DeserializerNotFound {
        /// Name of the value type that could not be deserialized.
        type_name: &'static str,
    },

    /// A mapper was used in a direction it does not support.
    #[error("Mapper for type '{type_name}' does not support {direction}")]
    UnsupportedDirection {
        /// Name of the value type whose mapper was looked up.
        type_name: &'static str,
        /// The rejected direction, `"serialization"` or `"deserialization"`.
        direction: &'static str,
    },

    /// A literal carried a different datatype than the mapper expects.
    ///
    /// The message suggests the three supported remediations: register a
    /// custom wrapper type, map the property with an explicit datatype, or
    /// bypass the check for the call.
    #[error(
        "Datatype mismatch deserializing '{value}': found {actual}, expected {expected}. \
         Either register a custom wrapper type for {actual}, declare the property with \
         an explicit literal mapping for that datatype, or set bypass_datatype_check"
    )]
    DatatypeMismatch {
        /// Lexical value of the offending literal.
        value: String,
        /// Datatype found on the literal.
        actual: Iri,
        /// Datatype the mapper expected.
        expected: Iri,
    },

    /// A literal's lexical form could not be converted to the target type.
    #[error("Cannot convert literal '{value}' to {type_name}: {message}")]
    InvalidLexicalForm {
        /// Lexical value of the offending literal.
        value: String,
        /// Name of the target value type.
        type_name: &'static str,
        /// Description of the conversion failure.
        message: String,
    },

    /// Triples remained unconsumed after a strict-mode decode.
    #[error(
        "Incomplete deserialization: {remaining_triple_count} triples were not consumed \
         ({} unmapped subjects, {} unmapped types). Switch to lenient completeness or \
         add an unmapped-triples sink to preserve them",
        unmapped_subjects.len(),
        unmapped_types.len()
    )]
    IncompleteDeserialization {
        /// Number of triples left over after deserialization.
        remaining_triple_count: usize,
        /// Subjects owning at least one leftover triple.
        unmapped_subjects: Vec<Subject>,
        /// `rdf:type` IRIs appearing among the leftover triples.
        unmapped_types: Vec<Iri>,
    },

    /// A required property had no value on the resource being read.
    #[error("Missing required property {predicate} on subject {subject}")]
    MissingRequiredProperty {
        /// Subject that was being read.
        subject: Subject,
        /// Predicate that had no value.
        predicate: Iri,
    },

    /// A single-valued property had more than one value.
    #[error("Expected at most one value for {predicate} on subject {subject}, found {count}")]
    TooManyValues {
        /// Subject that was being read.
        subject: Subject,
        /// Predicate carrying the surplus values.
        predicate: Iri,
        /// Number of values found.
        count: usize,
    },

    /// An `rdf:List` structure referenced one of its own nodes.
    #[error("Circular rdf:List detected at {head}")]
    CircularRdfList {
        /// Head node of the cyclic list.
        head: Subject,
    },

    /// An `rdf:List` structure was malformed.
    #[error(
        "Malformed rdf:List at {head}: {message}. Every node must carry exactly one \
         rdf:first and one rdf:rest, and the chain must terminate at rdf:nil"
    )]
    InvalidRdfListStructure {
        /// Head node of the malformed list.
        head: Subject,
        /// Description of the structural problem.
        message: String,
    },

    /// No root subject could be determined when decoding a graph to a value.
    #[error("No root subject found for type '{type_name}'")]
    NoRootSubject {
        /// Name of the value type being decoded.
        type_name: &'static str,
    },

    /// Several equally plausible root subjects remained after tie-breaking.
    #[error("Ambiguous root subject for type '{type_name}': {candidate_count} candidates")]
    AmbiguousRootSubject {
        /// Name of the value type being decoded.
        type_name: &'static str,
        /// Number of candidates that survived tie-breaking.
        candidate_count: usize,
    },

    /// An underlying codec or model operation failed.
    #[error(transparent)]
    Rdf(#[from] RdfError),
}

/// Convenience type alias for [`std::result::Result`] with [`MapperError`].
pub type MapperResult<T> = std::result::Result<T, MapperError>;
