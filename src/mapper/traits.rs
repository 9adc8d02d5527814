//! Mapper kind contracts.
//!
//! Each mapper kind is a trait generic over the value type it handles.
//! The registry erases them behind per-kind tables; the kind tag plus a
//! `TypeId` cast recovers the typed mapper at lookup.
//!
//! Every mapper declares a [`MapperDirection`]; the registry rejects use
//! in an unsupported direction before any conversion starts.

use crate::error::MapperResult;
use crate::term::{Iri, Literal, Subject, Term};
use crate::triple::Triple;

use super::context::{DeserializationContext, SerializationContext};

/// Which directions a mapper supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MapperDirection {
    /// Value → RDF only.
    SerializeOnly,
    /// RDF → value only.
    DeserializeOnly,
    /// Both directions.
    #[default]
    Both,
}

impl MapperDirection {
    /// Whether serialization is supported.
    #[must_use]
    pub fn supports_serialization(self) -> bool {
        !matches!(self, MapperDirection::DeserializeOnly)
    }

    /// Whether deserialization is supported.
    #[must_use]
    pub fn supports_deserialization(self) -> bool {
        !matches!(self, MapperDirection::SerializeOnly)
    }
}

/// What kind of subject a resource mapper produces and accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubjectPolicy {
    /// Resources rooted at IRI subjects.
    Global,
    /// Resources rooted at blank nodes.
    Local,
    /// Either subject kind; used by collection and graph-as-value
    /// mappers.
    #[default]
    Unified,
}

/// Bidirectional mapping between a value type and an IRI term.
pub trait IriTermMapper<T>: Send + Sync {
    /// Supported directions; both by default.
    fn direction(&self) -> MapperDirection {
        MapperDirection::default()
    }

    /// Convert a value to an IRI term.
    ///
    /// # Errors
    ///
    /// Implementations fail when the value has no IRI form.
    fn to_iri_term(&self, value: &T, context: &mut SerializationContext<'_>)
        -> MapperResult<Iri>;

    /// Convert an IRI term back to a value.
    ///
    /// # Errors
    ///
    /// Implementations fail when the IRI does not match the expected
    /// shape.
    fn from_iri_term(
        &self,
        term: &Iri,
        context: &mut DeserializationContext<'_>,
    ) -> MapperResult<T>;
}

/// Bidirectional mapping between a value type and a literal term.
pub trait LiteralTermMapper<T>: Send + Sync {
    /// The datatype this mapper expects on literals it deserializes.
    fn datatype(&self) -> Iri;

    /// Supported directions; both by default.
    fn direction(&self) -> MapperDirection {
        MapperDirection::default()
    }

    /// Convert a value to a literal term.
    ///
    /// # Errors
    ///
    /// Implementations fail when the value has no lexical form.
    fn to_literal_term(
        &self,
        value: &T,
        context: &mut SerializationContext<'_>,
    ) -> MapperResult<Literal>;

    /// Convert a literal term back to a value.
    ///
    /// The datatype has already been checked against
    /// [`LiteralTermMapper::datatype`] by the calling context (unless the
    /// caller bypassed the check).
    ///
    /// # Errors
    ///
    /// Implementations fail on unparseable lexical forms.
    fn from_literal_term(
        &self,
        literal: &Literal,
        context: &mut DeserializationContext<'_>,
    ) -> MapperResult<T>;
}

/// Bidirectional mapping between a value type and a set of triples rooted
/// at a subject.
pub trait ResourceMapper<T>: Send + Sync {
    /// The `rdf:type` IRI of resources this mapper handles, if declared.
    ///
    /// Root-subject selection and `decode_objects` use this to find
    /// matching subjects.
    fn type_iri(&self) -> Option<Iri> {
        None
    }

    /// The subject kind this mapper works with.
    fn subject_policy(&self) -> SubjectPolicy {
        SubjectPolicy::default()
    }

    /// Supported directions; both by default.
    fn direction(&self) -> MapperDirection {
        MapperDirection::default()
    }

    /// Serialize a value into `(subject, triples)`.
    ///
    /// A [`SubjectPolicy::Global`] mapper must return an IRI subject; a
    /// [`SubjectPolicy::Local`] mapper a blank node.
    ///
    /// # Errors
    ///
    /// Implementations fail when a field of the value cannot be
    /// serialized.
    fn serialize(
        &self,
        value: &T,
        context: &mut SerializationContext<'_>,
    ) -> MapperResult<(Subject, Vec<Triple>)>;

    /// Deserialize the resource rooted at `subject`.
    ///
    /// # Errors
    ///
    /// Implementations fail on missing required properties, datatype
    /// mismatches, or malformed structures.
    fn deserialize(
        &self,
        subject: &Subject,
        context: &mut DeserializationContext<'_>,
    ) -> MapperResult<T>;
}

/// Mapping between a value and multiple objects sharing one predicate:
/// the unordered collection strategy.
pub trait MultiObjectsMapper<T>: Send + Sync {
    /// Supported directions; both by default.
    fn direction(&self) -> MapperDirection {
        MapperDirection::default()
    }

    /// Serialize a value into object terms plus any auxiliary triples.
    ///
    /// # Errors
    ///
    /// Implementations fail when an element cannot be serialized.
    fn to_objects(
        &self,
        value: &T,
        context: &mut SerializationContext<'_>,
    ) -> MapperResult<(Vec<Term>, Vec<Triple>)>;

    /// Rebuild a value from the objects found under one predicate.
    ///
    /// # Errors
    ///
    /// Implementations fail when an element cannot be deserialized.
    fn from_objects(
        &self,
        objects: &[Term],
        context: &mut DeserializationContext<'_>,
    ) -> MapperResult<T>;
}

/// Conversion between leftover triples and an in-memory graph fragment
/// value, used by unmapped-triples sinks.
pub trait UnmappedTriplesMapper<T>: Send + Sync {
    /// Build the sink value from preserved triples.
    fn from_unmapped_triples(&self, triples: Vec<Triple>) -> T;

    /// Recover the preserved triples from the sink value.
    fn to_unmapped_triples(&self, value: &T) -> Vec<Triple>;
}

/// A per-call mapper override, passed by instance.
///
/// Wherever the reader or builder would resolve a mapper from the
/// registry, an `ItemMapper` supplied at the call site wins. This is how
/// field-level IRI/literal mappings on generated mappers plug in without
/// global registration.
pub enum ItemMapper<'m, T> {
    /// Map items through a literal term mapper.
    Literal(&'m dyn LiteralTermMapper<T>),
    /// Map items through an IRI term mapper.
    Iri(&'m dyn IriTermMapper<T>),
    /// Map items through a resource mapper.
    Resource(&'m dyn ResourceMapper<T>),
}

impl<T> std::fmt::Debug for ItemMapper<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemMapper::Literal(_) => f.write_str("ItemMapper::Literal"),
            ItemMapper::Iri(_) => f.write_str("ItemMapper::Iri"),
            ItemMapper::Resource(_) => f.write_str("ItemMapper::Resource"),
        }
    }
}
