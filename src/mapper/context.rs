//! Serialization and deserialization contexts.
//!
//! Contexts are short-lived objects tied to one encode/decode call. They
//! carry the registry (and, for deserialization, the source graph plus
//! the consumption tracker) and provide the term-level conversion entry
//! points that mappers call into.

use crate::error::{MapperError, MapperResult};
use crate::graph::Graph;
use crate::term::{Iri, Literal, Subject, Term};
use crate::triple::Triple;

use super::builder::ResourceBuilder;
use super::reader::ResourceReader;
use super::registry::MapperRegistry;
use super::tracker::ConsumptionTracker;
use super::traits::{ItemMapper, MapperDirection};

fn ensure_serializable(direction: MapperDirection, type_name: &'static str) -> MapperResult<()> {
    if direction.supports_serialization() {
        Ok(())
    } else {
        Err(MapperError::UnsupportedDirection {
            type_name,
            direction: "serialization",
        })
    }
}

fn ensure_deserializable(direction: MapperDirection, type_name: &'static str) -> MapperResult<()> {
    if direction.supports_deserialization() {
        Ok(())
    } else {
        Err(MapperError::UnsupportedDirection {
            type_name,
            direction: "deserialization",
        })
    }
}

/// Context for one value → RDF conversion.
#[derive(Debug)]
pub struct SerializationContext<'a> {
    registry: &'a MapperRegistry,
}

impl<'a> SerializationContext<'a> {
    /// A context over a registry.
    #[must_use]
    pub fn new(registry: &'a MapperRegistry) -> Self {
        SerializationContext { registry }
    }

    /// The registry in scope for this call.
    #[must_use]
    pub fn registry(&self) -> &'a MapperRegistry {
        self.registry
    }

    /// Create a validated IRI term.
    ///
    /// # Errors
    ///
    /// Fails on syntactically invalid IRIs.
    pub fn create_iri_term(&self, iri: &str) -> MapperResult<Iri> {
        Iri::new(iri).map_err(MapperError::from)
    }

    /// Start building a resource rooted at `subject`.
    pub fn resource_builder(&mut self, subject: impl Into<Subject>) -> ResourceBuilder<'_, 'a> {
        ResourceBuilder::new(self, subject.into())
    }

    /// Serialize a value through the registry.
    ///
    /// Returns the object terms the value maps to plus any auxiliary
    /// triples (nested resources, collection structures).
    ///
    /// # Errors
    ///
    /// [`MapperError::SerializerNotFound`] when no mapper kind covers
    /// `T`; [`MapperError::UnsupportedDirection`] for deserialize-only
    /// mappers.
    pub fn serialize_value<T: 'static>(
        &mut self,
        value: &T,
    ) -> MapperResult<(Vec<Term>, Vec<Triple>)> {
        self.serialize_value_with(value, None)
    }

    /// [`SerializationContext::serialize_value`] with an optional
    /// per-call override mapper, which always wins over the registry.
    ///
    /// # Errors
    ///
    /// Same contract as [`SerializationContext::serialize_value`].
    pub fn serialize_value_with<T: 'static>(
        &mut self,
        value: &T,
        override_mapper: Option<&ItemMapper<'_, T>>,
    ) -> MapperResult<(Vec<Term>, Vec<Triple>)> {
        let type_name = self.registry.display_type_name::<T>();
        if let Some(mapper) = override_mapper {
            return match mapper {
                ItemMapper::Literal(mapper) => {
                    ensure_serializable(mapper.direction(), type_name)?;
                    let literal = mapper.to_literal_term(value, self)?;
                    Ok((vec![Term::Literal(literal)], Vec::new()))
                }
                ItemMapper::Iri(mapper) => {
                    ensure_serializable(mapper.direction(), type_name)?;
                    let iri = mapper.to_iri_term(value, self)?;
                    Ok((vec![Term::Iri(iri)], Vec::new()))
                }
                ItemMapper::Resource(mapper) => {
                    ensure_serializable(mapper.direction(), type_name)?;
                    let (subject, triples) = mapper.serialize(value, self)?;
                    Ok((vec![Term::from(subject)], triples))
                }
            };
        }

        if let Some(mapper) = self.registry.literal_mapper::<T>() {
            ensure_serializable(mapper.direction(), type_name)?;
            let literal = mapper.to_literal_term(value, self)?;
            return Ok((vec![Term::Literal(literal)], Vec::new()));
        }
        if let Some(mapper) = self.registry.iri_mapper::<T>() {
            ensure_serializable(mapper.direction(), type_name)?;
            let iri = mapper.to_iri_term(value, self)?;
            return Ok((vec![Term::Iri(iri)], Vec::new()));
        }
        if let Some(mapper) = self.registry.resource_mapper::<T>() {
            ensure_serializable(mapper.direction(), type_name)?;
            let (subject, triples) = mapper.serialize(value, self)?;
            return Ok((vec![Term::from(subject)], triples));
        }
        if let Some(mapper) = self.registry.multi_objects_mapper::<T>() {
            ensure_serializable(mapper.direction(), type_name)?;
            return mapper.to_objects(value, self);
        }
        Err(MapperError::SerializerNotFound { type_name })
    }

    /// Serialize a value that must map to a resource, returning its
    /// subject and triples.
    ///
    /// # Errors
    ///
    /// Same contract as [`SerializationContext::serialize_value`].
    pub fn serialize_resource<T: 'static>(
        &mut self,
        value: &T,
    ) -> MapperResult<(Subject, Vec<Triple>)> {
        let type_name = self.registry.display_type_name::<T>();
        let mapper = self
            .registry
            .resource_mapper::<T>()
            .ok_or(MapperError::SerializerNotFound { type_name })?;
        ensure_serializable(mapper.direction(), type_name)?;
        mapper.serialize(value, self)
    }
}

/// Context for one RDF → value conversion.
#[derive(Debug)]
pub struct DeserializationContext<'a> {
    registry: &'a MapperRegistry,
    graph: &'a Graph,
    tracker: ConsumptionTracker,
    bypass_datatype_check: bool,
}

impl<'a> DeserializationContext<'a> {
    /// A context over a registry and the graph being decoded.
    #[must_use]
    pub fn new(registry: &'a MapperRegistry, graph: &'a Graph) -> Self {
        DeserializationContext {
            registry,
            graph,
            tracker: ConsumptionTracker::new(),
            bypass_datatype_check: false,
        }
    }

    /// Suppress the literal datatype check for this call.
    #[must_use]
    pub fn with_bypass_datatype_check(mut self, bypass: bool) -> Self {
        self.bypass_datatype_check = bypass;
        self
    }

    /// The registry in scope for this call.
    #[must_use]
    pub fn registry(&self) -> &'a MapperRegistry {
        self.registry
    }

    /// The graph being decoded.
    #[must_use]
    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    /// The consumption tracker.
    #[must_use]
    pub fn tracker(&self) -> &ConsumptionTracker {
        &self.tracker
    }

    /// Mutable access to the consumption tracker.
    pub fn tracker_mut(&mut self) -> &mut ConsumptionTracker {
        &mut self.tracker
    }

    /// Start reading the resource rooted at `subject`.
    pub fn reader(&mut self, subject: impl Into<Subject>) -> ResourceReader<'_, 'a> {
        ResourceReader::new(self, subject.into())
    }

    /// The triples whose subject is `subject`, optionally marking them
    /// consumed.
    pub fn get_triples_for_subject(&mut self, subject: &Subject, track_read: bool) -> Vec<Triple> {
        let triples: Vec<Triple> = self
            .graph
            .triples_with_subject(subject)
            .into_iter()
            .cloned()
            .collect();
        if track_read {
            self.tracker.mark_all(triples.iter());
        }
        triples
    }

    /// Deserialize a literal through the registry's mapper for `T`.
    ///
    /// # Errors
    ///
    /// [`MapperError::DeserializerNotFound`] without a mapper;
    /// [`MapperError::DatatypeMismatch`] when the literal's datatype
    /// differs from the mapper's (unless bypassed).
    pub fn from_literal_term<T: 'static>(&mut self, literal: &Literal) -> MapperResult<T> {
        self.from_literal_term_with(literal, None)
    }

    /// [`DeserializationContext::from_literal_term`] with an optional
    /// override mapper.
    ///
    /// # Errors
    ///
    /// Same contract as [`DeserializationContext::from_literal_term`].
    pub fn from_literal_term_with<T: 'static>(
        &mut self,
        literal: &Literal,
        override_mapper: Option<&dyn super::traits::LiteralTermMapper<T>>,
    ) -> MapperResult<T> {
        let type_name = self.registry.display_type_name::<T>();
        let registry_mapper;
        let mapper: &dyn super::traits::LiteralTermMapper<T> = match override_mapper {
            Some(mapper) => mapper,
            None => {
                registry_mapper = self
                    .registry
                    .literal_mapper::<T>()
                    .ok_or(MapperError::DeserializerNotFound { type_name })?;
                registry_mapper.as_ref()
            }
        };
        ensure_deserializable(mapper.direction(), type_name)?;
        let expected = mapper.datatype();
        if !self.bypass_datatype_check && *literal.datatype() != expected {
            return Err(MapperError::DatatypeMismatch {
                value: literal.value().to_string(),
                actual: literal.datatype().clone(),
                expected,
            });
        }
        mapper.from_literal_term(literal, self)
    }

    /// Deserialize an IRI term through the registry's mapper for `T`.
    ///
    /// # Errors
    ///
    /// [`MapperError::DeserializerNotFound`] without a mapper.
    pub fn from_iri_term<T: 'static>(&mut self, iri: &Iri) -> MapperResult<T> {
        let type_name = self.registry.display_type_name::<T>();
        let mapper = self
            .registry
            .iri_mapper::<T>()
            .ok_or(MapperError::DeserializerNotFound { type_name })?;
        ensure_deserializable(mapper.direction(), type_name)?;
        mapper.from_iri_term(iri, self)
    }

    /// Deserialize the resource rooted at `subject` as a `T`.
    ///
    /// # Errors
    ///
    /// [`MapperError::DeserializerNotFound`] without a resource mapper.
    pub fn deserialize_resource<T: 'static>(&mut self, subject: &Subject) -> MapperResult<T> {
        let type_name = self.registry.display_type_name::<T>();
        let mapper = self
            .registry
            .resource_mapper::<T>()
            .ok_or(MapperError::DeserializerNotFound { type_name })?;
        ensure_deserializable(mapper.direction(), type_name)?;
        mapper.deserialize(subject, self)
    }

    /// Deserialize any term as a `T`, dispatching on the term kind and
    /// the registered mapper kinds.
    ///
    /// # Errors
    ///
    /// Same contract as the kind-specific calls above.
    pub fn deserialize_term<T: 'static>(&mut self, term: &Term) -> MapperResult<T> {
        self.deserialize_term_with(term, None)
    }

    /// [`DeserializationContext::deserialize_term`] with an optional
    /// per-call override mapper.
    ///
    /// # Errors
    ///
    /// Same contract as [`DeserializationContext::deserialize_term`].
    pub fn deserialize_term_with<T: 'static>(
        &mut self,
        term: &Term,
        override_mapper: Option<&ItemMapper<'_, T>>,
    ) -> MapperResult<T> {
        let type_name = self.registry.display_type_name::<T>();
        if let Some(mapper) = override_mapper {
            return match (mapper, term) {
                (ItemMapper::Literal(mapper), Term::Literal(literal)) => {
                    self.from_literal_term_with(literal, Some(*mapper))
                }
                (ItemMapper::Iri(mapper), Term::Iri(iri)) => {
                    ensure_deserializable(mapper.direction(), type_name)?;
                    mapper.from_iri_term(iri, self)
                }
                (ItemMapper::Resource(mapper), term) => {
                    let subject = term.as_subject().ok_or_else(|| {
                        MapperError::Rdf(crate::error::RdfError::ConstraintViolation(format!(
                            "cannot read resource {type_name} from literal {term}"
                        )))
                    })?;
                    ensure_deserializable(mapper.direction(), type_name)?;
                    mapper.deserialize(&subject, self)
                }
                (mapper, term) => Err(MapperError::Rdf(
                    crate::error::RdfError::ConstraintViolation(format!(
                        "override {mapper:?} cannot read term {term}"
                    )),
                )),
            };
        }

        match term {
            Term::Literal(literal) => self.from_literal_term(literal),
            Term::Iri(iri) => {
                if self.registry.has_iri_mapper_for::<T>() {
                    self.from_iri_term(iri)
                } else if self.registry.has_resource_mapper_for::<T>() {
                    self.deserialize_resource(&Subject::Iri(iri.clone()))
                } else if self.registry.has_literal_mapper_for::<T>() {
                    // the mapper exists but this term cannot feed it
                    Err(MapperError::Rdf(crate::error::RdfError::ConstraintViolation(
                        format!("expected a literal for {type_name}, found IRI {iri}"),
                    )))
                } else {
                    Err(MapperError::DeserializerNotFound { type_name })
                }
            }
            Term::BlankNode(node) => {
                if self.registry.has_resource_mapper_for::<T>() {
                    self.deserialize_resource(&Subject::BlankNode(node.clone()))
                } else {
                    Err(MapperError::DeserializerNotFound { type_name })
                }
            }
        }
    }

    /// Rebuild a value from the object terms found under one predicate,
    /// through the registered multi-objects mapper for `T`.
    ///
    /// # Errors
    ///
    /// [`MapperError::DeserializerNotFound`] without a multi-objects
    /// mapper.
    pub fn from_objects<T: 'static>(&mut self, objects: &[Term]) -> MapperResult<T> {
        let type_name = self.registry.display_type_name::<T>();
        let mapper = self
            .registry
            .multi_objects_mapper::<T>()
            .ok_or(MapperError::DeserializerNotFound { type_name })?;
        ensure_deserializable(mapper.direction(), type_name)?;
        mapper.from_objects(objects, self)
    }

    /// Collect unconsumed triples into an unmapped-triples sink value.
    ///
    /// With a `scope` subject, collects the subject's own unconsumed
    /// triples plus those of blank nodes reachable from it; without one,
    /// collects every unconsumed triple of the graph. Collected triples
    /// are marked consumed.
    ///
    /// # Errors
    ///
    /// [`MapperError::DeserializerNotFound`] when no
    /// [`super::traits::UnmappedTriplesMapper`] is registered for `G`.
    pub fn get_unmapped<G: 'static>(&mut self, scope: Option<&Subject>) -> MapperResult<G> {
        let type_name = self.registry.display_type_name::<G>();
        let mapper = self
            .registry
            .unmapped_triples_mapper::<G>()
            .ok_or(MapperError::DeserializerNotFound { type_name })?;

        let mut collected: Vec<Triple> = Vec::new();
        match scope {
            Some(subject) => {
                let mut pending = vec![subject.clone()];
                let mut visited = std::collections::HashSet::new();
                while let Some(current) = pending.pop() {
                    if !visited.insert(current.clone()) {
                        continue;
                    }
                    for triple in self.graph.triples_with_subject(&current) {
                        if self.tracker.is_consumed(triple) {
                            continue;
                        }
                        collected.push(triple.clone());
                        if let Term::BlankNode(node) = &triple.object {
                            pending.push(Subject::BlankNode(node.clone()));
                        }
                    }
                }
            }
            None => {
                collected.extend(
                    self.graph
                        .triples()
                        .filter(|triple| !self.tracker.is_consumed(triple))
                        .cloned(),
                );
            }
        }
        self.tracker.mark_all(collected.iter());
        Ok(mapper.from_unmapped_triples(collected))
    }
}
