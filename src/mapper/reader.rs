//! Fluent reading of a resource's properties.
//!
//! A [`ResourceReader`] reads the properties of one subject, marking
//! every triple it touches as consumed so completeness accounting can
//! judge what was left over.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{MapperError, MapperResult};
use crate::graph::Graph;
use crate::term::{Iri, Subject, Term};
use crate::triple::Triple;
use crate::vocab::rdf;

use super::collections::{self, CollectionStrategy};
use super::context::DeserializationContext;
use super::traits::ItemMapper;

/// Reads the properties of one resource.
#[derive(Debug)]
pub struct ResourceReader<'c, 'r> {
    context: &'c mut DeserializationContext<'r>,
    subject: Subject,
}

impl<'c, 'r> ResourceReader<'c, 'r> {
    pub(crate) fn new(context: &'c mut DeserializationContext<'r>, subject: Subject) -> Self {
        ResourceReader { context, subject }
    }

    /// The subject being read.
    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// The deserialization context, for mapper delegation.
    pub fn context(&mut self) -> &mut DeserializationContext<'r> {
        self.context
    }

    /// Consume and verify the `rdf:type` triple for this resource.
    ///
    /// # Errors
    ///
    /// [`MapperError::MissingRequiredProperty`] when no matching type
    /// triple exists.
    pub fn require_type(&mut self, type_iri: &Iri) -> MapperResult<()> {
        let triple = Triple::new(self.subject.clone(), rdf::TYPE, type_iri.clone());
        if self.context.graph().has_triple(&triple) {
            self.context.tracker_mut().mark(&triple);
            Ok(())
        } else {
            Err(MapperError::MissingRequiredProperty {
                subject: self.subject.clone(),
                predicate: rdf::TYPE,
            })
        }
    }

    /// Consume the `rdf:type` triple when present.
    pub fn optional_type(&mut self, type_iri: &Iri) {
        let triple = Triple::new(self.subject.clone(), rdf::TYPE, type_iri.clone());
        if self.context.graph().has_triple(&triple) {
            self.context.tracker_mut().mark(&triple);
        }
    }

    /// Exactly one value for the predicate.
    ///
    /// # Errors
    ///
    /// [`MapperError::MissingRequiredProperty`] on zero values,
    /// [`MapperError::TooManyValues`] on several.
    pub fn require<T: 'static>(&mut self, predicate: &Iri) -> MapperResult<T> {
        self.require_with(predicate, None)
    }

    /// [`ResourceReader::require`] with a per-call override mapper.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceReader::require`].
    pub fn require_with<T: 'static>(
        &mut self,
        predicate: &Iri,
        mapper: Option<&ItemMapper<'_, T>>,
    ) -> MapperResult<T> {
        let objects = self.consume_objects(predicate);
        match objects.len() {
            0 => Err(MapperError::MissingRequiredProperty {
                subject: self.subject.clone(),
                predicate: predicate.clone(),
            }),
            1 => self
                .context
                .deserialize_term_with(&objects[0], mapper),
            count => Err(MapperError::TooManyValues {
                subject: self.subject.clone(),
                predicate: predicate.clone(),
                count,
            }),
        }
    }

    /// Zero or one value for the predicate.
    ///
    /// # Errors
    ///
    /// [`MapperError::TooManyValues`] on several values.
    pub fn optional<T: 'static>(&mut self, predicate: &Iri) -> MapperResult<Option<T>> {
        self.optional_with(predicate, None)
    }

    /// [`ResourceReader::optional`] with a per-call override mapper.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceReader::optional`].
    pub fn optional_with<T: 'static>(
        &mut self,
        predicate: &Iri,
        mapper: Option<&ItemMapper<'_, T>>,
    ) -> MapperResult<Option<T>> {
        let objects = self.consume_objects(predicate);
        match objects.len() {
            0 => Ok(None),
            1 => self
                .context
                .deserialize_term_with(&objects[0], mapper)
                .map(Some),
            count => Err(MapperError::TooManyValues {
                subject: self.subject.clone(),
                predicate: predicate.clone(),
                count,
            }),
        }
    }

    /// All values for the predicate, in graph order.
    ///
    /// # Errors
    ///
    /// Fails when an element cannot be deserialized.
    pub fn get_values<T: 'static>(&mut self, predicate: &Iri) -> MapperResult<Vec<T>> {
        self.get_values_with(predicate, None)
    }

    /// [`ResourceReader::get_values`] with a per-call override mapper.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceReader::get_values`].
    pub fn get_values_with<T: 'static>(
        &mut self,
        predicate: &Iri,
        mapper: Option<&ItemMapper<'_, T>>,
    ) -> MapperResult<Vec<T>> {
        let objects = self.consume_objects(predicate);
        objects
            .iter()
            .map(|object| self.context.deserialize_term_with(object, mapper))
            .collect()
    }

    /// Key/value entries stored as anonymous entry resources.
    ///
    /// # Errors
    ///
    /// Fails when an entry lacks the key or value property or when
    /// either cannot be deserialized.
    pub fn get_map<K, V>(
        &mut self,
        predicate: &Iri,
        key_predicate: &Iri,
        value_predicate: &Iri,
    ) -> MapperResult<HashMap<K, V>>
    where
        K: 'static + Eq + Hash,
        V: 'static,
    {
        let entries = self.consume_objects(predicate);
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            let Some(entry_subject) = entry.as_subject() else {
                return Err(MapperError::Rdf(crate::error::RdfError::ConstraintViolation(
                    format!("map entry must be a resource, found {entry}"),
                )));
            };
            let mut entry_reader = ResourceReader::new(self.context, entry_subject);
            let key: K = entry_reader.require(key_predicate)?;
            let value: V = entry_reader.require(value_predicate)?;
            map.insert(key, value);
        }
        Ok(map)
    }

    /// Exactly one `rdf:first`/`rdf:rest` list under the predicate.
    ///
    /// # Errors
    ///
    /// [`MapperError::InvalidRdfListStructure`] for malformed chains,
    /// [`MapperError::CircularRdfList`] for cyclic ones.
    pub fn require_rdf_list<T: 'static>(&mut self, predicate: &Iri) -> MapperResult<Vec<T>> {
        self.require_rdf_list_with(predicate, None)
    }

    /// [`ResourceReader::require_rdf_list`] with a per-item override
    /// mapper.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceReader::require_rdf_list`].
    pub fn require_rdf_list_with<T: 'static>(
        &mut self,
        predicate: &Iri,
        mapper: Option<&ItemMapper<'_, T>>,
    ) -> MapperResult<Vec<T>> {
        let head = self.require_single_object(predicate)?;
        let items = collections::read_rdf_list_terms(&head, self.context)?;
        items
            .iter()
            .map(|item| self.context.deserialize_term_with(item, mapper))
            .collect()
    }

    /// Zero or one `rdf:first`/`rdf:rest` list under the predicate.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceReader::require_rdf_list`].
    pub fn optional_rdf_list<T: 'static>(&mut self, predicate: &Iri) -> MapperResult<Option<Vec<T>>> {
        let objects = self.consume_objects(predicate);
        match objects.len() {
            0 => Ok(None),
            1 => {
                let items = collections::read_rdf_list_terms(&objects[0], self.context)?;
                items
                    .iter()
                    .map(|item| self.context.deserialize_term(item))
                    .collect::<MapperResult<Vec<T>>>()
                    .map(Some)
            }
            count => Err(MapperError::TooManyValues {
                subject: self.subject.clone(),
                predicate: predicate.clone(),
                count,
            }),
        }
    }

    /// Exactly one numbered `rdf:Seq` container under the predicate.
    ///
    /// # Errors
    ///
    /// Fails on missing or malformed containers.
    pub fn require_rdf_seq<T: 'static>(&mut self, predicate: &Iri) -> MapperResult<Vec<T>> {
        self.require_container(predicate, &rdf::SEQ)
    }

    /// Exactly one numbered `rdf:Bag` container under the predicate.
    ///
    /// # Errors
    ///
    /// Fails on missing or malformed containers.
    pub fn require_rdf_bag<T: 'static>(&mut self, predicate: &Iri) -> MapperResult<Vec<T>> {
        self.require_container(predicate, &rdf::BAG)
    }

    /// Exactly one numbered `rdf:Alt` container under the predicate.
    ///
    /// # Errors
    ///
    /// Fails on missing or malformed containers.
    pub fn require_rdf_alt<T: 'static>(&mut self, predicate: &Iri) -> MapperResult<Vec<T>> {
        self.require_container(predicate, &rdf::ALT)
    }

    fn require_container<T: 'static>(
        &mut self,
        predicate: &Iri,
        container_type: &Iri,
    ) -> MapperResult<Vec<T>> {
        let node = self.require_single_object(predicate)?;
        let items = collections::read_rdf_container_terms(&node, container_type, self.context)?;
        items
            .iter()
            .map(|item| self.context.deserialize_term(item))
            .collect()
    }

    /// Read a collection under an explicitly chosen strategy into any
    /// `FromIterator` target.
    ///
    /// # Errors
    ///
    /// Fails per the chosen strategy's structure rules.
    pub fn require_collection<C, T>(
        &mut self,
        predicate: &Iri,
        strategy: CollectionStrategy,
    ) -> MapperResult<C>
    where
        C: FromIterator<T>,
        T: 'static,
    {
        let items: Vec<T> = match strategy {
            CollectionStrategy::MultiObjects => self.get_values(predicate)?,
            CollectionStrategy::RdfList => self.require_rdf_list(predicate)?,
            CollectionStrategy::RdfSeq => self.require_rdf_seq(predicate)?,
            CollectionStrategy::RdfBag => self.require_rdf_bag(predicate)?,
            CollectionStrategy::RdfAlt => self.require_rdf_alt(predicate)?,
        };
        Ok(items.into_iter().collect())
    }

    /// All objects under the predicate, rebuilt through the registered
    /// multi-objects mapper for `T`.
    ///
    /// # Errors
    ///
    /// Same contract as [`DeserializationContext::from_objects`].
    pub fn require_multi_objects<T: 'static>(&mut self, predicate: &Iri) -> MapperResult<T> {
        let objects = self.consume_objects(predicate);
        self.context.from_objects(&objects)
    }

    /// Collect this resource's unconsumed triples (or, with `global`,
    /// every unconsumed triple of the graph) into a sink value.
    ///
    /// # Errors
    ///
    /// Same contract as [`DeserializationContext::get_unmapped`].
    pub fn get_unmapped<G: 'static>(&mut self, global: bool) -> MapperResult<G> {
        if global {
            self.context.get_unmapped(None)
        } else {
            let subject = self.subject.clone();
            self.context.get_unmapped(Some(&subject))
        }
    }

    /// Convenience for the common graph-valued sink.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceReader::get_unmapped`].
    pub fn get_unmapped_graph(&mut self, global: bool) -> MapperResult<Graph> {
        self.get_unmapped::<Graph>(global)
    }

    // ---- internals ---------------------------------------------------------

    /// The objects under `predicate`, their triples marked consumed.
    fn consume_objects(&mut self, predicate: &Iri) -> Vec<Term> {
        let triples: Vec<Triple> = self
            .context
            .graph()
            .triples_with_subject(&self.subject)
            .into_iter()
            .filter(|triple| &triple.predicate == predicate)
            .cloned()
            .collect();
        self.context.tracker_mut().mark_all(triples.iter());
        triples.into_iter().map(|triple| triple.object).collect()
    }

    fn require_single_object(&mut self, predicate: &Iri) -> MapperResult<Term> {
        let objects = self.consume_objects(predicate);
        match objects.len() {
            0 => Err(MapperError::MissingRequiredProperty {
                subject: self.subject.clone(),
                predicate: predicate.clone(),
            }),
            1 => Ok(objects.into_iter().next().expect("one object")),
            count => Err(MapperError::TooManyValues {
                subject: self.subject.clone(),
                predicate: predicate.clone(),
                count,
            }),
        }
    }
}
