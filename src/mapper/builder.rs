//! Fluent construction of a resource's triples.
//!
//! A [`ResourceBuilder`] accumulates triples for one subject. Methods
//! take and return `self`, so a mapper's `serialize` body reads as one
//! chain with `?` between the fallible steps:
//!
//! ```ignore
//! let (subject, triples) = context
//!     .resource_builder(subject)
//!     .add_value(&FOAF_NAME, &self.name)?
//!     .add_value_if_some(&FOAF_AGE, self.age.as_ref())?
//!     .add_rdf_list(&EX_CHAPTERS, &self.chapters)?
//!     .build();
//! ```

use std::collections::HashMap;

use crate::error::MapperResult;
use crate::graph::Graph;
use crate::term::{Iri, Subject, Term};
use crate::triple::Triple;
use crate::vocab::rdf;

use super::collections::{self, CollectionStrategy};
use super::context::SerializationContext;
use super::traits::ItemMapper;

/// Accumulates the triples of one resource.
#[derive(Debug)]
pub struct ResourceBuilder<'c, 'r> {
    context: &'c mut SerializationContext<'r>,
    subject: Subject,
    triples: Vec<Triple>,
}

impl<'c, 'r> ResourceBuilder<'c, 'r> {
    pub(crate) fn new(context: &'c mut SerializationContext<'r>, subject: Subject) -> Self {
        ResourceBuilder {
            context,
            subject,
            triples: Vec::new(),
        }
    }

    /// The subject under construction.
    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Add an `rdf:type` triple.
    #[must_use]
    pub fn add_type(mut self, type_iri: Iri) -> Self {
        self.triples
            .push(Triple::new(self.subject.clone(), rdf::TYPE, type_iri));
        self
    }

    /// Add one value under a predicate, serialized through the registry.
    ///
    /// # Errors
    ///
    /// Fails when no serializer covers the value type.
    pub fn add_value<T: 'static>(self, predicate: &Iri, value: &T) -> MapperResult<Self> {
        self.add_value_inner(predicate, value, None)
    }

    /// [`ResourceBuilder::add_value`] with a per-call override mapper.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceBuilder::add_value`].
    pub fn add_value_with<T: 'static>(
        self,
        predicate: &Iri,
        value: &T,
        mapper: &ItemMapper<'_, T>,
    ) -> MapperResult<Self> {
        self.add_value_inner(predicate, value, Some(mapper))
    }

    fn add_value_inner<T: 'static>(
        mut self,
        predicate: &Iri,
        value: &T,
        mapper: Option<&ItemMapper<'_, T>>,
    ) -> MapperResult<Self> {
        let (objects, mut aux) = self.context.serialize_value_with(value, mapper)?;
        for object in objects {
            self.triples
                .push(Triple::new(self.subject.clone(), predicate.clone(), object));
        }
        self.triples.append(&mut aux);
        Ok(self)
    }

    /// Add a value only when present.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceBuilder::add_value`].
    pub fn add_value_if_some<T: 'static>(
        self,
        predicate: &Iri,
        value: Option<&T>,
    ) -> MapperResult<Self> {
        match value {
            Some(value) => self.add_value(predicate, value),
            None => Ok(self),
        }
    }

    /// Add every value of a slice under the same predicate (the
    /// unordered multi-objects strategy).
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceBuilder::add_value`].
    pub fn add_values<T: 'static>(self, predicate: &Iri, values: &[T]) -> MapperResult<Self> {
        let mut builder = self;
        for value in values {
            builder = builder.add_value(predicate, value)?;
        }
        Ok(builder)
    }

    /// Copy the objects another graph holds under `(source_subject,
    /// predicate)` onto this resource.
    #[must_use]
    pub fn add_values_from_source(
        mut self,
        predicate: &Iri,
        source: &Graph,
        source_subject: &Subject,
    ) -> Self {
        for object in source.objects_for(source_subject, predicate) {
            self.triples.push(Triple::new(
                self.subject.clone(),
                predicate.clone(),
                object.clone(),
            ));
        }
        self
    }

    /// Add an ordered `rdf:first`/`rdf:rest` list of values.
    ///
    /// An empty slice produces `predicate rdf:nil`.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceBuilder::add_value`].
    pub fn add_rdf_list<T: 'static>(self, predicate: &Iri, values: &[T]) -> MapperResult<Self> {
        self.add_collection(predicate, values, CollectionStrategy::RdfList)
    }

    /// [`ResourceBuilder::add_rdf_list`] with a per-item override mapper.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceBuilder::add_value`].
    pub fn add_rdf_list_with<T: 'static>(
        self,
        predicate: &Iri,
        values: &[T],
        mapper: &ItemMapper<'_, T>,
    ) -> MapperResult<Self> {
        self.add_collection_inner(predicate, values, CollectionStrategy::RdfList, Some(mapper))
    }

    /// Add a numbered `rdf:Seq` container of values.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceBuilder::add_value`].
    pub fn add_rdf_seq<T: 'static>(self, predicate: &Iri, values: &[T]) -> MapperResult<Self> {
        self.add_collection(predicate, values, CollectionStrategy::RdfSeq)
    }

    /// Add a numbered `rdf:Bag` container of values.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceBuilder::add_value`].
    pub fn add_rdf_bag<T: 'static>(self, predicate: &Iri, values: &[T]) -> MapperResult<Self> {
        self.add_collection(predicate, values, CollectionStrategy::RdfBag)
    }

    /// Add a numbered `rdf:Alt` container of values.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceBuilder::add_value`].
    pub fn add_rdf_alt<T: 'static>(self, predicate: &Iri, values: &[T]) -> MapperResult<Self> {
        self.add_collection(predicate, values, CollectionStrategy::RdfAlt)
    }

    /// Add values under an explicitly chosen collection strategy.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceBuilder::add_value`].
    pub fn add_collection<T: 'static>(
        self,
        predicate: &Iri,
        values: &[T],
        strategy: CollectionStrategy,
    ) -> MapperResult<Self> {
        self.add_collection_inner(predicate, values, strategy, None)
    }

    fn add_collection_inner<T: 'static>(
        mut self,
        predicate: &Iri,
        values: &[T],
        strategy: CollectionStrategy,
        mapper: Option<&ItemMapper<'_, T>>,
    ) -> MapperResult<Self> {
        if strategy == CollectionStrategy::MultiObjects {
            let mut builder = self;
            for value in values {
                builder = builder.add_value_inner(predicate, value, mapper)?;
            }
            return Ok(builder);
        }

        let (items, mut aux) = collections::serialize_item_terms(values, mapper, self.context)?;
        self.triples.append(&mut aux);
        let (head, mut structure) = match strategy {
            CollectionStrategy::RdfList => collections::build_rdf_list(items),
            CollectionStrategy::RdfSeq => collections::build_rdf_container(rdf::SEQ, items),
            CollectionStrategy::RdfBag => collections::build_rdf_container(rdf::BAG, items),
            CollectionStrategy::RdfAlt => collections::build_rdf_container(rdf::ALT, items),
            CollectionStrategy::MultiObjects => unreachable!("handled above"),
        };
        self.triples
            .push(Triple::new(self.subject.clone(), predicate.clone(), head));
        self.triples.append(&mut structure);
        Ok(self)
    }

    /// Add key/value entries as anonymous entry resources carrying the
    /// key and value under the given predicates.
    ///
    /// # Errors
    ///
    /// Same contract as [`ResourceBuilder::add_value`].
    pub fn add_map<K: 'static, V: 'static>(
        mut self,
        predicate: &Iri,
        entries: &HashMap<K, V>,
        key_predicate: &Iri,
        value_predicate: &Iri,
    ) -> MapperResult<Self> {
        for (key, value) in entries {
            let entry = Subject::BlankNode(crate::term::BlankNode::new());
            self.triples.push(Triple::new(
                self.subject.clone(),
                predicate.clone(),
                Term::from(entry.clone()),
            ));
            let (key_objects, mut key_aux) = self.context.serialize_value(key)?;
            for object in key_objects {
                self.triples
                    .push(Triple::new(entry.clone(), key_predicate.clone(), object));
            }
            self.triples.append(&mut key_aux);
            let (value_objects, mut value_aux) = self.context.serialize_value(value)?;
            for object in value_objects {
                self.triples
                    .push(Triple::new(entry.clone(), value_predicate.clone(), object));
            }
            self.triples.append(&mut value_aux);
        }
        Ok(self)
    }

    /// Append preserved unmapped triples verbatim.
    #[must_use]
    pub fn add_unmapped(mut self, graph: &Graph) -> Self {
        self.triples.extend(graph.triples().cloned());
        self
    }

    /// Finish, returning the subject and the accumulated triples.
    #[must_use]
    pub fn build(self) -> (Subject, Vec<Triple>) {
        (self.subject, self.triples)
    }
}
