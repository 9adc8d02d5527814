//! The mapper registry.
//!
//! Mappers are stored per kind, keyed by the `TypeId` of the value type
//! they handle. Each slot erases the typed `Arc<dyn …Mapper<T>>` behind
//! `dyn Any`; lookups downcast it back using the caller's type parameter.
//! Resource mappers additionally index their declared `rdf:type` IRI for
//! root-subject selection.
//!
//! `Clone` produces a shallow copy: a new table referencing the same
//! mapper instances. That is exactly the scoped-registration contract —
//! codec calls hand a clone to their `register` callback and discard it
//! afterwards.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::term::Iri;

use super::primitives;
use super::traits::{
    IriTermMapper, LiteralTermMapper, MultiObjectsMapper, ResourceMapper, UnmappedTriplesMapper,
};

#[derive(Clone)]
struct Slot {
    mapper: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Process-wide table of mappers, keyed by value type and by RDF type
/// IRI.
#[derive(Debug, Clone, Default)]
pub struct MapperRegistry {
    iri_mappers: HashMap<TypeId, Slot>,
    literal_mappers: HashMap<TypeId, Slot>,
    resource_mappers: HashMap<TypeId, Slot>,
    multi_objects_mappers: HashMap<TypeId, Slot>,
    unmapped_mappers: HashMap<TypeId, Slot>,
    types_by_iri: HashMap<Iri, TypeId>,
    iris_by_type: HashMap<TypeId, Iri>,
}

impl MapperRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the stock primitive mappers
    /// (`String`, `bool`, `i32`, `i64`, `f64`, [`crate::Iri`], and the
    /// graph-fragment sink).
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = MapperRegistry::new();
        primitives::register_defaults(&mut registry);
        registry
    }

    // ---- registration ------------------------------------------------------

    /// Register an IRI term mapper for `T`.
    pub fn register_iri_mapper<T: 'static, M: IriTermMapper<T> + 'static>(&mut self, mapper: M) {
        self.register_iri_mapper_arc::<T>(Arc::new(mapper));
    }

    /// Register a shared IRI term mapper for `T`.
    pub fn register_iri_mapper_arc<T: 'static>(&mut self, mapper: Arc<dyn IriTermMapper<T>>) {
        self.iri_mappers.insert(
            TypeId::of::<T>(),
            Slot {
                mapper: Arc::new(mapper),
                type_name: type_name::<T>(),
            },
        );
    }

    /// Register a literal term mapper for `T`.
    pub fn register_literal_mapper<T: 'static, M: LiteralTermMapper<T> + 'static>(
        &mut self,
        mapper: M,
    ) {
        self.register_literal_mapper_arc::<T>(Arc::new(mapper));
    }

    /// Register a shared literal term mapper for `T`.
    pub fn register_literal_mapper_arc<T: 'static>(
        &mut self,
        mapper: Arc<dyn LiteralTermMapper<T>>,
    ) {
        self.literal_mappers.insert(
            TypeId::of::<T>(),
            Slot {
                mapper: Arc::new(mapper),
                type_name: type_name::<T>(),
            },
        );
    }

    /// Register a resource mapper for `T`.
    ///
    /// The mapper's declared type IRI, if any, is indexed for root
    /// selection and [`MapperRegistry::resource_type_for_iri`].
    pub fn register_resource_mapper<T: 'static, M: ResourceMapper<T> + 'static>(
        &mut self,
        mapper: M,
    ) {
        self.register_resource_mapper_arc::<T>(Arc::new(mapper));
    }

    /// Register a shared resource mapper for `T`.
    pub fn register_resource_mapper_arc<T: 'static>(&mut self, mapper: Arc<dyn ResourceMapper<T>>) {
        if let Some(type_iri) = mapper.type_iri() {
            self.types_by_iri.insert(type_iri.clone(), TypeId::of::<T>());
            self.iris_by_type.insert(TypeId::of::<T>(), type_iri);
        }
        self.resource_mappers.insert(
            TypeId::of::<T>(),
            Slot {
                mapper: Arc::new(mapper),
                type_name: type_name::<T>(),
            },
        );
    }

    /// Register a multi-objects mapper for `T`.
    pub fn register_multi_objects_mapper<T: 'static, M: MultiObjectsMapper<T> + 'static>(
        &mut self,
        mapper: M,
    ) {
        self.multi_objects_mappers.insert(
            TypeId::of::<T>(),
            Slot {
                mapper: Arc::new(Arc::new(mapper) as Arc<dyn MultiObjectsMapper<T>>),
                type_name: type_name::<T>(),
            },
        );
    }

    /// Register an unmapped-triples mapper for `T`.
    pub fn register_unmapped_triples_mapper<T: 'static, M: UnmappedTriplesMapper<T> + 'static>(
        &mut self,
        mapper: M,
    ) {
        self.unmapped_mappers.insert(
            TypeId::of::<T>(),
            Slot {
                mapper: Arc::new(Arc::new(mapper) as Arc<dyn UnmappedTriplesMapper<T>>),
                type_name: type_name::<T>(),
            },
        );
    }

    // ---- lookup ------------------------------------------------------------

    /// The IRI term mapper for `T`, if registered.
    #[must_use]
    pub fn iri_mapper<T: 'static>(&self) -> Option<Arc<dyn IriTermMapper<T>>> {
        self.iri_mappers
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.mapper.downcast_ref::<Arc<dyn IriTermMapper<T>>>())
            .cloned()
    }

    /// The literal term mapper for `T`, if registered.
    #[must_use]
    pub fn literal_mapper<T: 'static>(&self) -> Option<Arc<dyn LiteralTermMapper<T>>> {
        self.literal_mappers
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.mapper.downcast_ref::<Arc<dyn LiteralTermMapper<T>>>())
            .cloned()
    }

    /// The resource mapper for `T`, if registered.
    #[must_use]
    pub fn resource_mapper<T: 'static>(&self) -> Option<Arc<dyn ResourceMapper<T>>> {
        self.resource_mappers
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.mapper.downcast_ref::<Arc<dyn ResourceMapper<T>>>())
            .cloned()
    }

    /// The multi-objects mapper for `T`, if registered.
    #[must_use]
    pub fn multi_objects_mapper<T: 'static>(&self) -> Option<Arc<dyn MultiObjectsMapper<T>>> {
        self.multi_objects_mappers
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.mapper.downcast_ref::<Arc<dyn MultiObjectsMapper<T>>>())
            .cloned()
    }

    /// The unmapped-triples mapper for `T`, if registered.
    #[must_use]
    pub fn unmapped_triples_mapper<T: 'static>(&self) -> Option<Arc<dyn UnmappedTriplesMapper<T>>> {
        self.unmapped_mappers
            .get(&TypeId::of::<T>())
            .and_then(|slot| {
                slot.mapper
                    .downcast_ref::<Arc<dyn UnmappedTriplesMapper<T>>>()
            })
            .cloned()
    }

    // ---- existence checks --------------------------------------------------

    /// Whether any term or resource mapper exists for `T`.
    #[must_use]
    pub fn has_mapper_for<T: 'static>(&self) -> bool {
        self.has_mapper_for_type_id(TypeId::of::<T>())
    }

    /// Runtime-type variant of [`MapperRegistry::has_mapper_for`].
    #[must_use]
    pub fn has_mapper_for_type_id(&self, type_id: TypeId) -> bool {
        self.iri_mappers.contains_key(&type_id)
            || self.literal_mappers.contains_key(&type_id)
            || self.resource_mappers.contains_key(&type_id)
            || self.multi_objects_mappers.contains_key(&type_id)
    }

    /// Whether an IRI term mapper exists for `T`.
    #[must_use]
    pub fn has_iri_mapper_for<T: 'static>(&self) -> bool {
        self.iri_mappers.contains_key(&TypeId::of::<T>())
    }

    /// Whether a literal term mapper exists for `T`.
    #[must_use]
    pub fn has_literal_mapper_for<T: 'static>(&self) -> bool {
        self.literal_mappers.contains_key(&TypeId::of::<T>())
    }

    /// Whether a resource mapper exists for `T`.
    #[must_use]
    pub fn has_resource_mapper_for<T: 'static>(&self) -> bool {
        self.resource_mappers.contains_key(&TypeId::of::<T>())
    }

    /// Runtime-type variant of
    /// [`MapperRegistry::has_resource_mapper_for`].
    #[must_use]
    pub fn has_resource_mapper_for_type_id(&self, type_id: TypeId) -> bool {
        self.resource_mappers.contains_key(&type_id)
    }

    // ---- type-IRI index ----------------------------------------------------

    /// The value type registered for an `rdf:type` IRI.
    #[must_use]
    pub fn resource_type_for_iri(&self, type_iri: &Iri) -> Option<TypeId> {
        self.types_by_iri.get(type_iri).copied()
    }

    /// The declared type IRI of `T`'s resource mapper.
    #[must_use]
    pub fn type_iri_for<T: 'static>(&self) -> Option<&Iri> {
        self.iris_by_type.get(&TypeId::of::<T>())
    }

    /// The registered name of `T` for diagnostics, falling back to the
    /// compiler's name.
    #[must_use]
    pub fn display_type_name<T: 'static>(&self) -> &'static str {
        self.resource_mappers
            .get(&TypeId::of::<T>())
            .or_else(|| self.literal_mappers.get(&TypeId::of::<T>()))
            .or_else(|| self.iri_mappers.get(&TypeId::of::<T>()))
            .map_or_else(type_name::<T>, |slot| slot.type_name)
    }
}
