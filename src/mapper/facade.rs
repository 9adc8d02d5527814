//! The [`RdfMapper`] entry point: typed objects ↔ serialized RDF.

use crate::error::{MapperError, MapperResult};
use crate::graph::Graph;
use crate::prefix::PrefixMap;
use crate::registry::RdfCore;
use crate::term::Subject;

use super::context::{DeserializationContext, SerializationContext};
use super::registry::MapperRegistry;
use super::root;
use super::tracker::{enforce_completeness, CompletenessMode};

/// Options shared by the object encode/decode calls.
#[derive(Debug, Clone, Default)]
pub struct ObjectCodecOptions {
    /// How leftover triples are treated after decoding. Strict by
    /// default.
    pub completeness: CompletenessMode,
    /// Suppress literal datatype checks during decoding.
    pub bypass_datatype_check: bool,
    /// Decode this subject instead of running root selection.
    pub subject: Option<Subject>,
    /// Base IRI forwarded to the codec.
    pub base_uri: Option<String>,
    /// Extra prefixes forwarded to the codec.
    pub custom_prefixes: Option<PrefixMap>,
}

/// Bidirectional bridge between application values and serialized RDF
/// documents.
///
/// Wraps a [`MapperRegistry`] for the object ↔ graph step and an
/// [`RdfCore`] for the graph ↔ document step.
///
/// # Examples
///
/// ```ignore
/// use rdfmap::mapper::{RdfMapper, ObjectCodecOptions};
///
/// let mut mapper = RdfMapper::new();
/// mapper.registry_mut().register_resource_mapper::<Person, _>(PersonMapper);
///
/// let person: Person = mapper.decode_object(
///     turtle,
///     Some("text/turtle"),
///     &ObjectCodecOptions::default(),
/// )?;
/// ```
#[derive(Debug)]
pub struct RdfMapper {
    registry: MapperRegistry,
    core: RdfCore,
}

impl Default for RdfMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl RdfMapper {
    /// A mapper with the default registry (stock primitive mappers) and
    /// the standard codecs.
    #[must_use]
    pub fn new() -> Self {
        RdfMapper {
            registry: MapperRegistry::with_defaults(),
            core: RdfCore::with_standard_codecs(&[]),
        }
    }

    /// A mapper over a caller-assembled registry, with the standard
    /// codecs.
    #[must_use]
    pub fn with_registry(registry: MapperRegistry) -> Self {
        RdfMapper {
            registry,
            core: RdfCore::with_standard_codecs(&[]),
        }
    }

    /// A mapper over a caller-assembled registry and codec core.
    #[must_use]
    pub fn with_parts(registry: MapperRegistry, core: RdfCore) -> Self {
        RdfMapper { registry, core }
    }

    /// The mapper registry.
    #[must_use]
    pub fn registry(&self) -> &MapperRegistry {
        &self.registry
    }

    /// Mutable access to the mapper registry, for setup-time
    /// registration.
    pub fn registry_mut(&mut self) -> &mut MapperRegistry {
        &mut self.registry
    }

    /// The codec core.
    #[must_use]
    pub fn core(&self) -> &RdfCore {
        &self.core
    }

    // ---- encoding ----------------------------------------------------------

    /// Serialize a value into an RDF document.
    ///
    /// # Errors
    ///
    /// [`MapperError::SerializerNotFound`] without a resource mapper for
    /// `T`, or any codec error.
    pub fn encode_object<T: 'static>(
        &self,
        value: &T,
        content_type: Option<&str>,
        options: &ObjectCodecOptions,
    ) -> MapperResult<String> {
        self.encode_object_with(value, content_type, options, |_| {})
    }

    /// [`RdfMapper::encode_object`] with a scoped-registration callback:
    /// the callback receives a shallow copy of the registry that lives
    /// for this call only.
    ///
    /// # Errors
    ///
    /// Same contract as [`RdfMapper::encode_object`].
    pub fn encode_object_with<T: 'static>(
        &self,
        value: &T,
        content_type: Option<&str>,
        options: &ObjectCodecOptions,
        register: impl FnOnce(&mut MapperRegistry),
    ) -> MapperResult<String> {
        let mut registry = self.registry.clone();
        register(&mut registry);
        let graph = encode_to_graph(&registry, value)?;
        self.encode_graph(&graph, content_type, options)
    }

    /// Serialize several values into one RDF document.
    ///
    /// # Errors
    ///
    /// Same contract as [`RdfMapper::encode_object`].
    pub fn encode_objects<T: 'static>(
        &self,
        values: &[T],
        content_type: Option<&str>,
        options: &ObjectCodecOptions,
    ) -> MapperResult<String> {
        let mut triples = Vec::new();
        let mut context = SerializationContext::new(&self.registry);
        for value in values {
            let (_, mut value_triples) = context.serialize_resource(value)?;
            triples.append(&mut value_triples);
        }
        self.encode_graph(&Graph::from_triples(triples), content_type, options)
    }

    /// Serialize a value together with a remainder graph preserved from a
    /// lossless decode. The union of both round-trips byte-losslessly
    /// through [`RdfMapper::decode_object_lossless`].
    ///
    /// # Errors
    ///
    /// Same contract as [`RdfMapper::encode_object`].
    pub fn encode_object_lossless<T: 'static>(
        &self,
        (value, remainder): (&T, &Graph),
        content_type: Option<&str>,
        options: &ObjectCodecOptions,
    ) -> MapperResult<String> {
        let graph = encode_to_graph(&self.registry, value)?.merge(remainder);
        self.encode_graph(&graph, content_type, options)
    }

    /// Serialize a value into a graph without touching any codec.
    ///
    /// # Errors
    ///
    /// [`MapperError::SerializerNotFound`] without a resource mapper.
    pub fn encode_object_to_graph<T: 'static>(&self, value: &T) -> MapperResult<Graph> {
        encode_to_graph(&self.registry, value)
    }

    fn encode_graph(
        &self,
        graph: &Graph,
        content_type: Option<&str>,
        options: &ObjectCodecOptions,
    ) -> MapperResult<String> {
        self.core
            .encode(
                graph,
                content_type,
                options.base_uri.as_deref(),
                options.custom_prefixes.as_ref(),
            )
            .map_err(MapperError::from)
    }

    // ---- decoding ----------------------------------------------------------

    /// Decode an RDF document into a value of `T`.
    ///
    /// # Errors
    ///
    /// Codec errors, [`MapperError::DeserializerNotFound`], root
    /// selection failures, and — in strict completeness mode —
    /// [`MapperError::IncompleteDeserialization`].
    pub fn decode_object<T: 'static>(
        &self,
        input: &str,
        content_type: Option<&str>,
        options: &ObjectCodecOptions,
    ) -> MapperResult<T> {
        self.decode_object_with(input, content_type, options, |_| {})
    }

    /// [`RdfMapper::decode_object`] with a scoped-registration callback.
    ///
    /// # Errors
    ///
    /// Same contract as [`RdfMapper::decode_object`].
    pub fn decode_object_with<T: 'static>(
        &self,
        input: &str,
        content_type: Option<&str>,
        options: &ObjectCodecOptions,
        register: impl FnOnce(&mut MapperRegistry),
    ) -> MapperResult<T> {
        let mut registry = self.registry.clone();
        register(&mut registry);
        let graph = self.decode_graph(input, content_type)?;
        decode_from_graph(&registry, &graph, options)
    }

    /// Decode every subject of `T`'s declared type from a document.
    ///
    /// # Errors
    ///
    /// Same contract as [`RdfMapper::decode_object`]; completeness is
    /// judged once over the whole document.
    pub fn decode_objects<T: 'static>(
        &self,
        input: &str,
        content_type: Option<&str>,
        options: &ObjectCodecOptions,
    ) -> MapperResult<Vec<T>> {
        let graph = self.decode_graph(input, content_type)?;
        self.decode_objects_from_graph(&graph, options)
    }

    /// Decode a document into a value plus the remainder graph of every
    /// triple the mapper stack did not consume.
    ///
    /// # Errors
    ///
    /// Same contract as [`RdfMapper::decode_object`], except that
    /// completeness is never enforced.
    pub fn decode_object_lossless<T: 'static>(
        &self,
        input: &str,
        content_type: Option<&str>,
        options: &ObjectCodecOptions,
    ) -> MapperResult<(T, Graph)> {
        let graph = self.decode_graph(input, content_type)?;
        self.decode_object_from_graph_lossless(&graph, options)
    }

    /// Decode a value from an in-memory graph.
    ///
    /// # Errors
    ///
    /// Same contract as [`RdfMapper::decode_object`].
    pub fn decode_object_from_graph<T: 'static>(
        &self,
        graph: &Graph,
        options: &ObjectCodecOptions,
    ) -> MapperResult<T> {
        decode_from_graph(&self.registry, graph, options)
    }

    /// Decode every subject of `T`'s declared type from a graph.
    ///
    /// # Errors
    ///
    /// Same contract as [`RdfMapper::decode_objects`].
    pub fn decode_objects_from_graph<T: 'static>(
        &self,
        graph: &Graph,
        options: &ObjectCodecOptions,
    ) -> MapperResult<Vec<T>> {
        let type_name = self.registry.display_type_name::<T>();
        let type_iri = self
            .registry
            .type_iri_for::<T>()
            .ok_or(MapperError::NoRootSubject { type_name })?
            .clone();
        let subjects = root::subjects_with_type(graph, &type_iri);

        let mut context = DeserializationContext::new(&self.registry, graph)
            .with_bypass_datatype_check(options.bypass_datatype_check);
        let mut values = Vec::with_capacity(subjects.len());
        for subject in subjects {
            values.push(context.deserialize_resource::<T>(&subject)?);
        }
        enforce_completeness(options.completeness, &context.tracker().remainder(graph))?;
        Ok(values)
    }

    /// Decode a value plus remainder from an in-memory graph.
    ///
    /// # Errors
    ///
    /// Same contract as [`RdfMapper::decode_object_lossless`].
    pub fn decode_object_from_graph_lossless<T: 'static>(
        &self,
        graph: &Graph,
        options: &ObjectCodecOptions,
    ) -> MapperResult<(T, Graph)> {
        let (value, remainder) = decode_with_remainder(&self.registry, graph, options)?;
        Ok((value, remainder))
    }

    fn decode_graph(&self, input: &str, content_type: Option<&str>) -> MapperResult<Graph> {
        self.core
            .decode(input, content_type, None)
            .map_err(MapperError::from)
    }
}

fn encode_to_graph<T: 'static>(registry: &MapperRegistry, value: &T) -> MapperResult<Graph> {
    let mut context = SerializationContext::new(registry);
    let (_, triples) = context.serialize_resource(value)?;
    Ok(Graph::from_triples(triples))
}

fn decode_from_graph<T: 'static>(
    registry: &MapperRegistry,
    graph: &Graph,
    options: &ObjectCodecOptions,
) -> MapperResult<T> {
    let (value, remainder) = decode_with_remainder(registry, graph, options)?;
    enforce_completeness(options.completeness, &remainder)?;
    Ok(value)
}

fn decode_with_remainder<T: 'static>(
    registry: &MapperRegistry,
    graph: &Graph,
    options: &ObjectCodecOptions,
) -> MapperResult<(T, Graph)> {
    let type_name = registry.display_type_name::<T>();
    let subject = match &options.subject {
        Some(subject) => subject.clone(),
        None => root::select_root_subject(graph, registry.type_iri_for::<T>(), type_name)?,
    };
    let mut context = DeserializationContext::new(registry, graph)
        .with_bypass_datatype_check(options.bypass_datatype_check);
    let value = context.deserialize_resource::<T>(&subject)?;
    let remainder = context.tracker().remainder(graph);
    Ok((value, remainder))
}
