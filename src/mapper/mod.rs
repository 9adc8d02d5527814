//! Object mapping between application values and RDF graphs.
//!
//! The mapper layer is a bidirectional bridge: values serialize to sets of
//! triples rooted at a subject, and graphs deserialize back into values,
//! with every consumed triple accounted for.
//!
//! - [`traits`] — the mapper kind contracts (IRI term, literal term,
//!   resource, multi-objects, unmapped-triples)
//! - [`registry`] — the process-wide mapper table with scoped copies
//! - [`context`] — serialization/deserialization contexts
//! - [`builder`] / [`reader`] — fluent resource construction and reading
//! - [`tracker`] — consumed-triple accounting and completeness modes
//! - [`collections`] — rdf:List/Seq/Bag/Alt and multi-objects strategies
//! - [`primitives`] — stock mappers for std types
//! - [`facade`] — the [`RdfMapper`] entry point
//!
//! # Example
//!
//! ```ignore
//! use rdfmap::mapper::{RdfMapper, ObjectCodecOptions};
//!
//! let mapper = RdfMapper::new();
//! let person: Person = mapper.decode_object(
//!     turtle,
//!     Some("text/turtle"),
//!     &ObjectCodecOptions::default(),
//! )?;
//! ```

pub mod builder;
pub mod collections;
pub mod context;
pub mod facade;
pub mod primitives;
pub mod reader;
pub mod registry;
mod root;
pub mod tracker;
pub mod traits;

pub use builder::ResourceBuilder;
pub use collections::CollectionStrategy;
pub use context::{DeserializationContext, SerializationContext};
pub use facade::{ObjectCodecOptions, RdfMapper};
pub use reader::ResourceReader;
pub use registry::MapperRegistry;
pub use tracker::{CompletenessMode, ConsumptionTracker};
pub use traits::{
    IriTermMapper, ItemMapper, LiteralTermMapper, MapperDirection, MultiObjectsMapper,
    ResourceMapper, SubjectPolicy, UnmappedTriplesMapper,
};
