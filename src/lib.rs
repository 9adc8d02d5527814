#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # rdfmap: RDF graph engine and object mapping
//!
//! An in-memory data model for RDF 1.1 graphs and datasets, a pluggable
//! codec registry with production-grade Turtle, N-Triples/N-Quads and
//! JSON-LD codecs, and a bidirectional object-mapping layer with
//! completeness accounting.
//!
//! ## Quick Start
//!
//! ### Decoding and encoding graphs
//!
//! ```ignore
//! use rdfmap::RdfCore;
//!
//! let core = RdfCore::with_standard_codecs(&[]);
//! let graph = core.decode(
//!     "@prefix foaf: <http://xmlns.com/foaf/0.1/> .\n\
//!      <http://example.org/alice> foaf:name \"Alice\" .",
//!     Some("text/turtle"),
//!     None,
//! )?;
//! let jsonld = core.encode(&graph, Some("application/ld+json"), None, None)?;
//! # Ok::<(), rdfmap::RdfError>(())
//! ```
//!
//! ### Building graphs in code
//!
//! ```ignore
//! use rdfmap::{Graph, Iri, Literal, Triple};
//!
//! let graph = Graph::from_triples([Triple::new(
//!     Iri::new("http://example.org/alice")?,
//!     Iri::new("http://xmlns.com/foaf/0.1/name")?,
//!     Literal::new("Alice"),
//! )]);
//! assert_eq!(graph.triple_count(), 1);
//! # Ok::<(), rdfmap::RdfError>(())
//! ```
//!
//! ### Mapping objects
//!
//! ```ignore
//! use rdfmap::mapper::{ObjectCodecOptions, RdfMapper};
//!
//! let mut mapper = RdfMapper::new();
//! mapper.registry_mut().register_resource_mapper::<Person, _>(PersonMapper);
//! let person: Person =
//!     mapper.decode_object(turtle, Some("text/turtle"), &ObjectCodecOptions::default())?;
//! ```
//!
//! ## Modules
//!
//! - [`term`] — IRI, blank node, literal, and the term sum types
//! - [`triple`] — triples and quads
//! - [`graph`] — set-semantic graphs with pattern matching
//! - [`traversal`] — reachability subgraph extraction
//! - [`dataset`] — default graph + named graphs
//! - [`iri`] — RFC 3986 resolution and relativization
//! - [`prefix`] — namespace tables, PN_LOCAL rules, IRI compaction
//! - [`codec`] — codec traits
//! - [`turtle`] — Turtle 1.1 lexer, parser, and pretty encoder
//! - [`ntriples`] / [`nquads`] — line-oriented codecs
//! - [`jsonld`] — JSON-LD codec
//! - [`registry`] — MIME registry and the [`RdfCore`] façade
//! - [`mapper`] — object mapping core and collection mappers
//! - [`vocab`] — well-known vocabulary constants
//! - [`error`] — error types

pub mod codec;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod iri;
pub mod jsonld;
pub mod mapper;
pub mod nquads;
pub mod ntriples;
pub mod prefix;
pub mod registry;
pub mod term;
pub mod traversal;
pub mod triple;
pub mod turtle;
pub mod vocab;

pub use dataset::Dataset;
pub use error::{MapperError, MapperResult, RdfError, Result};
pub use graph::{Graph, TriplePattern};
pub use iri::{relativize, resolve, RelativizationOptions};
pub use jsonld::{JsonLdCodec, NamedGraphMode};
pub use nquads::NQuadsCodec;
pub use ntriples::NTriplesCodec;
pub use prefix::{CompactedIri, CompactionOptions, IriRole, PrefixMap};
pub use registry::{CodecRegistry, RdfCore, RegistryOptions};
pub use term::{BlankNode, Iri, Literal, Subject, Term};
pub use traversal::TraversalDecision;
pub use triple::{GraphName, Quad, Triple};
pub use turtle::TurtleCodec;
