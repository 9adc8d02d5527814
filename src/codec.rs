//! Codec traits for RDF wire formats.
//!
//! This module defines the traits every format implementation provides:
//! a [`GraphCodec`] bundles an encoder/decoder pair for single-graph
//! formats, and a [`DatasetCodec`] does the same for multi-graph formats.
//! All traits are object-safe so the registry can dispatch dynamically.
//!
//! # Design Rationale
//!
//! Codecs are cheap, immutable description objects: `decoder()` and
//! `encoder()` hand out fresh converter instances carrying the codec's
//! configured options. Format-specific options are set through each
//! codec's own `with_options` constructor, keeping the trait surface
//! format-agnostic.
//!
//! # Example
//!
//! ```ignore
//! use rdfmap::codec::GraphCodec;
//!
//! fn roundtrip<C: GraphCodec>(codec: &C, input: &str) -> rdfmap::Result<String> {
//!     let graph = codec.decoder().convert(input, None)?;
//!     codec.encoder().convert(&graph, None, None)
//! }
//! ```

use std::fmt;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::graph::Graph;
use crate::prefix::PrefixMap;

/// Decoder half of a graph codec.
pub trait GraphDecoder: fmt::Debug + Send + Sync {
    /// Decode a serialized document into a graph.
    ///
    /// `document_url`, when given, serves as the base IRI for relative
    /// references unless the document declares its own.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RdfError::Syntax`] for malformed input and
    /// [`crate::RdfError::ConstraintViolation`] for structurally valid but
    /// semantically forbidden content.
    fn convert(&self, input: &str, document_url: Option<&str>) -> Result<Graph>;
}

/// Encoder half of a graph codec.
pub trait GraphEncoder: fmt::Debug + Send + Sync {
    /// Encode a graph into the codec's wire format.
    ///
    /// `base_uri` enables base-relative output where the format supports
    /// it; `custom_prefixes` are merged over the encoder's configured
    /// prefixes.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph cannot be represented in the format.
    fn convert(
        &self,
        graph: &Graph,
        base_uri: Option<&str>,
        custom_prefixes: Option<&PrefixMap>,
    ) -> Result<String>;
}

/// A paired encoder/decoder for one single-graph wire format.
pub trait GraphCodec: fmt::Debug + Send + Sync {
    /// The canonical MIME type of the format.
    fn primary_mime_type(&self) -> &'static str;

    /// All MIME types this codec answers to, the primary one first.
    fn supported_mime_types(&self) -> &'static [&'static str];

    /// Cheap syntactic probe: could this input plausibly be this format?
    ///
    /// Used by auto-detection. Implementations must bound their lookahead
    /// and must not attempt a full parse.
    fn can_parse(&self, input: &str) -> bool;

    /// A decoder carrying this codec's configured options.
    fn decoder(&self) -> Box<dyn GraphDecoder>;

    /// An encoder carrying this codec's configured options.
    fn encoder(&self) -> Box<dyn GraphEncoder>;
}

/// Decoder half of a dataset codec.
pub trait DatasetDecoder: fmt::Debug + Send + Sync {
    /// Decode a serialized document into a dataset.
    ///
    /// # Errors
    ///
    /// Same contract as [`GraphDecoder::convert`].
    fn convert(&self, input: &str, document_url: Option<&str>) -> Result<Dataset>;
}

/// Encoder half of a dataset codec.
pub trait DatasetEncoder: fmt::Debug + Send + Sync {
    /// Encode a dataset into the codec's wire format.
    ///
    /// # Errors
    ///
    /// Same contract as [`GraphEncoder::convert`].
    fn convert(
        &self,
        dataset: &Dataset,
        base_uri: Option<&str>,
        custom_prefixes: Option<&PrefixMap>,
    ) -> Result<String>;
}

/// A paired encoder/decoder for one multi-graph wire format.
pub trait DatasetCodec: fmt::Debug + Send + Sync {
    /// The canonical MIME type of the format.
    fn primary_mime_type(&self) -> &'static str;

    /// All MIME types this codec answers to, the primary one first.
    fn supported_mime_types(&self) -> &'static [&'static str];

    /// Cheap syntactic probe; see [`GraphCodec::can_parse`].
    fn can_parse(&self, input: &str) -> bool;

    /// A decoder carrying this codec's configured options.
    fn decoder(&self) -> Box<dyn DatasetDecoder>;

    /// An encoder carrying this codec's configured options.
    fn encoder(&self) -> Box<dyn DatasetEncoder>;
}

/// Bound on `can_parse` lookahead.
pub(crate) const PROBE_WINDOW: usize = 4096;

/// The leading probe window of an input, truncated on a char boundary.
#[must_use]
pub(crate) fn probe_window(input: &str) -> &str {
    if input.len() <= PROBE_WINDOW {
        return input;
    }
    let mut end = PROBE_WINDOW;
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    &input[..end]
}

/// Normalize a content type for registry lookup: lowercase, parameters
/// (`;charset=…`) stripped.
#[must_use]
pub(crate) fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}
