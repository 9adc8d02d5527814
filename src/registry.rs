//! Codec registry and the [`RdfCore`] façade.
//!
//! The registry keeps separate MIME-keyed tables for graph codecs and
//! dataset codecs. It is mutable during setup and freezes on first use;
//! late registration attempts are rejected rather than racing with
//! readers.
//!
//! Auto-detection order: an explicitly hinted content type always wins;
//! otherwise the first registered codec whose [`GraphCodec::can_parse`]
//! probe accepts the input is used; optionally ([`RegistryOptions::
//! try_parse_fallback`]) every codec is tried in turn and the first
//! successful parse wins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::codec::{normalize_mime_type, DatasetCodec, GraphCodec};
use crate::dataset::Dataset;
use crate::error::{RdfError, Result};
use crate::graph::Graph;
use crate::jsonld::JsonLdCodec;
use crate::nquads::NQuadsCodec;
use crate::ntriples::NTriplesCodec;
use crate::prefix::PrefixMap;
use crate::turtle::TurtleCodec;

/// Behavior knobs for the registry.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct RegistryOptions {
    /// When auto-detection finds no codec (or the detected codec fails),
    /// try a full parse with every registered codec and accept the first
    /// success.
    pub try_parse_fallback: bool,
}

/// MIME-keyed codec tables with a freeze-on-first-use discipline.
#[derive(Debug, Default)]
pub struct CodecRegistry {
    graph_codecs: Vec<Arc<dyn GraphCodec>>,
    dataset_codecs: Vec<Arc<dyn DatasetCodec>>,
    frozen: AtomicBool,
}

impl CodecRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a graph codec.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::ConstraintViolation`] once the registry has
    /// served its first lookup; registration is a setup-time operation.
    pub fn register_graph_codec(&mut self, codec: Arc<dyn GraphCodec>) -> Result<()> {
        self.ensure_mutable()?;
        self.graph_codecs.push(codec);
        Ok(())
    }

    /// Register a dataset codec.
    ///
    /// # Errors
    ///
    /// Same contract as [`CodecRegistry::register_graph_codec`].
    pub fn register_dataset_codec(&mut self, codec: Arc<dyn DatasetCodec>) -> Result<()> {
        self.ensure_mutable()?;
        self.dataset_codecs.push(codec);
        Ok(())
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.frozen.load(Ordering::Acquire) {
            return Err(RdfError::ConstraintViolation(
                "codec registry is frozen after first use; register codecs during setup"
                    .to_string(),
            ));
        }
        Ok(())
    }

    fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    /// The graph codec registered for a content type, if any.
    #[must_use]
    pub fn graph_codec(&self, content_type: &str) -> Option<Arc<dyn GraphCodec>> {
        self.freeze();
        let wanted = normalize_mime_type(content_type);
        self.graph_codecs
            .iter()
            .find(|codec| {
                codec
                    .supported_mime_types()
                    .iter()
                    .any(|mime| *mime == wanted)
            })
            .cloned()
    }

    /// The dataset codec registered for a content type, if any.
    #[must_use]
    pub fn dataset_codec(&self, content_type: &str) -> Option<Arc<dyn DatasetCodec>> {
        self.freeze();
        let wanted = normalize_mime_type(content_type);
        self.dataset_codecs
            .iter()
            .find(|codec| {
                codec
                    .supported_mime_types()
                    .iter()
                    .any(|mime| *mime == wanted)
            })
            .cloned()
    }

    /// The first registered graph codec whose probe accepts the input.
    #[must_use]
    pub fn detect_graph_codec(&self, input: &str) -> Option<Arc<dyn GraphCodec>> {
        self.freeze();
        self.graph_codecs
            .iter()
            .find(|codec| codec.can_parse(input))
            .cloned()
    }

    /// The first registered dataset codec whose probe accepts the input.
    #[must_use]
    pub fn detect_dataset_codec(&self, input: &str) -> Option<Arc<dyn DatasetCodec>> {
        self.freeze();
        self.dataset_codecs
            .iter()
            .find(|codec| codec.can_parse(input))
            .cloned()
    }

    /// Registered graph codecs, in registration order.
    #[must_use]
    pub fn graph_codecs(&self) -> &[Arc<dyn GraphCodec>] {
        &self.graph_codecs
    }

    /// Registered dataset codecs, in registration order.
    #[must_use]
    pub fn dataset_codecs(&self) -> &[Arc<dyn DatasetCodec>] {
        &self.dataset_codecs
    }
}

/// Entry point bundling the codec registries with encode/decode
/// convenience calls.
///
/// # Examples
///
/// ```ignore
/// use rdfmap::RdfCore;
///
/// let core = RdfCore::with_standard_codecs(&[]);
/// let graph = core.decode("<http://ex/s> <http://ex/p> \"v\" .", Some("text/turtle"), None)?;
/// let jsonld = core.encode(&graph, Some("application/ld+json"), None, None)?;
/// # Ok::<(), rdfmap::RdfError>(())
/// ```
#[derive(Debug)]
pub struct RdfCore {
    registry: CodecRegistry,
    options: RegistryOptions,
}

impl Default for RdfCore {
    fn default() -> Self {
        Self::with_standard_codecs(&[])
    }
}

impl RdfCore {
    /// A core with the standard codecs (Turtle, JSON-LD, N-Triples for
    /// graphs; N-Quads for datasets) plus any additional graph codecs.
    #[must_use]
    pub fn with_standard_codecs(additional: &[Arc<dyn GraphCodec>]) -> Self {
        let mut registry = CodecRegistry::new();
        registry
            .register_graph_codec(Arc::new(TurtleCodec::new()))
            .expect("fresh registry");
        registry
            .register_graph_codec(Arc::new(JsonLdCodec::new()))
            .expect("fresh registry");
        registry
            .register_graph_codec(Arc::new(NTriplesCodec::new()))
            .expect("fresh registry");
        registry
            .register_dataset_codec(Arc::new(NQuadsCodec::new()))
            .expect("fresh registry");
        for codec in additional {
            registry
                .register_graph_codec(codec.clone())
                .expect("fresh registry");
        }
        RdfCore {
            registry,
            options: RegistryOptions::default(),
        }
    }

    /// A core over a caller-assembled registry.
    #[must_use]
    pub fn with_registry(registry: CodecRegistry, options: RegistryOptions) -> Self {
        RdfCore { registry, options }
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// The graph codec for a content type.
    #[must_use]
    pub fn codec(&self, content_type: &str) -> Option<Arc<dyn GraphCodec>> {
        self.registry.graph_codec(content_type)
    }

    /// The dataset codec for a content type.
    #[must_use]
    pub fn dataset_codec(&self, content_type: &str) -> Option<Arc<dyn DatasetCodec>> {
        self.registry.dataset_codec(content_type)
    }

    /// The graph codec for a file extension (`ttl`, `nt`, `jsonld`, …).
    #[must_use]
    pub fn codec_for_extension(&self, extension: &str) -> Option<Arc<dyn GraphCodec>> {
        let mime = mime_for_extension(extension)?;
        self.codec(mime)
    }

    /// Encode a graph. `content_type` defaults to the first registered
    /// codec's primary MIME type (Turtle in the standard setup).
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::EncoderNotFound`] for unknown content types,
    /// or the encoder's own error.
    pub fn encode(
        &self,
        graph: &Graph,
        content_type: Option<&str>,
        base_uri: Option<&str>,
        custom_prefixes: Option<&PrefixMap>,
    ) -> Result<String> {
        let codec = match content_type {
            Some(content_type) => self
                .codec(content_type)
                .ok_or_else(|| RdfError::EncoderNotFound(content_type.to_string()))?,
            None => {
                self.registry.freeze();
                self.registry
                    .graph_codecs()
                    .first()
                    .cloned()
                    .ok_or_else(|| RdfError::EncoderNotFound("<default>".to_string()))?
            }
        };
        codec.encoder().convert(graph, base_uri, custom_prefixes)
    }

    /// Decode a document into a graph, auto-detecting the codec when no
    /// content type is given.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::DecoderNotFound`] when no codec matches, or the
    /// decoder's own error.
    pub fn decode(
        &self,
        input: &str,
        content_type: Option<&str>,
        document_url: Option<&str>,
    ) -> Result<Graph> {
        if let Some(content_type) = content_type {
            let codec = self
                .codec(content_type)
                .ok_or_else(|| RdfError::DecoderNotFound(content_type.to_string()))?;
            return codec.decoder().convert(input, document_url);
        }

        if let Some(codec) = self.registry.detect_graph_codec(input) {
            match codec.decoder().convert(input, document_url) {
                Ok(graph) => return Ok(graph),
                Err(error) if !self.options.try_parse_fallback => return Err(error),
                Err(_) => {}
            }
        } else if !self.options.try_parse_fallback {
            return Err(RdfError::DecoderNotFound(
                "auto-detection found no matching codec".to_string(),
            ));
        }

        // opt-in last resort: try every codec in registration order
        for codec in self.registry.graph_codecs() {
            if let Ok(graph) = codec.decoder().convert(input, document_url) {
                return Ok(graph);
            }
        }
        Err(RdfError::DecoderNotFound(
            "no registered codec could parse the input".to_string(),
        ))
    }

    /// Encode a dataset.
    ///
    /// # Errors
    ///
    /// Same contract as [`RdfCore::encode`].
    pub fn encode_dataset(
        &self,
        dataset: &Dataset,
        content_type: Option<&str>,
        base_uri: Option<&str>,
        custom_prefixes: Option<&PrefixMap>,
    ) -> Result<String> {
        let codec = match content_type {
            Some(content_type) => self
                .dataset_codec(content_type)
                .ok_or_else(|| RdfError::EncoderNotFound(content_type.to_string()))?,
            None => {
                self.registry.freeze();
                self.registry
                    .dataset_codecs()
                    .first()
                    .cloned()
                    .ok_or_else(|| RdfError::EncoderNotFound("<default>".to_string()))?
            }
        };
        codec.encoder().convert(dataset, base_uri, custom_prefixes)
    }

    /// Decode a document into a dataset, auto-detecting the codec when no
    /// content type is given.
    ///
    /// # Errors
    ///
    /// Same contract as [`RdfCore::decode`].
    pub fn decode_dataset(
        &self,
        input: &str,
        content_type: Option<&str>,
        document_url: Option<&str>,
    ) -> Result<Dataset> {
        if let Some(content_type) = content_type {
            let codec = self
                .dataset_codec(content_type)
                .ok_or_else(|| RdfError::DecoderNotFound(content_type.to_string()))?;
            return codec.decoder().convert(input, document_url);
        }
        if let Some(codec) = self.registry.detect_dataset_codec(input) {
            return codec.decoder().convert(input, document_url);
        }
        // a graph codec can still serve the default graph
        let graph = self.decode(input, None, document_url)?;
        Ok(Dataset::from_default_graph(graph))
    }
}

fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "ttl" | "turtle" => Some("text/turtle"),
        "nt" | "ntriples" => Some("application/n-triples"),
        "nq" | "nquads" => Some("application/n-quads"),
        "jsonld" | "json" => Some("application/ld+json"),
        _ => None,
    }
}
