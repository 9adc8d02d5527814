//! JSON-LD 1.0 (subset) codec.
//!
//! Supports inline `@context` objects (string shortcuts and
//! `{"@id": …}` term definitions plus `@base`), `@id`, `@type`,
//! `@value`/`@language`, and `@graph`. Remote context fetching,
//! `@reverse`, and `@container: @list` are out of scope.
//!
//! Named graphs in the input are handled according to
//! [`NamedGraphMode`]: rejected (default), dropped, or merged into the
//! default graph.

pub mod decoder;
pub mod encoder;

use memchr::memmem;

use crate::codec::{probe_window, GraphCodec, GraphDecoder, GraphEncoder};

pub use decoder::JsonLdDecoderOptions;
pub use encoder::JsonLdEncoderOptions;

/// Policy for `@graph` entries carrying an explicit `@id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NamedGraphMode {
    /// Raise an error when a named graph is present.
    #[default]
    Strict,
    /// Drop named graphs, keeping only the default graph.
    Ignore,
    /// Flatten named graphs into the default graph.
    Merge,
}

/// The JSON-LD codec.
#[derive(Debug, Clone, Default)]
pub struct JsonLdCodec {
    encoder_options: JsonLdEncoderOptions,
    decoder_options: JsonLdDecoderOptions,
}

impl JsonLdCodec {
    /// A codec with default options: strict named-graph handling.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec with custom encoder and/or decoder options.
    #[must_use]
    pub fn with_options(
        encoder: Option<JsonLdEncoderOptions>,
        decoder: Option<JsonLdDecoderOptions>,
    ) -> Self {
        JsonLdCodec {
            encoder_options: encoder.unwrap_or_default(),
            decoder_options: decoder.unwrap_or_default(),
        }
    }
}

const JSONLD_KEYWORDS: [&str; 5] = ["@context", "@id", "@type", "@graph", "@value"];

impl GraphCodec for JsonLdCodec {
    fn primary_mime_type(&self) -> &'static str {
        "application/ld+json"
    }

    fn supported_mime_types(&self) -> &'static [&'static str] {
        &["application/ld+json", "application/json"]
    }

    fn can_parse(&self, input: &str) -> bool {
        let window = probe_window(input);
        let trimmed = window.trim_start();
        if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
            return false;
        }
        // a JSON-LD keyword must appear as a key, i.e. quoted and followed
        // by a colon
        let bytes = window.as_bytes();
        for keyword in JSONLD_KEYWORDS {
            let quoted = format!("\"{keyword}\"");
            let mut offset = 0;
            while let Some(found) = memmem::find(&bytes[offset..], quoted.as_bytes()) {
                let after = offset + found + quoted.len();
                let rest = window[after..].trim_start();
                if rest.starts_with(':') {
                    return true;
                }
                offset = offset + found + 1;
            }
        }
        false
    }

    fn decoder(&self) -> Box<dyn GraphDecoder> {
        Box::new(decoder::JsonLdDecoder::with_options(
            self.decoder_options.clone(),
        ))
    }

    fn encoder(&self) -> Box<dyn GraphEncoder> {
        Box::new(encoder::JsonLdEncoder::with_options(
            self.encoder_options.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_parse_requires_keyword_as_key() {
        let codec = JsonLdCodec::new();
        assert!(codec.can_parse(r#"{"@context": {}, "@id": "http://ex/s"}"#));
        assert!(codec.can_parse(r#"[{"@id": "http://ex/s"}]"#));
        assert!(codec.can_parse("  {\n  \"@graph\" : []\n}"));
        // keyword only inside a value string
        assert!(!codec.can_parse(r#"{"note": "mentions @id in passing"}"#));
        assert!(!codec.can_parse(r#"{"name": "plain json"}"#));
    }

    #[test]
    fn test_can_parse_rejects_non_json() {
        let codec = JsonLdCodec::new();
        assert!(!codec.can_parse("<!DOCTYPE html><html>@id</html>"));
        assert!(!codec.can_parse("@prefix ex: <http://ex/> ."));
        assert!(!codec.can_parse(""));
    }

    #[test]
    fn test_codec_roundtrip() {
        let codec = JsonLdCodec::new();
        let graph = codec
            .decoder()
            .convert(
                r#"{"@id": "http://ex/s", "http://ex/p": {"@id": "http://ex/o"}}"#,
                None,
            )
            .unwrap();
        assert_eq!(graph.triple_count(), 1);
        let output = codec.encoder().convert(&graph, None, None).unwrap();
        let back = codec.decoder().convert(&output, None).unwrap();
        assert_eq!(graph, back);
    }
}
