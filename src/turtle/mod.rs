//! Turtle 1.1 codec.
//!
//! - [`lexer`] — the hand-written token scanner with leniency flags
//! - [`parser`] — recursive-descent decoding into a [`Graph`]
//! - [`encoder`] — deterministic pretty encoding
//!
//! The same lexer, with all leniency flags off, underlies the N-Triples
//! and N-Quads codecs.

pub mod encoder;
pub mod lexer;
pub mod parser;

use memchr::memmem;

use crate::codec::{probe_window, GraphCodec, GraphDecoder, GraphEncoder};
use crate::error::Result;
use crate::graph::Graph;
use crate::prefix::PrefixMap;

pub use encoder::{IriRelativizationMode, TurtleEncoderOptions};
pub use lexer::TurtleLexerFlags;
pub use parser::TurtleDecoderOptions;

/// The Turtle codec.
#[derive(Debug, Clone, Default)]
pub struct TurtleCodec {
    encoder_options: TurtleEncoderOptions,
    decoder_options: TurtleDecoderOptions,
}

impl TurtleCodec {
    /// A codec with default options: strict decoding, pretty encoding
    /// with prefix generation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec with custom encoder and/or decoder options.
    #[must_use]
    pub fn with_options(
        encoder: Option<TurtleEncoderOptions>,
        decoder: Option<TurtleDecoderOptions>,
    ) -> Self {
        TurtleCodec {
            encoder_options: encoder.unwrap_or_default(),
            decoder_options: decoder.unwrap_or_default(),
        }
    }

    /// The configured encoder options.
    #[must_use]
    pub fn encoder_options(&self) -> &TurtleEncoderOptions {
        &self.encoder_options
    }

    /// The configured decoder options.
    #[must_use]
    pub fn decoder_options(&self) -> &TurtleDecoderOptions {
        &self.decoder_options
    }
}

impl GraphCodec for TurtleCodec {
    fn primary_mime_type(&self) -> &'static str {
        "text/turtle"
    }

    fn supported_mime_types(&self) -> &'static [&'static str] {
        &["text/turtle", "application/x-turtle", "application/turtle"]
    }

    fn can_parse(&self, input: &str) -> bool {
        let window = probe_window(input);
        let trimmed = window.trim_start();
        // JSON and markup documents are never Turtle
        if trimmed.starts_with('{')
            || trimmed.starts_with("<!")
            || trimmed.starts_with("<?")
            || trimmed.starts_with("<html")
        {
            return false;
        }
        if memmem::find(window.as_bytes(), b"@prefix").is_some()
            || memmem::find(window.as_bytes(), b"@base").is_some()
            || memmem::find(window.as_bytes(), b"PREFIX ").is_some()
            || memmem::find(window.as_bytes(), b"BASE ").is_some()
        {
            return true;
        }
        trimmed.starts_with('<')
            || trimmed.starts_with("_:")
            || trimmed.starts_with('[')
            || trimmed.starts_with('(')
            || trimmed.starts_with('#')
    }

    fn decoder(&self) -> Box<dyn GraphDecoder> {
        Box::new(TurtleDecoder {
            options: self.decoder_options.clone(),
        })
    }

    fn encoder(&self) -> Box<dyn GraphEncoder> {
        Box::new(TurtleEncoder {
            options: self.encoder_options.clone(),
        })
    }
}

/// Decoder instance carrying [`TurtleDecoderOptions`].
#[derive(Debug, Clone)]
pub struct TurtleDecoder {
    options: TurtleDecoderOptions,
}

impl TurtleDecoder {
    /// A decoder with the given options.
    #[must_use]
    pub fn with_options(options: TurtleDecoderOptions) -> Self {
        TurtleDecoder { options }
    }
}

impl GraphDecoder for TurtleDecoder {
    fn convert(&self, input: &str, document_url: Option<&str>) -> Result<Graph> {
        parser::parse_turtle(input, &self.options, document_url)
    }
}

/// Encoder instance carrying [`TurtleEncoderOptions`].
#[derive(Debug, Clone)]
pub struct TurtleEncoder {
    options: TurtleEncoderOptions,
}

impl TurtleEncoder {
    /// An encoder with the given options.
    #[must_use]
    pub fn with_options(options: TurtleEncoderOptions) -> Self {
        TurtleEncoder { options }
    }
}

impl GraphEncoder for TurtleEncoder {
    fn convert(
        &self,
        graph: &Graph,
        base_uri: Option<&str>,
        custom_prefixes: Option<&PrefixMap>,
    ) -> Result<String> {
        encoder::encode_turtle(graph, base_uri, custom_prefixes, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_parse_accepts_turtle_shapes() {
        let codec = TurtleCodec::new();
        assert!(codec.can_parse("@prefix ex: <http://ex/> ."));
        assert!(codec.can_parse("<http://ex/s> <http://ex/p> <http://ex/o> ."));
        assert!(codec.can_parse("_:b <http://ex/p> \"x\" ."));
        assert!(codec.can_parse("# comment\n<http://ex/s> a <http://ex/T> ."));
    }

    #[test]
    fn test_can_parse_rejects_markup_and_json() {
        let codec = TurtleCodec::new();
        assert!(!codec.can_parse("<?xml version=\"1.0\"?><rdf:RDF/>"));
        assert!(!codec.can_parse("<!DOCTYPE html><html></html>"));
        assert!(!codec.can_parse("{\"@context\": {}}"));
    }

    #[test]
    fn test_codec_roundtrip() {
        let codec = TurtleCodec::new();
        let graph = codec
            .decoder()
            .convert(
                "@prefix foaf: <http://xmlns.com/foaf/0.1/> .\n\
                 <http://ex/p1> foaf:name \"Alice\" .",
                None,
            )
            .unwrap();
        let output = codec.encoder().convert(&graph, None, None).unwrap();
        let back = codec.decoder().convert(&output, None).unwrap();
        assert_eq!(graph, back);
    }
}
