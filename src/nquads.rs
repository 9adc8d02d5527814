//! N-Quads 1.1 dataset codec.
//!
//! The dataset-codec mirror of [`crate::ntriples`]: one statement per
//! line with an optional fourth graph-name term before the terminating
//! `.`. Shares the strict Turtle lexer and the blank-node label policy,
//! including canonical mode.

use crate::codec::{DatasetCodec, DatasetDecoder, DatasetEncoder};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::ntriples::{
    looks_line_oriented, triple_sort_key, BlankNodeLabeler, LineStatementParser,
    NTriplesEncoderOptions,
};
use crate::prefix::PrefixMap;
use crate::triple::Quad;

/// The N-Quads codec.
#[derive(Debug, Clone, Default)]
pub struct NQuadsCodec {
    encoder_options: NTriplesEncoderOptions,
}

impl NQuadsCodec {
    /// A codec with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec in canonical mode: sorted, deduplicated output.
    #[must_use]
    pub fn canonical() -> Self {
        NQuadsCodec {
            encoder_options: NTriplesEncoderOptions { canonical: true },
        }
    }

    /// A codec with custom encoder options.
    #[must_use]
    pub fn with_options(encoder: NTriplesEncoderOptions) -> Self {
        NQuadsCodec {
            encoder_options: encoder,
        }
    }
}

impl DatasetCodec for NQuadsCodec {
    fn primary_mime_type(&self) -> &'static str {
        "application/n-quads"
    }

    fn supported_mime_types(&self) -> &'static [&'static str] {
        &["application/n-quads"]
    }

    fn can_parse(&self, input: &str) -> bool {
        looks_line_oriented(input)
    }

    fn decoder(&self) -> Box<dyn DatasetDecoder> {
        Box::new(NQuadsDecoder)
    }

    fn encoder(&self) -> Box<dyn DatasetEncoder> {
        Box::new(NQuadsEncoder {
            options: self.encoder_options,
        })
    }
}

/// N-Quads decoder.
#[derive(Debug, Clone)]
pub struct NQuadsDecoder;

impl DatasetDecoder for NQuadsDecoder {
    fn convert(&self, input: &str, _document_url: Option<&str>) -> Result<Dataset> {
        let mut parser = LineStatementParser::new(input, true);
        let mut quads = Vec::new();
        while let Some((triple, graph_name)) = parser.next_statement()? {
            quads.push(triple.in_graph(graph_name));
        }
        Ok(Dataset::from_quads(quads))
    }
}

/// N-Quads encoder.
#[derive(Debug, Clone)]
pub struct NQuadsEncoder {
    options: NTriplesEncoderOptions,
}

impl DatasetEncoder for NQuadsEncoder {
    fn convert(
        &self,
        dataset: &Dataset,
        _base_uri: Option<&str>,
        _custom_prefixes: Option<&PrefixMap>,
    ) -> Result<String> {
        Ok(encode_nquads(dataset, &self.options))
    }
}

pub(crate) fn encode_nquads(dataset: &Dataset, options: &NTriplesEncoderOptions) -> String {
    let mut labeler = BlankNodeLabeler::new();
    let mut quads: Vec<Quad> = dataset.quads();
    if options.canonical {
        quads.sort_by(|a, b| {
            let graph = a.graph_name.cmp(&b.graph_name);
            let ta = a.triple();
            let tb = b.triple();
            graph.then_with(|| triple_sort_key(&&ta, &&tb))
        });
    }
    let mut lines: Vec<String> = quads
        .iter()
        .map(|quad| {
            let triple_part = format!(
                "{} {} {}",
                labeler.render_subject(&quad.subject),
                quad.predicate,
                labeler.render_term(&quad.object)
            );
            match &quad.graph_name {
                Some(name) => format!("{triple_part} {} .", labeler.render_subject(name)),
                None => format!("{triple_part} ."),
            }
        })
        .collect();
    if options.canonical {
        lines.sort();
        lines.dedup();
    }
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
