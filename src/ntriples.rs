//! N-Triples 1.1 codec.
//!
//! Line-oriented: one triple per line, absolute IRIs in angle brackets,
//! `_:label` blank nodes, literals with optional `^^<datatype>` or
//! `@lang`, terminated by `.`. Decoding reuses the Turtle lexer with all
//! leniency flags off; Turtle-only constructs are rejected.
//!
//! Encoding assigns blank-node labels `b0, b1, …` in first-encounter
//! order, stable across repeated appearances of the same node within one
//! encode call. Canonical mode deduplicates statements and sorts them
//! over their serialized form, so equal graphs produce byte-identical
//! output.

use std::collections::HashMap;

use crate::codec::{probe_window, GraphCodec, GraphDecoder, GraphEncoder};
use crate::error::{RdfError, Result};
use crate::graph::Graph;
use crate::prefix::PrefixMap;
use crate::term::{BlankNode, Iri, Literal, Subject, Term};
use crate::triple::{GraphName, Triple};
use crate::turtle::lexer::{Token, TurtleLexer, TurtleLexerFlags};

/// Options for the N-Triples and N-Quads encoders.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct NTriplesEncoderOptions {
    /// Deduplicate statements and sort them lexicographically over their
    /// serialized form.
    pub canonical: bool,
}

/// Assigns stable sequential labels to blank nodes within one encode call.
#[derive(Debug, Default)]
pub(crate) struct BlankNodeLabeler {
    labels: HashMap<BlankNode, usize>,
}

impl BlankNodeLabeler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn label(&mut self, node: &BlankNode) -> String {
        let next = self.labels.len();
        let index = *self.labels.entry(node.clone()).or_insert(next);
        format!("_:b{index}")
    }

    pub(crate) fn render_subject(&mut self, subject: &Subject) -> String {
        match subject {
            Subject::Iri(iri) => iri.to_string(),
            Subject::BlankNode(node) => self.label(node),
        }
    }

    pub(crate) fn render_term(&mut self, term: &Term) -> String {
        match term {
            Term::Iri(iri) => iri.to_string(),
            Term::BlankNode(node) => self.label(node),
            Term::Literal(literal) => literal.to_string(),
        }
    }
}

/// Render a graph as N-Triples lines.
pub(crate) fn encode_ntriples(graph: &Graph, options: &NTriplesEncoderOptions) -> String {
    let mut labeler = BlankNodeLabeler::new();
    let mut triples: Vec<&Triple> = graph.triples().collect();
    if options.canonical {
        triples.sort_by(triple_sort_key);
    }
    let mut lines: Vec<String> = triples
        .into_iter()
        .map(|triple| {
            format!(
                "{} {} {} .",
                labeler.render_subject(&triple.subject),
                triple.predicate,
                labeler.render_term(&triple.object)
            )
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

/// Label-independent ordering so canonical label assignment is stable for
/// equal graphs regardless of insertion order.
pub(crate) fn triple_sort_key(a: &&Triple, b: &&Triple) -> std::cmp::Ordering {
    let subject = a.subject.cmp(&b.subject);
    let predicate = a.predicate.cmp(&b.predicate);
    subject.then(predicate).then_with(|| term_order(&a.object, &b.object))
}

fn term_order(a: &Term, b: &Term) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Term::Iri(x), Term::Iri(y)) => x.cmp(y),
        (Term::BlankNode(x), Term::BlankNode(y)) => x.cmp(y),
        (Term::Literal(x), Term::Literal(y)) => x.to_string().cmp(&y.to_string()),
        (Term::Iri(_), _) => Ordering::Less,
        (_, Term::Iri(_)) => Ordering::Greater,
        (Term::Literal(_), Term::BlankNode(_)) => Ordering::Less,
        (Term::BlankNode(_), Term::Literal(_)) => Ordering::Greater,
    }
}

/// Statement parser shared by the N-Triples and N-Quads decoders.
#[derive(Debug)]
pub(crate) struct LineStatementParser {
    lexer: TurtleLexer,
    blank_nodes: HashMap<String, BlankNode>,
    allow_graph_name: bool,
}

impl LineStatementParser {
    pub(crate) fn new(input: &str, allow_graph_name: bool) -> Self {
        LineStatementParser {
            lexer: TurtleLexer::new(input, TurtleLexerFlags::strict()),
            blank_nodes: HashMap::new(),
            allow_graph_name,
        }
    }

    /// The next statement, or `None` at end of input.
    pub(crate) fn next_statement(&mut self) -> Result<Option<(Triple, Option<GraphName>)>> {
        let token = self.lexer.next_token()?;
        let subject = match token.token {
            Token::Eof => return Ok(None),
            Token::Iri(iri) => Subject::Iri(self.absolute_iri(&iri, token.line, token.column)?),
            Token::BlankNodeLabel(label) => Subject::BlankNode(self.blank_node(&label)),
            other => {
                return Err(RdfError::syntax(
                    format!("expected subject, found {}", other.describe()),
                    token.line,
                    token.column,
                ));
            }
        };

        let token = self.lexer.next_token()?;
        let predicate = match token.token {
            Token::Iri(iri) => self.absolute_iri(&iri, token.line, token.column)?,
            Token::BlankNodeLabel(_) => {
                return Err(RdfError::ConstraintViolation(
                    "blank node cannot be used in predicate position".to_string(),
                ));
            }
            other => {
                return Err(RdfError::syntax(
                    format!("expected predicate IRI, found {}", other.describe()),
                    token.line,
                    token.column,
                ));
            }
        };

        let token = self.lexer.next_token()?;
        let object = match token.token {
            Token::Iri(iri) => Term::Iri(self.absolute_iri(&iri, token.line, token.column)?),
            Token::BlankNodeLabel(label) => Term::BlankNode(self.blank_node(&label)),
            Token::StringLiteral(value) => self.literal_suffix(value)?,
            other => {
                return Err(RdfError::syntax(
                    format!("expected object term, found {}", other.describe()),
                    token.line,
                    token.column,
                ));
            }
        };

        let mut graph_name = None;
        let token = self.lexer.next_token()?;
        let token = if self.allow_graph_name {
            match token.token {
                Token::Iri(iri) => {
                    graph_name =
                        Some(GraphName::Iri(self.absolute_iri(&iri, token.line, token.column)?));
                    self.lexer.next_token()?
                }
                Token::BlankNodeLabel(label) => {
                    graph_name = Some(GraphName::BlankNode(self.blank_node(&label)));
                    self.lexer.next_token()?
                }
                _ => token,
            }
        } else {
            token
        };
        if token.token != Token::Dot {
            return Err(RdfError::syntax(
                format!("expected '.', found {}", token.token.describe()),
                token.line,
                token.column,
            ));
        }

        Ok(Some((
            Triple::new(subject, predicate, object),
            graph_name,
        )))
    }

    fn literal_suffix(&mut self, value: String) -> Result<Term> {
        match self.lexer.peek_token()?.token.clone() {
            Token::LangTag(tag) => {
                self.lexer.next_token()?;
                Ok(Term::Literal(Literal::lang_tagged(value, tag)?))
            }
            Token::DatatypeMarker => {
                self.lexer.next_token()?;
                let token = self.lexer.next_token()?;
                match token.token {
                    Token::Iri(iri) => {
                        let datatype = self.absolute_iri(&iri, token.line, token.column)?;
                        Ok(Term::Literal(Literal::try_with(value, Some(datatype), None)?))
                    }
                    other => Err(RdfError::syntax(
                        format!("expected datatype IRI, found {}", other.describe()),
                        token.line,
                        token.column,
                    )),
                }
            }
            _ => Ok(Term::Literal(Literal::new(value))),
        }
    }

    fn blank_node(&mut self, label: &str) -> BlankNode {
        self.blank_nodes
            .entry(label.to_string())
            .or_insert_with(BlankNode::new)
            .clone()
    }

    fn absolute_iri(&self, text: &str, line: usize, column: usize) -> Result<Iri> {
        if !crate::term::has_scheme(text) {
            return Err(RdfError::syntax(
                format!("relative IRI <{text}> is not allowed here"),
                line,
                column,
            ));
        }
        Iri::new(text)
    }
}

/// Probe shared by the line-oriented codecs: every complete line is
/// blank, a comment, or a statement starting with `<` or `_:` and ending
/// with `.`.
pub(crate) fn looks_line_oriented(input: &str) -> bool {
    let window = probe_window(input);
    let truncated = window.len() < input.len();
    let mut lines = window.lines().peekable();
    let mut seen_statement = false;
    while let Some(line) = lines.next() {
        // the final line of a truncated window may be incomplete
        if truncated && lines.peek().is_none() {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if !(trimmed.starts_with('<') || trimmed.starts_with("_:")) || !trimmed.ends_with('.') {
            return false;
        }
        seen_statement = true;
    }
    seen_statement
}

/// The N-Triples codec.
#[derive(Debug, Clone, Default)]
pub struct NTriplesCodec {
    encoder_options: NTriplesEncoderOptions,
}

impl NTriplesCodec {
    /// A codec with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec in canonical mode: sorted, deduplicated output.
    #[must_use]
    pub fn canonical() -> Self {
        NTriplesCodec {
            encoder_options: NTriplesEncoderOptions { canonical: true },
        }
    }

    /// A codec with custom encoder options.
    #[must_use]
    pub fn with_options(encoder: NTriplesEncoderOptions) -> Self {
        NTriplesCodec {
            encoder_options: encoder,
        }
    }
}

impl GraphCodec for NTriplesCodec {
    fn primary_mime_type(&self) -> &'static str {
        "application/n-triples"
    }

    fn supported_mime_types(&self) -> &'static [&'static str] {
        &["application/n-triples", "text/plain"]
    }

    fn can_parse(&self, input: &str) -> bool {
        looks_line_oriented(input)
    }

    fn decoder(&self) -> Box<dyn GraphDecoder> {
        Box::new(NTriplesDecoder)
    }

    fn encoder(&self) -> Box<dyn GraphEncoder> {
        Box::new(NTriplesEncoder {
            options: self.encoder_options,
        })
    }
}

/// N-Triples decoder.
#[derive(Debug, Clone)]
pub struct NTriplesDecoder;

impl GraphDecoder for NTriplesDecoder {
    fn convert(&self, input: &str, _document_url: Option<&str>) -> Result<Graph> {
        let mut parser = LineStatementParser::new(input, false);
        let mut triples = Vec::new();
        while let Some((triple, _)) = parser.next_statement()? {
            triples.push(triple);
        }
        Ok(Graph::from_triples(triples))
    }
}

/// N-Triples encoder.
#[derive(Debug, Clone)]
pub struct NTriplesEncoder {
    options: NTriplesEncoderOptions,
}

impl GraphEncoder for NTriplesEncoder {
    fn convert(
        &self,
        graph: &Graph,
        _base_uri: Option<&str>,
        _custom_prefixes: Option<&PrefixMap>,
    ) -> Result<String> {
        Ok(encode_ntriples(graph, &self.options))
    }
}
