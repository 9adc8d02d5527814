//! Recursive-descent parser building a [`Graph`] from Turtle tokens.

use std::collections::HashMap;

use crate::error::{RdfError, Result};
use crate::graph::Graph;
use crate::iri;
use crate::prefix::PrefixMap;
use crate::term::{has_scheme, BlankNode, Iri, Literal, Subject, Term};
use crate::triple::Triple;
use crate::vocab::{rdf, xsd};

use super::lexer::{PositionedToken, Token, TurtleLexer, TurtleLexerFlags};

/// Options for the Turtle decoder.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TurtleDecoderOptions {
    /// Lexer leniency flags; strict by default.
    pub flags: TurtleLexerFlags,
    /// Base IRI used to resolve relative references when the document does
    /// not declare one. The decoder's `document_url` argument fills this
    /// role when unset.
    pub base_uri: Option<String>,
}

/// Parse a Turtle document into a graph.
pub(crate) fn parse_turtle(
    input: &str,
    options: &TurtleDecoderOptions,
    document_url: Option<&str>,
) -> Result<Graph> {
    let base = options
        .base_uri
        .clone()
        .or_else(|| document_url.map(str::to_string));
    let mut parser = TurtleParser {
        lexer: TurtleLexer::new(input, options.flags),
        prefixes: PrefixMap::new(),
        defaults: PrefixMap::with_defaults(),
        base,
        blank_nodes: HashMap::new(),
        triples: Vec::new(),
        flags: options.flags,
    };
    parser.parse_document()?;
    Ok(Graph::from_triples(parser.triples))
}

struct TurtleParser {
    lexer: TurtleLexer,
    prefixes: PrefixMap,
    defaults: PrefixMap,
    base: Option<String>,
    blank_nodes: HashMap<String, BlankNode>,
    triples: Vec<Triple>,
    flags: TurtleLexerFlags,
}

impl TurtleParser {
    fn parse_document(&mut self) -> Result<()> {
        loop {
            let next = self.lexer.peek_token()?.clone();
            match next.token {
                Token::Eof => return Ok(()),
                Token::PrefixDecl { .. } | Token::BaseDecl { .. } => {
                    self.parse_directive()?;
                }
                _ => self.parse_statement()?,
            }
        }
    }

    fn parse_directive(&mut self) -> Result<()> {
        let token = self.lexer.next_token()?;
        let sparql_style = match token.token {
            Token::PrefixDecl {
                prefix,
                iri,
                sparql_style,
            } => {
                let namespace = self.resolve_iri(&iri)?;
                self.prefixes.insert(prefix, namespace.into_string());
                sparql_style
            }
            Token::BaseDecl { iri, sparql_style } => {
                let base = self.resolve_iri(&iri)?;
                self.base = Some(base.into_string());
                sparql_style
            }
            other => {
                return Err(RdfError::syntax(
                    format!("expected directive, found {}", other.describe()),
                    token.line,
                    token.column,
                ));
            }
        };

        // SPARQL-style directives take no terminator
        if sparql_style {
            return Ok(());
        }
        if self.lexer.peek_token()?.token == Token::Dot {
            self.lexer.next_token()?;
            return Ok(());
        }
        if self.flags.allow_missing_dot_after_prefix {
            return Ok(());
        }
        let next = self.lexer.peek_token()?.clone();
        Err(RdfError::syntax(
            format!("expected '.' after directive, found {}", next.token.describe()),
            next.line,
            next.column,
        ))
    }

    fn parse_statement(&mut self) -> Result<()> {
        let (subject, from_property_list) = self.parse_subject()?;

        // `[ p o ] .` is a complete statement
        if from_property_list && self.lexer.peek_token()?.token == Token::Dot {
            self.lexer.next_token()?;
            return Ok(());
        }

        self.parse_predicate_object_list(&subject)?;
        self.expect_statement_terminator()
    }

    fn expect_statement_terminator(&mut self) -> Result<()> {
        let next = self.lexer.peek_token()?.clone();
        match next.token {
            Token::Dot => {
                self.lexer.next_token()?;
                Ok(())
            }
            Token::Eof
                if self.flags.allow_missing_final_dot
                    || self.flags.allow_missing_dot_after_prefix =>
            {
                Ok(())
            }
            other => Err(RdfError::syntax(
                format!("expected '.', found {}", other.describe()),
                next.line,
                next.column,
            )),
        }
    }

    fn parse_subject(&mut self) -> Result<(Subject, bool)> {
        let token = self.lexer.next_token()?;
        match token.token {
            Token::Iri(iri) => Ok((Subject::Iri(self.resolve_iri(&iri)?), false)),
            Token::PrefixedName { ref prefix, ref local } => Ok((
                Subject::Iri(self.expand_prefixed(prefix, local, &token)?),
                false,
            )),
            Token::BlankNodeLabel(label) => {
                Ok((Subject::BlankNode(self.blank_node_for_label(&label)), false))
            }
            Token::BracketOpen => {
                let node = self.parse_blank_node_property_list()?;
                Ok((Subject::BlankNode(node), true))
            }
            Token::CollectionOpen => {
                let head = self.parse_collection()?;
                let subject = Subject::try_from(head)?;
                Ok((subject, false))
            }
            other => Err(RdfError::syntax(
                format!("{} cannot start a statement", other.describe()),
                token.line,
                token.column,
            )),
        }
    }

    fn parse_predicate_object_list(&mut self, subject: &Subject) -> Result<()> {
        loop {
            let predicate = self.parse_predicate()?;
            self.parse_object_list(subject, &predicate)?;

            if self.lexer.peek_token()?.token != Token::Semicolon {
                return Ok(());
            }
            // consume separators; a trailing ';' before the terminator is legal
            while self.lexer.peek_token()?.token == Token::Semicolon {
                self.lexer.next_token()?;
            }
            if matches!(
                self.lexer.peek_token()?.token,
                Token::Dot | Token::BracketClose | Token::Eof
            ) {
                return Ok(());
            }
        }
    }

    fn parse_predicate(&mut self) -> Result<Iri> {
        let token = self.lexer.next_token()?;
        match token.token {
            Token::A => Ok(rdf::TYPE),
            Token::Iri(iri) => self.resolve_iri(&iri),
            Token::PrefixedName { ref prefix, ref local } => {
                self.expand_prefixed(prefix, local, &token)
            }
            Token::BlankNodeLabel(_) | Token::BracketOpen => Err(
                RdfError::ConstraintViolation(
                    "blank node cannot be used in predicate position".to_string(),
                ),
            ),
            other => Err(RdfError::syntax(
                format!("expected predicate, found {}", other.describe()),
                token.line,
                token.column,
            )),
        }
    }

    fn parse_object_list(&mut self, subject: &Subject, predicate: &Iri) -> Result<()> {
        loop {
            let object = self.parse_object()?;
            self.triples
                .push(Triple::new(subject.clone(), predicate.clone(), object));
            if self.lexer.peek_token()?.token == Token::Comma {
                self.lexer.next_token()?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_object(&mut self) -> Result<Term> {
        let token = self.lexer.next_token()?;
        match token.token {
            Token::Iri(iri) => Ok(Term::Iri(self.resolve_iri(&iri)?)),
            Token::PrefixedName { ref prefix, ref local } => {
                Ok(Term::Iri(self.expand_prefixed(prefix, local, &token)?))
            }
            Token::BlankNodeLabel(label) => {
                Ok(Term::BlankNode(self.blank_node_for_label(&label)))
            }
            Token::StringLiteral(value) => self.parse_literal_suffix(value),
            Token::Integer(text) => Ok(Term::Literal(Literal::typed(text, xsd::INTEGER))),
            Token::Decimal(text) => Ok(Term::Literal(Literal::typed(text, xsd::DECIMAL))),
            Token::Double(text) => Ok(Term::Literal(Literal::typed(text, xsd::DOUBLE))),
            Token::Boolean(value) => Ok(Term::Literal(Literal::from_bool(value))),
            Token::BracketOpen => Ok(Term::BlankNode(self.parse_blank_node_property_list()?)),
            Token::CollectionOpen => self.parse_collection(),
            other => Err(RdfError::syntax(
                format!("expected object, found {}", other.describe()),
                token.line,
                token.column,
            )),
        }
    }

    fn parse_literal_suffix(&mut self, value: String) -> Result<Term> {
        match self.lexer.peek_token()?.token.clone() {
            Token::LangTag(tag) => {
                self.lexer.next_token()?;
                Ok(Term::Literal(Literal::lang_tagged(value, tag)?))
            }
            Token::DatatypeMarker => {
                self.lexer.next_token()?;
                let token = self.lexer.next_token()?;
                let datatype = match token.token {
                    Token::Iri(iri) => self.resolve_iri(&iri)?,
                    Token::PrefixedName { ref prefix, ref local } => {
                        self.expand_prefixed(prefix, local, &token)?
                    }
                    other => {
                        return Err(RdfError::syntax(
                            format!("expected datatype IRI, found {}", other.describe()),
                            token.line,
                            token.column,
                        ));
                    }
                };
                Ok(Term::Literal(Literal::try_with(value, Some(datatype), None)?))
            }
            _ => Ok(Term::Literal(Literal::new(value))),
        }
    }

    /// `[ … ]`: a fresh blank node carrying the bracketed predicates.
    fn parse_blank_node_property_list(&mut self) -> Result<BlankNode> {
        let node = BlankNode::new();
        if self.lexer.peek_token()?.token != Token::BracketClose {
            let subject = Subject::BlankNode(node.clone());
            self.parse_predicate_object_list(&subject)?;
        }
        let token = self.lexer.next_token()?;
        if token.token != Token::BracketClose {
            return Err(RdfError::syntax(
                format!("expected ']', found {}", token.token.describe()),
                token.line,
                token.column,
            ));
        }
        Ok(node)
    }

    /// `( … )`: an rdf:first/rdf:rest chain; the empty collection is
    /// `rdf:nil` itself.
    fn parse_collection(&mut self) -> Result<Term> {
        let mut items = Vec::new();
        loop {
            if self.lexer.peek_token()?.token == Token::CollectionClose {
                self.lexer.next_token()?;
                break;
            }
            items.push(self.parse_object()?);
        }

        if items.is_empty() {
            return Ok(Term::Iri(rdf::NIL));
        }

        let nodes: Vec<BlankNode> = items.iter().map(|_| BlankNode::new()).collect();
        for (index, (node, item)) in nodes.iter().zip(items).enumerate() {
            self.triples.push(Triple::new(
                Subject::BlankNode(node.clone()),
                rdf::FIRST,
                item,
            ));
            let rest: Term = match nodes.get(index + 1) {
                Some(next) => Term::BlankNode(next.clone()),
                None => Term::Iri(rdf::NIL),
            };
            self.triples.push(Triple::new(
                Subject::BlankNode(node.clone()),
                rdf::REST,
                rest,
            ));
        }
        Ok(Term::BlankNode(nodes[0].clone()))
    }

    // ---- term helpers ------------------------------------------------------

    fn blank_node_for_label(&mut self, label: &str) -> BlankNode {
        self.blank_nodes
            .entry(label.to_string())
            .or_insert_with(BlankNode::new)
            .clone()
    }

    fn resolve_iri(&self, text: &str) -> Result<Iri> {
        if has_scheme(text) {
            return Iri::new(text);
        }
        let resolved = iri::resolve(self.base.as_deref(), text)?;
        Iri::new(resolved)
    }

    fn expand_prefixed(&self, prefix: &str, local: &str, token: &PositionedToken) -> Result<Iri> {
        if let Some(iri) = self.prefixes.expand(prefix, local) {
            return Ok(iri);
        }
        if self.flags.auto_add_common_prefixes {
            if let Some(iri) = self.defaults.expand(prefix, local) {
                return Ok(iri);
            }
        }
        Err(RdfError::syntax(
            format!("unknown prefix '{prefix}:'"),
            token.line,
            token.column,
        ))
    }
}
