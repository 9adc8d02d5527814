//! RDF term types: IRIs, blank nodes, literals, and the term sum types.
//!
//! This module provides the core term algebra for RDF 1.1:
//! - [`Iri`] — an IRI term with validated or trusted construction
//! - [`BlankNode`] — an opaque identity with reference-style equality
//! - [`Literal`] — a lexical value with datatype and optional language tag
//! - [`Term`] — the object-position sum of the three
//! - [`Subject`] — the subject-position sum (IRI or blank node)
//!
//! Terms are immutable after construction. `Display` renders each term in
//! N-Triples syntax, which is also the canonical diagnostic form.
//!
//! # Examples
//!
//! ```ignore
//! use rdfmap::{Iri, Literal, Term};
//!
//! let name = Iri::new("http://xmlns.com/foaf/0.1/name")?;
//! let value = Literal::lang_tagged("Antoine", "fr")?;
//! assert_eq!(value.to_string(), "\"Antoine\"@fr");
//! # Ok::<(), rdfmap::RdfError>(())
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{RdfError, Result};
use crate::vocab::{rdf, xsd};

lazy_static! {
    static ref SCHEME_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").unwrap();
    static ref LANG_TAG_RE: Regex =
        Regex::new(r"^[A-Za-z]{1,8}(-[A-Za-z0-9]{1,8})*$").unwrap();
    static ref INTEGER_LEXICAL_RE: Regex = Regex::new(r"^[+-]?[0-9]+$").unwrap();
    static ref DECIMAL_LEXICAL_RE: Regex = Regex::new(r"^[+-]?[0-9]*\.[0-9]+$").unwrap();
    static ref DOUBLE_LEXICAL_RE: Regex = Regex::new(
        r"^[+-]?([0-9]+\.[0-9]*|\.?[0-9]+)([eE][+-]?[0-9]+)?$"
    )
    .unwrap();
}

/// An IRI term.
///
/// Wraps a non-empty absolute or relative IRI string. Equality is
/// case-sensitive full-string equality.
///
/// Use [`Iri::new`] for validated construction from untrusted input,
/// [`Iri::new_unchecked`] for trusted runtime strings, and
/// [`Iri::from_static`] for `const` construction of vocabulary terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(Cow<'static, str>);

impl Iri {
    /// Create a validated IRI term.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::ConstraintViolation`] if the string is empty or
    /// contains characters forbidden in IRIs (whitespace, angle brackets,
    /// quotes, `{`, `}`, `|`, `^`, `` ` ``, backslash, or control
    /// characters).
    pub fn new(iri: impl Into<String>) -> Result<Self> {
        let iri = iri.into();
        if iri.is_empty() {
            return Err(RdfError::ConstraintViolation(
                "IRI must not be empty".to_string(),
            ));
        }
        if let Some(bad) = iri
            .chars()
            .find(|c| c.is_control() || matches!(c, ' ' | '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\'))
        {
            return Err(RdfError::ConstraintViolation(format!(
                "IRI '{iri}' contains forbidden character {bad:?}"
            )));
        }
        Ok(Iri(Cow::Owned(iri)))
    }

    /// Create an IRI term from a trusted string without validation.
    #[must_use]
    pub fn new_unchecked(iri: impl Into<String>) -> Self {
        Iri(Cow::Owned(iri.into()))
    }

    /// Create an IRI term from a trusted static string.
    ///
    /// Usable in `const` contexts; this is how the [`crate::vocab`]
    /// constants are built.
    #[must_use]
    pub const fn from_static(iri: &'static str) -> Self {
        Iri(Cow::Borrowed(iri))
    }

    /// The IRI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the term and return the IRI string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0.into_owned()
    }

    /// Whether the IRI is absolute, i.e. starts with a scheme.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        SCHEME_RE.is_match(&self.0)
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Whether a string is a syntactically plausible absolute IRI (has a scheme).
#[must_use]
pub(crate) fn has_scheme(s: &str) -> bool {
    SCHEME_RE.is_match(s)
}

/// Whether a string is a well-formed BCP-47-style language tag.
#[must_use]
pub(crate) fn is_valid_language_tag(s: &str) -> bool {
    LANG_TAG_RE.is_match(s)
}

static NEXT_BLANK_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// A blank node term.
///
/// Blank nodes are opaque identities: two blank nodes are equal iff they
/// originate from the same [`BlankNode::new`] call (clones share identity).
/// Labels seen in serialized documents are scoped to one codec invocation
/// and never participate in equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankNode {
    id: u64,
}

impl BlankNode {
    /// Create a blank node with a fresh, process-unique identity.
    #[must_use]
    pub fn new() -> Self {
        BlankNode {
            id: NEXT_BLANK_NODE_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// The internal identity, used for deterministic ordering of blank
    /// nodes within one encoding pass.
    #[must_use]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }
}

impl Default for BlankNode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:g{}", self.id)
    }
}

/// A literal term.
///
/// Carries a lexical value, a datatype IRI (defaulting to `xsd:string`),
/// and an optional language tag. A language-tagged literal always has the
/// datatype `rdf:langString`; constructing any other combination fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    value: String,
    datatype: Iri,
    language: Option<String>,
}

impl Literal {
    /// Create a plain `xsd:string` literal.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Literal {
            value: value.into(),
            datatype: xsd::STRING,
            language: None,
        }
    }

    /// Create a typed literal.
    #[must_use]
    pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
        Literal {
            value: value.into(),
            datatype,
            language: None,
        }
    }

    /// Create a language-tagged literal with datatype `rdf:langString`.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::ConstraintViolation`] if the language tag is not
    /// well formed.
    pub fn lang_tagged(value: impl Into<String>, language: impl Into<String>) -> Result<Self> {
        let language = language.into();
        if !is_valid_language_tag(&language) {
            return Err(RdfError::ConstraintViolation(format!(
                "'{language}' is not a well-formed language tag"
            )));
        }
        Ok(Literal {
            value: value.into(),
            datatype: rdf::LANG_STRING,
            language: Some(language),
        })
    }

    /// Create a literal from explicit parts, enforcing the language-tag
    /// invariant.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::ConstraintViolation`] when a language tag is
    /// combined with a datatype other than `rdf:langString`, or when the
    /// language tag is malformed.
    pub fn try_with(
        value: impl Into<String>,
        datatype: Option<Iri>,
        language: Option<String>,
    ) -> Result<Self> {
        match (datatype, language) {
            (Some(datatype), Some(language)) => {
                if datatype != rdf::LANG_STRING {
                    return Err(RdfError::ConstraintViolation(format!(
                        "language tag '{language}' cannot be combined with datatype {datatype}"
                    )));
                }
                Self::lang_tagged(value, language)
            }
            (None, Some(language)) => Self::lang_tagged(value, language),
            (Some(datatype), None) => {
                if datatype == rdf::LANG_STRING {
                    return Err(RdfError::ConstraintViolation(
                        "rdf:langString literal requires a language tag".to_string(),
                    ));
                }
                Ok(Self::typed(value, datatype))
            }
            (None, None) => Ok(Self::new(value)),
        }
    }

    /// Create an `xsd:integer` literal.
    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        Literal::typed(value.to_string(), xsd::INTEGER)
    }

    /// Create an `xsd:double` literal.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        Literal::typed(value.to_string(), xsd::DOUBLE)
    }

    /// Create an `xsd:boolean` literal.
    #[must_use]
    pub fn from_bool(value: bool) -> Self {
        Literal::typed(value.to_string(), xsd::BOOLEAN)
    }

    /// The lexical value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The datatype IRI.
    #[must_use]
    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }

    /// The language tag, if any.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Interpret the literal as an integer if its datatype is a numeric
    /// integer type and the lexical form is canonical.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        if self.datatype == xsd::INTEGER || self.datatype == xsd::INT || self.datatype == xsd::LONG
        {
            self.value.parse().ok()
        } else {
            None
        }
    }

    /// Interpret the literal as a float if its datatype is `xsd:double` or
    /// `xsd:decimal`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        if self.datatype == xsd::DOUBLE || self.datatype == xsd::DECIMAL {
            self.value.parse().ok()
        } else {
            None
        }
    }

    /// Interpret the literal as a boolean if its datatype is `xsd:boolean`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if self.datatype == xsd::BOOLEAN {
            match self.value.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            }
        } else {
            None
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_literal_value(&self.value))?;
        if let Some(language) = &self.language {
            write!(f, "@{language}")
        } else if self.datatype != xsd::STRING {
            write!(f, "^^{}", self.datatype)
        } else {
            Ok(())
        }
    }
}

/// Escape a literal value for double-quoted N-Triples/Turtle output.
#[must_use]
pub(crate) fn escape_literal_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// A term admissible in subject position: an IRI or a blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subject {
    /// An IRI subject.
    Iri(Iri),
    /// A blank-node subject.
    BlankNode(BlankNode),
}

impl Subject {
    /// The IRI, if this subject is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Subject::Iri(iri) => Some(iri),
            Subject::BlankNode(_) => None,
        }
    }

    /// The blank node, if this subject is one.
    #[must_use]
    pub fn as_blank_node(&self) -> Option<&BlankNode> {
        match self {
            Subject::Iri(_) => None,
            Subject::BlankNode(node) => Some(node),
        }
    }

    /// Whether this subject is a blank node.
    #[must_use]
    pub fn is_blank_node(&self) -> bool {
        matches!(self, Subject::BlankNode(_))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Iri(iri) => iri.fmt(f),
            Subject::BlankNode(node) => node.fmt(f),
        }
    }
}

impl From<Iri> for Subject {
    fn from(iri: Iri) -> Self {
        Subject::Iri(iri)
    }
}

impl From<BlankNode> for Subject {
    fn from(node: BlankNode) -> Self {
        Subject::BlankNode(node)
    }
}

/// Any RDF term: admissible in object position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// An IRI term.
    Iri(Iri),
    /// A blank-node term.
    BlankNode(BlankNode),
    /// A literal term.
    Literal(Literal),
}

impl Term {
    /// The IRI, if this term is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The blank node, if this term is one.
    #[must_use]
    pub fn as_blank_node(&self) -> Option<&BlankNode> {
        match self {
            Term::BlankNode(node) => Some(node),
            _ => None,
        }
    }

    /// The literal, if this term is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Whether this term is an IRI.
    #[must_use]
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Whether this term is a blank node.
    #[must_use]
    pub fn is_blank_node(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// Whether this term is a literal.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Convert to a subject if the term is admissible in subject position.
    #[must_use]
    pub fn as_subject(&self) -> Option<Subject> {
        match self {
            Term::Iri(iri) => Some(Subject::Iri(iri.clone())),
            Term::BlankNode(node) => Some(Subject::BlankNode(node.clone())),
            Term::Literal(_) => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => iri.fmt(f),
            Term::BlankNode(node) => node.fmt(f),
            Term::Literal(literal) => literal.fmt(f),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<BlankNode> for Term {
    fn from(node: BlankNode) -> Self {
        Term::BlankNode(node)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

impl From<Subject> for Term {
    fn from(subject: Subject) -> Self {
        match subject {
            Subject::Iri(iri) => Term::Iri(iri),
            Subject::BlankNode(node) => Term::BlankNode(node),
        }
    }
}

impl TryFrom<Term> for Subject {
    type Error = RdfError;

    fn try_from(term: Term) -> Result<Self> {
        match term {
            Term::Iri(iri) => Ok(Subject::Iri(iri)),
            Term::BlankNode(node) => Ok(Subject::BlankNode(node)),
            Term::Literal(literal) => Err(RdfError::ConstraintViolation(format!(
                "literal {literal} cannot appear in subject position"
            ))),
        }
    }
}

/// Lexical-form checks shared by the Turtle and JSON-LD encoders.
pub(crate) mod lexical {
    use super::{DECIMAL_LEXICAL_RE, DOUBLE_LEXICAL_RE, INTEGER_LEXICAL_RE};

    /// Canonical `xsd:integer` lexical form.
    pub(crate) fn is_integer(value: &str) -> bool {
        INTEGER_LEXICAL_RE.is_match(value)
    }

    /// Canonical `xsd:decimal` lexical form (requires a decimal point).
    pub(crate) fn is_decimal(value: &str) -> bool {
        DECIMAL_LEXICAL_RE.is_match(value)
    }

    /// `xsd:double` lexical form; the Turtle shorthand additionally requires
    /// an exponent, which the caller checks.
    pub(crate) fn is_double(value: &str) -> bool {
        DOUBLE_LEXICAL_RE.is_match(value)
    }

    /// `xsd:boolean` shorthand form.
    pub(crate) fn is_boolean(value: &str) -> bool {
        value == "true" || value == "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iri_equality_is_full_string() {
        let a = Iri::new("http://example.org/a").unwrap();
        let b = Iri::new_unchecked("http://example.org/a");
        let c = Iri::new("http://example.org/A").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_iri_rejects_forbidden_characters() {
        assert!(Iri::new("").is_err());
        assert!(Iri::new("http://example.org/a b").is_err());
        assert!(Iri::new("http://example.org/<a>").is_err());
        assert!(Iri::new("http://example.org/\"quoted\"").is_err());
    }

    #[test]
    fn test_iri_absolute_detection() {
        assert!(Iri::new_unchecked("http://example.org/").is_absolute());
        assert!(Iri::new_unchecked("urn:isbn:12345").is_absolute());
        assert!(!Iri::new_unchecked("relative/path").is_absolute());
        assert!(!Iri::new_unchecked("#fragment").is_absolute());
    }

    #[test]
    fn test_blank_nodes_have_reference_equality() {
        let a = BlankNode::new();
        let b = BlankNode::new();
        let a2 = a.clone();
        assert_ne!(a, b);
        assert_eq!(a, a2);
    }

    #[test]
    fn test_plain_literal_defaults_to_xsd_string() {
        let literal = Literal::new("hello");
        assert_eq!(literal.datatype(), &xsd::STRING);
        assert_eq!(literal.language(), None);
    }

    #[test]
    fn test_lang_tagged_literal_uses_lang_string_datatype() {
        let literal = Literal::lang_tagged("bonjour", "fr").unwrap();
        assert_eq!(literal.datatype(), &rdf::LANG_STRING);
        assert_eq!(literal.language(), Some("fr"));
    }

    #[test]
    fn test_language_with_other_datatype_is_a_construction_error() {
        let result = Literal::try_with("x", Some(xsd::STRING), Some("en".to_string()));
        assert!(result.is_err());
        assert!(Literal::try_with("x", Some(rdf::LANG_STRING), None).is_err());

        let tagged = Literal::try_with("x", None, Some("en".to_string())).unwrap();
        assert_eq!(tagged.datatype(), &rdf::LANG_STRING);
        let explicit =
            Literal::try_with("x", Some(rdf::LANG_STRING), Some("en".to_string())).unwrap();
        assert_eq!(explicit.language(), Some("en"));
    }

    #[test]
    fn test_invalid_language_tag_rejected() {
        assert!(Literal::lang_tagged("x", "not a tag").is_err());
        assert!(Literal::lang_tagged("x", "en-US").is_ok());
    }

    #[test]
    fn test_numeric_accessors_require_matching_datatype() {
        assert_eq!(Literal::from_i64(42).as_i64(), Some(42));
        assert_eq!(Literal::new("42").as_i64(), None);
        assert_eq!(Literal::from_bool(true).as_bool(), Some(true));
        assert_eq!(Literal::typed("3.14", xsd::DECIMAL).as_f64(), Some(3.14));
    }

    #[test]
    fn test_display_renders_ntriples_syntax() {
        let iri = Iri::new_unchecked("http://example.org/s");
        assert_eq!(iri.to_string(), "<http://example.org/s>");

        let plain = Literal::new("line\nbreak");
        assert_eq!(plain.to_string(), "\"line\\nbreak\"");

        let typed = Literal::from_i64(7);
        assert_eq!(
            typed.to_string(),
            "\"7\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );

        let tagged = Literal::lang_tagged("hi", "en").unwrap();
        assert_eq!(tagged.to_string(), "\"hi\"@en");
    }

    #[test]
    fn test_literal_cannot_be_subject() {
        let term = Term::Literal(Literal::new("x"));
        assert!(Subject::try_from(term).is_err());
    }
}
