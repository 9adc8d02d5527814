//! Hand-written token scanner for Turtle documents.
//!
//! The lexer produces [`Token`]s with line/column positions and supports a
//! set of opt-in [leniency flags](TurtleLexerFlags) for real-world input.
//! All flags are off by default, which yields strict Turtle 1.1 tokens;
//! the same scanner with strict flags underlies the N-Triples and N-Quads
//! codecs.
//!
//! A PN_LOCAL constraint makes one backtracking case necessary: a local
//! name cannot end with `.`, so a trailing dot is pushed back into the
//! stream as the statement terminator.

use std::collections::VecDeque;

use crate::error::{RdfError, Result};
use crate::term::is_valid_language_tag;

/// A lexical token of the Turtle grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `@prefix p: <iri>` or SPARQL-style `PREFIX p: <iri>`.
    PrefixDecl {
        /// Declared prefix, without the trailing colon. May be empty.
        prefix: String,
        /// Namespace IRI, still unresolved.
        iri: String,
        /// Whether the SPARQL spelling (no `@`, no terminating dot) was used.
        sparql_style: bool,
    },
    /// `@base <iri>` or SPARQL-style `BASE <iri>`.
    BaseDecl {
        /// Base IRI, still unresolved.
        iri: String,
        /// Whether the SPARQL spelling was used.
        sparql_style: bool,
    },
    /// `<iri>`, with escape sequences already decoded.
    Iri(String),
    /// `prefix:local`, split at the first colon.
    PrefixedName {
        /// The prefix part; may be empty (`:local`).
        prefix: String,
        /// The local part; may be empty (`prefix:`) and may contain colons.
        local: String,
    },
    /// `_:label`.
    BlankNodeLabel(String),
    /// `[`.
    BracketOpen,
    /// `]`.
    BracketClose,
    /// `(`.
    CollectionOpen,
    /// `)`.
    CollectionClose,
    /// A quoted string with escapes decoded; quoting style is not retained.
    StringLiteral(String),
    /// `^^`.
    DatatypeMarker,
    /// `@tag` after a string literal.
    LangTag(String),
    /// Integer shorthand, e.g. `42`.
    Integer(String),
    /// Decimal shorthand, e.g. `3.14`.
    Decimal(String),
    /// Double shorthand, e.g. `1.2e3`.
    Double(String),
    /// `true` or `false`.
    Boolean(bool),
    /// The `a` keyword (`rdf:type`).
    A,
    /// Statement terminator `.`.
    Dot,
    /// Predicate-list separator `;`.
    Semicolon,
    /// Object-list separator `,`.
    Comma,
    /// End of input.
    Eof,
}

impl Token {
    /// Short description for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Token::PrefixDecl { .. } => "prefix declaration".to_string(),
            Token::BaseDecl { .. } => "base declaration".to_string(),
            Token::Iri(iri) => format!("IRI <{iri}>"),
            Token::PrefixedName { prefix, local } => format!("prefixed name {prefix}:{local}"),
            Token::BlankNodeLabel(label) => format!("blank node _:{label}"),
            Token::BracketOpen => "'['".to_string(),
            Token::BracketClose => "']'".to_string(),
            Token::CollectionOpen => "'('".to_string(),
            Token::CollectionClose => "')'".to_string(),
            Token::StringLiteral(_) => "string literal".to_string(),
            Token::DatatypeMarker => "'^^'".to_string(),
            Token::LangTag(tag) => format!("language tag @{tag}"),
            Token::Integer(v) | Token::Decimal(v) | Token::Double(v) => {
                format!("numeric literal {v}")
            }
            Token::Boolean(v) => format!("boolean literal {v}"),
            Token::A => "'a'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Semicolon => "';'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// A token together with its 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken {
    /// The token.
    pub token: Token,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

/// Opt-in leniency flags for parsing real-world Turtle.
///
/// All flags default to `false`, i.e. strict Turtle 1.1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TurtleLexerFlags {
    /// Accept a digit as the first character of a local name.
    pub allow_digit_in_local_name: bool,
    /// Tolerate a missing `.` terminator after directives and statements
    /// wherever one could legitimately follow.
    pub allow_missing_dot_after_prefix: bool,
    /// Resolve unknown prefixes against the curated default namespace
    /// table instead of failing.
    pub auto_add_common_prefixes: bool,
    /// Accept SPARQL-style `PREFIX` / `BASE` directives, case-insensitive.
    pub allow_prefix_without_at_sign: bool,
    /// Tolerate a missing `.` after the final statement of the document.
    pub allow_missing_final_dot: bool,
    /// Accept bare identifiers without a colon as local names in the
    /// empty prefix.
    pub allow_identifiers_without_colon: bool,
}

impl TurtleLexerFlags {
    /// Strict Turtle 1.1 lexing; every flag off.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Every leniency flag on.
    #[must_use]
    pub fn lenient() -> Self {
        TurtleLexerFlags {
            allow_digit_in_local_name: true,
            allow_missing_dot_after_prefix: true,
            auto_add_common_prefixes: true,
            allow_prefix_without_at_sign: true,
            allow_missing_final_dot: true,
            allow_identifiers_without_colon: true,
        }
    }
}

/// Streaming tokenizer over a Turtle document.
#[derive(Debug)]
pub struct TurtleLexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    flags: TurtleLexerFlags,
    pending: VecDeque<PositionedToken>,
}

impl TurtleLexer {
    /// Create a lexer over the input with the given flags.
    #[must_use]
    pub fn new(input: &str, flags: TurtleLexerFlags) -> Self {
        TurtleLexer {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            flags,
            pending: VecDeque::new(),
        }
    }

    /// The active leniency flags.
    #[must_use]
    pub fn flags(&self) -> &TurtleLexerFlags {
        &self.flags
    }

    /// Consume and return the next token.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::Syntax`] with the offending position on any
    /// lexical error.
    pub fn next_token(&mut self) -> Result<PositionedToken> {
        if let Some(token) = self.pending.pop_front() {
            return Ok(token);
        }
        self.scan_token()
    }

    /// Look at the next token without consuming it.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::Syntax`] on any lexical error.
    pub fn peek_token(&mut self) -> Result<&PositionedToken> {
        if self.pending.is_empty() {
            let token = self.scan_token()?;
            // scan_token may have queued pushed-back dots; the scanned token
            // precedes them
            self.pending.push_front(token);
        }
        Ok(self.pending.front().expect("pending non-empty"))
    }

    fn scan_token(&mut self) -> Result<PositionedToken> {
        self.skip_whitespace_and_comments();
        let (line, column) = (self.line, self.column);
        let at = |token| PositionedToken {
            token,
            line,
            column,
        };

        let Some(c) = self.peek_char() else {
            return Ok(at(Token::Eof));
        };

        match c {
            '@' => self.scan_at_directive_or_lang_tag(line, column),
            '<' => {
                let iri = self.scan_iri_ref()?;
                Ok(at(Token::Iri(iri)))
            }
            '"' | '\'' => {
                let value = self.scan_string(c)?;
                Ok(at(Token::StringLiteral(value)))
            }
            '(' => {
                self.advance();
                Ok(at(Token::CollectionOpen))
            }
            ')' => {
                self.advance();
                Ok(at(Token::CollectionClose))
            }
            '[' => {
                self.advance();
                Ok(at(Token::BracketOpen))
            }
            ']' => {
                self.advance();
                Ok(at(Token::BracketClose))
            }
            ';' => {
                self.advance();
                Ok(at(Token::Semicolon))
            }
            ',' => {
                self.advance();
                Ok(at(Token::Comma))
            }
            '^' => {
                self.advance();
                if self.peek_char() == Some('^') {
                    self.advance();
                    Ok(at(Token::DatatypeMarker))
                } else {
                    Err(self.error_here("expected '^^'"))
                }
            }
            '.' => {
                if self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit()) {
                    let token = self.scan_numeric()?;
                    Ok(at(token))
                } else {
                    self.advance();
                    Ok(at(Token::Dot))
                }
            }
            '_' if self.peek_char_at(1) == Some(':') => {
                let label = self.scan_blank_node_label()?;
                Ok(at(Token::BlankNodeLabel(label)))
            }
            c if c.is_ascii_digit() || c == '+' || c == '-' => {
                let token = self.scan_numeric()?;
                Ok(at(token))
            }
            c if c.is_alphabetic() || c == '_' || c == ':' => self.scan_name(line, column),
            other => Err(self.error_here(format!("unexpected character {other:?}"))),
        }
    }

    // ---- character helpers -------------------------------------------------

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                // the BOM is not Unicode whitespace but is harmless noise
                Some(c) if c.is_whitespace() || c == '\u{feff}' => {
                    self.advance();
                }
                Some('#') => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn error_here(&self, message: impl Into<String>) -> RdfError {
        RdfError::syntax(message, self.line, self.column)
    }

    // ---- token scanners ----------------------------------------------------

    fn scan_at_directive_or_lang_tag(
        &mut self,
        line: usize,
        column: usize,
    ) -> Result<PositionedToken> {
        self.advance(); // '@'
        let word = self.take_while(|c| c.is_alphabetic() || c == '-');
        let at = |token| PositionedToken {
            token,
            line,
            column,
        };
        match word.as_str() {
            "prefix" => {
                let (prefix, iri) = self.scan_prefix_declaration_body()?;
                Ok(at(Token::PrefixDecl {
                    prefix,
                    iri,
                    sparql_style: false,
                }))
            }
            "base" => {
                self.skip_whitespace_and_comments();
                let iri = self.scan_iri_ref()?;
                Ok(at(Token::BaseDecl {
                    iri,
                    sparql_style: false,
                }))
            }
            tag if is_valid_language_tag(tag) => Ok(at(Token::LangTag(tag.to_string()))),
            other => Err(RdfError::syntax(
                format!("'@{other}' is neither a directive nor a valid language tag"),
                line,
                column,
            )),
        }
    }

    fn scan_prefix_declaration_body(&mut self) -> Result<(String, String)> {
        self.skip_whitespace_and_comments();
        let prefix = self.take_while(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if self.peek_char() != Some(':') {
            return Err(self.error_here("expected ':' after prefix name"));
        }
        self.advance();
        self.skip_whitespace_and_comments();
        let iri = self.scan_iri_ref()?;
        Ok((prefix, iri))
    }

    fn scan_iri_ref(&mut self) -> Result<String> {
        if self.peek_char() != Some('<') {
            return Err(self.error_here("expected '<'"));
        }
        self.advance();
        let mut iri = String::new();
        loop {
            match self.advance() {
                Some('>') => return Ok(iri),
                Some('\\') => {
                    let escaped = self.scan_unicode_escape()?;
                    iri.push(escaped);
                }
                Some('\n') | None => {
                    return Err(self.error_here("unterminated IRI reference"));
                }
                Some(c) => iri.push(c),
            }
        }
    }

    fn scan_unicode_escape(&mut self) -> Result<char> {
        let kind = self.advance();
        let width = match kind {
            Some('u') => 4,
            Some('U') => 8,
            other => {
                return Err(self.error_here(format!(
                    "invalid escape '\\{}' in IRI",
                    other.map_or(String::from("<eof>"), |c| c.to_string())
                )));
            }
        };
        let mut value: u32 = 0;
        for _ in 0..width {
            let digit = self
                .advance()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error_here("invalid unicode escape"))?;
            value = value * 16 + digit;
        }
        char::from_u32(value).ok_or_else(|| self.error_here("escape is not a valid code point"))
    }

    fn scan_string(&mut self, quote: char) -> Result<String> {
        // triple-quoted?
        if self.peek_char_at(1) == Some(quote) && self.peek_char_at(2) == Some(quote) {
            self.advance();
            self.advance();
            self.advance();
            return self.scan_long_string(quote);
        }
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.advance() {
                Some(c) if c == quote => return Ok(value),
                Some('\\') => value.push(self.scan_string_escape()?),
                Some('\n') | None => return Err(self.error_here("unterminated string literal")),
                Some(c) => value.push(c),
            }
        }
    }

    fn scan_long_string(&mut self, quote: char) -> Result<String> {
        let mut value = String::new();
        loop {
            if self.peek_char() == Some(quote)
                && self.peek_char_at(1) == Some(quote)
                && self.peek_char_at(2) == Some(quote)
            {
                // a run of more than three quotes keeps the surplus in the
                // content; only the final three close the string
                if self.peek_char_at(3) == Some(quote) {
                    self.advance();
                    value.push(quote);
                    continue;
                }
                self.advance();
                self.advance();
                self.advance();
                return Ok(value);
            }
            match self.advance() {
                Some('\\') => value.push(self.scan_string_escape()?),
                Some(c) => value.push(c),
                None => return Err(self.error_here("unterminated triple-quoted string")),
            }
        }
    }

    fn scan_string_escape(&mut self) -> Result<char> {
        match self.peek_char() {
            Some('t') => {
                self.advance();
                Ok('\t')
            }
            Some('b') => {
                self.advance();
                Ok('\u{8}')
            }
            Some('n') => {
                self.advance();
                Ok('\n')
            }
            Some('r') => {
                self.advance();
                Ok('\r')
            }
            Some('f') => {
                self.advance();
                Ok('\u{c}')
            }
            Some('"') => {
                self.advance();
                Ok('"')
            }
            Some('\'') => {
                self.advance();
                Ok('\'')
            }
            Some('\\') => {
                self.advance();
                Ok('\\')
            }
            Some('u' | 'U') => self.scan_unicode_escape(),
            other => Err(self.error_here(format!(
                "invalid string escape '\\{}'",
                other.map_or(String::from("<eof>"), |c| c.to_string())
            ))),
        }
    }

    fn scan_blank_node_label(&mut self) -> Result<String> {
        self.advance(); // '_'
        self.advance(); // ':'
        let label = self.take_while(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if label.is_empty() {
            return Err(self.error_here("empty blank node label"));
        }
        // a trailing dot belongs to the statement, not the label
        let (label, popped) = strip_trailing_dots(label);
        if label.is_empty() {
            return Err(self.error_here("empty blank node label"));
        }
        self.push_back_dots(popped);
        Ok(label)
    }

    fn scan_numeric(&mut self) -> Result<Token> {
        let mut text = String::new();
        if matches!(self.peek_char(), Some('+' | '-')) {
            text.push(self.advance().expect("sign"));
        }
        let mut has_dot = false;
        let mut has_exponent = false;
        text.push_str(&self.take_while(|c| c.is_ascii_digit()));
        if self.peek_char() == Some('.') && self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit())
        {
            has_dot = true;
            text.push(self.advance().expect("dot"));
            text.push_str(&self.take_while(|c| c.is_ascii_digit()));
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            has_exponent = true;
            text.push(self.advance().expect("exponent marker"));
            if matches!(self.peek_char(), Some('+' | '-')) {
                text.push(self.advance().expect("exponent sign"));
            }
            let digits = self.take_while(|c| c.is_ascii_digit());
            if digits.is_empty() {
                return Err(self.error_here("exponent without digits"));
            }
            text.push_str(&digits);
        }
        if text.is_empty() || text == "+" || text == "-" {
            return Err(self.error_here("malformed numeric literal"));
        }
        if has_exponent {
            Ok(Token::Double(text))
        } else if has_dot {
            Ok(Token::Decimal(text))
        } else {
            Ok(Token::Integer(text))
        }
    }

    fn scan_name(&mut self, line: usize, column: usize) -> Result<PositionedToken> {
        let at = |token| PositionedToken {
            token,
            line,
            column,
        };

        // prefix part: up to an optional ':'
        let raw = self.take_while(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));

        if self.peek_char() == Some(':') {
            self.advance();
            let local = self.scan_local_name(line, column)?;
            return Ok(at(Token::PrefixedName { prefix: raw, local }));
        }

        // bare word without a colon; trailing dots terminate the statement
        let (word, popped) = strip_trailing_dots(raw);
        self.push_back_dots(popped);
        match word.as_str() {
            "a" => Ok(at(Token::A)),
            "true" => Ok(at(Token::Boolean(true))),
            "false" => Ok(at(Token::Boolean(false))),
            word if self.flags.allow_prefix_without_at_sign
                && word.eq_ignore_ascii_case("prefix") =>
            {
                let (prefix, iri) = self.scan_prefix_declaration_body()?;
                Ok(at(Token::PrefixDecl {
                    prefix,
                    iri,
                    sparql_style: true,
                }))
            }
            word if self.flags.allow_prefix_without_at_sign && word.eq_ignore_ascii_case("base") => {
                self.skip_whitespace_and_comments();
                let iri = self.scan_iri_ref()?;
                Ok(at(Token::BaseDecl {
                    iri,
                    sparql_style: true,
                }))
            }
            word if self.flags.allow_identifiers_without_colon => {
                Ok(at(Token::PrefixedName {
                    prefix: String::new(),
                    local: word.to_string(),
                }))
            }
            word => Err(RdfError::syntax(
                format!("unexpected identifier '{word}' (missing ':'?)"),
                line,
                column,
            )),
        }
    }

    fn scan_local_name(&mut self, line: usize, column: usize) -> Result<String> {
        let mut local = String::new();
        while let Some(c) = self.peek_char() {
            match c {
                c if c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '%') => {
                    local.push(c);
                    self.advance();
                }
                '\\' => {
                    // PN_LOCAL_ESC: the escaped character is taken literally
                    self.advance();
                    match self.advance() {
                        Some(escaped) => local.push(escaped),
                        None => return Err(self.error_here("dangling '\\' in local name")),
                    }
                }
                _ => break,
            }
        }
        let (local, popped) = strip_trailing_dots(local);
        self.push_back_dots(popped);
        if let Some(first) = local.chars().next() {
            if first.is_ascii_digit() && !self.flags.allow_digit_in_local_name {
                return Err(RdfError::syntax(
                    format!(
                        "local name '{local}' starts with a digit \
                         (enable allow_digit_in_local_name to accept)"
                    ),
                    line,
                    column,
                ));
            }
        }
        Ok(local)
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek_char() {
            if predicate(c) {
                out.push(c);
                self.advance();
            } else {
                break;
            }
        }
        out
    }

    fn push_back_dots(&mut self, count: usize) {
        for i in 0..count {
            self.pending.push_back(PositionedToken {
                token: Token::Dot,
                line: self.line,
                column: self.column.saturating_sub(count - i),
            });
        }
    }
}

/// Split trailing dots off a scanned name; they are statement terminators.
fn strip_trailing_dots(mut name: String) -> (String, usize) {
    let mut popped = 0;
    while name.ends_with('.') {
        name.pop();
        popped += 1;
    }
    (name, popped)
}
