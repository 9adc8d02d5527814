//! Well-known vocabulary IRIs used throughout the crate.
//!
//! Constants are grouped per vocabulary. Namespace IRIs are plain strings;
//! individual terms are pre-validated [`Iri`] constants built with
//! [`Iri::from_static`].

use crate::term::Iri;

/// RDF syntax vocabulary.
pub mod rdf {
    use super::Iri;

    /// RDF namespace IRI.
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// `rdf:type`.
    pub const TYPE: Iri = Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
    /// `rdf:first`.
    pub const FIRST: Iri = Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#first");
    /// `rdf:rest`.
    pub const REST: Iri = Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#rest");
    /// `rdf:nil`.
    pub const NIL: Iri = Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#nil");
    /// `rdf:List`.
    pub const LIST: Iri = Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#List");
    /// `rdf:Seq`.
    pub const SEQ: Iri = Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#Seq");
    /// `rdf:Bag`.
    pub const BAG: Iri = Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#Bag");
    /// `rdf:Alt`.
    pub const ALT: Iri = Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#Alt");
    /// `rdf:langString`, the datatype of language-tagged literals.
    pub const LANG_STRING: Iri =
        Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#langString");

    /// Container membership property `rdf:_n` (1-based).
    #[must_use]
    pub fn member(index: usize) -> Iri {
        Iri::new_unchecked(format!("{NS}_{index}"))
    }

    /// Parse a container membership property back to its 1-based index.
    #[must_use]
    pub fn member_index(iri: &Iri) -> Option<usize> {
        let local = iri.as_str().strip_prefix(NS)?.strip_prefix('_')?;
        local.parse().ok()
    }
}

/// XML Schema datatypes.
pub mod xsd {
    use super::Iri;

    /// XSD namespace IRI.
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

    /// `xsd:string`, the default literal datatype.
    pub const STRING: Iri = Iri::from_static("http://www.w3.org/2001/XMLSchema#string");
    /// `xsd:boolean`.
    pub const BOOLEAN: Iri = Iri::from_static("http://www.w3.org/2001/XMLSchema#boolean");
    /// `xsd:integer`.
    pub const INTEGER: Iri = Iri::from_static("http://www.w3.org/2001/XMLSchema#integer");
    /// `xsd:decimal`.
    pub const DECIMAL: Iri = Iri::from_static("http://www.w3.org/2001/XMLSchema#decimal");
    /// `xsd:double`.
    pub const DOUBLE: Iri = Iri::from_static("http://www.w3.org/2001/XMLSchema#double");
    /// `xsd:int`.
    pub const INT: Iri = Iri::from_static("http://www.w3.org/2001/XMLSchema#int");
    /// `xsd:long`.
    pub const LONG: Iri = Iri::from_static("http://www.w3.org/2001/XMLSchema#long");
    /// `xsd:dateTime`.
    pub const DATE_TIME: Iri = Iri::from_static("http://www.w3.org/2001/XMLSchema#dateTime");
    /// `xsd:date`.
    pub const DATE: Iri = Iri::from_static("http://www.w3.org/2001/XMLSchema#date");
    /// `xsd:anyURI`.
    pub const ANY_URI: Iri = Iri::from_static("http://www.w3.org/2001/XMLSchema#anyURI");
}

/// RDF Schema vocabulary.
pub mod rdfs {
    /// RDFS namespace IRI.
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
}
