//! End-to-end object mapping tests: registry, contexts, completeness
//! accounting, collection strategies, and lossless round-trips.

mod common;

use rdfmap::error::{MapperError, MapperResult};
use rdfmap::mapper::{
    CollectionStrategy, CompletenessMode, DeserializationContext, ItemMapper, LiteralTermMapper,
    MapperDirection, MapperRegistry, ObjectCodecOptions, RdfMapper, ResourceMapper,
    SerializationContext, SubjectPolicy,
};
use rdfmap::vocab::{rdf, xsd};
use rdfmap::{BlankNode, Graph, Iri, Literal, Subject, Triple};

use common::assert_isomorphic;

const FOAF_PERSON: Iri = Iri::from_static("http://xmlns.com/foaf/0.1/Person");
const FOAF_NAME: Iri = Iri::from_static("http://xmlns.com/foaf/0.1/name");
const FOAF_AGE: Iri = Iri::from_static("http://xmlns.com/foaf/0.1/age");
const FOAF_MBOX: Iri = Iri::from_static("http://xmlns.com/foaf/0.1/mbox");
const SCHEMA_ADDRESS: Iri = Iri::from_static("https://schema.org/address");
const SCHEMA_CITY: Iri = Iri::from_static("https://schema.org/addressLocality");
const EX_NICKNAME: Iri = Iri::from_static("http://ex/vocab#nickname");
const EX_CHAPTERS: Iri = Iri::from_static("http://ex/vocab#chapters");
const PERSON_NS: &str = "http://ex/people/";

// ---- example domain --------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Address {
    city: String,
}

#[derive(Debug)]
struct AddressMapper;

impl ResourceMapper<Address> for AddressMapper {
    fn subject_policy(&self) -> SubjectPolicy {
        SubjectPolicy::Local
    }

    fn serialize(
        &self,
        value: &Address,
        context: &mut SerializationContext<'_>,
    ) -> MapperResult<(Subject, Vec<Triple>)> {
        let builder = context
            .resource_builder(BlankNode::new())
            .add_value(&SCHEMA_CITY, &value.city)?;
        Ok(builder.build())
    }

    fn deserialize(
        &self,
        subject: &Subject,
        context: &mut DeserializationContext<'_>,
    ) -> MapperResult<Address> {
        let mut reader = context.reader(subject.clone());
        Ok(Address {
            city: reader.require(&SCHEMA_CITY)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Person {
    id: String,
    name: String,
    age: Option<i64>,
    address: Option<Address>,
    nicknames: Vec<String>,
    chapters: Vec<String>,
}

#[derive(Debug)]
struct PersonMapper;

impl ResourceMapper<Person> for PersonMapper {
    fn type_iri(&self) -> Option<Iri> {
        Some(FOAF_PERSON)
    }

    fn subject_policy(&self) -> SubjectPolicy {
        SubjectPolicy::Global
    }

    fn serialize(
        &self,
        value: &Person,
        context: &mut SerializationContext<'_>,
    ) -> MapperResult<(Subject, Vec<Triple>)> {
        let subject = context.create_iri_term(&format!("{PERSON_NS}{}", value.id))?;
        let builder = context
            .resource_builder(subject)
            .add_type(FOAF_PERSON)
            .add_value(&FOAF_NAME, &value.name)?
            .add_value_if_some(&FOAF_AGE, value.age.as_ref())?
            .add_value_if_some(&SCHEMA_ADDRESS, value.address.as_ref())?
            .add_values(&EX_NICKNAME, &value.nicknames)?
            .add_rdf_list(&EX_CHAPTERS, &value.chapters)?;
        Ok(builder.build())
    }

    fn deserialize(
        &self,
        subject: &Subject,
        context: &mut DeserializationContext<'_>,
    ) -> MapperResult<Person> {
        let mut reader = context.reader(subject.clone());
        reader.require_type(&FOAF_PERSON)?;
        let name = reader.require(&FOAF_NAME)?;
        let age = reader.optional(&FOAF_AGE)?;
        let address = reader.optional(&SCHEMA_ADDRESS)?;
        let nicknames = reader.get_values(&EX_NICKNAME)?;
        let chapters = reader.require_rdf_list(&EX_CHAPTERS)?;

        let id = subject
            .as_iri()
            .and_then(|iri| iri.as_str().strip_prefix(PERSON_NS))
            .ok_or(MapperError::NoRootSubject {
                type_name: "Person",
            })?
            .to_string();
        Ok(Person {
            id,
            name,
            age,
            address,
            nicknames,
            chapters,
        })
    }
}

fn person_mapper() -> RdfMapper {
    let mut registry = MapperRegistry::with_defaults();
    registry.register_resource_mapper::<Person, _>(PersonMapper);
    registry.register_resource_mapper::<Address, _>(AddressMapper);
    RdfMapper::with_registry(registry)
}

fn sample_person() -> Person {
    Person {
        id: "alice".to_string(),
        name: "Alice".to_string(),
        age: Some(34),
        address: Some(Address {
            city: "Springfield".to_string(),
        }),
        nicknames: vec!["Al".to_string(), "Ally".to_string()],
        chapters: vec!["intro".to_string(), "body".to_string(), "coda".to_string()],
    }
}

// ---- object roundtrips -----------------------------------------------------

#[test]
fn test_object_roundtrip_through_turtle() {
    let mapper = person_mapper();
    let person = sample_person();
    let options = ObjectCodecOptions::default();

    let turtle = mapper
        .encode_object(&person, Some("text/turtle"), &options)
        .unwrap();
    assert!(turtle.contains("foaf:name \"Alice\""));
    assert!(turtle.contains("( \"intro\" \"body\" \"coda\" )"));

    let back: Person = mapper
        .decode_object(&turtle, Some("text/turtle"), &options)
        .unwrap();
    // multi-objects order is not guaranteed
    let mut expected = person.clone();
    expected.nicknames.sort();
    let mut actual = back.clone();
    actual.nicknames.sort();
    assert_eq!(actual, expected);
}

#[test]
fn test_object_roundtrip_through_jsonld() {
    let mapper = person_mapper();
    let person = sample_person();
    let options = ObjectCodecOptions::default();
    let jsonld = mapper
        .encode_object(&person, Some("application/ld+json"), &options)
        .unwrap();
    let back: Person = mapper
        .decode_object(&jsonld, Some("application/ld+json"), &options)
        .unwrap();
    assert_eq!(back.name, person.name);
    assert_eq!(back.chapters, person.chapters);
}

#[test]
fn test_empty_collections() {
    let mapper = person_mapper();
    let person = Person {
        id: "bob".to_string(),
        name: "Bob".to_string(),
        age: None,
        address: None,
        nicknames: Vec::new(),
        chapters: Vec::new(),
    };
    let options = ObjectCodecOptions::default();
    let turtle = mapper
        .encode_object(&person, Some("text/turtle"), &options)
        .unwrap();
    // the empty list is rdf:nil
    assert!(turtle.contains("rdf:nil") || turtle.contains("()"));
    let back: Person = mapper
        .decode_object(&turtle, Some("text/turtle"), &options)
        .unwrap();
    assert_eq!(back, person);
}

#[test]
fn test_decode_objects_by_declared_type() {
    let mapper = person_mapper();
    let options = ObjectCodecOptions::default();
    let a = Person {
        id: "a".to_string(),
        name: "A".to_string(),
        age: None,
        address: None,
        nicknames: Vec::new(),
        chapters: Vec::new(),
    };
    let b = Person {
        id: "b".to_string(),
        name: "B".to_string(),
        age: None,
        address: None,
        nicknames: Vec::new(),
        chapters: Vec::new(),
    };
    let turtle = mapper
        .encode_objects(&[a, b], Some("text/turtle"), &options)
        .unwrap();
    let mut people: Vec<Person> = mapper
        .decode_objects(&turtle, Some("text/turtle"), &options)
        .unwrap();
    people.sort_by(|x, y| x.id.cmp(&y.id));
    assert_eq!(people.len(), 2);
    assert_eq!(people[0].name, "A");
    assert_eq!(people[1].name, "B");
}

// ---- completeness accounting (scenario: partial mapper) --------------------

#[derive(Debug, Clone, PartialEq)]
struct NamedThing {
    name: String,
}

#[derive(Debug)]
struct NamedThingMapper;

impl ResourceMapper<NamedThing> for NamedThingMapper {
    fn type_iri(&self) -> Option<Iri> {
        Some(FOAF_PERSON)
    }

    fn serialize(
        &self,
        value: &NamedThing,
        context: &mut SerializationContext<'_>,
    ) -> MapperResult<(Subject, Vec<Triple>)> {
        let builder = context
            .resource_builder(Iri::new_unchecked("http://ex/p1"))
            .add_type(FOAF_PERSON)
            .add_value(&FOAF_NAME, &value.name)?;
        Ok(builder.build())
    }

    fn deserialize(
        &self,
        subject: &Subject,
        context: &mut DeserializationContext<'_>,
    ) -> MapperResult<NamedThing> {
        let mut reader = context.reader(subject.clone());
        reader.require_type(&FOAF_PERSON)?;
        Ok(NamedThing {
            name: reader.require(&FOAF_NAME)?,
        })
    }
}

const PARTIAL_DOC: &str = "\
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
<http://ex/p1> a foaf:Person ;
    foaf:name \"John\" ;
    foaf:mbox \"x@y\" .
";

fn named_thing_mapper() -> RdfMapper {
    let mut registry = MapperRegistry::with_defaults();
    registry.register_resource_mapper::<NamedThing, _>(NamedThingMapper);
    RdfMapper::with_registry(registry)
}

#[test]
fn test_strict_completeness_failure() {
    let mapper = named_thing_mapper();
    let err = mapper
        .decode_object::<NamedThing>(PARTIAL_DOC, Some("text/turtle"), &ObjectCodecOptions::default())
        .unwrap_err();
    match err {
        MapperError::IncompleteDeserialization {
            unmapped_subjects, ..
        } => {
            assert_eq!(
                unmapped_subjects,
                vec![Subject::Iri(Iri::new_unchecked("http://ex/p1"))]
            );
        }
        other => panic!("expected incomplete deserialization, got {other:?}"),
    }

    // the leftover is exactly the mbox triple
    let (_, remainder) = mapper
        .decode_object_lossless::<NamedThing>(
            PARTIAL_DOC,
            Some("text/turtle"),
            &ObjectCodecOptions::default(),
        )
        .unwrap();
    assert_eq!(remainder.triple_count(), 1);
    assert!(remainder.has_triple(&Triple::new(
        Iri::new_unchecked("http://ex/p1"),
        FOAF_MBOX,
        Literal::new("x@y"),
    )));
}

#[test]
fn test_lenient_completeness_succeeds() {
    let mapper = named_thing_mapper();
    let options = ObjectCodecOptions {
        completeness: CompletenessMode::Lenient,
        ..ObjectCodecOptions::default()
    };
    let thing: NamedThing = mapper
        .decode_object(PARTIAL_DOC, Some("text/turtle"), &options)
        .unwrap();
    assert_eq!(thing.name, "John");
}

// ---- unmapped-triples sink -------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct NamedThingWithSink {
    name: String,
    extra: Graph,
}

#[derive(Debug)]
struct NamedThingWithSinkMapper;

impl ResourceMapper<NamedThingWithSink> for NamedThingWithSinkMapper {
    fn type_iri(&self) -> Option<Iri> {
        Some(FOAF_PERSON)
    }

    fn serialize(
        &self,
        value: &NamedThingWithSink,
        context: &mut SerializationContext<'_>,
    ) -> MapperResult<(Subject, Vec<Triple>)> {
        let builder = context
            .resource_builder(Iri::new_unchecked("http://ex/p1"))
            .add_type(FOAF_PERSON)
            .add_value(&FOAF_NAME, &value.name)?
            .add_unmapped(&value.extra);
        Ok(builder.build())
    }

    fn deserialize(
        &self,
        subject: &Subject,
        context: &mut DeserializationContext<'_>,
    ) -> MapperResult<NamedThingWithSink> {
        let mut reader = context.reader(subject.clone());
        reader.require_type(&FOAF_PERSON)?;
        let name = reader.require(&FOAF_NAME)?;
        let extra = reader.get_unmapped_graph(false)?;
        Ok(NamedThingWithSink { name, extra })
    }
}

#[test]
fn test_unmapped_sink_collects_leftovers_and_restores_them() {
    let mut registry = MapperRegistry::with_defaults();
    registry.register_resource_mapper::<NamedThingWithSink, _>(NamedThingWithSinkMapper);
    let mapper = RdfMapper::with_registry(registry);

    // with the sink in place, strict mode passes
    let thing: NamedThingWithSink = mapper
        .decode_object(PARTIAL_DOC, Some("text/turtle"), &ObjectCodecOptions::default())
        .unwrap();
    assert_eq!(thing.name, "John");
    assert_eq!(thing.extra.triple_count(), 1);

    // re-encoding reproduces the full document's graph
    let turtle = mapper
        .encode_object(&thing, Some("text/turtle"), &ObjectCodecOptions::default())
        .unwrap();
    let core = rdfmap::RdfCore::with_standard_codecs(&[]);
    let original = core.decode(PARTIAL_DOC, Some("text/turtle"), None).unwrap();
    let reencoded = core.decode(&turtle, Some("text/turtle"), None).unwrap();
    assert_eq!(original, reencoded);
}

#[test]
fn test_lossless_roundtrip() {
    let mapper = named_thing_mapper();
    let options = ObjectCodecOptions::default();
    let (thing, remainder) = mapper
        .decode_object_lossless::<NamedThing>(PARTIAL_DOC, Some("text/turtle"), &options)
        .unwrap();
    let turtle = mapper
        .encode_object_lossless((&thing, &remainder), Some("text/turtle"), &options)
        .unwrap();
    let (thing2, remainder2) = mapper
        .decode_object_lossless::<NamedThing>(&turtle, Some("text/turtle"), &options)
        .unwrap();
    assert_eq!(thing, thing2);
    assert_eq!(remainder, remainder2);
}

// ---- registry behavior -----------------------------------------------------

#[test]
fn test_missing_mapper_errors() {
    let mapper = RdfMapper::new();
    let err = mapper
        .decode_object::<NamedThing>(PARTIAL_DOC, Some("text/turtle"), &ObjectCodecOptions::default())
        .unwrap_err();
    assert!(matches!(err, MapperError::DeserializerNotFound { .. }));

    let err = mapper
        .encode_object(
            &NamedThing {
                name: "x".to_string(),
            },
            Some("text/turtle"),
            &ObjectCodecOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, MapperError::SerializerNotFound { .. }));
}

#[test]
fn test_scoped_registration_does_not_leak() {
    let mapper = RdfMapper::new();
    let options = ObjectCodecOptions {
        completeness: CompletenessMode::Lenient,
        ..ObjectCodecOptions::default()
    };
    let thing: NamedThing = mapper
        .decode_object_with(PARTIAL_DOC, Some("text/turtle"), &options, |registry| {
            registry.register_resource_mapper::<NamedThing, _>(NamedThingMapper);
        })
        .unwrap();
    assert_eq!(thing.name, "John");

    // the global registry was never touched
    assert!(!mapper.registry().has_resource_mapper_for::<NamedThing>());
}

#[test]
fn test_explicit_subject_skips_root_selection() {
    let mapper = named_thing_mapper();
    let options = ObjectCodecOptions {
        subject: Some(Subject::Iri(Iri::new_unchecked("http://ex/p1"))),
        completeness: CompletenessMode::Lenient,
        ..ObjectCodecOptions::default()
    };
    let thing: NamedThing = mapper
        .decode_object(PARTIAL_DOC, Some("text/turtle"), &options)
        .unwrap();
    assert_eq!(thing.name, "John");
}

// ---- direction and override mappers ----------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct WriteOnlyToken(String);

#[derive(Debug)]
struct WriteOnlyTokenMapper;

impl LiteralTermMapper<WriteOnlyToken> for WriteOnlyTokenMapper {
    fn datatype(&self) -> Iri {
        xsd::STRING
    }

    fn direction(&self) -> MapperDirection {
        MapperDirection::SerializeOnly
    }

    fn to_literal_term(
        &self,
        value: &WriteOnlyToken,
        _context: &mut SerializationContext<'_>,
    ) -> MapperResult<Literal> {
        Ok(Literal::new(value.0.clone()))
    }

    fn from_literal_term(
        &self,
        _literal: &Literal,
        _context: &mut DeserializationContext<'_>,
    ) -> MapperResult<WriteOnlyToken> {
        unreachable!("rejected by direction check")
    }
}

#[test]
fn test_directional_mapper_rejected_in_unsupported_direction() {
    let mut registry = MapperRegistry::with_defaults();
    registry.register_literal_mapper::<WriteOnlyToken, _>(WriteOnlyTokenMapper);

    let graph = Graph::new();
    let mut ser = SerializationContext::new(&registry);
    assert!(ser
        .serialize_value(&WriteOnlyToken("t".to_string()))
        .is_ok());

    let mut de = DeserializationContext::new(&registry, &graph);
    let err = de
        .from_literal_term::<WriteOnlyToken>(&Literal::new("t"))
        .unwrap_err();
    assert!(matches!(
        err,
        MapperError::UnsupportedDirection {
            direction: "deserialization",
            ..
        }
    ));
}

/// A mapper that stores strings uppercased and reads them back
/// lowercased, to make override use observable.
#[derive(Debug)]
struct ShoutingStringMapper;

impl LiteralTermMapper<String> for ShoutingStringMapper {
    fn datatype(&self) -> Iri {
        xsd::STRING
    }

    fn to_literal_term(
        &self,
        value: &String,
        _context: &mut SerializationContext<'_>,
    ) -> MapperResult<Literal> {
        Ok(Literal::new(value.to_uppercase()))
    }

    fn from_literal_term(
        &self,
        literal: &Literal,
        _context: &mut DeserializationContext<'_>,
    ) -> MapperResult<String> {
        Ok(literal.value().to_lowercase())
    }
}

#[test]
fn test_field_level_override_wins_over_registry() {
    let registry = MapperRegistry::with_defaults();
    let predicate = Iri::new_unchecked("http://ex/shout");

    let mut ser = SerializationContext::new(&registry);
    let (subject, triples) = ser
        .resource_builder(Iri::new_unchecked("http://ex/s"))
        .add_value_with(
            &predicate,
            &"hello".to_string(),
            &ItemMapper::Literal(&ShoutingStringMapper),
        )
        .unwrap()
        .build();
    assert_eq!(
        triples[0].object,
        rdfmap::Term::Literal(Literal::new("HELLO"))
    );

    let graph = Graph::from_triples(triples);
    let mut de = DeserializationContext::new(&registry, &graph);
    let mut reader = de.reader(subject);
    let read_back: String = reader
        .require_with(&predicate, Some(&ItemMapper::Literal(&ShoutingStringMapper)))
        .unwrap();
    assert_eq!(read_back, "hello");

    // the registry's default mapper would have preserved case
    let mut de2 = DeserializationContext::new(&registry, &graph);
    let mut reader2 = de2.reader(Subject::Iri(Iri::new_unchecked("http://ex/s")));
    let plain: String = reader2.require(&predicate).unwrap();
    assert_eq!(plain, "HELLO");
}

// ---- multi-objects mappers -------------------------------------------------

/// A tag set represented as one triple per tag.
#[derive(Debug, Clone, PartialEq)]
struct Tags(Vec<String>);

#[derive(Debug)]
struct TagsMapper;

impl rdfmap::mapper::MultiObjectsMapper<Tags> for TagsMapper {
    fn to_objects(
        &self,
        value: &Tags,
        _context: &mut SerializationContext<'_>,
    ) -> MapperResult<(Vec<rdfmap::Term>, Vec<Triple>)> {
        Ok((
            value
                .0
                .iter()
                .map(|tag| rdfmap::Term::Literal(Literal::new(tag.clone())))
                .collect(),
            Vec::new(),
        ))
    }

    fn from_objects(
        &self,
        objects: &[rdfmap::Term],
        _context: &mut DeserializationContext<'_>,
    ) -> MapperResult<Tags> {
        let mut tags = Vec::with_capacity(objects.len());
        for object in objects {
            match object.as_literal() {
                Some(literal) => tags.push(literal.value().to_string()),
                None => {
                    return Err(MapperError::DeserializerNotFound { type_name: "Tags" });
                }
            }
        }
        tags.sort();
        Ok(Tags(tags))
    }
}

#[test]
fn test_multi_objects_mapper_roundtrip() {
    let mut registry = MapperRegistry::with_defaults();
    registry.register_multi_objects_mapper::<Tags, _>(TagsMapper);
    let predicate = Iri::new_unchecked("http://ex/tag");
    let tags = Tags(vec!["blue".to_string(), "new".to_string()]);

    let mut ser = SerializationContext::new(&registry);
    let (subject, triples) = ser
        .resource_builder(Iri::new_unchecked("http://ex/s"))
        .add_value(&predicate, &tags)
        .unwrap()
        .build();
    // one triple per tag, sharing the predicate
    assert_eq!(triples.len(), 2);
    assert!(triples.iter().all(|t| t.predicate == predicate));

    let graph = Graph::from_triples(triples);
    let mut de = DeserializationContext::new(&registry, &graph);
    let mut reader = de.reader(subject);
    let back: Tags = reader.require_multi_objects(&predicate).unwrap();
    assert_eq!(back, tags);
    assert!(de.tracker().remainder(&graph).is_empty());
}

// ---- templated IRI mappers -------------------------------------------------

#[test]
fn test_templated_iri_field_mapping() {
    use rdfmap::mapper::primitives::TemplatedIriMapper;

    let registry = MapperRegistry::with_defaults();
    let template = TemplatedIriMapper::new("http://ex/users/{value}");
    let predicate = Iri::new_unchecked("http://ex/owner");

    let mut ser = SerializationContext::new(&registry);
    let (subject, triples) = ser
        .resource_builder(Iri::new_unchecked("http://ex/doc"))
        .add_value_with(
            &predicate,
            &"alice".to_string(),
            &ItemMapper::Iri(&template),
        )
        .unwrap()
        .build();
    assert_eq!(
        triples[0].object,
        rdfmap::Term::Iri(Iri::new_unchecked("http://ex/users/alice"))
    );

    let graph = Graph::from_triples(triples);
    let mut de = DeserializationContext::new(&registry, &graph);
    let mut reader = de.reader(subject);
    let owner: String = reader
        .require_with(&predicate, Some(&ItemMapper::Iri(&template)))
        .unwrap();
    assert_eq!(owner, "alice");
}

// ---- collection strategies -------------------------------------------------

#[test]
fn test_container_strategies_roundtrip() {
    let registry = MapperRegistry::with_defaults();
    let seq_pred = Iri::new_unchecked("http://ex/ordered");
    let bag_pred = Iri::new_unchecked("http://ex/unordered");
    let alt_pred = Iri::new_unchecked("http://ex/alternatives");
    let values = vec!["one".to_string(), "two".to_string(), "three".to_string()];

    let mut ser = SerializationContext::new(&registry);
    let (subject, triples) = ser
        .resource_builder(Iri::new_unchecked("http://ex/s"))
        .add_rdf_seq(&seq_pred, &values)
        .unwrap()
        .add_rdf_bag(&bag_pred, &values)
        .unwrap()
        .add_rdf_alt(&alt_pred, &values)
        .unwrap()
        .build();

    let graph = Graph::from_triples(triples);
    assert!(graph.has(&rdfmap::TriplePattern::new()
        .with_predicate(rdf::TYPE)
        .with_object(rdfmap::Term::Iri(rdf::SEQ))));

    let mut de = DeserializationContext::new(&registry, &graph);
    let mut reader = de.reader(subject);
    let seq: Vec<String> = reader.require_rdf_seq(&seq_pred).unwrap();
    let bag: Vec<String> = reader.require_rdf_bag(&bag_pred).unwrap();
    let alt: Vec<String> = reader.require_rdf_alt(&alt_pred).unwrap();
    assert_eq!(seq, values);
    assert_eq!(bag, values);
    assert_eq!(alt, values);

    // everything was consumed
    assert!(de.tracker().remainder(&graph).is_empty());
}

#[test]
fn test_require_collection_with_strategy() {
    let registry = MapperRegistry::with_defaults();
    let predicate = Iri::new_unchecked("http://ex/items");
    let values = vec![1i64, 2, 3];

    let mut ser = SerializationContext::new(&registry);
    let (subject, triples) = ser
        .resource_builder(Iri::new_unchecked("http://ex/s"))
        .add_collection(&predicate, &values, CollectionStrategy::RdfList)
        .unwrap()
        .build();

    let graph = Graph::from_triples(triples);
    let mut de = DeserializationContext::new(&registry, &graph);
    let mut reader = de.reader(subject);
    let back: Vec<i64> = reader
        .require_collection::<Vec<i64>, i64>(&predicate, CollectionStrategy::RdfList)
        .unwrap();
    assert_eq!(back, values);
}

#[test]
fn test_map_roundtrip() {
    use std::collections::HashMap;

    let registry = MapperRegistry::with_defaults();
    let predicate = Iri::new_unchecked("http://ex/settings");
    let key_pred = Iri::new_unchecked("http://ex/key");
    let value_pred = Iri::new_unchecked("http://ex/value");
    let mut settings: HashMap<String, i64> = HashMap::new();
    settings.insert("width".to_string(), 800);
    settings.insert("height".to_string(), 600);

    let mut ser = SerializationContext::new(&registry);
    let (subject, triples) = ser
        .resource_builder(Iri::new_unchecked("http://ex/s"))
        .add_map(&predicate, &settings, &key_pred, &value_pred)
        .unwrap()
        .build();

    let graph = Graph::from_triples(triples);
    let mut de = DeserializationContext::new(&registry, &graph);
    let mut reader = de.reader(subject);
    let back: HashMap<String, i64> = reader
        .get_map(&predicate, &key_pred, &value_pred)
        .unwrap();
    assert_eq!(back, settings);
}

// ---- datatype bypass -------------------------------------------------------

#[test]
fn test_bypass_datatype_check_option() {
    let mapper = named_thing_mapper();
    // name typed as xsd:token instead of xsd:string
    let doc = "\
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
<http://ex/p1> a foaf:Person ; foaf:name \"John\"^^xsd:token .
";
    let strict = ObjectCodecOptions::default();
    let err = mapper
        .decode_object::<NamedThing>(doc, Some("text/turtle"), &strict)
        .unwrap_err();
    assert!(matches!(err, MapperError::DatatypeMismatch { .. }));

    let bypassed = ObjectCodecOptions {
        bypass_datatype_check: true,
        ..ObjectCodecOptions::default()
    };
    let thing: NamedThing = mapper
        .decode_object(doc, Some("text/turtle"), &bypassed)
        .unwrap();
    assert_eq!(thing.name, "John");
}

// ---- graph-level mapping ---------------------------------------------------

#[test]
fn test_encode_to_graph_and_decode_from_graph() {
    let mapper = person_mapper();
    let person = sample_person();
    let graph = mapper.encode_object_to_graph(&person).unwrap();
    assert!(graph.has_triple(&Triple::new(
        Iri::new_unchecked("http://ex/people/alice"),
        rdf::TYPE,
        FOAF_PERSON,
    )));

    let back: Person = mapper
        .decode_object_from_graph(&graph, &ObjectCodecOptions::default())
        .unwrap();
    let mut expected = person;
    expected.nicknames.sort();
    let mut actual = back;
    actual.nicknames.sort();
    assert_eq!(actual, expected);

    // serializing twice yields isomorphic graphs (fresh blank nodes)
    let again = mapper.encode_object_to_graph(&actual).unwrap();
    assert_isomorphic(&graph, &again);
}
