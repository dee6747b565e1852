//! Extensive DSL unit tests: syntax (parse success/failure) and semantics (uniqueness, references).

use servdsl::{
    parse, validate, Definition, DefinitionKind, Document, Error, Field, Message, MessageDefinition, Modifier,
    Scalar, Service, Type, ValidationError,
};

fn string_field(name: &str) -> MessageDefinition {
    MessageDefinition::Field(Field {
        name: name.to_string(),
        ty: Type::Scalar(Scalar::String),
        modifier: Modifier::None,
    })
}

fn test_message() -> Definition {
    Definition::Message(Message {
        name: "TestMessage".to_string(),
        definitions: vec![string_field("TestString")],
    })
}

fn validation_error(source: &str) -> ValidationError {
    let doc = parse(source).expect("parse");
    validate(doc).expect_err("validation should fail")
}

// ==================== Syntax: valid programs ====================

#[test]
fn parse_empty_document() {
    let doc = parse("").expect("empty document can parse");
    assert!(doc.definitions.is_empty());
    let doc = parse("  \n\t ").expect("whitespace-only document can parse");
    assert_eq!(doc, Document::default());
}

#[test]
fn parse_service_with_message_as_parameter() {
    let src = r#"
        message TestMessage{
            string TestString;
        };
        inbound TestService(TestMessage) : string;
    "#;
    let doc = parse(src).expect("parse");
    assert_eq!(
        doc.definitions,
        vec![
            test_message(),
            Definition::InboundService(Service {
                name: "TestService".to_string(),
                request: vec![Type::reference("TestMessage")],
                response: Some(Type::Scalar(Scalar::String)),
            }),
        ]
    );
}

#[test]
fn parse_outbound_service_with_message_as_return() {
    let src = r#"
        message TestMessage{
            string TestString;
        };
        outbound TestService(string) : TestMessage;
    "#;
    let doc = parse(src).expect("parse");
    assert_eq!(
        doc.definitions[1],
        Definition::OutboundService(Service {
            name: "TestService".to_string(),
            request: vec![Type::Scalar(Scalar::String)],
            response: Some(Type::reference("TestMessage")),
        })
    );
}

#[test]
fn parse_service_with_message_and_primitive_parameters() {
    let doc = parse("inbound TestService(TestMessage,string) : string;").expect("parse");
    let (_, service) = doc.get_service("TestService").expect("service");
    assert_eq!(
        service.request,
        vec![Type::reference("TestMessage"), Type::Scalar(Scalar::String)]
    );
}

#[test]
fn parse_service_without_parameters() {
    let doc = parse("inbound TestService();").expect("parse");
    assert_eq!(
        doc.definitions,
        vec![Definition::InboundService(Service {
            name: "TestService".to_string(),
            request: vec![],
            response: None,
        })]
    );
    let doc = parse("outbound TestService():int32;").expect("parse");
    let (_, service) = doc.get_service("TestService").expect("service");
    assert_eq!(service.response, Some(Type::Scalar(Scalar::Int32)));
}

#[test]
fn parse_every_scalar_keyword() {
    let src = r#"
message AllScalars {
  double a; float b; int32 c; int64 d; uint32 e; uint64 f; sint32 g; sint64 h;
  fixed32 i; fixed64 j; sfixed32 k; sfixed64 l; bool m; string n; bytes o;
}
"#;
    let doc = parse(src).expect("parse");
    let types: Vec<Type> = doc.get_message("AllScalars").expect("message").fields().map(|f| f.ty.clone()).collect();
    let expected: Vec<Type> = Scalar::ALL.iter().map(|s| Type::Scalar(*s)).collect();
    assert_eq!(types, expected);
}

#[test]
fn parse_redundant_separators() {
    let src = "message A { int32 x;;; bool y } ;;; inbound S(A);;";
    let doc = parse(src).expect("parse");
    assert_eq!(doc.definitions.len(), 2);
    assert_eq!(doc.get_message("A").expect("message").fields().count(), 2);
}

#[test]
fn parse_dotted_reference() {
    let doc = parse("message M { optional pkg.sub.Type t; }").expect("parse");
    let field = doc.get_message("M").and_then(|m| m.fields().next()).expect("field");
    assert_eq!(field.ty, Type::reference("pkg.sub.Type"));
    assert_eq!(field.modifier, Modifier::Optional);
}

#[test]
fn parse_nested_map_types() {
    let doc = parse("inbound S(map<string, map<int64, Item>>): map<bool, bytes>;").expect("parse");
    let (_, service) = doc.get_service("S").expect("service");
    assert_eq!(
        service.request[0],
        Type::map(
            Type::Scalar(Scalar::String),
            Type::map(Type::Scalar(Scalar::Int64), Type::reference("Item"))
        )
    );
    assert_eq!(service.response.as_ref().map(|t| t.target_type()), Some("map[bool][]byte".to_string()));
}

#[test]
fn two_messages_may_reference_each_other() {
    let src = "message A { B b; } message B { A a; } inbound S(A): B;";
    let doc = validate(parse(src).expect("parse")).expect("valid");
    assert_eq!(doc.messages().count(), 2);
}

// ==================== Syntax: invalid programs ====================

#[test]
fn reject_unknown_top_level_word() {
    match parse("service S();") {
        Err(Error::Parse(e)) => {
            assert_eq!(e.expected, "`message`, `inbound` or `outbound`");
            assert_eq!(e.found, "identifier `service`");
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn reject_missing_colon_before_response() {
    assert!(matches!(parse("inbound S() string;"), Err(Error::Parse(_))));
}

#[test]
fn reject_unterminated_message() {
    assert!(matches!(parse("message M { string s;"), Err(Error::Parse(_))));
}

#[test]
fn reject_dangling_dot_in_reference() {
    match parse("inbound S(a.);") {
        Err(Error::Parse(e)) => {
            assert_eq!(e.expected, "identifier after `.`");
            assert_eq!(e.found, "`)`");
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn reject_scalar_keyword_as_service_name() {
    assert!(matches!(parse("inbound int32();"), Err(Error::Parse(_))));
}

#[test]
fn reject_unrecognized_character() {
    match parse("message M { string s; } // comment") {
        Err(Error::Lex(e)) => {
            assert_eq!(e.position.line, 1);
            assert_eq!(e.position.column, 25);
        }
        other => panic!("expected lex error, got {:?}", other),
    }
}

// ==================== Semantics: uniqueness ====================

#[test]
fn duplicate_service_name() {
    let err = validation_error(
        r#"
        inbound TestService(string);
        inbound TestService(TestMessage) : TestMessage;
        message TestMessage{
            string TestString;
        };
    "#,
    );
    assert_eq!(
        err,
        ValidationError::DuplicateDefinition {
            kind: DefinitionKind::Service,
            name: "TestService".to_string(),
        }
    );
}

#[test]
fn duplicate_service_name_across_directions() {
    let err = validation_error("inbound S(); message M {} outbound S();");
    assert_eq!(
        err,
        ValidationError::DuplicateDefinition {
            kind: DefinitionKind::Service,
            name: "S".to_string(),
        }
    );
}

#[test]
fn duplicate_message_name_interleaved_with_services() {
    let err = validation_error("message M { int32 a; } inbound A(M); outbound B(); message M { bool b; }");
    assert_eq!(
        err,
        ValidationError::DuplicateDefinition {
            kind: DefinitionKind::Message,
            name: "M".to_string(),
        }
    );
}

// ==================== Semantics: references ====================

#[test]
fn service_with_nonexistent_message() {
    let err = validation_error("inbound TestService(string) : TestMessage;");
    assert_eq!(
        err,
        ValidationError::UnresolvedReference {
            service: "TestService".to_string(),
            name: "TestMessage".to_string(),
        }
    );
}

#[test]
fn unresolved_request_reference() {
    let err = validation_error("message A {} outbound Push(A, B);");
    assert_eq!(
        err,
        ValidationError::UnresolvedReference {
            service: "Push".to_string(),
            name: "B".to_string(),
        }
    );
}

#[test]
fn forward_reference_is_allowed() {
    let src = "inbound Get(Request): Response; message Request { string id; } message Response { bytes body; }";
    let doc = parse(src).expect("parse");
    assert!(validate(doc).is_ok());
}

#[test]
fn nested_message_is_addressable_by_path() {
    let src = "message Outer { message Inner { int32 x; } Inner inner; } inbound Get(): Outer.Inner;";
    assert!(validate(parse(src).expect("parse")).is_ok());
    let err = validation_error("message Outer { message Inner {} } inbound Get(): Inner;");
    assert_eq!(
        err,
        ValidationError::UnresolvedReference {
            service: "Get".to_string(),
            name: "Inner".to_string(),
        }
    );
}

#[test]
fn field_references_are_not_checked_by_default() {
    let doc = parse("message M { Unknown u; }").expect("parse");
    assert!(validate(doc).is_ok());
}
