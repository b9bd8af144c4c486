use super::*;

fn path() -> &'static Path {
    Path::new("test.scir")
}

#[test]
fn test_display() {
    assert_eq!(OutputDirective::new("hi there").to_string(), "output hi there");
    assert_eq!(OutputDirective::default().to_string(), "output ");
}

#[test]
fn test_parse_strips_prefix_and_newline() {
    let directive = OutputDirective::parse("output hi there\n", path()).unwrap();
    assert_eq!(directive.text, "hi there");
}

#[test]
fn test_parse_keeps_inner_spacing() {
    let directive = OutputDirective::parse("output   padded  ", path()).unwrap();
    assert_eq!(directive.text, "  padded  ");
}

#[test]
fn test_empty_output() {
    let directive = OutputDirective::parse("output \n", path()).unwrap();
    assert_eq!(directive.text, "");
}

#[test]
fn test_wrong_statement_is_malformed() {
    let err = OutputDirective::parse("write hello", path()).unwrap_err();
    match err {
        Error::MalformedIr { line, .. } => assert_eq!(line, "write hello"),
        other => panic!("expected MalformedIr, got {:?}", other),
    }
}

#[test]
fn test_missing_space_is_malformed() {
    assert!(OutputDirective::parse("outputhello", path()).is_err());
    assert!(OutputDirective::parse("", path()).is_err());
}
