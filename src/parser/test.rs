use super::*;
use crate::diagnostics::Severity;
use crate::lexer::tokenize;

// Helper function to run the binder over source text without file I/O
fn bind_str(input: &str) -> Bound {
    let lexed = tokenize(input);
    assert!(lexed.diagnostics.is_empty(), "{:?}", lexed.diagnostics);

    let mut bindings = BindingTable::new();
    Binder::new(&mut bindings).bind(&lexed.tokens).unwrap()
}

fn output_of(input: &str) -> String {
    bind_str(input).directive.text
}

#[test]
fn test_classify_priority() {
    assert_eq!(Literal::classify("\"hi\""), Literal::String("hi".to_string()));
    assert_eq!(Literal::classify("\"3.5\""), Literal::String("3.5".to_string()));
    assert_eq!(Literal::classify("3.5"), Literal::Float(3.5));
    assert_eq!(Literal::classify("-42"), Literal::Integer(-42));
    assert_eq!(Literal::classify("  7  "), Literal::Integer(7));
    assert_eq!(Literal::classify("1.2.3"), Literal::Reference("1.2.3".to_string()));
    assert_eq!(Literal::classify("other"), Literal::Reference("other".to_string()));
    assert_eq!(Literal::classify("\""), Literal::Reference("\"".to_string()));
}

#[test]
fn test_literal_rendering() {
    assert_eq!(Literal::Integer(12).to_string(), "12");
    assert_eq!(Literal::Float(3.0).to_string(), "3.0");
    assert_eq!(Literal::Float(2.5).to_string(), "2.5");
    assert_eq!(Literal::String("a b".to_string()).to_string(), "a b");
}

#[test]
fn test_extreme_floats_use_exponent() {
    assert_eq!(output_of("let x = 1.5e300\noutput(${x})"), "1.5e300");
    assert_eq!(Literal::Float(2.5e-7).to_string(), "2.5e-7");
    assert_eq!(Literal::Float(-1e20).to_string(), "-1e20");
    assert_eq!(Literal::Float(0.0).to_string(), "0.0");
    assert_eq!(Literal::Float(0.25).to_string(), "0.25");
}

#[test]
fn test_substitution() {
    assert_eq!(output_of("let x = \"hi\"\noutput(${x} there)"), "hi there");
}

#[test]
fn test_numeric_substitution() {
    assert_eq!(
        output_of("let n = 4\nlet f = 2.50\noutput(${n} and ${f})"),
        "4 and 2.5"
    );
}

#[test]
fn test_unknown_placeholder_is_left_alone() {
    let bound = bind_str("output(${missing})");
    assert_eq!(bound.directive.text, "${missing}");
    assert!(bound.diagnostics.is_empty());
}

#[test]
fn test_rebinding_last_write_wins() {
    assert_eq!(output_of("let x = 1\nlet x = \"two\"\noutput(${x})"), "two");
}

#[test]
fn test_binding_after_output_is_not_visible() {
    assert_eq!(output_of("let x = 1\noutput(${x})\nlet x = 2"), "1");
}

#[test]
fn test_reference_captures_current_value() {
    assert_eq!(
        output_of("let a = 5\nlet b = a\nlet a = 6\noutput(${a} ${b})"),
        "6 5"
    );
}

#[test]
fn test_forward_reference_is_not_resolved() {
    assert_eq!(output_of("let a = b\nlet b = 5\noutput(${a})"), "b");
}

#[test]
fn test_unbound_reference_renders_raw() {
    assert_eq!(output_of("let b = nowhere\noutput(${b})"), "nowhere");
}

#[test]
fn test_numeric_folding() {
    assert_eq!(output_of("output(str(1 + 2 + 3))"), "6");
}

#[test]
fn test_folding_with_floats() {
    assert_eq!(output_of("output(str(1.5 + 1))"), "2.5");
    assert_eq!(output_of("output(str(1.5 + 1.5))"), "3.0");
}

#[test]
fn test_folding_substituted_values() {
    assert_eq!(
        output_of("let a = 2\nlet b = 3\noutput(total: str(${a} + ${b}))"),
        "total: 5"
    );
}

#[test]
fn test_folding_expression_binding() {
    assert_eq!(output_of("let sum = 10 + 5\noutput(str(${sum}))"), "15");
}

#[test]
fn test_nested_folding() {
    assert_eq!(output_of("output(str(str(1 + 2) + 3))"), "6");
}

#[test]
fn test_string_concatenation() {
    assert_eq!(
        output_of("let name = \"Ada\"\noutput(str(\"hi \" + ${name}))"),
        "hi Ada"
    );
}

#[test]
fn test_concatenation_outside_str() {
    assert_eq!(output_of("output(Hello + World)"), "HelloWorld");
    assert_eq!(output_of("output(1 + 2)"), "12");
    assert_eq!(output_of("output(1+2)"), "1+2");
}

#[test]
fn test_operator_between_folded_calls_is_dropped() {
    assert_eq!(
        output_of("let q = \"a\"\noutput(str(${q} + 1) + str(2))"),
        "a12"
    );
    assert_eq!(output_of("output(str(1 + 2) + str(3 + 4))"), "37");
}

#[test]
fn test_failed_fold_is_recovered() {
    let bound = bind_str("output(total str(1 +))");

    assert_eq!(bound.directive.text, "total 1");
    assert_eq!(bound.diagnostics.len(), 1);
    assert_eq!(bound.diagnostics[0].code, "E-FOLD");
    assert_eq!(bound.diagnostics[0].span, 0..22);
}

#[test]
fn test_extra_output_is_reported() {
    let bound = bind_str("output(first)\noutput(second)");

    assert_eq!(bound.directive.text, "first");
    assert_eq!(bound.diagnostics.len(), 1);
    assert_eq!(bound.diagnostics[0].code, "W-OUTPUT");
    assert_eq!(bound.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn test_no_output() {
    let bound = bind_str("let x = 1");
    assert_eq!(bound.directive, OutputDirective::default());
    assert_eq!(bound.diagnostics[0].code, "W-NO-OUTPUT");
}

#[test]
fn test_missing_eof() {
    let tokens = vec![(Token::Output("hi".to_string()), 0..10)];
    let mut bindings = BindingTable::new();
    let err = Binder::new(&mut bindings).bind(&tokens).unwrap_err();
    assert_eq!(err.line, 2);
}

#[test]
fn test_declaration_without_value() {
    let tokens = vec![
        (Token::VariableDecl("x".to_string()), 0..1),
        (Token::EndOfFile, 1..1),
    ];
    let mut bindings = BindingTable::new();
    assert!(Binder::new(&mut bindings).bind(&tokens).is_err());
}

#[test]
fn test_table_is_passed_by_reference() {
    let lexed = tokenize("let x = 1\nlet y = \"why\"\noutput(${x})");
    let mut bindings = BindingTable::new();
    Binder::new(&mut bindings).bind(&lexed.tokens).unwrap();

    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings.get("y"), Some(&Literal::String("why".to_string())));
}

#[test]
fn test_strip_concatenation() {
    assert_eq!(strip_concatenation("a + b"), "ab");
    assert_eq!(strip_concatenation("a+1"), "a1");
    assert_eq!(strip_concatenation("3 + 4 apples"), "34 apples");
    assert_eq!(strip_concatenation("3+4 apples"), "3+4 apples");
    assert_eq!(strip_concatenation("3 +4"), "34");
    assert_eq!(strip_concatenation("\"a + b\" + c"), "\"a + b\"c");
    assert_eq!(strip_concatenation("+lead"), "lead");
}

#[test]
fn test_fold_sums() {
    assert_eq!(fold("1 + 2 + 3").unwrap(), "6");
    assert_eq!(fold("-1 + 4").unwrap(), "3");
    assert_eq!(fold("1 + 2.5").unwrap(), "3.5");
    assert_eq!(fold("42").unwrap(), "42");
}

#[test]
fn test_fold_concatenates() {
    assert_eq!(fold("'a' + \"b\"").unwrap(), "ab");
    assert_eq!(fold("hello + 2").unwrap(), "hello2");
    assert_eq!(fold("a b + c").unwrap(), "a bc");
    assert_eq!(fold("\"x\" + 1.5").unwrap(), "x1.5");
}

#[test]
fn test_fold_errors() {
    assert_eq!(fold(""), Err(FoldError::MissingOperand(0)));
    assert_eq!(fold("1 + "), Err(FoldError::MissingOperand(4)));
    assert!(matches!(
        fold("\"open + 1"),
        Err(FoldError::Unexpected { .. })
    ));
}
