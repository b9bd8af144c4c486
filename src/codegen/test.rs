use super::*;

const TRIPLE: &str = "x86_64-unknown-linux-gnu";

fn module_for(text: &str) -> String {
    ModuleWriter::new(TRIPLE).generate(&OutputDirective::new(text))
}

#[test]
fn test_escape_table() {
    assert_eq!(escape(b"plain text"), "plain text");
    assert_eq!(escape(b"a\\b"), "a\\5Cb");
    assert_eq!(escape(b"say \"hi\""), "say \\22hi\\22");
    assert_eq!(escape(b"\n\r\t"), "\\0A\\0D\\09");
    assert_eq!(escape(&[0x00, 0x1F, 0x7F, 0xFF]), "\\00\\1F\\7F\\FF");
    assert_eq!(escape(b" ~"), " ~");
}

#[test]
fn test_escape_utf8_bytewise() {
    assert_eq!(escape("é".as_bytes()), "\\C3\\A9");
}

#[test]
fn test_unescape_inverts_escape() {
    let text = "tab\there \"quoted\" back\\slash ünïcode";
    assert_eq!(unescape(&escape(text.as_bytes())).unwrap(), text.as_bytes());
}

#[test]
fn test_escape_fixed_point() {
    for text in ["", "hi there", "a\"b\\c\nd", "100% \u{7f}", "日本語"] {
        let once = escape(text.as_bytes());
        let canonical = unescape(&once).unwrap();
        assert_eq!(escape(&canonical), once);
    }
}

#[test]
fn test_escaped_output_is_printable_ascii() {
    let escaped = escape(&(0u8..=255).collect::<Vec<_>>());
    assert!(escaped.bytes().all(|b| (32..=126).contains(&b) && b != b'"'));
}

#[test]
fn test_unescape_rejects_bad_sequences() {
    assert_eq!(unescape("\\4"), None);
    assert_eq!(unescape("\\zz"), None);
    assert_eq!(unescape("\\+1"), None);
}

#[test]
fn test_module_embeds_text() {
    let module = module_for("hi there");
    assert!(module.contains(r#"@.str = private unnamed_addr constant [9 x i8] c"hi there\00", align 1"#));
    assert!(module.contains("target triple = \"x86_64-unknown-linux-gnu\""));
    assert!(module.contains("declare i32 @puts(ptr)"));
    assert!(module.contains("define i32 @main()"));
    assert!(module.contains("call i32 @puts(ptr @.str)"));
    assert!(module.contains("ret i32 0"));
}

#[test]
fn test_quote_is_escaped_and_length_counts_raw_text() {
    let text = "say \"hi\"";
    let module = module_for(text);
    assert!(module.contains(&format!("[{} x i8]", text.len() + 1)));
    assert!(module.contains(r#"c"say \22hi\22\00""#));
}

#[test]
fn test_length_counts_bytes() {
    let module = module_for("é");
    assert!(module.contains(r#"[3 x i8] c"\C3\A9\00""#));
}

#[test]
fn test_empty_text() {
    let module = module_for("");
    assert!(module.contains(r#"[1 x i8] c"\00""#));
}

#[test]
fn test_source_filename() {
    let module = ModuleWriter::new(TRIPLE)
        .with_source_filename("hello.scir")
        .generate(&OutputDirective::new("x"));
    assert!(module.starts_with("; ModuleID = 'scheil'\nsource_filename = \"hello.scir\"\n"));
}
