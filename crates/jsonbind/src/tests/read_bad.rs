use alloc::string::String;

use crate::{SyntaxError, Value, from_str};

fn syntax_failure(input: &str) -> crate::ParseStatus {
    let mut doc = Value::Null;
    let status = from_str(input, &mut doc).unwrap_err();
    assert!(status.syntax.is_some(), "expected a syntax error: {status}");
    assert!(status.errors.is_empty());
    status
}

#[test]
fn empty_input() {
    let status = syntax_failure("");
    assert_eq!(status.syntax, Some(SyntaxError::UnexpectedEndOfInput));
    assert_eq!((status.line, status.column, status.offset), (1, 1, 0));
}

#[test]
fn truncated_array() {
    let status = syntax_failure("[1, 2");
    assert_eq!(status.syntax, Some(SyntaxError::UnexpectedEndOfInput));
    assert_eq!((status.line, status.column, status.offset), (1, 6, 5));
}

#[test]
fn missing_value_after_colon() {
    let status = syntax_failure(r#"{"a":}"#);
    assert_eq!(status.syntax, Some(SyntaxError::InvalidCharacter('}')));
    assert_eq!(status.offset, 5);
}

#[test]
fn missing_colon() {
    let status = syntax_failure(r#"{"a" 1}"#);
    assert_eq!(status.syntax, Some(SyntaxError::Message("expected ':'")));
}

#[test]
fn bad_literal() {
    let status = syntax_failure("tru");
    assert_eq!(status.syntax, Some(SyntaxError::InvalidCharacter('t')));
    assert_eq!(status.offset, 0);
}

#[test]
fn leading_zero() {
    let status = syntax_failure("01");
    assert_eq!(
        status.syntax,
        Some(SyntaxError::Message("leading zeros are not allowed"))
    );
}

#[test]
fn trailing_garbage() {
    let status = syntax_failure("1 2");
    assert_eq!(status.syntax, Some(SyntaxError::TrailingCharacters));
    assert_eq!(status.offset, 2);
}

#[test]
fn bare_comma_in_array() {
    let status = syntax_failure("[1,,2]");
    assert_eq!(status.syntax, Some(SyntaxError::InvalidCharacter(',')));
}

#[test]
fn unterminated_string() {
    let status = syntax_failure(r#""abc"#);
    assert_eq!(status.syntax, Some(SyntaxError::UnexpectedEndOfInput));
}

#[test]
fn control_character_in_string() {
    let mut s = String::new();
    let status = from_str("\"a\u{1}b\"", &mut s).unwrap_err();
    assert_eq!(status.syntax, Some(SyntaxError::InvalidCharacter('\u{1}')));
}

#[test]
fn invalid_escape() {
    let status = syntax_failure(r#""a\qb""#);
    assert_eq!(status.syntax, Some(SyntaxError::InvalidCharacter('q')));
}

#[test]
fn lone_high_surrogate() {
    let status = syntax_failure(r#""\uD800""#);
    assert_eq!(
        status.syntax,
        Some(SyntaxError::InvalidUnicodeEscapeSequence(0xD800))
    );
}

#[test]
fn bad_hex_digit() {
    let status = syntax_failure(r#""\u00zz""#);
    assert_eq!(status.syntax, Some(SyntaxError::InvalidUnicodeEscapeChar('z')));
}

#[test]
fn number_overflow() {
    let status = syntax_failure("1e999");
    assert_eq!(status.syntax, Some(SyntaxError::NumberOverflow));
}

#[test]
fn multiline_position() {
    let status = syntax_failure("{\n  \"a\": tru\n}");
    assert_eq!(status.syntax, Some(SyntaxError::InvalidCharacter('t')));
    assert_eq!(status.line, 2);
    assert_eq!(status.column, 8);
}

#[test]
fn surrogate_pair_decodes() {
    let mut s = String::new();
    from_str(r#""\uD83D\uDE00""#, &mut s).unwrap();
    assert_eq!(s, "\u{1F600}");
}
