use alloc::string::ToString;

use crate::{Error, WriteError, from_str, to_string, tests::fixtures::Priority};

#[test]
fn parses_by_authored_name() {
    let mut p = Priority::Low;
    from_str(r#""mid""#, &mut p).unwrap();
    assert_eq!(p, Priority::Mid);
}

#[test]
fn unknown_name_is_invalid() {
    let mut p = Priority::Low;
    let status = from_str(r#""urgent""#, &mut p).unwrap_err();
    assert_eq!(
        status.errors.records(),
        &[Error::InvalidEnum {
            value: "urgent".to_string(),
        }]
    );
}

#[test]
fn non_string_event_is_a_mismatch() {
    let mut p = Priority::Low;
    let status = from_str("3", &mut p).unwrap_err();
    assert_eq!(
        status.errors.records(),
        &[Error::TypeMismatch {
            expected: "priority".into(),
            actual: "uint",
        }]
    );
}

#[test]
fn writes_the_authored_name() {
    assert_eq!(to_string(&Priority::High).unwrap(), r#""high""#);
}

/// A variant deliberately left out of the authored mapping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Channel {
    #[default]
    Stable,
    Beta,
    Nightly,
}

crate::bind_enum!(Channel as "channel" {
    Stable => "stable",
    Beta => "beta",
});

#[test]
fn unmapped_value_fails_to_write() {
    let error = to_string(&Channel::Nightly).unwrap_err();
    assert!(matches!(error, WriteError::Unrepresentable));

    assert_eq!(to_string(&Channel::Beta).unwrap(), r#""beta""#);
}

#[test]
fn match_is_exact_bytes() {
    let mut c = Channel::Stable;
    assert!(from_str(r#""Beta""#, &mut c).is_err());
    assert!(from_str(r#""beta ""#, &mut c).is_err());
    from_str(r#""beta""#, &mut c).unwrap();
    assert_eq!(c, Channel::Beta);
}
