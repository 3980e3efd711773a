use alloc::format;

use crate::{Error, Limits, ReadOptions, Value, from_str_with};

fn with_limits(limits: Limits) -> ReadOptions {
    ReadOptions { limits }
}

#[test]
fn leaf_cap_rejects_and_unbounded_accepts_the_same_input() {
    let input = "[1, 2, 3]";
    let mut doc = Value::Null;

    let status = from_str_with(
        input,
        &mut doc,
        &with_limits(Limits::default().with_max_leaves(2)),
    )
    .unwrap_err();
    assert_eq!(status.errors.records(), &[Error::TooManyLeaves { limit: 2 }]);
    assert!(format!("{status}").contains("too many leaves"));

    from_str_with(input, &mut doc, &ReadOptions::default()).unwrap();
    assert!(doc.is_array());
}

#[test]
fn depth_cap_rejects_nested_containers() {
    let input = "[[[1]]]";
    let mut doc = Value::Null;

    let status = from_str_with(
        input,
        &mut doc,
        &with_limits(Limits::default().with_max_depth(2)),
    )
    .unwrap_err();
    assert_eq!(
        status.errors.records(),
        &[Error::RecursionTooDeep { limit: 2 }]
    );
    assert!(format!("{status}").contains("too many levels of recursion"));

    from_str_with(input, &mut doc, &with_limits(Limits::default().with_max_depth(3))).unwrap();
}

#[test]
fn keys_are_not_leaves() {
    let mut doc = Value::Null;
    from_str_with(
        r#"{"a": 1, "b": 2}"#,
        &mut doc,
        &with_limits(Limits::default().with_max_leaves(2)),
    )
    .unwrap();
}

#[test]
fn exact_leaf_count_is_accepted() {
    let mut doc = Value::Null;
    from_str_with(
        "[1, 2, 3]",
        &mut doc,
        &with_limits(Limits::default().with_max_leaves(3)),
    )
    .unwrap();
}
