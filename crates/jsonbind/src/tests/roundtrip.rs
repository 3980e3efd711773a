use alloc::{boxed::Box, string::{String, ToString}, vec};

use quickcheck_macros::quickcheck;

use crate::{
    Value, from_str, from_value, to_string, to_string_pretty, to_value,
    tests::fixtures::{Date, Node, Priority, Task},
};

/// Compact text round-trip over arbitrary documents.
#[quickcheck]
fn compact_text_roundtrip(value: Value) -> bool {
    let text = to_string(&value).unwrap();
    let mut back = Value::Null;
    from_str(&text, &mut back).unwrap();
    back == value
}

/// Pretty text parses back to the same document.
#[quickcheck]
fn pretty_text_roundtrip(value: Value) -> bool {
    let text = to_string_pretty(&value).unwrap();
    let mut back = Value::Null;
    from_str(&text, &mut back).unwrap();
    back == value
}

/// The DOM bridge agrees with the text path.
#[quickcheck]
fn dom_bridge_roundtrip(value: Value) -> bool {
    let dom = to_value(&value).unwrap();
    let mut back = Value::Null;
    from_value(&dom, &mut back).unwrap();
    back == value
}

fn sample_task() -> Task {
    Task {
        id: u64::MAX,
        title: "round \"trip\" \u{2028} ok".to_string(),
        done: true,
        priority: Priority::Mid,
        tags: vec!["a".to_string(), String::new()],
        due: Some(Date {
            year: 2024,
            month: 12,
            day: 31,
        }),
        weight: 0.125,
    }
}

#[test]
fn struct_roundtrip_compact_and_pretty() {
    let task = sample_task();

    let mut back = Task::default();
    from_str(&to_string(&task).unwrap(), &mut back).unwrap();
    assert_eq!(back, task);

    let mut back = Task::default();
    from_str(&to_string_pretty(&task).unwrap(), &mut back).unwrap();
    assert_eq!(back, task);
}

#[test]
fn recursive_struct_roundtrip() {
    let list = Node {
        label: "head".to_string(),
        next: Some(Box::new(Node {
            label: "tail".to_string(),
            next: None,
        })),
    };
    let mut back = Node::default();
    from_str(&to_string(&list).unwrap(), &mut back).unwrap();
    assert_eq!(back, list);
}

#[test]
fn struct_dom_roundtrip() {
    let task = sample_task();
    let mut back = Task::default();
    from_value(&to_value(&task).unwrap(), &mut back).unwrap();
    assert_eq!(back, task);
}
