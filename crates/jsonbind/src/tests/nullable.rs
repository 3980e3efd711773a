use alloc::{boxed::Box, rc::Rc, string::ToString, sync::Arc, vec, vec::Vec};

use crate::{from_str, to_string, tests::fixtures::{Date, Node}};

#[test]
fn null_clears_and_value_fills() {
    let mut slot: Option<i32> = Some(7);
    from_str("null", &mut slot).unwrap();
    assert_eq!(slot, None);

    from_str("5", &mut slot).unwrap();
    assert_eq!(slot, Some(5));
}

#[test]
fn nested_optionals() {
    let mut slot: Option<Option<i32>> = None;
    from_str("5", &mut slot).unwrap();
    assert_eq!(slot, Some(Some(5)));

    from_str("null", &mut slot).unwrap();
    assert_eq!(slot, None);
}

#[test]
fn optional_object_initializes_lazily() {
    let mut slot: Option<Date> = None;
    from_str(r#"{"year": 2024, "month": 2, "day": 29}"#, &mut slot).unwrap();
    assert_eq!(
        slot,
        Some(Date {
            year: 2024,
            month: 2,
            day: 29
        })
    );
}

#[test]
fn optional_vec_with_nested_null_elements() {
    let mut slot: Option<Vec<Option<u32>>> = None;
    from_str("[1, null, 3]", &mut slot).unwrap();
    assert_eq!(slot, Some(vec![Some(1), None, Some(3)]));
}

#[test]
fn recursive_type_through_boxed_indirection() {
    let mut list = Node::default();
    from_str(
        r#"{"label": "a", "next": {"label": "b", "next": {"label": "c", "next": null}}}"#,
        &mut list,
    )
    .unwrap();
    assert_eq!(list.label, "a");
    let b = list.next.as_deref().unwrap();
    assert_eq!(b.label, "b");
    let c = b.next.as_deref().unwrap();
    assert_eq!(c.label, "c");
    assert!(c.next.is_none());
}

#[test]
fn recursive_type_writes_back_out() {
    let list = Node {
        label: "a".to_string(),
        next: Some(Box::new(Node {
            label: "b".to_string(),
            next: None,
        })),
    };
    assert_eq!(
        to_string(&list).unwrap(),
        r#"{"label":"a","next":{"label":"b","next":null}}"#
    );
}

#[test]
fn shared_ownership_wrappers_delegate() {
    let mut shared: Rc<Date> = Rc::new(Date::default());
    from_str(r#"{"year": 1, "month": 2, "day": 3}"#, &mut shared).unwrap();
    assert_eq!(shared.year, 1);

    let mut shared: Arc<Vec<u8>> = Arc::new(Vec::new());
    from_str("[1, 2]", &mut shared).unwrap();
    assert_eq!(*shared, vec![1, 2]);

    let mut boxed: Box<i64> = Box::new(0);
    from_str("-9", &mut boxed).unwrap();
    assert_eq!(*boxed, -9);
    assert_eq!(to_string(&boxed).unwrap(), "-9");
}

#[test]
fn make_mut_leaves_other_handles_untouched() {
    let original: Rc<Date> = Rc::new(Date {
        year: 1999,
        ..Date::default()
    });
    let mut parsed = Rc::clone(&original);
    from_str(r#"{"year": 2001, "month": 1, "day": 1}"#, &mut parsed).unwrap();
    assert_eq!(original.year, 1999);
    assert_eq!(parsed.year, 2001);
}
