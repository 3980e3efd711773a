use alloc::{
    collections::{BTreeMap, VecDeque},
    string::{String, ToString},
    vec,
    vec::Vec,
};

use crate::{Error, from_str, to_string, tests::fixtures::Date};

#[test]
fn vec_of_scalars() {
    let mut values: Vec<i32> = Vec::new();
    from_str("[3, -1, 4]", &mut values).unwrap();
    assert_eq!(values, vec![3, -1, 4]);
}

#[test]
fn empty_array() {
    let mut values: Vec<i32> = vec![9, 9];
    from_str("[]", &mut values).unwrap();
    assert!(values.is_empty());
}

#[test]
fn nested_vectors() {
    let mut values: Vec<Vec<u32>> = Vec::new();
    from_str("[[1, 2], [], [3]]", &mut values).unwrap();
    assert_eq!(values, vec![vec![1, 2], vec![], vec![3]]);
}

#[test]
fn three_dimensional_tensor() {
    let mut values: Vec<Vec<Vec<u8>>> = Vec::new();
    from_str("[[[1], [2, 3]], [[4]]]", &mut values).unwrap();
    assert_eq!(
        values,
        vec![vec![vec![1], vec![2, 3]], vec![vec![4]]]
    );
}

#[test]
fn vec_of_objects() {
    let mut values: Vec<Date> = Vec::new();
    from_str(
        r#"[{"year": 1, "month": 2, "day": 3}, {"year": 4, "month": 5, "day": 6}]"#,
        &mut values,
    )
    .unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[1].year, 4);
}

#[test]
fn deque_parses_like_vec() {
    let mut values: VecDeque<i64> = VecDeque::new();
    from_str("[10, 20]", &mut values).unwrap();
    assert_eq!(values, VecDeque::from(vec![10, 20]));
}

#[test]
fn fixed_array_in_place() {
    let mut values = [0u8; 3];
    from_str("[7, 8, 9]", &mut values).unwrap();
    assert_eq!(values, [7, 8, 9]);
}

#[test]
fn map_of_scalars() {
    let mut map: BTreeMap<String, i32> = BTreeMap::new();
    from_str(r#"{"a": 1, "b": 2}"#, &mut map).unwrap();
    assert_eq!(map.get("a"), Some(&1));
    assert_eq!(map.get("b"), Some(&2));
}

#[test]
fn map_duplicate_keys_last_wins() {
    let mut map: BTreeMap<String, i32> = BTreeMap::new();
    from_str(r#"{"a": 1, "a": 3}"#, &mut map).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("a"), Some(&3));
}

#[test]
fn map_of_objects() {
    let mut map: BTreeMap<String, Date> = BTreeMap::new();
    from_str(
        r#"{"start": {"year": 2024, "month": 1, "day": 1}}"#,
        &mut map,
    )
    .unwrap();
    assert_eq!(map.get("start").map(|d| d.year), Some(2024));
}

#[test]
fn map_is_cleared_on_reparse_input() {
    let mut map: BTreeMap<String, i32> = BTreeMap::new();
    from_str(r#"{"a": 1, "b": 2}"#, &mut map).unwrap();
    from_str(r#"{"c": 3}"#, &mut map).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("c"), Some(&3));
}

#[test]
fn map_member_failure_names_the_key() {
    let mut map: BTreeMap<String, u8> = BTreeMap::new();
    let status = from_str(r#"{"ok": 1, "bad": 999}"#, &mut map).unwrap_err();
    assert_eq!(
        status.errors.records(),
        &[
            Error::NumberOutOfRange {
                expected: "u8".into(),
                actual: "uint",
            },
            Error::ObjectMember {
                name: "bad".to_string(),
            },
        ]
    );
}

#[test]
fn pair_tuple() {
    let mut pair = (0i32, String::new());
    from_str(r#"[5, "five"]"#, &mut pair).unwrap();
    assert_eq!(pair, (5, "five".to_string()));
}

#[test]
fn triple_with_nested_object() {
    let mut triple = (String::new(), Date::default(), false);
    from_str(
        r#"["begin", {"year": 1, "month": 2, "day": 3}, true]"#,
        &mut triple,
    )
    .unwrap();
    assert_eq!(triple.0, "begin");
    assert_eq!(triple.1.day, 3);
    assert!(triple.2);
}

#[test]
fn tuple_arity_mismatch() {
    let mut pair = (0i32, String::new());
    let status = from_str(r#"[1, "x", 2]"#, &mut pair).unwrap_err();
    assert_eq!(
        status.errors.records(),
        &[Error::ArrayLengthMismatch {
            expected: 2,
            actual: 3,
        }]
    );

    let status = from_str("[1]", &mut pair).unwrap_err();
    assert_eq!(
        status.errors.records(),
        &[Error::ArrayLengthMismatch {
            expected: 2,
            actual: 1,
        }]
    );
}

#[test]
fn tuple_element_failure_reports_its_index() {
    let mut pair = (0i32, String::new());
    let status = from_str(r#"["x", "y"]"#, &mut pair).unwrap_err();
    assert_eq!(
        status.errors.records(),
        &[
            Error::TypeMismatch {
                expected: "i32".into(),
                actual: "string",
            },
            Error::ArrayElement { index: 0 },
        ]
    );
}

#[test]
fn containers_write_back_out() {
    let mut map: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    map.insert("a".to_string(), vec![1, 2]);
    map.insert("b".to_string(), vec![]);
    assert_eq!(to_string(&map).unwrap(), r#"{"a":[1,2],"b":[]}"#);

    let tuple = (1u8, "x".to_string(), false);
    assert_eq!(to_string(&tuple).unwrap(), r#"[1,"x",false]"#);

    let fixed = [1.5f64, 2.0];
    assert_eq!(to_string(&fixed).unwrap(), "[1.5,2.0]");
}
