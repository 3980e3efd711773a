use alloc::{string::ToString, vec};

use crate::{
    ParseState, ReadOptions, read_str_with,
    tests::fixtures::{Date, Priority, Task},
};

#[test]
fn reused_state_parses_repeatedly_without_stale_data() {
    let mut task = Task::default();
    let mut state = <Task as crate::Bind>::State::default();
    let options = ReadOptions::default();

    read_str_with(
        r#"{
            "id": 1,
            "title": "first",
            "done": true,
            "priority": "high",
            "tags": ["a", "b", "c"],
            "due": {"year": 2024, "month": 1, "day": 1}
        }"#,
        &mut task,
        &mut state,
        &options,
    )
    .unwrap();
    assert_eq!(task.tags.len(), 3);
    assert!(task.due.is_some());

    read_str_with(
        r#"{
            "id": 2,
            "title": "second",
            "done": false,
            "priority": "low",
            "tags": ["z"],
            "due": null
        }"#,
        &mut task,
        &mut state,
        &options,
    )
    .unwrap();

    assert_eq!(task.id, 2);
    assert_eq!(task.title, "second");
    assert!(!task.done);
    assert_eq!(task.priority, Priority::Low);
    // Fully overwritten, not appended.
    assert_eq!(task.tags, vec!["z".to_string()]);
    // A populated optional clears back to empty on null.
    assert_eq!(task.due, None);
}

#[test]
fn reuse_after_a_failed_parse() {
    let mut date = Date::default();
    let mut state = <Date as crate::Bind>::State::default();
    let options = ReadOptions::default();

    assert!(read_str_with(r#"{"year": "nope"}"#, &mut date, &mut state, &options).is_err());

    read_str_with(
        r#"{"year": 2030, "month": 12, "day": 31}"#,
        &mut date,
        &mut state,
        &options,
    )
    .unwrap();
    assert_eq!(
        date,
        Date {
            year: 2030,
            month: 12,
            day: 31
        }
    );
}

#[test]
fn explicit_reset_clears_parse_progress() {
    let mut date = Date::default();
    let mut state = <Date as crate::Bind>::State::default();
    let options = ReadOptions::default();

    read_str_with(
        r#"{"year": 1, "month": 2, "day": 3}"#,
        &mut date,
        &mut state,
        &options,
    )
    .unwrap();
    assert!(state.is_parsed());

    state.reset();
    assert!(!state.is_parsed());
}
