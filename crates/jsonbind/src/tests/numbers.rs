use rstest::rstest;

use crate::{Error, from_str};

fn out_of_range<T: crate::Bind + Default>(input: &str) {
    let mut value = T::default();
    let status = from_str(input, &mut value).unwrap_err();
    assert!(
        matches!(
            status.errors.records(),
            [Error::NumberOutOfRange { .. }]
        ),
        "expected out-of-range for {input}: {status}"
    );
}

#[rstest]
#[case("2147483647", i32::MAX)]
#[case("-2147483648", i32::MIN)]
#[case("0", 0)]
fn i32_bounds_accepted(#[case] input: &str, #[case] expected: i32) {
    let mut value = 0i32;
    from_str(input, &mut value).unwrap();
    assert_eq!(value, expected);
}

#[rstest]
#[case::above_max("2147483648")]
#[case::below_min("-2147483649")]
#[case::far_above("9223372036854775807")]
fn i32_bounds_rejected(#[case] input: &str) {
    out_of_range::<i32>(input);
}

#[rstest]
#[case::u8_max_plus_one("256")]
#[case::negative("-1")]
fn u8_bounds_rejected(#[case] input: &str) {
    out_of_range::<u8>(input);
}

#[test]
fn u8_max_accepted() {
    let mut value = 0u8;
    from_str("255", &mut value).unwrap();
    assert_eq!(value, 255);
}

#[test]
fn i64_and_u64_extremes() {
    let mut value = 0i64;
    from_str("-9223372036854775808", &mut value).unwrap();
    assert_eq!(value, i64::MIN);
    from_str("9223372036854775807", &mut value).unwrap();
    assert_eq!(value, i64::MAX);

    let mut value = 0u64;
    from_str("18446744073709551615", &mut value).unwrap();
    assert_eq!(value, u64::MAX);
}

#[test]
fn u64_max_does_not_fit_i64() {
    out_of_range::<i64>("18446744073709551615");
}

#[test]
fn double_precision_guard_at_2_to_53() {
    let mut value = 0f64;
    from_str("9007199254740991", &mut value).unwrap();
    assert_eq!(value, 9_007_199_254_740_991.0);

    out_of_range::<f64>("9007199254740992");
    out_of_range::<f64>("-9007199254740992");
}

#[test]
fn f32_precision_guard_at_2_to_24() {
    let mut value = 0f32;
    from_str("16777215", &mut value).unwrap();
    assert_eq!(value, 16_777_215.0);

    out_of_range::<f32>("16777216");
    out_of_range::<f32>("3.5e38");
}

#[test]
fn fractional_number_into_integer_is_a_type_mismatch() {
    let mut value = 0i32;
    let status = from_str("1.5", &mut value).unwrap_err();
    assert!(matches!(
        status.errors.records(),
        [Error::TypeMismatch {
            actual: "double",
            ..
        }]
    ));
}

#[test]
fn small_integers_fit_floats() {
    let mut value = 0f64;
    from_str("-7", &mut value).unwrap();
    assert_eq!(value, -7.0);

    let mut value = 0f32;
    from_str("1024", &mut value).unwrap();
    assert_eq!(value, 1024.0);
}

#[test]
fn integer_beyond_u64_becomes_a_double() {
    let mut value = 0f64;
    from_str("36893488147419103232", &mut value).unwrap();
    assert_eq!(value, 36_893_488_147_419_103_232.0);
}

#[test]
fn string_is_not_a_number() {
    let mut value = 0u32;
    let status = from_str(r#""12""#, &mut value).unwrap_err();
    assert!(matches!(
        status.errors.records(),
        [Error::TypeMismatch {
            actual: "string",
            ..
        }]
    ));
}
