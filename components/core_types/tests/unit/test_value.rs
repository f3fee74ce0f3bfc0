//! Unit tests for Value display and strict equality

use core_types::Value;

#[test]
fn test_display_matches_script_rendering() {
    assert_eq!(Value::Undefined.to_string(), "undefined");
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::Boolean(false).to_string(), "false");
    assert_eq!(Value::Smi(-7).to_string(), "-7");
    assert_eq!(Value::Double(2.5).to_string(), "2.5");
    assert_eq!(Value::Double(832040.0).to_string(), "832040");
    assert_eq!(Value::Double(f64::NAN).to_string(), "NaN");
    assert_eq!(Value::Double(f64::NEG_INFINITY).to_string(), "-Infinity");
    assert_eq!(Value::from("e3d3fa4d").to_string(), "e3d3fa4d");
}

#[test]
fn test_registered_fib_values_verify() {
    for (actual, expected) in [(6765i64, 6765), (75025, 75025), (832040, 832040)] {
        assert_eq!(Value::from(actual), Value::Smi(expected));
    }
}

#[test]
fn test_off_by_one_fails_verification() {
    assert_ne!(Value::Smi(6764), Value::Smi(6765));
}

#[test]
fn test_hash_strings_compare_exactly() {
    let a = Value::from("8d7706b9d21f5ea62d147c19400a643163cef58e511fbe71138e42df3f880563");
    let b = Value::from("8D7706B9D21F5EA62D147C19400A643163CEF58E511FBE71138E42DF3F880563");
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
}
