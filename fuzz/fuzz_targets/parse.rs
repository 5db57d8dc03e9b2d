#![no_main]

use libfuzzer_sys::fuzz_target;

use tape_json::{Kind, Value};

// Never panic, and agree with serde_json on anything both parsers accept.
// Duplicate keys are excluded from the comparison: both sides collapse
// them, but not necessarily onto the same member.
fuzz_target!(|data: &[u8]| {
    let mut buf = data.to_vec();

    if let Ok(document) = tape_json::parse(&mut buf) {
        let ours = document.to_value();

        if has_duplicate_keys(document.root()) {
            return;
        }

        if let Ok(expected) = serde_json::from_slice::<serde_json::Value>(data) {
            assert!(
                value_eq(&expected, &ours),
                "parsers disagree: {} vs {}",
                expected,
                ours
            );
        }
    }
});

fn has_duplicate_keys(value: Value) -> bool {
    match value.kind() {
        Kind::Object => {
            // members are sorted, so duplicates are adjacent
            for index in 1..value.len() {
                if value.object_key(index - 1) == value.object_key(index) {
                    return true;
                }
            }

            value.members().any(|(_, member)| has_duplicate_keys(member))
        }
        Kind::Array => value.elements().any(has_duplicate_keys),
        _ => false,
    }
}

// Structural equality with numbers compared through their double views.
// Wide integers come back as doubles on our side, and long decimal literals
// can land an ulp or two away from serde_json's correctly rounded parse.
fn value_eq(a: &serde_json::Value, b: &serde_json::Value) -> bool {
    use serde_json::Value;

    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => {
                a == b || (a - b).abs() <= a.abs().max(b.abs()) * 1e-9
            }
            _ => false,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| value_eq(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).map_or(false, |b| value_eq(a, b)))
        }
        _ => a == b,
    }
}
