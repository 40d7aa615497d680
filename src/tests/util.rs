use alloc::{string::String, vec::Vec};

use crate::{ParseError, Value, parse};

/// Split `payload` into approximately equal-sized chunks without breaking
/// UTF-8 code points.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &str, parts: usize) -> Vec<&str> {
    assert!(parts > 0);
    let len = payload.len();
    let chunk_size = len.div_ceil(parts).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < len {
        let mut end = core::cmp::min(start + chunk_size, len);
        while end < len && !payload.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&payload[start..end]);
        start = end;
    }
    chunks
}

/// Every snapshot yielded for the given chunk sequence.
pub fn collect_values(chunks: &[&str]) -> Result<Vec<Value>, ParseError> {
    parse(chunks.iter().copied()).collect()
}

/// The final, complete value for the given chunk sequence.
pub fn final_value(chunks: &[&str]) -> Value {
    collect_values(chunks)
        .expect("document parses")
        .pop()
        .expect("at least one snapshot")
}

/// The error a chunk sequence ends in.
pub fn parse_err(chunks: &[&str]) -> ParseError {
    for item in parse(chunks.iter().copied()) {
        if let Err(e) = item {
            return e;
        }
    }
    panic!("expected the parse to fail");
}

/// Parses `text` with the reference non-streaming parser.
pub fn oracle(text: &str) -> Value {
    let v: serde_json::Value = serde_json::from_str(text).expect("oracle accepts the document");
    from_oracle(&v)
}

fn from_oracle(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().expect("finite number")),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::Array(items.iter().map(from_oracle).collect()),
        serde_json::Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (String::from(k.as_str()), from_oracle(v)))
                .collect(),
        ),
    }
}

/// Checks the monotonicity contract between two consecutive snapshots:
/// types are stable, strings only grow by suffix, containers only change at
/// the tail, scalars never change.
pub fn assert_monotonic(prev: &Value, next: &Value) {
    match (prev, next) {
        (Value::String(a), Value::String(b)) => {
            assert!(
                b.starts_with(a.as_str()),
                "string must grow by suffix: {a:?} -> {b:?}"
            );
        }
        (Value::Array(a), Value::Array(b)) => {
            assert!(a.len() <= b.len(), "array must not shrink");
            if let Some((last, head)) = a.split_last() {
                for (x, y) in head.iter().zip(b) {
                    assert_eq!(x, y, "non-tail array entries must not change");
                }
                assert_monotonic(last, &b[a.len() - 1]);
            }
        }
        (Value::Object(a), Value::Object(b)) => {
            assert!(a.len() <= b.len(), "object must not shrink");
            for (i, (key, value)) in a.iter().enumerate() {
                let (next_key, next_value) = b.get_index(i).expect("entry is still present");
                assert_eq!(key, next_key, "key order must not change");
                if i + 1 < a.len() {
                    assert_eq!(value, next_value, "non-tail members must not change");
                } else {
                    assert_monotonic(value, next_value);
                }
            }
        }
        (a, b) => assert_eq!(a, b, "scalars are atomic and types are stable"),
    }
}
