use alloc::{
    boxed::Box,
    rc::Rc,
    string::{String, ToString},
    vec::Vec,
};
use core::cell::RefCell;

use quickcheck::QuickCheck;

use crate::{ParserOptions, PathSegment, Value, parse, parse_with_options};

use super::util::{assert_monotonic, oracle};

/// Cuts `src` into chunks whose sizes are derived from `splits`; shared by
/// the partition-fuzzing properties below.
fn chunks_from_splits(src: &str, splits: &[usize]) -> Vec<String> {
    let chars: Vec<char> = src.chars().collect();
    let mut chunks = Vec::new();
    let mut idx = 0;
    let mut remaining = chars.len();
    for s in splits {
        if remaining == 0 {
            break;
        }
        let size = 1 + (s % remaining);
        let end = idx + size;
        chunks.push(chars[idx..end].iter().collect());
        idx = end;
        remaining -= size;
    }
    if remaining > 0 {
        chunks.push(chars[idx..].iter().collect());
    }
    chunks
}

/// Final snapshot equals the oracle parse, every adjacent snapshot pair is
/// monotonic, and stringifying the result round-trips — for any value and
/// any partition of its text.
#[test]
fn partitioned_parse_matches_oracle() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value, splits: Vec<usize>) -> bool {
        let src = value.to_string();
        let chunks = chunks_from_splits(&src, &splits);

        let snapshots: Vec<Value> = parse(chunks.iter().map(String::as_str))
            .collect::<Result<_, _>>()
            .expect("serialized value parses");
        for pair in snapshots.windows(2) {
            assert_monotonic(&pair[0], &pair[1]);
        }

        let last = snapshots.last().expect("at least one snapshot");
        let expected = oracle(&src);
        *last == expected && oracle(&last.to_string()) == expected
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(Value, Vec<usize>) -> bool);
}

/// The completion callback sequence does not depend on how the text is
/// chunked.
#[test]
fn completion_sequence_is_partition_independent() {
    fn completions(chunks: &[String]) -> Vec<(String, Vec<PathSegment>)> {
        let log: Rc<RefCell<Vec<(String, Vec<PathSegment>)>>> = Rc::default();
        let sink = Rc::clone(&log);
        let options = ParserOptions {
            on_complete: Some(Box::new(move |value, path| {
                sink.borrow_mut().push((value.to_string(), path.segments()));
            })),
        };
        for item in parse_with_options(chunks.iter().map(String::as_str), options) {
            item.unwrap();
        }
        Rc::try_unwrap(log).unwrap().into_inner()
    }

    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value, splits: Vec<usize>) -> bool {
        let src = value.to_string();
        let whole = completions(&[src.clone()]);
        let chunked = completions(&chunks_from_splits(&src, &splits));
        whole == chunked
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(Value, Vec<usize>) -> bool);
}
