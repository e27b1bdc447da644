use googletest::prelude::*;
use std::sync::Barrier;
use std::thread;
use wadis::TypeInterner;
use wadis::types::{FunctionType, TypeTuple, ValueType};

const THREADS: usize = 8;
const ROUNDS: usize = 64;

const VALUE_TYPES: [ValueType; 6] = [
    ValueType::Any,
    ValueType::I32,
    ValueType::I64,
    ValueType::F32,
    ValueType::F64,
    ValueType::V128,
];

/// Element lists unique to `round` and `salt`, so every round registers tuples nobody has
/// interned before.
fn fresh_elems(salt: ValueType, round: usize) -> Vec<ValueType> {
    let mut elems = vec![salt; 9];
    let mut rest = round;
    for _ in 0..4 {
        elems.push(VALUE_TYPES[rest % VALUE_TYPES.len()]);
        rest /= VALUE_TYPES.len();
    }
    elems
}

/// Runs `register` on every thread at once and collects the results.
fn race<T: Send>(register: impl Fn() -> T + Sync) -> Vec<T> {
    let barrier = Barrier::new(THREADS);
    thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    register()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[gtest]
fn concurrent_tuple_registration_yields_one_identity() {
    for round in 0..ROUNDS {
        let elems = fresh_elems(ValueType::F64, round);
        let tuples = race(|| TypeTuple::new(&elems));

        for tuple in &tuples {
            expect_that!(std::ptr::eq(tuple.as_slice(), tuples[0].as_slice()), eq(true));
            expect_that!(tuple.as_slice(), eq(&elems[..]));
        }
    }
}

#[gtest]
fn concurrent_function_registration_yields_one_encoding() {
    for round in 0..ROUNDS {
        let results = fresh_elems(ValueType::I64, round);
        let params = fresh_elems(ValueType::V128, round);
        let encodings = race(|| {
            FunctionType::new(TypeTuple::new(&results), TypeTuple::new(&params)).encoding()
        });

        for encoding in &encodings {
            expect_that!(*encoding, eq(encodings[0]));
        }
        let sig = FunctionType::from_encoding(encodings[0]).unwrap();
        expect_that!(sig.params().as_slice(), eq(&params[..]));
        expect_that!(sig.results().as_slice(), eq(&results[..]));
    }
}

#[gtest]
fn distinct_contents_get_distinct_handles() {
    let a = TypeTuple::new(&[ValueType::I32, ValueType::I64]);
    let b = TypeTuple::new(&[ValueType::I64, ValueType::I32]);
    expect_that!(a == b, eq(false));

    let f = FunctionType::new(a, b);
    let g = FunctionType::new(b, a);
    expect_that!(f == g, eq(false));
    expect_that!(f == FunctionType::new(a, b), eq(true));
}

#[gtest]
fn registration_never_shrinks_the_table() {
    let interner = TypeInterner::global();
    let before = interner.function_count();
    FunctionType::new([ValueType::F32, ValueType::F32, ValueType::F32], TypeTuple::empty());
    expect_that!(interner.function_count(), ge(before));
}

#[gtest]
fn empty_tuples_are_shared() {
    expect_that!(TypeTuple::empty() == TypeTuple::new(&[]), eq(true));
    expect_that!(TypeTuple::empty().to_string(), eq("()"));
    expect_that!(TypeTuple::new(&[ValueType::I32]).to_string(), eq("i32"));
}
