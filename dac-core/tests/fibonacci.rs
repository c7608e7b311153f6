//! End-to-end scenario 1: a Fibonacci-shaped sum tree, checked against a
//! plain recursive oracle.

use dac_core::{compute, FnCallbacks};

fn callbacks() -> FnCallbacks<
    u64,
    u64,
    impl Fn(u64) -> Vec<u64>,
    impl Fn(&u64) -> bool,
    impl Fn(u64) -> u64,
    impl Fn(Vec<u64>, &mut u64),
> {
    FnCallbacks::new(
        |n: u64| vec![n - 1, n - 2],
        |n: &u64| *n <= 2,
        |_n: u64| 1u64,
        |children: Vec<u64>, out: &mut u64| *out = children.iter().sum(),
    )
}

fn seq_fib_sum(n: u64) -> u64 {
    if n <= 2 {
        1
    } else {
        seq_fib_sum(n - 1) + seq_fib_sum(n - 2)
    }
}

#[test]
fn matches_sequential_oracle_across_sizes() {
    for n in [1, 2, 3, 10, 20, 25] {
        assert_eq!(compute(callbacks(), n, 4).unwrap(), seq_fib_sum(n), "n = {n}");
    }
}

#[test]
fn result_is_independent_of_worker_count() {
    let expected = seq_fib_sum(22);
    for degree in [1, 2, 3, 8] {
        assert_eq!(compute(callbacks(), 22u64, degree).unwrap(), expected);
    }
}
