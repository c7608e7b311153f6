//! A computation's result must not depend on how many worker threads ran
//! it: same input, same callbacks, any `degree`, same output.

use dac_core::{compute, FnCallbacks};

fn sum_tree_callbacks() -> FnCallbacks<
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

fn sort_callbacks() -> FnCallbacks<
    Vec<i32>,
    Vec<i32>,
    impl Fn(Vec<i32>) -> Vec<Vec<i32>>,
    impl Fn(&Vec<i32>) -> bool,
    impl Fn(Vec<i32>) -> Vec<i32>,
    impl Fn(Vec<Vec<i32>>, &mut Vec<i32>),
> {
    FnCallbacks::new(
        |mut v: Vec<i32>| {
            let half = v.len() / 2;
            let right = v.split_off(half);
            vec![v, right]
        },
        |v: &Vec<i32>| v.len() <= 3,
        |mut v: Vec<i32>| {
            v.sort_unstable();
            v
        },
        |mut children: Vec<Vec<i32>>, out: &mut Vec<i32>| {
            let right = children.pop().unwrap();
            let left = children.pop().unwrap();
            let mut merged = Vec::with_capacity(left.len() + right.len());
            let mut l = left.into_iter().peekable();
            let mut r = right.into_iter().peekable();
            loop {
                match (l.peek(), r.peek()) {
                    (Some(&a), Some(&b)) => merged.push(if a <= b { l.next().unwrap() } else { r.next().unwrap() }),
                    (Some(_), None) => {
                        merged.extend(l);
                        break;
                    }
                    (None, Some(_)) => {
                        merged.extend(r);
                        break;
                    }
                    (None, None) => break,
                }
            }
            *out = merged;
        },
    )
}

#[test]
fn sum_tree_result_is_degree_invariant() {
    let expected = compute(sum_tree_callbacks(), 26u64, 1).unwrap();
    for degree in [2, 3, 4, 6, 16] {
        assert_eq!(compute(sum_tree_callbacks(), 26u64, degree).unwrap(), expected);
    }
}

#[test]
fn sort_result_is_degree_invariant() {
    let input: Vec<i32> = (0..2000).map(|i| (i * 2_654_435_761u32) as i32).collect();
    let expected = compute(sort_callbacks(), input.clone(), 1).unwrap();
    for degree in [2, 4, 8] {
        assert_eq!(compute(sort_callbacks(), input.clone(), degree).unwrap(), expected);
    }
}
