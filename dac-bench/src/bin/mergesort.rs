//! Parallel mergesort: split the array in half, sort each half
//! recursively, merge the two sorted halves back together. Grounded in
//! `mergesort_dac.cpp`; `CUTOFF` (2000 elements) matches the original,
//! below which the base case hands off to `sort_unstable`.

use clap::Parser;
use dac_bench::util::{generate_random_array, is_array_sorted, time_it};
use dac_core::{compute, FnCallbacks};

const CUTOFF: usize = 2000;

#[derive(Parser)]
#[command(about = "Sort a random array with parallel divide-and-conquer mergesort")]
struct Args {
    /// Number of elements to sort
    #[arg(short = 'n', long, default_value_t = 200_000)]
    n: usize,

    /// Number of worker threads
    #[arg(short = 'w', long, default_value_t = num_cpus::get())]
    workers: usize,
}

fn merge(mut left: Vec<i32>, right: Vec<i32>) -> Vec<i32> {
    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.drain(..).peekable();
    let mut right = right.into_iter().peekable();
    loop {
        match (left.peek(), right.peek()) {
            (Some(&l), Some(&r)) => {
                if l <= r {
                    out.push(left.next().unwrap());
                } else {
                    out.push(right.next().unwrap());
                }
            }
            (Some(_), None) => out.extend(left),
            (None, Some(_)) => out.extend(right),
            (None, None) => break,
        }
    }
    out
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let input = generate_random_array(args.n);

    let callbacks = FnCallbacks::new(
        |mut v: Vec<i32>| {
            let half = v.len() / 2;
            let right = v.split_off(half);
            vec![v, right]
        },
        |v: &Vec<i32>| v.len() <= CUTOFF,
        |mut v: Vec<i32>| {
            v.sort_unstable();
            v
        },
        |mut children: Vec<Vec<i32>>, out: &mut Vec<i32>| {
            let right = children.pop().unwrap();
            let left = children.pop().unwrap();
            *out = merge(left, right);
        },
    );

    let (result, elapsed) = time_it(|| compute(callbacks, input, args.workers));
    match result {
        Ok(sorted) => {
            println!(
                "sorted {} elements in {elapsed:?} with {} workers, sorted = {}",
                sorted.len(),
                args.workers,
                is_array_sorted(&sorted)
            );
        }
        Err(err) => eprintln!("computation failed: {err}"),
    }
}
