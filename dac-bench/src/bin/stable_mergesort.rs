//! Stable parallel mergesort: each element is tagged with its original
//! index before sorting so the result can be checked for stability (equal
//! keys keep their relative input order), the way `stable_mergesort_dac.cpp`
//! verifies its own output against comparator misuse. `CUTOFF` (500
//! elements) matches the original; the base case uses a stable sort.

use clap::Parser;
use dac_bench::util::time_it;
use dac_core::{compute, FnCallbacks};

const CUTOFF: usize = 500;

#[derive(Parser)]
#[command(about = "Stability-checked parallel divide-and-conquer mergesort")]
struct Args {
    /// Number of elements to sort
    #[arg(short = 'n', long, default_value_t = 200_000)]
    n: usize,

    /// Number of worker threads
    #[arg(short = 'w', long, default_value_t = num_cpus::get())]
    workers: usize,

    /// Value range, small enough to force frequent ties
    #[arg(long, default_value_t = 100)]
    value_range: i32,
}

/// `(value, original_index)`; sorting by `value` alone leaves ties
/// ambiguous, so a stability check needs the index carried alongside it.
type Keyed = (i32, usize);

fn generate_keyed_input(n: usize, value_range: i32) -> Vec<Keyed> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..n).map(|i| (rng.gen_range(0..value_range), i)).collect()
}

/// A merge is stable when, given two already-stable-sorted runs, ties
/// prefer the left run's element first — since everything in `left`
/// originated earlier than everything in `right`.
fn stable_merge(mut left: Vec<Keyed>, right: Vec<Keyed>) -> Vec<Keyed> {
    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.drain(..).peekable();
    let mut right = right.into_iter().peekable();
    loop {
        match (left.peek(), right.peek()) {
            (Some(&l), Some(&r)) => {
                if l.0 <= r.0 {
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

/// `true` if, for every run of equal `value`s in `sorted`, the original
/// indices appear in increasing order.
fn is_stable(sorted: &[Keyed]) -> bool {
    sorted.windows(2).all(|w| {
        let (v0, i0) = w[0];
        let (v1, i1) = w[1];
        v0 < v1 || (v0 == v1 && i0 < i1)
    })
}

fn is_value_sorted(sorted: &[Keyed]) -> bool {
    sorted.windows(2).all(|w| w[0].0 <= w[1].0)
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let input = generate_keyed_input(args.n, args.value_range);

    let callbacks = FnCallbacks::new(
        |mut v: Vec<Keyed>| {
            let half = v.len() / 2;
            let right = v.split_off(half);
            vec![v, right]
        },
        |v: &Vec<Keyed>| v.len() <= CUTOFF,
        |mut v: Vec<Keyed>| {
            v.sort_by_key(|&(value, index)| (value, index));
            v
        },
        |mut children: Vec<Vec<Keyed>>, out: &mut Vec<Keyed>| {
            let right = children.pop().unwrap();
            let left = children.pop().unwrap();
            *out = stable_merge(left, right);
        },
    );

    let (result, elapsed) = time_it(|| compute(callbacks, input, args.workers));
    match result {
        Ok(sorted) => {
            println!(
                "sorted {} elements in {elapsed:?} with {} workers, sorted = {}, stable = {}",
                sorted.len(),
                args.workers,
                is_value_sorted(&sorted),
                is_stable(&sorted)
            );
        }
        Err(err) => eprintln!("computation failed: {err}"),
    }
}
