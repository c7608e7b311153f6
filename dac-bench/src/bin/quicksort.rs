//! Parallel quicksort using a Hoare partition scheme: `divide` partitions
//! the slice around a middle-element pivot and returns the two resulting
//! partitions; `combine` is a no-op concatenation, since the partitioning
//! itself already leaves every element in its final relative side.
//! Grounded in `quicksort_dac.cpp`, including its `CUTOFF` of 2000
//! elements below which the base case hands off to `sort_unstable`.

use clap::Parser;
use dac_bench::util::{generate_random_array, is_array_sorted, time_it};
use dac_core::{compute, FnCallbacks};

const CUTOFF: usize = 2000;

#[derive(Parser)]
#[command(about = "Sort a random array with parallel divide-and-conquer quicksort")]
struct Args {
    /// Number of elements to sort
    #[arg(short = 'n', long, default_value_t = 200_000)]
    n: usize,

    /// Number of worker threads
    #[arg(short = 'w', long, default_value_t = num_cpus::get())]
    workers: usize,
}

/// Hoare partition: returns (left_partition, right_partition), each
/// non-empty as long as the input has more than one distinct value
/// reachable by the pivot choice. Falls back to a plain midpoint split if
/// the pivot happens to be the minimum or maximum so `divide` never
/// degenerates to one empty side.
fn hoare_partition(mut v: Vec<i32>) -> Vec<Vec<i32>> {
    let len = v.len();
    let pivot = v[len / 2];
    let (mut i, mut j) = (0usize, len - 1);
    loop {
        while v[i] < pivot {
            i += 1;
        }
        while v[j] > pivot {
            j -= 1;
        }
        if i >= j {
            break;
        }
        v.swap(i, j);
        i += 1;
        if j == 0 {
            break;
        }
        j -= 1;
    }
    let split = (j + 1).clamp(1, len - 1);
    let right = v.split_off(split);
    vec![v, right]
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let input = generate_random_array(args.n);

    let callbacks = FnCallbacks::new(
        hoare_partition,
        |v: &Vec<i32>| v.len() <= CUTOFF,
        |mut v: Vec<i32>| {
            v.sort_unstable();
            v
        },
        |mut children: Vec<Vec<i32>>, out: &mut Vec<i32>| {
            let right = children.pop().unwrap();
            let mut left = children.pop().unwrap();
            left.extend(right);
            *out = left;
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
