//! Fibonacci-shaped recursion tree: `fib(n) = fib(n - 1) + fib(n - 2)`,
//! base case at `n <= 2`. Grounded in `fibonacci_dac.cpp`, the simplest of
//! the five original drivers — no base-case cutoff tuning, since every
//! leaf does O(1) work regardless of `n`.

use clap::Parser;
use dac_bench::util::time_it;
use dac_core::{compute, FnCallbacks};

#[derive(Parser)]
#[command(about = "Compute a Fibonacci-shaped divide-and-conquer sum tree")]
struct Args {
    /// Tree depth parameter (fib(n))
    #[arg(short = 'n', long, default_value_t = 30)]
    n: u64,

    /// Number of worker threads
    #[arg(short = 'w', long, default_value_t = num_cpus::get())]
    workers: usize,
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let callbacks = FnCallbacks::new(
        |n: u64| vec![n - 1, n - 2],
        |n: &u64| *n <= 2,
        |_n: u64| 1u64,
        |children: Vec<u64>, out: &mut u64| *out = children.iter().sum(),
    );

    let (result, elapsed) = time_it(|| compute(callbacks, args.n, args.workers));
    match result {
        Ok(value) => println!("fib_sum({}) = {value} in {elapsed:?} with {} workers", args.n, args.workers),
        Err(err) => eprintln!("computation failed: {err}"),
    }
}
