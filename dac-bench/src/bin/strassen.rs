//! Strassen matrix multiplication: at each level, split both operands
//! into quadrants, form Strassen's seven sub-products as the divide step's
//! seven children, and assemble the four result quadrants from them in
//! `combine`. Grounded in `strassen_dac.cpp`; `CUTOFF` (128) is the matrix
//! size below which the base case falls back to the naive `compactMatmul`
//! triple loop.

use clap::Parser;
use dac_bench::util::{time_it, Matrix};
use dac_core::{compute, FnCallbacks};

const CUTOFF: usize = 128;

#[derive(Parser)]
#[command(about = "Multiply two random square matrices with parallel Strassen divide-and-conquer")]
struct Args {
    /// Matrix size; rounded up to the next power of two
    #[arg(short = 'n', long, default_value_t = 256)]
    n: usize,

    /// Number of worker threads
    #[arg(short = 'w', long, default_value_t = num_cpus::get())]
    workers: usize,
}

fn next_power_of_two(n: usize) -> usize {
    n.next_power_of_two().max(1)
}

fn strassen_divide(op: (Matrix, Matrix)) -> Vec<(Matrix, Matrix)> {
    let (a, b) = op;
    let [a11, a12, a21, a22] = a.split_quadrants();
    let [b11, b12, b21, b22] = b.split_quadrants();

    vec![
        (a11.add(&a22), b11.add(&b22)), // p1 = (a11+a22)(b11+b22)
        (a21.add(&a22), b11.clone()),   // p2 = (a21+a22) b11
        (a11.clone(), b12.sub(&b22)),   // p3 = a11 (b12-b22)
        (a22.clone(), b21.sub(&b11)),   // p4 = a22 (b21-b11)
        (a11.add(&a12), b22.clone()),   // p5 = (a11+a12) b22
        (a21.sub(&a11), b11.add(&b12)), // p6 = (a21-a11)(b11+b12)
        (a12.sub(&a22), b21.add(&b22)), // p7 = (a12-a22)(b21+b22)
    ]
}

fn strassen_combine(products: Vec<Matrix>) -> Matrix {
    let [p1, p2, p3, p4, p5, p6, p7] = products.try_into().unwrap_or_else(|v: Vec<Matrix>| {
        panic!("strassen combine expects exactly 7 products, got {}", v.len())
    });
    let c11 = p1.add(&p4).sub(&p5).add(&p7);
    let c12 = p3.add(&p5);
    let c21 = p2.add(&p4);
    let c22 = p1.sub(&p2).add(&p3).add(&p6);
    Matrix::from_quadrants([c11, c12, c21, c22])
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let n = next_power_of_two(args.n);

    let a = Matrix::random(n);
    let b = Matrix::random(n);
    let expected = if n <= 512 { Some(a.matmul(&b)) } else { None };

    let callbacks = FnCallbacks::new(
        strassen_divide,
        |(a, _b): &(Matrix, Matrix)| a.n <= CUTOFF,
        |(a, b): (Matrix, Matrix)| a.matmul(&b),
        |children: Vec<Matrix>, out: &mut Matrix| *out = strassen_combine(children),
    );

    let (result, elapsed) = time_it(|| compute(callbacks, (a, b), args.workers));
    match result {
        Ok(product) => {
            let matches = expected.as_ref().map(|e| e.approx_eq(&product));
            println!(
                "multiplied {n}x{n} matrices in {elapsed:?} with {} workers, matches naive = {matches:?}",
                args.workers
            );
        }
        Err(err) => eprintln!("computation failed: {err}"),
    }
}
