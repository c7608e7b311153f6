//! A generic divide-and-conquer parallel skeleton.
//!
//! Callers describe how to split a problem (`divide`), recognize a base
//! case (`is_base`), solve it sequentially (`solve_base`), and fold child
//! results back together (`combine`); this crate drives the resulting
//! recursion tree on a fixed-size pool of work-stealing worker threads and
//! hands back the root's result.
//!
//! ```
//! use dac_core::{compute, FnCallbacks};
//!
//! let callbacks = FnCallbacks::new(
//!     |n: u32| vec![n - 1, n - 2],
//!     |n: &u32| *n <= 2,
//!     |_n: u32| 1u32,
//!     |children: Vec<u32>, out: &mut u32| *out = children.iter().sum(),
//! );
//! assert_eq!(compute(callbacks, 10u32, 4).unwrap(), 55);
//! ```

mod callbacks;
mod error;
mod executor;
mod pool;
mod skeleton;
mod task;

pub use callbacks::{DacCallbacks, FnCallbacks};
pub use error::DacError;
pub use skeleton::{compute, Skeleton};
