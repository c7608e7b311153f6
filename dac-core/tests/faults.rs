//! Fault propagation: a panic or malformed `divide` anywhere in the tree
//! must surface as a typed `DacError` at the root, not a thread abort,
//! regardless of how deep in the recursion it occurred.

use dac_core::{compute, DacError, FnCallbacks};

#[test]
fn degree_zero_is_rejected_before_any_work() {
    let callbacks = FnCallbacks::new(
        |n: u32| vec![n],
        |_n: &u32| true,
        |n: u32| n,
        |_children: Vec<u32>, _out: &mut u32| {},
    );
    assert!(matches!(compute(callbacks, 1u32, 0), Err(DacError::InvalidDegree)));
}

#[test]
fn empty_divide_is_malformed_regardless_of_depth() {
    let callbacks = FnCallbacks::new(
        |n: u32| if n == 0 { Vec::new() } else { vec![n - 1] },
        |n: &u32| *n == 0 && false, // never a base case; forces divide every time
        |n: u32| n,
        |_children: Vec<u32>, _out: &mut u32| {},
    );
    match compute(callbacks, 5u32, 4) {
        Err(DacError::RootFault(inner)) => assert!(matches!(*inner, DacError::MalformedDivide)),
        other => panic!("expected RootFault(MalformedDivide), got {other:?}"),
    }
}

#[test]
fn panic_in_solve_base_surfaces_as_callback_fault() {
    let callbacks = FnCallbacks::new(
        |n: u32| vec![n - 1, n - 1],
        |n: &u32| *n == 0,
        |_n: u32| -> u32 { panic!("unexpected base case input") },
        |children: Vec<u32>, out: &mut u32| *out = children.iter().sum(),
    );
    match compute(callbacks, 3u32, 4) {
        Err(DacError::RootFault(inner)) => assert!(matches!(*inner, DacError::CallbackFault(_))),
        other => panic!("expected RootFault(CallbackFault), got {other:?}"),
    }
}

#[test]
fn panic_deep_in_the_tree_still_reaches_the_root() {
    let callbacks = FnCallbacks::new(
        |n: u32| vec![n - 1, n - 1],
        |n: &u32| *n == 0,
        |n: u32| {
            if n == 0 {
                panic!("deep leaf fault")
            } else {
                0
            }
        },
        |children: Vec<u32>, out: &mut u32| *out = children.iter().sum(),
    );
    // Depth 6 means the panicking leaf is several combine-levels below the
    // root; the fault must still be the one observed, not a hang.
    match compute(callbacks, 6u32, 4) {
        Err(DacError::RootFault(inner)) => assert!(matches!(*inner, DacError::CallbackFault(_))),
        other => panic!("expected RootFault(CallbackFault), got {other:?}"),
    }
}

#[test]
fn panic_in_combine_surfaces_as_callback_fault() {
    let callbacks = FnCallbacks::new(
        |n: u32| vec![n - 1, n - 1],
        |n: &u32| *n == 0,
        |_n: u32| 1u32,
        |_children: Vec<u32>, _out: &mut u32| panic!("combine always fails"),
    );
    match compute(callbacks, 2u32, 4) {
        Err(DacError::RootFault(inner)) => assert!(matches!(*inner, DacError::CallbackFault(_))),
        other => panic!("expected RootFault(CallbackFault), got {other:?}"),
    }
}
