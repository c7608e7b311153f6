//! Error taxonomy for the divide-and-conquer skeleton.
//!
//! Every variant is fatal to the current invocation: nothing is retried, and
//! partial results are discarded. The first fault observed in time order wins
//! (see [`crate::pool::WorkerPool`]); later faults on other subtrees are
//! dropped on the floor.

/// A fault raised while driving a skeleton invocation.
#[derive(Debug, thiserror::Error)]
pub enum DacError {
    /// `degree` passed to [`crate::compute`] (or [`crate::Skeleton::new`]) was
    /// `0`. Rejected before any task is created.
    #[error("parallelism degree must be at least 1")]
    InvalidDegree,

    /// A `divide` callback returned an empty sequence for a non-base input.
    /// `is_base` is the only sanctioned recursion terminator.
    #[error("divide() returned no children for a non-base input")]
    MalformedDivide,

    /// A user callback (`divide`, `is_base`, `solve_base`, or `combine`)
    /// panicked. The panic is caught at the task boundary and reported here
    /// instead of unwinding across a worker thread.
    #[error("callback panicked: {0}")]
    CallbackFault(String),

    /// The root task's subtree produced a [`DacError::CallbackFault`] or
    /// [`DacError::MalformedDivide`] somewhere in its recursion. The result
    /// destination was left untouched.
    #[error("root task failed: {0}")]
    RootFault(Box<DacError>),
}

impl DacError {
    /// Build a [`DacError::CallbackFault`] from a caught panic payload.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = panic_message(&payload);
        DacError::CallbackFault(message)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_degree_message() {
        assert_eq!(
            DacError::InvalidDegree.to_string(),
            "parallelism degree must be at least 1"
        );
    }

    #[test]
    fn callback_fault_from_str_panic() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        match DacError::from_panic(payload) {
            DacError::CallbackFault(msg) => assert_eq!(msg, "boom"),
            other => panic!("expected CallbackFault, got {other:?}"),
        }
    }

    #[test]
    fn callback_fault_from_string_panic() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("kaboom"));
        match DacError::from_panic(payload) {
            DacError::CallbackFault(msg) => assert_eq!(msg, "kaboom"),
            other => panic!("expected CallbackFault, got {other:?}"),
        }
    }

    #[test]
    fn root_fault_wraps_cause() {
        let err = DacError::RootFault(Box::new(DacError::MalformedDivide));
        assert!(err.to_string().contains("divide() returned no children"));
    }
}
