//! The callback bundle (C1): the four user-supplied operations that turn a
//! generic worker pool into a specific divide-and-conquer computation.

/// The four operations a caller must supply to drive the skeleton.
///
/// An implementation is held behind an `Arc` for the lifetime of one
/// [`crate::compute`] invocation and shared read-only across every worker
/// thread, so it must be `Send + Sync`.
pub trait DacCallbacks<P, R>: Send + Sync {
    /// Split a non-base problem into an ordered sequence of sub-problems.
    /// Must return at least two elements; an empty return is rejected with
    /// [`crate::DacError::MalformedDivide`] before any child task is built.
    fn divide(&self, input: P) -> Vec<P>;

    /// Pure predicate: when `true`, [`DacCallbacks::divide`] is never called
    /// on `input` and [`DacCallbacks::solve_base`] runs instead.
    fn is_base(&self, input: &P) -> bool;

    /// Solve a base-case problem sequentially, on a single worker, with no
    /// further spawning.
    fn solve_base(&self, input: P) -> R;

    /// Combine child results, in the same order `divide` produced them, into
    /// the parent's single result.
    fn combine(&self, children: Vec<R>, out: &mut R);
}

/// A [`DacCallbacks`] implementation built from four plain closures, for
/// callers who would rather not name a type.
pub struct FnCallbacks<P, R, D, I, S, C>
where
    D: Fn(P) -> Vec<P> + Send + Sync,
    I: Fn(&P) -> bool + Send + Sync,
    S: Fn(P) -> R + Send + Sync,
    C: Fn(Vec<R>, &mut R) + Send + Sync,
{
    divide: D,
    is_base: I,
    solve_base: S,
    combine: C,
    _marker: std::marker::PhantomData<fn(P) -> R>,
}

impl<P, R, D, I, S, C> FnCallbacks<P, R, D, I, S, C>
where
    D: Fn(P) -> Vec<P> + Send + Sync,
    I: Fn(&P) -> bool + Send + Sync,
    S: Fn(P) -> R + Send + Sync,
    C: Fn(Vec<R>, &mut R) + Send + Sync,
{
    /// Bundle the four callbacks together.
    pub fn new(divide: D, is_base: I, solve_base: S, combine: C) -> Self {
        Self {
            divide,
            is_base,
            solve_base,
            combine,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<P, R, D, I, S, C> DacCallbacks<P, R> for FnCallbacks<P, R, D, I, S, C>
where
    D: Fn(P) -> Vec<P> + Send + Sync,
    I: Fn(&P) -> bool + Send + Sync,
    S: Fn(P) -> R + Send + Sync,
    C: Fn(Vec<R>, &mut R) + Send + Sync,
{
    fn divide(&self, input: P) -> Vec<P> {
        (self.divide)(input)
    }

    fn is_base(&self, input: &P) -> bool {
        (self.is_base)(input)
    }

    fn solve_base(&self, input: P) -> R {
        (self.solve_base)(input)
    }

    fn combine(&self, children: Vec<R>, out: &mut R) {
        (self.combine)(children, out)
    }
}
