//! Fork-join driver for the point-local stages.
//!
//! The strain, stress-law, and stress-rotation sweeps touch each point
//! independently, so their index ranges can be partitioned freely. [`Split`]
//! abstracts "a bundle of per-point views that can be cut at an index";
//! [`par_for_each`] recursively halves such a bundle across the rayon pool
//! and runs the sequential kernel on each piece. Because the work is a pure
//! elementwise map, the parallel result is bit-identical to the sequential
//! one.

use crate::fields::{TensorField, TensorFieldMut};
use crate::scalar::DiffScalar;

/// A per-point view bundle that can be cut at a point index.
pub trait Split: Sized {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn split_at(self, mid: usize) -> (Self, Self);
}

impl<'a, S: DiffScalar> Split for TensorField<'a, S> {
    fn len(&self) -> usize {
        TensorField::len(self)
    }

    fn split_at(self, mid: usize) -> (Self, Self) {
        TensorField::split_at(self, mid)
    }
}

impl<'a, S: DiffScalar> Split for TensorFieldMut<'a, S> {
    fn len(&self) -> usize {
        TensorFieldMut::len(self)
    }

    fn split_at(self, mid: usize) -> (Self, Self) {
        TensorFieldMut::split_at_mut(self, mid)
    }
}

impl<A: Split, B: Split> Split for (A, B) {
    fn len(&self) -> usize {
        debug_assert_eq!(self.0.len(), self.1.len());
        self.0.len()
    }

    fn split_at(self, mid: usize) -> (Self, Self) {
        let (a0, a1) = self.0.split_at(mid);
        let (b0, b1) = self.1.split_at(mid);
        ((a0, b0), (a1, b1))
    }
}

impl<A: Split, B: Split, C: Split> Split for (A, B, C) {
    fn len(&self) -> usize {
        debug_assert_eq!(self.0.len(), self.1.len());
        debug_assert_eq!(self.0.len(), self.2.len());
        self.0.len()
    }

    fn split_at(self, mid: usize) -> (Self, Self) {
        let (a0, a1) = self.0.split_at(mid);
        let (b0, b1) = self.1.split_at(mid);
        let (c0, c1) = self.2.split_at(mid);
        ((a0, b0, c0), (a1, b1, c1))
    }
}

/// Runs `work` over `views`, recursively forking halves onto the rayon pool
/// until pieces are at most `grain` points long.
pub fn par_for_each<V, F>(views: V, grain: usize, work: &F)
where
    V: Split + Send,
    F: Fn(V) + Sync,
{
    debug_assert!(grain > 0);
    if views.len() <= grain {
        work(views);
    } else {
        let mid = views.len() / 2;
        let (left, right) = views.split_at(mid);
        rayon::join(
            || par_for_each(left, grain, work),
            || par_for_each(right, grain, work),
        );
    }
}
