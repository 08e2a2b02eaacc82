//! Component-wise field storage.
//!
//! Callers marshal per-point 3×3 tensors as nine parallel arrays (one array
//! per component) and per-point vectors as interleaved `xyz` triples; this is
//! the layout field registries persist for output. These view types are the
//! boundary between that layout and the `Matrix`/`Vector` values the kernels
//! actually compute with.

use crate::math::{Matrix, Vector};
use crate::scalar::DiffScalar;

/// Read-only view over the nine component arrays of a per-point tensor field.
#[derive(Copy, Clone)]
pub struct TensorField<'a, S> {
    pub xx: &'a [S],
    pub xy: &'a [S],
    pub xz: &'a [S],
    pub yx: &'a [S],
    pub yy: &'a [S],
    pub yz: &'a [S],
    pub zx: &'a [S],
    pub zy: &'a [S],
    pub zz: &'a [S],
}

impl<'a, S: DiffScalar> TensorField<'a, S> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        xx: &'a [S],
        xy: &'a [S],
        xz: &'a [S],
        yx: &'a [S],
        yy: &'a [S],
        yz: &'a [S],
        zx: &'a [S],
        zy: &'a [S],
        zz: &'a [S],
    ) -> Self {
        let result = Self {
            xx,
            xy,
            xz,
            yx,
            yy,
            yz,
            zx,
            zy,
            zz,
        };
        debug_assert!(result.components_consistent());
        result
    }

    fn components_consistent(&self) -> bool {
        let n = self.xx.len();
        self.xy.len() == n
            && self.xz.len() == n
            && self.yx.len() == n
            && self.yy.len() == n
            && self.yz.len() == n
            && self.zx.len() == n
            && self.zy.len() == n
            && self.zz.len() == n
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.xx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xx.is_empty()
    }

    /// Gathers the tensor at point `i`.
    #[inline]
    pub fn get(&self, i: usize) -> Matrix<S> {
        Matrix::new(
            self.xx[i], self.xy[i], self.xz[i], self.yx[i], self.yy[i], self.yz[i], self.zx[i],
            self.zy[i], self.zz[i],
        )
    }

    pub fn split_at(self, mid: usize) -> (Self, Self) {
        let (xx0, xx1) = self.xx.split_at(mid);
        let (xy0, xy1) = self.xy.split_at(mid);
        let (xz0, xz1) = self.xz.split_at(mid);
        let (yx0, yx1) = self.yx.split_at(mid);
        let (yy0, yy1) = self.yy.split_at(mid);
        let (yz0, yz1) = self.yz.split_at(mid);
        let (zx0, zx1) = self.zx.split_at(mid);
        let (zy0, zy1) = self.zy.split_at(mid);
        let (zz0, zz1) = self.zz.split_at(mid);
        (
            Self::new(xx0, xy0, xz0, yx0, yy0, yz0, zx0, zy0, zz0),
            Self::new(xx1, xy1, xz1, yx1, yy1, yz1, zx1, zy1, zz1),
        )
    }
}

/// Mutable view over the nine component arrays of a per-point tensor field.
pub struct TensorFieldMut<'a, S> {
    pub xx: &'a mut [S],
    pub xy: &'a mut [S],
    pub xz: &'a mut [S],
    pub yx: &'a mut [S],
    pub yy: &'a mut [S],
    pub yz: &'a mut [S],
    pub zx: &'a mut [S],
    pub zy: &'a mut [S],
    pub zz: &'a mut [S],
}

impl<'a, S: DiffScalar> TensorFieldMut<'a, S> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        xx: &'a mut [S],
        xy: &'a mut [S],
        xz: &'a mut [S],
        yx: &'a mut [S],
        yy: &'a mut [S],
        yz: &'a mut [S],
        zx: &'a mut [S],
        zy: &'a mut [S],
        zz: &'a mut [S],
    ) -> Self {
        let result = Self {
            xx,
            xy,
            xz,
            yx,
            yy,
            yz,
            zx,
            zy,
            zz,
        };
        debug_assert!(result.as_view().components_consistent());
        result
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.xx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xx.is_empty()
    }

    /// Reborrows as a read-only view.
    #[inline]
    pub fn as_view(&self) -> TensorField<'_, S> {
        TensorField {
            xx: &*self.xx,
            xy: &*self.xy,
            xz: &*self.xz,
            yx: &*self.yx,
            yy: &*self.yy,
            yz: &*self.yz,
            zx: &*self.zx,
            zy: &*self.zy,
            zz: &*self.zz,
        }
    }

    #[inline]
    pub fn get(&self, i: usize) -> Matrix<S> {
        self.as_view().get(i)
    }

    /// Scatters the tensor at point `i`.
    #[inline]
    pub fn set(&mut self, i: usize, value: &Matrix<S>) {
        self.xx[i] = value[(0, 0)];
        self.xy[i] = value[(0, 1)];
        self.xz[i] = value[(0, 2)];
        self.yx[i] = value[(1, 0)];
        self.yy[i] = value[(1, 1)];
        self.yz[i] = value[(1, 2)];
        self.zx[i] = value[(2, 0)];
        self.zy[i] = value[(2, 1)];
        self.zz[i] = value[(2, 2)];
    }

    pub fn split_at_mut(self, mid: usize) -> (Self, Self) {
        let (xx0, xx1) = self.xx.split_at_mut(mid);
        let (xy0, xy1) = self.xy.split_at_mut(mid);
        let (xz0, xz1) = self.xz.split_at_mut(mid);
        let (yx0, yx1) = self.yx.split_at_mut(mid);
        let (yy0, yy1) = self.yy.split_at_mut(mid);
        let (yz0, yz1) = self.yz.split_at_mut(mid);
        let (zx0, zx1) = self.zx.split_at_mut(mid);
        let (zy0, zy1) = self.zy.split_at_mut(mid);
        let (zz0, zz1) = self.zz.split_at_mut(mid);
        (
            Self::new(xx0, xy0, xz0, yx0, yy0, yz0, zx0, zy0, zz0),
            Self::new(xx1, xy1, xz1, yx1, yy1, yz1, zx1, zy1, zz1),
        )
    }
}

/// Gathers the `i`-th triple of an interleaved `xyz` coordinate array.
#[inline]
pub fn vector_at<S: DiffScalar>(data: &[S], i: usize) -> Vector<S> {
    Vector::new(data[3 * i], data[3 * i + 1], data[3 * i + 2])
}

/// Accumulates `value` into the `i`-th triple of an interleaved array.
#[inline]
pub fn accumulate_vector_at<S: DiffScalar>(data: &mut [S], i: usize, value: &Vector<S>) {
    data[3 * i] += value.x;
    data[3 * i + 1] += value.y;
    data[3 * i + 2] += value.z;
}
