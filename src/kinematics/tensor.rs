//! 3×3 tensor primitives shared by the kinematics kernels.

use crate::math::{Matrix, Vector};
use crate::scalar::DiffScalar;

/// Inverts a 3×3 matrix by cofactor expansion along the first row.
///
/// Returns `None` when the determinant is *exactly* zero; near-singular
/// matrices are inverted as-is. The exact test is deliberate: it is the only
/// scalar-value branch the surrounding kernels take besides the rotation-rate
/// guard, and it behaves identically for real and AD scalars.
pub fn invert<S: DiffScalar>(m: &Matrix<S>) -> Option<Matrix<S>> {
    let minor0 = m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)];
    let minor1 = m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)];
    let minor2 = m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)];
    let minor3 = m[(0, 1)] * m[(2, 2)] - m[(0, 2)] * m[(2, 1)];
    let minor4 = m[(0, 0)] * m[(2, 2)] - m[(2, 0)] * m[(0, 2)];
    let minor5 = m[(0, 0)] * m[(2, 1)] - m[(0, 1)] * m[(2, 0)];
    let minor6 = m[(0, 1)] * m[(1, 2)] - m[(0, 2)] * m[(1, 1)];
    let minor7 = m[(0, 0)] * m[(1, 2)] - m[(0, 2)] * m[(1, 0)];
    let minor8 = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];

    let det = m[(0, 0)] * minor0 - m[(0, 1)] * minor1 + m[(0, 2)] * minor2;
    if det == S::zero() {
        return None;
    }

    Some(Matrix::new(
        minor0 / det,
        -minor3 / det,
        minor6 / det,
        -minor1 / det,
        minor4 / det,
        -minor7 / det,
        minor2 / det,
        -minor5 / det,
        minor8 / det,
    ))
}

/// Push-forward `R · A · Rᵀ`, staged as two multiplies.
#[inline]
pub fn rotate<S: DiffScalar>(a: &Matrix<S>, r: &Matrix<S>) -> Matrix<S> {
    let tmp = a * r.transpose();
    r * tmp
}

/// Pull-back `Rᵀ · A · R`; the transpose is realized by `tr_mul`, not by a
/// materialized transpose.
#[inline]
pub fn unrotate<S: DiffScalar>(a: &Matrix<S>, r: &Matrix<S>) -> Matrix<S> {
    let tmp = a * r;
    r.tr_mul(&tmp)
}

/// Symmetric part of a velocity gradient: `D = (L + Lᵀ) / 2`.
#[inline]
pub fn strain_rate<S: DiffScalar>(velocity_gradient: &Matrix<S>) -> Matrix<S> {
    (velocity_gradient + velocity_gradient.transpose()) * S::from_real(0.5)
}

/// Skew part of a velocity gradient: `W = (L - Lᵀ) / 2`.
#[inline]
pub fn spin_tensor<S: DiffScalar>(velocity_gradient: &Matrix<S>) -> Matrix<S> {
    (velocity_gradient - velocity_gradient.transpose()) * S::from_real(0.5)
}

/// Euclidean norm of a vector of generic scalars.
#[inline]
pub fn vector_norm<S: DiffScalar>(v: &Vector<S>) -> S {
    (v.x * v.x + v.y * v.y + v.z * v.z).sqrt()
}
