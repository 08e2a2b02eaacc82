//! Forward-mode automatic differentiation scalar.

use crate::math::Real;
use crate::scalar::DiffScalar;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use num_traits::{One, Zero};

/// A forward-mode AD scalar carrying a value and `N` first-order derivatives.
///
/// Derivatives propagate through every arithmetic operation by the chain
/// rule, so running a kernel on `Dual` values seeded with `∂/∂u_k` yields the
/// kernel outputs together with their sensitivities to `u_k`.
///
/// `PartialEq` and `PartialOrd` compare the *value part only*: comparisons
/// drive the kernels' numeric guards, which must branch identically in real
/// and AD instantiations regardless of the derivative seeds.
#[derive(Copy, Clone, Debug)]
pub struct Dual<const N: usize> {
    value: Real,
    deriv: [Real; N],
}

impl<const N: usize> Dual<N> {
    #[inline]
    pub fn new(value: Real, deriv: [Real; N]) -> Self {
        Self { value, deriv }
    }

    /// A scalar with zero derivative part.
    #[inline]
    pub fn constant(value: Real) -> Self {
        Self {
            value,
            deriv: [0.0; N],
        }
    }

    /// An independent variable: unit derivative with respect to seed `seed`.
    #[inline]
    pub fn variable(value: Real, seed: usize) -> Self {
        let mut deriv = [0.0; N];
        deriv[seed] = 1.0;
        Self { value, deriv }
    }

    #[inline]
    pub fn value(self) -> Real {
        self.value
    }

    #[inline]
    pub fn derivative(self, seed: usize) -> Real {
        self.deriv[seed]
    }

    #[inline]
    pub fn gradient(&self) -> &[Real; N] {
        &self.deriv
    }

    #[inline]
    fn map_deriv(self, value: Real, scale: Real) -> Self {
        Self {
            value,
            deriv: core::array::from_fn(|i| self.deriv[i] * scale),
        }
    }
}

impl<const N: usize> PartialEq for Dual<N> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<const N: usize> PartialOrd for Dual<N> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<const N: usize> Add for Dual<N> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
            deriv: core::array::from_fn(|i| self.deriv[i] + rhs.deriv[i]),
        }
    }
}

impl<const N: usize> Sub for Dual<N> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
            deriv: core::array::from_fn(|i| self.deriv[i] - rhs.deriv[i]),
        }
    }
}

impl<const N: usize> Mul for Dual<N> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            value: self.value * rhs.value,
            deriv: core::array::from_fn(|i| self.deriv[i] * rhs.value + self.value * rhs.deriv[i]),
        }
    }
}

impl<const N: usize> Div for Dual<N> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        let inv = 1.0 / rhs.value;
        let value = self.value * inv;
        Self {
            value,
            deriv: core::array::from_fn(|i| (self.deriv[i] - value * rhs.deriv[i]) * inv),
        }
    }
}

impl<const N: usize> Neg for Dual<N> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            value: -self.value,
            deriv: core::array::from_fn(|i| -self.deriv[i]),
        }
    }
}

impl<const N: usize> AddAssign for Dual<N> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const N: usize> SubAssign for Dual<N> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<const N: usize> MulAssign for Dual<N> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<const N: usize> DivAssign for Dual<N> {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl<const N: usize> Add<Real> for Dual<N> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Real) -> Self {
        Self {
            value: self.value + rhs,
            deriv: self.deriv,
        }
    }
}

impl<const N: usize> Sub<Real> for Dual<N> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Real) -> Self {
        Self {
            value: self.value - rhs,
            deriv: self.deriv,
        }
    }
}

impl<const N: usize> Mul<Real> for Dual<N> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Real) -> Self {
        self.map_deriv(self.value * rhs, rhs)
    }
}

impl<const N: usize> Div<Real> for Dual<N> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Real) -> Self {
        let inv = 1.0 / rhs;
        self.map_deriv(self.value * inv, inv)
    }
}

impl<const N: usize> Mul<Dual<N>> for Real {
    type Output = Dual<N>;

    #[inline]
    fn mul(self, rhs: Dual<N>) -> Dual<N> {
        rhs * self
    }
}

impl<const N: usize> Add<Dual<N>> for Real {
    type Output = Dual<N>;

    #[inline]
    fn add(self, rhs: Dual<N>) -> Dual<N> {
        rhs + self
    }
}

impl<const N: usize> Zero for Dual<N> {
    #[inline]
    fn zero() -> Self {
        Self::constant(0.0)
    }

    // Consistent with the value-only `PartialEq`.
    #[inline]
    fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}

impl<const N: usize> One for Dual<N> {
    #[inline]
    fn one() -> Self {
        Self::constant(1.0)
    }
}

impl<const N: usize> DiffScalar for Dual<N> {
    #[inline]
    fn from_real(val: Real) -> Self {
        Self::constant(val)
    }

    #[inline]
    fn real(self) -> Real {
        self.value
    }

    #[inline]
    fn sqrt(self) -> Self {
        let root = self.value.sqrt();
        self.map_deriv(root, 0.5 / root)
    }

    #[inline]
    fn sin(self) -> Self {
        self.map_deriv(self.value.sin(), self.value.cos())
    }

    #[inline]
    fn cos(self) -> Self {
        self.map_deriv(self.value.cos(), -self.value.sin())
    }
}
