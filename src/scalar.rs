use crate::math::Real;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use num_traits::{One, Zero};

/// The scalar algebra the kinematics kernels are generic over.
///
/// The kernels only ever need field arithmetic, square root, sine, cosine,
/// and ordered comparison, so that is all this trait asks for. Two
/// instantiations ship with the crate: [`Real`] for the forward solve and
/// [`crate::autodiff::Dual`] for forward-mode tangent assembly. Each kernel
/// is monomorphized per instantiation; the hot loops stay branch-free apart
/// from the two scalar-value tests the update scheme itself specifies (the
/// exact-zero determinant check and the rotation-rate guard).
pub trait DiffScalar:
    na::Scalar
    + Copy
    + PartialOrd
    + Zero
    + One
    + Neg<Output = Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
{
    /// Lifts a real constant into this scalar type. For AD scalars the
    /// derivative part is zero.
    fn from_real(val: Real) -> Self;

    /// The value part of this scalar, discarding any derivative information.
    fn real(self) -> Real;

    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
}

impl DiffScalar for Real {
    #[inline(always)]
    fn from_real(val: Real) -> Self {
        val
    }

    #[inline(always)]
    fn real(self) -> Real {
        self
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Real::sqrt(self)
    }

    #[inline(always)]
    fn sin(self) -> Self {
        Real::sin(self)
    }

    #[inline(always)]
    fn cos(self) -> Self {
        Real::cos(self)
    }
}
