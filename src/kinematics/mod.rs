//! Per-point correspondence kinematics kernels.
//!
//! Each kernel sweeps the owned-point range sequentially, reads only the
//! point's own inputs and its neighbors', and writes only the point's own
//! outputs (the hourglass kernel is the exception: it accumulates into both
//! bond endpoints). None of them allocate, block, or touch global state, so
//! callers are free to drive disjoint point ranges from separate workers.

pub use self::deformation_rate::*;
pub use self::hourglass::*;
pub use self::shape_tensor::*;
pub use self::strain::*;

pub mod tensor;

mod deformation_rate;
mod hourglass;
mod shape_tensor;
mod strain;

use thiserror::Error;

/// A per-point 3×3 inversion hit an exactly zero determinant.
///
/// Faults do not halt a sweep: the offending inverse is zeroed, the point
/// still receives defined outputs, and the remaining points are processed.
/// The first fault encountered becomes the kernel's error value so the caller
/// can decide whether to halt the simulation or merely flag the point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum KinematicFault {
    #[error("singular shape tensor at point {point}")]
    ShapeTensor { point: usize },
    #[error("singular deformation gradient at point {point}")]
    DeformationGradient { point: usize },
    #[error("singular stretch projection trace(V)·I - V at point {point}")]
    StretchProjection { point: usize },
}
