//! Correspondence-kinematics kernels for peridynamic solvers.
//!
//! Given a body discretized into material points with neighbor lists, these
//! kernels compute, per point and per time step, the quantities that connect
//! nonlocal bond deformation to classical continuum mechanics: the inverse
//! shape tensor, the approximate deformation gradient, the Flanagan–Taylor
//! incremental polar decomposition (rotation and left stretch), the unrotated
//! rate-of-deformation handed to material laws, Green–Lagrange strain, an
//! isotropic linear elastic Cauchy stress, and an hourglass force density
//! damping the zero-energy modes of the nonlocal gradient reconstruction.
//!
//! Every kernel is generic over a scalar implementing [`scalar::DiffScalar`],
//! so the same code path runs on plain reals for the forward solve and on the
//! forward-mode [`autodiff::Dual`] scalar for tangent assembly.

pub extern crate nalgebra as na;

#[macro_use]
extern crate log;

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;

pub mod prelude {
    pub use crate::autodiff::Dual;
    pub use crate::fields::*;
    pub use crate::influence::*;
    pub use crate::kinematics::*;
    pub use crate::math::*;
    pub use crate::models::*;
    pub use crate::neighborhood::*;
    pub use crate::pipeline::*;
    pub use crate::scalar::DiffScalar;
    pub use crate::state::*;
}

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    /// The scalar type of reference-configuration data (volumes, reference
    /// coordinates, material parameters). Kinematic state is generic over
    /// [`crate::scalar::DiffScalar`] instead.
    pub type Real = f64;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The vector type.
    pub type Vector<N> = na::Vector3<N>;

    /// The point type.
    pub type Point<N> = na::Point3<N>;

    /// The matrix type.
    pub type Matrix<N> = na::Matrix3<N>;
}

pub mod autodiff;
pub mod fields;
pub mod influence;
pub mod kinematics;
pub mod models;
pub mod neighborhood;
pub mod parallel;
pub mod pipeline;
pub mod scalar;
pub mod state;
pub mod utils;
