use crate::fields::{TensorField, TensorFieldMut};
use crate::math::{Matrix, Real};
use crate::scalar::DiffScalar;
use crate::utils;

/// Isotropic linear elasticity (Hooke's law) mapping a small-strain tensor to
/// a Cauchy stress.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearElasticity {
    pub young_modulus: Real,
    pub poisson_ratio: Real,
}

impl LinearElasticity {
    pub fn new(young_modulus: Real, poisson_ratio: Real) -> Self {
        Self {
            young_modulus,
            poisson_ratio,
        }
    }

    pub fn bulk_modulus(&self) -> Real {
        utils::bulk_modulus(self.young_modulus, self.poisson_ratio)
    }

    pub fn shear_modulus(&self) -> Real {
        utils::shear_modulus(self.young_modulus, self.poisson_ratio)
    }

    /// The Cauchy stress of a single point.
    ///
    /// The result is symmetric by construction: the three independent shear
    /// stresses are taken from the upper off-diagonal strains and mirrored,
    /// so an unsymmetric input strain cannot produce an unsymmetric stress.
    pub fn cauchy_stress<S: DiffScalar>(&self, strain: &Matrix<S>) -> Matrix<S> {
        let nu = self.poisson_ratio;
        let constant = self.young_modulus / ((1.0 + nu) * (1.0 - 2.0 * nu));
        let diagonal = S::from_real(constant * (1.0 - nu));
        let coupling = S::from_real(constant * nu);
        let shear = S::from_real(constant * (1.0 - 2.0 * nu));

        let sigma_xx = diagonal * strain[(0, 0)]
            + coupling * strain[(1, 1)]
            + coupling * strain[(2, 2)];
        let sigma_yy = coupling * strain[(0, 0)]
            + diagonal * strain[(1, 1)]
            + coupling * strain[(2, 2)];
        let sigma_zz = coupling * strain[(0, 0)]
            + coupling * strain[(1, 1)]
            + diagonal * strain[(2, 2)];
        let sigma_xy = shear * strain[(0, 1)];
        let sigma_yz = shear * strain[(1, 2)];
        let sigma_zx = shear * strain[(2, 0)];

        Matrix::new(
            sigma_xx, sigma_xy, sigma_zx, sigma_xy, sigma_yy, sigma_yz, sigma_zx, sigma_yz,
            sigma_zz,
        )
    }
}

/// Evaluates the elastic law at every point of a strain field.
pub fn classical_elastic_stress<S: DiffScalar>(
    law: &LinearElasticity,
    strain: &TensorField<S>,
    stress: &mut TensorFieldMut<S>,
) {
    for i in 0..strain.len() {
        stress.set(i, &law.cauchy_stress(&strain.get(i)));
    }
}
