//! Green–Lagrange strain and stress frame changes.

use super::tensor;
use crate::fields::{TensorField, TensorFieldMut};
use crate::math::Matrix;
use crate::scalar::DiffScalar;

/// `E = (FᵀF - I) / 2` for a single point.
#[inline]
pub fn green_lagrange_strain_tensor<S: DiffScalar>(deformation_gradient: &Matrix<S>) -> Matrix<S> {
    (deformation_gradient.tr_mul(deformation_gradient) - Matrix::identity()) * S::from_real(0.5)
}

/// Computes the Green–Lagrange strain of every point from its deformation
/// gradient.
pub fn green_lagrange_strain<S: DiffScalar>(
    deformation_gradient: &TensorField<S>,
    strain: &mut TensorFieldMut<S>,
) {
    for i in 0..deformation_gradient.len() {
        strain.set(
            i,
            &green_lagrange_strain_tensor(&deformation_gradient.get(i)),
        );
    }
}

/// Pushes the unrotated Cauchy stress of every point into the spatial frame:
/// `σ = R·σ_unrot·Rᵀ`.
pub fn rotate_cauchy_stress<S: DiffScalar>(
    rotation: &TensorField<S>,
    unrotated_stress: &TensorField<S>,
    stress: &mut TensorFieldMut<S>,
) {
    for i in 0..rotation.len() {
        stress.set(
            i,
            &tensor::rotate(&unrotated_stress.get(i), &rotation.get(i)),
        );
    }
}

/// Pulls a spatial Cauchy stress back into the unrotated material frame:
/// `σ_unrot = Rᵀ·σ·R`. The inverse pairing of [`rotate_cauchy_stress`].
pub fn unrotate_cauchy_stress<S: DiffScalar>(
    rotation: &TensorField<S>,
    stress: &TensorField<S>,
    unrotated_stress: &mut TensorFieldMut<S>,
) {
    for i in 0..rotation.len() {
        unrotated_stress.set(i, &tensor::unrotate(&stress.get(i), &rotation.get(i)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Real;
    use crate::state::TensorBuffer;

    #[test]
    fn identity_gradient_has_zero_strain() {
        let strain = green_lagrange_strain_tensor(&Matrix::<Real>::identity());
        assert_eq!(strain, Matrix::zeros());
    }

    #[test]
    fn uniaxial_stretch_strain() {
        let f = Matrix::from_diagonal(&na::Vector3::new(1.1, 1.0, 1.0));
        let strain = green_lagrange_strain_tensor(&f);
        // E_xx = (λ² - 1)/2 = 0.105.
        assert!((strain[(0, 0)] - 0.105).abs() < 1e-15);
        assert!(strain[(1, 1)].abs() < 1e-15);
        assert!(strain[(2, 2)].abs() < 1e-15);
        assert!(strain[(0, 1)].abs() < 1e-15);
    }

    #[test]
    fn pure_rotation_has_no_strain() {
        let axis = na::Unit::new_normalize(na::Vector3::new(1.0, 1.0, 1.0));
        let q = na::Rotation3::from_axis_angle(&axis, 0.3).into_inner();
        let strain = green_lagrange_strain_tensor(&q);
        assert!(strain.abs().max() < 1e-15);
    }

    #[test]
    fn stress_rotation_round_trip() {
        let axis = na::Unit::new_normalize(na::Vector3::new(0.2, -1.0, 0.5));
        let r = na::Rotation3::from_axis_angle(&axis, 1.1).into_inner();
        let sigma = Matrix::new(1.0, 0.3, 0.0, 0.3, -2.0, 0.4, 0.0, 0.4, 0.7);

        let mut rotation = TensorBuffer::zeros(1);
        rotation.view_mut().set(0, &r);
        let mut unrotated = TensorBuffer::zeros(1);
        unrotated.view_mut().set(0, &sigma);
        let mut spatial = TensorBuffer::<Real>::zeros(1);
        let mut back = TensorBuffer::<Real>::zeros(1);

        rotate_cauchy_stress(
            &rotation.view(),
            &unrotated.view(),
            &mut spatial.view_mut(),
        );
        unrotate_cauchy_stress(&rotation.view(), &spatial.view(), &mut back.view_mut());

        assert!((back.get(0) - sigma).abs().max() < 1e-13);
        // Rotation preserves symmetry.
        let rotated = spatial.get(0);
        assert!((rotated - rotated.transpose()).abs().max() < 1e-13);
    }
}
