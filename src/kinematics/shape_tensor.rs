//! Shape tensor and approximate deformation gradient.

use super::tensor;
use super::KinematicFault;
use crate::fields::{self, TensorFieldMut};
use crate::influence::InfluenceFunction;
use crate::math::{Matrix, Real};
use crate::scalar::DiffScalar;
use crate::state::ReferenceConfiguration;

/// Computes, for every owned point, the inverse of the nonlocal shape tensor
/// `K = Σ ω V ξξᵀ` and the approximate deformation gradient
/// `F = (Σ ω V ηξᵀ) · K⁻¹`, where `ξ` and `η` are the reference and deformed
/// bond vectors of the point's neighborhood.
///
/// A point whose shape tensor drops rank gets `K⁻¹ = F = 0` and the sweep
/// continues; see [`KinematicFault`].
pub fn shape_tensor_inverse_and_deformation_gradient<S, W>(
    reference: &ReferenceConfiguration,
    positions: &[S],
    influence: &W,
    horizon: Real,
    shape_tensor_inverse: &mut TensorFieldMut<S>,
    deformation_gradient: &mut TensorFieldMut<S>,
) -> Result<(), KinematicFault>
where
    S: DiffScalar,
    W: InfluenceFunction + ?Sized,
{
    // Placeholder until per-bond damage is tracked.
    let bond_damage = 0.0;

    let mut fault = None;

    for (i, neighbors) in reference.neighborhoods.iter().enumerate() {
        let ref_pos = fields::vector_at(reference.positions, i);
        let pos = fields::vector_at(positions, i);

        // The reference geometry is real-valued, so K carries no derivative
        // information and is accumulated on plain reals.
        let mut shape_tensor = Matrix::<Real>::zeros();
        let mut def_grad_first_term = Matrix::<S>::zeros();

        for &j in neighbors {
            let j = j as usize;
            let undeformed_bond = fields::vector_at(reference.positions, j) - ref_pos;
            let deformed_bond = fields::vector_at(positions, j) - pos;
            let bond_length = undeformed_bond.norm();

            let omega = influence.evaluate(bond_length, horizon);
            let weight = (1.0 - bond_damage) * omega * reference.volume[j];

            shape_tensor += undeformed_bond * undeformed_bond.transpose() * weight;
            def_grad_first_term += deformed_bond
                * undeformed_bond.map(S::from_real).transpose()
                * S::from_real(weight);
        }

        match tensor::invert(&shape_tensor) {
            Some(inverse) => {
                let inverse = inverse.map(S::from_real);
                shape_tensor_inverse.set(i, &inverse);
                deformation_gradient.set(i, &(def_grad_first_term * inverse));
            }
            None => {
                fault.get_or_insert(KinematicFault::ShapeTensor { point: i });
                shape_tensor_inverse.set(i, &Matrix::zeros());
                deformation_gradient.set(i, &Matrix::zeros());
            }
        }
    }

    fault.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::influence::UnitInfluence;
    use crate::neighborhood::NeighborhoodList;
    use crate::state::TensorBuffer;

    /// One owned point at the origin surrounded by six unit-distance
    /// neighbors on the coordinate axes, unit volumes everywhere.
    fn axis_star() -> (Vec<Real>, Vec<Real>, Vec<u32>) {
        let volume = vec![1.0; 7];
        #[rustfmt::skip]
        let positions = vec![
            0.0, 0.0, 0.0,
            1.0, 0.0, 0.0,
            -1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, -1.0, 0.0,
            0.0, 0.0, 1.0,
            0.0, 0.0, -1.0,
        ];
        let flat = vec![6, 1, 2, 3, 4, 5, 6];
        (volume, positions, flat)
    }

    fn run(
        positions: &[Real],
    ) -> (
        Result<(), KinematicFault>,
        TensorBuffer<Real>,
        TensorBuffer<Real>,
    ) {
        let (volume, ref_positions, flat) = axis_star();
        let neighborhoods = NeighborhoodList::new(&flat, 1).unwrap();
        let reference = ReferenceConfiguration::new(&volume, &ref_positions, &neighborhoods);

        let mut kinv = TensorBuffer::zeros(1);
        let mut def_grad = TensorBuffer::zeros(1);
        let result = shape_tensor_inverse_and_deformation_gradient(
            &reference,
            positions,
            &UnitInfluence,
            1.5,
            &mut kinv.view_mut(),
            &mut def_grad.view_mut(),
        );
        (result, kinv, def_grad)
    }

    #[test]
    fn axis_star_at_rest() {
        let (_, ref_positions, _) = axis_star();
        let (result, kinv, def_grad) = run(&ref_positions);

        // K = 2·I, so K⁻¹ = I/2 and F = I.
        result.unwrap();
        assert!((kinv.get(0) - Matrix::identity() * 0.5).abs().max() < 1e-15);
        assert!((def_grad.get(0) - Matrix::identity()).abs().max() < 1e-15);
    }

    #[test]
    fn rigid_translation_reproduces_identity() {
        let (_, ref_positions, _) = axis_star();
        let translated: Vec<Real> = ref_positions
            .chunks(3)
            .flat_map(|p| [p[0] + 0.3, p[1] - 1.7, p[2] + 0.05])
            .collect();
        let (result, _, def_grad) = run(&translated);

        result.unwrap();
        assert!((def_grad.get(0) - Matrix::identity()).abs().max() < 1e-14);
    }

    #[test]
    fn uniaxial_stretch() {
        let (_, ref_positions, _) = axis_star();
        let stretched: Vec<Real> = ref_positions
            .chunks(3)
            .flat_map(|p| [1.1 * p[0], p[1], p[2]])
            .collect();
        let (result, _, def_grad) = run(&stretched);

        result.unwrap();
        let expected = Matrix::from_diagonal(&na::Vector3::new(1.1, 1.0, 1.0));
        assert!((def_grad.get(0) - expected).abs().max() < 1e-14);
    }

    #[test]
    fn colinear_neighborhood_faults_with_zeroed_outputs() {
        // Both neighbors on the x axis: K is rank one.
        let volume = vec![1.0; 3];
        let ref_positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, -1.0, 0.0, 0.0];
        let flat = vec![2, 1, 2];
        let neighborhoods = NeighborhoodList::new(&flat, 1).unwrap();
        let reference = ReferenceConfiguration::new(&volume, &ref_positions, &neighborhoods);

        let mut kinv = TensorBuffer::zeros(1);
        let mut def_grad = TensorBuffer::zeros(1);
        let result = shape_tensor_inverse_and_deformation_gradient(
            &reference,
            &ref_positions,
            &UnitInfluence,
            1.5,
            &mut kinv.view_mut(),
            &mut def_grad.view_mut(),
        );

        assert_eq!(result, Err(KinematicFault::ShapeTensor { point: 0 }));
        assert_eq!(kinv.get(0), Matrix::zeros());
        assert_eq!(def_grad.get(0), Matrix::zeros());
    }

    #[test]
    fn shape_tensor_inverse_is_symmetric() {
        // An asymmetric cloud still produces a symmetric K (and inverse).
        let volume = vec![1.0, 0.5, 2.0, 1.5, 0.75];
        #[rustfmt::skip]
        let ref_positions = vec![
            0.0, 0.0, 0.0,
            1.0, 0.2, -0.1,
            -0.3, 0.9, 0.4,
            0.2, -0.5, 1.1,
            -0.8, -0.6, -0.7,
        ];
        let flat = vec![4, 1, 2, 3, 4];
        let neighborhoods = NeighborhoodList::new(&flat, 1).unwrap();
        let reference = ReferenceConfiguration::new(&volume, &ref_positions, &neighborhoods);

        let mut kinv = TensorBuffer::zeros(1);
        let mut def_grad = TensorBuffer::zeros(1);
        shape_tensor_inverse_and_deformation_gradient(
            &reference,
            &ref_positions,
            &UnitInfluence,
            2.0,
            &mut kinv.view_mut(),
            &mut def_grad.view_mut(),
        )
        .unwrap();

        let m = kinv.get(0);
        assert!((m - m.transpose()).abs().max() < 1e-12);
        assert!((def_grad.get(0) - Matrix::identity()).abs().max() < 1e-12);
    }
}
