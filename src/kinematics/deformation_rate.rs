//! Unrotated rate-of-deformation and incremental rotation/stretch update,
//! following Flanagan & Taylor (1987).

use super::tensor;
use super::KinematicFault;
use crate::fields::{self, TensorField, TensorFieldMut};
use crate::influence::InfluenceFunction;
use crate::math::{Matrix, Real, Vector};
use crate::scalar::DiffScalar;
use crate::state::ReferenceConfiguration;

/// Rotation rates below this threshold leave the incremental rotation at the
/// identity, guarding the `sin(Δt·Ω)/Ω` division.
const MIN_ROTATION_RATE_SQ: Real = 1.0e-30;

/// Advances the rotation `R` and left stretch `V` of every owned point by one
/// step of the Flanagan–Taylor incremental polar decomposition, and emits the
/// unrotated rate-of-deformation `d = Rᵀ·D·R` delivered to material laws.
///
/// The velocity gradient is reconstructed nonlocally:
/// `Ḟ = (Σ ω V (v_j - v_i) ξᵀ) · K⁻¹` and `L = Ḟ·F⁻¹`; its symmetric and
/// skew parts drive the update. Singular inverses (of `F` or of the stretch
/// projection `trace(V)·I - V`) are zeroed and the sweep continues, so every
/// point still receives outputs.
#[allow(clippy::too_many_arguments)]
pub fn unrotated_rate_of_deformation<S, W>(
    reference: &ReferenceConfiguration,
    velocities: &[S],
    influence: &W,
    horizon: Real,
    dt: Real,
    shape_tensor_inverse: &TensorField<S>,
    deformation_gradient: &TensorField<S>,
    left_stretch_n: &TensorField<S>,
    rotation_n: &TensorField<S>,
    left_stretch_np1: &mut TensorFieldMut<S>,
    rotation_np1: &mut TensorFieldMut<S>,
    rate_of_deformation: &mut TensorFieldMut<S>,
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
        let vel = fields::vector_at(velocities, i);

        let mut fdot_first_term = Matrix::<S>::zeros();
        for &j in neighbors {
            let j = j as usize;
            let undeformed_bond = fields::vector_at(reference.positions, j) - ref_pos;
            let bond_length = undeformed_bond.norm();

            // Relative velocity of the bond endpoints, v_j - v_i.
            let vel_state = fields::vector_at(velocities, j) - vel;

            let omega = influence.evaluate(bond_length, horizon);
            let weight = (1.0 - bond_damage) * omega * reference.volume[j];

            fdot_first_term +=
                vel_state * undeformed_bond.map(S::from_real).transpose() * S::from_real(weight);
        }

        let fdot = fdot_first_term * shape_tensor_inverse.get(i);

        let def_grad_inverse = match tensor::invert(&deformation_gradient.get(i)) {
            Some(inverse) => inverse,
            None => {
                fault.get_or_insert(KinematicFault::DeformationGradient { point: i });
                Matrix::zeros()
            }
        };

        // Eulerian velocity gradient L = Ḟ·F⁻¹ and its parts.
        let vel_grad = fdot * def_grad_inverse;
        let rate_of_def = tensor::strain_rate(&vel_grad);
        let spin = tensor::spin_tensor(&vel_grad);

        let left_stretch = left_stretch_n.get(i);

        // z_i = ε_{ikj} D_{jm} V_{mk} (F&T Eq. 13), expanded.
        let z = Vector::new(
            -left_stretch[(0, 2)] * rate_of_def[(1, 0)]
                - left_stretch[(1, 2)] * rate_of_def[(1, 1)]
                - left_stretch[(2, 2)] * rate_of_def[(1, 2)]
                + left_stretch[(0, 1)] * rate_of_def[(2, 0)]
                + left_stretch[(1, 1)] * rate_of_def[(2, 1)]
                + left_stretch[(2, 1)] * rate_of_def[(2, 2)],
            left_stretch[(0, 2)] * rate_of_def[(0, 0)]
                + left_stretch[(1, 2)] * rate_of_def[(0, 1)]
                + left_stretch[(2, 2)] * rate_of_def[(0, 2)]
                - left_stretch[(0, 0)] * rate_of_def[(2, 0)]
                - left_stretch[(1, 0)] * rate_of_def[(2, 1)]
                - left_stretch[(2, 0)] * rate_of_def[(2, 2)],
            -left_stretch[(0, 1)] * rate_of_def[(0, 0)]
                - left_stretch[(1, 1)] * rate_of_def[(0, 1)]
                - left_stretch[(2, 1)] * rate_of_def[(0, 2)]
                + left_stretch[(0, 0)] * rate_of_def[(1, 0)]
                + left_stretch[(1, 0)] * rate_of_def[(1, 1)]
                + left_stretch[(2, 0)] * rate_of_def[(1, 2)],
        );

        // w_i = -1/2 ε_{ijk} W_{jk} (F&T Eq. 11).
        let half = S::from_real(0.5);
        let w = Vector::new(
            half * (-spin[(1, 2)] + spin[(2, 1)]),
            half * (spin[(0, 2)] - spin[(2, 0)]),
            half * (-spin[(0, 1)] + spin[(1, 0)]),
        );

        // ω = w + (trace(V)·I - V)⁻¹ · z (F&T Eq. 12).
        let stretch_projection = Matrix::identity() * left_stretch.trace() - left_stretch;
        let projection_inverse = match tensor::invert(&stretch_projection) {
            Some(inverse) => inverse,
            None => {
                fault.get_or_insert(KinematicFault::StretchProjection { point: i });
                Matrix::zeros()
            }
        };
        let omega_vec = w + projection_inverse * z;

        // Ω_{ij} = ε_{ikj} ω_k (F&T Eq. 10); all nine components explicit.
        let omega_tensor = Matrix::new(
            S::zero(),
            -omega_vec.z,
            omega_vec.y,
            omega_vec.z,
            S::zero(),
            -omega_vec.x,
            -omega_vec.y,
            omega_vec.x,
            S::zero(),
        );

        // Incremental rotation Q in closed Rodrigues form (F&T Eq. 44). For
        // vanishing rotation rates Q degenerates to the identity, which also
        // keeps the division below well-defined.
        let omega_sq =
            omega_vec.x * omega_vec.x + omega_vec.y * omega_vec.y + omega_vec.z * omega_vec.z;
        let q = if omega_sq > S::from_real(MIN_ROTATION_RATE_SQ) {
            let omega = omega_sq.sqrt();
            let dt_omega = S::from_real(dt) * omega;
            // Ω² is symmetric; it enters with the -(1 - cos)/Ω² weight.
            Matrix::identity() + omega_tensor * (dt_omega.sin() / omega)
                - omega_tensor * omega_tensor * ((S::one() - dt_omega.cos()) / omega_sq)
        } else {
            Matrix::identity()
        };

        // R_{n+1} = Q·R_n (F&T Eq. 36).
        let rotation = q * rotation_n.get(i);

        // V̇ = L·V - V·Ω; V_{n+1} = V_n + Δt·V̇.
        let stretch_rate = vel_grad * left_stretch - left_stretch * omega_tensor;
        let left_stretch_next = left_stretch + stretch_rate * S::from_real(dt);

        rotation_np1.set(i, &rotation);
        left_stretch_np1.set(i, &left_stretch_next);
        rate_of_deformation.set(i, &tensor::unrotate(&rate_of_def, &rotation));
    }

    fault.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::influence::UnitInfluence;
    use crate::kinematics::shape_tensor_inverse_and_deformation_gradient;
    use crate::neighborhood::NeighborhoodList;
    use crate::state::TensorBuffer;

    struct Setup {
        volume: Vec<Real>,
        ref_positions: Vec<Real>,
        flat: Vec<u32>,
    }

    impl Setup {
        fn axis_star() -> Self {
            #[rustfmt::skip]
            let ref_positions = vec![
                0.0, 0.0, 0.0,
                1.0, 0.0, 0.0,
                -1.0, 0.0, 0.0,
                0.0, 1.0, 0.0,
                0.0, -1.0, 0.0,
                0.0, 0.0, 1.0,
                0.0, 0.0, -1.0,
            ];
            Self {
                volume: vec![1.0; 7],
                ref_positions,
                flat: vec![6, 1, 2, 3, 4, 5, 6],
            }
        }

        /// Runs one kinematic step from the pristine state.
        fn step(
            &self,
            positions: &[Real],
            velocities: &[Real],
            dt: Real,
        ) -> (
            Result<(), KinematicFault>,
            TensorBuffer<Real>,
            TensorBuffer<Real>,
            TensorBuffer<Real>,
        ) {
            let neighborhoods = NeighborhoodList::new(&self.flat, 1).unwrap();
            let reference =
                ReferenceConfiguration::new(&self.volume, &self.ref_positions, &neighborhoods);

            let mut kinv = TensorBuffer::zeros(1);
            let mut def_grad = TensorBuffer::zeros(1);
            shape_tensor_inverse_and_deformation_gradient(
                &reference,
                positions,
                &UnitInfluence,
                1.5,
                &mut kinv.view_mut(),
                &mut def_grad.view_mut(),
            )
            .unwrap();

            let left_stretch_n = TensorBuffer::identities(1);
            let rotation_n = TensorBuffer::identities(1);
            let mut left_stretch_np1 = TensorBuffer::zeros(1);
            let mut rotation_np1 = TensorBuffer::zeros(1);
            let mut rate = TensorBuffer::zeros(1);

            let result = unrotated_rate_of_deformation(
                &reference,
                velocities,
                &UnitInfluence,
                1.5,
                dt,
                &kinv.view(),
                &def_grad.view(),
                &left_stretch_n.view(),
                &rotation_n.view(),
                &mut left_stretch_np1.view_mut(),
                &mut rotation_np1.view_mut(),
                &mut rate.view_mut(),
            );
            (result, rotation_np1, left_stretch_np1, rate)
        }
    }

    #[test]
    fn rest_state_is_a_fixed_point() {
        let setup = Setup::axis_star();
        let velocities = vec![0.0; setup.ref_positions.len()];
        let (result, rotation, left_stretch, rate) =
            setup.step(&setup.ref_positions.clone(), &velocities, 1.0e-3);

        result.unwrap();
        assert_eq!(rotation.get(0), Matrix::identity());
        assert_eq!(left_stretch.get(0), Matrix::identity());
        assert_eq!(rate.get(0), Matrix::zeros());
    }

    #[test]
    fn rigid_spin_advances_rotation() {
        // v = ω × x with ω = (0, 0, ω_z); one step with ω_z·Δt = 0.01.
        let setup = Setup::axis_star();
        let omega_z = 2.0;
        let dt = 0.005;
        let velocities: Vec<Real> = setup
            .ref_positions
            .chunks(3)
            .flat_map(|p| [-omega_z * p[1], omega_z * p[0], 0.0])
            .collect();

        let (result, rotation, left_stretch, rate) =
            setup.step(&setup.ref_positions.clone(), &velocities, dt);
        result.unwrap();

        let angle = omega_z * dt;
        let expected =
            na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), angle).into_inner();
        assert!((rotation.get(0) - expected).abs().max() < 1e-10);

        // A pure spin neither stretches nor deforms.
        assert!((left_stretch.get(0) - Matrix::identity()).abs().max() < 1e-12);
        assert!(rate.get(0).abs().max() < 1e-12);
    }

    #[test]
    fn uniaxial_extension_rate() {
        // v_x = ė·x, x at reference: L = diag(ė, 0, 0), no spin, so d = D = L.
        let setup = Setup::axis_star();
        let edot = 0.25;
        let velocities: Vec<Real> = setup
            .ref_positions
            .chunks(3)
            .flat_map(|p| [edot * p[0], 0.0, 0.0])
            .collect();
        let dt = 1.0e-3;

        let (result, rotation, left_stretch, rate) =
            setup.step(&setup.ref_positions.clone(), &velocities, dt);
        result.unwrap();

        let expected_rate = Matrix::from_diagonal(&na::Vector3::new(edot, 0.0, 0.0));
        assert!((rate.get(0) - expected_rate).abs().max() < 1e-12);
        assert!((rotation.get(0) - Matrix::identity()).abs().max() < 1e-12);
        let expected_stretch = Matrix::identity() + expected_rate * dt;
        assert!((left_stretch.get(0) - expected_stretch).abs().max() < 1e-12);
    }

    #[test]
    fn singular_deformation_gradient_faults_but_completes() {
        let setup = Setup::axis_star();
        // Collapse the deformed configuration onto a single point: F = 0.
        let positions = vec![0.0; setup.ref_positions.len()];
        let velocities: Vec<Real> = setup
            .ref_positions
            .iter()
            .map(|&coordinate| 0.1 * coordinate)
            .collect();

        let (result, rotation, left_stretch, rate) = setup.step(&positions, &velocities, 1.0e-3);

        assert_eq!(
            result,
            Err(KinematicFault::DeformationGradient { point: 0 })
        );
        // With the zeroed inverse, L = 0 and the update degenerates to rest.
        assert_eq!(rotation.get(0), Matrix::identity());
        assert_eq!(left_stretch.get(0), Matrix::identity());
        assert_eq!(rate.get(0), Matrix::zeros());
    }
}
