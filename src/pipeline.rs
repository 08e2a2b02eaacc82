//! Full per-step composition of the correspondence kernels.

use crate::influence::InfluenceFunction;
use crate::kinematics::{self, KinematicFault};
use crate::math::Real;
use crate::models::{classical_elastic_stress, LinearElasticity};
use crate::parallel::par_for_each;
use crate::scalar::DiffScalar;
use crate::state::{CorrespondenceState, ReferenceConfiguration};

/// Piece lengths handed to one worker by the parallel point-local stages.
const POINT_STAGE_GRAIN: usize = 256;

#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CorrespondenceParameters {
    pub horizon: Real,
    pub dt: Real,
    pub young_modulus: Real,
    pub poisson_ratio: Real,
    pub hourglass_coefficient: Real,
}

impl Default for CorrespondenceParameters {
    fn default() -> Self {
        CorrespondenceParameters {
            horizon: 1.0,
            dt: 1.0e-3,
            young_modulus: 1.0,
            poisson_ratio: 0.25,
            hourglass_coefficient: 0.05,
        }
    }
}

impl CorrespondenceParameters {
    pub fn elastic_law(&self) -> LinearElasticity {
        LinearElasticity::new(self.young_modulus, self.poisson_ratio)
    }
}

/// Runs the correspondence kernels in data-flow order over one time step.
pub struct CorrespondencePipeline;

impl CorrespondencePipeline {
    /// Advances `state` by one step: shape tensor and deformation gradient,
    /// kinematic update, strain, elastic stress, stress push-forward, and the
    /// hourglass force density.
    ///
    /// Per-point singular-inverse faults zero the offending inverse and the
    /// sweep continues; the first fault (by stage, then by point) is returned
    /// after every stage has still been run to completion. Call
    /// [`CorrespondenceState::advance`] afterwards to promote the step-N+1
    /// rotation and stretch for the next step.
    pub fn step<S, W>(
        params: &CorrespondenceParameters,
        reference: &ReferenceConfiguration,
        positions: &[S],
        velocities: &[S],
        influence: &W,
        state: &mut CorrespondenceState<S>,
    ) -> Result<(), KinematicFault>
    where
        S: DiffScalar,
        W: InfluenceFunction + ?Sized,
    {
        debug_assert_eq!(state.num_points(), reference.num_points());

        if reference.num_points() == 0 {
            // Nothing to simulate.
            return Ok(());
        }

        let mut fault: Option<KinematicFault> = None;
        let law = params.elastic_law();

        let t0 = instant::now();
        if let Err(stage_fault) = kinematics::shape_tensor_inverse_and_deformation_gradient(
            reference,
            positions,
            influence,
            params.horizon,
            &mut state.shape_tensor_inverse.view_mut(),
            &mut state.deformation_gradient.view_mut(),
        ) {
            fault.get_or_insert(stage_fault);
        }
        info!("Shape tensor update: {}ms", instant::now() - t0);

        let t0 = instant::now();
        if let Err(stage_fault) = kinematics::unrotated_rate_of_deformation(
            reference,
            velocities,
            influence,
            params.horizon,
            params.dt,
            &state.shape_tensor_inverse.view(),
            &state.deformation_gradient.view(),
            &state.left_stretch.view(),
            &state.rotation.view(),
            &mut state.left_stretch_next.view_mut(),
            &mut state.rotation_next.view_mut(),
            &mut state.rate_of_deformation.view_mut(),
        ) {
            fault.get_or_insert(stage_fault);
        }
        info!("Kinematic update: {}ms", instant::now() - t0);

        let t0 = instant::now();
        par_for_each(
            (state.deformation_gradient.view(), state.strain.view_mut()),
            POINT_STAGE_GRAIN,
            &|(def_grad, mut strain)| kinematics::green_lagrange_strain(&def_grad, &mut strain),
        );
        par_for_each(
            (state.strain.view(), state.unrotated_stress.view_mut()),
            POINT_STAGE_GRAIN,
            &|(strain, mut stress)| classical_elastic_stress(&law, &strain, &mut stress),
        );
        par_for_each(
            (
                state.rotation_next.view(),
                state.unrotated_stress.view(),
                state.stress.view_mut(),
            ),
            POINT_STAGE_GRAIN,
            &|(rotation, unrotated, mut stress)| {
                kinematics::rotate_cauchy_stress(&rotation, &unrotated, &mut stress)
            },
        );
        info!("Stress update: {}ms", instant::now() - t0);

        let t0 = instant::now();
        state.hourglass_force.fill(S::zero());
        kinematics::hourglass_force_density(
            reference,
            positions,
            &state.deformation_gradient.view(),
            params.horizon,
            law.bulk_modulus(),
            params.hourglass_coefficient,
            &mut state.hourglass_force,
        );
        info!("Hourglass update: {}ms", instant::now() - t0);

        fault.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::influence::UnitInfluence;
    use crate::math::Matrix;
    use crate::neighborhood::NeighborhoodList;

    fn axis_star() -> (Vec<Real>, Vec<Real>, Vec<u32>) {
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
        (vec![1.0; 7], ref_positions, vec![6, 1, 2, 3, 4, 5, 6])
    }

    #[test]
    fn resting_body_stays_at_rest() {
        let (volume, ref_positions, flat) = axis_star();
        let neighborhoods = NeighborhoodList::new(&flat, 1).unwrap();
        let reference = ReferenceConfiguration::new(&volume, &ref_positions, &neighborhoods);
        let params = CorrespondenceParameters::default();

        let velocities = vec![0.0; ref_positions.len()];
        let mut state = CorrespondenceState::new(1);

        CorrespondencePipeline::step(
            &params,
            &reference,
            &ref_positions,
            &velocities,
            &UnitInfluence,
            &mut state,
        )
        .unwrap();

        assert_eq!(state.deformation_gradient.get(0), Matrix::identity());
        assert_eq!(state.strain.get(0), Matrix::zeros());
        assert_eq!(state.stress.get(0), Matrix::zeros());
        assert_eq!(state.rotation_next.get(0), Matrix::identity());
        assert_eq!(state.left_stretch_next.get(0), Matrix::identity());
        assert!(state.hourglass_force.iter().all(|f| *f == 0.0));

        state.advance();
        assert_eq!(state.rotation.get(0), Matrix::identity());
    }

    #[test]
    fn uniaxial_stretch_produces_the_elastic_stress() {
        let (volume, ref_positions, flat) = axis_star();
        let neighborhoods = NeighborhoodList::new(&flat, 1).unwrap();
        let reference = ReferenceConfiguration::new(&volume, &ref_positions, &neighborhoods);
        let params = CorrespondenceParameters {
            horizon: 1.5,
            ..Default::default()
        };

        let lambda = 1.1;
        let positions: Vec<Real> = ref_positions
            .chunks(3)
            .flat_map(|p| [lambda * p[0], p[1], p[2]])
            .collect();
        let velocities = vec![0.0; ref_positions.len()];
        let mut state = CorrespondenceState::new(1);

        CorrespondencePipeline::step(
            &params,
            &reference,
            &positions,
            &velocities,
            &UnitInfluence,
            &mut state,
        )
        .unwrap();

        let e_xx = 0.5 * (lambda * lambda - 1.0);
        assert!((state.strain.get(0)[(0, 0)] - e_xx).abs() < 1e-14);

        // No rotation happened, so spatial and unrotated stresses agree and
        // match the law applied to the strain directly.
        let expected = params.elastic_law().cauchy_stress(&state.strain.get(0));
        assert!((state.stress.get(0) - expected).abs().max() < 1e-14);

        // An affine stretch is invisible to the hourglass penalty.
        assert!(state.hourglass_force.iter().all(|f| f.abs() < 1e-13));
    }
}
