//! Hourglass-mode stabilization.

use super::tensor;
use crate::fields::{self, TensorField};
use crate::math::Real;
use crate::scalar::DiffScalar;
use crate::state::ReferenceConfiguration;

/// Accumulates the hourglass force density damping deformation modes that
/// the shape-tensor-based `F` cannot see.
///
/// For each bond the neighbor position predicted by the affine field `F[i]`
/// is compared with the actual one; the discrepancy, projected on the
/// deformed bond, is penalized with stiffness `18·C_H·K/(π·δ⁴)`. Both bond
/// endpoints receive antisymmetric contributions, so this kernel writes to
/// neighbor entries as well as owned ones: drive it sequentially, or
/// partition bonds (not points) and reduce.
///
/// The prediction deliberately uses the owned endpoint's `F[i]`, not a
/// bond-averaged gradient, so the per-bond contribution is not symmetric
/// under exchanging `i` and `j` unless both ends reconstruct the same `F`.
///
/// Contributions accumulate into `force_density` (interleaved `xyz`); zero it
/// beforehand for a standalone evaluation.
pub fn hourglass_force_density<S: DiffScalar>(
    reference: &ReferenceConfiguration,
    positions: &[S],
    deformation_gradient: &TensorField<S>,
    horizon: Real,
    bulk_modulus: Real,
    hourglass_coefficient: Real,
    force_density: &mut [S],
) {
    // Placeholder until per-bond damage is tracked.
    let bond_damage = 0.0;

    let stiffness =
        18.0 * hourglass_coefficient * bulk_modulus / (core::f64::consts::PI * horizon.powi(4));

    for (i, neighbors) in reference.neighborhoods.iter().enumerate() {
        let ref_pos = fields::vector_at(reference.positions, i);
        let pos = fields::vector_at(positions, i);
        let def_grad = deformation_gradient.get(i);

        for &j in neighbors {
            let j = j as usize;
            let undeformed_bond = fields::vector_at(reference.positions, j) - ref_pos;
            let deformed_bond = fields::vector_at(positions, j) - pos;
            let undeformed_bond_length = undeformed_bond.norm();
            let deformed_bond_length = tensor::vector_norm(&deformed_bond);

            // Where F[i] says the neighbor should sit, versus where it is.
            let predicted_neighbor = pos + def_grad * undeformed_bond.map(S::from_real);
            let hourglass_vector = predicted_neighbor - fields::vector_at(positions, j);

            let projection = -(hourglass_vector.x * deformed_bond.x
                + hourglass_vector.y * deformed_bond.y
                + hourglass_vector.z * deformed_bond.z);

            let magnitude = projection
                * S::from_real((1.0 - bond_damage) * stiffness / undeformed_bond_length)
                / deformed_bond_length;

            let bond_force = deformed_bond * magnitude;
            fields::accumulate_vector_at(
                force_density,
                i,
                &(bond_force * S::from_real(reference.volume[j])),
            );
            fields::accumulate_vector_at(
                force_density,
                j,
                &(-bond_force * S::from_real(reference.volume[i])),
            );
        }
    }
}
