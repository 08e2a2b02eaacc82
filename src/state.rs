//! Caller-owned per-point buffers.

use crate::fields::{TensorField, TensorFieldMut};
use crate::math::{Matrix, Real};
use crate::neighborhood::NeighborhoodList;
use crate::scalar::DiffScalar;

/// The immutable reference configuration of the body: per-point volumes,
/// reference coordinates (interleaved `xyz` triples), and neighbor lists.
/// Coordinate and volume arrays cover owned points and ghosts; the
/// neighborhood list covers owned points only.
#[derive(Copy, Clone)]
pub struct ReferenceConfiguration<'a> {
    pub volume: &'a [Real],
    pub positions: &'a [Real],
    pub neighborhoods: &'a NeighborhoodList<'a>,
}

impl<'a> ReferenceConfiguration<'a> {
    pub fn new(
        volume: &'a [Real],
        positions: &'a [Real],
        neighborhoods: &'a NeighborhoodList<'a>,
    ) -> Self {
        Self {
            volume,
            positions,
            neighborhoods,
        }
    }

    /// Number of owned points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.neighborhoods.num_points()
    }
}

/// Owned storage for one per-point tensor field, laid out as nine parallel
/// component arrays.
pub struct TensorBuffer<S> {
    components: [Vec<S>; 9],
}

impl<S: DiffScalar> TensorBuffer<S> {
    pub fn zeros(num_points: usize) -> Self {
        Self {
            components: core::array::from_fn(|_| vec![S::zero(); num_points]),
        }
    }

    /// A buffer holding the identity tensor at every point.
    pub fn identities(num_points: usize) -> Self {
        let mut buffer = Self::zeros(num_points);
        for diag in [0, 4, 8] {
            buffer.components[diag].fill(S::one());
        }
        buffer
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.components[0].len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components[0].is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> Matrix<S> {
        self.view().get(i)
    }

    pub fn view(&self) -> TensorField<'_, S> {
        let [xx, xy, xz, yx, yy, yz, zx, zy, zz] = &self.components;
        TensorField::new(xx, xy, xz, yx, yy, yz, zx, zy, zz)
    }

    pub fn view_mut(&mut self) -> TensorFieldMut<'_, S> {
        let [xx, xy, xz, yx, yy, yz, zx, zy, zz] = &mut self.components;
        TensorFieldMut::new(xx, xy, xz, yx, yy, yz, zx, zy, zz)
    }
}

/// The kinematic state advanced by [`crate::pipeline::CorrespondencePipeline`].
///
/// Step-N and step-N+1 rotation/stretch buffers are both owned here; after a
/// step, [`CorrespondenceState::advance`] swaps them so the freshly computed
/// tensors become the inputs of the next step. At step zero the rotation and
/// left stretch are the identity.
pub struct CorrespondenceState<S> {
    pub shape_tensor_inverse: TensorBuffer<S>,
    pub deformation_gradient: TensorBuffer<S>,
    pub left_stretch: TensorBuffer<S>,
    pub rotation: TensorBuffer<S>,
    pub left_stretch_next: TensorBuffer<S>,
    pub rotation_next: TensorBuffer<S>,
    pub rate_of_deformation: TensorBuffer<S>,
    pub strain: TensorBuffer<S>,
    pub unrotated_stress: TensorBuffer<S>,
    pub stress: TensorBuffer<S>,
    /// Interleaved `xyz` force-density triples.
    pub hourglass_force: Vec<S>,
    num_points: usize,
}

impl<S: DiffScalar> CorrespondenceState<S> {
    pub fn new(num_points: usize) -> Self {
        Self {
            shape_tensor_inverse: TensorBuffer::zeros(num_points),
            deformation_gradient: TensorBuffer::zeros(num_points),
            left_stretch: TensorBuffer::identities(num_points),
            rotation: TensorBuffer::identities(num_points),
            left_stretch_next: TensorBuffer::identities(num_points),
            rotation_next: TensorBuffer::identities(num_points),
            rate_of_deformation: TensorBuffer::zeros(num_points),
            strain: TensorBuffer::zeros(num_points),
            unrotated_stress: TensorBuffer::zeros(num_points),
            stress: TensorBuffer::zeros(num_points),
            hourglass_force: vec![S::zero(); 3 * num_points],
            num_points,
        }
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Promotes the step-N+1 rotation and left stretch to step-N inputs.
    pub fn advance(&mut self) {
        core::mem::swap(&mut self.left_stretch, &mut self.left_stretch_next);
        core::mem::swap(&mut self.rotation, &mut self.rotation_next);
    }
}
