//! Flat neighbor-list encoding.

use thiserror::Error;

/// The flat neighbor-list encoding is inconsistent with the stated number of
/// owned points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error(
    "malformed neighborhood list: {num_points} points do not tile {encoded_len} entries"
)]
pub struct MalformedNeighborhoodList {
    pub num_points: usize,
    pub encoded_len: usize,
}

/// Neighbor lists for `num_points` owned points, encoded as a flat sequence:
/// for each point, a count followed by that many neighbor indices. Indices
/// may refer to ghost points beyond the owned range.
///
/// The encoding is validated once at construction; traversal afterwards is
/// allocation-free. Iteration order over a point's neighbors is the encoded
/// order, so sweeps are deterministic.
#[derive(Copy, Clone, Debug)]
pub struct NeighborhoodList<'a> {
    flat: &'a [u32],
    num_points: usize,
}

impl<'a> NeighborhoodList<'a> {
    pub fn new(
        flat: &'a [u32],
        num_points: usize,
    ) -> Result<Self, MalformedNeighborhoodList> {
        let mut cursor = 0usize;
        for _ in 0..num_points {
            let count = match flat.get(cursor) {
                Some(count) => *count as usize,
                None => {
                    return Err(MalformedNeighborhoodList {
                        num_points,
                        encoded_len: flat.len(),
                    })
                }
            };
            cursor += 1 + count;
        }
        if cursor != flat.len() {
            return Err(MalformedNeighborhoodList {
                num_points,
                encoded_len: flat.len(),
            });
        }

        Ok(Self { flat, num_points })
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Iterates the per-point neighbor index slices, in point order.
    pub fn iter(&self) -> impl Iterator<Item = &'a [u32]> + '_ {
        let mut cursor = 0usize;
        (0..self.num_points).map(move |_| {
            let count = self.flat[cursor] as usize;
            let neighbors = &self.flat[cursor + 1..cursor + 1 + count];
            cursor += 1 + count;
            neighbors
        })
    }
}
