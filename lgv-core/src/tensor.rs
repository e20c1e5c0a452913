//! Parameter tensors indexed by (layer, wire, generator group)
//!
//! Storage is always a canonical `Array3<f64>`. Callers that work with
//! the two-axis `(L, W)` form get it back unchanged: the tensor records
//! the rank it was built with, and every operation that derives a new
//! tensor (shifts, gradients, variances) carries that rank forward. The
//! dropped axis is never inferred from a width of one.

use ndarray::{Array1, Array2, Array3, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{LgvError, Result};

/// Number of axes exposed at the API boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    /// `(L, W)` shorthand, generator-group width fixed at 1
    Two,
    /// Full `(L, W, G)` form
    Three,
}

/// Canonical three-axis shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamShape {
    pub layers: usize,
    pub wires: usize,
    pub groups: usize,
}

impl ParamShape {
    pub fn new(layers: usize, wires: usize, groups: usize) -> Self {
        Self {
            layers,
            wires,
            groups,
        }
    }

    /// Total number of components
    pub fn len(&self) -> usize {
        self.layers * self.wires * self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimensions as seen by a caller using the given rank
    pub fn dims(&self, rank: Rank) -> Vec<usize> {
        match rank {
            Rank::Two => vec![self.layers, self.wires],
            Rank::Three => vec![self.layers, self.wires, self.groups],
        }
    }

    fn as_tuple(&self) -> (usize, usize, usize) {
        (self.layers, self.wires, self.groups)
    }
}

/// Real tensor over (layer, wire, generator group)
///
/// Also used for gradient and variance tensors, which always share the
/// shape and rank of the parameters they were derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamTensor {
    data: Array3<f64>,
    rank: Rank,
}

/// Per-component parameter-shift derivative estimates
pub type GradientTensor = ParamTensor;

/// Per-component unbiased sample variance
pub type VarianceTensor = ParamTensor;

impl ParamTensor {
    /// Wrap a three-axis array
    pub fn from_array3(data: Array3<f64>) -> Self {
        ParamTensor {
            data,
            rank: Rank::Three,
        }
    }

    /// Wrap a two-axis `(L, W)` array as `(L, W, 1)`
    pub fn from_array2(data: Array2<f64>) -> Self {
        ParamTensor {
            data: data.insert_axis(Axis(2)),
            rank: Rank::Two,
        }
    }

    /// Zero tensor of the given shape
    pub fn zeros(shape: ParamShape, rank: Rank) -> Result<Self> {
        Self::check_rank(shape, rank)?;
        Ok(ParamTensor {
            data: Array3::zeros(shape.as_tuple()),
            rank,
        })
    }

    /// Tensor filled with one value (NaN for degenerate variances)
    pub fn filled(shape: ParamShape, rank: Rank, value: f64) -> Result<Self> {
        Self::check_rank(shape, rank)?;
        Ok(ParamTensor {
            data: Array3::from_elem(shape.as_tuple(), value),
            rank,
        })
    }

    /// Rebuild a tensor from row-major `(l, w, g)` components
    pub fn from_flat(shape: ParamShape, rank: Rank, values: Vec<f64>) -> Result<Self> {
        Self::check_rank(shape, rank)?;
        let actual = values.len();
        let data = Array3::from_shape_vec(shape.as_tuple(), values)
            .map_err(|_| LgvError::shape_mismatch(&[shape.len()], &[actual]))?;
        Ok(ParamTensor { data, rank })
    }

    pub(crate) fn from_parts(data: Array3<f64>, rank: Rank) -> Self {
        ParamTensor { data, rank }
    }

    fn check_rank(shape: ParamShape, rank: Rank) -> Result<()> {
        if rank == Rank::Two && shape.groups != 1 {
            return Err(LgvError::shape_mismatch(
                &[shape.layers, shape.wires, 1],
                &[shape.layers, shape.wires, shape.groups],
            ));
        }
        Ok(())
    }

    pub fn shape(&self) -> ParamShape {
        let (layers, wires, groups) = self.data.dim();
        ParamShape::new(layers, wires, groups)
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Dimensions at the caller's rank: `[L, W]` or `[L, W, G]`
    pub fn dims(&self) -> Vec<usize> {
        self.shape().dims(self.rank)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Canonical three-axis view
    pub fn as_array3(&self) -> &Array3<f64> {
        &self.data
    }

    /// Two-axis form; only available for tensors built with `Rank::Two`
    pub fn to_array2(&self) -> Result<Array2<f64>> {
        match self.rank {
            Rank::Two => Ok(self.data.index_axis(Axis(2), 0).to_owned()),
            Rank::Three => Err(LgvError::shape_mismatch(
                &self.shape().dims(Rank::Two),
                &self.dims(),
            )),
        }
    }

    pub fn get(&self, index: (usize, usize, usize)) -> Option<f64> {
        let (l, w, g) = index;
        self.data.get([l, w, g]).copied()
    }

    /// Row-major `(l, w, g)` components
    pub fn flatten(&self) -> Array1<f64> {
        self.data.iter().copied().collect()
    }

    /// All component indices in row-major order
    pub fn indices(&self) -> impl Iterator<Item = (usize, usize, usize)> {
        let (layers, wires, groups) = self.data.dim();
        (0..layers).flat_map(move |l| {
            (0..wires).flat_map(move |w| (0..groups).map(move |g| (l, w, g)))
        })
    }

    /// Copy with one component moved by `delta`
    pub fn shifted(&self, index: (usize, usize, usize), delta: f64) -> Self {
        let mut out = self.clone();
        let (l, w, g) = index;
        out.data[[l, w, g]] += delta;
        out
    }

    /// Fail unless the wire axis matches the register width
    pub fn expect_wires(&self, wires: usize) -> Result<()> {
        let shape = self.shape();
        if shape.wires != wires {
            let expected = ParamShape::new(shape.layers, wires, shape.groups);
            return Err(LgvError::shape_mismatch(
                &expected.dims(self.rank),
                &self.dims(),
            ));
        }
        Ok(())
    }

    /// Arithmetic mean of all components; NaN if any component is NaN
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return f64::NAN;
        }
        self.data.sum() / self.data.len() as f64
    }

    /// Largest component; NaN if any component is NaN
    pub fn max(&self) -> f64 {
        self.data.iter().fold(f64::NEG_INFINITY, |acc, &v| {
            if acc.is_nan() || v.is_nan() {
                f64::NAN
            } else {
                acc.max(v)
            }
        })
    }

    /// Check if every component is NaN (the degenerate variance value)
    pub fn is_degenerate(&self) -> bool {
        !self.data.is_empty() && self.data.iter().all(|v| v.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr2, Array3};

    #[test]
    fn test_rank_two_round_trip() {
        let p = ParamTensor::from_array2(arr2(&[[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]));
        assert_eq!(p.rank(), Rank::Two);
        assert_eq!(p.shape(), ParamShape::new(2, 3, 1));
        assert_eq!(p.dims(), vec![2, 3]);
        assert_eq!(p.get((1, 2, 0)), Some(0.6));

        let back = p.to_array2().unwrap();
        assert_eq!(back, arr2(&[[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]));
    }

    #[test]
    fn test_rank_three_keeps_unit_group_axis() {
        let p = ParamTensor::from_array3(Array3::zeros((2, 3, 1)));
        assert_eq!(p.dims(), vec![2, 3, 1]);
        assert!(p.to_array2().is_err());
    }

    #[test]
    fn test_rank_two_rejects_groups() {
        let err = ParamTensor::zeros(ParamShape::new(2, 2, 3), Rank::Two).unwrap_err();
        assert_eq!(err, LgvError::shape_mismatch(&[2, 2, 1], &[2, 2, 3]));
    }

    #[test]
    fn test_flatten_is_row_major() {
        let values: Vec<f64> = (0..12).map(|v| v as f64).collect();
        let p = ParamTensor::from_flat(ParamShape::new(2, 3, 2), Rank::Three, values.clone())
            .unwrap();
        assert_eq!(p.flatten().to_vec(), values);
        assert_eq!(p.get((1, 0, 1)), Some(7.0));

        let order: Vec<_> = p.indices().take(3).collect();
        assert_eq!(order, vec![(0, 0, 0), (0, 0, 1), (0, 1, 0)]);
    }

    #[test]
    fn test_from_flat_length_mismatch() {
        let err = ParamTensor::from_flat(ParamShape::new(2, 2, 1), Rank::Three, vec![0.0; 3])
            .unwrap_err();
        assert_eq!(err, LgvError::shape_mismatch(&[4], &[3]));
    }

    #[test]
    fn test_shifted_touches_one_component() {
        let p = ParamTensor::zeros(ParamShape::new(1, 2, 2), Rank::Three).unwrap();
        let q = p.shifted((0, 1, 0), 0.5);
        assert_eq!(q.get((0, 1, 0)), Some(0.5));
        assert_eq!(q.flatten().iter().filter(|&&v| v != 0.0).count(), 1);
        assert_eq!(q.rank(), Rank::Three);
    }

    #[test]
    fn test_expect_wires() {
        let p = ParamTensor::from_array2(Array2::zeros((3, 2)));
        assert!(p.expect_wires(2).is_ok());
        let err = p.expect_wires(4).unwrap_err();
        assert_eq!(err, LgvError::shape_mismatch(&[3, 4], &[3, 2]));
    }

    #[test]
    fn test_summaries_propagate_nan() {
        let p = ParamTensor::from_flat(ParamShape::new(1, 3, 1), Rank::Two, vec![1.0, 3.0, 2.0])
            .unwrap();
        assert!((p.mean() - 2.0).abs() < 1e-12);
        assert_eq!(p.max(), 3.0);

        let q = ParamTensor::from_flat(
            ParamShape::new(1, 3, 1),
            Rank::Two,
            vec![1.0, f64::NAN, 2.0],
        )
        .unwrap();
        assert!(q.mean().is_nan());
        assert!(q.max().is_nan());
        assert!(!q.is_degenerate());

        let d = ParamTensor::filled(ParamShape::new(1, 2, 1), Rank::Two, f64::NAN).unwrap();
        assert!(d.is_degenerate());
    }
}
