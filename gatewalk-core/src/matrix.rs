//! Square distance matrices over a virtual start node plus POIs.
//!
//! Node `0` is the start; node `i > 0` is `pois[i - 1]`. Matrices are
//! immutable values: every transformation returns a new matrix.

use thiserror::Error;

use crate::{Coordinate, Poi, PoiError, haversine_distance, validate_coordinate};

/// Scale applied when converting metre costs to integers for solvers that
/// require them. Keeps three decimal digits of precision.
pub const INTEGER_COST_SCALE: f64 = 1000.0;

/// Errors raised while building or validating a [`DistanceMatrix`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// The start coordinate is unresolved or out of range.
    #[error("start location is invalid: {0}")]
    InvalidStart(#[source] PoiError),
    /// A POI has an unresolved or out-of-range coordinate.
    #[error("point of interest {poi_id} at index {index} is invalid: {source}")]
    InvalidPoi {
        /// Position of the POI in the input slice.
        index: usize,
        /// Identifier of the offending POI.
        poi_id: u64,
        /// Underlying validation failure.
        #[source]
        source: PoiError,
    },
    /// Caller-supplied rows do not form a square matrix.
    #[error("row {row} has {len} entries but the matrix has {size} rows")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Entries in that row.
        len: usize,
        /// Expected number of entries.
        size: usize,
    },
    /// A caller-supplied entry is negative or non-finite.
    #[error("entry ({from}, {to}) = {value} is not a finite non-negative distance")]
    InvalidEntry {
        /// Row index.
        from: usize,
        /// Column index.
        to: usize,
        /// The rejected value.
        value: f64,
    },
}

/// A square matrix of non-negative costs in metres (or metre-equivalents).
///
/// # Examples
/// ```
/// use gatewalk_core::DistanceMatrix;
///
/// let matrix = DistanceMatrix::from_rows(vec![
///     vec![0.0, 120.0],
///     vec![120.0, 0.0],
/// ])?;
/// assert_eq!(matrix.size(), 2);
/// assert_eq!(matrix.poi_count(), 1);
/// assert_eq!(matrix.get(0, 1), Some(120.0));
/// # Ok::<(), gatewalk_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    /// Validate and wrap caller-supplied rows, e.g. road distances.
    ///
    /// Rows need not be symmetric, but every entry must be finite and
    /// non-negative.
    ///
    /// # Errors
    /// Returns [`MatrixError::NotSquare`] or [`MatrixError::InvalidEntry`].
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (from, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(MatrixError::NotSquare {
                    row: from,
                    len: row.len(),
                    size,
                });
            }
            for (to, value) in row.into_iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(MatrixError::InvalidEntry { from, to, value });
                }
                cells.push(value);
            }
        }
        Ok(Self { size, cells })
    }

    #[cfg(any(test, feature = "test-support"))]
    pub(crate) fn from_fn(size: usize, mut cell: impl FnMut(usize, usize) -> f64) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for from in 0..size {
            for to in 0..size {
                cells.push(cell(from, to));
            }
        }
        Self { size, cells }
    }

    /// Number of nodes, including the start node.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of POI nodes (all nodes except the start).
    #[must_use]
    pub const fn poi_count(&self) -> usize {
        self.size.saturating_sub(1)
    }

    /// Cost from node `from` to node `to`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<f64> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.cells.get(from * self.size + to).copied()
    }

    /// Iterate over rows in node order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.size.max(1))
    }

    /// Copy the matrix out as nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Produce a new matrix by transforming every cell.
    ///
    /// The closure receives `(from, to, value)`.
    #[must_use]
    pub fn map_cells(&self, mut transform: impl FnMut(usize, usize, f64) -> f64) -> Self {
        let size = self.size;
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                #[expect(
                    clippy::integer_division,
                    clippy::integer_division_remainder_used,
                    reason = "row/column recovery from a flat index"
                )]
                let (from, to) = (idx / size, idx % size);
                transform(from, to, *value)
            })
            .collect();
        Self { size, cells }
    }

    /// Integer costs for solvers that need them: each cell scaled by
    /// [`INTEGER_COST_SCALE`] and truncated.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        reason = "truncating scaled metres is the documented integer conversion"
    )]
    pub fn to_integer_costs(&self) -> Vec<Vec<i64>> {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|value| (value * INTEGER_COST_SCALE).trunc() as i64)
                    .collect()
            })
            .collect()
    }
}

/// Build the `(N + 1) x (N + 1)` haversine matrix for `start` plus `pois`.
///
/// The result is symmetric with a zero diagonal.
///
/// # Errors
/// Returns [`MatrixError::InvalidStart`] or [`MatrixError::InvalidPoi`] when a
/// coordinate is unresolved, including the coordinate of any listed gate. The
/// engine never geocodes on the caller's behalf.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use gatewalk_core::{Poi, build_matrix};
///
/// let pois = vec![Poi::new(1, "Gate Tower", Coord { x: 0.0, y: 0.01 }, "monument")];
/// let matrix = build_matrix(Coord { x: 0.0, y: 0.0 }, &pois)?;
/// assert_eq!(matrix.size(), 2);
/// assert_eq!(matrix.get(0, 1), matrix.get(1, 0));
/// # Ok::<(), gatewalk_core::MatrixError>(())
/// ```
pub fn build_matrix(start: Coordinate, pois: &[Poi]) -> Result<DistanceMatrix, MatrixError> {
    validate_coordinate(start).map_err(MatrixError::InvalidStart)?;
    for (index, poi) in pois.iter().enumerate() {
        poi.validate().map_err(|source| MatrixError::InvalidPoi {
            index,
            poi_id: poi.id,
            source,
        })?;
    }

    let locations: Vec<Coordinate> = std::iter::once(start)
        .chain(pois.iter().map(|poi| poi.location))
        .collect();
    let size = locations.len();
    let mut upper = vec![0.0_f64; size * size];
    for (from, a) in locations.iter().enumerate() {
        for (to, b) in locations.iter().enumerate().skip(from + 1) {
            let metres = haversine_distance(*a, *b);
            if let Some(cell) = upper.get_mut(from * size + to) {
                *cell = metres;
            }
            if let Some(cell) = upper.get_mut(to * size + from) {
                *cell = metres;
            }
        }
    }
    log::debug!("built {size}x{size} distance matrix");
    Ok(DistanceMatrix { size, cells: upper })
}
