//! Visiting orders produced by sequence solvers.

use thiserror::Error;

/// Errors returned by [`RouteOrder::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteOrderError {
    /// The order does not mention every POI exactly once.
    #[error("expected {expected} stops but the order has {actual}")]
    LengthMismatch {
        /// Number of POIs.
        expected: usize,
        /// Entries in the order.
        actual: usize,
    },
    /// An entry does not refer to a POI.
    #[error("stop index {index} is out of range for {poi_count} points of interest")]
    OutOfRange {
        /// The rejected index.
        index: usize,
        /// Number of POIs.
        poi_count: usize,
    },
    /// An entry appears twice.
    #[error("stop index {index} appears more than once")]
    Duplicate {
        /// The repeated index.
        index: usize,
    },
}

/// A permutation of POI indices `0..N`; the start node is implicit.
///
/// # Examples
/// ```
/// use gatewalk_core::RouteOrder;
///
/// let order = RouteOrder::new(vec![2, 0, 1], 3)?;
/// let names = ["Bell Tower", "Drum Tower", "Lama Temple"];
/// let visited: Vec<&str> = order.apply(&names).into_iter().copied().collect();
/// assert_eq!(visited, ["Lama Temple", "Bell Tower", "Drum Tower"]);
///
/// assert!(RouteOrder::new(vec![0, 0, 1], 3).is_err());
/// # Ok::<(), gatewalk_core::RouteOrderError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<usize>", into = "Vec<usize>")
)]
pub struct RouteOrder(Vec<usize>);

/// Validates `indices` as a permutation of `0..indices.len()`.
impl TryFrom<Vec<usize>> for RouteOrder {
    type Error = RouteOrderError;

    fn try_from(indices: Vec<usize>) -> Result<Self, Self::Error> {
        let poi_count = indices.len();
        Self::new(indices, poi_count)
    }
}

impl From<RouteOrder> for Vec<usize> {
    fn from(order: RouteOrder) -> Self {
        order.0
    }
}

impl RouteOrder {
    /// Validate that `indices` is a permutation of `0..poi_count`.
    ///
    /// # Errors
    /// Returns a [`RouteOrderError`] describing the first violation.
    pub fn new(indices: Vec<usize>, poi_count: usize) -> Result<Self, RouteOrderError> {
        if indices.len() != poi_count {
            return Err(RouteOrderError::LengthMismatch {
                expected: poi_count,
                actual: indices.len(),
            });
        }
        let mut seen = vec![false; poi_count];
        for &index in &indices {
            match seen.get_mut(index) {
                None => return Err(RouteOrderError::OutOfRange { index, poi_count }),
                Some(true) => return Err(RouteOrderError::Duplicate { index }),
                Some(flag) => *flag = true,
            }
        }
        Ok(Self(indices))
    }

    /// Wrap `indices` without checking them.
    pub(crate) const fn from_unchecked(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// An order with no stops.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Number of stops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no stops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// POI indices in visiting order.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Iterate over POI indices in visiting order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Consume the order, returning the indices.
    #[must_use]
    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }

    /// Reorder `items` (the list the order was solved over).
    ///
    /// Indices beyond `items` are skipped.
    #[must_use]
    pub fn apply<'a, T>(&self, items: &'a [T]) -> Vec<&'a T> {
        self.iter().filter_map(|idx| items.get(idx)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn accepts_permutations() {
        let order = RouteOrder::new(vec![1, 2, 0], 3).expect("valid permutation");
        assert_eq!(order.as_slice(), &[1, 2, 0]);
        assert_eq!(order.len(), 3);
    }

    #[rstest]
    #[case(vec![0, 1], 3, RouteOrderError::LengthMismatch { expected: 3, actual: 2 })]
    #[case(vec![0, 1, 3], 3, RouteOrderError::OutOfRange { index: 3, poi_count: 3 })]
    #[case(vec![2, 1, 2], 3, RouteOrderError::Duplicate { index: 2 })]
    fn rejects_non_permutations(
        #[case] indices: Vec<usize>,
        #[case] poi_count: usize,
        #[case] expected: RouteOrderError,
    ) {
        assert_eq!(RouteOrder::new(indices, poi_count), Err(expected));
    }

    #[rstest]
    fn empty_order_for_zero_pois() {
        assert_eq!(RouteOrder::new(Vec::new(), 0), Ok(RouteOrder::empty()));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn serialises_as_a_plain_index_list() {
        let order = RouteOrder::new(vec![2, 0, 1], 3).expect("valid permutation");
        let json = serde_json::to_string(&order).expect("serialise order");
        assert_eq!(json, "[2,0,1]");
        let back: RouteOrder = serde_json::from_str(&json).expect("deserialise order");
        assert_eq!(back, order);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    #[case("[0,0]", "appears more than once")]
    #[case("[0,2]", "out of range")]
    fn deserialising_rejects_non_permutations(#[case] json: &str, #[case] message: &str) {
        let err = serde_json::from_str::<RouteOrder>(json).expect_err("not a permutation");
        assert!(err.to_string().contains(message), "unexpected error: {err}");
    }
}
