//! Cartesian hyperparameter grid over an estimator's swept params.

use std::collections::BTreeMap;
use std::iter::FusedIterator;

use crate::value::ParamValue;

/// One point of the grid: a value for every swept key.
pub type GridPoint = BTreeMap<String, ParamValue>;

/// Read-only view of the Cartesian product of the swept params.
///
/// Keys are visited in sorted order and the last key varies fastest, so for
/// `{ball_radius: [0.5], n_levelsets: [1, 2, 4]}` the points are
/// `(0.5, 1), (0.5, 2), (0.5, 4)`. An empty params map spans exactly one empty
/// point.
#[derive(Debug, Clone, Copy)]
pub struct ParameterGrid<'a> {
    params: &'a BTreeMap<String, Vec<ParamValue>>,
}

impl<'a> ParameterGrid<'a> {
    /// Wraps a params map.
    pub fn new(params: &'a BTreeMap<String, Vec<ParamValue>>) -> Self {
        Self { params }
    }

    /// Number of grid points: the product of the list lengths.
    ///
    /// Saturates at `usize::MAX`; validated records always fit.
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    /// Number of grid points, or `None` when the product overflows `usize`.
    pub fn checked_len(&self) -> Option<usize> {
        self.params
            .values()
            .map(Vec::len)
            .try_fold(1usize, usize::checked_mul)
    }

    /// True when some swept list is empty. Validated records never are.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Swept keys in iteration order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        let params = self.params;
        params.keys().map(String::as_str)
    }

    /// Returns the point at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<GridPoint> {
        if index >= self.len() {
            return None;
        }
        let mut remaining = index;
        let mut point = GridPoint::new();
        for (key, values) in self.params.iter().rev() {
            let offset = remaining % values.len();
            remaining /= values.len();
            point.insert(key.clone(), values[offset].clone());
        }
        Some(point)
    }

    /// Iterates over every point in order.
    pub fn iter(&self) -> GridIter<'a> {
        GridIter {
            grid: *self,
            next: 0,
            len: self.len(),
        }
    }

    /// Collects every point.
    pub fn points(&self) -> Vec<GridPoint> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for ParameterGrid<'a> {
    type Item = GridPoint;
    type IntoIter = GridIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the points of a [`ParameterGrid`].
#[derive(Debug, Clone)]
pub struct GridIter<'a> {
    grid: ParameterGrid<'a>,
    next: usize,
    len: usize,
}

impl Iterator for GridIter<'_> {
    type Item = GridPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let point = self.grid.get(self.next);
        self.next += 1;
        point
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridIter<'_> {}

impl FusedIterator for GridIter<'_> {}
