//! Dense N-dimensional storage for sweep results.

use serde::{Deserialize, Serialize};

/// Row-major grid: the last axis is contiguous in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid<T> {
    data: Vec<T>,
    /// Axis lengths, e.g. [14, 2, 10] for points x modes x runs
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl<T: Clone> SweepGrid<T> {
    /// Grid of `shape` with every cell set to `fill`
    pub fn new(shape: Vec<usize>, fill: T) -> Self {
        let len = shape.iter().product();
        Self {
            data: vec![fill; len],
            strides: row_major_strides(&shape),
            shape,
        }
    }

    /// Wrap row-major `data`; `None` if its length does not match `shape`
    pub fn from_data(shape: Vec<usize>, data: Vec<T>) -> Option<Self> {
        (data.len() == shape.iter().product::<usize>()).then(|| Self {
            data,
            strides: row_major_strides(&shape),
            shape,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Position of `index` in the backing array
    pub fn flat_index(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.ndim() {
            return None;
        }
        index
            .iter()
            .zip(&self.shape)
            .zip(&self.strides)
            .try_fold(0, |offset, ((&i, &len), &stride)| {
                (i < len).then_some(offset + i * stride)
            })
    }

    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.data.get(self.flat_index(index)?)
    }

    /// Overwrite one cell; `false` if `index` is out of range
    pub fn set(&mut self, index: &[usize], value: T) -> bool {
        match self.flat_index(index) {
            Some(flat) => {
                self.data[flat] = value;
                true
            }
            None => false,
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Every index in storage order
    pub fn indices(&self) -> GridIndices {
        GridIndices {
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            next: 0,
            len: self.data.len(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Vec<usize>, &T)> {
        self.indices().zip(&self.data)
    }

    /// Cells along `axis` through `at`. The `axis` entry of `at` is ignored.
    pub fn lane(&self, axis: usize, at: &[usize]) -> Option<Vec<&T>> {
        if axis >= self.ndim() || at.len() != self.ndim() {
            return None;
        }
        let mut index = at.to_vec();
        (0..self.shape[axis])
            .map(|i| {
                index[axis] = i;
                self.get(&index)
            })
            .collect()
    }

    /// Copy of the sub-grid at position `at` of `axis`, with that axis removed
    pub fn select(&self, axis: usize, at: usize) -> Option<SweepGrid<T>> {
        if at >= *self.shape.get(axis)? {
            return None;
        }
        let data = self
            .iter()
            .filter(|(index, _)| index[axis] == at)
            .map(|(_, value)| value.clone())
            .collect();
        let mut shape = self.shape.clone();
        shape.remove(axis);
        SweepGrid::from_data(shape, data)
    }
}

fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides: Vec<usize> = shape
        .iter()
        .rev()
        .scan(1, |acc, &len| {
            let stride = *acc;
            *acc *= len;
            Some(stride)
        })
        .collect();
    strides.reverse();
    strides
}

/// Owned iterator over grid indices, so the grid can be written while walking it
pub struct GridIndices {
    shape: Vec<usize>,
    strides: Vec<usize>,
    next: usize,
    len: usize,
}

impl Iterator for GridIndices {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let flat = self.next;
        self.next += 1;
        Some(
            self.strides
                .iter()
                .zip(&self.shape)
                .map(|(&stride, &len)| (flat / stride) % len)
                .collect(),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridIndices {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strides_and_indexing() {
        let mut grid = SweepGrid::new(vec![3, 2, 4], 0usize);
        assert_eq!(grid.len(), 24);
        assert_eq!(grid.flat_index(&[1, 1, 2]), Some(4 * 2 + 4 + 2));
        assert_eq!(grid.flat_index(&[3, 0, 0]), None);
        assert_eq!(grid.flat_index(&[0, 0]), None);

        assert!(grid.set(&[2, 1, 3], 7));
        assert!(!grid.set(&[2, 2, 0], 7));
        assert_eq!(grid.get(&[2, 1, 3]), Some(&7));
        assert_eq!(grid.data()[23], 7);
    }

    #[test]
    fn test_indices_in_storage_order() {
        let grid = SweepGrid::new(vec![2, 2], ());
        let all: Vec<Vec<usize>> = grid.indices().collect();
        assert_eq!(all, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
        assert_eq!(grid.indices().len(), 4);

        let empty = SweepGrid::new(vec![0, 3], ());
        assert_eq!(empty.indices().count(), 0);
    }

    #[test]
    fn test_lane() {
        let grid = SweepGrid::from_data(vec![2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(grid.lane(1, &[1, 0]).unwrap(), vec![&4, &5, &6]);
        assert_eq!(grid.lane(0, &[0, 2]).unwrap(), vec![&3, &6]);
        assert!(grid.lane(0, &[0, 3]).is_none());
        assert!(grid.lane(2, &[0, 0]).is_none());
    }

    #[test]
    fn test_select_drops_axis() {
        let grid = SweepGrid::from_data(vec![2, 2, 2], (0..8).collect::<Vec<i32>>()).unwrap();
        let sub = grid.select(1, 1).unwrap();
        assert_eq!(sub.shape(), &[2, 2]);
        assert_eq!(sub.data(), &[2, 3, 6, 7]);
        assert_eq!(grid.data(), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(grid.select(1, 2).is_none());
        assert!(grid.select(3, 0).is_none());
    }

    #[test]
    fn test_from_data_shape_mismatch() {
        assert!(SweepGrid::from_data(vec![2, 2], vec![1, 2, 3]).is_none());
    }
}
