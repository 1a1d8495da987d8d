//! Dense distance table with holes.

/// A dense n×n table of distances stored in row-major order.
///
/// Cells may be absent. Tables are commonly stored lower-triangular, with
/// the upper half left blank; callers mirror lookups to read them as
/// symmetric (see [`DistanceTable::symmetric`]).
///
/// # Examples
///
/// ```
/// use parcel_routing::distance::DistanceTable;
///
/// let table = DistanceTable::from_rows(vec![
///     vec![Some(0.0)],
///     vec![Some(7.2), Some(0.0)],
///     vec![Some(3.8), Some(7.1), Some(0.0)],
/// ]);
/// assert_eq!(table.size(), 3);
/// assert_eq!(table.cell(1, 0), Some(7.2));
/// assert_eq!(table.cell(0, 1), None);
/// assert_eq!(table.symmetric(0, 1), Some(7.2));
/// ```
#[derive(Debug, Clone)]
pub struct DistanceTable {
    data: Vec<Option<f64>>,
    size: usize,
}

impl DistanceTable {
    /// Creates a table of the given size with every cell absent.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![None; size * size],
            size,
        }
    }

    /// Builds a table from ragged rows.
    ///
    /// The size is the larger of the row count and the longest row; missing
    /// trailing cells are absent.
    pub fn from_rows(rows: Vec<Vec<Option<f64>>>) -> Self {
        let size = rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(rows.len());
        let mut table = Self::new(size);
        for (i, row) in rows.into_iter().enumerate() {
            for (j, cell) in row.into_iter().enumerate() {
                table.data[i * size + j] = cell;
            }
        }
        table
    }

    /// Returns the stored distance from `from` to `to`.
    ///
    /// Absent when either index is out of range or the cell is empty or
    /// not a finite number.
    pub fn cell(&self, from: usize, to: usize) -> Option<f64> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.data[from * self.size + to].filter(|d| d.is_finite())
    }

    /// Forward cell, falling back to the mirrored cell.
    pub fn symmetric(&self, from: usize, to: usize) -> Option<f64> {
        self.cell(from, to).or_else(|| self.cell(to, from))
    }

    /// Sets the distance from `from` to `to`. Out-of-range indices are ignored.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        if from < self.size && to < self.size {
            self.data[from * self.size + to] = Some(distance);
        }
    }

    /// Number of locations covered by this table.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Unordered location pairs with no usable distance in either direction.
    pub fn missing_pairs(&self) -> Vec<(usize, usize)> {
        let mut missing = Vec::new();
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if self.symmetric(i, j).is_none() {
                    missing.push((i, j));
                }
            }
        }
        missing
    }
}
