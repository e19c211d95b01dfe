//! Sparse uniform-grid hashing of points for fixed-radius neighbor queries.
//!
//! Space is partitioned into cubic cells of a fixed side length. Each occupied
//! cell keeps the payloads inserted into it, so a query only has to visit the
//! few cells overlapping the search cube. Results are a superset of the
//! Euclidean ball; callers are expected to filter by exact distance.

use nalgebra::{Point3, Vector3};
use std::collections::HashMap;

/// Integer coordinates of a grid cell.
pub type CellKey = (i64, i64, i64);

/// A sparse uniform 3D grid mapping points to payloads.
///
/// Insertion is additive and there is no removal. The payload type is generic;
/// the alignment search stores atom indices.
///
/// # Performance
///
/// - Insertion: **O(1)** expected.
/// - Query with a radius equal to the cell size: visits the 3×3×3 neighborhood of
///   the query cell, **O(k)** expected for `k` returned payloads.
#[derive(Debug, Clone)]
pub struct GeomHash<T> {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<T>>,
    len: usize,
}

impl<T: Clone> GeomHash<T> {
    /// Creates an empty hash with the given cell side length.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not a positive finite number.
    pub fn new(cell_size: f64) -> Self {
        assert!(
            cell_size.is_finite() && cell_size > 0.0,
            "Cell size must be positive and finite"
        );
        Self {
            cell_size,
            cells: HashMap::new(),
            len: 0,
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of stored payloads.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of cells holding at least one payload.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Returns the key of the cell containing `point`.
    pub fn cell_of(&self, point: &Point3<f64>) -> CellKey {
        (
            (point.x / self.cell_size).floor() as i64,
            (point.y / self.cell_size).floor() as i64,
            (point.z / self.cell_size).floor() as i64,
        )
    }

    pub fn insert(&mut self, point: &Point3<f64>, payload: T) {
        let key = self.cell_of(point);
        self.cells.entry(key).or_default().push(payload);
        self.len += 1;
    }

    /// Appends to `out` every payload stored in a cell that overlaps the cube of
    /// half-side `radius` centered at `center`.
    ///
    /// Every payload inserted within Euclidean distance `radius` of `center` is
    /// guaranteed to be appended; payloads slightly farther away may be too.
    pub fn query(&self, center: &Point3<f64>, radius: f64, out: &mut Vec<T>) {
        if self.cells.is_empty() {
            return;
        }
        let reach = Vector3::repeat(radius.abs());
        let (min_x, min_y, min_z) = self.cell_of(&(center - reach));
        let (max_x, max_y, max_z) = self.cell_of(&(center + reach));

        for x in min_x..=max_x {
            for y in min_y..=max_y {
                for z in min_z..=max_z {
                    if let Some(payloads) = self.cells.get(&(x, y, z)) {
                        out.extend(payloads.iter().cloned());
                    }
                }
            }
        }
    }
}

impl<T: Clone> Extend<(Point3<f64>, T)> for GeomHash<T> {
    fn extend<I: IntoIterator<Item = (Point3<f64>, T)>>(&mut self, iter: I) {
        for (point, payload) in iter {
            self.insert(&point, payload);
        }
    }
}
