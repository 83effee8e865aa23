use serde::{Deserialize, Serialize};

use crate::error::{DemError, DemResult};

/// A dense nx × ny lattice of cell values, row-major with `y` as the row.
/// Cell `(x, y)` lives at `data[y * nx + x]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field<T> {
    pub data: Vec<T>,
    pub nx: usize,
    pub ny: usize,
}

impl<T: Copy> Field<T> {
    /// Create a new field filled with the given value.
    pub fn new(nx: usize, ny: usize, fill: T) -> Self {
        Self { data: vec![fill; nx * ny], nx, ny }
    }

    /// Wrap row-major data, checking it covers exactly nx × ny cells.
    pub fn from_vec(nx: usize, ny: usize, data: Vec<T>) -> DemResult<Self> {
        if nx == 0 || ny == 0 {
            return Err(DemError::InvalidShape(format!("grid must be non-empty, got {nx}x{ny}")));
        }
        if data.len() != nx * ny {
            return Err(DemError::InvalidShape(format!(
                "{} values cannot fill a {nx}x{ny} grid",
                data.len()
            )));
        }
        Ok(Self { data, nx, ny })
    }

    /// Build a field by evaluating `f(x, y)` for every cell.
    pub fn from_fn(nx: usize, ny: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nx * ny);
        for y in 0..ny {
            for x in 0..nx {
                data.push(f(x, y));
            }
        }
        Self { data, nx, ny }
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.nx && y < self.ny
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * self.nx + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, val: T) {
        self.data[y * self.nx + x] = val;
    }

    /// Elementwise transform into a new field of the same shape.
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> Field<U> {
        Field { data: self.data.iter().map(|&v| f(v)).collect(), nx: self.nx, ny: self.ny }
    }

    /// Elementwise combination of two same-shaped fields.
    pub fn zip_map<U: Copy, V>(&self, other: &Field<U>, f: impl Fn(T, U) -> V) -> DemResult<Field<V>> {
        if self.shape() != other.shape() {
            return Err(DemError::InvalidShape(format!(
                "cannot combine {:?} with {:?}",
                self.shape(),
                other.shape()
            )));
        }
        let data = self.data.iter().zip(&other.data).map(|(&a, &b)| f(a, b)).collect();
        Ok(Field { data, nx: self.nx, ny: self.ny })
    }

    /// Cell values with `x` as the slowest-varying index, i.e. the layout of a
    /// variable declared over `(x, y)`.
    pub fn x_major(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.data.len());
        for x in 0..self.nx {
            for y in 0..self.ny {
                out.push(self.get(x, y));
            }
        }
        out
    }

    /// Inverse of [`Field::x_major`].
    pub fn from_x_major(nx: usize, ny: usize, values: &[T]) -> DemResult<Self> {
        if values.len() != nx * ny {
            return Err(DemError::InvalidShape(format!(
                "{} values cannot fill a {nx}x{ny} grid",
                values.len()
            )));
        }
        Ok(Self::from_fn(nx, ny, |x, y| values[x * ny + y]))
    }
}

impl Field<f32> {
    pub fn min_value(&self) -> f32 {
        self.data.iter().cloned().fold(f32::INFINITY, f32::min)
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().cloned().fold(f32::NEG_INFINITY, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_address_x_then_y() {
        let mut f = Field::new(3, 2, 0.0f32);
        f.set(2, 1, 5.0);
        assert_eq!(f.get(2, 1), 5.0);
        assert_eq!(f.data[5], 5.0);
        assert_eq!(f.shape(), (3, 2));
    }

    #[test]
    fn from_vec_rejects_wrong_length_and_empty_grid() {
        assert!(matches!(Field::from_vec(2, 2, vec![1.0f32; 3]), Err(DemError::InvalidShape(_))));
        assert!(matches!(Field::<f32>::from_vec(0, 2, vec![]), Err(DemError::InvalidShape(_))));
    }

    #[test]
    fn x_major_round_trips_non_square_field() {
        let f = Field::from_fn(3, 2, |x, y| (x * 10 + y) as i32);
        let xm = f.x_major();
        assert_eq!(xm, vec![0, 1, 10, 11, 20, 21]);
        assert_eq!(Field::from_x_major(3, 2, &xm).unwrap(), f);
    }

    #[test]
    fn zip_map_rejects_mismatched_shapes() {
        let a = Field::new(2, 3, 1.0f32);
        let b = Field::new(3, 2, 1.0f32);
        assert!(a.zip_map(&b, |p, q| p + q).is_err());
    }
}
