//! The geometry record handed to flux routing: surface plus derived fields.

use tracing::debug;

use crate::error::{DemError, DemResult};
use crate::field::Field;
use crate::mask::compute_ice_mask;

/// All per-cell arrays of one generated grid.
///
/// Every field has shape `(nx, ny)` where `nx = x_values.len()` and
/// `ny = y_values.len()`. Records built through [`Geometry::from_surface`]
/// uphold this; the dataset writer re-checks it.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Cell indices along x, in metres.
    pub x_values: Vec<f32>,
    /// Cell indices along y, in metres.
    pub y_values: Vec<f32>,
    /// Surface elevation (m).
    pub surface: Field<f32>,
    /// Bed elevation (m), zero everywhere.
    pub bed: Field<f32>,
    /// Ice thickness (m): surface minus bed.
    pub thickness: Field<f32>,
    /// Basal melt rate (m/s water equivalent).
    pub melt: Field<f32>,
    /// Basal temperature, zero placeholder.
    pub basal_temp: Field<f32>,
    pub mask: Option<Field<i32>>,
}

impl Geometry {
    /// Derive bed, thickness, melt, and basal temperature from a surface.
    pub fn from_surface(surface: Field<f32>) -> DemResult<Self> {
        let (nx, ny) = surface.shape();
        if nx == 0 || ny == 0 {
            return Err(DemError::InvalidShape(format!("grid must be non-empty, got {nx}x{ny}")));
        }
        if surface.data.len() != nx * ny {
            return Err(DemError::InvalidShape(format!(
                "surface holds {} values for a {nx}x{ny} grid",
                surface.data.len()
            )));
        }
        debug!(nx, ny, "deriving geometry from surface");

        let bed = Field::new(nx, ny, 0.0f32);
        let thickness = surface.zip_map(&bed, |s, b| s - b)?;
        Ok(Self {
            x_values: (0..nx).map(|i| i as f32).collect(),
            y_values: (0..ny).map(|j| j as f32).collect(),
            thickness,
            bed,
            melt: Field::new(nx, ny, 0.0),
            basal_temp: Field::new(nx, ny, 0.0),
            mask: None,
            surface,
        })
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.x_values.len()
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.y_values.len()
    }

    /// Mark `(x, y)` as the melting cell (rate 1).
    pub fn with_melt_at(mut self, x: usize, y: usize) -> DemResult<Self> {
        if !self.melt.contains(x, y) {
            return Err(DemError::OutOfBounds { x, y, nx: self.nx(), ny: self.ny() });
        }
        self.melt.set(x, y, 1.0);
        Ok(self)
    }

    /// Attach the ice-type mask of the surface against `level`.
    pub fn with_mask(mut self, level: f32) -> Self {
        self.mask = Some(compute_ice_mask(&self.surface, level));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(nx: usize, ny: usize) -> Field<f32> {
        Field::from_fn(nx, ny, |x, y| (x * 3 + y) as f32 - 4.0)
    }

    #[test]
    fn derived_fields_share_the_surface_shape() {
        let g = Geometry::from_surface(ramp(5, 3)).unwrap().with_mask(0.0);
        assert_eq!((g.nx(), g.ny()), (5, 3));
        for f in [&g.surface, &g.bed, &g.thickness, &g.melt, &g.basal_temp] {
            assert_eq!(f.shape(), (5, 3));
        }
        assert_eq!(g.mask.as_ref().map(|m| m.shape()), Some((5, 3)));
        assert_eq!(g.x_values, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(g.y_values, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn thickness_is_surface_minus_bed_and_placeholders_are_zero() {
        let g = Geometry::from_surface(ramp(6, 4)).unwrap();
        for i in 0..g.surface.data.len() {
            assert_eq!(g.thickness.data[i], g.surface.data[i] - g.bed.data[i]);
        }
        assert!(g.bed.data.iter().all(|&v| v == 0.0));
        assert!(g.basal_temp.data.iter().all(|&v| v == 0.0));
        assert!(g.melt.data.iter().all(|&v| v == 0.0));
        assert!(g.mask.is_none());
    }

    #[test]
    fn melt_position_sets_exactly_one_cell() {
        let g = Geometry::from_surface(ramp(5, 5)).unwrap().with_melt_at(3, 1).unwrap();
        for y in 0..5 {
            for x in 0..5 {
                let expected = if (x, y) == (3, 1) { 1.0 } else { 0.0 };
                assert_eq!(g.melt.get(x, y), expected);
            }
        }
    }

    #[test]
    fn melt_position_outside_grid_fails() {
        let g = Geometry::from_surface(ramp(5, 4)).unwrap();
        let err = g.clone().with_melt_at(5, 0).unwrap_err();
        assert!(matches!(err, DemError::OutOfBounds { x: 5, y: 0, nx: 5, ny: 4 }));
        assert!(g.with_melt_at(0, 4).is_err());
    }

    #[test]
    fn rederiving_replaces_all_fields() {
        let first = Geometry::from_surface(ramp(4, 4)).unwrap().with_melt_at(1, 1).unwrap();
        let again = Geometry::from_surface(first.surface.clone()).unwrap();
        assert_eq!(again, Geometry::from_surface(ramp(4, 4)).unwrap());
        assert_eq!(again.melt.get(1, 1), 0.0);
    }

    #[test]
    fn empty_surface_is_rejected() {
        let empty = Field { data: Vec::new(), nx: 0, ny: 3 };
        assert!(matches!(Geometry::from_surface(empty), Err(DemError::InvalidShape(_))));
    }
}
