//! Ready-made surfaces: the noise island and small hand-authored test grids.

use crate::error::{DemError, DemResult};
use crate::field::Field;
use crate::noise::{generate_surface, NoiseSource, SurfaceNoise};
use crate::overrides::{apply_overrides, Override};
use crate::window::{apply_gaussian_window, lower_baseline};

/// Gaussian island shaping applied to a noise surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IslandShape {
    pub fwhm: f64,
    pub center: Option<(f64, f64)>,
    /// Subtracted from every cell after windowing.
    pub baseline_offset: f32,
}

/// Noise surface, optionally windowed into an island and lowered.
pub fn island_surface(
    nx: usize,
    ny: usize,
    params: SurfaceNoise,
    shape: Option<IslandShape>,
    noise: &dyn NoiseSource,
) -> DemResult<Field<f32>> {
    let base = generate_surface(nx, ny, params, noise)?;
    let Some(shape) = shape else {
        return Ok(base);
    };
    let windowed = apply_gaussian_window(&base, shape.fwhm, shape.center)?;
    if shape.baseline_offset != 0.0 {
        Ok(lower_baseline(&windowed, shape.baseline_offset))
    } else {
        Ok(windowed)
    }
}

/// Square of side `size` with a border of 2, an interior of 1, and a
/// single sea-level notch at cell (0, 2).
pub fn notched_square(size: usize) -> DemResult<Field<f32>> {
    if size < 3 {
        return Err(DemError::InvalidShape(format!("notched square needs side >= 3, got {size}")));
    }
    let last = size - 1;
    let mut surface = Field::new(size, size, 1.0f32);
    apply_overrides(
        &mut surface,
        &[
            Override::Row { y: 0, value: 2.0 },
            Override::Row { y: last, value: 2.0 },
            Override::Column { x: 0, value: 2.0 },
            Override::Column { x: last, value: 2.0 },
            Override::Cell { x: 0, y: 2, value: 0.0 },
        ],
    )?;
    Ok(surface)
}

/// An inclined test plane and the uphill cell its melt source sits on.
#[derive(Debug, Clone, PartialEq)]
pub struct InclinedPlane {
    pub name: &'static str,
    pub surface: Field<f32>,
    pub melt: (usize, usize),
}

/// The eight planes (four axis-aligned, four diagonal) used to exercise flux
/// routing in every direction.
pub fn inclined_planes(size: usize) -> DemResult<Vec<InclinedPlane>> {
    if size < 4 {
        return Err(DemError::InvalidShape(format!("inclined planes need side >= 4, got {size}")));
    }
    let s = (size - 1) as f32;
    let hi = size - 2;
    let mid = (size - 1) / 2;

    type Slope = fn(f32, f32, f32) -> f32;
    let planes: [(&'static str, Slope, (usize, usize)); 8] = [
        ("rise_y", |_, y, _| y, (mid, hi)),
        ("fall_y", |_, y, s| s - y, (mid, 1)),
        ("rise_x", |x, _, _| x, (hi, mid)),
        ("fall_x", |x, _, s| s - x, (1, mid)),
        ("rise_xy", |x, y, _| (x + y) / 2.0, (hi, hi)),
        ("rise_y_fall_x", |x, y, s| (y - x + s) / 2.0, (1, hi)),
        ("rise_x_fall_y", |x, y, s| (x - y + s) / 2.0, (hi, 1)),
        ("fall_xy", |x, y, s| (2.0 * s - x - y) / 2.0, (1, 1)),
    ];

    Ok(planes
        .into_iter()
        .map(|(name, slope, melt)| InclinedPlane {
            name,
            surface: Field::from_fn(size, size, |x, y| slope(x as f32, y as f32, s)),
            melt,
        })
        .collect())
}
