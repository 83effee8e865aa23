//! Radial Gaussian windowing ("island shaping") and baseline offsets.

use tracing::debug;

use crate::error::{DemError, DemResult};
use crate::field::Field;

/// Square Gaussian kernel of side `size`.
///
/// `fwhm` is the full width at half maximum and can be thought of as an
/// effective radius. `center` defaults to `(size / 2, size / 2)`.
pub fn gaussian_kernel(size: usize, fwhm: f64, center: Option<(f64, f64)>) -> DemResult<Field<f64>> {
    if size == 0 {
        return Err(DemError::InvalidShape("kernel size must be positive".into()));
    }
    if !(fwhm > 0.0) {
        return Err(DemError::InvalidParameter(format!("fwhm must be positive, got {fwhm}")));
    }
    let (x0, y0) = center.unwrap_or(((size / 2) as f64, (size / 2) as f64));
    let k = -4.0 * std::f64::consts::LN_2 / (fwhm * fwhm);
    Ok(Field::from_fn(size, size, |x, y| {
        let dx = x as f64 - x0;
        let dy = y as f64 - y0;
        (k * (dx * dx + dy * dy)).exp()
    }))
}

/// Multiply a square surface elementwise by a Gaussian window.
pub fn apply_gaussian_window(
    surface: &Field<f32>,
    fwhm: f64,
    center: Option<(f64, f64)>,
) -> DemResult<Field<f32>> {
    if surface.nx != surface.ny {
        return Err(DemError::InvalidShape(format!(
            "windowing needs a square surface, got {}x{}",
            surface.nx, surface.ny
        )));
    }
    debug!(size = surface.nx, fwhm, ?center, "applying gaussian window");
    let kernel = gaussian_kernel(surface.nx, fwhm, center)?;
    surface.zip_map(&kernel, |h, w| (h as f64 * w) as f32)
}

/// Subtract `offset` from every cell, lowering the baseline below sea level.
pub fn lower_baseline(surface: &Field<f32>, offset: f32) -> Field<f32> {
    surface.map(|h| h - offset)
}
