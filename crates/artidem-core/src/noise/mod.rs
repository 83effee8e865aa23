pub mod fbm;

use tracing::debug;

use crate::error::{DemError, DemResult};
use crate::field::Field;

pub use fbm::SimplexFbm;

/// A deterministic 2-D coherent-noise function.
///
/// `sample` returns a value nominally in [-1, 1]. Any `Fn(f64, f64, u32) -> f64`
/// closure is a noise source, which keeps the generator testable with stubs.
pub trait NoiseSource: Sync {
    fn sample(&self, x: f64, y: f64, octaves: u32) -> f64;
}

impl<F> NoiseSource for F
where
    F: Fn(f64, f64, u32) -> f64 + Sync,
{
    fn sample(&self, x: f64, y: f64, octaves: u32) -> f64 {
        self(x, y, octaves)
    }
}

/// Parameters of the base surface noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceNoise {
    pub octaves: u32,
    /// Cells per noise unit; larger values give broader features.
    pub frequency_scale: f64,
}

/// Map a noise value to the byte-like height range [1, 255].
#[inline]
pub fn rescale_to_height(value: f64) -> f32 {
    (value.clamp(-1.0, 1.0) * 127.0 + 128.0).trunc() as f32
}

/// Generate the base surface: one noise sample per cell at
/// `(x / frequency_scale, y / frequency_scale)`, rescaled by
/// [`rescale_to_height`].
pub fn generate_surface(
    nx: usize,
    ny: usize,
    params: SurfaceNoise,
    noise: &dyn NoiseSource,
) -> DemResult<Field<f32>> {
    if nx == 0 || ny == 0 {
        return Err(DemError::InvalidShape(format!("grid must be non-empty, got {nx}x{ny}")));
    }
    if params.octaves == 0 {
        return Err(DemError::InvalidParameter("octaves must be positive".into()));
    }
    if !(params.frequency_scale > 0.0) {
        return Err(DemError::InvalidParameter(format!(
            "frequency scale must be positive, got {}",
            params.frequency_scale
        )));
    }
    debug!(nx, ny, octaves = params.octaves, scale = params.frequency_scale, "sampling surface noise");

    let mut data = vec![0.0f32; nx * ny];
    let fill_row = |y: usize, row: &mut [f32]| {
        for (x, cell) in row.iter_mut().enumerate() {
            let v = noise.sample(
                x as f64 / params.frequency_scale,
                y as f64 / params.frequency_scale,
                params.octaves,
            );
            *cell = rescale_to_height(v);
        }
    };

    #[cfg(feature = "threading")]
    {
        use rayon::prelude::*;
        data.par_chunks_mut(nx).enumerate().for_each(|(y, row)| fill_row(y, row));
    }
    #[cfg(not(feature = "threading"))]
    {
        data.chunks_mut(nx).enumerate().for_each(|(y, row)| fill_row(y, row));
    }

    Field::from_vec(nx, ny, data)
}
