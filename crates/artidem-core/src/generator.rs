//! Pipeline orchestrator: surface noise → island shaping → geometry → mask.

use tracing::{debug, info};

use crate::config::DemConfig;
use crate::error::DemResult;
use crate::geometry::Geometry;
use crate::noise::{NoiseSource, SimplexFbm, SurfaceNoise};
use crate::overrides::apply_overrides;
use crate::presets::{island_surface, IslandShape};

/// Pick the configured seed or draw one.
pub fn resolve_seed(config: &DemConfig) -> u32 {
    config.seed.unwrap_or_else(rand::random)
}

/// Run the island pipeline with an injected noise source.
///
/// Pipeline order:
///   1. Noise surface
///   2. Gaussian window and baseline offset
///   3. Manual overrides
///   4. Derived geometry fields
///   5. Melt cell
///   6. Ice-type mask
pub fn generate(config: &DemConfig, noise: &dyn NoiseSource) -> DemResult<Geometry> {
    config.validate()?;

    // ── 1–3. Surface ─────────────────────────────────────────────────────────
    let params = SurfaceNoise { octaves: config.octaves, frequency_scale: config.frequency_scale };
    let shape = config.window.map(|w| IslandShape {
        fwhm: w.fwhm,
        center: w.center.map(|[x, y]| (x, y)),
        baseline_offset: config.baseline_offset,
    });
    let mut surface = island_surface(config.nx, config.ny, params, shape, noise)?;
    apply_overrides(&mut surface, &config.overrides)?;
    debug!(min = surface.min_value(), max = surface.max_value(), "surface ready");

    // ── 4–5. Geometry ────────────────────────────────────────────────────────
    let geometry = Geometry::from_surface(surface)?.with_melt_at(config.melt_x, config.melt_y)?;

    // ── 6. Mask ──────────────────────────────────────────────────────────────
    Ok(match config.mask_level {
        Some(level) => geometry.with_mask(level),
        None => geometry,
    })
}

/// Run the island pipeline with the simplex fBm.
pub fn generate_island(config: &DemConfig) -> DemResult<Geometry> {
    let seed = resolve_seed(config);
    info!(seed, nx = config.nx, ny = config.ny, "generating island");
    generate(config, &SimplexFbm::new(seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowConfig;
    use crate::error::DemError;

    fn small_config() -> DemConfig {
        DemConfig {
            nx: 32,
            ny: 32,
            frequency_scale: 10.0,
            window: Some(WindowConfig { fwhm: 16.0, center: None }),
            melt_x: 16,
            melt_y: 16,
            ..DemConfig::default()
        }
    }

    #[test]
    fn island_geometry_is_consistent() {
        let g = generate_island(&small_config()).unwrap();
        assert_eq!((g.nx(), g.ny()), (32, 32));
        assert_eq!(g.melt.get(16, 16), 1.0);
        assert_eq!(g.melt.data.iter().filter(|&&v| v != 0.0).count(), 1);
        assert_eq!(g.thickness, g.surface);
        let mask = g.mask.as_ref().unwrap();
        for (h, c) in g.surface.data.iter().zip(&mask.data) {
            assert_eq!(*c, if *h <= 0.0 { 4 } else { 2 });
        }
    }

    #[test]
    fn stub_noise_gives_exact_surface() {
        let config = DemConfig { window: None, mask_level: None, ..small_config() };
        let g = generate(&config, &|_: f64, _: f64, _: u32| 0.0).unwrap();
        assert!(g.surface.data.iter().all(|&h| h == 128.0));
        assert!(g.mask.is_none());
    }

    #[test]
    fn baseline_offset_creates_ocean() {
        let config = DemConfig { baseline_offset: 20.0, ..small_config() };
        let g = generate(&config, &|_: f64, _: f64, _: u32| 1.0).unwrap();
        assert_eq!(g.surface.get(16, 16), 255.0 - 20.0);
        let mask = g.mask.unwrap();
        assert_eq!(mask.get(16, 16), 2);
        assert_eq!(mask.get(0, 0), 4);
    }

    #[test]
    fn overrides_edit_the_generated_surface() {
        use crate::overrides::Override;
        let config = DemConfig {
            window: None,
            overrides: vec![
                Override::Column { x: 0, value: -5.0 },
                Override::Cell { x: 0, y: 3, value: 7.0 },
            ],
            ..small_config()
        };
        let g = generate(&config, &|_: f64, _: f64, _: u32| 0.0).unwrap();
        assert_eq!(g.surface.get(0, 0), -5.0);
        assert_eq!(g.surface.get(0, 3), 7.0);
        assert_eq!(g.surface.get(1, 3), 128.0);
        let mask = g.mask.unwrap();
        assert_eq!(mask.get(0, 0), 4);
        assert_eq!(mask.get(0, 3), 2);
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let config = small_config();
        assert_eq!(generate_island(&config).unwrap(), generate_island(&config).unwrap());
    }

    #[test]
    fn invalid_config_fails_before_sampling() {
        let config = DemConfig { melt_x: 40, ..small_config() };
        let err = generate(&config, &|_: f64, _: f64, _: u32| -> f64 { panic!("sampled") }).unwrap_err();
        assert!(matches!(err, DemError::OutOfBounds { .. }));
    }
}
