//! Fractional Brownian Motion over a simplex basis.
//!
//! fBm: sum of octaves with amplitude = persistence^i and frequency = lacunarity^i,
//! divided by the summed amplitudes so the result stays within [-1, 1].
use noise::{NoiseFn, Simplex};

use super::NoiseSource;

pub struct SimplexFbm {
    pub seed: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    noise: Simplex,
}

impl SimplexFbm {
    /// Construct an fBm with the given seed. Persistence is 0.5 and
    /// lacunarity 2.0.
    pub fn new(seed: u32) -> Self {
        Self { seed, persistence: 0.5, lacunarity: 2.0, noise: Simplex::new(seed) }
    }
}

impl NoiseSource for SimplexFbm {
    fn sample(&self, x: f64, y: f64, octaves: u32) -> f64 {
        let mut value = 0.0f64;
        let mut total_amp = 0.0f64;
        let mut amp = 1.0f64;
        let mut freq = 1.0f64;
        for _ in 0..octaves {
            value += amp * self.noise.get([x * freq, y * freq]);
            total_amp += amp;
            amp *= self.persistence;
            freq *= self.lacunarity;
        }
        if total_amp > 0.0 { value / total_amp } else { 0.0 }
    }
}
