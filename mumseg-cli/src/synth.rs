//! Synthetic test images: a bright disk on a dark background plus uniform noise.

use mumseg_core::{DMatrix, Field};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct DiskConfig {
    pub rows: usize,
    pub cols: usize,
    /// Disk radius, as a fraction of the shorter side
    pub radius: f64,
    pub inside: f64,
    pub outside: f64,
    /// Half-width of the uniform noise added to every cell
    pub noise: f64,
    pub seed: u64,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self { rows: 32, cols: 32, radius: 0.3, inside: 1., outside: -1., noise: 0.2, seed: 0 }
    }
}

/// Same config and seed always give the same image.
pub fn noisy_disk(config: &DiskConfig) -> Field {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let cr = (config.rows as f64 - 1.) / 2.;
    let cc = (config.cols as f64 - 1.) / 2.;
    let r = config.radius * config.rows.min(config.cols) as f64;
    DMatrix::from_fn(config.rows, config.cols, |i, j| {
        let (dr, dc) = (i as f64 - cr, j as f64 - cc);
        let base = if dr * dr + dc * dc <= r * r { config.inside } else { config.outside };
        if config.noise > 0. {
            base + rng.gen_range(-config.noise..=config.noise)
        } else {
            base
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn noiseless() {
        let config =
            DiskConfig { rows: 9, cols: 9, radius: 0.25, noise: 0., ..DiskConfig::default() };
        let u = noisy_disk(&config);
        assert_eq!(u.shape(), (9, 9));
        assert_eq!(u[(4, 4)], 1.);
        assert_eq!(u[(4, 6)], 1.);
        assert_eq!(u[(4, 7)], -1.);
        assert_eq!(u[(0, 0)], -1.);
        assert_eq!(u.iter().filter(|v| **v > 0.).count(), 21);
    }

    #[test]
    fn seeded_noise() {
        let config = DiskConfig { rows: 6, cols: 8, noise: 0.1, seed: 7, ..DiskConfig::default() };
        let a = noisy_disk(&config);
        assert_eq!(a, noisy_disk(&config));
        assert_ne!(a, noisy_disk(&DiskConfig { seed: 8, ..config.clone() }));
        assert!(a.iter().all(|v| (v.abs() - 1.).abs() <= 0.1));
    }
}
