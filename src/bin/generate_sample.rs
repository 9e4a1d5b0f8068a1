//! Write a folder of synthetic C 1s scans for trying out the analyzer.
//!
//! Usage: `generate_sample [output_dir]` (default `sample_data`).

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Peaks on a linear background, plus Gaussian noise.
fn generate_scan(
    energies: &[f64],
    peaks: &[(f64, f64, f64)],
    background: (f64, f64),
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    let (slope, intercept) = background;
    energies
        .iter()
        .map(|&e| {
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(e, mu, sigma, amp))
                .sum();
            signal + slope * e + intercept + rng.gauss(0.0, noise_level)
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let output_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    // Binding energy: 280.0 → 295.0 eV, step 0.05
    let energies: Vec<f64> = (0..=300).map(|i| 280.0 + i as f64 * 0.05).collect();

    // C–C, C–O and C=O components
    let peaks = [(284.8, 0.6, 120.0), (286.4, 0.7, 35.0), (288.9, 0.8, 15.0)];

    let n_scans = 10;
    for scan in 0..n_scans {
        let intensity = generate_scan(&energies, &peaks, (-0.8, 260.0), 2.0, &mut rng);

        let mut text = String::new();
        for (e, i) in energies.iter().zip(&intensity) {
            writeln!(text, "{e:.2} {i:.4}")?;
        }
        let path = output_dir.join(format!("scan_{scan:02}.txt"));
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    }

    // Files the importer is expected to reject.
    std::fs::write(output_dir.join("scan_broken.txt"), "284.80 120.0\nsaturated detector\n")
        .context("writing broken scan")?;
    std::fs::write(output_dir.join("notes.md"), "C 1s, 10 sweeps\n").context("writing notes")?;

    println!(
        "Wrote {n_scans} scans ({} points each) plus 2 decoys to {}",
        energies.len(),
        output_dir.display()
    );
    Ok(())
}
