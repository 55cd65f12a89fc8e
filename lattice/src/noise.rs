//! Seeded coherent noise.
//!
//! `NoiseGenerator` samples Perlin and Simplex noise in two and three
//! dimensions, fills noise fields, and displaces the heights of meshes.
//! Sampling is deterministic: generators created from the same `NoiseConfig`
//! always produce the same values.
//!
//! Perlin samples are remapped into $[0, 1]$ while Simplex samples are left in
//! $[-1, 1]$. Noise fields are always in $[0, 1]$.
//!
//! # Examples
//!
//! Displacing a plane into terrain:
//!
//! ```rust
//! use lattice::builder::MeshBuilder;
//! use lattice::noise::{NoiseConfig, NoiseGenerator};
//!
//! let noise = NoiseGenerator::new(NoiseConfig {
//!     seed: 7,
//!     ..Default::default()
//! });
//! let mut mesh = MeshBuilder::new()
//!     .generate_plane(16.0, 16.0, 32, 32)
//!     .unwrap()
//!     .clone();
//! noise.displace(&mut mesh, 2.0);
//!
//! assert!(mesh.as_position_slice().iter().all(|position| position.y <= 2.0));
//! ```

use ::noise::{NoiseFn, Perlin, Simplex};
use std::fmt::{self, Debug, Formatter};
use thiserror::Error;
use tracing::debug;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::buffer::MeshBuffer;
use crate::primitive::into_scalar;

/// Seed and frequency of a `NoiseGenerator`.
///
/// Coordinates are multiplied by `scale` before sampling. Integer lattice
/// points of the underlying gradient noise always sample to the midpoint of
/// the range, so a scale of one produces uniform fields.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
pub struct NoiseConfig {
    pub seed: u32,
    pub scale: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        NoiseConfig {
            seed: 0,
            scale: 0.1,
        }
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("noise field of {width} by {height} conflicts with sample count {len}")]
    SampleCountConflict {
        width: usize,
        height: usize,
        len: usize,
    },
    #[error("noise sample {index} is outside of [0, 1]")]
    SampleOutOfRange { index: usize },
}

/// Row-major grid of noise samples in $[0, 1]$.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serialize", serde(try_from = "RawNoiseField"))]
pub struct NoiseField {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

#[cfg(feature = "serialize")]
#[derive(Deserialize)]
struct RawNoiseField {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

#[cfg(feature = "serialize")]
impl TryFrom<RawNoiseField> for NoiseField {
    type Error = FieldError;

    fn try_from(field: RawNoiseField) -> Result<Self, Self::Error> {
        NoiseField::from_samples(field.width, field.height, field.samples)
    }
}

impl NoiseField {
    /// Creates a `NoiseField` from row-major samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of samples is not `width` times
    /// `height` or if any sample is outside of $[0, 1]$.
    pub fn from_samples(
        width: usize,
        height: usize,
        samples: Vec<f32>,
    ) -> Result<Self, FieldError> {
        if width.checked_mul(height) != Some(samples.len()) {
            return Err(FieldError::SampleCountConflict {
                width,
                height,
                len: samples.len(),
            });
        }
        if let Some(index) = samples
            .iter()
            .position(|sample| !(0.0..=1.0).contains(sample))
        {
            return Err(FieldError::SampleOutOfRange { index });
        }
        Ok(NoiseField {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Gets the sample in column `x` and row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            self.samples.get((y * self.width) + x).copied()
        }
        else {
            None
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        self.samples.as_slice()
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

pub struct NoiseGenerator {
    config: NoiseConfig,
    perlin: Perlin,
    simplex: Simplex,
}

impl NoiseGenerator {
    pub fn new(config: NoiseConfig) -> Self {
        NoiseGenerator {
            config,
            perlin: Perlin::new(config.seed),
            simplex: Simplex::new(config.seed),
        }
    }

    pub fn with_seed(seed: u32) -> Self {
        NoiseGenerator::new(NoiseConfig {
            seed,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Samples 2D Perlin noise in $[0, 1]$.
    pub fn perlin(&self, x: f32, y: f32) -> f32 {
        unit(self.perlin.get(self.scaled([x, y])))
    }

    /// Samples 2D Simplex noise in $[-1, 1]$.
    pub fn simplex(&self, x: f32, y: f32) -> f32 {
        signed(self.simplex.get(self.scaled([x, y])))
    }

    /// Samples 3D Perlin noise in $[0, 1]$.
    pub fn perlin_3d(&self, x: f32, y: f32, z: f32) -> f32 {
        unit(self.perlin.get(self.scaled([x, y, z])))
    }

    /// Samples 3D Simplex noise in $[-1, 1]$.
    pub fn simplex_3d(&self, x: f32, y: f32, z: f32) -> f32 {
        signed(self.simplex.get(self.scaled([x, y, z])))
    }

    /// Samples Perlin noise at each cell of a `width` by `height` grid.
    pub fn perlin_field(&self, width: usize, height: usize) -> NoiseField {
        self.field(width, height, |x, y| self.perlin(x, y))
    }

    /// Samples Simplex noise at each cell of a `width` by `height` grid.
    ///
    /// Samples are remapped from $[-1, 1]$ into $[0, 1]$.
    pub fn simplex_field(&self, width: usize, height: usize) -> NoiseField {
        self.field(width, height, |x, y| inverse_lerp(-1.0, 1.0, self.simplex(x, y)))
    }

    /// Sets the height of each vertex of a mesh from Perlin noise.
    ///
    /// The $y$-coordinate of each position becomes `amplitude` times the
    /// Perlin sample at its $xz$-coordinates. Topology and texture
    /// coordinates are unchanged.
    pub fn displace(&self, buffer: &mut MeshBuffer, amplitude: f32) {
        for position in buffer.as_position_slice_mut() {
            position.y = amplitude * self.perlin(position.x, position.z);
        }
        debug!(
            vertices = buffer.vertex_count(),
            amplitude,
            seed = self.config.seed,
            "displaced mesh"
        );
    }

    fn field<F>(&self, width: usize, height: usize, mut f: F) -> NoiseField
    where
        F: FnMut(f32, f32) -> f32,
    {
        let mut samples = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(into_scalar(x), into_scalar(y)));
            }
        }
        debug!(width, height, seed = self.config.seed, "sampled noise field");
        NoiseField {
            width,
            height,
            samples,
        }
    }

    fn scaled<const N: usize>(&self, point: [f32; N]) -> [f64; N] {
        point.map(|x| f64::from(x * self.config.scale))
    }
}

impl Clone for NoiseGenerator {
    fn clone(&self) -> Self {
        NoiseGenerator::new(self.config)
    }
}

impl Debug for NoiseGenerator {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NoiseGenerator")
            .field("config", &self.config)
            .finish()
    }
}

impl Default for NoiseGenerator {
    fn default() -> Self {
        NoiseGenerator::new(NoiseConfig::default())
    }
}

fn unit(value: f64) -> f32 {
    ((value + 1.0) / 2.0).clamp(0.0, 1.0) as f32
}

fn signed(value: f64) -> f32 {
    value.clamp(-1.0, 1.0) as f32
}

fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::builder::MeshBuilder;
    use crate::noise::{FieldError, NoiseConfig, NoiseField, NoiseGenerator};

    fn samples() -> impl Iterator<Item = (f32, f32, f32)> {
        (0..64).map(|n| {
            let n = n as f32;
            (n * 0.37, n * -1.13, n * 2.71)
        })
    }

    #[test]
    fn sample_ranges() {
        let noise = NoiseGenerator::with_seed(42);

        for (x, y, z) in samples() {
            assert!((0.0..=1.0).contains(&noise.perlin(x, y)));
            assert!((-1.0..=1.0).contains(&noise.simplex(x, y)));
            assert!((0.0..=1.0).contains(&noise.perlin_3d(x, y, z)));
            assert!((-1.0..=1.0).contains(&noise.simplex_3d(x, y, z)));
        }
    }

    #[test]
    fn deterministic_per_seed() {
        let a = NoiseGenerator::with_seed(9);
        let b = NoiseGenerator::with_seed(9);

        for (x, y, z) in samples() {
            assert_eq!(a.perlin(x, y), b.perlin(x, y));
            assert_eq!(a.simplex_3d(x, y, z), b.simplex_3d(x, y, z));
        }
        assert_eq!(a.perlin_field(8, 8), b.perlin_field(8, 8));
        assert_eq!(a.simplex_field(8, 8), a.clone().simplex_field(8, 8));
    }

    #[test]
    fn seeds_differ() {
        let a = NoiseGenerator::with_seed(1).perlin_field(16, 16);
        let b = NoiseGenerator::with_seed(2).perlin_field(16, 16);

        assert_ne!(a, b);
    }

    #[test]
    fn field_layout() {
        let noise = NoiseGenerator::with_seed(3);
        let field = noise.perlin_field(5, 3);

        assert_eq!(15, field.as_slice().len());
        assert_eq!(Some(noise.perlin(4.0, 2.0)), field.get(4, 2));
        assert_eq!(Some(noise.perlin(1.0, 2.0)), field.as_slice().get(11).copied());
        assert_eq!(None, field.get(5, 0));
        assert_eq!(None, field.get(0, 3));
    }

    #[test]
    fn field_varies_and_is_normalized() {
        for field in [
            NoiseGenerator::with_seed(5).perlin_field(16, 16),
            NoiseGenerator::with_seed(5).simplex_field(16, 16),
        ] {
            let min = field.as_slice().iter().copied().fold(f32::MAX, f32::min);
            let max = field.as_slice().iter().copied().fold(f32::MIN, f32::max);

            assert!(min >= 0.0);
            assert!(max <= 1.0);
            assert!(min < max);
        }
    }

    #[test]
    fn unit_scale_lattice_is_uniform() {
        let noise = NoiseGenerator::new(NoiseConfig {
            seed: 11,
            scale: 1.0,
        });

        for value in noise.perlin_field(4, 4).into_samples() {
            assert_relative_eq!(0.5, value, epsilon = 1.0e-6);
        }
    }

    #[test]
    fn displace_sets_heights() {
        let noise = NoiseGenerator::with_seed(13);
        let original = MeshBuilder::new()
            .generate_plane(8.0, 8.0, 8, 8)
            .unwrap()
            .clone();
        let mut mesh = original.clone();
        noise.displace(&mut mesh, 3.0);

        assert_eq!(original.as_index_slice(), mesh.as_index_slice());
        assert_eq!(original.as_uv_slice(), mesh.as_uv_slice());
        for (before, after) in original
            .as_position_slice()
            .iter()
            .zip(mesh.as_position_slice())
        {
            assert_eq!(before.x, after.x);
            assert_eq!(before.z, after.z);
            assert_relative_eq!(3.0 * noise.perlin(before.x, before.z), after.y);
        }
    }

    #[test]
    fn from_samples() {
        let field = NoiseField::from_samples(2, 2, vec![0.0, 0.25, 0.5, 1.0]).unwrap();

        assert_eq!(Some(0.5), field.get(0, 1));
        assert_eq!(
            Err(FieldError::SampleCountConflict {
                width: 2,
                height: 2,
                len: 3
            }),
            NoiseField::from_samples(2, 2, vec![0.0, 0.25, 0.5]),
        );
        assert_eq!(
            Err(FieldError::SampleCountConflict {
                width: usize::MAX,
                height: 2,
                len: 0
            }),
            NoiseField::from_samples(usize::MAX, 2, vec![]),
        );
        assert_eq!(
            Err(FieldError::SampleOutOfRange { index: 1 }),
            NoiseField::from_samples(1, 2, vec![0.0, f32::NAN]),
        );
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn serde_round_trip() {
        let config = NoiseConfig {
            seed: 17,
            scale: 0.25,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(config, serde_json::from_str::<NoiseConfig>(&json).unwrap());

        let field = NoiseGenerator::new(config).perlin_field(4, 3);
        let json = serde_json::to_string(&field).unwrap();
        assert_eq!(field, serde_json::from_str::<NoiseField>(&json).unwrap());
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn deserialize_rejects_inconsistent_field() {
        let error =
            serde_json::from_str::<NoiseField>(r#"{"width":4,"height":3,"samples":[0.5]}"#)
                .unwrap_err();
        assert!(error.to_string().starts_with(
            &FieldError::SampleCountConflict {
                width: 4,
                height: 3,
                len: 1
            }
            .to_string()
        ));
        assert!(
            serde_json::from_str::<NoiseField>(r#"{"width":1,"height":1,"samples":[2.0]}"#)
                .is_err()
        );
    }
}
