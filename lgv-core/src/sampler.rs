//! Random parameter tensors for landscape exploration
//!
//! A sampler is configured once per experiment and then drawn from
//! repeatedly. Draws consume the caller's RNG in row-major `(l, w, g)`
//! order, so a fixed seed reproduces the same sequence of tensors.

use std::f64::consts::PI;

use ndarray::Array3;
use rand::distributions::{Distribution as _, Uniform};
use rand::RngCore;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::error::{LgvError, Result};
use crate::tensor::{ParamShape, ParamTensor, Rank};

// =============================================================================
// Constants
// =============================================================================

/// Default half-width of the uniform distribution
pub const DEFAULT_UNIFORM_SCALE: f64 = PI;

/// Default standard deviation of the normal distribution
pub const DEFAULT_NORMAL_STD: f64 = 0.1;

/// Default standard deviation for small perturbations
pub const DEFAULT_TINY_NOISE_STD: f64 = 1e-3;

// =============================================================================
// Distributions
// =============================================================================

/// Parameter distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    /// Uniform over [-scale, scale]
    Uniform { scale: f64 },
    /// Zero-mean Gaussian, full-range exploration
    Normal { std: f64 },
    /// Zero-mean Gaussian, small perturbations around the origin
    TinyNoise { std: f64 },
}

impl Distribution {
    pub fn uniform() -> Self {
        Distribution::Uniform {
            scale: DEFAULT_UNIFORM_SCALE,
        }
    }

    pub fn normal() -> Self {
        Distribution::Normal {
            std: DEFAULT_NORMAL_STD,
        }
    }

    pub fn tiny_noise() -> Self {
        Distribution::TinyNoise {
            std: DEFAULT_TINY_NOISE_STD,
        }
    }

    /// Short name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            Distribution::Uniform { .. } => "uniform",
            Distribution::Normal { .. } => "normal",
            Distribution::TinyNoise { .. } => "tiny_noise",
        }
    }

    fn kernel(&self) -> Result<Kernel> {
        match *self {
            Distribution::Uniform { scale } => {
                if !scale.is_finite() || scale < 0.0 {
                    return Err(LgvError::InvalidDistribution(format!(
                        "uniform scale must be finite and non-negative, got {}",
                        scale
                    )));
                }
                Ok(Kernel::Uniform(Uniform::new_inclusive(-scale, scale)))
            }
            Distribution::Normal { std } | Distribution::TinyNoise { std } => {
                if !std.is_finite() || std < 0.0 {
                    return Err(LgvError::InvalidDistribution(format!(
                        "{} std must be finite and non-negative, got {}",
                        self.name(),
                        std
                    )));
                }
                Normal::new(0.0, std)
                    .map(Kernel::Normal)
                    .map_err(|e| LgvError::InvalidDistribution(e.to_string()))
            }
        }
    }
}

impl Default for Distribution {
    fn default() -> Self {
        Self::uniform()
    }
}

#[derive(Debug, Clone)]
enum Kernel {
    Uniform(Uniform<f64>),
    Normal(Normal<f64>),
}

impl Kernel {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        match self {
            Kernel::Uniform(d) => d.sample(rng),
            Kernel::Normal(d) => d.sample(rng),
        }
    }
}

// =============================================================================
// Sampler
// =============================================================================

/// Source of independent parameter tensors of one fixed shape
pub trait Sampler {
    /// Shape of every draw
    fn shape(&self) -> ParamShape;

    /// Rank of every draw
    fn rank(&self) -> Rank;

    /// Short name used in reports
    fn name(&self) -> &str;

    /// Draw one tensor
    fn sample(&self, rng: &mut dyn RngCore) -> ParamTensor;
}

/// Sampler configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub layers: usize,
    pub wires: usize,
    pub groups: usize,
    pub rank: Rank,
    pub distribution: Distribution,
}

impl SamplerConfig {
    /// `(L, W, 1)` draws from the default uniform distribution
    pub fn new(layers: usize, wires: usize) -> Self {
        Self {
            layers,
            wires,
            groups: 1,
            rank: Rank::Three,
            distribution: Distribution::default(),
        }
    }

    /// Set the generator-group width (implies the three-axis form)
    pub fn with_groups(mut self, groups: usize) -> Self {
        self.groups = groups;
        self.rank = Rank::Three;
        self
    }

    /// Emit the two-axis `(L, W)` shorthand
    pub fn two_axis(mut self) -> Self {
        self.rank = Rank::Two;
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn shape(&self) -> ParamShape {
        ParamShape::new(self.layers, self.wires, self.groups)
    }
}

/// Sampler drawing i.i.d. components from a [`Distribution`]
#[derive(Debug, Clone)]
pub struct ParameterSampler {
    config: SamplerConfig,
    kernel: Kernel,
}

impl ParameterSampler {
    pub fn new(config: SamplerConfig) -> Result<Self> {
        let shape = config.shape();
        if shape.is_empty() {
            return Err(LgvError::InvalidDistribution(format!(
                "every axis must be at least 1, got {:?}",
                shape.dims(Rank::Three)
            )));
        }
        if config.rank == Rank::Two && config.groups != 1 {
            return Err(LgvError::shape_mismatch(
                &[shape.layers, shape.wires, 1],
                &shape.dims(Rank::Three),
            ));
        }
        let kernel = config.distribution.kernel()?;
        Ok(Self { config, kernel })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn distribution(&self) -> Distribution {
        self.config.distribution
    }
}

impl Sampler for ParameterSampler {
    fn shape(&self) -> ParamShape {
        self.config.shape()
    }

    fn rank(&self) -> Rank {
        self.config.rank
    }

    fn name(&self) -> &str {
        self.config.distribution.name()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> ParamTensor {
        let shape = self.config.shape();
        let data = Array3::from_shape_fn((shape.layers, shape.wires, shape.groups), |_| {
            self.kernel.draw(rng)
        });
        ParamTensor::from_parts(data, self.config.rank)
    }
}
