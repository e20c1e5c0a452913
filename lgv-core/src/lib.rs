//! Trainability diagnostics for parameterized quantum circuits
//!
//! Local Gradient Variance (LGV) across sampled parameter points, shot-noise
//! variance at a fixed point, and entanglement entropy of circuit output
//! states. Circuit execution is delegated to an [`Evaluator`].

pub mod dataset; // Input rows sampled with replacement
pub mod entropy; // Partial trace, von Neumann entropy
pub mod error;
pub mod evaluator; // Scalar/state evaluator capability
pub mod gradient; // Parameter-shift rule
pub mod sampler;
pub mod tensor; // (layer, wire, group) tensors
pub mod variance; // LGV and shot-noise estimators

pub use dataset::{Dataset, DEFAULT_SYNTHETIC_SEED, SYNTHETIC_FEATURE_STD};
pub use entropy::{entropy, partial_trace, state_entropy, ReducedDensityMatrix, DEFAULT_ENTROPY_EPS};
pub use error::{LgvError, Result};
pub use evaluator::{Evaluator, ExpectationFn, Output, OutputMode, StateFn};
pub use gradient::{
    configure_thread_pool, finite_difference, gradient, verify_gradient, Dispatch, ParameterShift,
    ShiftPair, DEFAULT_FD_EPSILON, PARAMETER_SHIFT,
};
pub use sampler::{
    Distribution, ParameterSampler, Sampler, SamplerConfig, DEFAULT_NORMAL_STD,
    DEFAULT_TINY_NOISE_STD, DEFAULT_UNIFORM_SCALE,
};
pub use tensor::{GradientTensor, ParamShape, ParamTensor, Rank, VarianceTensor};
pub use variance::{
    compute_lgv, compute_shot_noise, unbiased_variance, LgvEstimator, ShotNoiseEstimator,
    VarianceSummary, DEFAULT_N_SAMPLES, DEFAULT_REPEATS,
};
